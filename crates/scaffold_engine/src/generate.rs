use serde::{Deserialize, Serialize};
use serde_json::Value;

use scaffold_logging::{scaffold_debug, scaffold_info, scaffold_warn};

use crate::{build_prompt, parse_project_files, response_schema, GeneratedFile, GenerationSettings};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerateError {
    #[error("Please enter a goal.")]
    EmptyGoal,
    #[error("{0}")]
    Configuration(String),
    #[error("Failed to parse the AI's response. The format was invalid: {0}")]
    ResponseFormat(String),
    #[error("Failed to generate a project: {0}")]
    Service(String),
}

/// Turns a goal into a complete list of project files, or fails as a whole.
#[async_trait::async_trait]
pub trait ProjectGenerator: Send + Sync {
    async fn generate(&self, goal: &str) -> Result<Vec<GeneratedFile>, GenerateError>;
}

/// Client for the Gemini `generateContent` endpoint using structured JSON output.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    settings: GenerationSettings,
}

impl GeminiGenerator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self { settings }
    }

    fn api_key(&self) -> Result<&str, GenerateError> {
        self.settings
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                GenerateError::Configuration(
                    "API key not configured. Set GEMINI_API_KEY or pass --api-key.".to_string(),
                )
            })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn build_client(&self) -> Result<reqwest::Client, GenerateError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| GenerateError::Service(err.to_string()))
    }
}

#[async_trait::async_trait]
impl ProjectGenerator for GeminiGenerator {
    async fn generate(&self, goal: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
        if goal.trim().is_empty() {
            return Err(GenerateError::EmptyGoal);
        }
        let api_key = self.api_key()?;
        let client = self.build_client()?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: build_prompt(goal),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: response_schema(),
            },
        };

        scaffold_info!(
            "generateContent model={} goal_len={}",
            self.settings.model,
            goal.len()
        );
        let response = client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = service_error_message(&body).unwrap_or_else(|| status.to_string());
            scaffold_warn!("generateContent failed status={} message={}", status, message);
            return Err(GenerateError::Service(message));
        }

        let reply: GenerateContentResponse = response.json().await.map_err(|err| {
            GenerateError::Service(format!("unexpected reply from model service ({err})"))
        })?;
        let text = reply.text().ok_or_else(|| {
            GenerateError::Service("model service returned no content".to_string())
        })?;
        scaffold_debug!("generateContent reply_len={}", text.len());

        let files = parse_project_files(&text)?;
        scaffold_info!("generateContent produced {} files", files.len());
        Ok(files)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GenerateError {
    if err.is_timeout() {
        return GenerateError::Service("request to model service timed out".to_string());
    }
    GenerateError::Service(err.to_string())
}

/// Pulls `error.message` out of a service error body, if it has one.
fn service_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToOwned::to_owned)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
