use serde_json::{Map, Value};

use crate::{GenerateError, GeneratedFile};

/// Validates the model's reply against `{ "files": [ { "filename", "content" } ] }`.
///
/// Both fields must be non-empty strings. Nothing is coerced: a single bad entry
/// rejects the whole reply.
pub fn parse_project_files(text: &str) -> Result<Vec<GeneratedFile>, GenerateError> {
    let value: Value = serde_json::from_str(text.trim())
        .map_err(|err| GenerateError::ResponseFormat(format!("reply is not valid JSON ({err})")))?;

    let files = value
        .as_object()
        .ok_or_else(|| format_error("reply is not a JSON object"))?
        .get("files")
        .ok_or_else(|| format_error("reply has no `files` field"))?
        .as_array()
        .ok_or_else(|| format_error("`files` is not an array"))?;

    files
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_entry(index, entry))
        .collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<GeneratedFile, GenerateError> {
    let object = entry
        .as_object()
        .ok_or_else(|| format_error(format!("files[{index}] is not an object")))?;
    let filename = required_string(object, index, "filename")?;
    if filename.trim().is_empty() {
        return Err(format_error(format!("files[{index}].filename is empty")));
    }
    let content = required_string(object, index, "content")?;
    if content.is_empty() {
        return Err(format_error(format!("files[{index}].content is empty")));
    }
    Ok(GeneratedFile::new(filename, content))
}

fn required_string<'a>(
    object: &'a Map<String, Value>,
    index: usize,
    key: &str,
) -> Result<&'a str, GenerateError> {
    match object.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(_) => Err(format_error(format!("files[{index}].{key} is not a string"))),
        None => Err(format_error(format!("files[{index}] is missing `{key}`"))),
    }
}

fn format_error(message: impl Into<String>) -> GenerateError {
    GenerateError::ResponseFormat(message.into())
}
