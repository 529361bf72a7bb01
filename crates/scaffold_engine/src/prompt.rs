use serde_json::{json, Value};

/// Instruction sent to the model service for `goal`.
pub fn build_prompt(goal: &str) -> String {
    format!(
        "My goal is: \"{goal}\".\n\
         Based on this goal, generate a complete project structure with all the necessary files and their content.\n\
         For example, if the goal is 'a simple html page with a button', you should generate an index.html file and maybe a style.css file.\n\
         Ensure the code is complete and runnable.\n\
         Provide the output as a JSON object containing a list of files, where each file has a 'filename' and its corresponding 'content'.\n\
         Do not add any introductory text or explanation outside of the JSON structure.\n"
    )
}

/// Structured-output schema: `{ files: [ { filename, content } ] }`.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "files": {
                "type": "ARRAY",
                "description": "An array of file objects that constitute the project.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "filename": {
                            "type": "STRING",
                            "description": "The full path for the file, e.g., 'src/app.js' or 'index.html'."
                        },
                        "content": {
                            "type": "STRING",
                            "description": "The complete source code or content for this file."
                        }
                    },
                    "required": ["filename", "content"]
                }
            }
        },
        "required": ["files"]
    })
}
