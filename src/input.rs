//! Input text acquisition for the `input_text` variable.
//!
//! An explicit `--from` file wins; otherwise piped stdin is consumed. An
//! interactive terminal yields no input at all, which leaves the template's
//! input placeholders unresolved for manual editing.

use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::error::StencilError;

/// Input text plus its source file name, when it came from a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputText {
    pub text: String,
    pub file_name: Option<String>,
}

/// Read the invocation's input text, if any.
pub fn read_input(from: Option<&Path>) -> Result<Option<InputText>, StencilError> {
    if let Some(path) = from {
        let text = fs::read_to_string(path).map_err(|e| StencilError::InputReadFailed {
            source_path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        return Ok(Some(InputText { text, file_name }));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .map_err(|e| StencilError::InputReadFailed {
            source_path: "<stdin>".to_owned(),
            detail: e.to_string(),
        })?;
    Ok(Some(InputText {
        text,
        file_name: None,
    }))
}
