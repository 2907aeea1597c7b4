//! Prompt emission: stdout by default, or a destination file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::StencilError;

/// Write the resolved prompt text to `destination`, or stdout when none.
///
/// Parent directories of the destination are created as needed; an existing
/// file is overwritten.
pub fn write_prompt(text: &str, destination: Option<&Path>) -> Result<(), StencilError> {
    match destination {
        Some(path) => write_to_file(text, path),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(text.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|e| StencilError::DestinationWriteFailed {
                    path: PathBuf::from("<stdout>"),
                    detail: e.to_string(),
                })
        }
    }
}

fn write_to_file(text: &str, path: &Path) -> Result<(), StencilError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| StencilError::DestinationWriteFailed {
                path: path.to_path_buf(),
                detail: format!("failed to create directory {}: {e}", parent.display()),
            })?;
        }
    }
    fs::write(path, text).map_err(|e| StencilError::DestinationWriteFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
