use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::DEFAULT_PROFILE;
use crate::error::StencilError;

/// stencil — render structured AI prompts from directive/layer templates.
///
/// Takes a directive verb and a target layer, resolves the matching
/// template under the profile's prompt base directory through the fallback
/// chain, fills in standard and user-supplied variables, and writes the
/// result to stdout or a destination file.
#[derive(Debug, Parser)]
#[command(name = "stencil", version, about)]
pub struct Cli {
    /// Directive verb selecting the transformation (e.g. "to", "summary").
    pub directive: String,

    /// Layer being produced or analyzed (e.g. "project", "task").
    pub layer: String,

    /// Read input text from this file instead of piped stdin.
    #[arg(long, short = 'f')]
    pub from: Option<PathBuf>,

    /// Write the prompt to this file instead of stdout.
    #[arg(long, short = 'o')]
    pub destination: Option<PathBuf>,

    /// Layer type of the source material; selects the "from X" template
    /// variant (default: "default").
    #[arg(long = "input", short = 'i')]
    pub input: Option<String>,

    /// Adaptation variant of the template (e.g. "strict", "agile").
    #[arg(long, short = 'a')]
    pub adaptation: Option<String>,

    /// Configuration profile name; reads {profile}-app.yml and an optional
    /// {profile}-user.yml overlay from the config directory.
    #[arg(long = "config", short = 'c', default_value = DEFAULT_PROFILE)]
    pub config: String,

    /// Log level filter (e.g. "debug", "stencil=trace,warn"). Overridden by
    /// the STENCIL_LOG env var.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to a log file. When set, structured JSON logs are appended here
    /// in addition to the human-readable stderr output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Split `--uv-<name>=<value>` options out of the raw argument list.
///
/// clap cannot model open-ended option names, so custom variables are
/// extracted before parsing. Returns the remaining arguments (for clap) and
/// the custom pairs in invocation order, names stripped of the `uv-`
/// prefix. Malformed options fail here; duplicate names are caught later
/// when the binding set is merged.
pub fn extract_custom_vars(
    args: impl IntoIterator<Item = OsString>,
) -> Result<(Vec<OsString>, Vec<(String, String)>), StencilError> {
    let mut rest: Vec<OsString> = Vec::new();
    let mut custom: Vec<(String, String)> = Vec::new();

    for arg in args {
        let Some(text) = arg.to_str() else {
            rest.push(arg);
            continue;
        };
        let Some(tail) = text.strip_prefix("--uv-") else {
            rest.push(arg);
            continue;
        };

        let (name, value) = tail.split_once('=').ok_or_else(|| {
            StencilError::InvalidCustomVarOption {
                option: text.to_owned(),
                detail: "expected --uv-<name>=<value>".to_owned(),
            }
        })?;
        if name.is_empty() {
            return Err(StencilError::InvalidCustomVarOption {
                option: text.to_owned(),
                detail: "variable name is empty".to_owned(),
            });
        }
        custom.push((name.to_owned(), value.to_owned()));
    }

    Ok((rest, custom))
}
