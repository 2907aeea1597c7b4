use std::path::PathBuf;

/// Error taxonomy for prompt resolution, one enum for the whole pipeline.
///
/// Every variant carries the structured detail the CLI layer needs to print
/// an actionable message: the offending token and its pattern, the full
/// attempted candidate chain, or the path that failed. No variant is
/// retryable by the engine itself.
#[derive(Debug, thiserror::Error)]
pub enum StencilError {
    #[error("Invalid directive '{token}': does not match pattern '{pattern}' (profile '{profile}')")]
    InvalidDirective {
        token: String,
        pattern: String,
        profile: String,
    },

    #[error("Invalid layer '{token}': does not match pattern '{pattern}' (profile '{profile}')")]
    InvalidLayer {
        token: String,
        pattern: String,
        profile: String,
    },

    #[error("Invalid pattern '{pattern}' in profile '{profile}': {detail}")]
    InvalidPattern {
        pattern: String,
        profile: String,
        detail: String,
    },

    /// A `--uv-` custom variable reuses a reserved standard name. Templates
    /// reference variables by bare name, so the binding would be ambiguous.
    #[error("Custom variable 'uv-{name}' collides with the reserved variable '{name}'")]
    BindingConflict { name: String },

    #[error("Custom variable 'uv-{name}' supplied more than once")]
    DuplicateCustomVariable { name: String },

    #[error("Invalid custom variable option '{option}': {detail}")]
    InvalidCustomVarOption { option: String, detail: String },

    /// Every candidate in the fallback chain was absent. The attempted
    /// paths are listed in the order they were tried.
    #[error("No template found. Tried, in order:\n{}", attempted_list(.attempted))]
    TemplateNotFound { attempted: Vec<PathBuf> },

    /// The template existed at resolution time but could not be read
    /// (permissions, race, corruption). Distinct from not-found because the
    /// remediation differs.
    #[error("Failed to read template {path}: {detail}")]
    TemplateLoadFailed { path: PathBuf, detail: String },

    #[error("Config file for profile '{profile}' not found: {path}")]
    ConfigFileNotFound { profile: String, path: PathBuf },

    #[error("Failed to parse config file {path}: {detail}")]
    ConfigParseFailed { path: PathBuf, detail: String },

    #[error("Failed to read input {source_path}: {detail}")]
    InputReadFailed { source_path: String, detail: String },

    #[error("Failed to write prompt to {path}: {detail}")]
    DestinationWriteFailed { path: PathBuf, detail: String },
}

fn attempted_list(attempted: &[PathBuf]) -> String {
    attempted
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n")
}
