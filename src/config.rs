//! Profile configuration: patterns, base directories, extra settings.
//!
//! A profile is a named YAML bundle selected per invocation via
//! `--config=<profile>`. Two files participate, merged field-wise with
//! precedence user > app > defaults:
//!
//! - `{config_dir}/{profile}-app.yml` — the project-level profile
//! - `{config_dir}/{profile}-user.yml` — optional per-user overrides
//!
//! Key names follow the external schema: `params.two.directiveType.pattern`,
//! `params.two.layerType.pattern`, `app_prompt.base_dir`,
//! `app_schema.base_dir`. Unknown top-level keys are preserved in
//! `extra_settings` for callers; the engine does not interpret them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::StencilError;
use crate::pattern::TokenPattern;

/// Profile used when `--config` is not given. Unlike named profiles, it may
/// have no config file at all and then runs on compiled-in defaults.
pub const DEFAULT_PROFILE: &str = "default";

/// Config directory relative to the working directory.
pub const DEFAULT_CONFIG_DIR: &str = ".stencil/config";

const DEFAULT_DIRECTIVE_PATTERN: &str = "^(to|summary|defect|find)$";
const DEFAULT_LAYER_PATTERN: &str = "^(project|issue|task|bugs)$";
const DEFAULT_PROMPT_BASE_DIR: &str = "prompts";
const DEFAULT_SCHEMA_BASE_DIR: &str = "schema";

/// Resolved, immutable configuration for one invocation.
///
/// Always passed explicitly into engine calls, never read from ambient
/// state, so resolutions with different profiles can run side by side.
#[derive(Debug, Clone)]
pub struct ProfileConfig {
    pub name: String,
    pub directive_pattern: TokenPattern,
    pub layer_pattern: TokenPattern,
    /// Root of the template tree (`{base}/{directive}/{layer}/f_*.md`).
    pub prompt_base_dir: PathBuf,
    /// Root of the schema tree backing the `schema_file` variable.
    pub schema_base_dir: PathBuf,
    /// Top-level keys the engine does not interpret, preserved for callers.
    pub extra_settings: BTreeMap<String, serde_yaml::Value>,
}

impl ProfileConfig {
    /// Load the named profile from `{config_dir}/{name}-app.yml`, merging an
    /// optional `{config_dir}/{name}-user.yml` overlay (user wins per
    /// field).
    ///
    /// An explicitly requested profile must have an app file; the implicit
    /// `default` profile falls back to compiled-in defaults when none
    /// exists.
    pub fn load(name: &str, config_dir: &Path) -> Result<Self, StencilError> {
        let app_path = config_dir.join(format!("{name}-app.yml"));
        let user_path = config_dir.join(format!("{name}-user.yml"));

        let app_layer = if app_path.is_file() {
            load_file_layer(&app_path)?
        } else if name == DEFAULT_PROFILE {
            debug!(path = %app_path.display(), "no profile file, using defaults");
            ConfigLayer::default()
        } else {
            return Err(StencilError::ConfigFileNotFound {
                profile: name.to_owned(),
                path: app_path,
            });
        };

        let user_layer = if user_path.is_file() {
            load_file_layer(&user_path)?
        } else {
            ConfigLayer::default()
        };

        Self::from_layer(name, merge_layers(app_layer, user_layer))
    }

    /// Build a profile directly from its parts, bypassing config files.
    /// Used by embedding callers and tests.
    pub fn from_parts(
        name: &str,
        directive_pattern: &str,
        layer_pattern: &str,
        prompt_base_dir: impl Into<PathBuf>,
        schema_base_dir: impl Into<PathBuf>,
    ) -> Result<Self, StencilError> {
        Ok(Self {
            name: name.to_owned(),
            directive_pattern: compile_pattern(directive_pattern, name)?,
            layer_pattern: compile_pattern(layer_pattern, name)?,
            prompt_base_dir: prompt_base_dir.into(),
            schema_base_dir: schema_base_dir.into(),
            extra_settings: BTreeMap::new(),
        })
    }

    /// Path of the schema file backing the `schema_file` standard variable
    /// for a directive/layer pair.
    pub fn schema_file_path(&self, directive: &str, layer: &str) -> PathBuf {
        self.schema_base_dir
            .join(directive)
            .join(layer)
            .join("base.schema.json")
    }

    fn from_layer(name: &str, layer: ConfigLayer) -> Result<Self, StencilError> {
        let directive_src = layer
            .directive_pattern
            .unwrap_or_else(|| DEFAULT_DIRECTIVE_PATTERN.to_owned());
        let layer_src = layer
            .layer_pattern
            .unwrap_or_else(|| DEFAULT_LAYER_PATTERN.to_owned());

        Ok(Self {
            name: name.to_owned(),
            directive_pattern: compile_pattern(&directive_src, name)?,
            layer_pattern: compile_pattern(&layer_src, name)?,
            prompt_base_dir: layer
                .prompt_base_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPT_BASE_DIR)),
            schema_base_dir: layer
                .schema_base_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_BASE_DIR)),
            extra_settings: layer.extra,
        })
    }
}

fn compile_pattern(pattern: &str, profile: &str) -> Result<TokenPattern, StencilError> {
    TokenPattern::compile(pattern).map_err(|e| StencilError::InvalidPattern {
        pattern: pattern.to_owned(),
        profile: profile.to_owned(),
        detail: e.to_string(),
    })
}

/// YAML-deserializable profile file. All fields optional so the user
/// overlay can override any subset.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    params: ParamsSection,
    #[serde(default)]
    app_prompt: BaseDirSection,
    #[serde(default)]
    app_schema: BaseDirSection,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ParamsSection {
    #[serde(default)]
    two: TwoSection,
}

#[derive(Debug, Default, Deserialize)]
struct TwoSection {
    #[serde(default, rename = "directiveType")]
    directive_type: TypeSection,
    #[serde(default, rename = "layerType")]
    layer_type: TypeSection,
}

#[derive(Debug, Default, Deserialize)]
struct TypeSection {
    pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BaseDirSection {
    base_dir: Option<PathBuf>,
}

/// One config source flattened to optional fields, used to merge app file,
/// user overlay, and defaults.
#[derive(Debug, Default)]
struct ConfigLayer {
    directive_pattern: Option<String>,
    layer_pattern: Option<String>,
    prompt_base_dir: Option<PathBuf>,
    schema_base_dir: Option<PathBuf>,
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl From<FileConfig> for ConfigLayer {
    fn from(file: FileConfig) -> Self {
        Self {
            directive_pattern: file.params.two.directive_type.pattern,
            layer_pattern: file.params.two.layer_type.pattern,
            prompt_base_dir: file.app_prompt.base_dir,
            schema_base_dir: file.app_schema.base_dir,
            extra: file.extra,
        }
    }
}

fn load_file_layer(path: &Path) -> Result<ConfigLayer, StencilError> {
    let content = fs::read_to_string(path).map_err(|e| StencilError::ConfigParseFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let file: FileConfig =
        serde_yaml::from_str(&content).map_err(|e| StencilError::ConfigParseFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    debug!(path = %path.display(), "config file loaded");
    Ok(file.into())
}

fn merge_layers(app: ConfigLayer, user: ConfigLayer) -> ConfigLayer {
    let mut extra = app.extra;
    extra.extend(user.extra);
    ConfigLayer {
        directive_pattern: user.directive_pattern.or(app.directive_pattern),
        layer_pattern: user.layer_pattern.or(app.layer_pattern),
        prompt_base_dir: user.prompt_base_dir.or(app.prompt_base_dir),
        schema_base_dir: user.schema_base_dir.or(app.schema_base_dir),
        extra,
    }
}
