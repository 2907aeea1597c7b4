//! Template selection: candidate chain construction and fallback resolution.
//!
//! Templates live at `{prompt_base_dir}/{directive}/{layer}/` with file
//! names of the form `f_{origin_layer}[_{adaptation}].md`. Resolution walks
//! an ordered chain of candidates from most to least specific and stops at
//! the first file the injected `exists` predicate accepts. The chain is
//! computed purely from the selector, never by scanning a directory, so
//! selection is reproducible.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::ProfileConfig;
use crate::error::StencilError;

/// Origin layer used when the caller gives no `--input` and as the final
/// fallback of every chain.
pub const DEFAULT_ORIGIN_LAYER: &str = "default";

/// Selects a template variant: which directive/layer directory, which
/// origin-layer file, and optionally which adaptation suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSelector {
    pub directive: String,
    pub layer: String,
    pub origin_layer: String,
    pub adaptation: Option<String>,
}

impl TemplateSelector {
    /// Selector for the plain directive/layer pair: default origin layer,
    /// no adaptation.
    pub fn new(directive: impl Into<String>, layer: impl Into<String>) -> Self {
        Self {
            directive: directive.into(),
            layer: layer.into(),
            origin_layer: DEFAULT_ORIGIN_LAYER.to_owned(),
            adaptation: None,
        }
    }

    pub fn with_origin_layer(mut self, origin_layer: impl Into<String>) -> Self {
        self.origin_layer = origin_layer.into();
        self
    }

    pub fn with_adaptation(mut self, adaptation: impl Into<String>) -> Self {
        self.adaptation = Some(adaptation.into());
        self
    }
}

fn template_file_name(origin_layer: &str, adaptation: Option<&str>) -> String {
    match adaptation {
        Some(adaptation) => format!("f_{origin_layer}_{adaptation}.md"),
        None => format!("f_{origin_layer}.md"),
    }
}

/// Build the ordered candidate chain for a selector.
///
/// Priority: the adaptation-qualified file, then the plain origin-layer
/// file, then `f_default.md`. Duplicates collapse to their first occurrence
/// (the default-origin no-adaptation case is a single candidate), and the
/// chain always ends with the `f_default.md` fallback.
pub fn candidate_chain(selector: &TemplateSelector, profile: &ProfileConfig) -> Vec<PathBuf> {
    let dir = profile
        .prompt_base_dir
        .join(&selector.directive)
        .join(&selector.layer);

    let mut chain: Vec<PathBuf> = Vec::with_capacity(3);
    let mut push = |name: String| {
        let path = dir.join(name);
        if !chain.contains(&path) {
            chain.push(path);
        }
    };

    if let Some(adaptation) = selector.adaptation.as_deref() {
        push(template_file_name(&selector.origin_layer, Some(adaptation)));
    }
    push(template_file_name(&selector.origin_layer, None));
    push(template_file_name(DEFAULT_ORIGIN_LAYER, None));

    chain
}

/// Resolve a selector to the first existing candidate path.
///
/// `exists` is the only I/O boundary; it is called once per candidate, in
/// chain order, and resolution stops at the first hit. When the whole chain
/// misses, the error carries every attempted path in order.
pub fn resolve_template(
    selector: &TemplateSelector,
    profile: &ProfileConfig,
    exists: impl Fn(&Path) -> bool,
) -> Result<PathBuf, StencilError> {
    let chain = candidate_chain(selector, profile);

    for candidate in &chain {
        if exists(candidate) {
            debug!(template = %candidate.display(), "template resolved");
            return Ok(candidate.clone());
        }
        debug!(candidate = %candidate.display(), "candidate missing, falling back");
    }

    Err(StencilError::TemplateNotFound { attempted: chain })
}
