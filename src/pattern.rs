//! Token pattern compilation and two-token command validation.
//!
//! Directive and layer vocabularies are not compiled in; each profile
//! supplies its own regex for both token positions. `TokenPattern` wraps the
//! compiled regex so matching is always full-string, and keeps the source
//! string for error messages.

use regex::Regex;

use crate::config::ProfileConfig;
use crate::error::StencilError;

/// A compiled token pattern with full-string match semantics.
///
/// The configured pattern is wrapped as `^(?:pattern)$` at compile time, so
/// `to2` never matches `to` regardless of how the profile author anchored
/// the expression.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    regex: Regex,
    source: String,
}

impl TokenPattern {
    /// Compile a profile-supplied pattern string.
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let anchored = format!("^(?:{pattern})$");
        Ok(Self {
            regex: Regex::new(&anchored)?,
            source: pattern.to_owned(),
        })
    }

    /// Returns `true` if the whole token matches the pattern.
    pub fn matches(&self, token: &str) -> bool {
        self.regex.is_match(token)
    }

    /// The pattern string as configured, for error messages.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The two-token command: a directive verb and a target layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoTokenCommand {
    pub directive: String,
    pub layer: String,
}

/// Validate a command against the profile's configured patterns.
///
/// Both tokens must match their respective pattern in full. Pure: the only
/// inputs are the command and the profile, and a failure names the offending
/// token, its pattern, and the active profile so the CLI layer can report
/// exactly what was rejected.
pub fn validate_command(
    command: &TwoTokenCommand,
    profile: &ProfileConfig,
) -> Result<(), StencilError> {
    if !profile.directive_pattern.matches(&command.directive) {
        return Err(StencilError::InvalidDirective {
            token: command.directive.clone(),
            pattern: profile.directive_pattern.source().to_owned(),
            profile: profile.name.clone(),
        });
    }
    if !profile.layer_pattern.matches(&command.layer) {
        return Err(StencilError::InvalidLayer {
            token: command.layer.clone(),
            pattern: profile.layer_pattern.source().to_owned(),
            profile: profile.name.clone(),
        });
    }
    Ok(())
}
