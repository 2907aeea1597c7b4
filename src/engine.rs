//! The prompt resolution pipeline.
//!
//! One invocation flows through four stages in a fixed order: validate the
//! two-token command, merge variable bindings, resolve the template path,
//! load and substitute. Each stage fails fast with its own error kind; the
//! orchestrator never folds a specific error into a generic one, so the
//! caller can tell a bad command from a missing template from a bad
//! variable.

use tracing::debug;

use crate::config::ProfileConfig;
use crate::error::StencilError;
use crate::loader::TemplateLoader;
use crate::pattern::{self, TwoTokenCommand};
use crate::selector::{self, TemplateSelector};
use crate::substitute::{self, ResolvedPrompt};
use crate::vars::{StandardVariables, VariableBindingSet};

/// Everything one resolution needs, assembled by the CLI layer.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub command: TwoTokenCommand,
    /// Layer type of the source material; `"default"` when unspecified.
    pub origin_layer: String,
    pub adaptation: Option<String>,
    pub standard_vars: StandardVariables,
    /// Custom variables in invocation order, `uv-` prefix already stripped.
    pub custom_vars: Vec<(String, String)>,
}

/// Stateless resolver tying a profile to a template loader.
///
/// The profile is passed in explicitly rather than read from ambient state,
/// so several engines with different profiles can run side by side (notably
/// in tests).
pub struct PromptEngine<'a, L: TemplateLoader> {
    profile: &'a ProfileConfig,
    loader: &'a L,
}

impl<'a, L: TemplateLoader> PromptEngine<'a, L> {
    pub fn new(profile: &'a ProfileConfig, loader: &'a L) -> Self {
        Self { profile, loader }
    }

    /// Run the full pipeline for one request.
    pub fn resolve(&self, request: &PromptRequest) -> Result<ResolvedPrompt, StencilError> {
        pattern::validate_command(&request.command, self.profile)?;
        debug!(
            directive = %request.command.directive,
            layer = %request.command.layer,
            "command validated"
        );

        let bindings =
            VariableBindingSet::merge(request.standard_vars.clone(), &request.custom_vars)?;
        debug!(binding_count = bindings.len(), "bindings merged");

        let selector = TemplateSelector {
            directive: request.command.directive.clone(),
            layer: request.command.layer.clone(),
            origin_layer: request.origin_layer.clone(),
            adaptation: request.adaptation.clone(),
        };
        let template_path =
            selector::resolve_template(&selector, self.profile, |p| self.loader.exists(p))?;

        let template =
            self.loader
                .read(&template_path)
                .map_err(|e| StencilError::TemplateLoadFailed {
                    path: template_path.clone(),
                    detail: e.to_string(),
                })?;

        let prompt = substitute::substitute(&template, &bindings, template_path);
        debug!(
            template = %prompt.template_path.display(),
            text_len = prompt.text.len(),
            unresolved = prompt.unresolved_placeholders.len(),
            "prompt substituted"
        );
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::io;
    use std::path::{Path, PathBuf};

    use crate::config::ProfileConfig;

    /// In-memory loader recording every `exists` probe.
    struct MapLoader {
        templates: BTreeMap<PathBuf, String>,
        probed: RefCell<Vec<PathBuf>>,
        fail_reads: bool,
    }

    impl MapLoader {
        fn new(templates: &[(&str, &str)]) -> Self {
            Self {
                templates: templates
                    .iter()
                    .map(|(p, t)| (PathBuf::from(p), (*t).to_owned()))
                    .collect(),
                probed: RefCell::new(Vec::new()),
                fail_reads: false,
            }
        }

        fn failing_reads(templates: &[(&str, &str)]) -> Self {
            Self {
                fail_reads: true,
                ..Self::new(templates)
            }
        }
    }

    impl TemplateLoader for MapLoader {
        fn exists(&self, path: &Path) -> bool {
            self.probed.borrow_mut().push(path.to_path_buf());
            self.templates.contains_key(path)
        }

        fn read(&self, path: &Path) -> io::Result<String> {
            if self.fail_reads {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
            self.templates
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such template"))
        }
    }

    fn profile() -> ProfileConfig {
        ProfileConfig::from_parts(
            "test",
            "^(to|summary|defect|find)$",
            "^(project|issue|task|bugs)$",
            "prompts",
            "schema",
        )
        .unwrap()
    }

    fn request(directive: &str, layer: &str) -> PromptRequest {
        PromptRequest {
            command: TwoTokenCommand {
                directive: directive.to_owned(),
                layer: layer.to_owned(),
            },
            origin_layer: "default".to_owned(),
            adaptation: None,
            standard_vars: StandardVariables::default(),
            custom_vars: Vec::new(),
        }
    }

    #[test]
    fn full_pipeline_renders_template_with_bindings() {
        let loader = MapLoader::new(&[(
            "prompts/to/task/f_default.md",
            "Break down into tasks:\n{input_text}\nStyle: {style}",
        )]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let mut req = request("to", "task");
        req.standard_vars.input_text = Some("build the login page".to_owned());
        req.custom_vars = vec![("style".to_owned(), "agile".to_owned())];

        let prompt = engine.resolve(&req).expect("pipeline should succeed");
        assert_eq!(
            prompt.text,
            "Break down into tasks:\nbuild the login page\nStyle: agile"
        );
        assert_eq!(prompt.template_path, PathBuf::from("prompts/to/task/f_default.md"));
        assert!(prompt.unresolved_placeholders.is_empty());
    }

    #[test]
    fn fallback_selects_origin_layer_template_when_adaptation_variant_missing() {
        // (to, task) with origin "project" and adaptation "strict"; only
        // f_project.md exists. Resolution succeeds on the second candidate.
        let loader = MapLoader::new(&[("prompts/to/task/f_project.md", "From project: {input_text}")]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let mut req = request("to", "task");
        req.origin_layer = "project".to_owned();
        req.adaptation = Some("strict".to_owned());

        let prompt = engine.resolve(&req).expect("fallback should resolve");
        assert_eq!(prompt.template_path, PathBuf::from("prompts/to/task/f_project.md"));
        assert_eq!(
            *loader.probed.borrow(),
            vec![
                PathBuf::from("prompts/to/task/f_project_strict.md"),
                PathBuf::from("prompts/to/task/f_project.md"),
            ],
            "resolution must stop at the second candidate"
        );
    }

    #[test]
    fn invalid_directive_fails_before_any_path_probe() {
        let loader = MapLoader::new(&[("prompts/to/task/f_default.md", "x")]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let err = engine.resolve(&request("migrate", "component")).unwrap_err();
        assert!(matches!(err, StencilError::InvalidDirective { .. }));
        assert!(
            loader.probed.borrow().is_empty(),
            "no template lookup may happen for an invalid command"
        );
    }

    #[test]
    fn binding_conflict_fails_before_any_path_probe() {
        let loader = MapLoader::new(&[("prompts/to/task/f_default.md", "x")]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let mut req = request("to", "task");
        req.custom_vars = vec![("input_text".to_owned(), "clash".to_owned())];

        let err = engine.resolve(&req).unwrap_err();
        assert!(matches!(err, StencilError::BindingConflict { .. }));
        assert!(loader.probed.borrow().is_empty());
    }

    #[test]
    fn exhausted_chain_surfaces_template_not_found() {
        let loader = MapLoader::new(&[]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let mut req = request("summary", "issue");
        req.origin_layer = "task".to_owned();
        req.adaptation = Some("strict".to_owned());

        let err = engine.resolve(&req).unwrap_err();
        match err {
            StencilError::TemplateNotFound { attempted } => {
                assert_eq!(
                    attempted,
                    vec![
                        PathBuf::from("prompts/summary/issue/f_task_strict.md"),
                        PathBuf::from("prompts/summary/issue/f_task.md"),
                        PathBuf::from("prompts/summary/issue/f_default.md"),
                    ]
                );
            }
            other => panic!("expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn unreadable_template_is_load_failed_not_not_found() {
        let loader = MapLoader::failing_reads(&[("prompts/to/task/f_default.md", "x")]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let err = engine.resolve(&request("to", "task")).unwrap_err();
        match err {
            StencilError::TemplateLoadFailed { path, detail } => {
                assert_eq!(path, PathBuf::from("prompts/to/task/f_default.md"));
                assert!(detail.contains("permission denied"), "detail: {detail}");
            }
            other => panic!("expected TemplateLoadFailed, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_placeholders_are_reported_not_fatal() {
        let loader = MapLoader::new(&[(
            "prompts/find/bugs/f_default.md",
            "Find bugs in:\n{input_text}\nWrite to {destination_path}",
        )]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        // No input, no destination: both placeholders stay for manual editing.
        let prompt = engine.resolve(&request("find", "bugs")).expect("not an error");
        assert_eq!(
            prompt.unresolved_placeholders.iter().collect::<Vec<_>>(),
            vec!["destination_path", "input_text"]
        );
        assert!(prompt.text.contains("{input_text}"));
    }

    #[test]
    fn resolving_twice_with_same_request_yields_same_prompt() {
        let loader = MapLoader::new(&[("prompts/to/task/f_default.md", "{a} {b}")]);
        let profile = profile();
        let engine = PromptEngine::new(&profile, &loader);

        let mut req = request("to", "task");
        req.custom_vars = vec![("a".to_owned(), "1".to_owned())];

        let first = engine.resolve(&req).unwrap();
        let second = engine.resolve(&req).unwrap();
        assert_eq!(first, second, "resolution is stateless");
    }
}
