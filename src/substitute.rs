//! Placeholder substitution over resolved template text.
//!
//! Placeholders are single-brace `{name}` where name is an identifier
//! (`[A-Za-z_][A-Za-z0-9_]*`). One left-to-right pass over the raw template:
//! bound names are replaced with their value, unknown names stay verbatim
//! and are reported back, and brace text that is not a well-formed
//! placeholder is plain text. Substituted values are emitted literally and
//! never re-scanned, so a value containing `{other}` cannot trigger further
//! expansion.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::vars::VariableBindingSet;

/// The final rendered prompt plus resolution metadata.
///
/// Unresolved placeholders are a reportable signal, not an error: templates
/// legitimately keep documentation placeholders when no input was supplied,
/// and the caller decides whether to warn or fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrompt {
    pub text: String,
    /// Template file the text was rendered from.
    pub template_path: PathBuf,
    /// Placeholder names that had no binding, in sorted order.
    pub unresolved_placeholders: BTreeSet<String>,
}

/// Substitute `bindings` into `template`, recording unresolved names.
pub fn substitute(
    template: &str,
    bindings: &VariableBindingSet,
    template_path: PathBuf,
) -> ResolvedPrompt {
    let mut text = String::with_capacity(template.len());
    let mut unresolved = BTreeSet::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after_brace = &rest[open + 1..];

        match placeholder_name(after_brace) {
            Some(name) => {
                // open brace + name + close brace
                let consumed = open + 1 + name.len() + 1;
                match bindings.get(name) {
                    Some(value) => text.push_str(value),
                    None => {
                        unresolved.insert(name.to_owned());
                        text.push_str(&rest[open..consumed]);
                    }
                }
                rest = &rest[consumed..];
            }
            None => {
                text.push('{');
                rest = &rest[open + 1..];
            }
        }
    }
    text.push_str(rest);

    ResolvedPrompt {
        text,
        template_path,
        unresolved_placeholders: unresolved,
    }
}

/// Returns the placeholder name when `s` starts with `name}` for a valid
/// identifier name.
fn placeholder_name(s: &str) -> Option<&str> {
    let end = s.find('}')?;
    let name = &s[..end];
    is_identifier(name).then_some(name)
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::{StandardVariables, VariableBindingSet};

    fn bindings(pairs: &[(&str, &str)]) -> VariableBindingSet {
        let custom: Vec<(String, String)> = pairs
            .iter()
            .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
            .collect();
        VariableBindingSet::merge(StandardVariables::default(), &custom).unwrap()
    }

    fn path() -> PathBuf {
        PathBuf::from("prompts/to/task/f_default.md")
    }

    #[test]
    fn known_placeholder_is_replaced() {
        let prompt = substitute("Convert: {notes}", &bindings(&[("notes", "fix the bug")]), path());
        assert_eq!(prompt.text, "Convert: fix the bug");
        assert!(prompt.unresolved_placeholders.is_empty());
    }

    #[test]
    fn repeated_placeholder_gets_same_value_everywhere() {
        let prompt = substitute("{x} and {x} and {x}", &bindings(&[("x", "v")]), path());
        assert_eq!(prompt.text, "v and v and v");
    }

    #[test]
    fn unknown_placeholder_stays_verbatim_and_is_recorded() {
        let prompt = substitute("Input: {input_text}", &bindings(&[]), path());
        assert_eq!(prompt.text, "Input: {input_text}");
        assert_eq!(
            prompt.unresolved_placeholders.iter().collect::<Vec<_>>(),
            vec!["input_text"]
        );
    }

    #[test]
    fn unresolved_names_are_deduplicated() {
        let prompt = substitute("{a} {b} {a}", &bindings(&[]), path());
        assert_eq!(prompt.unresolved_placeholders.len(), 2);
    }

    #[test]
    fn substituted_value_is_not_rescanned() {
        let prompt = substitute(
            "{outer}",
            &bindings(&[("outer", "contains {inner} braces"), ("inner", "BOOM")]),
            path(),
        );
        assert_eq!(prompt.text, "contains {inner} braces");
        assert!(
            prompt.unresolved_placeholders.is_empty(),
            "text inside a substituted value is literal, not a placeholder"
        );
    }

    #[test]
    fn substitution_is_idempotent_over_the_raw_template() {
        let template = "{a} then {missing} then {a}";
        let set = bindings(&[("a", "done")]);
        let first = substitute(template, &set, path());
        let second = substitute(template, &set, path());
        assert_eq!(first, second);
    }

    #[test]
    fn non_identifier_braces_are_literal_text() {
        let set = bindings(&[("text", "x")]);
        let prompt = substitute(r#"JSON: {"text": "..."} and math {1+2} and { spaced }"#, &set, path());
        assert_eq!(prompt.text, r#"JSON: {"text": "..."} and math {1+2} and { spaced }"#);
        assert!(
            prompt.unresolved_placeholders.is_empty(),
            "malformed braces are not placeholders: {:?}",
            prompt.unresolved_placeholders
        );
    }

    #[test]
    fn unclosed_brace_is_literal() {
        let prompt = substitute("open { and {name", &bindings(&[("name", "v")]), path());
        assert_eq!(prompt.text, "open { and {name");
    }

    #[test]
    fn brace_before_placeholder_still_resolves() {
        let prompt = substitute("{{name}", &bindings(&[("name", "v")]), path());
        // First brace is literal (no identifier follows it), second is a
        // placeholder.
        assert_eq!(prompt.text, "{v");
    }

    #[test]
    fn empty_template_yields_empty_prompt() {
        let prompt = substitute("", &bindings(&[]), path());
        assert_eq!(prompt.text, "");
        assert!(prompt.unresolved_placeholders.is_empty());
    }

    #[test]
    fn template_path_is_carried_through() {
        let prompt = substitute("x", &bindings(&[]), path());
        assert_eq!(prompt.template_path, path());
    }

    #[test]
    fn underscore_names_are_valid_placeholders() {
        let prompt = substitute("{_private} {input_text_file}", &bindings(&[("_private", "p")]), path());
        assert_eq!(prompt.text, "p {input_text_file}");
        assert!(prompt.unresolved_placeholders.contains("input_text_file"));
    }
}
