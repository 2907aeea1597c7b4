//! Variable bindings: the merged map of standard and custom variables.
//!
//! Standard variables are a fixed, closed set populated by the engine;
//! custom variables arrive from `--uv-<name>=<value>` options with the
//! prefix already stripped. Templates reference both by bare name, so a
//! custom name may never shadow a standard one.

use std::collections::BTreeMap;

use crate::error::StencilError;

/// Reserved variable names the engine populates itself.
pub const STANDARD_VARIABLE_NAMES: [&str; 4] = [
    "input_text",
    "input_text_file",
    "destination_path",
    "schema_file",
];

/// Returns `true` if `name` is one of the reserved standard names.
pub fn is_standard_name(name: &str) -> bool {
    STANDARD_VARIABLE_NAMES.contains(&name)
}

/// The engine-populated standard variables for one invocation.
///
/// Each field is bound only when its source is present: no piped input
/// means no `input_text` binding, so templates keep their documentation
/// placeholders for manual editing instead of rendering an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StandardVariables {
    pub input_text: Option<String>,
    pub input_text_file: Option<String>,
    pub destination_path: Option<String>,
    pub schema_file: Option<String>,
}

impl StandardVariables {
    fn into_map(self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut bind = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                map.insert(name.to_owned(), value);
            }
        };
        bind("input_text", self.input_text);
        bind("input_text_file", self.input_text_file);
        bind("destination_path", self.destination_path);
        bind("schema_file", self.schema_file);
        map
    }
}

/// Immutable name → value map consumed by substitution.
///
/// `BTreeMap` keeps iteration deterministic. Built once per invocation and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableBindingSet {
    bindings: BTreeMap<String, String>,
}

impl VariableBindingSet {
    /// Merge standard and custom variables into one frozen set.
    ///
    /// Custom names arrive with the `uv-` option prefix already stripped. A
    /// custom name equal to a reserved standard name is rejected rather than
    /// silently overriding, and a custom name supplied twice is rejected
    /// rather than last-writer-wins.
    pub fn merge(
        standard: StandardVariables,
        custom: &[(String, String)],
    ) -> Result<Self, StencilError> {
        let mut bindings = standard.into_map();

        for (name, value) in custom {
            if is_standard_name(name) {
                return Err(StencilError::BindingConflict { name: name.clone() });
            }
            if bindings.contains_key(name) {
                return Err(StencilError::DuplicateCustomVariable { name: name.clone() });
            }
            bindings.insert(name.clone(), value.clone());
        }

        Ok(Self { bindings })
    }

    /// Look up a variable by exact (case-sensitive) name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}
