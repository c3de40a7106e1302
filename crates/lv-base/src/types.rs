use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A parameter declared by a launch file, as reported by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub default_value: String,
    /// Declared inside a conditional block; may not take effect for every launch.
    #[serde(default)]
    pub conditionally_included: bool,
}

impl Parameter {
    pub fn new(name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self { name: name.into(), description: String::new(), default_value: default_value.into(), conditionally_included: false }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A user-supplied value for a declared parameter.
///
/// Serialized as a two-element array `[name, value]`, which is both the cache
/// format and the argument format the analyzer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct OverrideEntry {
    pub name: String,
    pub value: String,
}

impl OverrideEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

impl From<(String, String)> for OverrideEntry {
    fn from((name, value): (String, String)) -> Self {
        Self { name, value }
    }
}

impl From<OverrideEntry> for (String, String) {
    fn from(entry: OverrideEntry) -> Self {
        (entry.name, entry.value)
    }
}

/// Edited form values keyed by parameter name, in form order.
pub type ParameterValues = IndexMap<String, String>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_entry_serializes_as_pair() {
        let entry = OverrideEntry::new("use_sim_time", "true");
        assert_eq!(serde_json::to_string(&entry).unwrap(), r#"["use_sim_time","true"]"#);
    }

    #[test]
    fn override_entry_deserializes_from_pair() {
        let entry: OverrideEntry = serde_json::from_str(r#"["robot","turtle"]"#).unwrap();
        assert_eq!(entry, OverrideEntry::new("robot", "turtle"));
    }

    #[test]
    fn parameter_tolerates_missing_optional_fields() {
        let p: Parameter = serde_json::from_str(r#"{"name":"ns"}"#).unwrap();
        assert_eq!(p.name, "ns");
        assert_eq!(p.default_value, "");
        assert!(!p.conditionally_included);
    }
}
