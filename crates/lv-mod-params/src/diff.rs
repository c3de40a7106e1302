//! Minimal changed-parameter set between declared defaults and edited values.

use lv_base::types::{OverrideEntry, Parameter, ParameterValues};

/// Overrides for every parameter whose edited value differs from its default.
///
/// Output follows `original`'s declaration order. Names in `updated` that were
/// never declared are ignored, and a declared name missing from `updated`
/// counts as unchanged. An empty result means "launch with all defaults".
pub fn compute(original: &[Parameter], updated: &ParameterValues) -> Vec<OverrideEntry> {
    original
        .iter()
        .filter_map(|p| {
            let value = updated.get(&p.name)?;
            (*value != p.default_value).then(|| OverrideEntry::new(&p.name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> ParameterValues {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn changed_value_is_reported() {
        let original = vec![Parameter::new("use_sim_time", "false")];
        let diff = compute(&original, &values(&[("use_sim_time", "true")]));
        assert_eq!(diff, vec![OverrideEntry::new("use_sim_time", "true")]);
    }

    #[test]
    fn all_defaults_is_empty() {
        let original = vec![Parameter::new("a", "1"), Parameter::new("b", "2")];
        assert!(compute(&original, &values(&[("a", "1"), ("b", "2")])).is_empty());
    }

    #[test]
    fn undeclared_names_are_ignored() {
        let original = vec![Parameter::new("a", "1")];
        let diff = compute(&original, &values(&[("a", "1"), ("ghost", "boo")]));
        assert!(diff.is_empty());
    }

    #[test]
    fn missing_name_counts_as_unchanged() {
        let original = vec![Parameter::new("a", "1"), Parameter::new("b", "2")];
        let diff = compute(&original, &values(&[("b", "3")]));
        assert_eq!(diff, vec![OverrideEntry::new("b", "3")]);
    }

    #[test]
    fn declaration_order_wins_over_edit_order() {
        let original = vec![Parameter::new("first", "x"), Parameter::new("second", "y"), Parameter::new("third", "z")];
        let diff = compute(&original, &values(&[("third", "Z"), ("first", "X")]));
        assert_eq!(diff, vec![OverrideEntry::new("first", "X"), OverrideEntry::new("third", "Z")]);
    }

    #[test]
    fn comparison_is_exact() {
        let original = vec![Parameter::new("flag", "false")];
        let diff = compute(&original, &values(&[("flag", "False")]));
        assert_eq!(diff, vec![OverrideEntry::new("flag", "False")]);
    }
}
