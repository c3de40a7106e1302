use std::collections::HashSet;

use indexmap::IndexMap;
use proptest::prelude::*;

use lv_base::types::{OverrideEntry, Parameter, ParameterValues};
use lv_mod_params::compute_diff;

fn arb_parameters() -> impl Strategy<Value = Vec<Parameter>> {
    prop::collection::vec(("[a-z_]{1,8}", "[a-z0-9]{0,4}"), 0..12).prop_map(|pairs| {
        let mut seen = HashSet::new();
        pairs
            .into_iter()
            .filter(|(name, _)| seen.insert(name.clone()))
            .map(|(name, default)| Parameter::new(name, default))
            .collect()
    })
}

/// Declared parameters plus an edit map that keeps, changes, drops or adds names.
fn arb_case() -> impl Strategy<Value = (Vec<Parameter>, ParameterValues)> {
    arb_parameters().prop_flat_map(|params| {
        let n = params.len();
        (
            Just(params),
            prop::collection::vec((0u8..3, "[a-z0-9]{0,4}"), n),
            prop::collection::vec(("[A-Z]{1,6}", "[a-z]{0,3}"), 0..3),
        )
            .prop_map(|(params, edits, extras)| {
                let mut updated: ParameterValues = IndexMap::new();
                for (p, (kind, value)) in params.iter().zip(edits) {
                    match kind {
                        0 => {
                            updated.insert(p.name.clone(), p.default_value.clone());
                        }
                        1 => {
                            updated.insert(p.name.clone(), value);
                        }
                        _ => {}
                    }
                }
                // Uppercase names never collide with declared ones
                for (name, value) in extras {
                    updated.insert(name, value);
                }
                (params, updated)
            })
    })
}

proptest! {
    #[test]
    fn diff_only_reports_changed_declared_names((params, updated) in arb_case()) {
        let diff = compute_diff(&params, &updated);
        for entry in &diff {
            let declared = params.iter().find(|p| p.name == entry.name);
            prop_assert!(declared.is_some());
            let declared = declared.unwrap();
            prop_assert_ne!(&entry.value, &declared.default_value);
            prop_assert_eq!(Some(&entry.value), updated.get(&entry.name));
        }
    }

    #[test]
    fn diff_is_complete_and_ordered((params, updated) in arb_case()) {
        let diff = compute_diff(&params, &updated);
        let expected: Vec<OverrideEntry> = params
            .iter()
            .filter_map(|p| match updated.get(&p.name) {
                Some(v) if *v != p.default_value => Some(OverrideEntry::new(&p.name, v)),
                _ => None,
            })
            .collect();
        prop_assert_eq!(diff, expected);
    }

    #[test]
    fn all_defaults_yield_empty_diff(params in arb_parameters()) {
        let updated: ParameterValues = params.iter().map(|p| (p.name.clone(), p.default_value.clone())).collect();
        prop_assert!(compute_diff(&params, &updated).is_empty());
    }
}

#[test]
fn sim_time_scenario() {
    let params = vec![Parameter::new("use_sim_time", "false").with_description("Use simulation clock")];
    let mut updated = ParameterValues::new();
    updated.insert("use_sim_time".to_string(), "true".to_string());
    let diff = compute_diff(&params, &updated);
    assert_eq!(serde_json::to_string(&diff).unwrap(), r#"[["use_sim_time","true"]]"#);
}
