//! Property-based tests for extraction and substitution.

use std::collections::HashSet;

use proptest::prelude::*;
use querydeck_template::{extract, substitute, sync_variables, VariableType};

// ============================================================================
// Strategies
// ============================================================================

/// Template made of literal fragments interleaved with placeholders drawn from
/// a small name pool, so repeats are common.
fn template_strategy() -> impl Strategy<Value = (String, Vec<String>)> {
    let name = prop::sample::select(vec!["a", "b", "c", "region", "start_date", "limit"]);
    let fragment = "[a-z0-9 =<>,.*()]{0,8}";
    prop::collection::vec((fragment, name, any::<bool>()), 0..12).prop_map(|parts| {
        let mut template = String::new();
        let mut order: Vec<String> = Vec::new();
        for (text, name, padded) in parts {
            template.push_str(&text);
            if padded {
                template.push_str(&format!("{{{{ {} }}}}", name));
            } else {
                template.push_str(&format!("{{{{{}}}}}", name));
            }
            if !order.iter().any(|n| n == name) {
                order.push(name.to_string());
            }
        }
        (template, order)
    })
}

fn type_strategy() -> impl Strategy<Value = VariableType> {
    prop_oneof![
        Just(VariableType::String),
        Just(VariableType::Number),
        Just(VariableType::Boolean),
        Just(VariableType::Date),
    ]
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// One variable per distinct name, in first-occurrence order.
    #[test]
    fn extract_declares_each_name_once((template, expected) in template_strategy()) {
        let vars = extract(&template);
        let names: Vec<String> = vars.iter().map(|v| v.name.clone()).collect();
        prop_assert_eq!(&names, &expected);

        let unique: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(unique.len(), names.len());
    }

    /// Extracting twice yields the same names in the same order.
    #[test]
    fn extract_names_are_stable((template, _) in template_strategy()) {
        let first: Vec<String> = extract(&template).into_iter().map(|v| v.name).collect();
        let second: Vec<String> = extract(&template).into_iter().map(|v| v.name).collect();
        prop_assert_eq!(first, second);
    }

    /// With empty values every placeholder becomes NULL or FALSE.
    #[test]
    fn empty_values_become_null_or_false(
        (template, _) in template_strategy(),
        types in prop::collection::vec(type_strategy(), 6),
    ) {
        let mut vars = extract(&template);
        for (var, ty) in vars.iter_mut().zip(types.iter().cycle()) {
            var.var_type = ty.clone();
        }

        let output = substitute(&template, &vars);
        prop_assert!(!output.contains("{{"));

        let expected_null = vars.iter().any(|v| v.var_type != VariableType::Boolean);
        let expected_false = vars.iter().any(|v| v.var_type == VariableType::Boolean);
        prop_assert_eq!(output.contains("NULL"), expected_null);
        prop_assert_eq!(output.contains("FALSE"), expected_false);
    }

    /// Templates without placeholders are returned unchanged.
    #[test]
    fn plain_text_is_untouched(text in "[^{}]{0,64}") {
        let vars = extract("{{a}}");
        prop_assert_eq!(substitute(&text, &vars), text);
    }

    /// Re-syncing against the same template keeps every id.
    #[test]
    fn sync_keeps_ids_for_same_template((template, _) in template_strategy()) {
        let vars = extract(&template);
        let synced = sync_variables(&template, &vars);
        prop_assert_eq!(synced, vars);
    }
}
