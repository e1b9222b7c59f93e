//! Placeholder scanning.
//!
//! A placeholder is `{{`, one or more characters other than `}`, then `}}`.
//! Matches are found left to right without overlap. The enclosed token is
//! trimmed to form the variable name; tokens that are blank after trimming are
//! not placeholders. Unterminated tokens never match and stay in the text.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::variable::Variable;

pub(crate) static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("placeholder pattern is valid"));

/// Returns the distinct placeholder names of `template` in first-occurrence order.
pub fn placeholder_names(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for caps in PLACEHOLDER.captures_iter(template) {
        let name = caps.get(1).map_or("", |m| m.as_str()).trim();
        if name.is_empty() {
            continue;
        }
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }

    names
}

/// Declares one [`Variable`] per distinct placeholder name in `template`.
///
/// Each new variable is a `string` with an empty value and a freshly generated
/// id. Repeated names are declared once, at their first occurrence.
///
/// # Example
///
/// ```rust
/// use querydeck_template::extract;
///
/// let vars = extract("{{a}} {{ b }} {{a}} {{unterminated");
/// let names: Vec<_> = vars.iter().map(|v| v.name.as_str()).collect();
/// assert_eq!(names, ["a", "b"]);
/// ```
pub fn extract(template: &str) -> Vec<Variable> {
    placeholder_names(template)
        .into_iter()
        .map(Variable::new)
        .collect()
}

/// Re-extracts `template` against previously declared variables.
///
/// Variables whose name still appears keep their id, value and type; new names
/// are declared fresh; names no longer present are dropped. The result is in
/// first-occurrence order of the new template.
pub fn sync_variables(template: &str, existing: &[Variable]) -> Vec<Variable> {
    let mut by_name: HashMap<&str, &Variable> = HashMap::with_capacity(existing.len());
    for var in existing {
        by_name.entry(var.name.as_str()).or_insert(var);
    }

    placeholder_names(template)
        .into_iter()
        .map(|name| match by_name.get(name.as_str()) {
            Some(prev) => (*prev).clone(),
            None => Variable::new(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariableType;

    fn names(vars: &[Variable]) -> Vec<&str> {
        vars.iter().map(|v| v.name.as_str()).collect()
    }

    #[test]
    fn test_placeholder_names_dedup_trimmed_tokens() {
        let template = String::from("{{ a }} {{b}} {{a}} {{  b}}");
        assert_eq!(placeholder_names(&template), ["a", "b"]);
    }

    #[test]
    fn test_extract_empty_template() {
        assert!(extract("").is_empty());
        assert!(extract("SELECT 1").is_empty());
    }

    #[test]
    fn test_extract_first_occurrence_order() {
        let vars = extract("WHERE b = {{b}} AND a = {{a}} OR b > {{b}}");
        assert_eq!(names(&vars), ["b", "a"]);
    }

    #[test]
    fn test_extract_trims_token() {
        let vars = extract("{{  region }} and {{region}}");
        assert_eq!(names(&vars), ["region"]);
    }

    #[test]
    fn test_extract_defaults() {
        let vars = extract("{{x}}");
        assert_eq!(vars[0].value, "");
        assert_eq!(vars[0].var_type, VariableType::String);
    }

    #[test]
    fn test_unterminated_token_is_ignored() {
        assert!(extract("SELECT {{open").is_empty());
        assert!(extract("SELECT {{open}").is_empty());
        assert_eq!(names(&extract("{{open {{closed}}")), ["open {{closed"]);
    }

    #[test]
    fn test_blank_token_is_ignored() {
        assert!(extract("{{   }}").is_empty());
    }

    #[test]
    fn test_single_braces_are_not_placeholders() {
        assert!(extract("{name} and {{}}").is_empty());
    }

    #[test]
    fn test_sync_preserves_existing_bindings() {
        let mut before = extract("{{a}} {{b}}");
        before[0].value = "1".into();
        before[0].var_type = VariableType::Number;
        let a_id = before[0].id;

        let after = sync_variables("{{c}} {{a}}", &before);
        assert_eq!(names(&after), ["c", "a"]);
        assert_eq!(after[1].id, a_id);
        assert_eq!(after[1].value, "1");
        assert_eq!(after[1].var_type, VariableType::Number);
        assert_eq!(after[0].value, "");
    }
}
