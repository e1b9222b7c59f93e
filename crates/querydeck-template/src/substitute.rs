//! Typed literal substitution.

use std::collections::HashMap;

use regex::Captures;

use crate::extract::{placeholder_names, PLACEHOLDER};
use crate::variable::{Variable, VariableType};

const NULL: &str = "NULL";

/// Formats a variable's value as a query literal according to its type.
///
/// ```rust
/// use querydeck_template::{format_literal, Variable};
///
/// assert_eq!(format_literal(&Variable::new("s").with_value("O'Brien")), "'O''Brien'");
/// assert_eq!(format_literal(&Variable::new("n").with_type("number")), "NULL");
/// assert_eq!(format_literal(&Variable::new("b").with_type("boolean").with_value("yes")), "TRUE");
/// ```
pub fn format_literal(variable: &Variable) -> String {
    let value = variable.value.as_str();

    match &variable.var_type {
        VariableType::Boolean => {
            if value.is_empty() {
                "FALSE".to_string()
            } else {
                "TRUE".to_string()
            }
        }
        _ if value.is_empty() => NULL.to_string(),
        VariableType::Number => value.to_string(),
        VariableType::String | VariableType::Date | VariableType::Other(_) => quote(value),
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Rewrites `template` into final query text.
///
/// Every placeholder whose name matches a declared variable is replaced by that
/// variable's [`format_literal`]. The template is scanned exactly once, so
/// placeholder-shaped text inside a substituted value is never expanded again.
/// Placeholders without a matching variable are left verbatim. If two
/// variables share a name, the first one wins.
///
/// An empty template yields an empty string.
pub fn substitute(template: &str, variables: &[Variable]) -> String {
    if template.is_empty() {
        return String::new();
    }

    let mut by_name: HashMap<&str, &Variable> = HashMap::with_capacity(variables.len());
    for var in variables {
        by_name.entry(var.name.as_str()).or_insert(var);
    }

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            match by_name.get(caps[1].trim()) {
                Some(var) => format_literal(var),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Lists placeholder names in `template` that no variable declares.
///
/// These are the placeholders [`substitute`] passes through unchanged.
pub fn unresolved(template: &str, variables: &[Variable]) -> Vec<String> {
    placeholder_names(template)
        .into_iter()
        .filter(|name| !variables.iter().any(|v| &v.name == name))
        .collect()
}
