//! Query templating for querydeck.
//!
//! A query template is plain query text with `{{name}}` placeholders. This crate
//! provides the two operations every query editor and runner needs:
//!
//! - **Extraction**: scan a template and declare one [`Variable`] per distinct
//!   placeholder name, in first-occurrence order.
//! - **Substitution**: rewrite a template into final query text, formatting each
//!   variable's value as a literal according to its [`VariableType`].
//!
//! # Quick Start
//!
//! ```rust
//! use querydeck_template::{extract, substitute, VariableType};
//!
//! let template = "SELECT * FROM t WHERE id = {{id}} AND active = {{flag}}";
//!
//! let mut variables = extract(template);
//! assert_eq!(variables.len(), 2);
//!
//! variables[0].var_type = VariableType::Number;
//! variables[0].value = "5".into();
//! variables[1].var_type = VariableType::Boolean;
//!
//! assert_eq!(
//!     substitute(template, &variables),
//!     "SELECT * FROM t WHERE id = 5 AND active = FALSE",
//! );
//! ```
//!
//! # Literal Formatting
//!
//! | Type | Non-empty value | Empty value |
//! |------|-----------------|-------------|
//! | `string` | `'value'` | `NULL` |
//! | `number` | `value` (verbatim) | `NULL` |
//! | `boolean` | `TRUE` | `FALSE` |
//! | `date` | `'value'` | `NULL` |
//! | anything else | `'value'` | `NULL` |
//!
//! Quoted literals double any embedded single quote.
//!
//! # Unresolved Placeholders
//!
//! Substitution never fails. A placeholder whose name has no declared variable
//! is left in the output verbatim; use [`unresolved`] to find them.

mod extract;
mod substitute;
mod variable;

pub use extract::{extract, placeholder_names, sync_variables};
pub use substitute::{format_literal, substitute, unresolved};
pub use variable::{Variable, VariableId, VariableType};
