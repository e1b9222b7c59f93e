//! Variable declarations bound to template placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identifier of a [`Variable`].
///
/// Generated once when the variable is first declared and carried across
/// template edits; re-extraction never regenerates it (see
/// [`sync_variables`](crate::sync_variables)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(Uuid);

impl VariableId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        VariableId(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for VariableId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for VariableId {
    fn from(uuid: Uuid) -> Self {
        VariableId(uuid)
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a variable's value is formatted as a query literal.
///
/// Type names are matched case-sensitively (`"string"`, `"number"`,
/// `"boolean"`, `"date"`). Any other name is kept as [`VariableType::Other`]
/// and formatted with the quoted-literal fallback rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VariableType {
    /// Quoted text literal.
    #[default]
    String,
    /// Value inserted verbatim.
    Number,
    /// `TRUE` when the value is non-empty, `FALSE` otherwise.
    Boolean,
    /// Quoted date literal.
    Date,
    /// Unrecognized type name, formatted as a quoted literal.
    Other(String),
}

impl VariableType {
    /// Returns the wire name of this type.
    pub fn as_str(&self) -> &str {
        match self {
            VariableType::String => "string",
            VariableType::Number => "number",
            VariableType::Boolean => "boolean",
            VariableType::Date => "date",
            VariableType::Other(name) => name,
        }
    }

    /// Returns `true` for one of the four recognized types.
    pub fn is_known(&self) -> bool {
        !matches!(self, VariableType::Other(_))
    }
}

impl From<&str> for VariableType {
    fn from(name: &str) -> Self {
        match name {
            "string" => VariableType::String,
            "number" => VariableType::Number,
            "boolean" => VariableType::Boolean,
            "date" => VariableType::Date,
            other => VariableType::Other(other.to_string()),
        }
    }
}

impl From<String> for VariableType {
    fn from(name: String) -> Self {
        VariableType::from(name.as_str())
    }
}

impl From<VariableType> for String {
    fn from(ty: VariableType) -> Self {
        ty.as_str().to_string()
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed, caller-editable binding for one template placeholder.
///
/// `name` is unique within the owning template. `value` starts empty and is
/// edited by the caller between extraction and substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    /// Stable identifier.
    #[serde(default)]
    pub id: VariableId,
    /// Placeholder name, without braces or surrounding whitespace.
    pub name: String,
    /// Raw value text.
    #[serde(default)]
    pub value: String,
    /// Literal formatting rule.
    #[serde(rename = "type", default)]
    pub var_type: VariableType,
}

impl Variable {
    /// Declares a new `string` variable with an empty value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: VariableId::new(),
            name: name.into(),
            value: String::new(),
            var_type: VariableType::String,
        }
    }

    /// Sets the value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the type.
    pub fn with_type(mut self, var_type: impl Into<VariableType>) -> Self {
        self.var_type = var_type.into();
        self
    }

    /// Returns `true` if no value has been entered.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}
