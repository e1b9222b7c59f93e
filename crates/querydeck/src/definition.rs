//! Saved query definitions.
//!
//! A [`QueryDefinition`] is what a host persists for one dashboard block: the
//! template, its variable bindings, the data source and the view to render
//! with. Definitions load from YAML or JSON:
//!
//! ```yaml
//! id: orders-by-region
//! name: Orders by region
//! template: |
//!   SELECT region AS label, count(*) AS value
//!   FROM orders WHERE created_at >= {{since}}
//!   GROUP BY region
//! target: warehouse
//! view: bar
//! variables:
//!   - name: since
//!     type: date
//!     value: 2024-01-01
//! ```

use std::path::Path;

use querydeck_pipeline::ExecutionRequest;
use querydeck_template::{self as template, Variable};
use querydeck_view::DEFAULT_FALLBACK;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DefinitionError;

fn default_view() -> String {
    DEFAULT_FALLBACK.to_string()
}

/// One saved query and its view binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Query text with `{{name}}` placeholders.
    #[serde(alias = "query", alias = "sql")]
    pub template: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    /// View type id.
    #[serde(default = "default_view", alias = "viewMode")]
    pub view: String,
    /// Data source id.
    #[serde(alias = "datasourceId")]
    pub target: String,
    /// Per-view options passed to the processor's transform.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "config")]
    pub view_config: Option<Value>,
}

impl QueryDefinition {
    pub fn new(
        id: impl Into<String>,
        template: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        let template = template.into();
        Self {
            id: id.into(),
            name: String::new(),
            variables: template::extract(&template),
            template,
            view: default_view(),
            target: target.into(),
            view_config: None,
        }
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = view.into();
        self
    }

    /// Parses a YAML definition.
    pub fn from_yaml(yaml: &str) -> Result<Self, DefinitionError> {
        serde_yaml::from_str(yaml).map_err(|e| DefinitionError::Yaml {
            path: None,
            message: e.to_string(),
        })
    }

    /// Parses a JSON definition.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::Json {
            path: None,
            message: e.to_string(),
        })
    }

    /// Loads a definition, choosing the format by extension
    /// (`.yaml`/`.yml` or `.json`).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = match format {
            Format::Yaml => Self::from_yaml(&content),
            Format::Json => Self::from_json(&content),
        };
        parsed.map_err(|e| e.with_path(path))
    }

    /// Checks that the definition can be turned into a runnable request.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.template.trim().is_empty() {
            return Err(self.missing("template"));
        }
        if self.target.is_empty() {
            return Err(self.missing("target"));
        }
        Ok(())
    }

    fn missing(&self, field: &'static str) -> DefinitionError {
        DefinitionError::Missing {
            id: self.id.clone(),
            field,
        }
    }

    /// Re-declares variables after a template edit.
    ///
    /// Variables whose name is still a placeholder keep their id, value and
    /// type; new placeholders get fresh variables; dropped names disappear.
    pub fn sync_variables(&mut self) {
        self.variables = template::sync_variables(&self.template, &self.variables);
    }

    /// Sets the value of the variable called `name`. Returns `false` if the
    /// template declares no such variable.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.variables.iter_mut().find(|v| v.name == name) {
            Some(variable) => {
                variable.value = value.into();
                true
            }
            None => false,
        }
    }

    /// The request that runs this definition with its current bindings.
    pub fn to_request(&self) -> ExecutionRequest {
        ExecutionRequest::new(self.template.clone(), self.target.clone())
            .with_variables(self.variables.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, DefinitionError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(DefinitionError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

impl DefinitionError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            DefinitionError::Yaml { message, .. } => DefinitionError::Yaml {
                path: Some(path.to_path_buf()),
                message,
            },
            DefinitionError::Json { message, .. } => DefinitionError::Json {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}
