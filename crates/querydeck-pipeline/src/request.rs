use querydeck_template::{substitute, unresolved, Variable};
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// One query to run: template, variable bindings and target data source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionRequest {
    pub template: String,
    #[serde(default)]
    pub variables: Vec<Variable>,
    pub target: String,
}

impl ExecutionRequest {
    /// A request for `template` against the data source `target`, with no variables.
    pub fn new(template: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: Vec::new(),
            target: target.into(),
        }
    }

    pub fn with_variables(mut self, variables: Vec<Variable>) -> Self {
        self.variables = variables;
        self
    }

    /// Checks that the request is worth submitting.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.template.trim().is_empty() {
            return Err(RequestError::MissingQuery);
        }
        if self.target.is_empty() {
            return Err(RequestError::MissingTarget);
        }
        Ok(())
    }

    /// The template with every bound placeholder substituted.
    pub fn final_query(&self) -> String {
        substitute(&self.template, &self.variables)
    }

    /// Placeholder names left unbound by this request's variables.
    pub fn unresolved(&self) -> Vec<String> {
        unresolved(&self.template, &self.variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert_eq!(
            ExecutionRequest::new("  \n", "db").validate(),
            Err(RequestError::MissingQuery)
        );
        assert_eq!(
            ExecutionRequest::new("SELECT 1", "").validate(),
            Err(RequestError::MissingTarget)
        );
        assert!(ExecutionRequest::new("SELECT 1", "db").validate().is_ok());
    }

    #[test]
    fn test_final_query() {
        let request = ExecutionRequest::new("SELECT * FROM t WHERE name = {{name}} LIMIT {{n}}", "db")
            .with_variables(vec![Variable::new("name").with_value("o'brien")]);

        assert_eq!(
            request.final_query(),
            "SELECT * FROM t WHERE name = 'o''brien' LIMIT {{n}}"
        );
        assert_eq!(request.unresolved(), ["n"]);
    }
}
