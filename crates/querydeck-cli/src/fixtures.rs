//! Canned executor answers keyed by data source id.
//!
//! A fixtures file maps target ids to executor responses:
//!
//! ```yaml
//! warehouse:
//!   success: true
//!   data:
//!     rows: [{label: north, value: 10}]
//!     columns: [{name: label, type: text}, {name: value, type: int4}]
//! crm:
//!   success: false
//!   error: connection refused
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context};
use querydeck::{async_trait, ExecutorError, ExecutorResponse, QueryExecutor, QueryResult};
use tracing::debug;

/// Answers every query for a target with that target's fixture.
#[derive(Debug, Default)]
pub struct FixtureExecutor {
    responses: HashMap<String, ExecutorResponse>,
}

impl FixtureExecutor {
    pub fn new(responses: HashMap<String, ExecutorResponse>) -> Self {
        Self { responses }
    }

    /// Loads fixtures from a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixtures {}", path.display()))?;

        let responses = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("invalid fixtures in {}", path.display()))?,
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("invalid fixtures in {}", path.display()))?,
            _ => bail!("unsupported fixtures format: {}", path.display()),
        };
        Ok(Self::new(responses))
    }
}

#[async_trait]
impl QueryExecutor for FixtureExecutor {
    async fn execute(&self, target: &str, query: &str) -> Result<QueryResult, ExecutorError> {
        debug!(target_id = target, query, "answering from fixtures");
        match self.responses.get(target) {
            Some(response) => response.clone().into_result(),
            None => Err(ExecutorError::Reported(format!(
                "no fixture for data source '{target}'"
            ))),
        }
    }
}
