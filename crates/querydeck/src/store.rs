//! Definition persistence seam.
//!
//! The pipeline only ever reads definitions. Hosts that save them plug a
//! backend in behind [`DefinitionStore`]; [`MemoryDefinitionStore`] is the
//! in-process implementation used by tests and the CLI.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::definition::QueryDefinition;
use crate::error::DefinitionError;

/// CRUD access to saved query definitions.
pub trait DefinitionStore: Send + Sync {
    /// Retrieves a definition by id, returning `None` if absent.
    fn get(&self, id: &str) -> Result<Option<QueryDefinition>, DefinitionError>;

    /// Retrieves a definition by id, failing with
    /// [`DefinitionError::NotFound`] if absent.
    fn resolve(&self, id: &str) -> Result<QueryDefinition, DefinitionError> {
        self.get(id)?
            .ok_or_else(|| DefinitionError::NotFound(id.to_string()))
    }

    /// All definitions.
    fn list(&self) -> Result<Vec<QueryDefinition>, DefinitionError>;

    /// Inserts or replaces the definition with the same id.
    fn save(&self, definition: QueryDefinition) -> Result<(), DefinitionError>;

    /// Removes a definition.
    fn delete(&self, id: &str) -> Result<(), DefinitionError>;
}

/// A [`DefinitionStore`] backed by an in-memory map, listed in id order.
#[derive(Debug, Default)]
pub struct MemoryDefinitionStore {
    definitions: RwLock<BTreeMap<String, QueryDefinition>>,
}

impl MemoryDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(definitions: impl IntoIterator<Item = QueryDefinition>) -> Self {
        Self {
            definitions: RwLock::new(
                definitions
                    .into_iter()
                    .map(|d| (d.id.clone(), d))
                    .collect(),
            ),
        }
    }
}

impl DefinitionStore for MemoryDefinitionStore {
    fn get(&self, id: &str) -> Result<Option<QueryDefinition>, DefinitionError> {
        let definitions = self.definitions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(definitions.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<QueryDefinition>, DefinitionError> {
        let definitions = self.definitions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(definitions.values().cloned().collect())
    }

    fn save(&self, definition: QueryDefinition) -> Result<(), DefinitionError> {
        definition.validate()?;
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(definition.id.clone(), definition);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), DefinitionError> {
        self.definitions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DefinitionError::NotFound(id.to_string()))
    }
}
