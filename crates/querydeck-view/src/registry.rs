//! Processor registry keyed by view type id.
//!
//! A [`ProcessorRegistry`] is assembled once at startup and is read-only
//! afterwards, so it can be shared behind an `Arc` and looked up from any
//! number of concurrent pipelines without locking.
//!
//! # Lookup Rules
//!
//! - [`ProcessorRegistry::get`] fails with [`ViewError::ProcessorNotFound`] for
//!   unknown ids.
//! - [`ProcessorRegistry::get_or_fallback`] never fails: unknown ids resolve to
//!   the fallback view (the tabular view unless configured otherwise).
//!
//! # Example
//!
//! ```rust
//! use querydeck_view::{Processor, ProcessorRegistry, ViewDefinition, Validation};
//!
//! let registry = ProcessorRegistry::builder()
//!     .builtins()
//!     .register(
//!         ViewDefinition::new("sparkline", "Sparkline").category("compact"),
//!         Processor::new().validate(|_| Validation::ok()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.contains("sparkline"));
//! assert!(registry.get("radar").is_err());
//! assert_eq!(registry.get_or_fallback("radar").0.id, "table");
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::builtin;
use crate::error::{RegistryError, Result, ViewError};
use crate::processor::Processor;

/// The view id used as fallback when none is configured.
pub const DEFAULT_FALLBACK: &str = "table";

/// Descriptive metadata for a registered view type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewDefinition {
    /// Stable view type id, such as `"table"` or `"pie"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping for pickers.
    #[serde(default)]
    pub category: String,
    /// What the view shows and what shape of result it expects.
    #[serde(default)]
    pub description: String,
}

impl ViewDefinition {
    /// Creates a definition in the `basic` category.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: "basic".to_string(),
            description: String::new(),
        }
    }

    /// Sets the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[derive(Debug, Clone)]
struct Entry {
    definition: ViewDefinition,
    processor: Processor,
}

/// Immutable mapping from view type id to processor.
#[derive(Debug, Clone)]
pub struct ProcessorRegistry {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    fallback: usize,
}

impl ProcessorRegistry {
    /// Starts building a registry.
    pub fn builder() -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::new()
    }

    /// A registry holding every built-in view, with `table` as fallback.
    pub fn with_builtins() -> Self {
        let entries: Vec<Entry> = builtin::all()
            .into_iter()
            .map(|(definition, processor)| Entry {
                definition,
                processor,
            })
            .collect();
        let index: HashMap<String, usize> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.definition.id.clone(), i))
            .collect();
        let fallback = index.get(DEFAULT_FALLBACK).copied().unwrap_or(0);

        Self {
            entries,
            index,
            fallback,
        }
    }

    /// Looks up the processor for `view_id`.
    pub fn get(&self, view_id: &str) -> Result<&Processor> {
        self.index
            .get(view_id)
            .map(|&i| &self.entries[i].processor)
            .ok_or_else(|| ViewError::ProcessorNotFound(view_id.to_string()))
    }

    /// Looks up `view_id`, resolving unknown ids to the fallback view.
    pub fn get_or_fallback(&self, view_id: &str) -> (&ViewDefinition, &Processor) {
        let i = self.index.get(view_id).copied().unwrap_or(self.fallback);
        let entry = &self.entries[i];
        (&entry.definition, &entry.processor)
    }

    /// Returns the definition registered for `view_id`.
    pub fn definition(&self, view_id: &str) -> Option<&ViewDefinition> {
        self.index.get(view_id).map(|&i| &self.entries[i].definition)
    }

    /// Returns `true` if `view_id` is registered.
    pub fn contains(&self, view_id: &str) -> bool {
        self.index.contains_key(view_id)
    }

    /// The fallback view id.
    pub fn fallback_id(&self) -> &str {
        &self.entries[self.fallback].definition.id
    }

    /// All definitions, in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &ViewDefinition> {
        self.entries.iter().map(|e| &e.definition)
    }

    /// Number of registered views.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a built registry holds at least its fallback view.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Builder for [`ProcessorRegistry`].
///
/// Each view id may be registered once; [`build`](Self::build) reports the
/// first duplicate.
#[derive(Debug, Default)]
pub struct ProcessorRegistryBuilder {
    entries: Vec<Entry>,
    fallback: Option<String>,
}

impl ProcessorRegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor under `definition.id`.
    pub fn register(mut self, definition: ViewDefinition, processor: Processor) -> Self {
        self.entries.push(Entry {
            definition,
            processor,
        });
        self
    }

    /// Registers every built-in view.
    pub fn builtins(mut self) -> Self {
        for (definition, processor) in builtin::all() {
            self = self.register(definition, processor);
        }
        self
    }

    /// Sets the fallback view id (defaults to [`DEFAULT_FALLBACK`]).
    pub fn fallback(mut self, view_id: impl Into<String>) -> Self {
        self.fallback = Some(view_id.into());
        self
    }

    /// Freezes the registry.
    pub fn build(self) -> std::result::Result<ProcessorRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            if index.insert(entry.definition.id.clone(), i).is_some() {
                return Err(RegistryError::DuplicateProcessor(
                    entry.definition.id.clone(),
                ));
            }
        }

        let fallback_id = self
            .fallback
            .unwrap_or_else(|| DEFAULT_FALLBACK.to_string());
        let fallback = *index
            .get(&fallback_id)
            .ok_or(RegistryError::UnknownFallback(fallback_id))?;

        Ok(ProcessorRegistry {
            entries: self.entries,
            index,
            fallback,
        })
    }
}
