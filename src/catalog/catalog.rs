//! Per-instance table catalog
//!
//! Resolves table names to typed handles. Tables are added by registering
//! them; lookup never falls back to string dispatch.

use std::sync::Arc;

use crate::error::{DasError, DasResult};
use crate::schema::TableDefinition;

use super::table::Table;

/// Named tables owned by one instance, in registration order
#[derive(Default)]
pub struct TableCatalog {
    tables: Vec<Arc<dyn Table>>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table. Fails if the name is already taken.
    pub fn register(&mut self, table: Arc<dyn Table>) -> DasResult<()> {
        if self.tables.iter().any(|t| t.name() == table.name()) {
            return Err(DasError::InvalidArgument(format!(
                "duplicate table name: {}",
                table.name()
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    /// Builder-style `register`
    pub fn with_table(mut self, table: Arc<dyn Table>) -> DasResult<Self> {
        self.register(table)?;
        Ok(self)
    }

    /// Resolves a table by name
    pub fn resolve(&self, name: &str) -> DasResult<Arc<dyn Table>> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| DasError::TableNotFound(name.to_string()))
    }

    /// Schemas of all tables, in registration order
    pub fn definitions(&self) -> Vec<TableDefinition> {
        self.tables.iter().map(|t| t.definition()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
