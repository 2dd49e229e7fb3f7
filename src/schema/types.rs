//! Column and table definitions

use serde::{Deserialize, Serialize};

/// Supported column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    /// Boolean
    Bool { nullable: bool },
    /// 64-bit signed integer
    Int { nullable: bool },
    /// 64-bit floating point
    Double { nullable: bool },
    /// UTF-8 string
    String { nullable: bool },
}

impl ColumnType {
    /// Returns the type name for explain output
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Bool { .. } => "bool",
            ColumnType::Int { .. } => "int",
            ColumnType::Double { .. } => "double",
            ColumnType::String { .. } => "string",
        }
    }

    /// Returns whether the column admits nulls
    pub fn is_nullable(&self) -> bool {
        match self {
            ColumnType::Bool { nullable }
            | ColumnType::Int { nullable }
            | ColumnType::Double { nullable }
            | ColumnType::String { nullable } => *nullable,
        }
    }

    /// Approximate encoded width in bytes, used for size estimates
    pub fn estimated_width(&self) -> u64 {
        match self {
            ColumnType::Bool { .. } => 1,
            ColumnType::Int { .. } | ColumnType::Double { .. } => 8,
            ColumnType::String { .. } => 16,
        }
    }
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDefinition {
    /// Create a column definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        column_type: ColumnType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            column_type,
        }
    }
}

/// Schema of a table, as reported by GetTableDefinitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Table name, unique within its instance
    pub name: String,
    pub description: String,
    /// Columns in their stable declared order
    pub columns: Vec<ColumnDefinition>,
    /// Relative cost of starting a scan
    pub startup_cost: u64,
}

impl TableDefinition {
    /// Returns the column definition with the given name
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the column names in declared order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}
