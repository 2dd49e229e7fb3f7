//! Request and response bodies for the facade
//!
//! Every table-scoped request carries the instance id and table name
//! (`das_id`, `table_id`) next to its call-specific fields.

use serde::{Deserialize, Serialize};

use crate::catalog::Estimate;
use crate::query::{PathKey, Qualifier, QuerySpec, SortKey};
use crate::registry::Options;
use crate::schema::{Row, TableDefinition, Value};

// ==================
// Registration
// ==================

/// Kind and options of the instance to build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DasDefinition {
    /// Type discriminator
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub definition: DasDefinition,
    /// Requested instance id; absent or empty means generate one
    #[serde(default)]
    pub id: Option<String>,
}

/// Either `id` or `error` is set, never both
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RegisterResponse {
    pub fn registered(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DasIdRequest {
    pub das_id: String,
}

/// Acknowledgement with no payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {}

// ==================
// Table calls
// ==================

/// Names one table of one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub das_id: String,
    pub table_id: String,
}

impl TableRef {
    pub fn new(das_id: impl Into<String>, table_id: impl Into<String>) -> Self {
        Self {
            das_id: das_id.into(),
            table_id: table_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefinitionsResponse {
    pub definitions: Vec<TableDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrdersRequest {
    #[serde(flatten)]
    pub table: TableRef,
    #[serde(default)]
    pub sort_keys: Vec<SortKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortOrdersResponse {
    pub sort_keys: Vec<SortKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathKeysResponse {
    pub path_keys: Vec<PathKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    #[serde(flatten)]
    pub table: TableRef,
    #[serde(default)]
    pub quals: Vec<Qualifier>,
    #[serde(default)]
    pub columns: Vec<String>,
}

pub type EstimateResponse = Estimate;

/// Explain and execute share this shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(flatten)]
    pub table: TableRef,
    #[serde(default)]
    pub query: QuerySpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainResponse {
    pub stmts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueColumnResponse {
    pub column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkInsertSizeResponse {
    pub size: usize,
}

// ==================
// Mutations
// ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertRequest {
    #[serde(flatten)]
    pub table: TableRef,
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkInsertRequest {
    #[serde(flatten)]
    pub table: TableRef,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(flatten)]
    pub table: TableRef,
    pub row_id: Value,
    pub new_row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(flatten)]
    pub table: TableRef,
    pub row_id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowResponse {
    pub row: Row,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsResponse {
    pub rows: Vec<Row>,
}

// ==================
// Health
// ==================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub description: String,
}
