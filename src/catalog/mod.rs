//! Table catalog subsystem
//!
//! Each instance owns a `TableCatalog` mapping table names to `Table`
//! handles. A table exposes its schema, sort and path-key capabilities,
//! cost estimate, explain output, execution, and mutation calls.

mod catalog;
mod ordinal;
mod table;

pub use catalog::TableCatalog;
pub use ordinal::OrdinalTable;
pub use table::{negotiate_sort_orders, Estimate, Table};
