//! das-server - a Data Access Service server
//!
//! Registers data-source instances, exposes their tables' schemas and
//! capabilities, and streams filtered, projected, limited row batches with
//! cooperative cancellation.

pub mod catalog;
pub mod cli;
pub mod error;
pub mod executor;
pub mod observability;
pub mod query;
pub mod registry;
pub mod schema;
pub mod server;

pub use error::{DasError, DasResult};
