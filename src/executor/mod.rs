//! Table execution subsystem
//!
//! Turns (query spec, cancellation token) into a lazy, ordered, batched,
//! cancellable sequence of row batches.
//!
//! # Guarantees
//!
//! - Generation order is fixed per source (ascending ordinal)
//! - Cancellation is polled once per candidate row
//! - A cancelled stream never flushes its partial batch
//! - Finalization runs exactly once on every exit path
//! - Concurrent streams over one source share nothing mutable

mod source;
mod stream;

pub use source::{placeholder_value, OrdinalSource, RowSource, RowView};
pub use stream::{RowStream, StreamState, StreamSummary};
