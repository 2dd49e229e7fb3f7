//! Streaming table execution
//!
//! `RowStream` turns a query spec and a cancellation token into a lazy,
//! single-pass sequence of row batches.
//!
//! Per candidate row, in generation order:
//! 1. Stop if the token is cancelled (pending rows are dropped)
//! 2. Stop if the ordinal exceeds the effective cap (pending rows are flushed)
//! 3. Skip the row if a qualifier rejects it
//! 4. Project the row and add it to the pending batch
//! 5. Emit the pending batch once it reaches the batch size
//!
//! Finalization runs exactly once: on the transition out of streaming, or
//! when the stream is closed or dropped before that.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::observability::{Event, Logger};
use crate::query::{QualifierEvaluator, QuerySpec, Qualifier};
use crate::schema::{Column, Row, RowBatch};

use super::source::{placeholder_value, RowSource, RowView};

/// Execution state of a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Created, not yet polled
    Init,
    /// Generating rows
    Streaming,
    /// Cap reached or source exhausted
    Completed,
    /// Token cancelled, or closed by the consumer before completion
    Cancelled,
}

impl StreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamState::Init => "init",
            StreamState::Streaming => "streaming",
            StreamState::Completed => "completed",
            StreamState::Cancelled => "cancelled",
        }
    }

    /// Returns true once no further batches can be produced
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamState::Completed | StreamState::Cancelled)
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a finalized stream delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub table: String,
    /// Terminal state; `Cancelled` also covers consumer-side close
    pub outcome: StreamState,
    /// True when the consumer closed or dropped the stream early
    pub closed_by_consumer: bool,
    pub rows_emitted: u64,
    pub batches_emitted: u64,
}

type Finalizer = Box<dyn FnOnce(&StreamSummary) + Send>;

/// Lazy, forward-only sequence of row batches for one execution
pub struct RowStream {
    table: String,
    source: Arc<dyn RowSource>,
    quals: Vec<Qualifier>,
    columns: Vec<String>,
    /// min(limit, natural bound); `None` when both are absent
    cap: Option<u64>,
    batch_size: usize,
    cancel: CancellationToken,
    next_ordinal: u64,
    pending: Vec<Row>,
    state: StreamState,
    closed_by_consumer: bool,
    rows_emitted: u64,
    batches_emitted: u64,
    finalizers: Vec<Finalizer>,
    finalized: bool,
}

impl RowStream {
    /// Creates a stream over `source`. Nothing is generated until polled.
    pub fn new(
        table: impl Into<String>,
        source: Arc<dyn RowSource>,
        query: &QuerySpec,
        batch_size: usize,
        cancel: CancellationToken,
    ) -> Self {
        let columns = if query.columns.is_empty() {
            source.default_columns()
        } else {
            query.columns.clone()
        };

        let cap = match (query.limit, source.natural_bound()) {
            (Some(limit), Some(bound)) => Some(limit.min(bound)),
            (Some(limit), None) => Some(limit),
            (None, bound) => bound,
        };

        let batch_size = batch_size.max(1);

        Self {
            table: table.into(),
            source,
            quals: query.quals.clone(),
            columns,
            cap,
            batch_size,
            cancel,
            next_ordinal: 1,
            pending: Vec::with_capacity(batch_size),
            state: StreamState::Init,
            closed_by_consumer: false,
            rows_emitted: 0,
            batches_emitted: 0,
            finalizers: Vec::new(),
            finalized: false,
        }
    }

    /// Registers a hook run once at finalization, after logging
    pub fn on_finalize(mut self, hook: impl FnOnce(&StreamSummary) + Send + 'static) -> Self {
        self.finalizers.push(Box::new(hook));
        self
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn rows_emitted(&self) -> u64 {
        self.rows_emitted
    }

    /// Forcibly ends the stream, discarding pending rows, and finalizes it.
    ///
    /// No-op on the outcome if the stream already reached a terminal state.
    pub fn close(mut self) {
        self.abandon();
    }

    fn abandon(&mut self) {
        if !self.state.is_terminal() {
            self.pending.clear();
            self.closed_by_consumer = true;
            self.state = StreamState::Cancelled;
        }
        self.finalize();
    }

    fn project(&self, ordinal: u64) -> Row {
        let columns = self
            .columns
            .iter()
            .map(|name| {
                let data = self
                    .source
                    .value_at(ordinal, name)
                    .unwrap_or_else(|| placeholder_value(name, ordinal));
                Column::new(name.clone(), data)
            })
            .collect();
        Row::new(columns)
    }

    fn take_batch(&mut self) -> RowBatch {
        let rows = std::mem::replace(&mut self.pending, Vec::with_capacity(self.batch_size));
        self.rows_emitted += rows.len() as u64;
        self.batches_emitted += 1;
        RowBatch::new(rows)
    }

    fn finish(&mut self, state: StreamState) {
        self.state = state;
        self.finalize();
    }

    fn finalize(&mut self) {
        if self.finalized {
            return;
        }
        self.finalized = true;

        let summary = StreamSummary {
            table: self.table.clone(),
            outcome: self.state,
            closed_by_consumer: self.closed_by_consumer,
            rows_emitted: self.rows_emitted,
            batches_emitted: self.batches_emitted,
        };

        let rows = summary.rows_emitted.to_string();
        let batches = summary.batches_emitted.to_string();
        let fields = [
            ("table", summary.table.as_str()),
            ("outcome", summary.outcome.as_str()),
            ("closed_by_consumer", if summary.closed_by_consumer { "true" } else { "false" }),
            ("rows", rows.as_str()),
            ("batches", batches.as_str()),
        ];
        match summary.outcome {
            StreamState::Completed => Logger::info(Event::StreamClosed.as_str(), &fields),
            _ => Logger::warn(Event::StreamClosed.as_str(), &fields),
        }

        for hook in self.finalizers.drain(..) {
            hook(&summary);
        }
    }
}

impl Iterator for RowStream {
    type Item = RowBatch;

    fn next(&mut self) -> Option<RowBatch> {
        match self.state {
            StreamState::Init => self.state = StreamState::Streaming,
            StreamState::Streaming => {}
            StreamState::Completed | StreamState::Cancelled => return None,
        }

        loop {
            if self.cancel.is_cancelled() {
                // Cancellation wins over flushing a partial batch
                self.pending.clear();
                self.finish(StreamState::Cancelled);
                return None;
            }

            let ordinal = self.next_ordinal;
            if self.cap.is_some_and(|cap| ordinal > cap) {
                let last = if self.pending.is_empty() {
                    None
                } else {
                    Some(self.take_batch())
                };
                self.finish(StreamState::Completed);
                return last;
            }
            self.next_ordinal += 1;

            let view = RowView::new(self.source.as_ref(), ordinal);
            if !QualifierEvaluator::matches(&view, &self.quals) {
                continue;
            }

            let row = self.project(ordinal);
            self.pending.push(row);

            if self.pending.len() >= self.batch_size {
                return Some(self.take_batch());
            }
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        self.abandon();
    }
}

impl fmt::Debug for RowStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowStream")
            .field("table", &self.table)
            .field("state", &self.state)
            .field("next_ordinal", &self.next_ordinal)
            .field("rows_emitted", &self.rows_emitted)
            .finish()
    }
}
