//! Registered DAS instances

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::{Table, TableCatalog};
use crate::error::DasResult;
use crate::observability::{Event, Logger};
use crate::schema::TableDefinition;

/// Options supplied at registration, opaque to the core
pub type Options = BTreeMap<String, String>;

/// An active data-source instance and the tables it owns
pub struct Instance {
    id: String,
    kind: String,
    options: Options,
    catalog: TableCatalog,
    closed: AtomicBool,
}

impl Instance {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        options: Options,
        catalog: TableCatalog,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            options,
            catalog,
            closed: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Type discriminator this instance was built for
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    /// Resolves one of this instance's tables
    pub fn table(&self, name: &str) -> DasResult<Arc<dyn Table>> {
        self.catalog.resolve(name)
    }

    pub fn definitions(&self) -> Vec<TableDefinition> {
        self.catalog.definitions()
    }

    /// Releases the instance's resources.
    ///
    /// Returns true for the call that actually closed it; later calls are
    /// no-ops. Streams already running keep their own table handles.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        Logger::info(
            Event::InstanceClosed.as_str(),
            &[("das_id", self.id.as_str()), ("kind", self.kind.as_str())],
        );
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("tables", &self.catalog.names())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Renders options as `key=value` pairs for log fields
pub(crate) fn render_options(options: &Options) -> String {
    options
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}
