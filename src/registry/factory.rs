//! Instance construction per type discriminator

use std::sync::Arc;

use crate::catalog::{OrdinalTable, TableCatalog};
use crate::error::{DasError, DasResult};
use crate::observability::{Event, Logger};

use super::instance::{render_options, Instance, Options};

/// Builds instances for one type discriminator
pub trait InstanceFactory: Send + Sync {
    /// Type discriminator this factory handles
    fn kind(&self) -> &str;

    /// Builds an instance. Errors are reported in-band to the caller.
    fn create(&self, id: &str, options: &Options) -> DasResult<Instance>;
}

/// Type discriminator of the built-in demo kind
pub const MOCK_KIND: &str = "mock";

const DEFAULT_SMALL_ROWS: u64 = 10;
const DEFAULT_LARGE_ROWS: u64 = 100_000_000;

/// Builds instances exposing `small_table` and `large_table`.
///
/// Options (all optional, positive integers):
/// - `small_table_rows` (default 10)
/// - `large_table_rows` (default 100,000,000)
/// - `batch_size` (default from server config)
#[derive(Debug, Clone)]
pub struct MockFactory {
    default_batch_size: usize,
}

impl MockFactory {
    pub fn new(default_batch_size: usize) -> Self {
        Self {
            default_batch_size: default_batch_size.max(1),
        }
    }

    fn parse_option(options: &Options, key: &str, default: u64) -> DasResult<u64> {
        match options.get(key) {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(v) if v > 0 => Ok(v),
                _ => Err(DasError::Construction(format!(
                    "invalid value for option '{}': '{}' (expected a positive integer)",
                    key, raw
                ))),
            },
        }
    }
}

impl Default for MockFactory {
    fn default() -> Self {
        Self::new(5)
    }
}

impl InstanceFactory for MockFactory {
    fn kind(&self) -> &str {
        MOCK_KIND
    }

    fn create(&self, id: &str, options: &Options) -> DasResult<Instance> {
        let small_rows = Self::parse_option(options, "small_table_rows", DEFAULT_SMALL_ROWS)?;
        let large_rows = Self::parse_option(options, "large_table_rows", DEFAULT_LARGE_ROWS)?;
        let batch_size =
            Self::parse_option(options, "batch_size", self.default_batch_size as u64)? as usize;

        let catalog = TableCatalog::new()
            .with_table(Arc::new(OrdinalTable::new("small_table", small_rows, batch_size)))?
            .with_table(Arc::new(OrdinalTable::new("large_table", large_rows, batch_size)))?;

        let rendered = render_options(options);
        Logger::info(
            Event::InstanceCreated.as_str(),
            &[("das_id", id), ("kind", MOCK_KIND), ("options", rendered.as_str())],
        );

        Ok(Instance::new(id, MOCK_KIND, options.clone(), catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let instance = MockFactory::default().create("x", &Options::new()).unwrap();
        assert_eq!(instance.catalog().names(), vec!["small_table", "large_table"]);
        assert_eq!(instance.kind(), MOCK_KIND);

        let defs = instance.definitions();
        assert_eq!(defs[0].description, "A table with 10 rows.");
        assert_eq!(defs[1].description, "A table with 100000000 rows.");
    }

    #[test]
    fn test_options_override_rows() {
        let mut options = Options::new();
        options.insert("small_table_rows".into(), "3".into());
        let instance = MockFactory::default().create("x", &options).unwrap();
        assert_eq!(instance.definitions()[0].description, "A table with 3 rows.");
        assert_eq!(instance.options().get("small_table_rows").unwrap(), "3");
    }

    #[test]
    fn test_bad_option_fails_construction() {
        let mut options = Options::new();
        options.insert("batch_size".into(), "many".into());
        let err = MockFactory::default().create("x", &options).unwrap_err();
        assert!(matches!(err, DasError::Construction(_)));
        assert!(err.to_string().contains("batch_size"));

        let mut options = Options::new();
        options.insert("large_table_rows".into(), "0".into());
        assert!(MockFactory::default().create("x", &options).is_err());
    }
}
