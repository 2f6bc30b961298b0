use std::path::PathBuf;
use thiserror::Error;

pub mod aggregator;
pub mod domain_counter;
pub mod field;
pub mod rank;
pub mod sink;
pub mod source;
pub mod splitter;

/// Header name looked up when no column is configured
pub const DEFAULT_COLUMN: &str = "email";

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("schema error in {}: {reason}", path.display())]
    Schema { path: PathBuf, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ProcessorError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ProcessorError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn schema(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ProcessorError::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;

/// How the address-bearing column is located in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// Header name, matched trimmed and ASCII case-insensitively
    Named(String),
    /// 0-based position; must exist in the header
    Index(usize),
}

impl Default for ColumnSelector {
    fn default() -> Self {
        ColumnSelector::Named(DEFAULT_COLUMN.to_string())
    }
}

/// Run configuration for [`domain_counter::DomainCounter`]
#[derive(Debug, Clone, Default)]
pub struct CounterConfig {
    pub column: ColumnSelector,
    /// Worker count; `None` means twice the available parallelism
    pub workers: Option<usize>,
}

impl CounterConfig {
    pub fn with_column(mut self, column: ColumnSelector) -> Self {
        self.column = column;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Resolves the worker count, rejecting an explicit zero
    pub fn worker_count(&self) -> Result<usize> {
        match self.workers {
            Some(0) => Err(ProcessorError::InvalidInput(
                "worker count must be at least 1".into(),
            )),
            Some(n) => Ok(n),
            None => Ok(std::thread::available_parallelism()
                .map(|n| n.get() * 2)
                .unwrap_or(2)),
        }
    }
}

/// One row of the ranked result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

impl DomainCount {
    pub fn new(domain: impl Into<String>, count: u64) -> Self {
        DomainCount {
            domain: domain.into(),
            count,
        }
    }
}

/// In-memory result of counting one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountReport {
    pub ranked: Vec<DomainCount>,
    pub rows_scanned: u64,
    pub rows_counted: u64,
    pub rows_skipped: u64,
}

/// Outcome of a run that wrote its result to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub rows_scanned: u64,
    pub rows_counted: u64,
    /// Rows whose address field was missing or not a usable address
    pub rows_skipped: u64,
    pub distinct_domains: usize,
    pub output_path: PathBuf,
}
