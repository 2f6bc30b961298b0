//! # DomainCounter
//!
//! `DomainCounter` counts how many records of a large CSV file carry each
//! e-mail domain and ranks the domains by frequency. It supports:
//!
//! - Memory-mapped input (the file is never copied through a read buffer)
//! - Line-aligned partitioning of the body into one segment per worker
//! - Parallel, lock-free scanning with Rayon, one private table per worker
//! - Allocation-free field extraction and domain normalization on the hot path
//! - Deterministic ranking: count descending, then domain ascending
//!
//! # Limitations
//!
//! Records are split on `\n` and fields on every `,`. Quoted fields and
//! embedded delimiters are not supported; rows that do not yield a usable
//! address are skipped silently and only show up in the run summary.
//!
//! # Output
//!
//! ```text
//! Domain,Count
//! example.com,2
//! domain.org,1
//! ```
//!
//! # Example
//!
//! ```no_run
//! use domain_counter::{ColumnSelector, CounterConfig, DomainCounter};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = Path::new("customers.csv");
//!
//!     // Rank without writing anything
//!     let counter = DomainCounter::new();
//!     let report = counter.count(path)?;
//!     for entry in report.ranked.iter().take(10) {
//!         println!("{} => {}", entry.domain, entry.count);
//!     }
//!
//!     // Use the second column and write to outcomes/customers_output.csv
//!     let config = CounterConfig::default().with_column(ColumnSelector::Index(1));
//!     let summary = DomainCounter::with_config(config).process(path)?;
//!     println!("Wrote {}", summary.output_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod processor;

pub use processor::{
    ColumnSelector, CountReport, CounterConfig, DomainCount, ProcessSummary, ProcessorError,
    Result,
    domain_counter::{DomainCounter, process},
    sink::output_path_for,
};
