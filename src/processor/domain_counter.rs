use log::{debug, info};
use rayon::{
    ThreadPoolBuilder,
    iter::{IntoParallelRefIterator, ParallelIterator},
};
use std::path::Path;

use crate::processor::{
    CountReport, CounterConfig, ProcessSummary, Result,
    aggregator::{PartialCounts, aggregate_segment},
    rank::{merge, rank},
    sink::{output_path_for, write_results},
    source::MappedSource,
    splitter::{locate_header, partition},
};

/// Counts e-mail domains in a CSV file
///
/// The file is memory mapped once, its body cut into line-aligned segments
/// and each segment scanned by its own worker. Partial tables are merged on
/// the calling thread and ranked by count, then domain.
///
/// # Examples
///
/// ```no_run
/// # use domain_counter::{DomainCounter, CounterConfig};
/// let counter = DomainCounter::with_config(CounterConfig::default().with_workers(4));
/// let summary = counter.process("customers.csv".as_ref())?;
/// println!("{} domains -> {}", summary.distinct_domains, summary.output_path.display());
/// # Ok::<(), domain_counter::ProcessorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DomainCounter {
    config: CounterConfig,
}

impl DomainCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CounterConfig) -> Self {
        DomainCounter { config }
    }

    /// Counts and ranks the domains of `path` without writing anything
    ///
    /// # Errors
    /// - [`crate::ProcessorError::Io`] if the file cannot be opened or mapped
    /// - [`crate::ProcessorError::Schema`] if the header or address column is missing
    /// - [`crate::ProcessorError::InvalidInput`] for a zero worker count
    pub fn count(&self, path: &Path) -> Result<CountReport> {
        let workers = self.config.worker_count()?;
        let source = MappedSource::open(path)?;
        let buf = source.bytes();

        let header = locate_header(buf, &self.config.column, path)?;
        let segments = partition(buf, header.body_start, workers);
        debug!(
            "{}: {} bytes, column {}, {} segments over {} workers",
            source.path().display(),
            source.len(),
            header.column,
            segments.len(),
            workers
        );

        let pool = ThreadPoolBuilder::new().num_threads(workers).build()?;
        let partials: Vec<PartialCounts> = pool.install(|| {
            segments
                .par_iter()
                .map(|&segment| aggregate_segment(buf, segment, header.column))
                .collect()
        });
        drop(source);

        let mut rows_scanned = 0;
        let mut rows_skipped = 0;
        let merged = merge(partials.into_iter().map(|partial| {
            rows_scanned += partial.rows;
            rows_skipped += partial.skipped;
            partial.counts
        }));

        let rows_counted = rows_scanned - rows_skipped;
        debug_assert_eq!(merged.values().sum::<u64>(), rows_counted);

        Ok(CountReport {
            ranked: rank(merged),
            rows_scanned,
            rows_counted,
            rows_skipped,
        })
    }

    /// Counts `path` and writes the ranked result next to it
    ///
    /// See [`output_path_for`] for where the file lands.
    pub fn process(&self, path: &Path) -> Result<ProcessSummary> {
        self.process_to(path, &output_path_for(path))
    }

    /// Counts `path` and writes the ranked result to `output`
    pub fn process_to(&self, path: &Path, output: &Path) -> Result<ProcessSummary> {
        let report = self.count(path)?;
        write_results(output, &report.ranked)?;

        info!("Results written to: {}", output.display());
        info!(
            "{} rows scanned, {} counted, {} skipped, {} distinct domains",
            report.rows_scanned,
            report.rows_counted,
            report.rows_skipped,
            report.ranked.len()
        );

        Ok(ProcessSummary {
            rows_scanned: report.rows_scanned,
            rows_counted: report.rows_counted,
            rows_skipped: report.rows_skipped,
            distinct_domains: report.ranked.len(),
            output_path: output.to_path_buf(),
        })
    }
}

/// Counts `path` with the default configuration and writes the result to
/// [`output_path_for`]`(path)`
pub fn process(path: &Path) -> Result<ProcessSummary> {
    DomainCounter::new().process(path)
}
