use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::processor::{
    field::{extract_field, normalize_domain},
    splitter::{Segment, find_line_end},
};

/// Initial table capacity, sized for tens of thousands of distinct domains
pub const PARTIAL_CAPACITY: usize = 50_000;

pub type DomainCounts = FxHashMap<String, u64>;

/// One worker's counts for its segment
#[derive(Debug, Clone, Default)]
pub struct PartialCounts {
    pub counts: DomainCounts,
    /// Non-blank lines seen
    pub rows: u64,
    /// Lines with an absent field or an unusable address
    pub skipped: u64,
}

impl PartialCounts {
    pub fn with_capacity(capacity: usize) -> Self {
        PartialCounts {
            counts: FxHashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            rows: 0,
            skipped: 0,
        }
    }

    /// Number of rows that contributed a count
    pub fn counted(&self) -> u64 {
        self.rows - self.skipped
    }

    fn record(&mut self, domain: &str) {
        // only allocate the key the first time this worker sees a domain
        match self.counts.get_mut(domain) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(domain.to_owned(), 1);
            }
        }
    }
}

/// Counts domains in every record of `segment`
///
/// Rows without a usable address are tallied in [`PartialCounts::skipped`]
/// and otherwise ignored.
pub fn aggregate_segment(buf: &[u8], segment: Segment, column: usize) -> PartialCounts {
    let chunk = segment.slice(buf);
    let mut partial = PartialCounts::with_capacity(PARTIAL_CAPACITY);
    let mut scratch = Vec::with_capacity(64);

    let mut line_start = 0;
    while line_start < chunk.len() {
        let line_end = find_line_end(chunk, line_start).unwrap_or(chunk.len());
        let line = &chunk[line_start..line_end];
        line_start = line_end + 1;

        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        partial.rows += 1;

        let domain = match extract_field(line, column) {
            Some(raw) => normalize_domain(raw, &mut scratch),
            None => None,
        };
        match domain {
            Some(domain) => partial.record(domain),
            None => partial.skipped += 1,
        }
    }

    partial
}
