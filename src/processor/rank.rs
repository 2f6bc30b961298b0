use std::cmp::Reverse;

use crate::processor::{DomainCount, aggregator::DomainCounts};

/// Sums same-keyed counts across all tables
///
/// The largest table is reused as the accumulator so the bulk of the keys is
/// never rehashed. Summation is order independent.
pub fn merge<I>(tables: I) -> DomainCounts
where
    I: IntoIterator<Item = DomainCounts>,
{
    let mut tables: Vec<DomainCounts> = tables.into_iter().collect();
    let Some(largest) = (0..tables.len()).max_by_key(|&i| tables[i].len()) else {
        return DomainCounts::default();
    };

    let mut merged = tables.swap_remove(largest);
    for table in tables {
        for (domain, count) in table {
            *merged.entry(domain).or_insert(0) += count;
        }
    }
    merged
}

/// Orders by count descending, then domain ascending
pub fn rank(table: DomainCounts) -> Vec<DomainCount> {
    let mut ranked: Vec<DomainCount> = table
        .into_iter()
        .map(|(domain, count)| DomainCount { domain, count })
        .collect();

    // keys are unique, so the order is total and unstable sorting is safe
    ranked.sort_unstable_by(|a, b| {
        (Reverse(a.count), &a.domain).cmp(&(Reverse(b.count), &b.domain))
    });
    ranked
}
