//! Grouping and geometric-mean aggregation
//!
//! Benchmarks are partitioned by a naming prefix and each group (plus the
//! report as a whole) is summarized with the geometric mean of its diff
//! ratios, the right aggregate for multiplicative performance changes.

use crate::compare::{Classification, DiffEntry};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Leading run of characters before the first whitespace, underscore or hyphen
static GROUP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^_\s-]+").expect("group prefix pattern is valid"));

/// Extract the grouping key from a benchmark name
///
/// The key is the leading contiguous run of characters before the first
/// whitespace, underscore or hyphen. Names with no separator, and names
/// that start with a separator (empty prefix), group under the whole name.
pub fn group_prefix(name: &str) -> &str {
    match GROUP_PREFIX.find(name) {
        Some(m) => m.as_str(),
        None => name,
    }
}

/// Geometric mean of a set of ratios
///
/// Computed as `exp(mean(ln r))` to stay stable for long products.
/// `None` for an empty slice.
pub fn geometric_mean(ratios: &[f64]) -> Option<f64> {
    if ratios.is_empty() {
        return None;
    }
    let log_sum: f64 = ratios.iter().map(|r| r.ln()).sum();
    Some((log_sum / ratios.len() as f64).exp())
}

/// One prefix group's aggregate
#[derive(Debug, Clone)]
pub struct GroupSummary<'a> {
    /// Grouping key extracted from the benchmark names
    pub prefix: &'a str,
    /// Geometric mean over the group's comparable rows; `None` when none exist
    pub geomean: Option<f64>,
    /// The group's entries, in ranked order
    pub entries: Vec<DiffEntry<'a>>,
}

/// The report-wide aggregate over all groups
#[derive(Debug, Clone)]
pub struct Summary<'a> {
    /// Groups in order of first appearance in the ranked entries
    pub groups: Vec<GroupSummary<'a>>,
    /// Geometric mean over all comparable rows; `None` when none exist
    pub geomean: Option<f64>,
    /// Count of comparable rows
    pub comparable: usize,
    /// Counts among comparable rows, per the epsilon rule
    pub improved: usize,
    pub regressed: usize,
    pub unchanged: usize,
}

/// Partition ranked entries into prefix groups and aggregate them
///
/// Entries must already be in ranked order; group membership preserves that
/// order, so each group displays the same way the flat table would.
pub fn summarize<'a>(entries: Vec<DiffEntry<'a>>) -> Summary<'a> {
    let mut comparable = 0usize;
    let mut improved = 0usize;
    let mut regressed = 0usize;
    let mut unchanged = 0usize;
    let mut all_diffs: Vec<f64> = Vec::new();

    let mut groups: Vec<GroupSummary<'a>> = Vec::new();
    let mut group_index: HashMap<&'a str, usize> = HashMap::new();

    for entry in entries {
        if let Some(diff) = entry.diff {
            comparable += 1;
            all_diffs.push(diff);
            match entry.classification {
                Classification::Improved => improved += 1,
                Classification::Regressed => regressed += 1,
                Classification::Unchanged => unchanged += 1,
                Classification::NotComparable => {}
            }
        }

        let prefix = group_prefix(entry.row.name);
        let idx = match group_index.get(prefix) {
            Some(&i) => i,
            None => {
                groups.push(GroupSummary {
                    prefix,
                    geomean: None,
                    entries: Vec::new(),
                });
                group_index.insert(prefix, groups.len() - 1);
                groups.len() - 1
            }
        };
        groups[idx].entries.push(entry);
    }

    for group in &mut groups {
        let diffs: Vec<f64> = group.entries.iter().filter_map(|e| e.diff).collect();
        group.geomean = geometric_mean(&diffs);
    }

    Summary {
        geomean: geometric_mean(&all_diffs),
        groups,
        comparable,
        improved,
        regressed,
        unchanged,
    }
}
