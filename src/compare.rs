//! Pairwise comparison: diff ratios, classification, ranking and bars
//!
//! Diffs are defined only when exactly two series are compared. The first
//! series (by insertion order) is the reference, the second the candidate,
//! and the ratio is oriented so that `diff > 1` favors the reference
//! regardless of the measurement direction.

use crate::matrix::{ComparisonMatrix, MatchedRow};
use std::cmp::Ordering;

/// Minimum deviation from parity (1.0) for a change to count as
/// improved/regressed rather than unchanged. 0.5%.
pub const EPSILON: f64 = 0.005;

/// Visual width of the bar indicator, per side
const BAR_WIDTH: f64 = 10.0;

/// Outcome of comparing one row against the significance threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The reference series is more favorable by at least epsilon
    Improved,
    /// The candidate series is more favorable by at least epsilon
    Regressed,
    /// Within epsilon of parity
    Unchanged,
    /// No diff could be computed for this row
    NotComparable,
}

/// One row's derived comparison data, in ranked order
#[derive(Debug, Clone)]
pub struct DiffEntry<'a> {
    /// The joined row this entry was computed from
    pub row: &'a MatchedRow<'a>,
    /// Normalized relative-performance ratio, when computable
    pub diff: Option<f64>,
    /// Significance classification of `diff`
    pub classification: Classification,
    /// Signed bar count, proportional to the report-wide scale
    pub bars: i32,
}

/// Compute the normalized relative-performance ratio for a two-series row
///
/// Returns `None` when the row does not span exactly two series, when
/// either side is missing, or when the needed divisor is zero.
pub fn relative_diff(row: &MatchedRow<'_>) -> Option<f64> {
    if row.cells.len() != 2 {
        return None;
    }
    let (reference, candidate) = match (row.cells[0], row.cells[1]) {
        (Some(r), Some(c)) => (r, c),
        _ => return None,
    };

    if reference.lower_is_better {
        if reference.value != 0.0 {
            Some(candidate.value / reference.value)
        } else {
            None
        }
    } else if candidate.value != 0.0 {
        Some(reference.value / candidate.value)
    } else {
        None
    }
}

/// Classify a diff against [`EPSILON`]
pub fn classify(diff: Option<f64>) -> Classification {
    let Some(diff) = diff else {
        return Classification::NotComparable;
    };
    let delta = diff - 1.0;
    if delta.abs() < EPSILON {
        Classification::Unchanged
    } else if delta > 0.0 {
        Classification::Improved
    } else {
        Classification::Regressed
    }
}

/// Index of the series with the most favorable value for this row
///
/// Minimum wins for `lower_is_better` rows, maximum otherwise; ties go to
/// the earlier series. Presentation only — the diff does not depend on it.
pub fn best_value_index(row: &MatchedRow<'_>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, cell) in row.cells.iter().enumerate() {
        if let Some(record) = cell {
            let better = match best {
                None => true,
                Some((_, value)) => {
                    if row.lower_is_better {
                        record.value < value
                    } else {
                        record.value > value
                    }
                }
            };
            if better {
                best = Some((idx, record.value));
            }
        }
    }
    best.map(|(idx, _)| idx)
}

/// The symmetric bar scale over a set of entries
///
/// `max(max(delta), -min(delta))` across all comparable rows, so a single
/// skewed direction cannot dominate the visual scale. Zero when no row is
/// comparable or nothing deviates from parity.
pub fn bar_scale(entries: &[DiffEntry<'_>]) -> f64 {
    let mut max_delta = f64::NEG_INFINITY;
    let mut min_delta = f64::INFINITY;
    for entry in entries {
        if let Some(diff) = entry.diff {
            let delta = diff - 1.0;
            max_delta = max_delta.max(delta);
            min_delta = min_delta.min(delta);
        }
    }
    if max_delta == f64::NEG_INFINITY {
        0.0
    } else {
        max_delta.max(-min_delta)
    }
}

/// Render the bar indicator for one entry
///
/// `+` marks for improvements, `-` marks for regressions, a single `.`
/// for parity, unchanged rows and rows without a bar.
pub fn bar_marks(entry: &DiffEntry<'_>) -> String {
    match entry.classification {
        Classification::Unchanged | Classification::NotComparable => ".".to_string(),
        _ if entry.bars > 0 => "+".repeat(entry.bars as usize),
        _ if entry.bars < 0 => "-".repeat(entry.bars.unsigned_abs() as usize),
        _ => ".".to_string(),
    }
}

/// Compute, rank and scale all entries of a two-series matrix
///
/// Comparable rows sort before non-comparable ones; among comparable rows
/// higher diff sorts first. The sort is stable, so rows without a diff keep
/// matrix encounter order.
pub fn ranked_entries<'a>(matrix: &'a ComparisonMatrix<'a>) -> Vec<DiffEntry<'a>> {
    let mut entries: Vec<DiffEntry<'a>> = matrix
        .rows()
        .iter()
        .map(|row| {
            let diff = relative_diff(row);
            DiffEntry {
                row,
                diff,
                classification: classify(diff),
                bars: 0,
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.diff, b.diff) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    let scale = bar_scale(&entries);
    if scale > 0.0 {
        for entry in &mut entries {
            if let Some(diff) = entry.diff {
                entry.bars = (BAR_WIDTH * (diff - 1.0) / scale).round() as i32;
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{MeasurementRecord, SeriesSet};
    use std::collections::HashMap;

    fn make_record(name: &str, value: f64, lower_is_better: bool) -> MeasurementRecord {
        MeasurementRecord {
            name: name.to_string(),
            label: String::new(),
            value,
            unit: "ms".to_string(),
            lower_is_better,
            command: Vec::new(),
            env: HashMap::new(),
            stdout: String::new(),
        }
    }

    fn two_series(reference: Vec<MeasurementRecord>, candidate: Vec<MeasurementRecord>) -> SeriesSet {
        let mut set = SeriesSet::new();
        set.push("This PR", reference);
        set.push("baseline", candidate);
        set
    }

    #[test]
    fn test_lower_is_better_diff() {
        // Scenario A: ref 100, candidate 80, lower is better
        let set = two_series(
            vec![make_record("gemm", 100.0, true)],
            vec![make_record("gemm", 80.0, true)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        let row = &matrix.rows()[0];

        let diff = relative_diff(row).unwrap();
        assert!((diff - 0.8).abs() < 1e-12);
        assert_eq!(classify(Some(diff)), Classification::Regressed);
        assert_eq!(best_value_index(row), Some(1));
    }

    #[test]
    fn test_within_epsilon_is_unchanged() {
        // Scenario B: 100 vs 100.001
        let set = two_series(
            vec![make_record("gemm", 100.0, true)],
            vec![make_record("gemm", 100.001, true)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        let diff = relative_diff(&matrix.rows()[0]);
        assert_eq!(classify(diff), Classification::Unchanged);
    }

    #[test]
    fn test_zero_reference_is_not_comparable() {
        // Scenario E: ref value 0, lower is better
        let set = two_series(
            vec![make_record("gemm", 0.0, true)],
            vec![make_record("gemm", 80.0, true)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        assert_eq!(relative_diff(&matrix.rows()[0]), None);
        assert_eq!(classify(None), Classification::NotComparable);
    }

    #[test]
    fn test_zero_candidate_higher_is_better_is_not_comparable() {
        let set = two_series(
            vec![make_record("tput", 50.0, false)],
            vec![make_record("tput", 0.0, false)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        assert_eq!(relative_diff(&matrix.rows()[0]), None);
    }

    #[test]
    fn test_diff_symmetry() {
        // P1: swapping reference and candidate inverts the ratio
        let forward = two_series(
            vec![make_record("gemm", 100.0, true)],
            vec![make_record("gemm", 80.0, true)],
        );
        let backward = two_series(
            vec![make_record("gemm", 80.0, true)],
            vec![make_record("gemm", 100.0, true)],
        );
        let fm = crate::matrix::ComparisonMatrix::build(&forward).unwrap();
        let bm = crate::matrix::ComparisonMatrix::build(&backward).unwrap();
        let d1 = relative_diff(&fm.rows()[0]).unwrap();
        let d2 = relative_diff(&bm.rows()[0]).unwrap();
        assert!((d1 * d2 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_invariance() {
        // P2: sign of diff - 1 identifies the favorable series either way.
        // Candidate strictly smaller.
        let lower = two_series(
            vec![make_record("a", 100.0, true)],
            vec![make_record("a", 50.0, true)],
        );
        let higher = two_series(
            vec![make_record("a", 100.0, false)],
            vec![make_record("a", 50.0, false)],
        );
        let lm = crate::matrix::ComparisonMatrix::build(&lower).unwrap();
        let hm = crate::matrix::ComparisonMatrix::build(&higher).unwrap();

        // lower is better: smaller candidate is favorable, diff < 1
        assert!(relative_diff(&lm.rows()[0]).unwrap() < 1.0);
        // higher is better: smaller candidate is unfavorable, diff > 1
        assert!(relative_diff(&hm.rows()[0]).unwrap() > 1.0);
    }

    #[test]
    fn test_classification_boundaries() {
        // P3
        assert_eq!(classify(Some(1.0 + EPSILON / 2.0)), Classification::Unchanged);
        assert_eq!(classify(Some(1.0 + EPSILON * 2.0)), Classification::Improved);
        assert_eq!(classify(Some(1.0 - EPSILON * 2.0)), Classification::Regressed);
        assert_eq!(classify(Some(1.0)), Classification::Unchanged);
    }

    #[test]
    fn test_best_value_tie_goes_to_first_series() {
        let set = two_series(
            vec![make_record("gemm", 100.0, true)],
            vec![make_record("gemm", 100.0, true)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        assert_eq!(best_value_index(&matrix.rows()[0]), Some(0));
    }

    #[test]
    fn test_ranking_order() {
        // P5: comparable rows first, descending by diff; the row missing
        // from one series trails.
        let set = two_series(
            vec![
                make_record("a", 100.0, true),
                make_record("b", 100.0, true),
                make_record("only-here", 1.0, true),
                make_record("c", 100.0, true),
            ],
            vec![
                make_record("a", 50.0, true),
                make_record("b", 200.0, true),
                make_record("c", 100.0, true),
            ],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        let entries = ranked_entries(&matrix);

        let names: Vec<_> = entries.iter().map(|e| e.row.name).collect();
        assert_eq!(names, vec!["b", "c", "a", "only-here"]);
        assert!(entries[0].diff.unwrap() >= entries[1].diff.unwrap());
        assert!(entries[3].diff.is_none());
    }

    #[test]
    fn test_bar_scaling_is_symmetric() {
        let set = two_series(
            vec![
                make_record("a", 100.0, true),
                make_record("b", 100.0, true),
            ],
            vec![
                make_record("a", 200.0, true), // diff 2.0, delta +1.0
                make_record("b", 50.0, true),  // diff 0.5, delta -0.5
            ],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        let entries = ranked_entries(&matrix);

        // scale = 1.0; +1.0 -> 10 bars, -0.5 -> -5 bars
        assert_eq!(entries[0].bars, 10);
        assert_eq!(entries[1].bars, -5);
        assert_eq!(bar_marks(&entries[0]), "++++++++++");
        assert_eq!(bar_marks(&entries[1]), "-----");
    }

    #[test]
    fn test_zero_variance_renders_neutral() {
        let set = two_series(
            vec![make_record("a", 100.0, true)],
            vec![make_record("a", 100.0, true)],
        );
        let matrix = crate::matrix::ComparisonMatrix::build(&set).unwrap();
        let entries = ranked_entries(&matrix);

        assert_eq!(bar_scale(&entries), 0.0);
        assert_eq!(entries[0].bars, 0);
        assert_eq!(bar_marks(&entries[0]), ".");
    }
}
