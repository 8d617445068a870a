//! Cross-series matching: joining measurements into comparison rows
//!
//! Each series is collected into (name, label) keyed entries and joined
//! against every other series. The result is one row per (name, label)
//! pair observed in *any* series, with a cell per series that is empty
//! where that series has no matching measurement.

use crate::data::{MeasurementRecord, SeriesSet};
use crate::error::{Error, Result};
use std::collections::HashMap;
use tracing::debug;

/// One joined comparison row: a (name, label) pair across all series
#[derive(Debug, Clone)]
pub struct MatchedRow<'a> {
    /// Benchmark identifier
    pub name: &'a str,
    /// Sub-variant identifier
    pub label: &'a str,
    /// Direction shared by every present record in this row
    pub lower_is_better: bool,
    /// One slot per series, in series order; `None` where absent
    pub cells: Vec<Option<&'a MeasurementRecord>>,
}

impl MatchedRow<'_> {
    /// Count of series that produced a measurement for this row
    pub fn present(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// The joined matrix over all series of a [`SeriesSet`]
#[derive(Debug, Clone)]
pub struct ComparisonMatrix<'a> {
    rows: Vec<MatchedRow<'a>>,
    series_count: usize,
}

impl<'a> ComparisonMatrix<'a> {
    /// Join all series into comparison rows
    ///
    /// Row order is first-encounter order across series, which makes the
    /// matrix deterministic for a given input. Fails fast when a series
    /// contains two records for the same (name, label) pair, or when the
    /// records of one row disagree on `lower_is_better` — both are caller
    /// errors that would make the comparison ambiguous.
    pub fn build(series_set: &'a SeriesSet) -> Result<Self> {
        let series_count = series_set.len();
        let mut rows: Vec<MatchedRow<'a>> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();

        for (col, series) in series_set.iter().enumerate() {
            for record in &series.results {
                let key = (record.name.as_str(), record.label.as_str());
                let row_idx = match index.get(&key) {
                    Some(&i) => i,
                    None => {
                        rows.push(MatchedRow {
                            name: &record.name,
                            label: &record.label,
                            lower_is_better: record.lower_is_better,
                            cells: vec![None; series_count],
                        });
                        index.insert(key, rows.len() - 1);
                        rows.len() - 1
                    }
                };

                let row = &mut rows[row_idx];
                if row.cells[col].is_some() {
                    return Err(Error::DuplicateMeasurement {
                        series: series.name.clone(),
                        name: record.name.clone(),
                        label: record.label.clone(),
                    });
                }
                if row.lower_is_better != record.lower_is_better {
                    return Err(Error::DirectionMismatch {
                        name: record.name.clone(),
                        label: record.label.clone(),
                    });
                }
                row.cells[col] = Some(record);
            }
        }

        debug!(
            series = series_count,
            rows = rows.len(),
            "joined comparison matrix"
        );

        Ok(Self { rows, series_count })
    }

    /// The joined rows, in first-encounter order
    pub fn rows(&self) -> &[MatchedRow<'a>] {
        &self.rows
    }

    /// Number of series the matrix was built over
    pub fn series_count(&self) -> usize {
        self.series_count
    }

    /// Whether no (name, label) pair was observed in any series
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
