//! Data structures for benchmark measurements and series

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single observed benchmark outcome
///
/// Records are produced by the measurement harness with timing/throughput
/// already normalized into a `value` + `unit` + `lower_is_better` triple.
/// The engine only reads them; it never mutates a record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementRecord {
    /// Benchmark identifier, stable across series
    pub name: String,
    /// Sub-variant identifier (e.g. a configuration run under the same benchmark)
    #[serde(default)]
    pub label: String,
    /// The measured value
    pub value: f64,
    /// Unit of measurement
    pub unit: String,
    /// Whether a smaller value is the more favorable one
    pub lower_is_better: bool,
    /// The invocation that produced this measurement, for diagnostics
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Environment variables the measurement ran under
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub env: HashMap<String, String>,
    /// Captured output of the benchmark binary, for diagnostics
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout: String,
}

/// One named comparison arm: an ordered list of measurements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Series {
    /// Series name (e.g. "This PR", "baseline")
    pub name: String,
    /// Measurements collected for this series
    pub results: Vec<MeasurementRecord>,
}

/// The full input to one report generation: all series, in order
///
/// Insertion order is significant: it fixes the column order of the
/// rendered report and, when exactly two series are present, which one
/// acts as the reference for diff computation (the first).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SeriesSet {
    series: Vec<Series>,
}

impl SeriesSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a series; its position determines its report column
    pub fn push(&mut self, name: impl Into<String>, results: Vec<MeasurementRecord>) {
        self.series.push(Series {
            name: name.into(),
            results,
        });
    }

    /// Number of series
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the set holds no series at all
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate over series in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Series> {
        self.series.iter()
    }

    /// Series names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    /// Look up a series by name
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    /// The first (primary/reference) series, if any
    pub fn first(&self) -> Option<&Series> {
        self.series.first()
    }

    /// Ingest a fully materialized series list from JSON
    ///
    /// The expected shape is an array of `{ "name": ..., "results": [...] }`
    /// objects; array order becomes series order.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let series: Vec<Series> = serde_json::from_str(json)?;
        Ok(Self { series })
    }
}

impl FromIterator<Series> for SeriesSet {
    fn from_iter<I: IntoIterator<Item = Series>>(iter: I) -> Self {
        Self {
            series: iter.into_iter().collect(),
        }
    }
}
