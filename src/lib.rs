//! bench-report - Benchmark comparison and reporting engine
//!
//! This library matches benchmark measurements across named series,
//! computes normalized relative-performance ratios, classifies changes
//! against a significance threshold, aggregates them into prefix groups
//! via geometric mean, and renders a markdown comparison report.
//!
//! # Features
//!
//! - Join measurements from any number of series by (name, label)
//! - Pairwise diff, ranking and significance classification for two series
//! - Prefix-group and global geometric-mean aggregation
//! - Proportional text bar indicators on a symmetric scale
//! - Markdown report with collapsible sections and per-run diagnostics
//!
//! # Example
//!
//! ```
//! use bench_report::{render_markdown, MeasurementRecord, ReportConfig, SeriesSet};
//!
//! let record = |value: f64| MeasurementRecord {
//!     name: "gemm".to_string(),
//!     label: String::new(),
//!     value,
//!     unit: "ms".to_string(),
//!     lower_is_better: true,
//!     command: Vec::new(),
//!     env: Default::default(),
//!     stdout: String::new(),
//! };
//!
//! let mut series = SeriesSet::new();
//! series.push("This PR", vec![record(100.0)]);
//! series.push("baseline", vec![record(80.0)]);
//!
//! let markdown = render_markdown(&series, &ReportConfig::new()).unwrap();
//! assert!(markdown.contains("# Benchmark Comparison Report"));
//! ```

pub mod compare;
pub mod data;
pub mod error;
pub mod group;
pub mod matrix;
pub mod report;

pub use compare::{
    bar_marks, bar_scale, best_value_index, classify, ranked_entries, relative_diff,
    Classification, DiffEntry, EPSILON,
};
pub use data::{MeasurementRecord, Series, SeriesSet};
pub use error::{Error, Result};
pub use group::{geometric_mean, group_prefix, summarize, GroupSummary, Summary};
pub use matrix::{ComparisonMatrix, MatchedRow};
pub use report::{render_markdown, ReportConfig};
