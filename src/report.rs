//! Markdown report generation
//!
//! Serializes the joined matrix, ranking, classification and group
//! aggregates into a markdown document suitable for posting as CI output.
//! Two explicit modes, selected on the series count: the full pairwise
//! comparison (summary, groups, diffs, bars) for exactly two series, and a
//! diff-free side-by-side table for any other count.

use crate::compare::{
    bar_marks, bar_scale, best_value_index, ranked_entries, DiffEntry, EPSILON,
};
use crate::data::{MeasurementRecord, SeriesSet};
use crate::error::Result;
use crate::group::{summarize, GroupSummary};
use crate::matrix::{ComparisonMatrix, MatchedRow};
use minijinja::{context, Environment};
use tracing::{debug, warn};

/// Report rendering options, threaded explicitly into each call
#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    /// Include each measurement's raw captured output in the details section
    pub verbose: bool,
}

impl ReportConfig {
    /// Default (non-verbose) configuration
    pub fn new() -> Self {
        Self::default()
    }
}

/// Markdown template for the comparison report
const REPORT_TEMPLATE: &str = r#"# Benchmark Comparison Report
{% if empty %}
_No benchmark results to report._
{% else %}{% if summary %}
Compared {{ summary.comparable }} benchmark(s): geometric mean {{ summary.geomean }} ({{ summary.improved }} improved, {{ summary.regressed }} regressed, {{ summary.unchanged }} unchanged; epsilon {{ summary.epsilon }})
{% endif %}{% for group in groups %}
<details>
<summary>{{ group.title }}</summary>

| Benchmark |{% for name in series %} {{ name }} |{% endfor %}{% if pairwise %} Relative | Change | Trend |{% endif %}
|---|{% for name in series %}---|{% endfor %}{% if pairwise %}---|---|---|{% endif %}
{% for row in group.rows %}| {{ row.benchmark }} |{% for value in row.values %} {{ value }} |{% endfor %}{% if pairwise %} {{ row.relative }} | {{ row.change }} | {{ row.bars }} |{% endif %}
{% endfor %}
</details>
{% endfor %}{% if details %}
## Details
{% for detail in details %}
<details>
<summary>{{ detail.title }}</summary>

#### Environment Variables
{{ detail.env }}

#### Command
{{ detail.command }}
{% if detail.stdout %}
#### Output
{{ detail.stdout }}
{% endif %}
</details>
{% endfor %}{% endif %}{% endif %}
"#;

/// One table row prepared for the template
#[derive(Debug, Clone, serde::Serialize)]
struct RowView {
    benchmark: String,
    values: Vec<String>,
    relative: String,
    change: String,
    bars: String,
}

/// One group section prepared for the template
#[derive(Debug, Clone, serde::Serialize)]
struct GroupView {
    title: String,
    rows: Vec<RowView>,
}

/// Global summary line data
#[derive(Debug, Clone, serde::Serialize)]
struct SummaryView {
    comparable: usize,
    geomean: String,
    improved: usize,
    regressed: usize,
    unchanged: usize,
    epsilon: String,
}

/// Per-measurement diagnostics block
#[derive(Debug, Clone, serde::Serialize)]
struct DetailView {
    title: String,
    env: String,
    command: String,
    stdout: Option<String>,
}

fn display_name(name: &str, label: &str) -> String {
    if label.is_empty() {
        name.to_string()
    } else {
        format!("{} [{}]", name, label)
    }
}

fn format_geomean(geomean: Option<f64>) -> String {
    match geomean {
        Some(g) => format!("{:.2}%", g * 100.0),
        None => "cannot calculate".to_string(),
    }
}

fn row_view(row: &MatchedRow<'_>, entry: Option<&DiffEntry<'_>>) -> RowView {
    let best = best_value_index(row);
    let values = row
        .cells
        .iter()
        .enumerate()
        .map(|(idx, cell)| match cell {
            Some(record) => {
                let text = format!("{:.2} {}", record.value, record.unit);
                if best == Some(idx) {
                    format!("**{}**", text)
                } else {
                    text
                }
            }
            None => "-".to_string(),
        })
        .collect();

    let (relative, change, bars) = match entry {
        Some(entry) => match entry.diff {
            Some(diff) => (
                format!("{:.2}%", diff * 100.0),
                format!("{:+.2}%", (diff - 1.0) * 100.0),
                format!("`{}`", bar_marks(entry)),
            ),
            None => ("-".to_string(), "-".to_string(), "`.`".to_string()),
        },
        None => ("-".to_string(), "-".to_string(), "-".to_string()),
    };

    RowView {
        benchmark: display_name(row.name, row.label),
        values,
        relative,
        change,
        bars,
    }
}

fn group_view(group: &GroupSummary<'_>) -> GroupView {
    GroupView {
        title: format!("{}: {}", group.prefix, format_geomean(group.geomean)),
        rows: group
            .entries
            .iter()
            .map(|entry| row_view(entry.row, Some(entry)))
            .collect(),
    }
}

fn detail_view(record: &MeasurementRecord, verbose: bool) -> DetailView {
    // HashMap iteration order is arbitrary; sort for a deterministic report
    let mut env_lines: Vec<String> = record
        .env
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();
    env_lines.sort();
    let env = if env_lines.is_empty() {
        "(none)".to_string()
    } else {
        env_lines.join("\n")
    };

    let command = if record.command.is_empty() {
        "(none)".to_string()
    } else {
        record.command.join(" ")
    };

    let stdout = if verbose && !record.stdout.is_empty() {
        Some(record.stdout.clone())
    } else {
        None
    };

    DetailView {
        title: display_name(&record.name, &record.label),
        env,
        command,
        stdout,
    }
}

/// Render the full comparison report for a set of series
///
/// Joins the series, computes diffs/ranking/groups when exactly two series
/// are present, and renders the markdown document. Input records are never
/// mutated; the only output is the returned string.
pub fn render_markdown(series_set: &SeriesSet, config: &ReportConfig) -> Result<String> {
    let matrix = ComparisonMatrix::build(series_set)?;
    let pairwise = series_set.len() == 2;
    let series_names: Vec<&str> = series_set.names().collect();

    let mut summary_view: Option<SummaryView> = None;
    let mut group_views: Vec<GroupView> = Vec::new();

    if !matrix.is_empty() {
        if pairwise {
            let entries = ranked_entries(&matrix);
            if entries.iter().any(|e| e.diff.is_some()) && bar_scale(&entries) == 0.0 {
                warn!("no variance across comparable rows, all bars neutral");
            }

            let summary = summarize(entries);
            summary_view = Some(SummaryView {
                comparable: summary.comparable,
                geomean: format_geomean(summary.geomean),
                improved: summary.improved,
                regressed: summary.regressed,
                unchanged: summary.unchanged,
                epsilon: format!("{}%", EPSILON * 100.0),
            });
            group_views = summary.groups.iter().map(group_view).collect();
        } else {
            // N-way side-by-side display: values only, no diff columns
            group_views = vec![GroupView {
                title: "Results".to_string(),
                rows: matrix.rows().iter().map(|row| row_view(row, None)).collect(),
            }];
        }
    }

    // Diagnostics for the primary (first) series only
    let details: Vec<DetailView> = series_set
        .first()
        .map(|series| {
            series
                .results
                .iter()
                .map(|record| detail_view(record, config.verbose))
                .collect()
        })
        .unwrap_or_default();

    debug!(
        series = series_names.len(),
        rows = matrix.rows().len(),
        pairwise,
        "rendering benchmark report"
    );

    let mut env = Environment::new();
    env.add_template("report", REPORT_TEMPLATE)?;
    let template = env.get_template("report")?;

    let markdown = template.render(context! {
        empty => matrix.is_empty(),
        pairwise => pairwise,
        series => series_names,
        summary => summary_view,
        groups => group_views,
        details => details,
    })?;

    Ok(markdown)
}
