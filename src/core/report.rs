//! Console and JSON rendering of probe results.

use std::io::{self, IsTerminal};

use chrono::{DateTime, Utc};
use crossterm::style::{Color, Stylize, style};
use serde::Serialize;

use crate::core::probe::{ModelDescriptor, ProbeResult, RunSummary, StatusLabel, TallyBucket};
use crate::core::util::{format_latency, format_thousands};

const MIN_NAME_WIDTH: usize = 30;
const INPUT_WIDTH: usize = 18;
const OUTPUT_WIDTH: usize = 17;
const STATUS_WIDTH: usize = 17;
const LATENCY_WIDTH: usize = 10;

/// Whether to emit ANSI colors: not disabled, `NO_COLOR` unset, stdout is a terminal.
pub fn color_enabled(no_color: bool) -> bool {
    !no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
}

/// Applies colors only when enabled.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn status_color(status: StatusLabel) -> Color {
    match status.bucket() {
        TallyBucket::Active => Color::Green,
        TallyBucket::QuotaExceeded => Color::Yellow,
        TallyBucket::Other => Color::Red,
    }
}

/// Width of the model column: the longest name, at least `MIN_NAME_WIDTH`.
pub fn name_width(models: &[ModelDescriptor]) -> usize {
    models
        .iter()
        .map(|m| m.name.len())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH)
}

fn rule(name_w: usize) -> String {
    "-".repeat(name_w + INPUT_WIDTH + OUTPUT_WIDTH + STATUS_WIDTH + LATENCY_WIDTH + 12)
}

pub fn table_header(name_w: usize) -> String {
    format!(
        "{:<name_w$} | {:<INPUT_WIDTH$} | {:<OUTPUT_WIDTH$} | {:<STATUS_WIDTH$} | {:<LATENCY_WIDTH$}\n{}",
        "MODEL",
        "INPUT (tokens)",
        "OUTPUT (tokens)",
        "STATUS",
        "LATENCY",
        rule(name_w)
    )
}

/// One table row, colored by status.
pub fn table_row(result: &ProbeResult, name_w: usize, palette: Palette) -> String {
    let row = format!(
        "{:<name_w$} | {:<INPUT_WIDTH$} | {:<OUTPUT_WIDTH$} | {:<STATUS_WIDTH$} | {:<LATENCY_WIDTH$}",
        result.model.name,
        format_thousands(result.model.input_token_limit),
        format_thousands(result.model.output_token_limit),
        result.status,
        format_latency(result.latency),
    );
    palette.paint(row.trim_end(), status_color(result.status))
}

/// Footer: totals and a short legend.
pub fn summary_footer(summary: &RunSummary, name_w: usize, palette: Palette) -> String {
    let rule = rule(name_w);
    let counts = format!(
        "Active: {} | Quota exceeded: {} | Other errors: {}",
        palette.paint(&summary.active.to_string(), Color::Green),
        palette.paint(&summary.quota_exceeded.to_string(), Color::Yellow),
        palette.paint(&summary.other.to_string(), Color::Red),
    );
    [
        String::new(),
        rule.clone(),
        palette.paint("[SUMMARY]", Color::Yellow),
        format!("Total tested: {}", summary.total),
        counts,
        rule,
        "ACTIVE: the key can use this model.".to_string(),
        "QUOTA_EXCEEDED: the free or paid rate/volume limit (RPM/TPM) was hit.".to_string(),
    ]
    .join("\n")
}

#[derive(Serialize)]
struct JsonRow<'a> {
    model: &'a str,
    input_token_limit: u64,
    output_token_limit: u64,
    status: StatusLabel,
    latency_seconds: f64,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    started_at: String,
    summary: RunSummary,
    results: Vec<JsonRow<'a>>,
}

/// Full run as pretty-printed JSON.
pub fn json_report(
    started_at: DateTime<Utc>,
    results: &[ProbeResult],
    summary: &RunSummary,
) -> serde_json::Result<String> {
    let report = JsonReport {
        started_at: started_at.to_rfc3339(),
        summary: *summary,
        results: results
            .iter()
            .map(|r| JsonRow {
                model: &r.model.name,
                input_token_limit: r.model.input_token_limit,
                output_token_limit: r.model.output_token_limit,
                status: r.status,
                latency_seconds: r.latency_seconds(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}

#[derive(Serialize)]
struct JsonModel<'a> {
    name: &'a str,
    display_name: Option<&'a str>,
    input_token_limit: u64,
    output_token_limit: u64,
}

/// Enumerated models as pretty-printed JSON.
pub fn json_models(models: &[ModelDescriptor]) -> serde_json::Result<String> {
    let rows: Vec<JsonModel<'_>> = models
        .iter()
        .map(|m| JsonModel {
            name: &m.name,
            display_name: m.display_name.as_deref(),
            input_token_limit: m.input_token_limit,
            output_token_limit: m.output_token_limit,
        })
        .collect();
    serde_json::to_string_pretty(&rows)
}

/// Plain table of enumerated models.
pub fn models_table(models: &[ModelDescriptor]) -> String {
    let name_w = name_width(models);
    let display_w = models
        .iter()
        .filter_map(|m| m.display_name.as_deref().map(str::len))
        .max()
        .unwrap_or(0)
        .max(20);

    let mut lines = vec![
        format!(
            "{:<name_w$}  {:<display_w$}  {:>12}  {:>12}",
            "Name", "Display name", "Input", "Output"
        ),
        format!(
            "{}  {}  ------------  ------------",
            "-".repeat(name_w),
            "-".repeat(display_w)
        ),
    ];
    for m in models {
        lines.push(
            format!(
                "{:<name_w$}  {:<display_w$}  {:>12}  {:>12}",
                m.name,
                m.display_name.as_deref().unwrap_or("—"),
                format_thousands(m.input_token_limit),
                format_thousands(m.output_token_limit),
            )
            .trim_end()
            .to_string(),
        );
    }
    lines.push(format!("\n{} model(s) listed", models.len()));
    lines.join("\n")
}
