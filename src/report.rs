//! Summary output for a merge run

use serde::Serialize;
use crate::error::Result;
use crate::pdf::{MergeOutcome, PageReport, PdfMetadata};

const HEADERS: [&str; 3] = ["File", "Pages", "Pages included"];

/// Render the per-file reports as an aligned plain-text table
pub fn render_table(reports: &[PageReport]) -> String {
    let rows: Vec<[String; 3]> = reports
        .iter()
        .map(|r| {
            [
                r.file_name.clone(),
                r.page_count.to_string(),
                r.included_pages.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = format!(
        "{:<w0$} | {:>w1$} | {:<w2$}",
        cells[0],
        cells[1],
        cells[2],
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
    );
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Warning line for skipped empty files, if there were any
pub fn empty_files_warning(empty_files: &[String]) -> Option<String> {
    if empty_files.is_empty() {
        return None;
    }
    Some(format!(
        "{} empty file(s) skipped: {}",
        empty_files.len(),
        empty_files.join(", ")
    ))
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    output: &'a str,
    total_pages: usize,
    files: &'a [PageReport],
    empty_files: &'a [String],
}

/// Render a merge outcome as pretty-printed JSON
pub fn render_json(outcome: &MergeOutcome, output: &str) -> Result<String> {
    let summary = JsonSummary {
        output,
        total_pages: outcome.page_count(),
        files: &outcome.reports,
        empty_files: &outcome.empty_files,
    };
    Ok(serde_json::to_string_pretty(&summary)?)
}

#[derive(Serialize)]
struct JsonInfo<'a> {
    file: &'a str,
    #[serde(flatten)]
    metadata: &'a PdfMetadata,
}

/// Render the `info` view of one file as pretty-printed JSON
pub fn render_info_json(metadata: &PdfMetadata, file: &str) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonInfo { file, metadata })?)
}
