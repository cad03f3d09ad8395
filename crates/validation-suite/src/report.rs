//! CSV summary and self-contained HTML report.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::config::ValidationThresholds;
use crate::error::ValidationError;
use crate::runner::ValidationRow;

pub const CSV_HEADER: [&str; 6] = [
    "case_id",
    "rmse",
    "min_canal_distance",
    "guide_generated",
    "execution_time_ms",
    "passed",
];

const TITLE: &str = "Dental Guide Validation Report";

/// One header row and one row per case, `\r\n`-terminated. Floats use the
/// shortest representation that reads back to the same value.
pub fn render_csv(rows: &[ValidationRow]) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");
    for row in rows {
        let _ = write!(
            out,
            "{},{:?},{:?},{},{},{}\r\n",
            csv_field(&row.case_id),
            row.rmse,
            row.min_canal_distance,
            row.guide_generated,
            row.execution_time_ms,
            row.passed
        );
    }
    out
}

pub fn render_html(
    rows: &[ValidationRow],
    thresholds: &ValidationThresholds,
    pass_rate: f64,
) -> String {
    let mut body = String::new();
    for row in rows {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{:.3}</td><td>{:.3}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.case_id),
            row.rmse,
            row.min_canal_distance,
            row.guide_generated,
            row.execution_time_ms,
            if row.passed { "PASS" } else { "FAIL" }
        );
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>{title}</title></head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <p>Thresholds: max RMSE = {rmse:.2}mm, min canal distance = {canal:.2}mm, \
         min guide success rate = {rate:.0}%</p>\n\
         <p>Overall pass rate: {pass:.2}%</p>\n\
         <table border=\"1\">\n\
         <thead>\n\
         <tr><th>Case</th><th>RMSE</th><th>Min canal distance</th><th>Guide generated</th>\
         <th>Execution time (ms)</th><th>Status</th></tr>\n\
         </thead>\n\
         <tbody>\n\
         {body}\
         </tbody>\n\
         </table>\n\
         </body>\n\
         </html>\n",
        title = TITLE,
        rmse = thresholds.max_rmse,
        canal = thresholds.min_canal_distance,
        rate = thresholds.min_guide_success_rate * 100.0,
        pass = pass_rate * 100.0,
        body = body,
    )
}

pub fn write_csv(path: &Path, rows: &[ValidationRow]) -> Result<(), ValidationError> {
    write_report(path, &render_csv(rows))
}

pub fn write_html(
    path: &Path,
    rows: &[ValidationRow],
    thresholds: &ValidationThresholds,
    pass_rate: f64,
) -> Result<(), ValidationError> {
    write_report(path, &render_html(rows, thresholds, pass_rate))
}

fn write_report(path: &Path, contents: &str) -> Result<(), ValidationError> {
    let report_err = |source| ValidationError::Report {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(report_err)?;
    }
    fs::write(path, contents).map_err(report_err)
}

/// Quote a field containing a separator, quote or line break.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}
