use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::AuditError;
use crate::report::report_model::TestReport;

/// Write the report as pretty-printed JSON. With no explicit path the file
/// lands in the working directory under a name derived from the page URL.
pub fn save_report(report: &TestReport, path: Option<&Path>) -> Result<PathBuf, AuditError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(default_filename(&report.url)),
    };
    let file = File::create(&path).map_err(|e| AuditError::SessionIo(e.to_string()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report).map_err(|e| {
        AuditError::JsonSerialize {
            context: format!("report for {}", report.url),
            source: e,
        }
    })?;
    Ok(path)
}

/// `clickability_test_{sanitized url}.json`
pub fn default_filename(url: &str) -> String {
    let stripped = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    let safe: String = stripped
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let safe: String = safe.chars().take(60).collect();
    format!("clickability_test_{}.json", safe)
}
