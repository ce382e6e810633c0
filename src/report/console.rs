use std::fmt::Write;

use crate::report::report_model::TestReport;

/// Human-readable run summary printed after the audit.
pub fn format_console_report(report: &TestReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", "=".repeat(64));
    let _ = writeln!(out, "CLICKABILITY AUDIT: {}", report.url);
    let _ = writeln!(out, "{}", "=".repeat(64));

    if let Some(error) = &report.error {
        let _ = writeln!(out, "RUN FAILED: {}", error);
        return out;
    }

    let _ = writeln!(out, "Elements discovered : {}", report.total_elements_found);
    let _ = writeln!(out, "Elements tested     : {}", report.elements_tested);
    let _ = writeln!(
        out,
        "Active clicks       : {} ({:.1}%)",
        report.active_clicks, report.summary.active_percentage
    );
    let _ = writeln!(
        out,
        "Dead clicks         : {} ({:.1}%)",
        report.dead_clicks, report.summary.dead_percentage
    );
    let _ = writeln!(
        out,
        "Errors              : {} ({:.1}%)",
        report.errors, report.summary.error_percentage
    );
    let _ = writeln!(
        out,
        "Workers/batches     : {}/{} {:?}",
        report.concurrent_info.max_workers,
        report.concurrent_info.batches_created,
        report.concurrent_info.batch_sizes
    );
    let _ = writeln!(
        out,
        "Total time          : {:.1}s",
        report.concurrent_info.total_time
    );

    if !report.summary.click_status_breakdown.is_empty() {
        let _ = writeln!(out, "\nStatus breakdown:");
        for (status, count) in &report.summary.click_status_breakdown {
            let _ = writeln!(out, "  {:<22} {}", status, count);
        }
    }

    if !report.summary.most_common_classes.is_empty() {
        let _ = writeln!(out, "\nMost common element classes:");
        for (classes, count) in report.summary.most_common_classes.iter().take(5) {
            let _ = writeln!(out, "  {:>3}x  {}", count, truncate(classes, 48));
        }
    }

    if !report.results.is_empty() {
        let _ = writeln!(out, "\nFirst results:");
        for outcome in report.results.iter().take(10) {
            let label = if outcome.element_info.text.is_empty() {
                &outcome.element_info.class_names
            } else {
                &outcome.element_info.text
            };
            let _ = writeln!(
                out,
                "  [{}] <{}> {}",
                outcome.click_status.as_str(),
                outcome.element_info.tag_name,
                truncate(label, 40)
            );
        }
        if report.results.len() > 10 {
            let _ = writeln!(out, "  ... and {} more", report.results.len() - 10);
        }
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    }
}
