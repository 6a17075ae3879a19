use std::fmt::Write as _;
use std::path::Path;

use crate::error::ReportError;
use crate::metrics::BatchMetrics;
use crate::report::{format_timestamp, ReportWriter, REPORT_TITLE, TEXT_ISSUE_LIMIT};

const BANNER_WIDTH: usize = 70;

/// Plain-text rendering of the quality report.
pub struct TextReport;

impl ReportWriter for TextReport {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(&self, metrics: &BatchMetrics, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, render_text_report(metrics)).map_err(|e| ReportError::Write {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

pub fn render_text_report(metrics: &BatchMetrics) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "{}", REPORT_TITLE);
    let _ = writeln!(out, "{}", banner);
    out.push('\n');

    out.push_str("Batch Information:\n");
    let _ = writeln!(out, "  Start Time: {}", format_timestamp(metrics.start_time()));
    match metrics.end_time() {
        Some(end) => {
            let _ = writeln!(out, "  End Time: {}", format_timestamp(end));
            let _ = writeln!(out, "  Duration: {:.2} seconds", metrics.duration_seconds());
        }
        None => out.push_str("  End Time: In Progress\n"),
    }
    out.push('\n');

    out.push_str("Processing Counts:\n");
    let _ = writeln!(out, "  Total Files: {}", metrics.total_files());
    let _ = writeln!(out, "  Successfully Processed: {}", metrics.total_succeeded());
    let _ = writeln!(out, "  Skipped: {}", metrics.total_skipped());
    let _ = writeln!(out, "  Warnings: {}", metrics.total_warnings());
    let _ = writeln!(out, "  Failures: {}", metrics.total_failures());
    let _ = writeln!(out, "  Total Records: {}", metrics.total_records());
    out.push('\n');

    let _ = writeln!(out, "Success Rate: {:.2}%", metrics.success_rate());
    out.push('\n');

    out.push_str("Detailed Results:\n");
    if metrics.records().is_empty() {
        out.push_str("  No files processed\n");
    } else {
        let _ = writeln!(
            out,
            "  {:<30} {:<8} {:<19} {:>7}  {}",
            "Filename", "Status", "Timestamp", "Records", "Message"
        );
        for record in metrics.records() {
            let _ = writeln!(
                out,
                "  {:<30} {:<8} {:<19} {:>7}  {}",
                record.filename,
                record.status.label(),
                format_timestamp(record.timestamp),
                record.records_processed,
                record.message_or_empty()
            );
        }
    }
    out.push('\n');

    out.push_str("Most Frequent Issues:\n");
    out.push('\n');
    let issues = metrics.top_issues(TEXT_ISSUE_LIMIT);
    if issues.is_empty() {
        out.push_str("  No issues recorded\n");
    }
    for (issue, count) in issues {
        let _ = writeln!(out, "  [{}x] {}", count, issue);
    }

    out.push_str(&banner);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ConversionRecord;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use std::path::PathBuf;

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 4, 2)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    fn sample_metrics() -> BatchMetrics {
        let mut metrics = BatchMetrics::new(t0());
        metrics.add_result(ConversionRecord::success(
            "a.xml",
            t0(),
            4,
            PathBuf::from("out/a.json"),
        ));
        for name in ["b.xml", "c.xml", "d.xml"] {
            metrics.add_result(ConversionRecord::failure(name, t0(), "B"));
        }
        for name in ["e.xml", "f.xml", "g.xml", "h.xml", "i.xml"] {
            metrics.add_result(ConversionRecord::warning(
                name,
                t0(),
                0,
                "A",
                PathBuf::from("out/x.json"),
            ));
        }
        metrics.finalize(t0() + Duration::milliseconds(1_500));
        metrics
    }

    #[test]
    fn test_text_report_sections() {
        let report = render_text_report(&sample_metrics());

        assert!(report.starts_with(&"=".repeat(70)));
        assert!(report.contains("HPRA Parser - Quality Summary Report"));
        assert!(report.contains("  Start Time: 2026-04-02 14:05:09"));
        assert!(report.contains("  End Time: 2026-04-02 14:05:10"));
        assert!(report.contains("  Duration: 1.50 seconds"));
        assert!(report.contains("  Total Files: 9"));
        assert!(report.contains("  Successfully Processed: 1"));
        assert!(report.contains("  Warnings: 5"));
        assert!(report.contains("  Failures: 3"));
        assert!(report.contains("  Total Records: 4"));
        assert!(report.contains("Success Rate: 11.11%"));
        assert!(report.contains("Detailed Results:"));
        assert!(report.ends_with(&"=".repeat(70)));
    }

    #[test]
    fn test_text_report_issue_order() {
        let report = render_text_report(&sample_metrics());

        let a = report.find("[5x] A").expect("issue A rendered");
        let b = report.find("[3x] B").expect("issue B rendered");
        assert!(a < b);
    }

    #[test]
    fn test_text_report_lists_at_most_ten_issues() {
        let mut metrics = BatchMetrics::new(t0());
        for i in 0..12 {
            metrics.add_result(ConversionRecord::failure(
                format!("f{:02}.xml", i),
                t0(),
                format!("XML parse error: case {:02}", i),
            ));
        }
        metrics.finalize(t0());

        let report = render_text_report(&metrics);
        assert_eq!(report.matches("  [1x] ").count(), 10);
        assert!(report.contains("[1x] XML parse error: case 09"));
        assert!(!report.contains("[1x] XML parse error: case 10"));
        // every file still appears in the detailed results
        assert!(report.contains("f11.xml"));
    }

    #[test]
    fn test_text_report_rows_in_processing_order() {
        let report = render_text_report(&sample_metrics());

        let first = report.find("a.xml").unwrap();
        let last = report.find("i.xml").unwrap();
        assert!(first < last);
        assert!(report.contains("SUCCESS"));
        assert!(report.contains("WARNING"));
    }

    #[test]
    fn test_text_report_in_progress_and_empty() {
        let report = render_text_report(&BatchMetrics::new(t0()));

        assert!(report.contains("  End Time: In Progress"));
        assert!(!report.contains("Duration:"));
        assert!(report.contains("Success Rate: 0.00%"));
        assert!(report.contains("No issues recorded"));
    }
}
