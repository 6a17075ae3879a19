use std::path::Path;

use crate::error::ReportError;
use crate::metrics::BatchMetrics;
use crate::report::ReportWriter;

/// Spreadsheet rendering with Summary, Detailed Results and Frequent Issues
/// sheets. Unavailable when built without the `excel` feature.
pub struct ExcelReport;

impl ReportWriter for ExcelReport {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn write(&self, metrics: &BatchMetrics, path: &Path) -> Result<(), ReportError> {
        backend::write_workbook(metrics, path)
    }
}

pub fn excel_available() -> bool {
    cfg!(feature = "excel")
}

#[cfg(not(feature = "excel"))]
mod backend {
    use super::*;

    pub fn write_workbook(_metrics: &BatchMetrics, _path: &Path) -> Result<(), ReportError> {
        Err(ReportError::BackendUnavailable(
            "built without the `excel` feature".to_string(),
        ))
    }
}

#[cfg(feature = "excel")]
mod backend {
    use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet, XlsxError};

    use super::*;
    use crate::metrics::Status;
    use crate::report::{format_timestamp, REPORT_TITLE, SHEET_ISSUE_LIMIT};

    const HEADER_COLOR: u32 = 0x366092;

    fn spreadsheet_error(e: XlsxError) -> ReportError {
        ReportError::Spreadsheet(e.to_string())
    }

    fn header_format() -> Format {
        Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(Color::RGB(HEADER_COLOR))
            .set_align(FormatAlign::Center)
    }

    fn status_format(status: Status) -> Format {
        let (fill, font) = match status {
            Status::Success => (0xC6EFCE, 0x006100),
            Status::Failure => (0xFFC7CE, 0x9C0006),
            Status::Warning => (0xFFEB9C, 0x9C6500),
            Status::Skipped => (0xE7E6E6, 0x3A3838),
        };
        Format::new()
            .set_background_color(Color::RGB(fill))
            .set_font_color(Color::RGB(font))
    }

    pub fn write_workbook(metrics: &BatchMetrics, path: &Path) -> Result<(), ReportError> {
        let mut workbook = Workbook::new();

        let summary = workbook.add_worksheet();
        populate_summary(summary, metrics).map_err(spreadsheet_error)?;

        let details = workbook.add_worksheet();
        populate_details(details, metrics).map_err(spreadsheet_error)?;

        let issues = workbook.add_worksheet();
        populate_issues(issues, metrics).map_err(spreadsheet_error)?;

        workbook.save(path).map_err(|e| match e {
            XlsxError::IoError(source) => ReportError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => spreadsheet_error(other),
        })
    }

    fn populate_summary(sheet: &mut Worksheet, metrics: &BatchMetrics) -> Result<(), XlsxError> {
        let title = Format::new().set_bold().set_font_size(14);
        let section = Format::new().set_bold().set_font_size(12);
        let header = header_format();

        sheet.set_name("Summary")?;
        sheet.write_string_with_format(0, 0, REPORT_TITLE, &title)?;

        sheet.write_string_with_format(2, 0, "Batch Information", &section)?;
        sheet.write_string(3, 0, "Start Time")?;
        sheet.write_string(3, 1, format_timestamp(metrics.start_time()))?;
        sheet.write_string(4, 0, "End Time")?;
        sheet.write_string(
            4,
            1,
            metrics
                .end_time()
                .map(format_timestamp)
                .unwrap_or_else(|| "In Progress".to_string()),
        )?;
        sheet.write_string(5, 0, "Duration (seconds)")?;
        sheet.write_string(5, 1, format!("{:.2}", metrics.duration_seconds()))?;

        sheet.write_string_with_format(7, 0, "Processing Counts", &section)?;
        sheet.write_string_with_format(8, 0, "Metric", &header)?;
        sheet.write_string_with_format(8, 1, "Count", &header)?;

        let counts = [
            ("Total Files", metrics.total_files()),
            ("Successfully Processed", metrics.total_succeeded()),
            ("Skipped", metrics.total_skipped()),
            ("Warnings", metrics.total_warnings()),
            ("Failures", metrics.total_failures()),
            ("Total Records Processed", metrics.total_records()),
        ];
        for (offset, (label, value)) in counts.iter().enumerate() {
            let row = 9 + offset as u32;
            sheet.write_string(row, 0, *label)?;
            sheet.write_number(row, 1, *value as f64)?;
        }

        let bold = Format::new().set_bold();
        sheet.write_string_with_format(16, 0, "Success Rate", &bold)?;
        sheet.write_string(16, 1, format!("{:.2}%", metrics.success_rate()))?;

        sheet.set_column_width(0, 30)?;
        sheet.set_column_width(1, 20)?;
        Ok(())
    }

    fn populate_details(sheet: &mut Worksheet, metrics: &BatchMetrics) -> Result<(), XlsxError> {
        let header = header_format();

        sheet.set_name("Detailed Results")?;
        let headers = ["Filename", "Status", "Timestamp", "Records", "Error/Warning Message"];
        for (col, title) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (index, record) in metrics.records().iter().enumerate() {
            let row = index as u32 + 1;
            sheet.write_string(row, 0, &record.filename)?;
            sheet.write_string_with_format(
                row,
                1,
                record.status.label(),
                &status_format(record.status),
            )?;
            sheet.write_string(row, 2, format_timestamp(record.timestamp))?;
            sheet.write_number(row, 3, record.records_processed as f64)?;
            sheet.write_string(row, 4, record.message_or_empty())?;
        }

        for (col, width) in [30, 15, 20, 10, 60].iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
        sheet.set_freeze_panes(1, 0)?;
        Ok(())
    }

    fn populate_issues(sheet: &mut Worksheet, metrics: &BatchMetrics) -> Result<(), XlsxError> {
        let header = header_format();
        let section = Format::new().set_bold().set_font_size(12);

        sheet.set_name("Frequent Issues")?;
        sheet.write_string_with_format(0, 0, "Most Frequent Issues", &section)?;
        sheet.write_string_with_format(2, 0, "Issue Description", &header)?;
        sheet.write_string_with_format(2, 1, "Occurrences", &header)?;

        let issues = metrics.top_issues(SHEET_ISSUE_LIMIT);
        if issues.is_empty() {
            sheet.write_string(3, 0, "No issues recorded")?;
            sheet.write_number(3, 1, 0)?;
        }
        for (index, (issue, count)) in issues.iter().enumerate() {
            let row = index as u32 + 3;
            sheet.write_string(row, 0, format!("[{}x] {}", count, issue))?;
            sheet.write_number(row, 1, *count as f64)?;
        }

        sheet.set_column_width(0, 80)?;
        sheet.set_column_width(1, 15)?;
        sheet.set_freeze_panes(3, 0)?;
        Ok(())
    }
}
