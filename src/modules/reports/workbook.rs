//! Spreadsheet layout of the circulation report.
//!
//! Three sheets, each written even when it has no data rows:
//!
//! - "Top Borrowers": one row per patron
//! - "Overdue List": one row per overdue loan
//! - "Fine Summary": a metric table, then fines by department, then fines by
//!   genre, separated by blank rows

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use shelfwise_models::{OverdueEntry, TopBorrower};

use crate::modules::analytics::aggregate::{FineGroup, FineSummary};

pub const TOP_BORROWERS_SHEET: &str = "Top Borrowers";
pub const OVERDUE_SHEET: &str = "Overdue List";
pub const FINE_SUMMARY_SHEET: &str = "Fine Summary";

/// Blank rows left between the tables on the fine summary sheet.
const TABLE_GAP: u32 = 2;

pub struct ReportData {
    pub top_borrowers: Vec<TopBorrower>,
    pub overdue: Vec<OverdueEntry>,
    pub fines: FineSummary,
}

fn money(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn write_header(
    sheet: &mut Worksheet,
    row: u32,
    columns: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *name, format)?;
    }
    Ok(())
}

fn write_optional(sheet: &mut Worksheet, row: u32, col: u16, value: Option<&str>) -> Result<(), XlsxError> {
    if let Some(value) = value {
        sheet.write_string(row, col, value)?;
    }
    Ok(())
}

fn top_borrowers_sheet(
    sheet: &mut Worksheet,
    rows: &[TopBorrower],
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(TOP_BORROWERS_SHEET)?;
    write_header(
        sheet,
        0,
        &["user_id", "loan_count", "total_fines", "name", "email", "department"],
        header,
    )?;

    for (i, borrower) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &borrower.user_id)?;
        sheet.write_number(row, 1, borrower.loan_count as f64)?;
        sheet.write_number(row, 2, money(borrower.total_fines))?;
        write_optional(sheet, row, 3, borrower.name.as_deref())?;
        write_optional(sheet, row, 4, borrower.email.as_deref())?;
        write_optional(sheet, row, 5, borrower.department.as_deref())?;
    }
    Ok(())
}

fn overdue_sheet(sheet: &mut Worksheet, rows: &[OverdueEntry], header: &Format) -> Result<(), XlsxError> {
    sheet.set_name(OVERDUE_SHEET)?;
    write_header(
        sheet,
        0,
        &[
            "transaction_id",
            "user_id",
            "user_name",
            "user_email",
            "book_id",
            "book_title",
            "issue_date",
            "due_date",
            "overdue_days",
            "fine_amount",
        ],
        header,
    )?;

    for (i, entry) in rows.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, &entry.transaction_id)?;
        sheet.write_string(row, 1, &entry.user_id)?;
        sheet.write_string(row, 2, &entry.user_name)?;
        sheet.write_string(row, 3, &entry.user_email)?;
        sheet.write_string(row, 4, &entry.book_id)?;
        sheet.write_string(row, 5, &entry.book_title)?;
        sheet.write_string(row, 6, entry.issue_date.to_rfc3339())?;
        sheet.write_string(row, 7, entry.due_date.to_rfc3339())?;
        sheet.write_number(row, 8, entry.overdue_days as f64)?;
        sheet.write_number(row, 9, money(entry.fine_amount))?;
    }
    Ok(())
}

/// Writes a two-column table starting at `start` and returns the first row
/// after it.
fn fine_table(
    sheet: &mut Worksheet,
    start: u32,
    label: &str,
    groups: &[FineGroup],
    header: &Format,
) -> Result<u32, XlsxError> {
    write_header(sheet, start, &[label, "Total Fines"], header)?;

    let mut row = start + 1;
    for group in groups {
        sheet.write_string(row, 0, &group.label)?;
        sheet.write_number(row, 1, money(group.total_fines))?;
        row += 1;
    }
    Ok(row)
}

fn fine_summary_sheet(
    sheet: &mut Worksheet,
    summary: &FineSummary,
    currency: &str,
    header: &Format,
) -> Result<(), XlsxError> {
    sheet.set_name(FINE_SUMMARY_SHEET)?;
    write_header(sheet, 0, &["Metric", "Value"], header)?;

    let metrics = [
        (
            "Total Fines Collected",
            format!("{currency}{:.2}", summary.total_fines),
        ),
        ("Total Transactions", summary.total_transactions.to_string()),
        (
            "Average Fine per Transaction",
            format!("{currency}{:.2}", summary.average_fine),
        ),
    ];
    for (i, (metric, value)) in metrics.iter().enumerate() {
        let row = i as u32 + 1;
        sheet.write_string(row, 0, *metric)?;
        sheet.write_string(row, 1, value)?;
    }

    let next = metrics.len() as u32 + 1 + TABLE_GAP;
    let next = fine_table(sheet, next, "Department", &summary.by_department, header)? + TABLE_GAP;
    fine_table(sheet, next, "Genre", &summary.by_genre, header)?;
    Ok(())
}

/// Renders the report and returns the `.xlsx` file bytes.
pub fn render(data: &ReportData, currency: &str) -> Result<Vec<u8>, XlsxError> {
    let header = Format::new().set_bold();
    let mut workbook = Workbook::new();

    top_borrowers_sheet(workbook.add_worksheet(), &data.top_borrowers, &header)?;
    overdue_sheet(workbook.add_worksheet(), &data.overdue, &header)?;
    fine_summary_sheet(workbook.add_worksheet(), &data.fines, currency, &header)?;

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_summary() -> FineSummary {
        FineSummary {
            total_fines: Decimal::ZERO,
            total_transactions: 0,
            average_fine: Decimal::ZERO,
            by_department: vec![],
            by_genre: vec![],
        }
    }

    #[test]
    fn test_render_empty_report_is_a_zip() {
        let data = ReportData {
            top_borrowers: vec![],
            overdue: vec![],
            fines: empty_summary(),
        };

        let bytes = render(&data, "₹").unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_render_with_rows() {
        let data = ReportData {
            top_borrowers: vec![TopBorrower {
                user_id: "U1".into(),
                loan_count: 3,
                total_fines: Decimal::new(1250, 2),
                name: None,
                email: Some("a@example.com".into()),
                department: Some("MBA".into()),
            }],
            overdue: vec![],
            fines: FineSummary {
                by_department: vec![FineGroup {
                    label: "MBA".into(),
                    total_fines: Decimal::new(1250, 2),
                }],
                ..empty_summary()
            },
        };

        let bytes = render(&data, "$").unwrap();
        assert!(bytes.len() > 100);
    }
}
