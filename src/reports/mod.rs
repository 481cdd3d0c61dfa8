//! Downloadable documents: per-project and top-10 HTML reports, and the
//! approved-projects workbook.

pub mod html;
pub mod xlsx;

pub use html::{project_report, top10_report};
pub use xlsx::approved_workbook;

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const APPROVED_FILENAME: &str = "proyectos_aprobados.xlsx";

/// "Sí"/"No" for boolean fields shown in reports.
pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "Sí"
    } else {
        "No"
    }
}
