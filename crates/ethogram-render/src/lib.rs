//! # ethogram-render
//!
//! Rendering backends for ethogram observation records.
//!
//! This crate provides:
//! - Excel ethogram reports (the fixed single-sheet observer layout)
//! - Notification emails that carry the report as an attachment
//! - Attachment filename generation
//!
//! ## Example
//!
//! ```rust,ignore
//! use ethogram_core::Renderer;
//! use ethogram_render::{report_filename, EmailRenderer, ExcelRenderer};
//!
//! let matrix = record.matrix();
//! let xlsx_bytes = ExcelRenderer::new().render(&record, &matrix)?;
//! let filename = report_filename(&record.patient, record.observation_date);
//!
//! let email = EmailRenderer::new()
//!     .render(&record)
//!     .attach(filename, xlsx_bytes);
//! ```

pub mod email;
pub mod excel;

pub use email::{Attachment, EmailMessage, EmailRenderer};
pub use excel::{CellStyle, ExcelRenderer, PlacedCell};

use chrono::NaiveDate;
use ethogram_core::{MatrixDiagnostics, ObservationRecord, RenderError, Renderer};

/// A rendered workbook ready to attach or serve
#[derive(Clone, Debug)]
pub struct Report {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Slot data that did not reach the sheet
    pub diagnostics: MatrixDiagnostics,
}

/// Build the matrix for `record` and render it to a named workbook
pub fn render_report(record: &ObservationRecord, renderer: &ExcelRenderer) -> Result<Report, RenderError> {
    let matrix = record.matrix();
    let bytes = renderer.render(record, &matrix)?;
    Ok(Report {
        filename: report_filename(&record.patient, record.observation_date),
        bytes,
        diagnostics: matrix.diagnostics,
    })
}

/// Attachment filename: `ethogram-<subject>-<date>.xlsx`
///
/// Anything other than ASCII letters, digits, `-` and `_` in the subject
/// becomes `_`.
pub fn report_filename(subject: &str, date: NaiveDate) -> String {
    format!(
        "ethogram-{}-{}.xlsx",
        sanitize_filename(subject),
        sanitize_filename(&date.format("%Y-%m-%d").to_string())
    )
}

fn sanitize_filename(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
