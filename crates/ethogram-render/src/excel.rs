//! Excel ethogram report renderer
//!
//! Lays a behavior × time matrix onto the single-sheet layout used by the
//! rehabilitation observers:
//!
//! ```text
//! | A                              | B          | C          | ... | J            | K             |
//! |--------------------------------|------------|------------|-----|--------------|---------------|
//! | Rehabilitation Raptor Ethogram | Date:      | 2025-11-29 |     | Time Window: | 15:00 - 15:10 |
//! | Aviary: Sayyida's Cove         | Patient(s): Sayyida     |     | Observer:    | Alice         |
//! |                                | Time:      |            |     |              |               |
//! |                                | 0:00       | 0:05       | ... |              |               |
//! | Eating - On Food Platform      |            |            |     |              |               |
//! | ...                            | x          |            |     |              |               |
//! |                                |            |            |     |              |               |
//! | Comments (...):                |            |            |     |              |               |
//! ```
//!
//! The header block sits at fixed positions; everything from row 4 down is
//! driven by the matrix. Panes are frozen below the slot header row and to
//! the right of the behavior labels.

use ethogram_core::{Matrix, ObservationRecord, RenderError, Renderer};
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

/// Header text for the trailing comments row
pub const COMMENTS_LABEL: &str = "Comments (Abnormal Environmental Factors, Plant Growth, Etc):";

/// Zero-based row of the relative-time header
const SLOT_HEADER_ROW: u32 = 3;
/// Zero-based row of the first behavior
const FIRST_BEHAVIOR_ROW: u32 = 4;
/// Zero-based column of the first time slot
const FIRST_SLOT_COLUMN: u16 = 1;
/// Blank rows between the last behavior and the comments row
const COMMENTS_GAP: u32 = 2;
/// Last column index Excel accepts
const MAX_COLUMN: u16 = 16_383;

/// Presentation role of a placed cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStyle {
    Title,
    Label,
    Plain,
    SlotHeader,
    BehaviorLabel,
    Observation,
    Comments,
}

/// A value at an absolute sheet position (zero-based)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacedCell {
    pub row: u32,
    pub col: u16,
    pub text: String,
    pub style: CellStyle,
}

impl PlacedCell {
    fn new(row: u32, col: u16, text: impl Into<String>, style: CellStyle) -> Self {
        Self {
            row,
            col,
            text: text.into(),
            style,
        }
    }
}

/// Excel ethogram report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Report title in A1
    pub title: String,
    /// Worksheet name
    pub sheet_name: String,
    /// Width of the behavior label column
    pub label_column_width: f64,
    /// Width of each time-slot column
    pub slot_column_width: f64,
    /// Whether to freeze the header rows and label column
    pub freeze_header: bool,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            title: "Rehabilitation Raptor Ethogram".into(),
            sheet_name: "Ethogram Data".into(),
            label_column_width: 50.0,
            slot_column_width: 12.0,
            freeze_header: true,
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the report title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the behavior label column width
    pub fn label_width(mut self, width: f64) -> Self {
        self.label_column_width = width;
        self
    }

    /// Set the time-slot column width
    pub fn slot_width(mut self, width: f64) -> Self {
        self.slot_column_width = width;
        self
    }

    /// Leave panes unfrozen
    pub fn no_freeze(mut self) -> Self {
        self.freeze_header = false;
        self
    }

    /// Zero-based row of the comments cell for a matrix with `behaviors` rows
    pub fn comments_row(behaviors: usize) -> u32 {
        FIRST_BEHAVIOR_ROW + behaviors as u32 + COMMENTS_GAP
    }

    /// Compute every cell of the sheet without touching a workbook
    pub fn layout(&self, record: &ObservationRecord, matrix: &Matrix) -> Vec<PlacedCell> {
        let mut cells = vec![
            PlacedCell::new(0, 0, &self.title, CellStyle::Title),
            PlacedCell::new(0, 1, "Date:", CellStyle::Label),
            PlacedCell::new(
                0,
                2,
                record.observation_date.format("%Y-%m-%d").to_string(),
                CellStyle::Plain,
            ),
            PlacedCell::new(0, 9, "Time Window:", CellStyle::Label),
            PlacedCell::new(
                0,
                10,
                format!("{} - {}", record.start_time, record.end_time),
                CellStyle::Plain,
            ),
            PlacedCell::new(1, 0, format!("Aviary: {}", record.aviary), CellStyle::Label),
            PlacedCell::new(1, 1, format!("Patient(s): {}", record.patient), CellStyle::Label),
            PlacedCell::new(1, 9, "Observer:", CellStyle::Label),
            PlacedCell::new(1, 10, &record.observer_name, CellStyle::Plain),
            PlacedCell::new(2, 1, "Time:", CellStyle::Label),
        ];

        for (i, column) in matrix.columns.iter().enumerate() {
            cells.push(PlacedCell::new(
                SLOT_HEADER_ROW,
                slot_column(i),
                &column.label,
                CellStyle::SlotHeader,
            ));
        }

        for (i, behavior) in matrix.rows.iter().enumerate() {
            cells.push(PlacedCell::new(
                FIRST_BEHAVIOR_ROW + i as u32,
                0,
                behavior.label,
                CellStyle::BehaviorLabel,
            ));
        }

        for cell in matrix.cells() {
            cells.push(PlacedCell::new(
                FIRST_BEHAVIOR_ROW + cell.row as u32,
                slot_column(cell.column),
                &cell.content,
                CellStyle::Observation,
            ));
        }

        let comments = match record.environmental_notes.as_deref() {
            Some(notes) if !notes.is_empty() => format!("{COMMENTS_LABEL}\n{notes}"),
            _ => COMMENTS_LABEL.to_string(),
        };
        cells.push(PlacedCell::new(
            Self::comments_row(matrix.rows.len()),
            0,
            comments,
            CellStyle::Comments,
        ));

        cells
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(
        &self,
        record: &ObservationRecord,
        matrix: &Matrix,
    ) -> Result<Vec<u8>, RenderError> {
        check_slot_count(matrix.columns.len())?;

        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(&self.sheet_name)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for cell in self.layout(record, matrix) {
            sheet
                .write_string_with_format(cell.row, cell.col, &cell.text, formats.get(cell.style))
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        self.apply_column_widths(sheet, matrix.columns.len())?;

        if self.freeze_header {
            sheet
                .set_freeze_panes(FIRST_BEHAVIOR_ROW, FIRST_SLOT_COLUMN)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        tracing::debug!(
            columns = matrix.columns.len(),
            cells = matrix.cells().len(),
            bytes = buffer.len(),
            "rendered ethogram workbook"
        );

        Ok(buffer)
    }

    fn apply_column_widths(&self, sheet: &mut Worksheet, slots: usize) -> Result<(), RenderError> {
        sheet
            .set_column_width(0, self.label_column_width)
            .map_err(|e| RenderError::Format(e.to_string()))?;
        for i in 0..slots {
            sheet
                .set_column_width(slot_column(i), self.slot_column_width)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }
        Ok(())
    }

    /// Create reusable formats
    fn create_formats(&self) -> ReportFormats {
        let title = Format::new().set_bold().set_font_size(14);

        let label = Format::new().set_bold();

        let plain = Format::new();

        let slot_header = Format::new().set_bold().set_align(FormatAlign::Center);

        let behavior_label = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::VerticalCenter);

        let observation = Format::new().set_text_wrap().set_align(FormatAlign::Top);

        let comments = Format::new()
            .set_bold()
            .set_text_wrap()
            .set_align(FormatAlign::Top);

        ReportFormats {
            title,
            label,
            plain,
            slot_header,
            behavior_label,
            observation,
            comments,
        }
    }
}

/// Slot `n` lands in column `FIRST_SLOT_COLUMN + n`, which must not pass `MAX_COLUMN`
fn check_slot_count(slots: usize) -> Result<(), RenderError> {
    let capacity = usize::from(MAX_COLUMN - FIRST_SLOT_COLUMN) + 1;
    if slots > capacity {
        return Err(RenderError::InvalidData(format!(
            "{slots} time slots exceed the sheet column limit of {capacity}"
        )));
    }
    Ok(())
}

fn slot_column(index: usize) -> u16 {
    FIRST_SLOT_COLUMN + index as u16
}

/// Reusable Excel formats
struct ReportFormats {
    title: Format,
    label: Format,
    plain: Format,
    slot_header: Format,
    behavior_label: Format,
    observation: Format,
    comments: Format,
}

impl ReportFormats {
    fn get(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Title => &self.title,
            CellStyle::Label => &self.label,
            CellStyle::Plain => &self.plain,
            CellStyle::SlotHeader => &self.slot_header,
            CellStyle::BehaviorLabel => &self.behavior_label,
            CellStyle::Observation => &self.observation,
            CellStyle::Comments => &self.comments,
        }
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, record: &ObservationRecord, matrix: &Matrix) -> Result<Vec<u8>, RenderError> {
        let diagnostics = &matrix.diagnostics;
        if !diagnostics.is_clean() {
            tracing::warn!(
                record = record.id.as_deref().unwrap_or("-"),
                dropped_slots = ?diagnostics.dropped_slot_keys,
                shadowed = diagnostics.shadowed_observations,
                unmatched = ?diagnostics.unmatched_behaviors,
                "observations left out of the report"
            );
        }
        self.render_to_bytes(record, matrix)
    }
}
