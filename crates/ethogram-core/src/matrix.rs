//! Time-slot matrix builder
//!
//! Turns the sparse slot map of a session into a dense grid: one column
//! per 5-minute slot between start and end (inclusive), one row per
//! catalog behavior, and formatted text wherever the observation recorded
//! at a slot matches a row.
//!
//! # Lookup rules
//!
//! - Columns are re-derived from the session window. Map keys that are
//!   off the 5-minute grid or outside the window are never visited.
//! - Only the first observation at a slot is considered. Later entries
//!   are not merged, even when they match a different row.
//! - An observation whose behavior is not in the catalog fills no cell.
//!
//! None of these are errors. They are counted in [`MatrixDiagnostics`]
//! so callers can detect data that did not reach the report.

use serde::Serialize;
use std::collections::HashSet;

use crate::catalog::{self, Behavior, BEHAVIOR_CATALOG};
use crate::cell::format_cell;
use crate::clock::{enumerate_slots, relative_label, SLOT_STEP_MINUTES};
use crate::{SessionMetadata, SlotEntry, TimeKey, TimeSlotMap};

/// One time column: absolute lookup key and elapsed display label
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SlotColumn {
    /// Wall-clock key into the slot map (`HH:MM`)
    pub key: TimeKey,
    /// Elapsed time since session start (`H:MM`)
    pub label: String,
}

/// A populated intersection
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatrixCell {
    pub row: usize,
    pub column: usize,
    pub content: String,
}

/// Slot data that did not make it into the grid
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MatrixDiagnostics {
    /// Map keys absent from the enumerated columns, sorted
    pub dropped_slot_keys: Vec<TimeKey>,
    /// Observations after the first at a visited slot
    pub shadowed_observations: usize,
    /// Behavior codes at visited slots that match no catalog row
    pub unmatched_behaviors: Vec<String>,
}

impl MatrixDiagnostics {
    /// True when every observation in the map was considered for a cell
    pub fn is_clean(&self) -> bool {
        self.dropped_slot_keys.is_empty()
            && self.shadowed_observations == 0
            && self.unmatched_behaviors.is_empty()
    }
}

/// Behavior rows × time-slot columns
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Matrix {
    pub columns: Vec<SlotColumn>,
    pub rows: Vec<Behavior>,
    /// Populated cells in column order
    cells: Vec<MatrixCell>,
    pub diagnostics: MatrixDiagnostics,
}

impl Matrix {
    /// Build the grid for one session
    ///
    /// Pure: the same inputs always produce the same matrix.
    pub fn build(metadata: &SessionMetadata, slots: &TimeSlotMap) -> Self {
        let columns: Vec<SlotColumn> =
            enumerate_slots(&metadata.start_time, &metadata.end_time, SLOT_STEP_MINUTES)
                .into_iter()
                .map(|key| SlotColumn {
                    label: relative_label(&key, &metadata.start_time),
                    key,
                })
                .collect();

        let mut cells = Vec::new();
        let mut diagnostics = MatrixDiagnostics::default();

        for (column, slot) in columns.iter().enumerate() {
            let SlotEntry::Occupied { first, shadowed } = slots.entry(&slot.key) else {
                continue;
            };
            diagnostics.shadowed_observations += shadowed;

            match catalog::position(&first.behavior) {
                Some(row) => cells.push(MatrixCell {
                    row,
                    column,
                    content: format_cell(first),
                }),
                None => diagnostics.unmatched_behaviors.push(first.behavior.clone()),
            }
        }

        let visited: HashSet<&str> = columns.iter().map(|c| c.key.as_str()).collect();
        let mut dropped: Vec<TimeKey> = slots
            .keys()
            .filter(|key| !visited.contains(key))
            .map(str::to_string)
            .collect();
        dropped.sort();
        diagnostics.dropped_slot_keys = dropped;

        Self {
            columns,
            rows: BEHAVIOR_CATALOG.to_vec(),
            cells,
            diagnostics,
        }
    }

    /// Elapsed-time header labels in column order
    pub fn column_labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Behavior labels in row order
    pub fn row_labels(&self) -> Vec<&str> {
        self.rows.iter().map(|b| b.label).collect()
    }

    /// Content at (`row`, `column`), if populated
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.column == column)
            .map(|c| c.content.as_str())
    }

    /// Content at the row for behavior `code` and `column`
    pub fn cell_for(&self, code: &str, column: usize) -> Option<&str> {
        let row = self.rows.iter().position(|b| b.code == code)?;
        self.cell(row, column)
    }

    /// All populated cells in column order
    pub fn cells(&self) -> &[MatrixCell] {
        &self.cells
    }
}
