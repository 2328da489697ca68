//! # ethogram-core
//!
//! Core domain model and time-slot matrix builder for behavioral
//! observation (ethogram) reports.
//!
//! This crate provides:
//! - Domain types: `SessionMetadata`, `SubjectObservation`, `TimeSlotMap`, `ObservationRecord`
//! - The fixed behavior catalog that defines report rows
//! - Clock arithmetic for 5-minute slots, including sessions that cross midnight
//! - The `Matrix` builder that turns sparse slot data into a behavior × time grid
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ethogram_core::{Matrix, ObservationMode, SessionMetadata, SubjectObservation, TimeSlotMap};
//!
//! let metadata = SessionMetadata {
//!     observer_name: "Alice".into(),
//!     date: NaiveDate::from_ymd_opt(2025, 11, 29).unwrap(),
//!     start_time: "14:00".into(),
//!     end_time: "14:10".into(),
//!     location: "Sayyida's Cove".into(),
//!     subject_id: "Sayyida".into(),
//!     mode: ObservationMode::Live,
//! };
//!
//! let mut slots = TimeSlotMap::new();
//! slots.insert("14:05", SubjectObservation::new("flying"));
//!
//! let matrix = Matrix::build(&metadata, &slots);
//! assert_eq!(matrix.column_labels(), vec!["0:00", "0:05", "0:10"]);
//! assert_eq!(matrix.cell_for("flying", 1), Some("x"));
//! ```

pub mod catalog;
pub mod cell;
pub mod clock;
pub mod matrix;

pub use catalog::{Behavior, BEHAVIOR_CATALOG};
pub use cell::{format_cell, resolve, PRESENCE_MARKER};
pub use clock::{enumerate_slots, relative_label, to_absolute_minutes, SLOT_STEP_MINUTES};
pub use matrix::{Matrix, MatrixCell, MatrixDiagnostics, SlotColumn};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Reserved enum value meaning "see the paired free-text field"
pub const OTHER: &str = "other";

/// Subject id used while submissions carry a single, implicit subject
pub const DEFAULT_SUBJECT_ID: &str = "Sayyida";

/// Absolute wall-clock slot key, formatted `HH:MM`
pub type TimeKey = String;

// ============================================================================
// Session
// ============================================================================

/// Whether the session was observed live or reviewed from recorded video
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationMode {
    #[default]
    Live,
    Vod,
}

impl ObservationMode {
    /// Wire value (`live` / `vod`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationMode::Live => "live",
            ObservationMode::Vod => "vod",
        }
    }

    /// Human-readable name used in notifications
    pub fn display_name(&self) -> &'static str {
        match self {
            ObservationMode::Live => "Live",
            ObservationMode::Vod => "VOD",
        }
    }
}

impl std::fmt::Display for ObservationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Session-level facts shown in the report header
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub observer_name: String,
    pub date: NaiveDate,
    /// Session start, `HH:MM` (24-hour)
    pub start_time: String,
    /// Session end, `HH:MM` (24-hour); earlier than start means next day
    pub end_time: String,
    /// Free-text location label (aviary)
    pub location: String,
    pub subject_id: String,
    pub mode: ObservationMode,
}

// ============================================================================
// Observations
// ============================================================================

/// Kind of subject being observed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    #[default]
    FosterParent,
    Baby,
    Juvenile,
    /// Any tag outside the known kinds; the observation is still reported
    #[serde(other)]
    Unknown,
}

/// One behavioral event for one subject at one time slot
///
/// String fields are empty when absent, matching the persisted JSON.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectObservation {
    #[serde(rename = "subjectType")]
    pub subject_kind: SubjectKind,
    pub subject_id: String,
    /// Catalog code, or `"other"` for uncategorized behavior
    pub behavior: String,
    pub location: String,
    pub notes: String,
    pub object: String,
    pub object_other: String,
    pub animal: String,
    pub animal_other: String,
    pub interaction_type: String,
    pub interaction_type_other: String,
    /// Free text describing an uncategorized behavior
    pub description: String,
}

impl SubjectObservation {
    pub fn new(behavior: impl Into<String>) -> Self {
        Self {
            subject_id: DEFAULT_SUBJECT_ID.into(),
            behavior: behavior.into(),
            ..Default::default()
        }
    }

    /// Tag the observed subject
    pub fn subject(mut self, kind: SubjectKind, id: impl Into<String>) -> Self {
        self.subject_kind = kind;
        self.subject_id = id.into();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Set the object pair; `other_text` only counts when `object` is `"other"`
    pub fn object(mut self, object: impl Into<String>, other_text: impl Into<String>) -> Self {
        self.object = object.into();
        self.object_other = other_text.into();
        self
    }

    pub fn animal(mut self, animal: impl Into<String>, other_text: impl Into<String>) -> Self {
        self.animal = animal.into();
        self.animal_other = other_text.into();
        self
    }

    pub fn interaction(mut self, kind: impl Into<String>, other_text: impl Into<String>) -> Self {
        self.interaction_type = kind.into();
        self.interaction_type_other = other_text.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn resolved_object(&self) -> Option<&str> {
        resolve(&self.object, &self.object_other)
    }

    pub fn resolved_animal(&self) -> Option<&str> {
        resolve(&self.animal, &self.animal_other)
    }

    pub fn resolved_interaction(&self) -> Option<&str> {
        resolve(&self.interaction_type, &self.interaction_type_other)
    }
}

/// Single-subject observation as sent by the submission form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlatObservation {
    pub behavior: String,
    pub location: String,
    pub notes: String,
    pub object: String,
    pub object_other: String,
    pub animal: String,
    pub animal_other: String,
    pub interaction_type: String,
    pub interaction_type_other: String,
    pub description: String,
}

impl FlatObservation {
    /// Attach subject tagging to produce a full observation
    pub fn into_subject(self, kind: SubjectKind, id: &str) -> SubjectObservation {
        SubjectObservation {
            subject_kind: kind,
            subject_id: id.to_string(),
            behavior: self.behavior,
            location: self.location,
            notes: self.notes,
            object: self.object,
            object_other: self.object_other,
            animal: self.animal,
            animal_other: self.animal_other,
            interaction_type: self.interaction_type,
            interaction_type_other: self.interaction_type_other,
            description: self.description,
        }
    }
}

// ============================================================================
// Time-Slot Map
// ============================================================================

/// What a time-slot lookup found
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotEntry<'a> {
    /// Key absent, or present with no observations
    Empty,
    /// The first observation at the slot, plus how many follow it
    Occupied {
        first: &'a SubjectObservation,
        shadowed: usize,
    },
}

/// Sparse map from `HH:MM` to the observations recorded at that instant
///
/// Keys need not be contiguous or on the 5-minute grid. Iteration order
/// carries no meaning; report columns are derived from the session window.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSlotMap {
    slots: HashMap<TimeKey, Vec<SubjectObservation>>,
}

impl TimeSlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap flat per-slot submissions as single-element lists for one subject
    pub fn from_flat(
        flat: HashMap<TimeKey, FlatObservation>,
        kind: SubjectKind,
        subject_id: &str,
    ) -> Self {
        let slots = flat
            .into_iter()
            .map(|(key, obs)| (key, vec![obs.into_subject(kind, subject_id)]))
            .collect();
        Self { slots }
    }

    /// Append an observation at `key`
    pub fn insert(&mut self, key: impl Into<TimeKey>, observation: SubjectObservation) {
        self.slots.entry(key.into()).or_default().push(observation);
    }

    pub fn get(&self, key: &str) -> Option<&[SubjectObservation]> {
        self.slots.get(key).map(Vec::as_slice)
    }

    pub fn entry(&self, key: &str) -> SlotEntry<'_> {
        match self.get(key) {
            Some([first, rest @ ..]) => SlotEntry::Occupied {
                first,
                shadowed: rest.len(),
            },
            _ => SlotEntry::Empty,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<(TimeKey, SubjectObservation)> for TimeSlotMap {
    fn from_iter<I: IntoIterator<Item = (TimeKey, SubjectObservation)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, observation) in iter {
            map.insert(key, observation);
        }
        map
    }
}

// ============================================================================
// Observation Record
// ============================================================================

fn default_subject_id() -> String {
    DEFAULT_SUBJECT_ID.into()
}

/// A persisted submission, as handed over by the submission service
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    /// Opaque record id
    #[serde(default)]
    pub id: Option<String>,
    pub observer_name: String,
    pub observation_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub aviary: String,
    #[serde(default = "default_subject_id")]
    pub patient: String,
    pub mode: ObservationMode,
    #[serde(default)]
    pub babies_present: u32,
    #[serde(default)]
    pub environmental_notes: Option<String>,
    #[serde(default)]
    pub time_slots: TimeSlotMap,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl ObservationRecord {
    /// Project the header-level session facts
    pub fn metadata(&self) -> SessionMetadata {
        SessionMetadata {
            observer_name: self.observer_name.clone(),
            date: self.observation_date,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            location: self.aviary.clone(),
            subject_id: self.patient.clone(),
            mode: self.mode,
        }
    }

    /// Build the behavior × time grid for this record
    pub fn matrix(&self) -> Matrix {
        Matrix::build(&self.metadata(), &self.time_slots)
    }
}

/// Submission form payload: one flat observation per slot
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub observer_name: String,
    pub observation_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub aviary: String,
    pub mode: ObservationMode,
    #[serde(default)]
    pub babies_present: u32,
    #[serde(default)]
    pub environmental_notes: Option<String>,
    #[serde(default)]
    pub time_slots: HashMap<TimeKey, FlatObservation>,
    #[serde(default)]
    pub emails: Vec<String>,
}

impl SubmissionRequest {
    /// Convert to the persisted shape, tagging every slot with the default subject
    pub fn into_record(self) -> ObservationRecord {
        ObservationRecord {
            id: None,
            observer_name: self.observer_name,
            observation_date: self.observation_date,
            start_time: self.start_time,
            end_time: self.end_time,
            aviary: self.aviary,
            patient: DEFAULT_SUBJECT_ID.into(),
            mode: self.mode,
            babies_present: self.babies_present,
            environmental_notes: self.environmental_notes,
            time_slots: TimeSlotMap::from_flat(
                self.time_slots,
                SubjectKind::FosterParent,
                DEFAULT_SUBJECT_ID,
            ),
            emails: self.emails,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a record and its prebuilt matrix to the output format
    fn render(&self, record: &ObservationRecord, matrix: &Matrix) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn observation_builder() {
        let obs = SubjectObservation::new("interacting_object")
            .location("GROUND")
            .object("other", "Custom toy")
            .notes("Playing");

        assert_eq!(obs.behavior, "interacting_object");
        assert_eq!(obs.subject_id, DEFAULT_SUBJECT_ID);
        assert_eq!(obs.subject_kind, SubjectKind::FosterParent);
        assert_eq!(obs.resolved_object(), Some("Custom toy"));
        assert_eq!(obs.resolved_animal(), None);
    }

    #[test]
    fn slot_entry_reports_shadowed() {
        let mut slots = TimeSlotMap::new();
        slots.insert("14:00", SubjectObservation::new("flying"));
        slots.insert("14:00", SubjectObservation::new("preening"));
        slots.insert("14:00", SubjectObservation::new("drinking"));

        match slots.entry("14:00") {
            SlotEntry::Occupied { first, shadowed } => {
                assert_eq!(first.behavior, "flying");
                assert_eq!(shadowed, 2);
            }
            SlotEntry::Empty => panic!("expected occupied slot"),
        }
        assert_eq!(slots.entry("14:05"), SlotEntry::Empty);
    }

    #[test]
    fn empty_list_is_empty_slot() {
        let json = r#"{"14:00": []}"#;
        let slots: TimeSlotMap = serde_json::from_str(json).unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.entry("14:00"), SlotEntry::Empty);
    }

    #[test]
    fn record_deserializes_wire_format() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "observerName": "Alice",
            "observationDate": "2025-11-29",
            "startTime": "15:00",
            "endTime": "15:10",
            "aviary": "Sayyida's Cove",
            "mode": "vod",
            "environmentalNotes": "Rain",
            "timeSlots": {
                "15:00": [{
                    "subjectType": "foster_parent",
                    "subjectId": "Sayyida",
                    "behavior": "interacting_animal",
                    "location": "12",
                    "notes": "",
                    "animal": "other",
                    "animalOther": "Squirrel",
                    "interactionType": "watching"
                }]
            },
            "emails": ["a@example.com"]
        }"#;

        let record: ObservationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.mode, ObservationMode::Vod);
        assert_eq!(record.patient, DEFAULT_SUBJECT_ID);
        assert_eq!(record.babies_present, 0);

        let obs = &record.time_slots.get("15:00").unwrap()[0];
        assert_eq!(obs.resolved_animal(), Some("Squirrel"));
        assert_eq!(obs.resolved_interaction(), Some("watching"));
        assert_eq!(obs.object, "");

        let metadata = record.metadata();
        assert_eq!(metadata.location, "Sayyida's Cove");
        assert_eq!(metadata.date, NaiveDate::from_ymd_opt(2025, 11, 29).unwrap());
    }

    #[test]
    fn submission_wraps_flat_slots() {
        let json = r#"{
            "observerName": "Bob",
            "observationDate": "2025-11-24",
            "startTime": "09:00",
            "endTime": "09:30",
            "aviary": "Flight Cage",
            "mode": "live",
            "timeSlots": {
                "09:00": {"behavior": "preening", "location": "4"},
                "09:05": {"behavior": "flying"}
            }
        }"#;

        let request: SubmissionRequest = serde_json::from_str(json).unwrap();
        let record = request.into_record();

        assert_eq!(record.time_slots.len(), 2);
        let obs = record.time_slots.get("09:00").unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs[0].subject_id, DEFAULT_SUBJECT_ID);
        assert_eq!(obs[0].subject_kind, SubjectKind::FosterParent);
        assert_eq!(obs[0].location, "4");
    }

    #[test]
    fn mode_display() {
        assert_eq!(ObservationMode::Live.to_string(), "Live");
        assert_eq!(ObservationMode::Vod.to_string(), "VOD");
        assert_eq!(ObservationMode::Vod.as_str(), "vod");
    }

    #[test]
    fn unknown_subject_kind_keeps_the_record() {
        let json = r#"{
            "observerName": "Bob",
            "observationDate": "2025-11-24",
            "startTime": "09:00",
            "endTime": "09:05",
            "aviary": "Flight Cage",
            "mode": "vod",
            "timeSlots": {
                "09:00": [{"subjectType": "sibling", "behavior": "preening"}]
            }
        }"#;

        let record: ObservationRecord = serde_json::from_str(json).unwrap();
        let obs = record.time_slots.get("09:00").unwrap();
        assert_eq!(obs[0].subject_kind, SubjectKind::Unknown);
        assert_eq!(record.matrix().cell_for("preening", 0), Some("x"));
    }
}
