//! Cell content for a populated (behavior, slot) intersection

use crate::{SubjectObservation, OTHER};

/// First line of every populated cell
pub const PRESENCE_MARKER: &str = "x";

/// Resolve a choice field paired with its free-text escape hatch
///
/// - empty `primary` means the field is absent
/// - `"other"` yields the free text, or `"other"` itself when none was given
/// - anything else is returned as-is and `override_value` is ignored
pub fn resolve<'a>(primary: &'a str, override_value: &'a str) -> Option<&'a str> {
    match primary {
        "" => None,
        OTHER if override_value.is_empty() => Some(OTHER),
        OTHER => Some(override_value),
        value => Some(value),
    }
}

fn present(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

/// Multi-line cell text for one observation
///
/// Always starts with the presence marker; each annotation line follows in
/// a fixed order and only when its value is non-empty.
pub fn format_cell(observation: &SubjectObservation) -> String {
    let annotations = [
        ("Loc", present(&observation.location)),
        ("Object", observation.resolved_object()),
        ("Animal", observation.resolved_animal()),
        ("Interaction", observation.resolved_interaction()),
        ("Description", present(&observation.description)),
        ("Notes", present(&observation.notes)),
    ];

    let mut lines = vec![PRESENCE_MARKER.to_string()];
    lines.extend(
        annotations
            .iter()
            .filter_map(|(label, value)| value.map(|v| format!("{label}: {v}"))),
    );
    lines.join("\n")
}
