//! Fixed behavior catalog
//!
//! Report rows appear in exactly this order. The last entry is the
//! uncategorized catch-all whose code is the `"other"` sentinel.

use serde::Serialize;

use crate::OTHER;

/// A known behavior: stable code plus the label printed in the report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Behavior {
    pub code: &'static str,
    pub label: &'static str,
}

impl Behavior {
    const fn new(code: &'static str, label: &'static str) -> Self {
        Self { code, label }
    }
}

pub const BEHAVIOR_CATALOG: &[Behavior] = &[
    Behavior::new("eating_food_platform", "Eating - On Food Platform"),
    Behavior::new("eating_elsewhere", "Eating - Elsewhere (Note Location)"),
    Behavior::new("walking_ground", "Locomotion - Walking on Ground"),
    Behavior::new("walking_perch", "Locomotion - Walking on Perch (Note Location)"),
    Behavior::new("flying", "Locomotion - Flying"),
    Behavior::new("jumping", "Locomotion - Jumping"),
    Behavior::new(
        "repetitive_locomotion",
        "Repetitive Locomotion (Same movement 3+ times in a row)",
    ),
    Behavior::new(
        "drinking",
        "Drinking (Note source if not from the water bowl)",
    ),
    Behavior::new("bathing", "Bathing"),
    Behavior::new("preening", "Preening/Grooming (Note Location)"),
    Behavior::new(
        "repetitive_preening",
        "Repetitive Preening/Feather Damage (Plucking, Mutilation, Etc.)",
    ),
    Behavior::new("nesting", "Nesting"),
    Behavior::new("vocalizing", "Vocalizing"),
    Behavior::new(
        "resting_alert",
        "Resting on Perch/Ground - Alert (Note Location)",
    ),
    Behavior::new(
        "resting_not_alert",
        "Resting on Perch/Ground - Not Alert (Note Location)",
    ),
    Behavior::new(
        "resting_unknown",
        "Resting on Perch/Ground - Status Unknown (Note Location)",
    ),
    Behavior::new(
        "interacting_object",
        "Interacting with Inanimate Object (Note Object)",
    ),
    Behavior::new(
        "interacting_animal",
        "Interacting with Other Animal (Note Animal & Type of Interaction)",
    ),
    Behavior::new("aggression", "Aggression or Defensive Posturing"),
    Behavior::new("not_visible", "Not Visible"),
    Behavior::new(OTHER, "Other"),
];

/// Row index of `code`, if it is a catalog entry
pub fn position(code: &str) -> Option<usize> {
    BEHAVIOR_CATALOG.iter().position(|b| b.code == code)
}

/// Look up a behavior by code
pub fn lookup(code: &str) -> Option<&'static Behavior> {
    BEHAVIOR_CATALOG.iter().find(|b| b.code == code)
}
