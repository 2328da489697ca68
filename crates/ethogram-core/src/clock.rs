//! Wall-clock arithmetic for observation slots
//!
//! Slot keys are absolute `HH:MM` strings; column headers are elapsed
//! durations (`H:MM`) since session start. Both projections treat a time
//! earlier than the session start as belonging to the next day.
//!
//! Parsing never fails. Callers validate shape upstream, so any component
//! that does not parse as a number counts as zero. Out-of-range times
//! (`30:00`, `14:75`) are folded onto the 24-hour clock before slot
//! arithmetic, which bounds a session to less than two days of slots.

/// Spacing between report columns
pub const SLOT_STEP_MINUTES: u32 = 5;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes since midnight for an `HH:MM` string
///
/// Missing or unparsable components count as zero. Trailing components
/// (seconds) are ignored.
pub fn to_absolute_minutes(time: &str) -> u32 {
    let mut parts = time.split(':');
    let hours = parse_component(parts.next());
    let minutes = parse_component(parts.next());
    hours.saturating_mul(60).saturating_add(minutes)
}

fn parse_component(part: Option<&str>) -> u32 {
    part.and_then(|p| p.trim().parse().ok()).unwrap_or(0)
}

/// Every slot from `start` to `end` inclusive, `step_minutes` apart
///
/// An `end` earlier than `start` is taken to fall on the next day. Slots
/// past midnight are still labelled as wall-clock time (`00:05`, not `24:05`).
/// A zero step is treated as one minute.
pub fn enumerate_slots(start: &str, end: &str, step_minutes: u32) -> Vec<String> {
    let start_minutes = day_minutes(start);
    let end_minutes = session_end_minutes(start_minutes, day_minutes(end));
    let step = step_minutes.max(1) as usize;

    (start_minutes..=end_minutes)
        .step_by(step)
        .map(wall_clock)
        .collect()
}

/// Elapsed minutes from `start` to `time`, wrapping past midnight
pub fn elapsed_minutes(time: &str, start: &str) -> u32 {
    let start_minutes = day_minutes(start);
    session_end_minutes(start_minutes, day_minutes(time)) - start_minutes
}

/// Elapsed-duration label (`H:MM`) for `time` relative to `start`
///
/// ```rust
/// use ethogram_core::relative_label;
///
/// assert_eq!(relative_label("15:05", "14:00"), "1:05");
/// assert_eq!(relative_label("00:10", "23:50"), "0:20");
/// ```
pub fn relative_label(time: &str, start: &str) -> String {
    let elapsed = elapsed_minutes(time, start);
    format!("{}:{:02}", elapsed / 60, elapsed % 60)
}

/// Absolute minutes reduced to a single day
fn day_minutes(time: &str) -> u32 {
    to_absolute_minutes(time) % MINUTES_PER_DAY
}

// Both arguments are below one day, so the result never underflows `start`.
fn session_end_minutes(start: u32, end: u32) -> u32 {
    if end < start {
        end + MINUTES_PER_DAY
    } else {
        end
    }
}

fn wall_clock(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
