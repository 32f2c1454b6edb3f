//! Google Calendar color id to hex color mapping.

/// Fallback for events without a recognized color id.
pub const DEFAULT_EVENT_COLOR: &str = "#4F46E5";

/// Returns the hex color for a Google Calendar color id (1-11), or the
/// default color.
pub fn event_color(color_id: Option<&str>) -> &'static str {
    match color_id {
        Some("1") => "#7986cb",
        Some("2") => "#33b679",
        Some("3") => "#8e24aa",
        Some("4") => "#e67c73",
        Some("5") => "#f6c026",
        Some("6") => "#f5511d",
        Some("7") => "#039be5",
        Some("8") => "#616161",
        Some("9") => "#3f51b5",
        Some("10") => "#0b8043",
        Some("11") => "#d60000",
        _ => DEFAULT_EVENT_COLOR,
    }
}
