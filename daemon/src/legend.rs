/// Textual legend listing the routine in the order the child lives it.
use std::fmt::Write;

use crate::schedule::{Schedule, ScheduleEvent, LEAVE_ID, WAKEUP_ID};

pub const TITLE: &str = "Dein Morgen ☀️";

/// Wake-up first, then the zones in rotated start order, leave last.
pub fn ordered(schedule: &Schedule) -> Vec<&'static ScheduleEvent> {
    let mut events: Vec<_> = schedule.events().iter().collect();
    events.sort_by_key(|e| {
        let rank = match e.id {
            WAKEUP_ID => 0,
            LEAVE_ID => 2,
            _ => 1,
        };
        (rank, e.effective_start())
    });
    events
}

/// `"25 - 40"` for ranges, `"25"` for points.
pub fn time_span(event: &ScheduleEvent) -> String {
    if event.is_range() {
        format!("{:02} - {:02}", event.start_minute, event.end_minute)
    } else {
        format!("{:02}", event.start_minute)
    }
}

/// Plain-text rendering, one event per line.
pub fn render(schedule: &Schedule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    for event in ordered(schedule) {
        let length = match event.span_minutes() {
            0 => String::new(),
            n => format!(", {n} min"),
        };
        let _ = writeln!(
            out,
            "{:<8} {:<10} {}  ({}{length})",
            time_span(event),
            event.icon,
            event.description,
            event.sound_effect
        );
    }
    out
}
