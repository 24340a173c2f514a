/// Minute-boundary notifier: picks at most one cue per wall-clock minute.
///
/// An event "ends" on the minute equal to its `end_minute`. When the minute
/// value changes, every event ending on the new minute is a candidate and the
/// one with the most urgent [`SoundEffect`](crate::schedule::SoundEffect) wins;
/// equal urgency falls back to schedule order. Seeing the same minute again,
/// on the next tick or after a clock correction, never fires twice in a row.
use crate::schedule::{Schedule, ScheduleEvent};

#[derive(Debug, Default, Clone)]
pub struct MinuteNotifier {
    last_minute: Option<u32>,
}

impl MinuteNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minute handled by the most recent change, if any tick has run yet.
    pub fn last_minute(&self) -> Option<u32> {
        self.last_minute
    }

    /// Records `minute` and, if it differs from the previous one, selects the
    /// event to sound for it.
    pub fn observe(&mut self, minute: u32, schedule: &Schedule) -> Option<&'static ScheduleEvent> {
        if self.last_minute == Some(minute) {
            return None;
        }
        self.last_minute = Some(minute);
        select_ending(schedule.events(), minute)
    }
}

/// The event ending at `minute` with the highest-priority cue. Ties keep the
/// earliest event in `events`.
pub fn select_ending(events: &[ScheduleEvent], minute: u32) -> Option<&ScheduleEvent> {
    events
        .iter()
        .filter(|e| e.end_minute == minute)
        .min_by_key(|e| e.sound_effect.priority())
}
