/// The morning routine: a fixed, compile-time list of zones and markers laid out
/// on the 60-minute dial.
///
/// Range events are expected to tile the hour exactly once. That is an authoring
/// contract and nothing here rejects a schedule that breaks it. [`Schedule::coverage`]
/// only exists so startup can warn about it.
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_CYCLE: u32 = 60;

/// Minute at which the routine begins. Minutes before it belong to the tail of
/// the cycle when ordering the legend.
pub const CYCLE_START_MINUTE: u32 = 25;

/// Point event that opens the routine.
pub const WAKEUP_ID: &str = "wakeup";
/// Point event that closes the routine; drawn with extra emphasis.
pub const LEAVE_ID: &str = "leave";

/// Symbolic identifier of an audio cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Chime,
    Fanfare,
    Warning,
    Alarm,
    Gong,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::Chime,
        SoundEffect::Fanfare,
        SoundEffect::Warning,
        SoundEffect::Alarm,
        SoundEffect::Gong,
    ];

    /// Rank used when several events end on the same minute. Lower wins.
    pub fn priority(self) -> u8 {
        match self {
            SoundEffect::Alarm => 0,
            SoundEffect::Warning => 1,
            SoundEffect::Fanfare => 2,
            SoundEffect::Chime => 3,
            SoundEffect::Gong => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SoundEffect::Chime => "chime",
            SoundEffect::Fanfare => "fanfare",
            SoundEffect::Warning => "warning",
            SoundEffect::Alarm => "alarm",
            SoundEffect::Gong => "gong",
        }
    }
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoundEffect {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        SoundEffect::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| anyhow::anyhow!("Unknown sound effect: {s}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Occupies `[start_minute, end_minute)`, wrapping through 0 when `end < start`.
    Range,
    /// Happens at `start_minute`; `end_minute` is equal to it.
    Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEvent {
    pub id: &'static str,
    pub kind: EventKind,
    pub start_minute: u32,
    pub end_minute: u32,
    pub label: &'static str,
    /// Caption shown under the time span in the legend.
    pub description: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub text_color: &'static str,
    pub sound_effect: SoundEffect,
}

impl ScheduleEvent {
    pub fn is_range(&self) -> bool {
        self.kind == EventKind::Range
    }

    pub fn is_point(&self) -> bool {
        self.kind == EventKind::Point
    }

    /// Whether the range wraps past minute 59 (e.g. 40 → 5).
    pub fn wraps(&self) -> bool {
        self.end_minute < self.start_minute
    }

    /// Number of minutes covered by a range. Points cover none.
    pub fn span_minutes(&self) -> u32 {
        match self.kind {
            EventKind::Point => 0,
            EventKind::Range if self.wraps() => {
                MINUTES_PER_CYCLE - self.start_minute + self.end_minute
            }
            EventKind::Range => self.end_minute - self.start_minute,
        }
    }

    /// True when `minute` falls inside the half-open range `[start, end)`.
    pub fn contains(&self, minute: u32) -> bool {
        if !self.is_range() {
            return false;
        }
        if self.wraps() {
            minute >= self.start_minute || minute < self.end_minute
        } else {
            minute >= self.start_minute && minute < self.end_minute
        }
    }

    /// Start minute rotated so the routine reads in narrative order starting at
    /// [`CYCLE_START_MINUTE`].
    pub fn effective_start(&self) -> u32 {
        if self.start_minute < CYCLE_START_MINUTE {
            self.start_minute + MINUTES_PER_CYCLE
        } else {
            self.start_minute
        }
    }
}

/// Immutable view over the events shown on the dial.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    events: &'static [ScheduleEvent],
}

impl Schedule {
    pub const fn new(events: &'static [ScheduleEvent]) -> Self {
        Self { events }
    }

    /// The built-in morning routine.
    pub const fn morning() -> Self {
        Self::new(MORNING_EVENTS)
    }

    pub fn events(&self) -> &'static [ScheduleEvent] {
        self.events
    }

    pub fn ranges(&self) -> impl DoubleEndedIterator<Item = &'static ScheduleEvent> {
        self.events.iter().filter(|e| e.is_range())
    }

    pub fn points(&self) -> impl DoubleEndedIterator<Item = &'static ScheduleEvent> {
        self.events.iter().filter(|e| e.is_point())
    }

    pub fn find(&self, id: &str) -> Option<&'static ScheduleEvent> {
        self.events.iter().find(|e| e.id == id)
    }

    /// First range containing `minute`, in schedule order.
    pub fn zone_at(&self, minute: u32) -> Option<&'static ScheduleEvent> {
        self.ranges().find(|e| e.contains(minute))
    }

    /// How many ranges cover each minute of the cycle.
    pub fn coverage(&self) -> [u8; MINUTES_PER_CYCLE as usize] {
        let mut counts = [0u8; MINUTES_PER_CYCLE as usize];
        for (minute, count) in counts.iter_mut().enumerate() {
            *count = self.ranges().filter(|e| e.contains(minute as u32)).count() as u8;
        }
        counts
    }

    /// Minutes covered by no range, and minutes covered by more than one.
    pub fn tiling_faults(&self) -> (Vec<u32>, Vec<u32>) {
        let coverage = self.coverage();
        let gaps = (0..MINUTES_PER_CYCLE)
            .filter(|m| coverage[*m as usize] == 0)
            .collect();
        let overlaps = (0..MINUTES_PER_CYCLE)
            .filter(|m| coverage[*m as usize] > 1)
            .collect();
        (gaps, overlaps)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::morning()
    }
}

/// Bright, distinct pastels a child can tell apart at a glance.
pub const MORNING_EVENTS: &[ScheduleEvent] = &[
    ScheduleEvent {
        id: "routine",
        kind: EventKind::Range,
        start_minute: 25,
        end_minute: 40,
        label: "Bad & Bett",
        description: "Klo, anziehen, Bett",
        icon: "🚽 🛏️ 👕",
        color: "#93C5FD",
        text_color: "#1E3A8A",
        // Ends at 40: time for breakfast.
        sound_effect: SoundEffect::Chime,
    },
    ScheduleEvent {
        id: "breakfast",
        kind: EventKind::Range,
        start_minute: 40,
        end_minute: 5,
        label: "Frühstück",
        description: "Frühstück essen",
        icon: "🥣 🥛 🍎",
        color: "#FCD34D",
        text_color: "#78350F",
        sound_effect: SoundEffect::Fanfare,
    },
    ScheduleEvent {
        id: "teeth",
        kind: EventKind::Range,
        start_minute: 5,
        end_minute: 17,
        label: "Pflege",
        description: "Zähne & Haare",
        icon: "🪥 💇‍♀️ 🚿",
        color: "#86EFAC",
        text_color: "#14532D",
        // Ends at 17: hurry, shoes!
        sound_effect: SoundEffect::Warning,
    },
    ScheduleEvent {
        id: "shoes",
        kind: EventKind::Range,
        start_minute: 17,
        end_minute: 25,
        label: "Schuhe an",
        description: "Schuhe anziehen",
        icon: "👟 🎒",
        color: "#FCA5A5",
        text_color: "#7F1D1D",
        // Ends at 25: leave now.
        sound_effect: SoundEffect::Alarm,
    },
    ScheduleEvent {
        id: WAKEUP_ID,
        kind: EventKind::Point,
        start_minute: 25,
        end_minute: 25,
        label: "Aufwachen",
        description: "Aufwachen!",
        icon: "☀️",
        color: "#FDBA74",
        text_color: "black",
        sound_effect: SoundEffect::Gong,
    },
    ScheduleEvent {
        id: LEAVE_ID,
        kind: EventKind::Point,
        start_minute: 25,
        end_minute: 25,
        label: "Losgehen",
        description: "Los zur Schule!",
        icon: "🏃💨",
        color: "#EF4444",
        text_color: "white",
        sound_effect: SoundEffect::Alarm,
    },
];
