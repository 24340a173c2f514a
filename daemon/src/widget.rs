/// The per-tick core of the daemon: read the clock, sound at most one cue,
/// redraw the face.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Timelike};
use tracing::info;

use crate::clock::Clock;
use crate::face::ClockFace;
use crate::notifier::MinuteNotifier;
use crate::player::CuePlayer;
use crate::schedule::{Schedule, ScheduleEvent};

/// What a single tick did.
#[derive(Debug)]
pub struct TickReport {
    pub time: NaiveDateTime,
    /// True on the first tick of a new minute.
    pub minute_changed: bool,
    /// Event whose cue was dispatched on this tick.
    pub cue: Option<&'static ScheduleEvent>,
    /// Range containing the current minute.
    pub zone: Option<&'static ScheduleEvent>,
    /// Set when the face could not be written on this tick.
    pub write_error: Option<anyhow::Error>,
}

pub struct ClockWidget<C, P> {
    schedule: Schedule,
    clock: C,
    player: P,
    face: ClockFace,
    notifier: MinuteNotifier,
    svg_path: PathBuf,
}

impl<C: Clock, P: CuePlayer> ClockWidget<C, P> {
    pub fn new(schedule: Schedule, clock: C, player: P, face: ClockFace, svg_path: PathBuf) -> Self {
        Self {
            schedule,
            clock,
            player,
            face,
            notifier: MinuteNotifier::new(),
            svg_path,
        }
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn svg_path(&self) -> &Path {
        &self.svg_path
    }

    /// Replaces the renderer and output path. Notifier state is kept, so a
    /// reload never replays the current minute's cue.
    pub fn reconfigure(&mut self, face: ClockFace, svg_path: PathBuf) {
        self.face = face;
        self.svg_path = svg_path;
    }

    /// Runs one tick. The cue is dispatched before the face is written and a
    /// failed write is carried in the report next to the cue and zone.
    pub fn tick(&mut self) -> TickReport {
        let time = self.clock.now();
        let minute = time.minute();
        let minute_changed = self.notifier.last_minute() != Some(minute);

        let cue = self.notifier.observe(minute, &self.schedule);
        if let Some(event) = cue {
            info!(event = event.id, cue = %event.sound_effect, minute, "boundary reached");
            self.player.play(event.sound_effect);
        }

        let svg = self.face.render(time.time());
        TickReport {
            time,
            minute_changed,
            cue,
            zone: self.schedule.zone_at(minute),
            write_error: write_atomic(&self.svg_path, &svg).err(),
        }
    }
}

/// Writes `content` to a sibling temp file and renames it over `path`, so
/// readers never observe a half-written frame.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, content)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::testing::ScriptedClock;
    use crate::face::DEFAULT_CANVAS_SIZE;
    use crate::player::testing::RecordingPlayer;
    use crate::schedule::SoundEffect;

    fn widget(
        clock: ScriptedClock,
        svg_path: PathBuf,
    ) -> ClockWidget<ScriptedClock, RecordingPlayer> {
        let schedule = Schedule::morning();
        ClockWidget::new(
            schedule,
            clock,
            RecordingPlayer::default(),
            ClockFace::new(schedule, DEFAULT_CANVAS_SIZE),
            svg_path,
        )
    }

    // ── cues ──────────────────────────────────────────────────────────────────

    #[test]
    fn minute_17_for_three_ticks_plays_warning_once() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ScriptedClock::minutes(&[(17, 0), (17, 1), (17, 2)]);
        let mut w = widget(clock, dir.path().join("clock.svg"));

        let reports: Vec<_> = (0..3).map(|_| w.tick()).collect();

        assert_eq!(w.player_mut().played(), vec![SoundEffect::Warning]);
        assert_eq!(reports[0].cue.map(|e| e.id), Some("teeth"));
        assert!(reports[0].minute_changed);
        assert!(reports[1].cue.is_none());
        assert!(!reports[1].minute_changed);
        assert!(reports[2].cue.is_none());
    }

    #[test]
    fn walking_the_hour_plays_each_boundary_in_turn() {
        let dir = tempfile::tempdir().unwrap();
        let pairs: Vec<_> = (0..60).map(|m| (m, 0)).collect();
        let clock = ScriptedClock::minutes(&pairs);
        let mut w = widget(clock, dir.path().join("clock.svg"));

        for _ in 0..60 {
            assert!(w.tick().write_error.is_none());
        }
        assert_eq!(
            w.player_mut().played(),
            vec![
                SoundEffect::Fanfare,
                SoundEffect::Warning,
                SoundEffect::Alarm,
                SoundEffect::Chime,
            ]
        );
    }

    #[test]
    fn report_names_the_current_zone() {
        let dir = tempfile::tempdir().unwrap();
        let clock = ScriptedClock::minutes(&[(50, 12)]);
        let mut w = widget(clock, dir.path().join("clock.svg"));
        let report = w.tick();
        assert_eq!(report.zone.map(|e| e.id), Some("breakfast"));
        assert!(report.cue.is_none());
    }

    // ── rendering ─────────────────────────────────────────────────────────────

    #[test]
    fn tick_writes_the_face() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("clock.svg");
        let clock = ScriptedClock::minutes(&[(30, 0)]);
        let mut w = widget(clock, path.clone());

        assert!(w.tick().write_error.is_none());

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(!dir.path().join("out").join("clock.svg.tmp").exists());
    }

    #[test]
    fn failed_write_still_sounds_and_later_ticks_recover() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail.
        let blocked = dir.path().join("clock.svg");
        std::fs::create_dir_all(blocked.join("inner")).unwrap();
        let clock = ScriptedClock::minutes(&[(40, 0), (41, 0)]);
        let mut w = widget(clock, blocked);

        let failed = w.tick();
        assert!(failed.write_error.is_some());
        assert_eq!(w.player_mut().played(), vec![SoundEffect::Chime]);

        w.reconfigure(
            ClockFace::new(Schedule::morning(), DEFAULT_CANVAS_SIZE),
            dir.path().join("ok.svg"),
        );
        assert!(w.tick().write_error.is_none());
        assert_eq!(w.svg_path(), dir.path().join("ok.svg"));
    }

    #[test]
    fn failed_writes_keep_reporting_cue_and_zone() {
        let dir = tempfile::tempdir().unwrap();
        let blocked = dir.path().join("clock.svg");
        std::fs::create_dir_all(blocked.join("inner")).unwrap();
        let clock = ScriptedClock::minutes(&[(17, 0), (18, 0), (19, 0)]);
        let mut w = widget(clock, blocked);

        let reports: Vec<_> = (0..3).map(|_| w.tick()).collect();

        assert!(reports.iter().all(|r| r.write_error.is_some()));
        assert!(reports.iter().all(|r| r.minute_changed));
        assert_eq!(reports[0].cue.map(|e| e.id), Some("teeth"));
        assert_eq!(reports[1].zone.map(|e| e.id), Some("shoes"));
        assert_eq!(reports[2].zone.map(|e| e.id), Some("shoes"));
        assert_eq!(w.player_mut().played(), vec![SoundEffect::Warning]);
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("face.svg");
        write_atomic(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
