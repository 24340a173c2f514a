/// Cue playback through the default output device.
///
/// Playback is fire-and-forget: each cue is rendered and played on its own
/// short-lived OS thread, so the tick loop never waits on audio. Cues that
/// overlap simply mix in the device. When no output device can be opened the
/// cue is dropped without an error.
use std::thread::JoinHandle;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use tracing::{debug, warn};

use crate::config::AudioConfig;
use crate::schedule::SoundEffect;
use crate::synth::cue_for;

/// Something that can sound a cue.
pub trait CuePlayer {
    /// Starts `effect` and returns immediately.
    fn play(&self, effect: SoundEffect);
}

/// Plays synthesized cues with `rodio`.
#[derive(Debug, Clone)]
pub struct RodioPlayer {
    settings: AudioConfig,
}

impl RodioPlayer {
    pub fn new(settings: AudioConfig) -> Self {
        Self { settings }
    }

    #[cfg(test)]
    pub fn settings(&self) -> &AudioConfig {
        &self.settings
    }

    /// Swaps in new settings after a config reload. Cues already playing keep
    /// the settings they started with.
    pub fn update(&mut self, settings: AudioConfig) {
        self.settings = settings;
    }

    /// Spawns the playback thread. Returns `None` when audio is muted or the
    /// thread could not be started.
    pub fn spawn(&self, effect: SoundEffect) -> Option<JoinHandle<()>> {
        if !self.settings.enabled {
            debug!(%effect, "audio disabled; skipping cue");
            return None;
        }
        let sample_rate = self.settings.effective_sample_rate();
        let volume = self.settings.effective_volume();

        let spawned = std::thread::Builder::new()
            .name(format!("cue-{effect}"))
            .spawn(move || play_to_end(effect, sample_rate, volume));
        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(%effect, "failed to spawn playback thread: {e}");
                None
            }
        }
    }

    /// Plays `effect` and waits until it has finished.
    pub fn play_blocking(&self, effect: SoundEffect) {
        if let Some(handle) = self.spawn(effect) {
            let _ = handle.join();
        }
    }
}

impl CuePlayer for RodioPlayer {
    fn play(&self, effect: SoundEffect) {
        let _ = self.spawn(effect);
    }
}

fn play_to_end(effect: SoundEffect, sample_rate: u32, volume: f64) {
    let Ok((_stream, handle)) = OutputStream::try_default() else {
        debug!(%effect, "no audio output device; cue skipped");
        return;
    };
    let Ok(sink) = Sink::try_new(&handle) else {
        debug!(%effect, "could not open audio sink; cue skipped");
        return;
    };

    let samples = cue_for(effect).render(sample_rate, volume);
    sink.append(SamplesBuffer::new(1, sample_rate, samples));
    sink.sleep_until_end();
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::CuePlayer;
    use crate::schedule::SoundEffect;

    /// Remembers every cue it was asked to play.
    #[derive(Default)]
    pub struct RecordingPlayer {
        played: Mutex<Vec<SoundEffect>>,
    }

    impl RecordingPlayer {
        pub fn played(&self) -> Vec<SoundEffect> {
            self.played.lock().unwrap().clone()
        }
    }

    impl CuePlayer for RecordingPlayer {
        fn play(&self, effect: SoundEffect) {
            self.played.lock().unwrap().push(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muted_player_spawns_nothing() {
        let player = RodioPlayer::new(AudioConfig {
            enabled: false,
            ..AudioConfig::default()
        });
        assert!(player.spawn(SoundEffect::Gong).is_none());
    }

    #[test]
    fn update_replaces_settings() {
        let mut player = RodioPlayer::new(AudioConfig::default());
        player.update(AudioConfig {
            volume: 0.25,
            ..AudioConfig::default()
        });
        assert_eq!(player.settings().volume, 0.25);
    }
}
