use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::event::DaemonEvent;
use crate::face::{DEFAULT_CANVAS_SIZE, MAX_CANVAS_SIZE, MIN_CANVAS_SIZE};
use crate::synth::DEFAULT_SAMPLE_RATE;

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 96_000;
pub const DEFAULT_VOLUME: f64 = 1.0;

/// Root configuration structure. Deserialized from `<app dir>/config.toml`.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub audio: AudioConfig,
}

/// Rendering options for the clock face.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClockConfig {
    /// Edge length of the square SVG canvas. Clamped to [200, 2000].
    #[serde(default = "default_size")]
    pub size: u32,
    /// Where each frame is written. Defaults to `clock.svg` in the app dir.
    #[serde(default)]
    pub svg_output: Option<PathBuf>,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_CANVAS_SIZE,
            svg_output: None,
        }
    }
}

impl ClockConfig {
    pub fn effective_size(&self) -> u32 {
        self.size.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE)
    }

    /// Returns the configured output path, falling back to `default`.
    pub fn effective_svg_output(&self, default: &Path) -> PathBuf {
        self.svg_output
            .clone()
            .unwrap_or_else(|| default.to_path_buf())
    }
}

/// Audio cue settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AudioConfig {
    /// Master switch; `false` silences every cue, automatic or previewed.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Output gain applied on top of each cue's own levels. Clamped to [0, 1].
    #[serde(default = "default_volume")]
    pub volume: f64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: DEFAULT_VOLUME,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl AudioConfig {
    pub fn effective_volume(&self) -> f64 {
        if self.volume.is_nan() {
            return DEFAULT_VOLUME;
        }
        self.volume.clamp(0.0, 1.0)
    }

    pub fn effective_sample_rate(&self) -> u32 {
        self.sample_rate.clamp(MIN_SAMPLE_RATE, MAX_SAMPLE_RATE)
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Spawns a file watcher on the parent directory of `path`.  Whenever the config
/// file is created or modified, reloads it and sends a `ConfigReloaded` event.
pub async fn watch_config(path: PathBuf, tx: mpsc::Sender<DaemonEvent>) {
    let (watch_tx, mut watch_rx) = mpsc::channel::<notify::Event>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = watch_tx.blocking_send(event);
            }
        },
        NotifyConfig::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            warn!("failed to create config watcher: {e}");
            return;
        }
    };

    // Editors often save by writing a new file and renaming it over the old
    // one, which a watch on the file itself would miss.
    let watch_dir = match path.parent() {
        Some(d) => d.to_path_buf(),
        None => {
            warn!(path = %path.display(), "config path has no parent directory");
            return;
        }
    };

    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
        warn!(dir = %watch_dir.display(), "failed to watch config directory: {e}");
        return;
    }
    info!(dir = %watch_dir.display(), "watching for config changes");

    while let Some(event) = watch_rx.recv().await {
        let affects_config = event.paths.iter().any(|p| p == path.as_path());
        let is_write = matches!(
            event.kind,
            notify::EventKind::Create(_) | notify::EventKind::Modify(_)
        );

        if affects_config && is_write {
            match load_or_default(&path) {
                Ok(config) => {
                    if tx.send(DaemonEvent::ConfigReloaded(config)).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("failed to reload config: {e:#}"),
            }
        }
    }
}

fn default_size() -> u32 {
    DEFAULT_CANVAS_SIZE
}

fn default_enabled() -> bool {
    true
}

fn default_volume() -> f64 {
    DEFAULT_VOLUME
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}
