use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::widget::TickReport;

/// Current operational state of the daemon.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "lowercase")]
pub enum DaemonState {
    /// The ticker is running and the face is being redrawn every second.
    Running,
    /// The daemon has shut down.
    Stopped,
}

/// Runtime status written by the daemon to `status.toml` next to the config.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DaemonStatus {
    /// Daemon binary version (set from Cargo.toml at compile time).
    pub version: String,
    pub state: DaemonState,
    /// Id of the zone the minute hand is currently in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_zone: Option<String>,
    /// Most recently dispatched automatic cue, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cue: Option<String>,
    /// RFC 3339 timestamp of `last_cue`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_cue_timestamp: Option<String>,
    /// Human-readable message for the most recent non-fatal error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DaemonStatus {
    /// Constructs the initial status on daemon startup.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            state: DaemonState::Running,
            current_zone: None,
            last_cue: None,
            last_cue_timestamp: None,
            error: None,
        }
    }
}

impl DaemonStatus {
    /// Folds one tick into the status. Returns true when the file should be
    /// rewritten: on every minute change and whenever the error changes.
    pub fn apply(&mut self, report: &TickReport) -> bool {
        let error = report.write_error.as_ref().map(|e| format!("{e:#}"));
        let error_changed = error != self.error;
        if let Some(message) = error.as_deref().filter(|_| error_changed) {
            warn!("tick failed: {message}");
        }
        self.error = error;

        if !report.minute_changed {
            return error_changed;
        }
        self.current_zone = report.zone.map(|e| e.id.to_string());
        if let Some(cue) = report.cue {
            self.last_cue = Some(cue.sound_effect.to_string());
            self.last_cue_timestamp = report
                .time
                .and_local_timezone(Local)
                .earliest()
                .map(|t| t.to_rfc3339());
        }
        true
    }

    pub fn stop(&mut self) {
        self.state = DaemonState::Stopped;
    }
}

impl Default for DaemonStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes `status` to TOML and writes it to `path`.
/// Creates the parent directory if it does not exist.
/// Failures are logged, never propagated: losing a status update must not
/// stop the clock.
pub fn write_status(path: &Path, status: &DaemonStatus) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            warn!(dir = %parent.display(), "failed to create status directory: {e}");
            return;
        }
    }
    match toml::to_string_pretty(status) {
        Ok(content) => {
            if let Err(e) = std::fs::write(path, content) {
                warn!(path = %path.display(), "failed to write status file: {e}");
            }
        }
        Err(e) => warn!("failed to serialize status: {e}"),
    }
}
