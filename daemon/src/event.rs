use crate::config::Config;

pub enum DaemonEvent {
    /// One-second heartbeat; the main loop reads the clock and redraws.
    Tick,
    /// The config file changed on disk and was successfully re-parsed.
    ConfigReloaded(Config),
    /// Ctrl+C received; the daemon should write its final status and exit.
    Shutdown,
}
