/// Canonical file paths for routine-clock data files.
///
/// Everything lives in one per-user directory:
///   - config.toml  Read by the daemon, edited by a parent.
///   - status.toml  Written by the daemon.
///   - clock.svg    The most recently rendered clock face.
///
/// Windows: %APPDATA%\RoutineClock\
/// Elsewhere: $XDG_CONFIG_HOME/routine-clock/, else ~/.config/routine-clock/
use std::path::{Path, PathBuf};

#[cfg(windows)]
const APP_DIR_NAME: &str = "RoutineClock";
#[cfg(not(windows))]
const APP_DIR_NAME: &str = "routine-clock";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STATUS_FILE_NAME: &str = "status.toml";
pub const SVG_FILE_NAME: &str = "clock.svg";

/// Returns the application data directory. Falls back to the working
/// directory when no per-user location can be determined.
pub fn app_data_dir() -> PathBuf {
    base_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

#[cfg(windows)]
fn base_dir() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(windows))]
fn base_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
}

pub fn config_file_path() -> PathBuf {
    app_data_dir().join(CONFIG_FILE_NAME)
}

/// Status file next to `config_path`, so `--config` moves both together.
pub fn status_file_path(config_path: &Path) -> PathBuf {
    sibling(config_path, STATUS_FILE_NAME)
}

/// Default SVG output next to `config_path`.
pub fn svg_file_path(config_path: &Path) -> PathBuf {
    sibling(config_path, SVG_FILE_NAME)
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_ends_with_app_name() {
        let dir = app_data_dir();
        assert_eq!(dir.file_name().unwrap(), APP_DIR_NAME);
    }

    #[test]
    fn config_file_path_has_correct_name() {
        let path = config_file_path();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn status_and_svg_share_the_config_dir() {
        let config = Path::new("/etc/routine-clock/config.toml");
        assert_eq!(
            status_file_path(config),
            PathBuf::from("/etc/routine-clock/status.toml")
        );
        assert_eq!(svg_file_path(config), PathBuf::from("/etc/routine-clock/clock.svg"));
    }

    #[test]
    fn bare_file_name_resolves_to_relative_sibling() {
        let status = status_file_path(Path::new("config.toml"));
        assert_eq!(status.file_name().unwrap(), STATUS_FILE_NAME);
    }
}
