use std::path::PathBuf;

use chrono::NaiveTime;
use clap::{Parser, Subcommand};

use crate::geometry::Point;
use crate::schedule::SoundEffect;

#[derive(Parser, Debug)]
#[command(version, about = "Analog routine clock with audio cues")]
pub struct Cli {
    /// Config file to use instead of the per-user default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Run the clock: redraw every second and sound cues on zone boundaries.
    Run,
    /// Render one frame of the clock face.
    Render {
        /// Time to draw, as HH:MM or HH:MM:SS. Defaults to now.
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveTime>,
        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the legend.
    Legend,
    /// Play an event's cue, by id or by the canvas point that was clicked.
    Preview {
        /// Event id, e.g. "breakfast".
        #[arg(
            required_unless_present_any = ["point", "cue"],
            conflicts_with_all = ["point", "cue"]
        )]
        id: Option<String>,
        /// Canvas coordinate as X,Y, in the face's SVG user units.
        #[arg(long, value_parser = parse_point, conflicts_with = "cue")]
        point: Option<Point>,
        /// Cue name (chime, fanfare, warning, alarm, gong), played directly.
        #[arg(long, value_parser = parse_cue)]
        cue: Option<SoundEffect>,
    },
}

pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("invalid time '{s}', expected HH:MM or HH:MM:SS"))
}

pub fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("invalid point '{s}', expected X,Y"))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("invalid x '{x}': {e}"))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("invalid y '{y}': {e}"))?;
    Ok(Point { x, y })
}

pub fn parse_cue(s: &str) -> Result<SoundEffect, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["routine-clock-daemon"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn render_accepts_short_and_long_times() {
        let cli = Cli::try_parse_from(["x", "render", "--at", "07:17"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Render {
                at: NaiveTime::from_hms_opt(7, 17, 0),
                out: None,
            })
        );
        assert_eq!(parse_time("07:17:45"), Ok(NaiveTime::from_hms_opt(7, 17, 45).unwrap()));
        assert!(parse_time("7 o'clock").is_err());
    }

    #[test]
    fn preview_takes_an_id_or_a_point() {
        let by_id = Cli::try_parse_from(["x", "preview", "teeth"]).unwrap();
        assert_eq!(
            by_id.command,
            Some(Command::Preview { id: Some("teeth".into()), point: None, cue: None })
        );

        let by_point = Cli::try_parse_from(["x", "preview", "--point", "300, 120"]).unwrap();
        assert_eq!(
            by_point.command,
            Some(Command::Preview {
                id: None,
                point: Some(Point { x: 300.0, y: 120.0 }),
                cue: None,
            })
        );

        assert!(Cli::try_parse_from(["x", "preview"]).is_err());
        assert!(Cli::try_parse_from(["x", "preview", "teeth", "--point", "1,2"]).is_err());
    }

    #[test]
    fn preview_takes_a_cue_name() {
        let cli = Cli::try_parse_from(["x", "preview", "--cue", "Gong"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Preview { id: None, point: None, cue: Some(SoundEffect::Gong) })
        );
        assert!(Cli::try_parse_from(["x", "preview", "--cue", "bell"]).is_err());
        assert!(Cli::try_parse_from(["x", "preview", "teeth", "--cue", "gong"]).is_err());
        assert!(Cli::try_parse_from(["x", "preview", "--point", "1,2", "--cue", "gong"]).is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["x", "legend", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
    }

    #[test]
    fn parse_point_rejects_garbage() {
        assert!(parse_point("12").is_err());
        assert!(parse_point("a,b").is_err());
    }
}
