mod cli;
mod clock;
mod config;
mod event;
mod face;
mod geometry;
mod legend;
mod notifier;
mod paths;
mod player;
mod schedule;
mod status;
mod synth;
mod ticker;
mod widget;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::face::ClockFace;
use crate::geometry::Point;
use crate::player::RodioPlayer;
use crate::schedule::{Schedule, SoundEffect};
use crate::widget::ClockWidget;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "routine_clock_daemon=info".into()),
        )
        .init();

    let cli = Cli::parse();

    // ── Configuration ─────────────────────────────────────────────────────────
    let config_path = cli.config.unwrap_or_else(paths::config_file_path);
    let config = config::load_or_default(&config_path).unwrap_or_else(|e| {
        warn!("config error (using defaults): {e:#}");
        Config::default()
    });

    let schedule = Schedule::morning();
    let result = match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_daemon(schedule, config, config_path).await,
        Command::Render { at, out } => render_once(schedule, &config, at, out),
        Command::Legend => {
            print!("{}", legend::render(&schedule));
            Ok(())
        }
        Command::Preview { id, point, cue } => {
            preview(schedule, &config, id.as_deref(), point, cue)
        }
    };

    if let Err(e) = result {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run_daemon(schedule: Schedule, config: Config, config_path: PathBuf) -> Result<()> {
    let (gaps, overlaps) = schedule.tiling_faults();
    if !gaps.is_empty() || !overlaps.is_empty() {
        warn!(?gaps, ?overlaps, "zones do not tile the hour; drawing them as authored");
    }

    let status_path = paths::status_file_path(&config_path);
    let default_svg = paths::svg_file_path(&config_path);

    let mut widget = ClockWidget::new(
        schedule,
        SystemClock,
        RodioPlayer::new(config.audio.clone()),
        ClockFace::new(schedule, config.clock.effective_size()),
        config.clock.effective_svg_output(&default_svg),
    );

    // ── Initial status ────────────────────────────────────────────────────────
    let mut current_status = status::DaemonStatus::new();
    status::write_status(&status_path, &current_status);

    let (event_tx, mut event_rx) = mpsc::channel::<event::DaemonEvent>(32);

    // ── Background tasks ──────────────────────────────────────────────────────
    tokio::spawn(config::watch_config(config_path, event_tx.clone()));
    let ticker_handle = tokio::spawn(ticker::run(event_tx.clone()));

    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(event::DaemonEvent::Shutdown).await;
            }
        });
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        svg = %widget.svg_path().display(),
        "routine-clock-daemon started"
    );

    // ── Event loop ────────────────────────────────────────────────────────────
    while let Some(evt) = event_rx.recv().await {
        match evt {
            event::DaemonEvent::Tick => {
                let report = widget.tick();
                if current_status.apply(&report) {
                    status::write_status(&status_path, &current_status);
                }
            }

            event::DaemonEvent::ConfigReloaded(new_config) => {
                info!("config reloaded");
                widget.player_mut().update(new_config.audio.clone());
                widget.reconfigure(
                    ClockFace::new(schedule, new_config.clock.effective_size()),
                    new_config.clock.effective_svg_output(&default_svg),
                );
            }

            event::DaemonEvent::Shutdown => {
                info!("shutting down");
                break;
            }
        }
    }

    ticker_handle.abort();
    current_status.stop();
    status::write_status(&status_path, &current_status);
    Ok(())
}

fn render_once(
    schedule: Schedule,
    config: &Config,
    at: Option<NaiveTime>,
    out: Option<PathBuf>,
) -> Result<()> {
    let time = at.unwrap_or_else(|| SystemClock.now().time());
    let svg = ClockFace::new(schedule, config.clock.effective_size()).render(time);
    match out {
        Some(path) => {
            widget::write_atomic(&path, &svg)?;
            info!(path = %path.display(), %time, "rendered clock face");
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn preview(
    schedule: Schedule,
    config: &Config,
    id: Option<&str>,
    point: Option<Point>,
    cue: Option<SoundEffect>,
) -> Result<()> {
    let effect = match (id, point, cue) {
        (_, _, Some(effect)) => effect,
        (Some(id), _, None) => {
            let event = schedule
                .find(id)
                .with_context(|| format!("No event with id '{id}'"))?;
            info!(event = event.id, "previewing event");
            event.sound_effect
        }
        (None, Some(p), None) => {
            let event = ClockFace::new(schedule, config.clock.effective_size())
                .hit_test(p)
                .with_context(|| format!("Nothing drawn at ({}, {})", p.x, p.y))?;
            info!(event = event.id, "previewing event");
            event.sound_effect
        }
        (None, None, None) => bail!("Give an event id, --point or --cue"),
    };

    if !config.audio.enabled {
        warn!("audio is disabled in the config; nothing will play");
    }
    info!(cue = %effect, "previewing cue");
    RodioPlayer::new(config.audio.clone()).play_blocking(effect);
    Ok(())
}
