//! Command-line flags for the desktop viewer.

use clap::Parser;

use kitchen::config::{DEFAULT_PLAYBACK_FPS, DEFAULT_SMOOTHING_SPEED, DEFAULT_STATE_PATH};
use kitchen::viewer_config::DEFAULT_LOG_FILTER;
use kitchen::ViewerConfig;

#[derive(Parser, Debug)]
#[command(name = "kitchenviz", about = "3D viewer for cooking-game kitchens and replays")]
pub struct Cli {
    /// State file to show (JSON, or `.kviz` binary)
    #[arg(long, default_value = DEFAULT_STATE_PATH)]
    pub state: String,

    /// Show only the static layout, even if the file has frames
    #[arg(long = "static")]
    pub static_only: bool,

    /// Recorded frames played per second
    #[arg(long, default_value_t = DEFAULT_PLAYBACK_FPS, value_parser = positive_f32)]
    pub fps: f32,

    /// Playback speed multiplier
    #[arg(long, default_value_t = 1.0, value_parser = non_negative_f32)]
    pub speed: f32,

    /// Restart from the first frame after the last one
    #[arg(long = "loop", conflicts_with = "record")]
    pub looping: bool,

    /// Start with playback paused
    #[arg(long)]
    pub paused: bool,

    /// Marker smoothing speed (higher snaps faster)
    #[arg(long, default_value_t = DEFAULT_SMOOTHING_SPEED, value_parser = positive_f32)]
    pub smoothing: f32,

    /// Write numbered PNG frames to this directory, then exit
    #[arg(long)]
    pub record: Option<String>,

    /// Log filter, e.g. "debug" or "info,kitchen=trace"
    #[arg(long, default_value = DEFAULT_LOG_FILTER)]
    pub log: String,
}

impl Cli {
    pub fn into_config(self) -> ViewerConfig {
        ViewerConfig {
            state_path: self.state,
            static_only: self.static_only,
            playback_fps: self.fps,
            speed: self.speed,
            looping: self.looping,
            start_paused: self.paused,
            smoothing_speed: self.smoothing,
            record_dir: self.record,
            log_filter: self.log,
        }
    }
}

fn parse_f32(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not finite"))
    }
}

fn positive_f32(s: &str) -> Result<f32, String> {
    let value = parse_f32(s)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(format!("must be greater than 0, got {value}"))
    }
}

fn non_negative_f32(s: &str) -> Result<f32, String> {
    let value = parse_f32(s)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("must not be negative, got {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewerConfig, clap::Error> {
        Cli::try_parse_from(std::iter::once("kitchenviz").chain(args.iter().copied()))
            .map(Cli::into_config)
    }

    #[test]
    fn defaults_match_viewer_config() {
        let config = parse(&[]).expect("defaults parse");
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn all_flags() {
        let config = parse(&[
            "--state",
            "runs/cramped.kviz",
            "--static",
            "--fps",
            "10",
            "--speed",
            "0.5",
            "--loop",
            "--paused",
            "--smoothing",
            "20",
            "--log",
            "debug",
        ])
        .expect("parse");
        assert_eq!(config.state_path, "runs/cramped.kviz");
        assert!(config.static_only);
        assert_eq!(config.playback_fps, 10.0);
        assert_eq!(config.speed, 0.5);
        assert!(config.looping);
        assert!(config.start_paused);
        assert_eq!(config.smoothing_speed, 20.0);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn record_takes_a_directory() {
        let config = parse(&["--record", "out"]).expect("parse");
        assert_eq!(config.record_dir.as_deref(), Some("out"));
        assert!(!config.looping);
    }

    #[test]
    fn record_cannot_loop() {
        let err = parse(&["--record", "out", "--loop"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse(&["--fps", "0"]).is_err());
        assert!(parse(&["--fps", "fast"]).is_err());
        assert!(parse(&["--speed", "-1"]).is_err());
        assert!(parse(&["--smoothing", "inf"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn zero_speed_is_allowed() {
        assert_eq!(parse(&["--speed", "0"]).expect("parse").speed, 0.0);
    }
}
