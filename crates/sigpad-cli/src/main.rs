//! Signature pad CLI: replay recorded pointer events onto a software
//! surface and export the signature image.
//!
//! ```text
//! sigpad replay strokes.json --width 300 --height 150 --ratio 2 --out sig.png
//! sigpad config --options opts.json
//! ```

mod replay;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use replay::{ReplaySetup, decode_data_url, parse_events, parse_options, replay};
use sigpad_core::{HostEnvironment, PadConfig, PadOptions, Point};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a JSON event log and export the resulting image
    Replay {
        /// Path to a JSON array of pointer events
        events: PathBuf,

        /// Path to a JSON options object (`bgColor`, `lineWidth`, `color`, `type`, `quality`)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Displayed surface width in CSS pixels
        #[arg(long, default_value_t = 300.0)]
        width: f64,

        /// Displayed surface height in CSS pixels
        #[arg(long, default_value_t = 150.0)]
        height: f64,

        /// Device pixel ratio; omitted means 1
        #[arg(long)]
        ratio: Option<f64>,

        /// Treat the host as a touch device
        #[arg(long)]
        touch: bool,

        /// Surface origin in viewport coordinates, as `X,Y`
        #[arg(long, value_parser = parse_point, default_value = "0,0")]
        origin: Point,

        /// Export width; omitted or 0 means the displayed width
        #[arg(long)]
        export_width: Option<f64>,

        /// Export height; omitted or 0 means the displayed height
        #[arg(long)]
        export_height: Option<f64>,

        /// Write the decoded image here instead of printing the data URI
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration for an options file
    Config {
        /// Path to a JSON options object
        #[arg(short, long)]
        options: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            events,
            options,
            width,
            height,
            ratio,
            touch,
            origin,
            export_width,
            export_height,
            out,
        } => {
            let log = std::fs::read_to_string(&events)
                .with_context(|| format!("failed to read {}", events.display()))?;
            let events = parse_events(&log)?;
            let setup = ReplaySetup {
                width,
                height,
                env: host_environment(ratio, touch),
                origin,
                options: read_options(options.as_deref())?,
            };

            let outcome = replay(&setup, &events, export_width, export_height)?;
            log::info!("{} of {} events drew", outcome.drawn, outcome.events);

            match out {
                Some(path) => {
                    let bytes = decode_data_url(&outcome.data_url)?;
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    log::info!("wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => println!("{}", outcome.data_url),
            }
        }
        Command::Config { options } => {
            let config = PadConfig::merge(read_options(options.as_deref())?.as_ref());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn read_options(path: Option<&Path>) -> Result<Option<PadOptions>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_options(&json).map(Some)
}

fn host_environment(ratio: Option<f64>, touch: bool) -> HostEnvironment {
    HostEnvironment {
        device_pixel_ratio: ratio,
        has_touch_start: touch,
        orientation: None,
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("bad coordinate {v:?}: {e}"))
    };
    Ok(Point::new(coord(x)?, coord(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use sigpad_core::DeviceClass;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn origin_parses_as_point() {
        assert_eq!(parse_point("25, 300").unwrap(), Point::new(25.0, 300.0));
        assert!(parse_point("25").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn touch_flag_selects_mobile_listeners() {
        assert_eq!(host_environment(Some(2.0), true).device_class(), DeviceClass::Mobile);
        assert_eq!(host_environment(None, false).device_class(), DeviceClass::Desktop);
        assert_eq!(host_environment(None, false).pixel_ratio(), 1.0);
    }

    #[test]
    fn replay_arguments_parse() {
        let cli = Cli::try_parse_from([
            "sigpad",
            "replay",
            "log.json",
            "--ratio",
            "2",
            "--touch",
            "--origin",
            "10,20",
            "--export-width",
            "120",
        ])
        .unwrap();
        let Command::Replay {
            width,
            ratio,
            touch,
            origin,
            export_width,
            export_height,
            ..
        } = cli.command
        else {
            panic!("expected replay");
        };
        assert_eq!(width, 300.0);
        assert_eq!(ratio, Some(2.0));
        assert!(touch);
        assert_eq!(origin, Point::new(10.0, 20.0));
        assert_eq!(export_width, Some(120.0));
        assert_eq!(export_height, None);
    }
}
