use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::PathBuf,
};

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::{info, warn, Level};

use engine::{EventConsumer, Geodetic, MeasureEngine, MeasureEvent, MeasureMode};

/// One interaction per line, JSON encoded. A `cursor` without coordinates
/// clears the preview, mirroring a mouse-move off the globe.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
    Start {
        mode: MeasureMode,
    },
    Point {
        lon: f64,
        lat: f64,
        #[serde(default)]
        height: f64,
    },
    Cursor {
        #[serde(default)]
        lon: Option<f64>,
        #[serde(default)]
        lat: Option<f64>,
        #[serde(default)]
        height: f64,
    },
    Finalize,
    Clear,
    Cancel,
    Export {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    let script: Box<dyn BufRead> = match std::env::args().nth(1) {
        Some(path) => Box::new(BufReader::new(
            File::open(&path).wrap_err_with(|| format!("cannot open script {path}"))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut engine = MeasureEngine::new();
    for (lineno, line) in script.lines().enumerate() {
        let line = line.wrap_err("cannot read script line")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = serde_json::from_str(line)
            .wrap_err_with(|| format!("bad command on line {}", lineno + 1))?;
        run(&mut engine, command)?;
    }

    Ok(())
}

fn run(engine: &mut MeasureEngine, command: Command) -> Result<()> {
    let event = match command {
        Command::Start { mode } => MeasureEvent::Start { mode },
        Command::Point { lon, lat, height } => MeasureEvent::Pick {
            position: Some(Geodetic::new(lon, lat, height)),
        },
        Command::Cursor { lon, lat, height } => MeasureEvent::Cursor {
            position: match (lon, lat) {
                (Some(lon), Some(lat)) => Some(Geodetic::new(lon, lat, height)),
                _ => None,
            },
        },
        Command::Finalize => MeasureEvent::FinalizeArea,
        Command::Clear => MeasureEvent::Clear,
        Command::Cancel => MeasureEvent::Cancel,
        Command::Export { path } => {
            let file = File::create(&path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            engine::ser::write_scene(engine.scene(), file)?;
            info!(path = %path.display(), entities = engine.scene().len(), "scene exported");
            return Ok(());
        }
    };

    let had_result = engine.result().is_some();
    if let Some(notice) = engine.on_event(event) {
        warn!("{notice}");
    } else if !had_result {
        if let Some(result) = engine.result() {
            info!(?result, "measurement finalized");
        }
    }
    Ok(())
}
