mod animate;
mod features;
mod options;
mod photo;
mod progress;
mod split;
mod track;
mod view_state;

use anyhow::Result;
use clap::Parser;
use options::{Cli, Command};
use resorts::{Fallback, JsonFileStore, PhotoLibrary, TrackLibrary};
use serde::Serialize;
use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let data = cli.data_dir();

    match &cli.cmd {
        Command::Runs(resort) => resort.run(&data.runs()),
        Command::Lifts(resort) => resort.run(&data.lifts()),
        Command::Area(area) => area.run(&data.ski_areas()),
        Command::Track(cmd) => cmd.run(&TrackLibrary::new(data.tracks())),
        Command::Photo(cmd) => cmd.run(&PhotoLibrary::new(data.photos())),
        Command::Animate(animate) => animate.run(&data),
        Command::ViewState(cmd) => {
            cmd.run(&Fallback::new(JsonFileStore::new(data.view_states())))
        }
        Command::Extract(extract) => extract.run(),
        Command::Split(split) => split.run(),
    }
}

/// Prints `value` as a single line of JSON.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
