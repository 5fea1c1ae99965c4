use crate::{options::TrackCmd, print_json};
use anyhow::{Context, Result};
use resorts::{Imported, Track, TrackLibrary};
use serde::Serialize;
use slopes::{haversine_km, Metrics};
use textplots::{Chart, Plot, Shape};

impl TrackCmd {
    pub fn run(&self, library: &TrackLibrary) -> Result<()> {
        match self {
            Self::List => {
                for name in library.list()? {
                    println!("{name}");
                }
                Ok(())
            }
            Self::Show(show) => {
                let track = library
                    .open(&show.file)
                    .with_context(|| format!("opening track {}", show.file))?;
                if show.plot {
                    plot_ascii(&track);
                }
                print_summary(&show.file, &track)
            }
            Self::Import(import) => {
                match library.import(&import.path)? {
                    Imported::Added(name) => println!("added {name}"),
                    Imported::AlreadyExists(name) => println!("{name} already exists"),
                }
                Ok(())
            }
        }
    }
}

fn print_summary(file: &str, track: &Track) -> Result<()> {
    #[derive(Serialize)]
    struct Summary<'a> {
        file: &'a str,
        name: Option<&'a str>,
        points: usize,
        start: Option<&'a str>,
        end: Option<&'a str>,
        #[serde(flatten)]
        metrics: Metrics,
    }

    let times = || track.points.iter().filter_map(|point| point.time.as_deref());
    print_json(&Summary {
        file,
        name: track.name.as_deref(),
        points: track.points.len(),
        start: times().next(),
        end: times().last(),
        metrics: track.metrics(),
    })
}

/// Elevation (m) over distance travelled (km).
#[allow(clippy::cast_possible_truncation)]
fn plot_ascii(track: &Track) {
    let positions = track.positions();
    if positions.len() < 2 {
        eprintln!("not enough points to plot");
        return;
    }

    let mut travelled_km = 0.0;
    let mut plot_data: Vec<(f32, f32)> = Vec::with_capacity(positions.len());
    plot_data.push((0.0, positions[0].elev_m as f32));
    for pair in positions.windows(2) {
        travelled_km += haversine_km(pair[0].coord(), pair[1].coord());
        plot_data.push((travelled_km as f32, pair[1].elev_m as f32));
    }

    Chart::new(200, 80, 0.0, (travelled_km as f32).max(f32::EPSILON))
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}
