use crate::{
    options::{Area, Resort},
    print_json,
};
use anyhow::{anyhow, Context, Result};
use resorts::{feature_name, geojson::FeatureCollection, read_metrics, FeatureSource};
use std::{io::Write, path::Path};

fn open(path: &Path) -> Result<FeatureSource> {
    FeatureSource::open(path).with_context(|| format!("reading {}", path.display()))
}

impl Resort {
    pub fn run(&self, path: &Path) -> Result<()> {
        let collection = open(path)?.for_resort(&self.resort);
        if self.csv {
            print_csv(&collection)
        } else {
            print_json(&collection)
        }
    }
}

impl Area {
    pub fn run(&self, path: &Path) -> Result<()> {
        let area = open(path)?
            .ski_area(&self.name)
            .ok_or_else(|| anyhow!("ski area '{}' not found", self.name))?;
        print_json(&area)
    }
}

/// # Example
///
/// ```sh
/// skimap runs --resort olympic --csv | sort -t, -k4 -n
/// ```
fn print_csv(collection: &FeatureCollection) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "name,lengthInKm,verticalDrop,maxSlope")?;
    for feature in &collection.features {
        let Some(metrics) = read_metrics(feature) else {
            continue;
        };
        let name = feature_name(feature).unwrap_or_default().replace(',', " ");
        writeln!(
            stdout,
            "{name},{:.2},{},{}",
            metrics.length_km, metrics.vertical_drop_m, metrics.max_slope_deg
        )?;
    }
    Ok(())
}
