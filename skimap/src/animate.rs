use crate::options::Animate;
use anyhow::{anyhow, bail, Context, Result};
use resorts::{feature_paths, DataDir, FeatureSource, TrackLibrary};
use slopes::{Animation, Position};
use std::{io::Write, time::Duration};

impl Animate {
    pub fn run(&self, data: &DataDir) -> Result<()> {
        let path = self.path(data)?;
        if path.len() < 2 {
            bail!("need at least two points to animate, found {}", path.len());
        }

        let animation = Animation::new(Duration::from_millis(self.period_ms));
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "frame,elapsed_ms,progress,lon,lat,elev")?;
        for (i, frame) in animation.frames(&path, self.frames).enumerate() {
            let Position { lon, lat, elev_m } = frame.position;
            writeln!(
                stdout,
                "{i},{},{:.4},{lon},{lat},{elev_m:.1}",
                frame.elapsed.as_millis(),
                frame.progress
            )?;
        }
        Ok(())
    }

    fn path(&self, data: &DataDir) -> Result<Vec<Position>> {
        match (&self.lift, &self.resort, &self.track) {
            (Some(lift), Some(resort), _) => {
                let lifts_path = data.lifts();
                let lifts = FeatureSource::open(&lifts_path)
                    .with_context(|| format!("reading {}", lifts_path.display()))?;
                let feature = lifts
                    .find_named(resort, lift)
                    .ok_or_else(|| anyhow!("no lift matching '{lift}' at '{resort}'"))?;
                // Lifts are drawn as one line; use the first one that
                // can carry a marker.
                feature_paths(feature)
                    .into_iter()
                    .find(|line| line.len() >= 2)
                    .ok_or_else(|| anyhow!("lift '{lift}' has no line geometry"))
            }
            (_, _, Some(track)) => Ok(TrackLibrary::new(data.tracks())
                .open(track)
                .with_context(|| format!("opening track {track}"))?
                .positions()),
            _ => bail!("either --lift and --resort, or --track, is required"),
        }
    }
}
