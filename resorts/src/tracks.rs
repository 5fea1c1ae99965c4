//! Recorded GPX tracks.

use crate::ResortsError;
use gpx::{Gpx, Waypoint};
use log::debug;
use serde::Serialize;
use slopes::{Metrics, Position};
use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs::{self, File},
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

/// A single recorded fix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub position: Position,

    /// RFC 3339 timestamp, when the device recorded one.
    pub time: Option<String>,
}

impl From<&Waypoint> for TrackPoint {
    fn from(waypoint: &Waypoint) -> Self {
        let point = waypoint.point();
        Self {
            position: Position::new(point.x(), point.y(), waypoint.elevation.unwrap_or(0.0)),
            time: waypoint.time.as_ref().and_then(|time| time.format().ok()),
        }
    }
}

/// Every track point of a GPX file, in recorded order.
///
/// Multiple tracks and segments are flattened into one sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Track {
    /// Name of the first named track.
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn read<R: Read>(reader: R) -> Result<Self, ResortsError> {
        let gpx: Gpx = gpx::read(reader)?;
        let name = gpx.tracks.iter().find_map(|track| track.name.clone());
        let points = gpx
            .tracks
            .iter()
            .flat_map(|track| &track.segments)
            .flat_map(|segment| &segment.points)
            .map(TrackPoint::from)
            .collect();
        Ok(Self { name, points })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ResortsError> {
        let path = path.as_ref();
        let now = std::time::Instant::now();
        let track = Self::read(BufReader::new(File::open(path)?))?;
        debug!(
            "track; path: {}, len: {}, load_exec: {:?}",
            path.display(),
            track.points.len(),
            now.elapsed()
        );
        Ok(track)
    }

    pub fn positions(&self) -> Vec<Position> {
        self.points.iter().map(|point| point.position).collect()
    }

    pub fn metrics(&self) -> Metrics {
        Metrics::new(&self.positions())
    }
}

/// Outcome of [`TrackLibrary::import`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Imported {
    Added(String),

    /// A file by this name was already in the library and was left
    /// as is.
    AlreadyExists(String),
}

/// A directory of `.gpx` files.
#[derive(Debug, Clone)]
pub struct TrackLibrary {
    dir: PathBuf,
}

impl TrackLibrary {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the sorted file names of all tracks.
    ///
    /// The directory is created if it doesn't exist yet.
    pub fn list(&self) -> Result<Vec<String>, ResortsError> {
        fs::create_dir_all(&self.dir)?;
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if Some("gpx") != path.extension().and_then(OsStr::to_str) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                names.insert(name.to_owned());
            }
        }
        Ok(names.into_iter().collect())
    }

    pub fn open(&self, name: &str) -> Result<Track, ResortsError> {
        Track::open(self.path_of(name)?)
    }

    /// Copies the GPX file at `src` into the library under its own
    /// file name.
    ///
    /// The file must parse as GPX. An existing track of the same name
    /// is never overwritten.
    pub fn import<P: AsRef<Path>>(&self, src: P) -> Result<Imported, ResortsError> {
        let src = src.as_ref();
        let name = src
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| ResortsError::InvalidName(src.display().to_string()))?;
        let dest = self.path_of(name)?;

        fs::create_dir_all(&self.dir)?;
        if dest.exists() {
            return Ok(Imported::AlreadyExists(name.to_owned()));
        }

        Track::open(src)?;
        fs::copy(src, &dest)?;
        Ok(Imported::Added(name.to_owned()))
    }

    fn path_of(&self, name: &str) -> Result<PathBuf, ResortsError> {
        let plain = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(|c| c == '/' || c == '\\');
        if plain {
            Ok(self.dir.join(name))
        } else {
            Err(ResortsError::InvalidName(name.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Imported, Track, TrackLibrary};
    use crate::ResortsError;
    use slopes::Position;
    use std::fs;

    const MORNING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="skimap-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning laps</name>
    <trkseg>
      <trkpt lat="39.1968" lon="-120.2360">
        <ele>10</ele>
        <time>2024-01-06T17:00:00Z</time>
      </trkpt>
      <trkpt lat="39.1969" lon="-120.2358">
        <ele>0</ele>
        <time>2024-01-06T17:00:05Z</time>
      </trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="39.1970" lon="-120.2356"></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

    #[test]
    fn test_read() {
        let track = Track::read(MORNING.as_bytes()).unwrap();
        assert_eq!(track.name.as_deref(), Some("Morning laps"));
        assert_eq!(
            track.positions(),
            vec![
                Position::new(-120.2360, 39.1968, 10.0),
                Position::new(-120.2358, 39.1969, 0.0),
                Position::new(-120.2356, 39.1970, 0.0),
            ]
        );
        assert!(track.points[0].time.as_deref().unwrap().starts_with("2024-01-06T17:00:00"));
        assert_eq!(track.points[2].time, None);
    }

    #[test]
    fn test_metrics() {
        let track = Track::read(MORNING.as_bytes()).unwrap();
        let metrics = track.metrics();
        assert_eq!(metrics.vertical_drop_m, 10);
        assert_eq!(metrics.max_slope_deg, 26);
        assert!(metrics.length_km > 0.0);
    }

    #[test]
    fn test_not_gpx() {
        assert!(matches!(
            Track::read("<kml></kml>".as_bytes()),
            Err(ResortsError::Gpx(_))
        ));
    }

    #[test]
    fn test_list_creates_dir() {
        let root = tempfile::tempdir().unwrap();
        let library = TrackLibrary::new(root.path().join("GPS"));
        assert!(library.list().unwrap().is_empty());
        assert!(library.dir().is_dir());
    }

    #[test]
    fn test_list_only_gpx() {
        let root = tempfile::tempdir().unwrap();
        let library = TrackLibrary::new(root.path());
        fs::write(root.path().join("b.gpx"), MORNING).unwrap();
        fs::write(root.path().join("a.gpx"), MORNING).unwrap();
        fs::write(root.path().join("notes.txt"), "powder day").unwrap();
        assert_eq!(library.list().unwrap(), vec!["a.gpx", "b.gpx"]);
    }

    #[test]
    fn test_import() {
        let incoming = tempfile::tempdir().unwrap();
        let src = incoming.path().join("morning.gpx");
        fs::write(&src, MORNING).unwrap();

        let root = tempfile::tempdir().unwrap();
        let library = TrackLibrary::new(root.path().join("GPS"));
        assert_eq!(
            library.import(&src).unwrap(),
            Imported::Added("morning.gpx".to_owned())
        );
        assert_eq!(library.list().unwrap(), vec!["morning.gpx"]);
        assert_eq!(library.open("morning.gpx").unwrap().points.len(), 3);

        fs::write(&src, "changed").unwrap();
        assert_eq!(
            library.import(&src).unwrap(),
            Imported::AlreadyExists("morning.gpx".to_owned())
        );
        assert_eq!(library.open("morning.gpx").unwrap().points.len(), 3);
    }

    #[test]
    fn test_import_rejects_invalid_gpx() {
        let incoming = tempfile::tempdir().unwrap();
        let src = incoming.path().join("broken.gpx");
        fs::write(&src, "not xml at all").unwrap();

        let root = tempfile::tempdir().unwrap();
        let library = TrackLibrary::new(root.path());
        assert!(library.import(&src).is_err());
        assert!(library.list().unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_names() {
        let root = tempfile::tempdir().unwrap();
        let library = TrackLibrary::new(root.path());
        for name in ["../secret.gpx", "a/b.gpx", "..", ""] {
            assert!(
                matches!(library.open(name), Err(ResortsError::InvalidName(_))),
                "{name}"
            );
        }
    }
}
