//! Runs, lifts, and ski areas stored as GeoJSON feature collections.
//!
//! Features belong to a resort through their `skiAreas` property, a
//! list of ski area features each carrying a `properties.name`.

use crate::{atomic, ski_area::SkiArea, ResortsError};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue, Value as GeomValue};
use log::{debug, warn};
use rayon::prelude::*;
use slopes::{Metrics, Position};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
    str::FromStr,
};

/// How a resort name is compared against a feature's ski areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResortMatch {
    /// Case-insensitive substring.
    Contains,

    /// Byte-for-byte equality.
    Exact,
}

impl ResortMatch {
    /// A blank `resort` matches nothing.
    fn matches(self, ski_area: &str, resort: &str) -> bool {
        if resort.trim().is_empty() {
            return false;
        }
        match self {
            Self::Contains => ski_area.to_lowercase().contains(&resort.to_lowercase()),
            Self::Exact => ski_area == resort,
        }
    }
}

/// An in-memory GeoJSON feature collection.
#[derive(Debug, Clone)]
pub struct FeatureSource {
    collection: FeatureCollection,
}

impl FeatureSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ResortsError> {
        let path = path.as_ref();
        let now = std::time::Instant::now();
        let source = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(
            "features; path: {}, len: {}, load_exec: {:?}",
            path.display(),
            source.len(),
            now.elapsed()
        );
        Ok(source)
    }

    pub fn from_reader<R: Read>(rdr: R) -> Result<Self, ResortsError> {
        Self::try_from(GeoJson::from_reader(rdr)?)
    }

    pub fn len(&self) -> usize {
        self.collection.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.features.is_empty()
    }

    pub fn features(&self) -> &[Feature] {
        &self.collection.features
    }

    pub fn into_collection(self) -> FeatureCollection {
        self.collection
    }

    /// Returns features belonging to `resort`.
    pub fn matching<'a, 'b>(
        &'a self,
        resort: &'b str,
        mode: ResortMatch,
    ) -> impl Iterator<Item = &'a Feature> + 'b
    where
        'a: 'b,
    {
        self.collection
            .features
            .iter()
            .filter(move |feature| ski_area_names(feature).any(|name| mode.matches(name, resort)))
    }

    /// Returns a copy of the features belonging to `resort`, each
    /// line feature augmented with its [`Metrics`].
    pub fn for_resort(&self, resort: &str) -> FeatureCollection {
        let now = std::time::Instant::now();
        let mut features: Vec<Feature> = self
            .matching(resort, ResortMatch::Contains)
            .cloned()
            .collect();
        let augmented = features
            .par_iter_mut()
            .filter_map(augment)
            .count();
        debug!(
            "resort; name: {resort}, len: {}, augmented: {augmented}, exec: {:?}",
            features.len(),
            now.elapsed()
        );
        collection(features)
    }

    /// Returns an unmodified copy of the features whose ski area is
    /// named exactly `resort`.
    pub fn exact_resort(&self, resort: &str) -> FeatureCollection {
        collection(self.matching(resort, ResortMatch::Exact).cloned().collect())
    }

    /// Returns the first feature of `resort` whose own name contains
    /// `name`, ignoring case.
    pub fn find_named(&self, resort: &str, name: &str) -> Option<&Feature> {
        let name = name.to_lowercase();
        self.matching(resort, ResortMatch::Contains).find(|feature| {
            feature_name(feature).map_or(false, |n| n.to_lowercase().contains(&name))
        })
    }

    /// Returns the first ski area whose name contains `name`,
    /// ignoring case.
    ///
    /// Unlike runs and lifts, ski area features carry their name
    /// directly in `properties.name`.
    pub fn ski_area(&self, name: &str) -> Option<SkiArea> {
        if name.trim().is_empty() {
            return None;
        }
        let name = name.to_lowercase();
        self.collection
            .features
            .iter()
            .find(|feature| {
                feature_name(feature).map_or(false, |n| n.to_lowercase().contains(&name))
            })
            .map(SkiArea::from)
    }
}

impl TryFrom<GeoJson> for FeatureSource {
    type Error = ResortsError;

    fn try_from(geojson: GeoJson) -> Result<Self, ResortsError> {
        match geojson {
            GeoJson::FeatureCollection(collection) => Ok(Self { collection }),
            _ => Err(ResortsError::NotFeatureCollection),
        }
    }
}

impl FromStr for FeatureSource {
    type Err = ResortsError;

    fn from_str(s: &str) -> Result<Self, ResortsError> {
        Self::try_from(s.parse::<GeoJson>()?)
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Names of every ski area `feature` belongs to.
fn ski_area_names(feature: &Feature) -> impl Iterator<Item = &str> {
    feature
        .property("skiAreas")
        .and_then(JsonValue::as_array)
        .into_iter()
        .flatten()
        .filter_map(|area| area.get("properties")?.get("name")?.as_str())
}

/// Returns `properties.name` of `feature`, if any.
pub fn feature_name(feature: &Feature) -> Option<&str> {
    feature.property("name").and_then(JsonValue::as_str)
}

/// Returns the lines of a `LineString` or `MultiLineString` feature.
///
/// Any other geometry, or no geometry at all, has no lines.
pub fn feature_paths(feature: &Feature) -> Vec<Vec<Position>> {
    match feature.geometry.as_ref().map(|geometry| &geometry.value) {
        Some(GeomValue::LineString(line)) => vec![positions(line)],
        Some(GeomValue::MultiLineString(lines)) => {
            lines.iter().map(|line| positions(line)).collect()
        }
        _ => Vec::new(),
    }
}

/// Converts GeoJSON positions, skipping any too short to hold a
/// longitude and latitude.
pub fn positions(line: &[geojson::Position]) -> Vec<Position> {
    line.iter()
        .filter_map(|values| {
            let position = Position::from_slice(values);
            if position.is_none() {
                warn!("skipping malformed position {values:?}");
            }
            position
        })
        .collect()
}

/// Measures a line feature and stores the result in its properties
/// as `lengthInKm`, `verticalDrop`, and `maxSlope`.
///
/// Features without line geometry are left untouched.
pub fn augment(feature: &mut Feature) -> Option<Metrics> {
    let paths = feature_paths(feature);
    if paths.is_empty() {
        return None;
    }
    let metrics = Metrics::from_lines(paths.iter().map(Vec::as_slice));
    if let Ok(JsonValue::Object(values)) = serde_json::to_value(metrics) {
        feature
            .properties
            .get_or_insert_with(JsonObject::new)
            .extend(values);
    }
    Some(metrics)
}

/// Reads back metrics previously stored by [`augment`].
pub fn read_metrics(feature: &Feature) -> Option<Metrics> {
    let properties = feature.properties.clone()?;
    serde_json::from_value(JsonValue::Object(properties)).ok()
}

/// Writes `collection` to `path` as pretty-printed GeoJSON.
pub fn write_collection<P: AsRef<Path>>(
    path: P,
    collection: &FeatureCollection,
) -> Result<(), ResortsError> {
    atomic::write_json(path.as_ref(), collection)
}

/// Result of [`append_resort`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub resort: String,
    pub path: PathBuf,

    /// Features taken from the source.
    pub added: usize,

    /// Features in the file after writing.
    pub total: usize,
}

/// Appends the features of `resort` (exact match) to
/// `<out_dir>/<resort>_runs.json`, creating the file if needed.
///
/// Returns `None`, without touching the file system, when the source
/// has nothing for `resort`. An existing file that can't be read is
/// replaced.
pub fn append_resort(
    source: &FeatureSource,
    resort: &str,
    out_dir: &Path,
) -> Result<Option<SplitOutput>, ResortsError> {
    let new_features = source.exact_resort(resort).features;
    if new_features.is_empty() {
        return Ok(None);
    }

    let path = out_dir.join(format!("{}_runs.json", sanitize_file_name(resort)));
    let mut features = if path.exists() {
        match FeatureSource::open(&path) {
            Ok(existing) => existing.into_collection().features,
            Err(e) => {
                warn!("replacing unreadable {}: {e}", path.display());
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    let added = new_features.len();
    features.extend(new_features);
    let total = features.len();
    write_collection(&path, &collection(features))?;

    Ok(Some(SplitOutput {
        resort: resort.to_owned(),
        path,
        added,
        total,
    }))
}

/// Turns a resort name into a safe file name stem.
///
/// Everything outside `[A-Za-z0-9_-]` becomes `_`, runs of `_`
/// collapse to one, and leading or trailing `_` are dropped.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let ch = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            ch
        } else {
            '_'
        };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    match out.trim_matches('_') {
        "" => "unnamed".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        append_resort, augment, feature_name, feature_paths, positions, read_metrics,
        sanitize_file_name, FeatureSource, ResortMatch,
    };
    use crate::ResortsError;
    use approx::assert_relative_eq;
    use slopes::{Metrics, Position};

    const RUNS: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {
          "type": "Feature",
          "properties": {
            "name": "Mountain Run",
            "skiAreas": [{ "properties": { "name": "Palisades Tahoe Olympic Valley" } }]
          },
          "geometry": {
            "type": "LineString",
            "coordinates": [[-120.2358, 39.1969, 0], [-120.2360, 39.1968, 10]]
          }
        },
        {
          "type": "Feature",
          "properties": {
            "name": "Sherwood",
            "skiAreas": [{ "properties": { "name": "Palisades Tahoe Alpine Meadows" } }]
          },
          "geometry": {
            "type": "MultiLineString",
            "coordinates": [
              [[0, 0, 0], [0.008993216059187304, 0, 100]],
              [[0.008993216059187304, 0, 5000], [0.017986432118374608, 0, 5000]]
            ]
          }
        },
        {
          "type": "Feature",
          "properties": {
            "name": "Big Springs Gondola",
            "skiAreas": [
              { "properties": { "name": "Northstar at Tahoe" } },
              { "properties": { "name": "Northstar California" } }
            ]
          },
          "geometry": { "type": "Point", "coordinates": [-120.1211, 39.2746] }
        },
        {
          "type": "Feature",
          "properties": { "name": "Orphan" },
          "geometry": null
        }
      ]
    }"#;

    fn runs() -> FeatureSource {
        RUNS.parse().unwrap()
    }

    fn names(collection: &geojson::FeatureCollection) -> Vec<&str> {
        collection
            .features
            .iter()
            .filter_map(feature_name)
            .collect()
    }

    #[test]
    fn test_parse() {
        let source = runs();
        assert_eq!(source.len(), 4);
        assert!(!source.is_empty());
    }

    #[test]
    fn test_not_a_collection() {
        let err = r#"{"type": "Point", "coordinates": [0, 0]}"#
            .parse::<FeatureSource>()
            .unwrap_err();
        assert!(matches!(err, ResortsError::NotFeatureCollection));
    }

    #[test]
    fn test_for_resort_ignores_case() {
        let source = runs();
        assert_eq!(
            names(&source.for_resort("palisades")),
            vec!["Mountain Run", "Sherwood"]
        );
        assert_eq!(names(&source.for_resort("OLYMPIC")), vec!["Mountain Run"]);
        assert_eq!(
            names(&source.for_resort("Tahoe")),
            vec!["Mountain Run", "Sherwood", "Big Springs Gondola"]
        );
        assert!(source.for_resort("Mammoth").features.is_empty());
    }

    #[test]
    fn test_blank_resort_matches_nothing() {
        let source = runs();
        assert!(source.for_resort("").features.is_empty());
        assert!(source.for_resort("  ").features.is_empty());
        assert!(source.exact_resort("").features.is_empty());
        assert!(source.find_named("", "Gondola").is_none());
        assert!(source.ski_area("").is_none());
    }

    #[test]
    fn test_any_ski_area_matches() {
        let source = runs();
        assert_eq!(
            names(&source.for_resort("california")),
            vec!["Big Springs Gondola"]
        );
    }

    #[test]
    fn test_for_resort_augments_lines() {
        let source = runs();
        let collection = source.for_resort("palisades");

        let run = &collection.features[0];
        assert_eq!(run.property("lengthInKm").and_then(|v| v.as_f64()), Some(0.02));
        assert_eq!(run.property("verticalDrop").and_then(|v| v.as_i64()), Some(10));
        assert_eq!(run.property("maxSlope").and_then(|v| v.as_i64()), Some(26));
        assert_eq!(run.property("name").and_then(|v| v.as_str()), Some("Mountain Run"));

        let sherwood = read_metrics(&collection.features[1]).unwrap();
        assert_relative_eq!(sherwood.length_km, 2.0);
        assert_eq!(sherwood.vertical_drop_m, 5_000);
        assert_eq!(sherwood.max_slope_deg, 6);

        // The source itself is not modified.
        assert!(read_metrics(&source.features()[0]).is_none());
    }

    #[test]
    fn test_points_are_not_augmented() {
        let collection = runs().for_resort("northstar");
        assert_eq!(collection.features.len(), 1);
        assert!(collection.features[0].property("lengthInKm").is_none());
        assert!(read_metrics(&collection.features[0]).is_none());
    }

    #[test]
    fn test_exact_resort() {
        let source = runs();
        assert_eq!(
            names(&source.exact_resort("Palisades Tahoe Olympic Valley")),
            vec!["Mountain Run"]
        );
        assert!(source
            .exact_resort("palisades tahoe olympic valley")
            .features
            .is_empty());
        assert_eq!(
            source
                .matching("Palisades", ResortMatch::Exact)
                .count(),
            0
        );
    }

    #[test]
    fn test_find_named() {
        let source = runs();
        let sherwood = source.find_named("alpine", "sher").unwrap();
        assert_eq!(feature_name(sherwood), Some("Sherwood"));
        assert!(source.find_named("olympic", "sherwood").is_none());
    }

    #[test]
    fn test_metrics_round_trip() {
        let mut feature = runs().features()[0].clone();
        let metrics = augment(&mut feature).unwrap();
        assert_eq!(read_metrics(&feature), Some(metrics));

        let json = serde_json::to_string(&feature).unwrap();
        let reread: geojson::Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(read_metrics(&reread), Some(metrics));
        assert_eq!(
            metrics,
            Metrics {
                length_km: 0.02,
                vertical_drop_m: 10,
                max_slope_deg: 26,
            }
        );
    }

    #[test]
    fn test_feature_paths() {
        let source = runs();
        assert_eq!(feature_paths(&source.features()[0]).len(), 1);
        assert_eq!(feature_paths(&source.features()[1]).len(), 2);
        assert!(feature_paths(&source.features()[2]).is_empty());
        assert!(feature_paths(&source.features()[3]).is_empty());
    }

    #[test]
    fn test_positions_skip_malformed() {
        let line = vec![vec![1.0], vec![-120.0, 39.0], vec![-120.1, 39.1, 2_000.0]];
        assert_eq!(
            positions(&line),
            vec![
                Position::new(-120.0, 39.0, 0.0),
                Position::new(-120.1, 39.1, 2_000.0),
            ]
        );
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(
            sanitize_file_name("Heavenly Mountain Resort"),
            "Heavenly_Mountain_Resort"
        );
        assert_eq!(
            sanitize_file_name("  Palisades Tahoe / Olympic Valley!! "),
            "Palisades_Tahoe_Olympic_Valley"
        );
        assert_eq!(sanitize_file_name("Sierra-at-Tahoe"), "Sierra-at-Tahoe");
        assert_eq!(sanitize_file_name("***"), "unnamed");
        assert_eq!(sanitize_file_name(""), "unnamed");
    }

    #[test]
    fn test_append_resort() {
        let dir = tempfile::tempdir().unwrap();
        let source = runs();
        let resort = "Palisades Tahoe Olympic Valley";

        let first = append_resort(&source, resort, dir.path()).unwrap().unwrap();
        assert_eq!(
            first.path,
            dir.path().join("Palisades_Tahoe_Olympic_Valley_runs.json")
        );
        assert_eq!((first.added, first.total), (1, 1));

        let second = append_resort(&source, resort, dir.path()).unwrap().unwrap();
        assert_eq!((second.added, second.total), (1, 2));

        let written = FeatureSource::open(&second.path).unwrap();
        assert_eq!(written.len(), 2);
        // Extraction copies features verbatim.
        assert!(read_metrics(&written.features()[0]).is_none());
    }

    #[test]
    fn test_append_resort_without_features() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(append_resort(&runs(), "Mammoth Mountain", dir.path()).unwrap(), None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_append_replaces_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Northstar_at_Tahoe_runs.json");
        std::fs::write(&path, "not json").unwrap();
        let out = append_resort(&runs(), "Northstar at Tahoe", dir.path())
            .unwrap()
            .unwrap();
        assert_eq!(out.total, 1);
    }
}
