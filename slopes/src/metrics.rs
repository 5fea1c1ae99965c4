use crate::{
    constants::METERS_PER_KM,
    math::{haversine_km, slope_angle_deg},
    Position, C,
};
use itertools::Itertools;

/// Summary measurements of a run, lift, or track.
///
/// Metrics are derived on demand from a path and never cached; the
/// same path always yields the same metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    /// Great-circle length in kilometers, rounded to 2 decimals.
    #[cfg_attr(feature = "serde", serde(rename = "lengthInKm"))]
    pub length_km: C,

    /// Highest minus lowest elevation, in whole meters.
    #[cfg_attr(feature = "serde", serde(rename = "verticalDrop"))]
    pub vertical_drop_m: i32,

    /// Steepest segment, in whole degrees.
    #[cfg_attr(feature = "serde", serde(rename = "maxSlope"))]
    pub max_slope_deg: i32,
}

impl Metrics {
    pub fn new(path: &[Position]) -> Self {
        Self::from_lines(std::iter::once(path))
    }

    /// Measures multi-part geometry, such as a GeoJSON
    /// `MultiLineString`.
    ///
    /// Lines are not joined: no segment runs from the end of one
    /// line to the start of the next.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a [Position]>,
    {
        let mut length_km = 0.0;
        let mut max_slope_deg: C = 0.0;
        let mut elev_range = ElevRange::default();

        for line in lines {
            length_km += raw_length_km(line);
            max_slope_deg = max_slope_deg.max(raw_max_slope_deg(line));
            elev_range.extend(line);
        }

        Self {
            length_km: round_hundredths(length_km),
            vertical_drop_m: round_whole(elev_range.span()),
            max_slope_deg: round_whole(max_slope_deg),
        }
    }
}

/// Returns the length of `path` in kilometers, rounded to 2
/// decimals.
pub fn length_km(path: &[Position]) -> C {
    round_hundredths(raw_length_km(path))
}

/// Returns the elevation range of `path` in whole meters.
///
/// Missing (zero) and non-finite elevations count as 0 and still take
/// part in the comparison. An empty path has no drop.
pub fn vertical_drop_m(path: &[Position]) -> i32 {
    let mut range = ElevRange::default();
    range.extend(path);
    round_whole(range.span())
}

/// Returns the steepest segment angle of `path` in whole degrees.
pub fn max_slope_deg(path: &[Position]) -> i32 {
    round_whole(raw_max_slope_deg(path))
}

fn raw_length_km(path: &[Position]) -> C {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| haversine_km(a.coord(), b.coord()))
        .sum()
}

fn raw_max_slope_deg(path: &[Position]) -> C {
    path.iter()
        .tuple_windows()
        .map(|(a, b)| {
            let horizontal_m = haversine_km(a.coord(), b.coord()) * METERS_PER_KM;
            let vertical_m = b.elev_or_zero() - a.elev_or_zero();
            slope_angle_deg(horizontal_m, vertical_m)
        })
        .fold(0.0, C::max)
}

/// Running min/max elevation.
#[derive(Default)]
struct ElevRange(Option<(C, C)>);

impl ElevRange {
    fn extend(&mut self, path: &[Position]) {
        for elev in path.iter().map(Position::elev_or_zero) {
            self.0 = Some(match self.0 {
                None => (elev, elev),
                Some((lo, hi)) => (lo.min(elev), hi.max(elev)),
            });
        }
    }

    fn span(&self) -> C {
        self.0.map_or(0.0, |(lo, hi)| hi - lo)
    }
}

fn round_hundredths(value: C) -> C {
    (value * 100.0).round() / 100.0
}

#[allow(clippy::cast_possible_truncation)]
fn round_whole(value: C) -> i32 {
    value.round() as i32
}
