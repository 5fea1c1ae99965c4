use crate::C;
use geo::{Coord, Point};

/// A point on a run, lift, or track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Longitude in decimal degrees (WGS84).
    pub lon: C,

    /// Latitude in decimal degrees (WGS84).
    pub lat: C,

    /// Elevation in meters.
    pub elev_m: C,
}

impl Position {
    pub const fn new(lon: C, lat: C, elev_m: C) -> Self {
        Self { lon, lat, elev_m }
    }

    /// Builds a position from a GeoJSON style `[lon, lat, elev?]`.
    ///
    /// Missing elevation is 0. Returns `None` if `values` has fewer
    /// than two entries; anything past the third is ignored.
    pub fn from_slice(values: &[C]) -> Option<Self> {
        match *values {
            [lon, lat] => Some(Self::new(lon, lat, 0.0)),
            [lon, lat, elev_m, ..] => Some(Self::new(lon, lat, elev_m)),
            _ => None,
        }
    }

    /// Horizontal component of this position.
    pub fn coord(&self) -> Coord<C> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    /// Elevation, with non-finite values read as 0.
    pub(crate) fn elev_or_zero(&self) -> C {
        if self.elev_m.is_finite() {
            self.elev_m
        } else {
            0.0
        }
    }

    /// Copy of `self` with a non-finite elevation replaced by 0.
    pub(crate) fn finite(&self) -> Self {
        Self {
            elev_m: self.elev_or_zero(),
            ..*self
        }
    }

    /// Linear interpolation on every axis, `t == 0` is `self`.
    ///
    /// Elevations go through [`Self::elev_or_zero`] first, the same as
    /// in the metrics.
    pub(crate) fn lerp(&self, end: &Self, t: C) -> Self {
        let (from, to) = (self.elev_or_zero(), end.elev_or_zero());
        Self {
            lon: self.lon + (end.lon - self.lon) * t,
            lat: self.lat + (end.lat - self.lat) * t,
            elev_m: from + (to - from) * t,
        }
    }
}

impl From<[C; 3]> for Position {
    fn from([lon, lat, elev_m]: [C; 3]) -> Self {
        Self::new(lon, lat, elev_m)
    }
}

impl From<[C; 2]> for Position {
    fn from([lon, lat]: [C; 2]) -> Self {
        Self::new(lon, lat, 0.0)
    }
}

impl From<Coord<C>> for Position {
    fn from(Coord { x, y }: Coord<C>) -> Self {
        Self::new(x, y, 0.0)
    }
}

impl From<Point<C>> for Position {
    fn from(point: Point<C>) -> Self {
        Self::from(point.0)
    }
}

impl From<Position> for [C; 3] {
    fn from(Position { lon, lat, elev_m }: Position) -> Self {
        [lon, lat, elev_m]
    }
}
