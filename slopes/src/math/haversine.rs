//! Great-circle distance on a spherical earth.
//!
//! [geo] ships a `HaversineDistance`, but it uses the IUGG mean
//! radius (6371.0088 km). Run lengths and slopes here must agree on a
//! single 6371 km radius, so we carry our own.
//!
//! [geo]: https://github.com/georust/geo/blob/main/geo/src/algorithm/haversine_distance.rs

use crate::{constants::MEAN_EARTH_RADIUS_KM, C};
use geo::Coord;

/// Returns the great-circle distance, in kilometers, from `a` to `b`.
///
/// Coordinates are `x: longitude, y: latitude` in decimal degrees.
/// Inputs are not range checked; out-of-range values produce a
/// mathematically defined, if meaningless, distance.
pub fn haversine_km(a: Coord<C>, b: Coord<C>) -> C {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let d_lat = (b.y - a.y).to_radians();
    let d_lon = (b.x - a.x).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // Rounding can push `h` just past 1.0 for near-antipodal points,
    // which would make `(1 - h).sqrt()` NaN.
    let h = h.clamp(0.0, 1.0);

    2.0 * MEAN_EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
