use crate::C;

/// Mean earth radius in kilometers.
///
/// Both distance and slope use this radius so the two stay
/// consistent with each other.
pub const MEAN_EARTH_RADIUS_KM: C = 6_371.0;

pub const METERS_PER_KM: C = 1_000.0;
