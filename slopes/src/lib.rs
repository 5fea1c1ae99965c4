//! # Slopes
//!
//! `slopes` measures ski runs, lifts, and recorded tracks.
//!
//! A path is a slice of [`Position`]s (longitude, latitude, and
//! elevation). Every routine here is a pure function of its input:
//! nothing allocates shared state, nothing does I/O, and nothing
//! fails. Degenerate paths (fewer than two points) measure as zero.

mod animate;
mod constants;
mod math;
mod metrics;
mod position;

pub use crate::{
    animate::{point_along, Animation, Frame, Frames},
    constants::{MEAN_EARTH_RADIUS_KM, METERS_PER_KM},
    math::{haversine_km, slope_angle_deg},
    metrics::{length_km, max_slope_deg, vertical_drop_m, Metrics},
    position::Position,
};
pub use geo;

/// Base floating point type used for all coordinates and calculations.
pub type C = f64;
