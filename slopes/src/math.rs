mod haversine;
mod slope_angle;

pub use {haversine::haversine_km, slope_angle::slope_angle_deg};
