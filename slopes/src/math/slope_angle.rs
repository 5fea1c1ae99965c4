use crate::C;

/// Returns the slope angle, in degrees from horizontal, of a segment
/// spanning `horizontal_m` over the ground and `vertical_m` of
/// elevation change.
///
/// The sign of `vertical_m` is ignored: climbing and descending are
/// equally steep. A segment with no horizontal extent but some
/// vertical extent is a cliff and measures 90°. A segment with
/// neither measures 0°.
pub fn slope_angle_deg(horizontal_m: C, vertical_m: C) -> C {
    // atan2(v, h) == atan(v / h) for h > 0, and stays finite at h == 0.
    vertical_m.abs().atan2(horizontal_m.abs()).to_degrees()
}
