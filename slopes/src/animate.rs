//! Moving a marker along a lift or track.
//!
//! Progress is spread evenly over segments, not over distance: every
//! segment takes the same time to traverse no matter how long it is.
//! A lift drawn with a few long spans and a cluster of short ones near
//! a terminal will visibly speed up through the long spans.

use crate::{Position, C};
use std::time::Duration;

/// Returns the position `progress` of the way along `path`.
///
/// `progress` is clamped to `[0, 1]`, with `NaN` treated as 0.
/// `progress == 1` lands on the last point. Returns `None` when
/// `path` has fewer than two points, since there is no segment to
/// move along.
pub fn point_along(path: &[Position], progress: C) -> Option<Position> {
    if path.len() < 2 {
        return None;
    }

    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    if progress >= 1.0 {
        return path.last().map(Position::finite);
    }

    let total_segments = path.len() - 1;
    #[allow(clippy::cast_precision_loss)]
    let scaled = progress * total_segments as C;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segment = (scaled.floor() as usize).min(total_segments - 1);
    #[allow(clippy::cast_precision_loss)]
    let local_t = scaled - segment as C;

    let start = &path[segment];
    let end = &path[segment + 1];
    Some(start.lerp(end, local_t))
}

/// A looping animation along a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    /// Time for one full pass from the first point to the last.
    period: Duration,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERIOD)
    }
}

impl Animation {
    /// One pass every six seconds.
    pub const DEFAULT_PERIOD: Duration = Duration::from_millis(6_000);

    pub const fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns loop progress in `[0, 1)` after `elapsed` time.
    ///
    /// A zero period never advances.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, elapsed: Duration) -> C {
        let period = self.period.as_nanos();
        if period == 0 {
            return 0.0;
        }
        let into_loop = elapsed.as_nanos() % period;
        into_loop as C / period as C
    }

    /// Returns the marker position after `elapsed` time.
    pub fn position(&self, path: &[Position], elapsed: Duration) -> Option<Position> {
        point_along(path, self.progress(elapsed))
    }

    /// Returns `count` evenly spaced frames covering one loop.
    ///
    /// Frame `i` sits at progress `i / count`, so the last frame stops
    /// one step short of the end and the sequence loops seamlessly.
    pub fn frames<'a>(&self, path: &'a [Position], count: usize) -> Frames<'a> {
        Frames {
            path,
            period: self.period,
            total: if path.len() < 2 { 0 } else { count },
            current: 0,
        }
    }
}

/// A single frame from [`Animation::frames`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub elapsed: Duration,
    pub progress: C,
    pub position: Position,
}

pub struct Frames<'a> {
    path: &'a [Position],
    period: Duration,
    total: usize,
    current: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Frame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let progress = self.current as C / self.total as C;
        self.current += 1;
        let position = point_along(self.path, progress)?;
        Some(Frame {
            elapsed: self.period.mul_f64(progress),
            progress,
            position,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.current;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Frames<'a> {
    fn len(&self) -> usize {
        self.total - self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{point_along, Animation};
    use crate::Position;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn gondola() -> Vec<Position> {
        vec![
            Position::new(-120.2358, 39.1969, 1_890.0),
            Position::new(-120.2300, 39.1900, 2_100.0),
            Position::new(-120.2250, 39.1850, 2_500.0),
        ]
    }

    #[test]
    fn test_start_is_first_point() {
        let path = gondola();
        assert_eq!(point_along(&path, 0.0), Some(path[0]));
    }

    #[test]
    fn test_midpoint_of_two_points() {
        let path = [
            Position::new(-120.0, 39.0, 1_000.0),
            Position::new(-121.0, 40.0, 2_000.0),
        ];
        assert_eq!(
            point_along(&path, 0.5),
            Some(Position::new(-120.5, 39.5, 1_500.0))
        );
    }

    #[test]
    fn test_equal_time_per_segment() {
        let path = gondola();
        // Half way along a two segment path is the middle vertex, no
        // matter how long each segment is.
        let mid = point_along(&path, 0.5).unwrap();
        assert_relative_eq!(mid.lon, path[1].lon, epsilon = 1e-12);
        assert_relative_eq!(mid.lat, path[1].lat, epsilon = 1e-12);
        assert_relative_eq!(mid.elev_m, path[1].elev_m, epsilon = 1e-9);

        let quarter = point_along(&path, 0.25).unwrap();
        assert_relative_eq!(quarter.elev_m, 1_995.0, epsilon = 1e-9);
        let three_quarters = point_along(&path, 0.75).unwrap();
        assert_relative_eq!(three_quarters.elev_m, 2_300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_end_and_out_of_range() {
        let path = gondola();
        assert_eq!(point_along(&path, 1.0), Some(path[2]));
        assert_eq!(point_along(&path, 7.5), Some(path[2]));
        assert_eq!(point_along(&path, -0.5), Some(path[0]));
        assert_eq!(point_along(&path, f64::NAN), Some(path[0]));
    }

    #[test]
    fn test_nan_elevation_moves_as_zero() {
        // `<ele>NaN</ele>` parses as a float.
        let path = [
            Position::new(-120.0, 39.0, f64::NAN),
            Position::new(-121.0, 40.0, 200.0),
            Position::new(-122.0, 41.0, f64::NAN),
        ];
        assert_eq!(point_along(&path, 0.0).unwrap().elev_m, 0.0);
        assert_relative_eq!(point_along(&path, 0.25).unwrap().elev_m, 100.0);
        assert_relative_eq!(point_along(&path, 0.75).unwrap().elev_m, 100.0);
        assert_eq!(point_along(&path, 1.0), Some(Position::new(-122.0, 41.0, 0.0)));
    }

    #[test]
    fn test_degenerate_paths() {
        assert_eq!(point_along(&[], 0.5), None);
        assert_eq!(point_along(&[Position::new(1.0, 2.0, 3.0)], 0.5), None);
    }

    #[test]
    fn test_progress_loops() {
        let anim = Animation::default();
        assert_eq!(anim.period(), Duration::from_secs(6));
        assert_eq!(anim.progress(Duration::ZERO), 0.0);
        assert_relative_eq!(anim.progress(Duration::from_millis(1_500)), 0.25);
        assert_relative_eq!(anim.progress(Duration::from_millis(7_500)), 0.25);
        assert_eq!(anim.progress(Duration::from_millis(6_000)), 0.0);
        assert!(anim.progress(Duration::from_millis(5_999)) < 1.0);
    }

    #[test]
    fn test_zero_period() {
        let anim = Animation::new(Duration::ZERO);
        assert_eq!(anim.progress(Duration::from_secs(3)), 0.0);
    }

    #[test]
    fn test_position() {
        let path = gondola();
        let anim = Animation::new(Duration::from_secs(4));
        assert_eq!(
            anim.position(&path, Duration::from_secs(2)),
            point_along(&path, 0.5)
        );
        assert_eq!(anim.position(&path[..1], Duration::from_secs(2)), None);
    }

    #[test]
    fn test_frames() {
        let path = gondola();
        let anim = Animation::default();
        let frames = anim.frames(&path, 4);
        assert_eq!(frames.len(), 4);
        let frames: Vec<_> = frames.collect();
        let progress: Vec<f64> = frames.iter().map(|f| f.progress).collect();
        assert_eq!(progress, vec![0.0, 0.25, 0.5, 0.75]);
        assert_eq!(frames[0].position, path[0]);
        assert_eq!(frames[2].elapsed, Duration::from_secs(3));
    }

    #[test]
    fn test_no_frames_for_degenerate_path() {
        let anim = Animation::default();
        assert_eq!(anim.frames(&[], 10).len(), 0);
        assert_eq!(anim.frames(&gondola()[..1], 10).count(), 0);
    }
}
