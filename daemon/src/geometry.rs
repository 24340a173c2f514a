use std::f64::consts::PI;
use std::fmt;

/// Degrees of dial rotation per minute.
pub const DEGREES_PER_MINUTE: f64 = 6.0;

/// Span used in place of a full circle, which SVG cannot draw as a single arc.
const MAX_ARC_SPAN: f64 = 359.99;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Converts a minute on the dial to degrees clockwise from 12 o'clock.
pub fn minutes_to_degrees(minutes: f64) -> f64 {
    minutes * DEGREES_PER_MINUTE
}

/// Converts a polar coordinate around `(cx, cy)` to Cartesian. `angle` is in
/// degrees, 0 at 12 o'clock, increasing clockwise (SVG's y axis points down).
pub fn polar_to_cartesian(cx: f64, cy: f64, radius: f64, angle: f64) -> Point {
    let radians = (angle - 90.0) * PI / 180.0;
    Point {
        x: cx + radius * radians.cos(),
        y: cy + radius * radians.sin(),
    }
}

/// End angle adjusted so the sweep from `start` is always clockwise.
pub fn unwrap_end_angle(start: f64, end: f64) -> f64 {
    if end < start {
        end + 360.0
    } else {
        end
    }
}

/// Angle halfway along the clockwise sweep from `start` to `end`.
pub fn mid_angle(start: f64, end: f64) -> f64 {
    (start + unwrap_end_angle(start, end)) / 2.0
}

/// Annular band between two radii, swept clockwise from `start_angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcBand {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    /// End angle after wraparound and full-circle adjustment.
    pub end_angle: f64,
    pub large_arc: bool,
}

impl ArcBand {
    pub fn new(
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Self {
        let mut end = unwrap_end_angle(start_angle, end_angle);
        if end - start_angle >= 360.0 {
            end = start_angle + MAX_ARC_SPAN;
        }
        Self {
            center,
            inner_radius,
            outer_radius,
            start_angle,
            end_angle: end,
            large_arc: end - start_angle > 180.0,
        }
    }

    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    fn at(&self, radius: f64, angle: f64) -> Point {
        polar_to_cartesian(self.center.x, self.center.y, radius, angle)
    }

    /// SVG path data: outer arc clockwise, line inward, inner arc back.
    pub fn path_data(&self) -> String {
        self.to_string()
    }

    /// True if `p` lies inside the band. Angles are measured clockwise from 12.
    pub fn contains(&self, p: Point) -> bool {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let r = (dx * dx + dy * dy).sqrt();
        if r < self.inner_radius || r > self.outer_radius {
            return false;
        }
        let angle = angle_of(self.center, p);
        let offset = (angle - self.start_angle).rem_euclid(360.0);
        offset <= self.span()
    }
}

impl fmt::Display for ArcBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start_outer = self.at(self.outer_radius, self.start_angle);
        let end_outer = self.at(self.outer_radius, self.end_angle);
        let start_inner = self.at(self.inner_radius, self.end_angle);
        let end_inner = self.at(self.inner_radius, self.start_angle);
        let large = u8::from(self.large_arc);

        write!(
            f,
            "M {} {} A {} {} 0 {large} 1 {} {} L {} {} A {} {} 0 {large} 0 {} {} Z",
            start_outer.x,
            start_outer.y,
            self.outer_radius,
            self.outer_radius,
            end_outer.x,
            end_outer.y,
            start_inner.x,
            start_inner.y,
            self.inner_radius,
            self.inner_radius,
            end_inner.x,
            end_inner.y,
        )
    }
}

/// Dial angle of `p` seen from `center`, in [0, 360).
pub fn angle_of(center: Point, p: Point) -> f64 {
    let degrees = (p.y - center.y).atan2(p.x - center.x).to_degrees() + 90.0;
    degrees.rem_euclid(360.0)
}

pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Minute-hand angle with smooth sub-minute motion.
pub fn minute_hand_angle(minutes: u32, seconds: u32) -> f64 {
    f64::from(minutes) * 6.0 + f64::from(seconds) * 0.1
}

/// Hour-hand angle on a 12-hour dial with smooth sub-hour motion.
pub fn hour_hand_angle(hours: u32, minutes: u32) -> f64 {
    f64::from(hours % 12) * 30.0 + f64::from(minutes) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;
    const ORIGIN: Point = Point { x: 300.0, y: 300.0 };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // ── minutes_to_degrees ────────────────────────────────────────────────────

    #[test]
    fn every_minute_maps_to_six_degrees() {
        for m in 0..60 {
            assert_eq!(minutes_to_degrees(f64::from(m)), f64::from(m * 6));
        }
        assert_eq!(minutes_to_degrees(0.0), 0.0);
        assert_eq!(minutes_to_degrees(59.0), 354.0);
    }

    // ── polar_to_cartesian ────────────────────────────────────────────────────

    #[test]
    fn zero_degrees_points_to_twelve_o_clock() {
        let p = polar_to_cartesian(300.0, 300.0, 100.0, 0.0);
        assert!((p.x - 300.0).abs() < EPS);
        assert!((p.y - 200.0).abs() < EPS);
    }

    #[test]
    fn ninety_degrees_points_to_three_o_clock() {
        let p = polar_to_cartesian(300.0, 300.0, 100.0, 90.0);
        assert!((p.x - 400.0).abs() < EPS);
        assert!((p.y - 300.0).abs() < EPS);
    }

    #[test]
    fn one_eighty_degrees_points_to_six_o_clock() {
        let p = polar_to_cartesian(300.0, 300.0, 100.0, 180.0);
        assert!((p.x - 300.0).abs() < EPS);
        assert!((p.y - 400.0).abs() < EPS);
    }

    #[test]
    fn polar_conversion_is_repeatable() {
        let a = polar_to_cartesian(12.5, -3.0, 77.0, 213.0);
        let b = polar_to_cartesian(12.5, -3.0, 77.0, 213.0);
        assert_eq!(a, b);
    }

    // ── ArcBand ───────────────────────────────────────────────────────────────

    #[test]
    fn wrapping_arc_unwraps_end_angle() {
        let band = ArcBand::new(ORIGIN, 60.0, 190.0, 240.0, 30.0);
        assert_eq!(band.end_angle, 390.0);
        assert_eq!(band.span(), 150.0);
        assert!(!band.large_arc);
    }

    #[test]
    fn span_over_half_circle_sets_large_arc() {
        let band = ArcBand::new(ORIGIN, 60.0, 190.0, 0.0, 186.0);
        assert!(band.large_arc);
        let exactly_half = ArcBand::new(ORIGIN, 60.0, 190.0, 0.0, 180.0);
        assert!(!exactly_half.large_arc);
    }

    #[test]
    fn full_circle_is_clamped_below_360() {
        let band = ArcBand::new(ORIGIN, 60.0, 190.0, 90.0, 450.0);
        assert!(band.span() < 360.0);
        assert!(close(band.span(), 359.99));
        assert!(band.large_arc);
    }

    #[test]
    fn path_data_sweeps_outer_clockwise_and_inner_back() {
        let band = ArcBand::new(ORIGIN, 50.0, 100.0, 0.0, 90.0);
        let d = band.path_data();
        assert!(d.starts_with("M 300 200 A 100 100 0 0 1 400 300 L 350 300 A 50 50 0 0 0 300 250"));
        assert!(d.ends_with('Z'));
    }

    #[test]
    fn band_contains_points_inside_its_sweep() {
        let band = ArcBand::new(ORIGIN, 60.0, 190.0, 240.0, 30.0);
        let inside_left = polar_to_cartesian(300.0, 300.0, 120.0, 300.0);
        let inside_top = polar_to_cartesian(300.0, 300.0, 120.0, 10.0);
        let outside_sweep = polar_to_cartesian(300.0, 300.0, 120.0, 90.0);
        let too_close = polar_to_cartesian(300.0, 300.0, 20.0, 300.0);
        assert!(band.contains(inside_left));
        assert!(band.contains(inside_top));
        assert!(!band.contains(outside_sweep));
        assert!(!band.contains(too_close));
    }

    // ── mid_angle / angle_of ──────────────────────────────────────────────────

    #[test]
    fn mid_angle_follows_wraparound() {
        assert_eq!(mid_angle(150.0, 240.0), 195.0);
        assert_eq!(mid_angle(240.0, 30.0), 315.0);
    }

    #[test]
    fn angle_of_inverts_polar_conversion() {
        for deg in [0.0, 45.0, 90.0, 135.0, 270.0, 359.0] {
            let p = polar_to_cartesian(ORIGIN.x, ORIGIN.y, 80.0, deg);
            assert!(close(angle_of(ORIGIN, p), deg), "deg {deg}");
        }
    }

    // ── hands ─────────────────────────────────────────────────────────────────

    #[test]
    fn minute_hand_moves_smoothly_within_a_minute() {
        assert_eq!(minute_hand_angle(0, 0), 0.0);
        assert!(close(minute_hand_angle(17, 30), 105.0));
        assert!(close(minute_hand_angle(59, 59), 359.9));
    }

    #[test]
    fn hour_hand_wraps_twelve_hour_dial() {
        assert_eq!(hour_hand_angle(0, 0), 0.0);
        assert_eq!(hour_hand_angle(12, 0), 0.0);
        assert_eq!(hour_hand_angle(7, 30), 225.0);
        assert_eq!(hour_hand_angle(19, 30), 225.0);
    }
}
