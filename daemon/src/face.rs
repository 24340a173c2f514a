/// SVG rendering of the clock face: colored zone bands, point markers, tick
/// marks, hour numerals and the two hands.
///
/// Drawing order matches what a viewer expects to sit on top: frame, zones,
/// ticks and numerals, point markers, then the hands.
use std::fmt::Write;

use chrono::{NaiveTime, Timelike};

use crate::geometry::{
    distance, hour_hand_angle, mid_angle, minute_hand_angle, minutes_to_degrees,
    polar_to_cartesian, ArcBand, Point,
};
use crate::schedule::{Schedule, ScheduleEvent, LEAVE_ID};

pub const MIN_CANVAS_SIZE: u32 = 200;
pub const MAX_CANVAS_SIZE: u32 = 2000;
pub const DEFAULT_CANVAS_SIZE: u32 = 600;

/// Icons longer than this many UTF-16 code units are drawn with the smaller font.
const LONG_ICON_LEN: usize = 5;

/// Radii and sizes for a square canvas. All values are in SVG user units and
/// scale linearly with the canvas edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    pub size: f64,
    pub center: f64,
    /// Outer frame circle.
    pub radius: f64,
    /// Where numerals and minute ticks sit.
    pub clock_radius: f64,
    pub zone_outer_radius: f64,
    pub zone_inner_radius: f64,
    scale: f64,
}

impl FaceLayout {
    pub fn new(size: u32) -> Self {
        let size = f64::from(size.clamp(MIN_CANVAS_SIZE, MAX_CANVAS_SIZE));
        let scale = size / f64::from(DEFAULT_CANVAS_SIZE);
        let radius = size / 2.0 - 20.0 * scale;
        let clock_radius = radius - 40.0 * scale;
        Self {
            size,
            center: size / 2.0,
            radius,
            clock_radius,
            zone_outer_radius: clock_radius - 50.0 * scale,
            zone_inner_radius: 60.0 * scale,
            scale,
        }
    }

    fn s(&self, v: f64) -> f64 {
        v * self.scale
    }

    pub fn center_point(&self) -> Point {
        Point {
            x: self.center,
            y: self.center,
        }
    }

    pub fn zone_band(&self, event: &ScheduleEvent) -> ArcBand {
        ArcBand::new(
            self.center_point(),
            self.zone_inner_radius,
            self.zone_outer_radius,
            minutes_to_degrees(f64::from(event.start_minute)),
            minutes_to_degrees(f64::from(event.end_minute)),
        )
    }

    /// Icon anchor: angular midpoint of the sweep, radial midpoint of the band.
    pub fn zone_icon_position(&self, event: &ScheduleEvent) -> Point {
        let angle = mid_angle(
            minutes_to_degrees(f64::from(event.start_minute)),
            minutes_to_degrees(f64::from(event.end_minute)),
        );
        polar_to_cartesian(
            self.center,
            self.center,
            (self.zone_inner_radius + self.zone_outer_radius) / 2.0,
            angle,
        )
    }

    pub fn marker(&self, event: &ScheduleEvent) -> MarkerStyle {
        let emphasized = event.id == LEAVE_ID;
        let (offset, circle, font, stroke, spoke) = if emphasized {
            (45.0, 40.0, 32.0, 4.0, 6.0)
        } else {
            (25.0, 28.0, 24.0, 3.0, 4.0)
        };
        let angle = minutes_to_degrees(f64::from(event.start_minute));
        MarkerStyle {
            position: polar_to_cartesian(
                self.center,
                self.center,
                self.zone_outer_radius + self.s(offset),
                angle,
            ),
            circle_radius: self.s(circle),
            font_size: self.s(font),
            stroke_width: self.s(stroke),
            spoke_width: self.s(spoke),
            emphasized,
        }
    }
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CANVAS_SIZE)
    }
}

/// Placement of a point-event marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub position: Point,
    pub circle_radius: f64,
    pub font_size: f64,
    pub stroke_width: f64,
    pub spoke_width: f64,
    /// Larger marker with a pulsing halo.
    pub emphasized: bool,
}

/// Renders the schedule onto a clock face.
#[derive(Debug, Clone, Copy)]
pub struct ClockFace {
    schedule: Schedule,
    layout: FaceLayout,
}

impl ClockFace {
    pub fn new(schedule: Schedule, size: u32) -> Self {
        Self {
            schedule,
            layout: FaceLayout::new(size),
        }
    }

    #[cfg(test)]
    pub fn layout(&self) -> &FaceLayout {
        &self.layout
    }

    /// Returns the event drawn at canvas point `p`, topmost first: point
    /// markers, then zone bands.
    pub fn hit_test(&self, p: Point) -> Option<&'static ScheduleEvent> {
        let marker_hit = self.schedule.points().rev().find(|e| {
            let m = self.layout.marker(e);
            distance(m.position, p) <= m.circle_radius
        });
        marker_hit.or_else(|| {
            self.schedule
                .ranges()
                .rev()
                .find(|e| self.layout.zone_band(e).contains(p))
        })
    }

    /// Full SVG document for the given wall-clock time.
    pub fn render(&self, time: NaiveTime) -> String {
        let l = &self.layout;
        let mut svg = String::with_capacity(8 * 1024);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#,
            size = l.size
        );
        let _ = writeln!(
            svg,
            r##"<circle cx="{c}" cy="{c}" r="{r}" fill="white" stroke="#E5E7EB" stroke-width="{w}"/>"##,
            c = l.center,
            r = l.radius,
            w = l.s(15.0)
        );

        for event in self.schedule.ranges() {
            self.write_zone(&mut svg, event);
        }
        self.write_minute_ticks(&mut svg);
        self.write_hour_numerals(&mut svg);
        for event in self.schedule.points() {
            self.write_marker(&mut svg, event);
        }
        self.write_hands(&mut svg, time);

        svg.push_str("</svg>\n");
        svg
    }

    fn write_zone(&self, svg: &mut String, event: &ScheduleEvent) {
        let l = &self.layout;
        let band = l.zone_band(event);
        let icon = l.zone_icon_position(event);
        let long_icon = event.icon.encode_utf16().count() > LONG_ICON_LEN;
        let (font, nudge) = if long_icon { (32.0, 8.0) } else { (42.0, 10.0) };

        let _ = writeln!(svg, r#"<g id="zone-{}" style="cursor:pointer">"#, event.id);
        let _ = writeln!(
            svg,
            "<title>{} (click to preview: {})</title>",
            escape(event.label),
            event.sound_effect
        );
        let _ = writeln!(
            svg,
            r#"<path d="{}" fill="{}" stroke="white" stroke-width="{}"/>"#,
            band.path_data(),
            event.color,
            l.s(2.0)
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" fill="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}">{}</text>"#,
            icon.x,
            icon.y + l.s(nudge),
            event.text_color,
            l.s(font),
            escape(event.icon)
        );
        svg.push_str("</g>\n");
    }

    fn write_marker(&self, svg: &mut String, event: &ScheduleEvent) {
        let l = &self.layout;
        let m = l.marker(event);
        let pos = m.position;

        let _ = writeln!(svg, r#"<g id="marker-{}" style="cursor:pointer">"#, event.id);
        let _ = writeln!(
            svg,
            "<title>{} (click to preview: {})</title>",
            escape(event.label),
            event.sound_effect
        );
        let _ = writeln!(
            svg,
            r#"<line x1="{c}" y1="{c}" x2="{}" y2="{}" stroke="{}" stroke-width="{}" stroke-dasharray="4 4" opacity="0.5"/>"#,
            pos.x,
            pos.y,
            event.color,
            m.spoke_width,
            c = l.center
        );
        if m.emphasized {
            let _ = writeln!(
                svg,
                r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-width="{}"><animate attributeName="opacity" values="1;0.2;1" dur="2s" repeatCount="indefinite"/></circle>"#,
                pos.x,
                pos.y,
                m.circle_radius + l.s(5.0),
                event.color,
                l.s(2.0)
            );
        }
        let _ = writeln!(
            svg,
            r#"<circle cx="{}" cy="{}" r="{}" fill="white" stroke="{}" stroke-width="{}"/>"#,
            pos.x, pos.y, m.circle_radius, event.color, m.stroke_width
        );
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}">{}</text>"#,
            pos.x,
            pos.y + l.s(2.0),
            m.font_size,
            escape(event.icon)
        );
        svg.push_str("</g>\n");
    }

    fn write_minute_ticks(&self, svg: &mut String) {
        let l = &self.layout;
        for minute in (0..60u32).filter(|m| m % 5 != 0) {
            let pos = polar_to_cartesian(
                l.center,
                l.center,
                l.clock_radius,
                minutes_to_degrees(f64::from(minute)),
            );
            let _ = writeln!(
                svg,
                r##"<circle class="minute-tick" cx="{}" cy="{}" r="{}" fill="#9CA3AF"/>"##,
                pos.x,
                pos.y,
                l.s(3.0)
            );
        }
    }

    fn write_hour_numerals(&self, svg: &mut String) {
        let l = &self.layout;
        for hour in 1..=12u32 {
            let pos = polar_to_cartesian(l.center, l.center, l.clock_radius, f64::from(hour * 30));
            let _ = writeln!(
                svg,
                r##"<text class="hour" x="{}" y="{}" fill="#374151" font-size="{}" font-weight="bold" text-anchor="middle" dominant-baseline="middle">{hour}</text>"##,
                pos.x,
                pos.y,
                l.s(48.0)
            );
        }
    }

    fn write_hands(&self, svg: &mut String, time: NaiveTime) {
        let l = &self.layout;
        let c = l.center;
        let hour_angle = hour_hand_angle(time.hour(), time.minute());
        let minute_angle = minute_hand_angle(time.minute(), time.second());

        let _ = writeln!(
            svg,
            r##"<circle cx="{c}" cy="{c}" r="{}" fill="#1F2937"/>"##,
            l.s(12.0)
        );
        let _ = writeln!(
            svg,
            r##"<line id="hour-hand" x1="{c}" y1="{c}" x2="{c}" y2="{}" stroke="#1F2937" stroke-width="{}" stroke-linecap="round" transform="rotate({hour_angle}, {c}, {c})"/>"##,
            c - l.clock_radius * 0.6,
            l.s(12.0)
        );
        let _ = writeln!(
            svg,
            r##"<line id="minute-hand" x1="{c}" y1="{c}" x2="{c}" y2="{}" stroke="#4B5563" stroke-width="{}" stroke-linecap="round" transform="rotate({minute_angle}, {c}, {c})"/>"##,
            c - l.clock_radius * 0.95,
            l.s(8.0)
        );
        let _ = writeln!(
            svg,
            r##"<circle cx="{c}" cy="{c}" r="{}" fill="#9CA3AF"/>"##,
            l.s(6.0)
        );
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
