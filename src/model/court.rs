use crate::foundation::core::{Point, Rect};
use crate::model::tactic::Mode;

/// Padding around the court, used for goals and the out-of-bounds strip.
pub const PADDING_PX: f64 = 50.0;

/// Court and stage extents for a [`Mode`], in stage pixels at scale 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CourtGeometry {
    pub mode: Mode,
    pub court_width: f64,
    pub court_height: f64,
    pub padding: f64,
}

impl CourtGeometry {
    pub fn for_mode(mode: Mode) -> Self {
        let (court_width, court_height) = match mode {
            // 40m x 20m
            Mode::Full => (800.0, 400.0),
            Mode::Half => (400.0, 400.0),
        };
        Self {
            mode,
            court_width,
            court_height,
            padding: PADDING_PX,
        }
    }

    pub fn stage_width(&self) -> f64 {
        self.court_width + self.padding * 2.0
    }

    pub fn stage_height(&self) -> f64 {
        self.court_height + self.padding * 2.0
    }

    /// Court rectangle inside the stage.
    pub fn court_rect(&self) -> Rect {
        Rect::new(
            self.padding,
            self.padding,
            self.padding + self.court_width,
            self.padding + self.court_height,
        )
    }

    /// Map percent-of-court coordinates to stage pixels.
    pub fn percent_to_stage(&self, p: Point) -> Point {
        Point::new(
            p.x / 100.0 * self.court_width + self.padding,
            p.y / 100.0 * self.court_height + self.padding,
        )
    }

    /// Map stage pixels back to percent-of-court coordinates.
    ///
    /// Returns `None` for drops outside the stage; the caller keeps the previous position.
    pub fn stage_to_percent(&self, p: Point) -> Option<Point> {
        if !p.x.is_finite()
            || !p.y.is_finite()
            || p.x < 0.0
            || p.y < 0.0
            || p.x > self.stage_width()
            || p.y > self.stage_height()
        {
            return None;
        }
        Some(Point::new(
            (p.x - self.padding) / self.court_width * 100.0,
            (p.y - self.padding) / self.court_height * 100.0,
        ))
    }

    /// Output raster size for a pixel ratio, rounded down to even dimensions (yuv420p).
    pub fn raster_size(&self, pixel_ratio: f64) -> (u32, u32) {
        fn even(v: f64) -> u32 {
            let v = v.round().max(2.0) as u32;
            v - (v % 2)
        }
        (
            even(self.stage_width() * pixel_ratio),
            even(self.stage_height() * pixel_ratio),
        )
    }
}
