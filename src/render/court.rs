use kurbo::{Circle, Point, Rect, RoundedRect, Shape as _};

use crate::foundation::error::{TacticError, TacticResult};
use crate::model::court::CourtGeometry;
use crate::model::tactic::{Annotation, DisplayState, Mode, Player, Role, Team};

/// Default export resolution multiplier.
pub const DEFAULT_PIXEL_RATIO: f64 = 1.5;

const BG: [u8; 4] = [0xd2, 0xa6, 0x79, 0xff];
const LINE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const HOME: [u8; 4] = [0x3b, 0x82, 0xf6, 0xff];
const AWAY: [u8; 4] = [0xef, 0x44, 0x44, 0xff];
const GK_HOME: [u8; 4] = [0xfb, 0xbf, 0x24, 0xff];
const GK_AWAY: [u8; 4] = [0x10, 0xb9, 0x81, 0xff];
const INK: [u8; 4] = [0x33, 0x33, 0x33, 0xff];
const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xff];

const LINE_WIDTH: f64 = 3.0;
const PENALTY_RADIUS: f64 = 60.0;
const PLAYER_RADIUS: f64 = 16.0;
const BALL_RADIUS: f64 = 12.0;

/// Rendering collaborator: paints a display state for a court mode.
pub trait Renderer {
    /// Paint `state` into an RGBA image.
    fn render(&mut self, state: &DisplayState, mode: Mode) -> TacticResult<image::RgbaImage>;

    /// Paint `state` and encode it as PNG.
    fn rasterize(&mut self, state: &DisplayState, mode: Mode) -> TacticResult<Vec<u8>> {
        let img = self.render(state, mode)?;
        encode_png(&img)
    }
}

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(img: &image::RgbaImage) -> TacticResult<Vec<u8>> {
    let mut out = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| TacticError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Fill color for a player disc.
pub fn player_color(player: &Player) -> [u8; 4] {
    match (player.team, player.role) {
        (Team::Home, Role::Field) => HOME,
        (Team::Away, Role::Field) => AWAY,
        (Team::Home, Role::Gk) => GK_HOME,
        (Team::Away, Role::Gk) => GK_AWAY,
    }
}

/// CPU rasterizer for the court, players, ball and annotation box.
///
/// Painting happens in stage coordinates and is scaled by `pixel_ratio`. Labels and note text
/// are not drawn; the note box is.
#[derive(Clone, Copy, Debug)]
pub struct CourtRasterizer {
    pub pixel_ratio: f64,
}

impl Default for CourtRasterizer {
    fn default() -> Self {
        Self {
            pixel_ratio: DEFAULT_PIXEL_RATIO,
        }
    }
}

impl CourtRasterizer {
    pub fn new(pixel_ratio: f64) -> TacticResult<Self> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(TacticError::validation("pixel_ratio must be finite and > 0"));
        }
        Ok(Self { pixel_ratio })
    }
}

impl Renderer for CourtRasterizer {
    #[tracing::instrument(level = "trace", skip_all, fields(mode = mode.as_str()))]
    fn render(&mut self, state: &DisplayState, mode: Mode) -> TacticResult<image::RgbaImage> {
        let geometry = CourtGeometry::for_mode(mode);
        let (w, h) = geometry.raster_size(self.pixel_ratio);
        let mut canvas = Canvas {
            img: image::RgbaImage::from_pixel(w, h, image::Rgba(BG)),
            scale: self.pixel_ratio,
        };

        paint_court(&mut canvas, &geometry);

        for p in &state.players {
            let c = geometry.percent_to_stage(p.pos());
            canvas.fill_circle(c, PLAYER_RADIUS, player_color(p));
            canvas.stroke_circle(c, PLAYER_RADIUS, 2.0, LINE, |_| true);
        }

        let ball = geometry.percent_to_stage(state.ball);
        canvas.fill_circle(ball, BALL_RADIUS, LINE);
        canvas.stroke_circle(ball, BALL_RADIUS, 1.5, BLACK, |_| true);
        canvas.fill_circle(ball, BALL_RADIUS * 0.35, BLACK);

        if let Some(a) = &state.annotation {
            paint_annotation(&mut canvas, a);
        }

        Ok(canvas.img)
    }
}

fn paint_court(canvas: &mut Canvas, g: &CourtGeometry) {
    let o = g.court_rect().origin();
    let at = |x: f64, y: f64| Point::new(o.x + x, o.y + y);
    let (w, h) = (g.court_width, g.court_height);

    canvas.stroke_rect(Rect::from_origin_size(o, (w, h)), LINE_WIDTH, LINE);
    match g.mode {
        Mode::Full => {
            let mid = h / 2.0;
            canvas.line(at(w / 2.0, 0.0), at(w / 2.0, h), LINE_WIDTH, LINE);
            canvas.stroke_circle(at(w / 2.0, mid), PENALTY_RADIUS, LINE_WIDTH, LINE, |_| true);
            canvas.fill_circle(at(w / 2.0, mid), 4.0, LINE);

            let left = at(0.0, mid);
            let right = at(w, mid);
            canvas.stroke_circle(left, PENALTY_RADIUS * 2.0, LINE_WIDTH, LINE, |p| p.x >= left.x);
            canvas.stroke_circle(right, PENALTY_RADIUS * 2.0, LINE_WIDTH, LINE, |p| {
                p.x <= right.x
            });

            canvas.stroke_rect(
                Rect::from_origin_size(at(-20.0, mid - 60.0), (20.0, 120.0)),
                LINE_WIDTH,
                LINE,
            );
            canvas.stroke_rect(
                Rect::from_origin_size(at(w, mid - 60.0), (20.0, 120.0)),
                LINE_WIDTH,
                LINE,
            );

            for x in [120.0, w - 120.0, 200.0, w - 200.0] {
                canvas.fill_circle(at(x, mid), 4.0, LINE);
            }
        }
        Mode::Half => {
            let cx = w / 2.0;
            let top = at(cx, 0.0);
            let goal_line = at(cx, h);
            canvas.stroke_circle(top, PENALTY_RADIUS, LINE_WIDTH, LINE, |p| p.y >= top.y);
            canvas.fill_circle(top, 4.0, LINE);
            canvas.stroke_circle(goal_line, PENALTY_RADIUS * 2.0, LINE_WIDTH, LINE, |p| {
                p.y <= goal_line.y
            });
            canvas.stroke_rect(
                Rect::from_origin_size(at(cx - 60.0, h), (120.0, 20.0)),
                LINE_WIDTH,
                LINE,
            );
            canvas.fill_circle(at(cx, h - 120.0), 4.0, LINE);
            canvas.fill_circle(at(cx, h - 200.0), 4.0, LINE);
        }
    }
}

fn paint_annotation(canvas: &mut Canvas, a: &Annotation) {
    let rect = Rect::from_origin_size((a.x, a.y), (a.width.max(1.0), a.height.max(1.0)));
    canvas.fill_shape(&RoundedRect::from_rect(rect, 10.0), [0xff, 0xff, 0xff, 0xff]);

    // One ink bar per text line stands in for glyphs.
    let line_h = a.font_size.max(1.0);
    let inner = rect.inset(-8.0);
    for (i, text) in a.text.lines().enumerate() {
        let top = inner.y0 + i as f64 * line_h * 1.2;
        if top + line_h * 0.5 > inner.y1 {
            break;
        }
        let len = text.chars().count() as f64 * line_h * 0.55;
        let bar = Rect::new(
            inner.x0,
            top + line_h * 0.25,
            (inner.x0 + len).min(inner.x1),
            top + line_h * 0.75,
        );
        if bar.width() > 0.0 {
            canvas.fill_shape(&bar, INK);
        }
    }
}

// Stage-space painter over a scaled RGBA buffer. Anti-aliasing is not attempted.
struct Canvas {
    img: image::RgbaImage,
    scale: f64,
}

impl Canvas {
    // Visit every pixel whose center (in stage space) falls inside `bbox`.
    fn for_each_in(&mut self, bbox: Rect, mut f: impl FnMut(Point) -> Option<[u8; 4]>) {
        let (w, h) = self.img.dimensions();
        let s = self.scale;
        let x0 = ((bbox.x0 * s).floor().max(0.0)) as u32;
        let y0 = ((bbox.y0 * s).floor().max(0.0)) as u32;
        let x1 = ((bbox.x1 * s).ceil().max(0.0) as u32).min(w);
        let y1 = ((bbox.y1 * s).ceil().max(0.0) as u32).min(h);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = Point::new((f64::from(px) + 0.5) / s, (f64::from(py) + 0.5) / s);
                if let Some(c) = f(p) {
                    self.img.put_pixel(px, py, image::Rgba(c));
                }
            }
        }
    }

    fn fill_shape(&mut self, shape: &impl kurbo::Shape, color: [u8; 4]) {
        self.for_each_in(shape.bounding_box(), |p| shape.contains(p).then_some(color));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: [u8; 4]) {
        self.fill_shape(&Circle::new(center, radius), color);
    }

    // Ring of `width` centered on the circle outline, restricted to points where `keep` holds.
    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        color: [u8; 4],
        keep: impl Fn(Point) -> bool,
    ) {
        let half = width / 2.0;
        let bbox = Circle::new(center, radius + half).bounding_box();
        self.for_each_in(bbox, |p| {
            let d = p.distance(center);
            ((d - radius).abs() <= half && keep(p)).then_some(color)
        });
    }

    fn stroke_rect(&mut self, rect: Rect, width: f64, color: [u8; 4]) {
        let half = width / 2.0;
        let outer = rect.inflate(half, half);
        let inner = rect.inflate(-half, -half);
        self.for_each_in(outer, |p| {
            (outer.contains(p) && !inner.contains(p)).then_some(color)
        });
    }

    fn line(&mut self, a: Point, b: Point, width: f64, color: [u8; 4]) {
        let half = width / 2.0;
        let bbox = Rect::from_points(a, b).inflate(half, half);
        let seg = kurbo::Line::new(a, b);
        self.for_each_in(bbox, |p| {
            let n = kurbo::ParamCurveNearest::nearest(&seg, p, 1e-6);
            (n.distance_sq <= half * half).then_some(color)
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/court.rs"]
mod tests;
