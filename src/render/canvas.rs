//! Drawing surface shared by the raster and vector backends.
//!
//! The figure draws through [`Canvas`] in pixel coordinates with `y`
//! growing downwards. [`RasterCanvas`] rasterizes into a [`Framebuffer`];
//! [`SvgCanvas`] records SVG elements.

use super::primitives::{
    clip_segment, draw_circle, draw_circle_outline, draw_polyline, draw_rect_outline, draw_segment,
    fill_polygon,
};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::{Framebuffer, PixelRect};
use crate::geometry::{Point, Rect};
use crate::output::{SvgElement, SvgEncoder, TextAnchor};
use crate::style::Marker;

/// Line appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Color including alpha.
    pub color: Rgba,
    /// Width in pixels.
    pub width: f32,
    /// On/off dash pattern in pixels.
    pub dash: Option<&'static [f32]>,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub const fn solid(color: Rgba, width: f32) -> Self {
        Self { color, width, dash: None }
    }
}

/// A 2D drawing surface.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    /// Fill the whole surface, ignoring the clip.
    fn clear(&mut self, color: Rgba);

    /// Restrict subsequent drawing to `clip`, or lift the restriction.
    fn set_clip(&mut self, clip: Option<Rect>);

    /// Connected line; non-finite points break it.
    fn polyline(&mut self, points: &[Point], stroke: &Stroke);

    /// Closed polygon with optional fill and outline.
    fn polygon(&mut self, points: &[Point], fill: Option<Rgba>, stroke: Option<&Stroke>);

    /// One marker of diameter `size` centred on `center`, optionally
    /// outlined in `edge`.
    fn marker(&mut self, center: Point, marker: Marker, size: f32, color: Rgba, edge: Option<Rgba>);

    /// One-pixel rectangle outline.
    fn frame(&mut self, rect: Rect, color: Rgba);

    /// Text label. Raster surfaces have no font and draw nothing.
    fn text(&mut self, _at: Point, _text: &str, _size: f32, _color: Rgba, _anchor: TextAnchor) {}

    /// Single segment.
    fn line(&mut self, from: Point, to: Point, stroke: &Stroke) {
        self.polyline(&[from, to], stroke);
    }
}

/// Cross and plus arms as segment pairs.
fn marker_arms(center: Point, marker: Marker, half: f32) -> Option<[(Point, Point); 2]> {
    match marker {
        Marker::Cross => Some([
            (center.offset_by(-half, -half), center.offset_by(half, half)),
            (center.offset_by(-half, half), center.offset_by(half, -half)),
        ]),
        Marker::Plus => Some([
            (center.offset_by(-half, 0.0), center.offset_by(half, 0.0)),
            (center.offset_by(0.0, -half), center.offset_by(0.0, half)),
        ]),
        _ => None,
    }
}

fn square(center: Point, half: f32) -> [Point; 4] {
    [
        center.offset_by(-half, -half),
        center.offset_by(half, -half),
        center.offset_by(half, half),
        center.offset_by(-half, half),
    ]
}

fn finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Canvas backed by a [`Framebuffer`].
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    fb: Framebuffer,
    clip: Option<Rect>,
}

impl RasterCanvas {
    /// Create a transparent canvas.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDimensions`] for a zero-sized surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self { fb: Framebuffer::new(width, height)?, clip: None })
    }

    /// Pixels drawn so far.
    #[must_use]
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    /// Take the pixels.
    #[must_use]
    pub fn into_framebuffer(self) -> Framebuffer {
        self.fb
    }

    fn bounds(&self) -> Rect {
        self.clip
            .unwrap_or_else(|| Rect::new(0.0, 0.0, self.fb.width() as f32, self.fb.height() as f32))
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (u32, u32) {
        (self.fb.width(), self.fb.height())
    }

    fn clear(&mut self, color: Rgba) {
        self.fb.clear(color);
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
        self.fb.set_clip(clip.map(|r| PixelRect {
            x0: r.x.floor().max(0.0) as u32,
            y0: r.y.floor().max(0.0) as u32,
            x1: r.right().ceil().max(0.0) as u32,
            y1: r.bottom().ceil().max(0.0) as u32,
        }));
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        let bounds = self.bounds();
        draw_polyline(&mut self.fb, points, stroke.width, stroke.dash, stroke.color, bounds);
    }

    fn polygon(&mut self, points: &[Point], fill: Option<Rgba>, stroke: Option<&Stroke>) {
        if let Some(color) = fill {
            fill_polygon(&mut self.fb, points, color);
        }
        if let (Some(stroke), Some(&first)) = (stroke, points.first()) {
            let mut closed = points.to_vec();
            closed.push(first);
            self.polyline(&closed, stroke);
        }
    }

    fn marker(&mut self, center: Point, marker: Marker, size: f32, color: Rgba, edge: Option<Rgba>) {
        if !finite(center) || size <= 0.0 {
            return;
        }
        let bounds = self.bounds();
        let half = (size / 2.0).min(bounds.width.hypot(bounds.height));
        if center.x + half < bounds.x
            || center.x - half > bounds.right()
            || center.y + half < bounds.y
            || center.y - half > bounds.bottom()
        {
            return;
        }
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        match marker {
            Marker::Circle => {
                let radius = half.round() as i32;
                draw_circle(&mut self.fb, cx, cy, radius, color);
                if let Some(edge) = edge {
                    draw_circle_outline(&mut self.fb, cx, cy, radius, edge);
                }
            }
            Marker::Point => {
                draw_circle(&mut self.fb, cx, cy, (half / 2.0).round().max(1.0) as i32, color);
            }
            Marker::Square => {
                let corners = square(center, half);
                fill_polygon(&mut self.fb, &corners, color);
                if let Some(edge) = edge {
                    let mut outline = corners.to_vec();
                    outline.push(corners[0]);
                    self.polyline(&outline, &Stroke::solid(edge, 1.0));
                }
            }
            Marker::Cross | Marker::Plus => {
                for (from, to) in marker_arms(center, marker, half).into_iter().flatten() {
                    if let Some((from, to)) = clip_segment(from, to, bounds) {
                        draw_segment(&mut self.fb, from, to, 1.5, color);
                    }
                }
            }
        }
    }

    fn frame(&mut self, rect: Rect, color: Rgba) {
        draw_rect_outline(
            &mut self.fb,
            rect.x.round() as i32,
            rect.y.round() as i32,
            rect.width.round().max(1.0) as u32,
            rect.height.round().max(1.0) as u32,
            color,
            1,
        );
    }
}

/// Canvas recording SVG elements.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    encoder: SvgEncoder,
    width: u32,
    height: u32,
    clipped: bool,
}

impl SvgCanvas {
    /// Create an empty document with a transparent background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            encoder: SvgEncoder::new(width, height).background(None),
            width,
            height,
            clipped: false,
        }
    }

    /// Close any open clip group and return the encoder.
    #[must_use]
    pub fn into_encoder(mut self) -> SvgEncoder {
        if self.clipped {
            self.encoder.end_clip();
        }
        self.encoder
    }

    fn stroked_polyline(points: Vec<(f32, f32)>, stroke: &Stroke, closed: bool) -> SvgElement {
        SvgElement::Polyline {
            points,
            stroke: Some(stroke.color),
            stroke_width: stroke.width,
            dash: stroke.dash.map(<[f32]>::to_vec),
            fill: None,
            closed,
        }
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Rgba) {
        self.encoder = SvgEncoder::new(self.width, self.height).background(Some(color));
        self.clipped = false;
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        if self.clipped {
            self.encoder.end_clip();
            self.clipped = false;
        }
        if let Some(r) = clip {
            self.encoder.begin_clip(r.x, r.y, r.width, r.height);
            self.clipped = true;
        }
    }

    fn polyline(&mut self, points: &[Point], stroke: &Stroke) {
        for run in points.split(|p| !finite(*p)) {
            if run.len() >= 2 {
                let coords = run.iter().map(|p| (p.x, p.y)).collect();
                self.encoder.push(Self::stroked_polyline(coords, stroke, false));
            }
        }
    }

    fn polygon(&mut self, points: &[Point], fill: Option<Rgba>, stroke: Option<&Stroke>) {
        if points.len() < 3 || !points.iter().copied().all(finite) {
            return;
        }
        self.encoder.push(SvgElement::Polyline {
            points: points.iter().map(|p| (p.x, p.y)).collect(),
            stroke: stroke.map(|s| s.color),
            stroke_width: stroke.map_or(0.0, |s| s.width),
            dash: stroke.and_then(|s| s.dash).map(<[f32]>::to_vec),
            fill,
            closed: true,
        });
    }

    fn marker(&mut self, center: Point, marker: Marker, size: f32, color: Rgba, edge: Option<Rgba>) {
        if !finite(center) || size <= 0.0 {
            return;
        }
        let half = size / 2.0;
        match marker {
            Marker::Circle | Marker::Point => {
                let r = if marker == Marker::Point { (half / 2.0).max(1.0) } else { half };
                self.encoder.push(SvgElement::Circle {
                    cx: center.x,
                    cy: center.y,
                    r,
                    fill: color,
                    stroke: edge,
                });
            }
            Marker::Square => self.encoder.push(SvgElement::Rect {
                x: center.x - half,
                y: center.y - half,
                width: size,
                height: size,
                fill: Some(color),
                stroke: edge,
                stroke_width: 1.0,
            }),
            Marker::Cross | Marker::Plus => {
                let stroke = Stroke::solid(color, 1.5);
                for (from, to) in marker_arms(center, marker, half).into_iter().flatten() {
                    let coords = vec![(from.x, from.y), (to.x, to.y)];
                    self.encoder.push(Self::stroked_polyline(coords, &stroke, false));
                }
            }
        }
    }

    fn frame(&mut self, rect: Rect, color: Rgba) {
        self.encoder.push(SvgElement::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: None,
            stroke: Some(color),
            stroke_width: 1.0,
        });
    }

    fn text(&mut self, at: Point, text: &str, size: f32, color: Rgba, anchor: TextAnchor) {
        if text.is_empty() || !finite(at) {
            return;
        }
        self.encoder.push(SvgElement::Text {
            x: at.x,
            y: at.y,
            text: text.to_string(),
            font_size: size,
            fill: color,
            anchor,
        });
    }
}
