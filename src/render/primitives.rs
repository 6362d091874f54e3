//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for basic geometric shapes. All
//! writes go through [`Framebuffer::blend_pixel`], so translucent colors
//! composite and the framebuffer clip applies.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are drawn at each step along the major axis, weighted by the
/// fractional distance from the ideal line.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |major: i32, minor: i32, intensity: f32| {
        if steep {
            plot(fb, minor, major, color, intensity);
        } else {
            plot(fb, major, minor, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

/// Fractional part of a float.
#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

/// Reverse fractional part.
#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Draw a segment of any width.
///
/// Hairlines (`width <= 1.5`) use Wu's algorithm; wider strokes are filled
/// quads with round joins.
pub fn draw_segment(fb: &mut Framebuffer, from: Point, to: Point, width: f32, color: Rgba) {
    if width <= 1.5 {
        draw_line_aa(fb, from.x, from.y, to.x, to.y, color);
        return;
    }

    let len = from.distance(to);
    let half = width / 2.0;
    if len > f32::EPSILON {
        let nx = -(to.y - from.y) / len * half;
        let ny = (to.x - from.x) / len * half;
        fill_polygon(
            fb,
            &[
                from.offset_by(nx, ny),
                to.offset_by(nx, ny),
                to.offset_by(-nx, -ny),
                from.offset_by(-nx, -ny),
            ],
            color,
        );
    }
    let radius = (half - 0.5).round().min(i32::MAX as f32) as i32;
    draw_circle(fb, to.x.round() as i32, to.y.round() as i32, radius, color);
}

/// Draw a connected polyline, optionally dashed.
///
/// `dash` is an on/off pattern in pixels. The pattern phase carries across
/// vertices. Segments with a non-finite endpoint are skipped, which breaks
/// the line there. Segments are clipped to `bounds` first.
pub fn draw_polyline(
    fb: &mut Framebuffer,
    points: &[Point],
    width: f32,
    dash: Option<&[f32]>,
    color: Rgba,
    bounds: Rect,
) {
    let mut phase = 0.0;
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if !is_finite(a) || !is_finite(b) {
            continue;
        }
        let seg_len = a.distance(b);
        if let Some((from, to)) = clip_segment(a, b, bounds) {
            match dash {
                Some(pattern) if !pattern.is_empty() => {
                    let offset = phase + a.distance(from);
                    draw_dashed(fb, from, to, width, pattern, offset, color);
                }
                _ => draw_segment(fb, from, to, width, color),
            }
        }
        phase += seg_len;
    }
}

fn draw_dashed(
    fb: &mut Framebuffer,
    from: Point,
    to: Point,
    width: f32,
    pattern: &[f32],
    offset: f32,
    color: Rgba,
) {
    let len = from.distance(to);
    let period: f32 = pattern.iter().sum();
    if len <= f32::EPSILON || period <= f32::EPSILON {
        return;
    }

    // Locate the pattern entry at `offset`.
    let mut index = 0;
    let mut remaining = pattern[0];
    let mut skip = offset % period;
    while skip > 0.0 {
        if skip < remaining {
            remaining -= skip;
            break;
        }
        skip -= remaining;
        index = (index + 1) % pattern.len();
        remaining = pattern[index];
    }

    let mut travelled = 0.0;
    while travelled < len {
        let step = remaining.min(len - travelled);
        if index % 2 == 0 {
            let start = from.lerp(to, travelled / len);
            let end = from.lerp(to, (travelled + step) / len);
            draw_segment(fb, start, end, width, color);
        }
        travelled += step;
        index = (index + 1) % pattern.len();
        remaining = pattern[index];
    }
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Clip a segment to `bounds` (Liang-Barsky).
///
/// Returns `None` when the segment lies entirely outside.
#[must_use]
pub fn clip_segment(a: Point, b: Point, bounds: Rect) -> Option<(Point, Point)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let mut t0: f32 = 0.0;
    let mut t1: f32 = 1.0;

    for (p, q) in [
        (-dx, a.x - bounds.x),
        (dx, bounds.right() - a.x),
        (-dy, a.y - bounds.y),
        (dy, bounds.bottom() - a.y),
    ] {
        if p.abs() < f32::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((a.lerp(b, t0), a.lerp(b, t1)))
}

// ============================================================================
// Polygon Drawing
// ============================================================================

/// Fill a polygon using an even-odd scanline rule.
///
/// Vertices may be in either winding order. Pixel centers are sampled, so
/// shared edges of adjacent polygons neither overlap nor leave gaps.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[Point], color: Rgba) {
    if points.len() < 3 || !points.iter().copied().all(is_finite) {
        return;
    }

    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
    let y_start = min_y.floor().max(0.0) as i32;
    let y_end = max_y.ceil().min(fb.height() as f32) as i32;

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for y in y_start..y_end {
        let sample = y as f32 + 0.5;
        crossings.clear();

        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample && b.y > sample) || (b.y <= sample && a.y > sample) {
                let t = (sample - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for span in crossings.chunks_exact(2) {
            let x_start = (span[0] - 0.5).ceil().max(0.0) as i32;
            let x_end = (span[1] - 0.5).floor().min(fb.width() as f32 - 1.0) as i32;
            for x in x_start..=x_end {
                fb.blend_pixel(x as u32, y as u32, color);
            }
        }
    }
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
    thickness: u32,
) {
    let thickness = thickness.max(1);
    let x = x.max(0) as u32;
    let y = y.max(0) as u32;

    // Top edge
    fb.fill_rect(x, y, width, thickness, color);
    // Bottom edge
    if height > thickness {
        fb.fill_rect(x, y + height - thickness, width, thickness, color);
    }
    // Left edge
    if height > 2 * thickness {
        fb.fill_rect(x, y + thickness, thickness, height - 2 * thickness, color);
    }
    // Right edge
    if width > thickness && height > 2 * thickness {
        fb.fill_rect(
            x + width - thickness,
            y + thickness,
            thickness,
            height - 2 * thickness,
            color,
        );
    }
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Largest radius worth rasterizing: a circle this size covers the whole
/// framebuffer from any visible center.
fn max_radius(fb: &Framebuffer) -> i32 {
    let diagonal = f64::from(fb.width()).hypot(f64::from(fb.height()));
    diagonal.ceil() as i32 + 1
}

/// Draw a filled circle using the midpoint algorithm.
///
/// The radius is capped at the framebuffer diagonal.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.blend_pixel(cx as u32, cy as u32, color);
        }
        return;
    }
    let radius = radius.min(max_radius(fb));

    // Rows already filled; octant pairs revisit some rows.
    let mut filled = vec![false; (2 * radius + 1) as usize];
    let mut span = |fb: &mut Framebuffer, half: i32, dy: i32| {
        let row = (dy + radius) as usize;
        if !filled[row] {
            filled[row] = true;
            draw_horizontal_line(
                fb,
                cx.saturating_sub(half),
                cx.saturating_add(half),
                cy.saturating_add(dy),
                color,
            );
        }
    };

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    let mut spans = Vec::new();

    while x >= y {
        spans.push((x, y));
        spans.push((y, x));
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }

    // Widest span first so each row keeps its full extent.
    spans.sort_by(|a, b| b.0.cmp(&a.0));
    for (half, dy) in spans {
        span(fb, half, dy);
        span(fb, half, -dy);
    }
}

/// Draw a circle outline.
///
/// The radius is capped at the framebuffer diagonal.
pub fn draw_circle_outline(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.blend_pixel(cx as u32, cy as u32, color);
        }
        return;
    }
    let radius = radius.min(max_radius(fb));

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (cx.saturating_add(x), cy.saturating_add(y)),
            (cx.saturating_sub(x), cy.saturating_add(y)),
            (cx.saturating_add(x), cy.saturating_sub(y)),
            (cx.saturating_sub(x), cy.saturating_sub(y)),
            (cx.saturating_add(y), cy.saturating_add(x)),
            (cx.saturating_sub(y), cy.saturating_add(x)),
            (cx.saturating_add(y), cy.saturating_sub(x)),
            (cx.saturating_sub(y), cy.saturating_sub(x)),
        ] {
            if px >= 0 && py >= 0 {
                fb.blend_pixel(px as u32, py as u32, color);
            }
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Helper to draw a horizontal span (used by filled circle).
#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0);
    let x_end = x2.saturating_add(1).min(fb.width() as i32);
    for x in x_start..x_end {
        fb.blend_pixel(x as u32, y as u32, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framebuffer::PixelRect;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    fn whole() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_circle_far_outside_is_harmless() {
        let mut fb = canvas();
        draw_circle(&mut fb, i32::MAX, i32::MAX, 3, Rgba::BLACK);
        draw_circle(&mut fb, i32::MIN, 50, 3, Rgba::BLACK);
        draw_circle_outline(&mut fb, i32::MAX, i32::MIN, 3, Rgba::BLACK);

        let (min, _, _) = fb.luminance_stats(PixelRect { x0: 0, y0: 0, x1: 100, y1: 100 });
        assert!(min > 250.0);
    }

    #[test]
    fn test_huge_radius_is_capped() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, i32::MAX, Rgba::RED);
        draw_circle_outline(&mut fb, 50, 50, i32::MAX, Rgba::RED);

        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(99, 99), Some(Rgba::RED));
    }

    #[test]
    fn test_huge_stroke_width() {
        let mut fb = canvas();
        draw_segment(&mut fb, Point::new(10.0, 50.0), Point::new(90.0, 50.0), 1.0e10, Rgba::RED);

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
    }

    #[test]
    fn test_draw_line_aa_darkens_path() {
        let mut fb = canvas();
        draw_line_aa(&mut fb, 10.0, 50.0, 90.0, 50.0, Rgba::BLACK);

        let pixel = fb.get_pixel(50, 50).unwrap();
        assert!(pixel.r < 128);
    }

    #[test]
    fn test_thick_segment_covers_width() {
        let mut fb = canvas();
        draw_segment(&mut fb, Point::new(10.0, 50.0), Point::new(90.0, 50.0), 6.0, Rgba::RED);

        assert_eq!(fb.get_pixel(50, 48), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(50, 51), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(50, 40), Some(Rgba::WHITE));
    }

    #[test]
    fn test_dashed_polyline_has_gaps() {
        let mut fb = canvas();
        let points = [Point::new(0.0, 20.0), Point::new(100.0, 20.0)];
        draw_polyline(&mut fb, &points, 1.0, Some(&[6.0, 4.0]), Rgba::BLACK, whole());

        let row: Vec<bool> = (0..100)
            .map(|x| fb.get_pixel(x, 20).is_some_and(|p| p.r < 128))
            .collect();
        assert!(row[2]);
        assert!(!row[8]);
        assert!(row[12]);
    }

    #[test]
    fn test_polyline_breaks_at_nan() {
        let mut fb = canvas();
        let points = [
            Point::new(10.0, 10.0),
            Point::new(40.0, 10.0),
            Point::new(f32::NAN, 10.0),
            Point::new(60.0, 10.0),
            Point::new(90.0, 10.0),
        ];
        draw_polyline(&mut fb, &points, 1.0, None, Rgba::BLACK, whole());

        assert!(fb.get_pixel(20, 10).unwrap().r < 128);
        assert_eq!(fb.get_pixel(50, 10), Some(Rgba::WHITE));
        assert!(fb.get_pixel(80, 10).unwrap().r < 128);
    }

    #[test]
    fn test_clip_segment() {
        let bounds = Rect::new(0.0, 0.0, 10.0, 10.0);
        let (a, b) = clip_segment(Point::new(-10.0, 5.0), Point::new(20.0, 5.0), bounds).unwrap();
        assert!((a.x - 0.0).abs() < 1e-4);
        assert!((b.x - 10.0).abs() < 1e-4);
        assert!(clip_segment(Point::new(-5.0, -5.0), Point::new(-1.0, 20.0), bounds).is_none());
    }

    #[test]
    fn test_far_away_segment_is_cheap() {
        let mut fb = canvas();
        let points = [Point::new(-1e9, 50.0), Point::new(1e9, 50.0)];
        draw_polyline(&mut fb, &points, 1.0, None, Rgba::BLACK, whole());
        assert!(fb.get_pixel(50, 50).unwrap().r < 128);
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut fb = canvas();
        let triangle = [Point::new(10.0, 10.0), Point::new(90.0, 10.0), Point::new(50.0, 90.0)];
        fill_polygon(&mut fb, &triangle, Rgba::BLUE);

        assert_eq!(fb.get_pixel(50, 30), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(12, 80), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_winding_independent() {
        let mut cw = canvas();
        let mut ccw = canvas();
        let square = [
            Point::new(20.0, 20.0),
            Point::new(60.0, 20.0),
            Point::new(60.0, 60.0),
            Point::new(20.0, 60.0),
        ];
        let mut reversed = square;
        reversed.reverse();
        fill_polygon(&mut cw, &square, Rgba::RED);
        fill_polygon(&mut ccw, &reversed, Rgba::RED);

        assert_eq!(cw.to_compact_pixels(), ccw.to_compact_pixels());
        assert_eq!(cw.get_pixel(40, 40), Some(Rgba::RED));
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut fb = canvas();
        draw_rect_outline(&mut fb, 20, 20, 30, 30, Rgba::RED, 2);

        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 10, Rgba::GREEN);

        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(58, 50), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(70, 70), Some(Rgba::WHITE));
    }

    #[test]
    fn test_translucent_circle_blends_once() {
        let mut fb = canvas();
        let translucent = Rgba::new(0, 0, 0, 128);
        draw_circle(&mut fb, 50, 50, 10, translucent);

        let center = fb.get_pixel(50, 50).unwrap();
        let edge_row = fb.get_pixel(50, 57).unwrap();
        assert_eq!(center, edge_row);
    }

    #[test]
    fn test_draw_circle_outline() {
        let mut fb = canvas();
        draw_circle_outline(&mut fb, 50, 50, 10, Rgba::BLACK);

        assert_eq!(fb.get_pixel(60, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }
}
