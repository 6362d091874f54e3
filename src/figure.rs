//! Figure layout and drawing of the four panels.
//!
//! The figure is a 2x2 grid: XZ top-left, YZ top-right, XY bottom-left and
//! the 3D view bottom-right. Planar panels map their limits to pixels with
//! [`LinearScale`]; the 3D panel normalises its limits to a unit cube and
//! projects it with the configured [`Camera`].
//!
//! Planar panels draw their artists in ascending `zorder`; the 3D panel
//! orders faces and markers by depth instead. Labelled artists get a
//! legend in the top-right corner of their panel.

use crate::artist::{Artist, Primitive};
use crate::axis::{Axes, Axis, Dim};
use crate::camera::Camera;
use crate::color::Rgba;
use crate::config::FigureConfig;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Point3, Rect};
use crate::output::{SvgEncoder, TextAnchor};
use crate::render::{Canvas, RasterCanvas, Stroke, SvgCanvas};
use crate::scale::{format_tick, ColorScale, LinearScale, Scale};
use crate::style::LineStyle;
use crate::view::ViewId;
use batuta_common::display::WithDimensions;

const TITLE_SIZE: f32 = 12.0;
const LABEL_SIZE: f32 = 10.0;
const TICK_LENGTH: f32 = 4.0;
const TICK_COUNT: usize = 5;
const LEGEND_PAD: f32 = 6.0;
const LEGEND_ROW: f32 = 14.0;
const LEGEND_SWATCH: f32 = 20.0;

/// Width of the projected unit cube in panel-size units.
const CUBE_EXTENT: f32 = 1.5;

/// The display surface: layout, background and camera.
#[derive(Debug, Clone)]
pub struct Figure {
    config: FigureConfig,
    background: Rgba,
}

impl Figure {
    /// Create the figure described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the surface is empty or too
    /// small to hold four panels with their margins, and
    /// [`Error::InvalidColor`] for a bad background spec.
    pub fn new(config: FigureConfig) -> Result<Self> {
        check_size(&config)?;
        let background = config.background_color()?;
        Ok(Self { config, background })
    }

    /// Configuration the figure was built from.
    #[must_use]
    pub fn config(&self) -> &FigureConfig {
        &self.config
    }

    /// Window title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.config.title.as_deref()
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.config.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.config.height
    }

    /// Camera of the 3D panel.
    #[must_use]
    pub fn camera(&self) -> Camera {
        self.config.camera.camera()
    }

    /// Plot area of `view`, inside its grid cell's margins.
    #[must_use]
    pub fn panel(&self, view: ViewId) -> Rect {
        let (row, col) = view.cell();
        let cell_w = (self.config.width / 2) as f32;
        let cell_h = (self.config.height / 2) as f32;
        let m = self.config.margin as f32;
        Rect::new(col as f32 * cell_w, row as f32 * cell_h, cell_w, cell_h).inset(m, m, m, m)
    }

    /// Draw all four panels onto `canvas`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the size was changed to one
    /// the layout cannot hold.
    pub fn render(&self, canvas: &mut dyn Canvas, views: &[Axes; 4]) -> Result<()> {
        check_size(&self.config)?;
        canvas.set_clip(None);
        canvas.clear(self.background);

        if let Some(title) = self.title() {
            let top = Point::new(self.config.width as f32 / 2.0, TITLE_SIZE + 4.0);
            canvas.text(top, title, TITLE_SIZE + 2.0, Rgba::BLACK, TextAnchor::Middle);
        }
        for view in ViewId::PLANAR {
            self.draw_planar(canvas, view, &views[view.index()])?;
        }
        self.draw_volumetric(canvas, &views[ViewId::ThreeD.index()])
    }

    /// Rasterize the figure.
    ///
    /// # Errors
    ///
    /// See [`Figure::render`].
    pub fn render_raster(&self, views: &[Axes; 4]) -> Result<Framebuffer> {
        let mut canvas = RasterCanvas::new(self.config.width, self.config.height)?;
        self.render(&mut canvas, views)?;
        Ok(canvas.into_framebuffer())
    }

    /// Draw the figure as an SVG document.
    ///
    /// # Errors
    ///
    /// See [`Figure::render`].
    pub fn render_svg(&self, views: &[Axes; 4]) -> Result<SvgEncoder> {
        let mut canvas = SvgCanvas::new(self.config.width, self.config.height);
        self.render(&mut canvas, views)?;
        Ok(canvas.into_encoder())
    }

    fn draw_planar(&self, canvas: &mut dyn Canvas, view: ViewId, axes: &Axes) -> Result<()> {
        let rect = self.panel(view);
        let sx = LinearScale::for_limits(axes.lim(Dim::X)?, (rect.x, rect.right()));
        let sy = LinearScale::for_limits(axes.lim(Dim::Y)?, (rect.bottom(), rect.y));
        let to_screen = |p: Point| Point::new(sx.scale(p.x), sy.scale(p.y));

        canvas.set_clip(Some(rect));
        for artist in by_zorder(axes.artists()) {
            draw_planar_artist(canvas, artist, &to_screen);
        }
        draw_legend(canvas, rect, axes.artists());
        canvas.set_clip(None);
        canvas.frame(rect, Rgba::FRAME);

        let tick = Stroke::solid(Rgba::FRAME, 1.0);
        for value in sx.ticks(TICK_COUNT) {
            let x = sx.scale(value);
            let base = Point::new(x, rect.bottom());
            canvas.line(base, base.offset_by(0.0, TICK_LENGTH), &tick);
            let at = base.offset_by(0.0, TICK_LENGTH + LABEL_SIZE);
            canvas.text(at, &format_tick(value), LABEL_SIZE, Rgba::BLACK, TextAnchor::Middle);
        }
        for value in sy.ticks(TICK_COUNT) {
            let y = sy.scale(value);
            let base = Point::new(rect.x, y);
            canvas.line(base.offset_by(-TICK_LENGTH, 0.0), base, &tick);
            let at = base.offset_by(-TICK_LENGTH - 2.0, LABEL_SIZE / 3.0);
            canvas.text(at, &format_tick(value), LABEL_SIZE, Rgba::BLACK, TextAnchor::End);
        }

        let (h_name, v_name) = view.plane_names();
        let center = rect.center();
        let m = self.config.margin as f32;
        canvas.text(
            Point::new(center.x, rect.y - 8.0),
            axes.title(),
            TITLE_SIZE,
            Rgba::BLACK,
            TextAnchor::Middle,
        );
        canvas.text(
            Point::new(rect.right(), rect.bottom() + m - 4.0),
            axes.label(Dim::X).unwrap_or(h_name),
            LABEL_SIZE,
            Rgba::BLACK,
            TextAnchor::End,
        );
        canvas.text(
            Point::new(rect.x - m + 4.0, rect.y + LABEL_SIZE),
            axes.label(Dim::Y).unwrap_or(v_name),
            LABEL_SIZE,
            Rgba::BLACK,
            TextAnchor::Start,
        );
        Ok(())
    }

    fn draw_volumetric(&self, canvas: &mut dyn Canvas, axes: &Axes) -> Result<()> {
        let rect = self.panel(ViewId::ThreeD);
        let projector = Projector::new(axes, rect, self.camera())?;

        canvas.set_clip(Some(rect));
        projector.draw_cube(canvas);

        let mut faces = Vec::new();
        let mut markers = Vec::new();
        for artist in axes.artists() {
            match artist.primitive() {
                Primitive::Surface(_) | Primitive::Polygon3(_) => {
                    projector.collect_faces(artist, &mut faces);
                }
                Primitive::Markers3(points) => {
                    markers.extend(
                        points
                            .iter()
                            .enumerate()
                            .map(|(i, &p)| (projector.depth(p), p, artist.point_fill(i), artist)),
                    );
                }
                _ => {}
            }
        }

        // Painter's algorithm: far faces first.
        faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for face in &faces {
            canvas.polygon(&face.points, Some(face.fill), face.edge.as_ref());
        }

        for artist in by_zorder(axes.artists()) {
            projector.draw_lines(canvas, artist);
        }

        markers.sort_by(|a, b| b.0.total_cmp(&a.0));
        for (_, point, fill, artist) in markers {
            let style = artist.style();
            canvas.marker(projector.screen(point), style.marker, style.marker_size, fill, edge_color(artist));
        }
        draw_legend(canvas, rect, axes.artists());
        canvas.set_clip(None);

        canvas.text(
            Point::new(rect.center().x, rect.y - 8.0),
            axes.title(),
            TITLE_SIZE,
            Rgba::BLACK,
            TextAnchor::Middle,
        );
        for (dim, anchor) in [
            (Dim::X, Point3::new(0.0, -0.75, -0.5)),
            (Dim::Y, Point3::new(0.75, 0.0, -0.5)),
            (Dim::Z, Point3::new(-0.6, -0.6, 0.0)),
        ] {
            if let Some(label) = axes.label(dim) {
                let at = projector.screen_unit(anchor);
                canvas.text(at, label, LABEL_SIZE, Rgba::BLACK, TextAnchor::Middle);
            }
        }
        Ok(())
    }
}

impl WithDimensions for Figure {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.config.width = width;
        self.config.height = height;
    }
}

fn check_size(config: &FigureConfig) -> Result<()> {
    let margins = 2 * config.margin;
    if config.width / 2 <= margins || config.height / 2 <= margins {
        return Err(Error::InvalidDimensions {
            width: config.width,
            height: config.height,
        });
    }
    Ok(())
}

/// Line stroke of an artist; `None` when its line style hides it.
fn line_stroke(artist: &Artist) -> Option<Stroke> {
    let style = artist.style();
    (style.line_style != LineStyle::Hidden && style.line_width > 0.0).then(|| Stroke {
        color: artist.stroke(),
        width: style.line_width,
        dash: style.line_style.dash_pattern(),
    })
}

fn edge_color(artist: &Artist) -> Option<Rgba> {
    let style = artist.style();
    style.edge_color.map(|c| c.fade(style.alpha))
}

/// Outline of polygons and surface quads; drawn only with an edge color.
fn edge_stroke(artist: &Artist) -> Option<Stroke> {
    edge_color(artist).map(|color| Stroke {
        color,
        width: 1.0,
        dash: artist.style().line_style.dash_pattern(),
    })
}

/// Artists in ascending `zorder`; ties keep insertion order.
fn by_zorder(artists: &[Artist]) -> Vec<&Artist> {
    let mut ordered: Vec<&Artist> = artists.iter().collect();
    ordered.sort_by(|a, b| a.style().zorder.total_cmp(&b.style().zorder));
    ordered
}

/// Boxed key of the labelled artists, in insertion order.
fn draw_legend(canvas: &mut dyn Canvas, rect: Rect, artists: &[Artist]) {
    let entries: Vec<(&Artist, &str)> = artists
        .iter()
        .filter_map(|artist| artist.style().label.as_deref().map(|label| (artist, label)))
        .collect();
    if entries.is_empty() {
        return;
    }

    let longest = entries.iter().map(|(_, label)| label.chars().count()).max().unwrap_or(0);
    let width = LEGEND_SWATCH + 3.0 * LEGEND_PAD + longest as f32 * LABEL_SIZE * 0.6;
    let height = entries.len() as f32 * LEGEND_ROW + 2.0 * LEGEND_PAD;
    let origin = Point::new(rect.right() - width - LEGEND_PAD, rect.y + LEGEND_PAD);
    let outline = [
        origin,
        origin.offset_by(width, 0.0),
        origin.offset_by(width, height),
        origin.offset_by(0.0, height),
    ];
    canvas.polygon(&outline, Some(Rgba::WHITE), Some(&Stroke::solid(Rgba::FRAME, 1.0)));

    for (row, (artist, label)) in entries.into_iter().enumerate() {
        let swatch = origin.offset_by(LEGEND_PAD, LEGEND_PAD + (row as f32 + 0.5) * LEGEND_ROW);
        draw_swatch(canvas, artist, swatch);
        let at = swatch.offset_by(LEGEND_SWATCH + LEGEND_PAD, LABEL_SIZE / 3.0);
        canvas.text(at, label, LABEL_SIZE, Rgba::BLACK, TextAnchor::Start);
    }
}

/// Legend sample of `artist`, starting at `at` on the row's centre line.
fn draw_swatch(canvas: &mut dyn Canvas, artist: &Artist, at: Point) {
    let style = artist.style();
    let end = at.offset_by(LEGEND_SWATCH, 0.0);
    match artist.primitive() {
        Primitive::Line(_) | Primitive::Line3(_) | Primitive::Wireframe(_) => {
            if let Some(stroke) = line_stroke(artist) {
                canvas.line(at, end, &stroke);
            }
        }
        Primitive::Markers(_) | Primitive::Markers3(_) => {
            let size = style.marker_size.min(LEGEND_ROW);
            canvas.marker(at.lerp(end, 0.5), style.marker, size, artist.point_fill(0), edge_color(artist));
        }
        Primitive::Polygon(_) | Primitive::Polygon3(_) | Primitive::Surface(_) => {
            let half = LEGEND_ROW * 0.35;
            let patch = [
                at.offset_by(0.0, -half),
                end.offset_by(0.0, -half),
                end.offset_by(0.0, half),
                at.offset_by(0.0, half),
            ];
            canvas.polygon(&patch, Some(artist.fill()), edge_stroke(artist).as_ref());
        }
    }
}

fn draw_planar_artist(canvas: &mut dyn Canvas, artist: &Artist, to_screen: &dyn Fn(Point) -> Point) {
    let style = artist.style();
    match artist.primitive() {
        Primitive::Line(points) => {
            if let Some(stroke) = line_stroke(artist) {
                let screen: Vec<Point> = points.iter().map(|&p| to_screen(p)).collect();
                canvas.polyline(&screen, &stroke);
            }
        }
        Primitive::Markers(points) => {
            let edge = edge_color(artist);
            for (i, &p) in points.iter().enumerate() {
                canvas.marker(to_screen(p), style.marker, style.marker_size, artist.point_fill(i), edge);
            }
        }
        Primitive::Polygon(points) => {
            let screen: Vec<Point> = points.iter().map(|&p| to_screen(p)).collect();
            canvas.polygon(&screen, Some(artist.fill()), edge_stroke(artist).as_ref());
        }
        // Rejected by `Axes::add_artist` on planar axes.
        _ => {}
    }
}

/// A projected polygon awaiting depth sorting.
struct Face {
    points: Vec<Point>,
    depth: f32,
    fill: Rgba,
    edge: Option<Stroke>,
}

/// Maps data coordinates of the 3D axis to panel pixels.
struct Projector {
    scales: [LinearScale; 3],
    camera: Camera,
    center: Point,
    unit: f32,
}

impl Projector {
    fn new(axes: &Axes, rect: Rect, camera: Camera) -> Result<Self> {
        let scale = |dim: Dim| -> Result<LinearScale> {
            Ok(LinearScale::for_limits(axes.lim(dim)?, (-0.5, 0.5)))
        };
        Ok(Self {
            scales: [scale(Dim::X)?, scale(Dim::Y)?, scale(Dim::Z)?],
            camera,
            center: rect.center(),
            unit: rect.width.min(rect.height) / CUBE_EXTENT,
        })
    }

    /// Data point to the unit cube centred on the origin.
    fn normalize(&self, p: Point3) -> Point3 {
        Point3::new(self.scales[0].scale(p.x), self.scales[1].scale(p.y), self.scales[2].scale(p.z))
    }

    /// Unit-cube point to pixels.
    fn screen_unit(&self, q: Point3) -> Point {
        let flat = self.camera.project(q);
        Point::new(self.center.x + flat.x * self.unit, self.center.y - flat.y * self.unit)
    }

    fn screen(&self, p: Point3) -> Point {
        self.screen_unit(self.normalize(p))
    }

    fn depth(&self, p: Point3) -> f32 {
        self.camera.depth(self.normalize(p))
    }

    fn draw_cube(&self, canvas: &mut dyn Canvas) {
        let corner = |i: usize| {
            let half = |bit: usize| if i & bit == 0 { -0.5 } else { 0.5 };
            Point3::new(half(1), half(2), half(4))
        };
        let stroke = Stroke::solid(Rgba::FRAME, 1.0);
        for i in 0..8 {
            for bit in [1, 2, 4] {
                if i & bit == 0 {
                    canvas.line(self.screen_unit(corner(i)), self.screen_unit(corner(i | bit)), &stroke);
                }
            }
        }
    }

    fn collect_faces(&self, artist: &Artist, faces: &mut Vec<Face>) {
        match artist.primitive() {
            Primitive::Polygon3(points) => {
                if points.len() < 3 {
                    return;
                }
                let depth = points.iter().map(|&p| self.depth(p)).sum::<f32>() / points.len() as f32;
                faces.push(Face {
                    points: points.iter().map(|&p| self.screen(p)).collect(),
                    depth,
                    fill: artist.fill(),
                    edge: edge_stroke(artist),
                });
            }
            Primitive::Surface(grid) => {
                let style = artist.style();
                let base = artist.fill();
                let Some(heights) = artist.extent(Dim::Z) else {
                    return;
                };
                let ramp = ColorScale::ramp(base, heights);
                let edge = edge_stroke(artist);
                let rows = grid.row_indices(style.rstride);
                let cols = grid.col_indices(style.cstride);

                for r in rows.windows(2) {
                    for c in cols.windows(2) {
                        let corners = [
                            grid.point(r[0], c[0]),
                            grid.point(r[0], c[1]),
                            grid.point(r[1], c[1]),
                            grid.point(r[1], c[0]),
                        ];
                        if !corners.iter().all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
                            continue;
                        }
                        let unit = corners.map(|p| self.normalize(p));
                        let normal = unit[1].sub(unit[0]).cross(unit[3].sub(unit[0]));
                        let light = self.camera.light_intensity(normal);
                        // Per-face colors index the quad's first vertex, cycling.
                        let given = style.face_colors.as_ref().and_then(|colors| {
                            colors.get((r[0] * grid.cols() + c[0]) % colors.len().max(1)).copied()
                        });
                        let fill = match given {
                            Some(color) => color.shade(light).fade(style.alpha),
                            None => {
                                let mean_z = corners.iter().map(|p| p.z).sum::<f32>() / 4.0;
                                ramp.scale(mean_z).shade(light).with_alpha(base.a)
                            }
                        };
                        faces.push(Face {
                            points: unit.iter().map(|&q| self.screen_unit(q)).collect(),
                            depth: unit.iter().map(|&q| self.camera.depth(q)).sum::<f32>() / 4.0,
                            fill,
                            edge,
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn draw_lines(&self, canvas: &mut dyn Canvas, artist: &Artist) {
        let Some(stroke) = line_stroke(artist) else {
            return;
        };
        match artist.primitive() {
            Primitive::Line3(points) => {
                let screen: Vec<Point> = points.iter().map(|&p| self.screen(p)).collect();
                canvas.polyline(&screen, &stroke);
            }
            Primitive::Wireframe(grid) => {
                let style = artist.style();
                let rows = grid.row_indices(style.rstride);
                let cols = grid.col_indices(style.cstride);
                for &r in &rows {
                    let row: Vec<Point> = cols.iter().map(|&c| self.screen(grid.point(r, c))).collect();
                    canvas.polyline(&row, &stroke);
                }
                for &c in &cols {
                    let col: Vec<Point> = rows.iter().map(|&r| self.screen(grid.point(r, c))).collect();
                    canvas.polyline(&col, &stroke);
                }
            }
            _ => {}
        }
    }
}
