//! The orthogonal projection: four linked views of the same 3D data.
//!
//! [`OrthoProj`] owns the XZ, YZ, XY and 3D axes, installs the wiring
//! graph between them and dispatches limit-change notifications. A
//! notifying set on one axis runs each subscribed sync function exactly
//! once; sync functions write silently, so propagation is one hop deep and
//! always terminates.

use crate::artist::Primitive;
use crate::axis::{Axes, Axis, Dim, LimitChanged, Limits};
use crate::config::{FigureConfig, OutputKind};
use crate::error::{Error, Result};
use crate::figure::Figure;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Grid, Point, Point3};
use crate::output::{PngEncoder, TerminalEncoder};
use crate::style::{PlotStyles, ResolvedStyle, StyleOptions};
use crate::view::ViewId;
use crate::wiring::WiringGraph;
use batuta_common::display::WithDimensions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prompt printed by a blocking [`OrthoProj::show`].
pub const ACK_PROMPT: &str = "Press any key to continue";

/// Outcome of one notifying limit set.
#[derive(Debug, Clone, PartialEq)]
pub struct Propagation {
    /// View and dimension that changed.
    pub source: (ViewId, Dim),
    /// Limits written to the source.
    pub limits: Limits,
    /// Targets silently updated, in dispatch order.
    pub updated: Vec<(ViewId, Dim)>,
}

/// Orthogonal projection figure with synchronised axes.
///
/// # Example
///
/// ```
/// use orthoproj_viz::prelude::*;
///
/// let mut proj = OrthoProj::new(Some("Example")).unwrap();
/// proj.plot(&[0.0, 1.0], &[0.0, 2.0], &[0.0, 3.0], &PlotStyles::new()).unwrap();
///
/// let moved = proj.set_lim(ViewId::Xy, Dim::X, Limits::new(-1.0, 1.0)).unwrap();
/// assert_eq!(moved.updated, vec![(ViewId::Xz, Dim::X), (ViewId::ThreeD, Dim::X)]);
/// assert_eq!(proj.lim(ViewId::ThreeD, Dim::X).unwrap(), Limits::new(-1.0, 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct OrthoProj {
    figure: Figure,
    views: [Axes; 4],
    wiring: WiringGraph,
}

impl OrthoProj {
    /// Create a projection with default settings and an optional title.
    ///
    /// # Errors
    ///
    /// See [`OrthoProj::with_config`].
    pub fn new(title: Option<&str>) -> Result<Self> {
        let config = title.map_or_else(FigureConfig::default, FigureConfig::with_title);
        Self::with_config(config)
    }

    /// Create a projection from a figure configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the figure surface cannot be
    /// created and [`Error::InvalidColor`] for a bad background.
    pub fn with_config(config: FigureConfig) -> Result<Self> {
        Self::with_wiring(config, WiringGraph::standard())
    }

    /// Create a projection with a custom wiring graph.
    ///
    /// # Errors
    ///
    /// As [`OrthoProj::with_config`], plus wiring validation errors.
    pub fn with_wiring(config: FigureConfig, wiring: WiringGraph) -> Result<Self> {
        let figure = Figure::new(config)?;
        let mut views = ViewId::ALL.map(|view| Axes::new(view.title(), view.kind()));
        wiring.install(&mut views)?;

        let mut proj = Self { figure, views, wiring };
        proj.invert_axis(ViewId::Yz, Dim::X)?;
        let three_d = proj.axes_mut(ViewId::ThreeD);
        three_d.set_label(Dim::X, "X axis")?;
        three_d.set_label(Dim::Y, "Y axis")?;
        three_d.set_label(Dim::Z, "Z axis")?;

        info!(
            title = proj.figure.title().unwrap_or_default(),
            edges = proj.wiring.len(),
            "projection created"
        );
        Ok(proj)
    }

    /// The axis of `view`.
    #[must_use]
    pub fn axes(&self, view: ViewId) -> &Axes {
        &self.views[view.index()]
    }

    /// All four axes, indexed by [`ViewId::index`].
    #[must_use]
    pub fn views(&self) -> &[Axes; 4] {
        &self.views
    }

    /// Installed wiring graph.
    #[must_use]
    pub fn wiring(&self) -> &WiringGraph {
        &self.wiring
    }

    /// Display surface.
    #[must_use]
    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    /// Current limits of `dim` on `view`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionUnavailable`] if `view` lacks `dim`.
    pub fn lim(&self, view: ViewId, dim: Dim) -> Result<Limits> {
        self.axes(view).lim(dim)
    }

    /// Pan/zoom entry point: set limits and propagate them.
    ///
    /// Autoscaling of `dim` on `view` is switched off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionUnavailable`] if `view` lacks `dim` and
    /// [`Error::InvalidLimits`] for a NaN or infinite bound. Nothing changes
    /// or propagates on error.
    pub fn set_lim(&mut self, view: ViewId, dim: Dim, limits: Limits) -> Result<Propagation> {
        let axes = self.axes_mut(view);
        let event = axes.set_lim(dim, limits)?;
        axes.set_autoscale(dim, false)?;
        self.dispatch(view, event)
    }

    /// Reverse the displayed direction of `dim` on `view` and propagate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionUnavailable`] if `view` lacks `dim`.
    pub fn invert_axis(&mut self, view: ViewId, dim: Dim) -> Result<Propagation> {
        let axes = self.axes_mut(view);
        let reversed = axes.lim(dim)?.reversed();
        let event = axes.set_lim(dim, reversed)?;
        self.dispatch(view, event)
    }

    /// Draw a line through the points on every view.
    ///
    /// # Errors
    ///
    /// Returns data validation and style errors; nothing is drawn then.
    pub fn plot(&mut self, x: &[f32], y: &[f32], z: &[f32], styles: &PlotStyles) -> Result<()> {
        self.project(x, y, z, styles, Primitive::Line, Primitive::Line3)
    }

    /// Draw a marker at every point on every view.
    ///
    /// # Errors
    ///
    /// Returns data validation and style errors; nothing is drawn then.
    pub fn scatter(&mut self, x: &[f32], y: &[f32], z: &[f32], styles: &PlotStyles) -> Result<()> {
        self.project(x, y, z, styles, Primitive::Markers, Primitive::Markers3)
    }

    /// Draw the ordered vertices as one closed polygon on every view.
    ///
    /// # Errors
    ///
    /// Returns data validation and style errors; nothing is drawn then.
    pub fn plot_collection(
        &mut self,
        x: &[f32],
        y: &[f32],
        z: &[f32],
        styles: &PlotStyles,
    ) -> Result<()> {
        self.project(x, y, z, styles, Primitive::Polygon, Primitive::Polygon3)
    }

    /// Shaded surface in 3D; grid lines in both directions on planar views.
    ///
    /// # Errors
    ///
    /// Returns style errors; nothing is drawn then.
    pub fn plot_surface(&mut self, grid: &Grid, styles: &PlotStyles) -> Result<()> {
        self.project_grid(grid, styles, Primitive::Surface)
    }

    /// Wireframe in 3D; grid lines in both directions on planar views.
    ///
    /// # Errors
    ///
    /// Returns style errors; nothing is drawn then.
    pub fn plot_wireframe(&mut self, grid: &Grid, styles: &PlotStyles) -> Result<()> {
        self.project_grid(grid, styles, Primitive::Wireframe)
    }

    /// Triangulated surfaces are not supported.
    ///
    /// # Errors
    ///
    /// Always returns [`Error::NotImplemented`].
    pub fn plot_trisurf(
        &mut self,
        _x: &[f32],
        _y: &[f32],
        _z: &[f32],
        _styles: &PlotStyles,
    ) -> Result<()> {
        Err(Error::NotImplemented("plot_trisurf"))
    }

    /// Render to the configured output; with `block`, wait for a line on
    /// stdin.
    ///
    /// # Errors
    ///
    /// Returns rendering, export and stdin errors.
    pub fn show(&self, block: bool) -> Result<()> {
        let stdin = io::stdin();
        self.show_with_input(block, stdin.lock())
    }

    /// As [`OrthoProj::show`], reading the acknowledgment from `input`.
    ///
    /// # Errors
    ///
    /// Returns rendering and export errors, and [`Error::Io`] if the
    /// acknowledgment cannot be read.
    pub fn show_with_input<R: BufRead>(&self, block: bool, mut input: R) -> Result<()> {
        let output = &self.figure.config().output;
        match output.kind {
            OutputKind::Png => {
                let path = output_path(output.path.as_deref(), "png");
                self.save_png(&path)?;
            }
            OutputKind::Svg => {
                let path = output_path(output.path.as_deref(), "svg");
                self.save_svg(&path)?;
            }
            OutputKind::Terminal => {
                print!("{}", self.render_terminal()?);
                info!(kind = "terminal", "figure shown");
            }
        }

        if block {
            let mut stdout = io::stdout();
            write!(stdout, "{ACK_PROMPT}")?;
            stdout.flush()?;
            let mut line = String::new();
            input.read_line(&mut line)?;
        }
        Ok(())
    }

    /// Rasterize the figure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the figure was resized below
    /// its minimum.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        self.figure.render_raster(&self.views)
    }

    /// Render the figure as an SVG document.
    ///
    /// # Errors
    ///
    /// See [`OrthoProj::to_framebuffer`].
    pub fn to_svg(&self) -> Result<String> {
        Ok(self.figure.render_svg(&self.views)?.render())
    }

    /// Render the figure as terminal text using the configured style.
    ///
    /// # Errors
    ///
    /// See [`OrthoProj::to_framebuffer`].
    pub fn render_terminal(&self) -> Result<String> {
        let fb = self.to_framebuffer()?;
        Ok(TerminalEncoder::from_config(&self.figure.config().output).render(&fb))
    }

    /// Write the figure as PNG.
    ///
    /// # Errors
    ///
    /// Returns rendering, I/O and encoding errors.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        PngEncoder::write_to_file(&self.to_framebuffer()?, path.as_ref())?;
        info!(path = %path.as_ref().display(), "figure exported as PNG");
        Ok(())
    }

    /// Write the figure as SVG.
    ///
    /// # Errors
    ///
    /// Returns rendering and I/O errors.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        self.figure.render_svg(&self.views)?.write_to_file(path.as_ref())?;
        info!(path = %path.as_ref().display(), "figure exported as SVG");
        Ok(())
    }

    /// Tear down the projection.
    pub fn close(self) {
        info!(title = self.figure.title().unwrap_or_default(), "projection closed");
    }

    fn axes_mut(&mut self, view: ViewId) -> &mut Axes {
        &mut self.views[view.index()]
    }

    /// Run every subscription of `event`, emitted by `source`.
    fn dispatch(&mut self, source: ViewId, event: LimitChanged) -> Result<Propagation> {
        let mut updated = Vec::with_capacity(event.subscribers.len());
        for subscription in &event.subscribers {
            let (target, origin) = pair_mut(&mut self.views, subscription.target, source)?;
            let written = (subscription.handler)(target, origin)?;
            debug!(
                %source,
                dim = %event.dim,
                target = %subscription.target,
                target_dim = %subscription.target_dim,
                low = written.low,
                high = written.high,
                "sync dispatched"
            );
            updated.push((subscription.target, subscription.target_dim));
        }
        Ok(Propagation {
            source: (source, event.dim),
            limits: event.limits,
            updated,
        })
    }

    /// Add an artist to `view` and propagate its autoscale.
    fn add(&mut self, view: ViewId, primitive: Primitive, options: &StyleOptions) -> Result<()> {
        let events = self.axes_mut(view).add_artist(primitive, options)?;
        for event in events {
            debug!(%view, dim = %event.dim, low = event.limits.low, high = event.limits.high, "autoscale");
            self.dispatch(view, event)?;
        }
        Ok(())
    }

    /// Merge and validate all four style sets before drawing anything.
    fn resolve_styles(styles: &PlotStyles) -> Result<[StyleOptions; 4]> {
        let options = ViewId::ALL.map(|view| styles.for_view(view));
        for set in &options {
            ResolvedStyle::resolve(set)?;
        }
        Ok(options)
    }

    fn project(
        &mut self,
        x: &[f32],
        y: &[f32],
        z: &[f32],
        styles: &PlotStyles,
        planar: fn(Vec<Point>) -> Primitive,
        spatial: fn(Vec<Point3>) -> Primitive,
    ) -> Result<()> {
        check_lengths(x, y, z)?;
        let options = Self::resolve_styles(styles)?;
        check_point_values(&options, x.len())?;

        for view in ViewId::PLANAR {
            if let Some((h, v)) = view.planar_data(x, y, z) {
                let points = h.iter().zip(v).map(|(&a, &b)| Point::new(a, b)).collect();
                self.add(view, planar(points), &options[view.index()])?;
            }
        }
        let points = x
            .iter()
            .zip(y)
            .zip(z)
            .map(|((&a, &b), &c)| Point3::new(a, b, c))
            .collect();
        self.add(ViewId::ThreeD, spatial(points), &options[ViewId::ThreeD.index()])
    }

    fn project_grid(
        &mut self,
        grid: &Grid,
        styles: &PlotStyles,
        spatial: fn(Grid) -> Primitive,
    ) -> Result<()> {
        let options = Self::resolve_styles(styles)?;

        for view in ViewId::PLANAR {
            let style = ResolvedStyle::resolve(&options[view.index()])?;
            let strided = grid.strided(style.rstride, style.cstride);
            let transposed = strided.transposed();
            for lines in [&strided, &transposed] {
                self.add(view, Primitive::Line(grid_lines(view, lines)), &options[view.index()])?;
            }
        }
        self.add(ViewId::ThreeD, spatial(grid.clone()), &options[ViewId::ThreeD.index()])
    }
}

impl WithDimensions for OrthoProj {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.figure.set_dimensions(width, height);
    }
}

/// Mutable target and shared source out of the same array.
fn pair_mut(views: &mut [Axes; 4], target: ViewId, source: ViewId) -> Result<(&mut Axes, &Axes)> {
    let (t, s) = (target.index(), source.index());
    if t == s {
        return Err(Error::InvalidWiring(format!("{target} is wired to itself")));
    }
    if t < s {
        let (low, high) = views.split_at_mut(s);
        Ok((&mut low[t], &high[0]))
    } else {
        let (low, high) = views.split_at_mut(t);
        Ok((&mut high[0], &low[s]))
    }
}

fn check_lengths(x: &[f32], y: &[f32], z: &[f32]) -> Result<()> {
    if x.len() != y.len() || x.len() != z.len() {
        return Err(Error::DataLengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
            z_len: z.len(),
        });
    }
    if x.is_empty() {
        return Err(Error::EmptyData);
    }
    Ok(())
}

/// Per-point color arrays must carry one value per data point.
fn check_point_values(options: &[StyleOptions; 4], points: usize) -> Result<()> {
    for set in options {
        if let Some(values) = ResolvedStyle::resolve(set)?.point_values {
            if values.len() != points {
                return Err(Error::InvalidStyle {
                    key: "c".to_string(),
                    reason: format!("{} values for {points} points", values.len()),
                });
            }
        }
    }
    Ok(())
}

/// Every grid row as a planar polyline, rows separated by a NaN break.
fn grid_lines(view: ViewId, grid: &Grid) -> Vec<Point> {
    let mut points = Vec::with_capacity(grid.rows() * (grid.cols() + 1));
    for r in 0..grid.rows() {
        let (xs, ys, zs) = grid.row(r);
        if let Some((h, v)) = view.planar_data(xs, ys, zs) {
            if r > 0 {
                points.push(Point::new(f32::NAN, f32::NAN));
            }
            points.extend(h.iter().zip(v).map(|(&a, &b)| Point::new(a, b)));
        }
    }
    points
}

fn output_path(configured: Option<&Path>, extension: &str) -> PathBuf {
    configured.map_or_else(|| PathBuf::from(format!("orthoproj.{extension}")), Path::to_path_buf)
}
