//! Drawn primitives and their data extents.

use crate::axis::{AxisKind, Dim, Limits};
use crate::color::Rgba;
use crate::geometry::{Grid, Point, Point3};
use crate::scale::Scale;
use crate::style::ResolvedStyle;
use trueno::Vector;

/// Geometry of one artist, in the owning axis's local dimensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Connected polyline on a planar axis.
    Line(Vec<Point>),
    /// Unconnected markers on a planar axis.
    Markers(Vec<Point>),
    /// Closed polygon on a planar axis.
    Polygon(Vec<Point>),
    /// Connected polyline in 3D.
    Line3(Vec<Point3>),
    /// Unconnected markers in 3D.
    Markers3(Vec<Point3>),
    /// Closed planar polygon in 3D.
    Polygon3(Vec<Point3>),
    /// Shaded surface over a grid.
    Surface(Grid),
    /// Grid lines along both parametric directions.
    Wireframe(Grid),
}

impl Primitive {
    /// Dimensionality of the axis this primitive belongs on.
    #[must_use]
    pub fn kind(&self) -> AxisKind {
        match self {
            Primitive::Line(_) | Primitive::Markers(_) | Primitive::Polygon(_) => AxisKind::Planar,
            _ => AxisKind::Volumetric,
        }
    }

    /// Short name used in messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Line(_) => "line",
            Primitive::Markers(_) => "markers",
            Primitive::Polygon(_) => "polygon",
            Primitive::Line3(_) => "line3d",
            Primitive::Markers3(_) => "markers3d",
            Primitive::Polygon3(_) => "polygon3d",
            Primitive::Surface(_) => "surface",
            Primitive::Wireframe(_) => "wireframe",
        }
    }

    /// Coordinates of every vertex along `dim`.
    fn coordinates(&self, dim: Dim) -> Vec<f32> {
        let planar = |points: &[Point]| -> Vec<f32> {
            match dim {
                Dim::X => points.iter().map(|p| p.x).collect(),
                Dim::Y => points.iter().map(|p| p.y).collect(),
                Dim::Z => Vec::new(),
            }
        };
        let spatial = |points: &mut dyn Iterator<Item = Point3>| -> Vec<f32> {
            match dim {
                Dim::X => points.map(|p| p.x).collect(),
                Dim::Y => points.map(|p| p.y).collect(),
                Dim::Z => points.map(|p| p.z).collect(),
            }
        };

        match self {
            Primitive::Line(points) | Primitive::Markers(points) | Primitive::Polygon(points) => {
                planar(points)
            }
            Primitive::Line3(points) | Primitive::Markers3(points) | Primitive::Polygon3(points) => {
                spatial(&mut points.iter().copied())
            }
            Primitive::Surface(grid) | Primitive::Wireframe(grid) => spatial(&mut grid.points()),
        }
    }
}

/// A primitive with its validated style and resolved color.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    primitive: Primitive,
    style: ResolvedStyle,
    color: Rgba,
    point_fills: Option<Vec<Rgba>>,
}

impl Artist {
    /// Create an artist; `color` is the explicit or color-cycle color.
    #[must_use]
    pub fn new(primitive: Primitive, style: ResolvedStyle, color: Rgba) -> Self {
        let point_fills = style
            .point_values
            .as_deref()
            .map(|values| map_point_values(values, &style, color));
        Self {
            primitive,
            style,
            color,
            point_fills,
        }
    }

    /// Geometry.
    #[must_use]
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Validated style.
    #[must_use]
    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// Base color before alpha.
    #[must_use]
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Stroke color with alpha applied.
    #[must_use]
    pub fn stroke(&self) -> Rgba {
        self.style.stroke(self.color)
    }

    /// Fill color with alpha applied.
    #[must_use]
    pub fn fill(&self) -> Rgba {
        self.style.fill(self.color)
    }

    /// Fill of the marker at `index`: its colormapped value when the style
    /// carries per-point values, the plain fill otherwise.
    #[must_use]
    pub fn point_fill(&self, index: usize) -> Rgba {
        self.point_fills
            .as_ref()
            .and_then(|fills| fills.get(index).copied())
            .unwrap_or_else(|| self.fill())
    }

    /// Ascending `(min, max)` of the finite coordinates along `dim`.
    ///
    /// `None` if there are no finite coordinates.
    #[must_use]
    pub fn extent(&self, dim: Dim) -> Option<Limits> {
        let finite: Vec<f32> = self
            .primitive
            .coordinates(dim)
            .into_iter()
            .filter(|v| v.is_finite())
            .collect();
        if finite.is_empty() {
            return None;
        }

        let values = Vector::from_vec(finite);
        let min = values.min().unwrap_or(f32::NAN);
        let max = values.max().unwrap_or(f32::NAN);
        (min.is_finite() && max.is_finite()).then(|| Limits::new(min, max))
    }
}

/// Colormap the values over their finite range; non-finite values keep the
/// plain fill.
fn map_point_values(values: &[f32], style: &ResolvedStyle, color: Rgba) -> Vec<Rgba> {
    let plain = style.fill(color);
    let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return vec![plain; values.len()];
    }
    let finite = Vector::from_vec(finite);
    let min = finite.min().unwrap_or(0.0);
    let max = finite.max().unwrap_or(min);

    let scale = style.cmap.scale(Limits::new(min, max));
    values
        .iter()
        .map(|&v| if v.is_finite() { scale.scale(v).fade(style.alpha) } else { plain })
        .collect()
}
