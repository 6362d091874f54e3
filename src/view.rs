//! The four fixed views of an orthogonal projection.

use crate::axis::AxisKind;
use std::fmt;

/// Identifies one of the four views of a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ViewId {
    /// Vertical plane: displays `(x, z)`.
    Xz,
    /// Lateral plane: displays `(y, z)`, horizontal axis inverted.
    Yz,
    /// Horizontal plane: displays `(x, y)`.
    Xy,
    /// Perspective view of `(x, y, z)`.
    ThreeD,
}

impl ViewId {
    /// All views in subplot order.
    pub const ALL: [ViewId; 4] = [ViewId::Xz, ViewId::Yz, ViewId::Xy, ViewId::ThreeD];

    /// The three planar views.
    pub const PLANAR: [ViewId; 3] = [ViewId::Xz, ViewId::Yz, ViewId::Xy];

    /// Position in [`ViewId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            ViewId::Xz => 0,
            ViewId::Yz => 1,
            ViewId::Xy => 2,
            ViewId::ThreeD => 3,
        }
    }

    /// Subplot code in a 2x2 grid (rows, cols, position).
    #[must_use]
    pub const fn subplot(self) -> u16 {
        match self {
            ViewId::Xz => 221,
            ViewId::Yz => 222,
            ViewId::Xy => 223,
            ViewId::ThreeD => 224,
        }
    }

    /// `(row, col)` cell of the 2x2 grid.
    #[must_use]
    pub const fn cell(self) -> (u32, u32) {
        let position = (self.subplot() % 10) as u32 - 1;
        (position / 2, position % 2)
    }

    /// Panel title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            ViewId::Xz => "Vertical Plane - XZ",
            ViewId::Yz => "Lateral Plane - YZ",
            ViewId::Xy => "Horizontal Plane - XY",
            ViewId::ThreeD => "3D view - XYZ",
        }
    }

    /// Dimensionality of the view's axis.
    #[must_use]
    pub const fn kind(self) -> AxisKind {
        match self {
            ViewId::ThreeD => AxisKind::Volumetric,
            _ => AxisKind::Planar,
        }
    }

    /// Data coordinate names shown on the horizontal and vertical axes.
    #[must_use]
    pub const fn plane_names(self) -> (&'static str, &'static str) {
        match self {
            ViewId::Xz => ("x", "z"),
            ViewId::Yz => ("y", "z"),
            ViewId::Xy | ViewId::ThreeD => ("x", "y"),
        }
    }

    /// The two coordinate arrays a planar view displays; `None` for 3D.
    ///
    /// XZ drops Y, YZ drops X, XY drops Z.
    #[must_use]
    pub fn planar_data<'a>(
        self,
        x: &'a [f32],
        y: &'a [f32],
        z: &'a [f32],
    ) -> Option<(&'a [f32], &'a [f32])> {
        match self {
            ViewId::Xz => Some((x, z)),
            ViewId::Yz => Some((y, z)),
            ViewId::Xy => Some((x, y)),
            ViewId::ThreeD => None,
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViewId::Xz => "XZ",
            ViewId::Yz => "YZ",
            ViewId::Xy => "XY",
            ViewId::ThreeD => "3D",
        };
        f.write_str(name)
    }
}
