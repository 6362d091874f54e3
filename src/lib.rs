//! # Orthoproj-Viz
//!
//! Orthogonal projections of 3D data: one figure, four linked views.
//!
//! The figure shows the vertical plane (XZ), the lateral plane (YZ), the
//! horizontal plane (XY) and a 3D view. Panning or zooming any view moves
//! the matching dimension of the other three. Every limit change fires
//! exactly one round of sync functions, and the syncs write silently, so
//! linked axes converge without feedback loops.
//!
//! ## Quick Start
//!
//! ```rust
//! use orthoproj_viz::prelude::*;
//!
//! let t: Vec<f32> = (0..100).map(|i| i as f32 * 0.1).collect();
//! let x: Vec<f32> = t.iter().map(|t| t.sin()).collect();
//! let y: Vec<f32> = t.iter().map(|t| t.cos()).collect();
//!
//! let mut proj = OrthoProj::new(Some("Helix")).unwrap();
//! let styles = PlotStyles::new().shared(StyleOptions::new().with("color", "r"));
//! proj.plot(&x, &y, &t, &styles).unwrap();
//!
//! // Zoom the horizontal plane; XZ and 3D follow.
//! proj.set_lim(ViewId::Xy, Dim::X, Limits::new(-0.5, 0.5)).unwrap();
//! assert_eq!(proj.lim(ViewId::Xz, Dim::X).unwrap(), Limits::new(-0.5, 0.5));
//!
//! let svg = proj.to_svg().unwrap();
//! assert!(svg.contains("Horizontal Plane - XY"));
//! ```
//!
//! ## Outputs
//!
//! - **PNG**: rasterized through [`framebuffer::Framebuffer`]
//! - **SVG**: vector document with titles and tick labels
//! - **Terminal**: ASCII ink ramp or Unicode half blocks
//!
//! ## References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Liang, Y.-D., Barsky, B. (1984). "A New Concept and Method for Line Clipping."

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color spec parsing.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles, grids).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

// ============================================================================
// Synchronisation Modules
// ============================================================================

pub mod axis;

pub mod sync;

pub mod wiring;

pub mod view;

/// Drawn primitives and their data extents.
pub mod artist;

/// Style options, merging and validation.
pub mod style;

pub mod projection;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Orthographic camera for the 3D view.
pub mod camera;

pub mod figure;

/// Rendering backends and rasterization.
pub mod render;

/// Output encoders (PNG, SVG, terminal).
pub mod output;

/// Figure configuration (YAML).
pub mod config;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for orthoproj-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use orthoproj_viz::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::axis::{Axes, Axis, Dim, Limits};
    pub use crate::color::Rgba;
    pub use crate::config::{FigureConfig, OutputKind, TerminalStyle};
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Grid, Point, Point3};
    pub use crate::projection::{OrthoProj, Propagation};
    pub use crate::scale::Colormap;
    pub use crate::style::{PlotStyles, StyleOptions, StyleValue};
    pub use crate::view::ViewId;
    pub use crate::wiring::{Binding, WiringGraph};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
