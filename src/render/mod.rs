//! Rendering backends and rasterization.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: hairlines with sub-pixel accuracy
//! - **Midpoint Circle**: filled and outlined markers
//! - **Even-odd scanline fill**: polygons and surface quads
//! - **Liang-Barsky clipping**: keeps lines inside their panel
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Liang, Y.-D., Barsky, B. (1984). "A New Concept and Method for Line Clipping."

mod canvas;
mod primitives;

pub use canvas::{Canvas, RasterCanvas, Stroke, SvgCanvas};
pub use primitives::{
    clip_segment, draw_circle, draw_circle_outline, draw_line_aa, draw_polyline,
    draw_rect_outline, draw_segment, fill_polygon,
};
