//! Error types for orthoproj-viz operations.

use crate::axis::Dim;
use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in orthoproj-viz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The requested plot type is a deliberate capability gap.
    #[error("{0}: Not Implemented Yet")]
    NotImplemented(&'static str),

    /// I/O error (file operations, acknowledgment reads).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// The figure surface could not be created with these dimensions.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Coordinate arrays of different lengths.
    #[error("Data length mismatch: x has {x_len}, y has {y_len}, z has {z_len} elements")]
    DataLengthMismatch {
        /// Length of x data.
        x_len: usize,
        /// Length of y data.
        y_len: usize,
        /// Length of z data.
        z_len: usize,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided")]
    EmptyData,

    /// Surface/wireframe grids that are ragged or not equally shaped.
    #[error("Grid shape error: {0}")]
    GridShape(String),

    /// An axis was asked for a dimension it does not own.
    #[error("Axis '{axis}' has no {dim} dimension")]
    DimensionUnavailable {
        /// Title of the axis.
        axis: String,
        /// Requested dimension.
        dim: Dim,
    },

    /// A 3D primitive sent to a planar axis, or the reverse.
    #[error("Axis '{axis}' cannot draw a {primitive} primitive")]
    PrimitiveMismatch {
        /// Title of the axis.
        axis: String,
        /// Primitive name.
        primitive: &'static str,
    },

    /// Axis limits with a NaN or infinite bound.
    #[error("Invalid limits ({low}, {high}): bounds must be finite")]
    InvalidLimits {
        /// Requested low bound.
        low: f32,
        /// Requested high bound.
        high: f32,
    },

    /// A wiring edge that cannot be installed.
    #[error("Invalid wiring: {0}")]
    InvalidWiring(String),

    /// Style option rejected by the rendering backend.
    #[error("Invalid style option '{key}': {reason}")]
    InvalidStyle {
        /// Offending key.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Configuration parse error.
    #[error("Config parse error at line {line}: {message}")]
    Config {
        /// 1-based line number (0 when unknown).
        line: usize,
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_display() {
        let err = Error::NotImplemented("plot_trisurf");
        assert_eq!(err.to_string(), "plot_trisurf: Not Implemented Yet");
    }

    #[test]
    fn test_data_length_mismatch() {
        let err = Error::DataLengthMismatch {
            x_len: 10,
            y_len: 20,
            z_len: 30,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"));
        assert!(msg.contains("20"));
        assert!(msg.contains("30"));
    }

    #[test]
    fn test_dimension_unavailable_names_axis() {
        let err = Error::DimensionUnavailable {
            axis: "Vertical Plane - XZ".to_string(),
            dim: Dim::Z,
        };
        let msg = err.to_string();
        assert!(msg.contains("Vertical Plane - XZ"));
        assert!(msg.contains('z'));
    }

    #[test]
    fn test_invalid_limits_display() {
        let err = Error::InvalidLimits {
            low: f32::NAN,
            high: 1.0,
        };
        assert_eq!(err.to_string(), "Invalid limits (NaN, 1): bounds must be finite");
    }
}
