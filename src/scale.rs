//! Scale functions for data-to-visual mappings.
//!
//! Scales transform axis limits to pixel positions, and surface heights or
//! per-point values to colors.

use crate::axis::Limits;
use crate::color::Rgba;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
///
/// The domain is kept in stored order, so inverted limits flip the
/// direction of the mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// Returns `None` if the domain has zero width or is not finite.
    #[must_use]
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Option<Self> {
        let finite = domain.0.is_finite() && domain.1.is_finite();
        if !finite || (domain.0 - domain.1).abs() < f32::EPSILON {
            return None;
        }

        Some(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Scale for axis limits; zero-width limits are widened for display.
    ///
    /// The limits themselves are not modified.
    #[must_use]
    pub fn for_limits(limits: Limits, range: (f32, f32)) -> Self {
        let shown = limits.nonsingular().oriented(limits.is_inverted());
        Self::new((shown.low, shown.high), range).unwrap_or(Self {
            domain_min: 0.0,
            domain_max: 1.0,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// About `count` evenly spaced round values inside the domain, ascending.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let lo = self.domain_min.min(self.domain_max);
        let hi = self.domain_min.max(self.domain_max);
        let step = nice_step((hi - lo) / count.max(1) as f32);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        (first..=last).map(|i| i as f32 * step).collect()
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Round a raw step to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f32) -> f32 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let magnitude = 10f32.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Format a tick value compactly (`0.5`, `10`, `-2.25`).
#[must_use]
pub fn format_tick(value: f32) -> String {
    let value = if value.abs() < 1e-6 { 0.0 } else { value };
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Color scale for mapping values to colors.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// Returns `None` if `colors` is empty or the domain has zero width.
    #[must_use]
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Option<Self> {
        if colors.is_empty() || (domain.0 - domain.1).abs() < f32::EPSILON {
            return None;
        }

        Some(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Dark-to-light ramp around `base` over the ascending span of `limits`.
    #[must_use]
    pub fn ramp(base: Rgba, limits: Limits) -> Self {
        let shown = limits.nonsingular();
        let colors = vec![base.shade(0.55), base, base.lerp(Rgba::WHITE, 0.45)];
        Self {
            colors,
            domain_min: shown.min(),
            domain_max: shown.max(),
        }
    }
}

/// Named colormap for per-point colors (`cmap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Colormap {
    /// Viridis (perceptually uniform).
    #[default]
    Viridis,
    /// Jet (blue-cyan-yellow-red).
    Jet,
    /// Magma (sequential, perceptually uniform).
    Magma,
    /// Greyscale.
    Greyscale,
}

impl Colormap {
    /// Parse a colormap name, case-insensitively.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "viridis" => Some(Self::Viridis),
            "jet" => Some(Self::Jet),
            "magma" => Some(Self::Magma),
            "gray" | "grey" | "greys" | "greyscale" => Some(Self::Greyscale),
            _ => None,
        }
    }

    fn stops(self) -> Vec<Rgba> {
        match self {
            Self::Viridis => vec![
                Rgba::rgb(68, 1, 84),
                Rgba::rgb(59, 82, 139),
                Rgba::rgb(33, 145, 140),
                Rgba::rgb(94, 201, 98),
                Rgba::rgb(253, 231, 37),
            ],
            Self::Jet => vec![
                Rgba::rgb(0, 0, 128),
                Rgba::rgb(0, 0, 255),
                Rgba::rgb(0, 255, 255),
                Rgba::rgb(255, 255, 0),
                Rgba::rgb(255, 0, 0),
                Rgba::rgb(128, 0, 0),
            ],
            Self::Magma => vec![
                Rgba::rgb(0, 0, 4),
                Rgba::rgb(81, 18, 124),
                Rgba::rgb(183, 55, 121),
                Rgba::rgb(252, 137, 97),
                Rgba::rgb(252, 253, 191),
            ],
            Self::Greyscale => vec![Rgba::BLACK, Rgba::WHITE],
        }
    }

    /// Scale over the ascending span of `limits`; a flat span is widened.
    #[must_use]
    pub fn scale(self, limits: Limits) -> ColorScale {
        let shown = limits.nonsingular();
        ColorScale {
            colors: self.stops(),
            domain_min: shown.min(),
            domain_max: shown.max(),
        }
    }

    /// Color at `t` in `[0, 1]`.
    #[must_use]
    pub fn at(self, t: f32) -> Rgba {
        self.scale(Limits::new(0.0, 1.0)).scale(t)
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = (t * segment_count as f32).floor() as usize;
        let segment = segment.min(segment_count - 1);

        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}
