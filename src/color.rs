//! Color types and color specification parsing.
//!
//! Style options name colors the way plotting users are used to: single
//! letters (`"r"`, `"k"`), CSS-like names (`"orange"`), hex strings
//! (`"#ff8800"`, `"#ff880080"`), and color-cycle references (`"C0"`..`"C9"`).

use crate::error::{Error, Result};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255, 255 = fully opaque).
    pub a: u8,
}

/// The default color cycle (tab10).
pub const COLOR_CYCLE: [Rgba; 10] = [
    Rgba::rgb(0x1f, 0x77, 0xb4),
    Rgba::rgb(0xff, 0x7f, 0x0e),
    Rgba::rgb(0x2c, 0xa0, 0x2c),
    Rgba::rgb(0xd6, 0x27, 0x28),
    Rgba::rgb(0x94, 0x67, 0xbd),
    Rgba::rgb(0x8c, 0x56, 0x4b),
    Rgba::rgb(0xe3, 0x77, 0xc2),
    Rgba::rgb(0x7f, 0x7f, 0x7f),
    Rgba::rgb(0xbc, 0xbd, 0x22),
    Rgba::rgb(0x17, 0xbe, 0xcf),
];

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::new(255, 0, 0, 255);
    /// Opaque green.
    pub const GREEN: Self = Self::new(0, 128, 0, 255);
    /// Opaque blue.
    pub const BLUE: Self = Self::new(0, 0, 255, 255);
    /// Light gray used for panel frames and the 3D bounding box.
    pub const FRAME: Self = Self::new(0x88, 0x88, 0x88, 255);

    /// Create a new RGBA color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color (alpha = 255).
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color with modified alpha.
    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Multiply the alpha channel by `alpha` (0.0 - 1.0).
    #[must_use]
    pub fn fade(self, alpha: f32) -> Self {
        let a = (f32::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }

    /// Scale the RGB channels by a lighting intensity (0.0 - 1.0).
    #[must_use]
    pub fn shade(self, intensity: f32) -> Self {
        let k = intensity.clamp(0.0, 1.0);
        Self::new(
            (f32::from(self.r) * k).round() as u8,
            (f32::from(self.g) * k).round() as u8,
            (f32::from(self.b) * k).round() as u8,
            self.a,
        )
    }

    /// Convert to array representation.
    #[must_use]
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Create from array representation.
    #[must_use]
    pub const fn from_array(arr: [u8; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    /// `#rrggbbaa` spec accepted by [`Rgba::parse`].
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation between two colors.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let inv_t = 1.0 - t;

        Self::new(
            (f32::from(self.r) * inv_t + f32::from(other.r) * t) as u8,
            (f32::from(self.g) * inv_t + f32::from(other.g) * t) as u8,
            (f32::from(self.b) * inv_t + f32::from(other.b) * t) as u8,
            (f32::from(self.a) * inv_t + f32::from(other.a) * t) as u8,
        )
    }

    /// Parse a color specification.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] if the spec is not recognised.
    ///
    /// # Example
    ///
    /// ```
    /// use orthoproj_viz::color::Rgba;
    ///
    /// assert_eq!(Rgba::parse("r").unwrap(), Rgba::RED);
    /// assert_eq!(Rgba::parse("#000000").unwrap(), Rgba::BLACK);
    /// ```
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| Error::InvalidColor(spec.to_string()));
        }

        if let Some(index) = spec.strip_prefix('C').and_then(|n| n.parse::<usize>().ok()) {
            return Ok(COLOR_CYCLE[index % COLOR_CYCLE.len()]);
        }

        let color = match spec.to_ascii_lowercase().as_str() {
            "b" | "blue" => Self::BLUE,
            "g" | "green" => Self::GREEN,
            "r" | "red" => Self::RED,
            "c" | "cyan" => Self::rgb(0, 191, 191),
            "m" | "magenta" => Self::rgb(191, 0, 191),
            "y" | "yellow" => Self::rgb(191, 191, 0),
            "k" | "black" => Self::BLACK,
            "w" | "white" => Self::WHITE,
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "none" | "transparent" => Self::TRANSPARENT,
            _ => return Err(Error::InvalidColor(spec.to_string())),
        };
        Ok(color)
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(Rgba::rgb(channel(0)?, channel(2)?, channel(4)?)),
        8 => Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
        _ => None,
    }
}
