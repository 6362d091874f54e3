//! RGBA pixel buffer the figure is rasterized into.
//!
//! Rows are padded to a 64-byte stride. An optional clip rectangle
//! confines every pixel write, which is how each panel keeps its artists
//! inside its own frame.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// Pixel-space rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge (inclusive).
    pub x0: u32,
    /// Top edge (inclusive).
    pub y0: u32,
    /// Right edge (exclusive).
    pub x1: u32,
    /// Bottom edge (exclusive).
    pub y1: u32,
}

impl PixelRect {
    /// True if `(x, y)` lies inside.
    #[must_use]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// RGBA framebuffer in row-major order.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// Each pixel is 4 bytes: [R, G, B, A].
    pixels: Vec<u8>,
    /// Stride in bytes (includes alignment padding).
    stride: usize,
    clip: Option<PixelRect>,
}

impl Framebuffer {
    /// Create a transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use orthoproj_viz::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);

        Ok(Self {
            width,
            height,
            pixels: vec![0; stride * (height as usize)],
            stride,
            clip: None,
        })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Restrict subsequent writes to `clip` (clamped to the buffer), or lift
    /// the restriction with `None`.
    pub fn set_clip(&mut self, clip: Option<PixelRect>) {
        self.clip = clip.map(|c| PixelRect {
            x0: c.x0.min(self.width),
            y0: c.y0.min(self.height),
            x1: c.x1.min(self.width),
            y1: c.y1.min(self.height),
        });
    }

    /// Current clip rectangle.
    #[must_use]
    pub const fn clip(&self) -> Option<PixelRect> {
        self.clip
    }

    /// Clear the whole buffer to a solid color, ignoring the clip.
    pub fn clear(&mut self, color: Rgba) {
        let pixel = color.to_array();
        for y in 0..self.height as usize {
            let start = y * self.stride;
            let row = &mut self.pixels[start..start + (self.width as usize) * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// Coordinates are clamped to the buffer and the clip.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let bounds = self.writable();
        let x1 = x.max(bounds.x0);
        let y1 = y.max(bounds.y0);
        let x2 = x.saturating_add(w).min(bounds.x1);
        let y2 = y.saturating_add(h).min(bounds.y1);

        if x1 >= x2 || y1 >= y2 {
            return;
        }

        let pixel = color.to_array();
        let rect_width = (x2 - x1) as usize;

        for row_y in y1..y2 {
            let row_start = (row_y as usize) * self.stride + (x1 as usize) * 4;
            let row = &mut self.pixels[row_start..row_start + rect_width * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing outside the buffer or the clip.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if !self.writable().contains(x, y) {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Blend a color at a specific pixel coordinate using alpha blending.
    ///
    /// Uses the standard "over" compositing operation:
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if color.a == 255 {
            self.set_pixel(x, y, color);
            return;
        }
        if color.a == 0 || !self.writable().contains(x, y) {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        if out_a > 0.0 {
            let blend = |src: u8, dst: u8| -> u8 {
                let src_f = f32::from(src) / 255.0;
                let dst_f = f32::from(dst) / 255.0;
                let out = (src_f * src_a + dst_f * dst_a * (1.0 - src_a)) / out_a;
                (out * 255.0).round() as u8
            };

            self.pixels[idx] = blend(color.r, self.pixels[idx]);
            self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
            self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
            self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
        }
    }

    /// Luminance statistics of the pixels inside `region`.
    ///
    /// Returns `(min, max, mean)` in 0-255 units.
    #[must_use]
    pub fn luminance_stats(&self, region: PixelRect) -> (f32, f32, f32) {
        let x1 = region.x1.min(self.width);
        let y1 = region.y1.min(self.height);
        let mut luminances = Vec::new();

        for y in region.y0..y1 {
            if let Some(row) = self.row(y) {
                let start = (region.x0 as usize * 4).min(row.len());
                let end = (x1 as usize * 4).max(start);
                for chunk in row[start..end].chunks_exact(4) {
                    // ITU-R BT.709 luminance formula
                    let lum = 0.2126 * f32::from(chunk[0])
                        + 0.7152 * f32::from(chunk[1])
                        + 0.0722 * f32::from(chunk[2]);
                    luminances.push(lum);
                }
            }
        }

        let vec = Vector::from_vec(luminances);
        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(0.0);
        let mean = vec.mean().unwrap_or(0.0);

        (min, max, mean)
    }

    /// Get pixel data as a compact buffer without stride padding.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels[..row_bytes * (self.height as usize)].to_vec();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height {
            let start = (y as usize) * self.stride;
            compact.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        compact
    }

    fn writable(&self) -> PixelRect {
        self.clip.unwrap_or(PixelRect {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        })
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }
}
