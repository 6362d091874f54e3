//! Terminal output encoder.
//!
//! Renders a figure as text:
//! - ASCII: ink ramp ` .:-=+*#%@`, darkest pixel of each cell wins so
//!   hairlines survive downsampling
//! - Unicode: upper half blocks with 24-bit foreground/background colors,
//!   two pixel rows per text line

use crate::color::Rgba;
use crate::config::{OutputConfig, TerminalStyle};
use crate::framebuffer::Framebuffer;
use std::fmt::Write as FmtWrite;

/// Approximate height/width ratio of a terminal cell.
const CELL_ASPECT: f32 = 2.0;

/// Pixels per column when no width is configured.
const PIXELS_PER_COLUMN: u32 = 8;

/// Text renderer for framebuffers.
#[derive(Debug, Clone, Copy)]
pub struct TerminalEncoder {
    style: TerminalStyle,
    columns: Option<u32>,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new(TerminalStyle::default())
    }
}

impl TerminalEncoder {
    /// Ink ramp from blank paper to full ink.
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Create an encoder using `style`.
    #[must_use]
    pub fn new(style: TerminalStyle) -> Self {
        Self { style, columns: None }
    }

    /// Encoder described by the output section of a figure config.
    #[must_use]
    pub fn from_config(output: &OutputConfig) -> Self {
        let encoder = Self::new(output.terminal);
        if output.columns == 0 {
            encoder
        } else {
            encoder.columns(output.columns)
        }
    }

    /// Set the output width in characters.
    #[must_use]
    pub fn columns(mut self, columns: u32) -> Self {
        self.columns = Some(columns.max(1));
        self
    }

    /// Render a framebuffer to a string.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        match self.style {
            TerminalStyle::Ascii => self.render_ascii(fb),
            TerminalStyle::Unicode => self.render_half_blocks(fb),
        }
    }

    /// Write output directly to stdout.
    pub fn print(&self, fb: &Framebuffer) {
        print!("{}", self.render(fb));
    }

    fn render_ascii(&self, fb: &Framebuffer) -> String {
        let (cols, rows) = self.grid(fb, CELL_ASPECT);
        let mut output = String::with_capacity((cols as usize + 1) * rows as usize);

        for row in 0..rows {
            for col in 0..cols {
                let ink = 1.0 - darkest_luma(fb, cell(fb, col, row, cols, rows));
                let index = (ink * (Self::ASCII_RAMP.len() - 1) as f32).round() as usize;
                output.push(Self::ASCII_RAMP[index.min(Self::ASCII_RAMP.len() - 1)]);
            }
            output.push('\n');
        }
        output
    }

    fn render_half_blocks(&self, fb: &Framebuffer) -> String {
        let (cols, rows) = self.grid(fb, CELL_ASPECT / 2.0);
        let rows = (rows + 1) & !1;
        let mut output = String::with_capacity((cols as usize * 40 + 8) * (rows / 2) as usize);

        for row in (0..rows).step_by(2) {
            for col in 0..cols {
                let top = mean_color(fb, cell(fb, col, row, cols, rows));
                let bottom = mean_color(fb, cell(fb, col, row + 1, cols, rows));
                let _ = write!(
                    output,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m▀",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            output.push_str("\x1b[0m\n");
        }
        output
    }

    /// Character grid preserving the figure's aspect ratio.
    fn grid(&self, fb: &Framebuffer, aspect: f32) -> (u32, u32) {
        let cols = self
            .columns
            .unwrap_or_else(|| (fb.width() / PIXELS_PER_COLUMN).max(1))
            .min(fb.width());
        let pixels_per_col = fb.width() as f32 / cols as f32;
        let rows = (fb.height() as f32 / (pixels_per_col * aspect)).round() as u32;
        (cols, rows.clamp(1, fb.height()))
    }
}

/// Pixel bounds `(x0, y0, x1, y1)` (exclusive end) of one text cell.
fn cell(fb: &Framebuffer, col: u32, row: u32, cols: u32, rows: u32) -> (u32, u32, u32, u32) {
    let span = |index: u32, count: u32, size: u32| {
        let start = (u64::from(index) * u64::from(size) / u64::from(count)) as u32;
        let end = (u64::from(index + 1) * u64::from(size) / u64::from(count)) as u32;
        (start.min(size - 1), end.clamp(start + 1, size))
    };
    let (x0, x1) = span(col, cols, fb.width());
    let (y0, y1) = span(row, rows, fb.height());
    (x0, y0, x1, y1)
}

fn luma(pixel: Rgba) -> f32 {
    // Rec. 709
    0.2126 * (f32::from(pixel.r) / 255.0)
        + 0.7152 * (f32::from(pixel.g) / 255.0)
        + 0.0722 * (f32::from(pixel.b) / 255.0)
}

fn darkest_luma(fb: &Framebuffer, (x0, y0, x1, y1): (u32, u32, u32, u32)) -> f32 {
    let mut darkest: f32 = 1.0;
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(pixel) = fb.get_pixel(x, y) {
                darkest = darkest.min(luma(pixel));
            }
        }
    }
    darkest
}

fn mean_color(fb: &Framebuffer, (x0, y0, x1, y1): (u32, u32, u32, u32)) -> Rgba {
    let mut sum = [0u64; 3];
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(pixel) = fb.get_pixel(x, y) {
                sum[0] += u64::from(pixel.r);
                sum[1] += u64::from(pixel.g);
                sum[2] += u64::from(pixel.b);
                count += 1;
            }
        }
    }
    let count = count.max(1);
    Rgba::rgb(
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
    )
}
