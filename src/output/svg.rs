//! SVG output encoder.
//!
//! Collects vector elements and serializes them as a standalone SVG
//! document. Clipped groups keep each panel's artists inside its frame.

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
    /// Groups opened by [`SvgEncoder::begin_clip`] and not yet closed.
    open: Vec<OpenGroup>,
    clip_count: usize,
}

#[derive(Debug, Clone)]
struct OpenGroup {
    clip: ClipRect,
    children: Vec<SvgElement>,
}

/// A named clip rectangle.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub struct ClipRect {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
    },
    /// Connected line segments, closed into a polygon when `closed`.
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        dash: Option<Vec<f32>>,
        fill: Option<Rgba>,
        closed: bool,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
    },
    /// Group clipped to a rectangle.
    Group {
        clip: ClipRect,
        children: Vec<SvgElement>,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl SvgEncoder {
    /// Create an empty document with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
            open: Vec::new(),
            clip_count: 0,
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add an element to the innermost open group, or the document.
    pub fn push(&mut self, element: SvgElement) {
        match self.open.last_mut() {
            Some(group) => group.children.push(element),
            None => self.elements.push(element),
        }
    }

    /// Open a group clipped to the given rectangle.
    pub fn begin_clip(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.clip_count += 1;
        self.open.push(OpenGroup {
            clip: ClipRect {
                id: format!("clip{}", self.clip_count),
                x,
                y,
                width,
                height,
            },
            children: Vec::new(),
        });
    }

    /// Close the innermost clipped group. Does nothing if none is open.
    pub fn end_clip(&mut self) {
        if let Some(group) = self.open.pop() {
            self.push(SvgElement::Group {
                clip: group.clip,
                children: group.children,
            });
        }
    }

    /// Number of top-level elements (open groups excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// True if nothing has been added at top level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Render to SVG string. Groups still open are closed in the output.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(
                svg,
                r#"  <rect width="100%" height="100%" fill="{}"/>"#,
                rgba_to_css(&bg)
            );
        }

        for element in &self.elements {
            write_element(&mut svg, element, 1);
        }

        // Fold still-open groups from the innermost outwards.
        let mut pending: Option<SvgElement> = None;
        for group in self.open.iter().rev() {
            let mut children = group.children.clone();
            children.extend(pending.take());
            pending = Some(SvgElement::Group {
                clip: group.clip.clone(),
                children,
            });
        }
        if let Some(group) = pending {
            write_element(&mut svg, &group, 1);
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: &Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!(
            "rgba({},{},{},{:.3})",
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0
        )
    }
}

fn paint(color: Option<Rgba>) -> String {
    color.map_or_else(|| "none".to_string(), |c| rgba_to_css(&c))
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn write_element(svg: &mut String, element: &SvgElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
        } => {
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="{stroke_width}""#, rgba_to_css(&s)))
                .unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"{indent}<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{stroke_attr}/>"#,
                paint(*fill)
            );
        }
        SvgElement::Circle { cx, cy, r, fill, stroke } => {
            let stroke_attr = stroke
                .map(|s| format!(r#" stroke="{}""#, rgba_to_css(&s)))
                .unwrap_or_default();
            let _ = writeln!(
                svg,
                r#"{indent}<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"{stroke_attr}/>"#,
                rgba_to_css(fill)
            );
        }
        SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
            dash,
            fill,
            closed,
        } => {
            let points_str = points
                .iter()
                .map(|(x, y)| format!("{x:.2},{y:.2}"))
                .collect::<Vec<_>>()
                .join(" ");
            let tag = if *closed { "polygon" } else { "polyline" };
            let stroke_attr = match stroke {
                Some(s) => {
                    let mut attr =
                        format!(r#" stroke="{}" stroke-width="{stroke_width}""#, rgba_to_css(s));
                    if let Some(pattern) = dash {
                        let list = pattern.iter().map(f32::to_string).collect::<Vec<_>>().join(",");
                        let _ = write!(attr, r#" stroke-dasharray="{list}""#);
                    }
                    attr.push_str(r#" stroke-linejoin="round""#);
                    attr
                }
                None => String::new(),
            };
            let _ = writeln!(
                svg,
                r#"{indent}<{tag} points="{points_str}" fill="{}"{stroke_attr}/>"#,
                paint(*fill)
            );
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = writeln!(
                svg,
                r#"{indent}<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif">{}</text>"#,
                rgba_to_css(fill),
                escape_xml(text)
            );
        }
        SvgElement::Group { clip, children } => {
            let _ = writeln!(
                svg,
                r#"{indent}<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}"/></clipPath>"#,
                clip.id, clip.x, clip.y, clip.width, clip.height
            );
            let _ = writeln!(svg, r#"{indent}<g clip-path="url(#{})">"#, clip.id);
            for child in children {
                write_element(svg, child, depth + 1);
            }
            let _ = writeln!(svg, "{indent}</g>");
        }
    }
}
