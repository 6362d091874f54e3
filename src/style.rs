//! Per-view and shared style options.
//!
//! A plot call carries one optional [`StyleOptions`] map per view plus a
//! shared map. The effective options of a view are `merge(shared, view)`:
//! start from the shared options and overlay the per-view ones, so the
//! per-view value wins on a key collision. Merging never inspects keys;
//! the rendering backend validates them when the artist is created
//! ([`ResolvedStyle::resolve`]).

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::scale::Colormap;
use crate::view::ViewId;
use std::collections::BTreeMap;

/// A single style option value.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    /// String value (colors, markers, line styles, labels).
    Str(String),
    /// Numeric value (alpha, widths, sizes).
    Num(f64),
    /// Boolean flag.
    Bool(bool),
    /// Numeric array (per-point color values).
    Nums(Vec<f64>),
    /// String array (per-face colors).
    Strs(Vec<String>),
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        Self::Num(f64::from(value))
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Num(f64::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<f64>> for StyleValue {
    fn from(value: Vec<f64>) -> Self {
        Self::Nums(value)
    }
}

impl From<&[f32]> for StyleValue {
    fn from(value: &[f32]) -> Self {
        Self::Nums(value.iter().map(|&v| f64::from(v)).collect())
    }
}

impl From<Vec<f32>> for StyleValue {
    fn from(value: Vec<f32>) -> Self {
        Self::from(value.as_slice())
    }
}

impl From<Vec<String>> for StyleValue {
    fn from(value: Vec<String>) -> Self {
        Self::Strs(value)
    }
}

impl From<Vec<&str>> for StyleValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Strs(value.into_iter().map(str::to_string).collect())
    }
}

/// An ordered mapping of style keys to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOptions {
    entries: BTreeMap<String, StyleValue>,
}

impl StyleOptions {
    /// Create an empty option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option (builder style).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an option.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up an option.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&StyleValue> {
        self.entries.get(key)
    }

    /// Number of options.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no options are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Merge option sets left to right; later sets win on key collision.
///
/// ```
/// use orthoproj_viz::style::{merge, StyleOptions, StyleValue};
///
/// let shared = StyleOptions::new().with("color", "k").with("alpha", 0.5);
/// let view = StyleOptions::new().with("color", "r");
/// let merged = merge(&[Some(&shared), Some(&view)]);
///
/// assert_eq!(merged.get("color"), Some(&StyleValue::from("r")));
/// assert_eq!(merged.get("alpha"), Some(&StyleValue::from(0.5)));
/// ```
#[must_use]
pub fn merge(sets: &[Option<&StyleOptions>]) -> StyleOptions {
    let mut result = StyleOptions::new();
    for set in sets.iter().flatten() {
        for (key, value) in &set.entries {
            result.entries.insert(key.clone(), value.clone());
        }
    }
    result
}

/// Style options for one plot call: one set per view plus a shared set.
#[derive(Debug, Clone, Default)]
pub struct PlotStyles {
    /// Options for the XZ view.
    pub xz: Option<StyleOptions>,
    /// Options for the YZ view.
    pub yz: Option<StyleOptions>,
    /// Options for the XY view.
    pub xy: Option<StyleOptions>,
    /// Options for the 3D view.
    pub three_d: Option<StyleOptions>,
    /// Options common to every view; per-view options take precedence.
    pub shared: Option<StyleOptions>,
}

impl PlotStyles {
    /// No options for any view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shared options.
    #[must_use]
    pub fn shared(mut self, options: StyleOptions) -> Self {
        self.shared = Some(options);
        self
    }

    /// Set the options of one view.
    #[must_use]
    pub fn view(mut self, view: ViewId, options: StyleOptions) -> Self {
        *self.slot_mut(view) = Some(options);
        self
    }

    /// Per-view options as given, without the shared set.
    #[must_use]
    pub fn per_view(&self, view: ViewId) -> Option<&StyleOptions> {
        match view {
            ViewId::Xz => self.xz.as_ref(),
            ViewId::Yz => self.yz.as_ref(),
            ViewId::Xy => self.xy.as_ref(),
            ViewId::ThreeD => self.three_d.as_ref(),
        }
    }

    /// Effective options of `view`: shared first, per-view overlaid.
    #[must_use]
    pub fn for_view(&self, view: ViewId) -> StyleOptions {
        merge(&[self.shared.as_ref(), self.per_view(view)])
    }

    fn slot_mut(&mut self, view: ViewId) -> &mut Option<StyleOptions> {
        match view {
            ViewId::Xz => &mut self.xz,
            ViewId::Yz => &mut self.yz,
            ViewId::Xy => &mut self.xy,
            ViewId::ThreeD => &mut self.three_d,
        }
    }
}

/// Marker shape for scatter artists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Marker {
    /// Filled circle (`"o"`).
    #[default]
    Circle,
    /// Small dot (`"."`).
    Point,
    /// Filled square (`"s"`).
    Square,
    /// Diagonal cross (`"x"`).
    Cross,
    /// Plus sign (`"+"`).
    Plus,
}

impl Marker {
    fn parse(spec: &str) -> Option<Self> {
        match spec {
            "o" => Some(Self::Circle),
            "." => Some(Self::Point),
            "s" => Some(Self::Square),
            "x" => Some(Self::Cross),
            "+" => Some(Self::Plus),
            _ => None,
        }
    }
}

/// Stroke pattern for lines and polygon edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// Continuous stroke (`"-"`).
    #[default]
    Solid,
    /// Dashes (`"--"`).
    Dashed,
    /// Dots (`":"`).
    Dotted,
    /// Dash-dot (`"-."`).
    DashDot,
    /// No stroke (`"None"`, `""`).
    Hidden,
}

impl LineStyle {
    fn parse(spec: &str) -> Option<Self> {
        match spec {
            "-" | "solid" => Some(Self::Solid),
            "--" | "dashed" => Some(Self::Dashed),
            ":" | "dotted" => Some(Self::Dotted),
            "-." | "dashdot" => Some(Self::DashDot),
            "" | " " | "None" | "none" => Some(Self::Hidden),
            _ => None,
        }
    }

    /// On/off pattern in pixels, `None` for a continuous stroke.
    #[must_use]
    pub fn dash_pattern(self) -> Option<&'static [f32]> {
        match self {
            Self::Solid | Self::Hidden => None,
            Self::Dashed => Some(&[6.0, 4.0]),
            Self::Dotted => Some(&[1.5, 3.0]),
            Self::DashDot => Some(&[6.0, 3.0, 1.5, 3.0]),
        }
    }
}

/// Style options validated and converted for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Primary color (`color` / `c`); `None` means "next in the color cycle".
    pub color: Option<Rgba>,
    /// Opacity multiplier.
    pub alpha: f32,
    /// Stroke width in pixels.
    pub line_width: f32,
    /// Marker diameter in pixels (`markersize`, or the square root of the
    /// marker area `s`).
    pub marker_size: f32,
    /// Marker shape.
    pub marker: Marker,
    /// Stroke pattern.
    pub line_style: LineStyle,
    /// Fill color for polygons and surfaces.
    pub face_color: Option<Rgba>,
    /// Edge color for polygons and surfaces.
    pub edge_color: Option<Rgba>,
    /// Legend label.
    pub label: Option<String>,
    /// Drawing order within a planar panel; higher draws later.
    pub zorder: f32,
    /// Per-point values mapped through [`ResolvedStyle::cmap`] (`c` given
    /// as an array). Markers take one color per point.
    pub point_values: Option<Vec<f32>>,
    /// Colormap for `point_values`.
    pub cmap: Colormap,
    /// Per-quad surface colors, row-major over the grid vertices.
    pub face_colors: Option<Vec<Rgba>>,
    /// Keep every `rstride`-th grid row.
    pub rstride: usize,
    /// Keep every `cstride`-th grid column.
    pub cstride: usize,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            color: None,
            alpha: 1.0,
            line_width: 1.5,
            marker_size: 6.0,
            marker: Marker::Circle,
            line_style: LineStyle::Solid,
            face_color: None,
            edge_color: None,
            label: None,
            zorder: 0.0,
            point_values: None,
            cmap: Colormap::default(),
            face_colors: None,
            rstride: 1,
            cstride: 1,
        }
    }
}

impl ResolvedStyle {
    /// Validate and convert an option set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStyle`] for unknown keys or wrongly typed
    /// values, and [`Error::InvalidColor`] for unparseable colors.
    pub fn resolve(options: &StyleOptions) -> Result<Self> {
        let mut style = Self::default();

        for (key, value) in options.iter() {
            match key {
                "color" => style.color = Some(color_value(key, value)?),
                "c" => match value {
                    StyleValue::Nums(values) => {
                        style.point_values = Some(values.iter().map(|&v| v as f32).collect());
                    }
                    other => style.color = Some(color_value(key, other)?),
                },
                "cmap" => {
                    let name = string(key, value)?;
                    style.cmap = Colormap::parse(name)
                        .ok_or_else(|| invalid(key, format!("unknown colormap '{name}'")))?;
                }
                "facecolors" => {
                    let specs = match value {
                        StyleValue::Strs(specs) => specs.as_slice(),
                        StyleValue::Str(spec) => std::slice::from_ref(spec),
                        other => {
                            return Err(invalid(key, format!("expected color names, got {other:?}")))
                        }
                    };
                    if specs.is_empty() {
                        return Err(invalid(key, "needs at least one color".to_string()));
                    }
                    let colors: Vec<Rgba> = specs.iter().map(|spec| Rgba::parse(spec)).collect::<Result<_>>()?;
                    style.face_colors = Some(colors);
                }
                "zorder" => style.zorder = number(key, value)?,
                "rstride" => style.rstride = stride(key, value)?,
                "cstride" => style.cstride = stride(key, value)?,
                "alpha" => style.alpha = number(key, value)?.clamp(0.0, 1.0),
                "linewidth" | "lw" => style.line_width = non_negative(key, value)?,
                "s" => style.marker_size = non_negative(key, value)?.sqrt(),
                "markersize" | "ms" => style.marker_size = non_negative(key, value)?,
                "facecolor" | "fc" => style.face_color = Some(color_value(key, value)?),
                "edgecolor" | "ec" => style.edge_color = Some(color_value(key, value)?),
                "label" => style.label = Some(string(key, value)?.to_string()),
                "marker" => {
                    let spec = string(key, value)?;
                    style.marker = Marker::parse(spec)
                        .ok_or_else(|| invalid(key, format!("unknown marker '{spec}'")))?;
                }
                "linestyle" | "ls" => {
                    let spec = string(key, value)?;
                    style.line_style = LineStyle::parse(spec)
                        .ok_or_else(|| invalid(key, format!("unknown line style '{spec}'")))?;
                }
                _ => return Err(invalid(key, "unrecognised option".to_string())),
            }
        }

        Ok(style)
    }

    /// Stroke color after applying alpha, given the cycle fallback.
    #[must_use]
    pub fn stroke(&self, fallback: Rgba) -> Rgba {
        self.color.unwrap_or(fallback).fade(self.alpha)
    }

    /// Fill color after applying alpha, given the cycle fallback.
    #[must_use]
    pub fn fill(&self, fallback: Rgba) -> Rgba {
        self.face_color.or(self.color).unwrap_or(fallback).fade(self.alpha)
    }
}

fn invalid(key: &str, reason: String) -> Error {
    Error::InvalidStyle {
        key: key.to_string(),
        reason,
    }
}

fn string<'a>(key: &str, value: &'a StyleValue) -> Result<&'a str> {
    match value {
        StyleValue::Str(s) => Ok(s),
        other => Err(invalid(key, format!("expected a string, got {other:?}"))),
    }
}

fn number(key: &str, value: &StyleValue) -> Result<f32> {
    match value {
        StyleValue::Num(n) if n.is_finite() => Ok(*n as f32),
        other => Err(invalid(key, format!("expected a finite number, got {other:?}"))),
    }
}

fn non_negative(key: &str, value: &StyleValue) -> Result<f32> {
    let n = number(key, value)?;
    if n < 0.0 {
        return Err(invalid(key, format!("must be non-negative, got {n}")));
    }
    Ok(n)
}

fn stride(key: &str, value: &StyleValue) -> Result<usize> {
    let n = number(key, value)?;
    if n < 1.0 || n.fract() != 0.0 {
        return Err(invalid(key, format!("must be a positive integer, got {n}")));
    }
    Ok(n as usize)
}

fn color_value(key: &str, value: &StyleValue) -> Result<Rgba> {
    Rgba::parse(string(key, value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_per_view_wins() {
        let shared = StyleOptions::new().with("color", "k").with("alpha", 0.5);
        let per_view = StyleOptions::new().with("color", "r");

        let merged = merge(&[Some(&shared), Some(&per_view)]);

        let expected = StyleOptions::new().with("color", "r").with("alpha", 0.5);
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_merge_missing_sets() {
        let shared = StyleOptions::new().with("lw", 2);
        assert_eq!(merge(&[Some(&shared), None]), shared);
        assert_eq!(merge(&[None, Some(&shared)]), shared);
        assert!(merge(&[None, None]).is_empty());
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let shared = StyleOptions::new().with("color", "k");
        let per_view = StyleOptions::new().with("color", "r");
        let _ = merge(&[Some(&shared), Some(&per_view)]);
        assert_eq!(shared.get("color"), Some(&StyleValue::from("k")));
    }

    #[test]
    fn test_plot_styles_for_view() {
        let styles = PlotStyles::new()
            .shared(StyleOptions::new().with("color", "k").with("alpha", 0.5))
            .view(ViewId::Yz, StyleOptions::new().with("color", "r"));

        assert_eq!(styles.for_view(ViewId::Yz).get("color"), Some(&StyleValue::from("r")));
        assert_eq!(styles.for_view(ViewId::Xz).get("color"), Some(&StyleValue::from("k")));
        assert_eq!(styles.for_view(ViewId::ThreeD).len(), 2);
    }

    #[test]
    fn test_resolve_known_keys() {
        let options = StyleOptions::new()
            .with("c", "r")
            .with("alpha", 0.25)
            .with("lw", 3)
            .with("marker", "s")
            .with("ls", "--")
            .with("label", "trajectory");

        let style = ResolvedStyle::resolve(&options).unwrap();
        assert_eq!(style.color, Some(Rgba::RED));
        assert!((style.alpha - 0.25).abs() < f32::EPSILON);
        assert!((style.line_width - 3.0).abs() < f32::EPSILON);
        assert_eq!(style.marker, Marker::Square);
        assert_eq!(style.line_style, LineStyle::Dashed);
        assert_eq!(style.label.as_deref(), Some("trajectory"));
    }

    #[test]
    fn test_marker_area_and_size() {
        let by_area = ResolvedStyle::resolve(&StyleOptions::new().with("s", 36)).unwrap();
        let by_size = ResolvedStyle::resolve(&StyleOptions::new().with("ms", 6)).unwrap();
        assert!((by_area.marker_size - 6.0).abs() < 1e-6);
        assert!((by_size.marker_size - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_resolve_unknown_key() {
        let options = StyleOptions::new().with("colour", "r");
        let err = ResolvedStyle::resolve(&options).unwrap_err();
        assert!(matches!(err, Error::InvalidStyle { ref key, .. } if key == "colour"));
    }

    #[test]
    fn test_resolve_wrong_type() {
        let options = StyleOptions::new().with("alpha", "half");
        assert!(matches!(
            ResolvedStyle::resolve(&options),
            Err(Error::InvalidStyle { .. })
        ));
    }

    #[test]
    fn test_resolve_bad_color() {
        let options = StyleOptions::new().with("color", "#12");
        assert!(matches!(
            ResolvedStyle::resolve(&options),
            Err(Error::InvalidColor(_))
        ));
    }

    #[test]
    fn test_fill_prefers_face_color() {
        let style = ResolvedStyle::resolve(
            &StyleOptions::new().with("color", "r").with("facecolor", "b"),
        )
        .unwrap();
        assert_eq!(style.fill(Rgba::BLACK), Rgba::BLUE);
        assert_eq!(style.stroke(Rgba::BLACK), Rgba::RED);
    }

    #[test]
    fn test_point_values_and_colormap() {
        let options = StyleOptions::new()
            .with("c", vec![0.0f32, 0.5, 1.0])
            .with("cmap", "jet")
            .with("zorder", -2.5);
        let style = ResolvedStyle::resolve(&options).unwrap();
        assert_eq!(style.point_values, Some(vec![0.0, 0.5, 1.0]));
        assert_eq!(style.cmap, Colormap::Jet);
        assert_eq!(style.color, None);
        assert!((style.zorder + 2.5).abs() < f32::EPSILON);

        let single = ResolvedStyle::resolve(&StyleOptions::new().with("c", "k")).unwrap();
        assert_eq!(single.color, Some(Rgba::BLACK));
        assert_eq!(single.point_values, None);

        let bad = StyleOptions::new().with("cmap", "plasma-ish");
        assert!(matches!(ResolvedStyle::resolve(&bad), Err(Error::InvalidStyle { .. })));
    }

    #[test]
    fn test_face_colors_and_strides() {
        let options = StyleOptions::new()
            .with("facecolors", vec!["y", "b", "g", "r"])
            .with("rstride", 2)
            .with("cstride", 3);
        let style = ResolvedStyle::resolve(&options).unwrap();
        assert_eq!(style.face_colors.as_ref().map(Vec::len), Some(4));
        assert_eq!(style.face_colors.as_ref().map(|c| c[1]), Some(Rgba::BLUE));
        assert_eq!((style.rstride, style.cstride), (2, 3));

        for bad in [0.0, 1.5, -1.0] {
            let options = StyleOptions::new().with("rstride", bad);
            assert!(matches!(ResolvedStyle::resolve(&options), Err(Error::InvalidStyle { .. })));
        }
        let empty = StyleOptions::new().with("facecolors", Vec::<String>::new());
        assert!(ResolvedStyle::resolve(&empty).is_err());
        let unparseable = StyleOptions::new().with("facecolors", vec!["y", "nope"]);
        assert!(matches!(ResolvedStyle::resolve(&unparseable), Err(Error::InvalidColor(_))));
    }
}
