//! Axis abstraction: per-dimension limits with change notification.
//!
//! An [`Axis`] exposes four capabilities: read a limit, write a limit
//! silently, write a limit and notify, and subscribe a handler to a limit
//! change. Notification is returned to the caller as a [`LimitChanged`]
//! value listing the subscriptions to run; the owning projection dispatches
//! them. Handlers only ever use the silent write, so propagation stops
//! after one hop.

use crate::artist::{Artist, Primitive};
use crate::color::{Rgba, COLOR_CYCLE};
use crate::error::{Error, Result};
use crate::style::{ResolvedStyle, StyleOptions};
use crate::sync::SyncFn;
use crate::view::ViewId;
use std::fmt;
use tracing::trace;

/// Fraction of the data span added on each side when autoscaling.
pub const AUTOSCALE_MARGIN: f32 = 0.05;

/// Axis-local dimension.
///
/// Planar axes own `X` (horizontal) and `Y` (vertical); the volumetric axis
/// owns all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dim {
    /// First dimension.
    X,
    /// Second dimension.
    Y,
    /// Third dimension (volumetric axes only).
    Z,
}

impl Dim {
    /// All dimensions in order.
    pub const ALL: [Dim; 3] = [Dim::X, Dim::Y, Dim::Z];

    /// Position in [`Dim::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Dim::X => 0,
            Dim::Y => 1,
            Dim::Z => 2,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dim::X => "x",
            Dim::Y => "y",
            Dim::Z => "z",
        };
        f.write_str(name)
    }
}

/// A visible range `(low, high)` along one dimension.
///
/// `low > high` means the dimension is displayed inverted. Zero-width
/// ranges are valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limits {
    /// First bound in stored order.
    pub low: f32,
    /// Second bound in stored order.
    pub high: f32,
}

impl Default for Limits {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl From<(f32, f32)> for Limits {
    fn from((low, high): (f32, f32)) -> Self {
        Self::new(low, high)
    }
}

impl Limits {
    /// Create a range in stored order.
    #[must_use]
    pub const fn new(low: f32, high: f32) -> Self {
        Self { low, high }
    }

    /// True when stored as `low > high`.
    #[must_use]
    pub fn is_inverted(self) -> bool {
        self.low > self.high
    }

    /// True when neither bound is NaN or infinite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.low.is_finite() && self.high.is_finite()
    }

    /// The same range with its bounds swapped.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self::new(self.high, self.low)
    }

    /// Smaller bound.
    #[must_use]
    pub fn min(self) -> f32 {
        self.low.min(self.high)
    }

    /// Larger bound.
    #[must_use]
    pub fn max(self) -> f32 {
        self.low.max(self.high)
    }

    /// Absolute width.
    #[must_use]
    pub fn span(self) -> f32 {
        self.max() - self.min()
    }

    /// The same interval stored with the requested orientation.
    #[must_use]
    pub fn oriented(self, inverted: bool) -> Self {
        let ascending = Self::new(self.min(), self.max());
        if inverted {
            ascending.reversed()
        } else {
            ascending
        }
    }

    /// Smallest ascending interval covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self::new(self.min().min(other.min()), self.max().max(other.max()))
    }

    /// Widen a zero-width interval so it can be displayed.
    ///
    /// `(v, v)` becomes `(v - 0.05|v|, v + 0.05|v|)`, and `(0, 0)` becomes
    /// `(-0.05, 0.05)`. Non-degenerate intervals are returned unchanged.
    #[must_use]
    pub fn nonsingular(self) -> Self {
        if self.span() > f32::EPSILON * self.min().abs().max(self.max().abs()) {
            return self;
        }
        let v = self.min();
        if v == 0.0 {
            Self::new(-AUTOSCALE_MARGIN, AUTOSCALE_MARGIN)
        } else {
            let pad = AUTOSCALE_MARGIN * v.abs();
            Self::new(v - pad, v + pad)
        }
    }

    /// Grow by `fraction` of the span on each side, keeping orientation.
    #[must_use]
    pub fn expanded(self, fraction: f32) -> Self {
        let pad = self.span() * fraction;
        Self::new(self.min() - pad, self.max() + pad).oriented(self.is_inverted())
    }
}

/// Whether an axis is a 2D projection or the 3D view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisKind {
    /// Two dimensions: `X` and `Y`.
    Planar,
    /// Three dimensions: `X`, `Y` and `Z`.
    Volumetric,
}

impl AxisKind {
    /// Dimensions owned by this kind of axis.
    #[must_use]
    pub fn dims(self) -> &'static [Dim] {
        match self {
            AxisKind::Planar => &Dim::ALL[..2],
            AxisKind::Volumetric => &Dim::ALL,
        }
    }

    /// True if `dim` is one of [`AxisKind::dims`].
    #[must_use]
    pub fn has(self, dim: Dim) -> bool {
        self.dims().contains(&dim)
    }
}

/// A handler registered on one dimension of a source axis.
///
/// When the source dimension changes, `handler` is applied to
/// `target`'s `target_dim`.
#[derive(Clone, Copy)]
pub struct Subscription {
    /// Axis to update.
    pub target: ViewId,
    /// Dimension of the target to update.
    pub target_dim: Dim,
    /// Sync function applied as `handler(target, source)`.
    pub handler: SyncFn,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("target", &self.target)
            .field("target_dim", &self.target_dim)
            .finish_non_exhaustive()
    }
}

/// Notification produced by a notifying limit set.
#[derive(Debug, Clone)]
pub struct LimitChanged {
    /// Dimension that changed on the emitting axis.
    pub dim: Dim,
    /// New limits of that dimension.
    pub limits: Limits,
    /// Subscriptions registered for `dim`, in registration order.
    pub subscribers: Vec<Subscription>,
}

/// Capability interface of a plotting axis.
pub trait Axis {
    /// 2D or 3D.
    fn kind(&self) -> AxisKind;

    /// Human-readable name (the panel title).
    fn title(&self) -> &str;

    /// Current limits of `dim`.
    fn lim(&self, dim: Dim) -> Result<Limits>;

    /// Set limits of `dim` without notifying subscribers.
    fn set_lim_silent(&mut self, dim: Dim, limits: Limits) -> Result<()>;

    /// Set limits of `dim` and return the notification for its subscribers.
    fn set_lim(&mut self, dim: Dim, limits: Limits) -> Result<LimitChanged>;

    /// Register a handler for changes of `dim`.
    fn subscribe(&mut self, dim: Dim, subscription: Subscription) -> Result<()>;
}

/// Per-dimension subscription lists.
#[derive(Debug, Clone, Default)]
struct CallbackRegistry {
    by_dim: [Vec<Subscription>; 3],
}

impl CallbackRegistry {
    fn connect(&mut self, dim: Dim, subscription: Subscription) {
        self.by_dim[dim.index()].push(subscription);
    }

    fn subscribers(&self, dim: Dim) -> &[Subscription] {
        &self.by_dim[dim.index()]
    }
}

/// Concrete axis owned by a projection view.
#[derive(Debug, Clone)]
pub struct Axes {
    title: String,
    kind: AxisKind,
    limits: [Limits; 3],
    autoscale: [bool; 3],
    labels: [Option<String>; 3],
    artists: Vec<Artist>,
    callbacks: CallbackRegistry,
    cycle_position: usize,
    emitted: usize,
    silent_sets: [usize; 3],
}

impl Axes {
    /// Create an axis with default `(0, 1)` limits and autoscaling enabled.
    #[must_use]
    pub fn new(title: impl Into<String>, kind: AxisKind) -> Self {
        Self {
            title: title.into(),
            kind,
            limits: [Limits::default(); 3],
            autoscale: [true; 3],
            labels: [None, None, None],
            artists: Vec::new(),
            callbacks: CallbackRegistry::default(),
            cycle_position: 0,
            emitted: 0,
            silent_sets: [0; 3],
        }
    }

    /// Set the label of `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionUnavailable`] if the axis lacks `dim`.
    pub fn set_label(&mut self, dim: Dim, label: impl Into<String>) -> Result<()> {
        self.check(dim)?;
        self.labels[dim.index()] = Some(label.into());
        Ok(())
    }

    /// Label of `dim`, if set.
    #[must_use]
    pub fn label(&self, dim: Dim) -> Option<&str> {
        self.labels[dim.index()].as_deref()
    }

    /// Whether `dim` follows the data extents.
    #[must_use]
    pub fn autoscale(&self, dim: Dim) -> bool {
        self.autoscale[dim.index()]
    }

    /// Enable or disable autoscaling of `dim`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionUnavailable`] if the axis lacks `dim`.
    pub fn set_autoscale(&mut self, dim: Dim, enabled: bool) -> Result<()> {
        self.check(dim)?;
        self.autoscale[dim.index()] = enabled;
        Ok(())
    }

    /// Artists drawn on this axis, in insertion order.
    #[must_use]
    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Subscriptions registered for `dim`.
    #[must_use]
    pub fn subscriptions(&self, dim: Dim) -> &[Subscription] {
        self.callbacks.subscribers(dim)
    }

    /// Number of notifying sets performed so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Number of silent sets performed on `dim` so far.
    #[must_use]
    pub fn silent_sets(&self, dim: Dim) -> usize {
        self.silent_sets[dim.index()]
    }

    /// Union of the artists' data extents along `dim`.
    #[must_use]
    pub fn data_extent(&self, dim: Dim) -> Option<Limits> {
        self.artists
            .iter()
            .filter_map(|artist| artist.extent(dim))
            .reduce(Limits::union)
    }

    /// Validate the style, add the artist and autoscale.
    ///
    /// Returns one notification per autoscaled dimension.
    ///
    /// # Errors
    ///
    /// Returns style errors from [`ResolvedStyle::resolve`] and
    /// [`Error::PrimitiveMismatch`] if the primitive's dimensionality does
    /// not match the axis.
    pub fn add_artist(
        &mut self,
        primitive: Primitive,
        options: &StyleOptions,
    ) -> Result<Vec<LimitChanged>> {
        if primitive.kind() != self.kind {
            return Err(Error::PrimitiveMismatch {
                axis: self.title.clone(),
                primitive: primitive.name(),
            });
        }
        let style = ResolvedStyle::resolve(options)?;
        let color = match style.color {
            Some(color) => color,
            None => self.next_cycle_color(),
        };
        self.artists.push(Artist::new(primitive, style, color));
        self.autoscale_view()
    }

    /// Refit every autoscaled dimension to the data, notifying subscribers.
    ///
    /// The current orientation of each dimension is kept.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Axis::set_lim`].
    pub fn autoscale_view(&mut self) -> Result<Vec<LimitChanged>> {
        let mut events = Vec::new();
        for &dim in self.kind.dims() {
            if !self.autoscale(dim) {
                continue;
            }
            let Some(extent) = self.data_extent(dim) else {
                continue;
            };
            let inverted = self.limits[dim.index()].is_inverted();
            let target = extent.nonsingular().expanded(AUTOSCALE_MARGIN).oriented(inverted);
            events.push(self.set_lim(dim, target)?);
        }
        Ok(events)
    }

    fn next_cycle_color(&mut self) -> Rgba {
        let color = COLOR_CYCLE[self.cycle_position % COLOR_CYCLE.len()];
        self.cycle_position += 1;
        color
    }

    fn check_limits(&self, dim: Dim, limits: Limits) -> Result<()> {
        self.check(dim)?;
        if limits.is_finite() {
            Ok(())
        } else {
            Err(Error::InvalidLimits {
                low: limits.low,
                high: limits.high,
            })
        }
    }

    fn check(&self, dim: Dim) -> Result<()> {
        if self.kind.has(dim) {
            Ok(())
        } else {
            Err(Error::DimensionUnavailable {
                axis: self.title.clone(),
                dim,
            })
        }
    }
}

impl Axis for Axes {
    fn kind(&self) -> AxisKind {
        self.kind
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn lim(&self, dim: Dim) -> Result<Limits> {
        self.check(dim)?;
        Ok(self.limits[dim.index()])
    }

    fn set_lim_silent(&mut self, dim: Dim, limits: Limits) -> Result<()> {
        self.check_limits(dim, limits)?;
        trace!(axis = %self.title, %dim, low = limits.low, high = limits.high, "silent set");
        self.limits[dim.index()] = limits;
        self.silent_sets[dim.index()] += 1;
        Ok(())
    }

    fn set_lim(&mut self, dim: Dim, limits: Limits) -> Result<LimitChanged> {
        self.check_limits(dim, limits)?;
        self.limits[dim.index()] = limits;
        self.emitted += 1;
        Ok(LimitChanged {
            dim,
            limits,
            subscribers: self.callbacks.subscribers(dim).to_vec(),
        })
    }

    fn subscribe(&mut self, dim: Dim, subscription: Subscription) -> Result<()> {
        self.check(dim)?;
        self.callbacks.connect(dim, subscription);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::sync::sync_x_with_x;

    fn planar() -> Axes {
        Axes::new("planar", AxisKind::Planar)
    }

    #[test]
    fn test_limits_orientation() {
        assert!(Limits::new(5.0, 1.0).is_inverted());
        assert!(!Limits::new(1.0, 5.0).is_inverted());
        assert!(!Limits::new(5.0, 5.0).is_inverted());
        assert_eq!(Limits::new(1.0, 5.0).reversed(), Limits::new(5.0, 1.0));
        assert_eq!(Limits::new(1.0, 5.0).oriented(true), Limits::new(5.0, 1.0));
        assert_eq!(Limits::new(5.0, 1.0).oriented(false), Limits::new(1.0, 5.0));
    }

    #[test]
    fn test_limits_nonsingular() {
        assert_eq!(Limits::new(0.0, 0.0).nonsingular(), Limits::new(-0.05, 0.05));
        let widened = Limits::new(10.0, 10.0).nonsingular();
        assert!((widened.low - 9.5).abs() < 1e-5);
        assert!((widened.high - 10.5).abs() < 1e-5);
        assert_eq!(Limits::new(1.0, 2.0).nonsingular(), Limits::new(1.0, 2.0));
    }

    #[test]
    fn test_limits_expanded_keeps_orientation() {
        let grown = Limits::new(10.0, 0.0).expanded(0.1);
        assert!(grown.is_inverted());
        assert!((grown.low - 11.0).abs() < 1e-5);
        assert!((grown.high + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_planar_axis_has_no_z() {
        let mut axes = planar();
        assert!(matches!(
            axes.lim(Dim::Z),
            Err(Error::DimensionUnavailable { dim: Dim::Z, .. })
        ));
        assert!(axes.set_lim_silent(Dim::Z, Limits::default()).is_err());
        assert!(axes.set_label(Dim::Z, "z").is_err());
    }

    #[test]
    fn test_non_finite_limits_rejected() {
        let mut axes = planar();
        let before = axes.lim(Dim::X).unwrap();
        for bad in [
            Limits::new(f32::NAN, 1.0),
            Limits::new(0.0, f32::INFINITY),
            Limits::new(f32::NEG_INFINITY, f32::NAN),
        ] {
            assert!(matches!(
                axes.set_lim(Dim::X, bad),
                Err(Error::InvalidLimits { .. })
            ));
            assert!(matches!(
                axes.set_lim_silent(Dim::X, bad),
                Err(Error::InvalidLimits { .. })
            ));
        }
        assert_eq!(axes.lim(Dim::X).unwrap(), before);
        assert_eq!(axes.emitted(), 0);
        assert_eq!(axes.silent_sets(Dim::X), 0);
    }

    #[test]
    fn test_silent_set_does_not_emit() {
        let mut axes = planar();
        axes.set_lim_silent(Dim::X, Limits::new(2.0, 3.0)).unwrap();
        assert_eq!(axes.lim(Dim::X).unwrap(), Limits::new(2.0, 3.0));
        assert_eq!(axes.emitted(), 0);
        assert_eq!(axes.silent_sets(Dim::X), 1);
    }

    #[test]
    fn test_set_lim_returns_subscribers() {
        let mut axes = planar();
        let subscription = Subscription {
            target: ViewId::Xy,
            target_dim: Dim::X,
            handler: sync_x_with_x,
        };
        axes.subscribe(Dim::X, subscription).unwrap();

        let event = axes.set_lim(Dim::X, Limits::new(-1.0, 1.0)).unwrap();
        assert_eq!(event.dim, Dim::X);
        assert_eq!(event.subscribers.len(), 1);
        assert_eq!(event.subscribers[0].target, ViewId::Xy);
        assert_eq!(axes.emitted(), 1);

        let other = axes.set_lim(Dim::Y, Limits::new(-1.0, 1.0)).unwrap();
        assert!(other.subscribers.is_empty());
    }

    #[test]
    fn test_add_artist_autoscales_with_margin() {
        let mut axes = planar();
        let line = Primitive::Line(vec![Point::new(0.0, 10.0), Point::new(10.0, 20.0)]);
        let events = axes.add_artist(line, &StyleOptions::new()).unwrap();

        assert_eq!(events.len(), 2);
        let x = axes.lim(Dim::X).unwrap();
        assert!((x.low + 0.5).abs() < 1e-5);
        assert!((x.high - 10.5).abs() < 1e-5);
    }

    #[test]
    fn test_autoscale_preserves_inversion() {
        let mut axes = planar();
        axes.set_lim_silent(Dim::X, Limits::new(1.0, 0.0)).unwrap();
        let markers = Primitive::Markers(vec![Point::new(2.0, 0.0), Point::new(4.0, 1.0)]);
        axes.add_artist(markers, &StyleOptions::new()).unwrap();

        assert!(axes.lim(Dim::X).unwrap().is_inverted());
    }

    #[test]
    fn test_autoscale_disabled_dimension_untouched() {
        let mut axes = planar();
        axes.set_autoscale(Dim::Y, false).unwrap();
        let line = Primitive::Line(vec![Point::new(0.0, 10.0), Point::new(10.0, 20.0)]);
        let events = axes.add_artist(line, &StyleOptions::new()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(axes.lim(Dim::Y).unwrap(), Limits::default());
    }

    #[test]
    fn test_color_cycle_advances_only_without_color() {
        let mut axes = planar();
        let line = || Primitive::Line(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        axes.add_artist(line(), &StyleOptions::new()).unwrap();
        axes.add_artist(line(), &StyleOptions::new().with("color", "k")).unwrap();
        axes.add_artist(line(), &StyleOptions::new()).unwrap();

        let colors: Vec<Rgba> = axes.artists().iter().map(Artist::color).collect();
        assert_eq!(colors, vec![COLOR_CYCLE[0], Rgba::BLACK, COLOR_CYCLE[1]]);
    }

    #[test]
    fn test_mismatched_primitive_rejected() {
        let mut axes = planar();
        let line3 = Primitive::Line3(vec![crate::geometry::Point3::new(0.0, 0.0, 0.0)]);
        assert!(matches!(
            axes.add_artist(line3, &StyleOptions::new()),
            Err(Error::PrimitiveMismatch { .. })
        ));
        assert!(axes.artists().is_empty());
    }

    #[test]
    fn test_invalid_style_adds_nothing() {
        let mut axes = planar();
        let line = Primitive::Line(vec![Point::new(0.0, 0.0)]);
        assert!(axes.add_artist(line, &StyleOptions::new().with("bogus", 1)).is_err());
        assert!(axes.artists().is_empty());
        assert_eq!(axes.emitted(), 0);
    }
}
