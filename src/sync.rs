//! Limit-sync functions.
//!
//! `sync_S_with_T(this, other)` makes dimension `S` of `this` track
//! dimension `T` of `other`: it copies `other`'s `T` limits into `this`'s
//! `S` limits, reversed if the two axes currently disagree on orientation.
//! The write is always silent, so a sync never triggers further syncs.

use crate::axis::{Axis, Dim, Limits};
use crate::error::Result;

/// Signature shared by every sync function: `handler(this, other)`.
pub type SyncFn = fn(&mut dyn Axis, &dyn Axis) -> Result<Limits>;

/// Make `this_dim` of `this` track `other_dim` of `other`.
///
/// Returns the limits written to `this`.
///
/// # Errors
///
/// Returns [`crate::Error::DimensionUnavailable`] if either axis lacks the
/// requested dimension.
pub fn sync_limits(
    this: &mut dyn Axis,
    this_dim: Dim,
    other: &dyn Axis,
    other_dim: Dim,
) -> Result<Limits> {
    let source = other.lim(other_dim)?;
    let own = this.lim(this_dim)?;

    let limits = if source.is_inverted() == own.is_inverted() {
        source
    } else {
        source.reversed()
    };

    this.set_lim_silent(this_dim, limits)?;
    Ok(limits)
}

/// `this.x` tracks `other.x`.
pub fn sync_x_with_x(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::X, other, Dim::X)
}

/// `this.x` tracks `other.y`.
pub fn sync_x_with_y(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::X, other, Dim::Y)
}

/// `this.x` tracks `other.z`.
pub fn sync_x_with_z(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::X, other, Dim::Z)
}

/// `this.y` tracks `other.x`.
pub fn sync_y_with_x(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Y, other, Dim::X)
}

/// `this.y` tracks `other.y`.
pub fn sync_y_with_y(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Y, other, Dim::Y)
}

/// `this.y` tracks `other.z`.
pub fn sync_y_with_z(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Y, other, Dim::Z)
}

/// `this.z` tracks `other.x`.
pub fn sync_z_with_x(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Z, other, Dim::X)
}

/// `this.z` tracks `other.y`.
pub fn sync_z_with_y(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Z, other, Dim::Y)
}

/// `this.z` tracks `other.z`.
pub fn sync_z_with_z(this: &mut dyn Axis, other: &dyn Axis) -> Result<Limits> {
    sync_limits(this, Dim::Z, other, Dim::Z)
}

/// The named sync function for `(this_dim, other_dim)`.
#[must_use]
pub fn sync_fn(this_dim: Dim, other_dim: Dim) -> SyncFn {
    match (this_dim, other_dim) {
        (Dim::X, Dim::X) => sync_x_with_x,
        (Dim::X, Dim::Y) => sync_x_with_y,
        (Dim::X, Dim::Z) => sync_x_with_z,
        (Dim::Y, Dim::X) => sync_y_with_x,
        (Dim::Y, Dim::Y) => sync_y_with_y,
        (Dim::Y, Dim::Z) => sync_y_with_z,
        (Dim::Z, Dim::X) => sync_z_with_x,
        (Dim::Z, Dim::Y) => sync_z_with_y,
        (Dim::Z, Dim::Z) => sync_z_with_z,
    }
}

/// Name of the sync function for `(this_dim, other_dim)`, e.g. `sync_x_with_y`.
#[must_use]
pub fn sync_name(this_dim: Dim, other_dim: Dim) -> String {
    format!("sync_{this_dim}_with_{other_dim}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::{Axes, AxisKind};
    use proptest::prelude::*;

    fn volumetric() -> Axes {
        Axes::new("3d", AxisKind::Volumetric)
    }

    #[test]
    fn test_copies_when_orientations_agree() {
        let mut this = volumetric();
        let mut other = volumetric();
        other.set_lim_silent(Dim::Y, Limits::new(-3.0, 7.0)).unwrap();

        let written = sync_z_with_y(&mut this, &other).unwrap();

        assert_eq!(written, Limits::new(-3.0, 7.0));
        assert_eq!(this.lim(Dim::Z).unwrap(), Limits::new(-3.0, 7.0));
    }

    #[test]
    fn test_reverses_when_orientations_differ() {
        let mut this = volumetric();
        this.set_lim_silent(Dim::X, Limits::new(1.0, 0.0)).unwrap();
        let mut other = volumetric();
        other.set_lim_silent(Dim::X, Limits::new(-3.0, 7.0)).unwrap();

        sync_x_with_x(&mut this, &other).unwrap();

        assert_eq!(this.lim(Dim::X).unwrap(), Limits::new(7.0, -3.0));
    }

    #[test]
    fn test_inverted_source_into_normal_target() {
        let mut this = volumetric();
        let mut other = volumetric();
        other.set_lim_silent(Dim::X, Limits::new(9.0, 2.0)).unwrap();

        sync_y_with_x(&mut this, &other).unwrap();

        assert_eq!(this.lim(Dim::Y).unwrap(), Limits::new(2.0, 9.0));
    }

    #[test]
    fn test_zero_width_is_copied_verbatim() {
        let mut this = volumetric();
        this.set_lim_silent(Dim::Y, Limits::new(1.0, 0.0)).unwrap();
        let mut other = volumetric();
        other.set_lim_silent(Dim::Z, Limits::new(5.0, 5.0)).unwrap();

        sync_y_with_z(&mut this, &other).unwrap();

        assert_eq!(this.lim(Dim::Y).unwrap(), Limits::new(5.0, 5.0));
    }

    #[test]
    fn test_sync_is_silent() {
        let mut this = volumetric();
        let other = volumetric();
        sync_x_with_z(&mut this, &other).unwrap();
        assert_eq!(this.emitted(), 0);
        assert_eq!(this.silent_sets(Dim::X), 1);
    }

    #[test]
    fn test_missing_dimension_is_an_error() {
        let mut planar = Axes::new("planar", AxisKind::Planar);
        let other = volumetric();
        assert!(sync_z_with_z(&mut planar, &other).is_err());
        assert_eq!(planar.silent_sets(Dim::X), 0);
    }

    #[test]
    fn test_sync_fn_table_matches_names() {
        for this_dim in Dim::ALL {
            for other_dim in Dim::ALL {
                let mut this = volumetric();
                let mut other = volumetric();
                other.set_lim_silent(other_dim, Limits::new(4.0, 8.0)).unwrap();

                sync_fn(this_dim, other_dim)(&mut this, &other).unwrap();

                assert_eq!(
                    this.lim(this_dim).unwrap(),
                    Limits::new(4.0, 8.0),
                    "{}",
                    sync_name(this_dim, other_dim)
                );
            }
        }
        assert_eq!(sync_name(Dim::X, Dim::Y), "sync_x_with_y");
    }

    proptest! {
        #[test]
        fn prop_target_matches_source_interval(
            low in -1e6f32..1e6,
            high in -1e6f32..1e6,
            target_inverted in any::<bool>(),
        ) {
            let mut this = volumetric();
            this.set_lim_silent(Dim::X, Limits::new(0.0, 1.0).oriented(target_inverted)).unwrap();
            let mut other = volumetric();
            other.set_lim_silent(Dim::Y, Limits::new(low, high)).unwrap();

            let written = sync_x_with_y(&mut this, &other).unwrap();

            prop_assert_eq!(written.min(), low.min(high));
            prop_assert_eq!(written.max(), low.max(high));
            if low != high {
                prop_assert_eq!(written.is_inverted(), target_inverted);
            }
        }
    }
}
