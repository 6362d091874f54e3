//! The fixed subscription graph linking the four views.
//!
//! Each [`Binding`] says: when `source_dim` of `source` changes, apply
//! `sync_{target_dim}_with_{source_dim}` to `target`. The graph is static
//! and deliberately not symmetric; it is installed once per projection.

use crate::axis::{Axes, Axis, Dim, Subscription};
use crate::error::{Error, Result};
use crate::sync::{sync_fn, sync_name};
use crate::view::ViewId;

/// One edge of the wiring graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    /// View whose limit change triggers the sync.
    pub source: ViewId,
    /// Dimension of `source` being watched.
    pub source_dim: Dim,
    /// View updated by the sync.
    pub target: ViewId,
    /// Dimension of `target` written.
    pub target_dim: Dim,
}

impl Binding {
    const fn new(source: ViewId, source_dim: Dim, target: ViewId, target_dim: Dim) -> Self {
        Self {
            source,
            source_dim,
            target,
            target_dim,
        }
    }

    /// Name of the sync function this edge applies, e.g. `sync_x_with_y`.
    #[must_use]
    pub fn sync_name(&self) -> String {
        sync_name(self.target_dim, self.source_dim)
    }
}

use Dim::{X, Y, Z};
use ViewId::{ThreeD, Xy, Xz, Yz};

/// Edges installed on every projection.
pub const STANDARD_WIRING: [Binding; 18] = [
    Binding::new(Xy, X, Xz, X),
    Binding::new(Xy, X, ThreeD, X),
    Binding::new(Xy, Y, Yz, X),
    Binding::new(Xy, Y, ThreeD, Y),
    Binding::new(Xz, X, Xy, X),
    Binding::new(Xz, X, ThreeD, X),
    Binding::new(Xz, Y, Yz, Y),
    Binding::new(Xz, Y, ThreeD, Z),
    Binding::new(Yz, X, Xy, Y),
    Binding::new(Yz, X, ThreeD, Y),
    Binding::new(Yz, Y, Xz, Y),
    Binding::new(Yz, Y, ThreeD, Z),
    Binding::new(ThreeD, X, Xy, X),
    Binding::new(ThreeD, X, Xz, X),
    Binding::new(ThreeD, Y, Xy, Y),
    Binding::new(ThreeD, Y, Yz, X),
    Binding::new(ThreeD, Z, Xz, Y),
    Binding::new(ThreeD, Z, Yz, Y),
];

/// Inspectable adjacency list of [`Binding`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiringGraph {
    edges: Vec<Binding>,
}

impl Default for WiringGraph {
    fn default() -> Self {
        Self::standard()
    }
}

impl WiringGraph {
    /// The graph every projection uses.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            edges: STANDARD_WIRING.to_vec(),
        }
    }

    /// A graph over arbitrary edges; call [`WiringGraph::validate`] before use.
    #[must_use]
    pub fn from_edges(edges: Vec<Binding>) -> Self {
        Self { edges }
    }

    /// All edges in installation order.
    #[must_use]
    pub fn edges(&self) -> &[Binding] {
        &self.edges
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// `(target, target_dim)` pairs updated when `dim` of `view` changes.
    #[must_use]
    pub fn targets_of(&self, view: ViewId, dim: Dim) -> Vec<(ViewId, Dim)> {
        self.edges
            .iter()
            .filter(|b| b.source == view && b.source_dim == dim)
            .map(|b| (b.target, b.target_dim))
            .collect()
    }

    /// Check every edge against the views' dimensionality.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWiring`] for a view wired to itself and
    /// [`Error::DimensionUnavailable`] for an edge naming a dimension the
    /// view does not own.
    pub fn validate(&self) -> Result<()> {
        for binding in &self.edges {
            if binding.source == binding.target {
                return Err(Error::InvalidWiring(format!(
                    "{} is wired to itself",
                    binding.source
                )));
            }
            for (view, dim) in [
                (binding.source, binding.source_dim),
                (binding.target, binding.target_dim),
            ] {
                if !view.kind().has(dim) {
                    return Err(Error::DimensionUnavailable {
                        axis: view.title().to_string(),
                        dim,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate, then subscribe every edge on its source axis.
    ///
    /// `views` is indexed by [`ViewId::index`].
    ///
    /// # Errors
    ///
    /// Returns validation errors; nothing is installed in that case.
    pub fn install(&self, views: &mut [Axes; 4]) -> Result<()> {
        self.validate()?;
        for binding in &self.edges {
            views[binding.source.index()].subscribe(
                binding.source_dim,
                Subscription {
                    target: binding.target,
                    target_dim: binding.target_dim,
                    handler: sync_fn(binding.target_dim, binding.source_dim),
                },
            )?;
        }
        Ok(())
    }
}
