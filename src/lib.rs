#![cfg_attr(docsrs, feature(doc_cfg))]
//! # cgogn-kernel
//!
//! Topological kernel for combinatorial maps: darts linked by `phi`
//! permutations (oriented maps) or `beta` involutions (generalized maps),
//! with per-cell attributes stored in block-chunked columns.
//!
//! ## Layers
//! - [`data`]: [`AttributeContainer`](data::AttributeContainer) rows with
//!   reference counts, typed [`AttributeMultiVector`](data::AttributeMultiVector)
//!   columns and [`AttributeHandler`](data::AttributeHandler)s;
//! - [`topology`]: [`Map2`](topology::Map2), [`Map3`](topology::Map3),
//!   [`GMap2`](topology::GMap2) and [`GMap3`](topology::GMap3), their orbits,
//!   embeddings and `check()`;
//! - [`marker`]: dart and cell markers drawn from a per-map pool;
//! - [`algs`]: whole-map, incident and adjacent cell traversors.
//!
//! ## Invariant checks
//! Cheap checks run in debug builds. The `check-invariants` feature adds a
//! full embedding verification after each repair; `strict-invariants` keeps
//! the cheap checks on in release builds.
//!
//! ## Logging
//! Topology edits and `check()` report through the [`log`] facade; install
//! any logger to see them.

pub mod algs;
pub mod data;
pub mod debug_invariants;
pub mod map_error;
pub mod marker;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use map_error::{MapError, TopologyDefect};

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::{
        CellTraversal, Selector, Traversor, Traversor2, Traversor2Adjacent, Traversor3XXaY,
        Traversor3XY, TraversorCell, TraversorDartsOfOrbit, foreach_cell, nb_cells,
    };
    pub use crate::data::{
        AttributeContainer, AttributeHandler, AttributeValue, DartAttribute, EdgeAttribute,
        FaceAttribute, VertexAttribute, VolumeAttribute,
    };
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::map_error::{MapError, TopologyDefect};
    pub use crate::marker::{
        CellMarker, CellMarkerNoUnmark, CellMarkerStore, DartMarker, DartMarkerNoUnmark,
        DartMarkerStore, Marker, MarkerForTraversor,
    };
    pub use crate::topology::{
        CheckReport, Dart, GMap2, GMap3, Map2, Map3, MapConfig, MapTopology, Orbit, Phi2Map,
    };
}
