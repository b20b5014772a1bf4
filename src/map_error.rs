//! MapError: unified error type for the combinatorial-map kernel.
//!
//! Expected failures (name clashes, stale handlers, lookups by name) are
//! reported through this type. Contract violations such as sewing a dart that
//! is not a fixed point stay assertions.

use thiserror::Error;

use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;

/// A single inconsistency found by a map `check()`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyDefect {
    /// `rel(rel(d)) != d` for an involution.
    #[error("{relation} is not an involution at dart {dart}")]
    NotAnInvolution { relation: &'static str, dart: Dart },
    /// `phi_1(phi1(d)) != d`.
    #[error("phi_1(phi1({dart})) != {dart}")]
    BrokenInverse { dart: Dart },
    /// A relation points to a dart that is not alive.
    #[error("{relation}({dart}) = {target} is not a live dart")]
    DanglingLink { relation: &'static str, dart: Dart, target: Dart },
    /// Two darts of the same orbit carry different embeddings.
    #[error("{orbit:?} embedding of dart {dart} is {found}, orbit uses {expected}")]
    EmbeddingMismatch { orbit: Orbit, dart: Dart, expected: u32, found: u32 },
    /// A dart of an embedded orbit has no embedding.
    #[error("dart {dart} has no {orbit:?} embedding")]
    MissingEmbedding { orbit: Orbit, dart: Dart },
    /// The reference count of a row does not match the number of darts using it.
    #[error("{orbit:?} row {row} has {found} references, {expected} darts use it")]
    RefCountMismatch { orbit: Orbit, row: u32, expected: u32, found: u32 },
    /// Two distinct orbits share one embedding row.
    #[error("{orbit:?} row {row} is shared by distinct orbits")]
    SharedEmbedding { orbit: Orbit, row: u32 },
    /// A boundary-marked dart is sewn to another boundary-marked dart.
    #[error("boundary dart {dart} is sewn to another boundary dart")]
    BoundaryAdjacent { dart: Dart },
    /// A closing cell has darts without the boundary mark.
    #[error("dart {dart} lies in a boundary {orbit:?} but is not marked")]
    MixedBoundary { orbit: Orbit, dart: Dart },
    /// `beta_i o beta_j` (|i - j| >= 2) is not an involution.
    #[error("{relations} is not an involution at dart {dart}")]
    NotAGeneralizedMap { relations: &'static str, dart: Dart },
    /// Faces sewn by `phi3` do not run in opposite directions.
    #[error("phi3(phi1({dart})) != phi_1(phi3({dart}))")]
    MisalignedFaces { dart: Dart },
}

/// Unified error type for kernel operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MapError {
    /// An attribute with this name already exists in the container.
    #[error("attribute `{name}` already exists for orbit {orbit:?}")]
    DuplicateAttribute { name: String, orbit: Orbit },
    /// No attribute with this name exists in the container.
    #[error("no attribute named `{name}` for orbit {orbit:?}")]
    UnknownAttribute { name: String, orbit: Orbit },
    /// The stored column type differs from the requested one.
    #[error("attribute `{name}` stores `{stored}`, requested `{requested}`")]
    AttributeTypeMismatch {
        name: String,
        stored: &'static str,
        requested: &'static str,
    },
    /// The attribute slot was removed or reused since the handler was created.
    #[error("attribute handler for slot {index} is no longer valid")]
    InvalidHandler { index: usize },
    /// A row was accessed that is not in use.
    #[error("row {0} is not in use")]
    UnusedRow(u32),
    /// The orbit carries no embedding.
    #[error("orbit {0:?} is not embedded")]
    OrbitNotEmbedded(Orbit),
    /// A marker was requested for a thread the pool was not sized for.
    #[error("thread index {thread} out of range (map has {threads} marker threads)")]
    ThreadOutOfRange { thread: usize, threads: usize },
    /// Row bookkeeping is inconsistent.
    #[error("container inconsistency: {0}")]
    ContainerCorrupted(String),
    /// A topological defect found by an invariant check.
    #[error("topology inconsistency: {0}")]
    Inconsistent(TopologyDefect),
}

impl From<TopologyDefect> for MapError {
    fn from(d: TopologyDefect) -> Self {
        MapError::Inconsistent(d)
    }
}
