//! Topology of combinatorial maps.
//!
//! - [`dart`]: the dart handle;
//! - [`orbit`]: orbit kinds and embedding constants;
//! - [`map`]: `Map2`, `Map3`, `GMap2` and `GMap3` over a shared [`map::MapBase`];
//! - [`validation`]: the consistency pass behind every `check()`.

pub mod dart;
pub mod map;
pub mod orbit;
pub mod validation;

mod _debug_invariants;

pub use dart::Dart;
pub use map::gmap2::GMap2;
pub use map::gmap3::GMap3;
pub use map::map2::Map2;
pub use map::map3::Map3;
pub use map::{MapBase, MapConfig, MapTopology, Phi2Map};
pub use orbit::{EMBNULL, Orbit};
pub use validation::CheckReport;
