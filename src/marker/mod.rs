//! Markers: scoped tag spaces borrowed from the [`MarkerPool`] of a map.
//!
//! A marker takes a clear bit buffer sized to the dart or cell container
//! when it is created and gives it back when dropped. Markers borrow the map
//! immutably, so the map cannot grow while one is alive. Nested traversals
//! each hold their own buffer.

pub mod bits;
pub mod cell_marker;
pub mod dart_marker;
pub mod pool;
pub mod traversor_marker;

use crate::topology::dart::Dart;

pub use cell_marker::{CellMarker, CellMarkerNoUnmark, CellMarkerStore};
pub use dart_marker::{DartMarker, DartMarkerNoUnmark, DartMarkerStore};
pub use pool::MarkerPool;
pub use traversor_marker::MarkerForTraversor;

/// Common interface of dart and cell markers.
pub trait Marker {
    fn mark(&mut self, d: Dart);
    fn unmark(&mut self, d: Dart);
    fn is_marked(&self, d: Dart) -> bool;
    fn unmark_all(&mut self);
    fn is_all_unmarked(&self) -> bool;
}
