//! Dart-granularity markers.
//!
//! Three flavours share one implementation and differ only in how their
//! bits are cleaned when dropped:
//! - [`DartMarker`] sweeps the whole buffer;
//! - [`DartMarkerStore`] records what it marked and undoes exactly that;
//! - [`DartMarkerNoUnmark`] trusts the caller to leave it clean.

use super::Marker;
use super::pool::{MarkScratch, Sweep};
use crate::map_error::MapError;
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::Orbit;

macro_rules! dart_marker {
    ($(#[$doc:meta])* $name:ident, $sweep:expr) => {
        $(#[$doc])*
        pub struct $name<'m, M: MapTopology> {
            map: &'m M,
            scratch: MarkScratch<'m>,
        }

        impl<'m, M: MapTopology> $name<'m, M> {
            /// Marker on thread 0, which every map has.
            pub fn new(map: &'m M) -> Self {
                Self::build(map, 0)
            }

            pub fn with_thread(map: &'m M, thread: usize) -> Result<Self, MapError> {
                map.base().markers().check_thread(thread)?;
                Ok(Self::build(map, thread))
            }

            fn build(map: &'m M, thread: usize) -> Self {
                let len = map.base().darts().end() as usize;
                let pool = map.base().markers();
                Self {
                    map,
                    scratch: MarkScratch::new(pool, Orbit::Dart, thread, len, $sweep),
                }
            }

            #[inline]
            pub fn mark(&mut self, d: Dart) {
                self.scratch.mark(d.index());
            }

            #[inline]
            pub fn unmark(&mut self, d: Dart) {
                self.scratch.unmark(d.index());
            }

            #[inline]
            pub fn is_marked(&self, d: Dart) -> bool {
                self.scratch.is_marked(d.index())
            }

            /// Marks every dart of the `orbit` of `d`.
            pub fn mark_orbit(&mut self, orbit: Orbit, d: Dart) {
                let map = self.map;
                map.foreach_dart_of_orbit(orbit, d, |x| self.scratch.mark(x.index()));
            }

            pub fn unmark_orbit(&mut self, orbit: Orbit, d: Dart) {
                let map = self.map;
                map.foreach_dart_of_orbit(orbit, d, |x| self.scratch.unmark(x.index()));
            }

            pub fn unmark_all(&mut self) {
                self.scratch.unmark_all();
            }

            pub fn is_all_unmarked(&self) -> bool {
                self.scratch.is_all_unmarked()
            }

            pub fn thread(&self) -> usize {
                self.scratch.thread()
            }
        }

        impl<M: MapTopology> Marker for $name<'_, M> {
            fn mark(&mut self, d: Dart) {
                $name::mark(self, d);
            }

            fn unmark(&mut self, d: Dart) {
                $name::unmark(self, d);
            }

            fn is_marked(&self, d: Dart) -> bool {
                $name::is_marked(self, d)
            }

            fn unmark_all(&mut self) {
                $name::unmark_all(self);
            }

            fn is_all_unmarked(&self) -> bool {
                $name::is_all_unmarked(self)
            }
        }

        impl<M: MapTopology> std::fmt::Debug for $name<'_, M> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("thread", &self.scratch.thread())
                    .finish_non_exhaustive()
            }
        }
    };
}

dart_marker!(
    /// Dart marker that clears its whole buffer when dropped.
    DartMarker,
    Sweep::All
);

dart_marker!(
    /// Dart marker that remembers what it marked and clears only that, for
    /// short traversals over large maps.
    DartMarkerStore,
    Sweep::Recorded
);

dart_marker!(
    /// Dart marker that does not clean up. The caller unmarks everything it
    /// marked; a dirty buffer is dropped instead of being pooled.
    DartMarkerNoUnmark,
    Sweep::None
);
