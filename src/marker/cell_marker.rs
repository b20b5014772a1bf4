//! Cell-granularity markers: one bit per row of an embedded orbit, so all
//! darts of a cell share the mark.

use super::Marker;
use super::pool::{MarkScratch, Sweep};
use crate::map_error::MapError;
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::{EMBNULL, Orbit};

macro_rules! cell_marker {
    ($(#[$doc:meta])* $name:ident, $sweep:expr) => {
        $(#[$doc])*
        pub struct $name<'m, M: MapTopology> {
            map: &'m M,
            orbit: Orbit,
            scratch: MarkScratch<'m>,
        }

        impl<'m, M: MapTopology> $name<'m, M> {
            /// Marker for `orbit` cells on thread 0.
            ///
            /// # Panics
            /// Panics if `orbit` is not embedded.
            pub fn new(map: &'m M, orbit: Orbit) -> Self {
                match Self::with_thread(map, orbit, 0) {
                    Ok(m) => m,
                    Err(e) => panic!("cell marker: {e}"),
                }
            }

            pub fn with_thread(map: &'m M, orbit: Orbit, thread: usize) -> Result<Self, MapError> {
                if orbit == Orbit::Dart || !map.is_orbit_embedded(orbit) {
                    return Err(MapError::OrbitNotEmbedded(orbit));
                }
                map.base().markers().check_thread(thread)?;
                let len = map.base().container(orbit).end() as usize;
                Ok(Self {
                    map,
                    orbit,
                    scratch: MarkScratch::new(map.base().markers(), orbit, thread, len, $sweep),
                })
            }

            /// Row of the cell of `d`; darts built without an embedding have
            /// none and are never marked.
            #[inline]
            fn row(&self, d: Dart) -> Option<u32> {
                let row = self.map.embedding(self.orbit, d);
                (row != EMBNULL).then_some(row)
            }

            /// Marks the cell of `d`.
            #[inline]
            pub fn mark(&mut self, d: Dart) {
                if let Some(row) = self.row(d) {
                    self.scratch.mark(row);
                }
            }

            #[inline]
            pub fn unmark(&mut self, d: Dart) {
                if let Some(row) = self.row(d) {
                    self.scratch.unmark(row);
                }
            }

            #[inline]
            pub fn is_marked(&self, d: Dart) -> bool {
                self.row(d).is_some_and(|row| self.scratch.is_marked(row))
            }

            #[inline]
            pub fn mark_row(&mut self, row: u32) {
                self.scratch.mark(row);
            }

            #[inline]
            pub fn is_row_marked(&self, row: u32) -> bool {
                self.scratch.is_marked(row)
            }

            pub fn unmark_all(&mut self) {
                self.scratch.unmark_all();
            }

            pub fn is_all_unmarked(&self) -> bool {
                self.scratch.is_all_unmarked()
            }

            pub fn orbit(&self) -> Orbit {
                self.orbit
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
                    .field("orbit", &self.orbit)
                    .field("thread", &self.scratch.thread())
                    .finish_non_exhaustive()
            }
        }
    };
}

cell_marker!(
    /// Cell marker that clears its whole buffer when dropped.
    CellMarker,
    Sweep::All
);

cell_marker!(
    /// Cell marker that clears only the rows it marked.
    CellMarkerStore,
    Sweep::Recorded
);

cell_marker!(
    /// Cell marker left to the caller to clean.
    CellMarkerNoUnmark,
    Sweep::None
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::map::Phi2Map;
    use crate::topology::map::map2::Map2;

    #[test]
    fn marks_are_shared_by_the_cell() {
        let mut m = Map2::new();
        let d = m.new_face(4, true);
        m.add_embedding(Orbit::Vertex);
        let mut cm = CellMarker::new(&m, Orbit::Vertex);
        cm.mark(d);
        assert!(cm.is_marked(m.phi1(m.phi2(d))));
        assert!(!cm.is_marked(m.phi1(d)));
        cm.unmark_all();
        assert!(cm.is_all_unmarked());
    }

    #[test]
    fn requires_embedded_orbit() {
        let mut m = Map2::new();
        m.new_face(3, false);
        assert_eq!(
            CellMarkerStore::with_thread(&m, Orbit::Edge, 0).err(),
            Some(MapError::OrbitNotEmbedded(Orbit::Edge))
        );
    }

    #[test]
    fn darts_without_embedding_stay_unmarked() {
        let mut m = Map2::new();
        let d = m.new_face(3, true);
        m.add_embedding(Orbit::Vertex);
        let raw = m.new_dart();
        assert_eq!(m.embedding(Orbit::Vertex, raw), EMBNULL);
        let mut cm = CellMarker::new(&m, Orbit::Vertex);
        cm.mark(raw);
        assert!(!cm.is_marked(raw));
        assert!(cm.is_all_unmarked());
        cm.mark(d);
        cm.unmark(raw);
        assert!(cm.is_marked(d));
    }

    #[test]
    fn no_unmark_marker_is_pooled_only_when_clean() {
        let mut m = Map2::new();
        let d = m.new_face(4, true);
        m.add_embedding(Orbit::Face);
        let pool = m.base().markers();
        let idle = pool.nb_idle();
        {
            let mut cm = CellMarkerNoUnmark::new(&m, Orbit::Face);
            cm.mark(d);
            assert!(cm.is_marked(m.phi1(d)));
            assert!(!cm.is_marked(m.phi2(d)));
            cm.unmark(m.phi1(m.phi1(d)));
            assert!(cm.is_all_unmarked());
        }
        assert_eq!(pool.nb_idle(), idle + 1);
        {
            let mut cm = CellMarkerNoUnmark::new(&m, Orbit::Face);
            cm.mark(d);
        }
        // left dirty: the buffer is dropped, not pooled
        assert_eq!(pool.nb_idle(), idle);
        let cm = CellMarkerNoUnmark::new(&m, Orbit::Face);
        assert!(!cm.is_marked(d));
    }
}
