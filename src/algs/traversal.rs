//! Whole-map and single-orbit traversals.
//!
//! [`TraversorCell`] walks the darts of the map in index order and yields one
//! dart per cell, skipping darts of closing cells and darts the selector
//! rejects. [`CellTraversal`] configures one with the builder pattern.

use super::selector::{AllDarts, Selector};
use super::traversal_core::{DartList, Traversor};
use crate::map_error::MapError;
use crate::marker::{Marker, MarkerForTraversor};
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::Orbit;

/// Darts of one orbit, collected when the traversor is built.
#[derive(Debug, Clone)]
pub struct TraversorDartsOfOrbit {
    list: DartList,
}

impl TraversorDartsOfOrbit {
    pub fn new<M: MapTopology>(map: &M, orbit: Orbit, d: Dart) -> Self {
        Self {
            list: DartList::new(map.orbit_darts(orbit, d).into_vec()),
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.len() == 0
    }

    pub fn darts(&self) -> &[Dart] {
        self.list.as_slice()
    }
}

impl Traversor for TraversorDartsOfOrbit {
    fn begin(&mut self) -> Dart {
        self.list.begin()
    }

    fn next(&mut self) -> Dart {
        self.list.next()
    }
}

/// One dart per `orbit` cell of the whole map.
pub struct TraversorCell<'m, M: MapTopology, S: Selector = AllDarts> {
    map: &'m M,
    selector: S,
    marker: MarkerForTraversor<'m, M>,
    current: Dart,
}

impl<'m, M: MapTopology> TraversorCell<'m, M> {
    pub fn new(map: &'m M, orbit: Orbit) -> Self {
        Self::with_selector(map, orbit, AllDarts)
    }
}

impl<'m, M: MapTopology, S: Selector> TraversorCell<'m, M, S> {
    pub fn with_selector(map: &'m M, orbit: Orbit, selector: S) -> Self {
        Self::with_marker(map, selector, MarkerForTraversor::new(map, orbit))
    }

    fn with_marker(map: &'m M, selector: S, marker: MarkerForTraversor<'m, M>) -> Self {
        Self {
            map,
            selector,
            marker,
            current: Dart::NIL,
        }
    }

    pub fn orbit(&self) -> Orbit {
        self.marker.orbit()
    }

    /// Whether cells are marked per row rather than per dart.
    pub fn uses_cell_marker(&self) -> bool {
        self.marker.is_cell_marker()
    }

    fn scan_from(&mut self, mut row: u32) -> Dart {
        let map = self.map;
        let darts = map.base().darts();
        let end = darts.end();
        while row < end {
            let d = Dart::new(row);
            if !map.is_boundary_marked(d) && self.selector.select(d) && !self.marker.is_marked(d) {
                self.marker.mark(d);
                self.current = d;
                return d;
            }
            row = darts.next(row);
        }
        self.current = Dart::NIL;
        Dart::NIL
    }
}

impl<M: MapTopology, S: Selector> Traversor for TraversorCell<'_, M, S> {
    fn begin(&mut self) -> Dart {
        self.marker.unmark_all();
        let first = self.map.base().darts().begin();
        self.scan_from(first)
    }

    fn next(&mut self) -> Dart {
        if self.current.is_nil() {
            return Dart::NIL;
        }
        let row = self.map.base().darts().next(self.current.index());
        self.scan_from(row)
    }
}

impl<M: MapTopology, S: Selector> std::fmt::Debug for TraversorCell<'_, M, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraversorCell")
            .field("orbit", &self.orbit())
            .field("cell_marker", &self.uses_cell_marker())
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TraversorCell`].
///
/// ```
/// use cgogn_kernel::prelude::*;
///
/// let mut map = Map2::new();
/// let a = map.new_face(4, true);
/// let b = map.new_face(3, true);
/// map.sew_faces(a, b, true);
///
/// let faces = CellTraversal::new(&map).orbit(Orbit::Face).count()?;
/// assert_eq!(faces, 2);
///
/// let quads = CellTraversal::new(&map)
///     .orbit(Orbit::Face)
///     .selector(|d: Dart| map.face_degree(d) == 4)
///     .force_dart_marker(true)
///     .count()?;
/// assert_eq!(quads, 1);
/// # Ok::<(), MapError>(())
/// ```
pub struct CellTraversal<'m, M: MapTopology, S: Selector = AllDarts> {
    map: &'m M,
    orbit: Orbit,
    selector: S,
    force_dart_marker: bool,
    thread: usize,
}

impl<'m, M: MapTopology> CellTraversal<'m, M> {
    pub fn new(map: &'m M) -> Self {
        Self {
            map,
            orbit: Orbit::Vertex,
            selector: AllDarts,
            force_dart_marker: false,
            thread: 0,
        }
    }
}

impl<'m, M: MapTopology, S: Selector> CellTraversal<'m, M, S> {
    pub fn orbit(mut self, orbit: Orbit) -> Self {
        self.orbit = orbit;
        self
    }

    pub fn selector<T: Selector>(self, selector: T) -> CellTraversal<'m, M, T> {
        CellTraversal {
            map: self.map,
            orbit: self.orbit,
            selector,
            force_dart_marker: self.force_dart_marker,
            thread: self.thread,
        }
    }

    /// Marks darts even when the orbit is embedded.
    pub fn force_dart_marker(mut self, force: bool) -> Self {
        self.force_dart_marker = force;
        self
    }

    pub fn thread(mut self, thread: usize) -> Self {
        self.thread = thread;
        self
    }

    pub fn build(self) -> Result<TraversorCell<'m, M, S>, MapError> {
        let marker = MarkerForTraversor::with_options(
            self.map,
            self.orbit,
            self.force_dart_marker,
            self.thread,
        )?;
        Ok(TraversorCell::with_marker(self.map, self.selector, marker))
    }

    /// Calls `f` with one dart of each cell.
    pub fn for_each<F: FnMut(Dart)>(self, mut f: F) -> Result<(), MapError> {
        let mut t = self.build()?;
        t.iter().for_each(&mut f);
        Ok(())
    }

    pub fn count(self) -> Result<usize, MapError> {
        Ok(self.build()?.iter().count())
    }
}

/// Calls `f` with one dart of each `orbit` cell of `map`.
pub fn foreach_cell<M: MapTopology, F: FnMut(Dart)>(map: &M, orbit: Orbit, f: F) {
    TraversorCell::new(map, orbit).iter().for_each(f);
}

/// Number of `orbit` cells of `map`, closing cells excluded.
pub fn nb_cells<M: MapTopology>(map: &M, orbit: Orbit) -> usize {
    TraversorCell::new(map, orbit).iter().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::map::Phi2Map;
    use crate::topology::map::map2::Map2;

    fn two_triangles() -> (Map2, Dart, Dart) {
        let mut m = Map2::new();
        let a = m.new_face(3, true);
        let b = m.new_face(3, true);
        m.sew_faces(a, b, true);
        (m, a, b)
    }

    #[test]
    fn counts_cells_of_two_triangles() {
        let (m, _, _) = two_triangles();
        assert_eq!(nb_cells(&m, Orbit::Vertex), 4);
        assert_eq!(nb_cells(&m, Orbit::Edge), 5);
        assert_eq!(nb_cells(&m, Orbit::Face), 2);
        assert_eq!(nb_cells(&m, Orbit::Volume), 1);
        assert_eq!(nb_cells(&m, Orbit::Dart), 6);
    }

    #[test]
    fn cell_marker_and_dart_marker_agree() {
        let (mut m, _, _) = two_triangles();
        m.add_embedding(Orbit::Vertex);
        let mut cells = TraversorCell::new(&m, Orbit::Vertex);
        assert!(cells.uses_cell_marker());
        let a = cells.collect_darts();
        let mut forced = CellTraversal::new(&m)
            .orbit(Orbit::Vertex)
            .force_dart_marker(true)
            .build()
            .unwrap();
        assert!(!forced.uses_cell_marker());
        assert_eq!(forced.collect_darts(), a);
    }

    #[test]
    fn begin_is_idempotent() {
        let (m, _, _) = two_triangles();
        let mut t = TraversorCell::new(&m, Orbit::Edge);
        let first = t.collect_darts();
        assert_eq!(t.begin(), first[0]);
        assert_eq!(t.begin(), first[0]);
        assert_eq!(t.collect_darts(), first);
    }

    #[test]
    fn selector_filters_cells() {
        let (m, a, _) = two_triangles();
        let face_a = [a, m.phi1(a), m.phi_1(a)];
        let n = CellTraversal::new(&m)
            .orbit(Orbit::Face)
            .selector(move |d: Dart| !face_a.contains(&d))
            .count()
            .unwrap();
        assert_eq!(n, 1);
    }

    #[test]
    fn orbit_darts_traversor() {
        let (m, a, _) = two_triangles();
        let mut t = TraversorDartsOfOrbit::new(&m, Orbit::Face, a);
        assert_eq!(t.len(), 3);
        assert_eq!(t.begin(), a);
        assert_eq!(t.iter().count(), 3);
    }

    #[test]
    fn bad_thread_is_an_error() {
        let (m, _, _) = two_triangles();
        assert!(CellTraversal::new(&m).thread(5).build().is_err());
    }
}
