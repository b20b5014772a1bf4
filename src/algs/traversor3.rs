//! Incident and adjacent cell traversors driven by markers.
//!
//! [`Traversor3XY`] walks the darts of an `X` cell and yields one dart per
//! incident `Y` cell, marking each `Y` cell it returns. It only needs the
//! orbit walks of [`MapTopology`], so it serves every map kind; closing
//! cells of the map's own dimension are skipped.
//!
//! [`Traversor3XXaY`] collects the `X` cells sharing a `Y` cell with a given
//! `X` cell when it is built.

use std::ops::{Deref, DerefMut};

use super::traversal::TraversorDartsOfOrbit;
use super::traversal_core::{DartList, Traversor};
use crate::marker::{Marker, MarkerForTraversor};
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::Orbit;

/// A traversor's marker, either its own or lent by the caller.
#[derive(Debug)]
pub enum MarkerSlot<'a, 'm, M: MapTopology> {
    Owned(MarkerForTraversor<'m, M>),
    Borrowed(&'a mut MarkerForTraversor<'m, M>),
}

impl<'m, M: MapTopology> Deref for MarkerSlot<'_, 'm, M> {
    type Target = MarkerForTraversor<'m, M>;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Owned(m) => m,
            Self::Borrowed(m) => m,
        }
    }
}

impl<M: MapTopology> DerefMut for MarkerSlot<'_, '_, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Owned(m) => m,
            Self::Borrowed(m) => m,
        }
    }
}

/// `Y` cells incident to the `X` cell of a dart.
pub struct Traversor3XY<'a, 'm, M: MapTopology> {
    map: &'m M,
    orbit_y: Orbit,
    darts: TraversorDartsOfOrbit,
    marker: MarkerSlot<'a, 'm, M>,
}

impl<'a, 'm, M: MapTopology> Traversor3XY<'a, 'm, M> {
    pub fn new(map: &'m M, d: Dart, x: Orbit, y: Orbit) -> Self {
        assert_ne!(x, y, "incident traversal needs two distinct orbits");
        Self {
            map,
            orbit_y: y,
            darts: TraversorDartsOfOrbit::new(map, x, d),
            marker: MarkerSlot::Owned(MarkerForTraversor::new(map, y)),
        }
    }

    /// Traversal marking `Y` cells with `marker`, whose orbit gives `Y`.
    /// `begin()` does not clear a lent marker; its owner does.
    pub fn with_marker(
        map: &'m M,
        d: Dart,
        x: Orbit,
        marker: &'a mut MarkerForTraversor<'m, M>,
    ) -> Self {
        let y = marker.orbit();
        assert_ne!(x, y, "incident traversal needs two distinct orbits");
        Self {
            map,
            orbit_y: y,
            darts: TraversorDartsOfOrbit::new(map, x, d),
            marker: MarkerSlot::Borrowed(marker),
        }
    }

    #[inline]
    fn skips(&self, e: Dart) -> bool {
        self.orbit_y.dimension() == Some(M::DIMENSION) && self.map.is_boundary_marked(e)
    }

    fn scan(&mut self, mut e: Dart) -> Dart {
        while !e.is_nil() {
            if !self.skips(e) && !self.marker.is_marked(e) {
                self.marker.mark(e);
                return e;
            }
            e = self.darts.next();
        }
        Dart::NIL
    }
}

impl<M: MapTopology> Traversor for Traversor3XY<'_, '_, M> {
    fn begin(&mut self) -> Dart {
        if let MarkerSlot::Owned(m) = &mut self.marker {
            m.unmark_all();
        }
        let e = self.darts.begin();
        self.scan(e)
    }

    fn next(&mut self) -> Dart {
        let e = self.darts.next();
        self.scan(e)
    }
}

impl<M: MapTopology> std::fmt::Debug for Traversor3XY<'_, '_, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Traversor3XY")
            .field("y", &self.orbit_y)
            .field("darts", &self.darts.len())
            .finish_non_exhaustive()
    }
}

/// `X` cells sharing a `Y` cell with the `X` cell of a dart, the cell
/// itself excluded.
#[derive(Debug, Clone)]
pub struct Traversor3XXaY {
    list: DartList,
}

impl Traversor3XXaY {
    pub fn new<M: MapTopology>(map: &M, d: Dart, x: Orbit, y: Orbit) -> Self {
        let mut seen = MarkerForTraversor::new(map, x);
        seen.mark(d);
        let mut found = Vec::new();
        let mut through = Traversor3XY::new(map, d, x, y);
        for e in through.iter() {
            let mut back = Traversor3XY::new(map, e, y, x);
            for f in back.iter() {
                if !seen.is_marked(f) {
                    seen.mark(f);
                    found.push(f);
                }
            }
        }
        Self {
            list: DartList::new(found),
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

impl Traversor for Traversor3XXaY {
    fn begin(&mut self) -> Dart {
        self.list.begin()
    }

    fn next(&mut self) -> Dart {
        self.list.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::map::map3::Map3;

    fn closed_pair() -> (Map3, Dart, Dart) {
        let mut m = Map3::new();
        let a = m.new_pyramid(3);
        let b = m.new_pyramid(3);
        m.close_map();
        m.sew_volumes(a, b, true);
        (m, a, b)
    }

    #[test]
    fn tetrahedron_incidences() {
        let mut m = Map3::new();
        let d = m.new_pyramid(3);
        let count = |x, y| Traversor3XY::new(&m, d, x, y).iter().count();
        assert_eq!(count(Orbit::Volume, Orbit::Vertex), 4);
        assert_eq!(count(Orbit::Volume, Orbit::Edge), 6);
        assert_eq!(count(Orbit::Volume, Orbit::Face), 4);
        assert_eq!(count(Orbit::Vertex, Orbit::Edge), 3);
        assert_eq!(count(Orbit::Vertex, Orbit::Face), 3);
        assert_eq!(count(Orbit::Edge, Orbit::Face), 2);
        assert_eq!(count(Orbit::Face, Orbit::Vertex), 3);
        assert_eq!(count(Orbit::Edge, Orbit::Volume), 1);
        m.close_map();
        let count = |x, y| Traversor3XY::new(&m, d, x, y).iter().count();
        assert_eq!(count(Orbit::Edge, Orbit::Volume), 1);
        assert_eq!(count(Orbit::Edge, Orbit::Face), 2);
    }

    #[test]
    fn volumes_around_shared_face() {
        let (m, a, b) = closed_pair();
        assert_eq!(Traversor3XY::new(&m, a, Orbit::Face, Orbit::Volume).iter().count(), 2);
        let adjacent = Traversor3XXaY::new(&m, a, Orbit::Volume, Orbit::Face);
        assert_eq!(adjacent.len(), 1);
        assert!(m.same_orbit(Orbit::Volume, adjacent.darts()[0], b));
        let by_vertex = Traversor3XXaY::new(&m, a, Orbit::Vertex, Orbit::Edge);
        assert_eq!(by_vertex.len(), 4);
    }

    #[test]
    fn lent_marker_is_shared() {
        let (mut m, a, b) = closed_pair();
        m.add_embedding(Orbit::Vertex);
        let mut marker = MarkerForTraversor::new(&m, Orbit::Vertex);
        let first = Traversor3XY::with_marker(&m, a, Orbit::Volume, &mut marker)
            .iter()
            .count();
        assert_eq!(first, 4);
        let second = Traversor3XY::with_marker(&m, b, Orbit::Volume, &mut marker)
            .iter()
            .count();
        assert_eq!(second, 1);
        marker.unmark_all();
        assert!(marker.is_all_unmarked());
    }

    #[test]
    fn restart_gives_same_sequence() {
        let (m, a, _) = closed_pair();
        let mut t = Traversor3XY::new(&m, a, Orbit::Vertex, Orbit::Edge);
        let once = t.collect_darts();
        assert_eq!(t.collect_darts(), once);
    }
}
