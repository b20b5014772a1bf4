//! Dart selectors: pure predicates gating which darts a traversal visits.
//!
//! A selector must not depend on anything the traversal changes.

use crate::marker::Marker;
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;

pub trait Selector {
    fn select(&self, d: Dart) -> bool;

    fn and<S: Selector>(self, other: S) -> And<Self, S>
    where
        Self: Sized,
    {
        And(self, other)
    }

    fn or<S: Selector>(self, other: S) -> Or<Self, S>
    where
        Self: Sized,
    {
        Or(self, other)
    }

    fn not(self) -> Not<Self>
    where
        Self: Sized,
    {
        Not(self)
    }
}

impl<F: Fn(Dart) -> bool> Selector for F {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        self(d)
    }
}

/// Accepts every dart.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllDarts;

impl Selector for AllDarts {
    #[inline]
    fn select(&self, _: Dart) -> bool {
        true
    }
}

pub type SelectorTrue = AllDarts;

/// Rejects every dart.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorFalse;

impl Selector for SelectorFalse {
    #[inline]
    fn select(&self, _: Dart) -> bool {
        false
    }
}

/// Darts marked by a marker.
#[derive(Debug)]
pub struct SelectorMarked<'a, K: Marker>(pub &'a K);

impl<K: Marker> Selector for SelectorMarked<'_, K> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        self.0.is_marked(d)
    }
}

/// Darts left unmarked by a marker.
#[derive(Debug)]
pub struct SelectorUnmarked<'a, K: Marker>(pub &'a K);

impl<K: Marker> Selector for SelectorUnmarked<'_, K> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        !self.0.is_marked(d)
    }
}

/// Darts not belonging to a closing cell of the map.
#[derive(Debug)]
pub struct SelectorNoBoundary<'m, M: MapTopology>(pub &'m M);

impl<M: MapTopology> Selector for SelectorNoBoundary<'_, M> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        !self.0.is_boundary_marked(d)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(A, B);

impl<A: Selector, B: Selector> Selector for And<A, B> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        self.0.select(d) && self.1.select(d)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Or<A, B>(A, B);

impl<A: Selector, B: Selector> Selector for Or<A, B> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        self.0.select(d) || self.1.select(d)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Not<A>(A);

impl<A: Selector> Selector for Not<A> {
    #[inline]
    fn select(&self, d: Dart) -> bool {
        !self.0.select(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::traversal::TraversorCell;
    use crate::algs::traversal_core::Traversor;
    use crate::marker::DartMarker;
    use crate::topology::map::Phi2Map;
    use crate::topology::map::map2::Map2;
    use crate::topology::orbit::Orbit;

    fn two_triangles() -> (Map2, Dart, Dart) {
        let mut m = Map2::new();
        let a = m.new_face(3, true);
        let b = m.new_face(3, true);
        m.sew_faces(a, b, true);
        (m, a, b)
    }

    #[test]
    fn combinators() {
        let even = |d: Dart| d.index() % 2 == 0;
        let small = |d: Dart| d.index() < 4;
        let s = even.and(small);
        assert!(s.select(Dart::new(2)));
        assert!(!s.select(Dart::new(6)));
        assert!(!s.select(Dart::new(3)));
        let s = even.or(small).not();
        assert!(s.select(Dart::new(5)));
        assert!(!s.select(Dart::new(1)));
        assert!(AllDarts.and(SelectorFalse.not()).select(Dart::new(9)));
        assert!(!SelectorFalse.select(Dart::new(0)));
    }

    #[test]
    fn marked_and_unmarked_split_the_map() {
        let (m, a, b) = two_triangles();
        let mut dm = DartMarker::new(&m);
        dm.mark_orbit(Orbit::Face, a);
        let marked = SelectorMarked(&dm);
        let unmarked = SelectorUnmarked(&dm);
        assert!(marked.select(m.phi1(a)));
        assert!(!marked.select(b));
        assert!(unmarked.select(b));
        assert!(m.darts().all(|d| marked.select(d) != unmarked.select(d)));

        let vertices =
            TraversorCell::with_selector(&m, Orbit::Vertex, SelectorMarked(&dm)).collect_darts();
        assert_eq!(vertices.len(), 3);
        assert!(vertices.iter().all(|&d| dm.is_marked(d)));
        let faces =
            TraversorCell::with_selector(&m, Orbit::Face, SelectorUnmarked(&dm)).collect_darts();
        assert_eq!(faces, vec![b]);
    }

    #[test]
    fn no_boundary_rejects_closing_darts() {
        let (m, a, _) = two_triangles();
        let s = SelectorNoBoundary(&m);
        assert!(s.select(a));
        let shell = m.phi2(m.phi1(a));
        assert!(!s.select(shell));
        assert_eq!(m.darts().filter(|&d| s.select(d)).count(), 6);
        assert_eq!(m.darts().filter(|&d| !s.select(d)).count(), 4);
    }
}
