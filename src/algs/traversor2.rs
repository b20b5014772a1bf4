//! Surface traversors following the `phi` relations of a 2-map.
//!
//! Incident traversors step along one relation walk per call and need no
//! marker. Vertices on an open border are walked forward with `alpha1` and
//! then backward with `alpha_1`. Closing faces are skipped wherever faces are
//! yielded.
//!
//! Adjacent traversors nest two incident traversals and are collected when
//! built.

use super::traversal_core::{DartList, Traversor};
use crate::marker::{Marker, MarkerForTraversor};
use crate::topology::dart::Dart;
use crate::topology::map::Phi2Map;
use crate::topology::orbit::Orbit;

/// Which incident cells a [`Traversor2`] yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incidence2 {
    VertexEdges,
    VertexFaces,
    EdgeVertices,
    EdgeFaces,
    FaceVertices,
    FaceEdges,
}

impl Incidence2 {
    /// The incidence yielding `y` cells around an `x` cell.
    ///
    /// # Panics
    /// Panics unless `x` and `y` are two distinct orbits among vertex, edge
    /// and face.
    pub fn between(x: Orbit, y: Orbit) -> Self {
        match (x, y) {
            (Orbit::Vertex, Orbit::Edge) => Self::VertexEdges,
            (Orbit::Vertex, Orbit::Face) => Self::VertexFaces,
            (Orbit::Edge, Orbit::Vertex) => Self::EdgeVertices,
            (Orbit::Edge, Orbit::Face) => Self::EdgeFaces,
            (Orbit::Face, Orbit::Vertex) => Self::FaceVertices,
            (Orbit::Face, Orbit::Edge) => Self::FaceEdges,
            _ => panic!("no surface incidence from {x:?} to {y:?}"),
        }
    }

    fn skips_boundary(self) -> bool {
        matches!(self, Self::VertexFaces | Self::EdgeFaces)
    }
}

/// Cells incident to the cell of a dart on a surface.
#[derive(Debug)]
pub struct Traversor2<'m, M: Phi2Map> {
    map: &'m M,
    kind: Incidence2,
    start: Dart,
    current: Dart,
    backward: bool,
    step: u8,
}

impl<'m, M: Phi2Map> Traversor2<'m, M> {
    pub fn new(map: &'m M, kind: Incidence2, d: Dart) -> Self {
        Self {
            map,
            kind,
            start: d,
            current: Dart::NIL,
            backward: false,
            step: 0,
        }
    }

    /// Edges around the vertex of `d`.
    pub fn vertex_edges(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::VertexEdges, d)
    }

    /// Faces around the vertex of `d`.
    pub fn vertex_faces(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::VertexFaces, d)
    }

    /// The two vertices of the edge of `d`.
    pub fn edge_vertices(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::EdgeVertices, d)
    }

    /// The faces on both sides of the edge of `d`.
    pub fn edge_faces(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::EdgeFaces, d)
    }

    /// Vertices of the face of `d`.
    pub fn face_vertices(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::FaceVertices, d)
    }

    /// Edges of the face of `d`.
    pub fn face_edges(map: &'m M, d: Dart) -> Self {
        Self::new(map, Incidence2::FaceEdges, d)
    }

    fn vertex_step(&mut self) -> Dart {
        let m = self.map;
        if !self.backward {
            let p = m.phi_1(self.current);
            let n = m.phi2(p);
            if n != p {
                if n == self.start {
                    return Dart::NIL;
                }
                self.current = n;
                return n;
            }
            self.backward = true;
            self.current = self.start;
            if self.kind == Incidence2::VertexEdges {
                return p;
            }
        }
        let o = m.phi2(self.current);
        if o == self.current {
            return Dart::NIL;
        }
        self.current = m.phi1(o);
        self.current
    }

    fn edge_step(&mut self) -> Dart {
        self.step += 1;
        if self.step > 1 {
            return Dart::NIL;
        }
        let o = self.map.phi2(self.start);
        match self.kind {
            Incidence2::EdgeVertices if o == self.start => self.map.phi1(self.start),
            Incidence2::EdgeVertices => o,
            _ if o == self.start => Dart::NIL,
            _ => o,
        }
    }

    fn raw_next(&mut self) -> Dart {
        match self.kind {
            Incidence2::VertexEdges | Incidence2::VertexFaces => self.vertex_step(),
            Incidence2::EdgeVertices | Incidence2::EdgeFaces => self.edge_step(),
            Incidence2::FaceVertices | Incidence2::FaceEdges => {
                self.current = self.map.phi1(self.current);
                if self.current == self.start {
                    Dart::NIL
                } else {
                    self.current
                }
            }
        }
    }

    fn accept(&mut self, mut e: Dart) -> Dart {
        if self.kind.skips_boundary() {
            while !e.is_nil() && self.map.is_boundary_marked(e) {
                e = self.raw_next();
            }
        }
        e
    }
}

impl<M: Phi2Map> Traversor for Traversor2<'_, M> {
    fn begin(&mut self) -> Dart {
        self.current = self.start;
        self.backward = false;
        self.step = 0;
        self.accept(self.start)
    }

    fn next(&mut self) -> Dart {
        let e = self.raw_next();
        self.accept(e)
    }
}

/// Cells sharing a cell of another orbit with the cell of a dart, the cell
/// itself excluded.
#[derive(Debug, Clone)]
pub struct Traversor2Adjacent {
    list: DartList,
}

impl Traversor2Adjacent {
    /// `x` cells sharing a `through` cell with the `x` cell of `d`.
    pub fn new<M: Phi2Map>(map: &M, d: Dart, x: Orbit, through: Orbit) -> Self {
        let out = Incidence2::between(x, through);
        let back = Incidence2::between(through, x);
        let mut seen = MarkerForTraversor::new(map, x);
        seen.mark(d);
        let mut found = Vec::new();
        let mut outer = Traversor2::new(map, out, d);
        for e in outer.iter() {
            let mut inner = Traversor2::new(map, back, e);
            for f in inner.iter() {
                if !map.is_boundary_cell(x, f) && !seen.is_marked(f) {
                    seen.mark(f);
                    found.push(f);
                }
            }
        }
        Self {
            list: DartList::new(found),
        }
    }

    pub fn vertices_by_edge<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Vertex, Orbit::Edge)
    }

    pub fn vertices_by_face<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Vertex, Orbit::Face)
    }

    pub fn edges_by_vertex<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Edge, Orbit::Vertex)
    }

    pub fn edges_by_face<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Edge, Orbit::Face)
    }

    pub fn faces_by_vertex<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Face, Orbit::Vertex)
    }

    pub fn faces_by_edge<M: Phi2Map>(map: &M, d: Dart) -> Self {
        Self::new(map, d, Orbit::Face, Orbit::Edge)
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

impl Traversor for Traversor2Adjacent {
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
    use crate::topology::map::MapTopology;
    use crate::topology::map::map2::Map2;

    fn closed_pair() -> (Map2, Dart, Dart) {
        let mut m = Map2::new();
        let a = m.new_face(3, true);
        let b = m.new_face(3, true);
        m.sew_faces(a, b, true);
        (m, a, b)
    }

    #[test]
    fn quad_face_vertices() {
        let mut m = Map2::new();
        let d = m.new_face(4, false);
        let vs = Traversor2::face_vertices(&m, d).collect_darts();
        assert_eq!(vs, vec![d, m.phi1(d), m.phi1(m.phi1(d)), m.phi_1(d)]);
        assert_eq!(Traversor2::vertex_edges(&m, d).iter().count(), 2);
        assert_eq!(Traversor2::edge_vertices(&m, d).collect_darts(), vec![d, m.phi1(d)]);
        assert_eq!(Traversor2::edge_faces(&m, d).iter().count(), 1);
    }

    #[test]
    fn open_vertex_edges() {
        let mut m = Map2::new();
        let a = m.new_face(3, false);
        let b = m.new_face(3, false);
        m.sew_faces(a, b, false);
        let es = Traversor2::vertex_edges(&m, a).collect_darts();
        assert_eq!(es, vec![a, m.phi_1(a), m.phi1(b)]);
        assert_eq!(m.vertex_degree(a), es.len());
        assert_eq!(Traversor2::vertex_faces(&m, a).iter().count(), 2);
    }

    #[test]
    fn closed_vertex_skips_boundary_face() {
        let (m, a, b) = closed_pair();
        assert_eq!(Traversor2::vertex_edges(&m, a).iter().count(), 3);
        let faces = Traversor2::vertex_faces(&m, a).collect_darts();
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|&f| !m.is_boundary_marked(f)));
        assert_eq!(Traversor2::edge_faces(&m, a).collect_darts(), vec![a, b]);
        let mut t = Traversor2::edge_faces(&m, m.phi1(a));
        assert_eq!(t.iter().count(), 1);
    }

    #[test]
    fn adjacency() {
        let (m, a, b) = closed_pair();
        let faces = Traversor2Adjacent::faces_by_edge(&m, a);
        assert_eq!(faces.len(), 1);
        assert!(m.same_face(faces.darts()[0], b));
        assert_eq!(Traversor2Adjacent::faces_by_vertex(&m, m.phi1(a)).len(), 1);
        assert_eq!(Traversor2Adjacent::vertices_by_edge(&m, a).len(), 3);
        assert_eq!(Traversor2Adjacent::vertices_by_face(&m, a).len(), 3);
        assert_eq!(Traversor2Adjacent::edges_by_vertex(&m, a).len(), 4);
        assert_eq!(Traversor2Adjacent::edges_by_face(&m, a).len(), 4);
    }

    #[test]
    fn begin_restarts_walk() {
        let (m, a, _) = closed_pair();
        let mut t = Traversor2::vertex_edges(&m, a);
        let once = t.collect_darts();
        assert_eq!(t.begin(), a);
        assert_eq!(t.collect_darts(), once);
    }
}
