//! Generalized 2-maps: every edge of a face is two darts linked by `beta0`,
//! face corners are linked by `beta1` and adjacent faces by `beta2`.
//!
//! The oriented view required by traversors is derived:
//! `phi1 = beta1 o beta0`, `phi_1 = beta0 o beta1`, `phi2 = beta2 o beta0`.
//! An edge not sewn by `beta2` is a fixed point of `phi2`.

use super::base::{BOUNDARY2, MapBase, MapConfig};
use super::beta::{self, BETA0, BETA1, BETA2};
use super::{MapTopology, OrbitDarts, Phi2Map, foreach_generated};
use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;
use crate::topology::validation::{CheckReport, Checker};

const RELATIONS: &[&str] = &["beta0", "beta1", "beta2"];

#[derive(Debug)]
pub struct GMap2 {
    base: MapBase,
}

impl Default for GMap2 {
    fn default() -> Self {
        Self::new()
    }
}

impl MapTopology for GMap2 {
    const DIMENSION: usize = 2;
    const BOUNDARY: u8 = BOUNDARY2;

    #[inline]
    fn base(&self) -> &MapBase {
        &self.base
    }

    #[inline]
    fn base_mut(&mut self) -> &mut MapBase {
        &mut self.base
    }

    fn foreach_dart_of_orbit<F: FnMut(Dart)>(&self, orbit: Orbit, d: Dart, f: F) {
        let gens: &[usize] = match orbit {
            Orbit::Dart => &[],
            Orbit::Vertex => &[BETA1, BETA2],
            Orbit::Edge => &[BETA0, BETA2],
            Orbit::Face => &[BETA0, BETA1],
            Orbit::Volume => &[BETA0, BETA1, BETA2],
        };
        foreach_generated(
            d,
            |x, out: &mut OrbitDarts| out.extend(gens.iter().map(|&i| self.base.relation(i, x))),
            f,
        );
    }
}

impl Phi2Map for GMap2 {
    #[inline]
    fn phi1(&self, d: Dart) -> Dart {
        beta::phi1(&self.base, d)
    }

    #[inline]
    fn phi_1(&self, d: Dart) -> Dart {
        beta::phi_1(&self.base, d)
    }

    #[inline]
    fn phi2(&self, d: Dart) -> Dart {
        beta::phi_through(&self.base, BETA2, d)
    }
}

impl GMap2 {
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self {
            base: MapBase::new(RELATIONS, config),
        }
    }

    pub fn clear(&mut self) {
        self.base.clear();
    }

    #[inline]
    pub fn beta0(&self, d: Dart) -> Dart {
        self.base.relation(BETA0, d)
    }

    #[inline]
    pub fn beta1(&self, d: Dart) -> Dart {
        self.base.relation(BETA1, d)
    }

    #[inline]
    pub fn beta2(&self, d: Dart) -> Dart {
        self.base.relation(BETA2, d)
    }

    // ------------------------------------------------------------------
    // Raw construction
    // ------------------------------------------------------------------

    pub fn new_dart(&mut self) -> Dart {
        self.base.new_dart()
    }

    pub fn beta0sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(BETA0, d, e);
    }

    pub fn beta0unsew(&mut self, d: Dart) {
        self.base.involution_unsew(BETA0, d);
    }

    pub fn beta1sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(BETA1, d, e);
    }

    pub fn beta1unsew(&mut self, d: Dart) {
        self.base.involution_unsew(BETA1, d);
    }

    pub fn beta2sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(BETA2, d, e);
    }

    pub fn beta2unsew(&mut self, d: Dart) {
        self.base.involution_unsew(BETA2, d);
    }

    // ------------------------------------------------------------------
    // Topological operators
    // ------------------------------------------------------------------

    /// New face of `n` edges, optionally closed by a boundary face. Returns
    /// an oriented dart of the face.
    pub fn new_face(&mut self, n: usize, with_boundary: bool) -> Dart {
        let d = beta::new_cycle(&mut self.base, n);
        let mut darts: Vec<Dart> = beta::face_darts(&self.base, d).into_vec();
        if with_boundary {
            let b = beta::new_cycle(&mut self.base, n);
            let outer = beta::face_darts(&self.base, b);
            for (&x, &y) in darts.iter().zip(outer.iter()) {
                self.base.involution_sew(BETA2, x, y);
                self.base.boundary_mark(BOUNDARY2, y);
            }
            darts.extend(outer);
        }
        self.repair_embeddings(&darts);
        d
    }

    /// Deletes the face of `d`; in a closed map its edges are first unsewn
    /// with boundary darts.
    pub fn delete_face(&mut self, d: Dart) {
        assert!(!self.is_boundary_marked(d), "deleting a boundary face");
        let face = beta::face_darts(&self.base, d);
        let seeds: Vec<Dart> = face
            .iter()
            .map(|&x| self.beta2(x))
            .filter(|o| !face.contains(o))
            .collect();
        if face.iter().any(|&x| self.beta2(x) == x) {
            for &x in &face {
                self.base.involution_unsew(BETA2, x);
            }
            beta::delete_face(&mut self.base, d);
        } else {
            for x in beta::oriented_cycle(&self.base, d) {
                if !self.is_boundary_edge(x) {
                    self.unsew_aligned_with_boundary(x);
                }
            }
            let outer = self.beta2(d);
            beta::delete_face(&mut self.base, d);
            beta::delete_face(&mut self.base, outer);
        }
        self.after_edit(&seeds);
    }

    /// Sews the faces of `d` and `e` so that `phi2(d) == e`. With
    /// `with_boundary` the boundary edges facing them are removed and the
    /// boundary faces merged.
    pub fn sew_faces(&mut self, d: Dart, e: Dart, with_boundary: bool) {
        let e0 = self.beta0(e);
        let mut seeds = vec![d, e, self.beta0(d), e0];
        if with_boundary {
            seeds.extend(self.sew_aligned_with_boundary(d, e0));
        } else {
            beta::sew_edge(&mut self.base, BETA2, d, e0);
        }
        self.after_edit(&seeds);
    }

    /// `d` and `e` lie at the same vertex; both face boundary darts.
    fn sew_aligned_with_boundary(&mut self, d: Dart, e: Dart) -> Vec<Dart> {
        let (d0, e0) = (self.beta0(d), self.beta0(e));
        let (dd, ee) = (self.beta2(d), self.beta2(e));
        let (dd0, ee0) = (self.beta0(dd), self.beta0(ee));
        debug_assert!(self.is_boundary_marked(dd) && self.is_boundary_marked(ee));
        let (x, u) = (self.beta1(dd), self.beta1(ee));
        let (y, v) = (self.beta1(dd0), self.beta1(ee0));
        for z in [d, d0, e, e0] {
            self.base.involution_unsew(BETA2, z);
        }
        for z in [dd, ee, dd0, ee0] {
            self.base.involution_unsew(BETA1, z);
        }
        if x != ee {
            self.base.involution_sew(BETA1, x, u);
        }
        if y != ee0 {
            self.base.involution_sew(BETA1, y, v);
        }
        for z in [dd, ee, dd0, ee0] {
            self.base.delete_dart(z);
        }
        beta::sew_edge(&mut self.base, BETA2, d, e);
        vec![x, u, y, v]
    }

    /// Unsews the edge of `d`. With `with_boundary` both sides get boundary
    /// darts linked into the boundary around each end.
    pub fn unsew_faces(&mut self, d: Dart, with_boundary: bool) {
        let e = self.beta2(d);
        debug_assert_ne!(e, d, "unsewing an open edge");
        let mut seeds = vec![d, e, self.beta0(d), self.beta0(e)];
        if with_boundary {
            debug_assert!(!self.is_boundary_edge(d), "unsewing a boundary edge");
            seeds.extend(self.unsew_aligned_with_boundary(d));
        } else {
            let d0 = self.beta0(d);
            self.base.involution_unsew(BETA2, d);
            self.base.involution_unsew(BETA2, d0);
        }
        self.after_edit(&seeds);
    }

    /// Boundary corner at the vertex of `d`, split as (dart on the side of
    /// `d`, dart on the side of `beta2(d)`).
    fn boundary_corner(&self, d: Dart) -> Option<(Dart, Dart)> {
        let mut it = d;
        loop {
            it = self.beta1(it);
            if it == self.beta2(d) {
                return None;
            }
            let n = self.beta2(it);
            if n == it {
                return None;
            }
            if self.is_boundary_marked(n) {
                return Some((n, self.beta1(n)));
            }
            it = n;
        }
    }

    fn unsew_aligned_with_boundary(&mut self, d: Dart) -> Vec<Dart> {
        let e = self.beta2(d);
        let (d0, e0) = (self.beta0(d), self.beta0(e));
        let corners = [self.boundary_corner(d), self.boundary_corner(d0)];
        self.base.involution_unsew(BETA2, d);
        self.base.involution_unsew(BETA2, d0);
        let mut created = Vec::with_capacity(4);
        for (side, other) in [(d, e), (d0, e0)] {
            let bd = self.base.new_dart();
            let be = self.base.new_dart();
            self.base.involution_sew(BETA2, side, bd);
            self.base.involution_sew(BETA2, other, be);
            self.base.boundary_mark(BOUNDARY2, bd);
            self.base.boundary_mark(BOUNDARY2, be);
            created.extend([bd, be]);
        }
        let [bd, be, bd0, be0] = [created[0], created[1], created[2], created[3]];
        self.base.involution_sew(BETA0, bd, bd0);
        self.base.involution_sew(BETA0, be, be0);
        for (corner, (nd, ne)) in corners.into_iter().zip([(bd, be), (bd0, be0)]) {
            match corner {
                Some((fd, fe)) => {
                    self.base.involution_unsew(BETA1, fd);
                    self.base.involution_sew(BETA1, fd, nd);
                    self.base.involution_sew(BETA1, fe, ne);
                }
                None => self.base.involution_sew(BETA1, nd, ne),
            }
        }
        created
    }

    /// Inserts a vertex in the edge of `d`. Returns the new oriented dart
    /// following `d`.
    pub fn cut_edge(&mut self, d: Dart) -> Dart {
        let e = self.beta2(d);
        let (d1, e1) = self.cut_edge_1(d);
        let mut seeds = vec![d, d1, e1];
        if e != d {
            let (f1, g1) = self.cut_edge_1(e);
            self.base.involution_sew(BETA2, d1, f1);
            self.base.involution_sew(BETA2, e1, g1);
            seeds.extend([e, f1, g1]);
        }
        self.after_edit(&seeds);
        self.phi1(d)
    }

    /// Splits the edge of `d` inside its face: returns the new darts at the
    /// new vertex on the side of `d` and on the other side.
    fn cut_edge_1(&mut self, d: Dart) -> (Dart, Dart) {
        let e = self.beta0(d);
        let d1 = self.base.new_dart();
        let e1 = self.base.new_dart();
        self.base.copy_boundary_flags(d, d1);
        self.base.copy_boundary_flags(d, e1);
        self.base.involution_unsew(BETA0, d);
        self.base.involution_sew(BETA0, d, d1);
        self.base.involution_sew(BETA0, e, e1);
        self.base.involution_sew(BETA1, d1, e1);
        (d1, e1)
    }

    /// Splits the face of the oriented darts `d` and `e` by an edge joining
    /// their vertices. Returns the new oriented dart in the face of `d`.
    pub fn split_face(&mut self, d: Dart, e: Dart) -> Dart {
        assert!(
            d != e && beta::oriented_cycle(&self.base, d).contains(&e),
            "split_face needs two oriented darts of one face"
        );
        let (cd, ce) = (self.beta1(d), self.beta1(e));
        self.base.involution_unsew(BETA1, d);
        self.base.involution_unsew(BETA1, e);
        let n1 = self.base.new_dart();
        let n2 = self.base.new_dart();
        let m1 = self.base.new_dart();
        let m2 = self.base.new_dart();
        self.base.involution_sew(BETA0, n1, n2);
        self.base.involution_sew(BETA0, m1, m2);
        self.base.involution_sew(BETA2, n1, m1);
        self.base.involution_sew(BETA2, n2, m2);
        self.base.involution_sew(BETA1, n1, d);
        self.base.involution_sew(BETA1, ce, n2);
        self.base.involution_sew(BETA1, cd, m1);
        self.base.involution_sew(BETA1, m2, e);
        self.after_edit(&[n1, n2, m1, m2]);
        n2
    }

    /// Fills the hole bordered by the unsewn dart `d` with a new face.
    /// Returns a dart of that face.
    pub fn close_hole(&mut self, d: Dart, for_boundary: bool) -> Dart {
        assert_eq!(self.beta2(d), d, "close_hole needs an unsewn dart");
        let mut created = Vec::new();
        let mut first = Dart::NIL;
        let mut prev = Dart::NIL;
        let mut x = d;
        loop {
            let a = self.base.new_dart();
            let b = self.base.new_dart();
            self.base.involution_sew(BETA0, a, b);
            let x0 = self.beta0(x);
            self.base.involution_sew(BETA2, x, a);
            self.base.involution_sew(BETA2, x0, b);
            if prev.is_nil() {
                first = a;
            } else {
                self.base.involution_sew(BETA1, prev, a);
            }
            prev = b;
            created.extend([a, b]);
            let mut y = self.beta1(x0);
            while y != d && self.beta2(y) != y {
                y = self.beta1(self.beta2(y));
            }
            if y == d {
                break;
            }
            x = y;
        }
        self.base.involution_sew(BETA1, prev, first);
        if for_boundary {
            for &c in &created {
                self.base.boundary_mark(BOUNDARY2, c);
            }
        }
        self.repair_embeddings(&created);
        log::debug!("closed a hole of {} edges", created.len() / 2);
        first
    }

    /// Closes every hole with a boundary face. Returns the number of holes.
    pub fn close_map(&mut self) -> usize {
        let darts: Vec<Dart> = self.darts().collect();
        let mut holes = 0;
        for d in darts {
            if self.beta2(d) == d {
                self.close_hole(d, true);
                holes += 1;
            }
        }
        log::debug!("close_map: {holes} holes closed");
        holes
    }

    fn after_edit(&mut self, seeds: &[Dart]) {
        let mut touched = Vec::with_capacity(seeds.len() * 4);
        for &d in seeds {
            if self.is_alive(d) {
                touched.extend([d, self.beta0(d), self.beta1(d), self.beta2(d)]);
            }
        }
        self.repair_embeddings(&touched);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn same_vertex(&self, d: Dart, e: Dart) -> bool {
        self.same_orbit(Orbit::Vertex, d, e)
    }

    pub fn same_edge(&self, d: Dart, e: Dart) -> bool {
        self.same_orbit(Orbit::Edge, d, e)
    }

    pub fn same_face(&self, d: Dart, e: Dart) -> bool {
        self.same_orbit(Orbit::Face, d, e)
    }

    /// Number of edges incident to the vertex of `d`.
    pub fn vertex_degree(&self, d: Dart) -> usize {
        let mut n = 0;
        let mut open = false;
        self.foreach_dart_of_orbit(Orbit::Vertex, d, |x| {
            n += 1;
            open |= self.beta2(x) == x;
        });
        n / 2 + usize::from(open)
    }

    pub fn face_degree(&self, d: Dart) -> usize {
        self.orbit_size(Orbit::Face, d) / 2
    }

    pub fn is_boundary_edge(&self, d: Dart) -> bool {
        let e = self.beta2(d);
        e == d || self.is_boundary_marked(d) || self.is_boundary_marked(e)
    }

    pub fn check(&self) -> CheckReport {
        Checker::new(self)
            .involution("beta0", |m, d| m.beta0(d))
            .involution("beta1", |m, d| m.beta1(d))
            .involution("beta2", |m, d| m.beta2(d))
            .composite_involution("beta0 o beta2", |m, d| m.beta0(m.beta2(d)))
            .boundary(|m, d| m.beta2(d))
            .embeddings()
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::nb_cells;

    #[test]
    fn square_face() {
        let mut m = GMap2::new();
        let d = m.new_face(4, true);
        assert_eq!(m.nb_darts(), 16);
        assert_eq!(m.face_degree(d), 4);
        assert_eq!(m.vertex_degree(d), 2);
        assert_eq!(m.phi1(m.phi1(m.phi1(m.phi1(d)))), d);
        assert_eq!(m.phi2(m.phi2(d)), d);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 1);
    }

    #[test]
    fn sew_and_unsew_triangles() {
        let mut m = GMap2::new();
        let a = m.new_face(3, true);
        let b = m.new_face(3, true);
        m.add_embedding(Orbit::Vertex);
        m.sew_faces(a, b, true);
        assert_eq!(m.phi2(a), b);
        assert_eq!(m.nb_darts(), 20);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 4);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 1);

        m.unsew_faces(a, true);
        assert_eq!(m.nb_darts(), 24);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 6);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 2);
    }

    #[test]
    fn cut_edge_and_split_face() {
        let mut m = GMap2::new();
        let d = m.new_face(3, true);
        m.add_embedding(Orbit::Face);
        let nd = m.cut_edge(d);
        assert_eq!(m.phi1(d), nd);
        assert_eq!(m.face_degree(d), 4);
        assert_eq!(m.vertex_degree(nd), 2);
        assert!(m.check().is_valid());
        let e = m.phi1(nd);
        let x = m.split_face(d, e);
        assert_eq!(m.face_degree(d), 3);
        assert_eq!(m.face_degree(e), 3);
        assert!(m.same_face(x, d));
        assert_eq!(m.base().container(Orbit::Face).size(), 3);
        assert!(m.check().is_valid());
    }

    #[test]
    fn cutting_a_border_edge_keeps_one_face() {
        let mut m = GMap2::new();
        let d = m.new_face(3, true);
        m.cut_edge(d);
        let shell = m.beta2(d);
        assert_eq!(m.face_degree(shell), 4);
        assert!(m.orbit_darts(Orbit::Face, shell).iter().all(|&x| m.is_boundary_marked(x)));
        assert_eq!(nb_cells(&m, Orbit::Face), 1);
        assert_eq!(nb_cells(&m, Orbit::Vertex), 4);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 1);
    }

    #[test]
    fn close_map_on_open_faces() {
        let mut m = GMap2::new();
        let a = m.new_face(3, false);
        let b = m.new_face(3, false);
        m.sew_faces(a, b, false);
        assert_eq!(m.close_map(), 1);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.open_darts, 0);
        assert_eq!(report.boundary_faces, 1);
        assert_eq!(m.vertex_degree(a), 3);
    }

    #[test]
    fn delete_face_of_pair() {
        let mut m = GMap2::new();
        let a = m.new_face(3, true);
        let b = m.new_face(3, true);
        m.sew_faces(a, b, true);
        m.delete_face(a);
        assert_eq!(m.nb_darts(), 12);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 1);
    }
}
