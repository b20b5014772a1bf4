//! Oriented 2-maps: surfaces made of `phi1` cycles (faces) sewn along edges by
//! the involution `phi2`.
//!
//! Maps built through [`Map2::new_face`] with a boundary carry closing faces:
//! every edge is sewn, and the darts of the closing faces are marked with
//! [`BOUNDARY2`]. Importers may instead build open faces with
//! [`Map2::new_cycle`] and raw sews, then call [`Map2::close_map`].

use super::base::{BOUNDARY2, MapBase, MapConfig};
use super::embedding::forget;
use super::ops2::{self, PHI1, PHI_1, PHI2};
use super::{MapTopology, OrbitDarts, Phi2Map, foreach_generated};
use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;
use crate::topology::validation::{CheckReport, Checker};

const RELATIONS: &[&str] = &["phi1", "phi_1", "phi2"];

#[derive(Debug)]
pub struct Map2 {
    base: MapBase,
}

impl Default for Map2 {
    fn default() -> Self {
        Self::new()
    }
}

impl MapTopology for Map2 {
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

    fn foreach_dart_of_orbit<F: FnMut(Dart)>(&self, orbit: Orbit, d: Dart, mut f: F) {
        match orbit {
            Orbit::Dart => f(d),
            Orbit::Vertex => {
                ops2::foreach_dart_of_vertex(&self.base, d, f);
            }
            Orbit::Edge => {
                f(d);
                let e = self.phi2(d);
                if e != d {
                    f(e);
                }
            }
            Orbit::Face => {
                let mut it = d;
                loop {
                    f(it);
                    it = self.phi1(it);
                    if it == d {
                        break;
                    }
                }
            }
            Orbit::Volume => foreach_generated(
                d,
                |x, out: &mut OrbitDarts| {
                    out.push(self.phi1(x));
                    out.push(self.phi2(x));
                },
                f,
            ),
        }
    }
}

impl Phi2Map for Map2 {
    #[inline]
    fn phi1(&self, d: Dart) -> Dart {
        self.base.relation(PHI1, d)
    }

    #[inline]
    fn phi_1(&self, d: Dart) -> Dart {
        self.base.relation(PHI_1, d)
    }

    #[inline]
    fn phi2(&self, d: Dart) -> Dart {
        self.base.relation(PHI2, d)
    }
}

impl Map2 {
    pub fn new() -> Self {
        Self::with_config(MapConfig::default())
    }

    pub fn with_config(config: MapConfig) -> Self {
        Self {
            base: MapBase::new(RELATIONS, config),
        }
    }

    /// Removes every dart and every cell; attributes stay registered.
    pub fn clear(&mut self) {
        self.base.clear();
    }

    // ------------------------------------------------------------------
    // Raw construction (no embedding bookkeeping)
    // ------------------------------------------------------------------

    /// A dart that is a fixed point of every relation.
    pub fn new_dart(&mut self) -> Dart {
        self.base.new_dart()
    }

    /// Exchanges the `phi1` successors of `d` and `e`.
    pub fn phi1sew(&mut self, d: Dart, e: Dart) {
        ops2::phi1sew(&mut self.base, d, e);
    }

    pub fn phi1unsew(&mut self, d: Dart) {
        ops2::phi1unsew(&mut self.base, d);
    }

    /// Links `d` and `e` by `phi2`. Both must be fixed points.
    pub fn phi2sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(PHI2, d, e);
    }

    pub fn phi2unsew(&mut self, d: Dart) {
        self.base.involution_unsew(PHI2, d);
    }

    // ------------------------------------------------------------------
    // Map1 level
    // ------------------------------------------------------------------

    /// New open face of `n` darts, every embedded orbit gets fresh cells.
    pub fn new_cycle(&mut self, n: usize) -> Dart {
        let d = ops2::new_cycle(&mut self.base, n);
        let darts = ops2::cycle(&self.base, d);
        self.repair_embeddings(&darts);
        d
    }

    /// Deletes the darts of the `phi1` cycle of `d`, unsewing them from
    /// their neighbours first.
    pub fn delete_cycle(&mut self, d: Dart) {
        let mut seeds = Vec::new();
        for e in ops2::cycle(&self.base, d) {
            let o = self.phi2(e);
            if o != e {
                self.base.involution_unsew(PHI2, e);
                seeds.push(o);
            }
        }
        ops2::delete_cycle(&mut self.base, d);
        self.after_edit(&seeds);
    }

    pub fn cycle_degree(&self, d: Dart) -> usize {
        ops2::cycle_degree(&self.base, d)
    }

    // ------------------------------------------------------------------
    // Topological operators
    // ------------------------------------------------------------------

    /// New face of `n` edges. With `with_boundary` it is closed by a
    /// boundary face, so the map stays closed.
    pub fn new_face(&mut self, n: usize, with_boundary: bool) -> Dart {
        let d = ops2::new_face(&mut self.base, n, if with_boundary { BOUNDARY2 } else { 0 });
        let mut darts: Vec<Dart> = ops2::cycle(&self.base, d).into_vec();
        if with_boundary {
            darts.extend(ops2::cycle(&self.base, self.phi2(d)));
        }
        self.repair_embeddings(&darts);
        d
    }

    /// Deletes the face of `d`. In a closed map the hole is absorbed into
    /// the surrounding boundary.
    pub fn delete_face(&mut self, d: Dart) {
        assert!(!self.is_boundary_marked(d), "deleting a boundary face");
        let face = ops2::cycle(&self.base, d);
        let seeds: Vec<Dart> = face
            .iter()
            .map(|&e| self.phi2(e))
            .filter(|&o| !face.contains(&o))
            .collect();
        if face.iter().any(|&e| self.is_phi2_fixed(e)) {
            for &e in &face {
                if !self.is_phi2_fixed(e) {
                    self.base.involution_unsew(PHI2, e);
                }
            }
            ops2::delete_cycle(&mut self.base, d);
        } else {
            for &e in &face {
                if !self.is_boundary_edge(e) {
                    ops2::unsew_faces(&mut self.base, e, BOUNDARY2);
                }
            }
            let dd = self.phi2(d);
            ops2::delete_cycle(&mut self.base, d);
            ops2::delete_cycle(&mut self.base, dd);
        }
        self.after_edit(&seeds);
    }

    /// Inserts a vertex in the edge of `d`. Returns the new dart following
    /// `d` in its face.
    pub fn cut_edge(&mut self, d: Dart) -> Dart {
        let nd = ops2::cut_edge(&mut self.base, d);
        self.after_edit(&[d, nd]);
        nd
    }

    /// Removes the degree-2 vertex at the end of `d`. Returns `false`, doing
    /// nothing, when that vertex has another degree.
    pub fn uncut_edge(&mut self, d: Dart) -> bool {
        if self.vertex_degree(self.phi1(d)) != 2 {
            return false;
        }
        ops2::uncut_edge(&mut self.base, d);
        self.after_edit(&[d]);
        true
    }

    /// Rotates the edge of `d` one step forward inside its two faces.
    /// Boundary edges are not flipped.
    pub fn flip_edge(&mut self, d: Dart) -> bool {
        if self.is_boundary_edge(d) {
            return false;
        }
        let e = self.phi2(d);
        let seeds = [d, e, self.phi_1(d), self.phi_1(e), self.phi1(d), self.phi1(e)];
        ops2::flip_edge(&mut self.base, d);
        forget(self, Orbit::Vertex, &[d, e]);
        self.after_edit(&seeds);
        true
    }

    /// Rotates the edge of `d` one step backward inside its two faces.
    pub fn flip_back_edge(&mut self, d: Dart) -> bool {
        if self.is_boundary_edge(d) {
            return false;
        }
        let e = self.phi2(d);
        let seeds = [d, e, self.phi_1(d), self.phi_1(e), self.phi1(d), self.phi1(e)];
        ops2::flip_back_edge(&mut self.base, d);
        forget(self, Orbit::Vertex, &[d, e]);
        self.after_edit(&seeds);
        true
    }

    /// Splits the face of `d` and `e` by an edge joining their vertices.
    /// Returns the new dart that lies in the face of `d`.
    pub fn split_face(&mut self, d: Dart, e: Dart) -> Dart {
        assert!(d != e && self.same_face(d, e), "split_face needs two darts of one face");
        let x = ops2::split_face(&mut self.base, d, e);
        let y = self.phi2(x);
        self.repair_embeddings(&[x, y]);
        x
    }

    /// Removes the edge of `d`, merging its two faces. Returns `false` on a
    /// boundary edge.
    pub fn merge_faces(&mut self, d: Dart) -> bool {
        if self.is_boundary_edge(d) {
            return false;
        }
        let e = self.phi2(d);
        let seeds = [self.phi_1(d), self.phi_1(e)];
        ops2::merge_faces(&mut self.base, d);
        self.after_edit(&seeds);
        true
    }

    /// Sews the faces of `d` and `e` along their edges. With `with_boundary`
    /// both darts must face closing faces, which are merged and trimmed.
    pub fn sew_faces(&mut self, d: Dart, e: Dart, with_boundary: bool) {
        let mut seeds = vec![d, e];
        if with_boundary {
            let (dd, ee) = (self.phi2(d), self.phi2(e));
            seeds.extend([self.phi_1(dd), self.phi_1(ee), self.phi1(dd), self.phi1(ee)]);
        }
        ops2::sew_faces(&mut self.base, d, e, if with_boundary { BOUNDARY2 } else { 0 });
        self.after_edit(&seeds);
    }

    /// Unsews the edge of `d`. With `with_boundary` both sides get closing
    /// darts linked into the boundary around them.
    pub fn unsew_faces(&mut self, d: Dart, with_boundary: bool) {
        let dd = self.phi2(d);
        debug_assert_ne!(dd, d, "unsewing an open edge");
        let mut seeds = vec![d, dd, self.phi1(d), self.phi1(dd)];
        if with_boundary {
            debug_assert!(!self.is_boundary_edge(d), "unsewing a boundary edge");
            if let Some((e, ee)) = ops2::unsew_faces(&mut self.base, d, BOUNDARY2) {
                seeds.extend([e, ee]);
            }
        } else {
            ops2::unsew_faces(&mut self.base, d, 0);
        }
        self.after_edit(&seeds);
    }

    /// Deletes the vertex of `d`, merging its incident faces. Returns a dart
    /// of the merged face, or `None` for a boundary vertex.
    pub fn delete_vertex(&mut self, d: Dart) -> Option<Dart> {
        if self.is_boundary_vertex(d) {
            return None;
        }
        let seeds: Vec<Dart> = self
            .orbit_darts(Orbit::Vertex, d)
            .iter()
            .map(|&v| self.phi1(v))
            .collect();
        let res = ops2::delete_vertex(&mut self.base, d);
        self.after_edit(&seeds);
        (!res.is_nil()).then_some(res)
    }

    /// Fills the hole bordered by the unsewn dart `d` with a new face.
    /// With `for_boundary` the face is a closing face.
    pub fn close_hole(&mut self, d: Dart, for_boundary: bool) -> Dart {
        assert!(self.is_phi2_fixed(d), "close_hole needs an unsewn dart");
        let first = ops2::close_hole(&mut self.base, d, if for_boundary { BOUNDARY2 } else { 0 });
        let face = ops2::cycle(&self.base, first);
        self.repair_embeddings(&face);
        log::debug!("closed a hole of {} edges", face.len());
        first
    }

    /// Closes every hole with a boundary face. Returns the number of holes.
    pub fn close_map(&mut self) -> usize {
        let darts: Vec<Dart> = self.darts().collect();
        let mut holes = 0;
        for d in darts {
            if self.is_phi2_fixed(d) {
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
                touched.extend([d, self.phi1(d), self.phi_1(d), self.phi2(d)]);
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
        e == d || e == self.phi2(d)
    }

    pub fn same_face(&self, d: Dart, e: Dart) -> bool {
        self.same_orbit(Orbit::Face, d, e)
    }

    /// Number of edges incident to the vertex of `d`; an open vertex counts
    /// its last unsewn edge too.
    pub fn vertex_degree(&self, d: Dart) -> usize {
        let mut n = 0;
        let open = ops2::foreach_dart_of_vertex(&self.base, d, |_| n += 1);
        n + usize::from(open.is_some())
    }

    /// Whether the vertex of `d` touches a closing face or an unsewn edge.
    pub fn is_boundary_vertex(&self, d: Dart) -> bool {
        let mut boundary = false;
        let open = ops2::foreach_dart_of_vertex(&self.base, d, |e| {
            boundary |= self.is_boundary_marked(e);
        });
        boundary || open.is_some()
    }

    /// A closing-face dart leaving the vertex of `d`.
    pub fn find_boundary_edge_of_vertex(&self, d: Dart) -> Option<Dart> {
        ops2::find_boundary_edge_of_vertex(&self.base, BOUNDARY2, d)
    }

    pub fn is_boundary_edge(&self, d: Dart) -> bool {
        let e = self.phi2(d);
        e == d || self.is_boundary_marked(d) || self.is_boundary_marked(e)
    }

    pub fn face_degree(&self, d: Dart) -> usize {
        ops2::cycle_degree(&self.base, d)
    }

    /// Whether the face of `d` has an edge on the boundary.
    pub fn is_boundary_face(&self, d: Dart) -> bool {
        ops2::cycle(&self.base, d).iter().any(|&e| {
            let o = self.phi2(e);
            o == e || self.is_boundary_marked(o)
        })
    }

    pub fn is_triangle(&self, d: Dart) -> bool {
        self.phi1(self.phi1(self.phi1(d))) == d
    }

    /// Global consistency pass; see [`CheckReport`].
    pub fn check(&self) -> CheckReport {
        Checker::new(self)
            .permutation("phi1", |m, d| m.phi1(d), |m, d| m.phi_1(d))
            .permutation("phi_1", |m, d| m.phi_1(d), |m, d| m.phi1(d))
            .involution("phi2", |m, d| m.phi2(d))
            .boundary(|m, d| m.phi2(d))
            .embeddings()
            .finish()
    }
}
