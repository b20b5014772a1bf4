//! Oriented 3-maps: volumes are closed 2-maps glued face to face by the
//! involution `phi3`.
//!
//! Faces sewn by `phi3` run in opposite directions, so
//! `phi3(phi1(d)) == phi_1(phi3(d))`. Closing volumes added by
//! [`Map3::close_map`] are marked with [`BOUNDARY3`].

use hashbrown::HashSet;

use super::base::{BOUNDARY3, MapBase, MapConfig};
use super::ops2::{self, PHI1, PHI_1, PHI2, PHI3};
use super::{MapTopology, OrbitDarts, Phi2Map, foreach_generated};
use crate::map_error::TopologyDefect;
use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;
use crate::topology::validation::{CheckReport, Checker};

const RELATIONS: &[&str] = &["phi1", "phi_1", "phi2", "phi3"];

#[derive(Debug)]
pub struct Map3 {
    base: MapBase,
}

impl Default for Map3 {
    fn default() -> Self {
        Self::new()
    }
}

impl MapTopology for Map3 {
    const DIMENSION: usize = 3;
    const BOUNDARY: u8 = BOUNDARY3;

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
            Orbit::Vertex => foreach_generated(
                d,
                |x, out: &mut OrbitDarts| {
                    let p = self.phi_1(x);
                    let x2 = self.phi2(x);
                    if x2 != x {
                        out.push(self.phi1(x2));
                    }
                    let p2 = self.phi2(p);
                    if p2 != p {
                        out.push(p2);
                    }
                    let x3 = self.phi3(x);
                    if x3 != x {
                        out.push(self.phi1(x3));
                    }
                    let p3 = self.phi3(p);
                    if p3 != p {
                        out.push(p3);
                    }
                },
                f,
            ),
            Orbit::Edge => foreach_generated(
                d,
                |x, out: &mut OrbitDarts| {
                    out.push(self.phi2(x));
                    out.push(self.phi3(x));
                },
                f,
            ),
            Orbit::Face => {
                for e in ops2::cycle(&self.base, d) {
                    f(e);
                }
                let d3 = self.phi3(d);
                if d3 != d {
                    for e in ops2::cycle(&self.base, d3) {
                        f(e);
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

impl Phi2Map for Map3 {
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

    #[inline]
    fn phi3(&self, d: Dart) -> Dart {
        self.base.relation(PHI3, d)
    }
}

impl Map3 {
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

    // ------------------------------------------------------------------
    // Raw construction
    // ------------------------------------------------------------------

    pub fn new_dart(&mut self) -> Dart {
        self.base.new_dart()
    }

    pub fn phi1sew(&mut self, d: Dart, e: Dart) {
        ops2::phi1sew(&mut self.base, d, e);
    }

    pub fn phi1unsew(&mut self, d: Dart) {
        ops2::phi1unsew(&mut self.base, d);
    }

    pub fn phi2sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(PHI2, d, e);
    }

    pub fn phi2unsew(&mut self, d: Dart) {
        self.base.involution_unsew(PHI2, d);
    }

    /// Links two darts by `phi3`. Both must be fixed points.
    pub fn phi3sew(&mut self, d: Dart, e: Dart) {
        self.base.involution_sew(PHI3, d, e);
    }

    pub fn phi3unsew(&mut self, d: Dart) {
        self.base.involution_unsew(PHI3, d);
    }

    /// Next dart around the edge of `d`, in the next volume.
    #[inline]
    pub fn alpha2(&self, d: Dart) -> Dart {
        self.phi3(self.phi2(d))
    }

    #[inline]
    pub fn alpha_2(&self, d: Dart) -> Dart {
        self.phi2(self.phi3(d))
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Pyramid over an `n`-gon (`n == 3` gives a tetrahedron). Returns a
    /// dart of the base face.
    pub fn new_pyramid(&mut self, n: usize) -> Dart {
        assert!(n >= 3, "a pyramid needs a base of at least 3 edges");
        let base = ops2::new_cycle(&mut self.base, n);
        let bottom = ops2::cycle(&self.base, base);
        let sides: Vec<Dart> = (0..n).map(|_| ops2::new_cycle(&mut self.base, 3)).collect();
        for i in 0..n {
            self.base.involution_sew(PHI2, bottom[i], sides[i]);
            let next = self.phi1(sides[(i + 1) % n]);
            let prev = self.phi_1(sides[i]);
            self.base.involution_sew(PHI2, prev, next);
        }
        self.embed_new_volume(base);
        base
    }

    /// Prism over an `n`-gon (`n == 4` gives a hexahedron). Returns a dart of
    /// the bottom face.
    pub fn new_prism(&mut self, n: usize) -> Dart {
        assert!(n >= 3, "a prism needs a base of at least 3 edges");
        let base = ops2::new_cycle(&mut self.base, n);
        let top = ops2::new_cycle(&mut self.base, n);
        let bottom = ops2::cycle(&self.base, base);
        let top = ops2::cycle(&self.base, top);
        let sides: Vec<Dart> = (0..n).map(|_| ops2::new_cycle(&mut self.base, 4)).collect();
        for i in 0..n {
            self.base.involution_sew(PHI2, bottom[i], sides[i]);
            let next = self.phi1(sides[(i + 1) % n]);
            let prev = self.phi_1(sides[i]);
            self.base.involution_sew(PHI2, prev, next);
            let up = self.phi1(self.phi1(sides[i]));
            self.base.involution_sew(PHI2, up, top[(n - i) % n]);
        }
        self.embed_new_volume(base);
        base
    }

    fn embed_new_volume(&mut self, d: Dart) {
        let darts = self.orbit_darts(Orbit::Volume, d);
        self.repair_embeddings(&darts);
    }

    fn new_boundary_cycle(&mut self, n: usize) -> Dart {
        let d = ops2::new_cycle(&mut self.base, n);
        for e in ops2::cycle(&self.base, d) {
            self.base.boundary_mark(BOUNDARY3, e);
        }
        d
    }

    // ------------------------------------------------------------------
    // Topological operators
    // ------------------------------------------------------------------

    /// Sews the volumes of `d` and `e` along their faces. With
    /// `with_boundary` both faces must face closing volumes, which are merged.
    pub fn sew_volumes(&mut self, d: Dart, e: Dart, with_boundary: bool) {
        assert_eq!(
            self.face_degree(d),
            self.face_degree(e),
            "sewing faces of different degrees"
        );
        let mut seeds: Vec<Dart> = ops2::cycle(&self.base, d).into_vec();
        seeds.extend(ops2::cycle(&self.base, e));
        if with_boundary {
            let dd = self.phi3(d);
            let ee = self.phi3(e);
            debug_assert!(self.is_boundary_marked(dd) && self.is_boundary_marked(ee));
            let (mut fd, mut fe) = (dd, ee);
            loop {
                let fd2 = self.phi2(fd);
                let fe2 = self.phi2(fe);
                if fd2 != fe {
                    self.base.involution_unsew(PHI2, fd);
                    self.base.involution_unsew(PHI2, fe);
                    self.base.involution_sew(PHI2, fd2, fe2);
                    self.base.involution_sew(PHI2, fd, fe);
                    seeds.extend([fd2, fe2]);
                }
                self.base.involution_unsew(PHI3, fd);
                self.base.involution_unsew(PHI3, fe);
                fd = self.phi1(fd);
                fe = self.phi_1(fe);
                if fd == dd {
                    break;
                }
            }
            ops2::delete_cycle(&mut self.base, dd);
            ops2::delete_cycle(&mut self.base, ee);
        }
        let (mut fd, mut fe) = (d, e);
        loop {
            self.base.involution_sew(PHI3, fd, fe);
            fd = self.phi1(fd);
            fe = self.phi_1(fe);
            if fd == d {
                break;
            }
        }
        self.after_edit(&seeds);
    }

    /// Separates the volumes sharing the face of `d`. With `with_boundary`
    /// each side gets a closing face linked into the boundary around it.
    pub fn unsew_volumes(&mut self, d: Dart, with_boundary: bool) {
        let d3 = self.phi3(d);
        debug_assert_ne!(d3, d, "unsewing an open face");
        let mut seeds: Vec<Dart> = ops2::cycle(&self.base, d).into_vec();
        seeds.extend(ops2::cycle(&self.base, d3));
        if with_boundary {
            seeds.extend(self.unsew_volumes_with_boundary(d));
        } else {
            for e in ops2::cycle(&self.base, d) {
                self.base.involution_unsew(PHI3, e);
            }
        }
        self.after_edit(&seeds);
    }

    fn unsew_volumes_with_boundary(&mut self, d: Dart) -> Vec<Dart> {
        let n = self.face_degree(d);
        let d3 = self.phi3(d);
        let b1 = self.new_boundary_cycle(n);
        let b2 = self.new_boundary_cycle(n);
        let mut created = vec![b1, b2];
        let (mut fit1, mut fit2, mut fit_b1, mut fit_b2) = (d, d3, b1, b2);
        loop {
            match self.find_boundary_face_of_edge(fit1) {
                Some(f) => {
                    let f2 = self.phi2(f);
                    self.base.involution_unsew(PHI2, f);
                    self.base.involution_sew(PHI2, fit_b1, f);
                    self.base.involution_sew(PHI2, fit_b2, f2);
                    created.extend([f, f2]);
                }
                None => self.base.involution_sew(PHI2, fit_b1, fit_b2),
            }
            self.base.involution_unsew(PHI3, fit1);
            self.base.involution_sew(PHI3, fit1, fit_b1);
            self.base.involution_sew(PHI3, fit2, fit_b2);
            fit1 = self.phi1(fit1);
            fit2 = self.phi_1(fit2);
            fit_b1 = self.phi_1(fit_b1);
            fit_b2 = self.phi1(fit_b2);
            if fit_b1 == b1 {
                break;
            }
        }
        created
    }

    /// A closing-volume dart around the edge of `d`.
    pub fn find_boundary_face_of_edge(&self, d: Dart) -> Option<Dart> {
        let mut it = d;
        loop {
            if self.is_boundary_marked(it) {
                return Some(it);
            }
            it = self.alpha2(it);
            if it == d {
                return None;
            }
        }
    }

    /// Deletes the volume of `d`. With `with_boundary` its faces are first
    /// unsewn with closing faces, then the volume and its closing shell go.
    pub fn delete_volume(&mut self, d: Dart, with_boundary: bool) {
        assert!(!self.is_boundary_marked(d), "deleting a closing volume");
        let volume = self.orbit_darts(Orbit::Volume, d);
        let seeds: Vec<Dart> = volume
            .iter()
            .map(|&x| self.phi3(x))
            .filter(|&x3| !volume.contains(&x3) && !self.is_boundary_marked(x3))
            .collect();
        if with_boundary {
            for rep in self.face_representatives(&volume) {
                let r3 = self.phi3(rep);
                if r3 != rep && !self.is_boundary_marked(r3) {
                    self.unsew_volumes_with_boundary(rep);
                }
            }
            let shell = self.phi3(d);
            self.delete_connected(d);
            if shell != d && self.is_alive(shell) {
                self.delete_connected(shell);
            }
        } else {
            for &x in &volume {
                if self.phi3(x) != x {
                    self.base.involution_unsew(PHI3, x);
                }
            }
            for &x in &volume {
                self.base.delete_dart(x);
            }
        }
        self.after_edit(&seeds);
    }

    fn face_representatives(&self, darts: &[Dart]) -> Vec<Dart> {
        let mut seen: HashSet<Dart> = HashSet::new();
        let mut reps = Vec::new();
        for &x in darts {
            if seen.insert(x) {
                reps.push(x);
                seen.extend(ops2::cycle(&self.base, x));
            }
        }
        reps
    }

    fn delete_connected(&mut self, d: Dart) {
        for x in self.orbit_darts(Orbit::Volume, d) {
            self.base.delete_dart(x);
        }
    }

    /// Darts of the edge of `d` lying in successive volumes with the
    /// orientation of `d`, plus whether they close a full turn.
    fn radial(&self, d: Dart) -> (Vec<Dart>, bool) {
        let mut forward = vec![d];
        let mut it = d;
        loop {
            let p = self.phi2(it);
            let n = self.phi3(p);
            if n == p {
                break;
            }
            if n == d {
                return (forward, true);
            }
            forward.push(n);
            it = n;
        }
        let mut backward = Vec::new();
        let mut it = d;
        loop {
            let q = self.phi3(it);
            if q == it {
                break;
            }
            it = self.phi2(q);
            backward.push(it);
        }
        backward.reverse();
        backward.extend(forward);
        (backward, false)
    }

    /// Inserts a vertex in the edge of `d`, in every face around it. Returns
    /// the new dart following `d`.
    pub fn cut_edge(&mut self, d: Dart) -> Dart {
        let (darts, _) = self.radial(d);
        for &x in &darts {
            ops2::cut_edge(&mut self.base, x);
        }
        for &x in &darts {
            let x3 = self.phi3(x);
            if x3 == x {
                continue;
            }
            self.base.involution_unsew(PHI3, x);
            let (n3, nx) = (self.phi1(x3), self.phi1(x));
            self.base.involution_sew(PHI3, x, n3);
            self.base.involution_sew(PHI3, x3, nx);
        }
        let seeds: Vec<Dart> = darts
            .iter()
            .flat_map(|&x| [x, self.phi1(x), self.phi2(x)])
            .collect();
        self.after_edit(&seeds);
        self.phi1(d)
    }

    /// Removes the degree-2 vertex at the end of `d` in every face around
    /// the edge. Returns `false` when that vertex has another degree.
    pub fn uncut_edge(&mut self, d: Dart) -> bool {
        if self.vertex_degree(self.phi1(d)) != 2 {
            return false;
        }
        let (darts, closed) = self.radial(d);
        for &x in &darts {
            let nx = self.phi1(x);
            for y in [x, nx, self.phi2(x), self.phi2(nx)] {
                if self.phi3(y) != y {
                    self.base.involution_unsew(PHI3, y);
                }
            }
        }
        for &x in &darts {
            ops2::uncut_edge(&mut self.base, x);
        }
        let k = darts.len();
        let links = if closed { k } else { k - 1 };
        for i in 0..links {
            let x2 = self.phi2(darts[i]);
            self.base.involution_sew(PHI3, x2, darts[(i + 1) % k]);
        }
        let seeds: Vec<Dart> = darts.iter().flat_map(|&x| [x, self.phi2(x)]).collect();
        self.after_edit(&seeds);
        true
    }

    /// Splits the face of `d` and `e` on both of its sides. Returns the new
    /// dart lying in the face of `d`.
    pub fn split_face(&mut self, d: Dart, e: Dart) -> Dart {
        assert!(
            d != e && ops2::cycle(&self.base, d).contains(&e),
            "split_face needs two darts of one face"
        );
        let d3 = self.phi3(d);
        let sewn = d3 != d;
        let (dd, ee) = (self.phi1(d3), self.phi1(self.phi3(e)));
        let x = ops2::split_face(&mut self.base, d, e);
        let mut seeds = vec![x, self.phi2(x)];
        if sewn {
            let x2 = ops2::split_face(&mut self.base, dd, ee);
            seeds.extend([x2, self.phi2(x2)]);
            let (a, b) = (self.phi_1(d), self.phi_1(ee));
            self.base.involution_sew(PHI3, a, b);
            let (a, b) = (self.phi_1(e), self.phi_1(dd));
            self.base.involution_sew(PHI3, a, b);
        }
        self.after_edit(&seeds);
        x
    }

    /// Closes the hole bordered by the faces around `d` (a `phi3` fixed
    /// point) with a new volume. Returns the number of faces it has.
    pub fn close_hole(&mut self, d: Dart, for_boundary: bool) -> usize {
        assert_eq!(self.phi3(d), d, "close_hole needs an unsewn dart");
        let mut marked: HashSet<Dart> = HashSet::new();
        let mut faces = vec![d];
        marked.extend(ops2::cycle(&self.base, d));
        let mut created = Vec::new();
        let mut new_darts: HashSet<Dart> = HashSet::new();
        let mut i = 0;
        while i < faces.len() {
            let start = faces[i];
            i += 1;
            let degree = self.face_degree(start);
            let b = ops2::new_cycle(&mut self.base, degree);
            created.push(b);
            new_darts.extend(ops2::cycle(&self.base, b));
            let (mut f, mut bit) = (start, b);
            loop {
                let mut e = self.alpha2(f);
                loop {
                    if self.phi3(e) == e {
                        if marked.insert(e) {
                            marked.extend(ops2::cycle(&self.base, e));
                            faces.push(e);
                        }
                        break;
                    }
                    if new_darts.contains(&e) {
                        self.base.involution_sew(PHI2, e, bit);
                        break;
                    }
                    e = self.alpha2(e);
                }
                self.base.involution_sew(PHI3, f, bit);
                bit = self.phi_1(bit);
                f = self.phi1(f);
                if f == start {
                    break;
                }
            }
        }
        if for_boundary {
            for &c in &created {
                for x in ops2::cycle(&self.base, c) {
                    self.base.boundary_mark(BOUNDARY3, x);
                }
            }
        }
        let seeds: Vec<Dart> = new_darts.into_iter().collect();
        self.repair_embeddings(&seeds);
        log::debug!("closed a volume hole with {} faces", created.len());
        created.len()
    }

    /// Closes every hole with a closing volume. Returns the number of holes.
    pub fn close_map(&mut self) -> usize {
        let darts: Vec<Dart> = self.darts().collect();
        let mut holes = 0;
        for d in darts {
            if self.phi3(d) == d {
                self.close_hole(d, true);
                holes += 1;
            }
        }
        log::debug!("close_map: {holes} holes closed");
        holes
    }

    fn after_edit(&mut self, seeds: &[Dart]) {
        let mut touched = Vec::with_capacity(seeds.len() * 5);
        for &d in seeds {
            if self.is_alive(d) {
                touched.extend([d, self.phi1(d), self.phi_1(d), self.phi2(d), self.phi3(d)]);
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

    pub fn face_degree(&self, d: Dart) -> usize {
        ops2::cycle_degree(&self.base, d)
    }

    /// Number of edges incident to the vertex of `d`.
    pub fn vertex_degree(&self, d: Dart) -> usize {
        let mut seen: HashSet<Dart> = HashSet::new();
        let mut n = 0;
        self.foreach_dart_of_orbit(Orbit::Vertex, d, |v| {
            if !seen.contains(&v) {
                n += 1;
                self.foreach_dart_of_orbit(Orbit::Edge, v, |e| {
                    seen.insert(e);
                });
            }
        });
        n
    }

    /// Number of faces incident to the edge of `d`.
    pub fn edge_degree(&self, d: Dart) -> usize {
        self.orbit_darts(Orbit::Edge, d)
            .iter()
            .filter(|&&e| {
                let e3 = self.phi3(e);
                e3 == e || e.index() < e3.index()
            })
            .count()
    }

    /// Whether the face of `d` separates a volume from a closing volume.
    pub fn is_boundary_face(&self, d: Dart) -> bool {
        self.is_boundary_marked(d) || self.is_boundary_marked(self.phi3(d))
    }

    /// Whether the volume of `d` has a face on the boundary.
    pub fn is_boundary_volume(&self, d: Dart) -> bool {
        let mut boundary = false;
        self.foreach_dart_of_orbit(Orbit::Volume, d, |x| {
            boundary |= self.is_boundary_marked(self.phi3(x));
        });
        boundary
    }

    pub fn is_boundary_vertex(&self, d: Dart) -> bool {
        let mut boundary = false;
        self.foreach_dart_of_orbit(Orbit::Vertex, d, |x| {
            boundary |= self.is_boundary_marked(x) || self.phi3(x) == x;
        });
        boundary
    }

    pub fn check(&self) -> CheckReport {
        Checker::new(self)
            .permutation("phi1", |m, d| m.phi1(d), |m, d| m.phi_1(d))
            .permutation("phi_1", |m, d| m.phi_1(d), |m, d| m.phi1(d))
            .involution("phi2", |m, d| m.phi2(d))
            .involution("phi3", |m, d| m.phi3(d))
            .each(|m, d| {
                let d3 = m.phi3(d);
                (d3 != d && m.phi3(m.phi1(d)) != m.phi_1(d3))
                    .then_some(TopologyDefect::MisalignedFaces { dart: d })
            })
            .boundary(|m, d| m.phi3(d))
            .embeddings()
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::nb_cells;

    fn closed_pair() -> (Map3, Dart, Dart) {
        let mut m = Map3::new();
        let a = m.new_pyramid(3);
        let b = m.new_pyramid(3);
        assert_eq!(m.close_map(), 2);
        m.sew_volumes(a, b, true);
        (m, a, b)
    }

    #[test]
    fn tetrahedron_is_closed_volume() {
        let mut m = Map3::new();
        let d = m.new_pyramid(3);
        assert_eq!(m.nb_darts(), 12);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 0);
        assert_eq!(report.open_darts, 12);
        assert!(m.darts().all(|x| !m.is_boundary_volume(x)));
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Edge);
        m.add_embedding(Orbit::Face);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 4);
        assert_eq!(m.base().container(Orbit::Edge).size(), 6);
        assert_eq!(m.base().container(Orbit::Face).size(), 4);
        assert_eq!(m.vertex_degree(d), 3);
        assert_eq!(m.edge_degree(d), 2);
    }

    #[test]
    fn prism_counts() {
        let mut m = Map3::new();
        let d = m.new_prism(4);
        assert_eq!(m.nb_darts(), 24);
        assert!(m.check().is_valid());
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Face);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 8);
        assert_eq!(m.base().container(Orbit::Face).size(), 6);
        assert_eq!(m.vertex_degree(d), 3);
    }

    #[test]
    fn close_map_wraps_volume() {
        let mut m = Map3::new();
        let d = m.new_pyramid(3);
        assert_eq!(m.close_map(), 1);
        assert_eq!(m.nb_darts(), 24);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.open_darts, 0);
        assert_eq!(report.boundary_faces, 4);
        assert!(m.is_boundary_volume(d));
        assert!(m.is_boundary_face(d));
        assert_eq!(m.close_map(), 0);
    }

    #[test]
    fn sew_and_unsew_volumes() {
        let mut m = Map3::new();
        let a = m.new_pyramid(3);
        let b = m.new_pyramid(3);
        m.close_map();
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Face);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 8);
        m.sew_volumes(a, b, true);
        assert_eq!(m.nb_darts(), 42);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 5);
        assert_eq!(m.base().container(Orbit::Face).size(), 7);
        assert!(m.same_face(a, b));
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 6);
        assert!(!m.is_boundary_face(a));

        m.unsew_volumes(a, true);
        assert_eq!(m.nb_darts(), 48);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 8);
        assert_eq!(m.base().container(Orbit::Face).size(), 8);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 8);
    }

    #[test]
    fn radial_cut_edge() {
        let (mut m, a, _) = closed_pair();
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Edge);
        let edges = m.base().container(Orbit::Edge).size();
        let nd = m.cut_edge(a);
        assert_eq!(m.phi1(a), nd);
        assert_eq!(m.vertex_degree(nd), 2);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 6);
        assert_eq!(m.base().container(Orbit::Edge).size(), edges + 1);
        assert!(m.check().is_valid());
        assert!(m.uncut_edge(a));
        assert_eq!(m.base().container(Orbit::Vertex).size(), 5);
        assert_eq!(m.base().container(Orbit::Edge).size(), edges);
        assert!(m.check().is_valid());
    }

    #[test]
    fn cut_open_edge() {
        let mut m = Map3::new();
        let d = m.new_pyramid(3);
        let nd = m.cut_edge(d);
        assert_eq!(m.face_degree(d), 4);
        assert_eq!(m.face_degree(m.phi2(d)), 4);
        assert_eq!(m.vertex_degree(nd), 2);
        assert!(m.check().is_valid());
    }

    #[test]
    fn split_face_on_both_sides() {
        let mut m = Map3::new();
        let d = m.new_prism(4);
        m.close_map();
        m.add_embedding(Orbit::Face);
        let e = m.phi1(m.phi1(d));
        let x = m.split_face(d, e);
        assert!(m.same_face(x, d));
        assert!(m.same_face(m.phi3(x), x));
        assert_eq!(m.face_degree(d), 3);
        assert_eq!(m.base().container(Orbit::Face).size(), 7);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
    }

    #[test]
    fn cutting_a_border_edge_keeps_one_volume() {
        let mut m = Map3::new();
        let d = m.new_pyramid(3);
        m.close_map();
        let nd = m.cut_edge(d);
        let shell = m.phi3(nd);
        assert!(m.is_boundary_marked(shell));
        assert!(m.orbit_darts(Orbit::Volume, shell).iter().all(|&x| m.is_boundary_marked(x)));
        assert_eq!(nb_cells(&m, Orbit::Volume), 1);
        assert_eq!(nb_cells(&m, Orbit::Vertex), 5);
        assert_eq!(nb_cells(&m, Orbit::Face), 4);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 4);
    }

    #[test]
    fn splitting_a_border_face_keeps_one_volume() {
        let mut m = Map3::new();
        let d = m.new_prism(4);
        m.close_map();
        let e = m.phi1(m.phi1(d));
        m.split_face(d, e);
        let shell = m.phi3(d);
        assert!(m.orbit_darts(Orbit::Volume, shell).iter().all(|&x| m.is_boundary_marked(x)));
        assert_eq!(nb_cells(&m, Orbit::Volume), 1);
        assert_eq!(nb_cells(&m, Orbit::Face), 7);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 7);
    }

    #[test]
    fn delete_volume_keeps_neighbour_closed() {
        let (mut m, a, b) = closed_pair();
        m.add_embedding(Orbit::Vertex);
        m.delete_volume(a, true);
        assert_eq!(m.nb_darts(), 24);
        assert!(m.is_alive(b));
        assert!(m.is_boundary_face(b));
        assert_eq!(m.base().container(Orbit::Vertex).size(), 4);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 4);
    }
}
