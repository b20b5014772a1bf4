//! Generalized 3-maps: generalized 2-map volumes glued dart by dart by the
//! involution `beta3`.
//!
//! `phi3 = beta3 o beta0`; as for [`super::map3::Map3`], sewn faces run in
//! opposite directions. Operators read the orientation from the darts they
//! are given: `phi1` of `d` and of `beta0(d)` walk a face in opposite ways.

use hashbrown::HashSet;

use super::base::{BOUNDARY3, MapBase, MapConfig};
use super::beta::{self, BETA0, BETA1, BETA2, BETA3};
use super::{MapTopology, OrbitDarts, Phi2Map, foreach_generated};
use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;
use crate::topology::validation::{CheckReport, Checker};

const RELATIONS: &[&str] = &["beta0", "beta1", "beta2", "beta3"];

#[derive(Debug)]
pub struct GMap3 {
    base: MapBase,
}

impl Default for GMap3 {
    fn default() -> Self {
        Self::new()
    }
}

impl MapTopology for GMap3 {
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

    fn foreach_dart_of_orbit<F: FnMut(Dart)>(&self, orbit: Orbit, d: Dart, f: F) {
        let gens: &[usize] = match orbit {
            Orbit::Dart => &[],
            Orbit::Vertex => &[BETA1, BETA2, BETA3],
            Orbit::Edge => &[BETA0, BETA2, BETA3],
            Orbit::Face => &[BETA0, BETA1, BETA3],
            Orbit::Volume => &[BETA0, BETA1, BETA2],
        };
        foreach_generated(
            d,
            |x, out: &mut OrbitDarts| out.extend(gens.iter().map(|&i| self.base.relation(i, x))),
            f,
        );
    }
}

impl Phi2Map for GMap3 {
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

    #[inline]
    fn phi3(&self, d: Dart) -> Dart {
        beta::phi_through(&self.base, BETA3, d)
    }
}

impl GMap3 {
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

    #[inline]
    pub fn beta3(&self, d: Dart) -> Dart {
        self.base.relation(BETA3, d)
    }

    #[inline]
    pub fn alpha2(&self, d: Dart) -> Dart {
        self.phi3(self.phi2(d))
    }

    // ------------------------------------------------------------------
    // Raw construction
    // ------------------------------------------------------------------

    pub fn new_dart(&mut self) -> Dart {
        self.base.new_dart()
    }

    pub fn beta_sew(&mut self, i: usize, d: Dart, e: Dart) {
        assert!(i <= BETA3, "no involution beta{i}");
        self.base.involution_sew(i, d, e);
    }

    pub fn beta_unsew(&mut self, i: usize, d: Dart) {
        assert!(i <= BETA3, "no involution beta{i}");
        self.base.involution_unsew(i, d);
    }

    /// Sews the edges of the oriented darts `d` and `e` so that
    /// `phi2(d) == e`.
    pub fn phi2sew(&mut self, d: Dart, e: Dart) {
        beta::phi2sew(&mut self.base, d, e);
    }

    pub fn phi2unsew(&mut self, d: Dart) {
        beta::unsew_edge(&mut self.base, BETA2, d);
    }

    /// Sews the edges of the oriented darts `d` and `e` so that
    /// `phi3(d) == e`.
    pub fn phi3sew(&mut self, d: Dart, e: Dart) {
        beta::phi3sew(&mut self.base, d, e);
    }

    pub fn phi3unsew(&mut self, d: Dart) {
        beta::unsew_edge(&mut self.base, BETA3, d);
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Pyramid over an `n`-gon. Returns an oriented dart of the base face.
    pub fn new_pyramid(&mut self, n: usize) -> Dart {
        assert!(n >= 3, "a pyramid needs a base of at least 3 edges");
        let base = beta::new_cycle(&mut self.base, n);
        let bottom = beta::oriented_cycle(&self.base, base);
        let sides: Vec<Dart> = (0..n).map(|_| beta::new_cycle(&mut self.base, 3)).collect();
        for i in 0..n {
            beta::phi2sew(&mut self.base, bottom[i], sides[i]);
            let next = self.phi1(sides[(i + 1) % n]);
            let prev = self.phi_1(sides[i]);
            beta::phi2sew(&mut self.base, prev, next);
        }
        self.embed_new_volume(base);
        base
    }

    /// Prism over an `n`-gon. Returns an oriented dart of the bottom face.
    pub fn new_prism(&mut self, n: usize) -> Dart {
        assert!(n >= 3, "a prism needs a base of at least 3 edges");
        let base = beta::new_cycle(&mut self.base, n);
        let top = beta::new_cycle(&mut self.base, n);
        let bottom = beta::oriented_cycle(&self.base, base);
        let top = beta::oriented_cycle(&self.base, top);
        let sides: Vec<Dart> = (0..n).map(|_| beta::new_cycle(&mut self.base, 4)).collect();
        for i in 0..n {
            beta::phi2sew(&mut self.base, bottom[i], sides[i]);
            let next = self.phi1(sides[(i + 1) % n]);
            let prev = self.phi_1(sides[i]);
            beta::phi2sew(&mut self.base, prev, next);
            let up = self.phi1(self.phi1(sides[i]));
            beta::phi2sew(&mut self.base, up, top[(n - i) % n]);
        }
        self.embed_new_volume(base);
        base
    }

    fn embed_new_volume(&mut self, d: Dart) {
        let darts = self.orbit_darts(Orbit::Volume, d);
        self.repair_embeddings(&darts);
    }

    fn new_boundary_cycle(&mut self, n: usize) -> Dart {
        let d = beta::new_cycle(&mut self.base, n);
        for e in beta::face_darts(&self.base, d) {
            self.base.boundary_mark(BOUNDARY3, e);
        }
        d
    }

    // ------------------------------------------------------------------
    // Topological operators
    // ------------------------------------------------------------------

    /// Sews the volumes of `d` and `e` along their faces, with
    /// `phi3(d) == e` afterwards. With `with_boundary` both faces must face
    /// closing volumes, which are merged.
    pub fn sew_volumes(&mut self, d: Dart, e: Dart, with_boundary: bool) {
        assert_eq!(
            self.face_degree(d),
            self.face_degree(e),
            "sewing faces of different degrees"
        );
        let mut seeds: Vec<Dart> = beta::face_darts(&self.base, d).into_vec();
        seeds.extend(beta::face_darts(&self.base, e));
        if with_boundary {
            let dd = self.phi3(d);
            let ee = self.phi3(e);
            debug_assert!(self.is_boundary_marked(dd) && self.is_boundary_marked(ee));
            let (mut fd, mut fe) = (dd, ee);
            loop {
                let fd2 = self.phi2(fd);
                let fe2 = self.phi2(fe);
                if fd2 != fe {
                    beta::unsew_edge(&mut self.base, BETA2, fd);
                    beta::unsew_edge(&mut self.base, BETA2, fe);
                    beta::phi2sew(&mut self.base, fd2, fe2);
                    beta::phi2sew(&mut self.base, fd, fe);
                    seeds.extend([fd2, fe2]);
                }
                beta::unsew_edge(&mut self.base, BETA3, fd);
                beta::unsew_edge(&mut self.base, BETA3, fe);
                fd = self.phi1(fd);
                fe = self.phi_1(fe);
                if fd == dd {
                    break;
                }
            }
            beta::delete_face(&mut self.base, dd);
            beta::delete_face(&mut self.base, ee);
        }
        let ours = beta::face_darts(&self.base, d);
        let theirs = beta::face_darts(&self.base, self.beta0(e));
        for (&x, &y) in ours.iter().zip(theirs.iter()) {
            self.base.involution_sew(BETA3, x, y);
        }
        self.after_edit(&seeds);
    }

    /// Separates the volumes sharing the face of `d`. With `with_boundary`
    /// each side gets a closing face linked into the boundary around it.
    pub fn unsew_volumes(&mut self, d: Dart, with_boundary: bool) {
        let d3 = self.phi3(d);
        debug_assert_ne!(d3, d, "unsewing an open face");
        let mut seeds: Vec<Dart> = beta::face_darts(&self.base, d).into_vec();
        seeds.extend(beta::face_darts(&self.base, d3));
        if with_boundary {
            seeds.extend(self.unsew_volumes_with_boundary(d));
        } else {
            for x in beta::face_darts(&self.base, d) {
                self.base.involution_unsew(BETA3, x);
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
                    beta::unsew_edge(&mut self.base, BETA2, f);
                    beta::phi2sew(&mut self.base, fit_b1, f);
                    beta::phi2sew(&mut self.base, fit_b2, f2);
                    created.extend([f, f2]);
                }
                None => beta::phi2sew(&mut self.base, fit_b1, fit_b2),
            }
            beta::unsew_edge(&mut self.base, BETA3, fit1);
            beta::phi3sew(&mut self.base, fit1, fit_b1);
            beta::phi3sew(&mut self.base, fit2, fit_b2);
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

    /// A closing-volume dart around the edge of the oriented dart `d`.
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

    /// Closes the hole bordered by the faces around the oriented dart `d`
    /// (not sewn by `beta3`) with a new volume. Returns its face count.
    pub fn close_hole(&mut self, d: Dart, for_boundary: bool) -> usize {
        assert_eq!(self.beta3(d), d, "close_hole needs an unsewn dart");
        let mut marked: HashSet<Dart> = HashSet::new();
        let mut faces = vec![d];
        marked.extend(beta::oriented_cycle(&self.base, d));
        let mut created = Vec::new();
        let mut new_darts: HashSet<Dart> = HashSet::new();
        let mut i = 0;
        while i < faces.len() {
            let start = faces[i];
            i += 1;
            let degree = self.face_degree(start);
            let b = beta::new_cycle(&mut self.base, degree);
            created.push(b);
            new_darts.extend(beta::face_darts(&self.base, b));
            let (mut f, mut bit) = (start, b);
            loop {
                let mut e = self.alpha2(f);
                loop {
                    if self.phi3(e) == e {
                        if marked.insert(e) {
                            marked.extend(beta::oriented_cycle(&self.base, e));
                            faces.push(e);
                        }
                        break;
                    }
                    if new_darts.contains(&e) {
                        beta::phi2sew(&mut self.base, e, bit);
                        break;
                    }
                    e = self.alpha2(e);
                }
                beta::phi3sew(&mut self.base, f, bit);
                bit = self.phi_1(bit);
                f = self.phi1(f);
                if f == start {
                    break;
                }
            }
        }
        if for_boundary {
            for &x in &new_darts {
                self.base.boundary_mark(BOUNDARY3, x);
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
            if self.beta3(d) == d {
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
                touched.push(d);
                touched.extend((BETA0..=BETA3).map(|i| self.base.relation(i, d)));
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
        beta::oriented_cycle(&self.base, d).len()
    }

    /// Whether the face of `d` separates a volume from a closing volume.
    pub fn is_boundary_face(&self, d: Dart) -> bool {
        self.is_boundary_marked(d) || self.is_boundary_marked(self.beta3(d))
    }

    /// Whether the volume of `d` has a face on the boundary.
    pub fn is_boundary_volume(&self, d: Dart) -> bool {
        let mut boundary = false;
        self.foreach_dart_of_orbit(Orbit::Volume, d, |x| {
            boundary |= self.is_boundary_marked(self.beta3(x));
        });
        boundary
    }

    pub fn check(&self) -> CheckReport {
        Checker::new(self)
            .involution("beta0", |m, d| m.beta0(d))
            .involution("beta1", |m, d| m.beta1(d))
            .involution("beta2", |m, d| m.beta2(d))
            .involution("beta3", |m, d| m.beta3(d))
            .composite_involution("beta0 o beta2", |m, d| m.beta0(m.beta2(d)))
            .composite_involution("beta0 o beta3", |m, d| m.beta0(m.beta3(d)))
            .composite_involution("beta1 o beta3", |m, d| m.beta1(m.beta3(d)))
            .boundary(|m, d| m.beta3(d))
            .embeddings()
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tetrahedron() {
        let mut m = GMap3::new();
        let d = m.new_pyramid(3);
        assert_eq!(m.nb_darts(), 24);
        assert_eq!(m.phi3(d), d);
        assert_eq!(m.phi2(m.phi2(d)), d);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.open_darts, 24);
        assert_eq!(report.boundary_faces, 0);
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Edge);
        m.add_embedding(Orbit::Face);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 4);
        assert_eq!(m.base().container(Orbit::Edge).size(), 6);
        assert_eq!(m.base().container(Orbit::Face).size(), 4);
    }

    #[test]
    fn hexahedron() {
        let mut m = GMap3::new();
        let d = m.new_prism(4);
        assert_eq!(m.nb_darts(), 48);
        assert_eq!(m.face_degree(d), 4);
        assert!(m.check().is_valid());
        m.add_embedding(Orbit::Vertex);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 8);
    }

    #[test]
    fn close_map_wraps_volume() {
        let mut m = GMap3::new();
        let d = m.new_pyramid(3);
        assert_eq!(m.close_map(), 1);
        assert_eq!(m.nb_darts(), 48);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.open_darts, 0);
        assert_eq!(report.boundary_faces, 4);
        assert!(m.is_boundary_volume(d));
        assert_eq!(m.close_map(), 0);
    }

    #[test]
    fn sew_and_unsew_volumes() {
        let mut m = GMap3::new();
        let a = m.new_pyramid(3);
        let b = m.new_pyramid(3);
        assert_eq!(m.close_map(), 2);
        m.add_embedding(Orbit::Vertex);
        m.add_embedding(Orbit::Face);
        m.sew_volumes(a, b, true);
        assert_eq!(m.phi3(a), b);
        assert_eq!(m.nb_darts(), 84);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 5);
        assert_eq!(m.base().container(Orbit::Face).size(), 7);
        assert!(!m.is_boundary_face(a));
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 6);

        m.unsew_volumes(a, true);
        assert_eq!(m.nb_darts(), 96);
        assert_eq!(m.base().container(Orbit::Vertex).size(), 8);
        assert_eq!(m.base().container(Orbit::Face).size(), 8);
        let report = m.check();
        assert!(report.is_valid(), "{:?}", report.defects);
        assert_eq!(report.boundary_faces, 8);
    }
}
