//! Combinatorial and generalized maps.
//!
//! Every map kind stores its relations in a [`MapBase`] and exposes them
//! through two traits:
//! - [`MapTopology`]: orbits, boundary marks, embeddings and attributes;
//! - [`Phi2Map`]: the `phi1`/`phi_1`/`phi2`/`phi3` view that traversors use.
//!   Generalized maps derive it from their `beta` involutions.

pub mod base;
pub(crate) mod beta;
pub mod embedding;
pub mod gmap2;
pub mod gmap3;
pub mod map2;
pub mod map3;
pub(crate) mod ops2;

use smallvec::SmallVec;

use crate::data::handler::AttributeHandler;
use crate::data::multi_vector::AttributeValue;
use crate::map_error::MapError;
use crate::topology::dart::Dart;
use crate::topology::orbit::Orbit;

pub use base::{BOUNDARY2, BOUNDARY3, MapBase, MapConfig};

/// Inline capacity of orbit dart lists.
pub const ORBIT_INLINE: usize = 16;

/// Darts of one orbit.
pub type OrbitDarts = SmallVec<[Dart; ORBIT_INLINE]>;

/// Storage, orbits and embeddings common to every map kind.
pub trait MapTopology {
    /// Dimension of the cells the map is made of (2 for surfaces).
    const DIMENSION: usize;
    /// Boundary flag of this dimension.
    const BOUNDARY: u8;

    fn base(&self) -> &MapBase;
    fn base_mut(&mut self) -> &mut MapBase;

    /// Calls `f` once for every dart of the `orbit` of `d`, `d` first.
    fn foreach_dart_of_orbit<F: FnMut(Dart)>(&self, orbit: Orbit, d: Dart, f: F);

    fn nb_darts(&self) -> usize {
        self.base().nb_darts()
    }

    /// Live darts in increasing index order.
    fn darts(&self) -> impl Iterator<Item = Dart> + '_ {
        self.base().darts().rows().map(Dart::new)
    }

    fn is_alive(&self, d: Dart) -> bool {
        self.base().is_alive(d)
    }

    fn orbit_darts(&self, orbit: Orbit, d: Dart) -> OrbitDarts {
        let mut v = OrbitDarts::new();
        self.foreach_dart_of_orbit(orbit, d, |e| v.push(e));
        v
    }

    fn orbit_size(&self, orbit: Orbit, d: Dart) -> usize {
        let mut n = 0;
        self.foreach_dart_of_orbit(orbit, d, |_| n += 1);
        n
    }

    fn same_orbit(&self, orbit: Orbit, d: Dart, e: Dart) -> bool {
        if self.is_orbit_embedded(orbit) && orbit != Orbit::Dart {
            let (a, b) = (self.embedding(orbit, d), self.embedding(orbit, e));
            if a != crate::topology::orbit::EMBNULL && b != crate::topology::orbit::EMBNULL {
                return a == b;
            }
        }
        let mut found = false;
        self.foreach_dart_of_orbit(orbit, d, |x| found |= x == e);
        found
    }

    /// Whether `d` belongs to a closing cell of the map's own dimension.
    fn is_boundary_marked(&self, d: Dart) -> bool {
        self.base().is_boundary_marked(Self::BOUNDARY, d)
    }

    /// Whether `d` represents a closing cell of `orbit`: closing faces of a
    /// 2-map, closing volumes of a 3-map.
    fn is_boundary_cell(&self, orbit: Orbit, d: Dart) -> bool {
        orbit.dimension() == Some(Self::DIMENSION) && self.is_boundary_marked(d)
    }

    // ------------------------------------------------------------------
    // Embeddings
    // ------------------------------------------------------------------

    fn is_orbit_embedded(&self, orbit: Orbit) -> bool {
        self.base().is_orbit_embedded(orbit)
    }

    /// Row of the `orbit` cell of `d`, or `EMBNULL`.
    fn embedding(&self, orbit: Orbit, d: Dart) -> u32 {
        self.base().embedding(orbit, d)
    }

    fn try_embedding(&self, orbit: Orbit, d: Dart) -> Result<u32, MapError> {
        if self.is_orbit_embedded(orbit) {
            Ok(self.embedding(orbit, d))
        } else {
            Err(MapError::OrbitNotEmbedded(orbit))
        }
    }

    /// Embeds `orbit` and gives every existing cell its own row.
    fn add_embedding(&mut self, orbit: Orbit) {
        if self.base_mut().add_embedding_column(orbit) {
            embedding::init_all_orbits_embedding(self, orbit);
        }
    }

    /// Points every dart of the `orbit` of `d` at `row`.
    fn set_orbit_embedding(&mut self, orbit: Orbit, d: Dart, row: u32) {
        embedding::set_orbit_embedding(self, orbit, d, row);
    }

    /// Gives the `orbit` of `d` a fresh default-initialized row.
    fn set_orbit_embedding_on_new_cell(&mut self, orbit: Orbit, d: Dart) -> u32 {
        embedding::new_cell(self, orbit, d)
    }

    /// Embeds every dart still carrying `EMBNULL`, one new row per orbit.
    fn init_all_orbits_embedding(&mut self, orbit: Orbit) {
        embedding::init_all_orbits_embedding(self, orbit);
    }

    /// Copies every attribute value of cell `src` into cell `dst`.
    fn copy_cell(&mut self, orbit: Orbit, dst: Dart, src: Dart) {
        let (a, b) = (self.embedding(orbit, dst), self.embedding(orbit, src));
        if a != crate::topology::orbit::EMBNULL && b != crate::topology::orbit::EMBNULL {
            self.base_mut().container_mut(orbit).copy_line(a, b);
        }
    }

    /// Makes sure distinct orbits use distinct rows, copying shared rows.
    fn bijective_orbit_embedding(&mut self, orbit: Orbit) {
        embedding::bijective_orbit_embedding(self, orbit);
    }

    /// Restores embedding consistency around `touched` darts after a
    /// topological edit.
    fn repair_embeddings(&mut self, touched: &[Dart]) {
        embedding::repair(self, touched);
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Adds a named attribute on `ORBIT` cells, embedding the orbit if needed.
    fn add_attribute<T: AttributeValue, const ORBIT: usize>(
        &mut self,
        name: &str,
    ) -> Result<AttributeHandler<T, ORBIT>, MapError> {
        let orbit = Orbit::from_index(ORBIT);
        self.add_embedding(orbit);
        let index = self.base_mut().container_mut(orbit).add_attribute::<T>(name)?;
        let generation = self.base().container(orbit).generation(index).unwrap_or(0);
        Ok(AttributeHandler::new(index, generation))
    }

    /// Looks up an attribute by name and type.
    fn get_attribute<T: AttributeValue, const ORBIT: usize>(
        &self,
        name: &str,
    ) -> Result<AttributeHandler<T, ORBIT>, MapError> {
        let c = self.base().container(Orbit::from_index(ORBIT));
        let (index, _) = c.attribute_by_name::<T>(name)?;
        Ok(AttributeHandler::new(index, c.generation(index).unwrap_or(0)))
    }

    /// Removes the attribute behind `handler`. Stale handlers are ignored.
    fn remove_attribute<T: AttributeValue, const ORBIT: usize>(
        &mut self,
        handler: &AttributeHandler<T, ORBIT>,
    ) -> bool {
        handler.is_valid(self)
            && self
                .base_mut()
                .container_mut(Orbit::from_index(ORBIT))
                .remove_attribute(handler.index())
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Renumbers darts and cell rows densely.
    fn compact(&mut self) {
        self.base_mut().compact();
    }

    /// Allows markers on `n` more threads.
    fn add_thread_marker(&mut self, n: usize) {
        self.base_mut().markers_mut().add_threads(n);
    }

    fn nb_thread_markers(&self) -> usize {
        self.base().markers().nb_threads()
    }
}

/// The permutation view of a map.
pub trait Phi2Map: MapTopology {
    fn phi1(&self, d: Dart) -> Dart;
    fn phi_1(&self, d: Dart) -> Dart;
    fn phi2(&self, d: Dart) -> Dart;

    /// Volume adjacency. Surfaces have none: every dart is a fixed point.
    fn phi3(&self, d: Dart) -> Dart {
        d
    }

    /// Next dart around the vertex of `d`.
    #[inline]
    fn alpha1(&self, d: Dart) -> Dart {
        self.phi2(self.phi_1(d))
    }

    /// Previous dart around the vertex of `d`.
    #[inline]
    fn alpha_1(&self, d: Dart) -> Dart {
        self.phi1(self.phi2(d))
    }

    #[inline]
    fn phi_relation(&self, digit: u8, d: Dart) -> Dart {
        match digit {
            1 => self.phi1(d),
            2 => self.phi2(d),
            3 => self.phi3(d),
            _ => panic!("no phi relation `{digit}`"),
        }
    }

    /// Applies the decimal digits of `path` left to right:
    /// `phi(12, d) == phi2(phi1(d))`.
    fn phi(&self, path: u64, d: Dart) -> Dart {
        let mut digits = SmallVec::<[u8; 20]>::new();
        let mut p = path;
        while p > 0 {
            digits.push((p % 10) as u8);
            p /= 10;
        }
        digits.iter().rev().fold(d, |e, &k| self.phi_relation(k, e))
    }

    /// Same as [`Phi2Map::phi`] for compositions of any length.
    fn phi_path(&self, path: &[u8], d: Dart) -> Dart {
        path.iter().fold(d, |e, &k| self.phi_relation(k, e))
    }

    /// Whether `d` has no opposite face.
    #[inline]
    fn is_phi2_fixed(&self, d: Dart) -> bool {
        self.phi2(d) == d
    }
}

/// Depth-first closure of `d` under `generators`; each generator returns
/// `None` where it does not apply. `f` sees `d` first.
pub(crate) fn foreach_generated<F, G>(d: Dart, generators: G, mut f: F)
where
    F: FnMut(Dart),
    G: Fn(Dart, &mut OrbitDarts),
{
    let mut seen: hashbrown::HashSet<Dart> = hashbrown::HashSet::new();
    let mut stack = vec![d];
    let mut next = OrbitDarts::new();
    seen.insert(d);
    while let Some(x) = stack.pop() {
        f(x);
        next.clear();
        generators(x, &mut next);
        for &y in &next {
            if seen.insert(y) {
                stack.push(y);
            }
        }
    }
}
