//! Storage shared by every map kind.
//!
//! A [`MapBase`] owns one [`AttributeContainer`] per orbit. Darts are rows of
//! the dart container; relations, per-orbit embeddings and boundary flags are
//! internal columns of that container.

use crate::data::container::AttributeContainer;
use crate::marker::pool::MarkerPool;
use crate::topology::dart::Dart;
use crate::topology::orbit::{EMBNULL, NB_ORBITS, Orbit};

/// Boundary flag of 2-dimensional closing faces.
pub const BOUNDARY2: u8 = 1;
/// Boundary flag of 3-dimensional closing volumes.
pub const BOUNDARY3: u8 = 2;

/// Run-time settings of a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// Number of threads that may hold markers at the same time.
    pub threads: usize,
    /// Dart rows reserved up front, in blocks.
    pub initial_blocks: usize,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            initial_blocks: 0,
        }
    }
}

#[derive(Debug)]
pub struct MapBase {
    containers: [AttributeContainer; NB_ORBITS],
    relation_names: &'static [&'static str],
    relations: Vec<usize>,
    embeddings: [Option<usize>; NB_ORBITS],
    boundary: usize,
    markers: MarkerPool,
}

impl MapBase {
    pub fn new(relation_names: &'static [&'static str], config: MapConfig) -> Self {
        let mut containers: [AttributeContainer; NB_ORBITS] =
            std::array::from_fn(|i| AttributeContainer::new(Orbit::from_index(i)));
        let darts = &mut containers[Orbit::Dart.index()];
        let relations = relation_names
            .iter()
            .map(|name| darts.add_internal::<Dart>(name))
            .collect();
        let boundary = darts.add_internal::<u8>("boundary");
        let mut base = Self {
            containers,
            relation_names,
            relations,
            embeddings: [None; NB_ORBITS],
            boundary,
            markers: MarkerPool::new(config.threads),
        };
        base.reserve_dart_blocks(config.initial_blocks);
        base
    }

    fn reserve_dart_blocks(&mut self, blocks: usize) {
        // grow by inserting then freeing whole blocks
        let rows = blocks * crate::data::multi_vector::BLOCK_SIZE;
        if rows == 0 {
            return;
        }
        let darts = &mut self.containers[Orbit::Dart.index()];
        let taken: Vec<u32> = (0..rows).map(|_| darts.insert_line()).collect();
        for r in taken.into_iter().rev() {
            darts.unref_line(r);
        }
    }

    // ------------------------------------------------------------------
    // Containers
    // ------------------------------------------------------------------

    #[inline]
    pub fn container(&self, orbit: Orbit) -> &AttributeContainer {
        &self.containers[orbit.index()]
    }

    #[inline]
    pub fn container_mut(&mut self, orbit: Orbit) -> &mut AttributeContainer {
        &mut self.containers[orbit.index()]
    }

    #[inline]
    pub fn darts(&self) -> &AttributeContainer {
        &self.containers[Orbit::Dart.index()]
    }

    pub fn markers(&self) -> &MarkerPool {
        &self.markers
    }

    pub fn markers_mut(&mut self) -> &mut MarkerPool {
        &mut self.markers
    }

    pub fn relation_names(&self) -> &'static [&'static str] {
        self.relation_names
    }

    // ------------------------------------------------------------------
    // Darts
    // ------------------------------------------------------------------

    /// Allocates a dart that is a fixed point of every relation and carries
    /// no embedding.
    pub fn new_dart(&mut self) -> Dart {
        let darts = &mut self.containers[Orbit::Dart.index()];
        let row = darts.insert_line();
        let d = Dart::new(row);
        for &rel in &self.relations {
            darts.attribute_mut::<Dart>(rel).set(row, d);
        }
        for emb in self.embeddings.iter().flatten() {
            darts.attribute_mut::<u32>(*emb).set(row, EMBNULL);
        }
        d
    }

    /// Frees a dart and drops its references on embedding rows.
    ///
    /// Relations pointing at `d` are left to the caller.
    pub fn delete_dart(&mut self, d: Dart) {
        for orbit in Orbit::ALL {
            if orbit != Orbit::Dart {
                self.set_dart_embedding(orbit, d, EMBNULL);
            }
        }
        self.containers[Orbit::Dart.index()].remove_line(d.index());
    }

    #[inline]
    pub fn is_alive(&self, d: Dart) -> bool {
        !d.is_nil() && self.darts().is_used(d.index())
    }

    pub fn nb_darts(&self) -> usize {
        self.darts().size()
    }

    // ------------------------------------------------------------------
    // Relations
    // ------------------------------------------------------------------

    #[inline]
    pub fn relation(&self, rel: usize, d: Dart) -> Dart {
        *self.darts().attribute::<Dart>(self.relations[rel]).get(d.index())
    }

    #[inline]
    pub fn set_relation(&mut self, rel: usize, d: Dart, e: Dart) {
        let col = self.relations[rel];
        self.containers[Orbit::Dart.index()]
            .attribute_mut::<Dart>(col)
            .set(d.index(), e);
    }

    /// Links `d` and `e` through involution `rel`. Both must be fixed points.
    pub fn involution_sew(&mut self, rel: usize, d: Dart, e: Dart) {
        let name = self.relation_names[rel];
        debug_assert_eq!(self.relation(rel, d), d, "{name} of {d} is already sewn");
        debug_assert_eq!(self.relation(rel, e), e, "{name} of {e} is already sewn");
        self.set_relation(rel, d, e);
        self.set_relation(rel, e, d);
    }

    /// Unlinks `d` and its image through involution `rel`.
    pub fn involution_unsew(&mut self, rel: usize, d: Dart) {
        let e = self.relation(rel, d);
        self.set_relation(rel, d, d);
        self.set_relation(rel, e, e);
    }

    /// Exchanges the successors of `d` and `e` in permutation `rel`, whose
    /// inverse is stored in `inv`. Merges two cycles or splits one.
    pub fn permutation_sew(&mut self, rel: usize, inv: usize, d: Dart, e: Dart) {
        let f = self.relation(rel, d);
        let g = self.relation(rel, e);
        self.set_relation(rel, d, g);
        self.set_relation(rel, e, f);
        self.set_relation(inv, g, d);
        self.set_relation(inv, f, e);
    }

    /// Takes the successor of `d` out of its cycle, leaving it a fixed point.
    pub fn permutation_unsew(&mut self, rel: usize, inv: usize, d: Dart) {
        let e = self.relation(rel, d);
        let f = self.relation(rel, e);
        self.set_relation(rel, d, f);
        self.set_relation(inv, f, d);
        self.set_relation(rel, e, e);
        self.set_relation(inv, e, e);
    }

    // ------------------------------------------------------------------
    // Boundary
    // ------------------------------------------------------------------

    #[inline]
    pub fn is_boundary_marked(&self, flag: u8, d: Dart) -> bool {
        self.darts().attribute::<u8>(self.boundary).get(d.index()) & flag != 0
    }

    pub fn boundary_mark(&mut self, flag: u8, d: Dart) {
        let b = self.boundary;
        *self.containers[Orbit::Dart.index()]
            .attribute_mut::<u8>(b)
            .get_mut(d.index()) |= flag;
    }

    pub fn boundary_unmark(&mut self, flag: u8, d: Dart) {
        let b = self.boundary;
        *self.containers[Orbit::Dart.index()]
            .attribute_mut::<u8>(b)
            .get_mut(d.index()) &= !flag;
    }

    /// Gives `to` every boundary flag carried by `from`.
    pub fn copy_boundary_flags(&mut self, from: Dart, to: Dart) {
        let b = self.boundary;
        let col = self.containers[Orbit::Dart.index()].attribute_mut::<u8>(b);
        let flags = *col.get(from.index());
        *col.get_mut(to.index()) |= flags;
    }

    // ------------------------------------------------------------------
    // Embeddings
    // ------------------------------------------------------------------

    /// Darts are always "embedded": their row is their index.
    #[inline]
    pub fn is_orbit_embedded(&self, orbit: Orbit) -> bool {
        orbit == Orbit::Dart || self.embeddings[orbit.index()].is_some()
    }

    /// Adds the embedding column of `orbit`, every dart starting at `EMBNULL`.
    /// Returns `false` if the orbit was already embedded.
    pub fn add_embedding_column(&mut self, orbit: Orbit) -> bool {
        if self.is_orbit_embedded(orbit) {
            return false;
        }
        let darts = &mut self.containers[Orbit::Dart.index()];
        let col = darts.add_internal::<u32>(match orbit {
            Orbit::Vertex => "emb_vertex",
            Orbit::Edge => "emb_edge",
            Orbit::Face => "emb_face",
            Orbit::Volume => "emb_volume",
            Orbit::Dart => unreachable!(),
        });
        let rows: Vec<u32> = darts.rows().collect();
        let emb = darts.attribute_mut::<u32>(col);
        for r in rows {
            emb.set(r, EMBNULL);
        }
        self.embeddings[orbit.index()] = Some(col);
        log::debug!("orbit {orbit:?} is now embedded");
        true
    }

    /// Row of `d` in the container of `orbit`, or `EMBNULL`.
    #[inline]
    pub fn embedding(&self, orbit: Orbit, d: Dart) -> u32 {
        match orbit {
            Orbit::Dart => d.index(),
            _ => match self.embeddings[orbit.index()] {
                Some(col) => *self.darts().attribute::<u32>(col).get(d.index()),
                None => EMBNULL,
            },
        }
    }

    /// Sets the embedding of one dart, moving one reference from the old row
    /// to the new one. Rows whose count drops to zero are freed.
    pub fn set_dart_embedding(&mut self, orbit: Orbit, d: Dart, row: u32) {
        let Some(col) = self.embeddings[orbit.index()] else {
            return;
        };
        let old = self.embedding(orbit, d);
        if old == row {
            return;
        }
        if old != EMBNULL {
            self.containers[orbit.index()].unref_line(old);
        }
        if row != EMBNULL {
            self.containers[orbit.index()].ref_line(row);
        }
        self.containers[Orbit::Dart.index()]
            .attribute_mut::<u32>(col)
            .set(d.index(), row);
    }

    /// Writes an embedding without touching reference counts.
    pub(crate) fn set_dart_embedding_raw(&mut self, orbit: Orbit, d: Dart, row: u32) {
        if let Some(col) = self.embeddings[orbit.index()] {
            self.containers[Orbit::Dart.index()]
                .attribute_mut::<u32>(col)
                .set(d.index(), row);
        }
    }

    /// Allocates a row for a cell of `orbit` with no reference yet taken
    /// by darts; pair with [`MapBase::set_dart_embedding`] and
    /// [`MapBase::release_new_cell`].
    pub fn new_cell_row(&mut self, orbit: Orbit) -> u32 {
        self.containers[orbit.index()].insert_line()
    }

    /// Drops the reference `new_cell_row` took for itself.
    pub fn release_new_cell(&mut self, orbit: Orbit, row: u32) {
        self.containers[orbit.index()].unref_line(row);
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    /// Compacts every container, then rewrites relations and embeddings
    /// through the returned row tables.
    pub fn compact(&mut self) {
        let mut tables: [Vec<u32>; NB_ORBITS] = Default::default();
        for orbit in Orbit::ALL {
            if orbit != Orbit::Dart && self.embeddings[orbit.index()].is_some() {
                tables[orbit.index()] = self.containers[orbit.index()].compact();
            }
        }
        let dart_table = self.containers[Orbit::Dart.index()].compact();
        let rows: Vec<u32> = self.darts().rows().collect();
        for rel in 0..self.relations.len() {
            for &r in &rows {
                let d = Dart::new(r);
                let old = self.relation(rel, d);
                self.set_relation(rel, d, Dart::new(dart_table[old.idx()]));
            }
        }
        for orbit in Orbit::ALL {
            let table = &tables[orbit.index()];
            if orbit == Orbit::Dart || table.is_empty() {
                continue;
            }
            for &r in &rows {
                let d = Dart::new(r);
                let old = self.embedding(orbit, d);
                if old != EMBNULL {
                    let new = table[old as usize];
                    self.set_dart_embedding_raw(orbit, d, new);
                }
            }
        }
        self.markers.clear();
    }

    /// Removes every dart and every cell row; attributes stay registered.
    pub fn clear(&mut self) {
        for c in &mut self.containers {
            c.clear();
        }
        self.markers.clear();
    }

    pub(crate) fn embedding_columns(&self) -> [Option<usize>; NB_ORBITS] {
        self.embeddings
    }
}
