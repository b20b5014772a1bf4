//! Typed handles on cell attributes.
//!
//! An [`AttributeHandler<T, ORBIT>`] is a small copyable key: the column index
//! in the container of `ORBIT` plus the slot generation it was created for.
//! Values are reached through a map, by dart (via the dart's embedding) or by
//! row.

use std::marker::PhantomData;

use super::multi_vector::{AttributeMultiVector, AttributeValue};
use crate::map_error::MapError;
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::{DART, EDGE, EMBNULL, FACE, Orbit, VERTEX, VOLUME};

pub struct AttributeHandler<T, const ORBIT: usize> {
    index: usize,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

pub type DartAttribute<T> = AttributeHandler<T, DART>;
pub type VertexAttribute<T> = AttributeHandler<T, VERTEX>;
pub type EdgeAttribute<T> = AttributeHandler<T, EDGE>;
pub type FaceAttribute<T> = AttributeHandler<T, FACE>;
pub type VolumeAttribute<T> = AttributeHandler<T, VOLUME>;

impl<T, const ORBIT: usize> Clone for AttributeHandler<T, ORBIT> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const ORBIT: usize> Copy for AttributeHandler<T, ORBIT> {}

impl<T, const ORBIT: usize> std::fmt::Debug for AttributeHandler<T, ORBIT> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeHandler")
            .field("orbit", &Orbit::from_index(ORBIT))
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T: AttributeValue, const ORBIT: usize> AttributeHandler<T, ORBIT> {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Column index in the container of the orbit.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn orbit(&self) -> Orbit {
        Orbit::from_index(ORBIT)
    }

    /// Whether the column still exists in `map` with the expected type.
    pub fn is_valid<M: MapTopology + ?Sized>(&self, map: &M) -> bool {
        let c = map.base().container(self.orbit());
        c.generation(self.index) == Some(self.generation)
            && c.try_attribute::<T>(self.index).is_ok()
    }

    fn check<M: MapTopology + ?Sized>(&self, map: &M) -> Result<(), MapError> {
        if self.is_valid(map) {
            Ok(())
        } else {
            Err(MapError::InvalidHandler { index: self.index })
        }
    }

    /// The whole column.
    pub fn column<'m, M: MapTopology + ?Sized>(
        &self,
        map: &'m M,
    ) -> Result<&'m AttributeMultiVector<T>, MapError> {
        self.check(map)?;
        map.base().container(self.orbit()).try_attribute::<T>(self.index)
    }

    fn row_of<M: MapTopology + ?Sized>(&self, map: &M, d: Dart) -> u32 {
        let row = map.embedding(self.orbit(), d);
        assert!(row != EMBNULL, "dart {d} has no {:?} embedding", self.orbit());
        row
    }

    /// Value of the cell of `d`.
    ///
    /// # Panics
    /// Panics on a stale handler or an unembedded dart.
    #[track_caller]
    pub fn get<'m, M: MapTopology + ?Sized>(&self, map: &'m M, d: Dart) -> &'m T {
        debug_assert!(self.is_valid(map), "stale attribute handler");
        let row = self.row_of(map, d);
        map.base().container(self.orbit()).data::<T>(self.index, row)
    }

    #[track_caller]
    pub fn get_mut<'m, M: MapTopology + ?Sized>(&self, map: &'m mut M, d: Dart) -> &'m mut T {
        debug_assert!(self.is_valid(map), "stale attribute handler");
        let row = self.row_of(map, d);
        let orbit = self.orbit();
        map.base_mut()
            .container_mut(orbit)
            .data_mut::<T>(self.index, row)
    }

    #[track_caller]
    pub fn set<M: MapTopology + ?Sized>(&self, map: &mut M, d: Dart, value: T) {
        *self.get_mut(map, d) = value;
    }

    /// Non-panicking read.
    pub fn try_get<'m, M: MapTopology + ?Sized>(
        &self,
        map: &'m M,
        d: Dart,
    ) -> Result<&'m T, MapError> {
        let col = self.column(map)?;
        let row = map.embedding(self.orbit(), d);
        if row == EMBNULL || !map.base().container(self.orbit()).is_used(row) {
            return Err(MapError::UnusedRow(row));
        }
        Ok(col.get(row))
    }

    /// Value stored at a container row.
    #[track_caller]
    pub fn at<'m, M: MapTopology + ?Sized>(&self, map: &'m M, row: u32) -> &'m T {
        map.base().container(self.orbit()).data::<T>(self.index, row)
    }

    #[track_caller]
    pub fn at_mut<'m, M: MapTopology + ?Sized>(&self, map: &'m mut M, row: u32) -> &'m mut T {
        let orbit = self.orbit();
        map.base_mut()
            .container_mut(orbit)
            .data_mut::<T>(self.index, row)
    }

    /// `(row, value)` for every used row.
    pub fn iter<'m, M: MapTopology + ?Sized>(
        &self,
        map: &'m M,
    ) -> impl Iterator<Item = (u32, &'m T)> + 'm {
        let c = map.base().container(self.orbit());
        let col = c.attribute::<T>(self.index);
        c.rows().map(move |r| (r, col.get(r)))
    }
}
