//! `AttributeContainer`: a set of attribute columns sharing one row space.
//!
//! Rows are allocated from blocks of [`BLOCK_SIZE`] slots. Each block keeps a
//! reference count per slot and a stack of freed slots; the container keeps
//! the list of blocks that still have room, so [`AttributeContainer::insert_line`]
//! is O(1) amortized. Rows are never moved except by the explicit
//! [`AttributeContainer::compact`].

use hashbrown::HashMap;
use std::any::type_name;

use super::hole_block::HoleBlock;
use super::multi_vector::{
    AttributeMultiVector, AttributeMultiVectorGen, AttributeValue, BLOCK_MASK, BLOCK_SHIFT,
    BLOCK_SIZE,
};
use crate::debug_invariants::DebugInvariants;
use crate::map_error::MapError;
use crate::topology::orbit::Orbit;

/// Rows of one orbit kind and the columns attached to them.
pub struct AttributeContainer {
    orbit: Orbit,
    attributes: Vec<Option<Box<dyn AttributeMultiVectorGen>>>,
    generations: Vec<u32>,
    names: HashMap<String, usize>,
    holes: Vec<HoleBlock>,
    /// Blocks that are not full, most recently freed on top.
    with_free: Vec<usize>,
    nb_used: usize,
}

impl std::fmt::Debug for AttributeContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeContainer")
            .field("orbit", &self.orbit)
            .field("size", &self.nb_used)
            .field("blocks", &self.holes.len())
            .field("attributes", &self.attribute_names().collect::<Vec<_>>())
            .finish()
    }
}

#[inline]
fn split(row: u32) -> (usize, u32) {
    let r = row as usize;
    (r >> BLOCK_SHIFT, (r & BLOCK_MASK) as u32)
}

impl AttributeContainer {
    pub fn new(orbit: Orbit) -> Self {
        Self {
            orbit,
            attributes: Vec::new(),
            generations: Vec::new(),
            names: HashMap::new(),
            holes: Vec::new(),
            with_free: Vec::new(),
            nb_used: 0,
        }
    }

    pub fn orbit(&self) -> Orbit {
        self.orbit
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Adds a column of `T` named `name`, sized to the current row space.
    ///
    /// Empty names are anonymous and never clash.
    pub fn add_attribute<T: AttributeValue>(&mut self, name: &str) -> Result<usize, MapError> {
        if !name.is_empty() && self.names.contains_key(name) {
            return Err(MapError::DuplicateAttribute {
                name: name.to_owned(),
                orbit: self.orbit,
            });
        }
        let idx = self.insert_column::<T>(name);
        if !name.is_empty() {
            self.names.insert(name.to_owned(), idx);
        }
        Ok(idx)
    }

    /// Adds a column that is not reachable by name (relations, embeddings,
    /// boundary flags). The name is only used in diagnostics.
    pub fn add_internal<T: AttributeValue>(&mut self, name: &str) -> usize {
        self.insert_column::<T>(name)
    }

    fn insert_column<T: AttributeValue>(&mut self, name: &str) -> usize {
        let mut col = AttributeMultiVector::<T>::new(name);
        col.set_nb_blocks(self.holes.len());
        let idx = match self.attributes.iter().position(Option::is_none) {
            Some(i) => {
                self.attributes[i] = Some(Box::new(col));
                i
            }
            None => {
                self.attributes.push(Some(Box::new(col)));
                self.generations.push(0);
                self.attributes.len() - 1
            }
        };
        log::debug!(
            "{:?} container: attribute `{}` ({}) at slot {}",
            self.orbit,
            name,
            type_name::<T>(),
            idx
        );
        idx
    }

    /// Removes a column. Returns `false` when the slot was already empty.
    pub fn remove_attribute(&mut self, index: usize) -> bool {
        let Some(slot) = self.attributes.get_mut(index) else {
            return false;
        };
        match slot.take() {
            Some(col) => {
                if self.names.get(col.name()) == Some(&index) {
                    self.names.remove(col.name());
                }
                self.generations[index] = self.generations[index].wrapping_add(1);
                true
            }
            None => false,
        }
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.names.get(name).copied()
    }

    /// Current generation of a slot; bumped each time the slot is emptied.
    pub fn generation(&self, index: usize) -> Option<u32> {
        self.generations.get(index).copied()
    }

    pub fn has_attribute(&self, index: usize) -> bool {
        matches!(self.attributes.get(index), Some(Some(_)))
    }

    pub fn nb_attributes(&self) -> usize {
        self.attributes.iter().flatten().count()
    }

    /// Names of the named columns.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_ref().map(|c| (i, c.name())))
            .filter(|&(i, n)| self.names.get(n) == Some(&i))
            .map(|(_, n)| n)
    }

    pub fn attribute_gen(&self, index: usize) -> Option<&dyn AttributeMultiVectorGen> {
        self.attributes.get(index)?.as_deref()
    }

    /// Typed column access.
    ///
    /// # Panics
    /// Panics if the slot is empty or stores another type.
    #[track_caller]
    pub fn attribute<T: AttributeValue>(&self, index: usize) -> &AttributeMultiVector<T> {
        match self.try_attribute::<T>(index) {
            Ok(c) => c,
            Err(e) => panic!("{e}"),
        }
    }

    #[track_caller]
    pub fn attribute_mut<T: AttributeValue>(
        &mut self,
        index: usize,
    ) -> &mut AttributeMultiVector<T> {
        match self.try_attribute_mut::<T>(index) {
            Ok(c) => c,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn try_attribute<T: AttributeValue>(
        &self,
        index: usize,
    ) -> Result<&AttributeMultiVector<T>, MapError> {
        let col = self
            .attributes
            .get(index)
            .and_then(Option::as_deref)
            .ok_or(MapError::InvalidHandler { index })?;
        col.as_any()
            .downcast_ref::<AttributeMultiVector<T>>()
            .ok_or_else(|| MapError::AttributeTypeMismatch {
                name: col.name().to_owned(),
                stored: col.type_name(),
                requested: type_name::<T>(),
            })
    }

    pub fn try_attribute_mut<T: AttributeValue>(
        &mut self,
        index: usize,
    ) -> Result<&mut AttributeMultiVector<T>, MapError> {
        let col = self
            .attributes
            .get_mut(index)
            .and_then(Option::as_deref_mut)
            .ok_or(MapError::InvalidHandler { index })?;
        if !col.as_any().is::<AttributeMultiVector<T>>() {
            return Err(MapError::AttributeTypeMismatch {
                name: col.name().to_owned(),
                stored: col.type_name(),
                requested: type_name::<T>(),
            });
        }
        col.as_any_mut()
            .downcast_mut::<AttributeMultiVector<T>>()
            .ok_or(MapError::InvalidHandler { index })
    }

    /// Looks a column up by name and checks its type.
    pub fn attribute_by_name<T: AttributeValue>(
        &self,
        name: &str,
    ) -> Result<(usize, &AttributeMultiVector<T>), MapError> {
        let idx = self
            .attribute_index(name)
            .ok_or_else(|| MapError::UnknownAttribute {
                name: name.to_owned(),
                orbit: self.orbit,
            })?;
        Ok((idx, self.try_attribute::<T>(idx)?))
    }

    /// Reads one value.
    ///
    /// # Panics
    /// Panics if the row is unused or the column is absent or of another type.
    #[track_caller]
    pub fn data<T: AttributeValue>(&self, index: usize, row: u32) -> &T {
        assert!(self.is_used(row), "row {row} is not in use");
        self.attribute::<T>(index).get(row)
    }

    #[track_caller]
    pub fn data_mut<T: AttributeValue>(&mut self, index: usize, row: u32) -> &mut T {
        assert!(self.is_used(row), "row {row} is not in use");
        self.attribute_mut::<T>(index).get_mut(row)
    }

    /// Copies column `src` into column `dst`. Types must match.
    pub fn copy_attribute(&mut self, dst: usize, src: usize) -> Result<(), MapError> {
        if dst == src {
            return Ok(());
        }
        let (d, s) = self.two_columns(dst, src)?;
        if d.copy_from(&**s) {
            Ok(())
        } else {
            Err(MapError::AttributeTypeMismatch {
                name: d.name().to_owned(),
                stored: d.type_name(),
                requested: s.type_name(),
            })
        }
    }

    /// Exchanges the contents of two columns of the same type.
    pub fn swap_attributes(&mut self, a: usize, b: usize) -> Result<(), MapError> {
        if a == b {
            return Ok(());
        }
        let (x, y) = self.two_columns(a, b)?;
        if x.swap_with(&mut **y) {
            Ok(())
        } else {
            Err(MapError::AttributeTypeMismatch {
                name: x.name().to_owned(),
                stored: x.type_name(),
                requested: y.type_name(),
            })
        }
    }

    fn two_columns(
        &mut self,
        a: usize,
        b: usize,
    ) -> Result<
        (
            &mut Box<dyn AttributeMultiVectorGen>,
            &mut Box<dyn AttributeMultiVectorGen>,
        ),
        MapError,
    > {
        debug_assert_ne!(a, b);
        for i in [a, b] {
            if !self.has_attribute(i) {
                return Err(MapError::InvalidHandler { index: i });
            }
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (left, right) = self.attributes.split_at_mut(hi);
        let (l, r) = match (left[lo].as_mut(), right[0].as_mut()) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(MapError::InvalidHandler { index: lo }),
        };
        Ok(if a < b { (l, r) } else { (r, l) })
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Allocates a row with one reference; every column is reset to default.
    pub fn insert_line(&mut self) -> u32 {
        loop {
            let Some(&b) = self.with_free.last() else {
                self.grow();
                continue;
            };
            let block = &mut self.holes[b];
            if let Some(local) = block.new_line() {
                if block.is_full() {
                    self.with_free.pop();
                }
                self.nb_used += 1;
                let row = ((b << BLOCK_SHIFT) as u32) | local;
                for col in self.attributes.iter_mut().flatten() {
                    col.init_row(row);
                }
                return row;
            }
            self.with_free.pop();
        }
    }

    fn grow(&mut self) {
        let n = self.holes.len() + 1;
        log::trace!("{:?} container grows to {} blocks", self.orbit, n);
        self.holes.push(HoleBlock::new());
        for col in self.attributes.iter_mut().flatten() {
            col.set_nb_blocks(n);
        }
        self.with_free.push(n - 1);
    }

    #[track_caller]
    pub fn ref_line(&mut self, row: u32) -> u32 {
        let (b, l) = split(row);
        self.holes[b].ref_line(l)
    }

    /// Drops one reference; returns `true` when the row was collected.
    #[track_caller]
    pub fn unref_line(&mut self, row: u32) -> bool {
        let (b, l) = split(row);
        let was_full = self.holes[b].is_full();
        let collected = self.holes[b].unref_line(l);
        if collected {
            self.nb_used -= 1;
            if was_full {
                self.with_free.push(b);
            }
        }
        collected
    }

    /// Frees a row regardless of its reference count.
    #[track_caller]
    pub fn remove_line(&mut self, row: u32) {
        let (b, l) = split(row);
        let was_full = self.holes[b].is_full();
        self.holes[b].remove_line(l);
        self.nb_used -= 1;
        if was_full {
            self.with_free.push(b);
        }
    }

    pub fn is_used(&self, row: u32) -> bool {
        let (b, l) = split(row);
        self.holes.get(b).is_some_and(|h| h.is_used(l))
    }

    pub fn nb_refs(&self, row: u32) -> u32 {
        let (b, l) = split(row);
        self.holes.get(b).map_or(0, |h| h.nb_refs(l))
    }

    /// Copies every column value of row `src` into row `dst`.
    pub fn copy_line(&mut self, dst: u32, src: u32) {
        for col in self.attributes.iter_mut().flatten() {
            col.copy_row(dst, src);
        }
    }

    /// Resets every column value of `row`.
    pub fn init_line(&mut self, row: u32) {
        for col in self.attributes.iter_mut().flatten() {
            col.init_row(row);
        }
    }

    /// Number of used rows.
    pub fn size(&self) -> usize {
        self.nb_used
    }

    pub fn is_empty(&self) -> bool {
        self.nb_used == 0
    }

    /// Rows addressable without growing.
    pub fn capacity(&self) -> usize {
        self.holes.len() * BLOCK_SIZE
    }

    pub fn nb_blocks(&self) -> usize {
        self.holes.len()
    }

    /// One past the highest row ever handed out.
    pub fn end(&self) -> u32 {
        match self.holes.last() {
            Some(last) => (((self.holes.len() - 1) << BLOCK_SHIFT) as u32) + last.high(),
            None => 0,
        }
    }

    /// First used row, or `end()`.
    pub fn begin(&self) -> u32 {
        self.next_used(0)
    }

    /// Used row following `row`, or `end()`.
    pub fn next(&self, row: u32) -> u32 {
        self.next_used(row + 1)
    }

    fn next_used(&self, mut row: u32) -> u32 {
        let end = self.end();
        while row < end {
            let (b, l) = split(row);
            let block = &self.holes[b];
            if block.nb_used() == 0 {
                row = ((b + 1) << BLOCK_SHIFT) as u32;
                continue;
            }
            if block.is_used(l) {
                return row;
            }
            row += 1;
        }
        end
    }

    /// Lazy sequence of used rows in increasing order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            container: self,
            cur: self.begin(),
            end: self.end(),
        }
    }

    /// Drops every row; columns stay registered but hold no blocks.
    pub fn clear(&mut self) {
        self.holes.clear();
        self.with_free.clear();
        self.nb_used = 0;
        for col in self.attributes.iter_mut().flatten() {
            col.set_nb_blocks(0);
        }
    }

    /// Moves used rows to `[0, size())` keeping their relative order and
    /// reference counts. Returns the old-to-new row table (`u32::MAX` for
    /// rows that were free).
    pub fn compact(&mut self) -> Vec<u32> {
        let end = self.end();
        let mut table = vec![u32::MAX; end as usize];
        let mut counts = Vec::with_capacity(self.nb_used);
        for old in self.rows() {
            table[old as usize] = counts.len() as u32;
            counts.push(self.nb_refs(old));
        }
        for (old, &new) in table.iter().enumerate() {
            if new != u32::MAX && new != old as u32 {
                for col in self.attributes.iter_mut().flatten() {
                    col.swap_rows(new, old as u32);
                }
            }
        }
        let nb_blocks = counts.len().div_ceil(BLOCK_SIZE);
        self.holes.clear();
        self.with_free.clear();
        for chunk in counts.chunks(BLOCK_SIZE) {
            let mut h = HoleBlock::new();
            for &c in chunk {
                h.push_used(c);
            }
            self.holes.push(h);
        }
        if let Some(last) = self.holes.last()
            && !last.is_full()
        {
            self.with_free.push(self.holes.len() - 1);
        }
        for col in self.attributes.iter_mut().flatten() {
            col.set_nb_blocks(nb_blocks);
        }
        log::info!(
            "{:?} container compacted: {} rows, {} -> {} slots",
            self.orbit,
            counts.len(),
            end,
            self.end()
        );
        self.debug_assert_invariants();
        table
    }

    pub(crate) fn hole_blocks(&self) -> &[HoleBlock] {
        &self.holes
    }

    pub(crate) fn blocks_with_free(&self) -> &[usize] {
        &self.with_free
    }

    pub(crate) fn columns(&self) -> impl Iterator<Item = &dyn AttributeMultiVectorGen> + '_ {
        self.attributes.iter().flatten().map(|c| &**c)
    }

    pub(crate) fn named(&self) -> &HashMap<String, usize> {
        &self.names
    }
}

/// Iterator over the used rows of a container.
pub struct Rows<'a> {
    container: &'a AttributeContainer,
    cur: u32,
    end: u32,
}

impl Iterator for Rows<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.cur >= self.end {
            return None;
        }
        let r = self.cur;
        self.cur = self.container.next(r);
        Some(r)
    }
}
