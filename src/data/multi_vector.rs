//! Block-structured attribute columns.
//!
//! An [`AttributeMultiVector<T>`] stores one value per container row in
//! fixed-size blocks of [`BLOCK_SIZE`] entries. Growing a column appends whole
//! blocks, so references handed out for existing rows stay put in memory and
//! a block can be exported as one contiguous slice.
//!
//! The container only sees columns through [`AttributeMultiVectorGen`], the
//! object-safe part of the interface; typed access goes through a checked
//! down-cast.

use std::any::{Any, type_name};

/// Rows per block.
pub const BLOCK_SIZE: usize = 4096;
pub(crate) const BLOCK_SHIFT: u32 = BLOCK_SIZE.trailing_zeros();
pub(crate) const BLOCK_MASK: usize = BLOCK_SIZE - 1;

static_assertions::const_assert!(BLOCK_SIZE.is_power_of_two());

/// Bound for values stored in attribute columns.
pub trait AttributeValue: Clone + Default + Send + Sync + 'static {}
impl<T: Clone + Default + Send + Sync + 'static> AttributeValue for T {}

/// Type-erased view of a column.
pub trait AttributeMultiVectorGen: Any + Send + Sync {
    fn name(&self) -> &str;
    /// Name of the stored type, as given by `std::any::type_name`.
    fn type_name(&self) -> &'static str;

    fn nb_blocks(&self) -> usize;
    /// Grows or shrinks to exactly `n` blocks. New rows hold `T::default()`.
    fn set_nb_blocks(&mut self, n: usize);

    /// Resets `row` to the default value.
    fn init_row(&mut self, row: u32);
    fn copy_row(&mut self, dst: u32, src: u32);
    fn swap_rows(&mut self, a: u32, b: u32);

    /// Copies every value of `other` into `self`. Returns `false` (and leaves
    /// `self` untouched) when the stored types differ.
    fn copy_from(&mut self, other: &dyn AttributeMultiVectorGen) -> bool;
    /// Exchanges the contents of two columns of the same type. Names stay.
    fn swap_with(&mut self, other: &mut dyn AttributeMultiVectorGen) -> bool;

    /// Allocates an empty column of the same type.
    fn new_same_type(&self, name: String) -> Box<dyn AttributeMultiVectorGen>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed block array indexed by container row.
#[derive(Debug, Clone)]
pub struct AttributeMultiVector<T> {
    name: String,
    blocks: Vec<Box<[T]>>,
}

impl<T: AttributeValue> AttributeMultiVector<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Number of addressable rows (`nb_blocks * BLOCK_SIZE`).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() << BLOCK_SHIFT
    }

    #[inline]
    pub fn get(&self, row: u32) -> &T {
        let r = row as usize;
        &self.blocks[r >> BLOCK_SHIFT][r & BLOCK_MASK]
    }

    #[inline]
    pub fn get_mut(&mut self, row: u32) -> &mut T {
        let r = row as usize;
        &mut self.blocks[r >> BLOCK_SHIFT][r & BLOCK_MASK]
    }

    #[inline]
    pub fn set(&mut self, row: u32, value: T) {
        *self.get_mut(row) = value;
    }

    /// Bounds-checked read.
    pub fn try_get(&self, row: u32) -> Option<&T> {
        let r = row as usize;
        self.blocks
            .get(r >> BLOCK_SHIFT)
            .map(|b| &b[r & BLOCK_MASK])
    }

    /// Contiguous view of block `i`.
    pub fn block(&self, i: usize) -> &[T] {
        &self.blocks[i]
    }

    pub fn blocks(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        self.blocks.iter().map(|b| &**b)
    }

    fn new_block() -> Box<[T]> {
        vec![T::default(); BLOCK_SIZE].into_boxed_slice()
    }
}

impl<T: AttributeValue + bytemuck::Pod> AttributeMultiVector<T> {
    /// Raw bytes of block `i`, for bulk upload into external buffers.
    pub fn block_bytes(&self, i: usize) -> &[u8] {
        bytemuck::cast_slice(&self.blocks[i][..])
    }
}

impl<T: AttributeValue> AttributeMultiVectorGen for AttributeMultiVector<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn nb_blocks(&self) -> usize {
        self.blocks.len()
    }

    fn set_nb_blocks(&mut self, n: usize) {
        if n > self.blocks.len() {
            log::trace!(
                "column `{}` grows {} -> {} blocks",
                self.name,
                self.blocks.len(),
                n
            );
            self.blocks.resize_with(n, Self::new_block);
        } else {
            self.blocks.truncate(n);
        }
    }

    fn init_row(&mut self, row: u32) {
        *self.get_mut(row) = T::default();
    }

    fn copy_row(&mut self, dst: u32, src: u32) {
        if dst != src {
            let v = self.get(src).clone();
            *self.get_mut(dst) = v;
        }
    }

    fn swap_rows(&mut self, a: u32, b: u32) {
        if a == b {
            return;
        }
        let (a, b) = (a as usize, b as usize);
        let (ba, ia) = (a >> BLOCK_SHIFT, a & BLOCK_MASK);
        let (bb, ib) = (b >> BLOCK_SHIFT, b & BLOCK_MASK);
        if ba == bb {
            self.blocks[ba].swap(ia, ib);
        } else {
            let (lo, hi) = (ba.min(bb), ba.max(bb));
            let (left, right) = self.blocks.split_at_mut(hi);
            let (x, y) = (&mut left[lo], &mut right[0]);
            if ba < bb {
                std::mem::swap(&mut x[ia], &mut y[ib]);
            } else {
                std::mem::swap(&mut x[ib], &mut y[ia]);
            }
        }
    }

    fn copy_from(&mut self, other: &dyn AttributeMultiVectorGen) -> bool {
        match other.as_any().downcast_ref::<Self>() {
            Some(o) => {
                self.blocks = o.blocks.clone();
                true
            }
            None => false,
        }
    }

    fn swap_with(&mut self, other: &mut dyn AttributeMultiVectorGen) -> bool {
        match other.as_any_mut().downcast_mut::<Self>() {
            Some(o) => {
                std::mem::swap(&mut self.blocks, &mut o.blocks);
                true
            }
            None => false,
        }
    }

    fn new_same_type(&self, name: String) -> Box<dyn AttributeMultiVectorGen> {
        Box::new(AttributeMultiVector::<T>::new(name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
