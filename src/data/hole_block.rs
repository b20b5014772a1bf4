//! Per-block row occupancy with reference counts.

use super::multi_vector::BLOCK_SIZE;

/// Occupancy of one block of [`BLOCK_SIZE`] rows.
///
/// Slots `[0, high)` have been handed out at least once; a slot in that range
/// is free iff its count is zero, in which case it sits on the `free` stack.
#[derive(Debug, Clone)]
pub(crate) struct HoleBlock {
    refs: Box<[u32]>,
    free: Vec<u32>,
    high: u32,
    used: u32,
}

impl HoleBlock {
    pub fn new() -> Self {
        Self {
            refs: vec![0; BLOCK_SIZE].into_boxed_slice(),
            free: Vec::new(),
            high: 0,
            used: 0,
        }
    }

    /// Takes a slot and gives it one reference. `None` when the block is full.
    pub fn new_line(&mut self) -> Option<u32> {
        let local = match self.free.pop() {
            Some(i) => i,
            None if (self.high as usize) < BLOCK_SIZE => {
                self.high += 1;
                self.high - 1
            }
            None => return None,
        };
        self.refs[local as usize] = 1;
        self.used += 1;
        Some(local)
    }

    pub fn ref_line(&mut self, local: u32) -> u32 {
        let r = &mut self.refs[local as usize];
        assert!(*r > 0, "ref_line on a free row");
        *r += 1;
        *r
    }

    /// Drops one reference; returns `true` when the slot became free.
    pub fn unref_line(&mut self, local: u32) -> bool {
        let r = &mut self.refs[local as usize];
        assert!(*r > 0, "unref_line on a free row");
        *r -= 1;
        if *r == 0 {
            self.free.push(local);
            self.used -= 1;
            true
        } else {
            false
        }
    }

    /// Frees a slot whatever its count.
    pub fn remove_line(&mut self, local: u32) {
        let r = &mut self.refs[local as usize];
        assert!(*r > 0, "remove_line on a free row");
        *r = 0;
        self.free.push(local);
        self.used -= 1;
    }

    /// Marks a slot used with `count` references. Only valid while rebuilding
    /// a block slot by slot in increasing order.
    pub fn push_used(&mut self, count: u32) {
        debug_assert!(count > 0);
        self.refs[self.high as usize] = count;
        self.high += 1;
        self.used += 1;
    }

    #[inline]
    pub fn nb_refs(&self, local: u32) -> u32 {
        self.refs[local as usize]
    }

    #[inline]
    pub fn is_used(&self, local: u32) -> bool {
        self.refs[local as usize] > 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.free.is_empty() && self.high as usize == BLOCK_SIZE
    }

    #[inline]
    pub fn high(&self) -> u32 {
        self.high
    }

    #[inline]
    pub fn nb_used(&self) -> u32 {
        self.used
    }

    pub fn free_slots(&self) -> &[u32] {
        &self.free
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifo_reuse() {
        let mut b = HoleBlock::new();
        let l: Vec<u32> = (0..4).map(|_| b.new_line().unwrap()).collect();
        assert_eq!(l, vec![0, 1, 2, 3]);
        assert!(b.unref_line(1));
        assert!(b.unref_line(3));
        assert_eq!(b.new_line(), Some(3));
        assert_eq!(b.new_line(), Some(1));
        assert_eq!(b.new_line(), Some(4));
        assert_eq!(b.nb_used(), 5);
    }

    #[test]
    fn refcount_keeps_slot() {
        let mut b = HoleBlock::new();
        let i = b.new_line().unwrap();
        assert_eq!(b.ref_line(i), 2);
        assert!(!b.unref_line(i));
        assert!(b.is_used(i));
        assert!(b.unref_line(i));
        assert!(!b.is_used(i));
    }

    #[test]
    fn fills_up() {
        let mut b = HoleBlock::new();
        for _ in 0..BLOCK_SIZE {
            assert!(b.new_line().is_some());
        }
        assert!(b.is_full());
        assert_eq!(b.new_line(), None);
        b.remove_line(7);
        assert!(!b.is_full());
        assert_eq!(b.new_line(), Some(7));
    }
}
