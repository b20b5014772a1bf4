//! Per-map pool of marker buffers.
//!
//! Each live marker owns one [`MarkBits`] taken from the pool and gives it
//! back, cleared, when dropped. Buffers are keyed by `(orbit, thread)` so a
//! thread never picks up a buffer sized for another orbit's container.

use hashbrown::HashMap;
use parking_lot::Mutex;

use super::bits::MarkBits;
use crate::map_error::MapError;
use crate::topology::orbit::Orbit;

#[derive(Debug)]
pub struct MarkerPool {
    threads: usize,
    free: Mutex<HashMap<(Orbit, usize), Vec<MarkBits>>>,
}

impl MarkerPool {
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
            free: Mutex::new(HashMap::new()),
        }
    }

    pub fn nb_threads(&self) -> usize {
        self.threads
    }

    /// Makes markers available for `n` more threads.
    pub fn add_threads(&mut self, n: usize) {
        self.threads += n;
    }

    pub fn check_thread(&self, thread: usize) -> Result<(), MapError> {
        if thread < self.threads {
            Ok(())
        } else {
            Err(MapError::ThreadOutOfRange {
                thread,
                threads: self.threads,
            })
        }
    }

    /// Hands out a clear buffer of at least `len` bits.
    pub fn acquire(&self, orbit: Orbit, thread: usize, len: usize) -> MarkBits {
        debug_assert!(thread < self.threads);
        let reused = self
            .free
            .lock()
            .get_mut(&(orbit, thread))
            .and_then(Vec::pop);
        match reused {
            Some(mut bits) => {
                debug_assert!(bits.is_all_clear());
                bits.ensure_len(len);
                bits
            }
            None => {
                log::trace!("marker pool: new {orbit:?} buffer for thread {thread} ({len} bits)");
                MarkBits::with_len(len)
            }
        }
    }

    /// Returns a buffer. It must be clear.
    pub fn release(&self, orbit: Orbit, thread: usize, bits: MarkBits) {
        debug_assert!(bits.is_all_clear());
        self.free
            .lock()
            .entry((orbit, thread))
            .or_default()
            .push(bits);
    }

    /// Number of idle buffers, all keys together.
    pub fn nb_idle(&self) -> usize {
        self.free.lock().values().map(Vec::len).sum()
    }

    /// Drops every idle buffer (after compaction the sizes are stale).
    pub fn clear(&self) {
        self.free.lock().clear();
    }
}

/// How a marker cleans its bits when dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sweep {
    /// Clear the whole buffer.
    All,
    /// Clear only the indices recorded while marking.
    Recorded,
    /// Trust the caller; a dirty buffer is discarded instead of pooled.
    None,
}

/// Bits borrowed from a pool plus the bookkeeping to give them back.
#[derive(Debug)]
pub(crate) struct MarkScratch<'a> {
    pool: &'a MarkerPool,
    orbit: Orbit,
    thread: usize,
    sweep: Sweep,
    bits: MarkBits,
    recorded: Vec<u32>,
}

impl<'a> MarkScratch<'a> {
    pub fn new(
        pool: &'a MarkerPool,
        orbit: Orbit,
        thread: usize,
        len: usize,
        sweep: Sweep,
    ) -> Self {
        Self {
            pool,
            orbit,
            thread,
            sweep,
            bits: pool.acquire(orbit, thread, len),
            recorded: Vec::new(),
        }
    }

    #[inline]
    pub fn mark(&mut self, i: u32) {
        if self.bits.set(i as usize) && self.sweep == Sweep::Recorded {
            self.recorded.push(i);
        }
    }

    #[inline]
    pub fn unmark(&mut self, i: u32) {
        self.bits.clear(i as usize);
    }

    #[inline]
    pub fn is_marked(&self, i: u32) -> bool {
        self.bits.get(i as usize)
    }

    pub fn unmark_all(&mut self) {
        match self.sweep {
            Sweep::Recorded => {
                for i in self.recorded.drain(..) {
                    self.bits.clear(i as usize);
                }
            }
            Sweep::All | Sweep::None => self.bits.clear_all(),
        }
    }

    pub fn is_all_unmarked(&self) -> bool {
        self.bits.is_all_clear()
    }

    pub fn orbit(&self) -> Orbit {
        self.orbit
    }

    pub fn thread(&self) -> usize {
        self.thread
    }
}

impl Drop for MarkScratch<'_> {
    fn drop(&mut self) {
        match self.sweep {
            Sweep::All => self.bits.clear_all(),
            Sweep::Recorded => {
                for &i in &self.recorded {
                    self.bits.clear(i as usize);
                }
            }
            Sweep::None => {
                if !self.bits.is_all_clear() {
                    log::warn!(
                        "{:?} marker (thread {}) dropped with {} marks left; buffer discarded",
                        self.orbit,
                        self.thread,
                        self.bits.count_ones()
                    );
                    return;
                }
            }
        }
        let bits = std::mem::take(&mut self.bits);
        self.pool.release(self.orbit, self.thread, bits);
    }
}
