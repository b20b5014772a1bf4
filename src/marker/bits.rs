//! Plain word-packed bit set used as marker storage.

const WORD: usize = u64::BITS as usize;

#[derive(Debug, Clone, Default)]
pub struct MarkBits {
    words: Vec<u64>,
    len: usize,
}

impl MarkBits {
    pub fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(WORD)],
            len,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Grows to at least `len` bits; new bits are clear. Never shrinks.
    pub fn ensure_len(&mut self, len: usize) {
        if len > self.len {
            self.words.resize(len.div_ceil(WORD), 0);
            self.len = len;
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> bool {
        i < self.len && self.words[i / WORD] & (1 << (i % WORD)) != 0
    }

    /// Sets bit `i`; returns `true` if it was clear.
    #[inline]
    pub fn set(&mut self, i: usize) -> bool {
        assert!(i < self.len, "mark index {i} out of range ({})", self.len);
        let w = &mut self.words[i / WORD];
        let m = 1 << (i % WORD);
        let was_clear = *w & m == 0;
        *w |= m;
        was_clear
    }

    /// Clears bit `i`; returns `true` if it was set.
    #[inline]
    pub fn clear(&mut self, i: usize) -> bool {
        if i >= self.len {
            return false;
        }
        let w = &mut self.words[i / WORD];
        let m = 1 << (i % WORD);
        let was_set = *w & m != 0;
        *w &= !m;
        was_set
    }

    pub fn clear_all(&mut self) {
        self.words.fill(0);
    }

    pub fn is_all_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
