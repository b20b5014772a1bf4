//! The traversor protocol and its bridge to [`Iterator`].
//!
//! A traversor yields one dart per cell: `begin()` restarts it and returns
//! the first dart, `next()` the following ones, and both return
//! [`Dart::NIL`] (`end()`) once exhausted. Traversors may be restarted any
//! number of times; every run yields the same sequence.

use crate::topology::dart::Dart;

pub trait Traversor {
    fn begin(&mut self) -> Dart;
    fn next(&mut self) -> Dart;

    #[inline]
    fn end(&self) -> Dart {
        Dart::NIL
    }

    /// Restarts the traversor and iterates its darts.
    fn iter(&mut self) -> TraversorIter<'_, Self>
    where
        Self: Sized,
    {
        TraversorIter {
            traversor: self,
            started: false,
        }
    }

    /// Runs a full pass and collects it.
    fn collect_darts(&mut self) -> Vec<Dart>
    where
        Self: Sized,
    {
        self.iter().collect()
    }
}

/// Iterator over one run of a traversor.
#[derive(Debug)]
pub struct TraversorIter<'t, T: Traversor> {
    traversor: &'t mut T,
    started: bool,
}

impl<T: Traversor> Iterator for TraversorIter<'_, T> {
    type Item = Dart;

    fn next(&mut self) -> Option<Dart> {
        let d = if self.started {
            self.traversor.next()
        } else {
            self.started = true;
            self.traversor.begin()
        };
        (!d.is_nil()).then_some(d)
    }
}

/// Precomputed sequence, used by traversors that must materialize their
/// result.
#[derive(Debug, Clone, Default)]
pub(crate) struct DartList {
    darts: Vec<Dart>,
    pos: usize,
}

impl DartList {
    pub fn new(darts: Vec<Dart>) -> Self {
        Self { darts, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.darts.len()
    }

    pub fn as_slice(&self) -> &[Dart] {
        &self.darts
    }
}

impl Traversor for DartList {
    fn begin(&mut self) -> Dart {
        self.pos = 0;
        self.darts.first().copied().unwrap_or(Dart::NIL)
    }

    fn next(&mut self) -> Dart {
        if self.pos < self.darts.len() {
            self.pos += 1;
        }
        self.darts.get(self.pos).copied().unwrap_or(Dart::NIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_restarts() {
        let mut l = DartList::new(vec![Dart::new(4), Dart::new(1)]);
        assert_eq!(l.collect_darts(), vec![Dart::new(4), Dart::new(1)]);
        assert_eq!(l.begin(), Dart::new(4));
        assert_eq!(l.next(), Dart::new(1));
        assert_eq!(l.next(), l.end());
        assert_eq!(l.next(), Dart::NIL);
        assert_eq!(l.collect_darts().len(), 2);
    }

    #[test]
    fn empty_list() {
        let mut l = DartList::new(Vec::new());
        assert!(l.begin().is_nil());
        assert_eq!(l.iter().count(), 0);
    }
}
