//! Self-checks for containers and maps.
//!
//! [`DebugInvariants::validate_invariants`] always runs the full pass and
//! reports the first broken invariant as a [`MapError`]. The asserting side
//! only fires where checks are compiled in: debug builds, or release builds
//! with `strict-invariants` or `check-invariants`.

use crate::map_error::MapError;

/// A structure able to verify its own bookkeeping.
pub trait DebugInvariants {
    /// Full consistency pass; the first broken invariant is returned.
    fn validate_invariants(&self) -> Result<(), MapError>;

    /// Panics on a broken invariant, naming the checked type. Compiled out
    /// unless invariant checks are on.
    #[track_caller]
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), std::any::type_name::<Self>());
    }
}

/// Panics with `$what` and the error of `$check` when it fails, in builds
/// where invariant checks are on.
#[macro_export]
macro_rules! debug_invariants {
    ($check:expr, $what:expr) => {
        #[cfg(any(
            debug_assertions,
            feature = "strict-invariants",
            feature = "check-invariants"
        ))]
        if let Err(e) = $check {
            panic!("{} violates its invariants: {}", $what, e);
        }
    };
}

/// Like [`debug_invariants!`], for whole-map passes too slow to run after
/// every edit: only the `check-invariants` feature enables it.
#[macro_export]
macro_rules! heavy_invariants {
    ($check:expr, $what:expr) => {
        #[cfg(feature = "check-invariants")]
        if let Err(e) = $check {
            panic!("{} violates its invariants: {}", $what, e);
        }
    };
}
