//! `Dart`: the atomic handle every map relation operates on.
//!
//! A dart is a row index into the dart container of a map. The value
//! `u32::MAX` is reserved as [`Dart::NIL`], the "no dart" sentinel returned by
//! finished traversors.
//!
//! # Memory layout
//! `Dart` is `repr(transparent)` over `u32` and implements
//! [`bytemuck::Pod`], so relation columns can be exported as raw bytes.

use std::fmt;

#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct Dart(u32);

impl Dart {
    /// The "no dart" sentinel.
    pub const NIL: Dart = Dart(u32::MAX);

    /// Wraps a raw row index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Dart(raw)
    }

    /// Returns the raw row index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Returns the row index as `usize`, for slice indexing.
    #[inline]
    pub const fn idx(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_nil(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Dart {
    fn default() -> Self {
        Dart::NIL
    }
}

impl From<u32> for Dart {
    fn from(raw: u32) -> Self {
        Dart(raw)
    }
}

impl fmt::Debug for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("Dart(NIL)")
        } else {
            f.debug_tuple("Dart").field(&self.0).finish()
        }
    }
}

impl fmt::Display for Dart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            f.write_str("NIL")
        } else {
            write!(f, "{}", self.0)
        }
    }
}



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() {
        let d = Dart::new(123);
        let s = serde_json::to_string(&d).unwrap();
        assert_eq!(s, "123");
        let d2: Dart = serde_json::from_str(&s).unwrap();
        assert_eq!(d2, d);
    }

    #[test]
    fn bincode_roundtrip() {
        let d = Dart::new(456);
        let bytes = bincode::serialize(&d).unwrap();
        assert_eq!(bytes.len(), 4);
        let d2: Dart = bincode::deserialize(&bytes).unwrap();
        assert_eq!(d2, d);
    }
}
