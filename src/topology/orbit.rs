//! Orbit identifiers.
//!
//! Orbits are also used as const-generic parameters (`usize`) by attribute
//! handlers and traversors; the `DART`..`VOLUME` constants are those values.

use serde::{Deserialize, Serialize};

/// Sentinel embedding meaning "no row".
pub const EMBNULL: u32 = u32::MAX;

pub const DART: usize = 0;
pub const VERTEX: usize = 1;
pub const EDGE: usize = 2;
pub const FACE: usize = 3;
pub const VOLUME: usize = 4;

/// Number of orbit kinds (and attribute containers per map).
pub const NB_ORBITS: usize = 5;

/// Cell kind a dart set describes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orbit {
    Dart = 0,
    Vertex = 1,
    Edge = 2,
    Face = 3,
    Volume = 4,
}

impl Orbit {
    pub const ALL: [Orbit; NB_ORBITS] = [
        Orbit::Dart,
        Orbit::Vertex,
        Orbit::Edge,
        Orbit::Face,
        Orbit::Volume,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Maps a const-generic orbit id back to the enum.
    ///
    /// # Panics
    /// Panics if `id >= NB_ORBITS`.
    pub const fn from_index(id: usize) -> Orbit {
        match id {
            DART => Orbit::Dart,
            VERTEX => Orbit::Vertex,
            EDGE => Orbit::Edge,
            FACE => Orbit::Face,
            VOLUME => Orbit::Volume,
            _ => panic!("orbit id out of range"),
        }
    }

    /// Topological dimension of the cell (darts count as -1 and report `None`).
    pub const fn dimension(self) -> Option<usize> {
        match self {
            Orbit::Dart => None,
            Orbit::Vertex => Some(0),
            Orbit::Edge => Some(1),
            Orbit::Face => Some(2),
            Orbit::Volume => Some(3),
        }
    }
}
