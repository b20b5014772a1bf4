//! Marker chosen by traversors for the cells they yield.

use super::Marker;
use super::cell_marker::CellMarkerStore;
use super::dart_marker::DartMarkerStore;
use crate::map_error::MapError;
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::Orbit;

/// Cell-level store marker when `orbit` is embedded, dart-level otherwise.
///
/// With a dart marker, marking a cell marks every dart of its orbit, so both
/// variants answer `is_marked` for any dart of the cell.
#[derive(Debug)]
pub enum MarkerForTraversor<'m, M: MapTopology> {
    Cell(CellMarkerStore<'m, M>),
    Dart {
        orbit: Orbit,
        marker: DartMarkerStore<'m, M>,
    },
}

impl<'m, M: MapTopology> MarkerForTraversor<'m, M> {
    /// Marker on thread 0 with the default granularity.
    pub fn new(map: &'m M, orbit: Orbit) -> Self {
        if orbit != Orbit::Dart && map.is_orbit_embedded(orbit) {
            Self::Cell(CellMarkerStore::new(map, orbit))
        } else {
            Self::Dart {
                orbit,
                marker: DartMarkerStore::new(map),
            }
        }
    }

    pub fn with_options(
        map: &'m M,
        orbit: Orbit,
        force_dart_marker: bool,
        thread: usize,
    ) -> Result<Self, MapError> {
        if !force_dart_marker && orbit != Orbit::Dart && map.is_orbit_embedded(orbit) {
            Ok(Self::Cell(CellMarkerStore::with_thread(map, orbit, thread)?))
        } else {
            Ok(Self::Dart {
                orbit,
                marker: DartMarkerStore::with_thread(map, thread)?,
            })
        }
    }

    pub fn orbit(&self) -> Orbit {
        match self {
            Self::Cell(cm) => cm.orbit(),
            Self::Dart { orbit, .. } => *orbit,
        }
    }

    pub fn is_cell_marker(&self) -> bool {
        matches!(self, Self::Cell(_))
    }
}

impl<M: MapTopology> Marker for MarkerForTraversor<'_, M> {
    fn mark(&mut self, d: Dart) {
        match self {
            Self::Cell(cm) => cm.mark(d),
            Self::Dart { orbit, marker } => marker.mark_orbit(*orbit, d),
        }
    }

    fn unmark(&mut self, d: Dart) {
        match self {
            Self::Cell(cm) => cm.unmark(d),
            Self::Dart { orbit, marker } => marker.unmark_orbit(*orbit, d),
        }
    }

    fn is_marked(&self, d: Dart) -> bool {
        match self {
            Self::Cell(cm) => cm.is_marked(d),
            Self::Dart { marker, .. } => marker.is_marked(d),
        }
    }

    fn unmark_all(&mut self) {
        match self {
            Self::Cell(cm) => cm.unmark_all(),
            Self::Dart { marker, .. } => marker.unmark_all(),
        }
    }

    fn is_all_unmarked(&self) -> bool {
        match self {
            Self::Cell(cm) => cm.is_all_unmarked(),
            Self::Dart { marker, .. } => marker.is_all_unmarked(),
        }
    }
}
