//! [`DebugInvariants`] for every map kind, backed by their `check()` pass.

use crate::debug_invariants::DebugInvariants;
use crate::map_error::MapError;
use crate::topology::map::gmap2::GMap2;
use crate::topology::map::gmap3::GMap3;
use crate::topology::map::map2::Map2;
use crate::topology::map::map3::Map3;

macro_rules! map_invariants {
    ($($map:ty),+ $(,)?) => {
        $(
            impl DebugInvariants for $map {
                fn validate_invariants(&self) -> Result<(), MapError> {
                    self.check().into_result().map(|_| ())
                }
            }
        )+
    };
}

map_invariants!(Map2, Map3, GMap2, GMap3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map_error::TopologyDefect;
    use crate::topology::map::ops2::PHI2;
    use crate::topology::map::{BOUNDARY2, BOUNDARY3, MapTopology, Phi2Map};
    use crate::topology::orbit::Orbit;

    #[test]
    fn closed_maps_validate() {
        let mut m2 = Map2::new();
        m2.new_face(5, true);
        m2.validate_invariants().unwrap();

        let mut m3 = Map3::new();
        m3.new_prism(4);
        m3.close_map();
        m3.validate_invariants().unwrap();

        let mut g2 = GMap2::new();
        g2.new_face(3, true);
        g2.validate_invariants().unwrap();

        let mut g3 = GMap3::new();
        g3.new_pyramid(4);
        g3.close_map();
        g3.validate_invariants().unwrap();
    }

    #[test]
    fn broken_phi2_is_reported() {
        let mut m = Map2::new();
        let d = m.new_face(3, true);
        let e = m.phi2(d);
        m.base_mut().set_relation(PHI2, d, d);
        let err = m.validate_invariants().unwrap_err();
        assert!(matches!(
            err,
            MapError::Inconsistent(TopologyDefect::NotAnInvolution { .. })
        ));
        m.base_mut().set_relation(PHI2, d, e);
        m.validate_invariants().unwrap();
    }

    #[test]
    fn partly_marked_closing_cells_are_reported() {
        let mut m = Map2::new();
        let d = m.new_face(4, true);
        let hole = m.phi1(m.phi2(d));
        m.base_mut().boundary_unmark(BOUNDARY2, hole);
        let report = m.check();
        assert_eq!(
            report.defects,
            vec![TopologyDefect::MixedBoundary { orbit: Orbit::Face, dart: hole }]
        );
        m.base_mut().boundary_mark(BOUNDARY2, hole);
        m.validate_invariants().unwrap();

        let mut m3 = Map3::new();
        let p = m3.new_pyramid(4);
        m3.close_map();
        let shell = m3.phi1(m3.phi2(m3.phi3(p)));
        m3.base_mut().boundary_unmark(BOUNDARY3, shell);
        let err = m3.validate_invariants().unwrap_err();
        assert_eq!(
            err,
            MapError::Inconsistent(TopologyDefect::MixedBoundary {
                orbit: Orbit::Volume,
                dart: shell,
            })
        );
    }
}
