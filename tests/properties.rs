mod util;

use proptest::prelude::*;

use cgogn_kernel::prelude::*;

const FACES: usize = 6;

fn sewn_triangles(ops: &[(bool, u16, u16)]) -> Map2 {
    let mut m = Map2::new();
    for _ in 0..FACES {
        m.new_face(3, false);
    }
    let darts: Vec<Dart> = m.darts().collect();
    for &(sew, i, j) in ops {
        let d = darts[i as usize % darts.len()];
        let e = darts[j as usize % darts.len()];
        if sew {
            if d != e && m.is_phi2_fixed(d) && m.is_phi2_fixed(e) {
                m.phi2sew(d, e);
            }
        } else if !m.is_phi2_fixed(d) {
            m.phi2unsew(d);
        }
    }
    m
}

fn sew_ops() -> impl Strategy<Value = Vec<(bool, u16, u16)>> {
    prop::collection::vec((any::<bool>(), any::<u16>(), any::<u16>()), 0..60)
}

fn phi1_degree<M: Phi2Map>(m: &M, d: Dart) -> usize {
    let mut n = 1;
    let mut it = m.phi1(d);
    while it != d {
        n += 1;
        it = m.phi1(it);
    }
    n
}

/// Cuts edges (`false`) or splits faces (`true`) of real faces. Returns the
/// number of cuts and of splits done.
fn edit_faces<M: Phi2Map>(
    m: &mut M,
    ops: &[(bool, u16)],
    cut: fn(&mut M, Dart) -> Dart,
    split: fn(&mut M, Dart, Dart) -> Dart,
) -> (usize, usize) {
    let (mut cuts, mut splits) = (0, 0);
    for &(split_op, k) in ops {
        let faces = TraversorCell::new(&*m, Orbit::Face).collect_darts();
        let mut d = faces[k as usize % faces.len()];
        for _ in 0..k % 5 {
            d = m.phi1(d);
        }
        if !split_op {
            cut(m, d);
            cuts += 1;
        } else if phi1_degree(m, d) >= 4 {
            let e = m.phi1(m.phi1(d));
            split(m, d, e);
            splits += 1;
        }
    }
    (cuts, splits)
}

proptest! {
    #[test]
    fn phi2_stays_an_involution(ops in sew_ops()) {
        let m = sewn_triangles(&ops);
        for d in m.darts() {
            prop_assert_eq!(m.phi2(m.phi2(d)), d);
            prop_assert_eq!(m.phi_1(m.phi1(d)), d);
        }
        prop_assert!(m.check().is_valid());
    }

    #[test]
    fn orbits_are_closed(ops in sew_ops()) {
        let m = sewn_triangles(&ops);
        for orbit in [Orbit::Vertex, Orbit::Edge, Orbit::Face, Orbit::Volume] {
            for d in m.darts() {
                let darts = m.orbit_darts(orbit, d);
                prop_assert_eq!(darts[0], d);
                for &e in &darts {
                    prop_assert_eq!(m.orbit_size(orbit, e), darts.len());
                    prop_assert!(m.same_orbit(orbit, e, d));
                }
            }
        }
    }

    #[test]
    fn traversal_matches_brute_force(ops in sew_ops()) {
        let m = sewn_triangles(&ops);
        for orbit in [Orbit::Vertex, Orbit::Edge, Orbit::Face, Orbit::Volume] {
            prop_assert_eq!(nb_cells(&m, orbit), util::brute_force_cells(&m, orbit));
        }
    }

    #[test]
    fn edits_keep_the_closing_face(ops in prop::collection::vec(any::<(bool, u16)>(), 0..25)) {
        let (mut m, _, _) = util::two_triangles();
        let (cuts, splits) = edit_faces(&mut m, &ops, Map2::cut_edge, Map2::split_face);
        let report = m.check();
        prop_assert!(report.is_valid(), "{:?}", report.defects);
        prop_assert_eq!(report.boundary_faces, 1);
        prop_assert_eq!(nb_cells(&m, Orbit::Face), 2 + splits);
        prop_assert_eq!(nb_cells(&m, Orbit::Vertex), 4 + cuts);
        prop_assert_eq!(nb_cells(&m, Orbit::Edge), 5 + cuts + splits);

        let (mut g, _, _) = util::gmap_triangles();
        let (cuts, splits) = edit_faces(&mut g, &ops, GMap2::cut_edge, GMap2::split_face);
        let report = g.check();
        prop_assert!(report.is_valid(), "{:?}", report.defects);
        prop_assert_eq!(report.boundary_faces, 1);
        prop_assert_eq!(nb_cells(&g, Orbit::Face), 2 + splits);
        prop_assert_eq!(nb_cells(&g, Orbit::Vertex), 4 + cuts);
    }

    #[test]
    fn container_size_tracks_live_rows(ops in prop::collection::vec(any::<Option<u8>>(), 0..300)) {
        let mut c = AttributeContainer::new(Orbit::Edge);
        c.add_attribute::<u16>("tag").unwrap();
        let mut live: Vec<u32> = Vec::new();
        for op in ops {
            match op {
                Some(k) if !live.is_empty() => {
                    let r = live.swap_remove(k as usize % live.len());
                    prop_assert!(c.unref_line(r));
                }
                _ => {
                    let r = c.insert_line();
                    prop_assert!(!live.contains(&r));
                    live.push(r);
                }
            }
        }
        prop_assert_eq!(c.size(), live.len());
        prop_assert!(c.validate_invariants().is_ok());
    }
}

#[test]
fn dart_serializes_as_its_index() {
    let d = Dart::new(42);
    assert_eq!(serde_json::to_string(&d).unwrap(), "42");
    let back: Dart = serde_json::from_str("42").unwrap();
    assert_eq!(back, d);
    let bytes = bincode::serialize(&d).unwrap();
    assert_eq!(bytes.len(), 4);
    assert_eq!(bincode::deserialize::<Dart>(&bytes).unwrap(), d);
    assert_eq!(bytemuck::cast::<Dart, u32>(d), 42);
}

#[test]
fn orbit_round_trips_through_json() {
    let s = serde_json::to_string(&Orbit::Face).unwrap();
    assert_eq!(serde_json::from_str::<Orbit>(&s).unwrap(), Orbit::Face);
}
