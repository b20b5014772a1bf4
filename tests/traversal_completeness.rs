mod util;

use cgogn_kernel::prelude::*;
use util::{brute_force_cells, pairwise_distinct};

const ORBITS: [Orbit; 5] = [
    Orbit::Dart,
    Orbit::Vertex,
    Orbit::Edge,
    Orbit::Face,
    Orbit::Volume,
];

fn assert_complete<M: MapTopology>(m: &M) {
    for orbit in ORBITS {
        let darts = TraversorCell::new(m, orbit).collect_darts();
        assert_eq!(darts.len(), brute_force_cells(m, orbit), "{orbit:?}");
        assert!(pairwise_distinct(m, orbit, &darts), "{orbit:?} repeated a cell");
    }
}

#[test]
fn map2_strip() {
    let (mut m, _) = util::quad_strip(3);
    assert_eq!(nb_cells(&m, Orbit::Vertex), 8);
    assert_eq!(nb_cells(&m, Orbit::Edge), 10);
    assert_eq!(nb_cells(&m, Orbit::Face), 3);
    assert_complete(&m);
    m.add_embedding(Orbit::Vertex);
    m.add_embedding(Orbit::Face);
    assert_complete(&m);
}

#[test]
fn map3_glued_tetrahedra() {
    let (mut m, _, _) = util::glued_tetrahedra();
    assert_eq!(nb_cells(&m, Orbit::Vertex), 5);
    assert_eq!(nb_cells(&m, Orbit::Face), 7);
    assert_eq!(nb_cells(&m, Orbit::Volume), 2);
    assert_complete(&m);
    m.add_embedding(Orbit::Edge);
    assert_complete(&m);
}

#[test]
fn gmaps() {
    let (g2, _, _) = util::gmap_triangles();
    assert_eq!(nb_cells(&g2, Orbit::Vertex), 4);
    assert_eq!(nb_cells(&g2, Orbit::Edge), 5);
    assert_complete(&g2);

    let (g3, _, _) = util::gmap_prism_and_pyramid();
    assert_eq!(nb_cells(&g3, Orbit::Volume), 2);
    assert_eq!(nb_cells(&g3, Orbit::Vertex), 13);
    assert_complete(&g3);
}

#[test]
fn builder_options_agree() {
    let (mut m, _) = util::quad_strip(4);
    m.add_embedding(Orbit::Edge);
    m.add_thread_marker(1);
    let by_cells = CellTraversal::new(&m).orbit(Orbit::Edge).count().unwrap();
    let by_darts = CellTraversal::new(&m)
        .orbit(Orbit::Edge)
        .force_dart_marker(true)
        .thread(1)
        .count()
        .unwrap();
    assert_eq!(by_cells, by_darts);
    let mut firsts = Vec::new();
    CellTraversal::new(&m)
        .orbit(Orbit::Face)
        .for_each(|d| firsts.push(d))
        .unwrap();
    assert_eq!(firsts.len(), 4);
}

#[test]
fn incident_traversors_match_orbit_walks() {
    let (m, a, _) = util::glued_tetrahedra();
    for x in [Orbit::Vertex, Orbit::Edge, Orbit::Face, Orbit::Volume] {
        for y in [Orbit::Vertex, Orbit::Edge, Orbit::Face, Orbit::Volume] {
            if x == y {
                continue;
            }
            let ys = Traversor3XY::new(&m, a, x, y).collect_darts();
            assert!(pairwise_distinct(&m, y, &ys), "{x:?}->{y:?}");
            assert!(ys.iter().all(|&e| !m.is_boundary_cell(y, e)));
        }
    }
}

#[test]
fn surface_incidence_is_symmetric() {
    let (m, first) = util::quad_strip(3);
    let around = Traversor2::vertex_faces(&m, m.phi1(m.phi1(first))).collect_darts();
    for f in around {
        let vs = Traversor2::face_vertices(&m, f).collect_darts();
        assert!(vs.iter().any(|&v| m.same_vertex(v, m.phi1(m.phi1(first)))));
    }
}
