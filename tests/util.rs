#![allow(dead_code)]
use hashbrown::HashSet;

use cgogn_kernel::topology::{Dart, GMap2, GMap3, Map2, Map3, MapTopology, Orbit, Phi2Map};

/// Two triangles sewn along one edge, closed by a boundary face.
pub fn two_triangles() -> (Map2, Dart, Dart) {
    let mut m = Map2::new();
    let a = m.new_face(3, true);
    let b = m.new_face(3, true);
    m.sew_faces(a, b, true);
    (m, a, b)
}

/// A strip of `n` quads sewn side by side, then closed.
pub fn quad_strip(n: usize) -> (Map2, Dart) {
    let mut m = Map2::new();
    let first = m.new_face(4, false);
    let mut prev = first;
    for _ in 1..n {
        let q = m.new_face(4, false);
        let side = m.phi1(m.phi1(prev));
        m.sew_faces(side, q, false);
        prev = q;
    }
    m.close_map();
    (m, first)
}

/// Two tetrahedra glued along one face, inside a closing shell.
pub fn glued_tetrahedra() -> (Map3, Dart, Dart) {
    let mut m = Map3::new();
    let a = m.new_pyramid(3);
    let b = m.new_pyramid(3);
    m.close_map();
    m.sew_volumes(a, b, true);
    (m, a, b)
}

pub fn gmap_triangles() -> (GMap2, Dart, Dart) {
    let mut m = GMap2::new();
    let a = m.new_face(3, true);
    let b = m.new_face(3, true);
    m.sew_faces(a, b, true);
    (m, a, b)
}

pub fn gmap_prism_and_pyramid() -> (GMap3, Dart, Dart) {
    let mut m = GMap3::new();
    let a = m.new_prism(4);
    let b = m.new_pyramid(4);
    m.close_map();
    (m, a, b)
}

/// Cells counted by walking orbits from every live dart, closing cells of
/// the map's dimension excluded.
pub fn brute_force_cells<M: MapTopology>(m: &M, orbit: Orbit) -> usize {
    let mut seen: HashSet<Dart> = HashSet::new();
    let mut n = 0;
    for d in m.darts() {
        if seen.contains(&d) || m.is_boundary_marked(d) {
            continue;
        }
        n += 1;
        m.foreach_dart_of_orbit(orbit, d, |e| {
            seen.insert(e);
        });
    }
    n
}

/// Whether no two darts of `darts` share an `orbit` cell.
pub fn pairwise_distinct<M: MapTopology>(m: &M, orbit: Orbit, darts: &[Dart]) -> bool {
    darts
        .iter()
        .enumerate()
        .all(|(i, &a)| darts[i + 1..].iter().all(|&b| !m.same_orbit(orbit, a, b)))
}
