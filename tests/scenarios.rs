mod util;

use cgogn_kernel::prelude::*;
use util::two_triangles;

#[test]
fn single_quad_face() {
    let mut m = Map2::new();
    let d = m.new_face(4, false);
    assert_eq!(m.vertex_degree(d), 2);
    assert_eq!(m.face_degree(d), 4);
    let vertices = Traversor2::face_vertices(&m, d).collect_darts();
    assert_eq!(vertices.len(), 4);
    assert!(util::pairwise_distinct(&m, Orbit::Vertex, &vertices));

    let mut closed = Map2::new();
    let d = closed.new_face(4, true);
    assert_eq!(closed.vertex_degree(d), 2);
    assert_eq!(Traversor2::face_vertices(&closed, d).iter().count(), 4);
}

#[test]
fn two_triangles_sewn_and_unsewn() {
    let mut m = Map2::new();
    let d = m.new_face(3, false);
    let e = m.new_face(3, false);
    m.phi2sew(d, e);
    assert_eq!(m.phi2(d), e);
    assert_eq!(m.phi2(e), d);
    assert!(m.same_edge(d, e));
    assert!(m.check().is_valid());

    m.phi2unsew(d);
    assert_eq!(m.phi2(d), d);
    assert_eq!(m.phi2(e), e);
    assert!(!m.same_edge(d, e));
}

#[test]
fn refcounted_rows_are_reused() {
    let mut c = AttributeContainer::new(Orbit::Vertex);
    let rows: Vec<u32> = (0..100).map(|_| c.insert_line()).collect();
    for &r in rows.iter().step_by(2) {
        assert!(c.unref_line(r));
    }
    assert_eq!(c.size(), 50);
    let freed: Vec<u32> = rows.iter().copied().step_by(2).collect();
    for _ in 0..50 {
        let r = c.insert_line();
        assert!(freed.contains(&r), "row {r} was not reused");
    }
    assert_eq!(c.size(), 100);
    assert_eq!(c.end(), 100);
    c.validate_invariants().unwrap();
}

#[test]
fn closed_tetrahedron() {
    let mut m = Map3::new();
    let d = m.new_pyramid(3);
    assert_eq!(m.face_degree(d), 3);
    let report = m.check();
    assert!(report.is_valid(), "{:?}", report.defects);
    assert_eq!(report.boundary_faces, 0);
    assert!(m.darts().all(|x| !m.is_boundary_volume(x)));
    assert_eq!(nb_cells(&m, Orbit::Face), 4);
    assert_eq!(nb_cells(&m, Orbit::Vertex), 4);
}

#[test]
fn nested_cell_and_dart_marker_traversals() {
    let (mut m, _, _) = two_triangles();
    m.add_embedding(Orbit::Vertex);
    let all_vertices = TraversorCell::new(&m, Orbit::Vertex).collect_darts();
    let all_edges = TraversorCell::new(&m, Orbit::Edge).collect_darts();
    assert_eq!(all_vertices.len(), 4);
    assert_eq!(all_edges.len(), 5);

    let mut vertices = TraversorCell::new(&m, Orbit::Vertex);
    assert!(vertices.uses_cell_marker());
    let mut outer = Vec::new();
    for v in vertices.iter() {
        let mut edges = TraversorCell::new(&m, Orbit::Edge);
        assert!(!edges.uses_cell_marker());
        assert_eq!(edges.collect_darts(), all_edges);
        // same orbit, second cell marker
        assert_eq!(TraversorCell::new(&m, Orbit::Vertex).collect_darts(), all_vertices);
        let incident = Traversor2::vertex_edges(&m, v).iter().count();
        assert!(incident == 2 || incident == 3);
        outer.push(v);
    }
    assert_eq!(outer, all_vertices);
    // a second run of the same traversor starts from a clean marker
    assert_eq!(vertices.collect_darts(), all_vertices);
    drop(vertices);
    assert!(DartMarker::new(&m).is_all_unmarked());
    assert!(CellMarker::new(&m, Orbit::Vertex).is_all_unmarked());
}

#[test]
fn nested_traversals_on_volumes() {
    let (mut m, a, b) = util::glued_tetrahedra();
    m.add_embedding(Orbit::Vertex);
    let all_volumes = TraversorCell::new(&m, Orbit::Volume).collect_darts();
    let all_vertices = TraversorCell::new(&m, Orbit::Vertex).collect_darts();
    assert_eq!(all_volumes.len(), 2);
    assert_eq!(all_vertices.len(), 5);

    let mut volumes = TraversorCell::new(&m, Orbit::Volume);
    assert!(!volumes.uses_cell_marker());
    let mut outer = Vec::new();
    for vol in volumes.iter() {
        let around = Traversor3XY::new(&m, vol, Orbit::Volume, Orbit::Vertex).collect_darts();
        assert_eq!(around.len(), 4);
        assert!(util::pairwise_distinct(&m, Orbit::Vertex, &around));
        assert_eq!(TraversorCell::new(&m, Orbit::Volume).collect_darts(), all_volumes);
        assert_eq!(TraversorCell::new(&m, Orbit::Vertex).collect_darts(), all_vertices);
        outer.push(vol);
    }
    assert_eq!(outer, all_volumes);
    assert!(m.same_orbit(Orbit::Volume, outer[0], a));
    assert!(m.same_orbit(Orbit::Volume, outer[1], b));
    drop(volumes);
    assert!(DartMarker::new(&m).is_all_unmarked());
    assert!(CellMarker::new(&m, Orbit::Vertex).is_all_unmarked());
}

#[test]
fn lent_marker_spans_several_traversals() {
    let (mut m, _, _) = util::glued_tetrahedra();
    m.add_embedding(Orbit::Vertex);
    let mut lent = MarkerForTraversor::new(&m, Orbit::Vertex);
    assert!(lent.is_cell_marker());
    let mut fresh_per_volume = Vec::new();
    for vol in TraversorCell::new(&m, Orbit::Volume).iter() {
        let owned = Traversor3XY::new(&m, vol, Orbit::Volume, Orbit::Vertex).collect_darts();
        assert_eq!(owned.len(), 4);
        let fresh = Traversor3XY::with_marker(&m, vol, Orbit::Volume, &mut lent).collect_darts();
        assert!(fresh.iter().all(|&v| lent.is_marked(v)));
        // the owned traversor never sees the lent marks
        let again = Traversor3XY::new(&m, vol, Orbit::Volume, Orbit::Vertex).collect_darts();
        assert_eq!(again, owned);
        fresh_per_volume.push(fresh.len());
    }
    assert_eq!(fresh_per_volume, vec![4, 1]);
    assert!(m.darts().all(|d| lent.is_marked(d)));
    lent.unmark_all();
    assert!(lent.is_all_unmarked());
    drop(lent);
    assert!(CellMarker::new(&m, Orbit::Vertex).is_all_unmarked());
}
