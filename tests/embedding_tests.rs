mod util;

use cgogn_kernel::prelude::*;
use cgogn_kernel::topology::orbit::{FACE, VERTEX};
use util::two_triangles;

#[test]
fn shared_rows_are_split_by_bijective_embedding() {
    let (mut m, a, _) = two_triangles();
    let id = m.add_attribute::<u32, VERTEX>("id").unwrap();
    let vertices = TraversorCell::new(&m, Orbit::Vertex).collect_darts();
    for (i, &v) in vertices.iter().enumerate() {
        id.set(&mut m, v, i as u32 + 1);
    }
    let apex = m.phi_1(a);
    let row = m.embedding(Orbit::Vertex, a);
    m.set_orbit_embedding(Orbit::Vertex, apex, row);
    assert_eq!(m.base().container(Orbit::Vertex).size(), 3);
    assert!(m.check().defects.iter().any(|d| matches!(
        d,
        TopologyDefect::SharedEmbedding { orbit: Orbit::Vertex, row: r } if *r == row
    )));

    m.bijective_orbit_embedding(Orbit::Vertex);
    assert_eq!(m.base().container(Orbit::Vertex).size(), 4);
    assert_ne!(m.embedding(Orbit::Vertex, apex), m.embedding(Orbit::Vertex, a));
    assert_eq!(id.get(&m, apex), id.get(&m, a));
    let report = m.check();
    assert!(report.is_valid(), "{:?}", report.defects);

    // already bijective: nothing moves
    let before: Vec<u32> = m.darts().map(|d| m.embedding(Orbit::Vertex, d)).collect();
    m.bijective_orbit_embedding(Orbit::Vertex);
    let after: Vec<u32> = m.darts().map(|d| m.embedding(Orbit::Vertex, d)).collect();
    assert_eq!(before, after);
}

#[test]
fn copy_cell_copies_every_column() {
    let (mut m, a, b) = two_triangles();
    let area = m.add_attribute::<f64, FACE>("area").unwrap();
    let name = m.add_attribute::<String, FACE>("name").unwrap();
    area.set(&mut m, a, 2.5);
    name.set(&mut m, a, "left".to_owned());
    m.copy_cell(Orbit::Face, b, a);
    assert_eq!(*area.get(&m, b), 2.5);
    assert_eq!(name.get(&m, b), "left");
    assert!(!m.same_orbit(Orbit::Face, a, b));
    area.set(&mut m, b, 1.0);
    assert_eq!(*area.get(&m, a), 2.5);

    // orbits without embedding are left alone
    m.copy_cell(Orbit::Edge, b, a);
    assert!(!m.is_orbit_embedded(Orbit::Edge));
}

#[test]
fn try_embedding_needs_an_embedded_orbit() {
    let (mut m, a, _) = two_triangles();
    assert_eq!(
        m.try_embedding(Orbit::Edge, a),
        Err(MapError::OrbitNotEmbedded(Orbit::Edge))
    );
    m.add_embedding(Orbit::Edge);
    let row = m.try_embedding(Orbit::Edge, a).unwrap();
    assert_eq!(row, m.embedding(Orbit::Edge, a));
    assert_eq!(m.try_embedding(Orbit::Edge, m.phi2(a)), Ok(row));
    assert!(m.try_embedding(Orbit::Volume, a).is_err());
}
