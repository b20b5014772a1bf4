//! Keeping cell embeddings consistent with the topology.
//!
//! Every embedded orbit stores, per dart, the row of its cell. The reference
//! count of a row equals the number of darts pointing at it. Topological
//! operators call [`repair`] with the darts around the edit; for each orbit
//! met there the row is chosen as follows:
//! - a row held only by darts of this orbit is kept (the most used one when
//!   cells were merged; the others are released);
//! - otherwise the orbit was split off a bigger cell and receives a copy of
//!   its most used row;
//! - an orbit made only of new darts receives a fresh default row.

use hashbrown::HashSet;
use smallvec::SmallVec;

use super::MapTopology;
use crate::topology::dart::Dart;
use crate::topology::orbit::{EMBNULL, Orbit};

pub(crate) fn set_orbit_embedding<M: MapTopology + ?Sized>(
    m: &mut M,
    orbit: Orbit,
    d: Dart,
    row: u32,
) {
    for e in m.orbit_darts(orbit, d) {
        m.base_mut().set_dart_embedding(orbit, e, row);
    }
}

pub(crate) fn new_cell<M: MapTopology + ?Sized>(m: &mut M, orbit: Orbit, d: Dart) -> u32 {
    let row = m.base_mut().new_cell_row(orbit);
    set_orbit_embedding(m, orbit, d, row);
    m.base_mut().release_new_cell(orbit, row);
    row
}

pub(crate) fn init_all_orbits_embedding<M: MapTopology + ?Sized>(m: &mut M, orbit: Orbit) {
    if orbit == Orbit::Dart || !m.is_orbit_embedded(orbit) {
        return;
    }
    let darts: Vec<Dart> = m.darts().collect();
    let mut created = 0usize;
    for d in darts {
        if m.embedding(orbit, d) == EMBNULL {
            new_cell(m, orbit, d);
            created += 1;
        }
    }
    log::debug!("{orbit:?}: {created} cells embedded");
}

pub(crate) fn bijective_orbit_embedding<M: MapTopology + ?Sized>(m: &mut M, orbit: Orbit) {
    if orbit == Orbit::Dart || !m.is_orbit_embedded(orbit) {
        return;
    }
    let darts: Vec<Dart> = m.darts().collect();
    let mut visited: HashSet<Dart> = HashSet::new();
    let mut seen_rows: HashSet<u32> = HashSet::new();
    for d in darts {
        if visited.contains(&d) {
            continue;
        }
        let cell = m.orbit_darts(orbit, d);
        visited.extend(cell.iter().copied());
        let row = m.embedding(orbit, d);
        if row == EMBNULL {
            new_cell(m, orbit, d);
        } else if !seen_rows.insert(row) {
            let fresh = m.base_mut().new_cell_row(orbit);
            m.base_mut().container_mut(orbit).copy_line(fresh, row);
            set_orbit_embedding(m, orbit, d, fresh);
            m.base_mut().release_new_cell(orbit, fresh);
            seen_rows.insert(fresh);
        }
    }
}

/// Row choice for one orbit, see the module docs.
enum RowChoice {
    Keep(u32),
    CopyOf(u32),
    Fresh,
}

fn choose_row<M: MapTopology + ?Sized>(m: &M, orbit: Orbit, darts: &[Dart]) -> RowChoice {
    let mut counts: SmallVec<[(u32, u32); 4]> = SmallVec::new();
    for &d in darts {
        let r = m.embedding(orbit, d);
        if r == EMBNULL {
            continue;
        }
        match counts.iter_mut().find(|(row, _)| *row == r) {
            Some((_, c)) => *c += 1,
            None => counts.push((r, 1)),
        }
    }
    let container = m.base().container(orbit);
    let mut owned: Option<(u32, u32)> = None;
    let mut frequent: Option<(u32, u32)> = None;
    for &(r, c) in &counts {
        if container.nb_refs(r) == c && owned.is_none_or(|(_, best)| c > best) {
            owned = Some((r, c));
        }
        if frequent.is_none_or(|(_, best)| c > best) {
            frequent = Some((r, c));
        }
    }
    match (owned, frequent) {
        (Some((r, _)), _) => RowChoice::Keep(r),
        (None, Some((r, _))) => RowChoice::CopyOf(r),
        (None, None) => RowChoice::Fresh,
    }
}

pub(crate) fn repair<M: MapTopology + ?Sized>(m: &mut M, touched: &[Dart]) {
    let columns = m.base().embedding_columns();
    if columns.iter().skip(1).all(Option::is_none) {
        return;
    }
    for orbit in Orbit::ALL {
        if orbit == Orbit::Dart || columns[orbit.index()].is_none() {
            continue;
        }
        let mut done: HashSet<Dart> = HashSet::new();
        for &t in touched {
            if !m.is_alive(t) || done.contains(&t) {
                continue;
            }
            let darts = m.orbit_darts(orbit, t);
            done.extend(darts.iter().copied());
            let (row, fresh) = match choose_row(m, orbit, &darts) {
                RowChoice::Keep(r) => (r, false),
                RowChoice::CopyOf(src) => {
                    let r = m.base_mut().new_cell_row(orbit);
                    m.base_mut().container_mut(orbit).copy_line(r, src);
                    (r, true)
                }
                RowChoice::Fresh => (m.base_mut().new_cell_row(orbit), true),
            };
            for &e in &darts {
                m.base_mut().set_dart_embedding(orbit, e, row);
            }
            if fresh {
                m.base_mut().release_new_cell(orbit, row);
            }
        }
    }
    crate::heavy_invariants!(
        crate::topology::validation::check_embeddings(&*m)
            .map_err(crate::map_error::MapError::from),
        "embedding repair"
    );
}

/// Drops the `orbit` embedding of darts that changed cell, so that
/// [`repair`] does not mistake their stale row for the one of their new cell.
pub(crate) fn forget<M: MapTopology + ?Sized>(m: &mut M, orbit: Orbit, darts: &[Dart]) {
    if !m.is_orbit_embedded(orbit) || orbit == Orbit::Dart {
        return;
    }
    for &d in darts {
        m.base_mut().set_dart_embedding(orbit, d, EMBNULL);
    }
}
