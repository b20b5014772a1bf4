//! Relation-level operators shared by `Map2` and `Map3`.
//!
//! These functions only rewire `phi1`/`phi_1`/`phi2`; embeddings are left to
//! the callers. A dart added to an existing face carries the boundary flags
//! of that face.

use super::base::MapBase;
use crate::topology::dart::Dart;

pub const PHI1: usize = 0;
pub const PHI_1: usize = 1;
pub const PHI2: usize = 2;
pub const PHI3: usize = 3;

#[inline]
pub fn phi1(b: &MapBase, d: Dart) -> Dart {
    b.relation(PHI1, d)
}

#[inline]
pub fn phi_1(b: &MapBase, d: Dart) -> Dart {
    b.relation(PHI_1, d)
}

#[inline]
pub fn phi2(b: &MapBase, d: Dart) -> Dart {
    b.relation(PHI2, d)
}

#[inline]
pub fn phi1sew(b: &mut MapBase, d: Dart, e: Dart) {
    b.permutation_sew(PHI1, PHI_1, d, e);
}

#[inline]
pub fn phi1unsew(b: &mut MapBase, d: Dart) {
    b.permutation_unsew(PHI1, PHI_1, d);
}

/// Darts of the `phi1` cycle of `d`, `d` first.
pub fn cycle(b: &MapBase, d: Dart) -> super::OrbitDarts {
    let mut v = super::OrbitDarts::new();
    let mut it = d;
    loop {
        v.push(it);
        it = phi1(b, it);
        if it == d {
            return v;
        }
    }
}

pub fn cycle_degree(b: &MapBase, d: Dart) -> usize {
    let mut n = 1;
    let mut it = phi1(b, d);
    while it != d {
        n += 1;
        it = phi1(b, it);
    }
    n
}

/// New `phi1` cycle of `n` darts.
pub fn new_cycle(b: &mut MapBase, n: usize) -> Dart {
    assert!(n > 0, "a cycle needs at least one dart");
    let d = b.new_dart();
    for _ in 1..n {
        let e = b.new_dart();
        phi1sew(b, d, e);
    }
    d
}

/// Deletes every dart of the `phi1` cycle of `d`.
pub fn delete_cycle(b: &mut MapBase, d: Dart) {
    for e in cycle(b, d) {
        b.delete_dart(e);
    }
}

/// Inserts a new dart after `d` in its cycle. The new dart joins the same
/// face, so it takes the boundary flags of `d`.
pub fn cut_edge_1(b: &mut MapBase, d: Dart) -> Dart {
    let nd = b.new_dart();
    b.copy_boundary_flags(d, nd);
    phi1sew(b, d, nd);
    nd
}

/// Removes and deletes the dart after `d`.
pub fn uncut_edge_1(b: &mut MapBase, d: Dart) {
    let nd = phi1(b, d);
    phi1unsew(b, d);
    b.delete_dart(nd);
}

/// New face of `n` edges. With `flag` non-zero it is closed by a reversed
/// boundary cycle carrying that flag. Returns a dart of the real face.
pub fn new_face(b: &mut MapBase, n: usize, flag: u8) -> Dart {
    let d = new_cycle(b, n);
    if flag != 0 {
        let mut e = new_cycle(b, n);
        let mut it = d;
        loop {
            b.involution_sew(PHI2, it, e);
            b.boundary_mark(flag, e);
            it = phi1(b, it);
            e = phi_1(b, e);
            if it == d {
                break;
            }
        }
    }
    d
}

/// Vertex walk of a 2-map: forward with `phi2 o phi_1` until the start or an
/// unsewn edge, then backward with `phi1 o phi2` from the start.
///
/// `f` receives every dart of the vertex once; the return value is the last
/// dart met going forward when the vertex is open.
pub fn foreach_dart_of_vertex<F: FnMut(Dart)>(b: &MapBase, d: Dart, mut f: F) -> Option<Dart> {
    let mut it = d;
    loop {
        f(it);
        let p = phi_1(b, it);
        let next = phi2(b, p);
        if next == p {
            break;
        }
        if next == d {
            return None;
        }
        it = next;
    }
    let open_end = it;
    let mut it = d;
    loop {
        let o = phi2(b, it);
        if o == it {
            return Some(open_end);
        }
        it = phi1(b, o);
        f(it);
    }
}

/// First boundary-marked dart around the vertex of `d`.
pub fn find_boundary_edge_of_vertex(b: &MapBase, flag: u8, d: Dart) -> Option<Dart> {
    let mut found = None;
    foreach_dart_of_vertex(b, d, |e| {
        if found.is_none() && b.is_boundary_marked(flag, e) {
            found = Some(e);
        }
    });
    found
}

/// Splits the edge of `d` (and of `phi2(d)`); returns the new dart after `d`.
pub fn cut_edge(b: &mut MapBase, d: Dart) -> Dart {
    let e = phi2(b, d);
    if e == d {
        return cut_edge_1(b, d);
    }
    b.involution_unsew(PHI2, d);
    let nd = cut_edge_1(b, d);
    let ne = cut_edge_1(b, e);
    b.involution_sew(PHI2, d, ne);
    b.involution_sew(PHI2, e, nd);
    nd
}

/// Inverse of [`cut_edge`]: removes the vertex between `d` and `phi1(d)`.
pub fn uncut_edge(b: &mut MapBase, d: Dart) {
    let nd = phi1(b, d);
    let ne = phi2(b, d);
    if ne == d {
        uncut_edge_1(b, d);
        return;
    }
    let e = phi2(b, nd);
    b.involution_unsew(PHI2, d);
    if e != nd {
        b.involution_unsew(PHI2, e);
        uncut_edge_1(b, e);
    }
    uncut_edge_1(b, d);
    if e != nd {
        b.involution_sew(PHI2, d, e);
    }
}

/// Splits the face of `d` and `e` with a new edge between their vertices.
/// Returns the new dart lying in the face of `d`; it starts at the vertex of
/// `e`.
pub fn split_face(b: &mut MapBase, d: Dart, e: Dart) -> Dart {
    debug_assert_ne!(d, e);
    let dd = phi_1(b, d);
    let ee = phi_1(b, e);
    let x = cut_edge_1(b, dd);
    let y = cut_edge_1(b, ee);
    // exchange successors of dd and ee: two cycles
    phi1sew(b, dd, ee);
    b.involution_sew(PHI2, x, y);
    x
}

/// Removes the edge of `d`, merging its two faces.
pub fn merge_faces(b: &mut MapBase, d: Dart) {
    let e = phi2(b, d);
    debug_assert_ne!(e, d);
    let pd = phi_1(b, d);
    phi1sew(b, pd, e);
    let pe = phi_1(b, e);
    phi1sew(b, pe, d);
    delete_cycle(b, d);
}

/// Rotates the edge of `d` one step forward in its two faces.
pub fn flip_edge(b: &mut MapBase, d: Dart) {
    let e = phi2(b, d);
    let (d_next, e_next) = (phi1(b, d), phi1(b, e));
    let (d_prev, e_prev) = (phi_1(b, d), phi_1(b, e));
    phi1sew(b, d, e_prev);
    phi1sew(b, e, d_prev);
    phi1sew(b, d, d_next);
    phi1sew(b, e, e_next);
}

/// Rotates the edge of `d` one step backward in its two faces.
pub fn flip_back_edge(b: &mut MapBase, d: Dart) {
    let e = phi2(b, d);
    let (d_prev, e_prev) = (phi_1(b, d), phi_1(b, e));
    phi1sew(b, d, e_prev);
    phi1sew(b, e, d_prev);
    let (dp, ep) = (phi_1(b, d_prev), phi_1(b, e_prev));
    phi1sew(b, d, dp);
    phi1sew(b, e, ep);
}

/// Sews two faces along `d` and `e`. With `flag` the darts are expected to
/// face boundary cycles, which are merged and trimmed.
pub fn sew_faces(b: &mut MapBase, d: Dart, e: Dart, flag: u8) {
    if flag == 0 {
        b.involution_sew(PHI2, d, e);
        return;
    }
    let dd = phi2(b, d);
    let ee = phi2(b, e);
    debug_assert!(b.is_boundary_marked(flag, dd) && b.is_boundary_marked(flag, ee));
    b.involution_unsew(PHI2, d);
    b.involution_unsew(PHI2, e);
    let pdd = phi_1(b, dd);
    if ee != pdd {
        phi1sew(b, ee, pdd);
    }
    let pee = phi_1(b, ee);
    if dd != pee {
        phi1sew(b, dd, pee);
    }
    delete_cycle(b, dd);
    b.involution_sew(PHI2, d, e);
}

/// Unsews the edge of `d`. With `flag` both sides get boundary darts linked
/// into the surrounding boundary cycles. Returns the new boundary darts.
pub fn unsew_faces(b: &mut MapBase, d: Dart, flag: u8) -> Option<(Dart, Dart)> {
    if flag == 0 {
        b.involution_unsew(PHI2, d);
        return None;
    }
    let dd = phi2(b, d);
    let e = new_cycle(b, 2);
    let ee = phi1(b, e);
    b.boundary_mark(flag, e);
    b.boundary_mark(flag, ee);
    let f = find_boundary_edge_of_vertex(b, flag, d);
    let ff = find_boundary_edge_of_vertex(b, flag, dd);
    if let Some(f) = f {
        let pf = phi_1(b, f);
        phi1sew(b, e, pf);
    }
    if let Some(ff) = ff {
        let pff = phi_1(b, ff);
        phi1sew(b, ee, pff);
    }
    b.involution_unsew(PHI2, d);
    b.involution_sew(PHI2, d, e);
    b.involution_sew(PHI2, dd, ee);
    Some((e, ee))
}

/// Removes the vertex of `d`, merging its faces. Returns a dart of the
/// merged face.
pub fn delete_vertex(b: &mut MapBase, d: Dart) -> Dart {
    let mut res = Dart::NIL;
    let mut vit = d;
    loop {
        if res.is_nil() && phi1(b, phi1(b, d)) != d {
            res = phi1(b, d);
        }
        let f = phi_1(b, phi2(b, vit));
        phi1sew(b, vit, f);
        vit = phi2(b, phi_1(b, vit));
        if vit == d {
            break;
        }
    }
    delete_cycle(b, d);
    res
}

/// Fills the hole bordered by the unsewn dart `d` with a new face and
/// returns a dart of it. With `flag` non-zero the face is marked as
/// boundary.
pub fn close_hole(b: &mut MapBase, d: Dart, flag: u8) -> Dart {
    debug_assert_eq!(phi2(b, d), d, "closing a hole from a sewn dart");
    let first = b.new_dart();
    b.involution_sew(PHI2, d, first);
    let mut d_next = d;
    loop {
        let mut d_phi1;
        loop {
            d_phi1 = phi1(b, d_next);
            d_next = phi2(b, d_phi1);
            if d_next == d_phi1 || d_phi1 == d {
                break;
            }
        }
        if d_phi1 == d {
            break;
        }
        let next = b.new_dart();
        phi1sew(b, first, next);
        b.involution_sew(PHI2, d_next, next);
    }
    if flag != 0 {
        for e in cycle(b, first) {
            b.boundary_mark(flag, e);
        }
    }
    first
}
