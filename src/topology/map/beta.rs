//! Involution-level helpers shared by `GMap2` and `GMap3`.

use super::OrbitDarts;
use super::base::MapBase;
use crate::topology::dart::Dart;

pub const BETA0: usize = 0;
pub const BETA1: usize = 1;
pub const BETA2: usize = 2;
pub const BETA3: usize = 3;

#[inline]
pub fn beta(b: &MapBase, i: usize, d: Dart) -> Dart {
    b.relation(i, d)
}

/// Oriented successor in the face: `beta1(beta0(d))`.
#[inline]
pub fn phi1(b: &MapBase, d: Dart) -> Dart {
    beta(b, BETA1, beta(b, BETA0, d))
}

#[inline]
pub fn phi_1(b: &MapBase, d: Dart) -> Dart {
    beta(b, BETA0, beta(b, BETA1, d))
}

/// Oriented image through `beta_i o beta0`, or `d` itself when the edge of
/// `d` is not sewn by `beta_i`.
#[inline]
pub fn phi_through(b: &MapBase, i: usize, d: Dart) -> Dart {
    let d0 = beta(b, BETA0, d);
    let e = beta(b, i, d0);
    if e == d0 { d } else { e }
}

/// Closed face of `n` edges, two darts per edge. Returns the dart of the
/// first edge whose oriented successor is the second edge.
pub fn new_cycle(b: &mut MapBase, n: usize) -> Dart {
    assert!(n > 0, "a face needs at least one edge");
    let mut ends = Vec::with_capacity(n);
    for _ in 0..n {
        let s = b.new_dart();
        let t = b.new_dart();
        b.involution_sew(BETA0, s, t);
        ends.push((s, t));
    }
    for i in 0..n {
        let (_, t) = ends[i];
        let (s, _) = ends[(i + 1) % n];
        b.involution_sew(BETA1, t, s);
    }
    ends[0].0
}

/// Oriented darts of the face of `d`, following `phi1`.
pub fn oriented_cycle(b: &MapBase, d: Dart) -> OrbitDarts {
    let mut v = OrbitDarts::new();
    let mut it = d;
    loop {
        v.push(it);
        it = phi1(b, it);
        if it == d {
            return v;
        }
    }
}

/// Every dart of the face of `d` (both orientations), in `beta0`/`beta1`
/// alternation starting with `d`.
pub fn face_darts(b: &MapBase, d: Dart) -> OrbitDarts {
    let mut v = OrbitDarts::new();
    let mut it = d;
    loop {
        v.push(it);
        let e = beta(b, BETA0, it);
        v.push(e);
        it = beta(b, BETA1, e);
        if it == d {
            return v;
        }
    }
}

/// Sews two darts lying at the same vertex of the same edge, and their
/// `beta0` images, by involution `i`.
pub fn sew_edge(b: &mut MapBase, i: usize, d: Dart, e: Dart) {
    let (d0, e0) = (beta(b, BETA0, d), beta(b, BETA0, e));
    b.involution_sew(i, d, e);
    if d0 != d {
        b.involution_sew(i, d0, e0);
    }
}

/// Unsews the edge of `d` (both of its darts) from involution `i`.
pub fn unsew_edge(b: &mut MapBase, i: usize, d: Dart) {
    let d0 = beta(b, BETA0, d);
    b.involution_unsew(i, d);
    b.involution_unsew(i, d0);
}

/// Oriented `phi2` sew: afterwards `beta2(beta0(d)) == e`.
pub fn phi2sew(b: &mut MapBase, d: Dart, e: Dart) {
    let e0 = beta(b, BETA0, e);
    sew_edge(b, BETA2, d, e0);
}

/// Oriented `phi3` sew: afterwards `beta3(beta0(d)) == e`.
pub fn phi3sew(b: &mut MapBase, d: Dart, e: Dart) {
    let e0 = beta(b, BETA0, e);
    sew_edge(b, BETA3, d, e0);
}

/// Deletes every dart of the face of `d`.
pub fn delete_face(b: &mut MapBase, d: Dart) {
    for e in face_darts(b, d) {
        b.delete_dart(e);
    }
}
