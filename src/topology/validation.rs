//! Topology validation helpers.
//!
//! `check()` on every map kind walks all darts once per relation and reports
//! what it finds; nothing is repaired. Each defect is also logged with
//! `log::warn!`.

use hashbrown::{HashMap, HashSet};
use itertools::Itertools;

use crate::map_error::{MapError, TopologyDefect};
use crate::topology::dart::Dart;
use crate::topology::map::MapTopology;
use crate::topology::orbit::{EMBNULL, Orbit};

/// Result of a global consistency pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub nb_darts: usize,
    /// Darts that are fixed points of the top-dimension sewing relation
    /// (`phi2` for surfaces, `phi3` for volumes).
    pub open_darts: usize,
    /// Number of closing faces, i.e. faces made of boundary-marked darts.
    pub boundary_faces: usize,
    pub defects: Vec<TopologyDefect>,
}

impl CheckReport {
    pub fn is_valid(&self) -> bool {
        self.defects.is_empty()
    }

    /// The first defect as an error, if any.
    pub fn into_result(self) -> Result<CheckReport, MapError> {
        match self.defects.first() {
            Some(d) => Err(MapError::Inconsistent(d.clone())),
            None => Ok(self),
        }
    }
}

/// Accumulates defects for one map.
pub(crate) struct Checker<'m, M: MapTopology> {
    map: &'m M,
    darts: Vec<Dart>,
    report: CheckReport,
}

impl<'m, M: MapTopology> Checker<'m, M> {
    pub fn new(map: &'m M) -> Self {
        let darts: Vec<Dart> = map.darts().collect();
        let report = CheckReport {
            nb_darts: darts.len(),
            ..CheckReport::default()
        };
        Self { map, darts, report }
    }

    fn link(&mut self, relation: &'static str, d: Dart, target: Dart) -> bool {
        if self.map.is_alive(target) {
            true
        } else {
            self.report.defects.push(TopologyDefect::DanglingLink {
                relation,
                dart: d,
                target,
            });
            false
        }
    }

    pub fn involution(
        &mut self,
        relation: &'static str,
        f: impl Fn(&M, Dart) -> Dart,
    ) -> &mut Self {
        for i in 0..self.darts.len() {
            let d = self.darts[i];
            let e = f(self.map, d);
            if self.link(relation, d, e) && f(self.map, e) != d {
                self.report
                    .defects
                    .push(TopologyDefect::NotAnInvolution { relation, dart: d });
            }
        }
        self
    }

    pub fn permutation(
        &mut self,
        relation: &'static str,
        f: impl Fn(&M, Dart) -> Dart,
        inverse: impl Fn(&M, Dart) -> Dart,
    ) -> &mut Self {
        for i in 0..self.darts.len() {
            let d = self.darts[i];
            let e = f(self.map, d);
            if self.link(relation, d, e) && inverse(self.map, e) != d {
                self.report.defects.push(TopologyDefect::BrokenInverse { dart: d });
            }
        }
        self
    }

    /// Composite relations that must be involutions (generalized maps).
    pub fn composite_involution(
        &mut self,
        relations: &'static str,
        f: impl Fn(&M, Dart) -> Dart,
    ) -> &mut Self {
        for &d in &self.darts {
            if f(self.map, f(self.map, d)) != d {
                self.report
                    .defects
                    .push(TopologyDefect::NotAGeneralizedMap { relations, dart: d });
            }
        }
        self
    }

    /// Arbitrary per-dart predicate.
    pub fn each(&mut self, test: impl Fn(&M, Dart) -> Option<TopologyDefect>) -> &mut Self {
        for &d in &self.darts {
            if let Some(defect) = test(self.map, d) {
                self.report.defects.push(defect);
            }
        }
        self
    }

    /// Counts fixed points of `sew`, checks no two closing cells touch and
    /// that every closing cell is marked on all of its darts.
    pub fn boundary(&mut self, sew: impl Fn(&M, Dart) -> Dart) -> &mut Self {
        let closing = if M::DIMENSION == 2 { Orbit::Face } else { Orbit::Volume };
        let mut faces: HashSet<Dart> = HashSet::new();
        let mut cells: HashSet<Dart> = HashSet::new();
        for &d in &self.darts {
            let e = sew(self.map, d);
            if e == d {
                self.report.open_darts += 1;
            }
            if !self.map.is_boundary_marked(d) {
                continue;
            }
            if e != d && self.map.is_boundary_marked(e) {
                self.report
                    .defects
                    .push(TopologyDefect::BoundaryAdjacent { dart: d });
            }
            if !faces.contains(&d) {
                self.report.boundary_faces += 1;
                faces.extend(self.map.orbit_darts(Orbit::Face, d));
            }
            if !cells.contains(&d) {
                let cell = self.map.orbit_darts(closing, d);
                if let Some(&x) = cell.iter().find(|&&x| !self.map.is_boundary_marked(x)) {
                    self.report.defects.push(TopologyDefect::MixedBoundary {
                        orbit: closing,
                        dart: x,
                    });
                }
                cells.extend(cell);
            }
        }
        self
    }

    pub fn embeddings(&mut self) -> &mut Self {
        collect_embedding_defects(self.map, &mut self.report.defects);
        self
    }

    pub fn finish(&mut self) -> CheckReport {
        let report = std::mem::take(&mut self.report);
        for d in &report.defects {
            log::warn!("check: {d}");
        }
        log::debug!(
            "check: {} darts, {} open, {} boundary faces, {} defects{}",
            report.nb_darts,
            report.open_darts,
            report.boundary_faces,
            report.defects.len(),
            if report.defects.is_empty() {
                String::new()
            } else {
                format!(
                    " (first darts: {})",
                    report.defects.iter().take(5).map(defect_dart).join(", ")
                )
            }
        );
        report
    }
}

fn defect_dart(d: &TopologyDefect) -> String {
    match d {
        TopologyDefect::NotAnInvolution { dart, .. }
        | TopologyDefect::BrokenInverse { dart }
        | TopologyDefect::DanglingLink { dart, .. }
        | TopologyDefect::EmbeddingMismatch { dart, .. }
        | TopologyDefect::MissingEmbedding { dart, .. }
        | TopologyDefect::BoundaryAdjacent { dart }
        | TopologyDefect::MixedBoundary { dart, .. }
        | TopologyDefect::NotAGeneralizedMap { dart, .. }
        | TopologyDefect::MisalignedFaces { dart } => dart.to_string(),
        TopologyDefect::RefCountMismatch { row, .. }
        | TopologyDefect::SharedEmbedding { row, .. } => format!("row {row}"),
    }
}

/// Every embedded orbit: one row per orbit, no missing embedding, reference
/// counts equal to dart counts, no row shared by two orbits.
pub(crate) fn collect_embedding_defects<M: MapTopology + ?Sized>(
    m: &M,
    out: &mut Vec<TopologyDefect>,
) {
    let darts: Vec<Dart> = m.darts().collect();
    for orbit in Orbit::ALL {
        if orbit == Orbit::Dart || !m.is_orbit_embedded(orbit) {
            continue;
        }
        let mut visited: HashSet<Dart> = HashSet::new();
        let mut uses: HashMap<u32, u32> = HashMap::new();
        for &d in &darts {
            if visited.contains(&d) {
                continue;
            }
            let expected = m.embedding(orbit, d);
            let cell = m.orbit_darts(orbit, d);
            for &e in &cell {
                visited.insert(e);
                let found = m.embedding(orbit, e);
                if found == EMBNULL {
                    out.push(TopologyDefect::MissingEmbedding { orbit, dart: e });
                } else if found != expected {
                    out.push(TopologyDefect::EmbeddingMismatch {
                        orbit,
                        dart: e,
                        expected,
                        found,
                    });
                }
            }
            if expected != EMBNULL {
                let n = cell.len() as u32;
                if uses.insert(expected, n).is_some() {
                    out.push(TopologyDefect::SharedEmbedding {
                        orbit,
                        row: expected,
                    });
                }
            }
        }
        let container = m.base().container(orbit);
        for (&row, &n) in uses.iter().sorted() {
            let refs = container.nb_refs(row);
            if refs != n {
                out.push(TopologyDefect::RefCountMismatch {
                    orbit,
                    row,
                    expected: n,
                    found: refs,
                });
            }
        }
        for row in container.rows().filter(|r| !uses.contains_key(r)) {
            out.push(TopologyDefect::RefCountMismatch {
                orbit,
                row,
                expected: 0,
                found: container.nb_refs(row),
            });
        }
    }
}

/// First embedding defect, if any.
pub(crate) fn check_embeddings<M: MapTopology + ?Sized>(m: &M) -> Result<(), TopologyDefect> {
    let mut out = Vec::new();
    collect_embedding_defects(m, &mut out);
    match out.into_iter().next() {
        Some(d) => Err(d),
        None => Ok(()),
    }
}
