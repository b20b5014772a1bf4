//! Row bookkeeping checks for [`AttributeContainer`].

use super::container::AttributeContainer;
use crate::debug_invariants::DebugInvariants;
use crate::map_error::MapError;

impl DebugInvariants for AttributeContainer {
    fn validate_invariants(&self) -> Result<(), MapError> {
        let blocks = self.hole_blocks();
        let mut used = 0usize;
        for (b, block) in blocks.iter().enumerate() {
            let counted = (0..block.high()).filter(|&l| block.is_used(l)).count();
            if counted != block.nb_used() as usize {
                return Err(MapError::ContainerCorrupted(format!(
                    "block {b}: {counted} used slots, counter says {}",
                    block.nb_used()
                )));
            }
            if let Some(&l) = block.free_slots().iter().find(|&&l| block.is_used(l)) {
                return Err(MapError::ContainerCorrupted(format!(
                    "block {b}: slot {l} is on the free stack but referenced"
                )));
            }
            let listed = self.blocks_with_free().contains(&b);
            if listed == block.is_full() {
                return Err(MapError::ContainerCorrupted(format!(
                    "block {b}: full={} but listed with free slots={listed}",
                    block.is_full()
                )));
            }
            used += counted;
        }
        if used != self.size() {
            return Err(MapError::ContainerCorrupted(format!(
                "{used} used rows, size() = {}",
                self.size()
            )));
        }
        if let Some(col) = self.columns().find(|c| c.nb_blocks() != blocks.len()) {
            return Err(MapError::ContainerCorrupted(format!(
                "column `{}` has {} blocks, container has {}",
                col.name(),
                col.nb_blocks(),
                blocks.len()
            )));
        }
        for (name, &idx) in self.named() {
            match self.attribute_gen(idx) {
                Some(col) if col.name() == name => {}
                _ => {
                    return Err(MapError::ContainerCorrupted(format!(
                        "name `{name}` points to slot {idx} which does not carry it"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::orbit::Orbit;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn random_insert_unref_keeps_bookkeeping() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut c = AttributeContainer::new(Orbit::Vertex);
        c.add_attribute::<u32>("v").unwrap();
        let mut live: Vec<u32> = Vec::new();
        for _ in 0..20_000 {
            if live.is_empty() || rng.gen_bool(0.6) {
                let r = c.insert_line();
                assert!(!live.contains(&r));
                live.push(r);
            } else {
                let i = rng.gen_range(0..live.len());
                let r = live.swap_remove(i);
                assert!(c.unref_line(r));
            }
        }
        assert_eq!(c.size(), live.len());
        c.validate_invariants().unwrap();
        c.compact();
        c.validate_invariants().unwrap();
        assert_eq!(c.end() as usize, live.len());
    }
}
