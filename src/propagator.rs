//! Worklist-driven constraint propagation (spec.md §4.3).
//!
//! Unlike `grid-forge`'s propagator, which tracks a per-option "ways to be
//! enabled" counter and decrements it (an AC-4 style scheme), this follows
//! the literal AC-3 style the spec calls for: a cell's neighbour is re-tested
//! from scratch against the cell's *current* possibilities each time a
//! `propagateOne` step shrinks it.

use std::collections::{HashSet, VecDeque};

use crate::direction::Direction;
use crate::rules::AdjacencyMatrix;
use crate::wave::Wave;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Record {
    src: usize,
    dst: usize,
    dir: Direction,
}

/// A fresh FIFO worklist built anew by each [`Propagator::propagate_from`]
/// call, the way spec.md's `propagateFrom` clears and reseeds its queue.
#[derive(Default)]
pub struct Propagator {
    queue: VecDeque<Record>,
    pending: HashSet<(usize, Direction)>,
}

impl Propagator {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, record: Record) {
        if self.pending.insert((record.dst, record.dir)) {
            self.queue.push_back(record);
        }
    }

    /// Clears the worklist, enqueues `cell_idx`'s in-bounds neighbours, and
    /// drains the resulting cascade of `propagateOne` steps.
    ///
    /// Returns `Err(cell_idx)` for the first cell driven to zero
    /// possibilities.
    pub fn propagate_from(&mut self, cell_idx: usize, wave: &mut Wave, rules: &AdjacencyMatrix) -> Result<(), usize> {
        self.queue.clear();
        self.pending.clear();

        let (x, y) = wave.pos_of(cell_idx);
        for &d in Direction::all() {
            if let Some((nx, ny)) = d.step(x, y, wave.width(), wave.height()) {
                self.push(Record {
                    src: cell_idx,
                    dst: wave.idx_of(nx, ny),
                    dir: d,
                });
            }
        }

        while let Some(record) = self.queue.pop_front() {
            self.pending.remove(&(record.dst, record.dir));
            self.propagate_one(record, wave, rules)?;
        }
        Ok(())
    }

    /// `propagateOne(src, dst, d)`: retain in `dst` only tiles supported by
    /// at least one of `src`'s current possibilities via direction `d`.
    fn propagate_one(&mut self, record: Record, wave: &mut Wave, rules: &AdjacencyMatrix) -> Result<(), usize> {
        // Every cell is re-checked against its neighbour's *current*
        // possibilities regardless of its own size: a cell already reduced
        // to one tile is still a guess, and if it turns out incompatible
        // with a constraint discovered later, it must be allowed to shrink
        // to zero (the contradiction) rather than being treated as locked.
        let src_possibilities: Vec<usize> = wave.cell(record.src).possibilities().to_vec();
        let dst_possibilities: Vec<usize> = wave.cell(record.dst).possibilities().to_vec();

        let mut shrank = false;
        for &t in &dst_possibilities {
            let supported = src_possibilities.iter().any(|&s| rules.is_allowed(record.dir, s, t));
            if !supported {
                wave.remove_possibility(record.dst, t);
                shrank = true;
            }
        }

        if wave.cell(record.dst).is_contradiction() {
            return Err(record.dst);
        }

        if shrank {
            let (dx, dy) = wave.pos_of(record.dst);
            let back = record.dir.opposite();
            for &d2 in Direction::all() {
                if d2 == back {
                    continue;
                }
                if let Some((nx, ny)) = d2.step(dx, dy, wave.width(), wave.height()) {
                    self.push(Record {
                        src: record.dst,
                        dst: wave.idx_of(nx, ny),
                        dir: d2,
                    });
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Image;
    use crate::tile::TileBuilder;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn propagation_restricts_neighbour_after_collapse() {
        let input = Image::new(vec![1, 1, 1, 1, 2, 2, 2, 2, 1, 1], 5, 2, 1).unwrap();
        let set = TileBuilder::new(2, 2).build(&input).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut wave = Wave::new(3, 1, &set, &mut rng);

        let chosen = wave.collapse(0, &mut rng);
        let mut propagator = Propagator::new();
        propagator.propagate_from(0, &mut wave, set.rules()).unwrap();

        for &t in wave.cell(1).possibilities() {
            assert!(set.rules().is_allowed(Direction::Right, chosen, t));
        }
    }

    #[test]
    fn propagation_reports_contradiction() {
        // Two tiles that are never mutually compatible in any direction.
        let a = crate::tile::Tile::new(Image::new(vec![1, 1, 1, 1], 2, 2, 1).unwrap(), 1);
        let b = crate::tile::Tile::new(Image::new(vec![2, 2, 2, 2], 2, 2, 1).unwrap(), 1);
        let rules = AdjacencyMatrix::build(2, |_i, _j, _d| false);
        let set = crate::tile::test_set(vec![a, b], rules, 2, 2);

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut wave = Wave::new(2, 1, &set, &mut rng);
        wave.collapse(0, &mut rng);
        let mut propagator = Propagator::new();
        assert_eq!(propagator.propagate_from(0, &mut wave, set.rules()), Err(1));
    }

    #[test]
    fn unconstrained_rules_leave_neighbour_unchanged() {
        let a = crate::tile::Tile::new(Image::new(vec![1, 1, 1, 1], 2, 2, 1).unwrap(), 1);
        let b = crate::tile::Tile::new(Image::new(vec![2, 2, 2, 2], 2, 2, 1).unwrap(), 1);
        let rules = AdjacencyMatrix::build(2, |_i, _j, _d| true);
        let set = crate::tile::test_set(vec![a, b], rules, 2, 2);

        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut wave = Wave::new(2, 1, &set, &mut rng);
        wave.collapse(0, &mut rng);
        let mut propagator = Propagator::new();
        propagator.propagate_from(0, &mut wave, set.rules()).unwrap();
        assert_eq!(wave.cell(1).possibilities().len(), 2);
    }
}
