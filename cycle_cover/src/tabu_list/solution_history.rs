use std::collections::{hash_map::RandomState, VecDeque};
use std::hash::BuildHasher;

use hashbrown::HashMap;

use super::TabuList;
use crate::solution::Solution;

/// Fixed size FIFO of solution fingerprints.
///
/// Only 64 bit hashes are stored, a collision makes an unseen solution tabu which merely
/// costs the search one restart from the previous neighbourhood best.
#[derive(Debug, Clone)]
pub struct SolutionHistory {
    capacity: usize,
    /// Fingerprints in insertion order. (circular buffer)
    order: VecDeque<u64>,
    /// Occurrences of each fingerprint in `order`.
    counts: HashMap<u64, usize>,
    hasher: RandomState,
}

impl SolutionHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            counts: HashMap::with_capacity(capacity),
            hasher: RandomState::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn fingerprint(&self, solution: &Solution) -> u64 {
        self.hasher.hash_one(solution)
    }
}

impl TabuList for SolutionHistory {
    fn is_possible_solution(&self, solution: &Solution) -> bool {
        !self.counts.contains_key(&self.fingerprint(solution))
    }

    fn add_solution_to_tabu_list(&mut self, solution: &Solution) {
        if self.capacity == 0 {
            return;
        }

        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                if let Some(count) = self.counts.get_mut(&oldest) {
                    *count -= 1;
                    if *count == 0 {
                        self.counts.remove(&oldest);
                    }
                }
            }
        }

        let fingerprint = self.fingerprint(solution);
        self.order.push_back(fingerprint);
        *self.counts.entry(fingerprint).or_insert(0) += 1;
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}
