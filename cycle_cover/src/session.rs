use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{
    cycles::CycleExtractor,
    graph::{Graph, NodeId, Weight},
    solution::Solution,
};

/// Mutable working state threaded through every operator call: the random generator and
/// all scratch buffers. One session per independent search, sessions are never shared.
#[derive(Debug, Clone)]
pub struct SearchSession {
    pub(crate) rng: StdRng,
    pub(crate) extractor: CycleExtractor,
    /// Node visitation order, reshuffled by the randomized operators.
    pub(crate) order: Vec<NodeId>,
    /// Nodes the cycle search may not enter at all.
    pub(crate) blocked: Vec<bool>,
    /// Per start node stamps of the cycle search, see `operators::create_cycle`.
    pub(crate) stamps: Vec<u32>,
    /// Free nodes already inserted during one `add_to_cycles` call.
    pub(crate) consumed: Vec<bool>,
}

impl SearchSession {
    /// `seed` makes the session reproducible, `None` seeds from the OS.
    pub fn new(node_count: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng,
            extractor: CycleExtractor::new(),
            order: (0..node_count).collect(),
            blocked: Vec::with_capacity(node_count),
            stamps: Vec::with_capacity(node_count),
            consumed: Vec::with_capacity(node_count),
        }
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Uniform draw from `0..=100`, compared against percentage constants.
    pub fn percent(&mut self) -> u32 {
        self.rng.gen_range(0..=100)
    }

    pub(crate) fn reshuffle(&mut self, node_count: usize) {
        if self.order.len() != node_count {
            self.order = (0..node_count).collect();
        }
        self.order.shuffle(&mut self.rng);
    }

    /// Cycles of `solution` in the current visitation order.
    pub fn cycles(&mut self, graph: &Graph, solution: &Solution) -> Vec<Vec<NodeId>> {
        let marks = self.extractor.classify(graph, solution);
        marks.cycles(self.order.iter().copied())
    }

    /// Total weight of all cycles of length at most `L`.
    pub fn cost(&mut self, graph: &Graph, solution: &Solution) -> Weight {
        self.extractor.classify(graph, solution).cost()
    }
}
