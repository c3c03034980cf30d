use std::time::{Duration, Instant};

use log::info;

use crate::{
    cycles::CycleExtractor,
    graph::{Graph, NodeId, Weight},
    session::SearchSession,
    solution::Solution,
    tabu_list::{solution_history::SolutionHistory, TabuList},
};

pub mod construction;
pub mod local_search;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Independent restarts of the construction phase.
    pub initial_solutions: usize,
    /// Perturb and repair trials per outer iteration.
    pub iterations_per_neighbourhood: usize,
    /// Percent chance to break one more cycle during perturbation.
    pub p_break: u32,
    /// Percent chance that a repair step tries to close a new cycle.
    pub p_cycle: u32,
    /// Percent chance that a repair step splits cycles instead of inserting nodes.
    pub p_shorten: u32,
    /// Percent chance that a new cycle expands neighbors in random order.
    pub random_cycle_order_prob: u32,
    /// Instances with more nodes than this get the reduced parameters of `scaled_for`.
    pub large_instance_threshold: usize,
    /// Capacity of the solution history, `None` disables tabu memory.
    pub tabu_list_size: Option<usize>,
    pub seed: Option<u64>,
    /// Run the construction restarts on a thread pool.
    pub parallel: bool,
    /// Pool size, defaults to the number of cpus.
    pub threads: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            initial_solutions: 20,
            iterations_per_neighbourhood: 15,
            p_break: 60,
            p_cycle: 25,
            p_shorten: 7,
            random_cycle_order_prob: 5,
            large_instance_threshold: 5000,
            tabu_list_size: None,
            seed: None,
            parallel: false,
            threads: None,
        }
    }
}

impl SearchOptions {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_initial_solutions(mut self, initial_solutions: usize) -> Self {
        self.initial_solutions = initial_solutions;
        self
    }

    pub fn with_iterations_per_neighbourhood(mut self, iterations: usize) -> Self {
        self.iterations_per_neighbourhood = iterations;
        self
    }

    pub fn with_tabu_list_size(mut self, size: usize) -> Self {
        self.tabu_list_size = Some(size);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn is_large(&self, node_count: usize) -> bool {
        node_count > self.large_instance_threshold
    }

    /// Options actually used for a graph with `node_count` nodes. Large instances trade
    /// search depth for more outer iterations.
    pub fn scaled_for(&self, node_count: usize) -> Self {
        if !self.is_large(node_count) {
            return self.clone();
        }

        Self {
            iterations_per_neighbourhood: (self.iterations_per_neighbourhood / 5).max(1),
            initial_solutions: self.initial_solutions.min(3),
            p_break: self.p_break.min(20),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone)]
pub struct OptimizedCover {
    pub solution: Solution,
    pub cost: Weight,
    /// Cycles of length at most `L` in index order.
    pub cycles: Vec<Vec<NodeId>>,
    pub restarts: usize,
    /// Completed outer iterations of the improvement phase.
    pub iterations: usize,
    pub elapsed: Duration,
}

impl OptimizedCover {
    fn new(
        graph: &Graph,
        solution: Solution,
        restarts: usize,
        iterations: usize,
        start: Instant,
    ) -> Self {
        let mut extractor = CycleExtractor::new();
        let marks = extractor.classify(graph, &solution);
        let cost = marks.cost();
        let cycles = marks
            .cycles(0..graph.node_count())
            .into_iter()
            .filter(|cycle| cycle.len() <= graph.max_cycle_length())
            .collect();

        Self {
            cost,
            cycles,
            solution,
            restarts,
            iterations,
            elapsed: start.elapsed(),
        }
    }

    /// Every edge of every admissible cycle, each cycle closed by its last edge.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.cycles.iter().flat_map(|cycle| {
            cycle
                .iter()
                .copied()
                .zip(cycle.iter().copied().cycle().skip(1))
        })
    }
}

/// Total weight of the cycles of `solution` no longer than `L`.
pub fn solution_cost(graph: &Graph, solution: &Solution) -> Weight {
    CycleExtractor::new().classify(graph, solution).cost()
}

/// Search for a heavy set of disjoint cycles of length at most `L` within `budget`.
///
/// Always returns a cover, at worst the empty one. The budget is measured from the call
/// and part of it is held back for the caller, see `local_search::search_deadline`.
pub fn solve(graph: &Graph, options: &SearchOptions, budget: Duration) -> OptimizedCover {
    let start = Instant::now();
    let node_count = graph.node_count();
    let options = options.scaled_for(node_count);

    info!(
        "graph: {node_count} nodes, {} edges, max cycle length {}",
        graph.edge_count(),
        graph.max_cycle_length()
    );
    info!("options: {options:?}");

    if graph.cyclic_node_count() == 0 || graph.max_cycle_length() == 0 {
        info!("graph admits no cycle, returning the empty cover");
        return OptimizedCover::new(graph, Solution::unassigned(node_count), 0, 0, start);
    }

    let mut session = SearchSession::new(node_count, options.seed);

    let (initial, initial_cost) =
        construction::best_initial_solution(graph, &options, &mut session);
    info!("construction best cost: {initial_cost}");

    let search_time =
        local_search::search_deadline(budget, node_count, options.is_large(node_count));
    let deadline = local_search::deadline_after(start, search_time);
    let mut history = options.tabu_list_size.map(SolutionHistory::new);
    let improved = local_search::improve(
        graph,
        &options,
        &mut session,
        initial,
        initial_cost,
        deadline,
        history.as_mut().map(|history| history as &mut dyn TabuList),
    );

    let cover = OptimizedCover::new(
        graph,
        improved.solution,
        options.initial_solutions,
        improved.iterations,
        start,
    );
    info!(
        "final cost: {} with {} cycles after {} iterations in {:?}",
        cover.cost,
        cover.cycles.len(),
        cover.iterations,
        cover.elapsed
    );
    cover
}
