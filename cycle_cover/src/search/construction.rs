use log::{debug, trace, warn};
use rand::Rng;
use rayon::prelude::*;

use crate::{
    graph::{Graph, Weight},
    operators::{add_to_cycles, create_random_cycle},
    session::SearchSession,
    solution::Solution,
};

use super::SearchOptions;

/// Greedy construction from the all-zero solution: close cycles through free nodes while
/// possible, then grow them by insertion without any length limit.
pub fn construct(graph: &Graph, session: &mut SearchSession) -> Solution {
    let mut solution = Solution::unassigned(graph.node_count());
    while create_random_cycle(graph, &mut solution, session, false) {}
    while add_to_cycles(graph, &mut solution, session, false) {}
    solution
}

fn restart(graph: &Graph, seed: u64) -> (Solution, Weight) {
    let mut session = SearchSession::new(graph.node_count(), Some(seed));
    let solution = construct(graph, &mut session);
    let cost = session.cost(graph, &solution);
    trace!("restart {seed:#x}: cost {cost}");
    (solution, cost)
}

fn run_restarts(graph: &Graph, options: &SearchOptions, seeds: &[u64]) -> Vec<(Solution, Weight)> {
    if !options.parallel {
        return seeds.iter().map(|&seed| restart(graph, seed)).collect();
    }

    let threads = options.threads.unwrap_or_else(num_cpus::get);
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => {
            debug!("running {} restarts on {threads} threads", seeds.len());
            pool.install(|| seeds.par_iter().map(|&seed| restart(graph, seed)).collect())
        }
        Err(err) => {
            warn!("could not build a pool of {threads} threads, restarting sequentially: {err}");
            seeds.iter().map(|&seed| restart(graph, seed)).collect()
        }
    }
}

/// Best of `options.initial_solutions` independent constructions.
///
/// Every restart owns a session seeded from `session`, so the parallel and the sequential
/// run pick the same solution. A restart only replaces the current best if it is strictly
/// better than it, starting from the cost of the all-zero solution.
pub fn best_initial_solution(
    graph: &Graph,
    options: &SearchOptions,
    session: &mut SearchSession,
) -> (Solution, Weight) {
    let seeds: Vec<u64> = (0..options.initial_solutions)
        .map(|_| session.rng().gen())
        .collect();

    let unassigned = Solution::unassigned(graph.node_count());
    let unassigned_cost = session.cost(graph, &unassigned);

    run_restarts(graph, options, &seeds).into_iter().fold(
        (unassigned, unassigned_cost),
        |(best, best_cost), (solution, cost)| {
            if cost > best_cost {
                (solution, cost)
            } else {
                (best, best_cost)
            }
        },
    )
}
