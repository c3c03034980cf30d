use log::trace;
use rand::Rng;

use crate::{graph::Graph, session::SearchSession, solution::Solution};

/// Pick a cycle in random order and point each of its members at a uniformly random
/// outgoing edge. Returns false if the solution has no cycle.
pub fn break_random_cycle(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
) -> bool {
    session.reshuffle(graph.node_count());

    let cycle = match session
        .extractor
        .classify(graph, solution)
        .first_cycle(session.order.iter().copied())
    {
        Some(cycle) => cycle,
        None => return false,
    };

    trace!("breaking cycle of length {} at {}", cycle.len(), cycle[0]);
    for node in cycle {
        let rank = session.rng.gen_range(0..graph.degree(node));
        solution.set_rank(node, rank);
    }
    true
}
