use log::trace;

use crate::{
    graph::{Graph, NodeId, Weight},
    session::SearchSession,
    solution::Solution,
};

/// Best 2-edge-exchange within `cycle` as positions `(i, j)`: edges `i -> i+1` and
/// `j -> j+1` are replaced by `j -> i+1` and `i -> j+1`, which splits the cycle in two.
fn best_exchange(graph: &Graph, cycle: &[NodeId]) -> Option<(usize, usize, Weight)> {
    let len = cycle.len();
    let mut best: Option<(usize, usize, Weight)> = None;

    for i in 0..len {
        let (c_i, i_next) = (cycle[i], cycle[(i + 1) % len]);
        for j in (i + 2)..len {
            let (c_j, j_next) = (cycle[j], cycle[(j + 1) % len]);

            if let (Some(first), Some(second)) = (graph.edge(c_j, i_next), graph.edge(c_i, j_next))
            {
                let gain =
                    first + second - graph.weight(c_i, i_next) - graph.weight(c_j, j_next);
                if best.map_or(true, |(_, _, b)| gain > b) {
                    best = Some((i, j, gain));
                }
            }
        }
    }
    best
}

/// Split every cycle at its best legal 2-edge-exchange, whatever its length.
///
/// The exchange is committed even when it loses weight, so repeated calls keep splitting
/// until no cycle admits one. Returns whether any cycle changed.
pub fn shorten_long_cycles(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
) -> bool {
    let cycles = session
        .extractor
        .classify(graph, solution)
        .cycles(0..graph.node_count());

    let mut shortened = false;
    for cycle in &cycles {
        if let Some((i, j, gain)) = best_exchange(graph, cycle) {
            let len = cycle.len();
            trace!(
                "splitting cycle of length {len} at {} and {}, gain {gain}",
                cycle[i],
                cycle[j]
            );
            solution.point_to(graph, cycle[i], cycle[(j + 1) % len]);
            solution.point_to(graph, cycle[j], cycle[(i + 1) % len]);
            shortened = true;
        }
    }
    shortened
}
