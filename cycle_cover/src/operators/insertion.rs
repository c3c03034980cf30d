use log::trace;

use crate::{
    graph::{Graph, NodeId, Weight},
    session::SearchSession,
    solution::Solution,
};

#[derive(Debug, Clone, Copy)]
struct Insertion {
    gain: Weight,
    from: NodeId,
    node: NodeId,
    to: NodeId,
}

/// Cheapest insertion of free nodes into existing cycles.
///
/// For every cycle the single best insertion of a free node between two consecutive
/// members is committed, as long as both new edges exist. A node is inserted into at
/// most one cycle per call. With `constrain_length` cycles of length `L` or more are
/// skipped, so no insertion can push a cycle over the bound.
///
/// Cycles and free nodes are visited in index order, the result only depends on the
/// solution.
pub fn add_to_cycles(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
    constrain_length: bool,
) -> bool {
    let node_count = graph.node_count();

    let (cycles, free) = {
        let marks = session.extractor.classify(graph, solution);
        let free: Vec<NodeId> = (0..node_count)
            .filter(|&node| !marks.is_on_cycle(node) && graph.is_cyclic(node))
            .collect();
        (marks.cycles(0..node_count), free)
    };
    if free.is_empty() {
        return false;
    }

    session.consumed.clear();
    session.consumed.resize(node_count, false);

    let mut inserted = false;
    for cycle in &cycles {
        let len = cycle.len();
        if constrain_length && len >= graph.max_cycle_length() {
            continue;
        }

        let mut best: Option<Insertion> = None;
        for (i, &from) in cycle.iter().enumerate() {
            let to = cycle[(i + 1) % len];
            let removed = graph.weight(from, to);

            for &node in &free {
                if session.consumed[node] {
                    continue;
                }
                if let (Some(into), Some(out)) = (graph.edge(from, node), graph.edge(node, to)) {
                    let gain = into + out - removed;
                    if best.map_or(true, |b| gain > b.gain) {
                        best = Some(Insertion {
                            gain,
                            from,
                            node,
                            to,
                        });
                    }
                }
            }
        }

        if let Some(Insertion {
            gain,
            from,
            node,
            to,
        }) = best
        {
            trace!("inserting {node} between {from} and {to}, gain {gain}");
            session.consumed[node] = true;
            solution.point_to(graph, from, node);
            solution.point_to(graph, node, to);
            inserted = true;
        }
    }
    inserted
}
