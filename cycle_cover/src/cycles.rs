//! Cycle structure of a solution.
//!
//! Following the selected successor of every node turns a [`Solution`] into a functional
//! graph: each walk ends in exactly one cycle, possibly after a tail of nodes that only
//! feed into it. [`CycleExtractor::classify`] labels every node with the id of the cycle
//! it lies on (or [`NO_CYCLE`]) in a single pass over the nodes, and the returned
//! [`CycleMarks`] materializes the cycles as node sequences.

use log::trace;

use crate::{
    graph::{Graph, NodeId, Weight},
    solution::Solution,
};

/// Mark of a node that is not part of any cycle.
pub const NO_CYCLE: usize = 0;

/// Reusable buffers for cycle classification.
#[derive(Debug, Default, Clone)]
pub struct CycleExtractor {
    marks: Vec<usize>,
    visited: Vec<bool>,
}

/// How a single walk of [`CycleExtractor::classify`] ended.
enum Walk {
    /// Returned to the node it started from.
    Closed,
    /// Ran into a node of the current walk other than the start, which is where the
    /// cycle begins. Everything before it is a tail.
    Merged(NodeId),
    /// Ran into a node settled by an earlier walk or a node without successor.
    Escaped,
}

/// Cycle marks of one solution.
///
/// Holds a borrow of the solution it was computed from, so marks can't outlive a
/// mutation of that solution.
#[derive(Debug)]
pub struct CycleMarks<'a> {
    graph: &'a Graph,
    solution: &'a Solution,
    marks: &'a [usize],
    id_bound: usize,
    cycle_count: usize,
}

impl CycleExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign every node the id of the cycle it lies on, or [`NO_CYCLE`].
    pub fn classify<'a>(&'a mut self, graph: &'a Graph, solution: &'a Solution) -> CycleMarks<'a> {
        let node_count = graph.node_count();
        debug_assert_eq!(solution.len(), node_count);

        self.marks.clear();
        self.marks.resize(node_count, NO_CYCLE);
        self.visited.clear();
        self.visited.resize(node_count, false);

        let mut walk_id = NO_CYCLE;
        let mut cycle_count = 0;

        for start in 0..node_count {
            if self.visited[start] {
                continue;
            }
            walk_id += 1;

            let mut outcome = Walk::Escaped;
            let mut node = start;
            for _ in 0..node_count {
                if self.visited[node] {
                    break;
                }
                self.visited[node] = true;
                self.marks[node] = walk_id;

                let Some(next) = solution.successor(graph, node) else {
                    break;
                };
                if next == start {
                    outcome = Walk::Closed;
                    break;
                }
                if self.marks[next] == walk_id {
                    outcome = Walk::Merged(next);
                    break;
                }
                node = next;
            }

            match outcome {
                Walk::Closed => cycle_count += 1,
                Walk::Merged(cycle_start) => {
                    cycle_count += 1;
                    let mut node = start;
                    while node != cycle_start {
                        self.marks[node] = NO_CYCLE;
                        match solution.successor(graph, node) {
                            Some(next) => node = next,
                            None => break,
                        }
                    }
                }
                Walk::Escaped => {
                    let mut node = start;
                    loop {
                        self.marks[node] = NO_CYCLE;
                        match solution.successor(graph, node) {
                            Some(next) if self.marks[next] == walk_id => node = next,
                            _ => break,
                        }
                    }
                }
            }
        }

        trace!("classified {node_count} nodes into {cycle_count} cycles");

        CycleMarks {
            graph,
            solution,
            marks: &self.marks,
            id_bound: walk_id + 1,
            cycle_count,
        }
    }
}

impl<'a> CycleMarks<'a> {
    pub fn mark(&self, node: NodeId) -> usize {
        self.marks[node]
    }

    pub fn marks(&self) -> &[usize] {
        self.marks
    }

    pub fn is_on_cycle(&self, node: NodeId) -> bool {
        self.marks[node] != NO_CYCLE
    }

    pub fn cycle_count(&self) -> usize {
        self.cycle_count
    }

    /// The cycle through `start`, beginning at `start` and without repeating it at the end.
    pub fn cycle_from(&self, start: NodeId) -> Vec<NodeId> {
        debug_assert!(self.is_on_cycle(start));

        let mut cycle = vec![start];
        let mut node = start;
        while let Some(next) = self.solution.successor(self.graph, node) {
            if next == start {
                break;
            }
            cycle.push(next);
            node = next;
        }
        cycle
    }

    /// Every cycle exactly once, discovered by visiting nodes in `order`. Each cycle starts
    /// at its first member in that order.
    pub fn cycles<I>(&self, order: I) -> Vec<Vec<NodeId>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let mut seen = vec![false; self.id_bound];
        let mut cycles = Vec::with_capacity(self.cycle_count);

        for node in order {
            let mark = self.marks[node];
            if mark == NO_CYCLE || seen[mark] {
                continue;
            }
            seen[mark] = true;
            cycles.push(self.cycle_from(node));
        }
        cycles
    }

    /// First cycle met when visiting nodes in `order`.
    pub fn first_cycle<I>(&self, order: I) -> Option<Vec<NodeId>>
    where
        I: IntoIterator<Item = NodeId>,
    {
        order
            .into_iter()
            .find(|&node| self.is_on_cycle(node))
            .map(|node| self.cycle_from(node))
    }

    /// Sum of edge weights over every cycle of length at most `L`. Longer cycles count
    /// nothing.
    pub fn cost(&self) -> Weight {
        self.cycles(0..self.marks.len())
            .iter()
            .filter(|cycle| cycle.len() <= self.graph.max_cycle_length())
            .map(|cycle| cycle_weight(self.graph, cycle))
            .sum()
    }
}

/// Sum of the weights of `cycle`, including the closing edge from the last node back to
/// the first.
pub fn cycle_weight(graph: &Graph, cycle: &[NodeId]) -> Weight {
    cycle
        .iter()
        .zip(cycle.iter().cycle().skip(1))
        .map(|(&from, &to)| graph.weight(from, to))
        .sum()
}

/// Cycles of `solution` in index order, including over-length ones.
pub fn find_cycles(graph: &Graph, solution: &Solution) -> Vec<Vec<NodeId>> {
    let mut extractor = CycleExtractor::new();
    let marks = extractor.classify(graph, solution);
    marks.cycles(0..graph.node_count())
}
