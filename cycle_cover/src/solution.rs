use thiserror::Error;

use crate::graph::{Graph, NodeId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolutionError {
    #[error("solution has {found} entries but the graph has {expected} nodes")]
    LengthMismatch { expected: usize, found: usize },
    #[error("node {node} selects rank {rank} but only has {degree} outgoing edges")]
    RankOutOfRange {
        node: NodeId,
        rank: usize,
        degree: usize,
    },
}

/// Successor selection for every node of a graph.
///
/// `ranks[v]` is not a node id but a position in `graph.neighbors(v)`, i.e. "the
/// rank-th heaviest outgoing edge of `v` is selected". A rank is therefore only
/// meaningful against the graph it was created for. Every node always holds a selection,
/// so following successors yields a functional graph. Nodes without outgoing edges keep
/// rank 0 and simply have no successor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Solution {
    ranks: Vec<usize>,
}

impl Solution {
    /// Every node selects its heaviest outgoing edge.
    pub fn unassigned(node_count: usize) -> Self {
        Self {
            ranks: vec![0; node_count],
        }
    }

    pub fn from_ranks(graph: &Graph, ranks: Vec<usize>) -> Result<Self, SolutionError> {
        if ranks.len() != graph.node_count() {
            return Err(SolutionError::LengthMismatch {
                expected: graph.node_count(),
                found: ranks.len(),
            });
        }

        for (node, &rank) in ranks.iter().enumerate() {
            let degree = graph.degree(node);
            if rank >= degree.max(1) {
                return Err(SolutionError::RankOutOfRange { node, rank, degree });
            }
        }

        Ok(Self { ranks })
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn rank(&self, node: NodeId) -> usize {
        self.ranks[node]
    }

    pub fn ranks(&self) -> &[usize] {
        &self.ranks
    }

    pub(crate) fn set_rank(&mut self, node: NodeId, rank: usize) {
        self.ranks[node] = rank;
    }

    pub fn successor(&self, graph: &Graph, node: NodeId) -> Option<NodeId> {
        graph
            .neighbors(node)
            .get(self.ranks[node])
            .map(|neighbor| neighbor.target)
    }

    /// Select the edge `from -> to`. Returns false and leaves the solution untouched if the
    /// graph has no such edge.
    pub fn point_to(&mut self, graph: &Graph, from: NodeId, to: NodeId) -> bool {
        match graph.rank_of(from, to) {
            Some(rank) => {
                self.ranks[from] = rank;
                true
            }
            None => false,
        }
    }
}
