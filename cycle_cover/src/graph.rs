use fixedbitset::FixedBitSet;
use instance_parser::structs::CycleCoverInstance;
use log::{debug, trace};
use petgraph::algo;
use thiserror::Error;

pub type NodeId = usize;
pub type Weight = f64;

/// Outgoing edge as stored in a node's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub target: NodeId,
    pub weight: Weight,
}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("edge ({from}, {to}) references a node outside of 0..{node_count}")]
    NodeOutOfRange {
        from: NodeId,
        to: NodeId,
        node_count: usize,
    },
}

/// Immutable weighted digraph.
///
/// Every edge is stored twice: in a dense `n * n` bitset plus weight table for constant
/// time lookups and in a per node adjacency list sorted by descending weight. Both agree
/// for the lifetime of the graph, duplicate edges in the input keep the weight of their
/// last occurrence.
#[derive(Debug, Clone)]
pub struct Graph {
    node_count: usize,
    max_cycle_length: usize,
    edge_count: usize,
    // bit `from * node_count + to`
    adjacency: FixedBitSet,
    weights: Vec<Weight>,
    neighbors: Vec<Vec<Neighbor>>,
    // nodes which lie on at least one directed cycle of the input graph
    cyclic: Vec<bool>,
}

impl Graph {
    pub fn new<I>(node_count: usize, max_cycle_length: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, Weight)>,
    {
        let mut adjacency = FixedBitSet::with_capacity(node_count * node_count);
        let mut weights = vec![0.0; node_count * node_count];
        let mut neighbors: Vec<Vec<Neighbor>> = vec![Vec::new(); node_count];
        let mut edge_count = 0;

        for (from, to, weight) in edges {
            if from >= node_count || to >= node_count {
                return Err(GraphError::NodeOutOfRange {
                    from,
                    to,
                    node_count,
                });
            }

            let index = from * node_count + to;
            if adjacency.contains(index) {
                trace!("duplicate edge ({from}, {to}), keeping weight {weight}");
                if let Some(neighbor) = neighbors[from].iter_mut().find(|nb| nb.target == to) {
                    neighbor.weight = weight;
                }
            } else {
                adjacency.insert(index);
                neighbors[from].push(Neighbor { target: to, weight });
                edge_count += 1;
            }
            weights[index] = weight;
        }

        // Stable, so equally weighted edges keep their input order
        for list in neighbors.iter_mut() {
            list.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        }

        let cyclic = cyclic_nodes(node_count, &neighbors);
        debug!(
            "graph with {node_count} nodes, {edge_count} edges, {} nodes on some cycle",
            cyclic.iter().filter(|&&c| c).count()
        );

        Ok(Self {
            node_count,
            max_cycle_length,
            edge_count,
            adjacency,
            weights,
            neighbors,
            cyclic,
        })
    }

    pub fn from_instance(instance: &CycleCoverInstance) -> Result<Self, GraphError> {
        Self::new(
            instance.node_count,
            instance.max_cycle_length,
            instance
                .edges
                .iter()
                .map(|edge| (edge.source, edge.target, edge.weight)),
        )
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Longest cycle which still counts towards the cost.
    pub fn max_cycle_length(&self) -> usize {
        self.max_cycle_length
    }

    /// Outgoing edges of `node`, heaviest first. The order never changes.
    pub fn neighbors(&self, node: NodeId) -> &[Neighbor] {
        &self.neighbors[node]
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors[node].len()
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.adjacency.contains(from * self.node_count + to)
    }

    /// Weight of the edge `from -> to`. Only meaningful where `has_edge` holds.
    pub fn weight(&self, from: NodeId, to: NodeId) -> Weight {
        debug_assert!(self.has_edge(from, to), "no edge ({from}, {to})");
        self.weights[from * self.node_count + to]
    }

    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<Weight> {
        self.has_edge(from, to).then(|| self.weight(from, to))
    }

    /// Position of `to` in the adjacency list of `from`.
    pub fn rank_of(&self, from: NodeId, to: NodeId) -> Option<usize> {
        if !self.has_edge(from, to) {
            return None;
        }
        self.neighbors[from].iter().position(|nb| nb.target == to)
    }

    /// Whether `node` lies on any directed cycle at all, ignoring the length bound.
    pub fn is_cyclic(&self, node: NodeId) -> bool {
        self.cyclic[node]
    }

    pub fn cyclic_node_count(&self) -> usize {
        self.cyclic.iter().filter(|&&c| c).count()
    }
}

/// A node can only be part of a cycle if its strongly connected component is non trivial
/// or it carries a self loop.
fn cyclic_nodes(node_count: usize, neighbors: &[Vec<Neighbor>]) -> Vec<bool> {
    let mut graph = petgraph::graph::DiGraph::<(), ()>::with_capacity(
        node_count,
        neighbors.iter().map(Vec::len).sum(),
    );
    let nodes: Vec<_> = (0..node_count).map(|_| graph.add_node(())).collect();
    for (from, list) in neighbors.iter().enumerate() {
        for neighbor in list {
            graph.add_edge(nodes[from], nodes[neighbor.target], ());
        }
    }

    let mut cyclic = vec![false; node_count];
    for component in algo::kosaraju_scc(&graph) {
        if component.len() > 1 {
            for node in component {
                cyclic[node.index()] = true;
            }
        }
    }
    for (from, list) in neighbors.iter().enumerate() {
        if list.iter().any(|nb| nb.target == from) {
            cyclic[from] = true;
        }
    }

    cyclic
}
