use log::trace;
use rand::{rngs::StdRng, seq::SliceRandom};

use crate::{
    graph::{Graph, NodeId},
    session::SearchSession,
    solution::Solution,
};

/// Depth bounded search for a path from `init` back to itself through free nodes.
///
/// Nodes stay visited after a failed branch, so every node is expanded at most once per
/// start node. The path is kept on the heap, `L` may be as large as the graph.
struct CycleSearch<'a> {
    graph: &'a Graph,
    blocked: &'a [bool],
    stamps: &'a mut [u32],
    stamp: u32,
    rng: &'a mut StdRng,
    random_order: bool,
    init: NodeId,
}

/// A node on the current path with its remaining neighbor ranks.
struct Frame {
    node: NodeId,
    ranks: Vec<usize>,
    next: usize,
}

impl Frame {
    /// Rank of the edge the path currently follows out of this node.
    fn taken(&self) -> usize {
        self.ranks[self.next - 1]
    }
}

impl<'a> CycleSearch<'a> {
    fn is_visited(&self, node: NodeId) -> bool {
        self.blocked[node] || self.stamps[node] == self.stamp
    }

    fn enter(&mut self, node: NodeId) -> Frame {
        self.stamps[node] = self.stamp;

        let mut ranks: Vec<usize> = (0..self.graph.degree(node)).collect();
        if self.random_order {
            ranks.shuffle(&mut *self.rng);
        }
        Frame {
            node,
            ranks,
            next: 0,
        }
    }

    /// Search from `init` and commit the closing path into `solution` on success.
    fn run(&mut self, solution: &mut Solution) -> bool {
        if self.is_visited(self.init) || self.graph.max_cycle_length() == 0 {
            return false;
        }
        let mut path = vec![self.enter(self.init)];

        while let Some(frame) = path.last_mut() {
            let Some(&rank) = frame.ranks.get(frame.next) else {
                path.pop();
                continue;
            };
            frame.next += 1;

            let target = self.graph.neighbors(frame.node)[rank].target;
            if target == self.init {
                for frame in &path {
                    solution.set_rank(frame.node, frame.taken());
                }
                return true;
            }
            if self.is_visited(target) || path.len() >= self.graph.max_cycle_length() {
                continue;
            }
            let next = self.enter(target);
            path.push(next);
        }
        false
    }
}

/// Close one new cycle of length at most `L` through nodes that are currently on no cycle.
///
/// Start nodes are tried in a freshly shuffled order and the first cycle found is
/// committed. Neighbors are expanded heaviest first, or in random order with
/// `random_order`. Returns false once no free node can be closed into a cycle.
pub fn create_random_cycle(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
    random_order: bool,
) -> bool {
    let node_count = graph.node_count();
    session.reshuffle(node_count);

    {
        let marks = session.extractor.classify(graph, solution);
        session.blocked.clear();
        session
            .blocked
            .extend((0..node_count).map(|node| marks.is_on_cycle(node) || !graph.is_cyclic(node)));
    }
    session.stamps.clear();
    session.stamps.resize(node_count, 0);

    let mut search = CycleSearch {
        graph,
        blocked: &session.blocked,
        stamps: &mut session.stamps,
        stamp: 0,
        rng: &mut session.rng,
        random_order,
        init: 0,
    };

    for &start in &session.order {
        if search.blocked[start] {
            continue;
        }
        search.stamp += 1;
        search.init = start;
        if search.run(solution) {
            trace!("closed a new cycle through node {start}");
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::create_random_cycle;
    use crate::{cycles::find_cycles, graph::Graph, session::SearchSession, solution::Solution};

    #[test]
    fn nothing_free_nothing_created() {
        let graph = Graph::new(3, 3, [(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]).unwrap();
        let mut solution = Solution::unassigned(3);
        let mut session = SearchSession::new(3, Some(11));

        assert_eq!(find_cycles(&graph, &solution).len(), 1);
        assert!(!create_random_cycle(&graph, &mut solution, &mut session, false));

        // 0 -> 2 -> 0 is closed by the heaviest edges and 1 can only reach it
        let graph = Graph::new(3, 3, [(0, 1, 1.0), (0, 2, 5.0), (1, 2, 1.0), (2, 0, 1.0)])
            .unwrap();
        let mut solution = Solution::unassigned(3);
        assert_eq!(find_cycles(&graph, &solution), vec![vec![0, 2]]);
        assert!(!create_random_cycle(&graph, &mut solution, &mut session, false));
        assert_eq!(solution, Solution::unassigned(3));
    }

    #[test]
    fn builds_cycles_until_no_free_node_closes() {
        // Two triangles connected by a bridge, every node points at a tail by default
        let graph = Graph::new(
            7,
            3,
            [
                (0, 6, 9.0),
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 0, 1.0),
                (3, 6, 9.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (5, 3, 1.0),
                (2, 3, 0.5),
            ],
        )
        .unwrap();
        let mut solution = Solution::unassigned(7);
        let mut session = SearchSession::new(7, Some(5));

        assert!(find_cycles(&graph, &solution).is_empty());

        let mut created = 0;
        while create_random_cycle(&graph, &mut solution, &mut session, false) {
            created += 1;
        }

        let mut cycles = find_cycles(&graph, &solution);
        cycles.sort();
        assert_eq!(created, 2);
        assert_eq!(cycles, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn respects_length_bound() {
        // The only cycle 0 -> 1 -> 2 -> 3 -> 0 has length 4, node 0 starts at the dead end 4
        let edges = [(0, 4, 9.0), (0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)];
        let short = Graph::new(5, 3, edges).unwrap();
        let mut solution = Solution::unassigned(5);
        let mut session = SearchSession::new(5, Some(2));

        assert!(find_cycles(&short, &solution).is_empty());
        assert!(!create_random_cycle(&short, &mut solution, &mut session, true));
        assert_eq!(solution, Solution::unassigned(5));

        let long = Graph::new(5, 4, edges).unwrap();
        assert!(create_random_cycle(&long, &mut solution, &mut session, false));
        assert_eq!(find_cycles(&long, &solution), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn keeps_existing_cycles_intact() {
        // 0 <-> 1 is already closed, 2, 3 and 4 are free and 3 prefers 2
        let graph = Graph::new(
            5,
            2,
            [
                (0, 1, 3.0),
                (1, 0, 3.0),
                (1, 2, 1.0),
                (2, 1, 1.0),
                (2, 3, 1.0),
                (3, 2, 2.0),
                (3, 4, 1.0),
                (4, 3, 1.0),
            ],
        )
        .unwrap();
        let mut solution = Solution::unassigned(5);
        let mut session = SearchSession::new(5, Some(9));
        assert_eq!(find_cycles(&graph, &solution), vec![vec![0, 1]]);

        while create_random_cycle(&graph, &mut solution, &mut session, true) {}

        let after = find_cycles(&graph, &solution);
        assert_eq!(after.len(), 2);
        assert!(after.contains(&vec![0, 1]));
        assert!(after.iter().all(|cycle| cycle.len() <= 2));
    }

    #[test]
    fn long_ring_closes_on_a_small_stack() {
        // 0 prefers the dead end n, the only cycle is the full ring and needs L = n
        const N: usize = 2000;
        let edges = (0..N)
            .map(|node| (node, (node + 1) % N, 1.0))
            .chain([(0, N, 9.0)]);
        let graph = Graph::new(N + 1, N, edges).unwrap();

        let closed = std::thread::Builder::new()
            .stack_size(64 * 1024)
            .spawn(move || {
                let mut solution = Solution::unassigned(N + 1);
                let mut session = SearchSession::new(N + 1, Some(1));
                let created = create_random_cycle(&graph, &mut solution, &mut session, true);
                (created, find_cycles(&graph, &solution))
            })
            .unwrap()
            .join()
            .unwrap();

        assert!(closed.0);
        assert_eq!(closed.1.len(), 1);
        assert_eq!(closed.1[0].len(), N);
    }
}
