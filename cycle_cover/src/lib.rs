pub mod cycles;
pub mod graph;
pub mod operators;
pub mod report;
pub mod search;
pub mod session;
pub mod solution;
pub mod tabu_list;

pub use graph::{Graph, NodeId, Weight};
pub use search::{solve, OptimizedCover, SearchOptions};
pub use solution::Solution;

/// Moves the search applies to a solution, see `operators::apply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    /// Close one new cycle through free nodes, expanding neighbors heaviest first unless
    /// `random_order` is set.
    CreateCycle { random_order: bool },
    /// Insert free nodes into existing cycles.
    AddToCycles { constrain_length: bool },
    /// Split cycles with a 2-edge-exchange.
    ShortenCycles,
    /// Reassign every member of one random cycle.
    BreakCycle,
}
