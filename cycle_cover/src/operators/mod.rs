use crate::{graph::Graph, session::SearchSession, solution::Solution, MoveType};

pub mod create_cycle;
pub mod insertion;
pub mod perturb;
pub mod shorten;

pub use create_cycle::create_random_cycle;
pub use insertion::add_to_cycles;
pub use perturb::break_random_cycle;
pub use shorten::shorten_long_cycles;

/// Apply a single move to `solution`. Returns whether the solution changed.
pub fn apply(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
    move_type: MoveType,
) -> bool {
    match move_type {
        MoveType::CreateCycle { random_order } => {
            create_random_cycle(graph, solution, session, random_order)
        }
        MoveType::AddToCycles { constrain_length } => {
            add_to_cycles(graph, solution, session, constrain_length)
        }
        MoveType::ShortenCycles => shorten_long_cycles(graph, solution, session),
        MoveType::BreakCycle => break_random_cycle(graph, solution, session),
    }
}
