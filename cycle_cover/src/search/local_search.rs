use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::{
    graph::{Graph, Weight},
    operators::{self, break_random_cycle},
    session::SearchSession,
    solution::Solution,
    tabu_list::TabuList,
    MoveType,
};

use super::SearchOptions;

const MIN_RESERVE: Duration = Duration::from_millis(100);
const LARGE_INSTANCE_RESERVE: Duration = Duration::from_secs(1);
// stand in for budgets past what the clock can represent
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Time the search may spend out of `budget`. The rest is held back for writing the
/// result: one microsecond per node for every 0.2 s of budget, at least 100 ms, and one
/// more second on large instances.
pub fn search_deadline(budget: Duration, node_count: usize, large: bool) -> Duration {
    let scaled = u64::try_from(budget.as_micros() / 200_000)
        .unwrap_or(u64::MAX)
        .saturating_mul(node_count as u64);
    let mut reserve = MIN_RESERVE.max(Duration::from_micros(scaled));
    if large {
        reserve = reserve.saturating_add(LARGE_INSTANCE_RESERVE);
    }
    budget.saturating_sub(reserve)
}

/// Instant `search_time` after `start`, clamped to a century for budgets the clock
/// cannot represent.
pub fn deadline_after(start: Instant, search_time: Duration) -> Instant {
    start
        .checked_add(search_time)
        .or_else(|| start.checked_add(FAR_FUTURE.min(search_time)))
        .unwrap_or(start)
}

#[derive(Debug)]
pub struct Improvement {
    pub solution: Solution,
    pub cost: Weight,
    pub iterations: usize,
}

/// Break one cycle, then keep breaking with probability `p_break` while cycles remain.
fn perturb(graph: &Graph, solution: &mut Solution, session: &mut SearchSession, p_break: u32) {
    if !break_random_cycle(graph, solution, session) {
        return;
    }
    while session.percent() < p_break && break_random_cycle(graph, solution, session) {}
}

fn pick_repair_move(session: &mut SearchSession, options: &SearchOptions) -> MoveType {
    let draw = session.percent();
    if draw < options.p_cycle {
        MoveType::CreateCycle {
            random_order: session.percent() < options.random_cycle_order_prob,
        }
    } else if draw < options.p_cycle + options.p_shorten {
        MoveType::ShortenCycles
    } else {
        MoveType::AddToCycles {
            constrain_length: true,
        }
    }
}

/// Apply randomly chosen moves until the chosen one changes nothing.
fn repair(
    graph: &Graph,
    solution: &mut Solution,
    session: &mut SearchSession,
    options: &SearchOptions,
) {
    loop {
        let move_type = pick_repair_move(session, options);
        if !operators::apply(graph, solution, session, move_type) {
            break;
        }
    }
}

/// Iterated local search from `best` until `deadline`.
///
/// Each outer iteration runs `iterations_per_neighbourhood` perturb and repair trials, all
/// starting from the best solution of the neighbourhood so far, and promotes that solution
/// if it beats the global best. The deadline is only checked between outer iterations.
///
/// Without `tabu_list` the neighbourhood best only ever improves. With it, the neighbourhood
/// best of every iteration is remembered and each iteration starts over accepting any non
/// tabu trial, while a tabu trial is still accepted when it beats the global best.
pub fn improve(
    graph: &Graph,
    options: &SearchOptions,
    session: &mut SearchSession,
    mut best: Solution,
    mut best_cost: Weight,
    deadline: Instant,
    mut tabu_list: Option<&mut (dyn TabuList + '_)>,
) -> Improvement {
    let mut neighbourhood_best = best.clone();
    let mut neighbourhood_cost = Weight::NEG_INFINITY;
    let mut iterations = 0;

    while Instant::now() < deadline {
        iterations += 1;
        if tabu_list.is_some() {
            neighbourhood_cost = Weight::NEG_INFINITY;
        }

        for _ in 0..options.iterations_per_neighbourhood {
            let mut candidate = neighbourhood_best.clone();
            perturb(graph, &mut candidate, session, options.p_break);
            repair(graph, &mut candidate, session, options);

            let cost = session.cost(graph, &candidate);
            trace!("trial cost: {cost}");

            let allowed = match tabu_list.as_deref() {
                Some(tabu_list) => {
                    cost > best_cost || tabu_list.is_possible_solution(&candidate)
                }
                None => true,
            };
            if cost > neighbourhood_cost && allowed {
                neighbourhood_best = candidate;
                neighbourhood_cost = cost;
            }
        }

        if let Some(tabu_list) = tabu_list.as_deref_mut() {
            tabu_list.add_solution_to_tabu_list(&neighbourhood_best);
        }

        if neighbourhood_cost > best_cost {
            debug!("iteration {iterations}: new best cost {neighbourhood_cost}");
            best = neighbourhood_best.clone();
            best_cost = neighbourhood_cost;
        }
    }

    info!("stopping search as time limit has passed after {iterations} iterations");

    Improvement {
        solution: best,
        cost: best_cost,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::{deadline_after, improve, perturb, repair, search_deadline};
    use crate::{
        cycles::find_cycles,
        graph::Graph,
        search::{construction::construct, solution_cost, SearchOptions},
        session::SearchSession,
        solution::Solution,
        tabu_list::solution_history::SolutionHistory,
    };

    /// Heavy 6-ring that only splits into two light triangles.
    fn ring() -> Graph {
        Graph::new(
            6,
            3,
            [
                (0, 1, 5.0),
                (1, 2, 5.0),
                (2, 3, 5.0),
                (3, 4, 5.0),
                (4, 5, 5.0),
                (5, 0, 5.0),
                (2, 0, 1.0),
                (5, 3, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn deadline_reserves_time() {
        let ten_seconds = Duration::from_secs(10);

        assert_eq!(
            search_deadline(ten_seconds, 100, false),
            Duration::from_micros(9_900_000)
        );
        // 50 microseconds per node
        assert_eq!(
            search_deadline(ten_seconds, 10_000, false),
            Duration::from_micros(9_500_000)
        );
        assert_eq!(
            search_deadline(ten_seconds, 10_000, true),
            Duration::from_micros(8_500_000)
        );
        assert_eq!(search_deadline(Duration::from_millis(50), 10, false), Duration::ZERO);
    }

    #[test]
    fn enormous_budgets_do_not_overflow() {
        let huge = Duration::from_secs_f64(1e19);

        let search_time = search_deadline(huge, 1_000_000, true);
        assert!(search_time < huge);
        let reserve = Duration::from_micros(u64::MAX) + Duration::from_secs(1);
        assert_eq!(
            search_deadline(Duration::MAX, usize::MAX, true),
            Duration::MAX - reserve
        );

        let start = Instant::now();
        assert!(deadline_after(start, search_time) > start + Duration::from_secs(3600));
        assert!(deadline_after(start, Duration::MAX) > start);
        assert_eq!(
            deadline_after(start, Duration::from_secs(5)),
            start + Duration::from_secs(5)
        );
    }

    #[test]
    fn perturb_without_cycles_is_a_no_op() {
        let graph = Graph::new(3, 3, [(0, 1, 1.0), (1, 2, 1.0)]).unwrap();
        let mut solution = Solution::unassigned(3);
        let mut session = SearchSession::new(3, Some(1));

        perturb(&graph, &mut solution, &mut session, 100);

        assert_eq!(solution, Solution::unassigned(3));
    }

    #[test]
    fn repair_ends_within_bounds() {
        let graph = ring();
        let options = SearchOptions::default();
        let mut session = SearchSession::new(6, Some(17));

        for _ in 0..50 {
            let mut solution = Solution::unassigned(6);
            perturb(&graph, &mut solution, &mut session, options.p_break);
            repair(&graph, &mut solution, &mut session, &options);

            // every rank still points at an existing edge
            assert!(Solution::from_ranks(&graph, solution.ranks().to_vec()).is_ok());
        }
    }

    #[test]
    fn improvement_never_loses_the_start() {
        let graph = ring();
        let options = SearchOptions::default();
        let mut session = SearchSession::new(6, Some(3));
        let start = construct(&graph, &mut session);
        let start_cost = solution_cost(&graph, &start);

        let improved = improve(
            &graph,
            &options,
            &mut session,
            start,
            start_cost,
            Instant::now() + Duration::from_millis(50),
            None,
        );

        assert!(improved.cost >= start_cost);
        assert_eq!(improved.cost, solution_cost(&graph, &improved.solution));
        // the two triangles are the best admissible cover
        assert!(improved.cost <= 22.0);
        assert!(improved.iterations > 0);
    }

    #[test]
    fn improvement_with_tabu_memory() {
        let graph = ring();
        let options = SearchOptions::default();
        let mut session = SearchSession::new(6, Some(5));
        let mut history = SolutionHistory::new(4);

        let improved = improve(
            &graph,
            &options,
            &mut session,
            Solution::unassigned(6),
            0.0,
            Instant::now() + Duration::from_millis(50),
            Some(&mut history),
        );

        assert!(improved.cost >= 0.0 && improved.cost <= 22.0);
        assert_eq!(improved.cost, solution_cost(&graph, &improved.solution));
        assert!(find_cycles(&graph, &improved.solution)
            .iter()
            .all(|cycle| cycle.len() <= 3));
    }

    #[test]
    fn past_deadline_returns_the_start() {
        let graph = ring();
        let mut session = SearchSession::new(6, Some(5));

        let improved = improve(
            &graph,
            &SearchOptions::default(),
            &mut session,
            Solution::unassigned(6),
            0.0,
            Instant::now(),
            None,
        );

        assert_eq!(improved.iterations, 0);
        assert_eq!(improved.solution, Solution::unassigned(6));
    }
}
