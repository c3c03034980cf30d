use crate::solution::Solution;

pub mod solution_history;

pub trait TabuList {
    /// Check whether the search may continue from `solution`.
    fn is_possible_solution(&self, solution: &Solution) -> bool;
    /// Remember `solution`, evicting the oldest entry once the list is full.
    fn add_solution_to_tabu_list(&mut self, solution: &Solution);
    /// Number of remembered solutions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
