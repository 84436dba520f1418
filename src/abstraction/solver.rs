// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module defines the `Solver` trait along with the types describing
//! the outcome of a search (status, statistics, solution) and the settings
//! shared by all solver implementations.

use std::time::Duration;

use derive_builder::Builder;

use crate::{Decision, DebugLevel, Error};

/// The smallest magnitude used to normalize the optimality gap
pub const GAP_EPSILON: f64 = 1e-9;

/// The status of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// The incumbent was proved optimal (the frontier was exhausted)
    Optimal,
    /// The search was stopped by a cutoff while an incumbent was known. The
    /// statistics tell how far it may be from the optimum (gap).
    Suboptimal,
    /// The frontier was exhausted without ever finding a feasible solution
    Unsatisfiable,
    /// The search was stopped by a cutoff before any solution was found
    Unknown,
}

/// Statistics describing the progress (or the final state) of a search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStatistics {
    /// The status of the search
    pub status: SearchStatus,
    /// The number of subproblems popped off the frontier and developed
    pub iterations: usize,
    /// The largest number of subproblems ever stored in the frontier
    pub frontier_max_size: usize,
    /// The time spent searching (in milliseconds)
    pub runtime_ms: u64,
    /// The value of the best known solution (if any)
    pub incumbent: Option<isize>,
    /// The best proven upper bound on the objective
    pub upper_bound: isize,
    /// The relative optimality gap
    pub gap: f64,
}

/// The outcome of a call to `maximize`.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The value of the best solution found (None if no solution was found)
    pub best_value: Option<isize>,
    /// The value assigned to each variable (indexed by variable id) in the
    /// best solution
    pub values: Option<Vec<isize>>,
    /// The statistics of the search
    pub statistics: SearchStatistics,
}

/// Computes the relative optimality gap between the best upper bound `ub`
/// and the incumbent value `lb`: `(ub - lb) / max(|lb|, eps)`. The gap
/// is 1 when no incumbent is known and 0 once the bound meets the incumbent.
///
/// # Example
/// ```
/// # use bbdd::gap;
/// assert_eq!(0.0, gap(10, Some(10)));
/// assert_eq!(0.5, gap(15, Some(10)));
/// assert_eq!(1.0, gap(15, None));
/// ```
pub fn gap(ub: isize, lb: Option<isize>) -> f64 {
    match lb {
        None => 1.0,
        Some(lb) if ub <= lb => 0.0,
        Some(lb) => (ub as f64 - lb as f64) / (lb as f64).abs().max(GAP_EPSILON),
    }
}

/// The settings shared by all the solvers.
///
/// # Example
/// ```
/// # use bbdd::*;
/// # use std::time::Duration;
/// let settings = SolverSettingsBuilder::default()
///     .debug(DebugLevel::On)
///     .report_period(Duration::from_secs(1))
///     .build()
///     .unwrap();
/// assert_eq!(DebugLevel::On, settings.debug);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct SolverSettings {
    /// Whether the modeling contracts must be verified during the search
    #[builder(default)]
    pub debug: DebugLevel,
    /// The period between two progress lines in the log
    #[builder(default="Duration::from_millis(500)")]
    pub report_period: Duration,
    /// The number of worker threads (only used by the parallel solver)
    #[builder(default="num_cpus::get()")]
    pub nb_threads: usize,
}
impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            debug: DebugLevel::Off,
            report_period: Duration::from_millis(500),
            nb_threads: num_cpus::get(),
        }
    }
}

/// The callback invoked every time the incumbent improves. It receives the
/// values of the new solution (indexed by variable id) and the statistics
/// at the time of the improvement.
pub type SolutionCallback<'a> = dyn FnMut(&[isize], &SearchStatistics) + Send + 'a;

/// This is the solver abstraction. It is implemented by a structure that
/// implements the branch-and-bound with MDD paradigm to find the best
/// possible solution to a given problem.
pub trait Solver {
    /// This method orders the solver to search for the optimal solution among
    /// all possibilities. It returns the best solution along with the
    /// statistics of the search. The status tells whether the solution was
    /// proved optimal, whether the search was cut off, or whether the problem
    /// admits no solution at all.
    ///
    /// It only fails when the solver runs in debug mode and detects that the
    /// model violates its contract.
    fn maximize(&mut self) -> Result<Solution, Error> {
        self.maximize_with(&mut |_, _| {})
    }
    /// Same as `maximize` except that `on_solution` is called whenever the
    /// incumbent improves.
    fn maximize_with(&mut self, on_solution: &mut SolutionCallback) -> Result<Solution, Error>;
    /// This method returns the value of the objective function for the best
    /// solution that has been found. It returns `None` when no solution exists
    /// to the problem.
    fn best_value(&self) -> Option<isize>;
    /// This method returns the best solution to the optimization problem.
    /// That is, it returns the vector of decision which maximizes the value
    /// of the objective function (sum of transition costs + initial value).
    /// It returns `None` when the problem admits no feasible solution.
    fn best_solution(&self) -> Option<Vec<Decision>>;
    /// Returns the best lower bound that has been identified so far.
    /// In case where no solution has been found, it should return the minimum
    /// value that fits within an isize (-inf).
    fn best_lower_bound(&self) -> isize;
    /// Returns the tightest upper bound that can be guaranteed so far.
    /// In case where no upper bound has been computed, it should return the
    /// maximum value that fits within an isize (+inf).
    fn best_upper_bound(&self) -> isize;
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: isize, solution: Vec<Decision>);
    /// Returns the statistics of the search as they currently are.
    fn statistics(&self) -> SearchStatistics;
    /// Computes the optimality gap
    fn gap(&self) -> f64 {
        gap(self.best_upper_bound(), self.best_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gap_is_one_without_incumbent() {
        assert_eq!(1.0, gap(isize::MAX, None));
    }
    #[test]
    fn gap_is_zero_when_bound_is_reached() {
        assert_eq!(0.0, gap(7, Some(7)));
        assert_eq!(0.0, gap(6, Some(7)));
    }
    #[test]
    fn gap_is_normalized_by_the_incumbent() {
        assert_eq!(0.25, gap(5, Some(4)));
        assert_eq!(0.25, gap(-3, Some(-4)));
    }
    #[test]
    fn gap_with_a_null_incumbent_does_not_divide_by_zero() {
        let g = gap(1, Some(0));
        assert!(g.is_finite());
        assert!(g > 1.0);
    }
    #[test]
    fn default_settings_match_the_builder_defaults() {
        let built = SolverSettingsBuilder::default().build().unwrap();
        let dflt  = SolverSettings::default();
        assert_eq!(built.debug, dflt.debug);
        assert_eq!(built.report_period, dflt.report_period);
        assert_eq!(built.nb_threads, dflt.nb_threads);
    }
}
