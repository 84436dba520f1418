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

//! This module provides the implementation of a sequential mdd solver. That is
//! a solver that will solve the problem using one single thread of execution.
//!
//! This is usually not the implementation you will want to use if you are
//! after solving a hard problem efficiently. However, in those cases where
//! you would be using a constrained environment where multithreading is not
//! an option; then you might want to use this implementation instead.
use std::clone::Clone;
use std::time::Instant;
use std::{sync::Arc, hash::Hash, fmt::Debug};

use tracing::{debug, info, trace};

use crate::{Frontier, Decision, Problem, Relaxation, StateRanking, BoundHeuristic, WidthHeuristic, Cutoff, ReductionStrategy, CostBased, SubProblem, DecisionDiagram, CompilationInput, CompilationType, Solver, Solution, Completion, Cache, DominanceChecker, Error, SearchStatistics, SearchStatus, SolverSettings, SolutionCallback, gap};

/// The workload the solver gets from its frontier
enum WorkLoad<T> {
    /// There is no work left to be done: you can safely terminate
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// The item to process
    WorkItem { node: SubProblem<T> },
}

/// This is the structure implementing a single-threaded branch-and-bound
/// solver guided by decision diagrams.
///
/// # Example Usage
/// ```
/// # use bbdd::*;
/// # struct Knapsack { capacity: usize, profit: Vec<isize>, weight: Vec<usize> }
/// # impl Problem for Knapsack {
/// #     type State = usize;
/// #     fn nb_variables(&self) -> usize { self.profit.len() }
/// #     fn initial_state(&self) -> usize { self.capacity }
/// #     fn initial_value(&self) -> isize { 0 }
/// #     fn domain<'a>(&self, state: &'a usize, var: Variable) -> Domain<'a> {
/// #         if *state >= self.weight[var.id()] { (0..=1).into() } else { (0..=0).into() }
/// #     }
/// #     fn transition(&self, state: &usize, d: Decision) -> usize {
/// #         state - self.weight[d.variable.id()] * d.value as usize
/// #     }
/// #     fn transition_cost(&self, _: &usize, d: Decision) -> isize {
/// #         self.profit[d.variable.id()] * d.value
/// #     }
/// # }
/// # struct KPRelax;
/// # impl Relaxation for KPRelax {
/// #     type State = usize;
/// #     fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize { states.copied().max().unwrap_or(0) }
/// #     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: isize) -> isize { cost }
/// # }
/// # struct KPRanking;
/// # impl StateRanking for KPRanking {
/// #     type State = usize;
/// #     fn compare(&self, a: &usize, b: &usize) -> std::cmp::Ordering { a.cmp(b) }
/// # }
/// let problem   = Knapsack { capacity: 50, profit: vec![60, 100, 120], weight: vec![10, 20, 30] };
/// let relax     = KPRelax;
/// let ranking   = KPRanking;
/// let bound     = NoBound::default();
/// let width     = FixedWidth(100);
/// let dominance = EmptyDominanceChecker::default();
/// let cutoff    = NoCutoff;
/// let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
///
/// let mut solver = SeqCachingSolver::new(
///     &problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
///
/// let mut incumbents = vec![];
/// let solution = solver.maximize_with(&mut |_, stats| incumbents.push(stats.incumbent)).unwrap();
///
/// assert_eq!(Some(220), solution.best_value);
/// assert_eq!(Some(&Some(220)), incumbents.last());
/// ```
pub struct SequentialSolver<'a, State, D, C>
where
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State = State> + Default,
{
    /// A reference to the problem being solved with branch-and-bound MDD
    problem: &'a (dyn Problem<State = State>),
    /// The relaxation used when a DD layer grows too large
    relaxation: &'a (dyn Relaxation<State = State>),
    /// The ranking heuristic used to discriminate the most promising from
    /// the least promising states
    ranking: &'a (dyn StateRanking<State = State>),
    /// The rough upper bound used to prune nodes while compiling dds
    bound: &'a (dyn BoundHeuristic<State = State>),
    /// The maximum width heuristic used to enforce a given maximum memory
    /// usage when compiling mdds
    width_heu: &'a (dyn WidthHeuristic<State>),
    /// The fronts of non dominated states
    dominance: &'a (dyn DominanceChecker<State = State>),
    /// A cutoff heuristic meant to decide when to stop the resolution of
    /// a given problem.
    cutoff: &'a (dyn Cutoff),
    /// Picks the nodes merged together in relaxed dds (cost based when None)
    relax_strategy: Option<&'a (dyn ReductionStrategy<State = State>)>,
    /// Picks the nodes dropped from restricted dds (cost based when None)
    restrict_strategy: Option<&'a (dyn ReductionStrategy<State = State>)>,

    /// This is the frontier: the set of nodes that must still be explored before
    /// the problem can be considered 'solved'.
    ///
    /// # Note:
    /// This frontier orders the nodes by upper bound (so the highest ub is going
    /// to pop first). So, it is guaranteed that the upper bound of the first
    /// node being popped is an upper bound on the value reachable by exploring
    /// any of the nodes remaining on the frontier. As a consequence, the
    /// exploration can be stopped as soon as a node with an ub <= current best
    /// lower bound is popped.
    frontier: &'a mut (dyn Frontier<State = State>),
    /// Data structure containing info about past compilations used to prune the search
    cache: C,
    /// The settings of this solver
    settings: SolverSettings,

    /// This is a counter that tracks the number of nodes that have effectively
    /// been explored. That is, the number of nodes that have been popped from
    /// the frontier, and for which a restricted and relaxed mdd have been developed.
    explored: usize,
    /// The largest number of nodes the frontier ever held
    frontier_max_size: usize,
    /// This is the value of the best known lower bound.
    best_lb: isize,
    /// This is the value of the best known upper bound.
    best_ub: isize,
    /// If set, this keeps the info about the best solution so far.
    best_sol: Option<Vec<Decision>>,
    /// Set when the search was interrupted by the cutoff
    aborted: bool,
    /// The status of the search (as it would be if the search stopped now)
    status: SearchStatus,
    /// When did the current search start ?
    start: Instant,
    /// When was the last progress line logged ?
    last_report: Instant,

    /// The dd reused for every compilation
    mdd: D,
}

impl<'a, State, D, C> SequentialSolver<'a, State, D, C>
where
    State: Eq + Hash + Clone + Debug,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State = State> + Default,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        problem: &'a (dyn Problem<State = State>),
        relaxation: &'a (dyn Relaxation<State = State>),
        ranking: &'a (dyn StateRanking<State = State>),
        bound: &'a (dyn BoundHeuristic<State = State>),
        width_heu: &'a (dyn WidthHeuristic<State>),
        dominance: &'a (dyn DominanceChecker<State = State>),
        cutoff: &'a (dyn Cutoff),
        frontier: &'a mut (dyn Frontier<State = State>),
    ) -> Self {
        let now = Instant::now();
        SequentialSolver {
            problem,
            relaxation,
            ranking,
            bound,
            width_heu,
            dominance,
            cutoff,
            relax_strategy: None,
            restrict_strategy: None,
            frontier,
            cache: C::default(),
            settings: SolverSettings::default(),
            //
            explored: 0,
            frontier_max_size: 0,
            best_sol: None,
            best_lb: isize::MIN,
            best_ub: isize::MAX,
            aborted: false,
            status: SearchStatus::Unknown,
            start: now,
            last_report: now,
            mdd: D::default(),
        }
    }

    /// Replaces the settings of this solver
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Uses `strategy` to decide which nodes get merged in relaxed dds
    pub fn with_relax_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State>)) -> Self {
        self.relax_strategy = Some(strategy);
        self
    }

    /// Uses `strategy` to decide which nodes are kept in restricted dds
    pub fn with_restrict_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State>)) -> Self {
        self.restrict_strategy = Some(strategy);
        self
    }

    /// This method initializes the problem resolution. Put more simply, this
    /// method posts the root node of the mdd onto the frontier so that the
    /// processing can be bootstrapped.
    fn initialize(&mut self) {
        let root = self.root_node();
        self.cache.initialize(self.problem);
        self.dominance.clear();
        self.frontier.clear();
        self.frontier.push(root);

        self.explored = 0;
        self.frontier_max_size = self.frontier.len();
        self.aborted = false;
        self.best_ub = isize::MAX;
        self.start = Instant::now();
        self.last_report = self.start;
    }

    fn root_node(&self) -> SubProblem<State> {
        SubProblem {
            state: Arc::new(self.problem.initial_state()),
            value: self.problem.initial_value(),
            path: vec![],
            ub: isize::MAX,
            depth: 0,
        }
    }

    /// This method processes the given `node`. To do so, it expands a restricted
    /// and possibly a relaxed mdd rooted in `node`. If that is necessary,
    /// it stores cutset nodes onto the frontier for further processing.
    fn process_one_node(
        &mut self,
        node: SubProblem<State>,
        on_solution: &mut SolutionCallback,
    ) -> Result<(), Error> {
        trace!(depth = node.depth, value = node.value, ub = node.ub, "developing subproblem");

        // 1. RESTRICTION
        let node_ub = node.ub;
        let width = self.width_heu.max_width(&node);
        let cost_based = CostBased::new(self.ranking);
        let mut compilation = CompilationInput {
            comp_type: CompilationType::Restricted,
            problem: self.problem,
            relaxation: self.relaxation,
            ranking: self.ranking,
            bound: self.bound,
            reduction: self.restrict_strategy.unwrap_or(&cost_based),
            max_width: width,
            residual: &node,
            //
            best_lb: self.best_lb,
            cache: &self.cache,
            dominance: self.dominance,
            cutset_type: self.frontier.cut_set_type(),
            debug: self.settings.debug,
        };

        let Completion{is_exact, ..} = self.mdd.compile(&compilation)?;
        let stats = incumbent_stats(self.explored, self.frontier_max_size, self.start, node_ub);
        Self::maybe_update_best(&self.mdd, self.problem, &mut self.best_lb, &mut self.best_sol, on_solution, stats);
        if is_exact {
            return Ok(());
        }

        // 2. RELAXATION
        compilation.comp_type = CompilationType::Relaxed;
        compilation.reduction = self.relax_strategy.unwrap_or(&cost_based);
        compilation.best_lb = self.best_lb;

        let Completion{is_exact, best_value} = self.mdd.compile(&compilation)?;
        let stats = incumbent_stats(self.explored, self.frontier_max_size, self.start, node_ub);
        Self::maybe_update_best(&self.mdd, self.problem, &mut self.best_lb, &mut self.best_sol, on_solution, stats);

        match best_value {
            Some(ub) if !is_exact && ub > self.best_lb => self.enqueue_cutset(node_ub),
            _ => trace!(depth = node.depth, "subproblem closed"),
        }

        Ok(())
    }

    /// This private method updates the best known node and lower bound in
    /// case the best value of the current `mdd` expansion improves the current
    /// bounds.
    fn maybe_update_best(
        mdd: &D,
        problem: &dyn Problem<State = State>,
        best_lb: &mut isize,
        best_sol: &mut Option<Vec<Decision>>,
        on_solution: &mut SolutionCallback,
        mut stats: SearchStatistics,
    ) {
        let dd_best_value = mdd.best_exact_value().unwrap_or(isize::MIN);
        if dd_best_value > *best_lb {
            *best_lb = dd_best_value;
            *best_sol = mdd.best_exact_solution();

            stats.incumbent = Some(dd_best_value);
            stats.gap = gap(stats.upper_bound, stats.incumbent);
            info!(value = dd_best_value, iterations = stats.iterations, gap = stats.gap, "new incumbent");

            let values = values_of(problem.nb_variables(), best_sol.as_deref().unwrap_or_default());
            on_solution(&values, &stats);
        }
    }

    /// If necessary, tightens the bound of nodes in the cutset of `mdd` and
    /// then add the relevant nodes to the frontier.
    fn enqueue_cutset(&mut self, ub: isize) {
        let best_lb = self.best_lb;
        let frontier = &mut self.frontier;
        self.mdd.drain_cutset(|mut cutset_node| {
            cutset_node.ub = ub.min(cutset_node.ub);
            if cutset_node.ub > best_lb {
                frontier.push(cutset_node);
            }
        });
        self.frontier_max_size = self.frontier_max_size.max(self.frontier.len());
    }

    fn abort_search(&mut self) {
        self.aborted = true;
        self.frontier.clear();
    }

    /// The upper bound that can be guaranteed between two iterations
    fn current_upper_bound(&self) -> isize {
        self.frontier.best_in_frontier()
            .map(|ub| ub.max(self.best_lb))
            .unwrap_or(self.best_lb)
    }

    fn current_status(&self) -> SearchStatus {
        if self.best_sol.is_some() {
            SearchStatus::Suboptimal
        } else {
            SearchStatus::Unknown
        }
    }

    fn maybe_report(&mut self) {
        if self.last_report.elapsed() >= self.settings.report_period {
            self.last_report = Instant::now();
            debug!(
                iterations = self.explored,
                frontier   = self.frontier.len(),
                lb         = self.best_lb,
                ub         = self.best_ub,
                gap        = self.gap(),
                "search progress");
        }
    }

    /// Consults the frontier to fetch a workload. Depending on the current
    /// state, the workload can either be:
    ///
    ///   + Complete, when the problem is solved
    ///   + Aborted, when the cutoff criterion is met
    ///   + WorkItem, when the solver successfully obtained a subproblem to
    ///     process.
    fn get_workload(&mut self) -> WorkLoad<State> {
        loop {
            self.best_ub = self.current_upper_bound();
            self.status = self.current_status();
            self.maybe_report();

            // Do we need to stop
            if self.cutoff.must_stop(&self.statistics()) {
                self.abort_search();
                return WorkLoad::Aborted;
            }

            let Some(nn) = self.frontier.pop() else {
                self.best_ub = self.best_lb;
                return WorkLoad::Complete;
            };

            // Nothing relevant left ? => we are done
            if nn.ub <= self.best_lb {
                self.frontier.clear();
                self.best_ub = self.best_lb;
                return WorkLoad::Complete;
            }

            if self.cache.must_explore(&nn) {
                self.cache.update(nn.state.clone(), nn.depth, nn.value, true);
                // Consume the current node and process it
                self.explored += 1;
                return WorkLoad::WorkItem { node: nn };
            }
        }
    }
}

/// The statistics at the time a new incumbent is found while processing a
/// subproblem whose upper bound is `node_ub`.
fn incumbent_stats(iterations: usize, frontier_max_size: usize, start: Instant, node_ub: isize) -> SearchStatistics {
    SearchStatistics {
        status: SearchStatus::Suboptimal,
        iterations,
        frontier_max_size,
        runtime_ms: start.elapsed().as_millis() as u64,
        incumbent: None,
        upper_bound: node_ub,
        gap: 1.0,
    }
}

/// Turns the decisions of a solution into the value assigned to each variable.
/// Variables without a decision are given the value 0.
pub(crate) fn values_of(nb_variables: usize, decisions: &[Decision]) -> Vec<isize> {
    let mut values = vec![0; nb_variables];
    for d in decisions {
        if let Some(v) = values.get_mut(d.variable.id()) {
            *v = d.value;
        }
    }
    values
}

impl<'a, State, D, C> Solver for SequentialSolver<'a, State, D, C>
where
    State: Eq + PartialEq + Hash + Clone + Debug,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State = State> + Default,
{
    /// Applies the branch and bound algorithm proposed by Bergman et al. to
    /// solve the problem to optimality. To do so, it continually pops the most
    /// promising subproblem off the frontier and develops it until the
    /// frontier is exhausted or the cutoff criterion is met.
    fn maximize_with(&mut self, on_solution: &mut SolutionCallback) -> Result<Solution, Error> {
        self.initialize();

        loop {
            match self.get_workload() {
                WorkLoad::Complete => break,
                WorkLoad::Aborted => break,
                WorkLoad::WorkItem { node } => {
                    let outcome = self.process_one_node(node, on_solution);
                    if let Err(error) = outcome {
                        self.abort_search();
                        return Err(error);
                    }
                }
            }
        }

        self.status = match (self.aborted, self.best_sol.is_some()) {
            (false, true)  => SearchStatus::Optimal,
            (false, false) => SearchStatus::Unsatisfiable,
            (true,  true)  => SearchStatus::Suboptimal,
            (true,  false) => SearchStatus::Unknown,
        };
        if let Some(sol) = self.best_sol.as_mut() {
            sol.sort_unstable_by_key(|d| d.variable.id())
        }

        let statistics = self.statistics();
        info!(
            status     = ?statistics.status,
            best_value = ?statistics.incumbent,
            iterations = statistics.iterations,
            runtime_ms = statistics.runtime_ms,
            gap        = statistics.gap,
            "search complete");

        Ok(Solution {
            best_value: self.best_value(),
            values: self.best_sol.as_deref().map(|sol| values_of(self.problem.nb_variables(), sol)),
            statistics,
        })
    }

    /// Returns the best solution that has been identified for this problem.
    fn best_solution(&self) -> Option<Vec<Decision>> {
        self.best_sol.clone()
    }
    /// Returns the value of the best solution that has been identified for
    /// this problem.
    fn best_value(&self) -> Option<isize> {
        self.best_sol.as_ref().map(|_sol| self.best_lb)
    }
    /// Returns the value of the best lower bound that has been identified for
    /// this problem.
    fn best_lower_bound(&self) -> isize {
        self.best_lb
    }
    /// Returns the value of the best upper bound that has been identified for
    /// this problem.
    fn best_upper_bound(&self) -> isize {
        self.best_ub
    }
    /// Sets a primal (best known value and solution) of the problem.
    fn set_primal(&mut self, value: isize, solution: Vec<Decision>) {
        if value > self.best_lb {
            self.best_sol = Some(solution);
            self.best_lb  = value;
        }
    }
    fn statistics(&self) -> SearchStatistics {
        SearchStatistics {
            status: self.status,
            iterations: self.explored,
            frontier_max_size: self.frontier_max_size,
            runtime_ms: self.start.elapsed().as_millis() as u64,
            incumbent: self.best_value(),
            upper_bound: self.best_ub,
            gap: self.gap(),
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

/// Unlike the rest of the library, the solvers modules are not tested in depth
/// with unit tests. So we basically unit test the configuration capabilities
/// of the solvers and then resort to the solving of small instances with
/// known optimum solution to validate the behavior of the maximize function
/// (see the integration tests).
#[cfg(test)]
mod test_solver {
    use std::time::Duration;

    use crate::*;
    use crate::implementation::solver::test_knapsack::*;

    fn instance() -> Knapsack {
        Knapsack {
            capacity: 50,
            profit  : vec![60, 100, 120],
            weight  : vec![10,  20,  30]
        }
    }

    #[test]
    fn by_default_best_lb_is_min_infinity() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = NbUnassignedWidth(problem.nb_variables());
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        assert_eq!(isize::MIN, solver.best_lower_bound());
    }
    #[test]
    fn by_default_best_ub_is_plus_infinity() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = NbUnassignedWidth(problem.nb_variables());
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        assert_eq!(isize::MAX, solver.best_upper_bound());
    }
    #[test]
    fn no_solution_before_solving() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = NbUnassignedWidth(problem.nb_variables());
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        assert!(solver.best_solution().is_none());
        assert_eq!(None, solver.best_value());
        assert_eq!(1.0, solver.gap());
    }
    #[test]
    fn when_the_problem_is_solved_best_lb_and_ub_are_best_value() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = FixedWidth(2);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let solution = solver.maximize().unwrap();
        assert_eq!(220, solver.best_lower_bound());
        assert_eq!(220, solver.best_upper_bound());
        assert_eq!(0.0, solver.gap());
        assert_eq!(SearchStatus::Optimal, solution.statistics.status);
        assert_eq!(0.0, solution.statistics.gap);
    }

    #[test]
    fn maximize_yields_the_optimum_with_every_cutset_and_cache() {
        for cutset_type in [CutsetType::LastExactLayer, CutsetType::Frontier] {
            for w in 1..5 {
                let problem = instance();
                let relax = KPRelax;
                let ranking = KPRanking;
                let bound = KPBound {pb: &problem};
                let cutoff = NoCutoff;
                let width = FixedWidth(w);
                let dominance = EmptyDominanceChecker::default();

                let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), cutset_type);
                let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
                let solution = solver.maximize().unwrap();
                assert_eq!(Some(220), solution.best_value);
                assert_eq!(Some(vec![0, 1, 1]), solution.values);

                let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), cutset_type);
                let mut solver = SeqCachingSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
                let solution = solver.maximize().unwrap();
                assert_eq!(Some(220), solution.best_value);
                assert_eq!(Some(vec![0, 1, 1]), solution.values);
            }
        }
    }

    #[test]
    fn maximize_reports_the_decisions_sorted_by_variable() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::Frontier);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let _ = solver.maximize().unwrap();
        assert_eq!(Some(vec![
            Decision{variable: Variable(0), value: 0},
            Decision{variable: Variable(1), value: 1},
            Decision{variable: Variable(2), value: 1},
        ]), solver.best_solution());
    }

    #[test]
    fn set_primal_overwrites_best_value_and_sol_if_it_improves() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = NbUnassignedWidth(problem.nb_variables());
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let d1  = Decision{variable: Variable(0), value: 10};
        let sol = vec![d1];

        solver.set_primal(10, sol.clone());
        assert!(solver.best_solution().is_some());
        assert_eq!(10, solver.best_lower_bound());

        // in this case, it wont update because there is no improvement
        solver.set_primal(5, sol.clone());
        assert!(solver.best_solution().is_some());
        assert_eq!(10, solver.best_lower_bound());

        // but here, it will update as it improves the best known sol
        solver.set_primal(10000, sol);
        assert!(solver.best_solution().is_some());
        assert_eq!(10000, solver.best_lower_bound());

        // it wont do much as the primal is better than the actual feasible solution
        let solution = solver.maximize().unwrap();
        assert_eq!(SearchStatus::Optimal, solution.statistics.status);
        assert_eq!(solution.best_value, Some(10000));
        assert_eq!(solution.values, Some(vec![10, 0, 0]));
    }

    #[test]
    fn the_callback_sees_every_improving_incumbent() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let mut seen = vec![];
        let solution = solver.maximize_with(&mut |values, stats| {
            seen.push((values.to_vec(), stats.incumbent));
        }).unwrap();

        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0].1 < w[1].1));
        assert_eq!(Some(&(vec![0, 1, 1], Some(220))), seen.last());
        assert_eq!(Some(220), solution.best_value);
    }

    #[test]
    fn an_infeasible_problem_is_unsatisfiable() {
        let problem = NoSolution;
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = NoBound::default();
        let cutoff = NoCutoff;
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let solution = solver.maximize().unwrap();
        assert_eq!(None, solution.best_value);
        assert_eq!(None, solution.values);
        assert_eq!(SearchStatus::Unsatisfiable, solution.statistics.status);
        assert_eq!(1, solution.statistics.iterations);
        assert_eq!(1.0, solution.statistics.gap);
    }

    #[test]
    fn a_cutoff_before_any_solution_yields_unknown() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = IterationBudget(0);
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let solution = solver.maximize().unwrap();
        assert_eq!(None, solution.best_value);
        assert_eq!(SearchStatus::Unknown, solution.statistics.status);
        assert_eq!(0, solution.statistics.iterations);
        assert_eq!(1.0, solution.statistics.gap);
    }

    #[test]
    fn a_cutoff_after_a_solution_yields_suboptimal_with_a_gap() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = IterationBudget(1);
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let solution = solver.maximize().unwrap();
        let stats = solution.statistics;
        assert_eq!(1, stats.iterations);
        assert!(solution.best_value.is_some());
        assert!(stats.upper_bound >= solution.best_value.unwrap());
        assert_eq!(gap(stats.upper_bound, stats.incumbent), stats.gap);
        if stats.upper_bound > solution.best_value.unwrap() {
            assert_eq!(SearchStatus::Suboptimal, stats.status);
        }
    }

    #[test]
    fn the_settings_are_passed_to_the_solver() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let settings = SolverSettingsBuilder::default()
            .debug(DebugLevel::On)
            .report_period(Duration::from_millis(0))
            .build()
            .unwrap();
        let mut solver = SeqSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier)
            .with_settings(settings);

        let solution = solver.maximize().unwrap();
        assert_eq!(Some(220), solution.best_value);
    }

    #[test]
    fn the_solver_can_be_run_twice() {
        let problem = instance();
        let relax = KPRelax;
        let ranking = KPRanking;
        let bound = KPBound {pb: &problem};
        let cutoff = NoCutoff;
        let width = FixedWidth(1);
        let dominance = EmptyDominanceChecker::default();
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let mut solver = SeqCachingSolver::new(&problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

        let first  = solver.maximize().unwrap();
        let second = solver.maximize().unwrap();
        assert_eq!(first.best_value, second.best_value);
        assert_eq!(SearchStatus::Optimal, second.statistics.status);
    }
}
