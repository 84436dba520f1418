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

//! This module provides solvers that compile one single decision diagram
//! rooted in the initial state of the problem instead of running a full
//! branch-and-bound. They come in handy to measure the quality of a
//! relaxation or of a restriction on their own, or to solve tiny instances
//! exhaustively.
use std::time::Instant;
use std::{sync::Arc, hash::Hash, fmt::Debug};

use tracing::info;

use crate::{Decision, Problem, Relaxation, StateRanking, BoundHeuristic, WidthHeuristic, ReductionStrategy, CostBased, SubProblem, DecisionDiagram, CompilationInput, CompilationType, CutsetType, Solver, Solution, Completion, Cache, EmptyCache, DominanceChecker, Error, Mdd, SearchStatistics, SearchStatus, SolverSettings, SolutionCallback, gap};

use super::sequential::values_of;

/// What the three single compilation solvers have in common: they only
/// differ by the kind of dd they compile.
struct SingleCompilation<'a, State> {
    comp_type: CompilationType,
    problem: &'a (dyn Problem<State = State>),
    relaxation: &'a (dyn Relaxation<State = State>),
    ranking: &'a (dyn StateRanking<State = State>),
    bound: &'a (dyn BoundHeuristic<State = State>),
    width_heu: &'a (dyn WidthHeuristic<State>),
    dominance: &'a (dyn DominanceChecker<State = State>),
    /// How oversized layers get partitioned (cost based when None)
    reduction: Option<&'a (dyn ReductionStrategy<State = State>)>,
    settings: SolverSettings,

    cache: EmptyCache<State>,
    mdd: Mdd<State>,
    /// Number of compilations performed (zero until the first search)
    compiled: usize,
    best_lb: isize,
    best_ub: isize,
    best_sol: Option<Vec<Decision>>,
    status: SearchStatus,
    start: Instant,
}

impl<'a, State> SingleCompilation<'a, State>
where
    State: Eq + Hash + Clone + Debug,
{
    #[allow(clippy::too_many_arguments)]
    fn new(
        comp_type: CompilationType,
        problem: &'a (dyn Problem<State = State>),
        relaxation: &'a (dyn Relaxation<State = State>),
        ranking: &'a (dyn StateRanking<State = State>),
        bound: &'a (dyn BoundHeuristic<State = State>),
        width_heu: &'a (dyn WidthHeuristic<State>),
        dominance: &'a (dyn DominanceChecker<State = State>),
    ) -> Self {
        SingleCompilation {
            comp_type,
            problem,
            relaxation,
            ranking,
            bound,
            width_heu,
            dominance,
            reduction: None,
            settings: SolverSettings::default(),
            cache: EmptyCache::new(),
            mdd: Mdd::default(),
            compiled: 0,
            best_lb: isize::MIN,
            best_ub: isize::MAX,
            best_sol: None,
            status: SearchStatus::Unknown,
            start: Instant::now(),
        }
    }

    fn solve(&mut self, on_solution: &mut SolutionCallback) -> Result<Solution, Error> {
        self.start = Instant::now();
        self.cache.initialize(self.problem);
        self.dominance.clear();

        let root = SubProblem {
            state: Arc::new(self.problem.initial_state()),
            value: self.problem.initial_value(),
            path: vec![],
            ub: isize::MAX,
            depth: 0,
        };
        let max_width = match self.comp_type {
            CompilationType::Exact => usize::MAX,
            _ => self.width_heu.max_width(&root),
        };
        let cost_based = CostBased::new(self.ranking);
        let compilation = CompilationInput {
            comp_type: self.comp_type,
            problem: self.problem,
            relaxation: self.relaxation,
            ranking: self.ranking,
            bound: self.bound,
            reduction: self.reduction.unwrap_or(&cost_based),
            max_width,
            residual: &root,
            best_lb: self.best_lb,
            cache: &self.cache,
            dominance: self.dominance,
            cutset_type: CutsetType::LastExactLayer,
            debug: self.settings.debug,
        };

        let Completion { is_exact, best_value } = self.mdd.compile(&compilation)?;
        self.compiled += 1;

        self.best_ub = match (self.comp_type, is_exact) {
            (_, true) => self.best_lb,
            (CompilationType::Relaxed, false) => best_value.map_or(self.best_lb, |ub| ub.max(self.best_lb)),
            _ => isize::MAX,
        };
        self.maybe_update_best(on_solution);

        let proved = is_exact || self.best_ub <= self.best_lb;
        self.status = match (proved, self.best_sol.is_some()) {
            (true,  true)  => SearchStatus::Optimal,
            (true,  false) => SearchStatus::Unsatisfiable,
            (false, true)  => SearchStatus::Suboptimal,
            (false, false) => SearchStatus::Unknown,
        };
        if let Some(sol) = self.best_sol.as_mut() {
            sol.sort_unstable_by_key(|d| d.variable.id())
        }

        let statistics = self.statistics();
        info!(
            kind       = ?self.comp_type,
            status     = ?statistics.status,
            best_value = ?statistics.incumbent,
            ub         = statistics.upper_bound,
            runtime_ms = statistics.runtime_ms,
            "compilation complete");

        Ok(Solution {
            best_value: self.best_value(),
            values: self.best_sol.as_deref().map(|sol| values_of(self.problem.nb_variables(), sol)),
            statistics,
        })
    }

    /// Adopts the best exact path of the dd when it beats the incumbent
    fn maybe_update_best(&mut self, on_solution: &mut SolutionCallback) {
        let dd_best_value = self.mdd.best_exact_value().unwrap_or(isize::MIN);
        if dd_best_value > self.best_lb {
            self.best_lb = dd_best_value;
            self.best_sol = self.mdd.best_exact_solution();
            if self.mdd.is_exact() {
                self.best_ub = self.best_lb;
            }

            let mut stats = self.statistics();
            stats.status = SearchStatus::Suboptimal;
            let values = values_of(self.problem.nb_variables(), self.best_sol.as_deref().unwrap_or_default());
            on_solution(&values, &stats);
        }
    }

    fn best_value(&self) -> Option<isize> {
        self.best_sol.as_ref().map(|_sol| self.best_lb)
    }

    fn set_primal(&mut self, value: isize, solution: Vec<Decision>) {
        if value > self.best_lb {
            self.best_sol = Some(solution);
            self.best_lb  = value;
        }
    }

    fn statistics(&self) -> SearchStatistics {
        let incumbent = self.best_value();
        SearchStatistics {
            status: self.status,
            iterations: self.compiled,
            frontier_max_size: 0,
            runtime_ms: self.start.elapsed().as_millis() as u64,
            incumbent,
            upper_bound: self.best_ub,
            gap: gap(self.best_ub, incumbent),
        }
    }
}

/// Declares a solver wrapping a [`SingleCompilation`] of the given kind
macro_rules! single_compilation_solver {
    ($(#[$doc:meta])* $name:ident, $comp_type:expr) => {
        $(#[$doc])*
        pub struct $name<'a, State>(SingleCompilation<'a, State>);

        impl<'a, State> $name<'a, State>
        where
            State: Eq + Hash + Clone + Debug,
        {
            pub fn new(
                problem: &'a (dyn Problem<State = State>),
                relaxation: &'a (dyn Relaxation<State = State>),
                ranking: &'a (dyn StateRanking<State = State>),
                bound: &'a (dyn BoundHeuristic<State = State>),
                width_heu: &'a (dyn WidthHeuristic<State>),
                dominance: &'a (dyn DominanceChecker<State = State>),
            ) -> Self {
                Self(SingleCompilation::new($comp_type, problem, relaxation, ranking, bound, width_heu, dominance))
            }
            /// Replaces the settings of this solver
            pub fn with_settings(mut self, settings: SolverSettings) -> Self {
                self.0.settings = settings;
                self
            }
        }

        impl<State> Solver for $name<'_, State>
        where
            State: Eq + Hash + Clone + Debug,
        {
            fn maximize_with(&mut self, on_solution: &mut SolutionCallback) -> Result<Solution, Error> {
                self.0.solve(on_solution)
            }
            fn best_value(&self) -> Option<isize> {
                self.0.best_value()
            }
            fn best_solution(&self) -> Option<Vec<Decision>> {
                self.0.best_sol.clone()
            }
            fn best_lower_bound(&self) -> isize {
                self.0.best_lb
            }
            fn best_upper_bound(&self) -> isize {
                self.0.best_ub
            }
            fn set_primal(&mut self, value: isize, solution: Vec<Decision>) {
                self.0.set_primal(value, solution)
            }
            fn statistics(&self) -> SearchStatistics {
                self.0.statistics()
            }
        }
    };
}

single_compilation_solver!(
    /// Compiles the exact dd of the whole problem. The width heuristic is
    /// ignored, which means the dd may grow exponentially large: only use it
    /// on small instances.
    ///
    /// # Example
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
    /// let bound     = NoBound::default();
    /// let width     = FixedWidth(1);
    /// let dominance = EmptyDominanceChecker::default();
    ///
    /// let mut solver = ExactSolver::new(&problem, &KPRelax, &KPRanking, &bound, &width, &dominance);
    /// let solution = solver.maximize().unwrap();
    ///
    /// assert_eq!(Some(220), solution.best_value);
    /// assert_eq!(SearchStatus::Optimal, solution.statistics.status);
    /// ```
    ExactSolver, CompilationType::Exact
);

single_compilation_solver!(
    /// Compiles one relaxed dd of the whole problem. The value of its best
    /// path is reported as the upper bound, and its best exact path (if any)
    /// as the incumbent. The search is only reported optimal when the dd
    /// happened to be exact or its bound meets the incumbent.
    RelaxationSolver, CompilationType::Relaxed
);

single_compilation_solver!(
    /// Compiles one restricted dd of the whole problem. Its best path is a
    /// feasible solution, optimal only when no layer had to be restricted.
    RestrictionSolver, CompilationType::Restricted
);

impl<'a, State> RelaxationSolver<'a, State>
where
    State: Eq + Hash + Clone + Debug,
{
    /// Uses the given strategy to pick the nodes merged together
    pub fn with_relax_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State>)) -> Self {
        self.0.reduction = Some(strategy);
        self
    }
}

impl<'a, State> RestrictionSolver<'a, State>
where
    State: Eq + Hash + Clone + Debug,
{
    /// Uses the given strategy to pick the nodes that are kept
    pub fn with_restrict_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State>)) -> Self {
        self.0.reduction = Some(strategy);
        self
    }
}
