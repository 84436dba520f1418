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

//! This module provides the implementation of a parallel mdd solver. That is
//! a solver that will solve the problem using as many threads as requested.
//! By default, it uses as many threads as the number of hardware threads
//! available on the machine.
use std::clone::Clone;
use std::time::Instant;
use std::{marker::PhantomData, sync::Arc, hash::Hash, fmt::Debug};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, trace};

use crate::{Frontier, Decision, Problem, Relaxation, StateRanking, BoundHeuristic, WidthHeuristic, Cutoff, SubProblem, DecisionDiagram, CompilationInput, CompilationType, Solver, Solution, Completion, Cache, DominanceChecker, Error, SearchStatistics, SearchStatus, SolverSettings, SolutionCallback, ReductionStrategy, CostBased, gap};

use super::sequential::values_of;

/// Everything the workers may only touch while holding the lock
struct Critical<'a, State> {
    /// The open subproblems. Nodes pop in decreasing upper bound order, so
    /// the search is over as soon as a popped bound no longer beats `best_lb`.
    frontier: &'a mut (dyn Frontier<State = State> + Send + Sync),
    /// Number of subproblems being developed right now. An empty frontier
    /// only means completion when this drops to zero; otherwise it is mere
    /// starvation and the worker must wait for new nodes.
    ongoing: usize,
    /// Number of subproblems popped and developed so far
    explored: usize,
    frontier_max_size: usize,
    /// Open nodes per depth
    open_by_layer: Vec<usize>,
    /// Nodes being developed per depth
    ongoing_by_layer: Vec<usize>,
    /// Shallowest depth that still holds open or ongoing nodes; the cache
    /// layers above it can be dropped
    first_active_layer: usize,
    best_lb: isize,
    best_ub: isize,
    best_sol: Option<Vec<Decision>>,
    /// The bound of the node each worker is developing (isize::MIN when idle)
    upper_bounds: Vec<isize>,
    /// Set when the cutoff fired or a worker failed
    aborted: bool,
    /// The first modeling error reported by a worker
    error: Option<Error>,
    /// What the status would be, were the search to stop now
    status: SearchStatus,
    start: Instant,
    last_report: Instant,
}
/// What the workers share: read-only model components, the concurrent
/// pruning structures, and the lock guarded search state with the condvar
/// used to park starving workers.
struct Shared<'a, State, C> where
    C : Cache<State = State> + Send + Sync + Default,
{
    problem: &'a (dyn Problem<State = State> + Send + Sync),
    relaxation: &'a (dyn Relaxation<State = State> + Send + Sync),
    ranking: &'a (dyn StateRanking<State = State> + Send + Sync),
    bound: &'a (dyn BoundHeuristic<State = State> + Send + Sync),
    width_heu: &'a (dyn WidthHeuristic<State> + Send + Sync),
    cutoff: &'a (dyn Cutoff + Send + Sync),
    /// How relaxed layers get partitioned (cost based when unset)
    relax_strategy: Option<&'a (dyn ReductionStrategy<State = State> + Send + Sync)>,
    /// How restricted layers get partitioned (cost based when unset)
    restrict_strategy: Option<&'a (dyn ReductionStrategy<State = State> + Send + Sync)>,

    /// Thresholds learned from past compilations
    cache: C,
    /// Fronts of non dominated states
    dominance: &'a (dyn DominanceChecker<State = State> + Send + Sync),
    settings: SolverSettings,

    critical: Mutex<Critical<'a, State>>,
    /// Starving workers park here. Whoever finishes a subproblem (or stops
    /// the search) wakes them all up.
    monitor: Condvar,
}
/// The workload a thread can get from the shared state
enum WorkLoad<T> {
    /// There is no work left to be done: you can safely terminate
    Complete,
    /// The work must stop because of an external cutoff or an error
    Aborted,
    /// There is nothing you can do right now. Check again when you wake up
    Starvation,
    /// The item to process
    WorkItem { node: SubProblem<T> },
}

/// The user callback, shared among all workers
type SharedCallback<'b, 'c> = Mutex<&'b mut SolutionCallback<'c>>;

/// This is the structure implementing a multi-threaded branch-and-bound
/// solver guided by decision diagrams. The frontier and the incumbent are
/// shared behind one mutex; the dominance fronts and the cache are
/// concurrent maps that the workers update directly.
///
/// # Example Usage
/// The following solves a tiny subset-sum problem: pick numbers among
/// `items` so as to get as close as possible to `target` without exceeding it.
/// ```
/// # use bbdd::*;
/// # use std::sync::Arc;
/// struct SubsetSum { target: isize, items: Vec<isize> }
/// impl Problem for SubsetSum {
///     type State = isize; // how much can still be added
///     fn nb_variables(&self) -> usize { self.items.len() }
///     fn initial_state(&self) -> isize { self.target }
///     fn initial_value(&self) -> isize { 0 }
///     fn domain<'a>(&self, slack: &'a isize, var: Variable) -> Domain<'a> {
///         if *slack >= self.items[var.id()] { vec![1, 0].into() } else { vec![0].into() }
///     }
///     fn transition(&self, slack: &isize, d: Decision) -> isize {
///         slack - d.value * self.items[d.variable.id()]
///     }
///     fn transition_cost(&self, _: &isize, d: Decision) -> isize {
///         d.value * self.items[d.variable.id()]
///     }
/// }
/// struct Loosest;
/// impl Relaxation for Loosest {
///     type State = isize;
///     fn merge(&self, states: &mut dyn Iterator<Item = &isize>) -> isize {
///         states.copied().max().unwrap_or(0)
///     }
///     fn relax(&self, _: &isize, _: &isize, _: &isize, _: Decision, cost: isize) -> isize { cost }
/// }
/// struct MostSlack;
/// impl StateRanking for MostSlack {
///     type State = isize;
///     fn compare(&self, a: &isize, b: &isize) -> std::cmp::Ordering { a.cmp(b) }
/// }
/// // a larger slack at the same depth is never worse
/// struct SlackDominance;
/// impl Dominance for SlackDominance {
///     type State = isize;
///     type Key = ();
///     fn get_key(&self, _: Arc<isize>) -> Option<()> { Some(()) }
///     fn is_dominated_or_equal(&self, a: &isize, b: &isize) -> bool { a <= b }
/// }
///
/// let problem   = SubsetSum { target: 27, items: vec![11, 8, 7, 6, 5] };
/// let relax     = Loosest;
/// let ranking   = MostSlack;
/// let bound     = NoBound::default();
/// let width     = FixedWidth(2);
/// let dominance = SimpleDominanceChecker::new(SlackDominance, problem.nb_variables());
/// let cutoff    = TimeBudget::new(std::time::Duration::from_secs(30));
/// let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::Frontier);
///
/// let mut solver = DefaultCachingSolver::new(
///     &problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier)
///     .with_nb_threads(4);
///
/// let outcome = solver.maximize().unwrap();
/// // no subset sums up to 27 exactly: 11 + 8 + 7 is the best we can do
/// assert_eq!(Some(26), outcome.best_value);
/// assert_eq!(SearchStatus::Optimal, outcome.statistics.status);
/// ```
pub struct ParallelSolver<'a, State, D, C>
where D: DecisionDiagram<State = State> + Default,
      C: Cache<State = State> + Send + Sync + Default,
{
    /// Every worker borrows this
    shared: Shared<'a, State, C>,
    /// The kind of DD each worker instantiates
    _phantom: PhantomData<D>,
}

impl<'a, State, D, C> ParallelSolver<'a, State, D, C>
where
    State: Eq + Hash + Clone + Debug + Send + Sync,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State = State> + Send + Sync + Default,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        problem: &'a (dyn Problem<State = State> + Send + Sync),
        relaxation: &'a (dyn Relaxation<State = State> + Send + Sync),
        ranking: &'a (dyn StateRanking<State = State> + Send + Sync),
        bound: &'a (dyn BoundHeuristic<State = State> + Send + Sync),
        width_heu: &'a (dyn WidthHeuristic<State> + Send + Sync),
        dominance: &'a (dyn DominanceChecker<State = State> + Send + Sync),
        cutoff: &'a (dyn Cutoff + Send + Sync),
        frontier: &'a mut (dyn Frontier<State = State> + Send + Sync),
    ) -> Self {
        let settings = SolverSettings::default();
        let now = Instant::now();
        ParallelSolver {
            shared: Shared {
                problem,
                relaxation,
                ranking,
                bound,
                width_heu,
                cutoff,
                relax_strategy: None,
                restrict_strategy: None,
                cache: C::default(),
                dominance,
                //
                monitor: Condvar::new(),
                critical: Mutex::new(Critical {
                    best_sol: None,
                    best_lb: isize::MIN,
                    best_ub: isize::MAX,
                    upper_bounds: vec![isize::MIN; settings.nb_threads.max(1)],
                    frontier,
                    ongoing: 0,
                    explored: 0,
                    frontier_max_size: 0,
                    open_by_layer: vec![0; problem.nb_variables() + 1],
                    ongoing_by_layer: vec![0; problem.nb_variables() + 1],
                    first_active_layer: 0,
                    aborted: false,
                    error: None,
                    status: SearchStatus::Unknown,
                    start: now,
                    last_report: now,
                }),
                settings,
            },
            _phantom: Default::default(),
        }
    }
    /// Replaces the settings of this solver
    pub fn with_settings(mut self, settings: SolverSettings) -> Self {
        self.shared.critical.get_mut().upper_bounds = vec![isize::MIN; settings.nb_threads.max(1)];
        self.shared.settings = settings;
        self
    }
    /// Sets the number of threads used by the solver
    pub fn with_nb_threads(self, nb_threads: usize) -> Self {
        let mut settings = self.shared.settings.clone();
        settings.nb_threads = nb_threads;
        self.with_settings(settings)
    }

    /// Uses the given strategy to pick the nodes merged by relaxed DDs
    pub fn with_relax_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State> + Send + Sync)) -> Self {
        self.shared.relax_strategy = Some(strategy);
        self
    }
    /// Uses the given strategy to pick the nodes kept by restricted DDs
    pub fn with_restrict_strategy(mut self, strategy: &'a (dyn ReductionStrategy<State = State> + Send + Sync)) -> Self {
        self.shared.restrict_strategy = Some(strategy);
        self
    }

    fn nb_threads(&self) -> usize {
        self.shared.settings.nb_threads.max(1)
    }

    /// Resets the search state and posts the root subproblem
    fn initialize(&mut self) {
        let root = self.root_node();
        self.shared.cache.initialize(self.shared.problem);
        self.shared.dominance.clear();

        let nb_threads = self.nb_threads();
        let nb_layers = self.shared.problem.nb_variables() + 1;
        let critical = self.shared.critical.get_mut();
        critical.frontier.clear();
        critical.frontier.push(root);
        critical.open_by_layer = vec![0; nb_layers];
        critical.ongoing_by_layer = vec![0; nb_layers];
        critical.open_by_layer[0] += 1;
        critical.first_active_layer = 0;
        critical.upper_bounds = vec![isize::MIN; nb_threads];
        critical.ongoing = 0;
        critical.explored = 0;
        critical.frontier_max_size = 1;
        critical.best_ub = isize::MAX;
        critical.aborted = false;
        critical.error = None;
        critical.start = Instant::now();
        critical.last_report = critical.start;
    }

    fn root_node(&self) -> SubProblem<State> {
        let shared = &self.shared;
        SubProblem {
            state: Arc::new(shared.problem.initial_state()),
            value: shared.problem.initial_value(),
            path: vec![],
            ub: isize::MAX,
            depth: 0,
        }
    }

    /// Develops one subproblem: a restricted DD looks for better solutions,
    /// then (unless the restriction was exact) a relaxed DD bounds the node and
    /// hands its cut-set back to the frontier.
    fn process_one_node(
        mdd: &mut D,
        shared: &Shared<'a, State, C>,
        on_solution: &SharedCallback,
        node: SubProblem<State>,
    ) -> Result<(), Error> {
        trace!(depth = node.depth, value = node.value, ub = node.ub, "developing subproblem");

        // 1. RESTRICTION
        let node_ub = node.ub;
        let best_lb = Self::best_lb(shared);

        if node_ub <= best_lb {
            return Ok(());
        }

        let width = shared.width_heu.max_width(&node);
        let cutset_type = shared.critical.lock().frontier.cut_set_type();
        let cost_based = CostBased::new(shared.ranking);
        let mut compilation = CompilationInput {
            comp_type: CompilationType::Restricted,
            problem: shared.problem,
            relaxation: shared.relaxation,
            ranking: shared.ranking,
            bound: shared.bound,
            reduction: shared.restrict_strategy.unwrap_or(&cost_based),
            max_width: width,
            residual: &node,
            //
            best_lb,
            cache: &shared.cache,
            dominance: shared.dominance,
            cutset_type,
            debug: shared.settings.debug,
        };

        let Completion{is_exact, ..} = mdd.compile(&compilation)?;
        Self::maybe_update_best(mdd, shared, on_solution);
        if is_exact {
            return Ok(());
        }

        // 2. RELAXATION
        let best_lb = Self::best_lb(shared);
        compilation.comp_type = CompilationType::Relaxed;
        compilation.reduction = shared.relax_strategy.unwrap_or(&cost_based);
        compilation.best_lb = best_lb;

        let Completion{is_exact, best_value} = mdd.compile(&compilation)?;
        Self::maybe_update_best(mdd, shared, on_solution);
        match best_value {
            Some(ub) if !is_exact => Self::enqueue_cutset(mdd, shared, node_ub, ub),
            _ => trace!(depth = node.depth, "subproblem closed"),
        }

        Ok(())
    }

    fn best_lb(shared: &Shared<'a, State, C>) -> isize {
        shared.critical.lock().best_lb
    }

    /// Publishes the best exact solution of `mdd` when it beats the incumbent.
    /// The callback runs under the lock so incumbents are reported in
    /// increasing order.
    fn maybe_update_best(mdd: &D, shared: &Shared<'a, State, C>, on_solution: &SharedCallback) {
        let mut critical = shared.critical.lock();
        let dd_best_value = mdd.best_exact_value().unwrap_or(isize::MIN);
        if dd_best_value > critical.best_lb {
            critical.best_lb = dd_best_value;
            critical.best_sol = mdd.best_exact_solution();

            let stats = Self::statistics_of(&critical, critical.status);
            info!(value = dd_best_value, iterations = stats.iterations, gap = stats.gap, "new incumbent");

            let values = values_of(shared.problem.nb_variables(), critical.best_sol.as_deref().unwrap_or_default());
            let mut callback = on_solution.lock();
            (*callback)(&values, &stats);
        }
    }
    /// Pushes the cut-set nodes of `mdd` whose bound (capped by the bound of
    /// their parent subproblem) still beats the incumbent.
    fn enqueue_cutset(mdd: &mut D, shared: &Shared<'a, State, C>, ub: isize, relaxed_ub: isize) {
        let mut critical = shared.critical.lock();
        let best_lb = critical.best_lb;
        if critical.aborted || relaxed_ub <= best_lb {
            return;
        }
        mdd.drain_cutset(|mut cutset_node| {
            cutset_node.ub = ub.min(cutset_node.ub);
            if cutset_node.ub > best_lb {
                let depth = cutset_node.depth;
                let before = critical.frontier.len();
                critical.frontier.push(cutset_node);
                let after = critical.frontier.len();
                critical.open_by_layer[depth] += after - before;
            }
        });
        critical.frontier_max_size = critical.frontier_max_size.max(critical.frontier.len());
    }
    fn notify_node_finished(shared: &Shared<'a, State, C>, thread_id: usize, depth: usize) {
        let mut critical = shared.critical.lock();
        critical.ongoing -= 1;
        critical.upper_bounds[thread_id] = isize::MIN;
        critical.ongoing_by_layer[depth] -= 1;
        shared.monitor.notify_all();
    }

    /// Stops every worker: the cutoff fired or a model error was detected
    fn abort_search(shared: &Shared<'a, State, C>, critical: &mut Critical<'a, State>, error: Option<Error>) {
        critical.aborted = true;
        if critical.error.is_none() {
            critical.error = error;
        }
        critical.best_ub = Self::current_upper_bound(critical);
        critical.frontier.clear();
        critical.open_by_layer.iter_mut().for_each(|o| *o = 0);
        shared.cache.clear();
        shared.monitor.notify_all();
    }

    /// The upper bound that can be guaranteed given the content of the
    /// frontier and the nodes being processed
    fn current_upper_bound(critical: &Critical<'a, State>) -> isize {
        let ongoing = critical.upper_bounds.iter().copied().max().unwrap_or(isize::MIN);
        let frontier = critical.frontier.best_in_frontier().unwrap_or(isize::MIN);
        ongoing.max(frontier).max(critical.best_lb)
    }

    fn statistics_of(critical: &Critical<'a, State>, status: SearchStatus) -> SearchStatistics {
        let incumbent = critical.best_sol.as_ref().map(|_| critical.best_lb);
        SearchStatistics {
            status,
            iterations: critical.explored,
            frontier_max_size: critical.frontier_max_size,
            runtime_ms: critical.start.elapsed().as_millis() as u64,
            incumbent,
            upper_bound: critical.best_ub,
            gap: gap(critical.best_ub, incumbent),
        }
    }

    fn maybe_report(shared: &Shared<'a, State, C>, critical: &mut Critical<'a, State>) {
        if critical.last_report.elapsed() >= shared.settings.report_period {
            critical.last_report = Instant::now();
            debug!(
                iterations = critical.explored,
                frontier   = critical.frontier.len(),
                ongoing    = critical.ongoing,
                lb         = critical.best_lb,
                ub         = critical.best_ub,
                gap        = gap(critical.best_ub, critical.best_sol.as_ref().map(|_| critical.best_lb)),
                "search progress");
        }
    }

    /// Hands the next subproblem to worker `thread_id`. Parks the worker when
    /// nothing is open while others are still busy.
    fn get_workload(shared: &Shared<'a, State, C>, thread_id: usize) -> WorkLoad<State>
    {
        let mut critical = shared.critical.lock();

        // Do we need to stop
        if critical.aborted {
            return WorkLoad::Aborted;
        }

        // Can we clean up the cache?
        while critical.first_active_layer < shared.problem.nb_variables() &&
                critical.open_by_layer[critical.first_active_layer] + critical.ongoing_by_layer[critical.first_active_layer] == 0 {
            shared.cache.clear_layer(critical.first_active_layer);
            critical.first_active_layer += 1;
        }

        // Are we done ?
        if critical.ongoing == 0 && critical.frontier.is_empty() {
            critical.best_ub = critical.best_lb;
            return WorkLoad::Complete;
        }

        critical.best_ub = Self::current_upper_bound(&critical);
        critical.status = if critical.best_sol.is_some() { SearchStatus::Suboptimal } else { SearchStatus::Unknown };
        Self::maybe_report(shared, &mut critical);
        if shared.cutoff.must_stop(&Self::statistics_of(&critical, critical.status)) {
            Self::abort_search(shared, &mut critical, None);
            return WorkLoad::Aborted;
        }

        // Nothing to do yet ? => Wait for someone to post jobs
        if critical.frontier.is_empty() {
            shared.monitor.wait(&mut critical);
            return WorkLoad::Starvation;
        }

        loop {
            let Some(nn) = critical.frontier.pop() else {
                return WorkLoad::Starvation;
            };

            // Nothing relevant ? =>  Wait for someone to post jobs
            if nn.ub <= critical.best_lb {
                critical.frontier.clear();
                critical.open_by_layer.iter_mut().for_each(|o| *o = 0);
                return WorkLoad::Starvation;
            }

            critical.open_by_layer[nn.depth] -= 1;
            if shared.cache.must_explore(&nn) {
                shared.cache.update(nn.state.clone(), nn.depth, nn.value, true);

                // Consume the current node and process it
                critical.ongoing += 1;
                critical.explored += 1;
                critical.upper_bounds[thread_id] = nn.ub;
                critical.ongoing_by_layer[nn.depth] += 1;

                return WorkLoad::WorkItem { node: nn };
            }
        }
    }
}

impl<'a, State, D, C> Solver for ParallelSolver<'a, State, D, C>
where
    State: Eq + PartialEq + Hash + Clone + Debug + Send + Sync,
    D: DecisionDiagram<State = State> + Default,
    C: Cache<State = State> + Send + Sync + Default,
{
    /// Runs the branch-and-bound with `nb_threads` scoped workers, each one
    /// owning its own DD.
    fn maximize_with(&mut self, on_solution: &mut SolutionCallback) -> Result<Solution, Error> {
        self.initialize();

        let nb_threads = self.nb_threads();
        let on_solution: SharedCallback = Mutex::new(on_solution);
        std::thread::scope(|s| {
            for i in 0..nb_threads {
                let shared = &self.shared;
                let on_solution = &on_solution;
                s.spawn(move || {
                    let mut mdd = D::default();
                    loop {
                        match Self::get_workload(shared, i) {
                            WorkLoad::Complete => break,
                            WorkLoad::Aborted => break,
                            WorkLoad::Starvation => continue,
                            WorkLoad::WorkItem { node } => {
                                let depth = node.depth;
                                let outcome = Self::process_one_node(&mut mdd, shared, on_solution, node);
                                if let Err(error) = outcome {
                                    Self::abort_search(shared, &mut shared.critical.lock(), Some(error));
                                    Self::notify_node_finished(shared, i, depth);
                                    break;
                                } else {
                                    Self::notify_node_finished(shared, i, depth);
                                }
                            }
                        }
                    }
                });
            }
        });

        let nb_variables = self.shared.problem.nb_variables();
        let critical = self.shared.critical.get_mut();
        if let Some(error) = critical.error.take() {
            return Err(error);
        }

        critical.status = match (critical.aborted, critical.best_sol.is_some()) {
            (false, true)  => SearchStatus::Optimal,
            (false, false) => SearchStatus::Unsatisfiable,
            (true,  true)  => SearchStatus::Suboptimal,
            (true,  false) => SearchStatus::Unknown,
        };
        if let Some(sol) = critical.best_sol.as_mut() {
            sol.sort_unstable_by_key(|d| d.variable.id())
        }

        let statistics = Self::statistics_of(critical, critical.status);
        info!(
            status     = ?statistics.status,
            best_value = ?statistics.incumbent,
            iterations = statistics.iterations,
            runtime_ms = statistics.runtime_ms,
            gap        = statistics.gap,
            "search complete");

        Ok(Solution {
            best_value: statistics.incumbent,
            values: critical.best_sol.as_deref().map(|sol| values_of(nb_variables, sol)),
            statistics,
        })
    }

    fn best_solution(&self) -> Option<Vec<Decision>> {
        self.shared.critical.lock().best_sol.clone()
    }
    fn best_value(&self) -> Option<isize> {
        let critical = self.shared.critical.lock();
        critical.best_sol.as_ref().map(|_sol| critical.best_lb)
    }
    fn best_lower_bound(&self) -> isize {
        self.shared.critical.lock().best_lb
    }
    fn best_upper_bound(&self) -> isize {
        self.shared.critical.lock().best_ub
    }
    fn set_primal(&mut self, value: isize, solution: Vec<Decision>) {
        let mut critical = self.shared.critical.lock();
        if value > critical.best_lb {
            critical.best_sol = Some(solution);
            critical.best_lb  = value;
        }
    }
    fn statistics(&self) -> SearchStatistics {
        let critical = self.shared.critical.lock();
        Self::statistics_of(&critical, critical.status)
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################
