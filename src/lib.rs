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

//! # BBDD
//! BBDD is a generic framework to develop branch-and-bound solvers guided by
//! decision diagrams (DD) in Rust. Its goal is to let you describe your
//! optimization problem as a dynamic program (see `Problem`) along with a
//! `Relaxation`. When the dynamic program of the problem is considered as a
//! transition system, the relaxation serves the purpose of merging different
//! nodes of the transition system into an other node standing for them all.
//! In that setup, the sole condition to ensure the correctness of the
//! optimization algorithm is that the replacement node must be an over
//! approximation of all what is feasible from the merged nodes.
//!
//! The solver repeatedly pops the most promising subproblem off its frontier,
//! compiles a *restricted* DD (which yields feasible solutions) and a
//! *relaxed* DD (which yields an upper bound and an exact cut-set) and pushes
//! the cut-set nodes back onto the frontier until the bound meets the best
//! known solution. Optional dominance rules and a threshold cache prune the
//! states that cannot improve on what has already been explored.
//!
//! Which nodes get merged (or dropped) when a layer outgrows the maximum
//! width is decided by a `ReductionStrategy`. The default one is cost based;
//! `Ghp` and `Hybrid` group the states that are close to one another
//! according to a `StateDistance`. Besides the branch-and-bound solvers,
//! `ExactSolver`, `RelaxationSolver` and `RestrictionSolver` compile one
//! single DD of the whole problem.
//!
//! ## Side benefit
//! As a side benefit, you will be able to exploit all of your hardware to
//! solve your optimization in parallel (see `ParallelSolver`).
//!
//! ## Quick Example
//! The following presents a minimalistic use of bbdd. It implements a solver
//! for the binary knapsack problem.
//!
//! ```
//! use bbdd::*;
//!
//! struct Knapsack {
//!     capacity: usize,
//!     profit  : Vec<isize>,
//!     weight  : Vec<usize>,
//! }
//! impl Problem for Knapsack {
//!     type State = usize; // the remaining capacity
//!     fn nb_variables(&self) -> usize { self.profit.len() }
//!     fn initial_state(&self) -> usize { self.capacity }
//!     fn initial_value(&self) -> isize { 0 }
//!     fn domain<'a>(&self, state: &'a usize, var: Variable) -> Domain<'a> {
//!         if *state >= self.weight[var.id()] { (0..=1).into() } else { (0..=0).into() }
//!     }
//!     fn transition(&self, state: &usize, d: Decision) -> usize {
//!         state - self.weight[d.variable.id()] * d.value as usize
//!     }
//!     fn transition_cost(&self, _: &usize, d: Decision) -> isize {
//!         self.profit[d.variable.id()] * d.value
//!     }
//! }
//! struct KnapsackRelax;
//! impl Relaxation for KnapsackRelax {
//!     type State = usize;
//!     fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
//!         states.copied().max().unwrap_or(0)
//!     }
//!     fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: isize) -> isize {
//!         cost
//!     }
//! }
//! struct KnapsackRanking;
//! impl StateRanking for KnapsackRanking {
//!     type State = usize;
//!     fn compare(&self, a: &usize, b: &usize) -> std::cmp::Ordering { a.cmp(b) }
//! }
//!
//! let problem   = Knapsack { capacity: 50, profit: vec![60, 100, 120], weight: vec![10, 20, 30] };
//! let relax     = KnapsackRelax;
//! let ranking   = KnapsackRanking;
//! let bound     = NoBound::default();
//! let width     = FixedWidth(2);
//! let dominance = EmptyDominanceChecker::default();
//! let cutoff    = NoCutoff;
//! let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::Frontier);
//!
//! let mut solver = SeqSolver::new(
//!     &problem, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
//!
//! let solution = solver.maximize().unwrap();
//! assert_eq!(Some(220), solution.best_value);
//! assert_eq!(Some(vec![0, 1, 1]), solution.values);
//! assert_eq!(SearchStatus::Optimal, solution.statistics.status);
//! ```

// ----------------------------------------------------------------------------
// --- MODULES ----------------------------------------------------------------
// ----------------------------------------------------------------------------
mod common;
mod error;
mod abstraction;
mod implementation;

// ----------------------------------------------------------------------------
// --- EXPORTS ----------------------------------------------------------------
// ----------------------------------------------------------------------------
pub use common::*;
pub use error::*;
pub use abstraction::*;
pub use implementation::*;
