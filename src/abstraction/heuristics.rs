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

//! This module defines the traits used to encapsulate solver heuristics.
//!
//! Namely, it defines :
//!
//!  - the `WidthHeuristic` which is used to control the maximum width of an MDD
//!  - the `StateRanking` heuristic which is used to guess the nodes promisingness
//!  - the `SubProblemRanking` which orders the nodes of the solver frontier
//!  - the `Cutoff` heuristic which is used to impose a stopping criterion on the
//!    solver resolution.
//!  - the `ReductionStrategy` (and the `StateDistance` some strategies rely
//!    on) which groups the nodes of a layer that exceeds the maximum width.

use std::cmp::Ordering;

use crate::{SubProblem, SearchStatistics};

/// This trait encapsulates the behavior of the heuristic that determines
/// the maximum permitted width of a decision diagram.
///
/// # Technical Note:
/// Unlike `Problem`, `Relaxation` and `StateRanking`, the `WidthHeuristic`
/// is generic over the `State` type (type parameter rather than associated
/// type). A width heuristic such as `FixedWidth` makes sense regardless of
/// the problem being solved.
///
/// Whatever the heuristic returns, the compiler never uses a width smaller
/// than one.
pub trait WidthHeuristic<State> {
    /// Estimates a good maximum width for an MDD rooted in the given state
    fn max_width(&self, sub: &SubProblem<State>) -> usize;
}

/// A state ranking is an heuristic that imposes a partial order on states.
/// This order is used by the framework as a means to discriminate the most
/// promising nodes from the least promising ones when restricting or relaxing
/// a layer from some given DD.
///
/// According to this ordering, greater means better and hence more likely to
/// be kept after restriction or relaxation.
pub trait StateRanking {
    /// As is the case for `Problem` and `Relaxation`, a `StateRanking` must
    /// tell the kind of states it is able to operate on.
    type State;

    /// This method compares two states and determines which is the most
    /// desirable to keep. In this ordering, greater means more promising.
    fn compare(&self, a: &Self::State, b: &Self::State) -> Ordering;
}

/// A subproblem ranking is an heuristic that imposes a partial order on
/// subproblems on the solver frontier. This order is used by the framework
/// as a means to impose a given ordering on the nodes that are popped from
/// the solver frontier.
pub trait SubProblemRanking {
    /// As is the case for `Problem` and `Relaxation`, a `SubProblemRanking`
    /// must tell the kind of states it is able to operate on.
    type State;

    /// This method compares two subproblems and determines which is the one
    /// that needs to be popped off the frontier first. In this ordering, greater
    /// means more likely to be popped first.
    fn compare(&self, a: &SubProblem<Self::State>, b: &SubProblem<Self::State>) -> Ordering;
}

/// This trait encapsulates a criterion (external to the solver) which imposes
/// to stop searching for a better solution. Typically, this is done to grant
/// a given time budget to the search.
///
/// The criterion is only polled between two iterations of the branch-and-bound
/// loop; it never interrupts a compilation.
pub trait Cutoff {
    /// Returns true iff the criterion is met and the search must stop.
    fn must_stop(&self, stats: &SearchStatistics) -> bool;
}

/// Any closure inspecting the statistics can serve as a cutoff.
impl<F: Fn(&SearchStatistics) -> bool> Cutoff for F {
    fn must_stop(&self, stats: &SearchStatistics) -> bool {
        self(stats)
    }
}

/// A node of the layer being reduced, as seen by a `ReductionStrategy`.
#[derive(Debug)]
pub struct LayerNode<'a, State> {
    /// The state of the node
    pub state: &'a State,
    /// The length of the longest path from the root of the DD to this node
    pub value: isize,
}

impl<State> Clone for LayerNode<'_, State> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<State> Copy for LayerNode<'_, State> {}

/// A reduction strategy decides which nodes of an oversized layer end up
/// together when the layer is brought back to the maximum width.
///
/// The clusters are returned as indices in `layer`. They must partition the
/// layer (each node in exactly one cluster) into at most `max_width`
/// non-empty clusters. A relaxed compilation merges the nodes of each
/// cluster into one node; a restricted compilation keeps the best node of
/// each cluster and drops the others.
pub trait ReductionStrategy {
    /// The kind of states this strategy is able to group
    type State;

    /// Partitions `layer` into at most `max_width` clusters
    fn define_clusters(&self, layer: &[LayerNode<Self::State>], max_width: usize) -> Vec<Vec<usize>>;
}

/// A measure of how different two states are. Distance based reduction
/// strategies group the states which are close to one another, in the hope
/// that merging them loses little information.
pub trait StateDistance {
    type State;

    /// Returns a non negative distance between `a` and `b`
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;
}
