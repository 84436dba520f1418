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

use std::sync::Arc;

/// This trait gives the possibility to model dominance relations between the
/// states of a specific problem. The dominance relation is evaluated only for
/// pairs of states that are mapped to the same key. States for which no key
/// is returned never take part in any dominance check.
pub trait Dominance {
    type State;
    type Key;

    /// Takes a state and returns a key that maps it to comparable states
    fn get_key(&self, state: Arc<Self::State>) -> Option<Self::Key>;

    /// Returns true iff `b` is at least as good as `a`: every completion of
    /// `a` is also a completion of `b` with a value that is no worse.
    /// The relation must be reflexive and transitive.
    /// Note: the states are assumed to have the same key, otherwise they are
    /// not comparable for dominance.
    fn is_dominated_or_equal(&self, a: &Self::State, b: &Self::State) -> bool;
}

/// The outcome of a dominance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominanceCheckResult {
    /// True iff the checked state was dominated by a stored one
    pub dominated: bool,
    /// When dominated, the largest value at which the state remains dominated
    pub threshold: Option<isize>,
}

/// A dominance checker maintains, for each depth, the fronts of non-dominated
/// (state, value) pairs that have been encountered during the search. It is
/// shared by all the compilations of a solver, hence it relies on interior
/// mutability.
pub trait DominanceChecker {
    type State;

    /// Returns a result flagged `dominated` if the state is dominated by a
    /// stored one. Otherwise, the (state, value) pair is inserted in the front
    /// of its key at the given depth, evicting the entries it dominates.
    fn update_dominance(&self, state: Arc<Self::State>, depth: usize, value: isize) -> DominanceCheckResult;

    /// Returns false when the underlying relation fails to be reflexive on
    /// the given state.
    fn check_reflexive(&self, _state: &Self::State) -> bool {
        true
    }

    /// Forgets every entry of every front. Called when a new search starts.
    fn clear(&self) {}
}
