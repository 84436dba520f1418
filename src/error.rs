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

//! The errors that can abort a search. All of them denote a violation of the
//! modeling contract (problem, relaxation, bound or dominance) and are only
//! ever detected when the solver runs with `DebugLevel::On`.

use thiserror::Error;

/// A modeling contract violation detected while compiling a decision diagram.
/// States are rendered with their `Debug` representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The bound heuristic returned an estimate lower than the value of a
    /// path that is actually feasible from the given state.
    #[error("inadmissible bound at depth {depth}: estimate {estimate} for state {state} but a completion worth {actual} exists")]
    InadmissibleBound {
        depth: usize,
        state: String,
        estimate: isize,
        actual: isize,
    },
    /// Applying the same decision twice to the same state yielded two
    /// different states (or costs).
    #[error("non deterministic transition at depth {depth} from state {state} with decision {decision}")]
    NonDeterministicTransition {
        depth: usize,
        state: String,
        decision: String,
    },
    /// The merged state does not over approximate one of the states it stands
    /// for: the best path through the relaxed arcs followed by the best
    /// completion of the merged state is worse than the best path through
    /// the original state.
    #[error("unsound relaxation at depth {depth}: merged state {merged} reaches {relaxed:?} but original state {original} reaches {exact:?}")]
    UnsoundRelaxation {
        depth: usize,
        merged: String,
        original: String,
        relaxed: Option<isize>,
        exact: Option<isize>,
    },
    /// The dominance relation is not a preorder (a state fails to dominate
    /// itself).
    #[error("inconsistent dominance at depth {depth}: state {state} does not dominate itself")]
    InconsistentDominance {
        depth: usize,
        state: String,
    },
}
