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

//! This module defines the basic abstractions one will manipulate when
//! implementing a branch-and-bound solver for some problem formulated as a
//! dynamic program.
//!
//! The most important abstractions that should be provided by a client are
//! `Problem`, `Relaxation` and (optionally) a `BoundHeuristic`.

use crate::{Variable, Decision, Domain, VarSet};

/// This trait defines the "contract" of what defines an optimization problem
/// solvable with the branch-and-bound with DD paradigm. An implementation of
/// this trait effectively defines a DP formulation of the problem being solved.
/// That DP model is envisioned as a labeled transition system -- which makes
/// it more amenable to DD compilation.
///
/// All the methods of this trait must be deterministic: calling them twice with
/// the same arguments must yield equal results. (This is checked when the
/// solver runs in debug mode).
pub trait Problem {
    /// The DP model of the problem manipulates a state which is user-defined.
    /// Any type implementing Problem must thus specify the type of its state.
    type State;
    /// Any problem bears on a number of variable $x_0, x_1, x_2, ... , x_{n-1}$
    /// This method returns the value of the number $n$
    fn nb_variables(&self) -> usize;
    /// This method returns the initial state of the problem (the state of $r$).
    fn initial_state(&self) -> Self::State;
    /// This method returns the initial value $v_r$ of the problem
    fn initial_value(&self) -> isize;
    /// Returns the set of values that can be assigned to variable `var` when
    /// in state `state`. An empty domain marks the state as a dead end.
    fn domain<'a>(&self, state: &'a Self::State, var: Variable) -> Domain<'a>;
    /// This method is an implementation of the transition function mentioned
    /// in the mathematical model of a DP formulation for some problem.
    fn transition(&self, state: &Self::State, decision: Decision) -> Self::State;
    /// This method is an implementation of the transition cost function mentioned
    /// in the mathematical model of a DP formulation for some problem.
    fn transition_cost(&self, state: &Self::State, decision: Decision) -> isize;
    /// Any problem needs to be able to specify an ordering on the variables
    /// in order to decide which variable should be assigned next. This choice
    /// is an **heuristic** choice. The variable ordering does not need to be
    /// fixed either. It may depend on the nodes constitutive of the next layer.
    /// These nodes are made accessible to this method as an iterator.
    ///
    /// By default, the free variable having the smallest id is selected.
    fn next_variable(&self, free: &VarSet, _next_layer: &mut dyn Iterator<Item = &Self::State>)
        -> Option<Variable>
    {
        free.iter().next()
    }
}

/// A relaxation encapsulates the relaxation $\Gamma$ and $\oplus$ which are
/// necessary when compiling relaxed DDs. These operators respectively relax
/// the weight of an arc towards a merged node, and merges the state of two or
/// more nodes so as to create a new inexact node.
pub trait Relaxation {
    /// Similar to the DP model of the problem it relaxes, a relaxation operates
    /// on a set of states (the same as the problem).
    type State;

    /// This method implements the merge operation: it combines several `states`
    /// and yields a new state which is supposed to stand for all the other
    /// merged states. In the mathematical model, this operation was denoted
    /// with the $\oplus$ operator.
    ///
    /// The merged state must be feasible whenever any of the merged states is
    /// and its best completion must be at least as good as theirs.
    fn merge(&self, states: &mut dyn Iterator<Item = &Self::State>) -> Self::State;

    /// This method relaxes the cost associated to a particular decision. It
    /// is called for any arc labeled `decision` whose weight needs to be
    /// adjusted because it is redirected from connecting `src` with `dst` to
    /// connecting `src` with `new`. In the mathematical model, this operation
    /// is denoted by the operator $\Gamma$.
    fn relax(
        &self,
        source: &Self::State,
        dest: &Self::State,
        new: &Self::State,
        decision: Decision,
        cost: isize,
    ) -> isize;
}

/// A bound heuristic yields an upper bound on the best value that can still
/// be collected from `state` when the variables in `free` remain to be
/// decided. It must be admissible: never lower than the value of a feasible
/// completion of the state.
pub trait BoundHeuristic {
    type State;

    /// Returns a very rough (but fast to compute) upper bound on the value
    /// that can be added to any path reaching `state`.
    fn estimate(&self, state: &Self::State, free: &VarSet) -> isize;
}

#[cfg(test)]
mod tests {
    use crate::{Problem, Decision, Variable, VarSet, Domain};

    #[test]
    fn by_default_the_smallest_free_variable_is_selected() {
        let pb = DummyProblem;
        let mut free = VarSet::all(5);
        free.remove(Variable(0));
        free.remove(Variable(1));
        assert_eq!(Some(Variable(2)), pb.next_variable(&free, &mut std::iter::empty()));
    }
    #[test]
    fn by_default_no_variable_is_selected_when_none_is_free() {
        let pb = DummyProblem;
        assert_eq!(None, pb.next_variable(&VarSet::empty(), &mut std::iter::empty()));
    }

    struct DummyProblem;
    impl Problem for DummyProblem {
        type State = char;

        fn nb_variables(&self) -> usize {
            5
        }
        fn initial_state(&self) -> Self::State {
            'a'
        }
        fn initial_value(&self) -> isize {
            0
        }
        fn domain<'a>(&self, _: &'a Self::State, _: Variable) -> Domain<'a> {
            (0..2).into()
        }
        fn transition(&self, state: &Self::State, _: Decision) -> Self::State {
            *state
        }
        fn transition_cost(&self, _: &Self::State, _: Decision) -> isize {
            0
        }
    }
}
