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

//! A tiny binary knapsack model shared by the solver unit tests.
use std::cmp::Ordering;

use crate::*;

pub struct Knapsack {
    pub capacity: usize,
    pub profit  : Vec<isize>,
    pub weight  : Vec<usize>,
}

const TAKE_IT: isize = 1;
const LEAVE_IT_OUT: isize = 0;

impl Problem for Knapsack {
    type State = usize;

    fn nb_variables(&self) -> usize {
        self.profit.len()
    }
    fn initial_state(&self) -> usize {
        self.capacity
    }
    fn initial_value(&self) -> isize {
        0
    }
    fn domain<'a>(&self, state: &'a usize, var: Variable) -> Domain<'a> {
        if *state >= self.weight[var.id()] {
            vec![TAKE_IT, LEAVE_IT_OUT].into()
        } else {
            vec![LEAVE_IT_OUT].into()
        }
    }
    fn transition(&self, state: &usize, dec: Decision) -> usize {
        if dec.value == TAKE_IT {
            state - self.weight[dec.variable.id()]
        } else {
            *state
        }
    }
    fn transition_cost(&self, _: &usize, dec: Decision) -> isize {
        self.profit[dec.variable.id()] * dec.value
    }
}

pub struct KPRelax;
impl Relaxation for KPRelax {
    type State = usize;

    fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
        states.copied().max().unwrap_or(0)
    }
    fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: isize) -> isize {
        cost
    }
}

pub struct KPRanking;
impl StateRanking for KPRanking {
    type State = usize;

    fn compare(&self, a: &usize, b: &usize) -> Ordering {
        a.cmp(b)
    }
}

/// Sums the profit of every free item that still fits
pub struct KPBound<'a> {
    pub pb: &'a Knapsack,
}
impl BoundHeuristic for KPBound<'_> {
    type State = usize;

    fn estimate(&self, state: &usize, free: &VarSet) -> isize {
        free.iter()
            .filter(|v| self.pb.weight[v.id()] <= *state)
            .map(|v| self.pb.profit[v.id()])
            .sum()
    }
}

/// A problem where no decision is ever possible
pub struct NoSolution;
impl Problem for NoSolution {
    type State = usize;

    fn nb_variables(&self) -> usize { 2 }
    fn initial_state(&self) -> usize { 0 }
    fn initial_value(&self) -> isize { 0 }
    fn domain<'a>(&self, _: &'a usize, _: Variable) -> Domain<'a> {
        Vec::<isize>::new().into()
    }
    fn transition(&self, state: &usize, _: Decision) -> usize { *state }
    fn transition_cost(&self, _: &usize, _: Decision) -> isize { 0 }
}
