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

//! This module provides the implementation of a simple solver frontier (priority queue)

use binary_heap_plus::BinaryHeap;

use crate::*;


/// The simplest frontier implementation you can think of: is basically consists
/// of a binary heap that pushes and pops frontier nodes. Nodes are popped by
/// decreasing upper bound, the ties being broken by the subproblem ranking.
///
/// # Note
/// The frontier also remembers which kind of cut-set it is fed with, so that
/// the solver can compile its relaxed DDs accordingly.
pub struct SimpleFrontier<O: SubProblemRanking> {
    heap: BinaryHeap<SubProblem<O::State>, CompareSubProblem<O>>,
    cutset_type: CutsetType,
}
impl <O> SimpleFrontier<O> where O: SubProblemRanking {
    /// This creates a new simple frontier which uses a custom frontier order.
    pub fn new(o: O, cutset_type: CutsetType) -> Self {
        Self{ heap: BinaryHeap::from_vec_cmp(vec![], CompareSubProblem::new(o)), cutset_type }
    }
}
impl <O> Frontier for SimpleFrontier<O> where O: SubProblemRanking {
    type State = O::State;

    fn push(&mut self, node: SubProblem<Self::State>) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<SubProblem<Self::State>> {
        self.heap.pop()
    }

    fn clear(&mut self) {
        self.heap.clear()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn best_in_frontier(&self) -> Option<isize> {
        self.heap.peek().map(|n| n.ub)
    }

    fn cut_set_type(&self) -> CutsetType {
        self.cutset_type
    }
}
