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

//! This module provide the solver implementation.
mod parallel;
mod sequential;
mod single;
#[cfg(test)]
mod test_knapsack;

pub use parallel::*;
pub use sequential::*;
pub use single::*;

use crate::{Mdd, EmptyCache, SimpleCache};

/// A type alias to emphasize that this is the solver that should be used by default.
pub type DefaultSolver<'a, State>        = ParallelSolver<'a, State, Mdd<State>, EmptyCache<State>>;
/// The default parallel solver, pruning the states with a threshold cache
pub type DefaultCachingSolver<'a, State> = ParallelSolver<'a, State, Mdd<State>, SimpleCache<State>>;

pub type SeqSolver<'a, State>            = SequentialSolver<'a, State, Mdd<State>, EmptyCache<State>>;
pub type SeqCachingSolver<'a, State>     = SequentialSolver<'a, State, Mdd<State>, SimpleCache<State>>;
