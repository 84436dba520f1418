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

//! The trivial bound heuristic.

use std::marker::PhantomData;

use crate::{BoundHeuristic, VarSet};

/// A bound heuristic that knows nothing about the problem: it always yields
/// positive infinity, which is trivially admissible. Use it when the problem
/// offers no cheap way to bound the value of a state.
#[derive(Debug, Clone, Copy)]
pub struct NoBound<T>(PhantomData<T>);

impl<T> Default for NoBound<T> {
    fn default() -> Self {
        NoBound(PhantomData)
    }
}

impl<T> BoundHeuristic for NoBound<T> {
    type State = T;

    fn estimate(&self, _: &T, _: &VarSet) -> isize {
        isize::MAX
    }
}
