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

//! This module provides the implementation of various maximum width heuristics.
//! None of them ever yields a width smaller than one.

use crate::{WidthHeuristic, SubProblem};


/// This strategy specifies a fixed maximum width for all the layers of an
/// approximate MDD. This is a *static* heuristic as the width will remain fixed
/// regardless of the approximate MDD to generate.
///
/// # Example
/// Assuming a fixed width of 100, the heuristic will return 100 regardless of
/// the subproblem being processed.
///
/// ```
/// # use bbdd::*;
/// # use std::sync::Arc;
/// let heuristic = FixedWidth(100); // assume a fixed width of 100
///
/// // assume the existence of whatever subproblem you like..
/// let subproblem = SubProblem {state: Arc::new('a'), value: 42, ub: 100, depth: 0, path: vec![]};
/// // still, the heuristic always return 100.
/// assert_eq!(100, heuristic.max_width(&subproblem));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct FixedWidth(pub usize);
impl <X> WidthHeuristic<X> for FixedWidth {
    fn max_width(&self, _: &SubProblem<X>) -> usize {
        self.0.max(1)
    }
}

/// This strategy specifies a variable maximum width for the layers of an
/// approximate MDD. When using this heuristic, each layer of an approximate
/// MDD is allowed to have as many nodes as there are free variables to decide
/// upon.
///
/// # Example
/// Assuming a problem with 5 variables (0..=4). If we are calling this heuristic
/// to derive the maximum allowed width for the layers of an approximate MDD
/// when variables {1, 3, 4} have been fixed, then there are only two "free"
/// variables. Namely, variables 0 and 2. In that case, this strategy will return
/// a max width of two.
///
/// ```
/// # use bbdd::*;
/// # use std::sync::Arc;
/// let heuristic = NbUnassignedWidth(5);
/// let subproblem = SubProblem {
///     state: Arc::new('a'),
///     value: 5,
///     ub: 100,
///     depth: 3,
///     path: vec![
///         Decision{variable: Variable(1), value: 1},
///         Decision{variable: Variable(3), value: 1},
///         Decision{variable: Variable(4), value: 1},
///     ]
/// };
/// assert_eq!(2, heuristic.max_width(&subproblem));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct NbUnassignedWidth(pub usize);
impl <X> WidthHeuristic<X> for NbUnassignedWidth {
    fn max_width(&self, x: &SubProblem<X>) -> usize {
        self.0.saturating_sub(x.path.len()).max(1)
    }
}

/// This strategy acts as a decorator for an other max width heuristic. It
/// multiplies the maximum width of the strategy it delegates to by a constant
/// (configured) factor. It is typically used in conjunction with NbUnassigned
/// to provide a maximum width that allows a certain number of nodes.
/// Using a constant factor of 1 means that this decorator will have absolutely
/// no impact.
///
/// # Example
/// ```
/// # use bbdd::*;
/// # use std::sync::Arc;
/// let heuristic = Times(5, NbUnassignedWidth(10));
/// let subproblem = SubProblem {state: Arc::new('a'), value: 0, ub: 100, depth: 0, path: vec![]};
/// assert_eq!(50, heuristic.max_width(&subproblem));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct Times<X>(pub usize, pub X);

impl <S, X: WidthHeuristic<S>> WidthHeuristic<S> for Times<X> {
    fn max_width(&self, x: &SubProblem<S>) -> usize {
        1.max(self.0.saturating_mul(self.1.max_width(x)))
    }
}

/// This strategy acts as a decorator for an other max width heuristic. It
/// divides the maximum width of the strategy it delegates to by a constant
/// (configured) factor. It is typically used in conjunction with NbUnassigned
/// to provide a maximum width that allows a certain number of nodes.
/// Using a constant factor of 1 means that this decorator will have absolutely
/// no impact.
///
/// # Note
/// The factor must not be zero.
#[derive(Debug, Copy, Clone)]
pub struct DivBy<X>(pub usize, pub X);

impl <S, X: WidthHeuristic<S>> WidthHeuristic<S> for DivBy<X> {
    fn max_width(&self, x: &SubProblem<S>) -> usize {
        1.max(self.1.max_width(x) / self.0)
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################



#[cfg(test)]
mod test_adapters {
    use std::sync::Arc;

    use crate::*;

    fn sub() -> SubProblem<char> {
        SubProblem { state: Arc::new('a'), value: 10, ub: 100, path: vec![], depth: 0 }
    }

    #[test]
    fn test_times() {
        let heu = FixedWidth(5);
        assert_eq!(10, Times( 2, heu).max_width(&sub()));
        assert_eq!(15, Times( 3, heu).max_width(&sub()));
        assert_eq!( 5, Times( 1, heu).max_width(&sub()));
        assert_eq!(50, Times(10, heu).max_width(&sub()));
    }
    #[test]
    fn test_div_by() {
        assert_eq!( 2, DivBy( 2, FixedWidth(4)).max_width(&sub()));
        assert_eq!( 3, DivBy( 3, FixedWidth(9)).max_width(&sub()));
        assert_eq!(10, DivBy( 1, FixedWidth(10)).max_width(&sub()));
    }
    #[test]
    fn wrappers_never_return_a_zero_maxwidth() {
        assert_eq!( 1, Times( 0, FixedWidth(10)).max_width(&sub()));
        assert_eq!(10, Times(10, FixedWidth( 0)).max_width(&sub()));
        assert_eq!( 1, DivBy(20, FixedWidth(10)).max_width(&sub()));
    }
    #[test] #[should_panic]
    fn test_div_by_panics_when_div_by_zero() {
        DivBy(0, FixedWidth(0)).max_width(&sub());
    }
}
