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

//! This module provides the implementation of various cutoff heuristics that can
//! be used to tune the behavior of a solver. They are all polled with the
//! statistics of the running search.

use std::time::Duration;

use crate::{Cutoff, SearchStatistics};

/// _This is the default cutoff heuristic._ It imposes that the search goes
/// proves optimality before to stop.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self, _: &SearchStatistics) -> bool {
        false
    }
}

/// This cutoff allows one to specify a maximum time budget to solve the problem.
/// Once the time budget is elapsed, the optimization stops and the best solution
/// that has been found (so far) is returned.
///
/// # Example
/// ```
/// # use bbdd::*;
/// use std::time::Duration;
///
/// let cutoff = TimeBudget::new(Duration::from_secs(10));
/// // solving with this cutoff will run for at most (about) 10 seconds
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TimeBudget {
    budget: Duration,
}
impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        TimeBudget { budget }
    }
}
impl Cutoff for TimeBudget {
    fn must_stop(&self, stats: &SearchStatistics) -> bool {
        u128::from(stats.runtime_ms) >= self.budget.as_millis()
    }
}

/// Stops the search once the given number of subproblems has been developed.
#[derive(Debug, Clone, Copy)]
pub struct IterationBudget(pub usize);
impl Cutoff for IterationBudget {
    fn must_stop(&self, stats: &SearchStatistics) -> bool {
        stats.iterations >= self.0
    }
}

/// Stops the search as soon as an incumbent is known whose relative gap to
/// the best bound is no larger than the given value.
#[derive(Debug, Clone, Copy)]
pub struct GapBudget(pub f64);
impl Cutoff for GapBudget {
    fn must_stop(&self, stats: &SearchStatistics) -> bool {
        stats.incumbent.is_some() && stats.gap <= self.0
    }
}
