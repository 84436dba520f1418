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

//! Small models shared by the integration tests. They are deliberately tiny
//! so that their optimum can be verified by exhaustive enumeration.
#![allow(dead_code)]

use std::sync::{Arc, Once};

use bbdd::*;
use smallbitset::Set256;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Installs a subscriber printing the solver logs (filtered by `RUST_LOG`)
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

// ----------------------------------------------------------------------------
// --- BOUNDED KNAPSACK -------------------------------------------------------
// ----------------------------------------------------------------------------

/// A knapsack where item `i` can be taken up to `quantity[i]` times. The
/// state is the remaining capacity.
#[derive(Debug, Clone)]
pub struct BoundedKnapsack {
    pub capacity: usize,
    pub value: Vec<isize>,
    pub weight: Vec<usize>,
    pub quantity: Vec<usize>,
}

impl BoundedKnapsack {
    pub fn new(capacity: usize, value: Vec<isize>, weight: Vec<usize>, quantity: Vec<usize>) -> Self {
        BoundedKnapsack { capacity, value, weight, quantity }
    }
    /// Finds the optimum by enumerating every assignment
    pub fn brute_force(&self) -> isize {
        fn explore(pb: &BoundedKnapsack, item: usize, capa: usize, acc: isize) -> isize {
            if item == pb.value.len() {
                return acc;
            }
            let mut best = isize::MIN;
            for q in 0..=pb.quantity[item] {
                let w = q * pb.weight[item];
                if w > capa {
                    break;
                }
                best = best.max(explore(pb, item + 1, capa - w, acc + q as isize * pb.value[item]));
            }
            best
        }
        explore(self, 0, self.capacity, 0)
    }
}

impl Problem for BoundedKnapsack {
    type State = usize;

    fn nb_variables(&self) -> usize {
        self.value.len()
    }
    fn initial_state(&self) -> usize {
        self.capacity
    }
    fn initial_value(&self) -> isize {
        0
    }
    fn domain<'a>(&self, state: &'a usize, var: Variable) -> Domain<'a> {
        let i = var.id();
        let most = self.quantity[i].min(state / self.weight[i]);
        (0..=most as isize).into()
    }
    fn transition(&self, state: &usize, d: Decision) -> usize {
        state - self.weight[d.variable.id()] * d.value as usize
    }
    fn transition_cost(&self, _: &usize, d: Decision) -> isize {
        self.value[d.variable.id()] * d.value
    }
}

pub struct BoundedKnapsackRelax;
impl Relaxation for BoundedKnapsackRelax {
    type State = usize;

    fn merge(&self, states: &mut dyn Iterator<Item = &usize>) -> usize {
        states.copied().max().unwrap_or(0)
    }
    fn relax(&self, _: &usize, _: &usize, _: &usize, _: Decision, cost: isize) -> isize {
        cost
    }
}

pub struct BoundedKnapsackRanking;
impl StateRanking for BoundedKnapsackRanking {
    type State = usize;

    fn compare(&self, a: &usize, b: &usize) -> std::cmp::Ordering {
        a.cmp(b)
    }
}

/// Takes every free item as many times as it could fit on its own
pub struct BoundedKnapsackBound<'a>(pub &'a BoundedKnapsack);
impl BoundHeuristic for BoundedKnapsackBound<'_> {
    type State = usize;

    fn estimate(&self, state: &usize, free: &VarSet) -> isize {
        let pb = self.0;
        free.iter()
            .map(|v| v.id())
            .map(|i| pb.value[i] * pb.quantity[i].min(state / pb.weight[i]) as isize)
            .sum()
    }
}

/// A larger remaining capacity is always at least as good
pub struct BoundedKnapsackDominance;
impl Dominance for BoundedKnapsackDominance {
    type State = usize;
    type Key = usize;

    fn get_key(&self, _: Arc<usize>) -> Option<usize> {
        Some(0)
    }
    fn is_dominated_or_equal(&self, a: &usize, b: &usize) -> bool {
        a <= b
    }
}

/// Two capacities are as far apart as their difference
pub struct CapacityDistance;
impl StateDistance for CapacityDistance {
    type State = usize;

    fn distance(&self, a: &usize, b: &usize) -> f64 {
        (*a as f64 - *b as f64).abs()
    }
}

/// The bounded knapsack used throughout the tests
pub fn small_bounded_knapsack() -> BoundedKnapsack {
    BoundedKnapsack::new(15, vec![2, 3, 6, 6, 1], vec![4, 6, 4, 2, 5], vec![1, 1, 2, 2, 1])
}

/// A handful of deterministic instances with various shapes
pub fn bounded_knapsack_instances() -> Vec<BoundedKnapsack> {
    vec![
        small_bounded_knapsack(),
        BoundedKnapsack::new(10, vec![5, 4, 3], vec![4, 3, 2], vec![2, 1, 3]),
        BoundedKnapsack::new(0, vec![5, 4, 3], vec![4, 3, 2], vec![2, 1, 3]),
        BoundedKnapsack::new(23, vec![7, 1, 9, 4, 3, 8], vec![5, 1, 8, 3, 2, 6], vec![2, 3, 1, 2, 2, 1]),
        BoundedKnapsack::new(17, vec![3, 3, 3, 3, 3, 3, 3], vec![2, 3, 4, 5, 6, 7, 8], vec![1, 2, 1, 2, 1, 2, 1]),
    ]
}

// ----------------------------------------------------------------------------
// --- GOLOMB RULER -----------------------------------------------------------
// ----------------------------------------------------------------------------

/// Length of the optimal Golomb rulers with 0..=13 marks
pub const GOLOMB_LENGTH: [isize; 14] = [0, 0, 1, 3, 6, 11, 17, 25, 34, 44, 55, 72, 85, 106];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GolombState {
    pub marks: Set256,
    pub distances: Set256,
    pub last_mark: isize,
}

/// Places `n` marks on a ruler such that all pairwise distances differ.
/// The first mark sits at 0 and variable `i` is the position of mark `i+1`;
/// the objective is the negated length of the ruler.
pub struct Golomb {
    pub n: usize,
}

impl Problem for Golomb {
    type State = GolombState;

    fn nb_variables(&self) -> usize {
        self.n.saturating_sub(1)
    }
    fn initial_state(&self) -> GolombState {
        GolombState { marks: Set256::singleton(0), distances: Set256::empty(), last_mark: 0 }
    }
    fn initial_value(&self) -> isize {
        0
    }
    fn domain<'a>(&self, state: &'a GolombState, _: Variable) -> Domain<'a> {
        let limit = (self.n * self.n) as isize;
        let values = (state.last_mark + 1..limit)
            .filter(|&pos| state.marks.iter().all(|m| !state.distances.contains(pos as usize - m)))
            .collect::<Vec<isize>>();
        values.into()
    }
    fn transition(&self, state: &GolombState, d: Decision) -> GolombState {
        let mut next = *state;
        let pos = d.value as usize;
        for m in state.marks.iter() {
            next.distances.add_inplace(pos - m);
        }
        next.marks.add_inplace(pos);
        next.last_mark = d.value;
        next
    }
    fn transition_cost(&self, state: &GolombState, d: Decision) -> isize {
        -(d.value - state.last_mark)
    }
}

/// Keeps the marks and distances common to all merged states
pub struct GolombRelax;
impl Relaxation for GolombRelax {
    type State = GolombState;

    fn merge(&self, states: &mut dyn Iterator<Item = &GolombState>) -> GolombState {
        let mut marks = Set256::full();
        let mut distances = Set256::full();
        let mut last_mark = isize::MAX;
        for s in states {
            marks.inter_inplace(&s.marks);
            distances.inter_inplace(&s.distances);
            last_mark = last_mark.min(s.last_mark);
        }
        GolombState { marks, distances, last_mark }
    }
    fn relax(&self, _: &GolombState, _: &GolombState, _: &GolombState, _: Decision, cost: isize) -> isize {
        cost
    }
}

pub struct GolombRanking;
impl StateRanking for GolombRanking {
    type State = GolombState;

    fn compare(&self, a: &GolombState, b: &GolombState) -> std::cmp::Ordering {
        b.last_mark.cmp(&a.last_mark)
    }
}

/// Placing `k` more marks needs at least the length of an optimal ruler
/// with `k+1` marks
pub struct GolombBound;
impl BoundHeuristic for GolombBound {
    type State = GolombState;

    fn estimate(&self, _: &GolombState, free: &VarSet) -> isize {
        -GOLOMB_LENGTH[free.len() + 1]
    }
}

/// Checks that the marks form a valid Golomb ruler
pub fn is_golomb_ruler(marks: &[isize]) -> bool {
    let mut seen = std::collections::HashSet::new();
    for (i, a) in marks.iter().enumerate() {
        for b in &marks[i + 1..] {
            if !seen.insert((b - a).abs()) {
                return false;
            }
        }
    }
    true
}
