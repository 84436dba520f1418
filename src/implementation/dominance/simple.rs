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

use std::{hash::Hash, sync::{Arc, atomic::{AtomicU64, Ordering}}};
use dashmap::{DashMap, mapref::entry::Entry};

use crate::{Dominance, DominanceChecker, DominanceCheckResult};

/// One (state, value) pair of a dominance front
#[derive(Debug)]
struct DominanceEntry<T> {
    state: Arc<T>,
    value: isize,
    /// Insertion order; makes the order of a front total
    id: u64,
}

/// Simple implementation of a dominance checker. For each depth, it stores
/// a vector of non-dominated entries per distinct key. The vectors are kept
/// sorted by decreasing value (and then by insertion order), which means that
/// the entries most likely to dominate a new state are looked at first.
///
/// Fronts are held in concurrent maps so one checker can be shared by all the
/// workers of a parallel solver.
#[derive(Debug)]
pub struct SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    dominance: D,
    fronts: Vec<DashMap<D::Key, Vec<DominanceEntry<D::State>>, fxhash::FxBuildHasher>>,
    next_id: AtomicU64,
}

impl<D> SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    /// Creates a checker able to handle states up to depth `nb_variables`
    pub fn new(dominance: D, nb_variables: usize) -> Self {
        let mut fronts = vec![];
        for _ in 0..=nb_variables {
            fronts.push(Default::default());
        }
        Self { dominance, fronts, next_id: AtomicU64::new(0) }
    }

    /// Returns the number of entries stored at the given depth
    pub fn front_size(&self, depth: usize) -> usize {
        self.fronts.get(depth)
            .map(|front| front.iter().map(|e| e.value().len()).sum())
            .unwrap_or(0)
    }

    fn not_dominated() -> DominanceCheckResult {
        DominanceCheckResult { dominated: false, threshold: None }
    }
}

impl<D> DominanceChecker for SimpleDominanceChecker<D>
where
    D: Dominance,
    D::Key: Eq + Hash,
{
    type State = D::State;

    fn update_dominance(&self, state: Arc<Self::State>, depth: usize, value: isize) -> DominanceCheckResult {
        let Some(front) = self.fronts.get(depth) else {
            return Self::not_dominated();
        };
        let Some(key) = self.dominance.get_key(state.clone()) else {
            return Self::not_dominated();
        };

        match front.entry(key) {
            Entry::Occupied(mut e) => {
                let entries = e.get_mut();

                let mut threshold: Option<isize> = None;
                for other in entries.iter() {
                    if !self.dominance.is_dominated_or_equal(state.as_ref(), other.state.as_ref()) {
                        continue;
                    }
                    let equivalent = self.dominance.is_dominated_or_equal(other.state.as_ref(), state.as_ref());
                    if other.value > value || (other.value == value && !equivalent) {
                        let bound = if equivalent { other.value - 1 } else { other.value };
                        threshold = Some(threshold.map_or(bound, |t| t.max(bound)));
                    }
                }
                if threshold.is_some() {
                    return DominanceCheckResult { dominated: true, threshold };
                }

                entries.retain(|other|
                    !(value >= other.value && self.dominance.is_dominated_or_equal(other.state.as_ref(), state.as_ref())));

                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let pos = entries.partition_point(|other| other.value > value || (other.value == value && other.id < id));
                entries.insert(pos, DominanceEntry { state, value, id });
                Self::not_dominated()
            },
            Entry::Vacant(e) => {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                e.insert(vec![DominanceEntry { state, value, id }]);
                Self::not_dominated()
            },
        }
    }

    fn check_reflexive(&self, state: &Self::State) -> bool {
        self.dominance.is_dominated_or_equal(state, state)
    }

    fn clear(&self) {
        for front in self.fronts.iter() {
            front.clear();
        }
        self.next_id.store(0, Ordering::Relaxed);
    }
}
