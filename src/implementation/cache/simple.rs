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

use std::{sync::Arc, hash::Hash};

use dashmap::DashMap;

use crate::{Cache, Threshold, Problem};

/// Simple implementation of Cache using one concurrent hashmap for each layer.
#[derive(Debug)]
pub struct SimpleCache<State>
where State: Hash + Eq {
    thresholds_by_layer: Vec<DashMap<Arc<State>, Threshold, fxhash::FxBuildHasher>>,
}
impl <State> Default for SimpleCache<State>
where State: Hash + Eq {
    fn default() -> Self {
        Self { thresholds_by_layer: vec![] }
    }
}

impl<State> Cache for SimpleCache<State>
where State: Hash + Eq {
    type State = State;

    fn initialize(&mut self, problem: &dyn Problem<State = State>) {
        let nb_variables = problem.nb_variables();
        self.thresholds_by_layer.clear();
        for _ in 0..=nb_variables {
            self.thresholds_by_layer.push(Default::default());
        }
    }

    fn lookup(&self, state: &State, depth: usize) -> Option<Threshold> {
        self.thresholds_by_layer.get(depth)
            .and_then(|layer| layer.get(state).as_deref().copied())
    }

    fn update(&self, state: Arc<State>, depth: usize, value: isize, explored: bool) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.entry(state)
                .and_modify(|e| *e = Threshold { value, explored }.max(*e))
                .or_insert(Threshold { value, explored });
        }
    }

    fn clear_layer(&self, depth: usize) {
        if let Some(layer) = self.thresholds_by_layer.get(depth) {
            layer.clear();
        }
    }

    fn clear(&self) {
        self.thresholds_by_layer.iter().for_each(|l| l.clear());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::*;

    struct ThreeVars;
    impl Problem for ThreeVars {
        type State = char;

        fn nb_variables(&self) -> usize { 3 }
        fn initial_state(&self) -> char { 'r' }
        fn initial_value(&self) -> isize { 0 }
        fn domain<'a>(&self, _: &'a char, _: Variable) -> Domain<'a> { (0..1).into() }
        fn transition(&self, s: &char, _: Decision) -> char { *s }
        fn transition_cost(&self, _: &char, _: Decision) -> isize { 0 }
    }

    fn cache() -> SimpleCache<char> {
        let mut cache = SimpleCache::default();
        cache.initialize(&ThreeVars);
        cache
    }

    fn sub(state: char, value: isize, depth: usize) -> SubProblem<char> {
        SubProblem { state: Arc::new(state), value, ub: isize::MAX, depth, path: vec![] }
    }

    #[test]
    fn lookup_yields_none_for_unknown_states() {
        let cache = cache();
        assert_eq!(None, cache.lookup(&'a', 1));
    }

    #[test]
    fn thresholds_are_scoped_by_depth() {
        let cache = cache();
        cache.update(Arc::new('a'), 1, 5, true);
        assert_eq!(Some(Threshold { value: 5, explored: true }), cache.lookup(&'a', 1));
        assert_eq!(None, cache.lookup(&'a', 2));
    }

    #[test]
    fn update_only_ever_tightens() {
        let cache = cache();
        cache.update(Arc::new('a'), 1, 5, false);
        cache.update(Arc::new('a'), 1, 3, true);
        assert_eq!(Some(Threshold { value: 5, explored: false }), cache.lookup(&'a', 1));

        cache.update(Arc::new('a'), 1, 5, true);
        assert_eq!(Some(Threshold { value: 5, explored: true }), cache.lookup(&'a', 1));

        cache.update(Arc::new('a'), 1, 8, false);
        assert_eq!(Some(Threshold { value: 8, explored: false }), cache.lookup(&'a', 1));
    }

    #[test]
    fn must_explore_depends_on_value_and_exploration() {
        let cache = cache();
        assert!(cache.must_explore(&sub('a', 0, 1)));

        cache.update(Arc::new('a'), 1, 5, false);
        assert!(cache.must_explore(&sub('a', 6, 1)));
        assert!(cache.must_explore(&sub('a', 5, 1)));
        assert!(!cache.must_explore(&sub('a', 4, 1)));

        cache.update(Arc::new('a'), 1, 5, true);
        assert!(!cache.must_explore(&sub('a', 5, 1)));
        assert!(cache.must_explore(&sub('a', 6, 1)));
    }

    #[test]
    fn clear_layer_only_forgets_that_layer() {
        let cache = cache();
        cache.update(Arc::new('a'), 1, 5, true);
        cache.update(Arc::new('a'), 2, 5, true);
        cache.clear_layer(1);
        assert_eq!(None, cache.lookup(&'a', 1));
        assert!(cache.lookup(&'a', 2).is_some());

        cache.clear();
        assert_eq!(None, cache.lookup(&'a', 2));
    }

    #[test]
    fn out_of_range_depths_are_ignored() {
        let cache = cache();
        cache.update(Arc::new('a'), 10, 5, true);
        assert_eq!(None, cache.lookup(&'a', 10));
        cache.clear_layer(10);
    }
}
