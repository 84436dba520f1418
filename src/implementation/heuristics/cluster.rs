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

//! This module provides the reduction strategies shipped with the library.
//! They decide how the nodes of an oversized layer are grouped before the
//! layer gets relaxed or restricted.

use binary_heap_plus::BinaryHeap;

use crate::{LayerNode, ReductionStrategy, StateDistance, StateRanking};

/// Number of times the pivots of a split are moved to the farthest node
const PIVOT_ROUNDS: usize = 5;

/// Returns the indices of `layer` from the most to the least promising node:
/// longest path first, then best state according to `ranking`.
fn by_promise<S, O>(ranking: &O, layer: &[LayerNode<S>]) -> Vec<usize>
where
    O: StateRanking<State = S> + ?Sized,
{
    let mut order = (0..layer.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| {
        layer[*a].value.cmp(&layer[*b].value)
            .then_with(|| ranking.compare(layer[*a].state, layer[*b].state))
            .reverse()
    });
    order
}

fn singletons(n: usize) -> Vec<Vec<usize>> {
    (0..n).map(|i| vec![i]).collect()
}

/// The cost based strategy keeps the `max_width - 1` most promising nodes
/// alone and puts all the others in one last cluster. This is the classic
/// width reduction: in a relaxed dd the least promising nodes are merged,
/// in a restricted dd they are simply dropped.
///
/// # Example
/// ```
/// # use bbdd::*;
/// struct ByValue;
/// impl StateRanking for ByValue {
///     type State = char;
///     fn compare(&self, a: &char, b: &char) -> std::cmp::Ordering { a.cmp(b) }
/// }
///
/// let layer = vec![
///     LayerNode { state: &'a', value: 4 },
///     LayerNode { state: &'b', value: 9 },
///     LayerNode { state: &'c', value: 1 },
///     LayerNode { state: &'d', value: 4 },
/// ];
/// let clusters = CostBased::new(&ByValue).define_clusters(&layer, 3);
/// assert_eq!(clusters, vec![vec![1], vec![3], vec![0, 2]]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostBased<'a, O: StateRanking + ?Sized> {
    ranking: &'a O,
}
impl<'a, O: StateRanking + ?Sized> CostBased<'a, O> {
    pub const fn new(ranking: &'a O) -> Self {
        Self { ranking }
    }
}
impl<O: StateRanking + ?Sized> ReductionStrategy for CostBased<'_, O> {
    type State = O::State;

    fn define_clusters(&self, layer: &[LayerNode<O::State>], max_width: usize) -> Vec<Vec<usize>> {
        let width = max_width.max(1);
        if layer.len() <= width {
            return singletons(layer.len());
        }
        let order = by_promise(self.ranking, layer);
        let (keep, rest) = order.split_at(width - 1);

        let mut clusters = keep.iter().map(|i| vec![*i]).collect::<Vec<_>>();
        clusters.push(rest.to_vec());
        clusters
    }
}

/// One cluster of the generalized hyperplane partitioning
#[derive(Debug)]
struct Cluster {
    /// Largest distance between a member and the pivot of the cluster
    spread: f64,
    members: Vec<usize>,
}

/// Generalized hyperplane partitioning. Starting from the whole layer, the
/// cluster having the largest spread is repeatedly split in two around a pair
/// of distant pivots: every member joins the pivot it is closest to. This
/// stops as soon as there are `max_width` clusters.
///
/// The pivots are chosen deterministically (first member, then farthest
/// members), so two compilations of the same layer produce the same clusters.
#[derive(Debug, Clone, Copy)]
pub struct Ghp<'a, D: StateDistance + ?Sized> {
    distance: &'a D,
}
impl<'a, D: StateDistance + ?Sized> Ghp<'a, D> {
    pub const fn new(distance: &'a D) -> Self {
        Self { distance }
    }

    fn dist(&self, layer: &[LayerNode<D::State>], a: usize, b: usize) -> f64 {
        self.distance.distance(layer[a].state, layer[b].state)
    }

    fn farthest(&self, layer: &[LayerNode<D::State>], from: usize, members: &[usize]) -> usize {
        members.iter().copied()
            .filter(|m| *m != from)
            .max_by(|a, b| self.dist(layer, from, *a).total_cmp(&self.dist(layer, from, *b)))
            .unwrap_or(from)
    }

    fn split(&self, layer: &[LayerNode<D::State>], members: Vec<usize>) -> (Cluster, Cluster) {
        let mut pivot_a = members[0];
        let mut pivot_b = self.farthest(layer, pivot_a, &members);
        for _ in 0..PIVOT_ROUNDS {
            pivot_a = self.farthest(layer, pivot_b, &members);
            pivot_b = self.farthest(layer, pivot_a, &members);
        }

        let mut a = Cluster { spread: 0.0, members: vec![pivot_a] };
        let mut b = Cluster { spread: 0.0, members: vec![pivot_b] };
        for m in members {
            if m == pivot_a || m == pivot_b {
                continue;
            }
            let dist_a = self.dist(layer, m, pivot_a);
            let dist_b = self.dist(layer, m, pivot_b);
            if dist_a < dist_b {
                a.spread = a.spread.max(dist_a);
                a.members.push(m);
            } else {
                b.spread = b.spread.max(dist_b);
                b.members.push(m);
            }
        }
        (a, b)
    }
}
impl<D: StateDistance + ?Sized> ReductionStrategy for Ghp<'_, D> {
    type State = D::State;

    fn define_clusters(&self, layer: &[LayerNode<D::State>], max_width: usize) -> Vec<Vec<usize>> {
        let width = max_width.max(1);
        if layer.len() <= width {
            return singletons(layer.len());
        }

        let mut heap = BinaryHeap::new_by(|x: &Cluster, y: &Cluster|
            x.spread.total_cmp(&y.spread).then_with(|| x.members.len().cmp(&y.members.len())));
        heap.push(Cluster { spread: 0.0, members: (0..layer.len()).collect() });

        while heap.len() < width {
            let Some(widest) = heap.pop() else { break };
            if widest.members.len() < 2 {
                heap.push(widest);
                break;
            }
            let (a, b) = self.split(layer, widest.members);
            heap.push(a);
            heap.push(b);
        }

        let mut clusters = heap.into_vec().into_iter()
            .map(|mut c| { c.members.sort_unstable(); c.members })
            .collect::<Vec<_>>();
        clusters.sort_unstable_by_key(|c| c[0]);
        clusters
    }
}

/// A mix of the two strategies above: the `ceil(alpha * max_width)` most
/// promising nodes are kept alone (but never all `max_width` of them), the
/// remaining nodes are grouped by distance in the clusters that are left.
#[derive(Debug, Clone, Copy)]
pub struct Hybrid<'a, O, D>
where
    O: StateRanking + ?Sized,
    D: StateDistance<State = O::State> + ?Sized,
{
    ranking: &'a O,
    ghp: Ghp<'a, D>,
    alpha: f64,
}
impl<'a, O, D> Hybrid<'a, O, D>
where
    O: StateRanking + ?Sized,
    D: StateDistance<State = O::State> + ?Sized,
{
    /// `alpha` is the share of the width given to the most promising nodes.
    /// It is clamped to `0.0..=1.0`.
    pub fn new(ranking: &'a O, distance: &'a D, alpha: f64) -> Self {
        Self { ranking, ghp: Ghp::new(distance), alpha: alpha.clamp(0.0, 1.0) }
    }
}
impl<O, D> ReductionStrategy for Hybrid<'_, O, D>
where
    O: StateRanking + ?Sized,
    D: StateDistance<State = O::State> + ?Sized,
{
    type State = O::State;

    fn define_clusters(&self, layer: &[LayerNode<O::State>], max_width: usize) -> Vec<Vec<usize>> {
        let width = max_width.max(1);
        if layer.len() <= width {
            return singletons(layer.len());
        }
        let preserved = ((width as f64 * self.alpha).ceil() as usize).min(width - 1);
        let order = by_promise(self.ranking, layer);
        let (keep, rest) = order.split_at(preserved);

        let sublayer = rest.iter().map(|i| layer[*i]).collect::<Vec<_>>();
        let mut clusters = keep.iter().map(|i| vec![*i]).collect::<Vec<_>>();
        for cluster in self.ghp.define_clusters(&sublayer, width - preserved) {
            let mut cluster = cluster.into_iter().map(|j| rest[j]).collect::<Vec<_>>();
            cluster.sort_unstable();
            clusters.push(cluster);
        }
        clusters.sort_unstable_by_key(|c| c.iter().min().copied());
        clusters
    }
}

#[cfg(test)]
mod test_cluster {
    use std::cmp::Ordering;

    use crate::*;

    struct Natural;
    impl StateRanking for Natural {
        type State = isize;
        fn compare(&self, a: &isize, b: &isize) -> Ordering {
            a.cmp(b)
        }
    }
    struct OnALine;
    impl StateDistance for OnALine {
        type State = isize;
        fn distance(&self, a: &isize, b: &isize) -> f64 {
            (a - b).abs() as f64
        }
    }

    fn layer<'a>(states: &'a [isize], values: &[isize]) -> Vec<LayerNode<'a, isize>> {
        states.iter().zip(values.iter()).map(|(s, v)| LayerNode { state: s, value: *v }).collect()
    }

    /// Every node belongs to exactly one cluster and no cluster is empty
    fn assert_partition(clusters: &[Vec<usize>], n: usize, max_width: usize) {
        assert!(clusters.len() <= max_width.max(1));
        assert!(clusters.iter().all(|c| !c.is_empty()));
        let mut all = clusters.iter().flatten().copied().collect::<Vec<_>>();
        all.sort_unstable();
        assert_eq!(all, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn a_layer_that_fits_is_left_untouched() {
        let states = [3, 1, 2];
        let nodes = layer(&states, &[0, 0, 0]);
        let expected = vec![vec![0], vec![1], vec![2]];
        assert_eq!(expected, CostBased::new(&Natural).define_clusters(&nodes, 3));
        assert_eq!(expected, Ghp::new(&OnALine).define_clusters(&nodes, 5));
        assert_eq!(expected, Hybrid::new(&Natural, &OnALine, 0.5).define_clusters(&nodes, 3));
    }

    #[test]
    fn cost_based_keeps_the_longest_paths_alone() {
        let states = [10, 20, 30, 40, 50];
        let nodes = layer(&states, &[7, 1, 9, 3, 7]);
        let clusters = CostBased::new(&Natural).define_clusters(&nodes, 3);
        // 9 first, then the two nodes of value 7 ordered by state
        assert_eq!(vec![vec![2], vec![4], vec![0, 3, 1]], clusters);
    }

    #[test]
    fn cost_based_with_a_null_width_makes_one_cluster() {
        let states = [10, 20, 30];
        let nodes = layer(&states, &[1, 2, 3]);
        let clusters = CostBased::new(&Natural).define_clusters(&nodes, 0);
        assert_eq!(vec![vec![2, 1, 0]], clusters);
    }

    #[test]
    fn ghp_groups_the_close_states() {
        let states = [0, 1, 2, 100, 101, 200];
        let nodes = layer(&states, &[0; 6]);
        let ghp = Ghp::new(&OnALine);

        assert_eq!(vec![vec![0, 1, 2], vec![3, 4], vec![5]], ghp.define_clusters(&nodes, 3));
        assert_eq!(vec![vec![0, 1, 2], vec![3, 4, 5]], ghp.define_clusters(&nodes, 2));
        assert_eq!(vec![vec![0, 1, 2, 3, 4, 5]], ghp.define_clusters(&nodes, 1));
    }

    #[test]
    fn ghp_copes_with_states_at_distance_zero() {
        let states = [5, 6, 7, 8];
        let nodes = layer(&states, &[0; 4]);
        struct Blind;
        impl StateDistance for Blind {
            type State = isize;
            fn distance(&self, _: &isize, _: &isize) -> f64 {
                0.0
            }
        }
        for w in 1..=4 {
            let clusters = Ghp::new(&Blind).define_clusters(&nodes, w);
            assert_partition(&clusters, 4, w);
            assert_eq!(w, clusters.len());
        }
    }

    #[test]
    fn ghp_always_partitions_the_layer() {
        let states = (0..17).map(|i| (i * 37) % 23).collect::<Vec<isize>>();
        let nodes = layer(&states, &[0; 17]);
        for w in 1..=17 {
            let clusters = Ghp::new(&OnALine).define_clusters(&nodes, w);
            assert_partition(&clusters, 17, w);
            assert_eq!(w, clusters.len());
        }
    }

    #[test]
    fn hybrid_keeps_the_best_nodes_and_clusters_the_rest() {
        let states = [0, 1, 2, 100, 101, 200];
        let nodes = layer(&states, &[10, 1, 1, 1, 1, 20]);
        let clusters = Hybrid::new(&Natural, &OnALine, 0.5).define_clusters(&nodes, 4);
        assert_eq!(vec![vec![0], vec![1, 2], vec![3, 4], vec![5]], clusters);
    }

    #[test]
    fn hybrid_never_preserves_the_whole_width() {
        let states = [0, 1, 2, 100, 101, 200];
        let nodes = layer(&states, &[0, 1, 2, 3, 4, 5]);
        let clusters = Hybrid::new(&Natural, &OnALine, 1.0).define_clusters(&nodes, 3);
        assert_partition(&clusters, 6, 3);
        assert!(clusters.contains(&vec![5]));
        assert!(clusters.contains(&vec![4]));
        assert!(clusters.contains(&vec![0, 1, 2, 3]));
    }
}
