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

//! End to end resolution of bounded knapsack instances.
mod common;

use bbdd::*;
use common::*;

fn solve(pb: &BoundedKnapsack, w: usize, cutset: CutsetType, with_dominance: bool) -> Solution {
    let relax = BoundedKnapsackRelax;
    let ranking = BoundedKnapsackRanking;
    let bound = BoundedKnapsackBound(pb);
    let width = FixedWidth(w);
    let cutoff = NoCutoff;
    let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), cutset);

    if with_dominance {
        let dominance = SimpleDominanceChecker::new(BoundedKnapsackDominance, pb.nb_variables());
        let mut solver = SeqCachingSolver::new(pb, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
        solver.maximize().unwrap()
    } else {
        let dominance = EmptyDominanceChecker::default();
        let mut solver = SeqSolver::new(pb, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
        solver.maximize().unwrap()
    }
}

#[test]
fn bounded_knapsack_reaches_the_enumerated_optimum() {
    init_logging();
    let pb = small_bounded_knapsack();
    // items 2 and 3 twice each fill 12 units of the 15 available
    assert_eq!(24, pb.brute_force());

    let solution = solve(&pb, 3, CutsetType::Frontier, true);
    assert_eq!(Some(24), solution.best_value);
    assert_eq!(SearchStatus::Optimal, solution.statistics.status);
    assert_eq!(0.0, solution.statistics.gap);
}

#[test]
fn the_solution_values_are_a_feasible_assignment_worth_the_optimum() {
    init_logging();
    let pb = small_bounded_knapsack();
    let values = solve(&pb, 2, CutsetType::LastExactLayer, false).values.unwrap();

    assert_eq!(pb.nb_variables(), values.len());
    let weight: usize = values.iter().zip(pb.weight.iter()).map(|(x, w)| *x as usize * w).sum();
    let value: isize = values.iter().zip(pb.value.iter()).map(|(x, v)| x * v).sum();
    assert!(weight <= pb.capacity);
    assert!(values.iter().zip(pb.quantity.iter()).all(|(x, q)| *x as usize <= *q));
    assert_eq!(24, value);
}

#[test]
fn every_configuration_finds_the_optimum() {
    init_logging();
    for pb in bounded_knapsack_instances() {
        let expected = pb.brute_force();
        for w in 1..5 {
            for cutset in [CutsetType::LastExactLayer, CutsetType::Frontier] {
                for dominance in [false, true] {
                    let solution = solve(&pb, w, cutset, dominance);
                    assert_eq!(Some(expected), solution.best_value, "w={w} {cutset:?} dominance={dominance}");
                    assert_eq!(SearchStatus::Optimal, solution.statistics.status);
                }
            }
        }
    }
}

#[test]
fn a_time_budget_still_reports_a_consistent_outcome() {
    init_logging();
    let pb = small_bounded_knapsack();
    let relax = BoundedKnapsackRelax;
    let ranking = BoundedKnapsackRanking;
    let bound = BoundedKnapsackBound(&pb);
    let width = FixedWidth(1);
    let cutoff = TimeBudget::new(std::time::Duration::from_secs(10));
    let dominance = EmptyDominanceChecker::default();
    let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
    let mut solver = SeqSolver::new(&pb, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);

    let solution = solver.maximize().unwrap();
    match solution.statistics.status {
        SearchStatus::Optimal => assert_eq!(Some(24), solution.best_value),
        SearchStatus::Suboptimal => assert!(solution.statistics.gap > 0.0),
        status => panic!("unexpected status {status:?}"),
    }
}

#[test]
fn scaled_width_heuristics_find_the_optimum() {
    init_logging();
    for pb in bounded_knapsack_instances() {
        let expected = pb.brute_force();
        let relax = BoundedKnapsackRelax;
        let ranking = BoundedKnapsackRanking;
        let bound = BoundedKnapsackBound(&pb);
        let cutoff = NoCutoff;
        let dominance = EmptyDominanceChecker::default();

        // twice the number of free variables
        let wider = Times(2, NbUnassignedWidth(pb.nb_variables()));
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::LastExactLayer);
        let solution = SeqSolver::new(&pb, &relax, &ranking, &bound, &wider, &dominance, &cutoff, &mut frontier)
            .maximize()
            .unwrap();
        assert_eq!(Some(expected), solution.best_value);
        assert_eq!(SearchStatus::Optimal, solution.statistics.status);

        // a third of a fixed width, never less than one
        let narrower = DivBy(3, FixedWidth(4));
        let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::Frontier);
        let solution = SeqSolver::new(&pb, &relax, &ranking, &bound, &narrower, &dominance, &cutoff, &mut frontier)
            .maximize()
            .unwrap();
        assert_eq!(Some(expected), solution.best_value);
        assert_eq!(SearchStatus::Optimal, solution.statistics.status);
    }
}

#[test]
fn scaled_width_heuristics_compute_the_expected_width() {
    let node = SubProblem { state: std::sync::Arc::new(7_usize), value: 0, path: vec![], ub: isize::MAX, depth: 0 };
    assert_eq!(10, Times(2, FixedWidth(5)).max_width(&node));
    assert_eq!(1, Times(0, FixedWidth(5)).max_width(&node));
    assert_eq!(2, DivBy(2, FixedWidth(5)).max_width(&node));
    assert_eq!(1, DivBy(10, FixedWidth(5)).max_width(&node));
}
