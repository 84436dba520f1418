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

//! Golomb rulers: a model whose relaxation merges sets of marks.
mod common;

use bbdd::*;
use common::*;

fn solve(n: usize, nb_threads: Option<usize>) -> Solution {
    let pb = Golomb { n };
    let relax = GolombRelax;
    let ranking = GolombRanking;
    let bound = GolombBound;
    let width = FixedWidth(10);
    let cutoff = NoCutoff;
    let dominance = EmptyDominanceChecker::default();
    let mut frontier = SimpleFrontier::new(MaxUB::new(&ranking), CutsetType::Frontier);

    match nb_threads {
        None => {
            let mut solver = SeqCachingSolver::new(&pb, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier);
            solver.maximize().unwrap()
        }
        Some(nb) => {
            let mut solver = DefaultCachingSolver::new(&pb, &relax, &ranking, &bound, &width, &dominance, &cutoff, &mut frontier)
                .with_nb_threads(nb);
            solver.maximize().unwrap()
        }
    }
}

fn ruler(solution: &Solution) -> Vec<isize> {
    let mut marks = vec![0];
    marks.extend(solution.values.clone().unwrap_or_default());
    marks
}

#[test]
fn golomb_ruler_with_five_marks_has_length_eleven() {
    init_logging();
    let solution = solve(5, None);
    assert_eq!(Some(-11), solution.best_value);
    assert_eq!(SearchStatus::Optimal, solution.statistics.status);

    let marks = ruler(&solution);
    assert_eq!(5, marks.len());
    assert_eq!(Some(&11), marks.last());
    assert!(is_golomb_ruler(&marks));
}

#[test]
fn small_golomb_rulers_have_their_known_length() {
    init_logging();
    for n in 2..=4 {
        let solution = solve(n, None);
        assert_eq!(Some(-GOLOMB_LENGTH[n]), solution.best_value);
        assert!(is_golomb_ruler(&ruler(&solution)));
    }
}

#[test]
fn golomb_ruler_in_parallel() {
    init_logging();
    let solution = solve(5, Some(4));
    assert_eq!(Some(-11), solution.best_value);
    assert_eq!(SearchStatus::Optimal, solution.statistics.status);
    assert!(is_golomb_ruler(&ruler(&solution)));
}
