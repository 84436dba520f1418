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

//! This is the layered, arena based decision diagram. It implements all the
//! pruning techniques that are used by the branch-and-bound: rough upper bounds
//! (RUB), local bounds (LocB), exact best path (EBPO), plus the caching of
//! thresholds and the filtering of dominated states.

use std::{sync::Arc, hash::Hash, collections::hash_map::Entry, fmt::Debug, cmp::Ordering};

use fxhash::FxHashMap;
use tracing::{error, trace};

use crate::{NodeFlags, Decision, CutsetType, CompilationInput, Completion, CompilationType, DecisionDiagram,
    SubProblem, VarSet, DebugLevel, DominanceCheckResult, EmptyCache, EmptyDominanceChecker, Error, LayerNode};

/// Position of a node in `Mdd::nodes`
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
struct NodeId(usize);

/// Position of an edge in `Mdd::edges`
#[derive(Debug, Clone, Copy)]
struct EdgeId(usize);

/// Position of a cons cell in `Mdd::edgelists`
#[derive(Debug, Clone, Copy)]
struct EdgesListId(usize);

/// Position of a layer in `Mdd::layers`
#[derive(Debug, Clone, Copy)]
struct LayerId(usize);

#[derive(Debug, Clone)]
struct Node<T> {
    state: Arc<T>,
    /// Longest path from the problem root
    value_top: isize,
    /// Longest path to the terminal node (filled once all layers are built)
    value_bot: isize,
    /// Last edge of the longest path from the root
    best: Option<EdgeId>,
    /// Head of the inbound edges list
    inbound: EdgesListId,
    /// Rough upper bound: value_top plus the bound estimate
    rub: isize,
    /// Largest value at which this state would not be worth re-exploring
    /// (filled once all layers are built)
    theta: Option<isize>,
    /// Exact / relaxed / above-cutset / reachable-from-terminal / pruned
    flags: NodeFlags,
    /// Number of decisions taken since the problem root
    depth: usize,
}

/// An arc of the diagram, labeled with the decision it stands for and the
/// cost of that decision from the source state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    from: NodeId,
    to: NodeId,
    decision: Decision,
    cost: isize,
}

/// Inbound edges are kept as persistent cons lists sharing their tails
#[derive(Debug, Clone, Copy)]
enum EdgesList {
    Cons {head: EdgeId, tail: EdgesListId},
    Nil
}

/// The nodes of one layer occupy the range `from..to` of `Mdd::nodes`
#[derive(Debug, Clone, Copy)]
struct Layer {
    from: usize,
    to: usize,
}

/// A layered decision diagram stored in flat vectors: nodes, edges and
/// inbound edge lists are addressed by index, so a compilation allocates
/// nothing once the vectors have grown to their working size.
///
/// What is extracted from a compilation depends on its type:
/// - Exact: the optimum of the subproblem and its solution
/// - Restricted: a feasible solution (a lower bound)
/// - Relaxed: an upper bound, plus the exact cut-set (last exact layer or
///   frontier, as asked by the `CompilationInput`) to branch on
///
/// The same instance is meant to be reused across compilations: each call to
/// `compile` starts by clearing the previous diagram.
#[derive(Debug, Clone)]
pub struct Mdd<T> {
    layers: Vec<Layer>,
    nodes: Vec<Node<T>>,
    edges: Vec<Edge>,
    edgelists: Vec<EdgesList>,

    /// The layer under construction, indexed by state so that two transitions
    /// reaching the same state share a node
    next_l: FxHashMap<Arc<T>, NodeId>,
    /// The variables that have not been assigned yet
    free: VarSet,

    /// Decisions leading from the problem root to the root of this DD
    path_to_root: Vec<Decision>,
    /// Last exact layer (inexact DDs only)
    lel: Option<LayerId>,
    /// Nodes of the exact cut-set (relaxed DDs only)
    cutset: Vec<NodeId>,
    /// Best terminal node, None when no r-t path survived
    best_node: Option<NodeId>,
    /// Best terminal node reached by an exact path
    best_exact_node: Option<NodeId>,
    /// No layer was restricted or relaxed
    is_exact: bool,
    /// The longest r-t path traverses no merged node
    has_exact_best_path: bool,
}

const NIL: EdgesListId = EdgesListId(0);

/// Borrows an element of the dd by id
macro_rules! get {
    (    node     $id:expr, $dd:expr) => {&    $dd.nodes   [$id.0]};
    (mut node     $id:expr, $dd:expr) => {&mut $dd.nodes   [$id.0]};
    (    edge     $id:expr, $dd:expr) => {&    $dd.edges   [$id.0]};
    (    edgelist $id:expr, $dd:expr) => {&    $dd.edgelists[$id.0]};
}

/// Runs `$action` on each inbound edge of a node
macro_rules! foreach {
    (edge of $id:expr, $dd:expr, $action:expr) => {
        let mut list = get!(node $id, $dd).inbound;
        while let EdgesList::Cons{head, tail} = *get!(edgelist list, $dd) {
            let edge = *get!(edge head, $dd);
            $action(edge);
            list = tail;
        }
    };
}

/// Records an edge and relaxes the longest path to its destination
macro_rules! append_edge_to {
    ($dd:expr, $edge:expr) => {
        let edge: Edge = $edge;
        let new_eid = EdgeId($dd.edges.len());
        let lst_id  = EdgesListId($dd.edgelists.len());
        $dd.edges.push(edge);
        $dd.edgelists.push(EdgesList::Cons { head: new_eid, tail: get!(node edge.to, $dd).inbound });

        let parent = get!(node edge.from, $dd);
        let parent_exact = parent.flags.is_exact();
        let value = parent.value_top.saturating_add(edge.cost);

        let node = get!(mut node edge.to, $dd);
        let exact = parent_exact & node.flags.is_exact();
        node.flags.set_exact(exact);
        node.inbound = lst_id;

        if value >= node.value_top {
            node.best = Some(new_eid);
            node.value_top = value;
        }
    };
}

impl<T> Default for Mdd<T>
where
    T: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DecisionDiagram for Mdd<T>
where
    T: Eq + Hash + Clone + Debug,
{
    type State = T;

    fn compile(&mut self, input: &CompilationInput<Self::State>) -> Result<Completion, Error> {
        self._compile(input)
    }

    fn is_exact(&self) -> bool {
        self.is_exact || self.has_exact_best_path
    }

    fn best_value(&self) -> Option<isize> {
        self.best_node.map(|id| get!(node id, self).value_top)
    }

    fn best_solution(&self) -> Option<Vec<Decision>> {
        self.best_node.map(|id| self._best_path(id))
    }

    fn best_exact_value(&self) -> Option<isize> {
        self.best_exact_node.map(|id| get!(node id, self).value_top)
    }

    fn best_exact_solution(&self) -> Option<Vec<Decision>> {
        self.best_exact_node.map(|id| self._best_path(id))
    }

    fn drain_cutset<F>(&mut self, func: F)
    where
        F: FnMut(SubProblem<Self::State>) {
        self._drain_cutset(func)
    }
}

impl<T> Mdd<T>
where
    T: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            layers: vec![],
            nodes: vec![],
            edges: vec![],
            edgelists: vec![],
            //
            next_l: Default::default(),
            free: VarSet::empty(),
            //
            path_to_root: vec![],
            lel: None,
            cutset: vec![],
            best_node: None,
            best_exact_node: None,
            is_exact: true,
            has_exact_best_path: false,
        }
    }

    fn _clear(&mut self) {
        self.layers.clear();
        self.nodes.clear();
        self.edges.clear();
        self.edgelists.clear();
        self.next_l.clear();
        self.free = VarSet::empty();
        self.path_to_root.clear();
        self.cutset.clear();
        self.lel = None;
        self.best_node = None;
        self.best_exact_node = None;
        self.is_exact = true;
        self.has_exact_best_path = false;
    }

    fn _best_path(&self, id: NodeId) -> Vec<Decision> {
        Self::_best_path_partial_borrow(id, &self.path_to_root, &self.nodes, &self.edges)
    }

    fn _best_path_partial_borrow(
        id: NodeId,
        root_pa: &[Decision],
        nodes: &[Node<T>],
        edges: &[Edge],
    ) -> Vec<Decision> {
        let mut sol = root_pa.to_owned();
        let mut edge_id = nodes[id.0].best;
        while let Some(eid) = edge_id {
            let edge = edges[eid.0];
            sol.push(edge.decision);
            edge_id = nodes[edge.from.0].best;
        }
        sol
    }

    fn _compile(&mut self, input: &CompilationInput<T>) -> Result<Completion, Error> {
        self._clear();
        self._initialize(input);

        let width = input.max_width.max(1);
        while !self.next_l.is_empty() {
            let var = input.problem.next_variable(&self.free, &mut self.next_l.keys().map(|s| s.as_ref()));
            let Some(var) = var else {
                break;
            };

            let curr_l = self._move_to_next_layer(input, width)?;
            for node_id in curr_l {
                let state = get!(node node_id, self).state.clone();
                let rub = input.bound.estimate(state.as_ref(), &self.free);
                let node = get!(mut node node_id, self);
                node.rub = rub;
                if node.value_top.saturating_add(rub) > input.best_lb {
                    for value in input.problem.domain(state.as_ref(), var) {
                        self._branch_on(input, node_id, Decision { variable: var, value })?;
                    }
                }
            }
            self.free.remove(var);
        }

        self._finalize(input)?;

        Ok(Completion {
            is_exact: self.is_exact(),
            best_value: self.best_value(),
        })
    }

    fn _initialize(&mut self, input: &CompilationInput<T>) {
        self.path_to_root.extend_from_slice(&input.residual.path);
        self.free = VarSet::all(input.problem.nb_variables());
        for decision in input.residual.path.iter() {
            self.free.remove(decision.variable);
        }
        self.edgelists.push(EdgesList::Nil);

        let root_node_id = NodeId(0);
        let root_node = Node {
            state: input.residual.state.clone(),
            value_top: input.residual.value,
            value_bot: isize::MIN,
            best: None,
            inbound: NIL,
            rub: isize::MAX,
            theta: None,
            flags: NodeFlags::new_exact(),
            depth: input.residual.depth,
        };

        self.nodes.push(root_node);
        self.next_l.insert(input.residual.state.clone(), root_node_id);
    }

    fn _finalize(&mut self, input: &CompilationInput<T>) -> Result<(), Error> {
        self._finalize_layers();
        self._find_best_node();
        self._finalize_exact(input);
        self._compute_cutset(input);
        self._compute_local_bounds(input);
        self._check_admissibility(input)?;
        self._compute_thresholds(input);
        Ok(())
    }

    fn _drain_cutset<F>(&mut self, mut func: F)
    where
        F: FnMut(SubProblem<T>),
    {
        if let Some(best_value) = self.best_value() {
            for id in self.cutset.drain(..) {
                let node = get!(node id, self);

                if node.flags.is_marked() {
                    let rub  = node.value_top.saturating_add(node.rub);
                    let locb = node.value_top.saturating_add(node.value_bot);
                    let ub = rub.min(locb).min(best_value);

                    func(SubProblem {
                        state: node.state.clone(),
                        value: node.value_top,
                        path: Self::_best_path_partial_borrow(
                            id,
                            &self.path_to_root,
                            &self.nodes,
                            &self.edges,
                        ),
                        ub,
                        depth: node.depth,
                    })
                }
            }
        }
    }

    /// Computes the local bound of every node that can reach the terminal
    /// layer. The last layer only ever is a terminal one when `next_l` was
    /// not exhausted, see `_finalize_layers`.
    #[allow(clippy::redundant_closure_call)]
    fn _compute_local_bounds(&mut self, input: &CompilationInput<T>) {
        let needed = input.comp_type == CompilationType::Relaxed || input.debug == DebugLevel::On;
        if !needed || self.next_l.is_empty() {
            return;
        }

        for id in self.next_l.values() {
            let node = get!(mut node id, self);
            node.value_bot = 0;
            node.flags.set_marked(true);
        }

        // traverse bottom-up
        for Layer { from, to } in self.layers.iter().rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(node id, self);
                let value = node.value_bot;
                if node.flags.is_marked() {
                    foreach!(edge of id, self, |edge: Edge| {
                        let using_edge = value.saturating_add(edge.cost);
                        let parent = get!(mut node edge.from, self);
                        parent.flags.set_marked(true);
                        parent.value_bot = parent.value_bot.max(using_edge);
                    });
                }
            }
        }
    }

    /// In debug mode, verifies that no rough upper bound underestimates a
    /// completion that was actually found in an exact or restricted dd.
    fn _check_admissibility(&self, input: &CompilationInput<T>) -> Result<(), Error> {
        if input.debug == DebugLevel::Off || input.comp_type == CompilationType::Relaxed {
            return Ok(());
        }
        for node in self.nodes.iter() {
            if node.flags.is_marked() && !node.flags.is_deleted() && node.rub != isize::MAX && node.value_bot > node.rub {
                let err = Error::InadmissibleBound {
                    depth: node.depth,
                    state: format!("{:?}", node.state),
                    estimate: node.rub,
                    actual: node.value_bot,
                };
                error!("{err}");
                return Err(err);
            }
        }
        Ok(())
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_thresholds(&mut self, input: &CompilationInput<T>) {
        if input.comp_type == CompilationType::Relaxed || self.is_exact {
            let mut best_known = input.best_lb;

            if let Some(best_exact_node) = self.best_exact_node {
                let best_exact_value = get!(node best_exact_node, self).value_top;
                best_known = best_known.max(best_exact_value);

                for id in self.next_l.values() {
                    let node = get!(mut node id, self);
                    if node.flags.is_exact() {
                        node.theta = Some(best_known);
                    }
                }
            }

            for Layer { from, to } in self.layers.iter().rev().copied() {
                for id in from..to {
                    let id = NodeId(id);
                    let node = get!(mut node id, self);

                    if node.flags.is_deleted() {
                        continue;
                    }

                    // the theta of pruned nodes was set when they were pruned:
                    // it is propagated but never recomputed
                    if !node.flags.is_pruned() {
                        let tot_rub = node.value_top.saturating_add(node.rub);
                        if tot_rub <= best_known {
                            node.theta = Some(best_known.saturating_sub(node.rub));
                        } else if node.flags.is_cutset() {
                            let tot_locb = node.value_top.saturating_add(node.value_bot);
                            if tot_locb <= best_known {
                                let theta = node.theta.unwrap_or(isize::MAX);
                                node.theta = Some(theta.min(best_known.saturating_sub(node.value_bot)));
                            } else {
                                node.theta = Some(node.value_top);
                            }
                        } else if node.flags.is_exact() && node.theta.is_none() { // dead end
                            node.theta = Some(isize::MAX);
                        }
                    }
                    if !node.flags.is_pruned_by_cache() {
                        Self::_maybe_update_cache(node, input);
                    }

                    if let Some(my_theta) = node.theta {
                        foreach!(edge of id, self, |edge: Edge| {
                            let parent = get!(mut node edge.from, self);
                            let theta  = parent.theta.unwrap_or(isize::MAX);
                            parent.theta = Some(theta.min(my_theta.saturating_sub(edge.cost)));
                        });
                    }
                }
            }
        }
    }

    fn _maybe_update_cache(node: &Node<T>, input: &CompilationInput<T>) {
        // only the cut-set and the nodes above it are cached
        if let Some(theta) = node.theta {
            if node.flags.is_above_cutset() {
                input.cache.update(
                    node.state.clone(),
                    node.depth,
                    theta,
                    !node.flags.is_cutset()) // if it is in the cutset it has not been explored !
            }
        }
    }

    fn _compute_cutset(&mut self, input: &CompilationInput<T>) {
        if input.comp_type == CompilationType::Relaxed || self.is_exact {
            match input.cutset_type {
                CutsetType::LastExactLayer => self._compute_last_exact_layer_cutset(),
                CutsetType::Frontier => self._compute_frontier_cutset(),
            }
        }
    }

    fn _compute_last_exact_layer_cutset(&mut self) {
        let last_above = self.lel.map(|l| l.0 + 1).unwrap_or(self.layers.len());
        for Layer { from, to } in self.layers.iter().take(last_above).copied() {
            for node in self.nodes[from..to].iter_mut() {
                if !node.flags.is_deleted() {
                    node.flags.set_above_cutset(true);
                }
            }
        }

        if let Some(lel) = self.lel {
            let Layer { from, to } = self.layers[lel.0];
            for (id, node) in self.nodes.iter_mut().enumerate().skip(from).take(to - from) {
                if !node.flags.is_deleted() && !node.flags.is_pruned() {
                    node.flags.set_cutset(true);
                    if !self.is_exact {
                        self.cutset.push(NodeId(id));
                    }
                }
            }
        }
    }

    #[allow(clippy::redundant_closure_call)]
    fn _compute_frontier_cutset(&mut self) {
        // traverse bottom-up
        for Layer { from, to } in self.layers.iter().rev().copied() {
            for id in from..to {
                let id = NodeId(id);
                let node = get!(mut node id, self);

                if node.flags.is_deleted() {
                    continue;
                }
                if node.flags.is_exact() {
                    node.flags.set_above_cutset(true);
                } else {
                    foreach!(edge of id, self, |edge: Edge| {
                        let parent = get!(mut node edge.from, self);
                        if parent.flags.is_exact() && !parent.flags.is_cutset() {
                            if !self.is_exact {
                                self.cutset.push(edge.from);
                            }
                            parent.flags.set_cutset(true);
                        }
                    });
                }
            }
        }
    }

    /// The nodes left in `next_l` make up the terminal layer. They are
    /// neither filtered nor squashed.
    fn _finalize_layers(&mut self) {
        if !self.next_l.is_empty() {
            let from = self.layers.last().map(|l| l.to).unwrap_or(0);
            self.layers.push(Layer { from, to: self.nodes.len() });
        }
    }

    fn _find_best_node(&mut self) {
        self.best_node = self
            .next_l
            .values()
            .copied()
            .max_by_key(|id| get!(node id, self).value_top);
        self.best_exact_node = self
            .next_l
            .values()
            .filter(|id| get!(node id, self).flags.is_exact())
            .copied()
            .max_by_key(|id| get!(node id, self).value_top);
    }

    fn _finalize_exact(&mut self, input: &CompilationInput<T>) {
        self.has_exact_best_path = matches!(input.comp_type, CompilationType::Relaxed)
            && self._has_exact_best_path(self.best_node);

        if self.has_exact_best_path {
            self.best_exact_node = self.best_node;
        }
    }

    fn _has_exact_best_path(&self, node: Option<NodeId>) -> bool {
        if let Some(node_id) = node {
            let n = get!(node node_id, self);
            if n.flags.is_exact() {
                true
            } else {
                !n.flags.is_relaxed()
                    && self._has_exact_best_path(n.best.map(|e| get!(edge e, self).from))
            }
        } else {
            true
        }
    }

    /// Turns the content of `next_l` into a new layer of the dd and returns
    /// the nodes of that layer which must be expanded.
    fn _move_to_next_layer(&mut self, input: &CompilationInput<T>, width: usize) -> Result<Vec<NodeId>, Error> {
        let mut curr_l: Vec<NodeId> = self.next_l.drain().map(|(_, id)| id).collect();
        curr_l.sort_unstable_by_key(|id| id.0);

        if !self.layers.is_empty() {
            self._filter_with_cache(input, &mut curr_l);
        }
        self._filter_with_dominance(input, &mut curr_l)?;
        self._squash_if_needed(input, width, &mut curr_l)?;

        let from = self.layers.last().map(|l| l.to).unwrap_or(0);
        self.layers.push(Layer { from, to: self.nodes.len() });
        Ok(curr_l)
    }

    fn _filter_with_dominance(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) -> Result<(), Error> {
        curr_l.sort_unstable_by(|a, b| {
            get!(node a, self).value_top
                .cmp(&get!(node b, self).value_top)
                .then_with(|| input.ranking.compare(get!(node a, self).state.as_ref(), get!(node b, self).state.as_ref()))
                .reverse()
        }); // the most promising nodes are inserted first

        let mut inconsistent = None;
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            if !node.flags.is_exact() || inconsistent.is_some() {
                return true;
            }
            if input.debug == DebugLevel::On && !input.dominance.check_reflexive(node.state.as_ref()) {
                inconsistent = Some(Error::InconsistentDominance {
                    depth: node.depth,
                    state: format!("{:?}", node.state),
                });
                return true;
            }
            let DominanceCheckResult { dominated, threshold } =
                input.dominance.update_dominance(node.state.clone(), node.depth, node.value_top);
            if dominated {
                node.flags.set_dominated(true);
                node.theta = threshold; // set theta for later propagation
                false
            } else {
                true
            }
        });

        match inconsistent {
            Some(err) => {
                error!("{err}");
                Err(err)
            },
            None => Ok(())
        }
    }

    fn _filter_with_cache(&mut self, input: &CompilationInput<T>, curr_l: &mut Vec<NodeId>) {
        curr_l.retain(|id| {
            let node = get!(mut node id, self);
            let threshold = input.cache.lookup(node.state.as_ref(), node.depth);
            match threshold {
                Some(threshold) if node.value_top <= threshold.value => {
                    node.flags.set_pruned_by_cache(true);
                    node.theta = Some(threshold.value); // set theta for later propagation
                    false
                },
                _ => true,
            }
        });
    }

    fn _branch_on(
        &mut self,
        input: &CompilationInput<T>,
        from_id: NodeId,
        decision: Decision,
    ) -> Result<(), Error> {
        let state = get!(node from_id, self).state.clone();
        let next_state = input.problem.transition(state.as_ref(), decision);
        let cost = input.problem.transition_cost(state.as_ref(), decision);

        if input.debug == DebugLevel::On {
            let again = input.problem.transition(state.as_ref(), decision);
            let again_cost = input.problem.transition_cost(state.as_ref(), decision);
            if again != next_state || fxhash::hash64(&again) != fxhash::hash64(&next_state) || again_cost != cost {
                let err = Error::NonDeterministicTransition {
                    depth: get!(node from_id, self).depth,
                    state: format!("{:?}", state),
                    decision: format!("{:?}", decision),
                };
                error!("{err}");
                return Err(err);
            }
        }

        let next_state = Arc::new(next_state);
        match self.next_l.entry(next_state.clone()) {
            Entry::Vacant(e) => {
                let parent = get!(node from_id, self);
                let node_id = NodeId(self.nodes.len());
                let depth = parent.depth + 1;
                let mut flags = NodeFlags::new_exact();
                flags.set_exact(parent.flags.is_exact());

                self.nodes.push(Node {
                    state: next_state,
                    value_top: isize::MIN,
                    value_bot: isize::MIN,
                    //
                    best: None,
                    inbound: NIL,
                    //
                    rub: isize::MAX,
                    theta: None,
                    flags,
                    depth,
                });
                append_edge_to!(self, Edge {
                    from: from_id,
                    to  : node_id,
                    decision,
                    cost,
                });
                e.insert(node_id);
            }
            Entry::Occupied(e) => {
                let node_id = *e.get();
                append_edge_to!(self, Edge {
                    from: from_id,
                    to  : node_id,
                    decision,
                    cost,
                });
            }
        }
        Ok(())
    }

    fn _squash_if_needed(&mut self, input: &CompilationInput<T>, width: usize, curr_l: &mut Vec<NodeId>) -> Result<(), Error> {
        match input.comp_type {
            CompilationType::Exact => { /* do nothing: you want to explore the complete DD */ }
            CompilationType::Restricted => {
                if curr_l.len() > width {
                    self._maybe_save_lel();
                    self._restrict(input, width, curr_l)
                }
            },
            CompilationType::Relaxed => {
                // the first layer below the root is never merged
                if curr_l.len() > width && self.layers.len() >= 2 {
                    self._maybe_save_lel();
                    self._relax(input, width, curr_l)?
                }
            },
        }
        Ok(())
    }

    fn _maybe_save_lel(&mut self) {
        self.is_exact = false;
        if self.lel.is_none() {
            self.lel = Some(LayerId(self.layers.len() - 1)); // lel was the previous layer
        }
    }

    fn _cmp_promise(&self, input: &CompilationInput<T>, a: NodeId, b: NodeId) -> Ordering {
        let (a, b) = (get!(node a, self), get!(node b, self));
        a.value_top.cmp(&b.value_top)
            .then_with(|| input.ranking.compare(a.state.as_ref(), b.state.as_ref()))
    }

    /// Asks the reduction strategy how the nodes of `curr_l` are to be grouped
    fn _define_clusters(&self, input: &CompilationInput<T>, width: usize, curr_l: &[NodeId]) -> Vec<Vec<NodeId>> {
        let layer = curr_l.iter()
            .map(|id| {
                let node = get!(node id, self);
                LayerNode { state: node.state.as_ref(), value: node.value_top }
            })
            .collect::<Vec<_>>();

        input.reduction.define_clusters(&layer, width).into_iter()
            .map(|cluster| cluster.into_iter().filter_map(|i| curr_l.get(i).copied()).collect::<Vec<_>>())
            .filter(|cluster| !cluster.is_empty())
            .collect()
    }

    /// Keeps the most promising node of each cluster
    fn _restrict(&mut self, input: &CompilationInput<T>, width: usize, curr_l: &mut Vec<NodeId>) {
        let clusters = self._define_clusters(input, width, curr_l);
        let before = curr_l.len();

        curr_l.clear();
        for cluster in clusters {
            let best = cluster.iter().copied().max_by(|a, b| self._cmp_promise(input, *a, *b));
            for id in cluster {
                if Some(id) != best {
                    get!(mut node id, self).flags.set_deleted(true);
                }
            }
            curr_l.extend(best);
        }

        if let Some(first) = curr_l.first() {
            trace!(depth = get!(node first, self).depth, dropped = before - curr_l.len(), "restricting layer");
        }
    }

    /// Merges the nodes of each cluster having more than one node
    fn _relax(&mut self, input: &CompilationInput<T>, width: usize, curr_l: &mut Vec<NodeId>) -> Result<(), Error> {
        let clusters = self._define_clusters(input, width, curr_l);
        let (singles, groups): (Vec<_>, Vec<_>) = clusters.into_iter().partition(|c| c.len() == 1);

        curr_l.clear();
        let mut layer = FxHashMap::default();
        for id in singles.into_iter().flatten() {
            layer.insert(get!(node id, self).state.clone(), id);
            curr_l.push(id);
        }
        for group in groups.iter() {
            let (merged_id, fresh) = self._merge_cluster(input, group, &mut layer)?;
            if fresh {
                curr_l.push(merged_id);
            }
        }

        if let Some(first) = groups.first() {
            let merged = groups.iter().map(|g| g.len()).sum::<usize>();
            trace!(depth = get!(node first[0], self).depth, clusters = groups.len(), merged, "relaxing layer");
        }
        Ok(())
    }

    /// Merges the nodes of `group` and redirects their inbound edges to the
    /// merged node. When `layer` already holds a node with the merged state,
    /// that node is reused. Returns the merged node and whether it is new.
    #[allow(clippy::redundant_closure_call)]
    fn _merge_cluster(
        &mut self,
        input: &CompilationInput<T>,
        group: &[NodeId],
        layer: &mut FxHashMap<Arc<T>, NodeId>,
    ) -> Result<(NodeId, bool), Error> {
        let merged = Arc::new(input.relaxation.merge(&mut group.iter().map(|id| get!(node id, self).state.as_ref())));
        let depth = get!(node group[0], self).depth;

        if input.debug == DebugLevel::On {
            self._check_relaxation(input, merged.as_ref(), group)?;
        }

        let (merged_id, fresh) = match layer.get(&merged) {
            Some(id) => (*id, false),
            None => {
                let node_id = NodeId(self.nodes.len());
                self.nodes.push(Node {
                    state: merged.clone(),
                    value_top: isize::MIN,
                    value_bot: isize::MIN,
                    best: None,    // yet
                    inbound: NIL,  // yet
                    //
                    rub: isize::MAX,
                    theta: None,
                    flags: NodeFlags::new_relaxed(),
                    depth,
                });
                layer.insert(merged.clone(), node_id);
                (node_id, true)
            }
        };

        get!(mut node merged_id, self).flags.set_relaxed(true);

        for drop_id in group.iter().copied() {
            get!(mut node drop_id, self).flags.set_deleted(true);

            foreach!(edge of drop_id, self, |edge: Edge| {
                let src   = get!(node edge.from, self).state.as_ref();
                let dst   = get!(node edge.to,   self).state.as_ref();
                let rcost = input.relaxation.relax(src, dst, merged.as_ref(), edge.decision, edge.cost);

                append_edge_to!(self, Edge {
                    from: edge.from,
                    to: merged_id,
                    decision: edge.decision,
                    cost: rcost
                });
            });
        }
        Ok((merged_id, fresh))
    }

    /// In debug mode, verifies that merging does not lose any solution value.
    /// For each node `n` of the group, the best path through the relaxed
    /// edges entering the merged node followed by the best completion of the
    /// merged state must be worth at least the best path to `n` followed by
    /// the best completion of `n`. Completions are obtained by compiling an
    /// exact dd rooted in the state to check.
    #[allow(clippy::redundant_closure_call)]
    fn _check_relaxation(&self, input: &CompilationInput<T>, merged: &T, group: &[NodeId]) -> Result<(), Error> {
        let path = self._best_path(group[0]);
        let depth = get!(node group[0], self).depth;
        let merged_completion = Self::_exact_completion(input, Arc::new(merged.clone()), &path, depth)?;

        for id in group.iter().copied() {
            let node = get!(node id, self);
            let exact = Self::_exact_completion(input, node.state.clone(), &path, depth)?
                .map(|completion| node.value_top.saturating_add(completion));

            let mut entering: Option<isize> = None;
            foreach!(edge of id, self, |edge: Edge| {
                let parent = get!(node edge.from, self);
                let rcost  = input.relaxation.relax(parent.state.as_ref(), node.state.as_ref(), merged, edge.decision, edge.cost);
                let value  = parent.value_top.saturating_add(rcost);
                entering = Some(entering.map_or(value, |best| best.max(value)));
            });
            let relaxed = entering.zip(merged_completion).map(|(top, bot)| top.saturating_add(bot));

            let sound = match (relaxed, exact) {
                (_, None) => true,
                (None, Some(_)) => false,
                (Some(r), Some(e)) => r >= e,
            };
            if !sound {
                let err = Error::UnsoundRelaxation {
                    depth,
                    merged: format!("{:?}", merged),
                    original: format!("{:?}", node.state),
                    relaxed,
                    exact,
                };
                error!("{err}");
                return Err(err);
            }
        }
        Ok(())
    }

    fn _exact_completion(input: &CompilationInput<T>, state: Arc<T>, path: &[Decision], depth: usize) -> Result<Option<isize>, Error> {
        let residual = SubProblem { state, value: 0, path: path.to_vec(), ub: isize::MAX, depth };
        let cache = EmptyCache::new();
        let dominance = EmptyDominanceChecker::default();
        let exact = CompilationInput {
            comp_type: CompilationType::Exact,
            problem: input.problem,
            relaxation: input.relaxation,
            ranking: input.ranking,
            bound: input.bound,
            reduction: input.reduction,
            max_width: usize::MAX,
            residual: &residual,
            best_lb: isize::MIN,
            cache: &cache,
            dominance: &dominance,
            cutset_type: input.cutset_type,
            debug: DebugLevel::Off,
        };
        let mut mdd = Mdd::new();
        mdd.compile(&exact)?;
        Ok(mdd.best_value())
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
