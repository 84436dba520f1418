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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client library is likely to work with.

use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

use bit_set::BitSet;

// ----------------------------------------------------------------------------
// --- VARIABLE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a variable from the optimization problem at hand.
/// In this case, each variable is assumed to be identified with an integer
/// ranging from 0 until `problem.nb_variables()`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Variable(pub usize);
impl Variable {
    #[inline]
    /// This function returns the id (numeric value) of the variable.
    ///
    /// # Examples:
    /// ```
    /// # use bbdd::Variable;
    /// assert_eq!(0, Variable(0).id());
    /// assert_eq!(1, Variable(1).id());
    /// assert_eq!(2, Variable(2).id());
    /// ```
    pub fn id(self) -> usize {
        self.0
    }
}

// ----------------------------------------------------------------------------
// --- DECISION ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This denotes a decision that was made during the search. It affects a given
/// `value` to the specified `variable`. Any given `Decision` should be
/// understood as ```[[ variable = value ]]````
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Decision {
    pub variable : Variable,
    pub value    : isize
}

// ----------------------------------------------------------------------------
// --- VARSET -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes a set of variables. It encodes them compactly as a
/// bitset. A `VarSet` can be efficiently iterated upon.
///
/// # Example
/// ```
/// # use bbdd::{Variable, VarSet};
/// let mut vs = VarSet::all(3);
/// vs.remove(Variable(1));
/// assert!(vs.contains(Variable(0)));
/// assert!(!vs.contains(Variable(1)));
/// assert_eq!(vec![Variable(0), Variable(2)], vs.iter().collect::<Vec<_>>());
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct VarSet(pub BitSet);

impl VarSet {
    /// Returns a `VarSet` where all the possible `n` variables are present.
    pub fn all(n: usize) -> VarSet {
        let mut bits = BitSet::with_capacity(n);
        for i in 0..n {
            bits.insert(i);
        }
        VarSet(bits)
    }
    /// Creates an empty var set
    pub fn empty() -> VarSet {
        VarSet(BitSet::new())
    }
    /// Adds the given variable `v` to the set if it is not already present.
    pub fn add(&mut self, v: Variable) {
        self.0.insert(v.0);
    }
    /// Removes the variable `v` from the set if it was present.
    pub fn remove(&mut self, v: Variable) {
        self.0.remove(v.0);
    }
    /// Returns true iff the set contains the variable `v`.
    pub fn contains(&self, v: Variable) -> bool {
        self.0.contains(v.0)
    }
    /// Returns the count of variables that are present in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }
    /// Returns true iff no variables are present in the set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Returns an iterator over the variables of this set (by increasing id).
    pub fn iter(&self) -> VarSetIter<'_> {
        VarSetIter(self.0.iter())
    }
}

/// Iterator over the variables of a `VarSet`. It is obtained with
/// `VarSet::iter()`.
pub struct VarSetIter<'a>(bit_set::Iter<'a, u32>);

impl Iterator for VarSetIter<'_> {
    type Item = Variable;

    fn next(&mut self) -> Option<Variable> {
        self.0.next().map(Variable)
    }
}

// ----------------------------------------------------------------------------
// --- DOMAIN -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A domain is the finite set of values that can be assigned to some variable
/// from a given state. The compiler may iterate over the same domain several
/// times: every call to `Problem::domain` simply produces a fresh `Domain`
/// which is consumed by a single `for` loop.
///
/// The enum exists so that a problem can hand out owned vectors, borrowed
/// slices, bitsets or ranges without boxing an iterator.
///
/// # Example
/// ```
/// # use bbdd::Domain;
/// let a: Domain = (0..3).into();
/// let b: Domain = vec![4, 2].into();
/// assert_eq!(vec![0, 1, 2], a.into_iter().collect::<Vec<_>>());
/// assert_eq!(vec![4, 2],    b.into_iter().collect::<Vec<_>>());
/// ```
#[derive(Clone, Debug)]
pub enum Domain<'a> {
    /// When the domain consists of an owned vector (vec![])
    Vector(Vec<isize>),
    /// When the domain consists of a slice (array or ref to vector)
    Slice(&'a [isize]),
    /// When the domain is a compact bitset
    BitSet(&'a BitSet),
    /// When the domain materializes a relation between variables (i.e. successor
    /// in a TSP), then the domain can be a varset. The possible values will be
    /// the ids of the variables present in the set.
    VarSet(&'a VarSet),
    /// When the domain is an exclusive range (ie. 0..10)
    Range(Range<isize>),
    /// When the domain is an inclusive range (ie. 0..=10)
    RangeInclusive(RangeInclusive<isize>),
}

impl<'a> IntoIterator for Domain<'a> {
    type Item     = isize;
    type IntoIter = DomainIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Domain::Vector         (v) => DomainIter::Vector(v.into_iter()),
            Domain::Slice          (s) => DomainIter::Slice (s.iter()),
            Domain::BitSet         (b) => DomainIter::BitSet(b.iter()),
            Domain::VarSet         (v) => DomainIter::BitSet(v.0.iter()),
            Domain::Range          (r) => DomainIter::Range (r),
            Domain::RangeInclusive (r) => DomainIter::RangeInclusive(r),
        }
    }
}

/// The iterator over the values of a `Domain`.
pub enum DomainIter<'a> {
    Vector         (std::vec::IntoIter<isize>),
    Slice          (std::slice::Iter<'a, isize>),
    BitSet         (bit_set::Iter<'a, u32>),
    Range          (Range<isize>),
    RangeInclusive (RangeInclusive<isize>),
}

impl Iterator for DomainIter<'_> {
    type Item = isize;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            DomainIter::Vector         (i) => i.next(),
            DomainIter::Slice          (i) => i.next().copied(),
            DomainIter::BitSet         (i) => i.next().map(|x| x as isize),
            DomainIter::Range          (i) => i.next(),
            DomainIter::RangeInclusive (i) => i.next(),
        }
    }
}

impl From<Vec<isize>> for Domain<'_> {
    fn from(v: Vec<isize>) -> Self {
        Domain::Vector(v)
    }
}
impl<'a> From<&'a [isize]> for Domain<'a> {
    fn from(s: &'a [isize]) -> Self {
        Domain::Slice(s)
    }
}
impl From<Range<isize>> for Domain<'_> {
    fn from(r: Range<isize>) -> Self {
        Domain::Range(r)
    }
}
impl From<RangeInclusive<isize>> for Domain<'_> {
    fn from(r: RangeInclusive<isize>) -> Self {
        Domain::RangeInclusive(r)
    }
}
impl<'a> From<&'a BitSet> for Domain<'a> {
    fn from(b: &'a BitSet) -> Self {
        Domain::BitSet(b)
    }
}
impl<'a> From<&'a VarSet> for Domain<'a> {
    fn from(v: &'a VarSet) -> Self {
        Domain::VarSet(v)
    }
}

// ----------------------------------------------------------------------------
// --- SUBPROBLEM -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A subproblem is a residual problem that must be solved in order to complete the
/// resolution of the original problem which had been defined.
///
/// # Note:
/// Subproblems are automatically instantiated from nodes in the exact cut-sets
/// of relaxed decision diagrams. If you are only discovering the API, rest
/// assured.. you don't need to implement any subproblem yourself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubProblem<T> {
    /// The root state of this sub problem
    pub state: Arc<T>,
    /// The root value of this sub problem
    pub value: isize,
    /// The path to traverse to reach this subproblem from the root
    /// of the original problem
    pub path: Vec<Decision>,
    /// An upper bound on the objective reachable in this subproblem
    pub ub: isize,
    /// The depth of the subproblem with respect to the root problem
    pub depth: usize,
}

// ----------------------------------------------------------------------------
// --- THRESHOLD --------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A threshold is a value that can be stored during the execution of a branch
/// and bound algorithm. It is associated with a single exact state and is used
/// to determine whether a new node with the same state is worth exploring.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Threshold {
    /// The value of the threshold
    pub value: isize,
    /// Whether a node with the given value has already been explored
    pub explored: bool,
}

// ----------------------------------------------------------------------------
// --- COMPLETION -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The outcome of an mdd development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// is the given solution exact (proved optimal for the given [sub-]problem)?
    /// or is it an approximation ?
    pub is_exact: bool,
    /// if present the value of the best solution derived from this mdd
    pub best_value: Option<isize>,
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
