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

//! This module provides the compact set of flags attached to each node of an
//! mdd while it is being compiled.

/// The status bits of a DD node, packed in one byte.
///
/// Being inexact is not the same as being relaxed: a node is relaxed when it
/// results from a merge and inexact as soon as one of its ancestors is relaxed.
/// Only the second implication is enforced (relaxed implies inexact).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NodeFlags(u8);
impl NodeFlags {
    pub const F_EXACT: u8 = 1;
    pub const F_RELAXED: u8 = 2;
    /// reaches the terminal layer
    pub const F_MARKED: u8 = 4;
    pub const F_CUTSET: u8 = 8;
    /// removed by a merge or a restriction
    pub const F_DELETED: u8 = 16;
    /// not expanded because of the cache
    pub const F_CACHE: u8 = 32;
    /// exact node on or above the cut-set
    pub const F_ABOVE_CUTSET: u8 = 64;
    /// discarded by the dominance checker
    pub const F_DOMINATED: u8 = 128;

    /// Creates a new set of flags having only the exact flag turned on.
    #[inline]
    pub fn new_exact() -> Self {
        NodeFlags(NodeFlags::F_EXACT)
    }
    /// Creates a new set of flags having only the relaxed flag turned on.
    #[inline]
    pub fn new_relaxed() -> Self {
        NodeFlags(NodeFlags::F_RELAXED)
    }
    /// Returns true iff the exact flag is on and the relaxed flag is off
    #[inline]
    pub fn is_exact(self) -> bool {
        self.test(NodeFlags::F_EXACT) && !self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_relaxed(self) -> bool {
        self.test(NodeFlags::F_RELAXED)
    }
    #[inline]
    pub fn is_marked(self) -> bool {
        self.test(NodeFlags::F_MARKED)
    }
    #[inline]
    pub fn is_cutset(self) -> bool {
        self.test(NodeFlags::F_CUTSET)
    }
    #[inline]
    pub fn is_above_cutset(self) -> bool {
        self.test(NodeFlags::F_ABOVE_CUTSET)
    }
    #[inline]
    pub fn is_deleted(self) -> bool {
        self.test(NodeFlags::F_DELETED)
    }
    #[inline]
    pub fn is_pruned_by_cache(self) -> bool {
        self.test(NodeFlags::F_CACHE)
    }
    #[inline]
    pub fn is_dominated(self) -> bool {
        self.test(NodeFlags::F_DOMINATED)
    }
    /// True iff the node was set aside by the cache or the dominance checker
    #[inline]
    pub fn is_pruned(self) -> bool {
        self.is_pruned_by_cache() || self.is_dominated()
    }
    #[inline]
    pub fn set_exact(&mut self, exact: bool) {
        self.set(NodeFlags::F_EXACT, exact)
    }
    #[inline]
    pub fn set_relaxed(&mut self, relaxed: bool) {
        self.set(NodeFlags::F_RELAXED, relaxed)
    }
    #[inline]
    pub fn set_marked(&mut self, marked: bool) {
        self.set(NodeFlags::F_MARKED, marked)
    }
    #[inline]
    pub fn set_cutset(&mut self, cutset: bool) {
        self.set(NodeFlags::F_CUTSET, cutset)
    }
    #[inline]
    pub fn set_above_cutset(&mut self, above: bool) {
        self.set(NodeFlags::F_ABOVE_CUTSET, above)
    }
    #[inline]
    pub fn set_deleted(&mut self, deleted: bool) {
        self.set(NodeFlags::F_DELETED, deleted)
    }
    #[inline]
    pub fn set_pruned_by_cache(&mut self, cache: bool) {
        self.set(NodeFlags::F_CACHE, cache)
    }
    #[inline]
    pub fn set_dominated(&mut self, dominated: bool) {
        self.set(NodeFlags::F_DOMINATED, dominated)
    }
    /// Checks whether all the flags encoded in the given mask are turned on.
    /// Otherwise, it returns false
    #[inline]
    pub fn test(self, mask: u8) -> bool {
        self.0 & mask == mask
    }
    /// Sets the value of a given flag to the selected polarity
    #[inline]
    pub fn set(&mut self, flag: u8, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}
impl Default for NodeFlags {
    /// Creates a default set of flags (only the exact flag is turned on).
    fn default() -> Self {
        NodeFlags::new_exact()
    }
}


#[cfg(test)]
#[allow(clippy::bool_assert_comparison)]
mod test_node_flags {
    use super::NodeFlags;

    #[test]
    fn new_can_be_relaxed_or_not() {
        let tested = NodeFlags::new_exact();
        assert_eq!(NodeFlags(NodeFlags::F_EXACT), tested);
        assert_eq!(true, tested.is_exact());
        assert_eq!(false, tested.is_relaxed());

        let tested = NodeFlags::new_relaxed();
        assert_eq!(NodeFlags(NodeFlags::F_RELAXED), tested);
        assert_eq!(false, tested.is_exact());
        assert_eq!(true, tested.is_relaxed());
    }
    #[test]
    fn by_default_only_the_exact_flag_is_on() {
        assert_eq!(NodeFlags(NodeFlags::F_EXACT), NodeFlags::default());
    }
    #[test]
    fn is_exact_iff_marked_so_and_not_relaxed() {
        let mut tested = NodeFlags::new_exact();
        tested.set_relaxed(true);
        assert_eq!(false, tested.is_exact());

        tested.set_relaxed(false);
        assert_eq!(true, tested.is_exact());

        tested.set_exact(false);
        assert_eq!(false, tested.is_exact());
        assert_eq!(false, tested.is_relaxed());
    }
    #[test]
    fn each_setter_only_touches_its_own_flag() {
        type Setter = fn(&mut NodeFlags, bool);
        type Getter = fn(NodeFlags) -> bool;
        let flags: [(Setter, Getter); 6] = [
            (NodeFlags::set_marked,         NodeFlags::is_marked),
            (NodeFlags::set_cutset,         NodeFlags::is_cutset),
            (NodeFlags::set_above_cutset,   NodeFlags::is_above_cutset),
            (NodeFlags::set_deleted,        NodeFlags::is_deleted),
            (NodeFlags::set_pruned_by_cache,NodeFlags::is_pruned_by_cache),
            (NodeFlags::set_dominated,      NodeFlags::is_dominated),
        ];
        for (i, (set, _)) in flags.iter().enumerate() {
            let mut tested = NodeFlags::new_exact();
            set(&mut tested, true);
            for (j, (_, get)) in flags.iter().enumerate() {
                assert_eq!(i == j, get(tested));
            }
            assert_eq!(true, tested.is_exact());
            set(&mut tested, false);
            assert_eq!(NodeFlags::new_exact(), tested);
        }
    }
    #[test]
    fn pruned_covers_cache_and_dominance() {
        let mut tested = NodeFlags::new_exact();
        assert_eq!(false, tested.is_pruned());
        tested.set_pruned_by_cache(true);
        assert_eq!(true, tested.is_pruned());
        tested.set_pruned_by_cache(false);
        tested.set_dominated(true);
        assert_eq!(true, tested.is_pruned());
    }
    #[test]
    fn test_checks_the_value_of_more_than_one_flag() {
        let mut tested = NodeFlags::new_exact();
        tested.set_marked(true);
        tested.set_cutset(true);
        assert_eq!(true, tested.test(NodeFlags::F_MARKED | NodeFlags::F_CUTSET));
        assert_eq!(false, tested.test(NodeFlags::F_MARKED | NodeFlags::F_DELETED));
    }
}
