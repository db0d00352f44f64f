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

//! This module provides the solver fringe: the priority queue holding the
//! nodes that remain to be explored. The ordering implements the selection
//! policy of the procedure: deepest tree level first, then smallest lower
//! bound, then creation order. This makes the search depth-first with a
//! best-bound tiebreak within a level, and pins the node sequence so that
//! two runs on the same instance are indistinguishable.

use std::cmp::Ordering;

use binary_heap_plus::BinaryHeap;
use compare::Compare;

use crate::Node;

/// This trait abstracts away the implementation details of the solver
/// fringe. That is, a fringe represents the priority queue which stores all
/// the nodes remaining to explore.
pub trait Fringe {
    /// This is how you push a node onto the fringe.
    fn push(&mut self, node: Node);
    /// This method yields the most promising node from the fringe.
    fn pop(&mut self) -> Option<Node>;
    /// This method clears the fringe: it removes all nodes from the queue.
    fn clear(&mut self);
    /// Yields the length of the queue.
    fn len(&self) -> usize;
    /// Returns true iff the fringe is empty (len == 0)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The comparator implementing the selection policy. Under a max-heap, the
/// "greatest" node is the deepest one; among nodes of the same level the
/// one with the smallest lower bound, and among those the oldest.
#[derive(Debug, Default, Clone, Copy)]
pub struct CompareNodes;

impl Compare<Node> for CompareNodes {
    fn compare(&self, l: &Node, r: &Node) -> Ordering {
        l.level.cmp(&r.level)
            .then_with(|| r.lower_bound.cmp(&l.lower_bound))
            .then_with(|| r.id.cmp(&l.id))
    }
}

/// A fringe built on a binary heap ordered by [`CompareNodes`].
pub struct DepthFringe {
    heap: BinaryHeap<Node, CompareNodes>,
}

impl DepthFringe {
    pub fn new() -> Self {
        Self { heap: BinaryHeap::from_vec_cmp(vec![], CompareNodes) }
    }
}

impl Default for DepthFringe {
    fn default() -> Self {
        Self::new()
    }
}

impl Fringe for DepthFringe {
    fn push(&mut self, node: Node) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<Node> {
        self.heap.pop()
    }

    fn clear(&mut self) {
        self.heap.clear()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_fringe {
    use super::*;
    use crate::Cutset;

    fn node(id: usize, level: usize, lower_bound: usize) -> Node {
        Node {
            id,
            level,
            parent: None,
            lower_bound,
            decision_point: 0,
            finish_time: vec![],
            active: vec![],
            added_edges: vec![],
            cutset: Cutset {
                node_id: id,
                parent_id: None,
                decision_point: 0,
                active: vec![],
                finish_time: vec![],
                unassigned: vec![],
            },
        }
    }

    #[test]
    fn by_default_it_is_empty() {
        let fringe = DepthFringe::new();
        assert!(fringe.is_empty());
        assert_eq!(0, fringe.len());
    }

    #[test]
    fn pushing_and_popping_track_the_length() {
        let mut fringe = DepthFringe::new();
        fringe.push(node(1, 1, 10));
        fringe.push(node(2, 1, 20));
        assert_eq!(2, fringe.len());
        fringe.pop();
        assert_eq!(1, fringe.len());
    }

    #[test]
    fn popping_an_empty_fringe_yields_none() {
        let mut fringe = DepthFringe::new();
        assert!(fringe.pop().is_none());
    }

    #[test]
    fn the_deepest_level_pops_first() {
        let mut fringe = DepthFringe::new();
        fringe.push(node(1, 1, 5));
        fringe.push(node(2, 3, 50));
        fringe.push(node(3, 2, 1));

        assert_eq!(2, fringe.pop().unwrap().id);
        assert_eq!(3, fringe.pop().unwrap().id);
        assert_eq!(1, fringe.pop().unwrap().id);
    }

    #[test]
    fn within_a_level_the_smallest_bound_pops_first() {
        let mut fringe = DepthFringe::new();
        fringe.push(node(1, 2, 30));
        fringe.push(node(2, 2, 10));
        fringe.push(node(3, 2, 20));

        assert_eq!(2, fringe.pop().unwrap().id);
        assert_eq!(3, fringe.pop().unwrap().id);
        assert_eq!(1, fringe.pop().unwrap().id);
    }

    #[test]
    fn full_ties_pop_in_creation_order() {
        let mut fringe = DepthFringe::new();
        fringe.push(node(7, 2, 10));
        fringe.push(node(3, 2, 10));
        fringe.push(node(5, 2, 10));

        assert_eq!(3, fringe.pop().unwrap().id);
        assert_eq!(5, fringe.pop().unwrap().id);
        assert_eq!(7, fringe.pop().unwrap().id);
    }

    #[test]
    fn clearing_empties_the_fringe() {
        let mut fringe = DepthFringe::new();
        fringe.push(node(1, 1, 1));
        fringe.clear();
        assert!(fringe.is_empty());
    }
}
