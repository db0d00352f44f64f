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

//! The global store of every cutset snapshot observed so far, and the
//! dominance query that prunes a subtree whenever the search walks into a
//! frontier some other branch has already covered at least as well.

use rustc_hash::FxHashMap;

use crate::Cutset;

/// A monotonically growing collection of cutset snapshots. Since dominance
/// requires the frontiers to be identical, the snapshots are bucketed by
/// their `unassigned` set and the scan is linear inside one bucket.
#[derive(Debug, Default)]
pub struct CutsetRegistry {
    buckets: FxHashMap<Vec<usize>, Vec<Cutset>>,
    len: usize,
}

impl CutsetRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// The number of registered snapshots.
    pub fn len(&self) -> usize {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds a registered snapshot dominating the given one, if any. A
    /// stored snapshot `s` dominates `c` iff it lies on a different branch
    /// (`s` was neither produced by `c`'s node nor by its parent), covers
    /// the identical frontier, took its decisions no later, and none of its
    /// in-progress activities finishes after what `c` can still guarantee.
    pub fn dominating(&self, c: &Cutset) -> Option<&Cutset> {
        let bucket = self.buckets.get(&c.unassigned)?;
        bucket.iter().find(|s| {
            s.node_id != c.node_id
                && c.parent_id != Some(s.node_id)
                && s.decision_point <= c.decision_point
                && s.active.iter().enumerate().all(|(i, &active)| {
                    !active || s.finish_time[i] <= c.finish_time[i].max(c.decision_point)
                })
        })
    }

    /// Stores a snapshot. Registering the exact same snapshot twice is a
    /// no-op, so a node advancing through several decision points without
    /// touching its schedule does not flood the registry.
    pub fn register(&mut self, snapshot: Cutset) {
        let bucket = self.buckets.entry(snapshot.unassigned.clone()).or_default();
        if !bucket.contains(&snapshot) {
            bucket.push(snapshot);
            self.len += 1;
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
