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

//! The state carried by one vertex of the branch-and-bound tree: the partial
//! schedule, the set of activities in progress, the decision point, the
//! additional precedences accumulated while branching, and the cutset
//! snapshot used for dominance. Nodes are plain values: branching deep-copies
//! the parent and backtracking is nothing more than dropping a child.

use crate::{Project, UNSCHEDULED};

// ----------------------------------------------------------------------------
// --- CUTSET -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A snapshot identifying a reachable state of the search, indexed by the
/// set of activities whose precedence frontier has been completed. Two
/// branches meeting on the same frontier make one of them redundant; the
/// registry compares snapshots to find out which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cutset {
    /// The id of the node that produced this snapshot
    pub node_id: usize,
    /// The id of that node's parent (None for the root)
    pub parent_id: Option<usize>,
    /// The decision point at which the snapshot was taken
    pub decision_point: usize,
    /// Which activities were in progress when the snapshot was taken
    pub active: Vec<bool>,
    /// The finish times at snapshot time ([`UNSCHEDULED`] when unassigned)
    pub finish_time: Vec<usize>,
    /// The frontier: activities outside the partial schedule whose
    /// predecessors are all inside it (sorted)
    pub unassigned: Vec<usize>,
}

// ----------------------------------------------------------------------------
// --- NODE -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// One vertex of the branch-and-bound tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Monotonic allocation counter (the root is 0)
    pub id: usize,
    /// Depth in the tree (incremented on every branching)
    pub level: usize,
    /// The id of the parent node, None at the root
    pub parent: Option<usize>,
    /// The best known lower bound on the makespan reachable from this node
    pub lower_bound: usize,
    /// The time at which scheduling decisions are currently being taken
    pub decision_point: usize,
    /// Per-activity finish times; [`UNSCHEDULED`] means the activity is not
    /// part of the partial schedule
    pub finish_time: Vec<usize>,
    /// The ids of the activities currently in progress (sorted)
    pub active: Vec<usize>,
    /// Precedences added during branching, as (predecessor, delayed) pairs.
    /// They only exist within this node's subtree and only drive its own
    /// eligibility and frontier computations, never the reachability queries.
    pub added_edges: Vec<(usize, usize)>,
    /// The cutset snapshot of this node
    pub cutset: Cutset,
}

impl Node {
    /// Builds the root of the tree: only the dummy source is scheduled
    /// (finishing at 0), the frontier holds its successors, and the lower
    /// bound is the critical path length of the whole project.
    pub fn root(project: &Project) -> Self {
        let n = project.nb_activities();
        let source = project.source();
        let mut finish_time = vec![UNSCHEDULED; n];
        finish_time[source] = 0;
        let mut active_flags = vec![false; n];
        active_flags[source] = true;
        Node {
            id: 0,
            level: 0,
            parent: None,
            lower_bound: project.rcpl(source),
            decision_point: 0,
            finish_time: finish_time.clone(),
            active: vec![source],
            added_edges: vec![],
            cutset: Cutset {
                node_id: 0,
                parent_id: None,
                decision_point: 0,
                active: active_flags,
                finish_time,
                unassigned: project.activity(source).successors.clone(),
            },
        }
    }

    /// Is activity `i` part of the partial schedule?
    pub fn in_schedule(&self, i: usize) -> bool {
        self.finish_time[i] != UNSCHEDULED
    }

    /// The start time of a scheduled activity.
    pub fn start_time(&self, project: &Project, i: usize) -> usize {
        self.finish_time[i] - project.duration(i)
    }

    /// The next decision point: the earliest finish among the activities in
    /// progress. None when nothing is in progress (which the driver treats
    /// as an internal error, since a live node always has an active set).
    pub fn next_decision_point(&self) -> Option<usize> {
        self.active.iter().map(|&i| self.finish_time[i]).min()
    }

    /// Removes from the active set every activity finishing at (or before)
    /// the current decision point.
    pub fn deactivate_finished(&mut self) {
        let m = self.decision_point;
        let finish = &self.finish_time;
        self.active.retain(|&i| finish[i] > m);
    }

    /// A complete schedule has been reached once the sink is scheduled and
    /// done at the current decision point.
    pub fn is_complete(&self, project: &Project) -> bool {
        let t = self.finish_time[project.sink()];
        t != UNSCHEDULED && t <= self.decision_point
    }

    fn added_predecessors<'a>(&'a self, i: usize) -> impl Iterator<Item = usize> + 'a {
        self.added_edges.iter().filter(move |&&(_, to)| to == i).map(|&(from, _)| from)
    }

    /// All predecessors of `i` (original ones plus the node's added edges)
    /// are scheduled and finished by the current decision point.
    fn predecessors_met(&self, project: &Project, i: usize) -> bool {
        let m = self.decision_point;
        project.activity(i).predecessors.iter().all(|&p| self.finish_time[p] <= m)
            && self.added_predecessors(i).all(|p| self.finish_time[p] <= m)
    }

    /// The eligible activities at the current decision point, in ascending
    /// id order.
    pub fn eligibles(&self, project: &Project) -> Vec<usize> {
        (0..project.nb_activities())
            .filter(|&i| !self.in_schedule(i) && self.predecessors_met(project, i))
            .collect()
    }

    /// Schedules activity `i` at the current decision point: it enters the
    /// partial schedule and the active set.
    pub fn schedule(&mut self, project: &Project, i: usize) {
        self.finish_time[i] = self.decision_point + project.duration(i);
        match self.active.binary_search(&i) {
            Ok(_) => (),
            Err(pos) => self.active.insert(pos, i),
        }
    }

    /// Removes activity `i` from the active set (it stays in the partial
    /// schedule).
    pub fn remove_active(&mut self, i: usize) {
        if let Ok(pos) = self.active.binary_search(&i) {
            self.active.remove(pos);
        }
    }

    /// Applies a delaying alternative: every delayed activity leaves the
    /// partial schedule and the active set, and an additional precedence
    /// from `efand` (the earliest finishing activity that is not delayed)
    /// towards it is recorded on this node.
    pub fn apply_delay(&mut self, delayed: &[usize], efand: usize) {
        for &d in delayed {
            self.remove_active(d);
            self.finish_time[d] = UNSCHEDULED;
            self.added_edges.push((efand, d));
        }
    }

    /// The amount by which every resource is oversubscribed by the current
    /// active set, or None when the usage fits the capacities.
    pub fn resource_overflow(&self, project: &Project) -> Option<Vec<usize>> {
        let mut release = vec![0; project.nb_resources()];
        let mut conflict = false;
        for (k, release_k) in release.iter_mut().enumerate() {
            let used: usize = self.active.iter().map(|&i| project.requirement(i, k)).sum();
            if used > project.capacities()[k] {
                *release_k = used - project.capacities()[k];
                conflict = true;
            }
        }
        conflict.then_some(release)
    }

    /// Re-captures the cutset snapshot from the current schedule state. The
    /// frontier is recomputed from scratch: every activity outside the
    /// partial schedule whose predecessors (added edges included) all belong
    /// to it.
    pub fn refresh_cutset(&mut self, project: &Project) {
        let mut flags = vec![false; project.nb_activities()];
        self.active.iter().for_each(|&i| flags[i] = true);
        let unassigned: Vec<usize> = (0..project.nb_activities())
            .filter(|&i| {
                !self.in_schedule(i)
                    && project.activity(i).predecessors.iter().all(|&p| self.in_schedule(p))
                    && self.added_predecessors(i).all(|p| self.in_schedule(p))
            })
            .collect();

        self.cutset.node_id = self.id;
        self.cutset.parent_id = self.parent;
        self.cutset.decision_point = self.decision_point;
        self.cutset.finish_time = self.finish_time.clone();
        self.cutset.active = flags;
        self.cutset.unassigned = unassigned;
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_state {
    use super::*;
    use crate::{Project, RcpspInstance, UNSCHEDULED};
    use crate::instance::RawActivity;

    /// Three independent activities competing for one resource of capacity 2
    fn fan() -> Project {
        let inst = RcpspInstance {
            capacities: vec![2],
            activities: vec![
                RawActivity { duration: 0, requirements: vec![0], successors: vec![1, 2, 3] },
                RawActivity { duration: 3, requirements: vec![1], successors: vec![4] },
                RawActivity { duration: 2, requirements: vec![1], successors: vec![4] },
                RawActivity { duration: 2, requirements: vec![1], successors: vec![4] },
                RawActivity { duration: 0, requirements: vec![0], successors: vec![] },
            ],
        };
        Project::from_instance(inst).unwrap()
    }

    #[test]
    fn the_root_holds_only_the_source() {
        let project = fan();
        let root = Node::root(&project);
        assert_eq!(0, root.finish_time[0]);
        assert_eq!(vec![0], root.active);
        assert_eq!(3, root.lower_bound); // critical path through activity 1
        assert_eq!(vec![1, 2, 3], root.cutset.unassigned);
    }

    #[test]
    fn eligibility_requires_predecessors_finished_by_the_decision_point() {
        let project = fan();
        let mut node = Node::root(&project);
        node.deactivate_finished();
        assert_eq!(vec![1, 2, 3], node.eligibles(&project));

        node.schedule(&project, 1);
        // the sink still waits for 2 and 3
        assert_eq!(vec![2, 3], node.eligibles(&project));
    }

    #[test]
    fn added_edges_block_eligibility_until_their_tail_is_done() {
        let project = fan();
        let mut node = Node::root(&project);
        node.deactivate_finished();
        node.schedule(&project, 1); // finishes at 3
        node.apply_delay(&[2], 1);
        assert_eq!(vec![3], node.eligibles(&project));

        node.decision_point = 3;
        node.deactivate_finished();
        assert_eq!(vec![2, 3], node.eligibles(&project));
    }

    #[test]
    fn overflow_reports_the_excess_per_resource() {
        let project = fan();
        let mut node = Node::root(&project);
        node.deactivate_finished();
        for i in [1, 2, 3] {
            node.schedule(&project, i);
        }
        assert_eq!(Some(vec![1]), node.resource_overflow(&project));

        node.remove_active(3);
        assert_eq!(None, node.resource_overflow(&project));
    }

    #[test]
    fn applying_a_delay_unschedules_and_records_the_edge() {
        let project = fan();
        let mut node = Node::root(&project);
        node.deactivate_finished();
        for i in [1, 2, 3] {
            node.schedule(&project, i);
        }
        node.apply_delay(&[3], 2);
        assert_eq!(UNSCHEDULED, node.finish_time[3]);
        assert_eq!(vec![1, 2], node.active);
        assert_eq!(vec![(2, 3)], node.added_edges);
    }

    #[test]
    fn the_frontier_follows_the_partial_schedule() {
        let project = fan();
        let mut node = Node::root(&project);
        node.deactivate_finished();
        for i in [1, 2, 3] {
            node.schedule(&project, i);
        }
        node.refresh_cutset(&project);
        assert_eq!(vec![4], node.cutset.unassigned);

        node.apply_delay(&[3], 2);
        node.refresh_cutset(&project);
        // 3 is back on the frontier, the sink dropped off it
        assert_eq!(vec![3], node.cutset.unassigned);
    }

    #[test]
    fn completion_is_the_sink_done_at_the_decision_point() {
        let project = fan();
        let mut node = Node::root(&project);
        assert!(!node.is_complete(&project));
        node.finish_time[4] = 5;
        node.decision_point = 5;
        assert!(node.is_complete(&project));
    }
}
