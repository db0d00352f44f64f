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

//! The bounding and dominance rules applied when a delaying alternative is
//! turned into a child node: the critical-path lower bound, the left-shift
//! dominance rule, and the (optional, more expensive) critical-sequence
//! lower bound computed over the augmented precedence graph.

use crate::{Node, Project, UNSCHEDULED};

/// The evaluation of one delaying alternative against the tentative schedule
/// of the branching node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchEval {
    /// The earliest finishing activity among those that stay in progress
    /// (ties broken towards the smallest id). The additional precedences of
    /// the child all start from this activity.
    pub efand: usize,
    /// The critical-path lower bound: the finish of `efand` plus the longest
    /// remaining critical path among the delayed activities.
    pub lower_bound: usize,
}

/// Evaluates a delaying alternative on the (pre-delay) branching node. Yields
/// None when delaying would empty the active set, which cannot happen for a
/// minimal alternative over a conflicting active set.
pub fn evaluate_branch(project: &Project, node: &Node, delayed: &[usize]) -> Option<BranchEval> {
    let efand = node.active.iter()
        .filter(|i| !delayed.contains(i))
        .copied()
        .min_by_key(|&i| node.finish_time[i])?;
    let max_rcpl = delayed.iter().map(|&d| project.rcpl(d)).max().unwrap_or(0);
    Some(BranchEval { efand, lower_bound: node.finish_time[efand] + max_rcpl })
}

// ----------------------------------------------------------------------------
// --- LEFT-SHIFT DOMINANCE ---------------------------------------------------
// ----------------------------------------------------------------------------
/// The left-shift dominance rule, applied to a child node right after its
/// delaying alternative has been applied. `delayed_started_early` tells
/// whether some delayed activity had started strictly before the current
/// decision point (the set DS); when it did not, the rule never applies.
///
/// The schedule is dominated when some activity that starts exactly at the
/// decision point could start one period earlier without violating original
/// precedences (its EST against the current finish times of its original
/// predecessors) nor any capacity over that one period.
pub fn left_shift_dominated(project: &Project, node: &Node, delayed_started_early: bool) -> bool {
    if !delayed_started_early || node.decision_point == 0 {
        return false;
    }
    let period = node.decision_point - 1;
    node.active.iter().any(|&x| {
        node.start_time(project, x) == node.decision_point
            && est_against_schedule(project, node, x) <= period
            && fits_period(project, node, x, period)
    })
}

/// The earliest start of `x` given the current finish times of its original
/// predecessors (all of which are scheduled, since `x` is).
fn est_against_schedule(project: &Project, node: &Node, x: usize) -> usize {
    project.activity(x).predecessors.iter().map(|&p| node.finish_time[p]).max().unwrap_or(0)
}

/// Would adding `x` to the period `[period, period+1)` stay within every
/// capacity, next to the scheduled activities overlapping that period?
fn fits_period(project: &Project, node: &Node, x: usize, period: usize) -> bool {
    (0..project.nb_resources()).all(|k| {
        let used: usize = (0..project.nb_activities())
            .filter(|&i| {
                node.finish_time[i] != UNSCHEDULED
                    && node.finish_time[i] > period
                    && node.start_time(project, i) <= period
            })
            .map(|i| project.requirement(i, k))
            .sum();
        used + project.requirement(x, k) <= project.capacities()[k]
    })
}

// ----------------------------------------------------------------------------
// --- CRITICAL-SEQUENCE LOWER BOUND ------------------------------------------
// ----------------------------------------------------------------------------
/// The critical-sequence lower bound over the precedence graph augmented
/// with the node's added edges plus the tentative delaying edges
/// (`efand` towards every delayed activity).
///
/// The bound first takes the length of the longest path through the
/// augmented DAG, then tightens it with `CP + d(a) - e(a)` for every
/// activity outside both the critical path and the reduced partial
/// schedule, where `e(a)` is the longest run of consecutive periods inside
/// `[EST(a), LFT(a)]` able to absorb the requirements of `a` on top of the
/// serialized critical-path usage.
///
/// This is a strict optimization: the search is correct without it, it only
/// tightens `lower_bound` (and thereby the node counts).
pub fn critical_sequence_lb(
    project: &Project,
    node: &Node,
    delayed: &[usize],
    efand: usize,
) -> usize {
    let graph = Augmented::new(project, node, delayed, efand);
    let (cp_length, path) = graph.critical_path();

    // the serialized resource usage of the critical path
    let mut usage = Vec::with_capacity(cp_length);
    for &act in path.iter() {
        for _ in 0..project.duration(act) {
            usage.push(project.activity(act).requirements.clone());
        }
    }

    let on_path = {
        let mut flags = vec![false; project.nb_activities()];
        path.iter().for_each(|&a| flags[a] = true);
        flags
    };

    let mut bound = cp_length;
    for a in 0..project.nb_activities() {
        if on_path[a] || (node.in_schedule(a) && !delayed.contains(&a)) {
            continue;
        }
        let d = project.duration(a);
        let est = graph.est(a);
        let lft = graph.lft(a, cp_length);
        let mut slack = 0;
        for t0 in est..=lft.saturating_sub(d) {
            let mut run = 0;
            for t in t0..t0 + d {
                let feasible = (0..project.nb_resources()).all(|k| {
                    usage[t][k] + project.requirement(a, k) <= project.capacities()[k]
                });
                if feasible {
                    run += 1;
                } else {
                    break;
                }
            }
            slack = slack.max(run);
        }
        bound = bound.max(cp_length + d - slack);
    }
    bound
}

/// The precedence graph of one node augmented with the tentative delaying
/// edges, exposing the classical CPM quantities.
struct Augmented<'a> {
    project: &'a Project,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl<'a> Augmented<'a> {
    fn new(project: &'a Project, node: &Node, delayed: &[usize], efand: usize) -> Self {
        let mut successors: Vec<Vec<usize>> =
            project.activities().iter().map(|a| a.successors.clone()).collect();
        let mut predecessors: Vec<Vec<usize>> =
            project.activities().iter().map(|a| a.predecessors.clone()).collect();
        let mut add = |from: usize, to: usize| {
            if !successors[from].contains(&to) {
                successors[from].push(to);
                predecessors[to].push(from);
            }
        };
        for &(from, to) in node.added_edges.iter() {
            add(from, to);
        }
        for &d in delayed.iter() {
            add(efand, d);
        }
        Augmented { project, successors, predecessors }
    }

    /// The longest source-to-sink path: its duration and its activities in
    /// order (ties resolved towards the smallest successor id).
    fn critical_path(&self) -> (usize, Vec<usize>) {
        let n = self.project.nb_activities();
        let mut memo = vec![None; n];
        let length = self.tail_length(0, &mut memo);

        // walk the memo table: the next hop is any successor realizing the
        // remaining length, the smallest id on ties
        let mut path = vec![0];
        let mut cur = 0;
        while cur != n - 1 {
            let remaining = memo[cur].unwrap_or(0);
            let next = self.successors[cur].iter().copied()
                .filter(|&s| self.project.duration(s) + memo[s].unwrap_or(0) == remaining)
                .min();
            match next {
                Some(s) => {
                    path.push(s);
                    cur = s;
                }
                None => break,
            }
        }
        (length, path)
    }

    /// Longest remaining path from `i` to the sink on the augmented graph
    /// (the duration of `i` itself excluded for the source, included
    /// otherwise through its successors' accumulation).
    fn tail_length(&self, i: usize, memo: &mut Vec<Option<usize>>) -> usize {
        if let Some(known) = memo[i] {
            return known;
        }
        let value = self.successors[i].iter()
            .map(|&s| self.project.duration(s) + self.tail_length(s, memo))
            .max()
            .unwrap_or(0);
        memo[i] = Some(value);
        value
    }

    /// Earliest start of `a` by forward CPM over the augmented graph.
    fn est(&self, a: usize) -> usize {
        let mut memo = vec![None; self.project.nb_activities()];
        self.est_memo(a, &mut memo)
    }

    fn est_memo(&self, a: usize, memo: &mut Vec<Option<usize>>) -> usize {
        if let Some(known) = memo[a] {
            return known;
        }
        let value = self.predecessors[a].iter()
            .map(|&p| self.est_memo(p, memo) + self.project.duration(p))
            .max()
            .unwrap_or(0);
        memo[a] = Some(value);
        value
    }

    /// Latest finish of `a` under the given deadline, by backward CPM.
    fn lft(&self, a: usize, deadline: usize) -> usize {
        let mut memo = vec![None; self.project.nb_activities()];
        self.lft_memo(a, deadline, &mut memo)
    }

    fn lft_memo(&self, a: usize, deadline: usize, memo: &mut Vec<Option<usize>>) -> usize {
        if let Some(known) = memo[a] {
            return known;
        }
        let value = self.successors[a].iter()
            .map(|&s| self.lft_memo(s, deadline, memo) - self.project.duration(s))
            .min()
            .unwrap_or(deadline);
        memo[a] = Some(value);
        value
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_rules {
    use super::*;
    use crate::{Node, Project, RcpspInstance};
    use crate::instance::RawActivity;

    /// Three independent activities (durations 3, 2, 2) on one resource of
    /// capacity 2
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

    fn conflicted_root(project: &Project) -> Node {
        let mut node = Node::root(project);
        node.deactivate_finished();
        for i in [1, 2, 3] {
            node.schedule(project, i);
        }
        node
    }

    #[test]
    fn the_bound_pairs_the_earliest_survivor_with_the_longest_delayed_tail() {
        let project = fan();
        let node = conflicted_root(&project);

        let eval = evaluate_branch(&project, &node, &[1]).unwrap();
        assert_eq!(2, eval.efand); // 2 and 3 both finish at 2, the smallest id wins
        assert_eq!(2 + 3, eval.lower_bound);

        let eval = evaluate_branch(&project, &node, &[2]).unwrap();
        assert_eq!(3, eval.efand); // activity 3 finishes at 2, activity 1 at 3
        assert_eq!(2 + 2, eval.lower_bound);
    }

    #[test]
    fn delaying_everything_but_one_keeps_that_one_as_efand() {
        let project = fan();
        let node = conflicted_root(&project);
        let eval = evaluate_branch(&project, &node, &[2, 3]).unwrap();
        assert_eq!(1, eval.efand);
        assert_eq!(3 + 2, eval.lower_bound);
    }

    #[test]
    fn left_shift_fires_when_a_fresh_start_fits_one_period_earlier() {
        let project = fan();
        let mut node = conflicted_root(&project);
        // branch at m = 1 after activity 1 ran alone over [0, 1): pretend 2
        // started at 0 and was delayed, 3 was just scheduled at 1
        node.finish_time[1] = 3; // [0, 3)
        node.apply_delay(&[2], 1);
        node.decision_point = 1;
        node.finish_time[3] = 3; // [1, 3)

        assert!(left_shift_dominated(&project, &node, true));
    }

    #[test]
    fn left_shift_needs_a_delayed_activity_started_earlier() {
        let project = fan();
        let mut node = conflicted_root(&project);
        node.finish_time[1] = 3;
        node.apply_delay(&[2], 1);
        node.decision_point = 1;
        node.finish_time[3] = 3;

        assert!(!left_shift_dominated(&project, &node, false));
    }

    #[test]
    fn left_shift_respects_capacities_in_the_earlier_period() {
        let project = fan();
        let mut node = conflicted_root(&project);
        node.apply_delay(&[3], 1);
        node.decision_point = 2;
        // activities 1 and 2 both occupy [0, 2)-ish windows; a fresh start at
        // 2 cannot move to 1 because both units are taken over [1, 2)
        node.finish_time[1] = 3; // [0, 3)
        node.finish_time[2] = 2; // [0, 2)
        node.finish_time[3] = 4; // [2, 4) freshly scheduled
        node.active = vec![1, 3];

        assert!(!left_shift_dominated(&project, &node, true));
    }

    #[test]
    fn the_critical_sequence_bound_sees_what_rcpl_cannot() {
        // two activities 1 (d3, r1) and 2 (d2, r2) on a capacity-2 resource:
        // nothing fits next to 2, so the true optimum is serial
        let inst = RcpspInstance {
            capacities: vec![2],
            activities: vec![
                RawActivity { duration: 0, requirements: vec![0], successors: vec![1, 2] },
                RawActivity { duration: 3, requirements: vec![1], successors: vec![3] },
                RawActivity { duration: 2, requirements: vec![2], successors: vec![3] },
                RawActivity { duration: 0, requirements: vec![0], successors: vec![] },
            ],
        };
        let project = Project::from_instance(inst).unwrap();
        let node = Node::root(&project);

        assert_eq!(3, project.rcpl(0));
        assert_eq!(5, critical_sequence_lb(&project, &node, &[], 0));
    }

    #[test]
    fn the_critical_sequence_bound_degrades_to_the_critical_path() {
        // a pure chain: every activity is on the critical path
        let inst = RcpspInstance {
            capacities: vec![1],
            activities: vec![
                RawActivity { duration: 0, requirements: vec![0], successors: vec![1] },
                RawActivity { duration: 4, requirements: vec![1], successors: vec![2] },
                RawActivity { duration: 2, requirements: vec![1], successors: vec![3] },
                RawActivity { duration: 0, requirements: vec![0], successors: vec![] },
            ],
        };
        let project = Project::from_instance(inst).unwrap();
        let node = Node::root(&project);
        assert_eq!(6, critical_sequence_lb(&project, &node, &[], 0));
    }
}
