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

//! The two theorems of Demeulemeester and Herroelen that schedule eligible
//! activities without opening a branching: when an activity cannot run in
//! parallel with any other unassigned activity it may be scheduled outright
//! (theorem 3), and when its only possible companion is eligible and no
//! longer than itself, both may be scheduled together (theorem 4). Either
//! way, additional precedences towards the remaining eligible activities
//! cut the redundant alternatives out of the subtree.

use crate::{precedence, Node, Project};

/// Which of the two shortcuts fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Activity `scheduled` could not run next to any unassigned activity
    Theorem3 { scheduled: usize },
    /// `longer` could only ever run next to `shorter`, and both started
    Theorem4 { longer: usize, shorter: usize },
}

/// Attempts the theorem-3/theorem-4 shortcuts at the current decision point.
/// Only meaningful when no activity is in progress; eligibles are examined
/// in ascending id order and the first applicable shortcut wins. On success
/// the node's schedule, additional precedences and cutset are updated and
/// the shortcut is reported; on failure the node is left untouched.
pub fn try_shortcut(project: &Project, node: &mut Node, eligibles: &[usize]) -> Option<Shortcut> {
    for &i in eligibles {
        let companions = companions(project, node, i);

        if companions.is_empty() {
            node.schedule(project, i);
            for &other in eligibles {
                if other != i {
                    node.added_edges.push((i, other));
                }
            }
            node.refresh_cutset(project);
            return Some(Shortcut::Theorem3 { scheduled: i });
        }

        if let [j] = companions[..] {
            if eligibles.contains(&j) && project.duration(j) <= project.duration(i) {
                node.schedule(project, i);
                node.schedule(project, j);
                // dropping the shorter from the active set moves the next
                // decision point straight to the longer one's finish
                node.remove_active(j);
                for &other in eligibles {
                    if other != i && other != j {
                        node.added_edges.push((i, other));
                    }
                }
                node.refresh_cutset(project);
                return Some(Shortcut::Theorem4 { longer: i, shorter: j });
            }
        }
    }
    None
}

/// The unassigned activities that could run in parallel with `i`: not
/// transitively ordered with it by original precedences in either direction,
/// and jointly within every resource capacity.
fn companions(project: &Project, node: &Node, i: usize) -> Vec<usize> {
    let activities = project.activities();
    (0..project.nb_activities())
        .filter(|&j| j != i && !node.in_schedule(j))
        .filter(|&j| {
            !precedence::reaches_forward(activities, i, j)
                && !precedence::reaches_backward(activities, i, j)
        })
        .filter(|&j| {
            (0..project.nb_resources())
                .all(|k| project.requirement(i, k) + project.requirement(j, k)
                    <= project.capacities()[k])
        })
        .collect()
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_theorems {
    use super::*;
    use crate::{Node, Project, RcpspInstance};
    use crate::instance::RawActivity;

    fn parallel(capacity: usize, specs: &[(usize, usize)]) -> Project {
        let n = specs.len();
        let mut activities = vec![RawActivity {
            duration: 0,
            requirements: vec![0],
            successors: (1..=n).collect(),
        }];
        for &(duration, req) in specs {
            activities.push(RawActivity {
                duration,
                requirements: vec![req],
                successors: vec![n + 1],
            });
        }
        activities.push(RawActivity { duration: 0, requirements: vec![0], successors: vec![] });
        Project::from_instance(RcpspInstance { capacities: vec![capacity], activities }).unwrap()
    }

    fn at_time_zero(project: &Project) -> Node {
        let mut node = Node::root(project);
        node.deactivate_finished();
        node
    }

    #[test]
    fn theorem3_schedules_a_loner_and_fences_off_the_others() {
        // capacity 1: nobody can accompany anybody
        let project = parallel(1, &[(3, 1), (4, 1)]);
        let mut node = at_time_zero(&project);
        let eligibles = node.eligibles(&project);

        let shortcut = try_shortcut(&project, &mut node, &eligibles);
        assert_eq!(Some(Shortcut::Theorem3 { scheduled: 1 }), shortcut);
        assert_eq!(3, node.finish_time[1]);
        assert_eq!(vec![(1, 2)], node.added_edges);
        assert_eq!(vec![1], node.active);
    }

    #[test]
    fn theorem4_pairs_the_longer_with_its_only_shorter_companion() {
        // durations 5, 3, 2 with requirements 1, 1, 2 on capacity 2: the
        // duration-5 activity can only accompany the duration-3 one
        let project = parallel(2, &[(5, 1), (3, 1), (2, 2)]);
        let mut node = at_time_zero(&project);
        let eligibles = node.eligibles(&project);

        let shortcut = try_shortcut(&project, &mut node, &eligibles);
        assert_eq!(Some(Shortcut::Theorem4 { longer: 1, shorter: 2 }), shortcut);
        assert_eq!(5, node.finish_time[1]);
        assert_eq!(3, node.finish_time[2]);
        // the shorter one left the active set so the next decision point is 5
        assert_eq!(vec![1], node.active);
        assert_eq!(vec![(1, 3)], node.added_edges);
    }

    #[test]
    fn theorem4_skips_an_activity_whose_companion_is_longer() {
        // activity 1 (d3) could only pair with 2 (d4): no shortcut for 1,
        // but 2 pairs with the shorter 1
        let project = parallel(2, &[(3, 1), (4, 1)]);
        let mut node = at_time_zero(&project);
        let eligibles = node.eligibles(&project);

        let shortcut = try_shortcut(&project, &mut node, &eligibles);
        assert_eq!(Some(Shortcut::Theorem4 { longer: 2, shorter: 1 }), shortcut);
        assert_eq!(vec![2], node.active);
    }

    #[test]
    fn no_shortcut_when_everyone_has_many_companions() {
        let project = parallel(2, &[(3, 1), (2, 1), (2, 1)]);
        let mut node = at_time_zero(&project);
        let eligibles = node.eligibles(&project);

        assert_eq!(None, try_shortcut(&project, &mut node, &eligibles));
        assert!(node.active.is_empty());
        assert!(node.added_edges.is_empty());
    }

    #[test]
    fn the_frontier_is_refreshed_after_a_shortcut() {
        let project = parallel(1, &[(3, 1), (4, 1)]);
        let mut node = at_time_zero(&project);
        let eligibles = node.eligibles(&project);
        try_shortcut(&project, &mut node, &eligibles);

        // 2 is still on the frontier (its new predecessor 1 is scheduled),
        // the sink is not (activity 2 is outside the partial schedule)
        assert_eq!(vec![2], node.cutset.unassigned);
    }
}
