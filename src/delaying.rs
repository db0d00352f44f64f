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

//! Enumeration of the minimal delaying alternatives: the minimal subsets of
//! the activities in progress whose postponement returns the resource usage
//! below every capacity. These subsets are the branches of the search tree,
//! so the enumeration must be exhaustive and its order deterministic.

use crate::Project;

/// Enumerates every minimal subset D of `active` such that delaying D frees
/// at least `release[k]` units of every resource k, in lexicographic order
/// of activity ids (`active` is sorted by the caller).
///
/// A subset is only reported when removing any single member would break
/// coverage. Covering sets are never extended (their supersets cannot be
/// minimal) and an extension never adds an activity whose own requirements
/// cover the release on their own (its singleton is enumerated separately
/// and any superset of it is non-minimal).
pub fn minimal_delaying_alternatives(
    project: &Project,
    active: &[usize],
    release: &[usize],
) -> Vec<Vec<usize>> {
    let mut out = vec![];
    let mut current = vec![];
    extend(project, active, release, 0, &mut current, &mut out);
    out
}

fn extend(
    project: &Project,
    active: &[usize],
    release: &[usize],
    start: usize,
    current: &mut Vec<usize>,
    out: &mut Vec<Vec<usize>>,
) {
    if covers(project, current, release) {
        if is_minimal(project, current, release) {
            out.push(current.clone());
        }
        return;
    }
    for idx in start..active.len() {
        let act = active[idx];
        if !current.is_empty() && alone_sufficient(project, act, release) {
            continue;
        }
        current.push(act);
        extend(project, active, release, idx + 1, current, out);
        current.pop();
    }
}

/// Does delaying this whole set free enough of every resource?
fn covers(project: &Project, set: &[usize], release: &[usize]) -> bool {
    release.iter().enumerate().all(|(k, &needed)| {
        set.iter().map(|&i| project.requirement(i, k)).sum::<usize>() >= needed
    })
}

/// No proper subset may cover the release; for a covering set it suffices
/// to check every single-member removal.
fn is_minimal(project: &Project, set: &[usize], release: &[usize]) -> bool {
    set.iter().all(|&dropped| {
        release.iter().enumerate().any(|(k, &needed)| {
            let kept: usize = set.iter()
                .filter(|&&i| i != dropped)
                .map(|&i| project.requirement(i, k))
                .sum();
            kept < needed
        })
    })
}

fn alone_sufficient(project: &Project, act: usize, release: &[usize]) -> bool {
    release.iter().enumerate().all(|(k, &needed)| project.requirement(act, k) >= needed)
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_delaying {
    use super::*;
    use crate::{Project, RcpspInstance};
    use crate::instance::RawActivity;

    fn project(capacities: Vec<usize>, reqs: Vec<Vec<usize>>) -> Project {
        let k = capacities.len();
        let n = reqs.len();
        let mut activities = vec![RawActivity {
            duration: 0,
            requirements: vec![0; k],
            successors: (1..=n).collect(),
        }];
        for req in reqs {
            activities.push(RawActivity { duration: 1, requirements: req, successors: vec![n + 1] });
        }
        activities.push(RawActivity { duration: 0, requirements: vec![0; k], successors: vec![] });
        Project::from_instance(RcpspInstance { capacities, activities }).unwrap()
    }

    #[test]
    fn singletons_when_anyone_suffices() {
        let project = project(vec![2], vec![vec![1], vec![1], vec![1]]);
        let sets = minimal_delaying_alternatives(&project, &[1, 2, 3], &[1]);
        assert_eq!(vec![vec![1], vec![2], vec![3]], sets);
    }

    #[test]
    fn pairs_when_two_units_must_go() {
        let project = project(vec![2], vec![vec![1], vec![1], vec![1], vec![1]]);
        let sets = minimal_delaying_alternatives(&project, &[1, 2, 3, 4], &[2]);
        assert_eq!(
            vec![vec![1, 2], vec![1, 3], vec![1, 4], vec![2, 3], vec![2, 4], vec![3, 4]],
            sets
        );
    }

    #[test]
    fn no_superset_of_a_sufficient_singleton() {
        // activity 2 alone covers the release, 1 and 3 must team up
        let project = project(vec![9, 9], vec![vec![1, 0], vec![1, 1], vec![0, 1]]);
        let sets = minimal_delaying_alternatives(&project, &[1, 2, 3], &[1, 1]);
        assert_eq!(vec![vec![1, 3], vec![2]], sets);
    }

    #[test]
    fn mixed_sizes_stay_minimal() {
        // 1 weighs 2, the others weigh 1; two units must be released
        let project = project(vec![9], vec![vec![2], vec![1], vec![1]]);
        let sets = minimal_delaying_alternatives(&project, &[1, 2, 3], &[2]);
        assert_eq!(vec![vec![1], vec![2, 3]], sets);
    }

    #[test]
    fn enumeration_is_exhaustive_on_two_resources() {
        let project = project(vec![9, 9], vec![vec![1, 0], vec![0, 1], vec![1, 1]]);
        let sets = minimal_delaying_alternatives(&project, &[1, 2, 3], &[1, 1]);
        assert_eq!(vec![vec![1, 2], vec![3]], sets);
    }
}
