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

//! Reachability and critical-path utilities over the *original* precedence
//! graph. The additional precedences a search node accumulates while
//! branching never show up here: the queries of this module are what keeps
//! the left-shift rule and the theorem shortcuts honest about which
//! activities may in principle run in parallel.

use crate::Activity;

/// Computes the remaining critical path length of every activity: the
/// duration-weighted longest path from the activity to the sink. The sink
/// itself has length 0 and every other activity gets its own duration plus
/// the maximum over its successors.
pub fn rcpl_table(activities: &[Activity]) -> Vec<usize> {
    let mut memo = vec![None; activities.len()];
    for id in 0..activities.len() {
        rcpl_of(activities, id, &mut memo);
    }
    memo.into_iter().map(|x| x.unwrap_or(0)).collect()
}

fn rcpl_of(activities: &[Activity], id: usize, memo: &mut Vec<Option<usize>>) -> usize {
    if let Some(known) = memo[id] {
        return known;
    }
    let value = if id == activities.len() - 1 {
        0
    } else {
        let tail = activities[id].successors.iter()
            .map(|&succ| rcpl_of(activities, succ, memo))
            .max()
            .unwrap_or(0);
        activities[id].duration + tail
    };
    memo[id] = Some(value);
    value
}

/// Is `target` reachable from `from` by following original precedences
/// forward? The traversal never continues through a dummy activity, but a
/// dummy can be the target itself.
pub fn reaches_forward(activities: &[Activity], from: usize, target: usize) -> bool {
    reaches(activities, from, target, |a| &a.successors)
}

/// The symmetric query: is `target` reachable from `from` walking the
/// original precedences backward (through predecessors)?
pub fn reaches_backward(activities: &[Activity], from: usize, target: usize) -> bool {
    reaches(activities, from, target, |a| &a.predecessors)
}

fn reaches<'a, F>(activities: &'a [Activity], from: usize, target: usize, adj: F) -> bool
where F: Fn(&'a Activity) -> &'a Vec<usize> {
    let sink = activities.len() - 1;
    let mut seen = vec![false; activities.len()];
    let mut stack = vec![from];
    seen[from] = true;
    while let Some(cur) = stack.pop() {
        if cur == target {
            return true;
        }
        if cur == 0 || cur == sink {
            continue; // do not traverse through a dummy
        }
        for &nxt in adj(&activities[cur]) {
            if !seen[nxt] {
                seen[nxt] = true;
                stack.push(nxt);
            }
        }
    }
    false
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
