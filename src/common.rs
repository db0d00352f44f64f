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
//! the code of the solver: the sentinel for unassigned finish times, the
//! statistics counters maintained by the search and the outcome of a
//! resolution attempt.

// ----------------------------------------------------------------------------
// --- TIME -------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The sentinel finish time of an activity that has not been assigned to the
/// partial schedule (the "+infinity" of the procedure). An activity belongs
/// to the partial schedule iff its finish time differs from this value.
pub const UNSCHEDULED: usize = usize::MAX;

// ----------------------------------------------------------------------------
// --- STATISTICS -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The counters maintained by the search driver. Given identical input data,
/// these counters are bit-stable across runs and platforms.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of delaying alternatives that have been turned into search
    /// nodes (the root is node 0 and is not counted).
    pub nodes_evaluated: usize,
    /// The number of nodes discarded because their lower bound could not
    /// improve on the best known makespan.
    pub nodes_lb_dominated: usize,
    /// The number of nodes discarded because their cutset was dominated by a
    /// cutset registered earlier on a different branch.
    pub nodes_cutset_dominated: usize,
    /// The number of nodes discarded by the left-shift dominance rule.
    pub nodes_leftshift_dominated: usize,
    /// How many times theorem 3 (single eligible activity) short-circuited
    /// the branching.
    pub theorem3_applied: usize,
    /// How many times theorem 4 (shortest compatible partner) short-circuited
    /// the branching.
    pub theorem4_applied: usize,
}

// ----------------------------------------------------------------------------
// --- RESULTS ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why the search stopped before proving optimality.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// It stopped because the configured cutoff criterion was met
    CutoffOccurred,
}

/// The outcome of a resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// True iff the reported makespan was proved optimal. This flag is only
    /// ever false when the search was stopped by an explicit cutoff.
    pub is_exact: bool,
    /// The makespan of the best schedule that was found, if any. Because the
    /// serial schedule is always admitted by the search, this can only be
    /// `None` when a cutoff fired before the first complete schedule.
    pub best_value: Option<usize>,
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_stats {
    use crate::SearchStats;

    #[test]
    fn default_stats_are_all_zero() {
        let stats = SearchStats::default();
        assert_eq!(0, stats.nodes_evaluated);
        assert_eq!(0, stats.nodes_lb_dominated);
        assert_eq!(0, stats.nodes_cutset_dominated);
        assert_eq!(0, stats.nodes_leftshift_dominated);
        assert_eq!(0, stats.theorem3_applied);
        assert_eq!(0, stats.theorem4_applied);
    }
}
