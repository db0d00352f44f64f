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

//! This module provides the implementation of the depth-first branch-and-bound
//! procedure of Demeulemeester and Herroelen (1992) for the RCPSP. The search
//! schedules eligible activities at successive decision points, branches over
//! the minimal delaying alternatives whenever the tentative schedule
//! oversubscribes a resource, and prunes with three dominance rules (lower
//! bound, cutset, left shift) plus the theorem-3/theorem-4 shortcuts.
//!
//! Unlike the classical description, which mutates one shared precedence
//! matrix on descent and restores it on ascent, each node here carries its
//! own additional precedences. Backtracking therefore reduces to dropping a
//! node, and the reachability queries over original precedences can never
//! observe a stale edge.

use log::{debug, trace};
use thiserror::Error;

use crate::{
    delaying, rules, theorems, Completion, Cutoff, CutsetRegistry, Fringe, Node, Project,
    Reason, SearchStats, Shortcut,
};

/// Tuning knobs of the solver that do not alter the optimal makespan, only
/// the effort spent proving it.
#[derive(Debug, Default, Clone, Copy)]
pub struct DhConfig {
    /// Also compute the critical-sequence lower bound for every delaying
    /// alternative (and for the root). Tighter, but expensive: off by
    /// default.
    pub critical_sequence_lb: bool,
}

/// The internal-invariant failures of the search. None of these can fire on
/// a well-formed project; seeing one means a dominance rule discarded a
/// subtree it should not have.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("the fringe was exhausted before any complete schedule was found")]
    FringeExhausted,
    #[error("a live node has no activity in progress")]
    NoActiveActivity,
}

/// The workload the driver gets from its fringe.
enum WorkLoad {
    /// There is no work left to be done: the search is over
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// The node to process
    WorkItem { node: Node },
}

/// The branch-and-bound solver. It borrows the project, a cutoff policy and
/// the fringe; the cutset registry, the incumbent and the counters are owned
/// and exclusively mutated here.
pub struct DhSolver<'a> {
    /// The project being scheduled
    project: &'a Project,
    /// Tuning knobs (strict optimizations only)
    config: DhConfig,
    /// A cutoff heuristic meant to decide when to stop the resolution
    cutoff: &'a (dyn Cutoff),
    /// The set of nodes that must still be explored before the problem can
    /// be considered solved
    fringe: &'a mut (dyn Fringe),
    /// Every cutset snapshot observed so far, for the dominance query
    registry: CutsetRegistry,
    /// The id handed to the next node created by a branching
    next_node_id: usize,
    /// The makespan of the best complete schedule found so far
    upper_bound: usize,
    /// The finish times of that schedule
    best_schedule: Option<Vec<usize>>,
    /// The counters reported next to the solution
    stats: SearchStats,
    /// If we decided not to go through a complete proof of optimality, this
    /// is the reason why we took that decision
    abort_proof: Option<Reason>,
}

impl<'a> DhSolver<'a> {
    pub fn new(project: &'a Project, cutoff: &'a dyn Cutoff, fringe: &'a mut dyn Fringe) -> Self {
        Self::custom(project, DhConfig::default(), cutoff, fringe, CutsetRegistry::new())
    }

    pub fn custom(
        project: &'a Project,
        config: DhConfig,
        cutoff: &'a dyn Cutoff,
        fringe: &'a mut dyn Fringe,
        registry: CutsetRegistry,
    ) -> Self {
        DhSolver {
            project,
            config,
            cutoff,
            fringe,
            registry,
            next_node_id: 0,
            upper_bound: usize::MAX,
            best_schedule: None,
            stats: SearchStats::default(),
            abort_proof: None,
        }
    }

    /// Runs the procedure to completion (or until the cutoff fires) and
    /// reports the outcome. The search is deterministic: identical projects
    /// yield identical schedules and identical counters.
    pub fn minimize(&mut self) -> Result<Completion, SearchError> {
        self.initialize();

        loop {
            match self.get_workload() {
                WorkLoad::Complete => break,
                WorkLoad::Aborted => break,
                WorkLoad::WorkItem { node } => self.advance(node)?,
            }
        }

        if self.best_schedule.is_none() && self.abort_proof.is_none() {
            return Err(SearchError::FringeExhausted);
        }
        Ok(Completion {
            is_exact: self.abort_proof.is_none(),
            best_value: self.best_schedule.as_ref().map(|_| self.upper_bound),
        })
    }

    /// The makespan of the best schedule found, if any.
    pub fn best_value(&self) -> Option<usize> {
        self.best_schedule.as_ref().map(|_| self.upper_bound)
    }

    /// The finish times of the best schedule found, if any.
    pub fn best_schedule(&self) -> Option<Vec<usize>> {
        self.best_schedule.clone()
    }

    /// The search counters accumulated so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Posts the root node onto the fringe: the dummy source is scheduled
    /// and in progress, the frontier holds its successors, and the lower
    /// bound is the project's critical path length.
    fn initialize(&mut self) {
        let mut root = Node::root(self.project);
        if self.config.critical_sequence_lb {
            root.lower_bound = root.lower_bound
                .max(rules::critical_sequence_lb(self.project, &root, &[], self.project.source()));
        }
        debug!("root lower bound {}", root.lower_bound);
        self.fringe.push(root);
    }

    /// Selects the next node to process: the deepest, then best-bound, then
    /// oldest node of the fringe. Nodes whose lower bound reached the best
    /// known makespan are discarded on the way.
    fn get_workload(&mut self) -> WorkLoad {
        if self.cutoff.must_stop() {
            self.abort_proof = Some(Reason::CutoffOccurred);
            self.fringe.clear();
            return WorkLoad::Aborted;
        }
        while let Some(node) = self.fringe.pop() {
            if node.lower_bound >= self.upper_bound {
                self.stats.nodes_lb_dominated += 1;
                trace!("node {} dominated by bound {}", node.id, self.upper_bound);
                continue;
            }
            return WorkLoad::WorkItem { node };
        }
        WorkLoad::Complete
    }

    /// Advances one node from decision point to decision point until it
    /// either completes a schedule, gets dominated, or runs into a resource
    /// conflict (in which case it branches).
    fn advance(&mut self, mut node: Node) -> Result<(), SearchError> {
        let project = self.project;
        let sink = project.sink();
        loop {
            node.decision_point =
                node.next_decision_point().ok_or(SearchError::NoActiveActivity)?;
            node.deactivate_finished();
            trace!("node {} at decision point {}", node.id, node.decision_point);

            if node.is_complete(project) {
                let makespan = node.finish_time[sink];
                if makespan < self.upper_bound {
                    debug!("node {} improved the makespan to {}", node.id, makespan);
                    self.upper_bound = makespan;
                    self.best_schedule = Some(node.finish_time.clone());
                }
                return Ok(());
            }

            if self.registry.dominating(&node.cutset).is_some() {
                debug!("node {} cutset dominated", node.id);
                self.stats.nodes_cutset_dominated += 1;
                return Ok(());
            }
            self.registry.register(node.cutset.clone());

            let eligibles = node.eligibles(project);
            if eligibles.is_empty() {
                continue;
            }
            trace!("node {} eligibles {:?}", node.id, eligibles);

            // once only the sink remains it closes the schedule on its own:
            // nothing is in progress and nothing else can start
            if eligibles == [sink] {
                node.schedule(project, sink);
                node.refresh_cutset(project);
                continue;
            }

            if node.active.is_empty() {
                if let Some(shortcut) = theorems::try_shortcut(project, &mut node, &eligibles) {
                    match shortcut {
                        Shortcut::Theorem3 { scheduled } => {
                            debug!("theorem 3 scheduled {scheduled}");
                            self.stats.theorem3_applied += 1;
                        }
                        Shortcut::Theorem4 { longer, shorter } => {
                            debug!("theorem 4 scheduled {longer} with {shorter}");
                            self.stats.theorem4_applied += 1;
                        }
                    }
                    continue;
                }
            }

            // tentatively schedule every eligible activity at this decision
            // point; the resource check decides whether that sticks
            for &act in eligibles.iter() {
                node.schedule(project, act);
            }
            node.refresh_cutset(project);

            match node.resource_overflow(project) {
                None => continue,
                Some(release) => {
                    self.branch(node, &release);
                    return Ok(());
                }
            }
        }
    }

    /// Resolves a resource conflict: enumerates every minimal delaying
    /// alternative and turns each into a child node, unless the left-shift
    /// rule proves the child redundant. The parent is consumed; its subtree
    /// lives on through the children.
    fn branch(&mut self, node: Node, release: &[usize]) {
        let project = self.project;
        let alternatives = delaying::minimal_delaying_alternatives(project, &node.active, release);
        debug!(
            "node {} conflict at {} over {:?}: {} delaying alternatives",
            node.id, node.decision_point, release, alternatives.len()
        );

        for delayed in alternatives {
            let Some(eval) = rules::evaluate_branch(project, &node, &delayed) else {
                continue;
            };
            self.next_node_id += 1;
            self.stats.nodes_evaluated += 1;

            let mut child = node.clone();
            child.id = self.next_node_id;
            child.level = node.level + 1;
            child.parent = Some(node.id);

            let delayed_started_early = delayed.iter()
                .any(|&d| child.start_time(project, d) < child.decision_point);
            child.apply_delay(&delayed, eval.efand);

            if rules::left_shift_dominated(project, &child, delayed_started_early) {
                debug!("child {} delaying {:?} is left-shift dominated", child.id, delayed);
                self.stats.nodes_leftshift_dominated += 1;
                continue;
            }

            let mut lower_bound = node.lower_bound.max(eval.lower_bound);
            if self.config.critical_sequence_lb {
                lower_bound = lower_bound
                    .max(rules::critical_sequence_lb(project, &node, &delayed, eval.efand));
            }
            child.lower_bound = lower_bound;
            child.refresh_cutset(project);

            trace!(
                "child {} delays {:?} behind {} with bound {}",
                child.id, delayed, eval.efand, child.lower_bound
            );
            self.fringe.push(child);
        }
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

/// The solver module is only lightly unit-tested here: the in-depth
/// validation happens on seed instances with known optima in the
/// integration suite (see the tests directory).
