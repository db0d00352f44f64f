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

//! This module defines the validated project model the search operates on:
//! the activities with their durations, resource requirements and precedence
//! relations, plus the resource capacities. A [`Project`] can only be
//! obtained from a raw instance through a validation that enforces the
//! structural invariants the procedure relies upon (dummy endpoints, a
//! precedence DAG, requirements within capacities).

use petgraph::{algo::toposort, graph::NodeIndex, Graph};
use thiserror::Error;

use crate::{precedence, RcpspInstance};

/// The ways in which a parsed instance can fail to describe a well-formed
/// project. Like input errors, these abort the run before the search starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("dummy activity {0} has a nonzero duration")]
    DummyDuration(usize),
    #[error("dummy activity {0} has a nonzero resource requirement")]
    DummyRequirement(usize),
    #[error("activity {activity} requires more of resource {resource} than its capacity")]
    ExcessiveRequirement { activity: usize, resource: usize },
    #[error("activity {activity} lists inexistent successor {successor}")]
    SuccessorOutOfRange { activity: usize, successor: usize },
    #[error("activity {activity} lists successor {successor} twice")]
    DuplicateSuccessor { activity: usize, successor: usize },
    #[error("activity {activity} declares {expected} resource requirements, found {found}")]
    RequirementCount { activity: usize, expected: usize, found: usize },
    #[error("a project must comprise at least the two dummy activities, found {0}")]
    TooFewActivities(usize),
    #[error("activity {0} lists the dummy source as a successor")]
    EdgeIntoSource(usize),
    #[error("the dummy sink lists successors")]
    EdgeOutOfSink,
    #[error("the precedence relation is cyclic")]
    CyclicPrecedence,
    #[error("activity {0} is not reachable from the dummy source")]
    Unreachable(usize),
    #[error("activity {0} does not reach the dummy sink")]
    DeadEnd(usize),
}

/// An atomic task of integer duration requiring fixed amounts of the
/// renewable resources over its whole execution window.
#[derive(Debug, Clone)]
pub struct Activity {
    /// The stable identifier of the activity (its position in the project)
    pub id: usize,
    /// How many consecutive time periods the activity spans
    pub duration: usize,
    /// How much of each resource the activity claims while in progress
    pub requirements: Vec<usize>,
    /// The ids of the direct successors (sorted)
    pub successors: Vec<usize>,
    /// The ids of the direct predecessors (sorted, derived from successors)
    pub predecessors: Vec<usize>,
}

/// A validated project: the ordered activities (activity 0 being the dummy
/// source, activity N-1 the dummy sink), the resource capacities, and the
/// remaining-critical-path lengths which are computed once here because
/// every lower bound of the search keeps coming back to them.
#[derive(Debug, Clone)]
pub struct Project {
    capacities: Vec<usize>,
    activities: Vec<Activity>,
    rcpl: Vec<usize>,
}

impl TryFrom<RcpspInstance> for Project {
    type Error = ModelError;

    fn try_from(inst: RcpspInstance) -> Result<Self, ModelError> {
        Project::from_instance(inst)
    }
}

impl Project {
    pub fn from_instance(inst: RcpspInstance) -> Result<Self, ModelError> {
        let nb_activities = inst.activities.len();
        let nb_resources = inst.capacities.len();
        if nb_activities < 2 {
            return Err(ModelError::TooFewActivities(nb_activities));
        }
        let sink = nb_activities - 1;

        let mut activities = Vec::with_capacity(nb_activities);
        for (id, raw) in inst.activities.into_iter().enumerate() {
            if raw.requirements.len() != nb_resources {
                return Err(ModelError::RequirementCount {
                    activity: id,
                    expected: nb_resources,
                    found: raw.requirements.len(),
                });
            }
            let mut successors = raw.successors;
            successors.sort_unstable();
            for pair in successors.windows(2) {
                if pair[0] == pair[1] {
                    return Err(ModelError::DuplicateSuccessor { activity: id, successor: pair[0] });
                }
            }
            for &succ in successors.iter() {
                if succ >= nb_activities {
                    return Err(ModelError::SuccessorOutOfRange { activity: id, successor: succ });
                }
                if succ == 0 {
                    return Err(ModelError::EdgeIntoSource(id));
                }
            }
            activities.push(Activity {
                id,
                duration: raw.duration,
                requirements: raw.requirements,
                successors,
                predecessors: vec![],
            });
        }

        // dummy endpoints carry no duration and no load
        for &dummy in &[0, sink] {
            if activities[dummy].duration != 0 {
                return Err(ModelError::DummyDuration(dummy));
            }
            if activities[dummy].requirements.iter().any(|&r| r != 0) {
                return Err(ModelError::DummyRequirement(dummy));
            }
        }
        if !activities[sink].successors.is_empty() {
            return Err(ModelError::EdgeOutOfSink);
        }

        // no single activity may overload a resource on its own
        for act in activities.iter() {
            for (k, &req) in act.requirements.iter().enumerate() {
                if req > inst.capacities[k] {
                    return Err(ModelError::ExcessiveRequirement { activity: act.id, resource: k });
                }
            }
        }

        // derive the predecessors
        for id in 0..nb_activities {
            let successors = activities[id].successors.clone();
            for succ in successors {
                activities[succ].predecessors.push(id);
            }
        }
        activities.iter_mut().for_each(|a| a.predecessors.sort_unstable());

        Self::check_graph(&activities)?;

        let rcpl = precedence::rcpl_table(&activities);
        Ok(Project { capacities: inst.capacities, activities, rcpl })
    }

    /// The precedence relation must be a DAG in which every non-dummy
    /// activity lies on some source-to-sink path.
    fn check_graph(activities: &[Activity]) -> Result<(), ModelError> {
        let nb_activities = activities.len();
        let mut graph: Graph<usize, ()> = Graph::with_capacity(nb_activities, nb_activities);
        let nodes: Vec<NodeIndex> = (0..nb_activities).map(|i| graph.add_node(i)).collect();
        for act in activities.iter() {
            for &succ in act.successors.iter() {
                graph.add_edge(nodes[act.id], nodes[succ], ());
            }
        }
        toposort(&graph, None).map_err(|_| ModelError::CyclicPrecedence)?;

        let forward = Self::sweep(activities, 0, |a| &a.successors);
        if let Some(lost) = forward.iter().position(|seen| !seen) {
            return Err(ModelError::Unreachable(lost));
        }
        let backward = Self::sweep(activities, nb_activities - 1, |a| &a.predecessors);
        if let Some(lost) = backward.iter().position(|seen| !seen) {
            return Err(ModelError::DeadEnd(lost));
        }
        Ok(())
    }

    fn sweep<'a, F>(activities: &'a [Activity], start: usize, adj: F) -> Vec<bool>
    where F: Fn(&'a Activity) -> &'a Vec<usize> {
        let mut seen = vec![false; activities.len()];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(cur) = stack.pop() {
            for &nxt in adj(&activities[cur]) {
                if !seen[nxt] {
                    seen[nxt] = true;
                    stack.push(nxt);
                }
            }
        }
        seen
    }

    /// The number of activities, dummies included.
    pub fn nb_activities(&self) -> usize {
        self.activities.len()
    }
    /// The number of renewable resources.
    pub fn nb_resources(&self) -> usize {
        self.capacities.len()
    }
    pub fn capacities(&self) -> &[usize] {
        &self.capacities
    }
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }
    pub fn activity(&self, i: usize) -> &Activity {
        &self.activities[i]
    }
    pub fn duration(&self, i: usize) -> usize {
        self.activities[i].duration
    }
    pub fn requirement(&self, i: usize, k: usize) -> usize {
        self.activities[i].requirements[k]
    }
    /// The id of the dummy source activity.
    pub fn source(&self) -> usize {
        0
    }
    /// The id of the dummy sink activity.
    pub fn sink(&self) -> usize {
        self.activities.len() - 1
    }
    /// The remaining critical path length from activity `i` to the sink,
    /// over the original precedences (computed once at construction).
    pub fn rcpl(&self, i: usize) -> usize {
        self.rcpl[i]
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
