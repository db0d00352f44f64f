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

//! An independent feasibility check of the schedule reported by the search.
//! A violation here is never a property of the input: it signals a bug in
//! the search itself, which is why every check is spelled out against the
//! original project data rather than against any search state.

use thiserror::Error;

use crate::{Project, UNSCHEDULED};

/// The ways a reported schedule can be infeasible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    #[error("the schedule assigns {found} finish times to {expected} activities")]
    WrongLength { expected: usize, found: usize },
    #[error("activity {0} was left without a finish time")]
    Unassigned(usize),
    #[error("the dummy source finishes at {0} instead of 0")]
    SourceNotAtZero(usize),
    #[error("activity {0} would have to start before time 0")]
    StartsBeforeZero(usize),
    #[error("activity {pred} finishes at {pred_finish} but its successor {succ} starts at {succ_start}")]
    PrecedenceViolation { pred: usize, succ: usize, pred_finish: usize, succ_start: usize },
    #[error("resource {resource} holds {used} units during period {period} for a capacity of {capacity}")]
    CapacityExceeded { resource: usize, period: usize, used: usize, capacity: usize },
}

/// Checks that the given finish times describe a feasible schedule of the
/// project: every precedence respected, every resource within its capacity
/// over every period, and the dummy source pinned at time 0. Verifying the
/// same schedule twice trivially yields the same outcome.
pub fn verify(project: &Project, finish_time: &[usize]) -> Result<(), VerifyError> {
    let n = project.nb_activities();
    if finish_time.len() != n {
        return Err(VerifyError::WrongLength { expected: n, found: finish_time.len() });
    }
    if let Some(lost) = (0..n).find(|&i| finish_time[i] == UNSCHEDULED) {
        return Err(VerifyError::Unassigned(lost));
    }
    if finish_time[project.source()] != 0 {
        return Err(VerifyError::SourceNotAtZero(finish_time[project.source()]));
    }
    if let Some(early) = (0..n).find(|&i| finish_time[i] < project.duration(i)) {
        return Err(VerifyError::StartsBeforeZero(early));
    }

    for act in project.activities() {
        for &succ in act.successors.iter() {
            let succ_start = finish_time[succ] - project.duration(succ);
            if succ_start < finish_time[act.id] {
                return Err(VerifyError::PrecedenceViolation {
                    pred: act.id,
                    succ,
                    pred_finish: finish_time[act.id],
                    succ_start,
                });
            }
        }
    }

    let makespan = finish_time[project.sink()];
    for period in 0..makespan {
        for (k, &capacity) in project.capacities().iter().enumerate() {
            let used: usize = (0..n)
                .filter(|&i| {
                    finish_time[i] > period && finish_time[i] - project.duration(i) <= period
                })
                .map(|i| project.requirement(i, k))
                .sum();
            if used > capacity {
                return Err(VerifyError::CapacityExceeded { resource: k, period, used, capacity });
            }
        }
    }
    Ok(())
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_verify {
    use super::*;
    use crate::{Project, RcpspInstance, UNSCHEDULED};

    /// 0 -> {1, 2} -> 3, durations 3 and 4, one unit each on capacity 1
    fn serial_pair() -> Project {
        let text = "1 1  4  0 0 2 2 3  3 1 1 4  4 1 1 4  0 0 0";
        Project::from_instance(RcpspInstance::from_read(text.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn a_serial_schedule_passes() {
        let project = serial_pair();
        assert_eq!(Ok(()), verify(&project, &[0, 3, 7, 7]));
    }

    #[test]
    fn verification_is_idempotent() {
        let project = serial_pair();
        let schedule = [0, 3, 7, 7];
        assert_eq!(verify(&project, &schedule), verify(&project, &schedule));
    }

    #[test]
    fn an_overlap_on_a_tight_resource_is_caught() {
        let project = serial_pair();
        assert_eq!(
            Err(VerifyError::CapacityExceeded { resource: 0, period: 0, used: 2, capacity: 1 }),
            verify(&project, &[0, 3, 4, 4])
        );
    }

    #[test]
    fn a_precedence_violation_is_caught() {
        let project = serial_pair();
        // activity 2 finishes at 7 yet the sink pretends to close at 5
        assert_eq!(
            Err(VerifyError::PrecedenceViolation { pred: 2, succ: 3, pred_finish: 7, succ_start: 5 }),
            verify(&project, &[0, 3, 7, 5])
        );
    }

    #[test]
    fn a_negative_start_is_caught() {
        let project = serial_pair();
        assert_eq!(
            Err(VerifyError::StartsBeforeZero(2)),
            verify(&project, &[0, 3, 2, 7])
        );
    }

    #[test]
    fn a_late_source_is_caught() {
        let project = serial_pair();
        assert_eq!(
            Err(VerifyError::SourceNotAtZero(1)),
            verify(&project, &[1, 4, 8, 8])
        );
    }

    #[test]
    fn a_hole_in_the_schedule_is_caught() {
        let project = serial_pair();
        assert_eq!(
            Err(VerifyError::Unassigned(2)),
            verify(&project, &[0, 3, UNSCHEDULED, 7])
        );
    }

    #[test]
    fn a_truncated_schedule_is_caught() {
        let project = serial_pair();
        assert_eq!(
            Err(VerifyError::WrongLength { expected: 4, found: 3 }),
            verify(&project, &[0, 3, 7])
        );
    }
}
