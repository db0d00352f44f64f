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

//! # RCPSP
//! An exact solver for the resource-constrained project scheduling problem:
//! given a project of activities bound by finish-start precedences and
//! competing for finite renewable resources, find the start-time assignment
//! minimizing the project makespan.
//!
//! The solver implements the depth-first branch-and-bound procedure of
//! Demeulemeester and Herroelen (1992). Whenever the tentative schedule
//! oversubscribes a resource, the search branches over the *minimal delaying
//! alternatives* (the minimal subsets of in-progress activities whose
//! postponement restores feasibility) and prunes the tree with a
//! critical-path lower bound, a cutset dominance rule and a left-shift
//! dominance rule. Two theorems detect the configurations in which eligible
//! activities can be scheduled without branching at all.
//!
//! ## Quick example
//! ```
//! use rcpsp::*;
//!
//! // two activities of durations 3 and 4 competing for a single unit of
//! // one resource: they must run one after the other
//! let data = "1 1  4  0 0 2 2 3  3 1 1 4  4 1 1 4  0 0 0";
//! let instance = RcpspInstance::from_read(data.as_bytes()).unwrap();
//! let project = Project::from_instance(instance).unwrap();
//!
//! let cutoff = NoCutoff;
//! let mut fringe = DepthFringe::new();
//! let mut solver = DhSolver::new(&project, &cutoff, &mut fringe);
//!
//! let outcome = solver.minimize().unwrap();
//! assert!(outcome.is_exact);
//! assert_eq!(Some(7), outcome.best_value);
//!
//! let schedule = solver.best_schedule().unwrap();
//! assert_eq!(Ok(()), verify(&project, &schedule));
//! ```

mod common;
mod cutoff;
pub mod delaying;
mod fringe;
mod instance;
mod model;
pub mod precedence;
mod registry;
pub mod rules;
mod solver;
mod state;
mod theorems;
mod verify;

pub use common::*;
pub use cutoff::*;
pub use fringe::*;
pub use instance::{InputError, RawActivity, RcpspInstance};
pub use model::{Activity, ModelError, Project};
pub use registry::*;
pub use solver::*;
pub use state::*;
pub use theorems::Shortcut;
pub use verify::{verify, VerifyError};
