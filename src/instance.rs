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

//! This module contains everything that is necessary to parse an RCPSP
//! instance file and turn it into structs usable in Rust. The format is a
//! plain whitespace-separated integer stream: the number of resources and
//! their capacities, the number of activities (dummies included), then one
//! record per activity giving its duration, its per-resource requirements
//! and its list of 1-based successor ids. Lines starting with `#` are
//! treated as comments.

use std::{fs::File, io::{BufRead, BufReader, Read}, path::Path};

use thiserror::Error;

/// The ways in which reading an instance file can go wrong. These errors
/// abort the run before the core procedure ever starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("could not read the instance file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected end of input while reading {0}")]
    MissingToken(&'static str),
    #[error("expected an integer for {what} but found '{token}'")]
    Malformed { what: &'static str, token: String },
    #[error("successor ids are 1-based, found 0")]
    ZeroSuccessor,
    #[error("an instance must comprise at least the two dummy activities, found {0}")]
    TooFewActivities(usize),
    #[error("trailing token '{0}' after the last activity record")]
    TrailingToken(String),
}

/// One raw activity record, exactly as read from the file except that the
/// successor ids have been normalized to 0-based indexing.
#[derive(Debug, Clone)]
pub struct RawActivity {
    pub duration: usize,
    pub requirements: Vec<usize>,
    pub successors: Vec<usize>,
}

/// An RCPSP instance as it appears on disk. No structural validation has
/// happened yet at this point: turning the instance into a [`crate::Project`]
/// is where the model invariants get enforced.
#[derive(Debug, Clone)]
pub struct RcpspInstance {
    /// The capacity of each renewable resource (one entry per resource)
    pub capacities: Vec<usize>,
    /// All activity records, in file order. The first is the dummy source,
    /// the last the dummy sink.
    pub activities: Vec<RawActivity>,
}

impl RcpspInstance {
    /// Reads an instance from the file at the given location.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        Self::from_read(File::open(path)?)
    }

    /// Reads an instance off any byte source (a file, a string in a test).
    pub fn from_read<R: Read>(src: R) -> Result<Self, InputError> {
        let mut text = String::new();
        for line in BufReader::new(src).lines() {
            let line = line?;
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            text.push_str(line);
            text.push('\n');
        }
        Self::parse(&text)
    }

    fn parse(text: &str) -> Result<Self, InputError> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &'static str| -> Result<usize, InputError> {
            let token = tokens.next().ok_or(InputError::MissingToken(what))?;
            token.parse::<usize>().map_err(|_| InputError::Malformed {
                what,
                token: token.to_string(),
            })
        };

        let nb_resources = next("the number of resources")?;
        let mut capacities = Vec::with_capacity(nb_resources);
        for _ in 0..nb_resources {
            capacities.push(next("a resource capacity")?);
        }

        let nb_activities = next("the number of activities")?;
        if nb_activities < 2 {
            return Err(InputError::TooFewActivities(nb_activities));
        }

        let mut activities = Vec::with_capacity(nb_activities);
        for _ in 0..nb_activities {
            let duration = next("an activity duration")?;
            let mut requirements = Vec::with_capacity(nb_resources);
            for _ in 0..nb_resources {
                requirements.push(next("a resource requirement")?);
            }
            let nb_succ = next("a successor count")?;
            let mut successors = Vec::with_capacity(nb_succ);
            for _ in 0..nb_succ {
                let succ = next("a successor id")?;
                if succ == 0 {
                    return Err(InputError::ZeroSuccessor);
                }
                successors.push(succ - 1); // numbering starts at 1 in the file
            }
            activities.push(RawActivity { duration, requirements, successors });
        }

        if let Some(extra) = tokens.next() {
            return Err(InputError::TrailingToken(extra.to_string()));
        }
        Ok(RcpspInstance { capacities, activities })
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_instance {
    use super::*;

    const SINGLETON: &str = "
        # one resource of capacity 1, one real activity of duration 5
        1  1
        3
        0 0  1 2
        5 1  1 3
        0 0  0
        ";

    #[test]
    fn parses_the_singleton_project() {
        let inst = RcpspInstance::from_read(SINGLETON.as_bytes()).unwrap();
        assert_eq!(vec![1], inst.capacities);
        assert_eq!(3, inst.activities.len());
        assert_eq!(5, inst.activities[1].duration);
        assert_eq!(vec![1], inst.activities[1].requirements);
        assert_eq!(vec![2], inst.activities[1].successors); // 3 became 2
        assert!(inst.activities[2].successors.is_empty());
    }

    #[test]
    fn comment_lines_are_skipped() {
        let inst = RcpspInstance::from_read(SINGLETON.as_bytes()).unwrap();
        assert_eq!(3, inst.activities.len());
    }

    #[test]
    fn truncated_input_is_reported() {
        let result = RcpspInstance::from_read("1 1 3 0 0 1".as_bytes());
        assert!(matches!(result, Err(InputError::MissingToken(_))));
    }

    #[test]
    fn garbage_token_is_reported() {
        let result = RcpspInstance::from_read("1 one 3".as_bytes());
        assert!(matches!(result, Err(InputError::Malformed { .. })));
    }

    #[test]
    fn successor_id_zero_is_rejected() {
        let result = RcpspInstance::from_read("1 1 2 0 0 1 0 0 0 0".as_bytes());
        assert!(matches!(result, Err(InputError::ZeroSuccessor)));
    }

    #[test]
    fn dummyless_instance_is_rejected() {
        let result = RcpspInstance::from_read("1 1 1 0 0 0".as_bytes());
        assert!(matches!(result, Err(InputError::TooFewActivities(1))));
    }

    #[test]
    fn trailing_garbage_is_rejected() {
        let text = "1 1 2 0 0 1 2 0 0 0 42";
        let result = RcpspInstance::from_read(text.as_bytes());
        assert!(matches!(result, Err(InputError::TrailingToken(_))));
    }
}
