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

//! This module provides the cutoff heuristics that can bound the resolution.
//! The solver consults the cutoff between two node selections only, so a
//! firing cutoff never leaves partially applied state behind: the search
//! simply stops and reports the best schedule found so far.

use std::{sync::{atomic::AtomicBool, Arc}, time::Duration};

/// A cutoff heuristic decides when the solver should stop working on the
/// problem even though optimality has not been proved yet.
pub trait Cutoff {
    fn must_stop(&self) -> bool;
}

/// _This is the default cutoff heuristic._ It imposes that the search proves
/// optimality before it stops.
#[derive(Debug, Default, Copy, Clone)]
pub struct NoCutoff;
impl Cutoff for NoCutoff {
    fn must_stop(&self) -> bool {
        false
    }
}

/// This cutoff allows one to specify a maximum time budget to solve the
/// problem. Once the time budget is elapsed, the search stops and the best
/// schedule that has been found (so far) is returned.
#[derive(Debug, Clone)]
pub struct TimeBudget {
    stop: Arc<AtomicBool>,
}

impl TimeBudget {
    pub fn new(budget: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let t_flag = Arc::clone(&stop);

        // timer
        std::thread::spawn(move || {
            std::thread::sleep(budget);
            t_flag.store(true, std::sync::atomic::Ordering::Relaxed);
        });

        TimeBudget { stop }
    }
}

impl Cutoff for TimeBudget {
    fn must_stop(&self) -> bool {
        self.stop.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::*;

    #[test]
    fn no_cutoff_never_stops() {
        let cutoff = NoCutoff;
        assert!(!cutoff.must_stop());
    }

    #[test]
    fn time_budget_stops_only_once_elapsed() {
        let cutoff = TimeBudget::new(Duration::from_millis(100));
        assert!(!cutoff.must_stop());
        thread::sleep(Duration::from_millis(300));
        assert!(cutoff.must_stop());
    }
}
