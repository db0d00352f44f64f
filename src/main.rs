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

//! This is the main entry point of the program. This is what gets compiled
//! to the rcpsp binary.

use std::{path::PathBuf, process::ExitCode, time::{Duration, Instant}};

use clap::Parser;
use log::{error, LevelFilter};
use thiserror::Error;

use rcpsp::{
    verify, Completion, Cutoff, DepthFringe, DhSolver, InputError, ModelError, NoCutoff,
    Project, RcpspInstance, SearchError, SearchStats, TimeBudget, VerifyError,
};

/// An exact solver for the resource-constrained project scheduling problem:
/// schedule the activities of a project under finish-start precedences and
/// renewable-resource capacities so that the project finishes as early as
/// possible.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The choice of algorithm. This binary embeds "dh", the branch-and-bound
    /// procedure of Demeulemeester and Herroelen (1992); the integer
    /// programming formulation lives outside of it.
    #[clap(short, long, default_value = "dh")]
    algorithm: String,
    /// The file containing the problem data.
    #[clap(short, long)]
    data: PathBuf,
    /// Explain the various steps of the algorithm.
    #[clap(short, long)]
    verbose: bool,
    /// How long the solver may keep working on the problem (in seconds).
    /// When the budget runs out, the best schedule found so far is reported.
    #[clap(short, long)]
    time_limit: Option<u64>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("no algorithm '{0}' exists in this binary")]
    UnknownAlgorithm(String),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

fn main() -> ExitCode {
    let args = Args::parse();
    configure_logging(args.verbose);
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose { LevelFilter::Trace } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(level_filter)
        .init();
}

fn run(args: &Args) -> Result<(), RunError> {
    if !args.algorithm.eq_ignore_ascii_case("dh") {
        return Err(RunError::UnknownAlgorithm(args.algorithm.clone()));
    }

    let instance = RcpspInstance::from_path(&args.data)?;
    let project = Project::from_instance(instance)?;

    let cutoff: Box<dyn Cutoff> = match args.time_limit {
        Some(seconds) => Box::new(TimeBudget::new(Duration::from_secs(seconds))),
        None => Box::new(NoCutoff),
    };
    let mut fringe = DepthFringe::new();
    let mut solver = DhSolver::new(&project, cutoff.as_ref(), &mut fringe);

    let start = Instant::now();
    let outcome = solver.minimize()?;
    let duration = start.elapsed();

    let schedule = solver.best_schedule();
    if let Some(schedule) = schedule.as_deref() {
        verify(&project, schedule)?;
    }

    print_solution(args, &outcome, schedule.as_deref(), solver.stats(), duration);
    Ok(())
}

fn print_solution(
    args: &Args,
    completion: &Completion,
    schedule: Option<&[usize]>,
    stats: SearchStats,
    duration: Duration,
) {
    println!("instance : {}", args.data.display());
    println!("status   : {}", status(completion));
    println!("makespan : {}", makespan(completion));
    println!("duration : {:.3}s", duration.as_secs_f32());
    println!("nodes evaluated            : {}", stats.nodes_evaluated);
    println!("nodes LB dominated         : {}", stats.nodes_lb_dominated);
    println!("nodes cutset dominated     : {}", stats.nodes_cutset_dominated);
    println!("nodes left-shift dominated : {}", stats.nodes_leftshift_dominated);
    println!("theorem 3 applied          : {}", stats.theorem3_applied);
    println!("theorem 4 applied          : {}", stats.theorem4_applied);
    println!("finish times :{}", finish_times(schedule));
}

fn status(completion: &Completion) -> &'static str {
    if completion.is_exact {
        "Proved"
    } else {
        "Timeout"
    }
}

fn makespan(completion: &Completion) -> String {
    match completion.best_value {
        Some(value) => value.to_string(),
        None => "no schedule found".to_string(),
    }
}

fn finish_times(schedule: Option<&[usize]>) -> String {
    match schedule {
        None => " none".to_string(),
        Some(times) => times.iter().fold(String::new(), |acc, t| format!("{acc} {t}")),
    }
}
