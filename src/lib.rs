#[macro_use]
extern crate log;
use time;

pub mod sat;
pub(crate) mod util;

use std::{fs, io, path};

pub use sat::{Config, ConfigError, Heuristic, RestartPolicy, SatResult, Solved, Stats};

/// Top-level options owned by the CLI (spec §6), not the engine: which
/// file to read, where to write the assignment, and whether to run the
/// verifier afterwards.
pub struct RunOptions {
    pub input_path: path::PathBuf,
    pub results_dir: Option<path::PathBuf>,
    pub run_verifier: bool,
}

/// Reads `options.input_path`, runs the solver with `config`, logs the
/// statistics report, optionally verifies the result against the
/// pre-BVE clause set, and writes the stats/assignment files when a
/// results directory is given (spec §6, SPEC_FULL.md §6).
///
/// Mirrors the teacher's `lib.rs::solve_with` orchestration (parse, time,
/// solve, print, write) generalized to this crate's `Solved`/`Stats`
/// shape instead of minisat's `SolveRes<Solver>`.
pub fn run(options: RunOptions, config: Config) -> io::Result<Solved> {
    let input_file = options.input_path.to_string_lossy().to_string();

    info!("============================[ Problem Statistics ]=============================");

    let read_start = time::precise_time_s();
    let cnf = sat::dimacs::parse_file(&options.input_path)?;
    let read_time = time::precise_time_s() - read_start;

    info!("|  Number of variables:  {:12}", cnf.num_vars);
    info!("|  Number of clauses:    {:12}", cnf.num_clauses_declared);
    info!("|  Parse time:           {:12.6} s", read_time);

    let solved = sat::solve(&input_file, &cnf, &config, read_time);
    sat::stats::log_stats(&solved.stats);

    if options.run_verifier {
        if let SatResult::Sat(ref model) = solved.result {
            let ok = sat::verify::verify(cnf.num_vars, &solved.original_clauses, model);
            if ok {
                info!("verifier: PASS");
            } else {
                error!("verifier: FAIL — model does not satisfy the original clause set");
            }
        }
    }

    if let Some(dir) = &options.results_dir {
        write_results(dir, &options.input_path, &solved)?;
    }

    Ok(solved)
}

/// Writes `Results/stats_<basename>.txt` and, on SAT,
/// `Results/assgn_<basename>.txt`, matching
/// `original_source/hw3/SAT.py::solve`'s naming convention.
fn write_results(dir: &path::Path, input_path: &path::Path, solved: &Solved) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    let case_name = input_path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| "input".to_string());

    let stats_path = dir.join(format!("stats_{}.txt", case_name));
    fs::write(&stats_path, solved.stats.to_string())?;

    if let SatResult::Sat(ref model) = solved.result {
        let assgn_path = dir.join(format!("assgn_{}.txt", case_name));
        let mut buf = Vec::new();
        sat::dimacs::write_model(&mut buf, model)?;
        fs::write(&assgn_path, buf)?;
    }

    Ok(())
}
