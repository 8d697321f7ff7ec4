//! The CDCL SAT solver crate's core (spec §1-§2). `dimacs` and the CLI
//! layer above this module are the external collaborators of spec §6;
//! everything else here is the tightly-coupled search engine and its
//! plug-compatible heuristics.

pub mod bve;
pub mod clause;
pub mod decider;
pub mod dimacs;
pub mod engine;
pub mod formula;
pub mod luby;
pub mod pqueue;
pub mod restarter;
pub mod stats;
pub mod verify;

use time;

use formula::Lit;

pub use decider::Heuristic;
pub use engine::{Counters, Engine, SatResult};
pub use restarter::RestartPolicy;
pub use stats::{Stats, TimeBreakdown};

/// Restart base used by both the geometric and Luby schedules when none
/// is given explicitly, matching `original_source/hw3/restarter.py`'s
/// `Restarter.__init__`'s own default (`base=1024`).
pub const DEFAULT_RESTART_BASE: f64 = 1024.0;

/// Invalid configuration (spec §7): an unknown decider or restarter name.
/// Raised at construction, before the engine is built.
#[derive(Debug, Clone)]
pub struct ConfigError(pub String);

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "invalid configuration: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}

pub fn parse_decider(s: &str) -> Result<Heuristic, ConfigError> {
    match s {
        "VSIDS" => Ok(Heuristic::Vsids),
        "CHB" => Ok(Heuristic::Chb),
        "LRB" => Ok(Heuristic::Lrb),
        other => Err(ConfigError(format!(
            "decider must be one of VSIDS, CHB, LRB (got {:?})",
            other
        ))),
    }
}

pub fn parse_restarter(s: &str) -> Result<RestartPolicy, ConfigError> {
    match s {
        "GEOMETRIC" => Ok(RestartPolicy::Geometric),
        "LUBY" => Ok(RestartPolicy::Luby),
        "NO_RESTART" => Ok(RestartPolicy::NoRestart),
        other => Err(ConfigError(format!(
            "restarter must be one of GEOMETRIC, LUBY, NO_RESTART (got {:?})",
            other
        ))),
    }
}

/// The solver's tunables (spec §6 CLI surface, minus `-i`/`-t` which are
/// CLI-only concerns with no engine-side effect).
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub decider: Heuristic,
    pub restarter: RestartPolicy,
    pub bve: bool,
    pub restart_base: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            decider: Heuristic::Vsids,
            restarter: RestartPolicy::Luby,
            bve: false,
            restart_base: DEFAULT_RESTART_BASE,
        }
    }
}

/// Outcome of a solve, paired with the pre-BVE clause set the CLI's
/// verifier needs (spec §6 "Verifier <- Engine").
pub struct Solved {
    pub result: SatResult,
    pub stats: Stats,
    pub original_clauses: Vec<Vec<Lit>>,
}

/// Builds the engine from a parsed DIMACS problem and runs it to
/// completion, assembling the statistics report (SPEC_FULL.md §4.7)
/// around the call. `read_time` is supplied by the caller since DIMACS
/// parsing happens outside the engine (spec §6 "Reader -> Engine").
pub fn solve(input_file: &str, cnf: &dimacs::Cnf, config: &Config, read_time: f64) -> Solved {
    let n = cnf.num_vars;
    let raw_clauses: Vec<Vec<Lit>> = cnf
        .clauses
        .iter()
        .map(|clause| clause.iter().map(|&x| Lit::from_dimacs(x, n)).collect())
        .collect();
    let original_clauses = raw_clauses.clone();

    let bve_start = time::precise_time_s();
    let engine = Engine::new(n, raw_clauses, config.decider, config.restarter, config.restart_base, config.bve);
    let bve_time = if config.bve { time::precise_time_s() - bve_start } else { 0.0 };

    let total_start = time::precise_time_s();
    let (result, counters, bve_stats, breakdown, num_stored) = match engine {
        None => (SatResult::Unsat, Counters::default(), None, TimeBreakdown::default(), 0),
        Some(mut engine) => {
            let result = engine.solve();
            (result, engine.counters(), engine.bve_stats(), engine.time_breakdown(), cnf.clauses.len())
        }
    };
    let total_time = time::precise_time_s() - total_start + bve_time;

    let stats = Stats {
        input_file: input_file.to_string(),
        num_vars: n,
        num_orig_clauses: cnf.num_clauses_declared,
        num_stored_clauses: num_stored,
        read_time,
        bve_stats,
        bve_time,
        restarts: counters.restarts,
        learned_clauses: counters.learned_clauses,
        decisions: counters.decisions,
        implications: counters.propagations,
        total_time,
        breakdown,
        result: match result {
            SatResult::Sat(_) => "SAT",
            SatResult::Unsat => "UNSAT",
        },
        memory_used_kb: crate::util::mem_used_peak(),
    };

    Solved { result, stats, original_clauses }
}
