//! Run statistics (SPEC_FULL.md §4.7), accumulated around a single
//! `Engine::solve()` call and rendered through the `log` facade, matching
//! the teacher's `lib.rs::print_stats` pattern rather than the Python
//! original's direct `print()` calls. Field names follow
//! `original_source/code/utils.py::Statistics`, translated from its
//! leading-underscore convention to plain snake_case; timings are wall-clock
//! seconds from `time::precise_time_s()`, the same clock the teacher uses
//! throughout `lib.rs`/`search/mod.rs`.

use std::fmt;

use log::info;

use super::bve::BveStats;

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeBreakdown {
    pub bcp: f64,
    pub decide: f64,
    pub analyze: f64,
    pub backtrack: f64,
}

#[derive(Clone, Debug)]
pub struct Stats {
    pub input_file: String,
    pub num_vars: u32,
    pub num_orig_clauses: usize,
    pub num_stored_clauses: usize,
    pub read_time: f64,
    pub bve_stats: Option<BveStats>,
    pub bve_time: f64,
    pub restarts: u64,
    pub learned_clauses: u64,
    pub decisions: u64,
    pub implications: u64,
    pub total_time: f64,
    pub breakdown: TimeBreakdown,
    pub result: &'static str,
    pub memory_used_kb: Option<usize>,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "=========================== STATISTICS ===========================")?;
        writeln!(f, "Solving formula from file: {}", self.input_file)?;
        writeln!(
            f,
            "Vars: {}, Original Clauses: {}, Finally Stored Clauses: {}",
            self.num_vars, self.num_orig_clauses, self.num_stored_clauses
        )?;
        writeln!(f, "Input Reading Time: {:.6} s", self.read_time)?;
        if let Some(bve) = self.bve_stats {
            writeln!(f, "--------------- Preprocessing ----------------")?;
            writeln!(f, "Vars eliminated: {}", bve.vars_eliminated)?;
            writeln!(f, "Original clauses deleted: {}", bve.clauses_removed)?;
            writeln!(f, "New clauses added: {}", bve.clauses_added)?;
            writeln!(f, "BVE time: {:.6} s", self.bve_time)?;
        }
        writeln!(f, "-------------------------------")?;
        writeln!(f, "Restarts: {}", self.restarts)?;
        writeln!(f, "Learned clauses: {}", self.learned_clauses)?;
        writeln!(f, "Decisions made: {}", self.decisions)?;
        writeln!(f, "Implications made: {}", self.implications)?;
        writeln!(f, "Time taken: {:.6} s", self.total_time)?;
        writeln!(f, "----------- Time breakup ----------------------")?;
        writeln!(f, "BCP Time: {:.6} s", self.breakdown.bcp)?;
        writeln!(f, "Decide Time: {:.6} s", self.breakdown.decide)?;
        writeln!(f, "Conflict Analyze Time: {:.6} s", self.breakdown.analyze)?;
        writeln!(f, "Backtrack Time: {:.6} s", self.breakdown.backtrack)?;
        if let Some(kb) = self.memory_used_kb {
            writeln!(f, "Memory used: {:.2} MB", kb as f64 / 1024.0)?;
        }
        writeln!(f, "-------------------------------")?;
        write!(f, "RESULT: {}", self.result)
    }
}

/// Renders the report through `log::info!`, one line per call, the way
/// the teacher's `lib.rs::print_stats` emits the problem-statistics
/// banner line by line instead of one multi-line `println!`.
pub fn log_stats(stats: &Stats) {
    for line in stats.to_string().lines() {
        info!("{}", line);
    }
}
