use super::decider::Heuristic;
use super::formula::Var;
use super::luby::LubyGenerator;

/// Which conflict-count schedule triggers a restart (spec §4.4).
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum RestartPolicy {
    Geometric,
    Luby,
    NoRestart,
}

/// Arm order fixed to match the original `deciders = ["LRB", "CHB",
/// "VSIDS"]` list in `original_source/hw3/restarter.py`, so that a
/// `last_arm` index persists its meaning across runs.
const ARMS: [Heuristic; 3] = [Heuristic::Lrb, Heuristic::Chb, Heuristic::Vsids];

fn arm_index(h: Heuristic) -> usize {
    ARMS.iter().position(|&a| a == h).unwrap()
}

/// Counts conflicts towards a restart and, when one fires, picks the
/// next branching heuristic via a UCB1 multi-armed bandit (spec §4.4).
/// Grounded on `original_source/hw3/restarter.py::Restarter`; the
/// teacher's `search/mod.rs::RestartStrategy` only covers the
/// Luby/geometric schedule (no bandit), so `choose()` is new structure
/// built from the Python original in the teacher's `struct`-plus-plain-
/// methods style rather than adapted line-for-line.
pub struct Restarter {
    policy: RestartPolicy,
    conflicts_count: u64,
    conflict_limit: u64,
    limit_mult: u64,
    luby: LubyGenerator,

    counts: [u64; 3],
    expected_reward: [f64; 3],
    last_arm: usize,
    num_restarts: u64,

    decisions: u64,
    decided_vars: Vec<Var>,
}

impl Restarter {
    pub fn new(policy: RestartPolicy, initial: Heuristic, base: f64) -> Self {
        let mut luby = LubyGenerator::new(base);
        let conflict_limit = match policy {
            RestartPolicy::Geometric => base as u64,
            RestartPolicy::Luby => luby.next() as u64,
            RestartPolicy::NoRestart => 0,
        };

        Restarter {
            policy,
            conflicts_count: 0,
            conflict_limit,
            limit_mult: 2,
            luby,
            counts: [0; 3],
            expected_reward: [0.0; 3],
            last_arm: arm_index(initial),
            num_restarts: 0,
            decisions: 0,
            decided_vars: Vec::new(),
        }
    }

    /// Records that `v` was just decided (not propagated), feeding the
    /// UCB reward computed at the next restart.
    pub fn note_decision(&mut self, v: Var) {
        self.decisions += 1;
        if !self.decided_vars.contains(&v) {
            self.decided_vars.push(v);
        }
    }

    pub fn incre_conflict(&mut self) {
        if self.policy == RestartPolicy::NoRestart {
            return;
        }
        self.conflicts_count += 1;
    }

    pub fn get_restart_flag(&mut self) -> bool {
        if self.policy == RestartPolicy::NoRestart {
            return false;
        }
        if self.conflicts_count < self.conflict_limit {
            return false;
        }

        self.conflicts_count = 0;
        match self.policy {
            RestartPolicy::Geometric => self.conflict_limit *= self.limit_mult,
            RestartPolicy::Luby => self.conflict_limit = self.luby.next() as u64,
            RestartPolicy::NoRestart => {}
        }
        true
    }

    /// Picks the next heuristic via UCB1. Per SPEC_FULL.md §9(iii), the
    /// reward/arm update is skipped on the very first restart (no
    /// decision has been made yet, so `decided_vars` is empty and the
    /// reward would divide by zero); the arm otherwise stays unchanged
    /// until the first update has data to act on.
    pub fn choose(&mut self) -> Heuristic {
        self.num_restarts += 1;

        if !self.decided_vars.is_empty() {
            let r = (self.decisions as f64).log2() / (self.decided_vars.len() as f64);

            let last = self.last_arm;
            self.expected_reward[last] +=
                (1.0 / (self.counts[last] as f64 + 1.0)) * (r - self.expected_reward[last]);
            self.counts[last] += 1;
        }

        self.decisions = 0;
        self.decided_vars.clear();

        let mut best = 0;
        let mut best_score = f64::NEG_INFINITY;
        for i in 0..3 {
            let ucb = self.expected_reward[i]
                + (4.0 * ((self.num_restarts + 1) as f64 / (self.counts[i] as f64 + 1.0)).ln()).sqrt();
            if ucb > best_score {
                best_score = ucb;
                best = i;
            }
        }
        self.last_arm = best;
        ARMS[best]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometric_doubles_the_limit_on_each_restart() {
        let mut r = Restarter::new(RestartPolicy::Geometric, Heuristic::Vsids, 4.0);
        assert_eq!(r.conflict_limit, 4);
        for _ in 0..4 {
            r.incre_conflict();
        }
        assert!(r.get_restart_flag());
        assert_eq!(r.conflict_limit, 8);
        assert!(!r.get_restart_flag());
    }

    #[test]
    fn no_restart_never_fires() {
        let mut r = Restarter::new(RestartPolicy::NoRestart, Heuristic::Vsids, 4.0);
        for _ in 0..1000 {
            r.incre_conflict();
        }
        assert!(!r.get_restart_flag());
    }

    #[test]
    fn luby_schedule_uses_generator_sequence() {
        let mut r = Restarter::new(RestartPolicy::Luby, Heuristic::Chb, 1.0);
        assert_eq!(r.conflict_limit, 1);
        r.incre_conflict();
        assert!(r.get_restart_flag());
        assert_eq!(r.conflict_limit, 1);
        r.incre_conflict();
        assert!(r.get_restart_flag());
        assert_eq!(r.conflict_limit, 2);
    }

    #[test]
    fn choose_skips_reward_update_on_first_restart_with_no_decisions() {
        let mut r = Restarter::new(RestartPolicy::Geometric, Heuristic::Vsids, 4.0);
        let h = r.choose();
        assert_eq!(r.counts, [0, 0, 0]);
        assert_eq!(h, ARMS[r.last_arm]);
    }

    #[test]
    fn choose_updates_last_arm_reward_when_decisions_were_made() {
        let mut r = Restarter::new(RestartPolicy::Geometric, Heuristic::Vsids, 4.0);
        r.note_decision(Var::new(1));
        r.note_decision(Var::new(2));
        let before = r.last_arm;
        r.choose();
        assert_eq!(r.counts[before], 1);
    }
}
