use super::formula::{Var, VarMap};
use super::pqueue::PQueue;

/// One of the three plug-compatible branching heuristics (spec §4.3).
/// Grounded on `original_source/hw3/decider.py` and `hw3/SAT.py`'s
/// `sat_decider`, whose three parallel score tables and single active
/// queue this mirrors; the teacher's `DecisionHeuristic` only ever runs
/// one scheme (VSIDS-ish activity), so the multi-heuristic bandit switch
/// here is new structure grown from the Python original rather than
/// adapted from the teacher.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Heuristic {
    Vsids,
    Chb,
    Lrb,
}

/// The active priority queue's key space differs per heuristic: VSIDS
/// ranges over literals (so a variable's two polarities compete
/// independently), CHB and LRB range over variables (the decider keeps
/// a separate phase bit instead).
enum ActiveQueue {
    Vsids(PQueue<super::formula::Lit>),
    ByVar(PQueue<Var>),
}

pub struct Decider {
    n: u32,
    heuristic: Heuristic,
    queue: ActiveQueue,

    vsids_score: VarMap<(f64, f64)>, // (pos_lit score, neg_lit score), indexed by var for storage convenience
    vsids_incr: f64,

    chb_score: VarMap<f64>,
    chb_alpha: f64,
    chb_phase: VarMap<bool>,
    last_conflict: VarMap<u64>,
    num_conflicts: u64,

    lrb_score: VarMap<f64>,
    lrb_alpha: f64,
    lrb_phase: VarMap<bool>,
    learnt_counter: u64,
    assigned: VarMap<u64>,
    participated: VarMap<u64>,
    reasoned: VarMap<u64>,

    plays: Vec<Var>,
}

/// Per-literal occurrence counts over the input clauses, used to seed
/// VSIDS (spec §4.3: "occurrence count of `lit` over all input clauses").
pub fn literal_occurrences(n: u32, clauses: &[Vec<super::formula::Lit>]) -> VarMap<(f64, f64)> {
    let mut counts = VarMap::new();
    for i in 1..=n {
        counts.insert(&Var::new(i), (0.0, 0.0));
    }
    for clause in clauses {
        for &lit in clause {
            let v = lit.var(n);
            let (mut pos, mut neg) = *counts.get(&v).unwrap();
            if lit.is_negated(n) {
                neg += 1.0;
            } else {
                pos += 1.0;
            }
            counts.insert(&v, (pos, neg));
        }
    }
    counts
}

impl Decider {
    pub fn new(initial: Heuristic, n: u32, vsids_init: VarMap<(f64, f64)>) -> Self {
        let mut chb_score = VarMap::new();
        let mut chb_phase = VarMap::new();
        let mut last_conflict = VarMap::new();
        let mut lrb_score = VarMap::new();
        let mut lrb_phase = VarMap::new();
        let mut assigned = VarMap::new();
        let mut participated = VarMap::new();
        let mut reasoned = VarMap::new();

        for i in 1..=n {
            let v = Var::new(i);
            chb_score.insert(&v, 0.0);
            chb_phase.insert(&v, false);
            last_conflict.insert(&v, 0);
            lrb_score.insert(&v, 0.0);
            lrb_phase.insert(&v, false);
            assigned.insert(&v, 0);
            participated.insert(&v, 0);
            reasoned.insert(&v, 0);
        }

        let queue = Self::build_queue(initial, n, &vsids_init, &chb_score, &lrb_score);

        Decider {
            n,
            heuristic: initial,
            queue,
            vsids_score: vsids_init,
            vsids_incr: 1.0,
            chb_score,
            chb_alpha: 0.4,
            chb_phase,
            last_conflict,
            num_conflicts: 0,
            lrb_score,
            lrb_alpha: 0.4,
            lrb_phase,
            learnt_counter: 0,
            assigned,
            participated,
            reasoned,
            plays: Vec::new(),
        }
    }

    fn build_queue(
        heuristic: Heuristic,
        n: u32,
        vsids_score: &VarMap<(f64, f64)>,
        chb_score: &VarMap<f64>,
        lrb_score: &VarMap<f64>,
    ) -> ActiveQueue {
        match heuristic {
            Heuristic::Vsids => {
                let mut entries = Vec::with_capacity((2 * n) as usize);
                for i in 1..=n {
                    let v = Var::new(i);
                    let (pos, neg) = *vsids_score.get(&v).unwrap();
                    entries.push((v.pos_lit(), pos));
                    entries.push((v.neg_lit(n), neg));
                }
                ActiveQueue::Vsids(PQueue::build(entries))
            }
            Heuristic::Chb => {
                let entries = (1..=n).map(|i| { let v = Var::new(i); (v, *chb_score.get(&v).unwrap()) }).collect();
                ActiveQueue::ByVar(PQueue::build(entries))
            }
            Heuristic::Lrb => {
                let entries = (1..=n).map(|i| { let v = Var::new(i); (v, *lrb_score.get(&v).unwrap()) }).collect();
                ActiveQueue::ByVar(PQueue::build(entries))
            }
        }
    }

    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Pops the top candidate. Returns `None` when every variable is
    /// assigned (search is complete).
    pub fn decide(&mut self) -> Option<(Var, bool)> {
        match &mut self.queue {
            ActiveQueue::Vsids(q) => {
                let lit = q.pop_max()?;
                let v = lit.var(self.n);
                let value = !lit.is_negated(self.n);
                q.remove(lit.negate(self.n));
                Some((v, value))
            }
            ActiveQueue::ByVar(q) => {
                let v = q.pop_max()?;
                let value = match self.heuristic {
                    Heuristic::Chb => *self.chb_phase.get(&v).unwrap(),
                    Heuristic::Lrb => *self.lrb_phase.get(&v).unwrap(),
                    Heuristic::Vsids => unreachable!(),
                };
                Some((v, value))
            }
        }
    }

    /// Withdraws `v` before search begins: a level-0 unit propagation.
    pub fn unary_update(&mut self, v: Var) {
        match &mut self.queue {
            ActiveQueue::Vsids(q) => {
                q.remove(v.pos_lit());
                q.remove(v.neg_lit(self.n));
            }
            ActiveQueue::ByVar(q) => q.remove(v),
        }
    }

    /// `v` was just implied by BCP with the given value.
    pub fn bcp_update(&mut self, v: Var, value: bool) {
        match &mut self.queue {
            ActiveQueue::Vsids(q) => {
                q.remove(v.pos_lit());
                q.remove(v.neg_lit(self.n));
            }
            ActiveQueue::ByVar(q) => q.remove(v),
        }
        self.chb_phase.insert(&v, value);
        self.lrb_phase.insert(&v, value);
        self.assigned.insert(&v, self.learnt_counter);
        self.participated.insert(&v, 0);
        self.reasoned.insert(&v, 0);
    }

    /// A conflict was just analyzed to completion: `learned_clause` is
    /// the asserting clause, `uip_var` its first-UIP variable,
    /// `conflict_side_vars` the variables resolved away along the way,
    /// `reason_vars` every variable appearing in a reason clause that
    /// was consulted during resolution (spec §4.3's "reason-side-rate
    /// extension", grounded on `SAT.py::_analyze_conflict`'s `reasons`
    /// accumulation).
    pub fn conflict_update(
        &mut self,
        learned_clause: &[super::formula::Lit],
        uip_var: Var,
        conflict_side_vars: &[Var],
        reason_vars: &[Var],
    ) {
        let n = self.n;
        for &lit in learned_clause {
            let v = lit.var(n);
            let (mut pos, mut neg) = *self.vsids_score.get(&v).unwrap();
            if lit.is_negated(n) {
                neg += self.vsids_incr;
            } else {
                pos += self.vsids_incr;
            }
            self.vsids_score.insert(&v, (pos, neg));
            if let ActiveQueue::Vsids(q) = &mut self.queue {
                q.increase(lit, self.vsids_incr);
            }
            self.last_conflict.insert(&v, self.num_conflicts);
        }

        self.num_conflicts += 1;
        self.learnt_counter += 1;
        self.chb_alpha = f64::max(0.06, self.chb_alpha - 1e-6);
        self.lrb_alpha = f64::max(0.06, self.lrb_alpha - 1e-6);
        self.vsids_incr += 0.75;

        let learned_vars: Vec<Var> = learned_clause.iter().map(|l| l.var(n)).collect();

        for &v in conflict_side_vars.iter().chain(learned_vars.iter()) {
            let p = self.participated.get(&v).copied().unwrap_or(0);
            self.participated.insert(&v, p + 1);
        }
        for &v in reason_vars {
            if !learned_vars.contains(&v) {
                let r = self.reasoned.get(&v).copied().unwrap_or(0);
                self.reasoned.insert(&v, r + 1);
            }
        }

        self.plays.clear();
        self.plays.push(uip_var);
    }

    /// Folds `propagated_vars` into the current "plays" set and applies
    /// the CHB reward update (spec §4.3).
    pub fn chb_update(&mut self, propagated_vars: &[Var], in_conflict: bool) {
        for &v in propagated_vars {
            if !self.plays.contains(&v) {
                self.plays.push(v);
            }
        }

        let m = if in_conflict { 1.0 } else { 0.9 };
        for &v in &self.plays {
            let last = *self.last_conflict.get(&v).unwrap();
            let r = m / ((self.num_conflicts as f64) - (last as f64) + 1.0);
            let score = *self.chb_score.get(&v).unwrap();
            let delta = self.chb_alpha * (r - score);
            self.chb_score.insert(&v, score + delta);
            if let ActiveQueue::ByVar(q) = &mut self.queue {
                if self.heuristic == Heuristic::Chb {
                    q.increase(v, delta);
                }
            }
        }
    }

    /// Unassigned `vars` are re-added to the active queue (restart or
    /// backjump), and the LRB score of each is refreshed (spec §4.3).
    pub fn backtrack_update(&mut self, unassigned_vars: &[Var], _restart_flag: bool) {
        for &v in unassigned_vars {
            let (pos, neg) = *self.vsids_score.get(&v).unwrap();
            match &mut self.queue {
                ActiveQueue::Vsids(q) => {
                    q.add(v.pos_lit(), pos);
                    q.add(v.neg_lit(self.n), neg);
                }
                ActiveQueue::ByVar(q) => {
                    let score = match self.heuristic {
                        Heuristic::Chb => *self.chb_score.get(&v).unwrap(),
                        Heuristic::Lrb => *self.lrb_score.get(&v).unwrap(),
                        Heuristic::Vsids => unreachable!(),
                    };
                    q.add(v, score);
                }
            }

            let assigned_at = *self.assigned.get(&v).unwrap();
            let interval = self.learnt_counter.saturating_sub(assigned_at);
            if interval > 0 {
                let participated = *self.participated.get(&v).unwrap() as f64;
                let reasoned = *self.reasoned.get(&v).unwrap() as f64;
                let r = participated / (interval as f64);
                let rsr = reasoned / (interval as f64);
                let score = *self.lrb_score.get(&v).unwrap();
                let delta = self.lrb_alpha * (r + rsr - score);
                self.lrb_score.insert(&v, score + delta);
                if let ActiveQueue::ByVar(q) = &mut self.queue {
                    if self.heuristic == Heuristic::Lrb {
                        q.increase(v, delta);
                    }
                }
            }
        }
    }

    /// Switches the active heuristic, rebuilding its queue from the
    /// preserved score table. A no-op when `new` is already active
    /// (spec §4.3).
    pub fn change_heuristic(&mut self, new: Heuristic) {
        if new == self.heuristic {
            return;
        }
        self.heuristic = new;
        self.queue = Self::build_queue(new, self.n, &self.vsids_score, &self.chb_score, &self.lrb_score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::formula::Lit;

    fn seed(n: u32) -> VarMap<(f64, f64)> {
        let mut m = VarMap::new();
        for i in 1..=n {
            m.insert(&Var::new(i), (0.0, 0.0));
        }
        m
    }

    #[test]
    fn decide_withdraws_both_polarities_under_vsids() {
        let mut scores = seed(2);
        scores.insert(&Var::new(1), (5.0, 1.0));
        let mut d = Decider::new(Heuristic::Vsids, 2, scores);
        let (v, value) = d.decide().unwrap();
        assert_eq!(v, Var::new(1));
        assert!(value);
        if let ActiveQueue::Vsids(q) = &d.queue {
            assert!(!q.contains(&Var::new(1).pos_lit()));
            assert!(!q.contains(&Var::new(1).neg_lit(2)));
        } else {
            panic!("expected vsids queue");
        }
    }

    #[test]
    fn bcp_update_removes_variable_from_active_queue() {
        let mut d = Decider::new(Heuristic::Chb, 3, seed(3));
        d.bcp_update(Var::new(2), true);
        if let ActiveQueue::ByVar(q) = &d.queue {
            assert!(!q.contains(&Var::new(2)));
        } else {
            panic!("expected by-var queue");
        }
    }

    #[test]
    fn conflict_update_bumps_vsids_scores_and_grows_increment() {
        let mut d = Decider::new(Heuristic::Vsids, 2, seed(2));
        let before = d.vsids_incr;
        d.conflict_update(&[Lit::from_dimacs(1, 2)], Var::new(1), &[], &[]);
        assert_eq!(d.vsids_incr, before + 0.75);
        assert_eq!(d.vsids_score.get(&Var::new(1)).unwrap().0, 1.0);
    }

    #[test]
    fn change_heuristic_rebuilds_queue_and_is_noop_for_same_choice() {
        let mut d = Decider::new(Heuristic::Vsids, 2, seed(2));
        d.change_heuristic(Heuristic::Chb);
        assert_eq!(d.heuristic(), Heuristic::Chb);
        d.change_heuristic(Heuristic::Chb);
        assert_eq!(d.heuristic(), Heuristic::Chb);
    }

    #[test]
    fn backtrack_update_readds_removed_vars() {
        let mut d = Decider::new(Heuristic::Chb, 2, seed(2));
        d.bcp_update(Var::new(1), true);
        d.backtrack_update(&[Var::new(1)], false);
        if let ActiveQueue::ByVar(q) = &d.queue {
            assert!(q.contains(&Var::new(1)));
        } else {
            panic!("expected by-var queue");
        }
    }
}
