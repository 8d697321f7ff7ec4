//! End-to-end and property tests (spec §8). Builds `dimacs::Cnf` values
//! directly or by parsing DIMACS text, runs the full `sat::solve`
//! pipeline, and checks the invariants spec.md lists: a SAT verdict's
//! model satisfies every original clause (checked via `sat::verify`),
//! re-running the same input is stable, and BVE on/off and clause/literal
//! reordering never change the SAT/UNSAT verdict.

use cdcl_sat::sat::dimacs::Cnf;
use cdcl_sat::sat::{self, Config, Heuristic, RestartPolicy, SatResult};

fn cnf(num_vars: u32, clauses: Vec<Vec<i32>>) -> Cnf {
    Cnf { num_vars, num_clauses_declared: clauses.len(), clauses }
}

fn is_sat(cnf: &Cnf, config: &Config) -> bool {
    matches!(sat::solve("test", cnf, config, 0.0).result, SatResult::Sat(_))
}

fn solved_model(cnf: &Cnf, config: &Config) -> Option<Vec<bool>> {
    match sat::solve("test", cnf, config, 0.0).result {
        SatResult::Sat(model) => Some(model),
        SatResult::Unsat => None,
    }
}

const ALL_DECIDERS: [Heuristic; 3] = [Heuristic::Vsids, Heuristic::Chb, Heuristic::Lrb];
const ALL_RESTARTERS: [RestartPolicy; 3] = [RestartPolicy::Geometric, RestartPolicy::Luby, RestartPolicy::NoRestart];

fn configs() -> Vec<Config> {
    let mut out = Vec::new();
    for &decider in &ALL_DECIDERS {
        for &restarter in &ALL_RESTARTERS {
            out.push(Config { decider, restarter, bve: false, restart_base: 4.0 });
        }
    }
    out
}

// --- literal CNF end-to-end scenarios (spec §8) ---------------------------

#[test]
fn unit_clause_is_sat() {
    for config in configs() {
        let c = cnf(1, vec![vec![1]]);
        let model = solved_model(&c, &config).expect("expected SAT");
        assert_eq!(model, vec![true]);
    }
}

#[test]
fn a_variable_and_its_negation_is_unsat() {
    for config in configs() {
        let c = cnf(1, vec![vec![1], vec![-1]]);
        assert!(!is_sat(&c, &config));
    }
}

#[test]
fn three_clause_three_var_formula_is_sat() {
    for config in configs() {
        let c = cnf(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]]);
        assert!(is_sat(&c, &config));
    }
}

#[test]
fn xor_encoding_over_two_vars_is_unsat() {
    for config in configs() {
        let c = cnf(3, vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]);
        assert!(!is_sat(&c, &config));
    }
}

#[test]
fn chain_of_implications_is_sat_and_verifies() {
    for config in configs() {
        let c = cnf(4, vec![vec![1, 2], vec![-2, 3], vec![-3, 4]]);
        let result = sat::solve("test", &c, &config, 0.0);
        let model = match result.result {
            SatResult::Sat(m) => m,
            SatResult::Unsat => panic!("expected SAT"),
        };
        assert!(sat::verify::verify(4, &result.original_clauses, &model));
    }
}

fn pigeonhole_3_into_2() -> Cnf {
    // 3 pigeons, 2 holes; var(i, j) = (i - 1) * 2 + j.
    let v = |i: i32, j: i32| (i - 1) * 2 + j;
    let mut clauses = vec![
        vec![v(1, 1), v(1, 2)],
        vec![v(2, 1), v(2, 2)],
        vec![v(3, 1), v(3, 2)],
    ];
    for j in 1..=2 {
        for &(i1, i2) in &[(1, 2), (1, 3), (2, 3)] {
            clauses.push(vec![-v(i1, j), -v(i2, j)]);
        }
    }
    cnf(6, clauses)
}

#[test]
fn pigeonhole_3_into_2_is_unsat_and_terminates() {
    for config in configs() {
        let c = pigeonhole_3_into_2();
        assert!(!is_sat(&c, &config));
    }
}

// --- BVE: enabled/disabled must agree ------------------------------------

#[test]
fn bve_does_not_change_the_verdict() {
    let formulas = vec![
        cnf(1, vec![vec![1]]),
        cnf(1, vec![vec![1], vec![-1]]),
        cnf(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3]]),
        cnf(3, vec![vec![1, 2], vec![-1, 2], vec![1, -2], vec![-1, -2]]),
        pigeonhole_3_into_2(),
    ];

    for c in formulas {
        let off = Config { decider: Heuristic::Vsids, restarter: RestartPolicy::Luby, bve: false, restart_base: 4.0 };
        let on = Config { bve: true, ..off };
        assert_eq!(is_sat(&c, &off), is_sat(&c, &on), "BVE changed the verdict");
    }
}

// --- round-trip: repeat runs and clause/literal reordering ---------------

#[test]
fn repeated_runs_on_the_same_input_agree() {
    let c = pigeonhole_3_into_2();
    let config = Config::default();
    let first = is_sat(&c, &config);
    let second = is_sat(&c, &config);
    assert_eq!(first, second);
}

#[test]
fn reordering_clauses_and_literals_does_not_change_the_verdict() {
    let base = cnf(3, vec![vec![1, 2], vec![-1, 3], vec![-2, -3], vec![1, -2, 3]]);
    let mut reordered = base.clauses.clone();
    reordered.reverse();
    for clause in reordered.iter_mut() {
        clause.reverse();
    }
    let shuffled = cnf(3, reordered);

    let config = Config::default();
    assert_eq!(is_sat(&base, &config), is_sat(&shuffled, &config));
}

// --- DIMACS text parsing round-trips into the same solves ----------------

#[test]
fn parses_dimacs_text_and_solves_it() {
    let text = "c a comment\np cnf 3 3\n1 2 0\n-1 3 0\n-2 -3 0\n";
    let c = sat::dimacs::parse(&mut std::io::Cursor::new(text)).unwrap();
    assert!(is_sat(&c, &Config::default()));
}

// --- bounded, deterministic property fuzz (spec §8 "Property-style fuzz") -

struct Xorshift64(u64);

impl Xorshift64 {
    fn new(seed: u64) -> Self {
        Xorshift64(seed | 1)
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn irand(&mut self, bound: u32) -> u32 {
        (self.next_u64() % bound as u64) as u32
    }
}

fn random_cnf(rng: &mut Xorshift64, n: u32, num_clauses: u32, clause_len: u32) -> Cnf {
    let mut clauses = Vec::with_capacity(num_clauses as usize);
    for _ in 0..num_clauses {
        let mut clause = Vec::with_capacity(clause_len as usize);
        for _ in 0..clause_len {
            let v = 1 + rng.irand(n) as i32;
            let lit = if rng.irand(2) == 0 { v } else { -v };
            if !clause.contains(&lit) {
                clause.push(lit);
            }
        }
        if !clause.is_empty() {
            clauses.push(clause);
        }
    }
    cnf(n, clauses)
}

#[test]
fn fuzzed_formulas_satisfy_their_own_verdict_and_are_stable() {
    let mut rng = Xorshift64::new(0xC0FFEE);
    for _ in 0..40 {
        let n = 3 + rng.irand(6);
        let m = 3 + rng.irand(20);
        let c = random_cnf(&mut rng, n, m, 3);

        let config = Config { decider: Heuristic::Vsids, restarter: RestartPolicy::Luby, bve: false, restart_base: 8.0 };
        let first = sat::solve("fuzz", &c, &config, 0.0);
        if let SatResult::Sat(ref model) = first.result {
            assert!(sat::verify::verify(n, &first.original_clauses, model), "fuzzed model did not satisfy its own clauses");
        }

        let second_sat = is_sat(&c, &config);
        let first_sat = matches!(first.result, SatResult::Sat(_));
        assert_eq!(first_sat, second_sat, "fuzzed formula was not stable across runs");

        let on = Config { bve: true, ..config };
        assert_eq!(first_sat, is_sat(&c, &on), "fuzzed formula disagreed with BVE enabled");
    }
}
