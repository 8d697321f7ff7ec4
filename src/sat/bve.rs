use super::formula::{Lit, Var};

/// Resolution is skipped for a variable once `|S+| + |S-|` exceeds this
/// bound (spec §4.5). Named per SPEC_FULL.md §9(ii).
pub const BVE_RESOLVENT_BOUND: usize = 6;

/// Statistics surfaced to `Stats`/`print_stats` (SPEC_FULL.md §4.7),
/// mirroring `original_source/code/utils.py::Statistics`'s `_bve_*`
/// fields.
#[derive(Default, Clone, Copy, Debug)]
pub struct BveStats {
    pub vars_eliminated: u64,
    pub clauses_removed: u64,
    pub clauses_added: u64,
}

/// Resolves `c1` and `c2` on `v`, dropping the shared `v`/`not v`
/// literal pair. Returns `None` if the resolvent is tautological (it
/// contains both a literal and its negation), matching the teacher's
/// `formula::util::merge`, generalized from 2v/2v+1-encoded `Lit` to
/// this crate's `v`/`v+n` encoding.
pub(crate) fn resolve(n: u32, v: Var, c1: &[Lit], c2: &[Lit]) -> Option<Vec<Lit>> {
    let mut out = Vec::with_capacity(c1.len() + c2.len());

    for &lit in c1 {
        if lit.var(n) != v {
            out.push(lit);
        }
    }

    for &lit in c2 {
        let lv = lit.var(n);
        if lv == v {
            continue;
        }
        if out.iter().any(|&l| l == lit.negate(n)) {
            return None;
        }
        if !out.contains(&lit) {
            out.push(lit);
        }
    }

    Some(out)
}

/// Bounded Variable Elimination, run once before watch-list
/// initialization (spec §4.5). `clauses` holds every clause still live
/// (size >= 2; unit clauses have already been turned into level-0
/// assignments by the caller). `assigned` marks variables the caller
/// has already fixed at level 0, which BVE must leave alone.
///
/// `original_source/code/utils.py`'s `Statistics` fields and
/// `hw3/solver.py`'s `-b/--bve` flag establish that the original solver
/// runs a resolvent-counting elimination pass and reports exactly these
/// counters, though neither file carries the loop itself; the standard
/// resolution-bound formulation those fields describe is rebuilt here
/// in the teacher's flat-`Vec`-of-clauses style rather than the
/// teacher's own `simp`/`elim_queue` subsumption machinery, since this
/// spec's BVE is a single resolution-bound pass, not general
/// subsumption-driven elimination.
pub fn eliminate(n: u32, clauses: &mut Vec<Vec<Lit>>, assigned: &[bool]) -> BveStats {
    let mut stats = BveStats::default();

    for i in 1..=n {
        let v = Var::new(i);
        if assigned[(i - 1) as usize] {
            continue;
        }

        let mut pos_idx = Vec::new();
        let mut neg_idx = Vec::new();
        for (idx, clause) in clauses.iter().enumerate() {
            for &lit in clause {
                if lit.var(n) == v {
                    if lit.is_negated(n) {
                        neg_idx.push(idx);
                    } else {
                        pos_idx.push(idx);
                    }
                    break;
                }
            }
        }

        if pos_idx.is_empty() && neg_idx.is_empty() {
            continue;
        }
        if pos_idx.len() + neg_idx.len() > BVE_RESOLVENT_BOUND {
            continue;
        }

        let mut resolvents = Vec::new();
        for &pi in &pos_idx {
            for &ni in &neg_idx {
                if let Some(r) = resolve(n, v, &clauses[pi], &clauses[ni]) {
                    resolvents.push(r);
                }
            }
        }

        if resolvents.len() <= pos_idx.len() + neg_idx.len() {
            let mut touched: Vec<usize> = pos_idx.iter().chain(neg_idx.iter()).copied().collect();
            touched.sort_unstable();
            touched.dedup();

            stats.vars_eliminated += 1;
            stats.clauses_removed += touched.len() as u64;
            stats.clauses_added += resolvents.len() as u64;

            for &idx in touched.iter().rev() {
                clauses.remove(idx);
            }
            clauses.extend(resolvents);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: u32, x: i32) -> Lit {
        Lit::from_dimacs(x, n)
    }

    #[test]
    fn eliminates_a_variable_when_resolvents_do_not_grow_clause_count() {
        let n = 3;
        // (x1 or x2) and (!x1 or x3): eliminating x1 yields (x2 or x3),
        // one clause replacing two.
        let mut clauses = vec![
            vec![lit(n, 1), lit(n, 2)],
            vec![lit(n, -1), lit(n, 3)],
        ];
        let assigned = vec![false; 3];
        let stats = eliminate(n, &mut clauses, &assigned);
        assert_eq!(stats.vars_eliminated, 1);
        assert_eq!(clauses.len(), 1);
        assert!(clauses[0].contains(&lit(n, 2)));
        assert!(clauses[0].contains(&lit(n, 3)));
    }

    #[test]
    fn skips_a_variable_above_the_resolvent_bound() {
        let n = 2;
        let mut clauses: Vec<Vec<Lit>> = (0..4).map(|_| vec![lit(n, 1), lit(n, 2)]).collect();
        clauses.extend((0..4).map(|_| vec![lit(n, -1), lit(n, 2)]));
        let before = clauses.len();
        let assigned = vec![false; 2];
        let stats = eliminate(n, &mut clauses, &assigned);
        assert_eq!(stats.vars_eliminated, 0);
        assert_eq!(clauses.len(), before);
    }

    #[test]
    fn drops_tautological_resolvents() {
        let n = 3;
        // (x1 or x2) and (!x1 or !x2): resolving on x1 is tautological
        // (x2 or !x2), so no resolvent survives and the variable is cut
        // away entirely.
        let mut clauses = vec![
            vec![lit(n, 1), lit(n, 2)],
            vec![lit(n, -1), lit(n, -2)],
        ];
        let assigned = vec![false; 3];
        let stats = eliminate(n, &mut clauses, &assigned);
        assert_eq!(stats.vars_eliminated, 1);
        assert_eq!(clauses.len(), 0);
    }

    #[test]
    fn leaves_already_assigned_variables_alone() {
        let n = 2;
        let mut clauses = vec![vec![lit(n, 1), lit(n, 2)], vec![lit(n, -1), lit(n, 2)]];
        let assigned = vec![true, false];
        let stats = eliminate(n, &mut clauses, &assigned);
        assert_eq!(stats.vars_eliminated, 0);
        assert_eq!(clauses.len(), 2);
    }
}
