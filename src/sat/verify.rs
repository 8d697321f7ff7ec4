//! Post-hoc solution verifier (spec §6 "Verifier <- Engine", SPEC_FULL.md
//! §4.8). Grounded on `original_source/code/utils.py::Test::test_correctness`:
//! every original clause must have at least one literal satisfied under
//! the returned model. `test_rep_assign`'s invariant (no variable carries
//! two live assignments) is enforced structurally here by `model`'s shape
//! (one `bool` per variable) rather than re-derived by counting.

use super::formula::Lit;

/// Checks that every clause in `original_clauses` (the pre-BVE clause
/// set, spec §6) contains at least one literal true under `model`
/// (`model[i]` is the value of variable `i + 1`).
pub fn verify(n: u32, original_clauses: &[Vec<Lit>], model: &[bool]) -> bool {
    debug_assert_eq!(model.len(), n as usize);
    original_clauses.iter().all(|clause| {
        clause.iter().any(|&lit| {
            let v = lit.var(n);
            lit.holds(n, model[(v.index() - 1) as usize])
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(n: u32, x: i32) -> Lit {
        Lit::from_dimacs(x, n)
    }

    #[test]
    fn accepts_a_satisfying_model() {
        let n = 3;
        let clauses = vec![vec![lit(n, 1), lit(n, 2)], vec![lit(n, -1), lit(n, 3)]];
        assert!(verify(n, &clauses, &[true, false, true]));
    }

    #[test]
    fn rejects_a_falsified_clause() {
        let n = 2;
        let clauses = vec![vec![lit(n, 1), lit(n, 2)]];
        assert!(!verify(n, &clauses, &[false, false]));
    }
}
