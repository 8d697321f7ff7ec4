use std::fmt;

pub mod index_map;

pub use self::index_map::{IdxHeap, IdxMap, IdxVec, VarHeap, VarMap, VarVec};

/// A problem variable, numbered `1..=n`. The source encoding (spec §3)
/// keeps variables and literals in the same numeric space, so `Var` and
/// `Lit` are both thin wrappers around the raw DIMACS-style integer rather
/// than the `2v`/`2v+1` packing minisat-family solvers usually prefer.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct Var(u32);

impl Var {
    #[inline]
    pub fn new(id: u32) -> Var {
        debug_assert!(id >= 1, "variables are numbered from 1");
        Var(id)
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn pos_lit(&self) -> Lit {
        Lit(self.0)
    }

    #[inline]
    pub fn neg_lit(&self, n: u32) -> Lit {
        Lit(self.0 + n)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A literal in the `v` / `v + n` encoding of spec §3: `Lit`'s raw value
/// only makes sense together with the problem's variable count `n`, which
/// every method that needs to tell signs apart takes explicitly.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone)]
pub struct Lit(u32);

impl Lit {
    #[inline]
    pub fn from_raw(raw: u32) -> Lit {
        Lit(raw)
    }

    #[inline]
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Builds a literal from a signed DIMACS-style integer and the
    /// problem's variable count.
    #[inline]
    pub fn from_dimacs(x: i32, n: u32) -> Lit {
        if x < 0 {
            Lit((-x) as u32 + n)
        } else {
            Lit(x as u32)
        }
    }

    #[inline]
    pub fn is_negated(&self, n: u32) -> bool {
        self.0 > n
    }

    #[inline]
    pub fn var(&self, n: u32) -> Var {
        if self.is_negated(n) {
            Var(self.0 - n)
        } else {
            Var(self.0)
        }
    }

    #[inline]
    pub fn negate(&self, n: u32) -> Lit {
        if self.is_negated(n) {
            Lit(self.0 - n)
        } else {
            Lit(self.0 + n)
        }
    }

    /// Whether this literal is satisfied when its variable holds `value`.
    #[inline]
    pub fn holds(&self, n: u32, value: bool) -> bool {
        self.is_negated(n) != value
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

impl index_map::Idx for Var {
    #[inline]
    fn idx(&self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    fn unidx(idx: usize) -> Var {
        Var((idx + 1) as u32)
    }
}

impl index_map::Idx for Lit {
    #[inline]
    fn idx(&self) -> usize {
        (self.0 - 1) as usize
    }

    #[inline]
    fn unidx(idx: usize) -> Lit {
        Lit((idx + 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_sign_via_offset() {
        let n = 5;
        let v = Var::new(3);
        let pos = v.pos_lit();
        let neg = v.neg_lit(n);
        assert_eq!(pos.raw(), 3);
        assert_eq!(neg.raw(), 8);
        assert!(!pos.is_negated(n));
        assert!(neg.is_negated(n));
        assert_eq!(pos.var(n), v);
        assert_eq!(neg.var(n), v);
        assert_eq!(pos.negate(n), neg);
        assert_eq!(neg.negate(n), pos);
    }

    #[test]
    fn from_dimacs_round_trips() {
        let n = 10;
        assert_eq!(Lit::from_dimacs(4, n).raw(), 4);
        assert_eq!(Lit::from_dimacs(-4, n).raw(), 14);
    }
}
