use super::formula::Lit;

/// A stable handle to a clause in the database (spec §3: "Clauses are
/// referenced by a stable integer id").
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Copy, Clone, Debug)]
pub struct ClauseId(u32);

impl ClauseId {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// An ordered, duplicate-free sequence of literals, either read from the
/// input (`original`) or produced by conflict analysis (`learned`).
/// Unit clauses never reach this arena: spec §3 turns them into level-0
/// assignments directly, so every stored clause has size >= 2.
#[derive(Clone, Debug)]
pub struct Clause {
    pub lits: Vec<Lit>,
    pub learned: bool,
}

impl Clause {
    #[inline]
    pub fn len(&self) -> usize {
        self.lits.len()
    }
}

/// Flat arena of clauses, grounded on the teacher's `clause_db`/`formula::clause`
/// layout but simplified: this spec never deletes or relocates clauses
/// (§5), so there is no garbage collector or clause allocator here, just a
/// growable `Vec` indexed by `ClauseId`.
#[derive(Default)]
pub struct ClauseDb {
    clauses: Vec<Clause>,
}

impl ClauseDb {
    pub fn new() -> Self {
        ClauseDb { clauses: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn add(&mut self, lits: Vec<Lit>, learned: bool) -> ClauseId {
        let id = ClauseId(self.clauses.len() as u32);
        self.clauses.push(Clause { lits, learned });
        id
    }

    #[inline]
    pub fn get(&self, id: ClauseId) -> &Clause {
        &self.clauses[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ClauseId) -> &mut Clause {
        &mut self.clauses[id.index()]
    }

    pub fn iter_ids(&self) -> impl Iterator<Item = ClauseId> {
        (0..self.clauses.len()).map(|i| ClauseId(i as u32))
    }

    pub fn num_learned(&self) -> usize {
        self.clauses.iter().filter(|c| c.learned).count()
    }
}
