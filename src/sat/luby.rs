/// Generates the Luby sequence `1, 1, 2, 1, 1, 2, 4, ...` scaled by a base,
/// consumed by the restart controller (spec §4.2). Grounded on the
/// original Python `LubyGenerator` (`original_source/code/utils.py`); the
/// teacher's own `luby()` is a stateless closed form of the same sequence,
/// but the spec wants the stateful, restartable list-growing generator the
/// Python source actually implements, so this is rebuilt from scratch in
/// that shape rather than adapted from the teacher's closed form.
pub struct LubyGenerator {
    base: f64,
    numbers: Vec<u64>,
    mult: u64,
    minu: usize,
}

impl LubyGenerator {
    pub fn new(base: f64) -> Self {
        LubyGenerator { base, numbers: Vec::new(), mult: 1, minu: 0 }
    }

    /// Returns the next number in the sequence, scaled by `base`.
    pub fn next(&mut self) -> f64 {
        let size = self.numbers.len();
        let i = size + 1;

        let emitted = if (i + 1).is_power_of_two() {
            let m = self.mult;
            self.mult *= 2;
            self.minu = i;
            m
        } else {
            self.numbers[i - self.minu - 1]
        };

        self.numbers.push(emitted);
        self.base * (emitted as f64)
    }

    /// Clears the sequence and restores the generator's cursors.
    pub fn reset(&mut self) {
        self.numbers.clear();
        self.mult = 1;
        self.minu = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_the_canonical_luby_sequence() {
        let mut g = LubyGenerator::new(1.0);
        let got: Vec<u64> = (0..12).map(|_| g.next() as u64).collect();
        assert_eq!(got, vec![1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1]);
    }

    #[test]
    fn scales_by_base() {
        let mut g = LubyGenerator::new(32.0);
        assert_eq!(g.next(), 32.0);
        assert_eq!(g.next(), 32.0);
        assert_eq!(g.next(), 64.0);
    }

    #[test]
    fn reset_restarts_the_sequence() {
        let mut g = LubyGenerator::new(1.0);
        for _ in 0..5 {
            g.next();
        }
        g.reset();
        let got: Vec<u64> = (0..7).map(|_| g.next() as u64).collect();
        assert_eq!(got, vec![1, 1, 2, 1, 1, 2, 4]);
    }
}
