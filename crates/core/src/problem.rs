//! Problem generation: a bounded target and a compatible given addend.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::Serialize;

use crate::{error::DrillError, palette::Digit};

/// Smallest target a problem may ask for.
pub const MIN_TARGET_NUMBER: u8 = 3;
/// Largest target a problem may ask for.
pub const MAX_TARGET_NUMBER: u8 = 10;

/// One live question: `given + ? = target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Problem {
    target: u8,
    given: u8,
}

impl Problem {
    /// Build a problem, enforcing `MIN <= target <= MAX` and `given <= target`.
    pub fn new(target: u8, given: u8) -> Result<Self, DrillError> {
        if !(MIN_TARGET_NUMBER..=MAX_TARGET_NUMBER).contains(&target) {
            return Err(DrillError::TargetOutOfRange(target));
        }
        if given > target {
            return Err(DrillError::GivenExceedsTarget { given, target });
        }
        Ok(Self { target, given })
    }

    /// The sum the learner reconstructs.
    pub fn target(&self) -> u8 {
        self.target
    }

    /// The addend shown to the learner.
    pub fn given(&self) -> u8 {
        self.given
    }

    /// The complementary addend. Always a palette digit since `target <= 10`.
    pub fn answer(&self) -> Digit {
        Digit::clamped(self.target - self.given)
    }

    /// Whether `given + digit == target`.
    pub fn is_solved_by(&self, digit: Digit) -> bool {
        u16::from(self.given) + u16::from(digit.value()) == u16::from(self.target)
    }
}

/// Anything able to hand out fresh problems.
pub trait ProblemSource {
    /// Draw the next problem.
    fn next_problem(&mut self) -> Problem;
}

/// Uniform random generator over the configured bounds.
#[derive(Debug, Clone)]
pub struct ProblemGenerator<R = StdRng> {
    rng: R,
}

impl ProblemGenerator<StdRng> {
    /// Non-reproducible generator seeded from the OS.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Reproducible generator, used when a seed is configured.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Pick seeded or entropy-backed generation from an optional seed.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> ProblemGenerator<R> {
    /// Wrap an arbitrary random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw `(target, given)` with target uniform in `MIN..=MAX` and
    /// given uniform in `0..=target`.
    pub fn generate(&mut self) -> Problem {
        let target = self.rng.gen_range(MIN_TARGET_NUMBER..=MAX_TARGET_NUMBER);
        let given = self.rng.gen_range(0..=target);
        Problem { target, given }
    }
}

impl<R: Rng> ProblemSource for ProblemGenerator<R> {
    fn next_problem(&mut self) -> Problem {
        self.generate()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::palette::palette;

    #[test]
    fn generated_problems_stay_in_bounds() {
        let mut generator = ProblemGenerator::seeded(7);
        for _ in 0..2_000 {
            let problem = generator.generate();
            assert!((MIN_TARGET_NUMBER..=MAX_TARGET_NUMBER).contains(&problem.target()));
            assert!(problem.given() <= problem.target());
        }
    }

    #[test]
    fn every_generated_problem_is_solvable_from_the_palette() {
        let mut generator = ProblemGenerator::seeded(11);
        for _ in 0..500 {
            let problem = generator.generate();
            let solutions: Vec<Digit> = palette().filter(|d| problem.is_solved_by(*d)).collect();
            assert_eq!(solutions, vec![problem.answer()]);
        }
    }

    #[test]
    fn generator_covers_the_whole_target_range() {
        let mut generator = ProblemGenerator::seeded(42);
        let targets: HashSet<u8> = (0..2_000).map(|_| generator.generate().target()).collect();
        assert_eq!(targets.len(), usize::from(MAX_TARGET_NUMBER - MIN_TARGET_NUMBER + 1));

        let givens: HashSet<u8> = (0..2_000).map(|_| generator.generate().given()).collect();
        assert!(givens.contains(&0));
        assert!(givens.contains(&MAX_TARGET_NUMBER));
    }

    #[test]
    fn same_seed_gives_the_same_sequence() {
        let mut left = ProblemGenerator::seeded(3);
        let mut right = ProblemGenerator::seeded(3);
        for _ in 0..20 {
            assert_eq!(left.next_problem(), right.next_problem());
        }
    }

    #[test]
    fn constructor_rejects_unrepresentable_problems() {
        assert_eq!(Problem::new(2, 0), Err(DrillError::TargetOutOfRange(2)));
        assert_eq!(Problem::new(11, 0), Err(DrillError::TargetOutOfRange(11)));
        assert_eq!(
            Problem::new(5, 6),
            Err(DrillError::GivenExceedsTarget { given: 6, target: 5 })
        );
        let problem = Problem::new(7, 3).expect("valid problem");
        assert_eq!(problem.answer().value(), 4);
    }
}
