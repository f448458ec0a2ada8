use serde::Serialize;
use tracing::{debug, info};

use crate::{
    palette::Digit,
    problem::{ProblemGenerator, ProblemSource},
};

use super::state::{DrillState, Intent, Phase};

/// Running totals for the current process. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Problems drawn, including the first one.
    pub problems_seen: u32,
    /// Problems answered correctly.
    pub problems_solved: u32,
    /// Checks made with a digit selected.
    pub attempts: u32,
}

/// Owns the live problem and processes one intent at a time.
#[derive(Debug)]
pub struct Session<S = ProblemGenerator> {
    state: DrillState,
    source: S,
    stats: SessionStats,
}

impl Session<ProblemGenerator> {
    /// Session backed by the random generator, seeded when `seed` is set.
    pub fn random(seed: Option<u64>) -> Self {
        Self::new(ProblemGenerator::from_seed_option(seed))
    }
}

impl<S: ProblemSource> Session<S> {
    /// Create a session and draw its first problem.
    pub fn new(mut source: S) -> Self {
        let state = DrillState::fresh(source.next_problem());
        info!(
            target_number = state.target(),
            given = state.given(),
            "Session started"
        );
        Self {
            state,
            source,
            stats: SessionStats {
                problems_seen: 1,
                ..SessionStats::default()
            },
        }
    }

    /// Current snapshot for rendering.
    pub fn snapshot(&self) -> &DrillState {
        &self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Apply `intent` to completion and return the resulting snapshot.
    pub fn dispatch(&mut self, intent: Intent) -> &DrillState {
        let before = self.state;
        let transition = before.apply(intent, &mut self.source);
        if !transition.handled {
            debug!(?intent, phase = ?before.phase(), "Intent ignored");
            return &self.state;
        }

        let after = transition.state;
        debug!(?intent, from = ?before.phase(), to = ?after.phase(), "Intent applied");
        if matches!(intent, Intent::CheckAnswer) && before.selected().is_some() {
            self.stats.attempts += 1;
        }
        if after.phase() == Phase::Accepted && before.phase() != Phase::Accepted {
            self.stats.problems_solved += 1;
            info!(
                target_number = after.target(),
                given = after.given(),
                solved = self.stats.problems_solved,
                "Answer accepted"
            );
        }
        if matches!(intent, Intent::NextProblem) {
            self.stats.problems_seen += 1;
            info!(
                target_number = after.target(),
                given = after.given(),
                "New problem"
            );
        }

        self.state = after;
        &self.state
    }

    pub fn choose_digit(&mut self, digit: Digit) -> &DrillState {
        self.dispatch(Intent::ChooseDigit(digit))
    }

    pub fn clear(&mut self) -> &DrillState {
        self.dispatch(Intent::Clear)
    }

    pub fn check_answer(&mut self) -> &DrillState {
        self.dispatch(Intent::CheckAnswer)
    }

    pub fn next_problem(&mut self) -> &DrillState {
        self.dispatch(Intent::NextProblem)
    }
}
