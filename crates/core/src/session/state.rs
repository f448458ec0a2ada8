//! The answer state machine as a pure transition over owned snapshots.

use serde::{
    ser::{SerializeStruct, Serializer},
    Deserialize, Serialize,
};

use crate::{
    feedback::{Feedback, FeedbackKind},
    palette::{Digit, DIGIT_PALETTE},
    problem::{Problem, ProblemSource},
};

/// Stage of one problem's answer lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Waiting for a digit or a check. Initial state of every problem.
    Selecting,
    /// Last check was wrong; the learner can pick again.
    Rejected,
    /// Solved. Only `NextProblem` (or `Clear`) leaves this phase.
    Accepted,
}

/// User intents forwarded by the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "digit", rename_all = "snake_case")]
pub enum Intent {
    ChooseDigit(Digit),
    Clear,
    CheckAnswer,
    NextProblem,
}

/// Complete, read-only view of the live problem.
///
/// Serialises with the static `digit_palette` so external renderers get
/// everything they draw from one object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrillState {
    problem: Problem,
    selected: Option<Digit>,
    phase: Phase,
    feedback: Option<Feedback>,
}

/// Result of applying one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub state: DrillState,
    /// False when the intent is not valid in the current phase.
    pub handled: bool,
    /// Whether the snapshot differs. A repeated wrong check is handled
    /// but leaves the state as it was.
    pub changed: bool,
}

impl Serialize for DrillState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("DrillState", 5)?;
        state.serialize_field("problem", &self.problem)?;
        state.serialize_field("selected", &self.selected)?;
        state.serialize_field("phase", &self.phase)?;
        state.serialize_field("feedback", &self.feedback)?;
        state.serialize_field("digit_palette", &DIGIT_PALETTE)?;
        state.end()
    }
}

impl DrillState {
    /// Start a problem: nothing selected, no feedback, `Selecting`.
    pub fn fresh(problem: Problem) -> Self {
        Self {
            problem,
            selected: None,
            phase: Phase::Selecting,
            feedback: None,
        }
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    pub fn target(&self) -> u8 {
        self.problem.target()
    }

    pub fn given(&self) -> u8 {
        self.problem.given()
    }

    pub fn selected(&self) -> Option<Digit> {
        self.selected
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_accepted(&self) -> bool {
        self.phase == Phase::Accepted
    }

    /// Apply `intent`, drawing from `source` only when a new problem is needed.
    ///
    /// The old snapshot is consumed and a whole new one returned, so a new
    /// problem replaces target, given, selection, phase and feedback together.
    pub fn apply<S>(self, intent: Intent, source: &mut S) -> Transition
    where
        S: ProblemSource + ?Sized,
    {
        let next = match (self.phase, intent) {
            (Phase::Accepted, Intent::ChooseDigit(_) | Intent::CheckAnswer) => None,
            (_, Intent::ChooseDigit(digit)) => Some(Self {
                selected: Some(digit),
                phase: Phase::Selecting,
                feedback: None,
                ..self
            }),
            (_, Intent::Clear) => Some(Self {
                selected: None,
                phase: Phase::Selecting,
                feedback: None,
                ..self
            }),
            (_, Intent::CheckAnswer) => Some(self.check()),
            (Phase::Accepted, Intent::NextProblem) => Some(Self::fresh(source.next_problem())),
            (_, Intent::NextProblem) => None,
        };
        match next {
            Some(next) => Transition {
                state: next,
                handled: true,
                changed: next != self,
            },
            None => Transition {
                state: self,
                handled: false,
                changed: false,
            },
        }
    }

    fn check(self) -> Self {
        match self.selected {
            // Stay correctable: the phase is left as it was.
            None => Self {
                feedback: Some(Feedback::new(FeedbackKind::MissingSelection)),
                ..self
            },
            Some(digit) if self.problem.is_solved_by(digit) => Self {
                phase: Phase::Accepted,
                feedback: Some(Feedback::new(FeedbackKind::Correct)),
                ..self
            },
            Some(_) => Self {
                phase: Phase::Rejected,
                feedback: Some(Feedback::new(FeedbackKind::Incorrect)),
                ..self
            },
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;

    use serde_json::json;

    use super::*;
    use crate::palette::palette;

    /// Hands out a fixed list of problems, then repeats the last one.
    pub(crate) struct Scripted {
        queue: VecDeque<Problem>,
        last: Problem,
    }

    impl Scripted {
        pub(crate) fn new(problems: &[(u8, u8)]) -> Self {
            let queue: VecDeque<Problem> = problems
                .iter()
                .map(|&(target, given)| Problem::new(target, given).expect("valid problem"))
                .collect();
            let last = *queue.back().expect("at least one problem");
            Self { queue, last }
        }
    }

    impl ProblemSource for Scripted {
        fn next_problem(&mut self) -> Problem {
            self.queue.pop_front().unwrap_or(self.last)
        }
    }

    fn digit(value: u8) -> Digit {
        Digit::new(value).expect("palette digit")
    }

    fn state(target: u8, given: u8) -> DrillState {
        DrillState::fresh(Problem::new(target, given).expect("valid problem"))
    }

    fn run(start: DrillState, intents: &[Intent]) -> DrillState {
        let mut source = Scripted::new(&[(9, 9)]);
        intents
            .iter()
            .fold(start, |acc, intent| acc.apply(*intent, &mut source).state)
    }

    #[test]
    fn correct_choice_is_accepted() {
        let end = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(4)), Intent::CheckAnswer],
        );
        assert_eq!(end.phase(), Phase::Accepted);
        assert_eq!(end.feedback().map(Feedback::is_correct), Some(true));
        assert_eq!(end.selected(), Some(digit(4)));
    }

    #[test]
    fn wrong_choice_is_rejected() {
        let end = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(2)), Intent::CheckAnswer],
        );
        assert_eq!(end.phase(), Phase::Rejected);
        assert_eq!(end.feedback().map(Feedback::is_correct), Some(false));
    }

    #[test]
    fn checking_without_selection_asks_for_a_digit() {
        let start = state(5, 2);
        let end = run(start, &[Intent::CheckAnswer]);
        assert_eq!(end.phase(), Phase::Selecting);
        let feedback = end.feedback().expect("feedback after check");
        assert_eq!(feedback.kind(), FeedbackKind::MissingSelection);
        assert!(!feedback.is_correct());
        assert_eq!(end.problem(), start.problem());
    }

    #[test]
    fn checking_after_clear_from_rejected_keeps_a_correctable_phase() {
        let rejected = run(
            state(5, 2),
            &[Intent::ChooseDigit(digit(1)), Intent::CheckAnswer],
        );
        assert_eq!(rejected.phase(), Phase::Rejected);
        let end = run(rejected, &[Intent::Clear, Intent::CheckAnswer]);
        assert_ne!(end.phase(), Phase::Accepted);
        assert_eq!(end.selected(), None);
    }

    #[test]
    fn check_accepts_exactly_the_matching_sums() {
        for target in 3..=10 {
            for given in 0..=target {
                for choice in palette() {
                    let end = run(
                        state(target, given),
                        &[Intent::ChooseDigit(choice), Intent::CheckAnswer],
                    );
                    let expected = if given + choice.value() == target {
                        Phase::Accepted
                    } else {
                        Phase::Rejected
                    };
                    assert_eq!(end.phase(), expected, "{given} + {choice} vs {target}");
                }
            }
        }
    }

    #[test]
    fn choosing_again_after_rejection_resets_feedback() {
        let end = run(
            state(6, 1),
            &[
                Intent::ChooseDigit(digit(2)),
                Intent::CheckAnswer,
                Intent::ChooseDigit(digit(5)),
            ],
        );
        assert_eq!(end.phase(), Phase::Selecting);
        assert_eq!(end.feedback(), None);
        assert_eq!(end.selected(), Some(digit(5)));
    }

    #[test]
    fn clear_is_idempotent() {
        let dirty = run(
            state(8, 3),
            &[Intent::ChooseDigit(digit(1)), Intent::CheckAnswer],
        );
        let once = run(dirty, &[Intent::Clear]);
        let twice = run(once, &[Intent::Clear]);
        assert_eq!(once, twice);
        assert_eq!(once.selected(), None);
        assert_eq!(once.feedback(), None);
        assert_eq!(once.phase(), Phase::Selecting);
    }

    #[test]
    fn accepted_problem_ignores_choose_and_check() {
        let mut source = Scripted::new(&[(4, 4)]);
        let accepted = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(4)), Intent::CheckAnswer],
        );
        for intent in [Intent::ChooseDigit(digit(0)), Intent::CheckAnswer] {
            let transition = accepted.apply(intent, &mut source);
            assert!(!transition.handled);
            assert!(!transition.changed);
            assert_eq!(transition.state, accepted);
        }
    }

    #[test]
    fn next_problem_only_leaves_accepted() {
        let mut source = Scripted::new(&[(10, 6)]);
        let open = state(7, 3);
        let ignored = open.apply(Intent::NextProblem, &mut source);
        assert!(!ignored.handled);
        assert!(!ignored.changed);

        let accepted = run(open, &[Intent::ChooseDigit(digit(4)), Intent::CheckAnswer]);
        let next = accepted.apply(Intent::NextProblem, &mut source).state;
        assert_eq!(next, state(10, 6));
        assert_eq!(next.selected(), None);
        assert_eq!(next.feedback(), None);
        assert_eq!(next.phase(), Phase::Selecting);
    }

    #[test]
    fn clear_reopens_an_accepted_problem() {
        let accepted = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(4)), Intent::CheckAnswer],
        );
        let cleared = run(accepted, &[Intent::Clear]);
        assert_eq!(cleared, state(7, 3));
    }

    #[test]
    fn accepted_selection_always_solves_the_problem() {
        for target in 3..=10 {
            for given in 0..=target {
                for choice in palette() {
                    let end = run(
                        state(target, given),
                        &[Intent::ChooseDigit(choice), Intent::CheckAnswer],
                    );
                    if end.is_accepted() {
                        let selected = end.selected().expect("selection when accepted");
                        assert_eq!(given + selected.value(), target);
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_wrong_check_is_handled_without_changing_state() {
        let mut source = Scripted::new(&[(7, 3)]);
        let rejected = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(2)), Intent::CheckAnswer],
        );
        let again = rejected.apply(Intent::CheckAnswer, &mut source);
        assert!(again.handled);
        assert!(!again.changed);
        assert_eq!(again.state.phase(), Phase::Rejected);
    }

    #[test]
    fn fresh_snapshot_carries_the_palette() {
        let value = serde_json::to_value(state(5, 2)).expect("serialise snapshot");
        assert_eq!(value["selected"], json!(null));
        assert_eq!(value["feedback"], json!(null));
        assert_eq!(value["digit_palette"].as_array().map(Vec::len), Some(11));
    }

    #[test]
    fn snapshot_serialises_for_external_renderers() {
        let end = run(
            state(7, 3),
            &[Intent::ChooseDigit(digit(2)), Intent::CheckAnswer],
        );
        let value = serde_json::to_value(end).expect("serialise snapshot");
        assert_eq!(
            value,
            json!({
                "problem": { "target": 7, "given": 3 },
                "selected": 2,
                "phase": "rejected",
                "feedback": { "text": "Not quite... let's try again!", "correct": false },
                "digit_palette": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]
            })
        );
    }

    #[test]
    fn intents_deserialise_from_tagged_json() {
        let intent: Intent =
            serde_json::from_value(json!({ "intent": "choose_digit", "digit": 10 }))
                .expect("choose intent");
        assert_eq!(intent, Intent::ChooseDigit(digit(10)));
        let intent: Intent =
            serde_json::from_value(json!({ "intent": "check_answer" })).expect("check intent");
        assert_eq!(intent, Intent::CheckAnswer);
        assert!(serde_json::from_value::<Intent>(
            json!({ "intent": "choose_digit", "digit": 11 })
        )
        .is_err());
    }
}
