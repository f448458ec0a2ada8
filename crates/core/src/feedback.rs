#![allow(missing_docs)]

//! Feedback shown after a check, plus the prompt sentences around it.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{palette::Digit, problem::Problem};

/// Which outcome the last check produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Check pressed before any digit was chosen.
    MissingSelection,
    /// `given + selected == target`.
    Correct,
    /// Wrong sum; the learner may try again.
    Incorrect,
}

/// Banner contents derived from the last check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feedback {
    kind: FeedbackKind,
}

impl Feedback {
    pub fn new(kind: FeedbackKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> FeedbackKind {
        self.kind
    }

    pub fn is_correct(&self) -> bool {
        self.kind == FeedbackKind::Correct
    }

    pub fn text(&self) -> &'static str {
        match self.kind {
            FeedbackKind::MissingSelection => "Pick the remaining number!",
            FeedbackKind::Correct => "Correct! Great job!",
            FeedbackKind::Incorrect => "Not quite... let's try again!",
        }
    }
}

impl Serialize for Feedback {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Feedback", 2)?;
        state.serialize_field("text", self.text())?;
        state.serialize_field("correct", &self.is_correct())?;
        state.end()
    }
}

/// Question shown while the problem is still open.
pub fn prompt_text(problem: &Problem) -> String {
    format!(
        "What goes with {} to make {}?",
        problem.given(),
        problem.target()
    )
}

/// Sentence shown once the learner has found the answer.
pub fn completion_text(problem: &Problem, selected: Digit) -> String {
    format!(
        "{} is {} and {}. You did it!",
        problem.target(),
        problem.given(),
        selected
    )
}

/// Static hint under the drill.
pub const HINT_TEXT: &str = "Hint: pick the number that belongs in the ? box.";
