//! Stateless render step: everything a surface displays, derived from a snapshot.

use crate::{
    feedback::{completion_text, prompt_text, Feedback, HINT_TEXT},
    palette::{palette, Digit},
    session::{DrillState, Phase},
};

/// One palette button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteButton {
    /// Digit the button emits.
    pub digit: Digit,
    /// Highlighted as the current choice.
    pub selected: bool,
    /// Pressable. The current choice is disabled so it cannot be re-sent.
    pub enabled: bool,
}

/// Which controls are visible and pressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Clear and Check are shown while the problem is open.
    pub show_clear: bool,
    /// Check button visibility.
    pub show_check: bool,
    /// Check needs a selection first.
    pub check_enabled: bool,
    /// Next appears only once the answer is accepted.
    pub show_next: bool,
}

/// Display model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillView {
    /// Question or completion sentence.
    pub prompt: String,
    /// Whether `prompt` celebrates a solved problem.
    pub solved: bool,
    /// Left operand box.
    pub given: u8,
    /// `None` renders as the `?` box.
    pub selected: Option<Digit>,
    /// Right-hand box.
    pub target: u8,
    /// Empty once the problem is solved.
    pub palette: Vec<PaletteButton>,
    /// Button row.
    pub controls: Controls,
    /// Banner after a check.
    pub feedback: Option<Feedback>,
    /// Footer hint.
    pub hint: &'static str,
}

impl DrillView {
    /// Derive the view for `state`. Pure; call after every transition.
    pub fn from_state(state: &DrillState) -> Self {
        let accepted = state.phase() == Phase::Accepted;
        let selected = state.selected();

        let prompt = match (accepted, selected) {
            (true, Some(digit)) => completion_text(state.problem(), digit),
            _ => prompt_text(state.problem()),
        };

        let palette = if accepted {
            Vec::new()
        } else {
            palette()
                .map(|digit| {
                    let is_selected = selected == Some(digit);
                    PaletteButton {
                        digit,
                        selected: is_selected,
                        enabled: !is_selected,
                    }
                })
                .collect()
        };

        Self {
            prompt,
            solved: accepted,
            given: state.given(),
            selected,
            target: state.target(),
            palette,
            controls: Controls {
                show_clear: !accepted,
                show_check: !accepted,
                check_enabled: !accepted && selected.is_some(),
                show_next: accepted,
            },
            feedback: state.feedback().copied(),
            hint: HINT_TEXT,
        }
    }

    /// Text for the middle operand box.
    pub fn selected_label(&self) -> String {
        self.selected
            .map(|digit| digit.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        feedback::FeedbackKind,
        problem::{Problem, ProblemGenerator},
        session::Intent,
    };

    fn state(target: u8, given: u8) -> DrillState {
        DrillState::fresh(Problem::new(target, given).expect("valid problem"))
    }

    fn apply(state: DrillState, intents: &[Intent]) -> DrillState {
        let mut generator = ProblemGenerator::seeded(1);
        intents
            .iter()
            .fold(state, |acc, intent| acc.apply(*intent, &mut generator).state)
    }

    fn digit(value: u8) -> Digit {
        Digit::new(value).expect("palette digit")
    }

    #[test]
    fn fresh_problem_shows_question_and_full_palette() {
        let view = DrillView::from_state(&state(7, 3));
        assert_eq!(view.prompt, "What goes with 3 to make 7?");
        assert!(!view.solved);
        assert_eq!(view.selected_label(), "?");
        assert_eq!(view.palette.len(), 11);
        assert!(view.palette.iter().all(|button| button.enabled && !button.selected));
        assert_eq!(
            view.controls,
            Controls {
                show_clear: true,
                show_check: true,
                check_enabled: false,
                show_next: false,
            }
        );
        assert_eq!(view.feedback, None);
    }

    #[test]
    fn selection_disables_its_own_button_and_enables_check() {
        let view = DrillView::from_state(&apply(state(7, 3), &[Intent::ChooseDigit(digit(4))]));
        let chosen = view.palette[4];
        assert!(chosen.selected);
        assert!(!chosen.enabled);
        assert_eq!(view.palette.iter().filter(|b| b.enabled).count(), 10);
        assert!(view.controls.check_enabled);
        assert_eq!(view.selected_label(), "4");
    }

    #[test]
    fn accepted_problem_hides_palette_and_offers_next() {
        let solved = apply(
            state(7, 3),
            &[Intent::ChooseDigit(digit(4)), Intent::CheckAnswer],
        );
        let view = DrillView::from_state(&solved);
        assert!(view.solved);
        assert_eq!(view.prompt, "7 is 3 and 4. You did it!");
        assert!(view.palette.is_empty());
        assert!(view.controls.show_next);
        assert!(!view.controls.show_check && !view.controls.show_clear);
        assert_eq!(view.feedback.map(|f| f.kind()), Some(FeedbackKind::Correct));
    }

    #[test]
    fn rejected_problem_keeps_palette_and_shows_retry_feedback() {
        let rejected = apply(
            state(7, 3),
            &[Intent::ChooseDigit(digit(2)), Intent::CheckAnswer],
        );
        let view = DrillView::from_state(&rejected);
        assert_eq!(view.palette.len(), 11);
        assert!(!view.controls.show_next);
        let feedback = view.feedback.expect("retry feedback");
        assert!(!feedback.is_correct());
        assert_eq!(feedback.text(), "Not quite... let's try again!");
    }
}
