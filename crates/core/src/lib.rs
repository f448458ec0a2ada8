#![warn(clippy::all, missing_docs)]

//! Core logic for the "ikutsu to ikutsu" addition drill.
//!
//! This crate hosts problem generation, the answer state machine,
//! the session controller that owns them, and the stateless view model
//! consumed by the terminal UI and any other presentation surface.

pub mod config;
pub mod error;
pub mod feedback;
pub mod palette;
pub mod problem;
pub mod session;
pub mod view;

pub use config::AppConfig;
pub use error::DrillError;
pub use feedback::{Feedback, FeedbackKind};
pub use palette::{Digit, DIGIT_PALETTE};
pub use problem::{Problem, ProblemGenerator, ProblemSource, MAX_TARGET_NUMBER, MIN_TARGET_NUMBER};
pub use session::{DrillState, Intent, Phase, Session, SessionStats};
pub use view::DrillView;
