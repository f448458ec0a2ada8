#![allow(missing_docs)]

//! Session controller and the answer state machine it drives.

mod controller;
pub(crate) mod state;

pub use controller::{Session, SessionStats};
pub use state::{DrillState, Intent, Phase, Transition};
