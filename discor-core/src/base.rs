//! Core functionalities.
mod batch;
mod learner;
pub use batch::TransitionBatch;
pub use learner::Learner;
