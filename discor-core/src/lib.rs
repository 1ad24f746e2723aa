//! Backend-free contracts for off-policy continuous-control learners.
//!
//! This crate defines what a learning core looks like, independent of the
//! numeric backend: the [`Learner`] lifecycle, the [`TransitionBatch`] it
//! consumes, the [`record`] system its diagnostics flow into, and the
//! [`DiscorError`](error::DiscorError) failures it can report.
pub mod error;
pub mod record;

mod base;
pub use base::{Learner, TransitionBatch};
