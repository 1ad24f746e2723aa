use crate::{record::Recorder, TransitionBatch};
use anyhow::Result;
use std::path::Path;

/// The lifecycle shared by the learning cores.
///
/// An external training loop drives a learner serially: it samples a
/// [`TransitionBatch`] and calls [`Learner::learn`] once per step, and on
/// its own cadence calls [`Learner::update_target`]. Neither call is
/// reentrant; both mutate parameter and optimizer state.
pub trait Learner {
    /// Samples a stochastic action for data collection.
    fn explore(&mut self, state: &[f32]) -> Result<Vec<f32>>;

    /// Returns the deterministic action for evaluation.
    fn exploit(&mut self, state: &[f32]) -> Result<Vec<f32>>;

    /// Performs one synchronous update across all sub-networks.
    ///
    /// Increments the step counter exactly once; writes diagnostics to
    /// `recorder` when the counter is a multiple of the log interval. A
    /// failed step leaves all parameters untouched.
    fn learn(&mut self, batch: &TransitionBatch, recorder: &mut dyn Recorder) -> Result<()>;

    /// Applies one Polyak step to every target network.
    fn update_target(&mut self);

    /// Number of `learn` steps taken so far.
    fn n_steps(&self) -> usize;

    /// Persists all network weights under the given directory.
    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()>;

    /// Loads all network weights from the given directory.
    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()>;
}
