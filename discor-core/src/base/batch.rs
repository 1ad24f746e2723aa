use crate::error::DiscorError;

/// A batch of environment transitions, stored as flat row-major vectors.
///
/// `states` and `next_states` have `batch_size * state_dim` elements,
/// `actions` has `batch_size * action_dim`, and `rewards` and `dones` have
/// one element per transition. `dones` entries are 0 or 1.
#[derive(Clone, Debug)]
pub struct TransitionBatch {
    /// Number of transitions in the batch.
    pub batch_size: usize,

    /// Dimension of the state vector.
    pub state_dim: usize,

    /// Dimension of the action vector.
    pub action_dim: usize,

    /// States, `[batch_size, state_dim]`.
    pub states: Vec<f32>,

    /// Actions, `[batch_size, action_dim]`.
    pub actions: Vec<f32>,

    /// Rewards, `[batch_size, 1]`.
    pub rewards: Vec<f32>,

    /// Successor states, `[batch_size, state_dim]`.
    pub next_states: Vec<f32>,

    /// Termination flags, `[batch_size, 1]`, each 0 or 1.
    pub dones: Vec<f32>,
}

impl TransitionBatch {
    /// Checks the consistency of the batch shapes.
    ///
    /// A malformed batch is fatal for the step consuming it; the caller
    /// decides what to do with the failed step.
    pub fn validate(&self) -> Result<(), DiscorError> {
        if self.batch_size == 0 {
            return Err(DiscorError::ShapeMismatch("empty batch".into()));
        }

        let checks = [
            ("states", self.states.len(), self.batch_size * self.state_dim),
            (
                "actions",
                self.actions.len(),
                self.batch_size * self.action_dim,
            ),
            ("rewards", self.rewards.len(), self.batch_size),
            (
                "next_states",
                self.next_states.len(),
                self.batch_size * self.state_dim,
            ),
            ("dones", self.dones.len(), self.batch_size),
        ];

        for (name, len, expected) in checks.iter() {
            if len != expected {
                return Err(DiscorError::ShapeMismatch(format!(
                    "{} has {} elements, expected {}",
                    name, len, expected
                )));
            }
        }

        for (i, d) in self.dones.iter().enumerate() {
            if *d != 0.0 && *d != 1.0 {
                return Err(DiscorError::ShapeMismatch(format!(
                    "dones[{}] is {}, expected 0 or 1",
                    i, d
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::TransitionBatch;

    fn batch() -> TransitionBatch {
        TransitionBatch {
            batch_size: 2,
            state_dim: 3,
            action_dim: 2,
            states: vec![0.0; 6],
            actions: vec![0.0; 4],
            rewards: vec![0.0; 2],
            next_states: vec![0.0; 6],
            dones: vec![0.0, 1.0],
        }
    }

    #[test]
    fn accepts_consistent_batch() {
        assert!(batch().validate().is_ok());
    }

    #[test]
    fn rejects_truncated_actions() {
        let mut b = batch();
        b.actions.pop();
        assert!(b.validate().is_err());
    }

    #[test]
    fn rejects_fractional_dones() {
        let mut b = batch();
        b.dones[0] = 0.5;
        assert!(b.validate().is_err());
    }

    #[test]
    fn rejects_empty_batch() {
        let mut b = batch();
        b.batch_size = 0;
        b.states.clear();
        b.actions.clear();
        b.rewards.clear();
        b.next_states.clear();
        b.dones.clear();
        assert!(b.validate().is_err());
    }
}
