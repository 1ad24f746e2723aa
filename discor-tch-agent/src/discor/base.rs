use super::CorrectionConfig;
use crate::{
    model::SubModel2,
    twin::{Twin, TwinTarget},
};
use anyhow::{Context, Result};
use discor_core::error::DiscorError;
use std::convert::TryFrom;
use std::path::Path;
use tch::{no_grad, Device, Tensor};

/// The error-corrected critic weighting of DisCor.
///
/// Holds the twin estimator of "Delta", the discounted cumulative
/// magnitude of future Bellman error, its frozen target copy, and the
/// per-head error-scale trackers tau1 and tau2.
pub struct ErrorCorrection<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    error: Twin<Q>,
    error_tgt: TwinTarget<Q>,

    // Error-scale trackers, EMAs of the mean current error per head.
    tau1: f64,
    tau2: f64,
    tau_update_coef: f64,
}

impl<Q> ErrorCorrection<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    /// Builds the twin error network, its frozen target and the trackers.
    pub fn build(config: CorrectionConfig<Q::Config>, device: Device) -> Result<Self> {
        let error_config = config.error_config.context("error_config is not set.")?;
        let error = Twin::build(error_config, config.opt_config, device)?;
        let error_tgt = error.target()?;

        Ok(Self {
            error,
            error_tgt,
            tau1: config.tau_init,
            tau2: config.tau_init,
            tau_update_coef: config.tau_update_coef,
        })
    }

    /// Evaluates the online error twin (gradient-tracked) and derives the
    /// self-normalized importance weights per head.
    ///
    /// `w = exp(-gamma * error.detach() / tau)`, normalized to sum to 1
    /// over the batch. Tau rescales the exponent so it stays conditioned
    /// as error magnitudes evolve during training.
    pub fn current_error(
        &self,
        states: &Tensor,
        actions: &Tensor,
        gamma: f64,
    ) -> Result<(Tensor, Tensor, Tensor, Tensor)> {
        let (curr_err1, curr_err2) = self.error.forward(states, actions);
        let imp_ws1 = importance_weights(&curr_err1, gamma, self.tau1)?;
        let imp_ws2 = importance_weights(&curr_err2, gamma, self.tau2)?;
        Ok((curr_err1, curr_err2, imp_ws1, imp_ws2))
    }

    /// Targets of the cumulative discounted Bellman-error magnitude.
    ///
    /// `target_err = |curr_q - target_q| + (1 - done) * gamma * next_err`,
    /// with the next error read from the frozen target twin at the
    /// resampled next action. No gradient flows through this path.
    pub fn target_error(
        &self,
        next_states: &Tensor,
        next_actions: &Tensor,
        dones: &Tensor,
        curr_q1: &Tensor,
        curr_q2: &Tensor,
        target_q: &Tensor,
        gamma: f64,
    ) -> (Tensor, Tensor) {
        no_grad(|| {
            let (next_err1, next_err2) = self.error_tgt.forward(next_states, next_actions);
            let bootstrap = |next_err: Tensor| (1f32 - dones) * Tensor::from(gamma) * next_err;
            let target_err1 = (curr_q1 - target_q).abs() + bootstrap(next_err1);
            let target_err2 = (curr_q2 - target_q).abs() + bootstrap(next_err2);
            (target_err1, target_err2)
        })
    }

    /// Summed mean-squared error of both heads against their targets.
    pub fn error_loss(
        &self,
        curr_err1: &Tensor,
        curr_err2: &Tensor,
        target_err1: &Tensor,
        target_err2: &Tensor,
    ) -> Tensor {
        curr_err1.mse_loss(target_err1, tch::Reduction::Mean)
            + curr_err2.mse_loss(target_err2, tch::Reduction::Mean)
    }

    /// One EMA step of tau1 and tau2 toward the mean current error
    /// magnitude of the respective head.
    pub fn update_tau(&mut self, curr_err1: &Tensor, curr_err2: &Tensor) {
        let c = self.tau_update_coef;
        let mean1 = f64::try_from(curr_err1.detach().mean(tch::Kind::Float)).unwrap();
        let mean2 = f64::try_from(curr_err2.detach().mean(tch::Kind::Float)).unwrap();
        self.tau1 = self.tau1 * (1.0 - c) + mean1 * c;
        self.tau2 = self.tau2 * (1.0 - c) + mean2 * c;
    }

    /// Trains the online error twin given a loss.
    pub fn backward_step(&mut self, loss: &Tensor) {
        self.error.backward_step(loss);
    }

    /// One Polyak step of the target error twin.
    pub fn update_target(&mut self, target_update_coef: f64) {
        self.error_tgt.track(&self.error, target_update_coef);
    }

    /// Current value of tau1.
    pub fn tau1(&self) -> f64 {
        self.tau1
    }

    /// Current value of tau2.
    pub fn tau2(&self) -> f64 {
        self.tau2
    }

    pub(crate) fn target_var_store(&self) -> &tch::nn::VarStore {
        self.error_tgt.var_store()
    }

    /// Save the networks under the given directory.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.error
            .save(path.as_ref().join("error.pt.tch").as_path())?;
        self.error_tgt
            .save(path.as_ref().join("error_tgt.pt.tch").as_path())?;
        Ok(())
    }

    /// Load the networks from the given directory.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.error
            .load(path.as_ref().join("error.pt.tch").as_path())?;
        self.error_tgt
            .load(path.as_ref().join("error_tgt.pt.tch").as_path())?;
        Ok(())
    }
}

fn importance_weights(err: &Tensor, gamma: f64, tau: f64) -> Result<Tensor> {
    let w = (err.detach() * (-gamma / tau)).exp();
    let sum = w.sum(tch::Kind::Float);
    let total = f64::try_from(&sum).unwrap();
    if !total.is_finite() || total <= 0.0 {
        return Err(DiscorError::NumericalInstability(format!(
            "importance weight normalizer is {} (tau = {})",
            total, tau
        ))
        .into());
    }
    Ok(w / sum)
}

#[cfg(test)]
mod tests {
    use super::{importance_weights, CorrectionConfig, ErrorCorrection};
    use crate::{Mlp, MlpConfig, OptimizerConfig};
    use std::convert::TryFrom;
    use tch::{Device, Kind, Tensor};

    fn correction() -> ErrorCorrection<Mlp> {
        let config = CorrectionConfig::default()
            .error_config(MlpConfig::new(5, vec![8, 8], 1))
            .opt_config(OptimizerConfig::Adam { lr: 3e-4 });
        ErrorCorrection::build(config, Device::Cpu).unwrap()
    }

    #[test]
    fn weights_are_normalized_and_non_negative() {
        let err = Tensor::from_slice(&[0.5f32, 1.5, 3.0, 0.1]).view([4, 1]);
        let w = importance_weights(&err, 0.99, 10.0).unwrap();
        assert_eq!(w.size(), vec![4, 1]);
        assert!((f64::try_from(w.sum(Kind::Float)).unwrap() - 1.0).abs() < 1e-6);
        assert!(f64::try_from(w.min()).unwrap() >= 0.0);
    }

    #[test]
    fn tiny_tau_is_detected() {
        // Large errors over a vanishing tau overflow the exponent.
        let err = Tensor::from_slice(&[-1e6f32, 0.0]).view([2, 1]);
        assert!(importance_weights(&err, 0.99, 1e-30).is_err());
    }

    #[test]
    fn terminal_transition_has_no_propagated_term() {
        let c = correction();
        let next_states = Tensor::zeros(&[1, 3], (Kind::Float, Device::Cpu));
        let next_actions = Tensor::zeros(&[1, 2], (Kind::Float, Device::Cpu));
        let dones = Tensor::ones(&[1, 1], (Kind::Float, Device::Cpu));
        let curr_q1 = Tensor::from_slice(&[2.0f32]).view([1, 1]);
        let curr_q2 = Tensor::from_slice(&[-3.0f32]).view([1, 1]);
        let target_q = Tensor::from_slice(&[0.5f32]).view([1, 1]);

        let (t1, t2) = c.target_error(
            &next_states,
            &next_actions,
            &dones,
            &curr_q1,
            &curr_q2,
            &target_q,
            0.99,
        );

        assert!((f64::try_from(t1).unwrap() - 1.5).abs() < 1e-6);
        assert!((f64::try_from(t2).unwrap() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn tau_moves_toward_mean_error() {
        let mut c = correction();
        let errs = Tensor::from_slice(&[1.0f32, 1.0]).view([2, 1]);
        let before = c.tau1();
        c.update_tau(&errs, &errs);
        // One EMA step from 10.0 toward 1.0 at coefficient 0.005.
        assert!(c.tau1() < before);
        assert!((c.tau1() - (10.0 * 0.995 + 1.0 * 0.005)).abs() < 1e-9);
        assert_eq!(c.tau1(), c.tau2());
    }
}
