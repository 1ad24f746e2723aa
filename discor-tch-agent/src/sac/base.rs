use super::{Actor, EntCoef, SacConfig};
use crate::{
    discor::ErrorCorrection,
    model::{SubModel1, SubModel2},
    twin::{Twin, TwinTarget},
    util::{slice_to_tensor, tensor_to_vec, OutDim},
};
use anyhow::Result;
use discor_core::{
    error::DiscorError,
    record::{Record, RecordValue, Recorder},
    Learner, TransitionBatch,
};
use serde::{de::DeserializeOwned, Serialize};
use std::{convert::TryFrom, fmt::Debug, fs, path::Path};
use tch::{no_grad, Tensor};

fn normal_logp(z: &Tensor, lstd: &Tensor) -> Tensor {
    let logp: Tensor = Tensor::from(-0.5 * (2.0 * std::f32::consts::PI).ln() as f32)
        - 0.5 * z.pow_tensor_scalar(2)
        - lstd;
    logp.sum_dim_intlist(Some([-1].as_slice()), true, tch::Kind::Float)
}

fn ensure_finite(loss: &Tensor, what: &str) -> Result<()> {
    let value = f64::try_from(loss).unwrap();
    if value.is_finite() {
        Ok(())
    } else {
        Err(DiscorError::NumericalInstability(format!("{} is {}", what, value)).into())
    }
}

/// Soft actor-critic learner, optionally with the DisCor correction.
///
/// One `learn` call performs, in this order: current and target Q values,
/// then (when corrected) current and target error values, a policy step,
/// a critic step, an entropy step and finally (when corrected) an error
/// step. The policy step therefore sees the critic parameters as they
/// were before this step's critic update. Target networks move only in
/// [`Sac::update_target`], driven by the caller on its own cadence.
pub struct Sac<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    pub(super) pi: Actor<P>,
    pub(super) critic: Twin<Q>,
    pub(super) critic_tgt: TwinTarget<Q>,
    pub(super) ent_coef: EntCoef,
    pub(super) correction: Option<ErrorCorrection<Q>>,
    pub(super) gamma: f64,
    pub(super) target_update_coef: f64,
    pub(super) epsilon: f64,
    pub(super) min_lstd: f64,
    pub(super) max_lstd: f64,
    pub(super) log_interval: usize,
    pub(super) n_steps: usize,
    pub(super) device: tch::Device,
}

impl<Q, P> Sac<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    /// Constructs the learner.
    pub fn build(config: SacConfig<Q, P>) -> Result<Self> {
        let device: tch::Device = config.device.map(Into::into).unwrap_or(tch::Device::Cpu);

        if let Some(seed) = config.seed.as_ref() {
            tch::manual_seed(*seed);
        }

        let pi = Actor::build(config.actor_config, device)?;
        let critic = Twin::build(
            config
                .critic_config
                .q_config
                .ok_or_else(|| anyhow::anyhow!("q_config is not set."))?,
            config.critic_config.opt_config,
            device,
        )?;
        let critic_tgt = critic.target()?;

        // Target entropy is -|A|.
        let target_entropy = -(pi.out_dim() as f64);
        let ent_coef = EntCoef::new(config.ent_coef_mode, target_entropy, device)?;

        let correction = match config.correction {
            Some(c) => Some(ErrorCorrection::build(c, device)?),
            None => None,
        };

        Ok(Sac {
            pi,
            critic,
            critic_tgt,
            ent_coef,
            correction,
            gamma: config.gamma,
            target_update_coef: config.target_update_coef,
            epsilon: config.epsilon,
            min_lstd: config.min_lstd,
            max_lstd: config.max_lstd,
            log_interval: config.log_interval,
            n_steps: 0,
            device,
        })
    }

    /// Samples an action and its entropy estimate from the policy.
    ///
    /// Returns `(action, entropy, mean_action)`; the sampling path is
    /// differentiable, the mean action is the deterministic choice.
    fn action_entropy(&self, states: &Tensor) -> (Tensor, Tensor, Tensor) {
        let (mean, lstd) = self.pi.forward(states);
        let lstd = lstd.clip(self.min_lstd, self.max_lstd);
        let std = lstd.exp();
        let z = Tensor::randn(mean.size().as_slice(), tch::kind::FLOAT_CPU).to(self.device);
        let a = (&std * &z + &mean).tanh();

        // Log-likelihood of the squashed sample, with the tanh correction.
        let log_p = normal_logp(&z, &lstd)
            - (Tensor::from(1f32) - a.pow_tensor_scalar(2.0) + Tensor::from(self.epsilon as f32))
                .log()
                .sum_dim_intlist(Some([-1].as_slice()), true, tch::Kind::Float);
        let entropy = -log_p;

        (a, entropy, mean.tanh())
    }

    /// Evaluates the online twin critic; gradient-tracked.
    fn calc_current_q(&self, states: &Tensor, actions: &Tensor) -> (Tensor, Tensor) {
        self.critic.forward(states, actions)
    }

    /// Soft Bellman backup from the frozen target critic.
    ///
    /// `reward + (1 - done) * gamma * (min_i target_Q_i + alpha * entropy)`
    /// at a freshly resampled next action; no gradient flows through this
    /// path.
    fn calc_target_q(&self, rewards: &Tensor, next_states: &Tensor, dones: &Tensor) -> Tensor {
        no_grad(|| {
            let (next_a, next_entropy, _) = self.action_entropy(next_states);
            let (next_q1, next_q2) = self.critic_tgt.forward(next_states, &next_a);
            let next_q = next_q1.minimum(&next_q2) + self.ent_coef.alpha() * next_entropy;
            rewards + (1f32 - dones) * Tensor::from(self.gamma) * next_q
        })
    }

    /// Policy loss `mean(-(min_i Q_i + alpha * entropy))` at resampled
    /// actions, evaluated on the online critic.
    ///
    /// Returns the loss and the detached entropies of the resampled
    /// actions.
    fn calc_policy_loss(&self, states: &Tensor) -> (Tensor, Tensor) {
        let (a, entropy, _) = self.action_entropy(states);
        let (q1, q2) = self.critic.forward(states, &a);
        let q = q1.minimum(&q2);

        debug_assert_eq!(q.size(), entropy.size());

        let loss = (-(q + self.ent_coef.alpha() * &entropy)).mean(tch::Kind::Float);
        (loss, entropy.detach())
    }

    /// Per-head weighted squared Bellman residual, summed over heads.
    ///
    /// `weights` defaults to uniform; the DisCor correction passes its
    /// self-normalized importance weights. Also returns detached mean-Q
    /// diagnostics per head.
    fn calc_q_loss(
        &self,
        curr_q1: &Tensor,
        curr_q2: &Tensor,
        target_q: &Tensor,
        weights: Option<(&Tensor, &Tensor)>,
    ) -> Result<(Tensor, f32, f32)> {
        for q in [curr_q1, curr_q2].iter() {
            if q.size() != target_q.size() {
                return Err(DiscorError::ShapeMismatch(format!(
                    "current Q {:?} vs target Q {:?}",
                    q.size(),
                    target_q.size()
                ))
                .into());
            }
        }

        let loss = match weights {
            None => {
                curr_q1.mse_loss(target_q, tch::Reduction::Mean)
                    + curr_q2.mse_loss(target_q, tch::Reduction::Mean)
            }
            Some((w1, w2)) => {
                for (w, q) in [(w1, curr_q1), (w2, curr_q2)].iter() {
                    if w.size() != q.size() {
                        return Err(DiscorError::InvalidWeight(format!(
                            "weight {:?} vs Q estimate {:?}",
                            w.size(),
                            q.size()
                        ))
                        .into());
                    }
                }
                ((curr_q1 - target_q).pow_tensor_scalar(2) * w1).mean(tch::Kind::Float)
                    + ((curr_q2 - target_q).pow_tensor_scalar(2) * w2).mean(tch::Kind::Float)
            }
        };

        let mean_q1 = f32::try_from(curr_q1.detach().mean(tch::Kind::Float)).unwrap();
        let mean_q2 = f32::try_from(curr_q2.detach().mean(tch::Kind::Float)).unwrap();

        Ok((loss, mean_q1, mean_q2))
    }

    fn batch_to_tensors(
        &self,
        batch: &TransitionBatch,
    ) -> Result<(Tensor, Tensor, Tensor, Tensor, Tensor)> {
        batch.validate()?;

        let b = batch.batch_size as i64;
        let s = batch.state_dim as i64;
        let a = batch.action_dim as i64;

        let states = Tensor::from_slice(&batch.states).view([b, s]).to(self.device);
        let actions = Tensor::from_slice(&batch.actions)
            .view([b, a])
            .to(self.device);
        let rewards = Tensor::from_slice(&batch.rewards)
            .view([b, 1])
            .to(self.device);
        let next_states = Tensor::from_slice(&batch.next_states)
            .view([b, s])
            .to(self.device);
        let dones = Tensor::from_slice(&batch.dones).view([b, 1]).to(self.device);

        Ok((states, actions, rewards, next_states, dones))
    }

    /// Whether the DisCor correction is active.
    pub fn is_corrected(&self) -> bool {
        self.correction.is_some()
    }

    /// The error correction, when active.
    pub fn correction(&self) -> Option<&ErrorCorrection<Q>> {
        self.correction.as_ref()
    }

}

impl<Q, P> Learner for Sac<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    fn explore(&mut self, state: &[f32]) -> Result<Vec<f32>> {
        let states = slice_to_tensor(state, self.device);
        let a = no_grad(|| self.action_entropy(&states).0);
        Ok(tensor_to_vec(&a))
    }

    fn exploit(&mut self, state: &[f32]) -> Result<Vec<f32>> {
        let states = slice_to_tensor(state, self.device);
        let a = no_grad(|| self.action_entropy(&states).2);
        Ok(tensor_to_vec(&a))
    }

    fn learn(&mut self, batch: &TransitionBatch, recorder: &mut dyn Recorder) -> Result<()> {
        self.n_steps += 1;

        let (states, actions, rewards, next_states, dones) = self.batch_to_tensors(batch)?;

        // Current and target Q values.
        let (curr_q1, curr_q2) = self.calc_current_q(&states, &actions);
        let target_q = self.calc_target_q(&rewards, &next_states, &dones);

        // Current and target errors, as well as importance weights. The
        // error targets need the Q values computed above.
        let corr_terms = match &self.correction {
            None => None,
            Some(correction) => {
                let (curr_err1, curr_err2, imp_ws1, imp_ws2) =
                    correction.current_error(&states, &actions, self.gamma)?;
                let next_a = no_grad(|| self.action_entropy(&next_states).0);
                let (target_err1, target_err2) = correction.target_error(
                    &next_states,
                    &next_a,
                    &dones,
                    &curr_q1,
                    &curr_q2,
                    &target_q,
                    self.gamma,
                );
                Some((curr_err1, curr_err2, imp_ws1, imp_ws2, target_err1, target_err2))
            }
        };

        // Update policy.
        let (policy_loss, entropies) = self.calc_policy_loss(&states);
        ensure_finite(&policy_loss, "policy loss")?;
        self.pi.backward_step(&policy_loss);

        // Update Q functions.
        let weights = corr_terms
            .as_ref()
            .map(|(_, _, imp_ws1, imp_ws2, _, _)| (imp_ws1, imp_ws2));
        let (q_loss, mean_q1, mean_q2) =
            self.calc_q_loss(&curr_q1, &curr_q2, &target_q, weights)?;
        ensure_finite(&q_loss, "critic loss")?;
        self.critic.backward_step(&q_loss);

        // Update the entropy coefficient.
        let entropy_loss = match self.ent_coef.loss(&entropies) {
            Some(loss) => {
                ensure_finite(&loss, "entropy loss")?;
                let value = f32::try_from(&loss).unwrap();
                self.ent_coef.backward_step(&loss);
                value
            }
            None => 0f32,
        };

        // Update error models and refresh tau1/tau2.
        let error_loss = match &corr_terms {
            None => None,
            Some((curr_err1, curr_err2, _, _, target_err1, target_err2)) => {
                let correction = self.correction.as_mut().unwrap();
                let loss =
                    correction.error_loss(curr_err1, curr_err2, target_err1, target_err2);
                ensure_finite(&loss, "error loss")?;
                let value = f32::try_from(&loss).unwrap();
                correction.backward_step(&loss);
                correction.update_tau(curr_err1, curr_err2);
                Some(value)
            }
        };

        if self.n_steps % self.log_interval == 0 {
            let mut record = Record::from_slice(&[
                ("loss/policy", RecordValue::Scalar(f32::try_from(&policy_loss).unwrap())),
                ("loss/Q", RecordValue::Scalar(f32::try_from(&q_loss).unwrap())),
                ("loss/entropy", RecordValue::Scalar(entropy_loss)),
                (
                    "stats/alpha",
                    RecordValue::Scalar(f32::try_from(self.ent_coef.alpha()).unwrap()),
                ),
                ("stats/mean_Q1", RecordValue::Scalar(mean_q1)),
                ("stats/mean_Q2", RecordValue::Scalar(mean_q2)),
                (
                    "stats/entropy",
                    RecordValue::Scalar(f32::try_from(entropies.mean(tch::Kind::Float)).unwrap()),
                ),
            ]);
            if let (Some(error_loss), Some(correction)) = (error_loss, &self.correction) {
                record.insert("loss/error", RecordValue::Scalar(error_loss));
                record.insert("stats/tau1", RecordValue::Scalar(correction.tau1() as f32));
                record.insert("stats/tau2", RecordValue::Scalar(correction.tau2() as f32));
            }
            recorder.write(self.n_steps, record);
        }

        Ok(())
    }

    fn update_target(&mut self) {
        self.critic_tgt.track(&self.critic, self.target_update_coef);
        if let Some(correction) = &mut self.correction {
            correction.update_target(self.target_update_coef);
        }
    }

    fn n_steps(&self) -> usize {
        self.n_steps
    }

    fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        fs::create_dir_all(&path)?;
        self.pi.save(path.as_ref().join("policy.pt.tch").as_path())?;
        self.critic.save(path.as_ref().join("q.pt.tch").as_path())?;
        self.critic_tgt
            .save(path.as_ref().join("q_tgt.pt.tch").as_path())?;
        self.ent_coef
            .save(path.as_ref().join("ent_coef.pt.tch").as_path())?;
        if let Some(correction) = &self.correction {
            correction.save(&path)?;
        }
        Ok(())
    }

    fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.pi.load(path.as_ref().join("policy.pt.tch").as_path())?;
        self.critic.load(path.as_ref().join("q.pt.tch").as_path())?;
        self.critic_tgt
            .load(path.as_ref().join("q_tgt.pt.tch").as_path())?;
        self.ent_coef
            .load(path.as_ref().join("ent_coef.pt.tch").as_path())?;
        if let Some(correction) = &mut self.correction {
            correction.load(&path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Sac;
    use std::convert::TryFrom;
    use crate::{
        discor::CorrectionConfig,
        sac::{ActorConfig, CriticConfig, EntCoefMode, SacConfig},
        Mlp, Mlp2, MlpConfig, OptimizerConfig,
    };
    use discor_core::{
        error::DiscorError,
        record::{BufferedRecorder, NullRecorder},
        Learner, TransitionBatch,
    };
    use std::collections::HashMap;
    use tch::{nn::VarStore, no_grad, Kind, Tensor};

    const STATE_DIM: i64 = 3;
    const ACTION_DIM: i64 = 2;

    fn config(corrected: bool) -> SacConfig<Mlp, Mlp2> {
        let mut config = SacConfig::<Mlp, Mlp2>::default()
            .actor_config(
                ActorConfig::default()
                    .pi_config(MlpConfig::new(STATE_DIM, vec![16, 16], ACTION_DIM))
                    .opt_config(OptimizerConfig::Adam { lr: 3e-4 }),
            )
            .critic_config(
                CriticConfig::default()
                    .q_config(MlpConfig::new(STATE_DIM + ACTION_DIM, vec![16, 16], 1))
                    .opt_config(OptimizerConfig::Adam { lr: 3e-4 }),
            )
            .log_interval(1)
            .seed(42);
        if corrected {
            config = config.correction(
                CorrectionConfig::default()
                    .error_config(MlpConfig::new(STATE_DIM + ACTION_DIM, vec![16, 16, 16], 1))
                    .opt_config(OptimizerConfig::Adam { lr: 3e-4 }),
            );
        }
        config
    }

    fn learner(corrected: bool) -> Sac<Mlp, Mlp2> {
        Sac::build(config(corrected)).unwrap()
    }

    // All inputs zero except unit rewards and one terminal transition.
    fn scenario_batch() -> TransitionBatch {
        TransitionBatch {
            batch_size: 4,
            state_dim: STATE_DIM as usize,
            action_dim: ACTION_DIM as usize,
            states: vec![0.0; 12],
            actions: vec![0.0; 8],
            rewards: vec![1.0; 4],
            next_states: vec![0.0; 12],
            dones: vec![0.0, 0.0, 0.0, 1.0],
        }
    }

    fn snapshot(vs: &VarStore) -> HashMap<String, Tensor> {
        vs.variables()
            .iter()
            .map(|(k, v)| (k.clone(), v.copy()))
            .collect()
    }

    fn max_abs_diff(vs: &VarStore, snapshot: &HashMap<String, Tensor>) -> f64 {
        vs.variables()
            .iter()
            .map(|(k, v)| f64::try_from((v - &snapshot[k]).abs().max()).unwrap())
            .fold(0.0, f64::max)
    }

    #[test]
    fn learn_never_updates_target_networks() {
        let mut sac = learner(true);
        let q_tgt_before = snapshot(sac.critic_tgt.var_store());
        let err_tgt_before = snapshot(sac.correction.as_ref().unwrap().target_var_store());

        let mut recorder = NullRecorder {};
        for _ in 0..3 {
            sac.learn(&scenario_batch(), &mut recorder).unwrap();
        }

        assert_eq!(max_abs_diff(sac.critic_tgt.var_store(), &q_tgt_before), 0.0);
        assert_eq!(
            max_abs_diff(
                sac.correction.as_ref().unwrap().target_var_store(),
                &err_tgt_before
            ),
            0.0
        );
    }

    #[test]
    fn target_q_carries_no_gradient() {
        let sac = learner(false);
        let (_, _, rewards, next_states, dones) =
            sac.batch_to_tensors(&scenario_batch()).unwrap();
        let target_q = sac.calc_target_q(&rewards, &next_states, &dones);
        assert!(!target_q.requires_grad());
        assert_eq!(target_q.size(), vec![4, 1]);
    }

    #[test]
    fn target_q_uses_min_of_target_heads() {
        let mut config = config(false);
        // A near-deterministic policy and a vanishing temperature expose
        // the bootstrap term alone.
        config.min_lstd = -50.0;
        config.max_lstd = -50.0;
        config.ent_coef_mode = EntCoefMode::Fix(1e-30);
        let sac = Sac::build(config).unwrap();

        let (_, _, rewards, next_states, dones) =
            sac.batch_to_tensors(&scenario_batch()).unwrap();
        let target_q = sac.calc_target_q(&rewards, &next_states, &dones);

        let next_a = no_grad(|| sac.action_entropy(&next_states).0);
        let (q1, q2) = sac.critic_tgt.forward(&next_states, &next_a);
        let expected =
            &rewards + (1f32 - &dones) * Tensor::from(sac.gamma) * q1.minimum(&q2);

        assert!(f64::try_from((target_q - expected).abs().max()).unwrap() < 1e-4);
    }

    #[test]
    fn importance_weights_sum_to_one_per_head() {
        let sac = learner(true);
        let (states, actions, _, _, _) = sac.batch_to_tensors(&scenario_batch()).unwrap();
        let (_, _, imp_ws1, imp_ws2) = sac
            .correction
            .as_ref()
            .unwrap()
            .current_error(&states, &actions, sac.gamma)
            .unwrap();

        for w in [imp_ws1, imp_ws2].iter() {
            assert_eq!(w.size(), vec![4, 1]);
            assert!((f64::try_from(w.sum(Kind::Float)).unwrap() - 1.0).abs() < 1e-6);
            assert!(f64::try_from(w.min()).unwrap() >= 0.0);
        }
    }

    #[test]
    fn mismatched_second_head_is_rejected() {
        let sac = learner(false);
        let curr_q1 = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);
        let curr_q2 = Tensor::zeros(&[3, 1], tch::kind::FLOAT_CPU);
        let target_q = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);

        let err = sac
            .calc_q_loss(&curr_q1, &curr_q2, &target_q, None)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiscorError>(),
            Some(DiscorError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn invalid_weight_shape_is_rejected() {
        let sac = learner(false);
        let curr_q1 = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);
        let curr_q2 = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);
        let target_q = Tensor::zeros(&[4, 1], tch::kind::FLOAT_CPU);
        let bad_w = Tensor::ones(&[3, 1], tch::kind::FLOAT_CPU);
        let good_w = Tensor::full(&[4, 1], 0.25, tch::kind::FLOAT_CPU);

        let err = sac
            .calc_q_loss(&curr_q1, &curr_q2, &target_q, Some((&bad_w, &good_w)))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DiscorError>(),
            Some(DiscorError::InvalidWeight(_))
        ));
    }

    #[test]
    fn discor_scenario_learn_step() {
        let mut sac = learner(true);
        let batch = scenario_batch();

        // Mean current error per head, before any parameter moves.
        let (states, actions, _, _, _) = sac.batch_to_tensors(&batch).unwrap();
        let (curr_err1, curr_err2, _, _) = sac
            .correction
            .as_ref()
            .unwrap()
            .current_error(&states, &actions, sac.gamma)
            .unwrap();
        let mean_err1 = f64::try_from(curr_err1.mean(Kind::Float)).unwrap();
        let mean_err2 = f64::try_from(curr_err2.mean(Kind::Float)).unwrap();

        let pi_before = snapshot(sac.pi.var_store());
        let critic_before = snapshot(sac.critic.var_store());

        let mut recorder = BufferedRecorder::new();
        sac.learn(&batch, &mut recorder).unwrap();

        assert_eq!(sac.n_steps(), 1);
        assert_eq!(recorder.len(), 1);

        let (step, record) = recorder.iter().next().unwrap();
        assert_eq!(*step, 1);
        for key in [
            "loss/policy",
            "loss/Q",
            "loss/entropy",
            "loss/error",
            "stats/mean_Q1",
            "stats/mean_Q2",
            "stats/entropy",
            "stats/tau1",
            "stats/tau2",
        ]
        .iter()
        {
            let value = record.get_scalar(key).unwrap();
            assert!(value.is_finite(), "{} is {}", key, value);
        }
        assert!(record.get_scalar("stats/alpha").unwrap() > 0.0);

        // One EMA step from tau_init toward the mean current error.
        let correction = sac.correction.as_ref().unwrap();
        assert!((correction.tau1() - (10.0 * 0.995 + mean_err1 * 0.005)).abs() < 1e-6);
        assert!((correction.tau2() - (10.0 * 0.995 + mean_err2 * 0.005)).abs() < 1e-6);

        // Online parameters moved, but only by a bounded amount.
        let pi_moved = max_abs_diff(sac.pi.var_store(), &pi_before);
        let critic_moved = max_abs_diff(sac.critic.var_store(), &critic_before);
        assert!(pi_moved > 0.0 && pi_moved < 1e-2);
        assert!(critic_moved > 0.0 && critic_moved < 1e-2);
    }

    #[test]
    fn update_target_moves_targets_only() {
        let mut sac = learner(true);
        let mut recorder = NullRecorder {};
        sac.learn(&scenario_batch(), &mut recorder).unwrap();

        let q_tgt_before = snapshot(sac.critic_tgt.var_store());
        let q_before = snapshot(sac.critic.var_store());
        sac.update_target();

        assert!(max_abs_diff(sac.critic_tgt.var_store(), &q_tgt_before) > 0.0);
        assert_eq!(max_abs_diff(sac.critic.var_store(), &q_before), 0.0);
    }
}
