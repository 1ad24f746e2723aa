//! Configuration of SAC agent.
use super::{ActorConfig, EntCoefMode};
use crate::{
    discor::CorrectionConfig,
    model::{SubModel1, SubModel2},
    opt::OptimizerConfig,
    util::OutDim,
    Device,
};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tch::Tensor;

/// Configuration of the twin critic.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CriticConfig<Q> {
    pub q_config: Option<Q>,
    pub opt_config: OptimizerConfig,
}

impl<Q> Default for CriticConfig<Q> {
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::Adam { lr: 0.0 },
        }
    }
}

impl<Q> CriticConfig<Q>
where
    Q: DeserializeOwned + Serialize,
{
    /// Sets configuration of the twin heads.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`CriticConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CriticConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Constructs [`Sac`](super::Sac).
#[derive(Deserialize, Serialize)]
pub struct SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    pub(super) actor_config: ActorConfig<P::Config>,
    pub(super) critic_config: CriticConfig<Q::Config>,
    pub(super) correction: Option<CorrectionConfig<Q::Config>>,
    pub(super) ent_coef_mode: EntCoefMode,
    pub(super) gamma: f64,
    pub(super) target_update_coef: f64,
    pub(super) epsilon: f64,
    pub(super) min_lstd: f64,
    pub(super) max_lstd: f64,
    pub(super) log_interval: usize,
    pub(super) seed: Option<i64>,
    pub device: Option<Device>,
}

impl<Q, P> Debug for SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SacConfig")
            .field("actor_config", &self.actor_config)
            .field("critic_config", &self.critic_config)
            .field("correction", &self.correction)
            .field("ent_coef_mode", &self.ent_coef_mode)
            .field("gamma", &self.gamma)
            .field("target_update_coef", &self.target_update_coef)
            .field("epsilon", &self.epsilon)
            .field("min_lstd", &self.min_lstd)
            .field("max_lstd", &self.max_lstd)
            .field("log_interval", &self.log_interval)
            .field("seed", &self.seed)
            .field("device", &self.device)
            .finish()
    }
}

impl<Q, P> PartialEq for SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    fn eq(&self, other: &Self) -> bool {
        self.actor_config == other.actor_config
            && self.critic_config == other.critic_config
            && self.correction == other.correction
            && self.ent_coef_mode == other.ent_coef_mode
            && self.gamma == other.gamma
            && self.target_update_coef == other.target_update_coef
            && self.epsilon == other.epsilon
            && self.min_lstd == other.min_lstd
            && self.max_lstd == other.max_lstd
            && self.log_interval == other.log_interval
            && self.seed == other.seed
            && self.device == other.device
    }
}

impl<Q, P> Clone for SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    fn clone(&self) -> Self {
        Self {
            actor_config: self.actor_config.clone(),
            critic_config: self.critic_config.clone(),
            correction: self.correction.clone(),
            ent_coef_mode: self.ent_coef_mode.clone(),
            gamma: self.gamma,
            target_update_coef: self.target_update_coef,
            epsilon: self.epsilon,
            min_lstd: self.min_lstd,
            max_lstd: self.max_lstd,
            log_interval: self.log_interval,
            seed: self.seed,
            device: self.device,
        }
    }
}

impl<Q, P> Default for SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    fn default() -> Self {
        Self {
            actor_config: Default::default(),
            critic_config: Default::default(),
            correction: None,
            ent_coef_mode: EntCoefMode::Auto { lr: 3e-4 },
            gamma: 0.99,
            target_update_coef: 0.005,
            epsilon: 1e-4,
            min_lstd: -20.0,
            max_lstd: 2.0,
            log_interval: 10,
            seed: None,
            device: None,
        }
    }
}

impl<Q, P> SacConfig<Q, P>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + Debug + PartialEq + Clone,
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Debug + PartialEq + Clone,
{
    /// Configuration of actor.
    pub fn actor_config(mut self, actor_config: ActorConfig<P::Config>) -> Self {
        self.actor_config = actor_config;
        self
    }

    /// Configuration of critic.
    pub fn critic_config(mut self, critic_config: CriticConfig<Q::Config>) -> Self {
        self.critic_config = critic_config;
        self
    }

    /// Enables the error-corrected critic weighting.
    pub fn correction(mut self, correction: CorrectionConfig<Q::Config>) -> Self {
        self.correction = Some(correction);
        self
    }

    /// Mode of the entropy coefficient.
    pub fn ent_coef_mode(mut self, v: EntCoefMode) -> Self {
        self.ent_coef_mode = v;
        self
    }

    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the coefficient of the target-network soft updates.
    pub fn target_update_coef(mut self, v: f64) -> Self {
        self.target_update_coef = v;
        self
    }

    /// Interval of steps between diagnostic records.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Random seed.
    pub fn seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Device.
    pub fn device(mut self, device: tch::Device) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Constructs [`SacConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of SAC agent from {}", path_.to_str().unwrap());
        Ok(b)
    }

    /// Saves [`SacConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of SAC agent into {}", path_.to_str().unwrap());
        Ok(())
    }
}
