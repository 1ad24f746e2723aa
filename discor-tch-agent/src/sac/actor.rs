use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::OutDim,
};
use anyhow::{Context, Result};
use log::{info, trace};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use tch::{nn, Device, Tensor};

/// Configuration of [`Actor`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ActorConfig<P: OutDim> {
    pub pi_config: Option<P>,
    pub opt_config: OptimizerConfig,
}

impl<P: OutDim> Default for ActorConfig<P> {
    fn default() -> Self {
        Self {
            pi_config: None,
            opt_config: OptimizerConfig::Adam { lr: 0.0 },
        }
    }
}

impl<P> ActorConfig<P>
where
    P: DeserializeOwned + Serialize + OutDim,
{
    /// Sets configuration of the policy network.
    pub fn pi_config(mut self, v: P) -> Self {
        self.pi_config = Some(v);
        self
    }

    /// Sets output dimension of the model.
    pub fn out_dim(mut self, v: i64) -> Self {
        match &mut self.pi_config {
            None => {}
            Some(pi_config) => pi_config.set_out_dim(v),
        };
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`ActorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ActorConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Stochastic policy network.
///
/// Outputs the mean and the log standard deviation of a Gaussian over
/// unsquashed actions; sampling and squashing live in the learner.
pub struct Actor<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    var_store: nn::VarStore,

    // Dimension of the action vector.
    out_dim: i64,

    // Policy network
    pi: P,

    // Optimizer
    opt: Optimizer,
}

impl<P> Actor<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim,
{
    /// Constructs [`Actor`].
    pub fn build(config: ActorConfig<P::Config>, device: Device) -> Result<Actor<P>> {
        let pi_config = config.pi_config.context("pi_config is not set.")?;
        let out_dim = pi_config.get_out_dim();
        let var_store = nn::VarStore::new(device);
        let pi = P::build(&var_store.root(), pi_config);
        let opt = config.opt_config.build(&var_store)?;

        Ok(Actor {
            var_store,
            out_dim,
            pi,
            opt,
        })
    }

    /// Outputs the parameters of the Gaussian given a batch of states.
    pub fn forward(&self, x: &Tensor) -> (Tensor, Tensor) {
        let (mean, lstd) = self.pi.forward(x);
        debug_assert_eq!(mean.size().as_slice()[1], self.out_dim);
        debug_assert_eq!(lstd.size().as_slice()[1], self.out_dim);
        (mean, lstd)
    }

    /// Dimension of the action vector.
    pub fn out_dim(&self) -> i64 {
        self.out_dim
    }

    /// Trains the network given a loss.
    pub fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
    }

    pub(crate) fn var_store(&self) -> &nn::VarStore {
        &self.var_store
    }

    /// Save the parameters into a file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save actor to {:?}", path.as_ref());
        for (name, _) in self.var_store.variables().iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    /// Load the parameters from a file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load actor from {:?}", path.as_ref());
        Ok(())
    }
}
