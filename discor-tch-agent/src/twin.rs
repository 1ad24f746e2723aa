//! Twin scalar estimator over (state, action) pairs.
//!
//! One [`Twin`] holds two independently parameterized heads in a single
//! var store, optimized jointly by one combined loss. It backs both the
//! action-value function and the propagated-error estimator. A
//! [`TwinTarget`] is a frozen copy that can only be read and smoothed
//! toward its online counterpart; the type exposes no optimizer and its
//! variables carry no gradients.
use crate::{
    model::SubModel2,
    opt::{Optimizer, OptimizerConfig},
    util::track,
};
use anyhow::Result;
use log::{info, trace};
use std::path::Path;
use tch::{nn::VarStore, Device, Tensor};

/// Online twin estimator.
pub struct Twin<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    device: Device,
    var_store: VarStore,
    config: Q::Config,
    q1: Q,
    q2: Q,
    opt: Optimizer,
}

impl<Q> Twin<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    /// Builds the twin estimator and its optimizer.
    pub fn build(config: Q::Config, opt_config: OptimizerConfig, device: Device) -> Result<Self> {
        let var_store = VarStore::new(device);
        let q1 = Q::build(&(var_store.root() / "q1"), config.clone());
        let q2 = Q::build(&(var_store.root() / "q2"), config.clone());
        let opt = opt_config.build(&var_store)?;

        Ok(Self {
            device,
            var_store,
            config,
            q1,
            q2,
            opt,
        })
    }

    /// Evaluates both heads at the given (state, action) batch.
    pub fn forward(&self, states: &Tensor, actions: &Tensor) -> (Tensor, Tensor) {
        (
            self.q1.forward(states, actions),
            self.q2.forward(states, actions),
        )
    }

    /// Resets gradients, backpropagates the combined loss of both heads
    /// and applies one update.
    pub fn backward_step(&mut self, loss: &Tensor) {
        self.opt.backward_step(loss);
    }

    /// Creates the frozen target copy of this estimator.
    pub fn target(&self) -> Result<TwinTarget<Q>> {
        TwinTarget::copy_of(self)
    }

    pub(crate) fn var_store(&self) -> &VarStore {
        &self.var_store
    }

    /// Save the parameters into a file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save twin estimator to {:?}", path.as_ref());
        for (name, _) in self.var_store.variables().iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    /// Load the parameters from a file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load twin estimator from {:?}", path.as_ref());
        Ok(())
    }
}

/// Frozen target copy of a [`Twin`].
///
/// Constructed only from an online twin; initialized as an exact copy and
/// thereafter written exclusively by [`TwinTarget::track`].
pub struct TwinTarget<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    var_store: VarStore,
    q1: Q,
    q2: Q,
}

impl<Q> TwinTarget<Q>
where
    Q: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
{
    fn copy_of(src: &Twin<Q>) -> Result<Self> {
        let mut var_store = VarStore::new(src.device);
        let q1 = Q::build(&(var_store.root() / "q1"), src.config.clone());
        let q2 = Q::build(&(var_store.root() / "q2"), src.config.clone());
        var_store.copy(&src.var_store)?;
        var_store.freeze();

        Ok(Self { var_store, q1, q2 })
    }

    /// Evaluates both heads at the given (state, action) batch.
    pub fn forward(&self, states: &Tensor, actions: &Tensor) -> (Tensor, Tensor) {
        (
            self.q1.forward(states, actions),
            self.q2.forward(states, actions),
        )
    }

    /// One Polyak step toward the online estimator.
    pub fn track(&mut self, src: &Twin<Q>, tau: f64) {
        track(&mut self.var_store, src.var_store(), tau);
    }

    pub(crate) fn var_store(&self) -> &VarStore {
        &self.var_store
    }

    /// Save the parameters into a file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save target twin estimator to {:?}", path.as_ref());
        Ok(())
    }

    /// Load the parameters from a file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        self.var_store.freeze();
        info!("Load target twin estimator from {:?}", path.as_ref());
        Ok(())
    }
}
