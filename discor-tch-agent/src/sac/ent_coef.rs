//! Entropy coefficient of SAC.
use crate::opt::{Optimizer, OptimizerConfig};
use anyhow::Result;
use log::{info, trace};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tch::{nn, nn::Init, Tensor};

/// Mode of the entropy coefficient of SAC.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum EntCoefMode {
    /// Use a constant as alpha.
    Fix(f64),
    /// Automatic tuning with the given learning rate.
    ///
    /// The target entropy is the fixed heuristic `-action_dim`.
    Auto {
        /// Learning rate of `log_alpha`.
        lr: f64,
    },
}

/// The entropy coefficient of SAC.
///
/// Internally this is `exp(log_alpha)`, so gradient descent on
/// `log_alpha` can never produce a non-positive temperature.
pub struct EntCoef {
    var_store: nn::VarStore,
    log_alpha: Tensor,
    target_entropy: Option<f64>,
    opt: Option<Optimizer>,
}

impl EntCoef {
    /// Constructs an instance of `EntCoef`.
    ///
    /// `target_entropy` is only consulted in [`EntCoefMode::Auto`].
    pub fn new(mode: EntCoefMode, target_entropy: f64, device: tch::Device) -> Result<Self> {
        let var_store = nn::VarStore::new(device);
        let path = var_store.root();
        let (log_alpha, target_entropy, opt) = match mode {
            EntCoefMode::Fix(alpha) => {
                let log_alpha = path.var("log_alpha", &[1], Init::Const(alpha.ln()));
                (log_alpha, None, None)
            }
            EntCoefMode::Auto { lr } => {
                let log_alpha = path.var("log_alpha", &[1], Init::Const(0.0));
                let opt = OptimizerConfig::Adam { lr }.build(&var_store)?;
                (log_alpha, Some(target_entropy), Some(opt))
            }
        };

        Ok(Self {
            var_store,
            log_alpha,
            target_entropy,
            opt,
        })
    }

    /// Returns the entropy coefficient, detached and strictly positive.
    pub fn alpha(&self) -> Tensor {
        self.log_alpha.detach().exp()
    }

    /// Loss of `log_alpha` given detached per-sample entropies.
    ///
    /// `-mean(log_alpha * (target_entropy - entropy))`: alpha grows while
    /// the realized entropy stays below the target, and shrinks above it.
    /// Returns `None` when the coefficient is fixed.
    pub fn loss(&self, entropies: &Tensor) -> Option<Tensor> {
        self.target_entropy.map(|target_entropy| {
            let target_entropy = Tensor::from(target_entropy as f32);
            -(&self.log_alpha * (target_entropy - entropies.detach())).mean(tch::Kind::Float)
        })
    }

    /// Does an optimization step given a loss.
    pub fn backward_step(&mut self, loss: &Tensor) {
        if let Some(opt) = &mut self.opt {
            opt.backward_step(loss);
        }
    }

    /// Save the parameter into a file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.var_store.save(&path)?;
        info!("Save entropy coefficient to {:?}", path.as_ref());
        for (name, _) in self.var_store.variables().iter() {
            trace!("Save variable {}", name);
        }
        Ok(())
    }

    /// Load the parameter from a file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.var_store.load(&path)?;
        info!("Load entropy coefficient from {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{EntCoef, EntCoefMode};
    use std::convert::TryFrom;
    use tch::Device;

    #[test]
    fn alpha_is_positive_for_any_finite_log_alpha() {
        for init in [-50.0f64, -5.0, 0.0, 5.0] {
            let ent_coef =
                EntCoef::new(EntCoefMode::Fix(init.exp()), -2.0, Device::Cpu).unwrap();
            let alpha = f64::try_from(ent_coef.alpha()).unwrap();
            assert!(alpha > 0.0, "alpha = {} for log_alpha = {}", alpha, init);
        }
    }

    #[test]
    fn fixed_mode_has_no_loss() {
        let ent_coef = EntCoef::new(EntCoefMode::Fix(0.2), -2.0, Device::Cpu).unwrap();
        let entropies = tch::Tensor::from_slice(&[1.0f32, 2.0]).view([2, 1]);
        assert!(ent_coef.loss(&entropies).is_none());
        assert!((f64::try_from(ent_coef.alpha()).unwrap() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn auto_mode_increases_alpha_below_target_entropy() {
        let mut ent_coef =
            EntCoef::new(EntCoefMode::Auto { lr: 1e-2 }, -2.0, Device::Cpu).unwrap();
        let before = f64::try_from(ent_coef.alpha()).unwrap();
        // Entropies far below the target push alpha up.
        let entropies = tch::Tensor::from_slice(&[-10.0f32, -10.0]).view([2, 1]);
        for _ in 0..5 {
            let loss = ent_coef.loss(&entropies).unwrap();
            ent_coef.backward_step(&loss);
        }
        assert!(f64::try_from(ent_coef.alpha()).unwrap() > before);
    }
}
