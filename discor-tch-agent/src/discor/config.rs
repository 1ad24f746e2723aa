//! Configuration of the DisCor error correction.
use crate::opt::OptimizerConfig;
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ErrorCorrection`](super::ErrorCorrection).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CorrectionConfig<Q> {
    pub error_config: Option<Q>,
    pub opt_config: OptimizerConfig,

    /// Initial value of the error-scale trackers tau1 and tau2.
    pub tau_init: f64,

    /// EMA coefficient of the error-scale trackers.
    ///
    /// Configured independently of the target-network update coefficient,
    /// although the two default to the same value.
    pub tau_update_coef: f64,
}

impl<Q> Default for CorrectionConfig<Q> {
    fn default() -> Self {
        Self {
            error_config: None,
            opt_config: OptimizerConfig::Adam { lr: 0.0 },
            tau_init: 10.0,
            tau_update_coef: 0.005,
        }
    }
}

impl<Q> CorrectionConfig<Q>
where
    Q: DeserializeOwned + Serialize,
{
    /// Sets configuration of the twin error heads.
    pub fn error_config(mut self, v: Q) -> Self {
        self.error_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the initial value of tau1 and tau2.
    pub fn tau_init(mut self, v: f64) -> Self {
        self.tau_init = v;
        self
    }

    /// Sets the EMA coefficient of tau1 and tau2.
    pub fn tau_update_coef(mut self, v: f64) -> Self {
        self.tau_update_coef = v;
        self
    }

    /// Constructs [`CorrectionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CorrectionConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
