//! SAC and DisCor learning cores implemented with [tch](https://crates.io/crates/tch).
//!
//! The soft actor-critic learner lives in [`sac`]; the DisCor
//! error-correction extension in [`discor`] plugs into it through
//! [`sac::SacConfig::correction`], reweighting the critic loss by an
//! estimate of propagated Bellman error.
pub mod discor;
mod mlp;
mod model;
mod opt;
pub mod sac;
mod twin;
pub mod util;

pub use mlp::{Mlp, Mlp2, MlpConfig};
pub use model::{SubModel1, SubModel2};
pub use opt::{Optimizer, OptimizerConfig};
pub use twin::{Twin, TwinTarget};

use serde::{Deserialize, Serialize};

/// Device for tensor operations, serializable counterpart of [`tch::Device`].
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum Device {
    /// The CPU.
    Cpu,

    /// A CUDA device with the given index.
    Cuda(usize),
}

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(n) => tch::Device::Cuda(n),
        }
    }
}

impl From<tch::Device> for Device {
    fn from(device: tch::Device) -> Self {
        match device {
            tch::Device::Cpu => Device::Cpu,
            tch::Device::Cuda(n) => Device::Cuda(n),
            _ => panic!("Device {:?} is not supported", device),
        }
    }
}
