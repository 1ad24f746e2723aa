//! SAC agent.
mod actor;
mod base;
mod config;
mod ent_coef;
pub use actor::{Actor, ActorConfig};
pub use base::Sac;
pub use config::{CriticConfig, SacConfig};
pub use ent_coef::{EntCoef, EntCoefMode};
