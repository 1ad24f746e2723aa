//! Distribution-correction (DisCor) extension of SAC.
//!
//! DisCor keeps a second twin estimator of the discounted cumulative
//! magnitude of future Bellman error and turns it into self-normalized
//! importance weights for the critic loss, down-weighting transitions
//! whose bootstrap targets are built on stale value estimates. The
//! extension is selected by configuration
//! ([`SacConfig::correction`](crate::sac::SacConfig::correction)); there is
//! no separate learner type.
mod base;
mod config;
pub use base::ErrorCorrection;
pub use config::CorrectionConfig;
