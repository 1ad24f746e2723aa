//! Types and traits for recording training diagnostics.
//!
//! A [`Record`] is a key-value container filled by a learner once per
//! logged step; a [`Recorder`] is the sink those records flow into. The
//! transport behind a recorder (files, tensorboard, a tracking server) is
//! outside this crate; [`NullRecorder`] and [`BufferedRecorder`] cover the
//! no-op and in-memory cases.
mod base;
mod recorder;

pub use base::{Record, RecordValue};
pub use recorder::{BufferedRecorder, NullRecorder, Recorder};
