//! Utilities.
use log::trace;
use std::convert::TryFrom;
use tch::{nn::VarStore, Device, Tensor};

/// Apply soft update on variables.
///
/// Variables are identified by their names.
///
/// dest = tau * src + (1.0 - tau) * dest
pub fn track(dest: &mut VarStore, src: &VarStore, tau: f64) {
    let src = src.variables();
    let mut dest = dest.variables();
    debug_assert_eq!(src.len(), dest.len());

    tch::no_grad(|| {
        for (name, src) in src.iter() {
            let dest = dest.get_mut(name).unwrap();
            dest.copy_(&(tau * src + (1.0 - tau) * &*dest));
        }
    });
    trace!("soft update");
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Converts a slice of `f32` to a 2-dimensional tensor with a leading
/// batch dimension of one.
pub fn slice_to_tensor(s: &[f32], device: Device) -> Tensor {
    Tensor::from_slice(s).unsqueeze(0).to(device)
}

/// Flattens a tensor into a `Vec<f32>`.
pub fn tensor_to_vec(t: &Tensor) -> Vec<f32> {
    Vec::<f32>::try_from(&t.flatten(0, -1)).expect("Failed to convert from Tensor to Vec")
}
