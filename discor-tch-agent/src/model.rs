//! Interfaces of neural network modules.
use tch::nn;

/// A network module with a single input.
///
/// Modules are built from an [`nn::Path`] rather than a whole var store so
/// that several independently parameterized modules can live under distinct
/// prefixes of one store and be optimized jointly.
pub trait SubModel1 {
    /// Configuration from which the module is constructed.
    type Config: Clone;

    /// Input of the module.
    type Input;

    /// Output of the module.
    type Output;

    /// Builds the module under the given path.
    fn build(p: &nn::Path, config: Self::Config) -> Self;

    /// Performs forward computation given an input.
    fn forward(&self, input: &Self::Input) -> Self::Output;
}

/// A network module with two inputs.
pub trait SubModel2 {
    /// Configuration from which the module is constructed.
    type Config: Clone;

    /// An input of the module.
    type Input1;

    /// The other input of the module.
    type Input2;

    /// Output of the module.
    type Output;

    /// Builds the module under the given path.
    fn build(p: &nn::Path, config: Self::Config) -> Self;

    /// Performs forward computation given a pair of inputs.
    fn forward(&self, input1: &Self::Input1, input2: &Self::Input2) -> Self::Output;
}
