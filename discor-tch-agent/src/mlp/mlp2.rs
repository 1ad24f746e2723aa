use super::{mlp, MlpConfig};
use crate::model::SubModel1;
use tch::{nn, nn::Module, Device, Tensor};

/// Multilayer perceptron with two output heads of the same size.
///
/// Used as the policy trunk: the heads are the mean and the log standard
/// deviation of a Gaussian over actions.
pub struct Mlp2 {
    device: Device,
    head1: nn::Linear,
    head2: nn::Linear,
    seq: nn::Sequential,
}

impl SubModel1 for Mlp2 {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = (Tensor, Tensor);

    fn build(p: &nn::Path, config: Self::Config) -> Self {
        let seq = mlp("al", p, &config);
        let in_dim = *config.units.last().unwrap_or(&config.in_dim);

        let head1 = nn::linear(p / "ml", in_dim, config.out_dim, Default::default());
        let head2 = nn::linear(p / "sl", in_dim, config.out_dim, Default::default());

        Self {
            device: p.device(),
            head1,
            head2,
            seq,
        }
    }

    fn forward(&self, input: &Self::Input) -> Self::Output {
        let x = self.seq.forward(&input.to(self.device));
        let mean = x.apply(&self.head1);
        let lstd = x.apply(&self.head2);
        (mean, lstd)
    }
}
