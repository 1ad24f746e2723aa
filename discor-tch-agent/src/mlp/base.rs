use super::{mlp, MlpConfig};
use crate::model::{SubModel1, SubModel2};
use tch::{nn, nn::Module, Device, Tensor};

/// Multilayer perceptron with ReLU activation function.
pub struct Mlp {
    device: Device,
    seq: nn::Sequential,
}

impl Mlp {
    fn create_net(p: &nn::Path, config: &MlpConfig) -> nn::Sequential {
        let in_dim = *config.units.last().unwrap_or(&config.in_dim);
        mlp("ln", p, config).add(nn::linear(
            p / format!("ln{}", config.units.len()),
            in_dim,
            config.out_dim,
            Default::default(),
        ))
    }
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn build(p: &nn::Path, config: Self::Config) -> Self {
        Self {
            device: p.device(),
            seq: Self::create_net(p, &config),
        }
    }

    fn forward(&self, x: &Self::Input) -> Tensor {
        self.seq.forward(&x.to(self.device))
    }
}

impl SubModel2 for Mlp {
    type Config = MlpConfig;
    type Input1 = Tensor;
    type Input2 = Tensor;
    type Output = Tensor;

    fn build(p: &nn::Path, config: Self::Config) -> Self {
        <Self as SubModel1>::build(p, config)
    }

    fn forward(&self, input1: &Self::Input1, input2: &Self::Input2) -> Self::Output {
        let input1: Tensor = input1.to(self.device);
        let input2: Tensor = input2.to(self.device);
        let input = Tensor::cat(&[input1, input2], -1);
        self.seq.forward(&input)
    }
}
