use crate::{matrix::Matrix2, prelude::*};

use super::NeuralNet;

/// Per-layer gradients (∇w, ∇b) in input-to-output layer order.
///
/// Computing these is separate from applying them, so several workers can
/// each produce `Gradients` for their own samples and a single owner can
/// `accumulate` them before calling [`NeuralNet::apply_gradients`].
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub nabla_w: Vec<Matrix2<Val>>,
    pub nabla_b: Vec<Matrix2<Val>>,
}

impl Gradients {
    /// Zero gradients shaped like `net`'s weights and biases.
    pub fn zeros(net: &NeuralNet) -> Self {
        let mut nabla_w = Vec::with_capacity(net.layers.len());
        let mut nabla_b = Vec::with_capacity(net.layers.len());

        for layer in &net.layers {
            nabla_w.push(Matrix2::new(layer.weights.rows(), layer.weights.cols()));
            nabla_b.push(Matrix2::new(layer.biases.rows(), 1));
        }

        Self { nabla_w, nabla_b }
    }

    pub fn layers(&self) -> usize {
        self.nabla_w.len()
    }

    /// Adds `other` into `self` layer by layer.
    pub fn accumulate(&mut self, other: &Gradients) -> Result<()> {
        if self.layers() != other.layers() {
            return Err(Error::ShapeMismatch {
                op: "accumulate",
                lhs: (self.layers(), 1),
                rhs: (other.layers(), 1),
            });
        }

        let nabla_w = self
            .nabla_w
            .iter()
            .zip(&other.nabla_w)
            .map(|(a, b)| a + b)
            .collect::<Result<Vec<_>>>()?;
        let nabla_b = self
            .nabla_b
            .iter()
            .zip(&other.nabla_b)
            .map(|(a, b)| a + b)
            .collect::<Result<Vec<_>>>()?;

        self.nabla_w = nabla_w;
        self.nabla_b = nabla_b;
        Ok(())
    }

    /// Multiplies every gradient entry by `k`, e.g. `1 / n` to average.
    pub fn scale(&mut self, k: Val) {
        for m in self.nabla_w.iter_mut().chain(self.nabla_b.iter_mut()) {
            m.apply_mut(|x| x * k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neural::Init;

    #[test]
    fn zeros_match_network_shapes() {
        let net = NeuralNet::new(&[3, 4, 2], Init::Zeros).unwrap();
        let grads = Gradients::zeros(&net);

        assert_eq!(grads.layers(), 2);
        assert_eq!(grads.nabla_w[0].dim(), (4, 3));
        assert_eq!(grads.nabla_w[1].dim(), (2, 4));
        assert_eq!(grads.nabla_b[0].dim(), (4, 1));
        assert_eq!(grads.nabla_b[1].dim(), (2, 1));
    }

    #[test]
    fn accumulate_and_scale() {
        let net = NeuralNet::new(&[2, 1], Init::Zeros).unwrap();
        let mut total = Gradients::zeros(&net);
        let step = Gradients {
            nabla_w: vec![Matrix2::from_array([[1.0, -2.0]])],
            nabla_b: vec![Matrix2::from_array([[0.5]])],
        };

        total.accumulate(&step).unwrap();
        total.accumulate(&step).unwrap();
        total.scale(0.5);

        assert_eq!(total, step);
    }

    #[test]
    fn accumulate_rejects_other_network() {
        let small = NeuralNet::new(&[2, 1], Init::Zeros).unwrap();
        let big = NeuralNet::new(&[2, 3, 1], Init::Zeros).unwrap();

        let mut grads = Gradients::zeros(&small);
        let res = grads.accumulate(&Gradients::zeros(&big));
        assert!(matches!(res, Err(Error::ShapeMismatch { .. })));
    }
}
