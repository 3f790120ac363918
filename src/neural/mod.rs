pub mod activations;
pub mod grad;
pub mod optimizer;

use crate::prelude::*;
use std::{
    fmt,
    io::{BufRead, Write},
    ops::Range,
    str::FromStr,
};

use crate::matrix::{
    io::Tokens,
    ops::{Dot, Transpose},
    Matrix2,
};
use log::debug;
use rand::{
    distributions::{Distribution, Uniform},
    rngs::StdRng,
    Rng, SeedableRng,
};

use self::{
    activations::{sigmoid, sigmoid_prime},
    grad::Gradients,
};

/// Learning rate used when the caller has no schedule of its own.
pub const DEFAULT_LEARNING_RATE: Val = 0.3;

/// How weights and biases are filled when a network is built.
///
/// All-zero parameters give every neuron in a layer the same gradient, so
/// hidden units never differentiate; `Uniform` breaks that symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Init {
    #[default]
    Zeros,
    /// Uniform in `[0, 1)` from a generator seeded with `seed`.
    Uniform { seed: u64 },
}

/// One training or evaluation example: an `n0 x 1` input column and the
/// `nL x 1` output it should produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub input: Matrix2<Val>,
    pub expected: Matrix2<Val>,
}

impl Sample {
    pub fn new(input: Matrix2<Val>, expected: Matrix2<Val>) -> Self {
        Self { input, expected }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DenseLayer {
    weights: Matrix2<Val>,
    biases: Matrix2<Val>,
}

/// Values recorded by a forward pass for use in backpropagation.
struct Trace {
    zs: Vec<Matrix2<Val>>,
    activations: Vec<Matrix2<Val>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NeuralNet {
    layer_sizes: Vec<usize>,
    layers: Vec<DenseLayer>,
}

impl DenseLayer {
    /// Initializes a zeroed layer given the number of inputs and neurons.
    pub fn new(n_inputs: usize, n_neurons: usize) -> Self {
        Self {
            weights: Matrix2::new(n_neurons, n_inputs),
            biases: Matrix2::new(n_neurons, 1),
        }
    }

    fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, range: Range<Val>) {
        let die = Uniform::from(range);
        self.biases.apply_mut(|_| die.sample(&mut *rng));
        self.weights.apply_mut(|_| die.sample(&mut *rng));
    }

    /// `n_neurons x n_inputs` weight matrix.
    pub fn weights(&self) -> &Matrix2<Val> {
        &self.weights
    }

    /// `n_neurons x 1` bias column.
    pub fn biases(&self) -> &Matrix2<Val> {
        &self.biases
    }

    /// Pre-activation `z = W·a + b`.
    pub fn pre_activation(&self, input: &Matrix2<Val>) -> Result<Matrix2<Val>> {
        &self.weights.dot(input)? + &self.biases
    }

    /// Propogates an input column through the layer applying the sigmoid.
    pub fn forward(&self, input: &Matrix2<Val>) -> Result<Matrix2<Val>> {
        Ok(self.pre_activation(input)?.apply(sigmoid))
    }
}

fn check_layer_sizes(layer_sizes: &[usize]) -> Result<()> {
    if layer_sizes.len() < 2 {
        return Err(Error::Configuration(format!(
            "a network needs at least 2 layers, got {}",
            layer_sizes.len()
        )));
    }
    if let Some(pos) = layer_sizes.iter().position(|&n| n == 0) {
        return Err(Error::Configuration(format!("layer {pos} has zero width")));
    }
    Ok(())
}

impl NeuralNet {
    /// Builds a network from layer widths `[n0, n1, ..., nL]`, where `n0` is
    /// the input width and `nL` the output width.
    pub fn new(layer_sizes: &[usize], init: Init) -> Result<Self> {
        match init {
            Init::Zeros => Self::zeros(layer_sizes),
            Init::Uniform { seed } => {
                Self::with_rng(layer_sizes, &mut StdRng::seed_from_u64(seed))
            }
        }
    }

    /// Network with every weight and bias set to zero.
    pub fn zeros(layer_sizes: &[usize]) -> Result<Self> {
        check_layer_sizes(layer_sizes)?;
        debug!("building zeroed network {layer_sizes:?}");

        let layers = layer_sizes
            .windows(2)
            .map(|w| DenseLayer::new(w[0], w[1]))
            .collect();

        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            layers,
        })
    }

    /// Network with parameters drawn uniformly from `[0, 1)` using `rng`.
    pub fn with_rng<R: Rng + ?Sized>(layer_sizes: &[usize], rng: &mut R) -> Result<Self> {
        let mut net = Self::zeros(layer_sizes)?;
        net.randomize(rng, 0.0..1.0);
        Ok(net)
    }

    /// Reset parameters to uniformly random values in `range`
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R, range: Range<Val>) {
        for layer in self.layers.iter_mut() {
            layer.randomize(rng, range.clone());
        }
    }

    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn input_amount(&self) -> usize {
        self.layer_sizes[0]
    }

    pub fn output_amount(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Feeds an `n0 x 1` column through every layer and returns the `nL x 1`
    /// output activation. Does not touch the network.
    pub fn classify(&self, input: &Matrix2<Val>) -> Result<Matrix2<Val>> {
        let mut activation = input.clone();
        for layer in &self.layers {
            activation = layer.forward(&activation)?;
        }
        Ok(activation)
    }

    fn trace(&self, input: &Matrix2<Val>) -> Result<Trace> {
        let mut zs = Vec::with_capacity(self.layers.len());
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input.clone());

        for layer in &self.layers {
            let z = layer.pre_activation(&activations[activations.len() - 1])?;
            activations.push(z.apply(sigmoid));
            zs.push(z);
        }

        Ok(Trace { zs, activations })
    }

    /// Computes ∇w and ∇b for a single example without changing the network.
    pub fn backprop(&self, input: &Matrix2<Val>, expected: &Matrix2<Val>) -> Result<Gradients> {
        let Trace { zs, activations } = self.trace(input)?;
        let last = self.layers.len() - 1;

        let mut nabla_w = vec![Matrix2::default(); self.layers.len()];
        let mut nabla_b = vec![Matrix2::default(); self.layers.len()];

        let error = (&activations[last + 1] - expected)?;
        let mut delta = (&error * &zs[last].apply(sigmoid_prime))?;
        nabla_w[last] = delta.dot(&activations[last].transpose())?;
        nabla_b[last] = delta.clone();

        // l -- current layer, walking from the second-to-last back to the first
        for l in (0..last).rev() {
            let sp = zs[l].apply(sigmoid_prime);
            let back = self.layers[l + 1].weights.transpose().dot(&delta)?;
            delta = (&back * &sp)?;
            nabla_w[l] = delta.dot(&activations[l].transpose())?;
            nabla_b[l] = delta.clone();
        }

        Ok(Gradients { nabla_w, nabla_b })
    }

    /// Applies `w <- w - eta * ∇w` and `b <- b - eta * ∇b` to every layer.
    /// Either every layer is updated or, on a shape error, none is.
    pub fn apply_gradients(&mut self, grads: &Gradients, eta: Val) -> Result<()> {
        if grads.layers() != self.layers.len() || grads.nabla_b.len() != self.layers.len() {
            return Err(Error::ShapeMismatch {
                op: "apply_gradients",
                lhs: (self.layers.len(), 1),
                rhs: (grads.layers(), 1),
            });
        }

        let mut updated = Vec::with_capacity(self.layers.len());
        for (layer, (nw, nb)) in self
            .layers
            .iter()
            .zip(grads.nabla_w.iter().zip(&grads.nabla_b))
        {
            updated.push(DenseLayer {
                weights: (&layer.weights - &(nw * eta))?,
                biases: (&layer.biases - &(nb * eta))?,
            });
        }

        self.layers = updated;
        Ok(())
    }

    /// One step of online gradient descent on a single example.
    pub fn learn(&mut self, input: &Matrix2<Val>, expected: &Matrix2<Val>, eta: Val) -> Result<()> {
        let grads = self.backprop(input, expected)?;
        self.apply_gradients(&grads, eta)
    }

    /// Mean-squared error over a set of samples
    pub fn mean_squared_error(&self, samples: &[Sample]) -> Result<Val> {
        let mut sum = 0.0;
        let mut count = 0usize;
        for sample in samples {
            let output = self.classify(&sample.input)?;
            let diff = (&output - &sample.expected)?;
            sum += diff.as_slice().iter().map(|d| d * d).sum::<Val>();
            count += diff.as_slice().len();
        }
        if count == 0 {
            return Ok(0.0);
        }
        Ok(sum / count as Val)
    }

    /// Writes layer sizes as a `1 x N` matrix, then every bias column, then
    /// every weight matrix, each block followed by a blank line.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write!(w, "{self}")?;
        Ok(())
    }

    /// Reads a network written by [`NeuralNet::write_to`].
    pub fn read_from<R: BufRead>(tokens: &mut Tokens<R>) -> Result<Self> {
        let sizes = Matrix2::<Val>::read_from(tokens)?;
        if sizes.rows() != 1 {
            return Err(Error::MalformedStream(format!(
                "layer sizes must be a single row, got {:?}",
                sizes.dim()
            )));
        }
        let layer_sizes = sizes
            .as_slice()
            .iter()
            .map(|&x| {
                if x.is_finite() && x >= 0.0 && x.fract() == 0.0 {
                    Ok(x as usize)
                } else {
                    Err(Error::MalformedStream(format!("invalid layer size {x}")))
                }
            })
            .collect::<Result<Vec<_>>>()?;
        check_layer_sizes(&layer_sizes)?;

        let count = layer_sizes.len() - 1;
        let mut biases = Vec::with_capacity(count);
        for l in 0..count {
            let b = Matrix2::read_from(tokens)?;
            expect_dim(&b, (layer_sizes[l + 1], 1), "bias", l)?;
            biases.push(b);
        }
        let mut layers = Vec::with_capacity(count);
        for (l, biases) in biases.into_iter().enumerate() {
            let weights = Matrix2::read_from(tokens)?;
            expect_dim(&weights, (layer_sizes[l + 1], layer_sizes[l]), "weight", l)?;
            layers.push(DenseLayer { weights, biases });
        }

        debug!("read network {layer_sizes:?}");
        Ok(Self {
            layer_sizes,
            layers,
        })
    }
}

fn expect_dim(m: &Matrix2<Val>, want: (usize, usize), what: &str, layer: usize) -> Result<()> {
    if m.dim() != want {
        return Err(Error::MalformedStream(format!(
            "{what} matrix {layer} is {:?}, expected {want:?}",
            m.dim()
        )));
    }
    Ok(())
}

impl fmt::Display for NeuralNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizes = Matrix2::from_row(self.layer_sizes.iter().map(|&n| n as Val).collect());
        writeln!(f, "{sizes}")?;
        for layer in &self.layers {
            writeln!(f, "{}", layer.biases)?;
        }
        for layer in &self.layers {
            writeln!(f, "{}", layer.weights)?;
        }
        Ok(())
    }
}

impl FromStr for NeuralNet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = Tokens::new(s.as_bytes());
        let net = Self::read_from(&mut tokens)?;
        tokens.expect_end()?;
        Ok(net)
    }
}
