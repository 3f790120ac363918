use std::fmt;

use log::{info, trace};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    neural::{NeuralNet, Sample},
    prelude::*,
};

/// Drives online training: every epoch calls [`NeuralNet::learn`] once per
/// sample with a fixed learning rate.
#[derive(Debug, Clone)]
pub struct Optimizer {
    epochs: usize,
    epochs_per_log: Option<usize>,
    shuffle_seed: Option<u64>,
    rate: Val,
}

/// Outcome of classifying a labelled set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Assessment {
    pub correct: usize,
    pub total: usize,
}

impl Assessment {
    /// Fraction of correctly classified samples; 0 for an empty set.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Correct classification: {} [{:.2}% ]",
            self.correct,
            self.accuracy() * 100.0
        )
    }
}

impl Optimizer {
    pub fn new(epochs: usize, rate: Val) -> Self {
        Self {
            epochs,
            epochs_per_log: None,
            shuffle_seed: None,
            rate,
        }
    }

    /// Log the mean-squared error every `epochs_per_log` epochs.
    pub fn with_log(mut self, epochs_per_log: Option<usize>) -> Self {
        self.epochs_per_log = epochs_per_log;
        self
    }

    /// Visit samples in a seeded random order. One generator serves the whole
    /// [`train`](Self::train) call, so its epochs are shuffled differently.
    pub fn with_shuffle(mut self, seed: Option<u64>) -> Self {
        self.shuffle_seed = seed;
        self
    }

    pub fn rate(&self) -> Val {
        self.rate
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn train(&self, net: &mut NeuralNet, samples: &[Sample]) -> Result<()> {
        let mut rng = self.shuffle_seed.map(StdRng::seed_from_u64);
        let mut order: Vec<usize> = (0..samples.len()).collect();

        for epoch in 0..self.epochs {
            if let Some(rng) = rng.as_mut() {
                order.shuffle(rng);
            }
            self.train_epoch(net, samples, &order)?;

            if self.epochs_per_log.is_some_and(|epl| epl > 0 && epoch % epl == 0) {
                let mse = net.mean_squared_error(samples)?;
                info!("epoch {epoch} error: {mse}");
            }
        }
        Ok(())
    }

    /// One pass over `samples`, visiting them in `order`.
    fn train_epoch(&self, net: &mut NeuralNet, samples: &[Sample], order: &[usize]) -> Result<()> {
        for &i in order {
            let sample = &samples[i];
            net.learn(&sample.input, &sample.expected, self.rate)?;
            trace!("learned sample {i}");
        }
        Ok(())
    }
}

/// Counts how many samples `net` classifies correctly, comparing the index
/// of the largest expected entry with the index of the largest output.
pub fn assess(net: &NeuralNet, samples: &[Sample]) -> Result<Assessment> {
    let mut assessment = Assessment::default();
    for sample in samples {
        let output = net.classify(&sample.input)?;
        if output.argmax() == sample.expected.argmax() {
            assessment.correct += 1;
        }
        assessment.total += 1;
    }
    Ok(assessment)
}
