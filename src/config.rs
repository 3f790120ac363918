//! Training configuration loaded from JSON.
//!
//! Every field is optional; missing fields take the defaults shown here.
//!
//! ```json
//! {
//!   "layers": [784, 30, 10],
//!   "learning_rate": 0.3,
//!   "epochs": 10,
//!   "train_count": 5000,
//!   "init": "uniform",
//!   "seed": 42,
//!   "shuffle_seed": 7
//! }
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    neural::{optimizer::Optimizer, Init, DEFAULT_LEARNING_RATE},
    prelude::*,
};

/// Parameter initialization named in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitKind {
    #[default]
    Zeros,
    Uniform,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Layer widths, input first.
    pub layers: Vec<usize>,
    pub learning_rate: Val,
    pub epochs: usize,
    /// Upper bound on training images read per epoch.
    pub train_count: usize,
    pub init: InitKind,
    /// Seed for `uniform` initialization.
    pub seed: u64,
    /// Shuffle training samples with this seed, offset by the epoch number so
    /// each epoch gets its own order. Without it samples keep list order.
    pub shuffle_seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            layers: vec![784, 30, 10],
            learning_rate: DEFAULT_LEARNING_RATE,
            epochs: 10,
            train_count: 5000,
            init: InitKind::Zeros,
            seed: 0,
            shuffle_seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.layers.len() < 2 {
            return Err(Error::Configuration(
                "layers must list at least an input and an output width".into(),
            ));
        }
        if self.layers.contains(&0) {
            return Err(Error::Configuration("layer widths must be positive".into()));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::Configuration(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.epochs == 0 {
            return Err(Error::Configuration("epochs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn init(&self) -> Init {
        match self.init {
            InitKind::Zeros => Init::Zeros,
            InitKind::Uniform => Init::Uniform { seed: self.seed },
        }
    }

    pub fn optimizer(&self) -> Optimizer {
        Optimizer::new(self.epochs, self.learning_rate).with_shuffle(self.shuffle_seed)
    }

    /// Single-epoch optimizer for epoch `epoch` of a run that reports
    /// between epochs. The shuffle seed is `shuffle_seed + epoch`.
    pub fn epoch_optimizer(&self, epoch: usize) -> Optimizer {
        let seed = self.shuffle_seed.map(|s| s.wrapping_add(epoch as u64));
        Optimizer::new(1, self.learning_rate).with_shuffle(seed)
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    TrainingConfig::from_json(&contents)
}
