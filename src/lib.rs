//! A minimal multilayer-perceptron trainer built on a dense matrix type.
//!
//! [`matrix::Matrix2`] holds the numbers; [`neural::NeuralNet`] feeds them
//! forward through sigmoid layers and learns one example at a time with
//! backpropagation.

pub mod config;
pub mod data;
pub mod matrix;
pub mod neural;
pub mod prelude;

pub use matrix::Matrix2;
pub use neural::{Init, NeuralNet, Sample};
