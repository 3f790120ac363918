use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use log::{error, info};
use rust_mlp::{
    config::{load_config, TrainingConfig},
    data::{load_samples, read_file_list, DIGITS},
    matrix::io::Tokens,
    neural::optimizer::assess,
    prelude::*,
    NeuralNet,
};

/// Trains a sigmoid network to recognize handwritten digits stored as P2 PGM
/// images, reporting test accuracy after every epoch.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding the training and testing images
    img_path: PathBuf,

    /// Number of training images to use [default: 5000, or from --config]
    train_count: Option<usize>,

    /// Number of training epochs [default: 10, or from --config]
    epochs: Option<usize>,

    /// File listing the training image names, one per line
    #[arg(default_value = "TrainingSetList.txt")]
    train_list: PathBuf,

    /// File listing the testing image names, one per line
    #[arg(default_value = "TestingSetList.txt")]
    test_list: PathBuf,

    /// JSON training configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Learning rate, overriding the configuration
    #[arg(long)]
    rate: Option<Val>,

    /// Start from a previously saved network instead of a fresh one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the trained network here when done
    #[arg(long)]
    save: Option<PathBuf>,
}

fn training_config(args: &Args) -> Result<TrainingConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TrainingConfig::default(),
    };
    if let Some(count) = args.train_count {
        config.train_count = count;
    }
    if let Some(epochs) = args.epochs {
        config.epochs = epochs;
    }
    if let Some(rate) = args.rate {
        config.learning_rate = rate;
    }
    config.validate()?;
    Ok(config)
}

fn build_net(args: &Args, config: &TrainingConfig) -> Result<NeuralNet> {
    let net = match &args.load {
        Some(path) => {
            let mut tokens = Tokens::new(BufReader::new(File::open(path)?));
            NeuralNet::read_from(&mut tokens)?
        }
        None => NeuralNet::new(&config.layers, config.init())?,
    };
    if net.output_amount() != DIGITS {
        return Err(Error::Configuration(format!(
            "network has {} outputs, digits need {DIGITS}",
            net.output_amount()
        )));
    }
    Ok(net)
}

fn run(args: Args) -> Result<()> {
    let config = training_config(&args)?;
    let mut net = build_net(&args, &config)?;
    info!("network layers {:?}", net.layer_sizes());

    let train_names = read_file_list(&args.train_list, config.train_count)?;
    let test_names = read_file_list(&args.test_list, usize::MAX)?;
    let train = load_samples(&args.img_path, &train_names)?;
    let test = load_samples(&args.img_path, &test_names)?;

    for epoch in 0..config.epochs {
        println!("-- Epoch #{epoch} --");
        println!("Training with {} images...", train.len());
        let start = Instant::now();

        config.epoch_optimizer(epoch).train(&mut net, &train)?;
        println!("{}", assess(&net, &test)?);

        println!("Elapsed time = {} milliseconds.", start.elapsed().as_millis());
    }

    if let Some(path) = &args.save {
        let mut w = BufWriter::new(File::create(path)?);
        net.write_to(&mut w)?;
        w.flush()?;
        info!("saved network to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
