// Saving and loading networks, configs, and image sets through the filesystem.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
};

use rust_mlp::{
    config::{load_config, InitKind},
    data::{load_samples, read_file_list},
    matrix::io::Tokens,
    neural::optimizer::assess,
    prelude::Error,
    Init, NeuralNet,
};
use tempfile::{tempdir, NamedTempFile};

#[test]
fn network_file_round_trip() {
    let net = NeuralNet::new(&[5, 4, 3], Init::Uniform { seed: 21 }).unwrap();
    let file = NamedTempFile::new().unwrap();

    {
        let mut w = BufWriter::new(File::create(file.path()).unwrap());
        net.write_to(&mut w).unwrap();
        w.flush().unwrap();
    }

    let mut tokens = Tokens::new(BufReader::new(File::open(file.path()).unwrap()));
    let back = NeuralNet::read_from(&mut tokens).unwrap();
    tokens.expect_end().unwrap();

    assert_eq!(back, net);
}

#[test]
fn truncated_network_file_fails() {
    let net = NeuralNet::new(&[3, 2], Init::Uniform { seed: 2 }).unwrap();
    let text = net.to_string();
    let file = NamedTempFile::new().unwrap();
    fs::write(file.path(), &text[..text.len() / 2]).unwrap();

    let mut tokens = Tokens::new(BufReader::new(File::open(file.path()).unwrap()));
    assert!(matches!(
        NeuralNet::read_from(&mut tokens),
        Err(Error::MalformedStream(_))
    ));
}

#[test]
fn config_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"layers": [4, 3, 10], "init": "uniform", "seed": 3, "epochs": 2}}"#
    )
    .unwrap();

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.layers, [4, 3, 10]);
    assert_eq!(config.init, InitKind::Uniform);
    assert_eq!(config.epochs, 2);

    let net = NeuralNet::new(&config.layers, config.init()).unwrap();
    assert_eq!(net.layer_sizes(), [4, 3, 10]);
}

#[test]
fn image_set_from_directory() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("img-1_3.pgm"), "P2\n2 2\n255\n0 255\n255 0\n").unwrap();
    fs::write(dir.path().join("img-2_8.pgm"), "P2\n2 2\n255\n255 0\n0 255\n").unwrap();
    fs::write(dir.path().join("img-3_1.pgm"), "P2\n2 2\n255\n0 0\n0 0\n").unwrap();

    let list = dir.path().join("TrainingSetList.txt");
    fs::write(&list, "img-1_3.pgm\n\nimg-2_8.pgm\nimg-3_1.pgm\n").unwrap();

    let names = read_file_list(&list, 2).unwrap();
    assert_eq!(names, ["img-1_3.pgm", "img-2_8.pgm"]);

    let samples = load_samples(dir.path(), &names).unwrap();
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[0].input.as_slice(), &[0.0, 1.0, 1.0, 0.0]);
    assert_eq!(samples[0].expected.argmax(), Some(3));
    assert_eq!(samples[1].expected.argmax(), Some(8));

    // A zeroed net outputs 0.5 everywhere, so it always answers 0.
    let net = NeuralNet::new(&[4, 3, 10], Init::Zeros).unwrap();
    let assessment = assess(&net, &samples).unwrap();
    assert_eq!((assessment.correct, assessment.total), (0, 2));
}

#[test]
fn missing_image_is_io_error() {
    let dir = tempdir().unwrap();
    let res = load_samples(dir.path(), &["absent_4.pgm"]);
    assert!(matches!(res, Err(Error::Io(_))));
}
