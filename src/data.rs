//! Loading digit images and their labels from disk.
//!
//! Images are plain-text (`P2`) PGM files. The digit an image shows is the
//! character right after the last `_` in its file name, e.g.
//! `test-image-6883_0.pgm` is a `0`.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::debug;

use crate::{
    matrix::{io::Tokens, Matrix2},
    neural::Sample,
    prelude::*,
};

/// Number of output classes for digit recognition.
pub const DIGITS: usize = 10;

/// Reads a P2 PGM image into a `(width * height) x 1` column with every
/// pixel divided by the image's max value.
pub fn load_pgm(path: impl AsRef<Path>) -> Result<Matrix2<Val>> {
    let file = File::open(path.as_ref())?;
    parse_pgm(BufReader::new(file))
}

pub fn parse_pgm<R: BufRead>(reader: R) -> Result<Matrix2<Val>> {
    let mut tokens = Tokens::new(reader);

    let header: String = tokens.parse("PGM header")?;
    if header != "P2" {
        return Err(Error::MalformedStream(format!(
            "only P2 PGM format is supported, got {header:?}"
        )));
    }
    let width: usize = tokens.parse("PGM width")?;
    let height: usize = tokens.parse("PGM height")?;
    let max_val: Val = tokens.parse("PGM max value")?;
    if max_val <= 0.0 {
        return Err(Error::MalformedStream(format!("PGM max value {max_val}")));
    }

    let len = width.checked_mul(height).ok_or_else(|| {
        Error::MalformedStream(format!("PGM size {width} x {height} overflows"))
    })?;

    let mut pixels = Vec::new();
    for _ in 0..len {
        let value: Val = tokens.parse("PGM pixel")?;
        pixels.push(value / max_val);
    }
    Ok(Matrix2::column(pixels))
}

/// One-hot `10 x 1` column for the digit encoded in `name`.
pub fn expected_digit_output(name: &str) -> Result<Matrix2<Val>> {
    let digit = name
        .rfind('_')
        .and_then(|pos| name[pos + 1..].chars().next())
        .and_then(|c| c.to_digit(10))
        .ok_or_else(|| Error::Configuration(format!("no digit label in {name:?}")))?;

    let mut expected = Matrix2::new(DIGITS, 1);
    expected[(digit as usize, 0)] = 1.0;
    Ok(expected)
}

/// First `limit` non-empty lines of a file listing image names.
pub fn read_file_list(path: impl AsRef<Path>, limit: usize) -> Result<Vec<String>> {
    let file = File::open(path.as_ref())?;
    let mut names = Vec::new();
    for line in BufReader::new(file).lines() {
        if names.len() >= limit {
            break;
        }
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_owned());
        }
    }
    debug!("read {} names from {}", names.len(), path.as_ref().display());
    Ok(names)
}

/// Loads each named image under `dir` together with its one-hot label.
pub fn load_samples<S: AsRef<str>>(dir: impl AsRef<Path>, names: &[S]) -> Result<Vec<Sample>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let input = load_pgm(dir.as_ref().join(name))?;
            Ok(Sample::new(input, expected_digit_output(name)?))
        })
        .collect()
}
