//! Plain-text matrix format.
//!
//! ```text
//! <rows> <cols>
//! <v00> <v01> ... <v0(cols-1)>
//! ...
//! ```
//!
//! Values are written with `Display`, which for `f64` yields the shortest
//! text that parses back to the identical bit pattern, so a write/read cycle
//! is lossless.

use super::Matrix2;
use crate::prelude::*;
use std::{
    collections::VecDeque,
    fmt::{self, Display},
    io::{BufRead, Write},
    str::FromStr,
};

/// Whitespace-separated token reader over any buffered source. Lines are
/// pulled lazily, so several matrices can be read back to back.
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    /// Reads and parses the next token. `what` names the value in the error.
    pub fn parse<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self
            .next_token()?
            .ok_or_else(|| {
                Error::MalformedStream(format!("unexpected end of input reading {what}"))
            })?;
        token
            .parse()
            .map_err(|_| Error::MalformedStream(format!("invalid {what}: {token:?}")))
    }

    /// Fails if anything other than whitespace remains.
    pub fn expect_end(&mut self) -> Result<()> {
        match self.next_token()? {
            None => Ok(()),
            Some(token) => Err(Error::MalformedStream(format!(
                "trailing token {token:?}"
            ))),
        }
    }
}

impl<T: Display> Matrix2<T> {
    /// Writes the matrix in text form, one row per line.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<()> {
        write!(w, "{self}")?;
        Ok(())
    }
}

impl<T: FromStr> Matrix2<T> {
    /// Reads `rows cols` followed by exactly `rows * cols` values.
    pub fn read_from<R: BufRead>(tokens: &mut Tokens<R>) -> Result<Self> {
        let rows: usize = tokens.parse("matrix height")?;
        let cols: usize = tokens.parse("matrix width")?;

        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::MalformedStream(format!("matrix {rows}x{cols} too large")))?;
        let mut data = Vec::new();
        for _ in 0..len {
            data.push(tokens.parse("matrix entry")?);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }
}

impl<T: Display> Display for Matrix2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.rows(), self.cols())?;
        if self.cols() == 0 {
            for _ in 0..self.rows() {
                writeln!(f)?;
            }
            return Ok(());
        }
        for row in self.data.chunks(self.cols()) {
            let mut first = true;
            for x in row {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{x}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<T: FromStr> FromStr for Matrix2<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut tokens = Tokens::new(s.as_bytes());
        let matrix = Self::read_from(&mut tokens)?;
        tokens.expect_end()?;
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let matrix = Matrix2::from_array([[1.0, 2.5, -3.0], [0.125, 4.0, 6.0]]);
        assert_eq!(matrix.to_string(), "2 3\n1 2.5 -3\n0.125 4 6\n");
    }

    #[test]
    fn empty_matrix_text() {
        let matrix = Matrix2::<f64>::new(0, 3);
        assert_eq!(matrix.to_string(), "0 3\n");
        assert_eq!("0 3\n".parse::<Matrix2<f64>>().unwrap(), matrix);

        let matrix = Matrix2::<f64>::new(2, 0);
        assert_eq!(matrix.to_string(), "2 0\n\n\n");
        assert_eq!(matrix.to_string().parse::<Matrix2<f64>>().unwrap(), matrix);
    }

    #[test]
    fn round_trip_is_exact() {
        let matrix = Matrix2::from_array([
            [0.1, 1.0 / 3.0, -2.0e-300],
            [f64::MAX, 123456.789, std::f64::consts::PI],
        ]);
        let back: Matrix2<f64> = matrix.to_string().parse().unwrap();
        assert_eq!(back.dim(), matrix.dim());
        for (a, b) in back.as_slice().iter().zip(matrix.as_slice()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn reads_any_whitespace_layout() {
        let matrix: Matrix2<f64> = "2 2 1\n2\t3   4".parse().unwrap();
        assert_eq!(matrix.to_vec(), [[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn reads_consecutive_matrices() {
        let text = "1 2\n1 2\n\n2 1\n3\n4\n";
        let mut tokens = Tokens::new(text.as_bytes());
        let a = Matrix2::<f64>::read_from(&mut tokens).unwrap();
        let b = Matrix2::<f64>::read_from(&mut tokens).unwrap();
        tokens.expect_end().unwrap();
        assert_eq!(a.dim(), (1, 2));
        assert_eq!(b.to_vec(), [[3.0], [4.0]]);
    }

    #[test]
    fn short_stream_fails() {
        let res = "2 2\n1 2 3".parse::<Matrix2<f64>>();
        assert!(matches!(res, Err(Error::MalformedStream(_))));
    }

    #[test]
    fn non_numeric_token_fails() {
        let res = "1 2\n1 abc".parse::<Matrix2<f64>>();
        assert!(matches!(res, Err(Error::MalformedStream(_))));

        let res = "x 2\n1 2".parse::<Matrix2<f64>>();
        assert!(matches!(res, Err(Error::MalformedStream(_))));
    }

    #[test]
    fn write_to_buffer() {
        let mut buf = Vec::new();
        Matrix2::column(vec![0.5, 1.5]).write_to(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "2 1\n0.5\n1.5\n");
    }
}
