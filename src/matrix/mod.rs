use crate::prelude::*;
use std::ops::{Index, IndexMut};

pub mod io;
pub mod ops;

/// Dense row-major matrix. Entry `(r, c)` lives at `r * cols + c`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Matrix2<T> {
    data: Vec<T>,
    dim: (usize, usize),
}

impl<T: Clone> Matrix2<T> {
    /// Creates a `rows x cols` matrix with every entry set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: vec![value; rows * cols],
            dim: (rows, cols),
        }
    }

    /// Returns a new matrix with `f` applied to every entry.
    pub fn apply<F: Fn(T) -> T>(&self, f: F) -> Self {
        Self {
            data: self.data.iter().cloned().map(f).collect(),
            dim: self.dim,
        }
    }
}

impl<T: Default + Clone> Matrix2<T> {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, T::default())
    }

    /// Applies a function to every element of the matrix in place
    pub fn apply_mut<F: FnMut(T) -> T>(&mut self, mut f: F) {
        for x in &mut self.data {
            let old = std::mem::take(x);
            *x = f(old);
        }
    }
}

impl Matrix2<Val> {
    /// `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut id = Self::new(n, n);
        for i in 0..n {
            id[(i, i)] = 1.0;
        }
        id
    }

    /// Row index of the largest entry in the first column. The first
    /// maximum wins on ties; `None` for an empty matrix.
    pub fn argmax(&self) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let mut best: Option<(usize, Val)> = None;
        for row in 0..self.rows() {
            let x = self[(row, 0)];
            if best.map_or(true, |(_, b)| x > b) {
                best = Some((row, x));
            }
        }
        best.map(|(row, _)| row)
    }
}

impl<T> Matrix2<T> {
    pub fn from_array<const R: usize, const C: usize>(arr: [[T; C]; R]) -> Self {
        let mut data = Vec::with_capacity(R * C);

        for row in arr {
            for x in row {
                data.push(x);
            }
        }

        Self { data, dim: (R, C) }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn rows(&self) -> usize {
        self.dim.0
    }

    pub fn cols(&self) -> usize {
        self.dim.1
    }

    /// Same as `rows`.
    pub fn height(&self) -> usize {
        self.dim.0
    }

    /// Same as `cols`.
    pub fn width(&self) -> usize {
        self.dim.1
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.dim.0 == 0 || self.dim.1 == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn from_row(row_vec: Vec<T>) -> Self {
        Self {
            dim: (1, row_vec.len()),
            data: row_vec,
        }
    }

    /// Builds an `n x 1` column matrix.
    pub fn column(col_vec: Vec<T>) -> Self {
        Self {
            dim: (col_vec.len(), 1),
            data: col_vec,
        }
    }

    pub fn from_vec(vec: Vec<Vec<T>>) -> Result<Self> {
        let rows = vec.len();
        let cols = vec.first().map(|row| row.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(rows * cols);
        for row in vec {
            if cols != row.len() {
                return Err(Error::ShapeMismatch {
                    op: "from_vec",
                    lhs: (rows, cols),
                    rhs: (1, row.len()),
                });
            }
            data.extend(row);
        }

        Ok(Self {
            data,
            dim: (rows, cols),
        })
    }

    pub fn to_vec(self) -> Vec<Vec<T>> {
        let cols = self.cols();
        let mut res = Vec::with_capacity(self.rows());
        let mut it = self.data.into_iter();
        for _ in 0..self.dim.0 {
            res.push(it.by_ref().take(cols).collect());
        }
        res
    }
}

impl<T> Index<(usize, usize)> for Matrix2<T> {
    type Output = T;
    fn index(&self, (i, j): (usize, usize)) -> &Self::Output {
        &self.data[i * self.cols() + j]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix2<T> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Self::Output {
        let idx = i * self.cols() + j;
        &mut self.data[idx]
    }
}
