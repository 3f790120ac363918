use super::Matrix2;
use crate::prelude::*;
use std::ops::{Add, AddAssign, Mul, Sub};

pub trait Dot<I> {
    type Output;
    fn dot(self, rhs: I) -> Result<Self::Output>;
}

pub trait Transpose {
    fn transpose(&self) -> Self;
}

impl<T: Default + Copy> Transpose for Matrix2<T> {
    fn transpose(&self) -> Self {
        // Nothing to flip when a dimension is zero; the shape is kept as is.
        if self.is_empty() {
            return self.clone();
        }

        let mut transposed = Matrix2::new(self.cols(), self.rows());

        for row in 0..self.rows() {
            for col in 0..self.cols() {
                transposed[(col, row)] = self[(row, col)];
            }
        }
        transposed
    }
}

impl<'a, T> Dot<&Matrix2<T>> for &'a Matrix2<T>
where
    T: Mul<Output = T> + Default + AddAssign + Copy,
{
    type Output = Matrix2<T>;

    /// Matrix product. The right operand is transposed first so both
    /// inner-loop reads are sequential; the sum still runs over `k` in
    /// increasing order, matching the naive triple loop bit for bit.
    fn dot(self, rhs: &Matrix2<T>) -> Result<Self::Output> {
        if self.cols() != rhs.rows() {
            return Err(Error::ShapeMismatch {
                op: "dot",
                lhs: self.dim,
                rhs: rhs.dim,
            });
        }

        let rhs_t = rhs.transpose();
        let inner = self.cols();
        let mut data = Vec::with_capacity(self.rows() * rhs.cols());

        for lhs_row in 0..self.rows() {
            let a = &self.data[lhs_row * inner..(lhs_row + 1) * inner];
            for rhs_col in 0..rhs.cols() {
                let b = &rhs_t.data[rhs_col * inner..(rhs_col + 1) * inner];
                let mut sum = T::default();
                for n in 0..inner {
                    sum += a[n] * b[n];
                }
                data.push(sum);
            }
        }

        Ok(Matrix2 {
            data,
            dim: (self.rows(), rhs.cols()),
        })
    }
}

impl<T> Matrix2<T> {
    fn zip_with<'a, F>(&'a self, rhs: &'a Self, op: &'static str, f: F) -> Result<Self>
    where
        F: Fn(&'a T, &'a T) -> T,
    {
        if self.dim != rhs.dim {
            return Err(Error::ShapeMismatch {
                op,
                lhs: self.dim,
                rhs: rhs.dim,
            });
        }

        Ok(Matrix2 {
            data: self.data.iter().zip(&rhs.data).map(|(a, b)| f(a, b)).collect(),
            dim: self.dim,
        })
    }
}

impl<T: Mul<Output = T> + Copy> Matrix2<T> {
    /// Multiplies every entry by `k`.
    pub fn scale(&self, k: T) -> Self {
        Matrix2 {
            data: self.data.iter().map(|&x| x * k).collect(),
            dim: self.dim,
        }
    }
}

/// Adds two Matrix2s element-wise.
impl<'a, T> Add for &'a Matrix2<T>
where
    &'a T: Add<Output = T>,
{
    type Output = Result<Matrix2<T>>;
    fn add(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, "add", |a, b| a + b)
    }
}

/// Subs two Matrix2s element-wise.
impl<'a, T> Sub for &'a Matrix2<T>
where
    &'a T: Sub<Output = T>,
{
    type Output = Result<Matrix2<T>>;
    fn sub(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }
}

/// Hadamard (element-wise) product.
impl<'a, T> Mul for &'a Matrix2<T>
where
    &'a T: Mul<Output = T>,
{
    type Output = Result<Matrix2<T>>;
    fn mul(self, rhs: Self) -> Self::Output {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }
}

impl<'a> Mul<Val> for &'a Matrix2<Val> {
    type Output = Matrix2<Val>;
    fn mul(self, k: Val) -> Self::Output {
        self.scale(k)
    }
}
