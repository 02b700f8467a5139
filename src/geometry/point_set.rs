// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::borrow::Cow;
use std::slice::ChunksExact;

use num_traits::{NumCast, ToPrimitive};

use crate::error::DelaunayError;
use crate::numeric::scalar::Scalar;

/// Dimensions a point set may have.
pub const SUPPORTED_DIMS: [usize; 2] = [2, 3];

/// `N x D` row-major coordinates, `D` being 2 or 3.
///
/// Borrows the caller's buffer when it already has the right precision and
/// layout; any other input is copied once at construction. The caller's
/// buffer is never written to.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet<'a, T: Scalar> {
    coords: Cow<'a, [T]>,
    dim: usize,
}

impl<'a, T: Scalar> PointSet<'a, T> {
    /// Wraps a host array given its shape. The shape must be two dimensional.
    pub fn from_shape(shape: &[usize], coords: &'a [T]) -> Result<Self, DelaunayError> {
        let &[rows, cols] = shape else {
            return Err(DelaunayError::Validation(format!(
                "expected a 2-dimensional array, got {} dimension(s)",
                shape.len()
            )));
        };
        if rows.checked_mul(cols) != Some(coords.len()) {
            return Err(DelaunayError::Validation(format!(
                "shape [{rows}, {cols}] does not match {} coordinates",
                coords.len()
            )));
        }
        Self::new(Cow::Borrowed(coords), cols)
    }

    /// Borrows a flat buffer holding `coords.len() / dim` points.
    pub fn from_flat(coords: &'a [T], dim: usize) -> Result<Self, DelaunayError> {
        Self::new(Cow::Borrowed(coords), dim)
    }

    fn new(coords: Cow<'a, [T]>, dim: usize) -> Result<Self, DelaunayError> {
        if !SUPPORTED_DIMS.contains(&dim) {
            return Err(DelaunayError::Validation(format!(
                "points must have 2 or 3 columns, got {dim}"
            )));
        }
        if coords.len() % dim != 0 {
            return Err(DelaunayError::Validation(format!(
                "{} coordinates do not split into rows of {dim}",
                coords.len()
            )));
        }
        if let Some(pos) = coords.iter().position(|c| !c.is_finite()) {
            return Err(DelaunayError::Validation(format!(
                "coordinate {} of point {} is not finite",
                pos % dim,
                pos / dim
            )));
        }
        Ok(PointSet { coords, dim })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    #[inline]
    pub fn coords(&self) -> &[T] {
        &self.coords
    }

    #[inline]
    pub fn point(&self, i: usize) -> &[T] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    pub fn points(&self) -> ChunksExact<'_, T> {
        self.coords.chunks_exact(self.dim)
    }

    /// Whether the coordinates are a view of the caller's buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.coords, Cow::Borrowed(_))
    }

    pub fn into_owned(self) -> PointSet<'static, T> {
        PointSet {
            coords: Cow::Owned(self.coords.into_owned()),
            dim: self.dim,
        }
    }
}

impl<T: Scalar> PointSet<'static, T> {
    pub fn from_vec(coords: Vec<T>, dim: usize) -> Result<Self, DelaunayError> {
        Self::new(Cow::Owned(coords), dim)
    }

    /// Copies rows of any numeric type, converting to `T`.
    ///
    /// All rows must have the same length.
    pub fn from_rows<R, U>(rows: &[R]) -> Result<Self, DelaunayError>
    where
        R: AsRef<[U]>,
        U: ToPrimitive + Copy,
    {
        let Some(first) = rows.first() else {
            return Err(DelaunayError::Validation(
                "cannot infer the dimension of an empty row list".into(),
            ));
        };
        let dim = first.as_ref().len();
        let mut coords = Vec::with_capacity(rows.len() * dim);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dim {
                return Err(DelaunayError::Validation(format!(
                    "ragged input: row {i} has {} columns, expected {dim}",
                    row.len()
                )));
            }
            for &c in row {
                let c = <T as NumCast>::from(c).ok_or_else(|| {
                    DelaunayError::Validation(format!("row {i} holds a non-numeric coordinate"))
                })?;
                coords.push(c);
            }
        }
        Self::new(Cow::Owned(coords), dim)
    }
}

/// Conversion of caller-side point containers into a [`PointSet`].
pub trait IntoPointSet<'a, T: Scalar> {
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError>;
}

impl<'a, T: Scalar> IntoPointSet<'a, T> for PointSet<'a, T> {
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        Ok(self)
    }
}

impl<'a, T: Scalar, const D: usize> IntoPointSet<'a, T> for &'a [[T; D]]
where
    [T; D]: bytemuck::Pod,
{
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        PointSet::from_flat(bytemuck::cast_slice(self), D)
    }
}

impl<'a, T: Scalar, const D: usize, const N: usize> IntoPointSet<'a, T> for &'a [[T; D]; N]
where
    [T; D]: bytemuck::Pod,
{
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        self.as_slice().into_point_set()
    }
}

impl<'a, T: Scalar, const D: usize> IntoPointSet<'a, T> for &'a Vec<[T; D]>
where
    [T; D]: bytemuck::Pod,
{
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        self.as_slice().into_point_set()
    }
}

impl<'a, T: Scalar> IntoPointSet<'a, T> for &'a [Vec<T>] {
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        PointSet::from_rows(self)
    }
}

impl<'a, T: Scalar> IntoPointSet<'a, T> for &'a Vec<Vec<T>> {
    fn into_point_set(self) -> Result<PointSet<'a, T>, DelaunayError> {
        PointSet::from_rows(self.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_rows_are_borrowed() {
        let rows = [[0.0f64, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let set = (&rows).into_point_set().unwrap();
        assert!(set.is_borrowed());
        assert_eq!(set.len(), 3);
        assert_eq!(set.point(1), &[1.0, 0.0]);
    }

    #[test]
    fn converted_rows_are_owned() {
        let rows = vec![vec![0.0f32, 0.0, 0.0], vec![1.0, 2.0, 3.0]];
        let set = PointSet::<f64>::from_rows(&rows).unwrap();
        assert!(!set.is_borrowed());
        assert_eq!(set.dim(), 3);
        assert_eq!(set.point(1), &[1.0, 2.0, 3.0]);
    }
}
