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

use std::fmt::{Debug, Display};

use num_traits::Float;

/// Floating-point width a binding flavor works in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precision {
    Single,
    Double,
}

/// Coordinate type accepted by the triangulation entry points.
///
/// Implemented for `f32` and `f64`. Each flavor carries its own default
/// engine flags; the single precision one suppresses precision errors.
pub trait Scalar:
    Float + bytemuck::Pod + Debug + Display + Default + Send + Sync + 'static
{
    const PRECISION: Precision;
    const DEFAULT_FLAGS: &'static str;

    /// Widens to the `f64` coordinates the engine works in.
    fn widen(self) -> f64;
}

impl Scalar for f64 {
    const PRECISION: Precision = Precision::Double;
    const DEFAULT_FLAGS: &'static str = "qhull d Qbb QJ Qc";

    #[inline(always)]
    fn widen(self) -> f64 {
        self
    }
}

impl Scalar for f32 {
    const PRECISION: Precision = Precision::Single;
    const DEFAULT_FLAGS: &'static str = "qhull d Qbb QJ Qc Po";

    #[inline(always)]
    fn widen(self) -> f64 {
        self as f64
    }
}
