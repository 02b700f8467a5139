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

//! Delaunay triangulation of 2-D and 3-D point sets.
//!
//! Points are lifted onto a paraboloid and the lower facets of their convex
//! hull are the Delaunay simplices. The hull comes from reentrant qhull,
//! driven by qhull option strings (`"qhull d Qbb QJ Qc"`); its joggle
//! (`QJ`) gets around cospherical and other degenerate configurations.
//!
//! ```
//! use lifthull::{DelaunayError, delaunay};
//!
//! let points = vec![[0.0, 0.0], [2.0, 0.0], [1.0, 2.0], [1.0, 0.5]];
//! let facets = delaunay(&points, None)?;
//! assert_eq!(facets.shape(), [3, 3]);
//! # Ok::<(), DelaunayError>(())
//! ```

pub mod engine;
pub mod error;
pub mod geometry;
pub mod numeric;
pub mod operations;

#[cfg(feature = "pybind")]
mod pybind;

pub use error::DelaunayError;
pub use geometry::{IntoPointSet, PointSet};
pub use numeric::{Precision, Scalar};
pub use operations::{Facets, delaunay, delaunay_with, version};
