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

//! Geometry engine seam.
//!
//! The triangulation operation only talks to an engine through
//! [`GeometryEngine`] and [`EngineSession`]; [`Qhull`] is the engine the
//! crate ships with.

use std::fmt;

use smallvec::SmallVec;

use crate::numeric::scalar::Scalar;

pub mod libqhull;

pub use libqhull::{Qhull, Triangulation};

/// Exit status of a failed engine run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// Malformed invocation: bad option string, unsupported dimension.
    Input,
    Singular,
    Precision,
    Memory,
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineFailure {
    pub code: ExitCode,
    pub message: String,
}

impl EngineFailure {
    pub fn new(code: ExitCode, message: impl Into<String>) -> Self {
        EngineFailure {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for EngineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for EngineFailure {}

/// Simplicial facet of the engine's hull.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facet {
    /// Point indices. Indices past the caller's point count belong to points
    /// the engine added itself and only occur on upper facets.
    pub vertices: SmallVec<[usize; 4]>,
    /// `neighbors[i]` is the facet across the ridge opposite `vertices[i]`.
    pub neighbors: SmallVec<[usize; 4]>,
    /// Upper (or vertical) facet of a Delaunay lift. Never part of a
    /// triangulation.
    pub upper_delaunay: bool,
}

/// Result of one engine run. Dropping it releases everything the run
/// allocated.
pub trait EngineSession {
    /// Dimension the hull was built in: the point dimension, plus one for a
    /// Delaunay lift.
    fn hull_dimension(&self) -> usize;

    /// Facets in the engine's enumeration order.
    fn facets(&self) -> &[Facet];
}

/// Capability to triangulate a point set from an option string.
pub trait GeometryEngine<T: Scalar> {
    type Session: EngineSession;

    fn version(&self) -> &'static str;

    /// Whether independent runs may overlap in time. Callers serialize runs
    /// of engines that answer `false`.
    fn is_reentrant(&self) -> bool {
        true
    }

    /// Builds the hull of `n_points` points of dimension `dim` stored
    /// row-major in `coords`. The coordinates are only borrowed.
    fn construct(
        &self,
        dim: usize,
        n_points: usize,
        coords: &[T],
        flags: &str,
    ) -> Result<Self::Session, EngineFailure>;
}
