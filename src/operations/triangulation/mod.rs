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

use std::ops::Index;
use std::slice::ChunksExact;

pub mod delaunay;

/// Facets of a triangulation as a row-major `rows x cols` table of point
/// indices.
///
/// `cols` is 3 for Delaunay triangulations (triangles in 2D, boundary
/// triangles in 3D) and for 3D hulls, 2 for the edges of a 2D hull.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Facets {
    indices: Vec<u32>,
    cols: usize,
}

impl Facets {
    pub fn new(indices: Vec<u32>, cols: usize) -> Self {
        debug_assert!(cols == 0 || indices.len() % cols == 0);
        Facets { indices, cols }
    }

    /// Number of facets.
    #[inline]
    pub fn len(&self) -> usize {
        if self.cols == 0 {
            0
        } else {
            self.indices.len() / self.cols
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `[rows, cols]`, the shape of the equivalent 2-D array.
    pub fn shape(&self) -> [usize; 2] {
        [self.len(), self.cols]
    }

    pub fn rows(&self) -> ChunksExact<'_, u32> {
        self.indices.chunks_exact(self.cols.max(1))
    }

    pub fn row(&self, i: usize) -> Option<&[u32]> {
        (i < self.len()).then(|| &self.indices[i * self.cols..(i + 1) * self.cols])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.indices
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.indices
    }
}

impl Index<usize> for Facets {
    type Output = [u32];

    fn index(&self, i: usize) -> &[u32] {
        &self.indices[i * self.cols..(i + 1) * self.cols]
    }
}
