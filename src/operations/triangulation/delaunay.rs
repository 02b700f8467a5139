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

use std::sync::{Mutex, PoisonError};

use log::{debug, trace};

use super::Facets;
use crate::engine::{EngineSession, GeometryEngine, Qhull};
use crate::error::DelaunayError;
use crate::geometry::point_set::IntoPointSet;
use crate::numeric::scalar::Scalar;

/// Serializes runs of engines that keep process-wide state.
static ENGINE_LOCK: Mutex<()> = Mutex::new(());

/// Delaunay triangulation of `points` with the built-in engine.
///
/// `flags` is a qhull style command line; `None` or a blank string selects
/// the default of the precision, `"qhull d Qbb QJ Qc"` for `f64` and
/// `"qhull d Qbb QJ Qc Po"` for `f32`.
///
/// ```
/// let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
/// let facets = lifthull::delaunay(&square, None).unwrap();
/// assert_eq!(facets.shape(), [2, 3]);
/// ```
pub fn delaunay<'a, T, P>(points: P, flags: Option<&str>) -> Result<Facets, DelaunayError>
where
    T: Scalar,
    P: IntoPointSet<'a, T>,
{
    delaunay_with(&Qhull, points, flags)
}

/// Same as [`delaunay`], on any engine.
pub fn delaunay_with<'a, T, P, E>(
    engine: &E,
    points: P,
    flags: Option<&str>,
) -> Result<Facets, DelaunayError>
where
    T: Scalar,
    P: IntoPointSet<'a, T>,
    E: GeometryEngine<T>,
{
    let points = points.into_point_set()?;
    let flags = resolve_flags::<T>(flags);
    debug!(
        "triangulating {} points of dimension {} ({:?}) with {:?}",
        points.len(),
        points.dim(),
        T::PRECISION,
        flags
    );

    // the guard must outlive the session
    let _guard = (!engine.is_reentrant())
        .then(|| ENGINE_LOCK.lock().unwrap_or_else(PoisonError::into_inner));
    let session = engine.construct(points.dim(), points.len(), points.coords(), flags)?;
    collect_facets(&session, points.len())
}

/// Version string of the built-in engine, the qhull release it links.
pub fn version() -> &'static str {
    GeometryEngine::<f64>::version(&Qhull)
}

fn resolve_flags<T: Scalar>(flags: Option<&str>) -> &str {
    match flags {
        Some(f) if !f.trim().is_empty() => f,
        _ => T::DEFAULT_FLAGS,
    }
}

/// Copies the lower facets of `session` into a facet table.
///
/// When the hull facets have one vertex more than a row holds (tetrahedra of
/// a 3D triangulation), each contributes its ridges that face an upper
/// facet, i.e. the boundary of the triangulation.
fn collect_facets<S: EngineSession>(session: &S, n_points: usize) -> Result<Facets, DelaunayError> {
    let cols = session.hull_dimension().min(3);
    let facets = session.facets();
    let mut indices: Vec<u32> = Vec::new();

    for facet in facets.iter().filter(|f| !f.upper_delaunay) {
        let k = facet.vertices.len();
        if k == cols {
            push_row(&mut indices, facet.vertices.iter().copied(), cols, n_points)?;
        } else if k == cols + 1
            && k == session.hull_dimension()
            && facet.neighbors.len() == k
        {
            for (i, &nb) in facet.neighbors.iter().enumerate() {
                let Some(other) = facets.get(nb) else {
                    return Err(DelaunayError::EngineInternal(format!(
                        "facet neighbor {nb} out of range ({} facets)",
                        facets.len()
                    )));
                };
                if other.upper_delaunay {
                    let ridge = facet
                        .vertices
                        .iter()
                        .enumerate()
                        .filter(|&(j, _)| j != i)
                        .map(|(_, &v)| v);
                    push_row(&mut indices, ridge, cols, n_points)?;
                }
            }
        } else {
            return Err(DelaunayError::EngineInternal(format!(
                "facet with {k} vertices in a {}-dimensional hull",
                session.hull_dimension()
            )));
        }
    }

    trace!("collected {} rows", indices.len() / cols.max(1));
    Ok(Facets::new(indices, cols))
}

/// Appends one row of `cols` indices. Room is reserved up front so that the
/// pushes cannot reallocate.
fn push_row(
    indices: &mut Vec<u32>,
    row: impl Iterator<Item = usize>,
    cols: usize,
    n_points: usize,
) -> Result<(), DelaunayError> {
    indices.try_reserve(cols)?;
    for v in row {
        let index = u32::try_from(v)
            .ok()
            .filter(|_| v < n_points)
            .ok_or_else(|| {
                DelaunayError::EngineInternal(format!(
                    "vertex {v} of a lower facet is not one of the {n_points} input points"
                ))
            })?;
        indices.push(index);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ridge_rows_reserve_their_room() {
        let mut indices = Vec::new();
        let ridge = [4usize, 5, 6, 7].into_iter().filter(|&v| v != 5);
        push_row(&mut indices, ridge, 3, 8).unwrap();
        assert_eq!(indices, [4, 6, 7]);
        assert!(indices.capacity() >= 3);

        let err = push_row(&mut indices, [1usize, 8, 2].into_iter(), 3, 8).unwrap_err();
        assert!(matches!(err, DelaunayError::EngineInternal(_)));
    }

    #[test]
    fn blank_flags_select_the_default() {
        assert_eq!(resolve_flags::<f64>(None), "qhull d Qbb QJ Qc");
        assert_eq!(resolve_flags::<f32>(Some("  ")), "qhull d Qbb QJ Qc Po");
        assert_eq!(resolve_flags::<f64>(Some("qhull d")), "qhull d");
    }
}
