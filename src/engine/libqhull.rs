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

//! The default engine: reentrant qhull through the `qhull` crate.
//!
//! Delaunay mode lifts the points onto a paraboloid here, centered on their
//! centroid, and hands qhull the lifted set with its Delaunay flag raised so
//! that it marks upper facets and re-lifts joggled points itself.

use ahash::AHashMap;
use log::{debug, trace};
use qhull::{Qh, QhBuilder, QhError};
use smallvec::SmallVec;

use super::{EngineFailure, EngineSession, ExitCode, Facet, GeometryEngine};
use crate::numeric::scalar::Scalar;

/// Version of the qhull sources the `qhull-sys` crate compiles.
pub const VERSION: &str = "qhull_r 8.1-alpha3 (2020.2.r 2023/01/02)";

// qhull exit codes, libqhull_r.h
const QH_ERR_INPUT: i32 = 1;
const QH_ERR_SINGULAR: i32 = 2;
const QH_ERR_PREC: i32 = 3;
const QH_ERR_MEM: i32 = 4;

/// qhull engine. Every run owns an independent qhull context, so runs may
/// overlap freely.
#[derive(Clone, Copy, Debug, Default)]
pub struct Qhull;

/// Facets of one successful [`Qhull`] run, copied out of the qhull context
/// before it was freed.
#[derive(Clone, Debug)]
pub struct Triangulation {
    hull_dim: usize,
    facets: Vec<Facet>,
}

impl EngineSession for Triangulation {
    fn hull_dimension(&self) -> usize {
        self.hull_dim
    }

    fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

/// A qhull command line split into the options the builder takes as
/// settings and the ones passed through verbatim.
///
/// The builder reserves `d` and `Qbb` for its own setters and rejects them
/// among the arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Command<'a> {
    pub delaunay: bool,
    pub scale_last: bool,
    pub args: Vec<&'a str>,
}

impl<'a> Command<'a> {
    pub fn parse(flags: &'a str) -> Result<Self, EngineFailure> {
        let mut tokens = flags.split_whitespace();
        if tokens.next() != Some("qhull") {
            return Err(EngineFailure::new(
                ExitCode::Input,
                format!("command must start with \"qhull\", got {flags:?}"),
            ));
        }
        let mut command = Command::default();
        for token in tokens {
            match token {
                "d" => command.delaunay = true,
                "Qbb" => command.scale_last = true,
                t => command.args.push(t),
            }
        }
        Ok(command)
    }
}

impl<T: Scalar> GeometryEngine<T> for Qhull {
    type Session = Triangulation;

    fn version(&self) -> &'static str {
        VERSION
    }

    fn construct(
        &self,
        dim: usize,
        n_points: usize,
        coords: &[T],
        flags: &str,
    ) -> Result<Triangulation, EngineFailure> {
        let command = Command::parse(flags)?;
        check_input(&command, dim, n_points, coords)?;

        let (hull_dim, points) = if command.delaunay {
            (dim + 1, lift(coords, dim)?)
        } else {
            (dim, copy_coords(coords)?)
        };

        let builder = QhBuilder::default()
            .delaunay(command.delaunay)
            .scale_last(command.scale_last)
            .qhull_args(&command.args)
            .map_err(|e| EngineFailure::new(ExitCode::Input, e.to_string()))?;
        let qh = builder.build_managed(hull_dim, points).map_err(failure)?;

        let facets = copy_facets(&qh, n_points)?;
        debug!(
            "qhull built {} facets for {n_points} points in {hull_dim} dimensions",
            facets.len()
        );
        Ok(Triangulation { hull_dim, facets })
    }
}

fn check_input<T: Scalar>(
    command: &Command<'_>,
    dim: usize,
    n_points: usize,
    coords: &[T],
) -> Result<(), EngineFailure> {
    let max_dim = if command.delaunay { 3 } else { 4 };
    if !(2..=max_dim).contains(&dim) {
        return Err(EngineFailure::new(
            ExitCode::Input,
            format!("dimension {dim} is not supported (2 to {max_dim})"),
        ));
    }
    if coords.len() != dim * n_points {
        return Err(EngineFailure::new(
            ExitCode::Input,
            format!(
                "{} coordinates do not make {n_points} points of dimension {dim}",
                coords.len()
            ),
        ));
    }
    if coords.iter().any(|c| !c.is_finite()) {
        return Err(EngineFailure::new(
            ExitCode::Input,
            "coordinates must be finite",
        ));
    }
    // the lift adds a dimension the initial simplex has to span
    let needed = if command.delaunay { dim + 2 } else { dim + 1 };
    if n_points < needed {
        return Err(EngineFailure::new(
            ExitCode::Singular,
            format!(
                "not enough points ({n_points}) to construct initial simplex (need {needed})"
            ),
        ));
    }
    let coincident = (0..dim).all(|k| {
        let mut axis = coords.iter().skip(k).step_by(dim);
        let first = axis.next();
        axis.all(|c| Some(c) == first)
    });
    if coincident {
        return Err(EngineFailure::new(
            ExitCode::Singular,
            "all input points coincide",
        ));
    }
    Ok(())
}

fn copy_coords<T: Scalar>(coords: &[T]) -> Result<Vec<f64>, EngineFailure> {
    let mut out = Vec::new();
    out.try_reserve_exact(coords.len()).map_err(out_of_memory)?;
    out.extend(coords.iter().map(|c| c.widen()));
    Ok(out)
}

/// Appends `|p - c|^2` to every point `p`, `c` the centroid, after moving
/// the point by `-c`.
///
/// qhull re-lifts joggled points from their first `dim` coordinates, so
/// the translated coordinates are the ones it must see.
fn lift<T: Scalar>(coords: &[T], dim: usize) -> Result<Vec<f64>, EngineFailure> {
    let n = coords.len() / dim;
    let mut centroid = vec![0.0f64; dim];
    for p in coords.chunks_exact(dim) {
        for (c, &x) in centroid.iter_mut().zip(p) {
            *c += x.widen();
        }
    }
    for c in &mut centroid {
        *c /= n as f64;
    }

    let mut out = Vec::new();
    out.try_reserve_exact(n * (dim + 1)).map_err(out_of_memory)?;
    for p in coords.chunks_exact(dim) {
        let mut paraboloid = 0.0;
        for (&x, &c) in p.iter().zip(&centroid) {
            let x = x.widen() - c;
            paraboloid += x * x;
            out.push(x);
        }
        out.push(paraboloid);
    }
    Ok(out)
}

/// Copies the facets out of `qh` in its enumeration order.
fn copy_facets(qh: &Qh<'_>, n_points: usize) -> Result<Vec<Facet>, EngineFailure> {
    let position: AHashMap<u32, usize> = qh
        .facets()
        .enumerate()
        .map(|(i, f)| (f.id(), i))
        .collect();

    let mut facets = Vec::new();
    facets
        .try_reserve_exact(position.len())
        .map_err(out_of_memory)?;
    for f in qh.facets() {
        // point ids rather than buffer offsets: a joggle moves the points
        let vertices = match f.vertices() {
            Some(set) => set
                .iter()
                .map(|v| {
                    let id = v.point_id(qh).map_err(failure)?;
                    Ok(usize::try_from(id).unwrap_or(n_points))
                })
                .collect::<Result<SmallVec<[usize; 4]>, EngineFailure>>()?,
            None => SmallVec::new(),
        };
        let neighbors = match f.neighbors() {
            Some(set) => set
                .iter()
                .map(|nb| {
                    position.get(&nb.id()).copied().ok_or_else(|| {
                        EngineFailure::new(
                            ExitCode::Internal,
                            format!(
                                "f{} has neighbor f{} outside the facet list",
                                f.id(),
                                nb.id()
                            ),
                        )
                    })
                })
                .collect::<Result<SmallVec<[usize; 4]>, _>>()?,
            None => SmallVec::new(),
        };
        let upper_delaunay = f.upper_delaunay();

        // a merged lower facet has no single row to report
        if !upper_delaunay && !f.simplicial() {
            return Err(EngineFailure::new(
                ExitCode::Precision,
                format!(
                    "f{} merged {} coplanar vertices; joggle ('QJ') or triangulate ('Qt') the output",
                    f.id(),
                    vertices.len()
                ),
            ));
        }
        trace!("f{} {vertices:?} upper={upper_delaunay}", f.id());
        facets.push(Facet {
            vertices,
            neighbors,
            upper_delaunay,
        });
    }
    Ok(facets)
}

fn out_of_memory(err: std::collections::TryReserveError) -> EngineFailure {
    EngineFailure::new(ExitCode::Memory, format!("cannot allocate engine input: {err}"))
}

/// Translates a qhull exit.
///
/// qhull reports cocircular and cospherical input as an input error, but a
/// joggle fixes it, so it is classified with the precision problems.
fn failure(err: QhError<'_>) -> EngineFailure {
    let code = err.kind.error_code();
    let message = err
        .error_message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("qhull exited with code {code}"));
    let code = match code {
        QH_ERR_INPUT if message.contains("cocircular or cospherical") => ExitCode::Precision,
        QH_ERR_INPUT => ExitCode::Input,
        QH_ERR_SINGULAR => ExitCode::Singular,
        QH_ERR_PREC => ExitCode::Precision,
        QH_ERR_MEM => ExitCode::Memory,
        _ => ExitCode::Internal,
    };
    EngineFailure::new(code, message)
}
