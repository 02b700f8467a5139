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

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lifthull::engine::{EngineFailure, EngineSession, ExitCode, Facet, GeometryEngine, Qhull};
use lifthull::{DelaunayError, delaunay_with};
use smallvec::SmallVec;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn facet(vertices: &[usize], neighbors: &[usize], upper_delaunay: bool) -> Facet {
    Facet {
        vertices: SmallVec::from_slice(vertices),
        neighbors: SmallVec::from_slice(neighbors),
        upper_delaunay,
    }
}

const SQUARE: [[f64; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
const TETRA: [[f64; 3]; 4] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
];

// ---------- Mock engines ----------

struct Canned {
    hull_dim: usize,
    facets: Vec<Facet>,
    reentrant: bool,
    calls: AtomicUsize,
    drops: Arc<AtomicUsize>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Canned {
    fn new(hull_dim: usize, facets: Vec<Facet>) -> Self {
        Canned {
            hull_dim,
            facets,
            reentrant: true,
            calls: AtomicUsize::new(0),
            drops: Arc::new(AtomicUsize::new(0)),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

struct CannedSession {
    hull_dim: usize,
    facets: Vec<Facet>,
    drops: Arc<AtomicUsize>,
}

impl Drop for CannedSession {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl EngineSession for CannedSession {
    fn hull_dimension(&self) -> usize {
        self.hull_dim
    }

    fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

impl GeometryEngine<f64> for Canned {
    type Session = CannedSession;

    fn version(&self) -> &'static str {
        "canned"
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    fn construct(
        &self,
        _dim: usize,
        _n_points: usize,
        _coords: &[f64],
        _flags: &str,
    ) -> Result<CannedSession, EngineFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(2));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(CannedSession {
            hull_dim: self.hull_dim,
            facets: self.facets.clone(),
            drops: Arc::clone(&self.drops),
        })
    }
}

struct Failing(ExitCode);

impl GeometryEngine<f64> for Failing {
    type Session = CannedSession;

    fn version(&self) -> &'static str {
        "failing"
    }

    fn construct(
        &self,
        _dim: usize,
        _n_points: usize,
        _coords: &[f64],
        _flags: &str,
    ) -> Result<CannedSession, EngineFailure> {
        Err(EngineFailure::new(self.0, "scripted failure"))
    }
}

// ---------- Translation ----------

#[test]
fn exit_codes_map_onto_error_kinds() {
    init();
    let cases: [(ExitCode, fn(&DelaunayError) -> bool); 5] = [
        (ExitCode::Input, |e| matches!(e, DelaunayError::BadInvocation(_))),
        (ExitCode::Singular, |e| matches!(e, DelaunayError::SingularInput(_))),
        (ExitCode::Precision, |e| matches!(e, DelaunayError::Precision(_))),
        (ExitCode::Memory, |e| matches!(e, DelaunayError::OutOfMemory(_))),
        (ExitCode::Internal, |e| matches!(e, DelaunayError::EngineInternal(_))),
    ];
    for (code, expected) in cases {
        let err = delaunay_with(&Failing(code), &SQUARE, None).unwrap_err();
        assert!(expected(&err), "{code:?} became {err:?}");
        assert!(err.to_string().contains("scripted failure"));
    }
}

#[test]
fn invalid_points_never_reach_the_engine() {
    init();
    let engine = Canned::new(3, vec![]);
    let points = [[0.0, 0.0], [f64::INFINITY, 0.0], [0.0, 1.0]];
    let err = delaunay_with(&engine, &points, None).unwrap_err();
    assert!(matches!(err, DelaunayError::Validation(_)));

    let ragged = vec![vec![0.0, 0.0], vec![1.0], vec![0.0, 1.0]];
    let err = delaunay_with(&engine, &ragged, None).unwrap_err();
    assert!(matches!(err, DelaunayError::Validation(_)));

    let four_columns = [[0.0; 4]; 5];
    let err = delaunay_with(&engine, &four_columns, None).unwrap_err();
    assert!(matches!(err, DelaunayError::Validation(_)));
    assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
}

// ---------- Facet collection ----------

#[test]
fn upper_facets_are_skipped() {
    init();
    let engine = Canned::new(
        3,
        vec![
            facet(&[0, 1, 2], &[1, 1, 1], false),
            facet(&[0, 2, 3], &[0, 0, 0], true),
            facet(&[2, 3, 0], &[0, 0, 0], false),
        ],
    );
    let facets = delaunay_with(&engine, &SQUARE, None).unwrap();
    assert_eq!(facets.as_slice(), &[0, 1, 2, 2, 3, 0]);
    assert_eq!(engine.drops.load(Ordering::SeqCst), 1);
}

#[test]
fn tetrahedra_contribute_their_boundary_ridges() {
    init();
    // facet 1 is a lower neighbor across the ridge opposite vertex 0
    let engine = Canned::new(
        4,
        vec![
            facet(&[0, 1, 2, 3], &[1, 2, 3, 4], false),
            facet(&[1, 2, 3, 0], &[0, 2, 3, 4], false),
            facet(&[0, 2, 3, 4], &[0, 0, 0, 0], true),
            facet(&[0, 1, 3, 4], &[0, 0, 0, 0], true),
            facet(&[0, 1, 2, 4], &[0, 0, 0, 0], true),
        ],
    );
    let facets = delaunay_with(&engine, &TETRA, None).unwrap();
    let rows: Vec<&[u32]> = facets.rows().collect();
    assert_eq!(facets.cols(), 3);
    assert_eq!(&rows[..3], &[&[0, 2, 3][..], &[0, 1, 3], &[0, 1, 2]]);
    assert_eq!(rows.len(), 3 + 3);
}

#[test]
fn foreign_vertex_indices_are_internal_errors() {
    init();
    let engine = Canned::new(3, vec![facet(&[0, 1, 7], &[0, 0, 0], false)]);
    let err = delaunay_with(&engine, &SQUARE, None).unwrap_err();
    assert!(matches!(err, DelaunayError::EngineInternal(_)), "{err}");
    assert_eq!(engine.drops.load(Ordering::SeqCst), 1);

    let engine = Canned::new(3, vec![facet(&[0, 1], &[0, 0], false)]);
    let err = delaunay_with(&engine, &SQUARE, None).unwrap_err();
    assert!(matches!(err, DelaunayError::EngineInternal(_)), "{err}");
}

#[test]
fn merged_facets_are_not_split_into_ridges() {
    init();
    // four vertices in a 3-dimensional hull is a merged quadrilateral
    let engine = Canned::new(3, vec![facet(&[0, 1, 2, 3], &[0, 0, 0, 0], false)]);
    let err = delaunay_with(&engine, &SQUARE, None).unwrap_err();
    assert!(matches!(err, DelaunayError::EngineInternal(_)), "{err}");
}

// ---------- Concurrency ----------

#[test]
fn non_reentrant_engines_run_one_at_a_time() {
    init();
    let mut engine = Canned::new(3, vec![facet(&[0, 1, 2], &[0, 0, 0], false)]);
    engine.reentrant = false;
    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..4 {
                    delaunay_with(&engine, &SQUARE, None).unwrap();
                }
            });
        }
    });
    assert_eq!(engine.calls.load(Ordering::SeqCst), 32);
    assert_eq!(engine.drops.load(Ordering::SeqCst), 32);
    assert_eq!(engine.max_in_flight.load(Ordering::SeqCst), 1);
}

#[test]
fn built_in_engine_runs_concurrently() {
    init();
    assert!(GeometryEngine::<f64>::is_reentrant(&Qhull));
    let results: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| delaunay_with(&Qhull, &SQUARE, None)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for facets in results {
        assert_eq!(facets.unwrap().len(), 2);
    }
}
