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

//! Python bindings: `lifthull.delaunay`, `lifthull.delaunayf` and
//! `lifthull.version`.

use numpy::{Element, PyArray1, PyArray2, PyArrayDyn, PyArrayMethods, PyUntypedArrayMethods};
use pyo3::create_exception;
use pyo3::exceptions::{
    PyArithmeticError, PyMemoryError, PyRuntimeError, PySystemError, PyValueError,
};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::error::DelaunayError;
use crate::geometry::point_set::PointSet;
use crate::numeric::scalar::Scalar;
use crate::operations::triangulation::delaunay::{delaunay as triangulate, version as engine_version};

create_exception!(lifthull, ValidationError, PyValueError);
create_exception!(lifthull, SingularInputError, PyArithmeticError);
create_exception!(lifthull, PrecisionError, PyArithmeticError);
create_exception!(lifthull, EngineInternalError, PyRuntimeError);
create_exception!(lifthull, BadInvocationError, PySystemError);

impl From<DelaunayError> for PyErr {
    fn from(err: DelaunayError) -> PyErr {
        let message = err.to_string();
        match err {
            DelaunayError::Validation(_) => ValidationError::new_err(message),
            DelaunayError::SingularInput(_) => SingularInputError::new_err(message),
            DelaunayError::Precision(_) => PrecisionError::new_err(message),
            DelaunayError::OutOfMemory(_) => PyMemoryError::new_err(message),
            DelaunayError::EngineInternal(_) => EngineInternalError::new_err(message),
            DelaunayError::BadInvocation(_) => BadInvocationError::new_err(message),
        }
    }
}

/// Converts `points` to a C-contiguous array of `dtype`, triangulates it
/// without the GIL and returns the facets as an `(M, cols)` array.
fn run<'py, T>(
    py: Python<'py>,
    points: &Bound<'py, PyAny>,
    flags: Option<&str>,
    dtype: &str,
) -> PyResult<Bound<'py, PyArray2<u32>>>
where
    T: Scalar + Element,
{
    let kwargs = PyDict::new(py);
    kwargs.set_item("dtype", dtype)?;
    let array = py
        .import("numpy")?
        .call_method("ascontiguousarray", (points,), Some(&kwargs))
        .map_err(|e| ValidationError::new_err(format!("points are not a numeric array: {e}")))?;
    let array = array.downcast_into::<PyArrayDyn<T>>()?;
    let view = array.readonly();
    let shape = view.shape().to_vec();
    let coords = view.as_slice()?;
    let set = PointSet::from_shape(&shape, coords)?;

    let facets = py.allow_threads(|| triangulate(set, flags))?;
    let [rows, cols] = facets.shape();
    Ok(PyArray1::from_vec(py, facets.into_vec()).reshape([rows, cols])?)
}

/// Delaunay triangulation of an `(N, 2)` or `(N, 3)` array in double
/// precision.
#[pyfunction]
#[pyo3(signature = (points, flags = None))]
fn delaunay<'py>(
    py: Python<'py>,
    points: &Bound<'py, PyAny>,
    flags: Option<String>,
) -> PyResult<Bound<'py, PyArray2<u32>>> {
    run::<f64>(py, points, flags.as_deref(), "float64")
}

/// Single precision flavor of `delaunay`.
#[pyfunction]
#[pyo3(signature = (points, flags = None))]
fn delaunayf<'py>(
    py: Python<'py>,
    points: &Bound<'py, PyAny>,
    flags: Option<String>,
) -> PyResult<Bound<'py, PyArray2<u32>>> {
    run::<f32>(py, points, flags.as_deref(), "float32")
}

#[pyfunction]
fn version() -> &'static str {
    engine_version()
}

#[pymodule]
fn lifthull(module: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = module.py();
    module.add_function(wrap_pyfunction!(delaunay, module)?)?;
    module.add_function(wrap_pyfunction!(delaunayf, module)?)?;
    module.add_function(wrap_pyfunction!(version, module)?)?;
    module.add("ValidationError", py.get_type::<ValidationError>())?;
    module.add("SingularInputError", py.get_type::<SingularInputError>())?;
    module.add("PrecisionError", py.get_type::<PrecisionError>())?;
    module.add("EngineInternalError", py.get_type::<EngineInternalError>())?;
    module.add("BadInvocationError", py.get_type::<BadInvocationError>())?;
    Ok(())
}
