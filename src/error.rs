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

use std::collections::TryReserveError;

use thiserror::Error;

use crate::engine::{EngineFailure, ExitCode};

/// Failure of a triangulation call.
///
/// Every engine exit code maps onto exactly one variant; nothing is returned
/// alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DelaunayError {
    /// The points do not form an `N x 2` or `N x 3` array of finite numbers.
    #[error("invalid point set: {0}")]
    Validation(String),
    /// The engine could not span the input, e.g. coincident points.
    #[error("singular input data: {0}")]
    SingularInput(String),
    /// The engine hit a numerical precision failure.
    #[error("precision error: {0}")]
    Precision(String),
    #[error("out of memory: {0}")]
    OutOfMemory(String),
    #[error("internal engine error: {0}")]
    EngineInternal(String),
    /// The engine rejected its own command line.
    #[error("bad engine invocation: {0}")]
    BadInvocation(String),
}

impl DelaunayError {
    /// Whether retrying with different points or flags can succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DelaunayError::Validation(_)
                | DelaunayError::SingularInput(_)
                | DelaunayError::Precision(_)
        )
    }
}

impl From<EngineFailure> for DelaunayError {
    fn from(failure: EngineFailure) -> Self {
        let EngineFailure { code, message } = failure;
        match code {
            ExitCode::Input => DelaunayError::BadInvocation(message),
            ExitCode::Singular => DelaunayError::SingularInput(message),
            ExitCode::Precision => DelaunayError::Precision(message),
            ExitCode::Memory => DelaunayError::OutOfMemory(message),
            ExitCode::Internal => DelaunayError::EngineInternal(message),
        }
    }
}

impl From<TryReserveError> for DelaunayError {
    fn from(err: TryReserveError) -> Self {
        DelaunayError::OutOfMemory(format!("cannot allocate output facets: {err}"))
    }
}
