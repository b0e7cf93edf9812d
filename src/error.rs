// Copyright 2019 The Mini Regex Authors.
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
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! Error types for pattern compilation.
//!
//! Matching never fails; only compilation does. A failed compilation leaves no
//! usable program behind, so every error here means "do not attempt to match".

use std::error;
use std::fmt;

/// Result type alias for this crate, using [`CompileError`] as the error.
pub type Result<T> = ::std::result::Result<T, CompileError>;

/// An error that occurred while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The pattern, or a bracket expression inside it, ends with a bare `\`.
    TrailingBackslash,
    /// A `[` was never closed by a `]`.
    UnterminatedClass,
    /// A `-` inside a bracket expression was applied to an endpoint that
    /// cannot form a range (a predefined class such as `\w`), or was left
    /// dangling at the end of the pattern.
    InvalidRange,
    /// The pattern compiles to more tokens than the configured limit allows.
    TooManyTokens {
        /// The configured token limit.
        limit: usize,
    },
    /// The pattern's bracket expressions need more class-character entries
    /// than the configured pool limit allows.
    BufferExhausted {
        /// The configured pool limit.
        limit: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::TrailingBackslash => {
                write!(f, "pattern ends with an unescaped backslash")
            }
            CompileError::UnterminatedClass => {
                write!(f, "bracket expression is missing its closing ]")
            }
            CompileError::InvalidRange => {
                write!(f, "invalid range in bracket expression")
            }
            CompileError::TooManyTokens { limit } => {
                write!(f, "pattern needs more than {} tokens", limit)
            }
            CompileError::BufferExhausted { limit } => {
                write!(f, "pattern needs more than {} class characters", limit)
            }
        }
    }
}

impl error::Error for CompileError {}
