// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Structured errors returned by the tokenizer, the parsers, the printer,
//! and the named-parameter compiler.

use core::fmt;

/// The closed set of failure classes.
///
/// No error is ever raised as a panic from library code; every entry point
/// returns a [`Result`] whose error is a [`SqlError`] tagged with one of
/// these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// The tokenizer could not read a lexeme: an unterminated string or
    /// block comment, an empty `${}` parameter, or (in the named-parameter
    /// compiler) a missing value or a reference-free text.
    MalformedInput,
    /// A parser found a lexeme whose kind or value is not accepted in the
    /// current state.
    UnexpectedToken,
    /// A required sub-clause is absent, e.g. `SELECT` with no items or
    /// `LIMIT` with no expression.
    MissingClauseElement,
    /// A closing parenthesis or bracket is missing.
    UnbalancedDelimiter,
    /// A programmatic mutation would violate an AST invariant, e.g.
    /// attaching a WITH clause to a query that already has one.
    InvalidConfiguration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::MalformedInput => "malformed input",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::MissingClauseElement => "missing clause element",
            ErrorKind::UnbalancedDelimiter => "unbalanced delimiter",
            ErrorKind::InvalidConfiguration => "invalid configuration",
        })
    }
}

/// The error type shared by every fallible operation in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SqlError {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte position in the original input, when one applies.
    pub position: Option<usize>,
    /// A short excerpt around the failure with a caret pointing at it.
    pub context: Option<String>,
}

impl SqlError {
    pub fn new<S>(kind: ErrorKind, message: S) -> SqlError
    where
        S: Into<String>,
    {
        SqlError {
            kind,
            message: message.into(),
            position: None,
            context: None,
        }
    }

    pub fn at<S>(kind: ErrorKind, message: S, position: usize) -> SqlError
    where
        S: Into<String>,
    {
        SqlError {
            kind,
            message: message.into(),
            position: Some(position),
            context: None,
        }
    }

    /// Attaches a caret-annotated excerpt to this error.
    pub fn with_context<S>(mut self, context: S) -> SqlError
    where
        S: Into<String>,
    {
        self.context = Some(context.into());
        self
    }

    pub fn malformed<S>(message: S) -> SqlError
    where
        S: Into<String>,
    {
        SqlError::new(ErrorKind::MalformedInput, message)
    }

    pub fn invalid<S>(message: S) -> SqlError
    where
        S: Into<String>,
    {
        SqlError::new(ErrorKind::InvalidConfiguration, message)
    }
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let Some(position) = self.position {
            write!(f, " at position {position}")?;
        }
        if let Some(context) = &self.context {
            write!(f, "\n{context}")?;
        }
        Ok(())
    }
}

impl std::error::Error for SqlError {}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, SqlError>;
