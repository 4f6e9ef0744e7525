use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Location of a token in the raw policy text. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum PolicyError {
    #[error("failed to decode percent-escaped policy text: {0}")]
    Decode(String),

    #[error("lex error at {position}: {message}")]
    Lex { position: Position, message: String },

    #[error("parse error at {position}: expected {expected}, found {found}")]
    Grammar {
        position: Position,
        expected: String,
        found: String,
    },

    #[error("policy text has not been parsed")]
    NotParsed,

    #[error("{0} is not a supported cloud provider")]
    UnsupportedProvider(String),
}

impl PolicyError {
    pub fn lex(position: Position, message: impl Into<String>) -> Self {
        PolicyError::Lex {
            position,
            message: message.into(),
        }
    }

    pub fn grammar(
        position: Position,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        PolicyError::Grammar {
            position,
            expected: expected.into(),
            found: found.into(),
        }
    }
}
