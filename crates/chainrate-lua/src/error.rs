//! Error types for parsing and evaluating Lua data files.

use crate::syntax::Location;
use std::fmt;

// ===========================================================================
// Parse errors
// ===========================================================================

/// Errors produced while turning source text into a syntax tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// The lexer could not match any token at this position.
    #[error("unrecognised input '{text}' at {location}")]
    Lex { text: String, location: Location },

    /// A token appeared where the grammar expected something else.
    #[error("unexpected '{found}' at {location}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        location: Location,
    },

    /// The input ended in the middle of a construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Valid Lua that this front end deliberately does not parse.
    #[error("{construct} is not supported (at {location})")]
    Unsupported {
        construct: &'static str,
        location: Location,
    },
}

// ===========================================================================
// Evaluation errors
// ===========================================================================

/// Where an evaluation error happened: the source name plus, when the node
/// carries one, a line/column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub source: String,
    pub location: Option<Location>,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{}:{location}", self.source),
            None => f.write_str(&self.source),
        }
    }
}

/// A syntax tree node the evaluator refuses to interpret.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    /// Any statement or expression outside the literal subset.
    #[error("unexpected {construct} at {at}")]
    Unsupported {
        construct: &'static str,
        at: Position,
    },

    /// Assignment to something other than a plain name.
    #[error("cannot assign to {construct} at {at}, only identifiers are supported")]
    InvalidTarget {
        construct: &'static str,
        at: Position,
    },

    #[error("unsupported unary operator '{operator}' at {at}")]
    UnsupportedOperator {
        operator: &'static str,
        at: Position,
    },

    #[error("operator '{operator}' expected {expected} but got {found} at {at}")]
    OperandType {
        operator: &'static str,
        expected: &'static str,
        found: &'static str,
        at: Position,
    },

    /// A `[key] = value` field whose key is not a number or string.
    #[error("invalid key type \"{found}\" at {at}")]
    InvalidKey { found: &'static str, at: Position },
}

impl SyntaxError {
    pub fn position(&self) -> &Position {
        match self {
            SyntaxError::Unsupported { at, .. }
            | SyntaxError::InvalidTarget { at, .. }
            | SyntaxError::UnsupportedOperator { at, .. }
            | SyntaxError::OperandType { at, .. }
            | SyntaxError::InvalidKey { at, .. } => at,
        }
    }
}
