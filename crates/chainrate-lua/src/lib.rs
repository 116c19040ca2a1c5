//! Chainrate Lua -- turns Lua data-definition files into dynamic values.
//!
//! Only the literal subset of Lua is interpreted: global assignments whose
//! right-hand sides are nil, booleans, numbers, strings, table constructors,
//! negation and string length. The parser recognises more than that so the
//! evaluator can reject the rest by name.
//!
//! ```rust,ignore
//! let chunk = chainrate_lua::parse(r#"x = { "alice", "bob" }"#)?;
//! let globals = chainrate_lua::evaluate(&chunk)?;
//! assert!(globals.get("x").unwrap().as_sequence().is_some());
//! ```
//!
//! # Key Types
//!
//! - [`syntax::Chunk`] -- the syntax tree handed to the evaluator.
//! - [`value::Value`] -- the evaluator's output; tables are decided to be a
//!   `Sequence` or a `Map` once, at evaluation time.
//! - [`eval::Evaluator`] -- walks a chunk, failing with [`SyntaxError`] on
//!   anything outside the literal subset.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod syntax;
pub mod value;

pub use error::{ParseError, Position, SyntaxError};
pub use eval::{Evaluator, evaluate};
pub use parser::parse;
pub use value::{Key, KeyCollision, Value};
