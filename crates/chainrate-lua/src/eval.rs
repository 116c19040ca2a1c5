//! Literal-tree evaluator.
//!
//! Walks a [`Chunk`] and collects its global assignments into a
//! [`Value::Map`]. Only literals, table constructors and the unary `-` and
//! `#` operators are interpreted; everything else is a [`SyntaxError`] that
//! names the offending node.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Position, SyntaxError};
use crate::syntax::*;
use crate::value::{Key, Value};

/// Source name used when none is given.
pub const DEFAULT_SOURCE: &str = "<memory>";

/// Evaluate a chunk parsed from an unnamed source.
pub fn evaluate(chunk: &Chunk) -> Result<Value, SyntaxError> {
    Evaluator::new(DEFAULT_SOURCE).evaluate(chunk)
}

/// Evaluates syntax trees, tagging errors with a source name.
#[derive(Debug, Clone)]
pub struct Evaluator {
    source: String,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}

impl Evaluator {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    fn at(&self, location: Option<Location>) -> Position {
        Position {
            source: self.source.clone(),
            location,
        }
    }

    /// Evaluate every top-level statement, in order, into a map of globals.
    /// Later assignments to a name overwrite earlier ones.
    pub fn evaluate(&self, chunk: &Chunk) -> Result<Value, SyntaxError> {
        let mut globals = IndexMap::new();
        for statement in &chunk.body {
            self.evaluate_statement(statement, &mut globals)?;
        }
        Ok(Value::Map(globals))
    }

    fn evaluate_statement(
        &self,
        statement: &Statement,
        globals: &mut IndexMap<Key, Value>,
    ) -> Result<(), SyntaxError> {
        let StatementKind::Assignment { targets, values } = &statement.kind else {
            return Err(SyntaxError::Unsupported {
                construct: statement.tag(),
                at: self.at(statement.location),
            });
        };

        let mut names = Vec::with_capacity(targets.len());
        for target in targets {
            match &target.kind {
                ExpressionKind::Identifier(name) => names.push(name),
                _ => {
                    return Err(SyntaxError::InvalidTarget {
                        construct: target.tag(),
                        at: self.at(target.location.or(statement.location)),
                    });
                }
            }
        }

        // Every right-hand side is evaluated, even surplus ones, so an
        // unsupported construct never slips through unnoticed.
        let mut evaluated = values
            .iter()
            .map(|value| self.evaluate_expression(value))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        for name in names {
            let value = evaluated.next().unwrap_or(Value::Nil);
            debug!(
                source = %self.source,
                name = %name,
                kind = value.type_name(),
                "evaluated global assignment"
            );
            globals.insert(Key::Text(name.clone()), value);
        }

        Ok(())
    }

    pub fn evaluate_expression(&self, expression: &Expression) -> Result<Value, SyntaxError> {
        match &expression.kind {
            ExpressionKind::Nil => Ok(Value::Nil),
            ExpressionKind::Boolean(b) => Ok(Value::Bool(*b)),
            ExpressionKind::Number(n) => Ok(Value::Number(*n)),
            ExpressionKind::String { raw } => Ok(Value::Text(strip_quotes(raw).to_string())),
            ExpressionKind::Table(fields) => self.evaluate_table(fields, expression.location),
            ExpressionKind::Unary { operator, argument } => {
                self.evaluate_unary(*operator, argument, expression.location)
            }
            _ => Err(SyntaxError::Unsupported {
                construct: expression.tag(),
                at: self.at(expression.location),
            }),
        }
    }

    fn evaluate_unary(
        &self,
        operator: UnaryOperator,
        argument: &Expression,
        location: Option<Location>,
    ) -> Result<Value, SyntaxError> {
        match operator {
            UnaryOperator::Negate => match self.evaluate_expression(argument)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(SyntaxError::OperandType {
                    operator: operator.symbol(),
                    expected: "number",
                    found: other.type_name(),
                    at: self.at(location),
                }),
            },
            UnaryOperator::Length => match self.evaluate_expression(argument)? {
                Value::Text(s) => Ok(Value::Number(s.len() as f64)),
                other => Err(SyntaxError::OperandType {
                    operator: operator.symbol(),
                    expected: "string",
                    found: other.type_name(),
                    at: self.at(location),
                }),
            },
            UnaryOperator::Not | UnaryOperator::BitNot => Err(SyntaxError::UnsupportedOperator {
                operator: operator.symbol(),
                at: self.at(location),
            }),
        }
    }

    /// A table is a sequence iff every field is positional. Otherwise it is a
    /// map, and positional fields take keys `0, 1, 2, ...` in order of
    /// appearance, interleaved with the explicit keys.
    fn evaluate_table(
        &self,
        fields: &[TableField],
        location: Option<Location>,
    ) -> Result<Value, SyntaxError> {
        let positional: Option<Vec<&Expression>> = fields
            .iter()
            .map(|field| match field {
                TableField::Positional(value) => Some(value),
                _ => None,
            })
            .collect();

        if let Some(values) = positional {
            let items = values
                .into_iter()
                .map(|value| self.evaluate_expression(value))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Value::Sequence(items));
        }

        let mut map = IndexMap::new();
        let mut next_index = 0usize;
        for field in fields {
            match field {
                TableField::Positional(value) => {
                    let key = Key::Number(next_index as f64);
                    next_index += 1;
                    map.insert(key, self.evaluate_expression(value)?);
                }
                TableField::Named { name, value } => {
                    map.insert(Key::Text(name.clone()), self.evaluate_expression(value)?);
                }
                TableField::Keyed { key, value } => {
                    let key_location = key.location.or(location);
                    let key = match self.evaluate_expression(key)? {
                        Value::Number(n) => Key::number(n).ok_or_else(|| SyntaxError::InvalidKey {
                            found: "NaN",
                            at: self.at(key_location),
                        })?,
                        Value::Text(s) => Key::Text(s),
                        other => {
                            return Err(SyntaxError::InvalidKey {
                                found: other.type_name(),
                                at: self.at(key_location),
                            });
                        }
                    };
                    map.insert(key, self.evaluate_expression(value)?);
                }
            }
        }

        Ok(Value::Map(map))
    }
}

/// Remove one matching pair of surrounding quotes from a raw string lexeme.
fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}
