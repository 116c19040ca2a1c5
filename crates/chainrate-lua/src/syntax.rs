//! Syntax tree for the Lua data-definition subset.
//!
//! The tree mirrors the node vocabulary of common Lua parsers (`Chunk`,
//! `AssignmentStatement`, `TableConstructorExpression`, ...) so that the
//! evaluator can report unsupported constructs by their familiar tag names.
//! Nodes carry an optional [`Location`]; trees built by hand in tests can
//! leave it empty.

use std::fmt;

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ===========================================================================
// Chunk and statements
// ===========================================================================

/// The root of a parsed source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chunk {
    pub body: Vec<Statement>,
}

impl Chunk {
    pub fn new(body: Vec<Statement>) -> Self {
        Self { body }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `a, b = x, y`
    Assignment {
        targets: Vec<Expression>,
        values: Vec<Expression>,
    },
    /// `local a, b = x, y`
    Local {
        names: Vec<String>,
        values: Vec<Expression>,
    },
    /// A call used as a statement: `print(x)`.
    Call(Expression),
    Return(Vec<Expression>),
    Do(Vec<Statement>),
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    /// `if c then ... elseif c then ... else ... end`. The `else` clause has
    /// no condition.
    If(Vec<IfClause>),
    Break,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub condition: Option<Expression>,
    pub body: Vec<Statement>,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn at(kind: StatementKind, location: Location) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }

    /// Shorthand for `name = value`.
    pub fn assign(name: &str, value: Expression) -> Self {
        Self::new(StatementKind::Assignment {
            targets: vec![Expression::identifier(name)],
            values: vec![value],
        })
    }

    /// The conventional node tag of this statement.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            StatementKind::Assignment { .. } => "AssignmentStatement",
            StatementKind::Local { .. } => "LocalStatement",
            StatementKind::Call(_) => "CallStatement",
            StatementKind::Return(_) => "ReturnStatement",
            StatementKind::Do(_) => "DoStatement",
            StatementKind::While { .. } => "WhileStatement",
            StatementKind::If(_) => "IfStatement",
            StatementKind::Break => "BreakStatement",
        }
    }
}

// ===========================================================================
// Expressions
// ===========================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    Nil,
    Boolean(bool),
    Number(f64),
    /// A string literal. `raw` is the lexeme exactly as written, quotes and
    /// escape sequences included.
    String {
        raw: String,
    },
    Vararg,
    Identifier(String),
    Table(Vec<TableField>),
    Unary {
        operator: UnaryOperator,
        argument: Box<Expression>,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `and` / `or`
    Logical {
        operator: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `base.name` or `base:name`
    Member {
        base: Box<Expression>,
        name: String,
    },
    /// `base[index]`
    Index {
        base: Box<Expression>,
        index: Box<Expression>,
    },
    Call {
        base: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Negate,
    /// `#`
    Length,
    /// `not`
    Not,
    /// `~`
    BitNot,
}

impl UnaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Negate => "-",
            UnaryOperator::Length => "#",
            UnaryOperator::Not => "not",
            UnaryOperator::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// One field of a table constructor.
#[derive(Debug, Clone, PartialEq)]
pub enum TableField {
    /// `{ value }`
    Positional(Expression),
    /// `{ name = value }`
    Named { name: String, value: Expression },
    /// `{ [key] = value }`
    Keyed { key: Expression, value: Expression },
}

impl Expression {
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            kind,
            location: None,
        }
    }

    pub fn at(kind: ExpressionKind, location: Location) -> Self {
        Self {
            kind,
            location: Some(location),
        }
    }

    pub fn number(value: f64) -> Self {
        Self::new(ExpressionKind::Number(value))
    }

    /// A double-quoted string literal with the given contents.
    pub fn string(contents: &str) -> Self {
        Self::new(ExpressionKind::String {
            raw: format!("\"{contents}\""),
        })
    }

    pub fn identifier(name: &str) -> Self {
        Self::new(ExpressionKind::Identifier(name.to_string()))
    }

    pub fn table(fields: Vec<TableField>) -> Self {
        Self::new(ExpressionKind::Table(fields))
    }

    /// The conventional node tag of this expression.
    pub fn tag(&self) -> &'static str {
        match self.kind {
            ExpressionKind::Nil => "NilLiteral",
            ExpressionKind::Boolean(_) => "BooleanLiteral",
            ExpressionKind::Number(_) => "NumericLiteral",
            ExpressionKind::String { .. } => "StringLiteral",
            ExpressionKind::Vararg => "VarargLiteral",
            ExpressionKind::Identifier(_) => "Identifier",
            ExpressionKind::Table(_) => "TableConstructorExpression",
            ExpressionKind::Unary { .. } => "UnaryExpression",
            ExpressionKind::Binary { .. } => "BinaryExpression",
            ExpressionKind::Logical { .. } => "LogicalExpression",
            ExpressionKind::Member { .. } => "MemberExpression",
            ExpressionKind::Index { .. } => "IndexExpression",
            ExpressionKind::Call { .. } => "CallExpression",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_node_names() {
        assert_eq!(Expression::number(1.0).tag(), "NumericLiteral");
        assert_eq!(Expression::table(vec![]).tag(), "TableConstructorExpression");
        assert_eq!(
            Statement::assign("x", Expression::number(1.0)).tag(),
            "AssignmentStatement"
        );
        assert_eq!(Statement::new(StatementKind::Break).tag(), "BreakStatement");
    }

    #[test]
    fn string_helper_quotes_contents() {
        match Expression::string("alice").kind {
            ExpressionKind::String { raw } => assert_eq!(raw, "\"alice\""),
            other => panic!("expected string, got {other:?}"),
        }
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::new(3, 14).to_string(), "3:14");
    }
}
