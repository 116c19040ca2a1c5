//! Recursive-descent parser for the Lua subset.
//!
//! The parser accepts more than the evaluator will interpret: binary
//! expressions, calls, `local`, `return` and simple control flow all parse,
//! so the evaluator can reject them by name. Function bodies, numeric and
//! generic `for`, `repeat`, `goto` and long-bracket strings are refused here.

use crate::error::ParseError;
use crate::lexer::{Spanned, Token, tokenize};
use crate::syntax::*;

pub type ParseResult<T> = Result<T, ParseError>;

/// Parse a whole source file into a [`Chunk`].
pub fn parse(source: &str) -> ParseResult<Chunk> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let body = parser.parse_block()?;
    match parser.peek() {
        None => Ok(Chunk::new(body)),
        Some(spanned) => Err(ParseError::UnexpectedToken {
            found: describe(&spanned.token),
            expected: "statement",
            location: spanned.location,
        }),
    }
}

/// Priority of unary operators (binds tighter than everything but `^`).
const UNARY_PRIORITY: u8 = 12;

enum BinaryOp {
    Binary(BinaryOperator),
    Logical(LogicalOperator),
}

/// `(operator, left priority, right priority)` for a binary token.
fn binary_op(token: &Token) -> Option<(BinaryOp, u8, u8)> {
    use BinaryOperator::*;
    let op = match token {
        Token::Or => return Some((BinaryOp::Logical(LogicalOperator::Or), 1, 1)),
        Token::And => return Some((BinaryOp::Logical(LogicalOperator::And), 2, 2)),
        Token::Less => (Lt, 3, 3),
        Token::Greater => (Gt, 3, 3),
        Token::LessEq => (Le, 3, 3),
        Token::GreaterEq => (Ge, 3, 3),
        Token::NotEq => (Ne, 3, 3),
        Token::EqEq => (Eq, 3, 3),
        Token::Pipe => (BitOr, 4, 4),
        Token::Tilde => (BitXor, 5, 5),
        Token::Ampersand => (BitAnd, 6, 6),
        Token::ShiftLeft => (Shl, 7, 7),
        Token::ShiftRight => (Shr, 7, 7),
        Token::DotDot => (Concat, 9, 8),
        Token::Plus => (Add, 10, 10),
        Token::Minus => (Sub, 10, 10),
        Token::Star => (Mul, 11, 11),
        Token::Slash => (Div, 11, 11),
        Token::DoubleSlash => (FloorDiv, 11, 11),
        Token::Percent => (Mod, 11, 11),
        Token::Caret => (Pow, 14, 13),
        _ => return None,
    };
    Some((BinaryOp::Binary(op.0), op.1, op.2))
}

fn unary_op(token: &Token) -> Option<UnaryOperator> {
    match token {
        Token::Minus => Some(UnaryOperator::Negate),
        Token::Hash => Some(UnaryOperator::Length),
        Token::Not => Some(UnaryOperator::Not),
        Token::Tilde => Some(UnaryOperator::BitNot),
        _ => None,
    }
}

fn describe(token: &Token) -> String {
    match token {
        Token::Name(name) => name.clone(),
        Token::String(raw) => raw.clone(),
        Token::Number(n) => n.to_string(),
        other => format!("{other:?}"),
    }
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    // -----------------------------------------------------------------------
    // Token helpers
    // -----------------------------------------------------------------------

    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn peek_token(&self) -> Option<&Token> {
        self.peek().map(|s| &s.token)
    }

    fn peek_nth_token(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|s| &s.token)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn check(&self, token: &Token) -> bool {
        self.peek_token() == Some(token)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> ParseResult<Location> {
        match self.advance() {
            Some(spanned) if &spanned.token == token => Ok(spanned.location),
            Some(spanned) => Err(ParseError::UnexpectedToken {
                found: describe(&spanned.token),
                expected,
                location: spanned.location,
            }),
            None => Err(ParseError::UnexpectedEnd { expected }),
        }
    }

    fn expect_name(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Spanned {
                token: Token::Name(name),
                ..
            }) => Ok(name),
            Some(spanned) => Err(ParseError::UnexpectedToken {
                found: describe(&spanned.token),
                expected: "name",
                location: spanned.location,
            }),
            None => Err(ParseError::UnexpectedEnd { expected: "name" }),
        }
    }

    fn next_location(&self, expected: &'static str) -> ParseResult<Location> {
        self.peek()
            .map(|s| s.location)
            .ok_or(ParseError::UnexpectedEnd { expected })
    }

    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn block_ends(&self) -> bool {
        matches!(
            self.peek_token(),
            None | Some(Token::End | Token::Else | Token::ElseIf | Token::Until)
        )
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        let mut body = Vec::new();
        while !self.block_ends() {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            let is_return = self.check(&Token::Return);
            body.push(self.parse_statement()?);
            if is_return {
                // `return` must be the last statement of its block.
                break;
            }
        }
        Ok(body)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        let location = self.next_location("statement")?;
        let unsupported = |construct| ParseError::Unsupported {
            construct,
            location,
        };

        let kind = match self.peek_token() {
            Some(Token::Local) => {
                self.advance();
                if self.check(&Token::Function) {
                    return Err(unsupported("local function declaration"));
                }
                let mut names = vec![self.expect_name()?];
                while self.eat(&Token::Comma) {
                    names.push(self.expect_name()?);
                }
                let values = if self.eat(&Token::Assign) {
                    self.parse_expression_list()?
                } else {
                    Vec::new()
                };
                StatementKind::Local { names, values }
            }
            Some(Token::Return) => {
                self.advance();
                let values = if self.block_ends() || self.check(&Token::Semicolon) {
                    Vec::new()
                } else {
                    self.parse_expression_list()?
                };
                self.eat(&Token::Semicolon);
                StatementKind::Return(values)
            }
            Some(Token::Do) => {
                self.advance();
                let body = self.parse_block()?;
                self.expect(&Token::End, "'end'")?;
                StatementKind::Do(body)
            }
            Some(Token::While) => {
                self.advance();
                let condition = self.parse_expression()?;
                self.expect(&Token::Do, "'do'")?;
                let body = self.parse_block()?;
                self.expect(&Token::End, "'end'")?;
                StatementKind::While { condition, body }
            }
            Some(Token::If) => {
                self.advance();
                StatementKind::If(self.parse_if_clauses()?)
            }
            Some(Token::Break) => {
                self.advance();
                StatementKind::Break
            }
            Some(Token::Function) => return Err(unsupported("function declaration")),
            Some(Token::For) => return Err(unsupported("for loop")),
            Some(Token::Repeat) => return Err(unsupported("repeat loop")),
            Some(Token::Goto) => return Err(unsupported("goto")),
            Some(Token::DoubleColon) => return Err(unsupported("label")),
            _ => self.parse_expression_statement()?,
        };

        Ok(Statement::at(kind, location))
    }

    fn parse_if_clauses(&mut self) -> ParseResult<Vec<IfClause>> {
        let mut clauses = Vec::new();
        let condition = self.parse_expression()?;
        self.expect(&Token::Then, "'then'")?;
        clauses.push(IfClause {
            condition: Some(condition),
            body: self.parse_block()?,
        });

        loop {
            if self.eat(&Token::ElseIf) {
                let condition = self.parse_expression()?;
                self.expect(&Token::Then, "'then'")?;
                clauses.push(IfClause {
                    condition: Some(condition),
                    body: self.parse_block()?,
                });
            } else if self.eat(&Token::Else) {
                clauses.push(IfClause {
                    condition: None,
                    body: self.parse_block()?,
                });
                self.expect(&Token::End, "'end'")?;
                return Ok(clauses);
            } else {
                self.expect(&Token::End, "'end'")?;
                return Ok(clauses);
            }
        }
    }

    fn parse_expression_statement(&mut self) -> ParseResult<StatementKind> {
        let first = self.parse_suffixed()?;

        if self.check(&Token::Assign) || self.check(&Token::Comma) {
            let mut targets = vec![first];
            while self.eat(&Token::Comma) {
                targets.push(self.parse_suffixed()?);
            }
            self.expect(&Token::Assign, "'='")?;
            let values = self.parse_expression_list()?;
            return Ok(StatementKind::Assignment { targets, values });
        }

        if matches!(first.kind, ExpressionKind::Call { .. }) {
            return Ok(StatementKind::Call(first));
        }

        match self.peek() {
            Some(spanned) => Err(ParseError::UnexpectedToken {
                found: describe(&spanned.token),
                expected: "'=' or a call",
                location: spanned.location,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "'=' or a call",
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut values = vec![self.parse_expression()?];
        while self.eat(&Token::Comma) {
            values.push(self.parse_expression()?);
        }
        Ok(values)
    }

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_subexpression(0)
    }

    /// Precedence climbing: parse operators whose left priority exceeds
    /// `limit`.
    fn parse_subexpression(&mut self, limit: u8) -> ParseResult<Expression> {
        let location = self.next_location("expression")?;

        let mut left = match self.peek_token().and_then(unary_op) {
            Some(operator) => {
                self.advance();
                let argument = self.parse_subexpression(UNARY_PRIORITY)?;
                Expression::at(
                    ExpressionKind::Unary {
                        operator,
                        argument: Box::new(argument),
                    },
                    location,
                )
            }
            None => self.parse_simple()?,
        };

        while let Some((op, left_priority, right_priority)) =
            self.peek_token().and_then(binary_op)
        {
            if left_priority <= limit {
                break;
            }
            let op_location = self.next_location("operator")?;
            self.advance();
            let right = self.parse_subexpression(right_priority)?;
            let kind = match op {
                BinaryOp::Binary(operator) => ExpressionKind::Binary {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                BinaryOp::Logical(operator) => ExpressionKind::Logical {
                    operator,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
            left = Expression::at(kind, op_location);
        }

        Ok(left)
    }

    fn parse_simple(&mut self) -> ParseResult<Expression> {
        let location = self.next_location("expression")?;
        let kind = match self.peek_token() {
            Some(Token::Nil) => ExpressionKind::Nil,
            Some(Token::True) => ExpressionKind::Boolean(true),
            Some(Token::False) => ExpressionKind::Boolean(false),
            Some(Token::Number(n)) => ExpressionKind::Number(*n),
            Some(Token::String(raw)) => ExpressionKind::String { raw: raw.clone() },
            Some(Token::Ellipsis) => ExpressionKind::Vararg,
            Some(Token::LBrace) => return self.parse_table(),
            Some(Token::Function) => {
                return Err(ParseError::Unsupported {
                    construct: "function expression",
                    location,
                });
            }
            Some(Token::LongBracket) => {
                return Err(ParseError::Unsupported {
                    construct: "long-bracket string",
                    location,
                });
            }
            _ => return self.parse_suffixed(),
        };
        self.advance();
        Ok(Expression::at(kind, location))
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match self.advance() {
            Some(Spanned {
                token: Token::Name(name),
                location,
            }) => Ok(Expression::at(ExpressionKind::Identifier(name), location)),
            Some(Spanned {
                token: Token::LParen,
                ..
            }) => {
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(spanned) => Err(ParseError::UnexpectedToken {
                found: describe(&spanned.token),
                expected: "expression",
                location: spanned.location,
            }),
            None => Err(ParseError::UnexpectedEnd {
                expected: "expression",
            }),
        }
    }

    /// A primary expression followed by any number of `.name`, `[index]`,
    /// `:method(args)` and call suffixes.
    fn parse_suffixed(&mut self) -> ParseResult<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            let Some(location) = self.peek().map(|s| s.location) else {
                return Ok(expr);
            };
            let kind = match self.peek_token() {
                Some(Token::Dot) => {
                    self.advance();
                    ExpressionKind::Member {
                        base: Box::new(expr),
                        name: self.expect_name()?,
                    }
                }
                Some(Token::LBracket) => {
                    self.advance();
                    let index = self.parse_expression()?;
                    self.expect(&Token::RBracket, "']'")?;
                    ExpressionKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                Some(Token::Colon) => {
                    self.advance();
                    let name = self.expect_name()?;
                    let method = Expression::at(
                        ExpressionKind::Member {
                            base: Box::new(expr),
                            name,
                        },
                        location,
                    );
                    ExpressionKind::Call {
                        base: Box::new(method),
                        arguments: self.parse_call_arguments()?,
                    }
                }
                Some(Token::LParen | Token::LBrace | Token::String(_)) => ExpressionKind::Call {
                    base: Box::new(expr),
                    arguments: self.parse_call_arguments()?,
                },
                _ => return Ok(expr),
            };
            expr = Expression::at(kind, location);
        }
    }

    fn parse_call_arguments(&mut self) -> ParseResult<Vec<Expression>> {
        match self.peek_token() {
            Some(Token::LBrace) => Ok(vec![self.parse_table()?]),
            Some(Token::String(_)) => Ok(vec![self.parse_simple()?]),
            _ => {
                self.expect(&Token::LParen, "'('")?;
                if self.eat(&Token::RParen) {
                    return Ok(Vec::new());
                }
                let arguments = self.parse_expression_list()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(arguments)
            }
        }
    }

    fn parse_table(&mut self) -> ParseResult<Expression> {
        let location = self.expect(&Token::LBrace, "'{'")?;
        let mut fields = Vec::new();

        while !self.check(&Token::RBrace) {
            fields.push(self.parse_field()?);
            if !self.eat(&Token::Comma) && !self.eat(&Token::Semicolon) {
                break;
            }
        }

        self.expect(&Token::RBrace, "'}'")?;
        Ok(Expression::at(ExpressionKind::Table(fields), location))
    }

    fn parse_field(&mut self) -> ParseResult<TableField> {
        if self.eat(&Token::LBracket) {
            let key = self.parse_expression()?;
            self.expect(&Token::RBracket, "']'")?;
            self.expect(&Token::Assign, "'='")?;
            let value = self.parse_expression()?;
            return Ok(TableField::Keyed { key, value });
        }

        let named = matches!(
            (self.peek_token(), self.peek_nth_token(1)),
            (Some(Token::Name(_)), Some(Token::Assign))
        );
        if named {
            let name = self.expect_name()?;
            self.advance();
            let value = self.parse_expression()?;
            return Ok(TableField::Named { name, value });
        }

        Ok(TableField::Positional(self.parse_expression()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_value(source: &str) -> Expression {
        let chunk = parse(source).unwrap();
        match chunk.body.into_iter().next().map(|s| s.kind) {
            Some(StatementKind::Assignment { mut values, .. }) => values.remove(0),
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn parses_simple_assignment() {
        let chunk = parse("x = 1").unwrap();
        assert_eq!(chunk.body.len(), 1);
        assert_eq!(chunk.body[0].tag(), "AssignmentStatement");
        assert_eq!(chunk.body[0].location, Some(Location::new(1, 1)));
    }

    #[test]
    fn parses_multiple_targets() {
        let chunk = parse("a, b = 1, 2").unwrap();
        match &chunk.body[0].kind {
            StatementKind::Assignment { targets, values } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(values.len(), 2);
            }
            other => panic!("expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn table_field_kinds() {
        let expr = single_value(r#"x = { "a", k = 1, [2] = true }"#);
        match expr.kind {
            ExpressionKind::Table(fields) => {
                assert!(matches!(fields[0], TableField::Positional(_)));
                assert!(matches!(fields[1], TableField::Named { ref name, .. } if name == "k"));
                assert!(matches!(fields[2], TableField::Keyed { .. }));
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn trailing_separators_in_tables() {
        let expr = single_value("x = { 1; 2, }");
        match expr.kind {
            ExpressionKind::Table(fields) => assert_eq!(fields.len(), 2),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn precedence_of_binary_operators() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = single_value("x = 1 + 2 * 3");
        match expr.kind {
            ExpressionKind::Binary {
                operator: BinaryOperator::Add,
                right,
                ..
            } => assert!(matches!(
                right.kind,
                ExpressionKind::Binary {
                    operator: BinaryOperator::Mul,
                    ..
                }
            )),
            other => panic!("expected addition, got {other:?}"),
        }
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_unary() {
        // -2 ^ 2 parses as -(2 ^ 2)
        let expr = single_value("x = -2 ^ 2");
        match expr.kind {
            ExpressionKind::Unary {
                operator: UnaryOperator::Negate,
                argument,
            } => assert!(matches!(
                argument.kind,
                ExpressionKind::Binary {
                    operator: BinaryOperator::Pow,
                    ..
                }
            )),
            other => panic!("expected negation, got {other:?}"),
        }
    }

    #[test]
    fn call_statement() {
        let chunk = parse("print('hi')").unwrap();
        assert_eq!(chunk.body[0].tag(), "CallStatement");
    }

    #[test]
    fn method_call_and_member_access() {
        let expr = single_value("x = a.b:c(1)");
        assert_eq!(expr.tag(), "CallExpression");
    }

    #[test]
    fn control_flow_parses() {
        let chunk = parse("if a then x = 1 elseif b then x = 2 else x = 3 end while c do break end")
            .unwrap();
        assert_eq!(chunk.body[0].tag(), "IfStatement");
        assert_eq!(chunk.body[1].tag(), "WhileStatement");
    }

    #[test]
    fn local_and_return() {
        let chunk = parse("local a, b = 1\nreturn a").unwrap();
        assert_eq!(chunk.body[0].tag(), "LocalStatement");
        assert_eq!(chunk.body[1].tag(), "ReturnStatement");
    }

    #[test]
    fn function_declarations_are_unsupported() {
        let err = parse("function f() end").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unsupported {
                construct: "function declaration",
                ..
            }
        ));
    }

    #[test]
    fn long_strings_are_unsupported() {
        let err = parse("x = [[text]]").unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { .. }));
    }

    #[test]
    fn bare_expression_is_an_error() {
        let err = parse("x").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { .. }));
    }

    #[test]
    fn unclosed_table_is_an_error() {
        let err = parse("x = { 1, 2").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEnd { expected: "'}'" });
    }

    #[test]
    fn stray_end_is_reported() {
        let err = parse("x = 1 end").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { expected: "statement", .. }));
    }
}
