use logos::{Lexer, Logos, Skip};

use crate::error::ParseError;
use crate::syntax::Location;

/// A lexical token of the Lua subset.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// `--` line comments and `--[[ ]]` / `--[==[ ]==]` block comments.
    #[token("--", skip_comment)]
    Comment,

    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", parse_decimal)]
    #[regex(r"0[xX][0-9a-fA-F]+", parse_hex)]
    Number(f64),

    /// A quoted string, kept exactly as written.
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| lex.slice().to_owned())]
    #[regex(r"'([^'\\\n]|\\.)*'", |lex| lex.slice().to_owned())]
    String(String),

    /// Opening of a long-bracket string, which the parser rejects.
    #[regex(r"\[=*\[")]
    LongBracket,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_owned())]
    Name(String),

    #[token("and")]
    And,
    #[token("break")]
    Break,
    #[token("do")]
    Do,
    #[token("else")]
    Else,
    #[token("elseif")]
    ElseIf,
    #[token("end")]
    End,
    #[token("false")]
    False,
    #[token("for")]
    For,
    #[token("function")]
    Function,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("in")]
    In,
    #[token("local")]
    Local,
    #[token("nil")]
    Nil,
    #[token("not")]
    Not,
    #[token("or")]
    Or,
    #[token("repeat")]
    Repeat,
    #[token("return")]
    Return,
    #[token("then")]
    Then,
    #[token("true")]
    True,
    #[token("until")]
    Until,
    #[token("while")]
    While,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("//")]
    DoubleSlash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("#")]
    Hash,
    #[token("&")]
    Ampersand,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("<<")]
    ShiftLeft,
    #[token(">>")]
    ShiftRight,
    #[token("==")]
    EqEq,
    #[token("~=")]
    NotEq,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("::")]
    DoubleColon,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token("...")]
    Ellipsis,
}

fn skip_comment(lex: &mut Lexer<Token>) -> Skip {
    let rest = lex.remainder();
    let len = match long_bracket_level(rest) {
        Some(level) => {
            let open = level + 2;
            let close = format!("]{}]", "=".repeat(level));
            rest[open..]
                .find(&close)
                .map(|end| open + end + close.len())
                .unwrap_or(rest.len())
        }
        None => rest.find('\n').unwrap_or(rest.len()),
    };
    lex.bump(len);
    Skip
}

/// Number of `=` in a `[==[` opener at the start of `text`.
fn long_bracket_level(text: &str) -> Option<usize> {
    let body = text.strip_prefix('[')?;
    let level = body.bytes().take_while(|&b| b == b'=').count();
    body[level..].starts_with('[').then_some(level)
}

fn parse_decimal(lex: &mut Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn parse_hex(lex: &mut Lexer<Token>) -> Option<f64> {
    i64::from_str_radix(&lex.slice()[2..], 16)
        .ok()
        .map(|v| v as f64)
}

/// A token together with where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub location: Location,
}

/// Maps byte offsets to 1-based line/column pairs.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            source,
            line_starts,
        }
    }

    fn locate(&self, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        let column = self.source[start..offset].chars().count() + 1;
        Location::new(line, column)
    }
}

/// Split `source` into tokens, failing on the first unrecognised input.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ParseError> {
    let index = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let location = index.locate(lexer.span().start);
        match result {
            Ok(token) => tokens.push(Spanned { token, location }),
            Err(()) => {
                return Err(ParseError::Lex {
                    text: lexer.slice().to_string(),
                    location,
                });
            }
        }
    }

    Ok(tokens)
}
