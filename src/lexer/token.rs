use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Every kind of token the lexer can emit. The set is closed; tags and
/// filters extend the language through the parse-rule protocol instead of
/// through new token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Illegal,
    Eof,

    Raw,
    Ident,
    Number,
    String,

    OpenVar,
    CloseVar,
    OpenTag,
    CloseTag,
    OpenComment,
    CloseComment,
    OpenRaw,
    CloseRaw,

    LBracket,
    RBracket,
    LSquare,
    RSquare,
    LParen,
    RParen,

    True,
    False,

    Dot,
    Comma,
    Colon,
    Assign,
    Percent,
    Pipe,

    Plus,
    Minus,
    Times,
    Slash,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,

    /// The `{% end %}` closing a block, matched as a single token.
    End,

    /// Meta-kind used by tag parse rules to describe "any expression" in
    /// error messages. Never emitted by the lexer.
    Expression,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Raw => "RAW",
            TokenKind::Ident => "IDENT",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::OpenVar => "OPEN_VAR",
            TokenKind::CloseVar => "CLOSE_VAR",
            TokenKind::OpenTag => "OPEN_TAG",
            TokenKind::CloseTag => "CLOSE_TAG",
            TokenKind::OpenComment => "OPEN_COMMENT",
            TokenKind::CloseComment => "CLOSE_COMMENT",
            TokenKind::OpenRaw => "OPEN_RAW",
            TokenKind::CloseRaw => "CLOSE_RAW",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
            TokenKind::LSquare => "LSQUARE",
            TokenKind::RSquare => "RSQUARE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Dot => "DOT",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Percent => "PERCENT",
            TokenKind::Pipe => "PIPE",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Slash => "SLASH",
            TokenKind::Lt => "LT",
            TokenKind::LtEq => "LT_EQ",
            TokenKind::Gt => "GT",
            TokenKind::GtEq => "GT_EQ",
            TokenKind::Eq => "EQ",
            TokenKind::NotEq => "NOT_EQ",
            TokenKind::End => "END",
            TokenKind::Expression => "EXPRESSION",
        };
        f.write_str(name)
    }
}

/// A single lexed token.
///
/// `literal` is the post-processed content (string escapes resolved, no
/// surrounding whitespace), while `raw` is the exact input slice that
/// produced the token, leading whitespace included. Concatenating the `raw`
/// fields of a token stream reproduces the input byte for byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub raw: String,
    /// 1-based line of the first non-whitespace character of `raw`.
    pub line: usize,
    /// 1-based column of the first non-whitespace character of `raw`.
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        let literal = literal.into();
        Token {
            kind,
            raw: literal.clone(),
            literal,
            line: 1,
            col: 1,
        }
    }
}

// Tokens compare by kind and literal only. Positions and raw slices vary
// with the surrounding whitespace, which would make every AST comparison
// depend on the formatting of the input.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.literal == other.literal
    }
}

impl Eq for Token {}
