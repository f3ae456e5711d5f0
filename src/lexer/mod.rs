//! Lexical analysis for templates.
//!
//! The lexer is a two-mode state machine: in *text mode* everything up to
//! the next code delimiter becomes a single [`TokenKind::Raw`] token, and in
//! *code mode* the input is tokenized as template code. The verbatim
//! (`{{{ ... }}}`) and comment (`{# ... #}`) forms are handled here as well:
//! their opening markers arm a one-shot state that turns everything up to
//! the closing marker into a raw token without any interpretation.

mod token;

pub use token::*;

use unescape::unescape;

pub struct Lexer<'a> {
    input: &'a str,
    /// Byte offset of the cursor. Always on a char boundary.
    position: usize,
    line: usize,
    col: usize,
    in_code: bool,
    /// Armed by `{{{` and `{#`: the next token is a raw slice running up to
    /// (but not including) this marker.
    raw_until: Option<&'static str>,
}

const TEXT_DELIMITERS: [&str; 3] = ["{{", "{%", "{#"];

const CODE_MARKERS: [(&str, TokenKind); 12] = [
    ("{{{", TokenKind::OpenRaw),
    ("}}}", TokenKind::CloseRaw),
    ("{#", TokenKind::OpenComment),
    ("#}", TokenKind::CloseComment),
    ("{%", TokenKind::OpenTag),
    ("%}", TokenKind::CloseTag),
    ("{{", TokenKind::OpenVar),
    ("}}", TokenKind::CloseVar),
    (">=", TokenKind::GtEq),
    ("<=", TokenKind::LtEq),
    ("==", TokenKind::Eq),
    ("!=", TokenKind::NotEq),
];

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            col: 1,
            in_code: false,
            raw_until: None,
        }
    }

    /// Lex the whole input, including the terminating EOF token.
    pub fn lex(mut self) -> Vec<Token> {
        let mut tokens = vec![];

        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);

            if done {
                return tokens;
            }
        }
    }

    pub fn next_token(&mut self) -> Token {
        let start = self.position;

        if let Some(marker) = self.raw_until.take() {
            return self.lex_raw_until(marker, start);
        }

        if !self.in_code {
            if self.position >= self.input.len() {
                return self.emit(TokenKind::Eof, "", start, self.line, self.col);
            }

            if self.at_code_start() {
                self.in_code = true;
            } else {
                return self.lex_text(start);
            }
        }

        self.lex_code(start)
    }

    /// Text mode: everything up to the next code delimiter (or EOF) is one
    /// raw token whose literal equals its raw slice.
    fn lex_text(&mut self, start: usize) -> Token {
        let start_line = self.line;
        let start_col = self.col;

        while self.position < self.input.len() && !self.at_code_start() {
            self.advance();
        }

        let raw = &self.input[start..self.position];
        let (line, col) = first_visible_position(raw, start_line, start_col);
        Token {
            kind: TokenKind::Raw,
            literal: raw.to_string(),
            raw: raw.to_string(),
            line,
            col,
        }
    }

    /// One-shot raw mode armed by `{{{` or `{#`: consume everything up to
    /// the closing marker (or EOF) without re-entering code interpretation.
    fn lex_raw_until(&mut self, marker: &str, start: usize) -> Token {
        let start_line = self.line;
        let start_col = self.col;

        let end = self.input[self.position..]
            .find(marker)
            .map(|offset| self.position + offset)
            .unwrap_or(self.input.len());

        while self.position < end {
            self.advance();
        }

        let raw = &self.input[start..self.position];
        let (line, col) = first_visible_position(raw, start_line, start_col);
        Token {
            kind: TokenKind::Raw,
            literal: raw.to_string(),
            raw: raw.to_string(),
            line,
            col,
        }
    }

    fn lex_code(&mut self, start: usize) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let col = self.col;

        if self.position >= self.input.len() {
            return self.emit(TokenKind::Eof, "", start, line, col);
        }

        if let Some(token) = self.lex_end_token(start, line, col) {
            return token;
        }

        for (pattern, kind) in CODE_MARKERS {
            if self.rest().starts_with(pattern) {
                self.advance_str(pattern);

                match kind {
                    TokenKind::OpenRaw => self.raw_until = Some("}}}"),
                    TokenKind::OpenComment => self.raw_until = Some("#}"),
                    TokenKind::CloseRaw
                    | TokenKind::CloseComment
                    | TokenKind::CloseTag
                    | TokenKind::CloseVar => self.in_code = false,
                    _ => {}
                }

                return self.emit(kind, pattern, start, line, col);
            }
        }

        let Some(c) = self.rest().chars().next() else {
            return self.emit(TokenKind::Eof, "", start, line, col);
        };

        let kind = match c {
            '{' => Some(TokenKind::LBracket),
            '}' => Some(TokenKind::RBracket),
            '[' => Some(TokenKind::LSquare),
            ']' => Some(TokenKind::RSquare),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            '.' => Some(TokenKind::Dot),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '=' => Some(TokenKind::Assign),
            '|' => Some(TokenKind::Pipe),
            '+' => Some(TokenKind::Plus),
            '-' => Some(TokenKind::Minus),
            '*' => Some(TokenKind::Times),
            '/' => Some(TokenKind::Slash),
            '<' => Some(TokenKind::Lt),
            '>' => Some(TokenKind::Gt),
            _ => None,
        };

        if let Some(kind) = kind {
            self.advance();
            return self.emit(kind, c.to_string(), start, line, col);
        }

        match c {
            '"' | '\'' => self.lex_string(c, start, line, col),
            '0'..='9' => self.lex_number(start, line, col),
            c if is_identifier_char(c) => self.lex_identifier(start, line, col),
            c => {
                self.advance();
                self.emit(TokenKind::Illegal, c.to_string(), start, line, col)
            }
        }
    }

    /// Match `{% end %}` with arbitrary interior whitespace as a single END
    /// token. The cursor is restored if the pattern does not match.
    fn lex_end_token(&mut self, start: usize, line: usize, col: usize) -> Option<Token> {
        let saved = (self.position, self.line, self.col);

        let matched = self.consume_str("{%") && {
            self.skip_whitespace();
            self.consume_str("end")
                && !matches!(self.rest().chars().next(), Some(c) if is_identifier_char(c))
                && {
                    self.skip_whitespace();
                    self.consume_str("%}")
                }
        };

        if !matched {
            (self.position, self.line, self.col) = saved;
            return None;
        }

        self.in_code = false;
        Some(self.emit(TokenKind::End, "{% end %}", start, line, col))
    }

    /// Strings are quoted with `"` or `'`; a backslash escapes the quote.
    /// The literal is the unescaped content, the raw slice keeps the quotes.
    /// An unterminated string consumes the rest of the input.
    fn lex_string(&mut self, quote: char, start: usize, line: usize, col: usize) -> Token {
        self.advance();

        let content_start = self.position;
        let mut prev = quote;

        while let Some(c) = self.rest().chars().next() {
            if c == quote && prev != '\\' {
                break;
            }
            prev = c;
            self.advance();
        }

        let content = &self.input[content_start..self.position];
        let literal = unescape(content).unwrap_or_else(|| content.to_string());

        if self.rest().starts_with(quote) {
            self.advance();
        }

        self.emit(TokenKind::String, literal, start, line, col)
    }

    /// Numbers start with a digit; interior dots are consumed greedily, so
    /// malformed input like `1.2.3` becomes a single NUMBER token that the
    /// parser rejects with a readable error.
    fn lex_number(&mut self, start: usize, line: usize, col: usize) -> Token {
        let literal_start = self.position;
        let mut not_first = false;

        while let Some(c) = self.rest().chars().next() {
            if c.is_ascii_digit() || (not_first && c == '.') {
                self.advance();
                not_first = true;
            } else {
                break;
            }
        }

        let literal = self.input[literal_start..self.position].to_string();
        self.emit(TokenKind::Number, literal, start, line, col)
    }

    fn lex_identifier(&mut self, start: usize, line: usize, col: usize) -> Token {
        let literal_start = self.position;

        while matches!(self.rest().chars().next(), Some(c) if is_identifier_char(c)) {
            self.advance();
        }

        let literal = &self.input[literal_start..self.position];
        let kind = match literal {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => TokenKind::Ident,
        };

        self.emit(kind, literal.to_string(), start, line, col)
    }

    fn emit(
        &self,
        kind: TokenKind,
        literal: impl Into<String>,
        start: usize,
        line: usize,
        col: usize,
    ) -> Token {
        Token {
            kind,
            literal: literal.into(),
            raw: self.input[start..self.position].to_string(),
            line,
            col,
        }
    }

    fn at_code_start(&self) -> bool {
        let rest = self.rest();
        TEXT_DELIMITERS
            .iter()
            .any(|delimiter| rest.starts_with(delimiter))
    }

    fn rest(&self) -> &str {
        &self.input[self.position..]
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.position += c.len_utf8();

        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }

        Some(c)
    }

    fn advance_str(&mut self, s: &str) {
        for _ in s.chars() {
            self.advance();
        }
    }

    fn consume_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.advance_str(s);
            return true;
        }
        false
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.rest().chars().next(), Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }
}

/// Position of the first non-whitespace character of `raw`, given the
/// position of its first character. Falls back to the start when the slice
/// is all whitespace.
fn first_visible_position(raw: &str, start_line: usize, start_col: usize) -> (usize, usize) {
    let mut line = start_line;
    let mut col = start_col;

    for c in raw.chars() {
        if !c.is_whitespace() {
            return (line, col);
        }

        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (start_line, start_col)
}
