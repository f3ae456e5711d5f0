//! The template parser.
//!
//! Statements are dispatched on their opening token; expressions use Pratt
//! parsing over the precedence table below. Tag statements are driven by
//! the grammar each tag declares through its [`ParseConfig`], so the parser
//! itself knows nothing about individual tags.
//!
//! The parser never fails hard: every problem is recorded as a readable
//! string in [`Parser::errors`] and parsing continues as well as it can.
//! Callers are expected to skip evaluation when any error was recorded.

use log::trace;

use crate::ast::{
    ArrayLiteral, BooleanLiteral, Expression, FilterExpression, FilterLiteral, Identifier,
    IndexExpression, InfixExpression, NumberLiteral, PrefixExpression, RawStatement, Statement,
    StringLiteral, TagStatement, VariableStatement,
};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::registry;
use crate::tag::{ParseConfig, ParseRule};

/// Binding strength of expression operators, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Assign,
    Pipe,
    Equals,
    Compare,
    Sum,
    Product,
    Prefix,
    Index,
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Assign => Precedence::Assign,
        TokenKind::Pipe => Precedence::Pipe,
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => Precedence::Compare,
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Times | TokenKind::Slash => Precedence::Product,
        TokenKind::LSquare | TokenKind::Dot => Precedence::Index,
        _ => Precedence::Lowest,
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    curr: Token,
    peek: Token,
    pub errors: Vec<String>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);

        // Pre-fill the two-token window.
        let curr = lexer.next_token();
        let peek = lexer.next_token();

        Self {
            lexer,
            curr,
            peek,
            errors: vec![],
        }
    }

    pub fn parse(&mut self) -> Vec<Statement> {
        let mut statements = vec![];

        while self.curr.kind != TokenKind::Eof {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        statements
    }

    fn next_token(&mut self) {
        self.curr = std::mem::replace(&mut self.peek, self.lexer.next_token());
    }

    /// Advance when the next token has the expected kind; record an error
    /// and stay put otherwise.
    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek.kind == expected {
            self.next_token();
            return true;
        }

        self.errors
            .push(format!("expected {}, found {}", expected, self.peek.kind));
        false
    }

    /// Parse one statement. Enters with `curr` on the statement's first
    /// token and leaves with `curr` on its last.
    fn parse_statement(&mut self) -> Option<Statement> {
        match self.curr.kind {
            TokenKind::Raw => Some(Statement::Raw(RawStatement {
                token: self.curr.clone(),
            })),
            TokenKind::OpenVar => self.parse_variable_statement(),
            TokenKind::OpenTag => self.parse_tag_statement(),
            TokenKind::OpenComment => self.parse_comment_statement(),
            TokenKind::OpenRaw => self.parse_verbatim_statement(),
            _ => {
                // Anything unexpected at statement level is passed through
                // as literal text.
                let token = self.curr.clone();
                Some(Statement::Raw(RawStatement {
                    token: Token {
                        kind: TokenKind::Raw,
                        literal: token.raw.clone(),
                        raw: token.raw,
                        line: token.line,
                        col: token.col,
                    },
                }))
            }
        }
    }

    fn parse_variable_statement(&mut self) -> Option<Statement> {
        let token = self.curr.clone();

        self.next_token();
        let expression = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::CloseVar) {
            return None;
        }

        Some(Statement::Variable(VariableStatement { token, expression }))
    }

    /// A comment's content was already swallowed by the lexer; all that is
    /// left here is an empty raw statement.
    fn parse_comment_statement(&mut self) -> Option<Statement> {
        let token = self.curr.clone();

        if !self.expect_peek(TokenKind::Raw) {
            return None;
        }
        if !self.expect_peek(TokenKind::CloseComment) {
            return None;
        }

        Some(Statement::Raw(RawStatement {
            token: Token {
                kind: TokenKind::Raw,
                literal: String::new(),
                raw: String::new(),
                line: token.line,
                col: token.col,
            },
        }))
    }

    fn parse_verbatim_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Raw) {
            return None;
        }
        let statement = Statement::Raw(RawStatement {
            token: self.curr.clone(),
        });

        if !self.expect_peek(TokenKind::CloseRaw) {
            return None;
        }

        Some(statement)
    }

    fn parse_tag_statement(&mut self) -> Option<Statement> {
        if !self.expect_peek(TokenKind::Ident) {
            self.skip_to_tag_close();
            return None;
        }

        let token = self.curr.clone();
        let name = token.literal.clone();
        trace!("parsing tag '{name}'");

        let Some(tag) = registry::find_tag(&name) else {
            self.errors.push(format!("Unknown tag '{name}'"));
            self.skip_to_tag_close();
            return None;
        };

        let config = tag.parse();
        let args = self.parse_tag_rules(&config);

        if !self.expect_peek(TokenKind::CloseTag) {
            return None;
        }

        let mut statement = TagStatement {
            token,
            name,
            config: config.clone(),
            args,
            body: vec![],
            sub_tags: vec![],
        };

        if config.block {
            self.parse_block_body(&mut statement)?;
        }

        Some(Statement::Tag(statement))
    }

    /// Consume the argument tokens a tag's parse rules call for.
    fn parse_tag_rules(&mut self, config: &ParseConfig) -> Vec<Expression> {
        let mut args = vec![];

        for rule in &config.rules {
            if matches!(self.peek.kind, TokenKind::CloseTag | TokenKind::Eof) {
                self.errors.push(format!(
                    "Error parsing tag '{}': expected {}",
                    config.tag_name,
                    rule.expects()
                ));
                break;
            }

            self.next_token();

            let arg = match rule {
                ParseRule::Identifier => {
                    if self.curr.kind != TokenKind::Ident {
                        self.rule_mismatch(config, rule);
                        continue;
                    }
                    Expression::Identifier(Identifier {
                        token: self.curr.clone(),
                        name: self.curr.literal.clone(),
                    })
                }
                ParseRule::Token(kind) => {
                    if self.curr.kind != *kind {
                        self.rule_mismatch(config, rule);
                        continue;
                    }
                    Expression::String(StringLiteral {
                        token: self.curr.clone(),
                        value: self.curr.literal.clone(),
                    })
                }
                ParseRule::Literal(word) => {
                    if self.curr.kind != TokenKind::Ident || self.curr.literal != *word {
                        self.rule_mismatch(config, rule);
                        continue;
                    }
                    Expression::String(StringLiteral {
                        token: self.curr.clone(),
                        value: self.curr.literal.clone(),
                    })
                }
                ParseRule::Expression => match self.parse_expression(Precedence::Lowest) {
                    Some(expression) => expression,
                    None => continue,
                },
            };

            args.push(arg);
        }

        args
    }

    fn rule_mismatch(&mut self, config: &ParseConfig, rule: &ParseRule) {
        let found = if self.curr.kind == TokenKind::Ident {
            self.curr.literal.clone()
        } else {
            self.curr.kind.to_string()
        };

        self.errors.push(format!(
            "Error parsing tag '{}': expected {} found {}",
            config.tag_name,
            rule.expects(),
            found
        ));
    }

    /// Read the statements of a block tag up to its `{% end %}`. Subtags
    /// the block declares (`elsif`, `else`) are attached to the tag as they
    /// appear; once one is open, subsequent statements belong to it.
    fn parse_block_body(&mut self, statement: &mut TagStatement) -> Option<()> {
        loop {
            match self.peek.kind {
                TokenKind::Eof => {
                    self.errors.push(format!(
                        "Error parsing tag '{}': expected {}",
                        statement.name,
                        TokenKind::End
                    ));
                    return None;
                }
                TokenKind::End => {
                    self.next_token();
                    return Some(());
                }
                _ => {}
            }

            self.next_token();

            if self.curr.kind == TokenKind::OpenTag && self.peek.kind == TokenKind::Ident {
                let declared = statement
                    .config
                    .sub_tags
                    .iter()
                    .find(|sub_tag| sub_tag.tag_name == self.peek.literal)
                    .cloned();

                if let Some(sub_config) = declared {
                    self.next_token();
                    let sub_token = self.curr.clone();
                    let args = self.parse_tag_rules(&sub_config);

                    if !self.expect_peek(TokenKind::CloseTag) {
                        return None;
                    }

                    statement.sub_tags.push(TagStatement {
                        token: sub_token,
                        name: sub_config.tag_name.clone(),
                        config: sub_config,
                        args,
                        body: vec![],
                        sub_tags: vec![],
                    });
                    continue;
                }
            }

            if let Some(inner) = self.parse_statement() {
                match statement.sub_tags.last_mut() {
                    Some(sub_tag) => sub_tag.body.push(inner),
                    None => statement.body.push(inner),
                }
            }
        }
    }

    /// Resynchronize after an unparseable tag by dropping everything up to
    /// the closing `%}`.
    fn skip_to_tag_close(&mut self) {
        while !matches!(self.curr.kind, TokenKind::CloseTag | TokenKind::Eof) {
            self.next_token();
        }
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while precedence < precedence_of(self.peek.kind) {
            left = match self.peek.kind {
                TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Times
                | TokenKind::Slash
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Eq
                | TokenKind::NotEq => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                TokenKind::Pipe => {
                    self.next_token();
                    self.parse_filter_expression(left)?
                }
                TokenKind::LSquare => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                TokenKind::Dot => {
                    self.next_token();
                    self.parse_dot_expression(left)?
                }
                _ => break,
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.curr.kind {
            TokenKind::Ident => Some(Expression::Identifier(Identifier {
                token: self.curr.clone(),
                name: self.curr.literal.clone(),
            })),
            TokenKind::Number => {
                let token = self.curr.clone();
                let Ok(value) = token.literal.parse::<f64>() else {
                    self.errors.push(format!(
                        "could not parse {:?} as a number",
                        token.literal
                    ));
                    return None;
                };
                Some(Expression::Number(NumberLiteral { token, value }))
            }
            TokenKind::True | TokenKind::False => Some(Expression::Boolean(BooleanLiteral {
                value: self.curr.kind == TokenKind::True,
                token: self.curr.clone(),
            })),
            TokenKind::String => Some(Expression::String(StringLiteral {
                token: self.curr.clone(),
                value: self.curr.literal.clone(),
            })),
            TokenKind::Minus => {
                let token = self.curr.clone();
                self.next_token();
                let right = self.parse_expression(Precedence::Prefix)?;
                Some(Expression::Prefix(PrefixExpression {
                    operator: token.literal.clone(),
                    token,
                    right: Box::new(right),
                }))
            }
            TokenKind::LSquare => self.parse_array_literal(),
            TokenKind::LParen => {
                self.next_token();
                let expression = self.parse_expression(Precedence::Lowest)?;
                if !self.expect_peek(TokenKind::RParen) {
                    return None;
                }
                Some(expression)
            }
            kind => {
                self.errors
                    .push(format!("No known prefix parse function for token type {kind}"));
                None
            }
        }
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let token = self.curr.clone();
        let mut elements = vec![];

        if self.peek.kind == TokenKind::RSquare {
            self.next_token();
            return Some(Expression::Array(ArrayLiteral { token, elements }));
        }

        self.next_token();
        elements.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek.kind == TokenKind::Comma {
            self.next_token();
            self.next_token();
            elements.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(TokenKind::RSquare) {
            return None;
        }

        Some(Expression::Array(ArrayLiteral { token, elements }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.curr.clone();
        let precedence = precedence_of(token.kind);

        self.next_token();
        let right = self.parse_expression(precedence)?;

        Some(Expression::Infix(InfixExpression {
            operator: token.literal.clone(),
            token,
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    /// `input | name` or `input | name: expr, other: expr`. Parameter
    /// expressions bind at PIPE strength so the parameter list ends at the
    /// next pipe; the first parameter is keyed by the filter's own name.
    fn parse_filter_expression(&mut self, input: Expression) -> Option<Expression> {
        let token = self.curr.clone();

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let filter = self.parse_filter_literal()?;

        Some(Expression::Filter(FilterExpression {
            token,
            input: Box::new(input),
            filter: Box::new(filter),
        }))
    }

    fn parse_filter_literal(&mut self) -> Option<Expression> {
        let token = self.curr.clone();
        let name = token.literal.clone();
        let mut parameters = vec![];

        if self.peek.kind == TokenKind::Colon {
            self.next_token();
            self.next_token();
            parameters.push((name.clone(), self.parse_expression(Precedence::Pipe)?));

            while self.peek.kind == TokenKind::Comma {
                self.next_token();

                if !self.expect_peek(TokenKind::Ident) {
                    return None;
                }
                let parameter = self.curr.literal.clone();

                if !self.expect_peek(TokenKind::Colon) {
                    return None;
                }

                self.next_token();
                parameters.push((parameter, self.parse_expression(Precedence::Pipe)?));
            }
        }

        Some(Expression::FilterLiteral(FilterLiteral {
            token,
            name,
            parameters,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        let token = self.curr.clone();

        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::RSquare) {
            return None;
        }

        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    /// `a.b` desugars to `a["b"]` at parse time: the node produced here is
    /// indistinguishable from the bracketed spelling, raw slices aside.
    fn parse_dot_expression(&mut self, left: Expression) -> Option<Expression> {
        let dot = self.curr.clone();
        let token = Token {
            kind: TokenKind::LSquare,
            literal: "[".to_string(),
            raw: dot.raw,
            line: dot.line,
            col: dot.col,
        };

        if !self.expect_peek(TokenKind::Ident) {
            return None;
        }

        let key = self.curr.clone();
        let index = Expression::String(StringLiteral {
            value: key.literal.clone(),
            token: Token {
                kind: TokenKind::String,
                literal: key.literal,
                raw: key.raw,
                line: key.line,
                col: key.col,
            },
        });

        Some(Expression::Index(IndexExpression {
            token,
            left: Box::new(left),
            index: Box::new(index),
        }))
    }
}
