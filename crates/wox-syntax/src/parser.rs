//! Recursive descent parser for the wox language.
//!
//! Expressions are parsed by one function per precedence level, lowest
//! first:
//!
//! ```text
//! assignment -> or -> and -> equality -> comparison -> term -> factor
//!            -> unary -> call -> primary
//! ```
//!
//! A failed declaration is reported, the parser skips ahead to the next
//! synchronization point (just after a `;`, or before a token that starts a
//! declaration) and carries on. The failed declaration is left out of the
//! resulting [`Program`].

use crate::ast::{
    BinaryOp, CaseArm, Expr, FunctionDecl, Ident, Literal, Pattern, Program, Stmt, UnaryOp,
};
use crate::error::{ItemKind, ParserError, ParserResult};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use std::rc::Rc;

/// Most parameters, arguments or tuple elements a single list may hold.
pub const MAX_ITEMS: usize = 255;

const EQUALITY: &[TokenKind] = &[TokenKind::EqEq, TokenKind::BangEq];
const COMPARISON: &[TokenKind] = &[TokenKind::Gt, TokenKind::GtEq, TokenKind::Lt, TokenKind::LtEq];
const TERM: &[TokenKind] = &[TokenKind::Plus, TokenKind::Minus, TokenKind::PlusPlus];
const FACTOR: &[TokenKind] = &[TokenKind::Star, TokenKind::Slash];

/// Parser over one unit's token stream.
pub struct Parser<'input> {
    /// Token stream from the scanner, always ending in `EOF`
    tokens: Vec<Token>,
    /// Index of the current token
    pos: usize,
    /// Source code, for lexemes in error messages
    source: &'input str,
    /// Accumulated parsing errors
    errors: Vec<ParserError>,
}

impl<'input> Parser<'input> {
    /// Creates a parser. An `EOF` token is appended if `tokens` lacks one.
    #[must_use]
    pub fn new(mut tokens: Vec<Token>, source: &'input str) -> Self {
        if !tokens.last().is_some_and(|token| token.is_eof()) {
            let at = tokens.last().map_or(Span::point(0, 1, 1), |token| {
                Span::point(token.span.end, token.span.line, token.span.column)
            });
            tokens.push(Token::new(TokenKind::EOF, at));
        }

        Self {
            tokens,
            pos: 0,
            source,
            errors: Vec::new(),
        }
    }

    /// Parses declarations until end of input.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();
        while !self.is_at_eof() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        wox_log::debug!(
            "parsed {} statements, {} errors",
            statements.len(),
            self.errors.len()
        );
        Program { statements }
    }

    /// Parses a single expression (entry point for tools and tests).
    ///
    /// # Errors
    ///
    /// Returns the first error that stops the expression.
    pub fn parse_expression(&mut self) -> ParserResult<Expr> {
        self.expression()
    }

    /// Parses an expression that must span the whole input.
    ///
    /// # Errors
    ///
    /// Returns the first error that stops the expression, or an
    /// unexpected-token error when anything follows it.
    pub fn parse_complete_expression(&mut self) -> ParserResult<Expr> {
        let expr = self.expression()?;
        if self.is_at_eof() {
            return Ok(expr);
        }
        Err(ParserError::UnexpectedToken {
            expected: "end of input after expression".to_string(),
            found: self.found(),
            span: self.peek().span,
        })
    }

    /// Returns all accumulated errors.
    #[must_use]
    pub fn errors(&self) -> &[ParserError] {
        &self.errors
    }

    /// Checks if any errors were encountered during parsing.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consumes the parser, returning its errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ParserError> {
        self.errors
    }

    // ===== Token helpers =====

    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> Token {
        self.tokens[self.pos.saturating_sub(1)]
    }

    /// Advances past the current token and returns it. Never moves past `EOF`.
    fn bump(&mut self) -> Token {
        let token = self.peek();
        if !token.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn is_at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    fn found(&self) -> String {
        self.peek().lexeme(self.source).to_string()
    }

    /// Consumes a token of `kind`, or fails describing what it was needed for.
    fn expect(&mut self, kind: TokenKind, context: &str) -> ParserResult<Token> {
        if self.check(kind) {
            return Ok(self.bump());
        }

        Err(ParserError::UnexpectedToken {
            expected: format!("`{kind}` {context}"),
            found: self.found(),
            span: self.peek().span,
        })
    }

    fn expect_identifier(&mut self, context: &'static str) -> ParserResult<Ident> {
        let token = self.peek();
        if let TokenKind::Ident(name) = token.kind {
            self.bump();
            return Ok(Ident::new(name, token.span));
        }

        Err(ParserError::ExpectedIdentifier {
            context,
            found: self.found(),
            span: token.span,
        })
    }

    /// Reports an error but continues parsing.
    fn emit_error(&mut self, error: ParserError) {
        wox_log::trace!("parse error: {error}");
        self.errors.push(error);
    }

    /// Skips tokens until just after a `;` or just before a declaration keyword.
    fn synchronize(&mut self) {
        self.bump();

        while !self.is_at_eof() {
            if self.previous().kind == TokenKind::Semicolon || self.peek().kind.begins_decl() {
                break;
            }
            self.bump();
        }

        wox_log::trace!("resynchronized at {}", self.peek().span);
    }

    /// Parses `open (item (sep item)* sep?)? close`.
    fn delimited<T>(
        &mut self,
        open: TokenKind,
        sep: TokenKind,
        close: TokenKind,
        context: &str,
        item: fn(&mut Self) -> ParserResult<T>,
    ) -> ParserResult<Vec<T>> {
        self.expect(open, context)?;

        let mut items = Vec::new();
        while !self.check(close) && !self.is_at_eof() {
            items.push(item(self)?);
            if !self.eat(sep) {
                break;
            }
        }

        self.expect(close, context)?;
        Ok(items)
    }

    // ===== Declarations =====

    /// Parses one declaration, recovering from any error inside it.
    fn declaration(&mut self) -> Option<Stmt> {
        match self.parse_declaration() {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.emit_error(error);
                self.synchronize();
                None
            }
        }
    }

    fn parse_declaration(&mut self) -> ParserResult<Stmt> {
        match self.peek().kind {
            TokenKind::Class => {
                self.bump();
                self.parse_class_decl()
            }
            TokenKind::Fn => {
                self.bump();
                Ok(Stmt::Function(Rc::new(self.parse_function("function name")?)))
            }
            TokenKind::Var => {
                self.bump();
                self.parse_var_decl()
            }
            _ => self.parse_statement(),
        }
    }

    fn parse_class_decl(&mut self) -> ParserResult<Stmt> {
        let name = self.expect_identifier("class name")?;

        let superclass = if self.eat(TokenKind::Lt) {
            Some(self.expect_identifier("superclass name after `<`")?)
        } else {
            None
        };

        self.expect(TokenKind::LBrace, "before class body")?;
        let mut methods = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_eof() {
            methods.push(Rc::new(self.parse_function("method name")?));
        }
        self.expect(TokenKind::RBrace, "after class body")?;

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    /// Parses `name(params) { body }`; the `fn` keyword, if any, is already consumed.
    fn parse_function(&mut self, context: &'static str) -> ParserResult<FunctionDecl> {
        let name = self.expect_identifier(context)?;
        self.expect(TokenKind::LParen, "after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if params.len() == MAX_ITEMS {
                    self.emit_error(ParserError::TooManyItems {
                        kind: ItemKind::Parameters,
                        span: self.peek().span,
                    });
                }
                params.push(self.expect_identifier("parameter name")?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "after parameters")?;

        self.expect(TokenKind::LBrace, "before function body")?;
        let body = self.parse_block_body()?;

        Ok(FunctionDecl { name, params, body })
    }

    fn parse_var_decl(&mut self) -> ParserResult<Stmt> {
        let name = self.expect_identifier("variable name")?;

        let initializer = if self.eat(TokenKind::Eq) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(TokenKind::Semicolon, "after variable declaration")?;
        Ok(Stmt::Var { name, initializer })
    }

    // ===== Statements =====

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let token = self.peek();
        match token.kind {
            TokenKind::Print => {
                self.bump();
                let expr = self.expression()?;
                self.eat(TokenKind::Semicolon);
                Ok(Stmt::Print {
                    expr,
                    span: token.span,
                })
            }
            TokenKind::Return => {
                self.bump();
                let value = if self.peek().kind.begins_expr() {
                    Some(self.expression()?)
                } else {
                    None
                };
                self.eat(TokenKind::Semicolon);
                Ok(Stmt::Return {
                    value,
                    span: token.span,
                })
            }
            TokenKind::While => {
                self.bump();
                let condition = self.expression()?;
                let body = Box::new(self.parse_statement()?);
                Ok(Stmt::While {
                    condition,
                    body,
                    span: token.span,
                })
            }
            TokenKind::Loop => {
                self.bump();
                self.expect(TokenKind::LBrace, "after `loop`")?;
                let body = self.parse_block_body()?;
                Ok(Stmt::Loop {
                    body,
                    span: token.span,
                })
            }
            TokenKind::For => {
                self.bump();
                self.parse_for(token.span)
            }
            TokenKind::LBrace => {
                self.bump();
                let statements = self.parse_block_body()?;
                Ok(Stmt::Block {
                    statements,
                    span: token.span,
                })
            }
            _ => {
                let expr = self.expression()?;
                self.eat(TokenKind::Semicolon);
                Ok(Stmt::Expression { expr })
            }
        }
    }

    fn parse_for(&mut self, span: Span) -> ParserResult<Stmt> {
        self.expect(TokenKind::LParen, "after `for`")?;

        let initializer = if self.eat(TokenKind::Semicolon) {
            None
        } else if self.eat(TokenKind::Var) {
            Some(Box::new(self.parse_var_decl()?))
        } else {
            let expr = self.expression()?;
            self.expect(TokenKind::Semicolon, "after loop initializer")?;
            Some(Box::new(Stmt::Expression { expr }))
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::Semicolon, "after loop condition")?;

        let increment = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.expect(TokenKind::RParen, "after for clauses")?;

        let body = Box::new(self.parse_statement()?);

        Ok(Stmt::For {
            initializer,
            condition,
            increment,
            body,
            span,
        })
    }

    /// Parses declarations up to and including the closing `}`.
    fn parse_block_body(&mut self) -> ParserResult<Vec<Stmt>> {
        let mut statements = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_eof() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }
        self.expect(TokenKind::RBrace, "after block")?;
        Ok(statements)
    }

    // ===== Expressions =====

    fn expression(&mut self) -> ParserResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParserResult<Expr> {
        let expr = self.or()?;

        if !self.check(TokenKind::Eq) {
            return Ok(expr);
        }
        let eq = self.bump();
        let value = Box::new(self.assignment()?);

        match expr {
            Expr::Variable { name } => Ok(Expr::Assign { name, value }),
            Expr::Get { object, name } => Ok(Expr::Set {
                object,
                name,
                value,
            }),
            other => {
                self.emit_error(ParserError::InvalidAssignmentTarget { span: eq.span });
                Ok(other)
            }
        }
    }

    fn or(&mut self) -> ParserResult<Expr> {
        self.binary_level(&[TokenKind::Or], Self::and)
    }

    fn and(&mut self) -> ParserResult<Expr> {
        self.binary_level(&[TokenKind::And], Self::equality)
    }

    fn equality(&mut self) -> ParserResult<Expr> {
        self.binary_level(EQUALITY, Self::comparison)
    }

    fn comparison(&mut self) -> ParserResult<Expr> {
        self.binary_level(COMPARISON, Self::term)
    }

    fn term(&mut self) -> ParserResult<Expr> {
        self.binary_level(TERM, Self::factor)
    }

    fn factor(&mut self) -> ParserResult<Expr> {
        self.binary_level(FACTOR, Self::unary)
    }

    /// Parses a left-associative chain of `ops` over `operand`.
    fn binary_level(
        &mut self,
        ops: &[TokenKind],
        operand: fn(&mut Self) -> ParserResult<Expr>,
    ) -> ParserResult<Expr> {
        let mut left = operand(self)?;

        while let Some((op, span)) = self.match_binary(ops) {
            let right = operand(self)?;
            left = Expr::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
                span,
            };
        }

        Ok(left)
    }

    fn match_binary(&mut self, ops: &[TokenKind]) -> Option<(BinaryOp, Span)> {
        let token = self.peek();
        if !ops.contains(&token.kind) {
            return None;
        }
        let op = BinaryOp::from_token(token.kind)?;
        self.bump();
        Some((op, token.span))
    }

    fn unary(&mut self) -> ParserResult<Expr> {
        let token = self.peek();
        let op = match token.kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            _ => return self.call(),
        };
        self.bump();

        let operand = Box::new(self.unary()?);
        Ok(Expr::Unary {
            op,
            operand,
            span: token.span,
        })
    }

    fn call(&mut self) -> ParserResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.check(TokenKind::LParen) {
                let paren = self.bump();
                let args = self.finish_call()?;
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    span: paren.span,
                };
            } else if self.eat(TokenKind::Dot) {
                let name = self.expect_identifier("property name after `.`")?;
                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self) -> ParserResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                if args.len() == MAX_ITEMS {
                    self.emit_error(ParserError::TooManyItems {
                        kind: ItemKind::Arguments,
                        span: self.peek().span,
                    });
                }
                args.push(self.expression()?);
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "after arguments")?;
        Ok(args)
    }

    fn primary(&mut self) -> ParserResult<Expr> {
        let token = self.peek();
        let span = token.span;

        let literal = match token.kind {
            TokenKind::False => Some(Literal::Bool(false)),
            TokenKind::True => Some(Literal::Bool(true)),
            TokenKind::Nil => Some(Literal::Nil),
            TokenKind::Number(value) => Some(Literal::Number(value)),
            TokenKind::Str(sym) => Some(Literal::Str(sym)),
            _ => None,
        };
        if let Some(value) = literal {
            self.bump();
            return Ok(Expr::Literal { value, span });
        }

        match token.kind {
            TokenKind::Let => {
                self.bump();
                self.parse_let(span)
            }
            TokenKind::Do => {
                self.bump();
                let body = self.delimited(
                    TokenKind::LBrace,
                    TokenKind::Semicolon,
                    TokenKind::RBrace,
                    "around `do` body",
                    Self::expression,
                )?;
                Ok(Expr::Do { body, span })
            }
            TokenKind::If => {
                self.bump();
                self.parse_if(span)
            }
            TokenKind::Case => {
                self.bump();
                self.parse_case(span)
            }
            TokenKind::Super => {
                self.bump();
                self.expect(TokenKind::Dot, "after `super`")?;
                let method = self.expect_identifier("superclass method name")?;
                Ok(Expr::Super { method, span })
            }
            TokenKind::This => {
                self.bump();
                Ok(Expr::This { span })
            }
            TokenKind::Ident(name) => {
                self.bump();
                Ok(Expr::Variable {
                    name: Ident::new(name, span),
                })
            }
            TokenKind::LBracket => {
                let elements = self.delimited(
                    TokenKind::LBracket,
                    TokenKind::Comma,
                    TokenKind::RBracket,
                    "around vector elements",
                    Self::expression,
                )?;
                Ok(Expr::Vector { elements, span })
            }
            TokenKind::LParen => {
                self.bump();
                self.parse_paren(span)
            }
            _ => Err(ParserError::ExpectedExpression {
                found: self.found(),
                span,
            }),
        }
    }

    /// After `(`: unit `()`, a grouping, or a tuple of two or more.
    fn parse_paren(&mut self, span: Span) -> ParserResult<Expr> {
        if self.check(TokenKind::RParen) {
            let close = self.bump();
            return Ok(Expr::Literal {
                value: Literal::Nil,
                span: Span::merge(span, close.span),
            });
        }

        let first = self.expression()?;
        if !self.eat(TokenKind::Comma) {
            self.expect(TokenKind::RParen, "after expression")?;
            return Ok(Expr::Grouping {
                inner: Box::new(first),
                span,
            });
        }

        let mut elements = vec![first];
        loop {
            if elements.len() == MAX_ITEMS {
                self.emit_error(ParserError::TooManyItems {
                    kind: ItemKind::TupleElements,
                    span: self.peek().span,
                });
            }
            elements.push(self.expression()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "after tuple elements")?;

        Ok(Expr::Tuple { elements, span })
    }

    fn parse_let(&mut self, span: Span) -> ParserResult<Expr> {
        let name = self.expect_identifier("variable name after `let`")?;
        self.expect(TokenKind::Eq, "after `let` binding name")?;
        let definition = Box::new(self.expression()?);
        self.expect(TokenKind::In, "after `let` definition")?;
        let body = Box::new(self.expression()?);

        Ok(Expr::Let {
            name,
            definition,
            body,
            span,
        })
    }

    fn parse_if(&mut self, span: Span) -> ParserResult<Expr> {
        let condition = Box::new(self.expression()?);
        self.expect(TokenKind::Then, "after `if` condition")?;
        let then_branch = Box::new(self.expression()?);
        self.expect(TokenKind::Else, "after `then` branch")?;
        let else_branch = Box::new(self.expression()?);

        Ok(Expr::If {
            condition,
            then_branch,
            else_branch,
            span,
        })
    }

    fn parse_case(&mut self, span: Span) -> ParserResult<Expr> {
        let scrutinee = Box::new(self.expression()?);
        self.expect(TokenKind::Of, "after `case` scrutinee")?;
        let arms = self.delimited(
            TokenKind::LBrace,
            TokenKind::Comma,
            TokenKind::RBrace,
            "around `case` arms",
            Self::parse_case_arm,
        )?;

        Ok(Expr::Case {
            scrutinee,
            arms,
            span,
        })
    }

    fn parse_case_arm(&mut self) -> ParserResult<CaseArm> {
        let pattern = self.parse_pattern()?;
        let guard = if self.eat(TokenKind::If) {
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Then, "after `case` pattern")?;
        let body = self.expression()?;

        Ok(CaseArm {
            pattern,
            guard,
            body,
        })
    }

    // ===== Patterns =====

    fn parse_pattern(&mut self) -> ParserResult<Pattern> {
        let token = self.peek();
        let span = token.span;

        match token.kind {
            TokenKind::Underscore => {
                self.bump();
                Ok(Pattern::Wild { span })
            }
            TokenKind::Nil => {
                self.bump();
                Ok(Pattern::Unit { span })
            }
            TokenKind::Number(value) => {
                self.bump();
                Ok(Pattern::Literal {
                    value: Literal::Number(value),
                    span,
                })
            }
            TokenKind::Str(sym) => {
                self.bump();
                Ok(Pattern::Literal {
                    value: Literal::Str(sym),
                    span,
                })
            }
            TokenKind::True | TokenKind::False => {
                self.bump();
                Ok(Pattern::Literal {
                    value: Literal::Bool(token.kind == TokenKind::True),
                    span,
                })
            }
            TokenKind::Minus => {
                self.bump();
                let number = self.peek();
                let TokenKind::Number(value) = number.kind else {
                    return Err(ParserError::InvalidPattern {
                        message: "expected a number after `-`".to_string(),
                        span: number.span,
                    });
                };
                self.bump();
                Ok(Pattern::Literal {
                    value: Literal::Number(-value),
                    span: Span::merge(span, number.span),
                })
            }
            TokenKind::Ident(name) => {
                self.bump();
                let name = Ident::new(name, span);
                if self.eat(TokenKind::At) {
                    let pattern = Box::new(self.parse_pattern()?);
                    Ok(Pattern::At { name, pattern })
                } else {
                    Ok(Pattern::Var { name })
                }
            }
            TokenKind::LParen => {
                self.bump();
                self.parse_paren_pattern(span)
            }
            TokenKind::LBracket => {
                let elements = self.delimited(
                    TokenKind::LBracket,
                    TokenKind::Comma,
                    TokenKind::RBracket,
                    "around vector pattern",
                    Self::parse_pattern,
                )?;
                Ok(Pattern::Vector { elements, span })
            }
            _ => {
                let found = self.found();
                let message = if found.is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("'{found}' cannot start a pattern")
                };
                Err(ParserError::InvalidPattern { message, span })
            }
        }
    }

    /// After `(`: unit `()`, a parenthesized pattern, or a tuple pattern.
    fn parse_paren_pattern(&mut self, span: Span) -> ParserResult<Pattern> {
        if self.check(TokenKind::RParen) {
            let close = self.bump();
            return Ok(Pattern::Unit {
                span: Span::merge(span, close.span),
            });
        }

        let first = self.parse_pattern()?;
        if !self.eat(TokenKind::Comma) {
            self.expect(TokenKind::RParen, "after pattern")?;
            return Ok(first);
        }

        let mut elements = vec![first];
        loop {
            elements.push(self.parse_pattern()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen, "after tuple pattern")?;

        Ok(Pattern::Tuple { elements, span })
    }
}
