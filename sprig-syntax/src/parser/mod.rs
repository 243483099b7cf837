mod expressions;

use std::mem;

use tracing::{debug, trace};

use crate::ast::*;
use crate::diagnostics::{Diagnostics, ParseError};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::span::Span;

use self::expressions::Precedence;

#[derive(Debug, Default, Clone, Copy)]
pub struct ParseOptions {
    /// Turn a non-empty error list into a single [`ParseError`] once the
    /// whole input has been parsed.
    pub fail_on_error: bool,
}

impl ParseOptions {
    /// Applies `fail_on_error` to the error list of a finished pass.
    pub fn enforce(&self, errors: Vec<String>) -> Result<Vec<String>, ParseError> {
        if self.fail_on_error && !errors.is_empty() {
            return Err(ParseError { errors });
        }
        Ok(errors)
    }
}

/// Parses `source` into a program and the ordered list of error messages.
///
/// Malformed input never aborts the pass: statements that fail to parse are
/// left out of the program and described in the error list instead. Only when
/// `options.fail_on_error` is set does a non-empty error list become `Err`.
pub fn parse(source: &str, options: ParseOptions) -> Result<(Program, Vec<String>), ParseError> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let errors = parser.errors();

    debug!(
        statements = program.statements.len(),
        errors = errors.len(),
        "parsed program"
    );

    let errors = options.enforce(errors)?;
    Ok((program, errors))
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current_token: Token,
    peek_token: Token,
    diagnostics: Diagnostics,
    expression_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current_token = lexer.next_token();
        let peek_token = lexer.next_token();
        Self {
            lexer,
            current_token,
            peek_token,
            diagnostics: Diagnostics::new(),
            expression_depth: 0,
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while !self.current_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Program::new(statements, Span::new(0, self.current_token.span.end))
    }

    pub fn errors(&self) -> Vec<String> {
        self.diagnostics.messages()
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        trace!(
            kind = %self.current_token.kind,
            offset = self.current_token.span.start,
            "parse statement"
        );
        match self.current_token.kind {
            TokenKind::Let | TokenKind::Const => self.parse_variable_declaration(),
            TokenKind::Function => self.parse_function_declaration(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    // let IDENT;
    // (let | const) IDENT = EXPRESSION;
    fn parse_variable_declaration(&mut self) -> Option<Statement> {
        let start = self.current_token.span.start;
        let constant = self.current_token_is(TokenKind::Const);
        let keyword = if constant { "const" } else { "let" };

        if !self.expect_peek(TokenKind::Ident) {
            self.peek_error(format!(
                "expected identifier following `{keyword}`, found {}",
                self.peek_token.kind
            ));
            return None;
        }
        let identifier = self.current_identifier();

        if self.expect_peek(TokenKind::Semicolon) {
            if constant {
                self.current_error(format!(
                    "constant `{}` declared without value",
                    identifier.name
                ));
                return None;
            }
            let span = self.span_from(start);
            return Some(Statement::Variable(VariableDeclaration::binding(
                identifier, None, span,
            )));
        }

        if !self.expect_peek(TokenKind::Assign) {
            self.peek_error(format!(
                "expected `=` after `{}` in {keyword} declaration, found {}",
                identifier.name, self.peek_token.kind
            ));
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;

        if !self.expect_peek(TokenKind::Semicolon) {
            self.peek_error(format!(
                "expected `;` to end declaration of `{}`, found {}",
                identifier.name, self.peek_token.kind
            ));
            return None;
        }

        let span = self.span_from(start);
        let declaration = if constant {
            VariableDeclaration::constant(identifier, value, span)
        } else {
            VariableDeclaration::binding(identifier, Some(value), span)
        };
        Some(Statement::Variable(declaration))
    }

    // function IDENT(PARAMETERS) { BLOCK }
    fn parse_function_declaration(&mut self) -> Option<Statement> {
        let start = self.current_token.span.start;

        if !self.expect_peek(TokenKind::Ident) {
            self.peek_error(format!(
                "expected identifier following `function`, found {}",
                self.peek_token.kind
            ));
            return None;
        }
        let identifier = self.current_identifier();

        if !self.expect_peek(TokenKind::LParen) {
            self.peek_error(format!(
                "expected `(` after function name `{}`, found {}",
                identifier.name, self.peek_token.kind
            ));
            return None;
        }
        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            self.peek_error(format!(
                "expected `{{` to begin body of `{}`, found {}",
                identifier.name, self.peek_token.kind
            ));
            return None;
        }
        let body = self.parse_block()?;

        Some(Statement::Function(FunctionDeclaration {
            identifier,
            parameters,
            body,
            span: self.span_from(start),
        }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.span.start;
        self.next_token(); // consume 'return'

        let Some(value) = self.parse_expression(Precedence::Lowest) else {
            self.current_error("expected expression following `return`");
            return None;
        };

        if !self.expect_peek(TokenKind::Semicolon) {
            self.peek_error(format!(
                "expected `;` after return value, found {}",
                self.peek_token.kind
            ));
            return None;
        }

        Some(Statement::Return(ReturnStatement {
            value,
            span: self.span_from(start),
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let start = self.current_token.span.start;
        let expression = self.parse_expression(Precedence::Lowest)?;

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        Some(Statement::Expression(ExpressionStatement {
            expression,
            span: self.span_from(start),
        }))
    }

    /// Parses `{ STATEMENT* }` with the current token on the opening brace and
    /// leaves the closing brace as the current token.
    fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_token.span.start;
        let mut statements = Vec::new();
        self.next_token(); // consume '{'

        while !self.current_token_is(TokenKind::RBrace) {
            if self.current_token_is(TokenKind::Eof) {
                self.current_error("expected `}` to close block");
                return None;
            }
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            self.next_token();
        }

        Some(Block {
            statements,
            span: self.span_from(start),
        })
    }

    /// Parses a parameter list with the current token on `(` and leaves `)` as
    /// the current token. A trailing comma is accepted.
    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut parameters = Vec::new();
        self.next_token(); // consume '('

        while !self.current_token_is(TokenKind::RParen) {
            match self.current_token.kind {
                TokenKind::Ident => {}
                TokenKind::Eof => {
                    self.current_error("expected `)` to close parameter list");
                    return None;
                }
                other => {
                    self.current_error(format!("expected parameter name, found {other}"));
                    return None;
                }
            }
            parameters.push(self.current_identifier());
            self.next_token();

            match self.current_token.kind {
                TokenKind::Comma => self.next_token(),
                TokenKind::RParen => {}
                TokenKind::Eof => {
                    self.current_error("expected `)` to close parameter list");
                    return None;
                }
                other => {
                    self.current_error(format!(
                        "expected `,` or `)` in parameter list, found {other}"
                    ));
                    return None;
                }
            }
        }

        Some(parameters)
    }

    fn current_identifier(&self) -> Identifier {
        Identifier::new(self.current_token.literal.clone(), self.current_token.span)
    }

    /// Span from `start` through the end of the current token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.current_token.span.end)
    }

    fn next_token(&mut self) {
        let next = self.lexer.next_token();
        self.current_token = mem::replace(&mut self.peek_token, next);
    }

    fn current_token_is(&self, kind: TokenKind) -> bool {
        self.current_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advances only when the lookahead is `kind`. Records nothing on a
    /// mismatch; callers describe the failure themselves.
    fn expect_peek(&mut self, kind: TokenKind) -> bool {
        if self.peek_token_is(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    fn current_error<S: Into<String>>(&mut self, message: S) {
        let span = self.current_token.span;
        self.diagnostics.push_error_with_span(message, Some(span));
    }

    fn peek_error<S: Into<String>>(&mut self, message: S) {
        let span = self.peek_token.span;
        self.diagnostics.push_error_with_span(message, Some(span));
    }
}
