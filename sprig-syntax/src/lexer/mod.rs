mod token;

use tracing::warn;

use crate::span::Span;

pub use self::token::{Token, TokenKind};
use self::token::keyword_from_lexeme;

/// Lexes `source` to completion.
///
/// The returned tokens always end with exactly one [`TokenKind::Eof`] token
/// whose span is empty and sits at `source.len()`.
pub fn lex(source: &str) -> Vec<Token> {
    Lexer::new(source).tokenize()
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return tokens;
            }
        }
    }

    /// Scans and returns the next token.
    ///
    /// Once the input is exhausted every further call returns an `Eof` token.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        let start = self.position;
        let Some(ch) = self.peek_char() else {
            return Token::new(TokenKind::Eof, String::new(), Span::empty(start));
        };

        match ch {
            '"' => self.lex_string(),
            '=' => self.lex_equals_variants(),
            '!' => self.lex_bang_variants(),
            '+' => self.simple_token(TokenKind::Plus),
            '-' => self.simple_token(TokenKind::Minus),
            '*' => self.simple_token(TokenKind::Asterisk),
            '/' => self.simple_token(TokenKind::Slash),
            '<' => self.simple_token(TokenKind::Lt),
            '>' => self.simple_token(TokenKind::Gt),
            ',' => self.simple_token(TokenKind::Comma),
            ':' => self.simple_token(TokenKind::Colon),
            ';' => self.simple_token(TokenKind::Semicolon),
            '(' => self.simple_token(TokenKind::LParen),
            ')' => self.simple_token(TokenKind::RParen),
            '{' => self.simple_token(TokenKind::LBrace),
            '}' => self.simple_token(TokenKind::RBrace),
            '[' => self.simple_token(TokenKind::LBracket),
            ']' => self.simple_token(TokenKind::RBracket),
            'a'..='z' | 'A'..='Z' => self.lex_identifier_or_keyword(),
            '0'..='9' => self.lex_number(),
            other => {
                warn!(
                    character = ?other,
                    offset = start,
                    "lexer does not recognize character"
                );
                self.simple_token(TokenKind::Illegal)
            }
        }
    }

    /// Skips whitespace and comments until the cursor rests on something else.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_char(), self.peek_next_char()) {
                (Some(' ' | '\t' | '\n' | '\r'), _) => {
                    self.advance_char();
                }
                (Some('/'), Some('/')) => self.skip_line_comment(),
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance_char();
        }
    }

    fn skip_block_comment(&mut self) {
        self.advance_char(); // consume '/'
        self.advance_char(); // consume '*'

        while let Some(ch) = self.peek_char() {
            if ch == '*' && self.peek_next_char() == Some('/') {
                self.advance_char();
                self.advance_char();
                return;
            }
            self.advance_char();
        }
    }

    fn lex_string(&mut self) -> Token {
        let start = self.position;
        self.advance_char(); // consume opening quote

        while let Some(ch) = self.peek_char() {
            self.advance_char();
            if ch == '"' {
                break;
            }
        }

        self.token_from(TokenKind::String, start)
    }

    fn lex_number(&mut self) -> Token {
        let start = self.position;
        while matches!(self.peek_char(), Some('0'..='9')) {
            self.advance_char();
        }
        self.token_from(TokenKind::Int, start)
    }

    fn lex_identifier_or_keyword(&mut self) -> Token {
        let start = self.position;
        while matches!(self.peek_char(), Some(ch) if ch.is_ascii_alphabetic()) {
            self.advance_char();
        }

        let lexeme = self.slice(start, self.position);
        let kind = keyword_from_lexeme(lexeme).unwrap_or(TokenKind::Ident);
        self.token_from(kind, start)
    }

    fn lex_equals_variants(&mut self) -> Token {
        let start = self.position;
        self.advance_char(); // consume '='

        if self.peek_char() == Some('=') {
            self.advance_char();
            self.token_from(TokenKind::Eq, start)
        } else {
            self.token_from(TokenKind::Assign, start)
        }
    }

    fn lex_bang_variants(&mut self) -> Token {
        let start = self.position;
        self.advance_char(); // consume '!'

        if self.peek_char() == Some('=') {
            self.advance_char();
            self.token_from(TokenKind::NotEq, start)
        } else {
            self.token_from(TokenKind::Bang, start)
        }
    }

    fn simple_token(&mut self, kind: TokenKind) -> Token {
        let start = self.position;
        self.advance_char();
        self.token_from(kind, start)
    }

    fn token_from(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(
            kind,
            self.slice(start, self.position),
            Span::new(start, self.position),
        )
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next()?;
        iter.next()
    }

    fn advance_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }
}
