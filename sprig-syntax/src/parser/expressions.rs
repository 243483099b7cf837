//! Pratt expression parsing.
//!
//! Each token kind may own a prefix handler (it can begin an expression) and an
//! infix handler (it can continue one after a left operand). The handlers live
//! in two static tables indexed by the token kind, so dispatch is a single array
//! lookup and no parser instance has to build its own tables.

use strum::EnumCount;

use super::Parser;
use crate::ast::*;
use crate::lexer::TokenKind;

/// Deepest expression nesting accepted before the parser gives up on a
/// statement instead of growing the call stack further.
const MAX_EXPRESSION_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

impl Precedence {
    fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixParseFn = fn(&mut Parser<'_>) -> Option<Expression>;
type InfixParseFn = fn(&mut Parser<'_>, Expression) -> Option<Expression>;

static PREFIX_PARSE_FNS: [Option<PrefixParseFn>; TokenKind::COUNT] = prefix_parse_fns();
static INFIX_PARSE_FNS: [Option<InfixParseFn>; TokenKind::COUNT] = infix_parse_fns();

const fn prefix_parse_fns() -> [Option<PrefixParseFn>; TokenKind::COUNT] {
    let mut table: [Option<PrefixParseFn>; TokenKind::COUNT] = [None; TokenKind::COUNT];
    table[TokenKind::Ident as usize] = Some(parse_identifier as PrefixParseFn);
    table[TokenKind::Int as usize] = Some(parse_integer_literal as PrefixParseFn);
    table[TokenKind::String as usize] = Some(parse_string_literal as PrefixParseFn);
    table[TokenKind::True as usize] = Some(parse_boolean_literal as PrefixParseFn);
    table[TokenKind::False as usize] = Some(parse_boolean_literal as PrefixParseFn);
    table[TokenKind::Bang as usize] = Some(parse_prefix_expression as PrefixParseFn);
    table[TokenKind::Minus as usize] = Some(parse_prefix_expression as PrefixParseFn);
    table[TokenKind::LBrace as usize] = Some(parse_object_literal as PrefixParseFn);
    table[TokenKind::LBracket as usize] = Some(parse_array_literal as PrefixParseFn);
    table[TokenKind::If as usize] = Some(parse_if_expression as PrefixParseFn);
    table[TokenKind::Function as usize] = Some(parse_function_literal as PrefixParseFn);
    table
}

const fn infix_parse_fns() -> [Option<InfixParseFn>; TokenKind::COUNT] {
    let mut table: [Option<InfixParseFn>; TokenKind::COUNT] = [None; TokenKind::COUNT];
    table[TokenKind::Plus as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Minus as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Asterisk as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Slash as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Lt as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Gt as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::Eq as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::NotEq as usize] = Some(parse_infix_expression as InfixParseFn);
    table[TokenKind::LParen as usize] = Some(parse_call_expression as InfixParseFn);
    table
}

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        if self.expression_depth >= MAX_EXPRESSION_DEPTH {
            self.current_error(format!(
                "expression nesting exceeds {MAX_EXPRESSION_DEPTH} levels"
            ));
            return None;
        }

        self.expression_depth += 1;
        let expression = self.parse_expression_at(precedence);
        self.expression_depth -= 1;
        expression
    }

    fn parse_expression_at(&mut self, precedence: Precedence) -> Option<Expression> {
        let Some(prefix) = PREFIX_PARSE_FNS[self.current_token.kind as usize] else {
            self.current_error(format!(
                "no prefix parse function for {}",
                self.current_token.kind
            ));
            return None;
        };
        let mut left = prefix(self)?;

        while !self.peek_token_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let Some(infix) = INFIX_PARSE_FNS[self.peek_token.kind as usize] else {
                return Some(left);
            };
            self.next_token();
            left = infix(self, left)?;
        }

        Some(left)
    }

    /// Parses `EXPR (',' EXPR)*` up to the `closer` token, with the current
    /// token on the opening delimiter. The list may be empty.
    fn parse_expression_list(
        &mut self,
        closer: TokenKind,
        missing_closer: &str,
    ) -> Option<Vec<Expression>> {
        let mut items = Vec::new();

        if self.peek_token_is(closer) {
            self.next_token();
            return Some(items);
        }

        self.next_token();
        items.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token(); // move onto ','
            self.next_token(); // move past ','
            items.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(closer) {
            self.peek_error(format!("{missing_closer}, found {}", self.peek_token.kind));
            return None;
        }

        Some(items)
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek_token.kind)
    }

    fn current_precedence(&self) -> Precedence {
        Precedence::of(self.current_token.kind)
    }
}

fn parse_identifier(parser: &mut Parser<'_>) -> Option<Expression> {
    let identifier = parser.current_identifier();
    Some(Expression::new(
        identifier.span,
        ExpressionKind::Identifier(identifier),
    ))
}

fn parse_integer_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    let token = &parser.current_token;
    match token.literal.parse::<i64>() {
        Ok(value) => Some(Expression::new(
            token.span,
            ExpressionKind::Literal(Literal::Integer(value)),
        )),
        Err(_) => {
            let message = format!("could not parse `{}` as integer", token.literal);
            parser.current_error(message);
            None
        }
    }
}

fn parse_string_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    // The value keeps the surrounding quotes exactly as written.
    let token = &parser.current_token;
    Some(Expression::new(
        token.span,
        ExpressionKind::Literal(Literal::String(token.literal.clone())),
    ))
}

fn parse_boolean_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    let value = parser.current_token_is(TokenKind::True);
    Some(Expression::new(
        parser.current_token.span,
        ExpressionKind::Literal(Literal::Boolean(value)),
    ))
}

fn parse_prefix_expression(parser: &mut Parser<'_>) -> Option<Expression> {
    let start = parser.current_token.span.start;
    let operator = prefix_operator_from_token(parser.current_token.kind)?;
    parser.next_token();

    let right = parser.parse_expression(Precedence::Prefix)?;

    Some(Expression::new(
        parser.span_from(start),
        ExpressionKind::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
        }),
    ))
}

fn parse_infix_expression(parser: &mut Parser<'_>, left: Expression) -> Option<Expression> {
    let operator = infix_operator_from_token(parser.current_token.kind)?;
    let precedence = parser.current_precedence();
    parser.next_token();

    // Same precedence on the right keeps equal-precedence chains left-associative.
    let right = parser.parse_expression(precedence)?;

    Some(Expression::new(
        parser.span_from(left.span.start),
        ExpressionKind::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }),
    ))
}

fn parse_call_expression(parser: &mut Parser<'_>, callee: Expression) -> Option<Expression> {
    let arguments =
        parser.parse_expression_list(TokenKind::RParen, "expected `)` to close argument list")?;

    Some(Expression::new(
        parser.span_from(callee.span.start),
        ExpressionKind::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
        }),
    ))
}

fn parse_array_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    let start = parser.current_token.span.start;
    let elements =
        parser.parse_expression_list(TokenKind::RBracket, "expected `]` to close array literal")?;

    Some(Expression::new(
        parser.span_from(start),
        ExpressionKind::Array(ArrayLiteral { elements }),
    ))
}

// { key, key: EXPRESSION, ... }
fn parse_object_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    let start = parser.current_token.span.start;
    let mut properties = Vec::new();

    loop {
        match parser.peek_token.kind {
            TokenKind::RBrace => {
                parser.next_token();
                break;
            }
            TokenKind::Eof => {
                parser.peek_error("object literal missing closing brace");
                return None;
            }
            TokenKind::Ident => parser.next_token(),
            other => {
                parser.peek_error(format!("expected identifier as object key, found {other}"));
                return None;
            }
        }

        let key = parser.current_identifier();
        let property = match parser.peek_token.kind {
            TokenKind::Comma | TokenKind::RBrace => Property {
                value: Expression::new(key.span, ExpressionKind::Identifier(key.clone())),
                span: key.span,
                key,
            },
            TokenKind::Colon => {
                parser.next_token(); // move onto ':'
                parser.next_token(); // move past ':'
                let value = parser.parse_expression(Precedence::Lowest)?;
                Property {
                    span: key.span.to(value.span),
                    key,
                    value,
                }
            }
            TokenKind::Eof => {
                parser.peek_error("object literal missing closing brace");
                return None;
            }
            other => {
                parser.peek_error(format!(
                    "expected `:` after object key `{}`, found {other}",
                    key.name
                ));
                return None;
            }
        };
        properties.push(property);

        match parser.peek_token.kind {
            TokenKind::Comma => parser.next_token(),
            TokenKind::RBrace => {}
            TokenKind::Eof => {
                parser.peek_error("object literal missing closing brace");
                return None;
            }
            other => {
                parser.peek_error(format!(
                    "expected `,` or `}}` after object property, found {other}"
                ));
                return None;
            }
        }
    }

    Some(Expression::new(
        parser.span_from(start),
        ExpressionKind::Object(ObjectLiteral { properties }),
    ))
}

// if (CONDITION) { BLOCK } else { BLOCK }
fn parse_if_expression(parser: &mut Parser<'_>) -> Option<Expression> {
    let start = parser.current_token.span.start;

    if !parser.expect_peek(TokenKind::LParen) {
        parser.peek_error(format!(
            "expected `(` following `if`, found {}",
            parser.peek_token.kind
        ));
        return None;
    }
    parser.next_token();
    let condition = parser.parse_expression(Precedence::Lowest)?;

    if !parser.expect_peek(TokenKind::RParen) {
        parser.peek_error(format!(
            "expected `)` after if condition, found {}",
            parser.peek_token.kind
        ));
        return None;
    }
    if !parser.expect_peek(TokenKind::LBrace) {
        parser.peek_error(format!(
            "expected `{{` to begin if body, found {}",
            parser.peek_token.kind
        ));
        return None;
    }
    let consequence = parser.parse_block()?;

    let alternative = if parser.peek_token_is(TokenKind::Else) {
        parser.next_token();
        if !parser.expect_peek(TokenKind::LBrace) {
            parser.peek_error(format!(
                "expected `{{` after `else`, found {}",
                parser.peek_token.kind
            ));
            return None;
        }
        Some(parser.parse_block()?)
    } else {
        None
    };

    Some(Expression::new(
        parser.span_from(start),
        ExpressionKind::If(IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        }),
    ))
}

// function (PARAMETERS) { BLOCK }
fn parse_function_literal(parser: &mut Parser<'_>) -> Option<Expression> {
    let start = parser.current_token.span.start;

    if !parser.expect_peek(TokenKind::LParen) {
        parser.peek_error(format!(
            "expected `(` following `function`, found {}",
            parser.peek_token.kind
        ));
        return None;
    }
    let parameters = parser.parse_function_parameters()?;

    if !parser.expect_peek(TokenKind::LBrace) {
        parser.peek_error(format!(
            "expected `{{` to begin function body, found {}",
            parser.peek_token.kind
        ));
        return None;
    }
    let body = parser.parse_block()?;

    Some(Expression::new(
        parser.span_from(start),
        ExpressionKind::Function(FunctionExpression { parameters, body }),
    ))
}

fn prefix_operator_from_token(kind: TokenKind) -> Option<PrefixOperator> {
    match kind {
        TokenKind::Bang => Some(PrefixOperator::Not),
        TokenKind::Minus => Some(PrefixOperator::Negate),
        _ => None,
    }
}

fn infix_operator_from_token(kind: TokenKind) -> Option<InfixOperator> {
    let operator = match kind {
        TokenKind::Plus => InfixOperator::Add,
        TokenKind::Minus => InfixOperator::Subtract,
        TokenKind::Asterisk => InfixOperator::Multiply,
        TokenKind::Slash => InfixOperator::Divide,
        TokenKind::Eq => InfixOperator::Equal,
        TokenKind::NotEq => InfixOperator::NotEqual,
        TokenKind::Lt => InfixOperator::LessThan,
        TokenKind::Gt => InfixOperator::GreaterThan,
        _ => return None,
    };
    Some(operator)
}
