mod ast;
mod diagnostics;
mod lexer;
mod parser;
mod source;
mod span;

pub use crate::ast::{
    ArrayLiteral, Block, CallExpression, Expression, ExpressionKind, ExpressionStatement,
    FunctionDeclaration, FunctionExpression, Identifier, IfExpression, InfixExpression,
    InfixOperator, Literal, ObjectLiteral, PrefixExpression, PrefixOperator, Program, Property,
    ReturnStatement, Statement, VariableDeclaration,
};
pub use crate::diagnostics::{Diagnostic, Diagnostics, ParseError};
pub use crate::lexer::{lex, Lexer, Token, TokenKind};
pub use crate::parser::{parse, ParseOptions, Parser};
pub use crate::source::SourceFile;
pub use crate::span::Span;
