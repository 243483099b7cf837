use std::fmt;

use serde::Serialize;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub span: Span,
}

impl Program {
    pub fn new(statements: Vec<Statement>, span: Span) -> Self {
        Self { statements, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Variable(VariableDeclaration),
    Function(FunctionDeclaration),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Block(Block),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Variable(declaration) => declaration.span,
            Statement::Function(declaration) => declaration.span,
            Statement::Return(statement) => statement.span,
            Statement::Expression(statement) => statement.span,
            Statement::Block(block) => block.span,
        }
    }
}

/// A `let` or `const` binding.
///
/// Constants always carry a value; build declarations through
/// [`VariableDeclaration::binding`] or [`VariableDeclaration::constant`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableDeclaration {
    pub constant: bool,
    pub identifier: Identifier,
    pub value: Option<Expression>,
    pub span: Span,
}

impl VariableDeclaration {
    pub fn binding(identifier: Identifier, value: Option<Expression>, span: Span) -> Self {
        Self {
            constant: false,
            identifier,
            value,
            span,
        }
    }

    pub fn constant(identifier: Identifier, value: Expression, span: Span) -> Self {
        Self {
            constant: true,
            identifier,
            value: Some(value),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDeclaration {
    pub identifier: Identifier,
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnStatement {
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Integer(i64),
    String(String),
    Boolean(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    #[serde(rename = "!")]
    Not,
    #[serde(rename = "-")]
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    #[serde(rename = "+")]
    Add,
    #[serde(rename = "-")]
    Subtract,
    #[serde(rename = "*")]
    Multiply,
    #[serde(rename = "/")]
    Divide,
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    pub span: Span,
    pub kind: ExpressionKind,
}

impl Expression {
    pub fn new(span: Span, kind: ExpressionKind) -> Self {
        Self { span, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    Identifier(Identifier),
    Literal(Literal),
    Array(ArrayLiteral),
    Object(ObjectLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    If(IfExpression),
    Function(FunctionExpression),
    Call(CallExpression),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectLiteral {
    pub properties: Vec<Property>,
}

/// One `key: value` entry of an object literal. Shorthand `{key}` stores the
/// key again as its own value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub key: Identifier,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrefixExpression {
    pub operator: PrefixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: InfixOperator,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: Block,
    pub alternative: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionExpression {
    pub parameters: Vec<Identifier>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

// Display renders a canonical source form with every prefix and infix
// expression wrapped in parentheses.

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PrefixOperator::Not => "!",
            PrefixOperator::Negate => "-",
        })
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOperator::Add => "+",
            InfixOperator::Subtract => "-",
            InfixOperator::Multiply => "*",
            InfixOperator::Divide => "/",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
            InfixOperator::LessThan => "<",
            InfixOperator::GreaterThan => ">",
        })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Variable(declaration) => {
                let keyword = if declaration.constant { "const" } else { "let" };
                write!(f, "{keyword} {}", declaration.identifier.name)?;
                if let Some(value) = &declaration.value {
                    write!(f, " = {value}")?;
                }
                f.write_str(";")
            }
            Statement::Function(declaration) => {
                write!(f, "function {}(", declaration.identifier.name)?;
                write_separated(f, &declaration.parameters, ", ")?;
                write!(f, ") {}", declaration.body)
            }
            Statement::Return(statement) => write!(f, "return {};", statement.value),
            Statement::Expression(statement) => write!(f, "{};", statement.expression),
            Statement::Block(block) => write!(f, "{block}"),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statements.is_empty() {
            return f.write_str("{ }");
        }
        f.write_str("{ ")?;
        write_separated(f, &self.statements, " ")?;
        f.write_str(" }")
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(value) => write!(f, "{value}"),
            Literal::String(value) => f.write_str(value),
            Literal::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExpressionKind::Identifier(identifier) => write!(f, "{identifier}"),
            ExpressionKind::Literal(literal) => write!(f, "{literal}"),
            ExpressionKind::Array(array) => {
                f.write_str("[")?;
                write_separated(f, &array.elements, ", ")?;
                f.write_str("]")
            }
            ExpressionKind::Object(object) => {
                f.write_str("{")?;
                write_separated(f, &object.properties, ", ")?;
                f.write_str("}")
            }
            ExpressionKind::Prefix(prefix) => write!(f, "({}{})", prefix.operator, prefix.right),
            ExpressionKind::Infix(infix) => {
                write!(f, "({} {} {})", infix.left, infix.operator, infix.right)
            }
            ExpressionKind::If(expression) => {
                write!(f, "if ({}) {}", expression.condition, expression.consequence)?;
                if let Some(alternative) = &expression.alternative {
                    write!(f, " else {alternative}")?;
                }
                Ok(())
            }
            ExpressionKind::Function(function) => {
                f.write_str("function(")?;
                write_separated(f, &function.parameters, ", ")?;
                write!(f, ") {}", function.body)
            }
            ExpressionKind::Call(call) => {
                write!(f, "{}(", call.callee)?;
                write_separated(f, &call.arguments, ", ")?;
                f.write_str(")")
            }
        }
    }
}

fn write_separated<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    separator: &str,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
