use std::fmt;

use crate::span::Span;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Source order matters: an assert sees every assignment before it.
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// присваивание, например: x = 3 + 5
    Assign {
        target: String,
        value: Expression,
        span: Span,
    },
    /// assert(x == 8)
    Assert {
        condition: Expression,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Numeral text exactly as written, e.g. `42`
    Literal { value: String, span: Span },
    /// x, total
    Variable { name: String, span: Span },
    /// x + 5
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
        span: Span,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /
    Equal,    // ==
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            "==" => Some(Self::Equal),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Equal => "==",
        }
    }
}

impl Statement {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Assign { .. } => "Assignment",
            Self::Assert { .. } => "Assertion",
        }
    }

    /// Target name for assignments, nothing for assertions.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Assign { target, .. } => Some(target),
            Self::Assert { .. } => None,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Assign { span, .. } | Self::Assert { span, .. } => *span,
        }
    }
}

impl Expression {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal { .. } => "Literal",
            Self::Variable { .. } => "Variable",
            Self::BinaryOp { .. } => "BinaryOp",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Literal { value, .. } => Some(value),
            Self::Variable { name, .. } => Some(name),
            Self::BinaryOp { op, .. } => Some(op.symbol()),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::Literal { span, .. }
            | Self::Variable { span, .. }
            | Self::BinaryOp { span, .. } => *span,
        }
    }
}

// Дерево для отладки: один узел на строку, два пробела на уровень
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Program")?;
        for statement in &self.statements {
            write_statement(f, statement, 1)?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, kind: &str, value: Option<&str>, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match value {
        Some(value) => writeln!(f, "{}{} {}", indent, kind, value),
        None => writeln!(f, "{}{}", indent, kind),
    }
}

fn write_statement(f: &mut fmt::Formatter<'_>, statement: &Statement, depth: usize) -> fmt::Result {
    write_node(f, statement.kind(), statement.value(), depth)?;
    match statement {
        Statement::Assign { value, .. } => write_expression(f, value, depth + 1),
        Statement::Assert { condition, .. } => write_expression(f, condition, depth + 1),
    }
}

fn write_expression(f: &mut fmt::Formatter<'_>, expression: &Expression, depth: usize) -> fmt::Result {
    write_node(f, expression.kind(), expression.value(), depth)?;
    if let Expression::BinaryOp { left, right, .. } = expression {
        write_expression(f, left, depth + 1)?;
        write_expression(f, right, depth + 1)?;
    }
    Ok(())
}
