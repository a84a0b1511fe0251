use crate::*;
use serde::{Deserialize, Serialize};

/// Expression nodes as produced by the external parser. Use-sites that need
/// to be resolved to a declaration carry an [`Id`] under which the resolver
/// records its annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    IntegerLiteral {
        value: i64,
        line: usize,
    },
    BooleanLiteral {
        value: bool,
        line: usize,
    },
    NullLiteral {
        line: usize,
    },
    Reference {
        #[serde(default = "Id::new")]
        id: Id,
        name: String,
        line: usize,
    },
    Call {
        #[serde(default = "Id::new")]
        id: Id,
        name: String,
        #[serde(default)]
        arguments: Vec<Expression>,
        line: usize,
    },
    MethodCall {
        #[serde(default = "Id::new")]
        id: Id,
        receiver: String,
        method: String,
        #[serde(default)]
        arguments: Vec<Expression>,
        line: usize,
    },
    New {
        #[serde(default = "Id::new")]
        id: Id,
        class: String,
        #[serde(default)]
        arguments: Vec<Expression>,
        line: usize,
    },
    If {
        condition: Box<Expression>,
        consequence: Box<Expression>,
        alternative: Box<Expression>,
        line: usize,
    },
    Print {
        value: Box<Expression>,
        line: usize,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
        line: usize,
    },
    Not {
        value: Box<Expression>,
        line: usize,
    },
}

impl Expression {
    pub fn line(&self) -> usize {
        use Expression::*;

        match self {
            IntegerLiteral { line, .. }
            | BooleanLiteral { line, .. }
            | NullLiteral { line }
            | Reference { line, .. }
            | Call { line, .. }
            | MethodCall { line, .. }
            | New { line, .. }
            | If { line, .. }
            | Print { line, .. }
            | Binary { line, .. }
            | Not { line, .. } => *line,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}
