use crate::syntax::*;
use serde::{Deserialize, Serialize};

/// Root of a parsed compilation unit. A program is either a plain expression
/// or a let-block whose declarations are in scope for the body expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Program {
    LetIn(LetIn),
    Expression(Expression),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetIn {
    pub declarations: Vec<Declaration>,
    pub body: Expression,
}
