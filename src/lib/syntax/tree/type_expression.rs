use serde::{Deserialize, Serialize};

/// Source-level type annotations. `Reference` names a class. `Arrow` can be
/// parsed but is rejected during resolution wherever it annotates a
/// declaration; functions and methods are only ever called by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeExpression {
    Integer,
    Boolean,
    Reference(String),
    Arrow {
        parameters: Vec<TypeExpression>,
        result: Box<TypeExpression>,
    },
}
