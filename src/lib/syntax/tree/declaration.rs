use crate::syntax::*;
use crate::*;
use serde::{Deserialize, Serialize};

/// A declaration at the top level of a let-block. Classes are only legal
/// here; function and method bodies use [`LocalDeclaration`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Declaration {
    Class(ClassDeclaration),
    Function(FunctionDeclaration),
    Variable(VariableDeclaration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LocalDeclaration {
    Function(FunctionDeclaration),
    Variable(VariableDeclaration),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub type_expression: TypeExpression,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDeclaration {
    #[serde(default = "Id::new")]
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeExpression,
    #[serde(default)]
    pub locals: Vec<LocalDeclaration>,
    pub body: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    pub return_type: TypeExpression,
    #[serde(default)]
    pub locals: Vec<LocalDeclaration>,
    pub body: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub name: String,
    pub type_expression: TypeExpression,
    pub value: Expression,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_expression: TypeExpression,
    pub line: usize,
}
