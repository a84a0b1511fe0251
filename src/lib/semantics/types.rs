use crate::syntax::TypeExpression;
use crate::*;

/// The closed set of type descriptors. `Empty` is the type of the null
/// literal. `Class` is structural storage for a class's member layout;
/// nominal identity is carried by `Reference`.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Integer,
    Boolean,
    Empty,
    Arrow(ArrowType),
    Reference(String),
    Class(ClassType),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowType {
    pub parameters: Vec<Type>,
    pub result: Box<Type>,
}

impl ArrowType {
    pub fn new(parameters: Vec<Type>, result: Type) -> ArrowType {
        ArrowType {
            parameters,
            result: Box::new(result),
        }
    }
}

/// Full (inherited + own) member layout. Field position `i` is stored at
/// object offset `-(i + 1)`; method position `i` is dispatch-table offset
/// `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassType {
    pub fields: Vec<Type>,
    pub methods: Vec<ArrowType>,
}

impl From<&TypeExpression> for Type {
    fn from(expression: &TypeExpression) -> Type {
        match expression {
            TypeExpression::Integer => Type::Integer,
            TypeExpression::Boolean => Type::Boolean,
            TypeExpression::Reference(name) => Type::Reference(name.clone()),
            TypeExpression::Arrow { parameters, result } => Type::Arrow(ArrowType::new(
                parameters.iter().map(Into::into).collect(),
                result.as_ref().into(),
            )),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "int"),
            Type::Boolean => write!(f, "bool"),
            Type::Empty => write!(f, "null"),
            Type::Arrow(arrow) => write!(f, "{}", arrow),
            Type::Reference(name) => write!(f, "{}", name),
            Type::Class(class) => write!(
                f,
                "class({} fields, {} methods)",
                class.fields.len(),
                class.methods.len()
            ),
        }
    }
}

impl fmt::Display for ArrowType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "(")?;
        for (i, parameter) in self.parameters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", parameter)?;
        }
        write!(f, ") -> {}", self.result)
    }
}
