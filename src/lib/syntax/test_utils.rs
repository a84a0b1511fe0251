use crate::syntax::*;
use crate::*;

pub fn let_in(declarations: Vec<Declaration>, body: Expression) -> Arc<Program> {
    Arc::new(Program::LetIn(LetIn { declarations, body }))
}

pub fn var(name: &str, type_expression: TypeExpression, value: Expression) -> VariableDeclaration {
    VariableDeclaration {
        name: name.into(),
        type_expression,
        value,
        line: 1,
    }
}

pub fn fun(
    name: &str,
    parameters: Vec<Parameter>,
    return_type: TypeExpression,
    locals: Vec<LocalDeclaration>,
    body: Expression,
) -> FunctionDeclaration {
    FunctionDeclaration {
        name: name.into(),
        parameters,
        return_type,
        locals,
        body,
        line: 1,
    }
}

pub fn class(
    name: &str,
    superclass: Option<&str>,
    fields: Vec<FieldDeclaration>,
    methods: Vec<MethodDeclaration>,
) -> ClassDeclaration {
    ClassDeclaration {
        name: name.into(),
        superclass: superclass.map(Into::into),
        fields,
        methods,
        line: 1,
    }
}

pub fn field(name: &str, type_expression: TypeExpression) -> FieldDeclaration {
    FieldDeclaration {
        name: name.into(),
        type_expression,
        line: 1,
    }
}

pub fn method(
    name: &str,
    parameters: Vec<Parameter>,
    return_type: TypeExpression,
    body: Expression,
) -> MethodDeclaration {
    MethodDeclaration {
        id: Id::new(),
        name: name.into(),
        parameters,
        return_type,
        locals: vec![],
        body,
        line: 1,
    }
}

pub fn param(name: &str, type_expression: TypeExpression) -> Parameter {
    Parameter {
        name: name.into(),
        type_expression,
        line: 1,
    }
}

pub fn int(value: i64) -> Expression {
    Expression::IntegerLiteral { value, line: 1 }
}

pub fn boolean(value: bool) -> Expression {
    Expression::BooleanLiteral { value, line: 1 }
}

pub fn null() -> Expression {
    Expression::NullLiteral { line: 1 }
}

pub fn reference(name: &str) -> Expression {
    Expression::Reference {
        id: Id::new(),
        name: name.into(),
        line: 1,
    }
}

pub fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Call {
        id: Id::new(),
        name: name.into(),
        arguments,
        line: 1,
    }
}

pub fn method_call(receiver: &str, method: &str, arguments: Vec<Expression>) -> Expression {
    Expression::MethodCall {
        id: Id::new(),
        receiver: receiver.into(),
        method: method.into(),
        arguments,
        line: 1,
    }
}

pub fn new_object(class: &str, arguments: Vec<Expression>) -> Expression {
    Expression::New {
        id: Id::new(),
        class: class.into(),
        arguments,
        line: 1,
    }
}

pub fn conditional(
    condition: Expression,
    consequence: Expression,
    alternative: Expression,
) -> Expression {
    Expression::If {
        condition: Box::new(condition),
        consequence: Box::new(consequence),
        alternative: Box::new(alternative),
        line: 1,
    }
}

pub fn print(value: Expression) -> Expression {
    Expression::Print {
        value: Box::new(value),
        line: 1,
    }
}

pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Expression {
    Expression::Binary {
        operator,
        left: Box::new(left),
        right: Box::new(right),
        line: 1,
    }
}

pub fn not(value: Expression) -> Expression {
    Expression::Not {
        value: Box::new(value),
        line: 1,
    }
}
