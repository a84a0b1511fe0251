use crate::semantics::*;
use crate::syntax::*;
use crate::*;

/// Second pass over the resolved tree, synthesising a type for every
/// expression bottom-up. `None` means the subexpression was already
/// diagnosed and enclosing checks stay quiet instead of cascading.
pub struct TypeChecker<'a> {
    analysis: &'a Analysis,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> TypeChecker<'a> {
    pub fn check(analysis: &'a Analysis, diagnostics: &'a mut Vec<Diagnostic>) {
        debug!("type checking program");

        let mut checker = TypeChecker {
            analysis,
            diagnostics,
        };

        match &*analysis.program {
            Program::LetIn(let_in) => {
                for declaration in &let_in.declarations {
                    checker.visit_declaration(declaration);
                }
                checker.visit_expression(&let_in.body);
            }
            Program::Expression(body) => {
                checker.visit_expression(body);
            }
        }
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn is_subtype(&self, a: &Type, b: &Type) -> bool {
        is_subtype(&self.analysis.hierarchy, a, b)
    }

    fn visit_declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Class(class) => self.visit_class(class),
            Declaration::Function(function) => self.visit_function(function),
            Declaration::Variable(variable) => self.visit_variable(variable),
        }
    }

    fn visit_local_declaration(&mut self, declaration: &LocalDeclaration) {
        match declaration {
            LocalDeclaration::Function(function) => self.visit_function(function),
            LocalDeclaration::Variable(variable) => self.visit_variable(variable),
        }
    }

    fn visit_variable(&mut self, variable: &VariableDeclaration) {
        let declared: Type = (&variable.type_expression).into();
        if let Some(actual) = self.visit_expression(&variable.value) {
            if !self.is_subtype(&actual, &declared) {
                self.diagnose(Diagnostic::TypeMismatch {
                    line: variable.line,
                    expected: declared,
                    actual,
                });
            }
        }
    }

    fn visit_function(&mut self, function: &FunctionDeclaration) {
        self.visit_frame(
            &function.locals,
            &function.body,
            &function.return_type,
            function.line,
        );
    }

    fn visit_frame(
        &mut self,
        locals: &[LocalDeclaration],
        body: &Expression,
        return_type: &TypeExpression,
        line: usize,
    ) {
        for local in locals {
            self.visit_local_declaration(local);
        }

        let declared: Type = return_type.into();
        if let Some(actual) = self.visit_expression(body) {
            if !self.is_subtype(&actual, &declared) {
                self.diagnose(Diagnostic::TypeMismatch {
                    line,
                    expected: declared,
                    actual,
                });
            }
        }
    }

    fn visit_class(&mut self, class: &ClassDeclaration) {
        if let Some(superclass) = &class.superclass {
            self.check_overrides(class, superclass);
        }

        for method in &class.methods {
            self.visit_frame(&method.locals, &method.body, &method.return_type, method.line);
        }
    }

    /// A field override must narrow the field type; a method override must
    /// satisfy arrow subtyping.
    fn check_overrides(&mut self, class: &ClassDeclaration, superclass: &str) {
        let inherited = match self.analysis.class_members(superclass) {
            Some(members) => members.clone(),
            // An undeclared superclass was already reported during resolution.
            None => return,
        };

        for field in &class.fields {
            if let Some(overridden) = inherited.get(&field.name) {
                if let Type::Arrow(_) = overridden.type_ {
                    // Field-overrides-method was already reported.
                    continue;
                }
                let own: Type = (&field.type_expression).into();
                if !self.is_subtype(&own, &overridden.type_) {
                    self.diagnose(Diagnostic::InvalidOverride {
                        line: field.line,
                        class: class.name.clone(),
                        member: field.name.clone(),
                    });
                }
            }
        }

        for method in &class.methods {
            if let Some(overridden) = inherited.get(&method.name) {
                if let Type::Arrow(_) = &overridden.type_ {
                    let own = Type::Arrow(ArrowType::new(
                        method
                            .parameters
                            .iter()
                            .map(|parameter| (&parameter.type_expression).into())
                            .collect(),
                        (&method.return_type).into(),
                    ));
                    if !self.is_subtype(&own, &overridden.type_) {
                        self.diagnose(Diagnostic::InvalidOverride {
                            line: method.line,
                            class: class.name.clone(),
                            member: method.name.clone(),
                        });
                    }
                }
            }
        }
    }

    fn check_arguments(
        &mut self,
        line: usize,
        name: &str,
        arrow: &ArrowType,
        arguments: &[Expression],
    ) {
        if arguments.len() != arrow.parameters.len() {
            self.diagnose(Diagnostic::WrongNumberOfArguments {
                line,
                name: name.into(),
                expected: arrow.parameters.len(),
                actual: arguments.len(),
            });
            for argument in arguments {
                self.visit_expression(argument);
            }
            return;
        }

        for (argument, parameter) in arguments.iter().zip(arrow.parameters.iter()) {
            if let Some(actual) = self.visit_expression(argument) {
                if !self.is_subtype(&actual, parameter) {
                    self.diagnose(Diagnostic::TypeMismatch {
                        line: argument.line(),
                        expected: parameter.clone(),
                        actual,
                    });
                }
            }
        }
    }

    fn visit_expression(&mut self, expression: &Expression) -> Option<Type> {
        match expression {
            Expression::IntegerLiteral { .. } => Some(Type::Integer),
            Expression::BooleanLiteral { .. } => Some(Type::Boolean),
            Expression::NullLiteral { .. } => Some(Type::Empty),

            Expression::Reference { id, .. } => self
                .analysis
                .resolution(id)
                .map(|resolution| resolution.entry.type_.clone()),

            Expression::Call {
                id,
                name,
                arguments,
                line,
            } => {
                let entry = match self.analysis.resolution(id) {
                    Some(resolution) => resolution.entry.clone(),
                    None => {
                        for argument in arguments {
                            self.visit_expression(argument);
                        }
                        return None;
                    }
                };

                match entry.type_ {
                    Type::Arrow(arrow) => {
                        self.check_arguments(*line, name, &arrow, arguments);
                        Some(*arrow.result)
                    }
                    _ => {
                        self.diagnose(Diagnostic::NotCallable(*line, name.clone()));
                        for argument in arguments {
                            self.visit_expression(argument);
                        }
                        None
                    }
                }
            }

            Expression::MethodCall {
                id,
                method,
                arguments,
                line,
                ..
            } => {
                let entry = match self.analysis.method_resolution(id) {
                    Some(entry) => entry.clone(),
                    // A bad receiver or member was already reported.
                    None => {
                        for argument in arguments {
                            self.visit_expression(argument);
                        }
                        return None;
                    }
                };

                match entry.type_ {
                    Type::Arrow(arrow) => {
                        self.check_arguments(*line, method, &arrow, arguments);
                        Some(*arrow.result)
                    }
                    _ => None,
                }
            }

            Expression::New {
                class,
                arguments,
                line,
                ..
            } => {
                let class_type = match self.analysis.class_entry(class) {
                    Some(SymbolEntry {
                        type_: Type::Class(class_type),
                        ..
                    }) => class_type.clone(),
                    _ => {
                        for argument in arguments {
                            self.visit_expression(argument);
                        }
                        return None;
                    }
                };

                if arguments.len() != class_type.fields.len() {
                    self.diagnose(Diagnostic::WrongNumberOfArguments {
                        line: *line,
                        name: class.clone(),
                        expected: class_type.fields.len(),
                        actual: arguments.len(),
                    });
                    for argument in arguments {
                        self.visit_expression(argument);
                    }
                } else {
                    for (argument, field) in arguments.iter().zip(class_type.fields.iter()) {
                        if let Some(actual) = self.visit_expression(argument) {
                            if !self.is_subtype(&actual, field) {
                                self.diagnose(Diagnostic::TypeMismatch {
                                    line: argument.line(),
                                    expected: field.clone(),
                                    actual,
                                });
                            }
                        }
                    }
                }

                Some(Type::Reference(class.clone()))
            }

            Expression::If {
                condition,
                consequence,
                alternative,
                line,
            } => {
                if let Some(actual) = self.visit_expression(condition) {
                    if !self.is_subtype(&actual, &Type::Boolean) {
                        self.diagnose(Diagnostic::TypeMismatch {
                            line: condition.line(),
                            expected: Type::Boolean,
                            actual,
                        });
                    }
                }

                let consequence = self.visit_expression(consequence);
                let alternative = self.visit_expression(alternative);
                match (consequence, alternative) {
                    (Some(consequence), Some(alternative)) => {
                        let unified = lowest_common_ancestor(
                            &self.analysis.hierarchy,
                            &consequence,
                            &alternative,
                        );
                        if unified.is_none() {
                            self.diagnose(Diagnostic::IncompatibleBranches {
                                line: *line,
                                consequence,
                                alternative,
                            });
                        }
                        unified
                    }
                    (branch, None) | (None, branch) => branch,
                }
            }

            Expression::Print { value, .. } => self.visit_expression(value),

            Expression::Not { value, .. } => {
                if let Some(actual) = self.visit_expression(value) {
                    if !self.is_subtype(&actual, &Type::Boolean) {
                        self.diagnose(Diagnostic::TypeMismatch {
                            line: value.line(),
                            expected: Type::Boolean,
                            actual,
                        });
                    }
                }
                Some(Type::Boolean)
            }

            Expression::Binary {
                operator,
                left,
                right,
                line,
            } => self.visit_binary(*operator, left, right, *line),
        }
    }

    fn visit_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
        line: usize,
    ) -> Option<Type> {
        use BinaryOperator::*;

        match operator {
            Add | Subtract | Multiply | Divide => {
                self.check_operand(left, &Type::Integer);
                self.check_operand(right, &Type::Integer);
                Some(Type::Integer)
            }
            LessEqual | GreaterEqual => {
                self.check_operand(left, &Type::Integer);
                self.check_operand(right, &Type::Integer);
                Some(Type::Boolean)
            }
            And | Or => {
                self.check_operand(left, &Type::Boolean);
                self.check_operand(right, &Type::Boolean);
                Some(Type::Boolean)
            }
            Equal => {
                let left = self.visit_expression(left);
                let right = self.visit_expression(right);
                if let (Some(left), Some(right)) = (left, right) {
                    if lowest_common_ancestor(&self.analysis.hierarchy, &left, &right).is_none() {
                        self.diagnose(Diagnostic::IncomparableValues { line, left, right });
                    }
                }
                Some(Type::Boolean)
            }
        }
    }

    fn check_operand(&mut self, operand: &Expression, expected: &Type) {
        if let Some(actual) = self.visit_expression(operand) {
            if !self.is_subtype(&actual, expected) {
                self.diagnose(Diagnostic::TypeMismatch {
                    line: operand.line(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::test_utils::*;
    use crate::syntax::TypeExpression::{Boolean, Integer, Reference};

    fn check(program: Arc<Program>) -> Vec<Diagnostic> {
        let mut analysis = Analysis::resolve(program);
        analysis.check();
        analysis.diagnostics
    }

    #[test]
    fn a_well_typed_program_produces_no_diagnostics() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Variable(var("x", Integer, int(5))),
                Declaration::Function(fun(
                    "double",
                    vec![param("n", Integer)],
                    Integer,
                    vec![],
                    binary(BinaryOperator::Multiply, reference("n"), int(2)),
                )),
            ],
            print(call("double", vec![reference("x")])),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn variable_initialisers_must_match_the_declared_type() {
        let diagnostics = check(let_in(
            vec![Declaration::Variable(var("x", Boolean, int(5)))],
            reference("x"),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::TypeMismatch {
                expected: Type::Boolean,
                actual: Type::Integer,
                ..
            }
        ));
    }

    #[test]
    fn booleans_widen_to_integers_in_arithmetic() {
        let diagnostics = check(let_in(
            vec![],
            binary(BinaryOperator::Add, boolean(true), int(1)),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn function_bodies_must_match_the_declared_return_type() {
        let diagnostics = check(let_in(
            vec![Declaration::Function(fun(
                "f",
                vec![],
                Boolean,
                vec![],
                int(3),
            ))],
            int(0),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::TypeMismatch { .. }));
    }

    #[test]
    fn conditions_must_be_boolean() {
        let diagnostics = check(let_in(
            vec![],
            conditional(int(1), int(2), int(3)),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::TypeMismatch {
                expected: Type::Boolean,
                ..
            }
        ));
    }

    #[test]
    fn branches_unify_through_the_class_hierarchy() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class("Animal", None, vec![], vec![])),
                Declaration::Class(class("Dog", Some("Animal"), vec![], vec![])),
                Declaration::Class(class("Cat", Some("Animal"), vec![], vec![])),
                Declaration::Variable(var(
                    "pet",
                    Reference("Animal".into()),
                    conditional(
                        boolean(true),
                        new_object("Dog", vec![]),
                        new_object("Cat", vec![]),
                    ),
                )),
            ],
            reference("pet"),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn branches_without_a_common_ancestor_are_reported() {
        let diagnostics = check(let_in(
            vec![Declaration::Class(class("Dog", None, vec![], vec![]))],
            conditional(boolean(true), int(1), new_object("Dog", vec![])),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics[0],
            Diagnostic::IncompatibleBranches { .. }
        ));
    }

    #[test]
    fn call_arity_is_checked() {
        let diagnostics = check(let_in(
            vec![Declaration::Function(fun(
                "f",
                vec![param("a", Integer), param("b", Integer)],
                Integer,
                vec![],
                int(0),
            ))],
            call("f", vec![int(1)]),
        ));
        assert_eq!(diagnostics.len(), 1);
        match &diagnostics[0] {
            Diagnostic::WrongNumberOfArguments {
                name,
                expected,
                actual,
                ..
            } => {
                assert_eq!(name, "f");
                assert_eq!(*expected, 2);
                assert_eq!(*actual, 1);
            }
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[test]
    fn arguments_must_be_subtypes_of_the_parameters() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class("Dog", None, vec![], vec![])),
                Declaration::Function(fun(
                    "f",
                    vec![param("n", Integer)],
                    Integer,
                    vec![],
                    reference("n"),
                )),
            ],
            call("f", vec![new_object("Dog", vec![])]),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::TypeMismatch { .. }));
    }

    #[test]
    fn constructor_arguments_are_checked_against_the_field_layout() {
        let program = vec![Declaration::Class(class(
            "Point",
            None,
            vec![field("x", Integer), field("y", Integer)],
            vec![],
        ))];

        let wrong_arity = check(let_in(
            program.clone(),
            new_object("Point", vec![int(1)]),
        ));
        assert_eq!(wrong_arity.len(), 1);
        assert!(matches!(
            wrong_arity[0],
            Diagnostic::WrongNumberOfArguments { .. }
        ));

        let wrong_type = check(let_in(
            program,
            new_object("Point", vec![int(1), null()]),
        ));
        assert_eq!(wrong_type.len(), 1);
        assert!(matches!(wrong_type[0], Diagnostic::TypeMismatch { .. }));
    }

    #[test]
    fn null_can_initialise_any_reference() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class("Dog", None, vec![], vec![])),
                Declaration::Variable(var("dog", Reference("Dog".into()), null())),
            ],
            reference("dog"),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn equality_requires_a_common_ancestor() {
        let comparable = check(let_in(
            vec![Declaration::Class(class("Dog", None, vec![], vec![]))],
            binary(
                BinaryOperator::Equal,
                new_object("Dog", vec![]),
                null(),
            ),
        ));
        assert!(comparable.is_empty(), "{:?}", comparable);

        let incomparable = check(let_in(
            vec![Declaration::Class(class("Dog", None, vec![], vec![]))],
            binary(BinaryOperator::Equal, new_object("Dog", vec![]), int(1)),
        ));
        assert_eq!(incomparable.len(), 1);
        assert!(matches!(
            incomparable[0],
            Diagnostic::IncomparableValues { .. }
        ));
    }

    #[test]
    fn method_overrides_must_narrow_the_result() {
        let sound = check(let_in(
            vec![
                Declaration::Class(class("Animal", None, vec![], vec![])),
                Declaration::Class(class("Dog", Some("Animal"), vec![], vec![])),
                Declaration::Class(class(
                    "Shelter",
                    None,
                    vec![],
                    vec![method("adopt", vec![], Reference("Animal".into()), null())],
                )),
                Declaration::Class(class(
                    "DogShelter",
                    Some("Shelter"),
                    vec![],
                    vec![method("adopt", vec![], Reference("Dog".into()), null())],
                )),
            ],
            int(0),
        ));
        assert!(sound.is_empty(), "{:?}", sound);

        let unsound = check(let_in(
            vec![
                Declaration::Class(class("Animal", None, vec![], vec![])),
                Declaration::Class(class("Dog", Some("Animal"), vec![], vec![])),
                Declaration::Class(class(
                    "Shelter",
                    None,
                    vec![],
                    vec![method("adopt", vec![], Reference("Dog".into()), null())],
                )),
                Declaration::Class(class(
                    "AnyShelter",
                    Some("Shelter"),
                    vec![],
                    vec![method("adopt", vec![], Reference("Animal".into()), null())],
                )),
            ],
            int(0),
        ));
        assert_eq!(unsound.len(), 1);
        match &unsound[0] {
            Diagnostic::InvalidOverride { class, member, .. } => {
                assert_eq!(class, "AnyShelter");
                assert_eq!(member, "adopt");
            }
            other => panic!("unexpected diagnostic: {:?}", other),
        }
    }

    #[test]
    fn method_overrides_may_widen_their_parameters() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class("Animal", None, vec![], vec![])),
                Declaration::Class(class("Dog", Some("Animal"), vec![], vec![])),
                Declaration::Class(class(
                    "Walker",
                    None,
                    vec![],
                    vec![method(
                        "walk",
                        vec![param("animal", Reference("Dog".into()))],
                        Integer,
                        int(1),
                    )],
                )),
                Declaration::Class(class(
                    "PatientWalker",
                    Some("Walker"),
                    vec![],
                    vec![method(
                        "walk",
                        vec![param("animal", Reference("Animal".into()))],
                        Integer,
                        int(2),
                    )],
                )),
            ],
            int(0),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn field_overrides_must_narrow() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class("Animal", None, vec![], vec![])),
                Declaration::Class(class("Dog", Some("Animal"), vec![], vec![])),
                Declaration::Class(class(
                    "Kennel",
                    None,
                    vec![field("occupant", Reference("Dog".into()))],
                    vec![],
                )),
                Declaration::Class(class(
                    "AnyKennel",
                    Some("Kennel"),
                    vec![field("occupant", Reference("Animal".into()))],
                    vec![],
                )),
            ],
            int(0),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::InvalidOverride { .. }));
    }

    #[test]
    fn method_call_arguments_are_checked() {
        let diagnostics = check(let_in(
            vec![
                Declaration::Class(class(
                    "Counter",
                    None,
                    vec![field("count", Integer)],
                    vec![method(
                        "add",
                        vec![param("n", Integer)],
                        Integer,
                        binary(BinaryOperator::Add, reference("count"), reference("n")),
                    )],
                )),
                Declaration::Variable(var(
                    "counter",
                    Reference("Counter".into()),
                    new_object("Counter", vec![int(0)]),
                )),
            ],
            method_call("counter", "add", vec![null()]),
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(diagnostics[0], Diagnostic::TypeMismatch { .. }));
    }

    #[test]
    fn print_passes_its_operand_type_through() {
        let diagnostics = check(let_in(
            vec![Declaration::Variable(var("x", Integer, print(int(7))))],
            reference("x"),
        ));
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }
}
