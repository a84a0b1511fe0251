use crate::semantics::*;
use crate::syntax::*;
use crate::*;

/// One depth-first pass that assigns every declared name its storage offset
/// and resolves every use-site against the scope stack. Locals run downward
/// from −2 (0 is the control link, −1 the return address), parameters upward
/// from 1 (0 is the access link), fields continue the superclass's negative
/// range and methods its method count.
pub struct Resolver {
    scopes: LexicalScope,
    hierarchy: ClassHierarchy,
    class_members: HashMap<String, HashMap<String, SymbolEntry>>,
    class_entries: HashMap<String, SymbolEntry>,
    resolutions: HashMap<Id, Resolution>,
    method_resolutions: HashMap<Id, SymbolEntry>,
    member_offsets: HashMap<Id, i64>,
    diagnostics: Vec<Diagnostic>,
    declaration_offset: i64,
    field_offset: i64,
    method_offset: i64,
    current_class: Option<String>,
}

impl Resolver {
    pub fn new() -> Resolver {
        Resolver {
            scopes: LexicalScope::new(),
            hierarchy: ClassHierarchy::new(),
            class_members: HashMap::new(),
            class_entries: HashMap::new(),
            resolutions: HashMap::new(),
            method_resolutions: HashMap::new(),
            member_offsets: HashMap::new(),
            diagnostics: vec![],
            declaration_offset: -2,
            field_offset: -1,
            method_offset: 0,
            current_class: None,
        }
    }

    pub fn resolve(mut self, program: Arc<Program>) -> Analysis {
        debug!("resolving program");

        match &*program {
            Program::LetIn(let_in) => {
                self.scopes.push();
                for declaration in &let_in.declarations {
                    self.visit_declaration(declaration);
                }
                self.visit_expression(&let_in.body);
                self.scopes.pop();
            }
            Program::Expression(body) => self.visit_expression(body),
        }

        debug!(
            "resolution finished with {} diagnostics",
            self.diagnostics.len()
        );

        Analysis {
            program,
            hierarchy: self.hierarchy,
            diagnostics: self.diagnostics,
            class_members: self.class_members,
            class_entries: self.class_entries,
            resolutions: self.resolutions,
            method_resolutions: self.method_resolutions,
            member_offsets: self.member_offsets,
        }
    }

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    fn next_declaration_offset(&mut self) -> i64 {
        let offset = self.declaration_offset;
        self.declaration_offset -= 1;
        offset
    }

    fn next_field_offset(&mut self) -> i64 {
        let offset = self.field_offset;
        self.field_offset -= 1;
        offset
    }

    fn next_method_offset(&mut self) -> i64 {
        let offset = self.method_offset;
        self.method_offset += 1;
        offset
    }

    fn arrow_of(&self, parameters: &[Parameter], return_type: &TypeExpression) -> ArrowType {
        ArrowType::new(
            parameters
                .iter()
                .map(|parameter| (&parameter.type_expression).into())
                .collect(),
            return_type.into(),
        )
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let names = self.scopes.visible_names();
        closest_match(names.iter().map(String::as_str), name)
    }

    fn suggest_class(&self, name: &str) -> Option<String> {
        closest_match(self.class_members.keys().map(String::as_str), name)
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

    /// Annotations must name classes that are already declared, and may not
    /// be function types: functions and methods are called by name, never
    /// passed around as values.
    fn check_type_expression(
        &mut self,
        type_expression: &TypeExpression,
        kind: NameKind,
        name: &str,
        line: usize,
    ) {
        match type_expression {
            TypeExpression::Integer | TypeExpression::Boolean => {}
            TypeExpression::Reference(class) => {
                if !self.is_declared_class(class) {
                    let suggestion = self.suggest_class(class);
                    self.diagnose(Diagnostic::Undeclared(
                        line,
                        NameKind::Class,
                        class.clone(),
                        suggestion,
                    ));
                }
            }
            TypeExpression::Arrow { .. } => {
                self.diagnose(Diagnostic::FunctionTypedDeclaration(line, kind, name.into()));
            }
        }
    }

    fn visit_variable(&mut self, variable: &VariableDeclaration) {
        self.check_type_expression(
            &variable.type_expression,
            NameKind::Variable,
            &variable.name,
            variable.line,
        );

        // The initialiser is resolved before the binding exists, so
        // `var x = x` refers to an outer `x`.
        self.visit_expression(&variable.value);

        let offset = self.next_declaration_offset();
        let entry = SymbolEntry::new(
            self.scopes.level(),
            (&variable.type_expression).into(),
            offset,
        );
        if self.scopes.declare(&variable.name, entry).is_some() {
            self.diagnose(Diagnostic::Redeclared(
                variable.line,
                NameKind::Variable,
                variable.name.clone(),
            ));
        }
    }

    fn visit_function(&mut self, function: &FunctionDeclaration) {
        self.check_type_expression(
            &function.return_type,
            NameKind::Function,
            &function.name,
            function.line,
        );

        let arrow = self.arrow_of(&function.parameters, &function.return_type);
        let offset = self.next_declaration_offset();
        let entry = SymbolEntry::new(self.scopes.level(), Type::Arrow(arrow), offset);
        if self.scopes.declare(&function.name, entry).is_some() {
            self.diagnose(Diagnostic::Redeclared(
                function.line,
                NameKind::Function,
                function.name.clone(),
            ));
        }

        self.enter_frame(&function.parameters, &function.locals, &function.body);
    }

    /// The local offset counter is saved and restored so sibling frames each
    /// start at −2.
    fn enter_frame(
        &mut self,
        parameters: &[Parameter],
        locals: &[LocalDeclaration],
        body: &Expression,
    ) {
        self.scopes.push();
        let saved_offset = std::mem::replace(&mut self.declaration_offset, -2);

        let mut parameter_offset = 1;
        for parameter in parameters {
            self.check_type_expression(
                &parameter.type_expression,
                NameKind::Parameter,
                &parameter.name,
                parameter.line,
            );
            let entry = SymbolEntry::new(
                self.scopes.level(),
                (&parameter.type_expression).into(),
                parameter_offset,
            );
            parameter_offset += 1;
            if self.scopes.declare(&parameter.name, entry).is_some() {
                self.diagnose(Diagnostic::Redeclared(
                    parameter.line,
                    NameKind::Parameter,
                    parameter.name.clone(),
                ));
            }
        }

        for local in locals {
            self.visit_local_declaration(local);
        }
        self.visit_expression(body);

        self.scopes.pop();
        self.declaration_offset = saved_offset;
    }

    fn visit_class(&mut self, class: &ClassDeclaration) {
        debug!("resolving class {}", class.name);

        let mut inherited_fields: Vec<Type> = vec![];
        let mut inherited_methods: Vec<ArrowType> = vec![];
        let mut inherited_members: HashMap<String, SymbolEntry> = HashMap::new();

        if let Some(superclass) = &class.superclass {
            let super_entry = self
                .scopes
                .global()
                .and_then(|scope| scope.get(superclass))
                .cloned();
            match super_entry {
                Some(SymbolEntry {
                    type_: Type::Class(class_type),
                    ..
                }) => {
                    inherited_fields = class_type.fields;
                    inherited_methods = class_type.methods;
                    // Copied, not shared: subclass entries get the nesting
                    // level of the subclass's own member scope, same offsets.
                    let member_level = self.scopes.level() + 1;
                    inherited_members = self
                        .class_members
                        .get(superclass)
                        .cloned()
                        .unwrap_or_default()
                        .into_iter()
                        .map(|(name, entry)| {
                            (
                                name,
                                SymbolEntry::new(member_level, entry.type_, entry.offset),
                            )
                        })
                        .collect();
                    self.hierarchy.declare(&class.name, superclass);
                }
                _ => {
                    let suggestion = self.suggest_class(superclass);
                    self.diagnose(Diagnostic::Undeclared(
                        class.line,
                        NameKind::Class,
                        superclass.clone(),
                        suggestion,
                    ));
                }
            }
        }

        let class_level = self.scopes.level();
        let class_offset = self.next_declaration_offset();
        let preliminary = SymbolEntry::new(
            class_level,
            Type::Class(ClassType {
                fields: inherited_fields.clone(),
                methods: inherited_methods.clone(),
            }),
            class_offset,
        );
        if self
            .scopes
            .declare_global(&class.name, preliminary.clone())
            .is_some()
        {
            self.diagnose(Diagnostic::Redeclared(
                class.line,
                NameKind::Class,
                class.name.clone(),
            ));
        }
        self.class_entries.insert(class.name.clone(), preliminary);

        self.scopes.push_from(inherited_members);
        let saved_field_offset =
            std::mem::replace(&mut self.field_offset, -(inherited_fields.len() as i64) - 1);
        let saved_method_offset =
            std::mem::replace(&mut self.method_offset, inherited_methods.len() as i64);
        self.current_class = Some(class.name.clone());

        let mut all_fields = inherited_fields;
        let mut all_methods = inherited_methods;
        let mut declared: HashSet<String> = HashSet::new();

        for field in &class.fields {
            if !declared.insert(field.name.clone()) {
                self.diagnose(Diagnostic::Redeclared(
                    field.line,
                    NameKind::Field,
                    field.name.clone(),
                ));
                continue;
            }

            self.check_type_expression(
                &field.type_expression,
                NameKind::Field,
                &field.name,
                field.line,
            );

            let type_: Type = (&field.type_expression).into();
            let inherited = self
                .scopes
                .current()
                .and_then(|scope| scope.get(&field.name))
                .cloned();
            let offset = match inherited {
                Some(entry) => {
                    if let Type::Arrow(_) = entry.type_ {
                        self.diagnose(Diagnostic::FieldOverridesMethod(
                            field.line,
                            field.name.clone(),
                        ));
                        continue;
                    }
                    // Field override reuses the inherited storage slot.
                    entry.offset
                }
                None => self.next_field_offset(),
            };

            let entry = SymbolEntry::new(self.scopes.level(), type_.clone(), offset);
            self.scopes.declare(&field.name, entry);

            let position = (-offset - 1) as usize;
            if position < all_fields.len() {
                all_fields[position] = type_;
            } else {
                all_fields.push(type_);
            }
        }

        for method in &class.methods {
            if !declared.insert(method.name.clone()) {
                self.diagnose(Diagnostic::Redeclared(
                    method.line,
                    NameKind::Method,
                    method.name.clone(),
                ));
                continue;
            }

            self.visit_method(method);

            let entry = self
                .scopes
                .current()
                .and_then(|scope| scope.get(&method.name))
                .cloned();
            if let Some(SymbolEntry {
                type_: Type::Arrow(arrow),
                offset,
                ..
            }) = entry
            {
                let position = offset as usize;
                if position < all_methods.len() {
                    all_methods[position] = arrow;
                } else {
                    all_methods.push(arrow);
                }
            }
        }

        let members = self.scopes.pop();
        self.field_offset = saved_field_offset;
        self.method_offset = saved_method_offset;
        self.current_class = None;

        let entry = SymbolEntry::new(
            class_level,
            Type::Class(ClassType {
                fields: all_fields,
                methods: all_methods,
            }),
            class_offset,
        );
        self.scopes.declare_global(&class.name, entry.clone());
        self.class_entries.insert(class.name.clone(), entry);
        self.class_members.insert(class.name.clone(), members);
    }

    fn visit_method(&mut self, method: &MethodDeclaration) {
        self.check_type_expression(
            &method.return_type,
            NameKind::Method,
            &method.name,
            method.line,
        );

        let arrow = Type::Arrow(self.arrow_of(&method.parameters, &method.return_type));
        let inherited = self
            .scopes
            .current()
            .and_then(|scope| scope.get(&method.name))
            .cloned();
        let offset = match inherited {
            Some(existing) => {
                if let Type::Arrow(_) = existing.type_ {
                    // True override: reuse the inherited dispatch offset.
                    existing.offset
                } else {
                    self.diagnose(Diagnostic::MethodOverridesField(
                        method.line,
                        method.name.clone(),
                    ));
                    return;
                }
            }
            None => self.next_method_offset(),
        };

        self.member_offsets.insert(method.id, offset);
        self.scopes
            .declare(&method.name, SymbolEntry::new(self.scopes.level(), arrow, offset));

        self.enter_frame(&method.parameters, &method.locals, &method.body);
    }

    /// Looks through the member table under construction when `class` is the
    /// one currently being resolved.
    fn find_member(&self, class: &str, name: &str) -> Option<&SymbolEntry> {
        if let Some(members) = self.class_members.get(class) {
            return members.get(name);
        }
        if self.current_class.as_deref() == Some(class) {
            return self.scopes.at_level(1).and_then(|scope| scope.get(name));
        }
        None
    }

    fn is_declared_class(&self, name: &str) -> bool {
        self.class_members.contains_key(name) || self.current_class.as_deref() == Some(name)
    }

    /// Method entries live in a class member scope (level 1 while a class is
    /// being resolved) at non-negative offsets.
    fn is_method_entry(&self, entry: &SymbolEntry) -> bool {
        self.current_class.is_some()
            && entry.level == 1
            && entry.offset >= 0
            && matches!(entry.type_, Type::Arrow(_))
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::IntegerLiteral { .. }
            | Expression::BooleanLiteral { .. }
            | Expression::NullLiteral { .. } => {}

            Expression::Reference { id, name, line } => {
                match self.scopes.lookup(name).cloned() {
                    Some(entry) => {
                        if self.is_method_entry(&entry) {
                            self.diagnose(Diagnostic::MethodUsedAsValue(*line, name.clone()));
                        }
                        self.resolutions.insert(
                            *id,
                            Resolution {
                                entry,
                                level: self.scopes.level(),
                            },
                        );
                    }
                    None => {
                        let suggestion = self.suggest(name);
                        self.diagnose(Diagnostic::Undeclared(
                            *line,
                            NameKind::Variable,
                            name.clone(),
                            suggestion,
                        ));
                    }
                }
            }

            Expression::Call {
                id,
                name,
                arguments,
                line,
            } => {
                match self.scopes.lookup(name).cloned() {
                    Some(entry) => {
                        self.resolutions.insert(
                            *id,
                            Resolution {
                                entry,
                                level: self.scopes.level(),
                            },
                        );
                    }
                    None => {
                        let suggestion = self.suggest(name);
                        self.diagnose(Diagnostic::Undeclared(
                            *line,
                            NameKind::Function,
                            name.clone(),
                            suggestion,
                        ));
                    }
                }
                for argument in arguments {
                    self.visit_expression(argument);
                }
            }

            Expression::MethodCall {
                id,
                receiver,
                method,
                arguments,
                line,
            } => {
                match self.scopes.lookup(receiver).cloned() {
                    Some(entry) => {
                        self.resolutions.insert(
                            *id,
                            Resolution {
                                entry: entry.clone(),
                                level: self.scopes.level(),
                            },
                        );
                        if let Type::Reference(class_name) = &entry.type_ {
                            let member = self.find_member(class_name, method).cloned();
                            match member {
                                Some(member)
                                    if member.offset >= 0
                                        && matches!(member.type_, Type::Arrow(_)) =>
                                {
                                    self.method_resolutions.insert(*id, member);
                                }
                                Some(_) => {
                                    self.diagnose(Diagnostic::NotCallable(*line, method.clone()));
                                }
                                None => {
                                    let suggestion = self
                                        .class_members
                                        .get(class_name)
                                        .map(|members| {
                                            closest_match(
                                                members.keys().map(String::as_str),
                                                method,
                                            )
                                        })
                                        .unwrap_or(None);
                                    self.diagnose(Diagnostic::Undeclared(
                                        *line,
                                        NameKind::Method,
                                        method.clone(),
                                        suggestion,
                                    ));
                                }
                            }
                        } else {
                            self.diagnose(Diagnostic::NotAnObject(*line, receiver.clone()));
                        }
                    }
                    None => {
                        let suggestion = self.suggest(receiver);
                        self.diagnose(Diagnostic::Undeclared(
                            *line,
                            NameKind::Object,
                            receiver.clone(),
                            suggestion,
                        ));
                    }
                }
                for argument in arguments {
                    self.visit_expression(argument);
                }
            }

            Expression::New {
                id,
                class,
                arguments,
                line,
            } => {
                if !self.is_declared_class(class) {
                    let suggestion = self.suggest_class(class);
                    self.diagnose(Diagnostic::Undeclared(
                        *line,
                        NameKind::Class,
                        class.clone(),
                        suggestion,
                    ));
                }
                if let Some(entry) = self
                    .scopes
                    .global()
                    .and_then(|scope| scope.get(class))
                    .cloned()
                {
                    self.resolutions.insert(
                        *id,
                        Resolution {
                            entry,
                            level: self.scopes.level(),
                        },
                    );
                }
                for argument in arguments {
                    self.visit_expression(argument);
                }
            }

            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                self.visit_expression(condition);
                self.visit_expression(consequence);
                self.visit_expression(alternative);
            }

            Expression::Print { value, .. } | Expression::Not { value, .. } => {
                self.visit_expression(value);
            }

            Expression::Binary { left, right, .. } => {
                self.visit_expression(left);
                self.visit_expression(right);
            }
        }
    }
}
