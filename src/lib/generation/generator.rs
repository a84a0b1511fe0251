use crate::generation::*;
use crate::semantics::*;
use crate::syntax::*;
use crate::*;

pub type GenerationResult = Result<Instructions, GenerationError>;

/// A second depth-first walk over the tree, consuming the offsets and
/// resolutions from the analysis, which must carry no diagnostics. Function
/// and method bodies are emitted out of line and land after the `halt` of
/// the main body.
pub struct Generator<'a> {
    analysis: &'a Analysis,
    functions: Instructions,
    dispatch_tables: HashMap<String, Vec<String>>,
    labels: usize,
    function_labels: usize,
}

impl<'a> Generator<'a> {
    pub fn new(analysis: &'a Analysis) -> Generator<'a> {
        Generator {
            analysis,
            functions: Instructions::new(),
            dispatch_tables: HashMap::new(),
            labels: 0,
            function_labels: 0,
        }
    }

    pub fn generate(&mut self) -> GenerationResult {
        debug!("generating code");

        let program = self.analysis.program.clone();
        let mut code = Instructions::new();
        match &*program {
            Program::LetIn(let_in) => {
                // Dummy word under the first declaration, so the global
                // frame has the same shape as any other: offsets start at −2.
                code.push(Instruction::Push(0));
                for declaration in &let_in.declarations {
                    code.extend(self.generate_declaration(declaration)?);
                }
                code.extend(self.generate_expression(&let_in.body)?);
            }
            Program::Expression(body) => {
                code.extend(self.generate_expression(body)?);
            }
        }
        code.push(Instruction::Halt);
        code.extend(std::mem::take(&mut self.functions));
        Ok(code)
    }

    /// The completed dispatch table of `class`, method labels by offset.
    pub fn dispatch_table(&self, class: &str) -> Option<&[String]> {
        self.dispatch_tables.get(class).map(Vec::as_slice)
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("label{}", self.labels);
        self.labels += 1;
        label
    }

    fn fresh_function_label(&mut self) -> String {
        let label = format!("function{}", self.function_labels);
        self.function_labels += 1;
        label
    }

    /// Each declaration leaves one word on the stack: the variable's value,
    /// the function's label, or the dispatch table address.
    fn generate_declaration(&mut self, declaration: &Declaration) -> GenerationResult {
        match declaration {
            Declaration::Class(class) => self.generate_class(class),
            Declaration::Function(function) => self.generate_function(function),
            Declaration::Variable(variable) => self.generate_expression(&variable.value),
        }
    }

    fn generate_local_declaration(&mut self, declaration: &LocalDeclaration) -> GenerationResult {
        match declaration {
            LocalDeclaration::Function(function) => self.generate_function(function),
            LocalDeclaration::Variable(variable) => self.generate_expression(&variable.value),
        }
    }

    fn generate_function(&mut self, function: &FunctionDeclaration) -> GenerationResult {
        let label = self.fresh_function_label();
        self.generate_frame(&label, &function.parameters, &function.locals, &function.body)?;
        Ok(Instruction::PushLabel(label).into())
    }

    /// The callee side of the calling convention. On entry the stack holds,
    /// bottom to top: control link, arguments, access link, and `js` has
    /// left the return address in the ra register.
    fn generate_frame(
        &mut self,
        label: &str,
        parameters: &[Parameter],
        locals: &[LocalDeclaration],
        body: &Expression,
    ) -> Result<(), GenerationError> {
        use Instruction::*;

        let mut code = Instructions::new();
        code.push(Label(label.into()));
        code.push(CopyFramePointer);
        code.push(LoadReturnAddress);
        for local in locals {
            let local = self.generate_local_declaration(local)?;
            code.extend(local);
        }
        code.extend(self.generate_expression(body)?);
        code.push(StoreTemporary);
        for _ in locals {
            code.push(Pop);
        }
        code.push(StoreReturnAddress);
        code.push(Pop); // access link
        for _ in parameters {
            code.push(Pop);
        }
        code.push(StoreFramePointer);
        code.push(LoadTemporary);
        code.push(LoadReturnAddress);
        code.push(JumpSubroutine);

        self.functions.extend(code);
        Ok(())
    }

    /// Builds the dispatch table (the superclass's with overridden positions
    /// replaced and new methods appended) and emits the code that copies it
    /// onto the heap, leaving its address as the class's declared value.
    fn generate_class(&mut self, class: &ClassDeclaration) -> GenerationResult {
        use Instruction::*;

        let mut table: Vec<Option<String>> = class
            .superclass
            .as_ref()
            .and_then(|superclass| self.dispatch_tables.get(superclass))
            .map(|labels| labels.iter().cloned().map(Some).collect())
            .unwrap_or_default();

        for method in &class.methods {
            let offset = self.analysis.member_offset(&method.id).ok_or_else(|| {
                GenerationError::UnresolvedMethod(method.line, method.name.clone())
            })?;
            let label = self.fresh_function_label();
            self.generate_frame(&label, &method.parameters, &method.locals, &method.body)?;

            let position = offset as usize;
            while table.len() <= position {
                table.push(None);
            }
            table[position] = Some(label);
        }

        let mut labels = Vec::with_capacity(table.len());
        for (position, slot) in table.into_iter().enumerate() {
            match slot {
                Some(label) => labels.push(label),
                None => {
                    return Err(GenerationError::DispatchTableHole {
                        class: class.name.clone(),
                        offset: position as i64,
                    })
                }
            }
        }

        let mut code = Instructions::new();
        code.push(LoadHeapPointer);
        for label in &labels {
            code.push(PushLabel(label.clone()));
            code.push(LoadHeapPointer);
            code.push(StoreWord);
            code.push(LoadHeapPointer);
            code.push(Push(1));
            code.push(Add);
            code.push(StoreHeapPointer);
        }

        self.dispatch_tables.insert(class.name.clone(), labels);
        Ok(code)
    }

    fn resolution_of(&self, id: &Id, name: &str, line: usize) -> Result<Resolution, GenerationError> {
        self.analysis
            .resolution(id)
            .cloned()
            .ok_or_else(|| GenerationError::UnresolvedName(line, name.into()))
    }

    /// Address of the frame that declared a name: the current frame pointer
    /// followed down the access-link chain one hop per level of difference.
    fn generate_frame_base(&self, code: &mut Instructions, resolution: &Resolution) {
        code.push(Instruction::LoadFramePointer);
        for _ in resolution.entry.level..resolution.level {
            code.push(Instruction::LoadWord);
        }
    }

    fn generate_expression(&mut self, expression: &Expression) -> GenerationResult {
        use Instruction::*;

        let mut code = Instructions::new();
        match expression {
            Expression::IntegerLiteral { value, .. } => code.push(Push(*value)),
            Expression::BooleanLiteral { value, .. } => {
                code.push(Push(if *value { 1 } else { 0 }))
            }
            Expression::NullLiteral { .. } => code.push(Push(-1)),

            Expression::Reference { id, name, line } => {
                let resolution = self.resolution_of(id, name, *line)?;
                self.generate_frame_base(&mut code, &resolution);
                code.push(Push(resolution.entry.offset));
                code.push(Add);
                code.push(LoadWord);
            }

            Expression::Call {
                id,
                name,
                arguments,
                line,
            } => {
                let resolution = self.resolution_of(id, name, *line)?;

                code.push(LoadFramePointer); // control link
                for argument in arguments.iter().rev() {
                    code.extend(self.generate_expression(argument)?);
                }
                self.generate_frame_base(&mut code, &resolution);
                code.push(StoreTemporary);
                code.push(LoadTemporary);
                code.push(LoadTemporary); // one copy stays as the access link
                if resolution.entry.offset >= 0 {
                    // A method called by bare name: the frame base is the
                    // object, whose first word is the dispatch table.
                    code.push(LoadWord);
                }
                code.push(Push(resolution.entry.offset));
                code.push(Add);
                code.push(LoadWord);
                code.push(JumpSubroutine);
            }

            Expression::MethodCall {
                id,
                receiver,
                method,
                arguments,
                line,
            } => {
                let resolution = self.resolution_of(id, receiver, *line)?;
                let member = self
                    .analysis
                    .method_resolution(id)
                    .cloned()
                    .ok_or_else(|| GenerationError::UnresolvedMethod(*line, method.clone()))?;

                code.push(LoadFramePointer); // control link
                for argument in arguments.iter().rev() {
                    code.extend(self.generate_expression(argument)?);
                }
                // The object address doubles as the access link.
                self.generate_frame_base(&mut code, &resolution);
                code.push(Push(resolution.entry.offset));
                code.push(Add);
                code.push(LoadWord);
                code.push(StoreTemporary);
                code.push(LoadTemporary);
                code.push(LoadTemporary);
                code.push(LoadWord); // dispatch table address
                code.push(Push(member.offset));
                code.push(Add);
                code.push(LoadWord);
                code.push(JumpSubroutine);
            }

            Expression::New {
                id,
                class,
                arguments,
                line,
            } => {
                let resolution = self.resolution_of(id, class, *line)?;

                for argument in arguments {
                    code.extend(self.generate_expression(argument)?);
                }
                // Copy the argument values from the stack to the heap; the
                // top is the last argument, so fields end up at offsets
                // −1..−n counting back from the object address.
                for _ in arguments {
                    code.push(LoadHeapPointer);
                    code.push(StoreWord);
                    code.push(LoadHeapPointer);
                    code.push(Push(1));
                    code.push(Add);
                    code.push(StoreHeapPointer);
                }
                // Dispatch table pointer from the class's global slot.
                code.push(Push(MEMORY_SIZE + resolution.entry.offset));
                code.push(LoadWord);
                code.push(LoadHeapPointer);
                code.push(StoreWord);
                code.push(LoadHeapPointer); // the object address
                code.push(LoadHeapPointer);
                code.push(Push(1));
                code.push(Add);
                code.push(StoreHeapPointer);
            }

            Expression::If {
                condition,
                consequence,
                alternative,
                ..
            } => {
                let then_label = self.fresh_label();
                let end_label = self.fresh_label();

                code.extend(self.generate_expression(condition)?);
                code.push(Push(1));
                code.push(BranchIfEqual(then_label.clone()));
                code.extend(self.generate_expression(alternative)?);
                code.push(Branch(end_label.clone()));
                code.push(Label(then_label));
                code.extend(self.generate_expression(consequence)?);
                code.push(Label(end_label));
            }

            Expression::Print { value, .. } => {
                code.extend(self.generate_expression(value)?);
                // `print` consumes its operand; duplicate it through the
                // temporary register so the expression keeps its value.
                code.push(StoreTemporary);
                code.push(LoadTemporary);
                code.push(LoadTemporary);
                code.push(Print);
            }

            Expression::Not { value, .. } => {
                code.push(Push(1));
                code.extend(self.generate_expression(value)?);
                code.push(Sub);
            }

            Expression::Binary {
                operator,
                left,
                right,
                ..
            } => {
                code.extend(self.generate_binary(*operator, left, right)?);
            }
        }
        Ok(code)
    }

    fn generate_binary(
        &mut self,
        operator: BinaryOperator,
        left: &Expression,
        right: &Expression,
    ) -> GenerationResult {
        use Instruction::*;

        let mut code = Instructions::new();
        match operator {
            BinaryOperator::Add
            | BinaryOperator::Subtract
            | BinaryOperator::Multiply
            | BinaryOperator::Divide => {
                code.extend(self.generate_expression(left)?);
                code.extend(self.generate_expression(right)?);
                code.push(match operator {
                    BinaryOperator::Add => Add,
                    BinaryOperator::Subtract => Sub,
                    BinaryOperator::Multiply => Mult,
                    _ => Div,
                });
            }

            BinaryOperator::Equal | BinaryOperator::LessEqual => {
                let true_label = self.fresh_label();
                let end_label = self.fresh_label();
                code.extend(self.generate_expression(left)?);
                code.extend(self.generate_expression(right)?);
                code.push(match operator {
                    BinaryOperator::Equal => BranchIfEqual(true_label.clone()),
                    _ => BranchIfLessEqual(true_label.clone()),
                });
                code.push(Push(0));
                code.push(Branch(end_label.clone()));
                code.push(Label(true_label));
                code.push(Push(1));
                code.push(Label(end_label));
            }

            // a >= b is compiled as b <= a.
            BinaryOperator::GreaterEqual => {
                let true_label = self.fresh_label();
                let end_label = self.fresh_label();
                code.extend(self.generate_expression(right)?);
                code.extend(self.generate_expression(left)?);
                code.push(BranchIfLessEqual(true_label.clone()));
                code.push(Push(0));
                code.push(Branch(end_label.clone()));
                code.push(Label(true_label));
                code.push(Push(1));
                code.push(Label(end_label));
            }

            // Short-circuit: the right operand only runs when the left one
            // does not decide the result.
            BinaryOperator::And => {
                let false_label = self.fresh_label();
                let end_label = self.fresh_label();
                code.extend(self.generate_expression(left)?);
                code.push(Push(0));
                code.push(BranchIfEqual(false_label.clone()));
                code.extend(self.generate_expression(right)?);
                code.push(Branch(end_label.clone()));
                code.push(Label(false_label));
                code.push(Push(0));
                code.push(Label(end_label));
            }

            BinaryOperator::Or => {
                let true_label = self.fresh_label();
                let end_label = self.fresh_label();
                code.extend(self.generate_expression(left)?);
                code.push(Push(1));
                code.push(BranchIfEqual(true_label.clone()));
                code.extend(self.generate_expression(right)?);
                code.push(Branch(end_label.clone()));
                code.push(Label(true_label));
                code.push(Push(1));
                code.push(Label(end_label));
            }
        }
        Ok(code)
    }
}
