use crate::semantics;
use crate::*;

/// The kind of name a diagnostic is about, as it appears in the rendered
/// message ("Var id x at line 3 not declared").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameKind {
    Variable,
    Function,
    Parameter,
    Class,
    Field,
    Method,
    Object,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NameKind::Variable => write!(f, "Var"),
            NameKind::Function => write!(f, "Fun"),
            NameKind::Parameter => write!(f, "Par"),
            NameKind::Class => write!(f, "Class"),
            NameKind::Field => write!(f, "Field"),
            NameKind::Method => write!(f, "Method"),
            NameKind::Object => write!(f, "Obj"),
        }
    }
}

#[derive(Clone, IntoStaticStr)]
pub enum Diagnostic {
    Redeclared(usize, NameKind, String),
    Undeclared(usize, NameKind, String, Option<String>),
    FieldOverridesMethod(usize, String),
    MethodOverridesField(usize, String),
    MethodUsedAsValue(usize, String),
    NotCallable(usize, String),
    NotAnObject(usize, String),
    TypeMismatch {
        line: usize,
        expected: semantics::Type,
        actual: semantics::Type,
    },
    IncompatibleBranches {
        line: usize,
        consequence: semantics::Type,
        alternative: semantics::Type,
    },
    IncomparableValues {
        line: usize,
        left: semantics::Type,
        right: semantics::Type,
    },
    WrongNumberOfArguments {
        line: usize,
        name: String,
        expected: usize,
        actual: usize,
    },
    InvalidOverride {
        line: usize,
        class: String,
        member: String,
    },
    FunctionTypedDeclaration(usize, NameKind, String),
}

impl Diagnostic {
    pub fn line(&self) -> usize {
        use Diagnostic::*;

        match self {
            Redeclared(l, _, _)
            | Undeclared(l, _, _, _)
            | FieldOverridesMethod(l, _)
            | MethodOverridesField(l, _)
            | MethodUsedAsValue(l, _)
            | NotCallable(l, _)
            | NotAnObject(l, _)
            | FunctionTypedDeclaration(l, _, _)
            | TypeMismatch { line: l, .. }
            | IncompatibleBranches { line: l, .. }
            | IncomparableValues { line: l, .. }
            | WrongNumberOfArguments { line: l, .. }
            | InvalidOverride { line: l, .. } => *l,
        }
    }

    pub fn level(&self) -> DiagnosticLevel {
        DiagnosticLevel::Error
    }

    pub fn code(&self) -> usize {
        use Diagnostic::*;

        match self {
            Redeclared(_, _, _) => 1,
            Undeclared(_, _, _, _) => 2,
            FieldOverridesMethod(_, _) => 3,
            MethodOverridesField(_, _) => 4,
            MethodUsedAsValue(_, _) => 5,
            NotCallable(_, _) => 6,
            NotAnObject(_, _) => 7,
            TypeMismatch { .. } => 8,
            IncompatibleBranches { .. } => 9,
            IncomparableValues { .. } => 10,
            WrongNumberOfArguments { .. } => 11,
            InvalidOverride { .. } => 12,
            FunctionTypedDeclaration(_, _, _) => 13,
        }
    }

    pub fn failed(diagnostics: &[Diagnostic]) -> bool {
        diagnostics
            .iter()
            .any(|d| matches!(d.level(), DiagnosticLevel::Error))
    }

    pub fn error_count(diagnostics: &[Diagnostic]) -> usize {
        diagnostics
            .iter()
            .filter(|d| matches!(d.level(), DiagnosticLevel::Error))
            .count()
    }
}

impl fmt::Debug for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{:?} ({} @ line {})", self.to_string(), name, self.line())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Diagnostic::*;

        match self {
            Redeclared(line, kind, name) => {
                write!(f, "{} id {} at line {} already declared", kind, name, line)
            }
            Undeclared(line, kind, name, suggestion) => {
                write!(f, "{} id {} at line {} not declared", kind, name, line)?;
                if let Some(suggestion) = suggestion {
                    write!(f, " (did you mean `{}`?)", suggestion)?;
                }
                Ok(())
            }
            FieldOverridesMethod(line, name) => {
                write!(f, "Field id {} at line {} overrides a method", name, line)
            }
            MethodOverridesField(line, name) => {
                write!(f, "Method id {} at line {} overrides a field", name, line)
            }
            MethodUsedAsValue(line, name) => {
                write!(f, "Method id {} at line {} used as a value", name, line)
            }
            NotCallable(line, name) => {
                write!(f, "Fun id {} at line {} is not callable", name, line)
            }
            NotAnObject(line, name) => {
                write!(f, "Obj id {} at line {} is not an object", name, line)
            }
            TypeMismatch {
                line,
                expected,
                actual,
            } => write!(
                f,
                "Type error at line {} expected {} but found {}",
                line, expected, actual
            ),
            IncompatibleBranches {
                line,
                consequence,
                alternative,
            } => write!(
                f,
                "Type error at line {} branches {} and {} have no common ancestor",
                line, consequence, alternative
            ),
            IncomparableValues { line, left, right } => write!(
                f,
                "Type error at line {} values {} and {} cannot be compared",
                line, left, right
            ),
            WrongNumberOfArguments {
                line,
                name,
                expected,
                actual,
            } => write!(
                f,
                "Fun id {} at line {} takes {} arguments but was provided {}",
                name, line, expected, actual
            ),
            InvalidOverride {
                line,
                class,
                member,
            } => write!(
                f,
                "Class id {} at line {} member {} overrides with an incompatible type",
                class, line, member
            ),
            FunctionTypedDeclaration(line, kind, name) => {
                write!(f, "{} id {} at line {} cannot have a function type", kind, name, line)
            }
        }
    }
}

pub enum DiagnosticLevel {
    Error,
    Warning,
    Info,
}
