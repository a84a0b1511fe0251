use crate::*;

/// Internal inconsistencies between resolution and generation, not user
/// errors; the driver refuses to generate code for a program that carries
/// diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationError {
    /// A use-site reached the generator without a recorded resolution.
    UnresolvedName(usize, String),
    /// A method call reached the generator without a resolved member.
    UnresolvedMethod(usize, String),
    /// A dispatch table position was never filled after all of a class's
    /// methods were placed.
    DispatchTableHole { class: String, offset: i64 },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use GenerationError::*;

        match self {
            UnresolvedName(line, name) => {
                write!(f, "no resolution for `{}` at line {}", name, line)
            }
            UnresolvedMethod(line, name) => {
                write!(f, "no resolved method for `{}` at line {}", name, line)
            }
            DispatchTableHole { class, offset } => write!(
                f,
                "dispatch table of class {} has a hole at offset {}",
                class, offset
            ),
        }
    }
}

impl std::error::Error for GenerationError {}
