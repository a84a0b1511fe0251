use crate::*;

pub trait Reporter {
    fn report(&self, diagnostics: &[Diagnostic]);
}

/// Prints every diagnostic on its own line, followed by the error count the
/// driver uses to decide whether code generation may run.
pub struct BasicReporter;

impl Reporter for BasicReporter {
    fn report(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            println!("{}", diagnostic);
        }
        println!("{} errors", Diagnostic::error_count(diagnostics));
    }
}
