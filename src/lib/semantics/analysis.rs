use crate::semantics::*;
use crate::syntax::*;
use crate::*;

/// The resolved program with its side tables and accumulated diagnostics.
/// Tables are keyed by node [`Id`]; the tree is never annotated in place.
pub struct Analysis {
    pub program: Arc<Program>,
    pub hierarchy: ClassHierarchy,
    pub diagnostics: Vec<Diagnostic>,
    pub(crate) class_members: HashMap<String, HashMap<String, SymbolEntry>>,
    pub(crate) class_entries: HashMap<String, SymbolEntry>,
    pub(crate) resolutions: HashMap<Id, Resolution>,
    pub(crate) method_resolutions: HashMap<Id, SymbolEntry>,
    pub(crate) member_offsets: HashMap<Id, i64>,
}

impl Analysis {
    pub fn resolve(program: Arc<Program>) -> Analysis {
        Resolver::new().resolve(program)
    }

    /// Runs the type checker, appending to the diagnostics accumulated
    /// during resolution.
    pub fn check(&mut self) -> &[Diagnostic] {
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        TypeChecker::check(self, &mut diagnostics);
        self.diagnostics = diagnostics;
        &self.diagnostics
    }

    pub fn failed(&self) -> bool {
        Diagnostic::failed(&self.diagnostics)
    }

    pub fn resolution(&self, id: &Id) -> Option<&Resolution> {
        self.resolutions.get(id)
    }

    pub fn method_resolution(&self, id: &Id) -> Option<&SymbolEntry> {
        self.method_resolutions.get(id)
    }

    pub fn member_offset(&self, id: &Id) -> Option<i64> {
        self.member_offsets.get(id).copied()
    }

    pub fn class_members(&self, class: &str) -> Option<&HashMap<String, SymbolEntry>> {
        self.class_members.get(class)
    }

    pub fn class_entry(&self, class: &str) -> Option<&SymbolEntry> {
        self.class_entries.get(class)
    }
}
