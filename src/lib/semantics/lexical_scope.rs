use crate::semantics::*;
use crate::*;

/// The stack of open scopes. The current nesting level is the index of the
/// top scope.
#[derive(Debug, Default)]
pub struct LexicalScope {
    scopes: Vec<HashMap<String, SymbolEntry>>,
}

impl LexicalScope {
    pub fn new() -> LexicalScope {
        LexicalScope { scopes: vec![] }
    }

    pub fn push(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Opens a scope pre-populated with inherited members.
    pub fn push_from(&mut self, members: HashMap<String, SymbolEntry>) {
        self.scopes.push(members);
    }

    pub fn pop(&mut self) -> HashMap<String, SymbolEntry> {
        self.scopes.pop().unwrap_or_default()
    }

    pub fn level(&self) -> usize {
        self.scopes.len().saturating_sub(1)
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// A displaced previous binding is returned so the caller can report a
    /// redeclaration; the new binding stays in place.
    pub fn declare(&mut self, name: &str, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(name.into(), entry))
    }

    pub fn declare_global(&mut self, name: &str, entry: SymbolEntry) -> Option<SymbolEntry> {
        self.scopes
            .first_mut()
            .and_then(|scope| scope.insert(name.into(), entry))
    }

    pub fn global(&self) -> Option<&HashMap<String, SymbolEntry>> {
        self.scopes.first()
    }

    pub fn current(&self) -> Option<&HashMap<String, SymbolEntry>> {
        self.scopes.last()
    }

    pub fn at_level(&self, level: usize) -> Option<&HashMap<String, SymbolEntry>> {
        self.scopes.get(level)
    }

    pub fn visible_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .scopes
            .iter()
            .flat_map(|scope| scope.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: usize, offset: i64) -> SymbolEntry {
        SymbolEntry::new(level, Type::Integer, offset)
    }

    #[test]
    fn inner_declarations_shadow_outer_ones_until_the_scope_closes() {
        let mut scope = LexicalScope::new();
        scope.push();
        scope.declare("x", entry(0, -2));
        scope.push();
        scope.declare("x", entry(1, -2));

        assert_eq!(scope.lookup("x").unwrap().level, 1);
        scope.pop();
        assert_eq!(scope.lookup("x").unwrap().level, 0);
    }

    #[test]
    fn redeclaration_reports_the_displaced_binding_and_keeps_the_new_one() {
        let mut scope = LexicalScope::new();
        scope.push();
        assert!(scope.declare("x", entry(0, -2)).is_none());
        let displaced = scope.declare("x", entry(0, -3));
        assert_eq!(displaced.unwrap().offset, -2);
        assert_eq!(scope.lookup("x").unwrap().offset, -3);
    }

    #[test]
    fn lookup_on_an_empty_stack_is_undeclared() {
        let scope = LexicalScope::new();
        assert!(scope.lookup("x").is_none());
    }
}
