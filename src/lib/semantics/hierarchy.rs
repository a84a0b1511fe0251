use crate::*;

/// Class → direct superclass map. Append-only for the duration of one
/// compilation; classes are declared before use, so the chain is acyclic.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    superclasses: HashMap<String, String>,
}

impl ClassHierarchy {
    pub fn new() -> ClassHierarchy {
        ClassHierarchy {
            superclasses: HashMap::new(),
        }
    }

    pub fn declare(&mut self, class: &str, superclass: &str) {
        self.superclasses.insert(class.into(), superclass.into());
    }

    pub fn superclass_of(&self, class: &str) -> Option<&str> {
        self.superclasses.get(class).map(String::as_str)
    }

    /// Walks the strict superclass chain of `class`, nearest first.
    pub fn ancestors<'a>(&'a self, class: &str) -> Ancestors<'a> {
        Ancestors {
            hierarchy: self,
            current: self.superclass_of(class),
        }
    }

    pub fn is_ancestor(&self, ancestor: &str, class: &str) -> bool {
        self.ancestors(class).any(|c| c == ancestor)
    }
}

pub struct Ancestors<'a> {
    hierarchy: &'a ClassHierarchy,
    current: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.current?;
        self.current = self.hierarchy.superclass_of(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestors_are_walked_nearest_first() {
        let mut hierarchy = ClassHierarchy::new();
        hierarchy.declare("C", "B");
        hierarchy.declare("B", "A");

        let chain: Vec<_> = hierarchy.ancestors("C").collect();
        assert_eq!(chain, vec!["B", "A"]);
        assert!(hierarchy.is_ancestor("A", "C"));
        assert!(!hierarchy.is_ancestor("C", "A"));
        assert!(!hierarchy.is_ancestor("C", "C"));
    }
}
