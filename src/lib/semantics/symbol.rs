use crate::semantics::*;

/// One declared name: the nesting level of the declaring scope, the declared
/// type, and the storage offset. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub level: usize,
    pub type_: Type,
    pub offset: i64,
}

impl SymbolEntry {
    pub fn new(level: usize, type_: Type, offset: i64) -> SymbolEntry {
        SymbolEntry {
            level,
            type_,
            offset,
        }
    }
}

/// A use-site annotation: the entry the name resolved to, plus the nesting
/// level of the use-site. The difference of the two levels is the number of
/// static-chain hops.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entry: SymbolEntry,
    pub level: usize,
}
