use crate::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Process-unique identifier for AST nodes that carry semantic annotations;
/// the annotations live in side tables keyed by it.
#[derive(Eq, PartialEq, Copy, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct Id(usize);

static NODE_GEN: AtomicUsize = AtomicUsize::new(0xffff);

impl Id {
    pub fn new() -> Id {
        Id(NODE_GEN.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for Id {
    fn default() -> Id {
        Id::new()
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let Id(value) = self;
        write!(f, "#{:X}", value)
    }
}
