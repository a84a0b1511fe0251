mod symbol;
pub use self::symbol::*;

mod types;
pub use self::types::*;

mod hierarchy;
pub use self::hierarchy::*;

mod type_relations;
pub use self::type_relations::*;

mod lexical_scope;
pub use self::lexical_scope::*;

mod analysis;
pub use self::analysis::*;

mod resolver;
pub use self::resolver::*;

mod checker;
pub use self::checker::*;

mod relevance;
pub use self::relevance::*;
