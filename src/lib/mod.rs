pub use std::collections::HashMap;
pub use std::collections::HashSet;
pub use std::fmt;
pub use std::sync::Arc;

#[macro_use]
extern crate log;

#[macro_use]
extern crate strum_macros;

mod id;
pub use self::id::*;

mod diagnostics;
pub use self::diagnostics::*;

pub mod syntax;

pub mod semantics;

pub mod generation;
