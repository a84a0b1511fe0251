mod instruction;
pub use self::instruction::*;

mod generation_error;
pub use self::generation_error::*;

mod generator;
pub use self::generator::*;
