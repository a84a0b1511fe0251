mod program;
pub use self::program::*;

mod declaration;
pub use self::declaration::*;

mod expression;
pub use self::expression::*;

mod type_expression;
pub use self::type_expression::*;
