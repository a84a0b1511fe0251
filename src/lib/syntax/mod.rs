mod tree;
pub use self::tree::*;

#[cfg(test)]
pub mod test_utils;
