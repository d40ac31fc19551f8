mod parser;
mod structs;
#[cfg(test)]
pub(crate) mod testing;

pub use parser::*;
pub use structs::*;
