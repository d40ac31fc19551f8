mod resolver;
mod structs;

pub use resolver::*;
pub use structs::*;
