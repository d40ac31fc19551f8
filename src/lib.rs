//! Class file parsing and constant pool symbol resolution.
//!
//! [`ClassFile::from_bytes`] decodes a class file; [`resolve_all`] turns the
//! class and member references of its constant pool into shared
//! [`SymbolicReference`]s.

pub mod class;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod reader;
pub mod runtime;

pub use class::{ClassFile, ConstantPool, ConstantPoolEntry, ParseOptions, UnknownAttributePolicy};
pub use error::{Error, Result};
pub use loader::ClassSource;
pub use reader::ByteReader;
pub use runtime::{
    ClassRef, FieldRef, MethodRef, ResolutionCache, ResolvePolicy, SymbolicReference,
    get_or_resolve_class, resolve_all, resolve_all_with,
};
