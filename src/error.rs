use std::sync::Arc;

/// An error which can occur while reading, parsing or resolving a class file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A generic I/O error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The input ended before a value could be read.
    #[error("unexpected end of input at byte {offset}: needed {needed} more byte(s)")]
    UnexpectedEof { offset: usize, needed: usize },

    /// The file does not start with `0xCAFEBABE`.
    #[error("invalid magic number {0:#010X}")]
    InvalidMagic(u32),

    #[error("unsupported class file version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    /// The tag byte at `offset` names no known constant pool entry.
    #[error("unsupported constant pool tag {tag} for entry #{index} at byte {offset}")]
    UnsupportedConstantTag { tag: u8, index: u16, offset: usize },

    /// A pool index points at an entry of the wrong kind.
    #[error("constant pool entry #{index} is {found}, expected {expected}")]
    InvalidConstantPoolReference {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    #[error("constant pool index #{index} out of range 1..={len}")]
    IndexOutOfRange { index: u16, len: usize },

    /// Only returned under
    /// [`UnknownAttributePolicy::Reject`](crate::UnknownAttributePolicy::Reject).
    #[error("unsupported attribute `{name}`")]
    UnsupportedAttribute { name: Arc<str> },

    #[error("array class `{name}` at #{index} cannot be resolved")]
    UnsupportedArrayClass { index: u16, name: Arc<str> },

    #[error("cyclic reference while resolving #{index}")]
    CyclicReference { index: u16 },

    #[error("constant pool entry #{index} ({kind}) cannot be resolved")]
    UnresolvableConstant { index: u16, kind: &'static str },

    #[error("malformed modified UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },

    /// Code arrays must be non-empty and shorter than 65536 bytes.
    #[error("invalid code length {length}")]
    InvalidCodeLength { length: u32 },

    /// `Code` may only appear on a method, never inside another `Code`.
    #[error("nested Code attribute at byte {offset}")]
    NestedCodeAttribute { offset: usize },

    #[error("attribute `{name}` declares {declared} byte(s) but {consumed} were consumed")]
    AttributeLengthMismatch {
        name: Arc<str>,
        declared: u32,
        consumed: usize,
    },

    #[error("{remaining} trailing byte(s) after class file at byte {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    #[error("invalid descriptor `{0}`")]
    InvalidDescriptor(Arc<str>),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, Error>;
