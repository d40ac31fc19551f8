use std::{fmt, sync::Arc};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ConstantPoolEntry {
    Utf8(Arc<str>),
    Integer(i32),
    Float(f32),
    Class {
        name_index: u16,
    },
    String {
        string_index: u16,
    },
    FieldRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    InterfaceMethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    MethodHandle {
        reference_kind: u8,
        reference_index: u16,
    },
    MethodType {
        descriptor_index: u16,
    },
    InvokeDynamic {
        bootstrap_method_attr_index: u16,
        name_and_type_index: u16,
    },
}

impl ConstantPoolEntry {
    pub fn tag(&self) -> u8 {
        match self {
            ConstantPoolEntry::Utf8(_) => 1,
            ConstantPoolEntry::Integer(_) => 3,
            ConstantPoolEntry::Float(_) => 4,
            ConstantPoolEntry::Class { .. } => 7,
            ConstantPoolEntry::String { .. } => 8,
            ConstantPoolEntry::FieldRef { .. } => 9,
            ConstantPoolEntry::MethodRef { .. } => 10,
            ConstantPoolEntry::InterfaceMethodRef { .. } => 11,
            ConstantPoolEntry::NameAndType { .. } => 12,
            ConstantPoolEntry::MethodHandle { .. } => 15,
            ConstantPoolEntry::MethodType { .. } => 16,
            ConstantPoolEntry::InvokeDynamic { .. } => 18,
        }
    }

    /// Name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ConstantPoolEntry::Utf8(_) => "Utf8",
            ConstantPoolEntry::Integer(_) => "Integer",
            ConstantPoolEntry::Float(_) => "Float",
            ConstantPoolEntry::Class { .. } => "Class",
            ConstantPoolEntry::String { .. } => "String",
            ConstantPoolEntry::FieldRef { .. } => "Fieldref",
            ConstantPoolEntry::MethodRef { .. } => "Methodref",
            ConstantPoolEntry::InterfaceMethodRef { .. } => "InterfaceMethodref",
            ConstantPoolEntry::NameAndType { .. } => "NameAndType",
            ConstantPoolEntry::MethodHandle { .. } => "MethodHandle",
            ConstantPoolEntry::MethodType { .. } => "MethodType",
            ConstantPoolEntry::InvokeDynamic { .. } => "InvokeDynamic",
        }
    }
}

impl fmt::Display for ConstantPoolEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<18} ", self.kind())?;
        match self {
            ConstantPoolEntry::Utf8(text) => write!(f, "{text:?}"),
            ConstantPoolEntry::Integer(value) => write!(f, "{value}"),
            ConstantPoolEntry::Float(value) => write!(f, "{value}f"),
            ConstantPoolEntry::Class { name_index } => write!(f, "#{name_index}"),
            ConstantPoolEntry::String { string_index } => write!(f, "#{string_index}"),
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            }
            | ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            } => write!(f, "#{class_index}.#{name_and_type_index}"),
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => write!(f, "#{name_index}:#{descriptor_index}"),
            ConstantPoolEntry::MethodHandle {
                reference_kind,
                reference_index,
            } => write!(f, "{reference_kind}:#{reference_index}"),
            ConstantPoolEntry::MethodType { descriptor_index } => write!(f, "#{descriptor_index}"),
            ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            } => write!(f, "#{bootstrap_method_attr_index}:#{name_and_type_index}"),
        }
    }
}

/// The constant pool of a class file.
///
/// Entries are stored in stream order; the entry at position `i` has pool
/// index `i + 1`. Index 0 never names an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<ConstantPoolEntry>,
}

impl ConstantPool {
    pub fn new(entries: Vec<ConstantPoolEntry>) -> Self {
        ConstantPool { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ConstantPoolEntry] {
        &self.entries
    }

    /// Iterates over `(pool index, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &ConstantPoolEntry)> + '_ {
        (1u16..).zip(self.entries.iter())
    }

    pub fn get(&self, index: u16) -> Result<&ConstantPoolEntry> {
        index
            .checked_sub(1)
            .and_then(|i| self.entries.get(i as usize))
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn get_utf8(&self, index: u16) -> Result<&Arc<str>> {
        match self.get(index)? {
            ConstantPoolEntry::Utf8(text) => Ok(text),
            other => Err(mismatch(index, "Utf8", other)),
        }
    }

    /// Returns the `name_index` of the `Class` entry at `index`.
    pub fn get_class_name_index(&self, index: u16) -> Result<u16> {
        match self.get(index)? {
            ConstantPoolEntry::Class { name_index } => Ok(*name_index),
            other => Err(mismatch(index, "Class", other)),
        }
    }

    /// Returns `(name_index, descriptor_index)` of the `NameAndType` entry at `index`.
    pub fn get_name_and_type(&self, index: u16) -> Result<(u16, u16)> {
        match self.get(index)? {
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            } => Ok((*name_index, *descriptor_index)),
            other => Err(mismatch(index, "NameAndType", other)),
        }
    }

    /// Name of the class at the `Class` entry `index`, without any further checks.
    pub fn class_name(&self, index: u16) -> Result<&Arc<str>> {
        self.get_utf8(self.get_class_name_index(index)?)
    }
}

pub(crate) fn mismatch(index: u16, expected: &'static str, found: &ConstantPoolEntry) -> Error {
    Error::InvalidConstantPoolReference {
        index,
        expected,
        found: found.kind(),
    }
}
