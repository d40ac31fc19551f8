use std::{fmt, sync::Arc};

use crate::{
    descriptor::{
        FieldDescriptor, MethodDescriptor, parse_field_descriptor, parse_method_descriptor,
    },
    error::Result,
};

/// A resolved `CONSTANT_Class`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ClassRef {
    pub name: Arc<str>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub name: Arc<str>,
    pub descriptor: Arc<str>,
    /// Shared with every other reference naming the same class entry.
    pub owner: Arc<ClassRef>,
}

impl FieldRef {
    pub fn field_type(&self) -> Result<FieldDescriptor> {
        parse_field_descriptor(&self.descriptor)
    }
}

/// A resolved `CONSTANT_Methodref` or `CONSTANT_InterfaceMethodref`.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub name: Arc<str>,
    pub descriptor: Arc<str>,
    pub owner: Arc<ClassRef>,
}

impl MethodRef {
    pub fn method_descriptor(&self) -> Result<MethodDescriptor> {
        parse_method_descriptor(&self.descriptor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicReference {
    Class(Arc<ClassRef>),
    Field(Arc<FieldRef>),
    Method(Arc<MethodRef>),
    InterfaceMethod(Arc<MethodRef>),
}

impl SymbolicReference {
    pub fn owner(&self) -> &Arc<ClassRef> {
        match self {
            SymbolicReference::Class(class) => class,
            SymbolicReference::Field(field) => &field.owner,
            SymbolicReference::Method(method) | SymbolicReference::InterfaceMethod(method) => {
                &method.owner
            }
        }
    }
}

impl fmt::Display for SymbolicReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolicReference::Class(class) => write!(f, "class {}", class.name),
            SymbolicReference::Field(field) => {
                write!(f, "field {}.{}:{}", field.owner.name, field.name, field.descriptor)
            }
            SymbolicReference::Method(method) => {
                write!(f, "method {}.{}{}", method.owner.name, method.name, method.descriptor)
            }
            SymbolicReference::InterfaceMethod(method) => write!(
                f,
                "interface method {}.{}{}",
                method.owner.name, method.name, method.descriptor
            ),
        }
    }
}
