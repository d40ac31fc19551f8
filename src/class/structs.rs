use std::sync::Arc;

mod attributes;
mod constant_pool;
pub(crate) mod java_str;

pub use attributes::*;
pub use constant_pool::*;

use crate::{
    consts::{ClassAccessFlag, FieldAccessFlag, MethodAccessFlag},
    error::Result,
};

#[derive(Debug, Clone)]
pub struct ClassFile {
    pub magic: u32,
    pub minor_version: u16,
    pub major_version: u16,
    pub constant_pool: ConstantPool,
    pub access_flags: ClassAccessFlag,
    pub this_class: u16,
    /// 0 when the class has no superclass.
    pub super_class: u16,
    pub interfaces: Vec<ClassConstant>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ClassFile {
    pub fn class_name(&self) -> Result<&Arc<str>> {
        self.constant_pool.class_name(self.this_class)
    }

    pub fn super_class_name(&self) -> Result<Option<&Arc<str>>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.constant_pool.class_name(self.super_class).map(Some)
    }

    pub fn interface_names(&self) -> Result<Vec<&Arc<str>>> {
        self.interfaces
            .iter()
            .map(|interface| self.constant_pool.get_utf8(interface.name_index))
            .collect()
    }

    pub fn source_file(&self) -> Result<Option<&Arc<str>>> {
        for attribute in &self.attributes {
            if let AttributeInfo::SourceFile { name_index } = attribute {
                return self.constant_pool.get_utf8(*name_index).map(Some);
            }
        }
        Ok(None)
    }
}

/// A validated reference to a `Class` entry of the constant pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassConstant {
    pub index: u16,
    pub name_index: u16,
}

#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub access_flags: FieldAccessFlag,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub access_flags: MethodAccessFlag,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
    pub fn code(&self) -> Option<&CodeAttribute> {
        self.attributes.iter().find_map(|attribute| match attribute {
            AttributeInfo::Code(code) => Some(code),
            _ => None,
        })
    }
}
