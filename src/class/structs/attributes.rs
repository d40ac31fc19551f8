use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeInfo {
    ConstantValue { value_index: u16 },
    Code(CodeAttribute),
    LineNumberTable(Vec<LineNumberTableItem>),
    SourceFile { name_index: u16 },
    Signature { signature_index: u16 },
    Deprecated,
    /// An attribute this parser has no decoder for, kept as raw bytes.
    Unknown { name: Arc<str>, info: Vec<u8> },
}

impl AttributeInfo {
    pub fn name(&self) -> &str {
        match self {
            AttributeInfo::ConstantValue { .. } => "ConstantValue",
            AttributeInfo::Code(_) => "Code",
            AttributeInfo::LineNumberTable(_) => "LineNumberTable",
            AttributeInfo::SourceFile { .. } => "SourceFile",
            AttributeInfo::Signature { .. } => "Signature",
            AttributeInfo::Deprecated => "Deprecated",
            AttributeInfo::Unknown { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Arc<[u8]>,
    pub attributes: Vec<AttributeInfo>,
}

impl CodeAttribute {
    pub fn line_number_table(&self) -> impl Iterator<Item = &LineNumberTableItem> {
        self.attributes.iter().flat_map(|attribute| match attribute {
            AttributeInfo::LineNumberTable(table) => table.as_slice(),
            _ => &[],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumberTableItem {
    pub start_pc: u16,
    pub line_number: u16,
}
