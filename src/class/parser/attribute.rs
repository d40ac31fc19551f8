use std::sync::Arc;

use tracing::debug;

use super::{ParseOptions, UnknownAttributePolicy};
use crate::{
    class::{AttributeInfo, CodeAttribute, ConstantPool, LineNumberTableItem},
    consts::{EXCEPTION_TABLE_ENTRY_SIZE, MAX_CODE_LENGTH},
    error::{Error, Result},
    reader::ByteReader,
};

/// Reads a u16 count followed by that many attributes.
pub fn parse_attributes(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
    options: &ParseOptions,
) -> Result<Vec<AttributeInfo>> {
    let attributes_count = reader.read_u16()?;
    (0..attributes_count)
        .map(|_| parse_attribute(reader, pool, options))
        .collect()
}

/// Reads one class, field or method attribute.
pub fn parse_attribute(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
    options: &ParseOptions,
) -> Result<AttributeInfo> {
    parse_attribute_in(reader, pool, options, false)
}

fn parse_attribute_in(
    reader: &mut ByteReader<'_>,
    pool: &ConstantPool,
    options: &ParseOptions,
    in_code: bool,
) -> Result<AttributeInfo> {
    let offset = reader.position();
    let attribute_name_index = reader.read_u16()?;
    let attribute_length = reader.read_u32()?;
    let attribute_name = pool.get_utf8(attribute_name_index)?;

    let mut input = reader.sub_reader(attribute_length as usize)?;

    let attribute_info = match &**attribute_name {
        "ConstantValue" => AttributeInfo::ConstantValue {
            value_index: input.read_u16()?,
        },
        "Code" if in_code => return Err(Error::NestedCodeAttribute { offset }),
        "Code" => AttributeInfo::Code(parse_code_attribute(&mut input, pool, options)?),
        "LineNumberTable" => {
            let line_number_table_length = input.read_u16()?;
            let line_number_table = (0..line_number_table_length)
                .map(|_| -> Result<LineNumberTableItem> {
                    Ok(LineNumberTableItem {
                        start_pc: input.read_u16()?,
                        line_number: input.read_u16()?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            AttributeInfo::LineNumberTable(line_number_table)
        }
        "SourceFile" => AttributeInfo::SourceFile {
            name_index: input.read_u16()?,
        },
        "Signature" => AttributeInfo::Signature {
            signature_index: input.read_u16()?,
        },
        "Deprecated" => AttributeInfo::Deprecated,
        _ => match options.unknown_attributes {
            UnknownAttributePolicy::Skip => {
                debug!(
                    name = %attribute_name,
                    length = attribute_length,
                    offset = input.position(),
                    "skipping unknown attribute"
                );
                let info = input.read_bytes(attribute_length as usize)?;
                AttributeInfo::Unknown {
                    name: Arc::clone(attribute_name),
                    info: info.to_vec(),
                }
            }
            UnknownAttributePolicy::Reject => {
                return Err(Error::UnsupportedAttribute {
                    name: Arc::clone(attribute_name),
                });
            }
        },
    };

    if !input.is_empty() {
        return Err(Error::AttributeLengthMismatch {
            name: Arc::clone(attribute_name),
            declared: attribute_length,
            consumed: attribute_length as usize - input.remaining(),
        });
    }

    Ok(attribute_info)
}

fn parse_code_attribute(
    input: &mut ByteReader<'_>,
    pool: &ConstantPool,
    options: &ParseOptions,
) -> Result<CodeAttribute> {
    let max_stack = input.read_u16()?;
    let max_locals = input.read_u16()?;

    let code_length = input.read_u32()?;
    if code_length == 0 || code_length >= MAX_CODE_LENGTH {
        return Err(Error::InvalidCodeLength {
            length: code_length,
        });
    }
    let code = Arc::from(input.read_bytes(code_length as usize)?);

    // start_pc, end_pc, handler_pc and catch_type are not modeled
    let exception_table_length = input.read_u16()?;
    input.skip(exception_table_length as usize * EXCEPTION_TABLE_ENTRY_SIZE)?;

    let attributes_count = input.read_u16()?;
    let attributes = (0..attributes_count)
        .map(|_| parse_attribute_in(input, pool, options, true))
        .collect::<Result<Vec<_>>>()?;

    Ok(CodeAttribute {
        max_stack,
        max_locals,
        code,
        attributes,
    })
}
