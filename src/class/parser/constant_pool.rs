use tracing::trace;

use crate::{
    class::{ConstantPool, ConstantPoolEntry, structs::java_str::decode_modified_utf8},
    error::{Error, Result},
    reader::ByteReader,
};

impl ConstantPool {
    /// Reads `count` entries. Callers pass `constant_pool_count - 1`.
    pub fn parse(count: u16, reader: &mut ByteReader<'_>) -> Result<Self> {
        let mut entries = Vec::with_capacity(count as usize);

        for i in 0..count {
            let index = i + 1;
            let entry = parse_constant(index, reader)?;
            trace!(index, %entry, "constant");
            entries.push(entry);
        }

        Ok(ConstantPool::new(entries))
    }
}

fn parse_constant(index: u16, reader: &mut ByteReader<'_>) -> Result<ConstantPoolEntry> {
    let tag = reader.read_u8()?;
    let cp_info = match tag {
        1 => {
            let length = reader.read_u16()?;
            let offset = reader.position();
            let bytes = reader.read_bytes(length as usize)?;
            ConstantPoolEntry::Utf8(decode_modified_utf8(bytes, offset)?)
        }
        3 => ConstantPoolEntry::Integer(reader.read_u32()? as i32),
        4 => ConstantPoolEntry::Float(f32::from_bits(reader.read_u32()?)),
        7 => ConstantPoolEntry::Class {
            name_index: reader.read_u16()?,
        },
        8 => ConstantPoolEntry::String {
            string_index: reader.read_u16()?,
        },
        9 => {
            let (class_index, name_and_type_index) = (reader.read_u16()?, reader.read_u16()?);
            ConstantPoolEntry::FieldRef {
                class_index,
                name_and_type_index,
            }
        }
        10 => {
            let (class_index, name_and_type_index) = (reader.read_u16()?, reader.read_u16()?);
            ConstantPoolEntry::MethodRef {
                class_index,
                name_and_type_index,
            }
        }
        11 => {
            let (class_index, name_and_type_index) = (reader.read_u16()?, reader.read_u16()?);
            ConstantPoolEntry::InterfaceMethodRef {
                class_index,
                name_and_type_index,
            }
        }
        12 => {
            let (name_index, descriptor_index) = (reader.read_u16()?, reader.read_u16()?);
            ConstantPoolEntry::NameAndType {
                name_index,
                descriptor_index,
            }
        }
        15 => {
            let (reference_kind, reference_index) = (reader.read_u8()?, reader.read_u16()?);
            ConstantPoolEntry::MethodHandle {
                reference_kind,
                reference_index,
            }
        }
        16 => ConstantPoolEntry::MethodType {
            descriptor_index: reader.read_u16()?,
        },
        18 => {
            let (bootstrap_method_attr_index, name_and_type_index) =
                (reader.read_u16()?, reader.read_u16()?);
            ConstantPoolEntry::InvokeDynamic {
                bootstrap_method_attr_index,
                name_and_type_index,
            }
        }
        // Long and Double (5, 6) take two slots and are not supported.
        _ => {
            return Err(Error::UnsupportedConstantTag {
                tag,
                index,
                offset: reader.position(),
            });
        }
    };
    Ok(cp_info)
}
