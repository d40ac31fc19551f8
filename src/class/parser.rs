use std::ops::RangeInclusive;

use tracing::debug;

use crate::{
    class::{ClassConstant, ClassFile, ConstantPool, FieldInfo, MethodInfo},
    consts::{
        CLASS_MAGIC, ClassAccessFlag, FieldAccessFlag, MAX_SUPPORTED_MAJOR, MIN_SUPPORTED_MAJOR,
        MethodAccessFlag,
    },
    error::{Error, Result},
    reader::ByteReader,
};

mod attribute;
mod constant_pool;

pub use attribute::{parse_attribute, parse_attributes};

/// What to do with an attribute whose name has no decoder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownAttributePolicy {
    /// Keep the payload as [`AttributeInfo::Unknown`](crate::class::AttributeInfo::Unknown).
    #[default]
    Skip,
    /// Fail with [`Error::UnsupportedAttribute`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accepted major versions, inclusive.
    pub versions: RangeInclusive<u16>,
    pub unknown_attributes: UnknownAttributePolicy,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            versions: MIN_SUPPORTED_MAJOR..=MAX_SUPPORTED_MAJOR,
            unknown_attributes: UnknownAttributePolicy::default(),
        }
    }
}

impl ClassFile {
    /// Parses a complete class file; bytes after the class attributes are an error.
    pub fn from_bytes(input: &[u8], options: &ParseOptions) -> Result<ClassFile> {
        let mut reader = ByteReader::new(input);
        let class = Self::parse(&mut reader, options)?;
        if !reader.is_empty() {
            return Err(Error::TrailingBytes {
                offset: reader.position(),
                remaining: reader.remaining(),
            });
        }
        Ok(class)
    }

    pub fn parse(reader: &mut ByteReader<'_>, options: &ParseOptions) -> Result<ClassFile> {
        let magic = reader.read_u32()?;
        if magic != CLASS_MAGIC {
            return Err(Error::InvalidMagic(magic));
        }

        let minor_version = reader.read_u16()?;
        let major_version = reader.read_u16()?;
        if !options.versions.contains(&major_version) {
            return Err(Error::UnsupportedVersion {
                major: major_version,
                minor: minor_version,
            });
        }

        // malformed count of 0 is read as an empty pool
        let constant_pool_count = reader.read_u16()?;
        let constant_pool = ConstantPool::parse(constant_pool_count.saturating_sub(1), reader)?;

        let access_flags = reader.read_u16()?;
        let this_class = reader.read_u16()?;
        let super_class = reader.read_u16()?;
        let interfaces = parse_interfaces(reader, &constant_pool)?;
        let fields = parse_fields(reader, &constant_pool, options)?;
        let methods = parse_methods(reader, &constant_pool, options)?;
        let attributes = parse_attributes(reader, &constant_pool, options)?;

        debug!(
            major_version,
            minor_version,
            constants = constant_pool.len(),
            fields = fields.len(),
            methods = methods.len(),
            "parsed class file"
        );

        Ok(ClassFile {
            magic,
            minor_version,
            major_version,
            constant_pool,
            access_flags: ClassAccessFlag::from_bits_retain(access_flags),
            this_class,
            super_class,
            interfaces,
            fields,
            methods,
            attributes,
        })
    }
}

fn parse_interfaces(
    reader: &mut ByteReader<'_>,
    constant_pool: &ConstantPool,
) -> Result<Vec<ClassConstant>> {
    let interface_count = reader.read_u16()?;
    (0..interface_count)
        .map(|_| -> Result<ClassConstant> {
            let index = reader.read_u16()?;
            let name_index = constant_pool.get_class_name_index(index)?;
            Ok(ClassConstant { index, name_index })
        })
        .collect()
}

fn parse_fields(
    reader: &mut ByteReader<'_>,
    constant_pool: &ConstantPool,
    options: &ParseOptions,
) -> Result<Vec<FieldInfo>> {
    let field_count = reader.read_u16()?;
    (0..field_count)
        .map(|_| -> Result<FieldInfo> {
            let access_flags = reader.read_u16()?;
            let name_index = reader.read_u16()?;
            let descriptor_index = reader.read_u16()?;
            let attributes = parse_attributes(reader, constant_pool, options)?;
            Ok(FieldInfo {
                access_flags: FieldAccessFlag::from_bits_retain(access_flags),
                name_index,
                descriptor_index,
                attributes,
            })
        })
        .collect()
}

fn parse_methods(
    reader: &mut ByteReader<'_>,
    constant_pool: &ConstantPool,
    options: &ParseOptions,
) -> Result<Vec<MethodInfo>> {
    let methods_count = reader.read_u16()?;
    (0..methods_count)
        .map(|_| -> Result<MethodInfo> {
            let access_flags = reader.read_u16()?;
            let name_index = reader.read_u16()?;
            let descriptor_index = reader.read_u16()?;
            let attributes = parse_attributes(reader, constant_pool, options)?;
            Ok(MethodInfo {
                access_flags: MethodAccessFlag::from_bits_retain(access_flags),
                name_index,
                descriptor_index,
                attributes,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::class::{
        AttributeInfo,
        testing::{ClassBytes, Member, PoolBytes, attribute, code_payload},
    };

    // 1 Foo, 2 Class Foo, 3 java/lang/Object, 4 Class Object, 5 Runnable, 6 Class Runnable,
    // 7 value, 8 I, 9 run, 10 ()V, 11 Code, 12 LineNumberTable, 13 SourceFile, 14 Foo.java
    fn get_pool() -> PoolBytes {
        PoolBytes::new()
            .utf8("Foo")
            .class(1)
            .utf8("java/lang/Object")
            .class(3)
            .utf8("java/lang/Runnable")
            .class(5)
            .utf8("value")
            .utf8("I")
            .utf8("run")
            .utf8("()V")
            .utf8("Code")
            .utf8("LineNumberTable")
            .utf8("SourceFile")
            .utf8("Foo.java")
    }

    fn get_class() -> ClassBytes {
        let mut class = ClassBytes::new(get_pool(), 2, 4);
        class.interfaces = vec![6];
        class.fields = vec![Member {
            access_flags: 0x0002,
            name_index: 7,
            descriptor_index: 8,
            attributes: vec![],
        }];
        let line_numbers = attribute(12, &[0, 1, 0, 0, 0, 3]);
        class.methods = vec![Member {
            access_flags: 0x0001,
            name_index: 9,
            descriptor_index: 10,
            attributes: vec![attribute(11, &code_payload(&[0xb1], &[line_numbers]))],
        }];
        class.attributes = vec![attribute(13, &[0, 14])];
        class
    }

    #[test]
    fn test_parse_class() {
        let bytes = get_class().into_bytes();
        let class = ClassFile::from_bytes(&bytes, &ParseOptions::default()).unwrap();

        assert_eq!(class.magic, 0xCAFE_BABE);
        assert_eq!(class.major_version, 52);
        assert_eq!(class.constant_pool.len(), 14);
        assert!(class.access_flags.contains(ClassAccessFlag::PUBLIC | ClassAccessFlag::SUPER));
        assert_eq!(&**class.class_name().unwrap(), "Foo");
        assert_eq!(
            class.super_class_name().unwrap().map(|name| &**name),
            Some("java/lang/Object")
        );
        assert_eq!(
            class.interfaces,
            vec![ClassConstant {
                index: 6,
                name_index: 5
            }]
        );
        assert_eq!(&**class.interface_names().unwrap()[0], "java/lang/Runnable");
        assert_eq!(class.fields.len(), 1);
        assert!(class.fields[0].access_flags.contains(FieldAccessFlag::PRIVATE));

        let code = class.methods[0].code().unwrap();
        assert_eq!(&*code.code, &[0xb1]);
        assert_eq!(code.line_number_table().count(), 1);
        assert_eq!(
            class.source_file().unwrap().map(|name| &**name),
            Some("Foo.java")
        );
        assert_eq!(class.attributes, vec![AttributeInfo::SourceFile { name_index: 14 }]);
    }

    #[test]
    fn test_no_super_class() {
        let mut class = ClassBytes::new(PoolBytes::new().utf8("java/lang/Object").class(1), 2, 0);
        class.major_version = 45;
        let class = ClassFile::from_bytes(&class.into_bytes(), &ParseOptions::default()).unwrap();
        assert_eq!(class.super_class_name().unwrap(), None);
    }

    #[test]
    fn test_zero_constant_pool_count() {
        let mut bytes = ClassBytes::new(PoolBytes::new(), 0, 0).into_bytes();
        assert_eq!(&bytes[8..10], &[0, 1]);
        bytes[9] = 0;

        let class = ClassFile::from_bytes(&bytes, &ParseOptions::default()).unwrap();
        assert!(class.constant_pool.is_empty());
        assert!(matches!(
            class.class_name(),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_invalid_magic() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        let mut reader = ByteReader::new(&bytes);
        let err = ClassFile::parse(&mut reader, &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidMagic(0xDEAD_BEEF)));
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_unsupported_version() {
        for major in [44, 62] {
            let mut class = get_class();
            class.major_version = major;
            assert!(matches!(
                ClassFile::from_bytes(&class.into_bytes(), &ParseOptions::default()),
                Err(Error::UnsupportedVersion { major: m, minor: 0 }) if m == major
            ));
        }

        let mut class = get_class();
        class.major_version = 65;
        let options = ParseOptions {
            versions: 45..=65,
            ..Default::default()
        };
        assert!(ClassFile::from_bytes(&class.into_bytes(), &options).is_ok());
    }

    #[test]
    fn test_interface_must_be_class() {
        let mut class = get_class();
        class.interfaces = vec![5];
        assert!(matches!(
            ClassFile::from_bytes(&class.into_bytes(), &ParseOptions::default()),
            Err(Error::InvalidConstantPoolReference {
                index: 5,
                expected: "Class",
                found: "Utf8"
            })
        ));
    }

    #[test]
    fn test_truncated_and_trailing() {
        let bytes = get_class().into_bytes();
        assert!(matches!(
            ClassFile::from_bytes(&bytes[..bytes.len() - 1], &ParseOptions::default()),
            Err(Error::UnexpectedEof { .. })
        ));

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            ClassFile::from_bytes(&padded, &ParseOptions::default()),
            Err(Error::TrailingBytes { remaining: 1, offset }) if offset == bytes.len()
        ));
    }

    #[test]
    fn test_unknown_class_attribute_skipped() {
        let mut class = get_class();
        class.pool = get_pool().utf8("InnerClasses");
        class.attributes.push(attribute(15, &[0, 0]));
        let class = ClassFile::from_bytes(&class.into_bytes(), &ParseOptions::default()).unwrap();
        assert_eq!(class.attributes.len(), 2);
        assert_eq!(class.attributes[1].name(), "InnerClasses");
    }
}
