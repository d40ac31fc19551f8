//! Byte builders for synthetic class files.

#[derive(Debug, Default, Clone)]
pub(crate) struct PoolBytes {
    bytes: Vec<u8>,
    count: u16,
}

impl PoolBytes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn utf8(self, text: &str) -> Self {
        let mut entry = vec![1];
        entry.extend_from_slice(&(text.len() as u16).to_be_bytes());
        entry.extend_from_slice(text.as_bytes());
        self.raw(&entry)
    }

    pub(crate) fn integer(self, value: i32) -> Self {
        let mut entry = vec![3];
        entry.extend_from_slice(&value.to_be_bytes());
        self.raw(&entry)
    }

    pub(crate) fn float(self, value: f32) -> Self {
        let mut entry = vec![4];
        entry.extend_from_slice(&value.to_bits().to_be_bytes());
        self.raw(&entry)
    }

    pub(crate) fn class(self, name_index: u16) -> Self {
        self.indices(7, &[name_index])
    }

    pub(crate) fn string(self, string_index: u16) -> Self {
        self.indices(8, &[string_index])
    }

    pub(crate) fn field_ref(self, class_index: u16, name_and_type_index: u16) -> Self {
        self.indices(9, &[class_index, name_and_type_index])
    }

    pub(crate) fn method_ref(self, class_index: u16, name_and_type_index: u16) -> Self {
        self.indices(10, &[class_index, name_and_type_index])
    }

    pub(crate) fn interface_method_ref(self, class_index: u16, name_and_type_index: u16) -> Self {
        self.indices(11, &[class_index, name_and_type_index])
    }

    pub(crate) fn name_and_type(self, name_index: u16, descriptor_index: u16) -> Self {
        self.indices(12, &[name_index, descriptor_index])
    }

    /// Appends one pre-encoded entry.
    pub(crate) fn raw(mut self, entry: &[u8]) -> Self {
        self.bytes.extend_from_slice(entry);
        self.count += 1;
        self
    }

    pub(crate) fn count(&self) -> u16 {
        self.count
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn indices(self, tag: u8, indices: &[u16]) -> Self {
        let mut entry = vec![tag];
        for index in indices {
            entry.extend_from_slice(&index.to_be_bytes());
        }
        self.raw(&entry)
    }
}

/// Encodes one attribute with a length computed from `payload`.
pub(crate) fn attribute(name_index: u16, payload: &[u8]) -> Vec<u8> {
    let mut bytes = name_index.to_be_bytes().to_vec();
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

/// Encodes a Code attribute payload with an empty exception table.
pub(crate) fn code_payload(code: &[u8], nested: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = vec![0, 2, 0, 1];
    payload.extend_from_slice(&(code.len() as u32).to_be_bytes());
    payload.extend_from_slice(code);
    payload.extend_from_slice(&[0, 0]);
    payload.extend_from_slice(&(nested.len() as u16).to_be_bytes());
    for attribute in nested {
        payload.extend_from_slice(attribute);
    }
    payload
}

#[derive(Debug, Clone)]
pub(crate) struct Member {
    pub(crate) access_flags: u16,
    pub(crate) name_index: u16,
    pub(crate) descriptor_index: u16,
    pub(crate) attributes: Vec<Vec<u8>>,
}

/// A whole class file.
#[derive(Debug, Clone)]
pub(crate) struct ClassBytes {
    pub(crate) magic: u32,
    pub(crate) minor_version: u16,
    pub(crate) major_version: u16,
    pub(crate) pool: PoolBytes,
    pub(crate) access_flags: u16,
    pub(crate) this_class: u16,
    pub(crate) super_class: u16,
    pub(crate) interfaces: Vec<u16>,
    pub(crate) fields: Vec<Member>,
    pub(crate) methods: Vec<Member>,
    pub(crate) attributes: Vec<Vec<u8>>,
}

impl ClassBytes {
    pub(crate) fn new(pool: PoolBytes, this_class: u16, super_class: u16) -> Self {
        ClassBytes {
            magic: 0xCAFE_BABE,
            minor_version: 0,
            major_version: 52,
            pool,
            access_flags: 0x0021,
            this_class,
            super_class,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            attributes: vec![],
        }
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&self.magic.to_be_bytes());
        bytes.extend_from_slice(&self.minor_version.to_be_bytes());
        bytes.extend_from_slice(&self.major_version.to_be_bytes());
        bytes.extend_from_slice(&(self.pool.count() + 1).to_be_bytes());
        bytes.extend_from_slice(&self.pool.into_bytes());
        bytes.extend_from_slice(&self.access_flags.to_be_bytes());
        bytes.extend_from_slice(&self.this_class.to_be_bytes());
        bytes.extend_from_slice(&self.super_class.to_be_bytes());
        bytes.extend_from_slice(&(self.interfaces.len() as u16).to_be_bytes());
        for interface in &self.interfaces {
            bytes.extend_from_slice(&interface.to_be_bytes());
        }
        for members in [&self.fields, &self.methods] {
            bytes.extend_from_slice(&(members.len() as u16).to_be_bytes());
            for member in members {
                bytes.extend_from_slice(&member.access_flags.to_be_bytes());
                bytes.extend_from_slice(&member.name_index.to_be_bytes());
                bytes.extend_from_slice(&member.descriptor_index.to_be_bytes());
                push_attributes(&mut bytes, &member.attributes);
            }
        }
        push_attributes(&mut bytes, &self.attributes);
        bytes
    }
}

fn push_attributes(bytes: &mut Vec<u8>, attributes: &[Vec<u8>]) {
    bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
    for attribute in attributes {
        bytes.extend_from_slice(attribute);
    }
}
