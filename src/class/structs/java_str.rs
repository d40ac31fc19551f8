use std::{borrow::Cow, sync::Arc};

use cesu8_str::java as cesu8_java;

use crate::error::{Error, Result};

/// Decodes the modified UTF-8 payload of a `CONSTANT_Utf8` entry.
///
/// `offset` is the absolute position of `bytes`, reported on failure.
pub(crate) fn decode_modified_utf8(bytes: &[u8], offset: usize) -> Result<Arc<str>> {
    // ASCII without NUL is identical in both encodings
    if bytes.iter().all(|&b| b != 0 && b < 0x80) {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Ok(Arc::from(text));
        }
    }

    let java_str =
        cesu8_java::JavaStr::from_java_cesu8(bytes).map_err(|_| Error::InvalidUtf8 { offset })?;
    Ok(match cesu8_java::from_java_cesu8(java_str) {
        Cow::Borrowed(text) => Arc::from(text),
        Cow::Owned(text) => Arc::from(text),
    })
}
