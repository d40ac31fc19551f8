use nom::{
    IResult,
    bytes::complete::take,
    number::complete::{be_u16, be_u32, u8},
};

use crate::error::{Error, Result};

type NomResult<'a, T> = IResult<&'a [u8], T, nom::error::Error<&'a [u8]>>;

/// Sequential big-endian reader over an in-memory class file.
///
/// Offsets reported in errors are absolute, also for readers split off with
/// [`ByteReader::sub_reader`].
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        ByteReader { input, offset: 0 }
    }

    /// Absolute position of the cursor.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.advance(1, u8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.advance(2, be_u16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.advance(4, be_u32)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.advance(len, take(len))
    }

    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Splits off the next `len` bytes as a bounded reader and advances past them.
    pub fn sub_reader(&mut self, len: usize) -> Result<ByteReader<'a>> {
        let offset = self.offset;
        let input = self.read_bytes(len)?;
        Ok(ByteReader { input, offset })
    }

    fn advance<T>(
        &mut self,
        needed: usize,
        parser: impl FnOnce(&'a [u8]) -> NomResult<'a, T>,
    ) -> Result<T> {
        match parser(self.input) {
            Ok((rest, value)) => {
                self.offset += self.input.len() - rest.len();
                self.input = rest;
                Ok(value)
            }
            Err(_) => Err(Error::UnexpectedEof {
                offset: self.offset,
                needed: needed - self.input.len().min(needed),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_endian() {
        let mut reader = ByteReader::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16().unwrap(), 0x0203);
        assert_eq!(reader.read_u32().unwrap(), 0x04050607);
        assert_eq!(reader.position(), 7);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_eof_keeps_cursor() {
        let mut reader = ByteReader::new(&[0xaa, 0xbb, 0xcc]);
        reader.skip(1).unwrap();
        let err = reader.read_u32().unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedEof {
                offset: 1,
                needed: 2
            }
        ));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0xbbcc);
    }

    #[test]
    fn test_sub_reader_offsets() {
        let mut reader = ByteReader::new(&[0, 0, 0x12, 0x34, 0x56]);
        reader.skip(2).unwrap();
        let mut sub = reader.sub_reader(2).unwrap();
        assert_eq!(reader.position(), 4);
        assert_eq!(sub.position(), 2);
        assert_eq!(sub.read_u16().unwrap(), 0x1234);
        assert!(matches!(
            sub.read_u8(),
            Err(Error::UnexpectedEof { offset: 4, .. })
        ));
    }
}
