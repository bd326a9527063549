//! Explicit byte-stream cursor.
//!
//! Every parse function in this crate takes a [`ByteCursor`] instead of
//! relying on the ambient position of the underlying stream. The cursor
//! borrows a `Read + Seek` source for the duration of one decode call and
//! tracks the absolute position itself, so offsets reported in errors are
//! always the offset where the failing read started.

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Seek, SeekFrom};

/// Longest NUL-terminated string accepted by [`ByteCursor::read_cstring_at`].
pub const MAX_CSTRING_LEN: usize = 1024;

/// Seekable little-endian reader with explicit position tracking.
#[derive(Debug)]
pub struct ByteCursor<'a, R> {
    inner: &'a mut R,
    position: u64,
}

impl<'a, R: Read + Seek> ByteCursor<'a, R> {
    /// Wrap a stream, starting at its current position.
    pub fn new(inner: &'a mut R) -> Result<Self> {
        let position = inner.stream_position()?;
        Ok(Self { inner, position })
    }

    /// Absolute offset of the next read.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Move to an absolute offset.
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        self.position = offset;
        Ok(())
    }

    /// Run a fixed-length read, mapping EOF to `TruncatedResource`.
    fn track<T>(
        &mut self,
        len: u64,
        context: &'static str,
        read: impl FnOnce(&mut R) -> io::Result<T>,
    ) -> Result<T> {
        let start = self.position;
        match read(&mut *self.inner) {
            Ok(value) => {
                self.position = start + len;
                Ok(value)
            },
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::TruncatedResource {
                offset: start,
                context,
            }),
            Err(e) => Err(Error::Io(e)),
        }
    }

    /// Read one byte.
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        self.track(1, context, |r| r.read_u8())
    }

    /// Read a little-endian u16.
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        self.track(2, context, |r| r.read_u16::<LittleEndian>())
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32> {
        self.track(4, context, |r| r.read_u32::<LittleEndian>())
    }

    /// Fill `buf` completely.
    pub fn read_into(&mut self, buf: &mut [u8], context: &'static str) -> Result<()> {
        let len = buf.len() as u64;
        self.track(len, context, |r| r.read_exact(buf))
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.read_into(&mut buf, context)?;
        Ok(buf)
    }

    /// Consume `len` bytes without keeping them.
    ///
    /// The bytes are actually read (not seeked over) so a short source is
    /// reported as truncated.
    pub fn skip(&mut self, len: u64, context: &'static str) -> Result<()> {
        let start = self.position;
        let copied = io::copy(&mut (&mut *self.inner).take(len), &mut io::sink())?;
        if copied < len {
            return Err(Error::TruncatedResource {
                offset: start,
                context,
            });
        }
        self.position = start + len;
        Ok(())
    }

    /// Read a NUL-terminated string at an absolute offset.
    ///
    /// The cursor position is restored afterwards. Returns `Ok(None)` when the
    /// source ends before the terminator or the string is longer than
    /// [`MAX_CSTRING_LEN`].
    pub fn read_cstring_at(&mut self, offset: u64) -> Result<Option<Vec<u8>>> {
        let saved = self.position;
        let result = self.read_cstring_from(offset);
        self.seek(saved)?;
        result
    }

    fn read_cstring_from(&mut self, offset: u64) -> Result<Option<Vec<u8>>> {
        self.seek(offset)?;
        let mut bytes = Vec::new();
        loop {
            match self.read_u8("string") {
                Ok(0) => return Ok(Some(bytes)),
                Ok(_) if bytes.len() == MAX_CSTRING_LEN => return Ok(None),
                Ok(b) => bytes.push(b),
                Err(Error::TruncatedResource { .. }) => return Ok(None),
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Stream that fails with a non-EOF error once `fail_at` is reached.
    struct FailingStream {
        inner: Cursor<Vec<u8>>,
        fail_at: u64,
    }

    impl Read for FailingStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.inner.position() >= self.fail_at {
                return Err(io::Error::new(io::ErrorKind::Other, "device error"));
            }
            let room = (self.fail_at - self.inner.position()) as usize;
            let len = buf.len().min(room);
            self.inner.read(&mut buf[..len])
        }
    }

    impl Seek for FailingStream {
        fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_little_endian_reads() {
        let mut src = Cursor::new(vec![0x4D, 0x5A, 0x78, 0x56, 0x34, 0x12, 0xFF]);
        let mut cursor = ByteCursor::new(&mut src).unwrap();

        assert_eq!(cursor.read_u16("magic").unwrap(), 0x5A4D);
        assert_eq!(cursor.read_u32("dword").unwrap(), 0x1234_5678);
        assert_eq!(cursor.read_u8("byte").unwrap(), 0xFF);
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_starts_at_stream_position() {
        let mut src = Cursor::new(vec![0u8; 16]);
        src.set_position(5);
        let cursor = ByteCursor::new(&mut src).unwrap();
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_short_read_is_truncation() {
        let mut src = Cursor::new(vec![0x01, 0x02, 0x03]);
        let mut cursor = ByteCursor::new(&mut src).unwrap();
        cursor.seek(2).unwrap();

        match cursor.read_u32("header") {
            Err(Error::TruncatedResource { offset, context }) => {
                assert_eq!(offset, 2);
                assert_eq!(context, "header");
            },
            other => panic!("expected truncation, got {:?}", other),
        }
    }

    #[test]
    fn test_stream_error_is_not_truncation() {
        let mut src = FailingStream {
            inner: Cursor::new(vec![0u8; 16]),
            fail_at: 6,
        };
        let mut cursor = ByteCursor::new(&mut src).unwrap();

        assert_eq!(cursor.read_u32("dword").unwrap(), 0);
        match cursor.read_u32("dword") {
            Err(Error::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::Other),
            other => panic!("expected I/O error, got {:?}", other),
        }

        cursor.seek(8).unwrap();
        let mut buf = [0u8; 4];
        assert!(matches!(cursor.read_into(&mut buf, "block"), Err(Error::Io(_))));
        assert!(matches!(cursor.skip(2, "padding"), Err(Error::Io(_))));
        assert!(matches!(cursor.read_cstring_at(10), Err(Error::Io(_))));
    }

    #[test]
    fn test_skip_detects_truncation() {
        let mut src = Cursor::new(vec![0u8; 10]);
        let mut cursor = ByteCursor::new(&mut src).unwrap();

        cursor.skip(4, "padding").unwrap();
        assert_eq!(cursor.position(), 4);
        assert!(matches!(
            cursor.skip(7, "padding"),
            Err(Error::TruncatedResource { offset: 4, .. })
        ));
    }

    #[test]
    fn test_read_array() {
        let mut src = Cursor::new(b"abcdef".to_vec());
        let mut cursor = ByteCursor::new(&mut src).unwrap();
        let arr: [u8; 4] = cursor.read_array("array").unwrap();
        assert_eq!(&arr, b"abcd");
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_cstring_restores_position() {
        let mut data = vec![0xAA, 0xBB, 0xCC, 0xDD];
        data.extend_from_slice(b"System\0");
        let mut src = Cursor::new(data);
        let mut cursor = ByteCursor::new(&mut src).unwrap();
        cursor.seek(1).unwrap();

        let name = cursor.read_cstring_at(4).unwrap();
        assert_eq!(name.as_deref(), Some(&b"System"[..]));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read_u8("byte").unwrap(), 0xBB);
    }

    #[test]
    fn test_cstring_without_terminator() {
        let mut src = Cursor::new(b"\0\0Fixedsys".to_vec());
        let mut cursor = ByteCursor::new(&mut src).unwrap();

        assert_eq!(cursor.read_cstring_at(2).unwrap(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cstring_past_end() {
        let mut src = Cursor::new(vec![0u8; 4]);
        let mut cursor = ByteCursor::new(&mut src).unwrap();
        assert_eq!(cursor.read_cstring_at(100).unwrap(), None);
    }

    #[test]
    fn test_cstring_too_long() {
        let mut data = vec![b'A'; MAX_CSTRING_LEN + 1];
        data.push(0);
        let mut src = Cursor::new(data);
        let mut cursor = ByteCursor::new(&mut src).unwrap();
        assert_eq!(cursor.read_cstring_at(0).unwrap(), None);
    }
}
