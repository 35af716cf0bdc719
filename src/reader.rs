//! Byte-level lookahead/advance primitives the parser is built on.
//!
//! Mirrors a conventional hand-rolled recursive-descent reader: an owned
//! byte slice plus a cursor, with every lookahead returning a borrow into
//! the buffer rather than copying.

use crate::error::Error;

/// Distinguishes "ran out of input" from other parse failures so callers can
/// decide whether EOF is expected (e.g. end of a braces-omitted root object).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadError {
    Eof,
    InvalidUtf8,
}

pub(crate) type ReadResult<T> = std::result::Result<T, ReadError>;

pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub(crate) fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub(crate) fn peek(&self) -> ReadResult<u8> {
        self.buf.get(self.pos).copied().ok_or(ReadError::Eof)
    }

    pub(crate) fn peek2(&self) -> ReadResult<(u8, u8)> {
        let a = self.peek()?;
        let b = self.buf.get(self.pos + 1).copied().ok_or(ReadError::Eof)?;
        Ok((a, b))
    }

    /// Borrows the next `n` bytes without consuming them. Fails with `Eof`
    /// if fewer than `n` bytes remain.
    pub(crate) fn peek_n(&self, n: usize) -> ReadResult<&'a [u8]> {
        if self.pos + n > self.buf.len() {
            return Err(ReadError::Eof);
        }
        Ok(&self.buf[self.pos..self.pos + n])
    }

    pub(crate) fn starts_with(&self, tag: &[u8]) -> bool {
        self.remaining().starts_with(tag)
    }

    /// Decodes one UTF-8 code point at the cursor without consuming it.
    pub(crate) fn peek_rune(&self) -> ReadResult<(char, usize)> {
        if self.is_eof() {
            return Err(ReadError::Eof);
        }
        let rest = self.remaining();
        match std::str::from_utf8(&rest[..rest.len().min(4)]) {
            Ok(s) => {
                let c = s.chars().next().ok_or(ReadError::Eof)?;
                Ok((c, c.len_utf8()))
            }
            Err(e) => {
                // valid_up_to() == 0 means the very first byte is malformed
                // (or a truncated multi-byte sequence); otherwise the first
                // `valid_up_to` bytes already decode one or more runes.
                if e.valid_up_to() == 0 {
                    Err(ReadError::InvalidUtf8)
                } else {
                    let s = std::str::from_utf8(&rest[..e.valid_up_to()]).unwrap();
                    let c = s.chars().next().unwrap();
                    Ok((c, c.len_utf8()))
                }
            }
        }
    }

    pub(crate) fn consume(&mut self) -> ReadResult<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    pub(crate) fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }

    pub(crate) fn consume_rune(&mut self) -> ReadResult<char> {
        let (c, size) = self.peek_rune()?;
        self.advance(size);
        Ok(c)
    }
}

impl ReadError {
    pub(crate) fn into_error(self, offset: usize) -> Error {
        match self {
            ReadError::Eof => Error::Eof,
            ReadError::InvalidUtf8 => Error::InvalidUtf8 { offset },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_and_consume() {
        let mut r = Reader::new(b"ab");
        assert_eq!(r.peek().unwrap(), b'a');
        assert_eq!(r.consume().unwrap(), b'a');
        assert_eq!(r.peek().unwrap(), b'b');
        r.advance(1);
        assert!(r.is_eof());
        assert_eq!(r.peek(), Err(ReadError::Eof));
    }

    #[test]
    fn peek_rune_decodes_multibyte() {
        let r = Reader::new("é".as_bytes());
        let (c, size) = r.peek_rune().unwrap();
        assert_eq!(c, 'é');
        assert_eq!(size, 2);
    }

    #[test]
    fn peek_rune_rejects_invalid_utf8() {
        let r = Reader::new(&[0xff, 0xfe]);
        assert_eq!(r.peek_rune(), Err(ReadError::InvalidUtf8));
    }
}
