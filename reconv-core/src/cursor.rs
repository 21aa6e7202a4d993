//! Read position over a pattern
//!
//! The cursor only moves forward, except through [`Cursor::restore`] which
//! returns it to a [`Checkpoint`] taken earlier in the same pass.

use crate::escape::utf8_len;

/// A saved cursor position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// Byte cursor over the input pattern
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`
    pub fn new(input: &'a str) -> Self {
        Cursor {
            input: input.as_bytes(),
            position: 0,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether all input has been consumed
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Peek at the next byte without consuming it
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Peek `n` bytes past the next one
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.input.get(self.position + n).copied()
    }

    /// Consume and return the next byte
    pub fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Consume the next byte if it equals `expected`
    pub fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Consume up to `len` bytes and return them
    pub fn take(&mut self, len: usize) -> &'a [u8] {
        let end = (self.position + len).min(self.input.len());
        let slice = &self.input[self.position..end];
        self.position = end;
        slice
    }

    /// Decode the whole character starting at `position`
    pub fn char_at(&self, position: usize) -> Option<char> {
        let lead = *self.input.get(position)?;
        let end = (position + utf8_len(lead)).min(self.input.len());
        std::str::from_utf8(&self.input[position..end])
            .ok()?
            .chars()
            .next()
    }

    /// Remember the current position
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.position)
    }

    /// Return to a remembered position
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_and_peek() {
        let mut cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.peek_at(1), Some(b'b'));
        assert_eq!(cursor.bump(), Some(b'a'));
        assert_eq!(cursor.bump(), Some(b'b'));
        assert!(cursor.is_eof());
        assert_eq!(cursor.bump(), None);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_char_at() {
        let cursor = Cursor::new("a\\é");
        assert_eq!(cursor.char_at(0), Some('a'));
        assert_eq!(cursor.char_at(2), Some('é'));
        assert_eq!(cursor.char_at(3), None);
        assert_eq!(cursor.char_at(4), None);
    }

    #[test]
    fn test_checkpoint_restore() {
        let mut cursor = Cursor::new("abc");
        cursor.bump();
        let cp = cursor.checkpoint();
        cursor.bump();
        cursor.bump();
        cursor.restore(cp);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.peek(), Some(b'b'));
    }

    #[test]
    fn test_eat_and_take() {
        let mut cursor = Cursor::new("xyz");
        assert!(!cursor.eat(b'y'));
        assert!(cursor.eat(b'x'));
        assert_eq!(cursor.take(5), b"yz");
        assert!(cursor.is_eof());
    }
}
