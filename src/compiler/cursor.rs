//! # Cursor
//!
//! Byte-by-byte navigation through META II grammar source with line
//! tracking for diagnostics.
//!
//! Grammar source is ASCII (per the Non-goals, Unicode handling is out of
//! scope), so the cursor operates on a byte slice rather than `Vec<char>`.

pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.bytes.get(self.pos).map(|&b| b as char)
    }

    /// The remaining source, for prefix-matching dot-keywords.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }

    pub fn advance(&mut self) -> Option<char> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b as char)
    }

    /// Advance past `n` bytes, known not to contain a newline (used after a
    /// prefix match against a fixed ASCII keyword).
    pub fn advance_by(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Skip spaces, tabs and newlines, counting lines as it goes.
    pub fn skip_white(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }
}
