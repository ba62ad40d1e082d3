//! # Machine
//!
//! Executes a loaded [`crate::asm::instr::Instruction`] array against an
//! input string. Two variants share almost everything but diverge on one
//! opcode: [`linear`] halts the whole run on the first failed `BE`;
//! [`backtracking`] rewinds to the enclosing rule's call site and lets it
//! try another alternative. Both share the primitive recognizers and frame
//! bookkeeping defined here.

pub mod backtracking;
pub mod linear;

/// Max nested `CLL` frames before execution aborts (`MAXFRAMES` in the
/// original C).
pub const MAX_FRAMES: usize = 64;

/// Max bytes a single primitive match (`TST`/`ID`/`NUM`/`SR`) may consume.
pub const MAX_TOKEN_LEN: usize = 256;

/// Per-call bookkeeping for one active `CLL`. `lab1`/`lab2` back the `GN1`
/// and `GN2` opcodes: a rule that never uses `*1`/`*2` never allocates one.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub ret_addr: usize,
    pub lab1: Option<u32>,
    pub lab2: Option<u32>,
}

/// A byte cursor over the input buffer, tracking the line number for
/// diagnostics the way the original machines' `skip_white` does.
pub struct InputCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    pub line: usize,
}

impl<'a> InputCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { bytes: input.as_bytes(), pos: 0, line: 1 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    /// Skip whitespace, counting newlines.
    pub fn skip_white(&mut self) {
        while matches!(self.peek(), Some(b) if (b as char).is_whitespace()) {
            self.advance();
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize, line: usize) {
        self.pos = pos;
        self.line = line;
    }
}

/// Result of a primitive recognizer: whether it matched, and — if so — the
/// text it consumed (destined for `lastbuf`).
struct Match {
    ok: bool,
    text: String,
}

fn match_tst(cursor: &mut InputCursor, literal: &str) -> Match {
    cursor.skip_white();
    let start = cursor.pos();
    let start_line = cursor.line;
    let mut matched = true;
    for expected in literal.bytes() {
        if cursor.peek() == Some(expected) {
            cursor.advance();
        } else {
            matched = false;
            break;
        }
    }
    if matched {
        Match { ok: true, text: literal.to_string() }
    } else {
        cursor.seek(start, start_line);
        Match { ok: false, text: String::new() }
    }
}

fn match_id(cursor: &mut InputCursor) -> Match {
    cursor.skip_white();
    let mut text = String::new();
    match cursor.peek() {
        Some(b) if (b as char).is_ascii_alphabetic() => {
            text.push(cursor.advance().unwrap() as char);
        }
        _ => return Match { ok: false, text },
    }
    while matches!(cursor.peek(), Some(b) if (b as char).is_ascii_alphanumeric()) {
        text.push(cursor.advance().unwrap() as char);
    }
    Match { ok: true, text }
}

fn match_num(cursor: &mut InputCursor) -> Match {
    cursor.skip_white();
    let mut text = String::new();
    match cursor.peek() {
        Some(b) if (b as char).is_ascii_digit() => {
            text.push(cursor.advance().unwrap() as char);
        }
        _ => return Match { ok: false, text },
    }
    while matches!(cursor.peek(), Some(b) if (b as char).is_ascii_digit()) {
        text.push(cursor.advance().unwrap() as char);
    }
    Match { ok: true, text }
}

fn match_sr(cursor: &mut InputCursor) -> Match {
    cursor.skip_white();
    let mut text = String::new();
    if cursor.peek() != Some(b'\'') {
        return Match { ok: false, text };
    }
    let start = cursor.pos();
    let start_line = cursor.line;
    text.push(cursor.advance().unwrap() as char);
    while !matches!(cursor.peek(), None | Some(b'\'') | Some(b'\n')) {
        text.push(cursor.advance().unwrap() as char);
    }
    if cursor.peek() == Some(b'\'') {
        text.push(cursor.advance().unwrap() as char);
        Match { ok: true, text }
    } else {
        cursor.seek(start, start_line);
        Match { ok: false, text: String::new() }
    }
}

fn check_token_len(text: &str) -> Result<(), crate::error::RuntimeError> {
    if text.len() > MAX_TOKEN_LEN {
        Err(crate::error::RuntimeError::TokenTooLong { max: MAX_TOKEN_LEN })
    } else {
        Ok(())
    }
}

pub(crate) use match_id as recognize_id;
pub(crate) use match_num as recognize_num;
pub(crate) use match_sr as recognize_sr;
pub(crate) use match_tst as recognize_tst;
