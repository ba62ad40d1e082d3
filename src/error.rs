//! # Error Types
//!
//! Every fatal condition in this crate — a malformed grammar, a malformed
//! assembly listing, or a runtime parse failure — is represented as one of
//! the three error enums below. Each carries a 1-indexed line number so
//! callers can print `<path>:<line>: error: <message>` the way the original
//! META II tools do.

use thiserror::Error;

/// A line number in a source or assembly listing (1-indexed).
pub type Line = usize;

/// Errors raised while translating a META II grammar into assembly text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: Line },

    #[error("line {line}: unrecognized `.{word}`")]
    UnrecognizedDotKeyword { line: Line, word: String },

    #[error("line {line}: unexpected `{found}`")]
    UnexpectedToken { line: Line, found: String },
}

impl CompileError {
    pub fn line(&self) -> Line {
        match self {
            CompileError::UnterminatedString { line }
            | CompileError::UnrecognizedDotKeyword { line, .. }
            | CompileError::UnexpectedToken { line, .. } => *line,
        }
    }
}

/// Errors raised while loading a textual assembly listing into an
/// instruction array.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("line {line}: expecting identifier on label line")]
    ExpectedLabelIdentifier { line: Line },

    #[error("line {line}: label `{name}' redefined")]
    DuplicateLabel { line: Line, name: String },

    #[error("line {line}: expecting mnemonic on instruction line")]
    ExpectedMnemonic { line: Line },

    #[error("line {line}: unknown mnemonic `{mnemonic}'")]
    UnknownMnemonic { line: Line, mnemonic: String },

    #[error("line {line}: instruction `{mnemonic}' requires an identifier argument")]
    MissingIdArgument { line: Line, mnemonic: String },

    #[error("line {line}: instruction `{mnemonic}' requires a string argument")]
    MissingStrArgument { line: Line, mnemonic: String },

    #[error("line {line}: instruction `{mnemonic}' requires a number argument")]
    MissingNumArgument { line: Line, mnemonic: String },

    #[error("line {line}: NBLK count {count} is out of range (must be 0-256)")]
    NblkOutOfRange { line: Line, count: i64 },

    #[error("label `{name}' referenced but never defined")]
    UndefinedLabel { name: String },

    #[error("line {line}: assembly line exceeds the 1024-byte limit")]
    LineTooLong { line: Line },
}

/// Errors raised while executing a loaded program against an input buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("frame stack overflow: more than {max} nested CLL frames")]
    FrameStackOverflow { max: usize },

    #[error("matched token exceeds the {max}-byte limit")]
    TokenTooLong { max: usize },

    #[error("line {line}: syntax error")]
    SyntaxError { line: Line },

    #[error("code does not begin with an ADR instruction")]
    MissingEntryPoint,

    #[error("internal error: dispatched a reserved (NBLK) storage cell at index {index}")]
    ReservedCellExecuted { index: usize },
}
