//! # Compiler Tokens
//!
//! The lexical vocabulary of META II grammar source: reserved dot-keywords,
//! identifiers, quoted strings, and the handful of punctuation characters
//! the syntax-equation notation needs.

/// Token types for META II grammar source.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Dot-prefixed reserved words ===
    KwSyntax,
    KwEnd,
    KwId,
    KwNumber,
    KwString,
    KwEmpty,
    KwOut,
    KwLabel,

    // === Literals ===
    Id(String),
    /// Carries the literal text *including* the surrounding quotes, so
    /// downstream emission can copy it into generated assembly verbatim.
    Str(String),

    // === Punctuation ===
    Star,
    Star1,
    Star2,
    Dollar,
    LParen,
    RParen,
    Eq,
    /// `.,` — the end-of-rule terminator.
    Semi,
    Slash,

    Eof,
}

/// A single lexical token, tagged with the 1-indexed source line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    /// Render the token the way the original scanner's `token_string` buffer
    /// would read, for use in "unexpected `...`" diagnostics.
    pub fn display(&self) -> String {
        match &self.kind {
            TokenKind::KwSyntax => ".SYNTAX".into(),
            TokenKind::KwEnd => ".END".into(),
            TokenKind::KwId => ".ID".into(),
            TokenKind::KwNumber => ".NUMBER".into(),
            TokenKind::KwString => ".STRING".into(),
            TokenKind::KwEmpty => ".EMPTY".into(),
            TokenKind::KwOut => ".OUT".into(),
            TokenKind::KwLabel => ".LABEL".into(),
            TokenKind::Id(s) => s.clone(),
            TokenKind::Str(s) => s.clone(),
            TokenKind::Star => "*".into(),
            TokenKind::Star1 => "*1".into(),
            TokenKind::Star2 => "*2".into(),
            TokenKind::Dollar => "$".into(),
            TokenKind::LParen => "(".into(),
            TokenKind::RParen => ")".into(),
            TokenKind::Eq => "=".into(),
            TokenKind::Semi => ".,".into(),
            TokenKind::Slash => "/".into(),
            TokenKind::Eof => "<eof>".into(),
        }
    }
}
