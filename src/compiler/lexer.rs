//! # META II Grammar Lexer
//!
//! Tokenizes META II grammar source (`get_token` in the original compiler).
//!
//! Dot-prefixed keywords are matched by prefix against the remaining input,
//! in the same order the original scanner tried them in: `SYNTAX`, `END`,
//! `ID`, `NUMBER`, `STRING`, `EMPTY`, `OUT`, `LABEL`. Matching is
//! case-sensitive and exact, since META II source is conventionally
//! all-uppercase for keywords and the original tool never folded case.

use crate::error::CompileError;

use super::cursor::Cursor;
use super::token::{Token, TokenKind};

const DOT_KEYWORDS: &[(&str, TokenKind)] = &[
    ("SYNTAX", TokenKind::KwSyntax),
    ("END", TokenKind::KwEnd),
    ("ID", TokenKind::KwId),
    ("NUMBER", TokenKind::KwNumber),
    ("STRING", TokenKind::KwString),
    ("EMPTY", TokenKind::KwEmpty),
    ("OUT", TokenKind::KwOut),
    ("LABEL", TokenKind::KwLabel),
];

#[must_use]
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        let tok = next_token(&mut cursor)?;
        let is_eof = tok.kind == TokenKind::Eof;
        tokens.push(tok);
        if is_eof {
            break;
        }
    }

    Ok(tokens)
}

fn next_token(cursor: &mut Cursor) -> Result<Token, CompileError> {
    loop {
        cursor.skip_white();
        let line = cursor.line();

        let Some(ch) = cursor.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
            });
        };

        match ch {
            '.' => {
                cursor.advance();
                if cursor.peek() == Some(',') {
                    cursor.advance();
                    return Ok(Token {
                        kind: TokenKind::Semi,
                        line,
                    });
                }
                if let Some(kind) = match_dot_keyword(cursor) {
                    return Ok(Token { kind, line });
                }
                // REDESIGN: the original scanner silently drops an
                // unrecognized `.X` and resumes scanning at `X`. We
                // diagnose it instead of letting the dot vanish.
                let word = scan_word_for_diagnostic(cursor);
                return Err(CompileError::UnrecognizedDotKeyword { line, word });
            }
            c if c.is_ascii_alphabetic() => {
                let mut s = String::new();
                s.push(cursor.advance().unwrap());
                while matches!(cursor.peek(), Some(c) if c.is_ascii_alphanumeric()) {
                    s.push(cursor.advance().unwrap());
                }
                return Ok(Token {
                    kind: TokenKind::Id(s),
                    line,
                });
            }
            '\'' => return scan_string(cursor, line),
            '*' => {
                cursor.advance();
                let kind = match cursor.peek() {
                    Some('1') => {
                        cursor.advance();
                        TokenKind::Star1
                    }
                    Some('2') => {
                        cursor.advance();
                        TokenKind::Star2
                    }
                    _ => TokenKind::Star,
                };
                return Ok(Token { kind, line });
            }
            '$' => {
                cursor.advance();
                return Ok(Token {
                    kind: TokenKind::Dollar,
                    line,
                });
            }
            '(' => {
                cursor.advance();
                return Ok(Token {
                    kind: TokenKind::LParen,
                    line,
                });
            }
            ')' => {
                cursor.advance();
                return Ok(Token {
                    kind: TokenKind::RParen,
                    line,
                });
            }
            '=' => {
                cursor.advance();
                return Ok(Token {
                    kind: TokenKind::Eq,
                    line,
                });
            }
            '/' => {
                cursor.advance();
                return Ok(Token {
                    kind: TokenKind::Slash,
                    line,
                });
            }
            _ => {
                // Original: unrecognized punctuation is silently skipped.
                cursor.advance();
                continue;
            }
        }
    }
}

/// Try each reserved word as a prefix of the remaining input, in the
/// original scanner's order. Consumes exactly the matched keyword's bytes.
fn match_dot_keyword(cursor: &mut Cursor) -> Option<TokenKind> {
    if !matches!(cursor.peek(), Some(c) if c.is_ascii_alphabetic()) {
        return None;
    }
    let rest = cursor.rest();
    for (word, kind) in DOT_KEYWORDS {
        if rest.starts_with(word.as_bytes()) {
            cursor.advance_by(word.len());
            return Some(kind.clone());
        }
    }
    None
}

/// After a `.` that matched no keyword, scan the following alphanumeric run
/// purely to produce a readable diagnostic; nothing is consumed from the
/// cursor's perspective for re-lexing purposes because lexing aborts.
fn scan_word_for_diagnostic(cursor: &Cursor) -> String {
    let rest = cursor.rest();
    let end = rest
        .iter()
        .position(|&b| !(b as char).is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    String::from_utf8_lossy(&rest[..end]).into_owned()
}

fn scan_string(cursor: &mut Cursor, line: usize) -> Result<Token, CompileError> {
    let mut s = String::new();
    s.push(cursor.advance().unwrap()); // opening quote
    loop {
        match cursor.peek() {
            None | Some('\n') => return Err(CompileError::UnterminatedString { line }),
            Some('\'') => {
                s.push(cursor.advance().unwrap());
                break;
            }
            Some(c) => {
                s.push(c);
                cursor.advance();
            }
        }
    }
    Ok(Token {
        kind: TokenKind::Str(s),
        line,
    })
}
