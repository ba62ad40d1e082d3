//! # META II Compiler — Recursive Descent
//!
//! Translates a token stream produced by [`super::lexer::tokenize`] into
//! textual META II assembly. Each nonterminal below is a direct transcription
//! of the corresponding syntax equation from Schorre's paper; the emitted
//! code must match, instruction for instruction, what a self-hosted META II
//! produces, so the shape of each function mirrors the original C compiler
//! rather than being written for readability alone.
//!
//! ```text
//! PROGRAM = '.SYNTAX' .ID .OUT('ADR ' *) $ST '.END' .OUT('END') .,
//! ST      = .ID .LABEL * '=' EX1 '.,' .OUT('R') .,
//! EX1     = EX2 $('/' .OUT('BT ' *1) EX2) .LABEL *1 .,
//! EX2     = (EX3 .OUT('BF ' *1) / OUTPUT) $(EX3 .OUT('BE') / OUTPUT) .LABEL *1 .,
//! EX3     = .ID .OUT('CLL ' *) / .STRING .OUT('TST ' *) / '.ID' .OUT('ID') /
//!           '.NUMBER' .OUT('NUM') / '.STRING' .OUT('SR') / '(' EX1 ')' /
//!           '.EMPTY' .OUT('SET') / '$' .LABEL *1 EX3 .OUT('BT ' *1) .OUT('SET') .,
//! OUTPUT  = ('.OUT' '(' $OUT1 ')' / '.LABEL' .OUT('LB') OUT1) .OUT('OUT') .,
//! OUT1    = '*1' .OUT('GN1') / '*2' .OUT('GN2') / '*' .OUT('CI') / .STRING .OUT('CL '*) .,
//! ```

use crate::error::CompileError;

use super::token::{Token, TokenKind};

pub struct Compiler<'a> {
    tokens: &'a [Token],
    pos: usize,
    label_counter: i32,
    out: String,
}

impl<'a> Compiler<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            label_counter: 1,
            out: String::new(),
        }
    }

    pub fn compile(mut self) -> Result<String, CompileError> {
        self.program()?;
        Ok(self.out)
    }

    fn kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn line(&self) -> usize {
        self.tokens[self.pos].line
    }

    fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> CompileError {
        CompileError::UnexpectedToken {
            line: self.line(),
            found: self.tokens[self.pos].display(),
        }
    }

    fn fresh_label(&mut self) -> String {
        let label = format!("L{}", self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit_label(&mut self, name: &str) {
        self.out.push_str(name);
        self.out.push('\n');
    }

    fn emit(&mut self, mnemonic: &str) {
        self.out.push('\t');
        self.out.push_str(mnemonic);
        self.out.push('\n');
    }

    fn emit_arg(&mut self, mnemonic: &str, arg: &str) {
        self.out.push('\t');
        self.out.push_str(mnemonic);
        self.out.push(' ');
        self.out.push_str(arg);
        self.out.push('\n');
    }

    fn expect_kw_syntax(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::KwSyntax {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_kw_end(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::KwEnd {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_kw_out(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::KwOut {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_kw_label(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::KwLabel {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_lparen(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::LParen {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_rparen(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::RParen {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_eq(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::Eq {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_semi(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::Semi {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_eof(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_id(&mut self) -> Result<String, CompileError> {
        match self.kind().clone() {
            TokenKind::Id(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected()),
        }
    }

    /// OUT1 = '*1' .OUT('GN1') / '*2' .OUT('GN2') / '*' .OUT('CI') / .STRING .OUT('CL '*) .,
    fn out1(&mut self) -> Result<(), CompileError> {
        match self.kind().clone() {
            TokenKind::Star1 => self.emit("GN1"),
            TokenKind::Star2 => self.emit("GN2"),
            TokenKind::Star => self.emit("CI"),
            TokenKind::Str(s) => self.emit_arg("CL", &s),
            _ => return Err(self.unexpected()),
        }
        self.advance();
        Ok(())
    }

    /// OUTPUT = ('.OUT' '(' $OUT1 ')' / '.LABEL' .OUT('LB') OUT1) .OUT('OUT') .,
    fn output(&mut self) -> Result<(), CompileError> {
        if *self.kind() == TokenKind::KwOut {
            self.expect_kw_out()?;
            self.expect_lparen()?;
            while *self.kind() != TokenKind::RParen {
                self.out1()?;
            }
            self.expect_rparen()?;
        } else {
            self.expect_kw_label()?;
            self.emit("LB");
            self.out1()?;
        }
        self.emit("OUT");
        Ok(())
    }

    /// EX3 — see module-level grammar comment.
    fn ex3(&mut self) -> Result<(), CompileError> {
        match self.kind().clone() {
            TokenKind::Id(name) => {
                self.emit_arg("CLL", &name);
                self.advance();
            }
            TokenKind::Str(s) => {
                self.emit_arg("TST", &s);
                self.advance();
            }
            TokenKind::KwId => {
                self.emit("ID");
                self.advance();
            }
            TokenKind::KwNumber => {
                self.emit("NUM");
                self.advance();
            }
            TokenKind::KwString => {
                self.emit("SR");
                self.advance();
            }
            TokenKind::KwEmpty => {
                self.emit("SET");
                self.advance();
            }
            TokenKind::Dollar => {
                self.advance();
                let lab1 = self.fresh_label();
                self.emit_label(&lab1);
                self.ex3()?;
                self.emit_arg("BT", &lab1);
                self.emit("SET");
            }
            TokenKind::LParen => {
                self.advance();
                self.ex1()?;
                self.expect_rparen()?;
            }
            _ => return Err(self.unexpected()),
        }
        Ok(())
    }

    /// EX2 = (EX3 .OUT('BF ' *1) / OUTPUT) $(EX3 .OUT('BE') / OUTPUT) .LABEL *1 .,
    fn ex2(&mut self) -> Result<(), CompileError> {
        let mut lab1: Option<String> = None;

        if matches!(self.kind(), TokenKind::KwOut | TokenKind::KwLabel) {
            self.output()?;
        } else {
            self.ex3()?;
            let label = self.fresh_label();
            self.emit_arg("BF", &label);
            lab1 = Some(label);
        }

        while !matches!(self.kind(), TokenKind::Slash | TokenKind::Semi | TokenKind::RParen) {
            if matches!(self.kind(), TokenKind::KwOut | TokenKind::KwLabel) {
                self.output()?;
            } else {
                self.ex3()?;
                self.emit("BE");
            }
        }

        // A leading OUTPUT allocates no label of its own; one is still
        // allocated here so every alternative gets a closing label to jump to,
        // matching how a leading bare term's own BF target is handled above.
        let label = lab1.unwrap_or_else(|| self.fresh_label());
        self.emit_label(&label);
        Ok(())
    }

    /// EX1 = EX2 $('/' .OUT('BT ' *1) EX2) .LABEL *1 .,
    fn ex1(&mut self) -> Result<(), CompileError> {
        self.ex2()?;
        let label = self.fresh_label();
        while *self.kind() == TokenKind::Slash {
            self.advance();
            self.emit_arg("BT", &label);
            self.ex2()?;
        }
        self.emit_label(&label);
        Ok(())
    }

    /// ST = .ID .LABEL * '=' EX1 '.,' .OUT('R') .,
    fn st(&mut self) -> Result<(), CompileError> {
        let name = self.expect_id()?;
        self.emit_label(&name);
        self.expect_eq()?;
        self.ex1()?;
        self.expect_semi()?;
        self.emit("R");
        Ok(())
    }

    /// PROGRAM = '.SYNTAX' .ID .OUT('ADR ' *) $ST '.END' .OUT('END') .,
    fn program(&mut self) -> Result<(), CompileError> {
        self.expect_kw_syntax()?;
        let name = self.expect_id()?;
        self.emit_arg("ADR", &name);
        while *self.kind() != TokenKind::KwEnd {
            self.st()?;
        }
        self.expect_kw_end()?;
        self.emit("END");
        self.expect_eof()
    }
}
