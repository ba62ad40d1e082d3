//! # Linear Machine
//!
//! The non-backtracking interpreter: a failed `BE` after an exhausted
//! alternative is a fatal syntax error, full stop. Output is written
//! directly into the caller's buffer as it's produced — there is nothing to
//! unwind, so there is nothing to stage; whatever was written before a fatal
//! error stays written, exactly as the original machine's direct `printf`s do.

use crate::asm::instr::{Arg, Opcode};
use crate::asm::loader::Program;
use crate::error::RuntimeError;

use super::{
    check_token_len, recognize_id, recognize_num, recognize_sr, recognize_tst, Frame,
    InputCursor, MAX_FRAMES,
};

pub struct LinearMachine<'a> {
    program: &'a Program,
}

impl<'a> LinearMachine<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    /// Execute the program against `input`, appending emitted text to `out`
    /// as it's produced. `out` holds whatever was written so far even if
    /// this returns `Err`.
    pub fn run(&self, input: &str, out: &mut String) -> Result<(), RuntimeError> {
        let entry = self.program.entry_point().ok_or(RuntimeError::MissingEntryPoint)?;

        let instructions = &self.program.instructions;
        let mut cursor = InputCursor::new(input);
        let mut ip = entry;
        let mut res = true;
        let mut lastbuf = String::new();
        let mut indent = true;
        let mut label_counter: u32 = 1;

        let mut frames: Vec<Frame> = vec![Frame::default()];

        loop {
            if ip >= instructions.len() {
                return Ok(());
            }
            let instr = &instructions[ip];
            match instr.opcode {
                Opcode::Tst => {
                    let lit = expect_str(&instr.arg);
                    let m = recognize_tst(&mut cursor, lit);
                    check_token_len(&m.text)?;
                    res = m.ok;
                    lastbuf = m.text;
                }
                Opcode::Id => {
                    let m = recognize_id(&mut cursor);
                    check_token_len(&m.text)?;
                    res = m.ok;
                    lastbuf = m.text;
                }
                Opcode::Num => {
                    let m = recognize_num(&mut cursor);
                    check_token_len(&m.text)?;
                    res = m.ok;
                    lastbuf = m.text;
                }
                Opcode::Sr => {
                    let m = recognize_sr(&mut cursor);
                    check_token_len(&m.text)?;
                    res = m.ok;
                    lastbuf = m.text;
                }
                Opcode::Cll => {
                    if frames.len() >= MAX_FRAMES {
                        return Err(RuntimeError::FrameStackOverflow { max: MAX_FRAMES });
                    }
                    frames.push(Frame { ret_addr: ip + 1, lab1: None, lab2: None });
                    ip = expect_loc(&instr.arg);
                    continue;
                }
                Opcode::R => {
                    if frames.len() == 1 {
                        return Ok(());
                    }
                    let frame = frames.pop().unwrap();
                    ip = frame.ret_addr;
                    continue;
                }
                Opcode::Set => {
                    res = true;
                }
                Opcode::B => {
                    ip = expect_loc(&instr.arg);
                    continue;
                }
                Opcode::Bt => {
                    if res {
                        ip = expect_loc(&instr.arg);
                        continue;
                    }
                }
                Opcode::Bf => {
                    if !res {
                        ip = expect_loc(&instr.arg);
                        continue;
                    }
                }
                Opcode::Be => {
                    if !res {
                        return Err(RuntimeError::SyntaxError { line: cursor.line });
                    }
                }
                Opcode::Cl => {
                    if indent {
                        out.push('\t');
                    }
                    out.push_str(expect_str(&instr.arg));
                    indent = false;
                }
                Opcode::Ci => {
                    if indent {
                        out.push('\t');
                    }
                    out.push_str(&lastbuf);
                    indent = false;
                }
                Opcode::Gn1 => {
                    if indent {
                        out.push('\t');
                    }
                    let top = frames.last_mut().unwrap();
                    let lab = *top.lab1.get_or_insert_with(|| {
                        let l = label_counter;
                        label_counter += 1;
                        l
                    });
                    out.push_str(&format!("L{lab}"));
                    indent = false;
                }
                Opcode::Gn2 => {
                    if indent {
                        out.push('\t');
                    }
                    let top = frames.last_mut().unwrap();
                    let lab = *top.lab2.get_or_insert_with(|| {
                        let l = label_counter;
                        label_counter += 1;
                        l
                    });
                    out.push_str(&format!("L{lab}"));
                    indent = false;
                }
                Opcode::Lb => {
                    indent = false;
                }
                Opcode::Out => {
                    out.push('\n');
                    indent = true;
                }
                Opcode::Adr | Opcode::End => {
                    unreachable!("ADR/END are directives, never dispatched at runtime")
                }
                Opcode::Reserved => {
                    return Err(RuntimeError::ReservedCellExecuted { index: ip });
                }
            }
            ip += 1;
        }
    }
}

fn expect_str(arg: &Arg) -> &str {
    match arg {
        Arg::Str(s) => s,
        _ => unreachable!("loader guarantees STR-kind argument for this opcode"),
    }
}

fn expect_loc(arg: &Arg) -> usize {
    match arg {
        Arg::Loc(loc) => *loc,
        _ => unreachable!("loader guarantees a resolved label for this opcode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asm::loader::load;
    use crate::compiler::compile;

    fn build(grammar: &str) -> Program {
        let asm = compile(grammar).unwrap();
        load(&asm).unwrap()
    }

    #[test]
    fn matches_a_literal() {
        let program = build(".SYNTAX S S = 'A' .,  .END");
        let mut out = String::new();
        LinearMachine::new(&program).run("A", &mut out).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn reports_syntax_error_on_mismatch() {
        // The first element of a sequence failing just short-circuits via
        // BF; only a mismatch after the first element reaches a BE check.
        let program = build(".SYNTAX S S = 'A' 'B' .,  .END");
        let mut out = String::new();
        let err = LinearMachine::new(&program).run("AX", &mut out).unwrap_err();
        assert!(matches!(err, RuntimeError::SyntaxError { .. }));
    }

    #[test]
    fn copies_last_token_with_ci() {
        let program = build(".SYNTAX S S = .ID .OUT(*) .,  .END");
        let mut out = String::new();
        LinearMachine::new(&program).run("hello", &mut out).unwrap();
        assert_eq!(out, "\thello\n");
    }
}
