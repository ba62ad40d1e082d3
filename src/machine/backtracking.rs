//! # Backtracking Machine
//!
//! Backtracking at rule granularity: a failed `BE` inside a nested `CLL`
//! rewinds input, output, and bookkeeping to the state captured when that
//! rule was entered, then resumes its caller with `res = false` rather than
//! aborting. Only a failure with an empty call stack (the top rule itself)
//! is fatal. Output is staged internally and copied into the caller's
//! buffer only on clean termination or on that fatal top-level failure —
//! never on an intra-rule rewind, matching the original's buffered-`stdout`
//! discipline ("Backup vs. No Backup" in Schorre's paper).

use crate::asm::instr::{Arg, Opcode};
use crate::asm::loader::Program;
use crate::error::RuntimeError;

use super::{
    check_token_len, recognize_id, recognize_num, recognize_sr, recognize_tst, InputCursor,
    MAX_FRAMES,
};

/// A backtracking frame additionally snapshots everything a rewind must
/// restore: the state as of the moment this frame's `CLL` was taken.
#[derive(Debug, Clone, Default)]
struct BtFrame {
    ret_addr: usize,
    lab1: Option<u32>,
    lab2: Option<u32>,
    snap_pos: usize,
    snap_line: usize,
    snap_out_len: usize,
    snap_lastbuf: String,
    snap_label_counter: u32,
    snap_indent: bool,
}

pub struct BacktrackingMachine<'a> {
    program: &'a Program,
}

impl<'a> BacktrackingMachine<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    /// Execute the program against `input`. Output is buffered internally
    /// and appended to `out` only when this returns — on success, or on a
    /// fatal top-level `BE` failure (in which case `out` still receives
    /// whatever the failed run produced before the failure).
    pub fn run(&self, input: &str, out: &mut String) -> Result<(), RuntimeError> {
        let entry = self.program.entry_point().ok_or(RuntimeError::MissingEntryPoint)?;

        let instructions = &self.program.instructions;
        let mut cursor = InputCursor::new(input);
        let mut ip = entry;
        let mut res = true;
        let mut lastbuf = String::new();
        let mut indent = true;
        let mut label_counter: u32 = 1;
        let mut buf = String::new();

        let mut frames: Vec<BtFrame> = vec![BtFrame::default()];

        loop {
            if ip >= instructions.len() {
                out.push_str(&buf);
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
                    frames.push(BtFrame {
                        ret_addr: ip + 1,
                        lab1: None,
                        lab2: None,
                        snap_pos: cursor.pos(),
                        snap_line: cursor.line,
                        snap_out_len: buf.len(),
                        snap_lastbuf: lastbuf.clone(),
                        snap_label_counter: label_counter,
                        snap_indent: indent,
                    });
                    ip = expect_loc(&instr.arg);
                    continue;
                }
                Opcode::R => {
                    if frames.len() == 1 {
                        out.push_str(&buf);
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
                        if frames.len() == 1 {
                            out.push_str(&buf);
                            return Err(RuntimeError::SyntaxError { line: cursor.line });
                        }
                        let frame = frames.pop().unwrap();
                        cursor.seek(frame.snap_pos, frame.snap_line);
                        buf.truncate(frame.snap_out_len);
                        lastbuf = frame.snap_lastbuf;
                        label_counter = frame.snap_label_counter;
                        indent = frame.snap_indent;
                        ip = frame.ret_addr;
                        res = false;
                        continue;
                    }
                }
                Opcode::Cl => {
                    if indent {
                        buf.push('\t');
                    }
                    buf.push_str(expect_str(&instr.arg));
                    indent = false;
                }
                Opcode::Ci => {
                    if indent {
                        buf.push('\t');
                    }
                    buf.push_str(&lastbuf);
                    indent = false;
                }
                Opcode::Gn1 => {
                    if indent {
                        buf.push('\t');
                    }
                    let top = frames.last_mut().unwrap();
                    let lab = *top.lab1.get_or_insert_with(|| {
                        let l = label_counter;
                        label_counter += 1;
                        l
                    });
                    buf.push_str(&format!("L{lab}"));
                    indent = false;
                }
                Opcode::Gn2 => {
                    if indent {
                        buf.push('\t');
                    }
                    let top = frames.last_mut().unwrap();
                    let lab = *top.lab2.get_or_insert_with(|| {
                        let l = label_counter;
                        label_counter += 1;
                        l
                    });
                    buf.push_str(&format!("L{lab}"));
                    indent = false;
                }
                Opcode::Lb => {
                    indent = false;
                }
                Opcode::Out => {
                    buf.push('\n');
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
    fn rewinds_output_on_failed_alternative() {
        // Rewinding only happens across a CLL frame boundary — parenthesized
        // grouping alone never pushes one — so the first alternative here is
        // a call to a separate rule: it matches 'A', emits a marker, then
        // fails on 'B'; that marker must not survive into the fallback
        // alternative.
        let program = build(
            ".SYNTAX S \
             S = T / 'A' .,  \
             T = 'A' .OUT('X') 'B' .,  \
             .END",
        );
        let mut out = String::new();
        BacktrackingMachine::new(&program).run("AC", &mut out).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn reports_syntax_error_when_top_rule_fails() {
        let program = build(".SYNTAX S S = 'A' 'B' .,  .END");
        let mut out = String::new();
        let err = BacktrackingMachine::new(&program).run("AX", &mut out).unwrap_err();
        assert!(matches!(err, RuntimeError::SyntaxError { .. }));
    }
}
