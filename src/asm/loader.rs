//! # Two-Pass Loader
//!
//! Turns a textual assembly listing (as produced by [`crate::compiler`]) into
//! an [`Instruction`] array ready for a machine to execute. Mirrors `asm.c`'s
//! `read_program`: pass 1 walks the listing line by line, building the label
//! table and an instruction array with unresolved label references left as
//! bare names; pass 2 walks the fix-up list and resolves each to the
//! instruction index its label names.
//!
//! A line with no leading whitespace is a label declaration; a line that
//! starts with a space or tab is an instruction. Blank lines are skipped.

use crate::error::LoadError;

use super::instr::{descriptor_for, Arg, ArgKind, Instruction, Opcode};
use super::symbol_table::LabelTable;

const MAX_LINE_LEN: usize = 1024;
const MAX_NBLK: i64 = 256;

pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// The instruction index execution should begin at, i.e. the location
    /// the leading `ADR` instruction's (already-resolved) argument names.
    pub fn entry_point(&self) -> Option<usize> {
        match self.instructions.first() {
            Some(Instruction { opcode: Opcode::Adr, arg: Arg::Loc(loc) }) => Some(*loc),
            _ => None,
        }
    }
}

pub fn load(source: &str) -> Result<Program, LoadError> {
    let mut instructions = Vec::new();
    let mut labels = LabelTable::new();
    let mut fixups = Vec::new();

    for (idx, raw_line) in source.lines().enumerate() {
        let line_no = idx + 1;
        if raw_line.len() > MAX_LINE_LEN {
            return Err(LoadError::LineTooLong { line: line_no });
        }
        if raw_line.is_empty() {
            continue;
        }
        if raw_line.starts_with(' ') || raw_line.starts_with('\t') {
            parse_instruction(raw_line, line_no, &mut instructions, &mut labels, &mut fixups)?;
        } else {
            parse_label(raw_line, line_no, &mut instructions, &mut labels)?;
        }
    }

    for idx in fixups {
        let name = match &instructions[idx].arg {
            Arg::Str(name) => name.clone(),
            _ => unreachable!("fix-up recorded for a non-string argument"),
        };
        let loc = labels
            .get(&name)
            .ok_or_else(|| LoadError::UndefinedLabel { name: name.clone() })?;
        instructions[idx].arg = Arg::Loc(loc);
    }

    Ok(Program { instructions })
}

fn parse_label(
    line: &str,
    line_no: usize,
    instructions: &mut [Instruction],
    labels: &mut LabelTable,
) -> Result<(), LoadError> {
    let (name, _) =
        get_identifier(line).ok_or(LoadError::ExpectedLabelIdentifier { line: line_no })?;
    if labels.insert(name.clone(), instructions.len()) {
        return Err(LoadError::DuplicateLabel { line: line_no, name });
    }
    Ok(())
}

fn parse_instruction(
    line: &str,
    line_no: usize,
    instructions: &mut Vec<Instruction>,
    _labels: &mut LabelTable,
    fixups: &mut Vec<usize>,
) -> Result<(), LoadError> {
    let (mne, rest) =
        get_identifier(line).ok_or(LoadError::ExpectedMnemonic { line: line_no })?;
    let descr = descriptor_for(&mne).ok_or_else(|| LoadError::UnknownMnemonic {
        line: line_no,
        mnemonic: mne.clone(),
    })?;

    match descr.arg_kind {
        ArgKind::Id => {
            let (name, _) = get_identifier(rest).ok_or_else(|| LoadError::MissingIdArgument {
                line: line_no,
                mnemonic: mne.clone(),
            })?;
            fixups.push(instructions.len());
            instructions.push(Instruction { opcode: descr.opcode, arg: Arg::Str(name) });
        }
        ArgKind::Str => {
            let (text, _) = get_string(rest).ok_or_else(|| LoadError::MissingStrArgument {
                line: line_no,
                mnemonic: mne.clone(),
            })?;
            instructions.push(Instruction { opcode: descr.opcode, arg: Arg::Str(text) });
        }
        ArgKind::Num => {
            let (n, _) = get_number(rest).ok_or_else(|| LoadError::MissingNumArgument {
                line: line_no,
                mnemonic: mne.clone(),
            })?;
            instructions.push(Instruction { opcode: descr.opcode, arg: Arg::Num(n) });
        }
        ArgKind::Nblk => {
            let (n, _) = get_number(rest).ok_or_else(|| LoadError::MissingNumArgument {
                line: line_no,
                mnemonic: mne.clone(),
            })?;
            if !(0..=MAX_NBLK).contains(&n) {
                return Err(LoadError::NblkOutOfRange { line: line_no, count: n });
            }
            for _ in 0..n {
                instructions.push(Instruction { opcode: Opcode::Reserved, arg: Arg::None });
            }
        }
        ArgKind::None => {
            instructions.push(Instruction { opcode: descr.opcode, arg: Arg::None });
        }
    }
    Ok(())
}

fn skip_blank(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

fn get_identifier(s: &str) -> Option<(String, &str)> {
    let s = skip_blank(s);
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some((s[..end].to_string(), &s[end..]))
}

/// Unlike the compiler's own string scanner, an empty string literal is
/// rejected here, matching `asm.c`'s stricter `get_string`.
fn get_string(s: &str) -> Option<(String, &str)> {
    let s = skip_blank(s);
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '\'')) => {}
        _ => return None,
    }
    if s.as_bytes().get(1) == Some(&b'\'') {
        return None;
    }
    let rest = &s[1..];
    let end = rest.find('\'')?;
    let text = rest[..end].to_string();
    Some((text, &rest[end + 1..]))
}

fn get_number(s: &str) -> Option<(i64, &str)> {
    let s = skip_blank(s);
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_digit() => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    s[..end].parse().ok().map(|n| (n, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_program() {
        let asm = "\tADR TEST\nTEST\n\tEND\n";
        let program = load(asm).unwrap();
        assert_eq!(program.instructions.len(), 2);
        assert_eq!(program.entry_point(), Some(1));
    }

    #[test]
    fn rejects_undefined_label() {
        let asm = "\tADR NOWHERE\n\tEND\n";
        let err = load(asm).unwrap_err();
        assert!(matches!(err, LoadError::UndefinedLabel { .. }));
    }

    #[test]
    fn rejects_duplicate_label() {
        let asm = "\tADR A\nA\nA\n\tEND\n";
        let err = load(asm).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateLabel { .. }));
    }

    #[test]
    fn rejects_unknown_mnemonic() {
        let asm = "\tFOO\n";
        let err = load(asm).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMnemonic { .. }));
    }

    #[test]
    fn parses_string_and_num_arguments() {
        let asm = "\tADR A\nA\n\tTST 'hello'\n\tEND\n";
        let program = load(asm).unwrap();
        assert_eq!(program.instructions[1].arg, Arg::Str("hello".to_string()));
    }

    #[test]
    fn rejects_empty_string_argument() {
        let asm = "\tADR A\nA\n\tTST ''\n\tEND\n";
        let err = load(asm).unwrap_err();
        assert!(matches!(err, LoadError::MissingStrArgument { .. }));
    }
}
