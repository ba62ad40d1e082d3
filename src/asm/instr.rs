//! # Instruction Set
//!
//! The opcode descriptor table and instruction record shape shared by the
//! loader and both machine variants. Mirrors `asm.h`'s `IDescr`/`IRec` pair:
//! a static table of (mnemonic, argument kind) drives both parsing and
//! dispatch, and each loaded instruction carries exactly the argument shape
//! its descriptor declares.

/// What kind of operand an instruction's mnemonic expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    None,
    /// A label reference, resolved to an instruction index by the loader.
    Id,
    /// A single-quoted string literal, quotes stripped.
    Str,
    Num,
    /// Reserve N storage cells (VALGOL I data area); never emitted by this
    /// compiler's own opcode table, kept for loader genericity.
    Nblk,
}

/// The sixteen-plus-directive META II instruction set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Tst,
    Id,
    Num,
    Sr,
    Cll,
    R,
    Set,
    B,
    Bt,
    Bf,
    Be,
    Cl,
    Ci,
    Gn1,
    Gn2,
    Lb,
    Out,
    Adr,
    End,
    /// Sentinel for a reserved NBLK cell; dispatching one is an internal bug.
    Reserved,
}

/// One row of the static opcode descriptor table.
pub struct IDescr {
    pub mne: &'static str,
    pub opcode: Opcode,
    pub arg_kind: ArgKind,
}

/// The META II machine's opcode table, in the original tool's order.
pub const OPCODE_TABLE: &[IDescr] = &[
    IDescr { mne: "TST", opcode: Opcode::Tst, arg_kind: ArgKind::Str },
    IDescr { mne: "ID", opcode: Opcode::Id, arg_kind: ArgKind::None },
    IDescr { mne: "NUM", opcode: Opcode::Num, arg_kind: ArgKind::None },
    IDescr { mne: "SR", opcode: Opcode::Sr, arg_kind: ArgKind::None },
    IDescr { mne: "CLL", opcode: Opcode::Cll, arg_kind: ArgKind::Id },
    IDescr { mne: "R", opcode: Opcode::R, arg_kind: ArgKind::None },
    IDescr { mne: "SET", opcode: Opcode::Set, arg_kind: ArgKind::None },
    IDescr { mne: "B", opcode: Opcode::B, arg_kind: ArgKind::Id },
    IDescr { mne: "BT", opcode: Opcode::Bt, arg_kind: ArgKind::Id },
    IDescr { mne: "BF", opcode: Opcode::Bf, arg_kind: ArgKind::Id },
    IDescr { mne: "BE", opcode: Opcode::Be, arg_kind: ArgKind::None },
    IDescr { mne: "CL", opcode: Opcode::Cl, arg_kind: ArgKind::Str },
    IDescr { mne: "CI", opcode: Opcode::Ci, arg_kind: ArgKind::None },
    IDescr { mne: "GN1", opcode: Opcode::Gn1, arg_kind: ArgKind::None },
    IDescr { mne: "GN2", opcode: Opcode::Gn2, arg_kind: ArgKind::None },
    IDescr { mne: "LB", opcode: Opcode::Lb, arg_kind: ArgKind::None },
    IDescr { mne: "OUT", opcode: Opcode::Out, arg_kind: ArgKind::None },
    IDescr { mne: "ADR", opcode: Opcode::Adr, arg_kind: ArgKind::Id },
    IDescr { mne: "END", opcode: Opcode::End, arg_kind: ArgKind::None },
];

pub fn descriptor_for(mne: &str) -> Option<&'static IDescr> {
    OPCODE_TABLE.iter().find(|d| d.mne == mne)
}

/// The operand an [`Instruction`] carries, already resolved where relevant.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    None,
    /// A fixed-up label reference: the target instruction's index.
    Loc(usize),
    Str(String),
    Num(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub arg: Arg,
}
