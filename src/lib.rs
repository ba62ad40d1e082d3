//! # META II
//!
//! A compiler-compiler in the tradition of Schorre's 1964 META II: a small
//! recursive-descent compiler that translates syntax equations into a
//! stack-machine instruction stream, an assembler/loader that turns the
//! textual instruction listing into an in-memory program, and two machine
//! variants (linear and backtracking) that execute that program against an
//! input string.
//!
//! ## Pipeline
//!
//! 1. **Compiler** ([`compiler`]) — lexes and translates META II grammar
//!    source into textual assembly.
//! 2. **Assembler** ([`asm`]) — a two-pass loader that resolves labels and
//!    fix-ups, turning the assembly text into an [`asm::instr::Instruction`]
//!    array.
//! 3. **Machine** ([`machine`]) — interprets that array against an input
//!    buffer, either halting on the first mismatch (linear) or backtracking
//!    to the last choice point (backtracking).
//!
//! ```rust,no_run
//! use meta2::compiler::compile;
//! use meta2::asm::loader::load;
//! use meta2::machine::linear::LinearMachine;
//!
//! let grammar = std::fs::read_to_string("grammar.meta").unwrap();
//! let assembly = compile(&grammar).unwrap();
//! let program = load(&assembly).unwrap();
//! let input = std::fs::read_to_string("input.txt").unwrap();
//! let mut output = String::new();
//! LinearMachine::new(&program).run(&input, &mut output).unwrap();
//! print!("{output}");
//! ```

pub mod asm;
pub mod compiler;
pub mod error;
pub mod machine;
