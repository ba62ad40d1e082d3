//! # META II Compiler
//!
//! Translates META II grammar source into textual META II assembly: grammar
//! text in, assembly-listing text out, ready for [`crate::asm::loader`] to
//! load into an [`crate::asm::instr::Instruction`] array for the machine.

pub mod cursor;
pub mod grammar;
pub mod lexer;
pub mod token;

use crate::error::CompileError;

/// Compile a META II grammar source string into textual assembly.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = lexer::tokenize(source)?;
    grammar::Compiler::new(&tokens).compile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_trivial_grammar() {
        let src = ".SYNTAX TEST .END";
        let asm = compile(src).unwrap();
        assert_eq!(asm, "\tADR TEST\n\tEND\n");
    }

    #[test]
    fn compiles_single_rule_with_alternatives() {
        let src = ".SYNTAX TEST S = 'A' / 'B' .,  .END";
        let asm = compile(src).unwrap();
        let expected = "\tADR TEST\n\
                         S\n\
                         \tTST 'A'\n\
                         \tBF L1\n\
                         L1\n\
                         \tBT L2\n\
                         \tTST 'B'\n\
                         \tBF L3\n\
                         L3\n\
                         L2\n\
                         \tR\n\
                         \tEND\n";
        assert_eq!(asm, expected);
    }

    #[test]
    fn rejects_unrecognized_dot_keyword() {
        let src = ".SYNTAX TEST S = .FOO .,  .END";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::UnrecognizedDotKeyword { .. }));
    }

    #[test]
    fn rejects_unterminated_string() {
        let src = ".SYNTAX TEST S = 'A .,  .END";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::UnterminatedString { .. }));
    }

    #[test]
    fn compiles_output_directive() {
        let src = ".SYNTAX TEST S = 'A' .OUT('CL ' *) .,  .END";
        let asm = compile(src).unwrap();
        assert!(asm.contains("\tTST 'A'\n"));
        assert!(asm.contains("\tCI\n"));
        assert!(asm.contains("\tOUT\n"));
    }

    #[test]
    fn accepts_compiler_empty_string_literal() {
        // Unlike the stricter assembler-loader grammar, the compiler's own
        // scanner accepts an empty string literal.
        let src = ".SYNTAX TEST S = '' .,  .END";
        assert!(compile(src).is_ok());
    }
}
