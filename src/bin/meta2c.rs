//! `meta2c` — compiles a META II grammar into textual assembly.
//!
//! Usage: `meta2c <grammar-path>`. Assembly is written to standard output;
//! a compile error is reported to standard error and the process exits
//! non-zero.

use std::env;
use std::fs;
use std::process::ExitCode;

use meta2::compiler::compile;

fn main() -> ExitCode {
    env_logger::init();

    let prog_name = env::args().next().unwrap_or_else(|| "meta2c".to_string());
    let args: Vec<String> = env::args().skip(1).collect();

    let Some(path) = args.first() else {
        eprintln!("usage: {prog_name} <grammar-path>");
        return ExitCode::FAILURE;
    };

    log::debug!("reading grammar from {path}");
    let source = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{prog_name}: cannot read grammar file `{path}': {e}");
            return ExitCode::FAILURE;
        }
    };

    log::debug!("compiling grammar ({} bytes)", source.len());
    match compile(&source) {
        Ok(assembly) => {
            log::trace!("compiled to {} bytes of assembly", assembly.len());
            print!("{assembly}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{prog_name}: {path}: error: {e}");
            ExitCode::FAILURE
        }
    }
}
