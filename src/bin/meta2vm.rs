//! `meta2vm` — loads a META II assembly listing and runs it against an
//! input file.
//!
//! Usage: `meta2vm [--backtrack] <code-path> <input-path>`. The linear
//! machine is used unless `--backtrack` selects the backtracking variant.
//! Emitted output is written to standard output; a load or runtime error is
//! reported to standard error and the process exits non-zero.

use std::env;
use std::fs;
use std::process::ExitCode;

use meta2::asm::loader::load;
use meta2::machine::backtracking::BacktrackingMachine;
use meta2::machine::linear::LinearMachine;

fn main() -> ExitCode {
    env_logger::init();

    let prog_name = env::args().next().unwrap_or_else(|| "meta2vm".to_string());
    let mut backtrack = false;
    let mut positional = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--backtrack" {
            backtrack = true;
        } else {
            positional.push(arg);
        }
    }

    let (Some(code_path), Some(input_path)) = (positional.first(), positional.get(1)) else {
        eprintln!("usage: {prog_name} [--backtrack] <code-path> <input-path>");
        return ExitCode::FAILURE;
    };

    log::debug!("loading assembly from {code_path}");
    let assembly = match fs::read_to_string(code_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{prog_name}: cannot read code file `{code_path}': {e}");
            return ExitCode::FAILURE;
        }
    };
    let program = match load(&assembly) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{prog_name}: {code_path}: error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if program.entry_point().is_none() {
        eprintln!("{prog_name}: code file `{code_path}' does not begin with ADR instruction");
        return ExitCode::FAILURE;
    }

    log::debug!("reading input from {input_path}");
    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{prog_name}: cannot read input file `{input_path}': {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut out = String::new();
    log::debug!("executing ({} machine)", if backtrack { "backtracking" } else { "linear" });
    let result = if backtrack {
        BacktrackingMachine::new(&program).run(&input, &mut out)
    } else {
        LinearMachine::new(&program).run(&input, &mut out)
    };

    print!("{out}");
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{prog_name}: {input_path}: {e}");
            ExitCode::FAILURE
        }
    }
}
