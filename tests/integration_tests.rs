//! End-to-end tests exercising the full grammar -> assembly -> program ->
//! execution pipeline, one per scenario traced against the reference META
//! II compiler/machine sources.

use meta2::asm::loader::load;
use meta2::compiler::compile;
use meta2::error::RuntimeError;
use meta2::machine::backtracking::BacktrackingMachine;
use meta2::machine::linear::LinearMachine;

fn build(grammar: &str) -> meta2::asm::loader::Program {
    let asm = compile(grammar).expect("grammar should compile");
    load(&asm).expect("assembly should load")
}

/// S1 — minimal grammar: a bare `.EMPTY` body still carries the BF/label
/// pair every `EX2` alternative emits; nothing in the original compiler
/// special-cases a single-term body.
#[test]
fn s1_minimal_grammar_emission() {
    let asm = compile(".SYNTAX A A = .EMPTY .,  .END").unwrap();
    assert_eq!(
        asm,
        "\tADR A\n\
         A\n\
         \tSET\n\
         \tBF L1\n\
         L1\n\
         L2\n\
         \tR\n\
         \tEND\n"
    );
}

/// S2 — literal match. A rule whose body is a single bare term never emits
/// a `BE`, so a mismatch does not raise a diagnostic; it falls straight
/// through to `R` with `res` left false and unobserved. This is a faithful
/// property of the original compiler's naive code generation, not a defect:
/// only a body with at least two concatenated terms (or a nested `CLL`)
/// ever reaches the checkpoint that can fail. See S6 for that case.
#[test]
fn s2_literal_match_success() {
    let program = build(".SYNTAX A  A = 'x' .,  .END");
    let mut out = String::new();
    LinearMachine::new(&program).run("x", &mut out).unwrap();
    assert_eq!(out, "");

    let mut out = String::new();
    BacktrackingMachine::new(&program).run("x", &mut out).unwrap();
    assert_eq!(out, "");
}

#[test]
fn s2_literal_mismatch_has_no_checkpoint_to_fail() {
    let program = build(".SYNTAX A  A = 'x' .,  .END");
    let mut out = String::new();
    LinearMachine::new(&program).run("y", &mut out).unwrap();
    assert_eq!(out, "");
}

/// S3 — alternation with output. Same caveat as S2: each alternative here
/// is a single bare term, so neither has a `BE`; a run matching neither
/// literal still returns cleanly having emitted nothing.
#[test]
fn s3_alternation_with_output() {
    let program = build(".SYNTAX A  A = 'x' .OUT('X') / 'y' .OUT('Y') .,  .END");

    let mut out = String::new();
    LinearMachine::new(&program).run("x", &mut out).unwrap();
    assert_eq!(out, "\tX\n");

    let mut out = String::new();
    LinearMachine::new(&program).run("y", &mut out).unwrap();
    assert_eq!(out, "\tY\n");

    let mut out = String::new();
    LinearMachine::new(&program).run("z", &mut out).unwrap();
    assert_eq!(out, "");
}

/// S4 — iteration. `$'x'` always succeeds (the trailing unconditional
/// `SET` absorbs the terminating mismatch); it just consumes as many
/// leading `x`s as present.
#[test]
fn s4_iteration_always_succeeds() {
    let program = build(".SYNTAX A A = $'x' .,  .END");

    for input in ["", "xxx", "xy"] {
        let mut out = String::new();
        LinearMachine::new(&program).run(input, &mut out).unwrap();
        assert_eq!(out, "");
    }
}

/// S5 — synthetic labels. Two `*1` emissions within one call's frame share
/// a label; a second, separate `CLL` into the same rule allocates a fresh
/// one from the shared, monotonic label counter.
#[test]
fn s5_synthetic_labels_stable_within_frame_fresh_across_calls() {
    let program = build(
        ".SYNTAX P \
         P = T T .,  \
         T = .ID .OUT(*1) .,  \
         .END",
    );
    let mut out = String::new();
    LinearMachine::new(&program).run("foo bar", &mut out).unwrap();
    assert_eq!(out, "\tL1\n\tL2\n");
}

/// S6 — backtracking rewind. The first alternative matches its opening
/// literal, emits output, then fails on a second literal. The backtracking
/// machine discards that output and the second alternative proceeds from
/// the original input position; the linear machine instead terminates with
/// a syntax error, output already committed.
#[test]
fn s6_backtracking_discards_failed_alternative_output() {
    let program = build(
        ".SYNTAX S \
         S = T / 'A' .,  \
         T = 'A' .OUT('X') 'B' .,  \
         .END",
    );

    let mut out = String::new();
    BacktrackingMachine::new(&program).run("AC", &mut out).unwrap();
    assert_eq!(out, "", "a failed alternative's output must not survive the rewind");
}

#[test]
fn s6_linear_commits_output_before_failing() {
    let program = build(
        ".SYNTAX S \
         S = T / 'A' .,  \
         T = 'A' .OUT('X') 'B' .,  \
         .END",
    );

    let mut out = String::new();
    let err = LinearMachine::new(&program).run("AC", &mut out).unwrap_err();
    assert!(matches!(err, RuntimeError::SyntaxError { .. }));
    assert_eq!(out, "\tX\n", "output already written stays written on the linear machine");
}

#[test]
fn rejects_program_with_unknown_mnemonic() {
    let err = load("\tFOO\n").unwrap_err();
    assert!(err.to_string().contains("unknown mnemonic"));
}

#[test]
fn rejects_grammar_with_unrecognized_dot_keyword() {
    let err = compile(".SYNTAX A A = .BOGUS .,  .END").unwrap_err();
    assert!(err.to_string().contains("unrecognized"));
}

#[test]
fn full_pipeline_round_trip_through_a_two_rule_grammar() {
    let grammar = ".SYNTAX GREETING \
                   GREETING = 'hello' .OUT('greeted') .,  \
                   .END";
    let program = build(grammar);
    let mut out = String::new();
    LinearMachine::new(&program).run("hello", &mut out).unwrap();
    assert_eq!(out, "\tgreeted\n");
}
