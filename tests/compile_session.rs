//! End-to-end exercise of `CompilationSession` against whole programs,
//! the way a consumer of the crate would drive it.

use test_log::test;
use zengine::config::CompilerConfig;
use zengine::driver::{CompilationSession, CompileFailure};
use zengine::vm_memory::ZMachine;
use zengine::zvalue::ZMachineVersion;

#[test]
fn compiles_a_program_with_globals_objects_and_routines() {
    let mut session = CompilationSession::new(CompilerConfig::default());
    let source = r#"
        <GLOBAL SCORE 0>
        <GLOBAL MOVES 0>
        <OBJECT WEST-OF-HOUSE
            (DESC "West of House")
            (FLAGS LIGHTBIT)>
        <OBJECT MAILBOX
            (DESC "small mailbox")
            (FLAGS CONTBIT OPENBIT)>
        <ROUTINE GO ()
            <SET ,SCORE 1>
            <SET ,MOVES 1>
            <RTRUE>>
    "#;

    let story_file = session.compile("zork.zil", source).expect("compilation should succeed");

    let mut vm = ZMachine::new();
    vm.load_story_file(story_file).expect("assembled story file should be well-formed");
    assert!(vm.validate_memory_management());
    assert_eq!(vm.header().unwrap().version, ZMachineVersion::V3);
}

#[test]
fn targets_the_configured_version() {
    let mut config = CompilerConfig::default();
    config.set_target_version(ZMachineVersion::V5);
    let mut session = CompilationSession::new(config);

    let story_file = session.compile("test.zil", "<GLOBAL SCORE 0>").unwrap();
    assert_eq!(story_file[0], 5);
}

#[test]
fn redefining_a_routine_is_a_compile_error() {
    let mut session = CompilationSession::new(CompilerConfig::default());
    let source = "<ROUTINE GO () <RTRUE>> <ROUTINE GO () <RFALSE>>";
    let err = session.compile("test.zil", source).unwrap_err();
    match err {
        CompileFailure::Diagnostics(diags) => {
            assert!(diags.iter().any(|d| d.code == "symbol-redefinition"));
        }
        other => panic!("expected diagnostics failure, got {:?}", other),
    }
}

#[test]
fn a_malformed_program_reports_a_parse_error_without_panicking() {
    let mut session = CompilationSession::new(CompilerConfig::default());
    let err = session.compile("test.zil", "<ROUTINE GO (").unwrap_err();
    assert!(matches!(err, CompileFailure::Parse(_)));
}

#[test]
fn loading_a_toml_config_changes_the_compiled_version() {
    let config = CompilerConfig::from_toml_str("target_version = 4\n").unwrap();
    let mut session = CompilationSession::new(config);
    let story_file = session.compile("test.zil", "<GLOBAL SCORE 0>").unwrap();
    assert_eq!(story_file[0], 4);
}
