use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_bashfn")))
}

fn source_file(input: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(input.as_bytes()).unwrap();
    file
}

/// Compile `input` through the CLI, returning the compiled text.
fn compile(input: &str) -> String {
    let infile = source_file(input);
    let assert = cmd()
        .args(["-i", infile.path().to_str().unwrap()])
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

fn bash_available() -> bool {
    Command::new("bash")
        .args(["-c", "true"])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Compile `input`, then execute the result with bash.
fn compile_and_run(input: &str, args: &[&str]) -> std::process::Output {
    let compiled = compile(input);
    let script = source_file(&compiled);
    Command::new("bash")
        .arg(script.path())
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn cli_identity_without_directives() {
    let input = "#!/bin/bash\necho hello\n  echo indented\n";
    assert_eq!(compile(input), input);
}

#[test]
fn cli_compile_to_file() {
    let infile = source_file("@fn hi {\n    echo hi\n}\n");
    let outfile = NamedTempFile::new().unwrap();

    cmd()
        .args(["-i", infile.path().to_str().unwrap()])
        .args(["-o", outfile.path().to_str().unwrap()])
        .assert()
        .success();

    let result = std::fs::read_to_string(outfile.path()).unwrap();
    assert!(result.contains("function hi() {"), "Got: {result}");
    assert!(result.contains("# usage: hi [ARGS]"), "Got: {result}");
}

#[test]
fn cli_missing_input() {
    cmd()
        .args(["-i", "/tmp/nonexistent_bashfn_test_xyz.bfn"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn cli_requires_a_mode() {
    cmd().assert().failure();
}

#[test]
fn cli_parse_error_reports_offset() {
    let infile = source_file("echo ok\n@fn {\n");
    cmd()
        .args(["-i", infile.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error at byte"));
}

#[test]
fn cli_malformed_directives_all_fail() {
    for input in [
        "@fn {",
        "@fn arg=value {",
        "@fn name arg={",
        "@fn name arg= {",
        "@fn name arg={} {",
    ] {
        let infile = source_file(input);
        cmd()
            .args(["-i", infile.path().to_str().unwrap()])
            .assert()
            .failure()
            .stderr(predicate::str::contains("parse error"));
    }
}

#[test]
fn compiled_greeting_runs() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let input = "@fn hi greeting='Hello', target='World' {\n    \
                 echo \"${greeting}, ${target}!\"\n}\n\
                 hi --greeting \"Hi\" --target \"Human\"\n";
    let output = compile_and_run(input, &[]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "Hi, Human!\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_required_flag_errors_at_runtime() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let input = "@fn hi greeting {\n    echo \"${greeting}\"\n}\nhi\n";
    let output = compile_and_run(input, &[]);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "[ERROR] The --greeting parameter must be given.\n"
    );
    // The failed call is the script's last command.
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn default_substitutions_evaluate_at_call_time() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let input = "@fn f msg=$(echo dyn) {\n    echo \"${msg}\"\n}\nf\nf --msg given\n";
    let output = compile_and_run(input, &[]);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "dyn\ngiven\n");
}

// The classic mixed scenario: defaults, overrides, leftover args
// forwarded as "$@", piping between compiled functions, explicit exit.
#[test]
fn compiled_script_full_scenario() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let input = r#"#!/bin/bash

@fn hi greeting='Hello', target='World' {
    echo "${greeting}, ${target}!$@"
}

@fn filter regex {
    while read line; do
        if [[ ${line} =~ ${regex} ]]; then
            echo "${line}"
        fi
    done
}

hi
hi --target "Human"
hi --greeting "Greetings"
hi --greeting "Greetings" --target "Human"
hi --greeting "Greetings" --target "Human" " Have" "fun!"

{
    hi --greeting "What now" --target "Human?"
    hi --greeting "Welcome" --target "Cyborg"
    hi --greeting "Hi" --target "human"

} | filter --regex "[Hh]uman"

exit 55
"#;
    let output = compile_and_run(input, &[]);
    let expected = "\
Hello, World!
Hello, Human!
Greetings, World!
Greetings, Human!
Greetings, Human! Have fun!
What now, Human?!
Hi, human!
";
    assert_eq!(String::from_utf8_lossy(&output.stdout), expected);
    assert_eq!(output.status.code(), Some(55));
}

#[test]
fn tab_indented_directive_keeps_tabs() {
    let input = "\t@fn f x {\n\t\techo \"$x\"\n\t}\n";
    let result = compile(input);
    assert!(result.contains("\tfunction f() {\n"), "Got: {result}");
    assert!(result.contains("\t\tlocal x\n"), "Got: {result}");
    assert!(result.contains("\t\t\tif [ \"${!i}\" == \"--x\" ]; then\n"), "Got: {result}");
    assert!(!result.contains("    local"), "Got: {result}");
}

// --- Run mode ---

#[test]
fn run_mode_exits_with_script_status() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let infile = source_file("@fn hi {\n    echo direct\n}\nhi\nexit 7\n");
    cmd()
        .args(["-r", infile.path().to_str().unwrap()])
        .assert()
        .code(7)
        .stdout(predicate::str::contains("direct"));
}

#[test]
fn run_mode_forwards_trailing_args() {
    if !bash_available() {
        eprintln!("bash not found, skipping");
        return;
    }
    let infile = source_file("echo \"got: $1 $2\"\n");
    cmd()
        .args(["-r", infile.path().to_str().unwrap()])
        .args(["--", "alpha", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("got: alpha beta"));
}

#[test]
fn run_mode_conflicts_with_out() {
    let infile = source_file("echo hi\n");
    cmd()
        .args(["-r", infile.path().to_str().unwrap()])
        .args(["-o", "/tmp/should_not_be_written.sh"])
        .assert()
        .failure();
}
