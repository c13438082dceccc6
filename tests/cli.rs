use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn script(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file to be created");
    file.write_all(source.as_bytes()).expect("temp file to be writable");
    file
}

#[test]
fn a_clean_script_exits_zero() {
    let file = script("print \"ok\";");

    Command::cargo_bin("loxi")
        .unwrap()
        .arg(file.path())
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn a_parse_error_exits_with_the_data_error_code() {
    let file = script("var a = ;");

    Command::cargo_bin("loxi")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(64);
}

#[test]
fn a_runtime_error_exits_with_the_runtime_error_code() {
    let file = script("print 1 + \"x\";");

    Command::cargo_bin("loxi")
        .unwrap()
        .arg(file.path())
        .assert()
        .code(70);
}

#[test]
fn print_flag_prints_the_ast_instead_of_running_the_script() {
    let file = script("print 1 + 2;");

    Command::cargo_bin("loxi")
        .unwrap()
        .arg("--print")
        .arg(file.path())
        .assert()
        .success()
        .stdout("(print (+ 1 2))\n");
}

#[test]
fn a_missing_script_file_is_reported_and_exits_with_a_dedicated_code() {
    Command::cargo_bin("loxi")
        .unwrap()
        .arg("/no/such/file.lox")
        .assert()
        .code(74);
}
