use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn ls8(args: &[&str]) -> Output {
  Command::new(env!("CARGO_BIN_EXE_ls8"))
    .args(args)
    .env_remove("LS8_LOG")
    .output()
    .expect("failed to spawn ls8")
}

fn program(dir: &Path, name: &str, source: &str) -> String {
  let path = dir.join(name);
  fs::write(&path, source).expect("failed to write program");
  path.to_str().unwrap().to_owned()
}

#[test]
fn print8() {
  let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("programs/print8.ls8");
  let output = ls8(&[path.to_str().unwrap()]);
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "8\n");
}

#[test]
fn no_arguments() {
  let output = ls8(&[]);
  assert_eq!(output.status.code(), Some(1));
  assert!(output.stdout.is_empty());
}

#[test]
fn too_many_arguments() {
  let output = ls8(&["one.ls8", "two.ls8"]);
  assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help() {
  let output = ls8(&["--help"]);
  assert_eq!(output.status.code(), Some(0));
}

#[test]
fn missing_program() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let path = dir.path().join("nope.ls8");
  let output = ls8(&[path.to_str().unwrap()]);
  assert_eq!(output.status.code(), Some(2));
  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("not found"), "stderr was {stderr:?}");
}

#[test]
fn malformed_program() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let path = program(dir.path(), "bad.ls8", "10000010\n0000000x\n");
  let output = ls8(&[path.as_str()]);
  assert_eq!(output.status.code(), Some(3));
  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("line 2"), "stderr was {stderr:?}");
}

#[test]
fn division_by_zero() {
  let dir = tempfile::tempdir().expect("failed to create temp dir");
  let source = "\
10000010 # LDI R0,9
00000000
00001001
01000111 # PRN R0
00000000
10100100 # MOD R0,R1
00000000
00000001
00000001 # HLT
";
  let path = program(dir.path(), "mod0.ls8", source);
  let output = ls8(&[path.as_str()]);
  assert_eq!(output.status.code(), Some(4));
  assert_eq!(String::from_utf8(output.stdout).unwrap(), "9\n");
  let stderr = String::from_utf8(output.stderr).unwrap();
  assert!(stderr.contains("division by zero"), "stderr was {stderr:?}");
}
