use std::path::Path;

use emulator::loader::{self, LoadError};
use emulator::region::Region;
use emulator::vm::{Error, Vm};

fn run(name: &str) -> (Vm, String) {
  let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("programs").join(name);
  let chunk = loader::load(path).unwrap();
  let mut vm = Vm::new();
  vm.load(&chunk).unwrap();
  let mut out = Vec::new();
  vm.run(&mut out).unwrap();
  (vm, String::from_utf8(out).unwrap())
}

#[test]
fn print8() {
  let (vm, out) = run("print8.ls8");
  assert_eq!(out, "8\n");
  assert!(vm.is_halted());
}

#[test]
fn mult() {
  let (_, out) = run("mult.ls8");
  assert_eq!(out, "72\n");
}

#[test]
fn stack() {
  let (vm, out) = run("stack.ls8");
  assert_eq!(out, "2\n4\n1\n");
  assert_eq!(vm.registers().sp(), 0xF4);
}

#[test]
fn call() {
  let (vm, out) = run("call.ls8");
  assert_eq!(out, "20\n30\n36\n60\n");
  // the last CALL leaves its return address in the link register
  assert_eq!(vm.registers().get(4), Some(23));
  assert_eq!(vm.pc(), 24);
}

#[test]
fn branch() {
  let (_, out) = run("branch.ls8");
  assert_eq!(out, "1\n4\n");
}

#[test]
fn division_by_zero_stops_execution() {
  let chunk = loader::parse(
    "\
10000010 # LDI R0,9
00000000
00001001
01000111 # PRN R0
00000000
10100100 # MOD R0,R1
00000000
00000001
01000111 # PRN R0
00000000
00000001 # HLT
",
  )
  .unwrap();
  assert_eq!(chunk.instructions().len(), 11);
  let mut vm = Vm::new();
  vm.load(&chunk).unwrap();
  let mut out = Vec::new();
  let err = vm.run(&mut out).unwrap_err();
  assert!(matches!(err, Error::DivisionByZero { pc: 5 }));
  assert_eq!(String::from_utf8(out).unwrap(), "9\n");
  assert!(!vm.is_halted());
}

#[test]
fn missing_program() {
  let err = loader::load("programs/nope.ls8").unwrap_err();
  assert!(matches!(err, LoadError::NotFound { .. }));
}
