use std::fmt::Write as _;
use std::io::{self, Write};

use crate::alu::{self, Op, FLAG_EQUAL};
use crate::memory::{Memory, MEMORY_SIZE};
use crate::opcode::{operand_count, Opcode, UnknownOpcode};
use crate::region::Region;
use crate::registers::{Registers, LINK, REGISTER_COUNT};

#[derive(Debug, Clone, Copy, PartialEq)]
enum State {
  Running,
  Halted,
}

/// An LS-8 machine: memory, registers, program counter and flags.
#[derive(Debug)]
pub struct Vm {
  // address of the opcode about to be executed
  pc: usize,
  fl: u8,
  memory: Memory,
  registers: Registers,
  state: State,
}

impl Vm {
  /// Create a new machine with zeroed memory and an empty stack
  pub fn new() -> Self {
    Self {
      pc: 0,
      fl: 0,
      memory: Memory::new(),
      registers: Registers::new(),
      state: State::Running,
    }
  }

  /// Copy a program image into memory, starting at address 0
  pub fn load<R>(&mut self, region: &R) -> Result<(), Error>
  where
    R: Region,
  {
    let image = region.instructions();
    self.memory.load(image).ok_or(Error::ProgramTooLarge { len: image.len() })?;
    log::debug!("loaded {} bytes", image.len());
    Ok(())
  }

  /// Execute a single instruction, writing anything it prints to `out`
  pub fn step<W>(&mut self, out: &mut W) -> Result<(), Error>
  where
    W: Write,
  {
    if self.state == State::Halted {
      return Err(Error::MachineHalted);
    }
    log::trace!("{}", self.trace());
    let mut task = Task::new(self, out);
    task.run()
  }

  /// Step until the machine halts, returning how many instructions ran
  pub fn run<W>(&mut self, out: &mut W) -> Result<usize, Error>
  where
    W: Write,
  {
    let mut steps = 0;
    while self.state == State::Running {
      self.step(out)?;
      steps += 1;
    }
    log::debug!("halted at {:#04x} after {steps} instructions", self.pc);
    Ok(steps)
  }

  /// One line snapshot: pc, the three bytes at pc, then every register.
  ///
  /// Once the last instruction in memory has run, pc points one past the end
  /// and prints as `100`. Bytes past the end print as `00`.
  pub fn trace(&self) -> String {
    let byte = |address: usize| self.memory.read(address).unwrap_or(0);
    let mut line = format!(
      "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
      self.pc,
      byte(self.pc),
      byte(self.pc + 1),
      byte(self.pc + 2)
    );
    for value in self.registers.as_array() {
      let _ = write!(line, " {value:02X}");
    }
    line
  }

  pub fn pc(&self) -> usize {
    self.pc
  }

  pub fn flags(&self) -> u8 {
    self.fl
  }

  pub fn registers(&self) -> &Registers {
    &self.registers
  }

  pub fn memory(&self) -> &Memory {
    &self.memory
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::Halted
  }

  fn read(&self, address: usize) -> Result<u8, Error> {
    self.memory.read(address).ok_or(Error::AddressOutOfRange { address })
  }

  fn reg(&self, index: u8) -> Result<u8, Error> {
    self.registers.get(index.into()).ok_or(Error::InvalidRegister { index })
  }

  fn set_reg(&mut self, index: u8, value: u8) -> Result<(), Error> {
    self.registers.set(index.into(), value).ok_or(Error::InvalidRegister { index })
  }

  fn push(&mut self, value: u8) -> Result<(), Error> {
    let sp = self.registers.sp().checked_sub(1).ok_or(Error::StackOverflow)?;
    self.memory.write(sp.into(), value).ok_or(Error::AddressOutOfRange { address: sp.into() })?;
    self.registers.set_sp(sp);
    Ok(())
  }

  fn pop(&mut self) -> Result<u8, Error> {
    let sp = self.registers.sp();
    let value = self.read(sp.into())?;
    self.registers.set_sp(sp.checked_add(1).ok_or(Error::StackUnderflow)?);
    Ok(value)
  }
}

impl Default for Vm {
  fn default() -> Self {
    Self::new()
  }
}

/// A fatal fault raised while loading or executing a program
#[derive(thiserror::Error, Debug)]
pub enum Error {
  #[error("unknown opcode {opcode:#04x} at {pc:#04x}")]
  UnknownOpcode { opcode: u8, pc: usize },

  #[error("division by zero at {pc:#04x}")]
  DivisionByZero { pc: usize },

  #[error("address {address:#04x} is outside of memory")]
  AddressOutOfRange { address: usize },

  #[error("r{index} is not a register, there are only {}", REGISTER_COUNT)]
  InvalidRegister { index: u8 },

  #[error("push with the stack pointer at address 0")]
  StackOverflow,

  #[error("pop with the stack pointer past the end of memory")]
  StackUnderflow,

  #[error("program is {len} bytes, memory only holds {}", MEMORY_SIZE)]
  ProgramTooLarge { len: usize },

  #[error("machine is halted")]
  MachineHalted,

  #[error("could not write program output")]
  Output(#[from] io::Error),
}

/// What the engine does with the program counter once a handler returns
#[derive(Debug, Clone, Copy, PartialEq)]
enum Flow {
  /// Move past the instruction and its operands
  Next,
  /// The handler picked the next address itself
  Jump(u8),
}

struct Task<'vm, 'out, W> {
  vm: &'vm mut Vm,
  out: &'out mut W,
  // address of the next operand byte
  cursor: usize,
}

impl<'vm, 'out, W> Task<'vm, 'out, W>
where
  W: Write,
{
  fn new(vm: &'vm mut Vm, out: &'out mut W) -> Self {
    let cursor = vm.pc + 1;
    Self { vm, out, cursor }
  }

  #[inline]
  fn eat(&mut self) -> Result<u8, Error> {
    let byte = self.vm.read(self.cursor)?;
    self.cursor += 1;
    Ok(byte)
  }

  fn run(&mut self) -> Result<(), Error> {
    let pc = self.vm.pc;
    let byte = self.vm.read(pc)?;
    let width = 1 + usize::from(operand_count(byte));
    let op = Opcode::try_from(byte)
      .map_err(|UnknownOpcode(opcode)| Error::UnknownOpcode { opcode, pc })?;
    let flow = match op {
      Opcode::Halt => halt(self)?,
      Opcode::LoadImmediate => load_immediate(self)?,
      Opcode::Print => print(self)?,
      Opcode::Add => arithmetic(self, Op::Add)?,
      Opcode::Multiply => arithmetic(self, Op::Mul)?,
      Opcode::Modulo => arithmetic(self, Op::Mod)?,
      Opcode::And => arithmetic(self, Op::And)?,
      Opcode::Or => arithmetic(self, Op::Or)?,
      Opcode::Xor => arithmetic(self, Op::Xor)?,
      Opcode::ShiftLeft => arithmetic(self, Op::Shl)?,
      Opcode::ShiftRight => arithmetic(self, Op::Shr)?,
      Opcode::Compare => compare(self)?,
      Opcode::Not => not(self)?,
      Opcode::Push => push(self)?,
      Opcode::Pop => pop(self)?,
      Opcode::Call => call(self, pc)?,
      Opcode::Return => ret(self)?,
      Opcode::Jump => jump(self)?,
      Opcode::JumpIfEqual => jump_if(self, true)?,
      Opcode::JumpIfNotEqual => jump_if(self, false)?,
    };
    debug_assert!(self.cursor <= pc + width, "{} ate too many operands", op.mnemonic());
    self.vm.pc = match flow {
      Flow::Next => pc + width,
      Flow::Jump(target) => target.into(),
    };
    Ok(())
  }
}

// halted ← 1
fn halt<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  task.vm.state = State::Halted;
  Ok(Flow::Next)
}

// r[a] ← vv
fn load_immediate<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  let vv = task.eat()?;
  task.vm.set_reg(a, vv)?;
  Ok(Flow::Next)
}

// stdout ← r[a]
fn print<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  let value = task.vm.reg(a)?;
  writeln!(task.out, "{value}")?;
  Ok(Flow::Next)
}

// r[a] ← r[a] op r[b]
fn arithmetic<W>(task: &mut Task<'_, '_, W>, op: Op) -> Result<Flow, Error>
where
  W: Write,
{
  let pc = task.vm.pc;
  let a = task.eat()?;
  let b = task.eat()?;
  let value = alu::apply(op, task.vm.reg(a)?, task.vm.reg(b)?)
    .map_err(|_| Error::DivisionByZero { pc })?;
  task.vm.set_reg(a, value)?;
  Ok(Flow::Next)
}

// fl ← cmp(r[a], r[b])
fn compare<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  let b = task.eat()?;
  task.vm.fl = alu::compare(task.vm.reg(a)?, task.vm.reg(b)?);
  Ok(Flow::Next)
}

// r[a] ← ~r[a]
fn not<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  let value = alu::not(task.vm.reg(a)?);
  task.vm.set_reg(a, value)?;
  Ok(Flow::Next)
}

// sp ← sp − 1, m[sp] ← r[a]
fn push<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  let value = task.vm.reg(a)?;
  task.vm.push(value)?;
  Ok(Flow::Next)
}

// r[a] ← m[sp], sp ← sp + 1
fn pop<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  task.vm.reg(a)?;
  let value = task.vm.pop()?;
  task.vm.set_reg(a, value)?;
  Ok(Flow::Next)
}

// r4 ← pc + 2, push r4, pc ← r[a]
//
// The target is read after r4 is written, so `CALL r4` lands on the return
// address. Compiled programs rely on r4 being clobbered here.
fn call<W>(task: &mut Task<'_, '_, W>, pc: usize) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  task.vm.reg(a)?;
  let address = pc + 2;
  let link = u8::try_from(address).map_err(|_| Error::AddressOutOfRange { address })?;
  task.vm.push(link)?;
  task.vm.set_reg(LINK as u8, link)?;
  Ok(Flow::Jump(task.vm.reg(a)?))
}

// pop r4, pc ← r4
fn ret<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let link = task.vm.pop()?;
  task.vm.set_reg(LINK as u8, link)?;
  Ok(Flow::Jump(link))
}

// pc ← r[a]
fn jump<W>(task: &mut Task<'_, '_, W>) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  Ok(Flow::Jump(task.vm.reg(a)?))
}

// if fl.E == equal : pc ← r[a]
fn jump_if<W>(task: &mut Task<'_, '_, W>, equal: bool) -> Result<Flow, Error>
where
  W: Write,
{
  let a = task.eat()?;
  if (task.vm.fl & FLAG_EQUAL != 0) == equal {
    Ok(Flow::Jump(task.vm.reg(a)?))
  } else {
    Ok(Flow::Next)
  }
}
