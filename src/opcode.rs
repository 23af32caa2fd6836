/// Number of operand bytes that follow `opcode`, taken from its top two bits.
///
/// This holds for every instruction, so the engine never needs a per-opcode
/// width table.
#[inline]
pub const fn operand_count(opcode: u8) -> u8 {
  opcode >> 6
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
  /// Stops the machine.
  ///
  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Halt      | `halted ← 1`  | `HLT`    |
  Halt = 0b0000_0001,

  /// Loads an immediate value into a register.
  ///
  /// | Operation      | Semantics/RTL | Assembly       |
  /// |----------------|---------------|----------------|
  /// | Load Immediate | `r[a] ← vv`   | `LDI ra, vv`   |
  LoadImmediate = 0b1000_0010,

  /// Prints the decimal value of a register.
  ///
  /// | Operation | Semantics/RTL    | Assembly |
  /// |-----------|------------------|----------|
  /// | Print     | `stdout ← r[a]`  | `PRN ra` |
  Print = 0b0100_0111,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Add       | `r[a] ← r[a] + r[b]` | `ADD ra, rb` |
  Add = 0b1010_0000,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Multiply  | `r[a] ← r[a] × r[b]` | `MUL ra, rb` |
  Multiply = 0b1010_0010,

  /// Compares two registers, setting exactly one of the flag bits.
  ///
  /// | Operation | Semantics/RTL          | Assembly     |
  /// |-----------|------------------------|--------------|
  /// | Compare   | `fl ← cmp(r[a], r[b])` | `CMP ra, rb` |
  Compare = 0b1010_0111,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | And       | `r[a] ← r[a] & r[b]` | `AND ra, rb` |
  And = 0b1010_1000,

  /// | Operation | Semantics/RTL         | Assembly    |
  /// |-----------|-----------------------|-------------|
  /// | Or        | `r[a] ← r[a] \| r[b]` | `OR ra, rb` |
  Or = 0b1010_1010,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Xor       | `r[a] ← r[a] ^ r[b]` | `XOR ra, rb` |
  Xor = 0b1010_1011,

  /// | Operation | Semantics/RTL  | Assembly |
  /// |-----------|----------------|----------|
  /// | Not       | `r[a] ← ~r[a]` | `NOT ra` |
  Not = 0b0110_1001,

  /// | Operation  | Semantics/RTL         | Assembly     |
  /// |------------|-----------------------|--------------|
  /// | Shift Left | `r[a] ← r[a] << r[b]` | `SHL ra, rb` |
  ShiftLeft = 0b1010_1100,

  /// | Operation   | Semantics/RTL         | Assembly     |
  /// |-------------|-----------------------|--------------|
  /// | Shift Right | `r[a] ← r[a] >> r[b]` | `SHR ra, rb` |
  ShiftRight = 0b1010_1101,

  /// | Operation | Semantics/RTL        | Assembly     |
  /// |-----------|----------------------|--------------|
  /// | Modulo    | `r[a] ← r[a] % r[b]` | `MOD ra, rb` |
  Modulo = 0b1010_0100,

  /// | Operation | Semantics/RTL                    | Assembly  |
  /// |-----------|----------------------------------|-----------|
  /// | Push      | `sp ← sp − 1`, `m[sp] ← r[a]`    | `PUSH ra` |
  Push = 0b0100_0101,

  /// | Operation | Semantics/RTL                 | Assembly |
  /// |-----------|-------------------------------|----------|
  /// | Pop       | `r[a] ← m[sp]`, `sp ← sp + 1` | `POP ra` |
  Pop = 0b0100_0110,

  /// Calls a subroutine, stashing the return address in `r4` and on the
  /// stack.
  ///
  /// | Operation | Semantics/RTL                              | Assembly  |
  /// |-----------|--------------------------------------------|-----------|
  /// | Call      | `r4 ← pc + 2`, `push r4`, `pc ← r[a]`      | `CALL ra` |
  Call = 0b0101_0000,

  /// | Operation | Semantics/RTL          | Assembly |
  /// |-----------|------------------------|----------|
  /// | Return    | `pop r4`, `pc ← r4`    | `RET`    |
  Return = 0b0001_0001,

  /// | Operation | Semantics/RTL | Assembly |
  /// |-----------|---------------|----------|
  /// | Jump      | `pc ← r[a]`   | `JMP ra` |
  Jump = 0b0101_0100,

  /// | Operation     | Semantics/RTL           | Assembly |
  /// |---------------|-------------------------|----------|
  /// | Jump If Equal | `if fl.E : pc ← r[a]`   | `JEQ ra` |
  JumpIfEqual = 0b0101_0101,

  /// | Operation         | Semantics/RTL          | Assembly |
  /// |-------------------|------------------------|----------|
  /// | Jump If Not Equal | `if !fl.E : pc ← r[a]` | `JNE ra` |
  JumpIfNotEqual = 0b0101_0110,
}

impl Opcode {
  /// How many operand bytes follow this opcode in memory.
  pub const fn operands(self) -> u8 {
    operand_count(self as u8)
  }

  pub const fn mnemonic(self) -> &'static str {
    match self {
      Self::Halt => "HLT",
      Self::LoadImmediate => "LDI",
      Self::Print => "PRN",
      Self::Add => "ADD",
      Self::Multiply => "MUL",
      Self::Compare => "CMP",
      Self::And => "AND",
      Self::Or => "OR",
      Self::Xor => "XOR",
      Self::Not => "NOT",
      Self::ShiftLeft => "SHL",
      Self::ShiftRight => "SHR",
      Self::Modulo => "MOD",
      Self::Push => "PUSH",
      Self::Pop => "POP",
      Self::Call => "CALL",
      Self::Return => "RET",
      Self::Jump => "JMP",
      Self::JumpIfEqual => "JEQ",
      Self::JumpIfNotEqual => "JNE",
    }
  }
}

/// Returned when a byte is not one of the known opcodes.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown opcode {0:#04x}")]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
  type Error = UnknownOpcode;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    let op = match byte {
      0b0000_0001 => Self::Halt,
      0b1000_0010 => Self::LoadImmediate,
      0b0100_0111 => Self::Print,
      0b1010_0000 => Self::Add,
      0b1010_0010 => Self::Multiply,
      0b1010_0111 => Self::Compare,
      0b1010_1000 => Self::And,
      0b1010_1010 => Self::Or,
      0b1010_1011 => Self::Xor,
      0b0110_1001 => Self::Not,
      0b1010_1100 => Self::ShiftLeft,
      0b1010_1101 => Self::ShiftRight,
      0b1010_0100 => Self::Modulo,
      0b0100_0101 => Self::Push,
      0b0100_0110 => Self::Pop,
      0b0101_0000 => Self::Call,
      0b0001_0001 => Self::Return,
      0b0101_0100 => Self::Jump,
      0b0101_0101 => Self::JumpIfEqual,
      0b0101_0110 => Self::JumpIfNotEqual,
      _ => return Err(UnknownOpcode(byte)),
    };
    Ok(op)
  }
}
