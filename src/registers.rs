/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 8;

/// Register holding the stack pointer
pub const SP: usize = 7;

/// Register CALL stashes its return address in, and RET restores from
pub const LINK: usize = 4;

/// Where the stack starts, growing downwards
pub const STACK_TOP: u8 = 0xF4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
  slots: [u8; REGISTER_COUNT],
}

impl Registers {
  /// All registers zeroed, except the stack pointer at [`STACK_TOP`]
  pub fn new() -> Self {
    let mut slots = [0; REGISTER_COUNT];
    slots[SP] = STACK_TOP;
    Self { slots }
  }

  #[inline]
  pub fn get(&self, index: usize) -> Option<u8> {
    self.slots.get(index).copied()
  }

  #[inline]
  pub fn set(&mut self, index: usize, value: u8) -> Option<()> {
    self.slots.get_mut(index).map(|slot| {
      *slot = value;
    })
  }

  #[inline]
  pub fn sp(&self) -> u8 {
    self.slots[SP]
  }

  #[inline]
  pub fn set_sp(&mut self, value: u8) {
    self.slots[SP] = value;
  }

  pub fn as_array(&self) -> &[u8; REGISTER_COUNT] {
    &self.slots
  }
}

impl Default for Registers {
  fn default() -> Self {
    Self::new()
  }
}
