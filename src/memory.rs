/// Size of the address space in bytes
pub const MEMORY_SIZE: usize = 256;

/// Unified instruction and data store.
///
/// Accesses never wrap or grow the array; an address past the end yields
/// `None` and it is up to the caller to treat that as a fault.
#[derive(Debug, Clone)]
pub struct Memory {
  cells: [u8; MEMORY_SIZE],
}

impl Memory {
  pub fn new() -> Self {
    Self {
      cells: [0; MEMORY_SIZE],
    }
  }

  #[inline]
  pub fn read(&self, address: usize) -> Option<u8> {
    self.cells.get(address).copied()
  }

  #[inline]
  pub fn write(&mut self, address: usize, value: u8) -> Option<()> {
    self.cells.get_mut(address).map(|cell| {
      *cell = value;
    })
  }

  /// Copy `image` in starting at address 0. Fails, leaving memory untouched,
  /// if it does not fit.
  pub fn load(&mut self, image: &[u8]) -> Option<()> {
    let dest = self.cells.get_mut(..image.len())?;
    dest.copy_from_slice(image);
    Some(())
  }

  pub fn as_slice(&self) -> &[u8] {
    &self.cells
  }
}

impl Default for Memory {
  fn default() -> Self {
    Self::new()
  }
}
