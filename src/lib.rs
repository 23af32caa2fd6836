//! Emulator for the LS-8, a tiny 8-bit register machine with a downward
//! growing stack in a flat 256 byte memory.
//!
//! Programs are text files of binary byte literals, see [`loader`].

pub mod alu;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod region;
pub mod registers;
pub mod vm;
