//! Reads LS-8 programs.
//!
//! A program is text with one byte per line written in binary, e.g.
//!
//! ```text
//! # print 8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```
//!
//! Anything after a `#` is ignored, as are blank lines.

use std::io;
use std::path::{Path, PathBuf};

use crate::memory::MEMORY_SIZE;
use crate::region::Chunk;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
  #[error("File {} not found.", path.display())]
  NotFound { path: PathBuf },

  #[error("could not read {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("line {line}: `{text}` is not a binary byte")]
  InvalidLine { line: usize, text: String },

  #[error("program is {len} bytes, memory only holds {}", MEMORY_SIZE)]
  ProgramTooLarge { len: usize },
}

/// Parse program text into a chunk
pub fn parse(source: &str) -> Result<Chunk, LoadError> {
  let mut bytes = Vec::new();
  for (index, line) in source.lines().enumerate() {
    let text = line.split('#').next().unwrap_or_default().trim();
    if text.is_empty() {
      continue;
    }
    let byte = u8::from_str_radix(text, 2).map_err(|_| LoadError::InvalidLine {
      line: index + 1,
      text: text.to_owned(),
    })?;
    bytes.push(byte);
  }
  if bytes.len() > MEMORY_SIZE {
    return Err(LoadError::ProgramTooLarge { len: bytes.len() });
  }
  log::debug!("parsed {} program bytes", bytes.len());
  Ok(bytes.into())
}

/// Read and parse the program at `path`
pub fn load(path: impl AsRef<Path>) -> Result<Chunk, LoadError> {
  let path = path.as_ref();
  let source = std::fs::read_to_string(path).map_err(|source| match source.kind() {
    io::ErrorKind::NotFound => LoadError::NotFound {
      path: path.to_owned(),
    },
    _ => LoadError::Io {
      path: path.to_owned(),
      source,
    },
  })?;
  log::debug!("loading {}", path.display());
  parse(&source)
}
