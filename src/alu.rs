//! Arithmetic and logic on register values.
//!
//! Everything here is a pure function of its inputs. All results are taken
//! modulo 256.

/// Set when the compared values are equal
pub const FLAG_EQUAL: u8 = 0b0000_0001;
/// Set when `a > b`
pub const FLAG_GREATER: u8 = 0b0000_0010;
/// Set when `a < b`
pub const FLAG_LESS: u8 = 0b0000_0100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
  Add,
  Mul,
  Mod,
  And,
  Or,
  Xor,
  Shl,
  Shr,
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("division by zero")]
pub struct DivisionByZero;

/// Apply a binary operation, yielding the new value of `a`
pub fn apply(op: Op, a: u8, b: u8) -> Result<u8, DivisionByZero> {
  let value = match op {
    Op::Add => a.wrapping_add(b),
    Op::Mul => a.wrapping_mul(b),
    Op::Mod => a.checked_rem(b).ok_or(DivisionByZero)?,
    Op::And => a & b,
    Op::Or => a | b,
    Op::Xor => a ^ b,
    // shifting a byte by 8 or more clears it
    Op::Shl => a.checked_shl(u32::from(b)).unwrap_or(0),
    Op::Shr => a.checked_shr(u32::from(b)).unwrap_or(0),
  };
  Ok(value)
}

/// `255 - a`
#[inline]
pub fn not(a: u8) -> u8 {
  !a
}

/// Flags register value for comparing `a` against `b`
pub fn compare(a: u8, b: u8) -> u8 {
  use std::cmp::Ordering;
  match a.cmp(&b) {
    Ordering::Equal => FLAG_EQUAL,
    Ordering::Greater => FLAG_GREATER,
    Ordering::Less => FLAG_LESS,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use proptest::prelude::*;

  #[test]
  fn wraps() {
    assert_eq!(apply(Op::Add, 200, 100), Ok(44));
    assert_eq!(apply(Op::Mul, 16, 17), Ok(16));
    assert_eq!(apply(Op::Shl, 0b1100_0001, 2), Ok(0b0000_0100));
  }

  #[test]
  fn bitwise() {
    assert_eq!(apply(Op::And, 0b1100, 0b1010), Ok(0b1000));
    assert_eq!(apply(Op::Or, 0b1100, 0b1010), Ok(0b1110));
    assert_eq!(apply(Op::Xor, 0b1100, 0b1010), Ok(0b0110));
    assert_eq!(not(0b1010_1010), 0b0101_0101);
    assert_eq!(not(0), 255);
  }

  #[test]
  fn wide_shifts_clear() {
    assert_eq!(apply(Op::Shl, 0xFF, 8), Ok(0));
    assert_eq!(apply(Op::Shr, 0xFF, 200), Ok(0));
    assert_eq!(apply(Op::Shr, 0x80, 7), Ok(1));
  }

  #[test]
  fn mod_by_zero() {
    assert_eq!(apply(Op::Mod, 10, 0), Err(DivisionByZero));
    assert_eq!(apply(Op::Mod, 10, 3), Ok(1));
  }

  proptest! {
    #[test]
    fn arithmetic_is_mod_256(a in any::<u8>(), b in any::<u8>()) {
      let (a16, b16) = (u16::from(a), u16::from(b));
      prop_assert_eq!(apply(Op::Add, a, b), Ok(((a16 + b16) % 256) as u8));
      prop_assert_eq!(apply(Op::Mul, a, b), Ok(((a16 * b16) % 256) as u8));
      let shl = if b < 8 { ((a16 << b) % 256) as u8 } else { 0 };
      prop_assert_eq!(apply(Op::Shl, a, b), Ok(shl));
    }

    #[test]
    fn modulo(a in any::<u8>(), b in any::<u8>()) {
      if b == 0 {
        prop_assert_eq!(apply(Op::Mod, a, b), Err(DivisionByZero));
      } else {
        prop_assert_eq!(apply(Op::Mod, a, b), Ok(a % b));
      }
    }

    #[test]
    fn not_is_complement(a in any::<u8>()) {
      prop_assert_eq!(not(a), 255 - a);
    }

    #[test]
    fn compare_sets_one_flag(a in any::<u8>(), b in any::<u8>()) {
      let fl = compare(a, b);
      prop_assert_eq!(fl.count_ones(), 1);
      prop_assert_eq!(fl & FLAG_EQUAL != 0, a == b);
      prop_assert_eq!(fl & FLAG_GREATER != 0, a > b);
      prop_assert_eq!(fl & FLAG_LESS != 0, a < b);
    }
  }
}
