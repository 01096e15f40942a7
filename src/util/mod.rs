// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use num_traits::PrimInt;
use std::mem::size_of;

#[macro_use]
pub mod cdf;

pub use self::cdf::*;

pub trait ILog: PrimInt {
  // Integer binary logarithm of an integer value.
  // Returns floor(log2(self)) + 1, or 0 if self == 0.
  // This is the number of bits that would be required to represent self in two's
  //  complement notation with all of the leading zeros stripped.
  fn ilog(self) -> usize {
    size_of::<Self>() * 8 - self.leading_zeros() as usize
  }
}

impl<T> ILog for T where T: PrimInt {}

#[inline(always)]
pub fn msb(x: i32) -> i32 {
  debug_assert!(x > 0);
  31 ^ (x.leading_zeros() as i32)
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn ilog_counts_significant_bits() {
    assert_eq!(ILog::ilog(0u32), 0);
    assert_eq!(ILog::ilog(1u32), 1);
    assert_eq!(ILog::ilog(0x8000u16), 16);
    assert_eq!(ILog::ilog(0x7fffu16), 15);
    assert_eq!(ILog::ilog(u64::MAX), 64);
  }

  #[test]
  fn msb_is_floor_log2() {
    assert_eq!(msb(1), 0);
    assert_eq!(msb(2), 1);
    assert_eq!(msb(3), 1);
    assert_eq!(msb(8000), 12);
    assert_eq!(msb(i32::MAX), 30);
  }
}
