// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_camel_case_types)]

use crate::context::MI_SIZE_LOG2;
use crate::partition::BlockSize;
use crate::partition::BlockSize::*;
use num_derive::FromPrimitive;

pub const TX_TYPES: usize = 16;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
#[repr(C)]
pub enum TxType {
  DCT_DCT = 0,   // DCT  in both horizontal and vertical
  ADST_DCT = 1,  // ADST in vertical, DCT in horizontal
  DCT_ADST = 2,  // DCT  in vertical, ADST in horizontal
  ADST_ADST = 3, // ADST in both directions
  FLIPADST_DCT = 4,
  DCT_FLIPADST = 5,
  FLIPADST_FLIPADST = 6,
  ADST_FLIPADST = 7,
  FLIPADST_ADST = 8,
  IDTX = 9,
  V_DCT = 10,
  H_DCT = 11,
  V_ADST = 12,
  H_ADST = 13,
  V_FLIPADST = 14,
  H_FLIPADST = 15,
}

impl Default for TxType {
  fn default() -> Self {
    TxType::DCT_DCT
  }
}

/// Transform type sets, from the smallest to the largest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum TxSet {
  // DCT only
  TX_SET_DCTONLY,
  // DCT + Identity only
  TX_SET_INTER_3,
  // Discrete Trig transforms w/o flip (4) + Identity (1)
  TX_SET_INTRA_2,
  // Discrete Trig transforms w/o flip (4) + Identity (1) + 1D Hor/vert DCT (2)
  TX_SET_INTRA_1,
  // Discrete Trig transforms w/ flip (9) + Identity (1) + 1D Hor/Ver DCT (2)
  TX_SET_INTER_2,
  // Discrete Trig transforms w/ flip (9) + Identity (1) + 1D Hor/Ver (6)
  TX_SET_INTER_1,
}

/// Transform Size
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum TxSize {
  TX_4X4,
  TX_8X8,
  TX_16X16,
  TX_32X32,
  TX_64X64,

  TX_4X8,
  TX_8X4,
  TX_8X16,
  TX_16X8,
  TX_16X32,
  TX_32X16,
  TX_32X64,
  TX_64X32,

  TX_4X16,
  TX_16X4,
  TX_8X32,
  TX_32X8,
  TX_16X64,
  TX_64X16,
}

impl Default for TxSize {
  fn default() -> Self {
    TxSize::TX_4X4
  }
}

impl TxSize {
  /// Number of square transform sizes
  pub const TX_SIZES: usize = 5;

  /// Number of transform sizes (including non-square sizes)
  pub const TX_SIZES_ALL: usize = 14 + 5;

  #[inline]
  pub const fn width(self) -> usize {
    1 << self.width_log2()
  }

  #[inline]
  pub const fn width_log2(self) -> usize {
    use self::TxSize::*;
    match self {
      TX_4X4 | TX_4X8 | TX_4X16 => 2,
      TX_8X8 | TX_8X4 | TX_8X16 | TX_8X32 => 3,
      TX_16X16 | TX_16X8 | TX_16X32 | TX_16X4 | TX_16X64 => 4,
      TX_32X32 | TX_32X16 | TX_32X64 | TX_32X8 => 5,
      TX_64X64 | TX_64X32 | TX_64X16 => 6,
    }
  }

  #[inline]
  pub const fn width_mi(self) -> usize {
    self.width() >> MI_SIZE_LOG2
  }

  #[inline]
  pub const fn height(self) -> usize {
    1 << self.height_log2()
  }

  #[inline]
  pub const fn height_log2(self) -> usize {
    use self::TxSize::*;
    match self {
      TX_4X4 | TX_8X4 | TX_16X4 => 2,
      TX_8X8 | TX_4X8 | TX_16X8 | TX_32X8 => 3,
      TX_16X16 | TX_8X16 | TX_32X16 | TX_4X16 | TX_64X16 => 4,
      TX_32X32 | TX_16X32 | TX_64X32 | TX_8X32 => 5,
      TX_64X64 | TX_32X64 | TX_16X64 => 6,
    }
  }

  #[inline]
  pub const fn height_mi(self) -> usize {
    self.height() >> MI_SIZE_LOG2
  }

  #[inline]
  pub const fn area(self) -> usize {
    1 << (self.width_log2() + self.height_log2())
  }

  #[inline]
  pub const fn block_size(self) -> BlockSize {
    use self::TxSize::*;
    match self {
      TX_4X4 => BLOCK_4X4,
      TX_8X8 => BLOCK_8X8,
      TX_16X16 => BLOCK_16X16,
      TX_32X32 => BLOCK_32X32,
      TX_64X64 => BLOCK_64X64,
      TX_4X8 => BLOCK_4X8,
      TX_8X4 => BLOCK_8X4,
      TX_8X16 => BLOCK_8X16,
      TX_16X8 => BLOCK_16X8,
      TX_16X32 => BLOCK_16X32,
      TX_32X16 => BLOCK_32X16,
      TX_32X64 => BLOCK_32X64,
      TX_64X32 => BLOCK_64X32,
      TX_4X16 => BLOCK_4X16,
      TX_16X4 => BLOCK_16X4,
      TX_8X32 => BLOCK_8X32,
      TX_32X8 => BLOCK_32X8,
      TX_16X64 => BLOCK_16X64,
      TX_64X16 => BLOCK_64X16,
    }
  }

  /// The largest square size that fits inside.
  #[inline]
  pub const fn sqr(self) -> TxSize {
    use self::TxSize::*;
    match self {
      TX_4X4 | TX_4X8 | TX_8X4 | TX_4X16 | TX_16X4 => TX_4X4,
      TX_8X8 | TX_8X16 | TX_16X8 | TX_8X32 | TX_32X8 => TX_8X8,
      TX_16X16 | TX_16X32 | TX_32X16 | TX_16X64 | TX_64X16 => TX_16X16,
      TX_32X32 | TX_32X64 | TX_64X32 => TX_32X32,
      TX_64X64 => TX_64X64,
    }
  }

  /// The smallest square size that covers it.
  #[inline]
  pub const fn sqr_up(self) -> TxSize {
    use self::TxSize::*;
    match self {
      TX_4X4 => TX_4X4,
      TX_8X8 | TX_4X8 | TX_8X4 => TX_8X8,
      TX_16X16 | TX_8X16 | TX_16X8 | TX_4X16 | TX_16X4 => TX_16X16,
      TX_32X32 | TX_16X32 | TX_32X16 | TX_8X32 | TX_32X8 => TX_32X32,
      TX_64X64 | TX_32X64 | TX_64X32 | TX_16X64 | TX_64X16 => TX_64X64,
    }
  }

  #[inline]
  pub const fn is_rect(self) -> bool {
    self.width_log2() != self.height_log2()
  }

  /// The size one transform split level below, as used by both the intra
  /// depth and the inter partition syntax.
  #[inline]
  pub const fn split(self) -> TxSize {
    use self::TxSize::*;
    match self {
      TX_4X4 | TX_8X8 | TX_4X8 | TX_8X4 => TX_4X4,
      TX_16X16 | TX_8X16 | TX_16X8 => TX_8X8,
      TX_32X32 | TX_16X32 | TX_32X16 => TX_16X16,
      TX_64X64 | TX_32X64 | TX_64X32 => TX_32X32,
      TX_4X16 => TX_4X8,
      TX_16X4 => TX_8X4,
      TX_8X32 => TX_8X16,
      TX_32X8 => TX_16X8,
      TX_16X64 => TX_16X32,
      TX_64X16 => TX_32X16,
    }
  }
}

#[cfg(test)]
mod test {
  use super::TxSize::*;
  use super::*;
  use num_traits::FromPrimitive;

  #[test]
  fn geometry_is_consistent() {
    for i in 0..TxSize::TX_SIZES_ALL {
      let tx = TxSize::from_usize(i).unwrap();
      let bs = tx.block_size();
      assert_eq!(tx.width(), bs.width());
      assert_eq!(tx.height(), bs.height());
      assert_eq!(bs.tx_size(), tx);
      assert!(tx.sqr() <= tx.sqr_up());
      assert_eq!(tx.sqr().width(), tx.width().min(tx.height()));
      assert_eq!(tx.sqr_up().width(), tx.width().max(tx.height()));
      assert!(tx == TX_4X4 || tx.split().area() < tx.area());
    }
  }

  #[test]
  fn rect_sizes() {
    assert!(!TX_16X16.is_rect());
    assert!(TX_16X64.is_rect());
    assert_eq!(TX_16X64.split(), TX_16X32);
    assert_eq!(TX_64X16.width_mi(), 16);
  }
}
