// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Block geometry, partitions, references and motion vectors as seen by
//! the context functions. Only the shape of a block matters here; pixel
//! layout belongs to the caller.

#![allow(non_camel_case_types)]

use self::BlockSize::*;
use crate::context::{MI_SIZE_LOG2, MV_LOW, MV_UPP};
use crate::transform::TxSize;
use crate::transform::TxSize::*;
use num_derive::FromPrimitive;
use std::cmp::Ordering;

/// Frame references in bitstream order. `LAST_FRAME` through
/// `ALTREF_FRAME` are the seven inter references.
#[derive(PartialEq, Eq, PartialOrd, Copy, Clone, Debug, FromPrimitive)]
pub enum RefType {
  INTRA_FRAME = 0,
  LAST_FRAME = 1,
  LAST2_FRAME = 2,
  LAST3_FRAME = 3,
  GOLDEN_FRAME = 4,
  BWDREF_FRAME = 5,
  ALTREF2_FRAME = 6,
  ALTREF_FRAME = 7,
  NONE_FRAME = 8,
}

use self::RefType::*;

impl RefType {
  /// Position among the inter references, `None` for the intra and none
  /// markers.
  #[inline]
  pub const fn to_index(self) -> Option<usize> {
    match self {
      INTRA_FRAME | NONE_FRAME => None,
      _ => Some(self as usize - LAST_FRAME as usize),
    }
  }

  /// `LAST_FRAME` to `GOLDEN_FRAME`; also true for `INTRA_FRAME`.
  #[inline]
  pub const fn is_fwd_ref(self) -> bool {
    (self as usize) <= GOLDEN_FRAME as usize
  }

  /// `BWDREF_FRAME` to `ALTREF_FRAME`; also true for `NONE_FRAME`.
  #[inline]
  pub const fn is_bwd_ref(self) -> bool {
    (self as usize) >= BWDREF_FRAME as usize
  }

  #[inline]
  pub const fn is_inter_ref(self) -> bool {
    !matches!(self, INTRA_FRAME | NONE_FRAME)
  }
}

pub const FWD_REFS: usize = 4;
pub const BWD_REFS: usize = 3;
pub const SINGLE_REFS: usize = FWD_REFS + BWD_REFS;
pub const INTER_REFS_PER_FRAME: usize = 7;

/// Same direction pairs with their own symbol: `LAST+LAST2`, `LAST+LAST3`,
/// `LAST+GOLDEN` and `BWDREF+ALTREF`.
pub const UNIDIR_COMP_REFS: usize = 4;

pub const REF_FRAMES_LOG2: usize = 3;
pub const REF_FRAMES: usize = 1 << REF_FRAMES_LOG2;

pub const REF_CONTEXTS: usize = 3;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Debug, FromPrimitive)]
pub enum PartitionType {
  PARTITION_NONE,
  PARTITION_HORZ,
  PARTITION_VERT,
  PARTITION_SPLIT,
  /// Top half split again.
  PARTITION_HORZ_A,
  /// Bottom half split again.
  PARTITION_HORZ_B,
  /// Left half split again.
  PARTITION_VERT_A,
  /// Right half split again.
  PARTITION_VERT_B,
  PARTITION_HORZ_4,
  PARTITION_VERT_4,
}

/// Block sizes in the order of the AV1 tables they index; the 4:1 shapes
/// come last.
#[derive(Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum BlockSize {
  BLOCK_4X4,
  BLOCK_4X8,
  BLOCK_8X4,
  BLOCK_8X8,
  BLOCK_8X16,
  BLOCK_16X8,
  BLOCK_16X16,
  BLOCK_16X32,
  BLOCK_32X16,
  BLOCK_32X32,
  BLOCK_32X64,
  BLOCK_64X32,
  BLOCK_64X64,
  BLOCK_64X128,
  BLOCK_128X64,
  BLOCK_128X128,
  BLOCK_4X16,
  BLOCK_16X4,
  BLOCK_8X32,
  BLOCK_32X8,
  BLOCK_16X64,
  BLOCK_64X16,
}

static block_width_log2: [u8; BlockSize::BLOCK_SIZES_ALL] =
  [2, 2, 3, 3, 3, 4, 4, 4, 5, 5, 5, 6, 6, 6, 7, 7, 2, 4, 3, 5, 4, 6];
static block_height_log2: [u8; BlockSize::BLOCK_SIZES_ALL] =
  [2, 3, 2, 3, 4, 3, 4, 5, 4, 5, 6, 5, 6, 7, 6, 7, 4, 2, 5, 3, 6, 4];

/// Largest transform fitting each block size, 64 wide at most.
static max_txsize_rect_lookup: [TxSize; BlockSize::BLOCK_SIZES_ALL] = [
  TX_4X4, TX_4X8, TX_8X4, TX_8X8, TX_8X16, TX_16X8, TX_16X16, TX_16X32,
  TX_32X16, TX_32X32, TX_32X64, TX_64X32, TX_64X64, TX_64X64, TX_64X64,
  TX_64X64, TX_4X16, TX_16X4, TX_8X32, TX_32X8, TX_16X64, TX_64X16,
];

/// Ordered by containment: a block is smaller than another when it fits
/// inside it. Blocks that are wider but shorter are unordered.
impl PartialOrd for BlockSize {
  #[inline(always)]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    let w = self.width().cmp(&other.width());
    let h = self.height().cmp(&other.height());
    match (w, h) {
      (Ordering::Greater, Ordering::Less) | (Ordering::Less, Ordering::Greater) => {
        None
      }
      _ => Some(w.then(h)),
    }
  }
}

impl BlockSize {
  pub const BLOCK_SIZES_ALL: usize = 22;

  #[inline]
  pub fn width_log2(self) -> usize {
    block_width_log2[self as usize] as usize
  }

  #[inline]
  pub fn height_log2(self) -> usize {
    block_height_log2[self as usize] as usize
  }

  #[inline]
  pub fn width(self) -> usize {
    1 << self.width_log2()
  }

  #[inline]
  pub fn height(self) -> usize {
    1 << self.height_log2()
  }

  #[inline]
  pub fn width_mi_log2(self) -> usize {
    self.width_log2() - MI_SIZE_LOG2
  }

  #[inline]
  pub fn height_mi_log2(self) -> usize {
    self.height_log2() - MI_SIZE_LOG2
  }

  /// Width in 4x4 mode info units.
  #[inline]
  pub fn width_mi(self) -> usize {
    self.width() >> MI_SIZE_LOG2
  }

  #[inline]
  pub fn height_mi(self) -> usize {
    self.height() >> MI_SIZE_LOG2
  }

  #[inline]
  pub fn is_sqr(self) -> bool {
    self.width_log2() == self.height_log2()
  }

  #[inline]
  pub fn tx_size(self) -> TxSize {
    max_txsize_rect_lookup[self as usize]
  }

  /// Chroma from luma is only signalled up to 32x32.
  #[inline]
  pub fn cfl_allowed(self) -> bool {
    self <= BLOCK_32X32
  }

  /// Whether the intra tx size may be rectangular, i.e. the block itself
  /// is rectangular and no dimension reaches 128.
  pub fn is_rect_tx_allowed(self) -> bool {
    !self.is_sqr() && self.width() < 128 && self.height() < 128
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd)]
pub enum MvSubpelPrecision {
  MV_SUBPEL_NONE = -1,
  MV_SUBPEL_LOW_PRECISION = 0,
  MV_SUBPEL_HIGH_PRECISION,
}

pub const MV_JOINTS: usize = 4;

/// Which components of a motion vector difference are non-zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum MvJointType {
  MV_JOINT_ZERO = 0,
  /// Only the column is non-zero.
  MV_JOINT_HNZVZ = 1,
  /// Only the row is non-zero.
  MV_JOINT_HZVNZ = 2,
  MV_JOINT_HNZVNZ = 3,
}

/// Motion vector in 1/8 pel units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MotionVector {
  pub row: i16,
  pub col: i16,
}

impl MotionVector {
  /// Both components lie strictly inside the codable range.
  #[inline]
  pub const fn is_valid(self) -> bool {
    let (row, col) = (self.row as i32, self.col as i32);
    row > MV_LOW && row < MV_UPP && col > MV_LOW && col < MV_UPP
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use num_traits::FromPrimitive;

  #[test]
  fn geometry_of_every_size() {
    let dims = [
      (4, 4), (4, 8), (8, 4), (8, 8), (8, 16), (16, 8), (16, 16), (16, 32),
      (32, 16), (32, 32), (32, 64), (64, 32), (64, 64), (64, 128), (128, 64),
      (128, 128), (4, 16), (16, 4), (8, 32), (32, 8), (16, 64), (64, 16),
    ];
    for (i, &(w, h)) in dims.iter().enumerate() {
      let bs = BlockSize::from_usize(i).unwrap();
      assert_eq!((bs.width(), bs.height()), (w, h), "{bs:?}");
      assert_eq!(bs.width_mi(), w / 4);
      assert_eq!(bs.height_mi(), h / 4);
      assert_eq!(bs.is_sqr(), w == h);
      assert_eq!(bs.cfl_allowed(), w <= 32 && h <= 32);
      assert_eq!(bs.is_rect_tx_allowed(), w != h && w < 128 && h < 128);
    }
  }

  #[test]
  fn sizes_are_ordered_by_containment() {
    assert!(BLOCK_8X8 < BLOCK_16X8);
    assert!(BLOCK_64X64 >= BLOCK_64X64);
    assert!(BLOCK_4X4 < BLOCK_128X128);
    assert_eq!(BLOCK_16X4.partial_cmp(&BLOCK_4X16), None);
    assert!(!(BLOCK_64X16 <= BLOCK_32X32));
    assert!(!(BLOCK_64X16 > BLOCK_32X32));
  }

  #[test]
  fn inter_reference_indices() {
    assert_eq!(INTRA_FRAME.to_index(), None);
    assert_eq!(NONE_FRAME.to_index(), None);
    assert_eq!(LAST_FRAME.to_index(), Some(0));
    assert_eq!(ALTREF_FRAME.to_index(), Some(INTER_REFS_PER_FRAME - 1));
    assert!(GOLDEN_FRAME.is_fwd_ref() && !GOLDEN_FRAME.is_bwd_ref());
    assert!(BWDREF_FRAME.is_bwd_ref() && !BWDREF_FRAME.is_fwd_ref());
  }
}
