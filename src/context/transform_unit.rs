// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::predict::PredictionMode;
use crate::transform::TxSize::*;
use crate::transform::TxType::*;
use num_traits::FromPrimitive;

pub const MAX_TX_SIZE: usize = 64;

pub const TX_SIZE_SQR_CONTEXTS: usize = 4; // Coded tx_size <= 32x32, so is the # of CDF contexts from tx sizes

pub const TX_SETS: usize = 6;
pub const TX_SETS_INTRA: usize = 3;
pub const TX_SETS_INTER: usize = 4;

pub const MAX_TX_DEPTH: usize = 2;
pub const TX_SIZE_CONTEXTS: usize = 3;
pub const MAX_TX_CATS: usize = 4;
pub const BIG_TX_CATS: usize = MAX_TX_CATS - 1;

pub const MAX_VARTX_DEPTH: usize = 2;

pub const TXFM_PARTITION_CONTEXTS: usize =
  (TxSize::TX_SIZES - TxSize::TX_8X8 as usize) * 6 - 3;

// Number of transform types in each set type
pub static num_tx_set: [usize; TX_SETS] = [1, 2, 5, 7, 12, 16];
pub static av1_tx_used: [[usize; TX_TYPES]; TX_SETS] = [
  [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [1, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
  [1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0],
  [1, 1, 1, 1, 0, 0, 0, 0, 0, 1, 1, 1, 0, 0, 0, 0],
  [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0],
  [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

// Maps set types above to the indices used for intra
static tx_set_index_intra: [i8; TX_SETS] = [0, -1, 2, 1, -1, -1];
// Maps set types above to the indices used for inter
static tx_set_index_inter: [i8; TX_SETS] = [0, 3, -1, -1, 2, 1];

/// Symbol coded for each transform type, per set.
pub static av1_tx_ind: [[usize; TX_TYPES]; TX_SETS] = [
  [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [1, 3, 4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [1, 5, 6, 4, 0, 0, 0, 0, 0, 0, 2, 3, 0, 0, 0, 0],
  [3, 4, 5, 8, 6, 7, 9, 10, 11, 0, 1, 2, 0, 0, 0, 0],
  [7, 8, 9, 12, 10, 11, 13, 14, 15, 0, 1, 2, 3, 4, 5, 6],
];

/// Transform type for each coded symbol, per set.
pub static av1_tx_inv: [[usize; TX_TYPES]; TX_SETS] = [
  [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [9, 0, 3, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [9, 0, 10, 11, 3, 1, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0],
  [9, 10, 11, 0, 1, 2, 4, 5, 3, 6, 7, 8, 0, 0, 0, 0],
  [9, 10, 11, 12, 13, 14, 15, 0, 1, 2, 4, 5, 3, 6, 7, 8],
];

pub static max_txsize_rect_lookup: [TxSize; BlockSize::BLOCK_SIZES_ALL] = [
  TX_4X4,   // 4x4
  TX_4X8,   // 4x8
  TX_8X4,   // 8x4
  TX_8X8,   // 8x8
  TX_8X16,  // 8x16
  TX_16X8,  // 16x8
  TX_16X16, // 16x16
  TX_16X32, // 16x32
  TX_32X16, // 32x16
  TX_32X32, // 32x32
  TX_32X64, // 32x64
  TX_64X32, // 64x32
  TX_64X64, // 64x64
  TX_64X64, // 64x128
  TX_64X64, // 128x64
  TX_64X64, // 128x128
  TX_4X16,  // 4x16
  TX_16X4,  // 16x4
  TX_8X32,  // 8x32
  TX_32X8,  // 32x8
  TX_16X64, // 16x64
  TX_64X16, // 64x16
];

pub static sub_tx_size_map: [TxSize; TxSize::TX_SIZES_ALL] = [
  TX_4X4,   // TX_4X4
  TX_4X4,   // TX_8X8
  TX_8X8,   // TX_16X16
  TX_16X16, // TX_32X32
  TX_32X32, // TX_64X64
  TX_4X4,   // TX_4X8
  TX_4X4,   // TX_8X4
  TX_8X8,   // TX_8X16
  TX_8X8,   // TX_16X8
  TX_16X16, // TX_16X32
  TX_16X16, // TX_32X16
  TX_32X32, // TX_32X64
  TX_32X32, // TX_64X32
  TX_4X8,   // TX_4X16
  TX_8X4,   // TX_16X4
  TX_8X16,  // TX_8X32
  TX_16X8,  // TX_32X8
  TX_16X32, // TX_16X64
  TX_32X16, // TX_64X16
];

pub fn get_tx_set(
  tx_size: TxSize, is_inter: bool, use_reduced_set: bool,
) -> TxSet {
  let tx_size_sqr_up = tx_size.sqr_up();
  let tx_size_sqr = tx_size.sqr();

  if tx_size_sqr_up.block_size() > BlockSize::BLOCK_32X32 {
    return TxSet::TX_SET_DCTONLY;
  }

  if is_inter {
    if use_reduced_set || tx_size_sqr_up == TxSize::TX_32X32 {
      TxSet::TX_SET_INTER_3
    } else if tx_size_sqr == TxSize::TX_16X16 {
      TxSet::TX_SET_INTER_2
    } else {
      TxSet::TX_SET_INTER_1
    }
  } else if tx_size_sqr_up == TxSize::TX_32X32 {
    TxSet::TX_SET_DCTONLY
  } else if use_reduced_set || tx_size_sqr == TxSize::TX_16X16 {
    TxSet::TX_SET_INTRA_2
  } else {
    TxSet::TX_SET_INTRA_1
  }
}

pub fn get_tx_set_index(
  tx_size: TxSize, is_inter: bool, use_reduced_set: bool,
) -> i8 {
  let set_type = get_tx_set(tx_size, is_inter, use_reduced_set);

  if is_inter {
    tx_set_index_inter[set_type as usize]
  } else {
    tx_set_index_intra[set_type as usize]
  }
}

/// The intra direction keying the intra transform type CDFs; filter intra
/// blocks use the direction their filter mode resembles.
#[inline]
pub fn tx_type_intra_dir(
  y_mode: PredictionMode, filter_intra_mode: Option<FilterIntraMode>,
) -> PredictionMode {
  match filter_intra_mode {
    Some(m) => fimode_to_intradir[m as usize],
    None => y_mode,
  }
}

/// Number of 1/2 splits from the largest transform of `bsize` down to
/// `tx_size`, if `tx_size` is reachable within `max_depth` of them.
fn tx_size_to_depth(
  tx_size: TxSize, bsize: BlockSize, max_depth: usize,
) -> Option<usize> {
  let mut ctx_size = max_txsize_rect_lookup[bsize as usize];
  for depth in 0..=max_depth {
    if ctx_size == tx_size {
      return Some(depth);
    }
    ctx_size = sub_tx_size_map[ctx_size as usize];
  }
  None
}

fn bsize_to_max_depth(bsize: BlockSize) -> usize {
  let mut tx_size: TxSize = max_txsize_rect_lookup[bsize as usize];
  let mut depth = 0;
  while depth < MAX_TX_DEPTH && tx_size != TX_4X4 {
    depth += 1;
    tx_size = sub_tx_size_map[tx_size as usize];
  }
  depth
}

fn bsize_to_tx_size_cat(bsize: BlockSize) -> usize {
  let mut tx_size: TxSize = max_txsize_rect_lookup[bsize as usize];
  debug_assert!(tx_size != TX_4X4);
  let mut depth = 0;
  while tx_size != TX_4X4 {
    depth += 1;
    tx_size = sub_tx_size_map[tx_size as usize];
  }
  debug_assert!(depth <= MAX_TX_CATS);

  depth - 1
}

/// Record transform sizes along a block's bottom and right edges.
///
/// The slices hold one entry per 4x4 column above the following blocks and
/// per 4x4 row to their left, starting at this block; skipped inter blocks
/// record their own dimensions.
pub fn update_tx_size_context(
  above: &mut [u8], left: &mut [u8], bsize: BlockSize, tx_size: TxSize,
  skip: bool,
) {
  let n4_w = bsize.width_mi();
  let n4_h = bsize.height_mi();

  let (tx_w, tx_h) = if skip {
    ((n4_w * MI_SIZE) as u8, (n4_h * MI_SIZE) as u8)
  } else {
    (tx_size.width() as u8, tx_size.height() as u8)
  };

  for v in above.iter_mut().take(n4_w) {
    *v = tx_w;
  }
  for v in left.iter_mut().take(n4_h) {
    *v = tx_h;
  }
}

/// Context of the variable transform split flag.
///
/// `above_w` and `left_h` come from
/// [`BlockContext::txfm_split_neighbours`].
pub fn txfm_partition_context(
  bsize: BlockSize, tx_size: TxSize, above_w: usize, left_h: usize,
) -> usize {
  debug_assert!(tx_size > TX_4X4);
  debug_assert!(bsize > BlockSize::BLOCK_4X4);

  let above = (above_w < tx_size.width()) as usize;
  let left = (left_h < tx_size.height()) as usize;

  let max_tx_size: TxSize = bsize.tx_size().sqr_up();
  let category: usize = (tx_size.sqr_up() != max_tx_size) as usize
    + (TxSize::TX_SIZES - 1 - max_tx_size as usize) * 2;

  debug_assert!(category < TXFM_PARTITION_CONTEXTS);

  category * 3 + above + left
}

/// Whether `tx_size` fits the largest transform allowed in `bsize`.
fn check_tx_fits(bsize: BlockSize, tx_size: TxSize) -> Result<()> {
  let max_tx_size = max_txsize_rect_lookup[bsize as usize];
  if bsize > BlockSize::BLOCK_4X4
    && tx_size.width() <= max_tx_size.width()
    && tx_size.height() <= max_tx_size.height()
  {
    Ok(())
  } else {
    Err(EntropyError::InvalidSyntax)
  }
}

impl<'a> BlockContext<'a> {
  /// Context of an intra block's transform size, from the transform widths
  /// recorded above and heights recorded to the left.
  pub fn tx_size_context(
    &self, bsize: BlockSize, above_tx_wide: u8, left_tx_high: u8,
  ) -> usize {
    let max_tx_size = max_txsize_rect_lookup[bsize as usize];
    let max_tx_wide = max_tx_size.width();
    let max_tx_high = max_tx_size.height();

    let above = self.above.map_or(false, |b| {
      let w =
        if b.is_inter() { b.bsize.width() } else { above_tx_wide as usize };
      w >= max_tx_wide
    });
    let left = self.left.map_or(false, |b| {
      let h =
        if b.is_inter() { b.bsize.height() } else { left_tx_high as usize };
      h >= max_tx_high
    });

    above as usize + left as usize
  }

  // Based on https://aomediacodec.github.io/av1-spec/#cdf-selection-process
  // Used to decide the cdf (context) for txfm_split
  /// Width above and height to the left of a transform block in an inter
  /// block, given the recorded transform contexts.
  ///
  /// `first_row` and `first_col` tell whether the transform block touches
  /// the top and left edges of its coding block.
  pub fn txfm_split_neighbours(
    &self, first_row: bool, first_col: bool, above_tx_wide: u8,
    left_tx_high: u8,
  ) -> (usize, usize) {
    let above = match self.above {
      None if first_row => 64,
      Some(b) if first_row && b.skip && b.is_inter() => b.bsize.width(),
      _ => above_tx_wide as usize,
    };
    let left = match self.left {
      None if first_col => 64,
      Some(b) if first_col && b.skip && b.is_inter() => b.bsize.height(),
      _ => left_tx_high as usize,
    };
    (above, left)
  }
}

impl ContextWriter {
  pub fn write_tx_type<W: Writer>(
    &mut self, w: &mut W, tx_size: TxSize, tx_type: TxType,
    intra_dir: PredictionMode, is_inter: bool, use_reduced_tx_set: bool,
  ) -> Result<()> {
    let square_tx_size = tx_size.sqr();
    let tx_set = get_tx_set(tx_size, is_inter, use_reduced_tx_set);
    let num_tx_types = num_tx_set[tx_set as usize];

    if av1_tx_used[tx_set as usize][tx_type as usize] == 0 {
      return Err(EntropyError::InvalidSyntax);
    }
    if num_tx_types == 1 {
      return Ok(());
    }

    let tx_set_index = get_tx_set_index(tx_size, is_inter, use_reduced_tx_set);
    debug_assert!(tx_set_index > 0);
    let s = av1_tx_ind[tx_set as usize][tx_type as usize] as u32;

    if is_inter {
      if tx_set_index == 1 {
        let cdf = &self.fc.inter_tx_1_cdf[square_tx_size as usize];
        symbol_with_update!(self, w, s, cdf);
      } else if tx_set_index == 2 {
        let cdf = &self.fc.inter_tx_2_cdf[square_tx_size as usize];
        symbol_with_update!(self, w, s, cdf);
      } else {
        let cdf = &self.fc.inter_tx_3_cdf[square_tx_size as usize];
        symbol_with_update!(self, w, s, cdf);
      }
    } else {
      check_symbol(intra_dir as u32, INTRA_MODES)?;
      if tx_set_index == 1 {
        let cdf =
          &self.fc.intra_tx_1_cdf[square_tx_size as usize][intra_dir as usize];
        symbol_with_update!(self, w, s, cdf);
      } else {
        let cdf =
          &self.fc.intra_tx_2_cdf[square_tx_size as usize][intra_dir as usize];
        symbol_with_update!(self, w, s, cdf);
      }
    }
    Ok(())
  }

  /// Code the transform size of an intra block (or of an inter block when
  /// the frame does not use variable transform partitioning) as a split
  /// depth below the largest size.
  pub fn write_tx_size_intra<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, bsize: BlockSize,
    tx_size: TxSize, above_tx_wide: u8, left_tx_high: u8,
  ) -> Result<()> {
    check_tx_fits(bsize, tx_size)?;
    if tx_size.is_rect() && !bsize.is_rect_tx_allowed() {
      return Err(EntropyError::InvalidSyntax);
    }
    let max_depths = bsize_to_max_depth(bsize);
    let depth = tx_size_to_depth(tx_size, bsize, max_depths)
      .ok_or(EntropyError::InvalidSyntax)?;

    let tx_size_ctx = bc.tx_size_context(bsize, above_tx_wide, left_tx_high);
    let tx_size_cat = bsize_to_tx_size_cat(bsize);

    if tx_size_cat > 0 {
      let cdf = &self.fc.tx_size_cdf[tx_size_cat - 1][tx_size_ctx];
      symbol_with_update!(self, w, depth as u32, cdf);
    } else {
      let cdf = &self.fc.tx_size_8x8_cdf[tx_size_ctx];
      symbol_with_update!(self, w, depth as u32, cdf);
    }
    Ok(())
  }

  /// Code whether an inter transform block of `tx_size`, `depth` splits
  /// below the block's largest transform, splits once more.
  ///
  /// Nothing is coded for 4x4 transforms or at the maximum depth, where the
  /// split is implied false.
  pub fn write_txfm_split<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, tx_size: TxSize, depth: usize,
    above_w: usize, left_h: usize, txfm_split: bool,
  ) -> Result<()> {
    check_tx_fits(bsize, tx_size)?;
    if tx_size == TX_4X4 || depth >= MAX_VARTX_DEPTH {
      return if txfm_split { Err(EntropyError::InvalidSyntax) } else { Ok(()) };
    }
    let ctx = txfm_partition_context(bsize, tx_size, above_w, left_h);
    let cdf = &self.fc.txfm_partition_cdf[ctx];
    symbol_with_update!(self, w, txfm_split as u32, cdf);
    Ok(())
  }
}

impl ContextReader {
  pub fn read_tx_type(
    &mut self, r: &mut Reader, tx_size: TxSize, intra_dir: PredictionMode,
    is_inter: bool, use_reduced_tx_set: bool,
  ) -> Result<TxType> {
    let square_tx_size = tx_size.sqr() as usize;
    let tx_set = get_tx_set(tx_size, is_inter, use_reduced_tx_set);
    if num_tx_set[tx_set as usize] == 1 {
      return Ok(DCT_DCT);
    }

    let tx_set_index = get_tx_set_index(tx_size, is_inter, use_reduced_tx_set);
    let s = if is_inter {
      match tx_set_index {
        1 => read_symbol!(self, r, self.fc.inter_tx_1_cdf[square_tx_size]),
        2 => read_symbol!(self, r, self.fc.inter_tx_2_cdf[square_tx_size]),
        _ => read_symbol!(self, r, self.fc.inter_tx_3_cdf[square_tx_size]),
      }
    } else {
      check_symbol(intra_dir as u32, INTRA_MODES)?;
      let dir = intra_dir as usize;
      if tx_set_index == 1 {
        read_symbol!(self, r, self.fc.intra_tx_1_cdf[square_tx_size][dir])
      } else {
        read_symbol!(self, r, self.fc.intra_tx_2_cdf[square_tx_size][dir])
      }
    };
    let tx_type = av1_tx_inv[tx_set as usize][s as usize];
    TxType::from_usize(tx_type).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_tx_size_intra(
    &mut self, r: &mut Reader, bc: &BlockContext, bsize: BlockSize,
    above_tx_wide: u8, left_tx_high: u8,
  ) -> Result<TxSize> {
    if bsize == BlockSize::BLOCK_4X4 {
      return Err(EntropyError::InvalidSyntax);
    }
    let tx_size_ctx = bc.tx_size_context(bsize, above_tx_wide, left_tx_high);
    let tx_size_cat = bsize_to_tx_size_cat(bsize);
    let depth = if tx_size_cat > 0 {
      read_symbol!(self, r, self.fc.tx_size_cdf[tx_size_cat - 1][tx_size_ctx])
    } else {
      read_symbol!(self, r, self.fc.tx_size_8x8_cdf[tx_size_ctx])
    };
    if depth as usize > bsize_to_max_depth(bsize) {
      return Err(EntropyError::CorruptSyntax);
    }
    let mut tx_size = max_txsize_rect_lookup[bsize as usize];
    for _ in 0..depth {
      tx_size = sub_tx_size_map[tx_size as usize];
    }
    Ok(tx_size)
  }

  pub fn read_txfm_split(
    &mut self, r: &mut Reader, bsize: BlockSize, tx_size: TxSize,
    depth: usize, above_w: usize, left_h: usize,
  ) -> Result<bool> {
    check_tx_fits(bsize, tx_size)?;
    if tx_size == TX_4X4 || depth >= MAX_VARTX_DEPTH {
      return Ok(false);
    }
    let ctx = txfm_partition_context(bsize, tx_size, above_w, left_h);
    Ok(read_symbol!(self, r, self.fc.txfm_partition_cdf[ctx]) != 0)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ec::WriterEncoder;
  use crate::partition::BlockSize::*;

  #[test]
  fn tx_ind_and_inv_agree() {
    for set in 0..TX_SETS {
      for tx_type in 0..TX_TYPES {
        if av1_tx_used[set][tx_type] != 0 {
          assert_eq!(av1_tx_inv[set][av1_tx_ind[set][tx_type]], tx_type);
        }
      }
      let used: usize = av1_tx_used[set].iter().sum();
      assert_eq!(used, num_tx_set[set]);
    }
  }

  #[test]
  fn tx_sets() {
    assert_eq!(get_tx_set(TX_64X64, true, false), TxSet::TX_SET_DCTONLY);
    assert_eq!(get_tx_set(TX_32X32, false, false), TxSet::TX_SET_DCTONLY);
    assert_eq!(get_tx_set(TX_32X32, true, false), TxSet::TX_SET_INTER_3);
    assert_eq!(get_tx_set(TX_16X16, true, false), TxSet::TX_SET_INTER_2);
    assert_eq!(get_tx_set(TX_8X4, true, false), TxSet::TX_SET_INTER_1);
    assert_eq!(get_tx_set(TX_16X8, false, false), TxSet::TX_SET_INTRA_1);
    assert_eq!(get_tx_set(TX_8X8, false, true), TxSet::TX_SET_INTRA_2);
    assert_eq!(get_tx_set_index(TX_8X8, true, true), 3);
  }

  #[test]
  fn tx_depths() {
    assert_eq!(tx_size_to_depth(TX_16X16, BLOCK_16X16, 2), Some(0));
    assert_eq!(tx_size_to_depth(TX_4X4, BLOCK_16X16, 2), Some(2));
    assert_eq!(tx_size_to_depth(TX_4X4, BLOCK_32X32, 2), None);
    assert_eq!(tx_size_to_depth(TX_8X16, BLOCK_16X16, 2), None);
    assert_eq!(bsize_to_max_depth(BLOCK_8X8), 1);
    assert_eq!(bsize_to_max_depth(BLOCK_64X64), 2);
    assert_eq!(bsize_to_tx_size_cat(BLOCK_8X8), 0);
    assert_eq!(bsize_to_tx_size_cat(BLOCK_4X16), 1);
    assert_eq!(bsize_to_tx_size_cat(BLOCK_128X128), 3);
  }

  #[test]
  fn tx_contexts() {
    let intra = Block::default();
    let inter_skip = Block {
      mode: PredictionMode::GLOBALMV,
      ref_frames: [RefType::LAST_FRAME, RefType::NONE_FRAME],
      skip: true,
      bsize: BLOCK_8X8,
      ..Default::default()
    };
    let bc = BlockContext::new(Some(&intra), Some(&inter_skip));
    // The above intra block contributes its recorded width, the left inter
    // block its own height.
    assert_eq!(bc.tx_size_context(BLOCK_16X16, 16, 64), 1);
    assert_eq!(bc.tx_size_context(BLOCK_8X8, 8, 4), 2);
    assert_eq!(BlockContext::default().tx_size_context(BLOCK_8X8, 64, 64), 0);

    assert_eq!(bc.txfm_split_neighbours(true, true, 4, 4), (4, 8));
    assert_eq!(bc.txfm_split_neighbours(false, false, 4, 16), (4, 16));
    assert_eq!(
      BlockContext::default().txfm_split_neighbours(true, false, 4, 4),
      (64, 4)
    );

    assert_eq!(txfm_partition_context(BLOCK_64X64, TX_64X64, 64, 64), 0);
    assert_eq!(txfm_partition_context(BLOCK_64X64, TX_32X32, 16, 64), 4);
    assert_eq!(txfm_partition_context(BLOCK_8X8, TX_8X8, 4, 4), 20);
    for bsize in [BLOCK_8X8, BLOCK_16X8, BLOCK_32X64, BLOCK_64X16] {
      let mut tx_size = max_txsize_rect_lookup[bsize as usize];
      while tx_size != TX_4X4 {
        assert!(txfm_partition_context(bsize, tx_size, 0, 0) < 21);
        tx_size = sub_tx_size_map[tx_size as usize];
      }
    }

    let mut above = [0u8; 4];
    let mut left = [0u8; 4];
    update_tx_size_context(&mut above, &mut left, BLOCK_16X8, TX_8X8, false);
    assert_eq!(above, [8, 8, 8, 8]);
    assert_eq!(left, [8, 8, 0, 0]);
    update_tx_size_context(&mut above, &mut left, BLOCK_8X8, TX_4X4, true);
    assert_eq!(above, [8, 8, 8, 8]);
    assert_eq!(left, [8, 8, 0, 0]);
  }

  #[test]
  fn tx_syntax_roundtrip() {
    let bc = BlockContext::default();
    let types = [
      (TX_8X8, IDTX, PredictionMode::V_PRED, false, false),
      (TX_16X16, ADST_ADST, PredictionMode::PAETH_PRED, false, false),
      (TX_4X8, H_FLIPADST, PredictionMode::NEWMV, true, false),
      (TX_16X8, FLIPADST_ADST, PredictionMode::NEWMV, true, false),
      (TX_32X16, IDTX, PredictionMode::NEWMV, true, false),
      (TX_32X32, DCT_DCT, PredictionMode::DC_PRED, false, false),
    ];
    let sizes = [
      (BLOCK_16X16, TX_4X4),
      (BLOCK_8X8, TX_8X8),
      (BLOCK_64X16, TX_32X16),
      (BLOCK_128X128, TX_32X32),
    ];

    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    for &(tx_size, tx_type, dir, is_inter, reduced) in &types {
      cw.write_tx_type(&mut w, tx_size, tx_type, dir, is_inter, reduced)
        .unwrap();
    }
    for &(bsize, tx_size) in &sizes {
      cw.write_tx_size_intra(&mut w, &bc, bsize, tx_size, 0, 0).unwrap();
    }
    cw.write_txfm_split(&mut w, BLOCK_32X32, TX_32X32, 0, 64, 8, true)
      .unwrap();
    cw.write_txfm_split(&mut w, BLOCK_32X32, TX_16X16, 1, 16, 16, false)
      .unwrap();
    cw.write_txfm_split(&mut w, BLOCK_32X32, TX_8X8, 2, 16, 16, false)
      .unwrap();
    let buf = w.done();

    let mut cr = ContextReader::new(Box::new(CDFContext::new()), true);
    let mut r = Reader::new(&buf);
    for &(tx_size, tx_type, dir, is_inter, reduced) in &types {
      assert_eq!(
        cr.read_tx_type(&mut r, tx_size, dir, is_inter, reduced).unwrap(),
        tx_type
      );
    }
    for &(bsize, tx_size) in &sizes {
      assert_eq!(
        cr.read_tx_size_intra(&mut r, &bc, bsize, 0, 0).unwrap(),
        tx_size
      );
    }
    let bsize = BLOCK_32X32;
    assert!(cr.read_txfm_split(&mut r, bsize, TX_32X32, 0, 64, 8).unwrap());
    assert!(!cr.read_txfm_split(&mut r, bsize, TX_16X16, 1, 16, 16).unwrap());
    assert!(!cr.read_txfm_split(&mut r, bsize, TX_8X8, 2, 16, 16).unwrap());
    assert_eq!(cw.fc.as_slice(), cr.fc.as_slice());
  }

  #[test]
  fn invalid_tx_syntax_is_rejected() {
    let bc = BlockContext::default();
    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    assert_eq!(
      cw.write_tx_type(
        &mut w,
        TX_32X32,
        IDTX,
        PredictionMode::DC_PRED,
        false,
        false
      ),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_tx_type(
        &mut w,
        TX_16X16,
        V_ADST,
        PredictionMode::NEWMV,
        true,
        false
      ),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_tx_size_intra(&mut w, &bc, BLOCK_8X8, TX_16X16, 0, 0),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_tx_size_intra(&mut w, &bc, BLOCK_4X4, TX_4X4, 0, 0),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_txfm_split(&mut w, BLOCK_16X16, TX_8X8, 2, 0, 0, true),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(w.tell_frac(), WriterEncoder::new().tell_frac());
  }
}
