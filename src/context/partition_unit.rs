// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::partition::PartitionType::*;
use num_traits::FromPrimitive;

// Generates 4 bit field in which each bit set to 1 represents
// a blocksize partition  1111 means we split 64x64, 32x32, 16x16
// and 8x8.  1000 means we just split the 64x64 to 32x32
pub static partition_context_lookup: [[u8; 2]; BlockSize::BLOCK_SIZES_ALL] = [
  [31, 31], // 4X4   - {0b11111, 0b11111}
  [31, 30], // 4X8   - {0b11111, 0b11110}
  [30, 31], // 8X4   - {0b11110, 0b11111}
  [30, 30], // 8X8   - {0b11110, 0b11110}
  [30, 28], // 8X16  - {0b11110, 0b11100}
  [28, 30], // 16X8  - {0b11100, 0b11110}
  [28, 28], // 16X16 - {0b11100, 0b11100}
  [28, 24], // 16X32 - {0b11100, 0b11000}
  [24, 28], // 32X16 - {0b11000, 0b11100}
  [24, 24], // 32X32 - {0b11000, 0b11000}
  [24, 16], // 32X64 - {0b11000, 0b10000}
  [16, 24], // 64X32 - {0b10000, 0b11000}
  [16, 16], // 64X64 - {0b10000, 0b10000}
  [16, 0],  // 64X128- {0b10000, 0b00000}
  [0, 16],  // 128X64- {0b00000, 0b10000}
  [0, 0],   // 128X128-{0b00000, 0b00000}
  [31, 28], // 4X16  - {0b11111, 0b11100}
  [28, 31], // 16X4  - {0b11100, 0b11111}
  [30, 24], // 8X32  - {0b11110, 0b11000}
  [24, 30], // 32X8  - {0b11000, 0b11110}
  [28, 16], // 16X64 - {0b11100, 0b10000}
  [16, 28], // 64X16 - {0b10000, 0b11100}
];

pub const CFL_JOINT_SIGNS: usize = 8;
pub const CFL_ALPHA_CONTEXTS: usize = 6;
pub const CFL_ALPHABET_SIZE: usize = 16;

pub const PARTITION_PLOFFSET: usize = 4;
pub const PARTITION_BLOCK_SIZES: usize = 4 + 1;
pub const PARTITION_CONTEXTS: usize = PARTITION_BLOCK_SIZES * PARTITION_PLOFFSET;
pub const PARTITION_TYPES: usize = 4;
pub const EXT_PARTITION_TYPES: usize = 10;

// partition contexts are at 8x8 granularity, as it is not possible to
// split 4x4 blocks any further than that
pub const PARTITION_CONTEXT_GRANULARITY: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CFLSign {
  CFL_SIGN_ZERO = 0,
  CFL_SIGN_NEG = 1,
  CFL_SIGN_POS = 2,
}

impl CFLSign {
  pub const fn from_alpha(a: i16) -> CFLSign {
    [CFL_SIGN_NEG, CFL_SIGN_ZERO, CFL_SIGN_POS][(a.signum() + 1) as usize]
  }
}

use CFLSign::*;

const CFL_SIGNS: usize = 3;
static cfl_sign_value: [i16; CFL_SIGNS] = [0, -1, 1];
static cfl_signs: [CFLSign; CFL_SIGNS] =
  [CFL_SIGN_ZERO, CFL_SIGN_NEG, CFL_SIGN_POS];

/// Chroma-from-luma scaling factors for both chroma planes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CFLParams {
  pub sign: [CFLSign; 2],
  pub scale: [u8; 2],
}

impl Default for CFLParams {
  #[inline]
  fn default() -> Self {
    Self { sign: [CFL_SIGN_NEG, CFL_SIGN_ZERO], scale: [1, 0] }
  }
}

impl CFLParams {
  /// Whether the parameters can be signalled: at least one sign is
  /// non-zero, and scales are in `1..=16` exactly where the sign is.
  pub fn is_valid(self) -> bool {
    (self.sign[0] != CFL_SIGN_ZERO || self.sign[1] != CFL_SIGN_ZERO)
      && (0..2).all(|uv| {
        if self.sign[uv] == CFL_SIGN_ZERO {
          self.scale[uv] == 0
        } else {
          (1..=CFL_ALPHABET_SIZE as u8).contains(&self.scale[uv])
        }
      })
  }
  #[inline]
  pub fn joint_sign(self) -> u32 {
    debug_assert!(
      self.sign[0] != CFL_SIGN_ZERO || self.sign[1] != CFL_SIGN_ZERO
    );
    (self.sign[0] as u32) * (CFL_SIGNS as u32) + (self.sign[1] as u32) - 1
  }
  #[inline]
  pub fn context(self, uv: usize) -> usize {
    debug_assert!(self.sign[uv] != CFL_SIGN_ZERO);
    (self.sign[uv] as usize - 1) * CFL_SIGNS + (self.sign[1 - uv] as usize)
  }
  #[inline]
  pub fn index(self, uv: usize) -> u32 {
    debug_assert!(self.sign[uv] != CFL_SIGN_ZERO && self.scale[uv] != 0);
    (self.scale[uv] - 1) as u32
  }
  #[inline]
  pub fn alpha(self, uv: usize) -> i16 {
    cfl_sign_value[self.sign[uv] as usize] * (self.scale[uv] as i16)
  }
  #[inline]
  pub const fn from_alpha(u: i16, v: i16) -> CFLParams {
    CFLParams {
      sign: [CFLSign::from_alpha(u), CFLSign::from_alpha(v)],
      scale: [u.unsigned_abs() as u8, v.unsigned_abs() as u8],
    }
  }
  /// Split a coded joint sign back into per-plane signs.
  #[inline]
  fn signs_from_joint(joint_sign: u32) -> [CFLSign; 2] {
    let j = joint_sign as usize + 1;
    [cfl_signs[j / CFL_SIGNS], cfl_signs[j % CFL_SIGNS]]
  }
}

/// Context for a square block's partition symbol.
///
/// `above_ctx` and `left_ctx` are the partition context bytes of the 8x8
/// column above and the 8x8 row to the left, as maintained by
/// [`update_partition_context`].
pub fn partition_plane_context(
  above_ctx: u8, left_ctx: u8, bsize: BlockSize,
) -> usize {
  debug_assert!(bsize.is_sqr() && bsize >= BlockSize::BLOCK_8X8);
  let bsl = bsize.width_log2() - BlockSize::BLOCK_8X8.width_log2();
  let above = (above_ctx >> bsl) & 1;
  let left = (left_ctx >> bsl) & 1;

  (left * 2 + above) as usize + bsl * PARTITION_PLOFFSET
}

/// Record the outcome of a partition in the above and left partition
/// contexts.
///
/// `above` and `left` start at the block's own 8x8 column and row; entries
/// past the end of either slice are outside the tile and left alone.
pub fn update_partition_context(
  above: &mut [u8], left: &mut [u8], subsize: BlockSize, bsize: BlockSize,
) {
  debug_assert!(bsize.is_sqr());

  let bw = (bsize.width_mi() >> 1).max(1);
  let bh = (bsize.height_mi() >> 1).max(1);

  // update the partition context at the end notes. set partition bits
  // of block sizes larger than the current one to be one, and partition
  // bits of smaller block sizes to be zero.
  for a in above.iter_mut().take(bw) {
    *a = partition_context_lookup[subsize as usize][0];
  }
  for l in left.iter_mut().take(bh) {
    *l = partition_context_lookup[subsize as usize][1];
  }
}

/// Number of partition types available to a square block size.
const fn partition_arity(ctx: usize) -> usize {
  if ctx < PARTITION_TYPES {
    PARTITION_TYPES
  } else if ctx < 4 * PARTITION_TYPES {
    EXT_PARTITION_TYPES
  } else {
    EXT_PARTITION_TYPES - 2
  }
}

/// Partitions folded into `PARTITION_SPLIT` when only the top half of the
/// block is inside the frame.
const VERT_ALIKE: [PartitionType; 6] = [
  PARTITION_VERT,
  PARTITION_SPLIT,
  PARTITION_HORZ_A,
  PARTITION_VERT_A,
  PARTITION_VERT_B,
  PARTITION_VERT_4,
];

/// Partitions folded into `PARTITION_SPLIT` when only the left half of the
/// block is inside the frame.
const HORZ_ALIKE: [PartitionType; 6] = [
  PARTITION_HORZ,
  PARTITION_SPLIT,
  PARTITION_HORZ_A,
  PARTITION_HORZ_B,
  PARTITION_VERT_A,
  PARTITION_HORZ_4,
];

/// Collapse a partition CDF into a binary one whose second symbol carries
/// the probability of every partition in `parts`.
///
/// Partitions the block size cannot use are skipped.
fn partition_gather(cdf_in: &[u16], parts: &[PartitionType]) -> [u16; 3] {
  let arity = cdf_arity(cdf_in.len());
  let psum: u32 = parts
    .iter()
    .map(|&p| p as usize)
    .filter(|&p| p < arity)
    .map(|p| u32::from(cdf_element_prob(cdf_in, p)))
    .sum();
  [psum.min(32768) as u16, 0, 0]
}

impl CDFContext {
  fn partition_cdf_for(&self, ctx: usize) -> &[u16] {
    if ctx < PARTITION_TYPES {
      &self.partition_w8_cdf[ctx]
    } else if ctx < 4 * PARTITION_TYPES {
      &self.partition_cdf[ctx - PARTITION_TYPES]
    } else {
      &self.partition_w128_cdf[ctx - 4 * PARTITION_TYPES]
    }
  }
}

/// Check that a partition block size is square and at least 8x8.
fn check_partition_bsize(bsize: BlockSize) -> Result<()> {
  if bsize.is_sqr() && bsize >= BlockSize::BLOCK_8X8 {
    Ok(())
  } else {
    Err(EntropyError::InvalidSyntax)
  }
}

/// Context of the temporal segment id prediction flag.
#[inline]
pub fn seg_id_predicted_context(above: bool, left: bool) -> usize {
  above as usize + left as usize
}

/// Predicted segment id and the index of the spatial segment id CDF.
///
/// Neighbours outside the tile are `None`; `above_left` only exists when
/// both `above` and `left` do.
pub fn get_segment_pred(
  above_left: Option<u8>, above: Option<u8>, left: Option<u8>,
  last_active_segid: u8,
) -> (u8, usize) {
  let cdf_index = match (above_left, above, left) {
    (Some(ul), Some(u), Some(l)) => {
      if ul == u && ul == l {
        2
      } else if ul == u || ul == l || u == l {
        1
      } else {
        0
      }
    }
    _ => 0,
  };

  // If 2 or more are identical returns that as predictor, otherwise left.
  let r = match (above, left) {
    (None, None) => 0,
    (None, Some(l)) => l,
    (Some(u), None) => u,
    (Some(u), Some(l)) => {
      if above_left == Some(u) {
        u
      } else {
        l
      }
    }
  };

  (r.min(last_active_segid), cdf_index)
}

/// Map `x` in `[0, max)` to a small code when close to the prediction `r`.
pub fn neg_interleave(x: i32, r: i32, max: i32) -> i32 {
  debug_assert!(x < max);
  if r == 0 {
    return x;
  } else if r >= (max - 1) {
    return -x + max - 1;
  }
  let diff = x - r;
  if 2 * r < max {
    if diff.abs() <= r {
      if diff > 0 {
        return (diff << 1) - 1;
      } else {
        return (-diff) << 1;
      }
    }
    x
  } else {
    if diff.abs() < (max - r) {
      if diff > 0 {
        return (diff << 1) - 1;
      } else {
        return (-diff) << 1;
      }
    }
    (max - x) - 1
  }
}

/// Inverse of [`neg_interleave`].
pub fn neg_deinterleave(diff: i32, r: i32, max: i32) -> i32 {
  if r == 0 {
    return diff;
  } else if r >= (max - 1) {
    return max - diff - 1;
  }
  let near = if 2 * r < max { 2 * r } else { 2 * (max - r - 1) };
  if diff <= near {
    if diff & 1 != 0 {
      r + ((diff + 1) >> 1)
    } else {
      r - (diff >> 1)
    }
  } else if 2 * r < max {
    diff
  } else {
    max - (diff + 1)
  }
}

fn check_segment_id(seg_id: u8, last_active_segid: u8) -> Result<()> {
  check_symbol(u32::from(last_active_segid), MAX_SEGMENTS)?;
  check_symbol(u32::from(seg_id), last_active_segid as usize + 1)
}

impl ContextWriter {
  /// Code a square block's partition.
  ///
  /// At the bottom or right frame edge only the choice between splitting
  /// and the one partition that keeps the block inside the frame is coded;
  /// when both halves are outside, `PARTITION_SPLIT` is implied and nothing
  /// is written.
  pub fn write_partition(
    &mut self, w: &mut impl Writer, above_ctx: u8, left_ctx: u8,
    p: PartitionType, bsize: BlockSize, has_rows: bool, has_cols: bool,
  ) -> Result<()> {
    check_partition_bsize(bsize)?;
    let ctx = partition_plane_context(above_ctx, left_ctx, bsize);
    debug_assert!(ctx < PARTITION_CONTEXTS);

    if !has_rows && !has_cols {
      return if p == PARTITION_SPLIT {
        Ok(())
      } else {
        Err(EntropyError::InvalidSyntax)
      };
    }

    if has_rows && has_cols {
      check_symbol(p as u32, partition_arity(ctx))?;
      if ctx < PARTITION_TYPES {
        let cdf = &self.fc.partition_w8_cdf[ctx];
        symbol_with_update!(self, w, p as u32, cdf);
      } else if ctx < 4 * PARTITION_TYPES {
        let cdf = &self.fc.partition_cdf[ctx - PARTITION_TYPES];
        symbol_with_update!(self, w, p as u32, cdf);
      } else {
        let cdf = &self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES];
        symbol_with_update!(self, w, p as u32, cdf);
      }
      return Ok(());
    }

    let (alike, other) = if has_cols {
      (&VERT_ALIKE, PARTITION_HORZ)
    } else {
      (&HORZ_ALIKE, PARTITION_VERT)
    };
    let cdf = partition_gather(self.fc.partition_cdf_for(ctx), alike);
    if p != PARTITION_SPLIT && p != other {
      return Err(EntropyError::InvalidSyntax);
    }
    w.symbol((p == PARTITION_SPLIT) as u32, &cdf);
    Ok(())
  }

  pub fn write_cfl_alphas<W: Writer>(
    &mut self, w: &mut W, cfl: CFLParams,
  ) -> Result<()> {
    if !cfl.is_valid() {
      return Err(EntropyError::InvalidSyntax);
    }
    symbol_with_update!(self, w, cfl.joint_sign(), &self.fc.cfl_sign_cdf);
    for uv in 0..2 {
      if cfl.sign[uv] != CFL_SIGN_ZERO {
        symbol_with_update!(
          self,
          w,
          cfl.index(uv),
          &self.fc.cfl_alpha_cdf[cfl.context(uv)]
        );
      }
    }
    Ok(())
  }

  /// Code a segment id against its spatial prediction `pred`, as returned
  /// by [`get_segment_pred`].
  pub fn write_segment_id<W: Writer>(
    &mut self, w: &mut W, seg_id: u8, pred: u8, cdf_index: usize,
    last_active_segid: u8,
  ) -> Result<()> {
    check_segment_id(seg_id, last_active_segid)?;
    check_symbol(cdf_index as u32, SPATIAL_PREDICTION_PROBS)?;
    let coded_id = neg_interleave(
      seg_id as i32,
      pred.min(last_active_segid) as i32,
      (last_active_segid + 1) as i32,
    );
    symbol_with_update!(
      self,
      w,
      coded_id as u32,
      &self.fc.spatial_segmentation_cdfs[cdf_index]
    );
    Ok(())
  }

  /// Whether the segment id is taken from the previous segmentation map.
  pub fn write_seg_id_predicted<W: Writer>(
    &mut self, w: &mut W, ctx: usize, predicted: bool,
  ) -> Result<()> {
    check_symbol(ctx as u32, SEG_TEMPORAL_PRED_CTXS)?;
    let cdf = &self.fc.segment_pred_cdf[ctx];
    symbol_with_update!(self, w, predicted as u32, cdf);
    Ok(())
  }

  /// Code a segment id directly, with no spatial predictor.
  pub fn write_segment_id_tree<W: Writer>(
    &mut self, w: &mut W, seg_id: u8,
  ) -> Result<()> {
    check_symbol(u32::from(seg_id), MAX_SEGMENTS)?;
    symbol_with_update!(self, w, seg_id as u32, &self.fc.seg_tree_cdf);
    Ok(())
  }
}

impl ContextReader {
  pub fn read_partition(
    &mut self, r: &mut Reader, above_ctx: u8, left_ctx: u8, bsize: BlockSize,
    has_rows: bool, has_cols: bool,
  ) -> Result<PartitionType> {
    check_partition_bsize(bsize)?;
    let ctx = partition_plane_context(above_ctx, left_ctx, bsize);

    if !has_rows && !has_cols {
      return Ok(PARTITION_SPLIT);
    }

    if has_rows && has_cols {
      let v = if ctx < PARTITION_TYPES {
        read_symbol!(self, r, self.fc.partition_w8_cdf[ctx])
      } else if ctx < 4 * PARTITION_TYPES {
        read_symbol!(self, r, self.fc.partition_cdf[ctx - PARTITION_TYPES])
      } else {
        read_symbol!(
          self,
          r,
          self.fc.partition_w128_cdf[ctx - 4 * PARTITION_TYPES]
        )
      };
      return PartitionType::from_u32(v).ok_or(EntropyError::CorruptSyntax);
    }

    let (alike, other) = if has_cols {
      (&VERT_ALIKE, PARTITION_HORZ)
    } else {
      (&HORZ_ALIKE, PARTITION_VERT)
    };
    let cdf = partition_gather(self.fc.partition_cdf_for(ctx), alike);
    Ok(if r.symbol(&cdf)? != 0 { PARTITION_SPLIT } else { other })
  }

  pub fn read_cfl_alphas(&mut self, r: &mut Reader) -> Result<CFLParams> {
    let joint_sign = read_symbol!(self, r, self.fc.cfl_sign_cdf);
    let mut cfl = CFLParams {
      sign: CFLParams::signs_from_joint(joint_sign),
      scale: [0; 2],
    };
    for uv in 0..2 {
      if cfl.sign[uv] != CFL_SIGN_ZERO {
        let ctx = cfl.context(uv);
        let idx = read_symbol!(self, r, self.fc.cfl_alpha_cdf[ctx]);
        cfl.scale[uv] = idx as u8 + 1;
      }
    }
    Ok(cfl)
  }

  /// Decode a segment id; ids above `last_active_segid` are corrupt.
  pub fn read_segment_id(
    &mut self, r: &mut Reader, pred: u8, cdf_index: usize,
    last_active_segid: u8,
  ) -> Result<u8> {
    check_symbol(u32::from(last_active_segid), MAX_SEGMENTS)?;
    check_symbol(cdf_index as u32, SPATIAL_PREDICTION_PROBS)?;
    let coded_id =
      read_symbol!(self, r, self.fc.spatial_segmentation_cdfs[cdf_index]);
    let seg_id = neg_deinterleave(
      coded_id as i32,
      pred.min(last_active_segid) as i32,
      (last_active_segid + 1) as i32,
    );
    if seg_id < 0 || seg_id > last_active_segid as i32 {
      return Err(EntropyError::CorruptSyntax);
    }
    Ok(seg_id as u8)
  }

  pub fn read_seg_id_predicted(
    &mut self, r: &mut Reader, ctx: usize,
  ) -> Result<bool> {
    check_symbol(ctx as u32, SEG_TEMPORAL_PRED_CTXS)?;
    Ok(read_symbol!(self, r, self.fc.segment_pred_cdf[ctx]) != 0)
  }

  pub fn read_segment_id_tree(&mut self, r: &mut Reader) -> Result<u8> {
    Ok(read_symbol!(self, r, self.fc.seg_tree_cdf) as u8)
  }
}

#[cfg(test)]
mod test {
  use super::CFLSign;
  use super::CFLSign::*;
  use super::*;
  use crate::ec::WriterEncoder;

  #[test]
  fn cdf_map() {
    let cdf = CDFContext::new();
    let cdf_map = FieldMap { map: cdf.build_map() };
    let f = &cdf.partition_cdf[2];
    cdf_map.lookup(f.as_ptr() as usize);
  }

  static cfl_alpha_signs: [[CFLSign; 2]; 8] = [
    [CFL_SIGN_ZERO, CFL_SIGN_NEG],
    [CFL_SIGN_ZERO, CFL_SIGN_POS],
    [CFL_SIGN_NEG, CFL_SIGN_ZERO],
    [CFL_SIGN_NEG, CFL_SIGN_NEG],
    [CFL_SIGN_NEG, CFL_SIGN_POS],
    [CFL_SIGN_POS, CFL_SIGN_ZERO],
    [CFL_SIGN_POS, CFL_SIGN_NEG],
    [CFL_SIGN_POS, CFL_SIGN_POS],
  ];

  static cfl_context: [[usize; 8]; 2] =
    [[0, 0, 0, 1, 2, 3, 4, 5], [0, 3, 0, 1, 4, 0, 2, 5]];

  #[test]
  fn cfl_joint_sign() {
    let mut cfl = CFLParams::default();
    for (joint_sign, &signs) in cfl_alpha_signs.iter().enumerate() {
      cfl.sign = signs;
      assert!(cfl.joint_sign() as usize == joint_sign);
      assert_eq!(CFLParams::signs_from_joint(joint_sign as u32), signs);
      for uv in 0..2 {
        if signs[uv] != CFL_SIGN_ZERO {
          assert!(cfl.context(uv) == cfl_context[uv][joint_sign]);
        }
      }
    }
  }

  #[test]
  fn cfl_validity() {
    assert!(CFLParams::default().is_valid());
    assert!(CFLParams::from_alpha(-16, 3).is_valid());
    assert!(!CFLParams::from_alpha(0, 0).is_valid());
    assert!(!CFLParams::from_alpha(17, 0).is_valid());
    let cfl = CFLParams { sign: [CFL_SIGN_ZERO, CFL_SIGN_POS], scale: [2, 1] };
    assert!(!cfl.is_valid());
    assert_eq!(CFLParams::from_alpha(-5, 2).alpha(0), -5);
  }

  #[test]
  fn partition_contexts() {
    use BlockSize::*;
    assert_eq!(partition_plane_context(0, 0, BLOCK_8X8), 0);
    assert_eq!(partition_plane_context(0xff, 0, BLOCK_8X8), 1);
    assert_eq!(partition_plane_context(0, 0xff, BLOCK_16X16), 6);
    assert_eq!(partition_plane_context(0xff, 0xff, BLOCK_128X128), 19);

    let mut above = [0u8; 4];
    let mut left = [0u8; 4];
    update_partition_context(&mut above, &mut left, BLOCK_16X8, BLOCK_16X16);
    assert_eq!(above, [28, 28, 0, 0]);
    assert_eq!(left, [30, 30, 0, 0]);
    // 8 rows high on the left is below 16x16, 16 columns wide above is not.
    assert_eq!(partition_plane_context(above[0], left[0], BLOCK_16X16), 6);
    assert_eq!(partition_plane_context(above[0], left[0], BLOCK_8X8), 0);
    // Slices shorter than the block are clipped.
    update_partition_context(
      &mut above[..1],
      &mut left[..1],
      BLOCK_64X64,
      BLOCK_64X64,
    );
    assert_eq!(above, [16, 28, 0, 0]);
  }

  #[test]
  fn edge_partition_cdfs() {
    let fc = CDFContext::new();
    // 8x8 only has four partition types; the others must not contribute.
    let cdf_in = &fc.partition_w8_cdf[0];
    let expected = [PARTITION_VERT, PARTITION_SPLIT]
      .iter()
      .map(|&p| u32::from(cdf_element_prob(cdf_in, p as usize)))
      .sum::<u32>();
    assert_eq!(partition_gather(cdf_in, &VERT_ALIKE), [expected as u16, 0, 0]);

    let cdf_in = &fc.partition_cdf[3];
    let gathered = partition_gather(cdf_in, &HORZ_ALIKE)[0];
    let total: u32 = (0..EXT_PARTITION_TYPES)
      .map(|p| u32::from(cdf_element_prob(cdf_in, p)))
      .sum();
    assert_eq!(total, 32768);
    assert!(u32::from(gathered) < total);
  }

  #[test]
  fn segment_prediction() {
    assert_eq!(get_segment_pred(None, None, None, 7), (0, 0));
    assert_eq!(get_segment_pred(None, None, Some(3), 7), (3, 0));
    assert_eq!(get_segment_pred(None, Some(5), None, 7), (5, 0));
    assert_eq!(get_segment_pred(Some(2), Some(2), Some(2), 7), (2, 2));
    assert_eq!(get_segment_pred(Some(2), Some(2), Some(4), 7), (2, 1));
    assert_eq!(get_segment_pred(Some(1), Some(2), Some(4), 7), (4, 0));
    assert_eq!(get_segment_pred(Some(6), Some(6), Some(6), 3), (3, 2));
    assert_eq!(seg_id_predicted_context(true, true), 2);
  }

  #[test]
  fn neg_interleave_inverts() {
    for max in 1..=MAX_SEGMENTS as i32 {
      for r in 0..max {
        let mut seen = vec![false; max as usize];
        for x in 0..max {
          let coded = neg_interleave(x, r, max);
          assert!((0..max).contains(&coded), "x {x} r {r} max {max}");
          assert!(!seen[coded as usize]);
          seen[coded as usize] = true;
          assert_eq!(neg_deinterleave(coded, r, max), x);
        }
        // The prediction itself always gets the shortest code.
        assert_eq!(neg_interleave(r, r, max), 0);
      }
    }
  }

  #[test]
  fn partition_and_segment_roundtrip() {
    use BlockSize::*;
    let partitions = [
      (PARTITION_VERT_4, BLOCK_64X64, true, true),
      (PARTITION_SPLIT, BLOCK_8X8, true, true),
      (PARTITION_HORZ_B, BLOCK_128X128, true, true),
      (PARTITION_HORZ, BLOCK_32X32, false, true),
      (PARTITION_SPLIT, BLOCK_32X32, false, true),
      (PARTITION_VERT, BLOCK_128X128, true, false),
      (PARTITION_SPLIT, BLOCK_16X16, false, false),
    ];
    let cfl = CFLParams::from_alpha(-3, 9);
    let segs = [(0u8, 0u8, 0usize), (5, 4, 1), (2, 5, 2), (5, 5, 0)];

    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    for &(p, bsize, has_rows, has_cols) in &partitions {
      cw.write_partition(&mut w, 0x1c, 0x10, p, bsize, has_rows, has_cols)
        .unwrap();
    }
    cw.write_cfl_alphas(&mut w, cfl).unwrap();
    for &(seg_id, pred, cdf_index) in &segs {
      cw.write_segment_id(&mut w, seg_id, pred, cdf_index, 5).unwrap();
    }
    cw.write_seg_id_predicted(&mut w, 1, true).unwrap();
    cw.write_segment_id_tree(&mut w, 6).unwrap();
    let buf = w.done();

    let mut cr = ContextReader::new(Box::new(CDFContext::new()), true);
    let mut r = Reader::new(&buf);
    for &(p, bsize, has_rows, has_cols) in &partitions {
      assert_eq!(
        cr.read_partition(&mut r, 0x1c, 0x10, bsize, has_rows, has_cols)
          .unwrap(),
        p
      );
    }
    assert_eq!(cr.read_cfl_alphas(&mut r).unwrap(), cfl);
    for &(seg_id, pred, cdf_index) in &segs {
      assert_eq!(
        cr.read_segment_id(&mut r, pred, cdf_index, 5).unwrap(),
        seg_id
      );
    }
    assert!(cr.read_seg_id_predicted(&mut r, 1).unwrap());
    assert_eq!(cr.read_segment_id_tree(&mut r).unwrap(), 6);
    assert_eq!(cw.fc.as_slice(), cr.fc.as_slice());
  }

  #[test]
  fn invalid_partitions_are_rejected() {
    use BlockSize::*;
    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    let before = w.tell_frac();
    assert_eq!(
      cw.write_partition(&mut w, 0, 0, PARTITION_HORZ_A, BLOCK_8X8, true, true),
      Err(EntropyError::InvalidSymbol { value: 4, arity: 4 })
    );
    assert_eq!(
      cw.write_partition(&mut w, 0, 0, PARTITION_NONE, BLOCK_16X8, true, true),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_partition(&mut w, 0, 0, PARTITION_VERT, BLOCK_32X32, false, true),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_partition(&mut w, 0, 0, PARTITION_NONE, BLOCK_32X32, false, false),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_segment_id(&mut w, 4, 0, 0, 3),
      Err(EntropyError::InvalidSymbol { value: 4, arity: 4 })
    );
    assert_eq!(
      cw.write_cfl_alphas(&mut w, CFLParams::from_alpha(0, 0)),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(w.tell_frac(), before);
  }
}
