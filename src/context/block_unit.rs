// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::partition::RefType::*;
use bytemuck::{Pod, Zeroable};
use num_traits::FromPrimitive;
use std::ops::Index;

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct NMVComponent {
  pub classes_cdf: [u16; cdf_size!(MV_CLASSES)],
  pub class0_fp_cdf: [[u16; cdf_size!(MV_FP_SIZE)]; CLASS0_SIZE],
  pub fp_cdf: [u16; cdf_size!(MV_FP_SIZE)],
  pub sign_cdf: [u16; cdf_size!(2)],
  pub class0_hp_cdf: [u16; cdf_size!(2)],
  pub hp_cdf: [u16; cdf_size!(2)],
  pub class0_cdf: [u16; cdf_size!(CLASS0_SIZE)],
  pub bits_cdf: [[u16; cdf_size!(2)]; MV_OFFSET_BITS],
}

#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct NMVContext {
  pub joints_cdf: [u16; cdf_size!(MV_JOINTS)],
  pub comps: [NMVComponent; 2],
}

/// Weight at which a motion vector candidate counts as a strong match.
pub const REF_CAT_LEVEL: u16 = 640;

static intra_mode_context: [usize; INTRA_MODES] =
  [0, 1, 2, 3, 4, 4, 4, 4, 3, 0, 1, 2, 0];

/// The mode info of an already coded block, as seen by its neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
  pub mode: PredictionMode,
  pub partition: PartitionType,
  pub skip: bool,
  pub skip_mode: bool,
  pub ref_frames: [RefType; 2],
  pub bsize: BlockSize,
  pub txsize: TxSize,
  pub segmentation_idx: u8,
  /// Palette sizes for luma and chroma, 0 when no palette is used.
  pub palette_size: [u8; 2],
  /// Interpolation filter per direction (0 is vertical).
  pub interp_filter: [FilterMode; 2],
  pub comp_group_idx: u8,
  pub compound_idx: u8,
}

impl Block {
  /// Decided by the first reference, so a block whose mode and references
  /// disagree is still classified consistently.
  pub fn is_inter(&self) -> bool {
    self.ref_frames[0].is_inter_ref()
  }
  pub fn has_second_ref(&self) -> bool {
    self.ref_frames[1] != INTRA_FRAME && self.ref_frames[1] != NONE_FRAME
  }
}

impl Default for Block {
  fn default() -> Block {
    Block {
      mode: PredictionMode::DC_PRED,
      partition: PartitionType::PARTITION_NONE,
      skip: false,
      skip_mode: false,
      ref_frames: [INTRA_FRAME, NONE_FRAME],
      bsize: BlockSize::BLOCK_64X64,
      txsize: TxSize::TX_64X64,
      segmentation_idx: 0,
      palette_size: [0; 2],
      interp_filter: [FilterMode::REGULAR; 2],
      comp_group_idx: 0,
      compound_idx: 0,
    }
  }
}

/// Reference usage of the neighbours, indexed by [`RefType`]. The intra
/// and none markers always count zero.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RefCounts(pub [u8; INTER_REFS_PER_FRAME]);

impl Index<RefType> for RefCounts {
  type Output = u8;

  fn index(&self, rf: RefType) -> &u8 {
    match rf.to_index() {
      Some(i) => &self.0[i],
      None => &0,
    }
  }
}

/// The causal neighbourhood of the block being coded.
///
/// A neighbour is `None` when it lies outside the tile. Every context
/// function below is a pure function of these blocks.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlockContext<'a> {
  pub above: Option<&'a Block>,
  pub left: Option<&'a Block>,
}

impl<'a> BlockContext<'a> {
  pub const fn new(above: Option<&'a Block>, left: Option<&'a Block>) -> Self {
    BlockContext { above, left }
  }

  fn neighbours(&self) -> impl Iterator<Item = &'a Block> {
    self.above.into_iter().chain(self.left)
  }

  pub fn skip_context(&self) -> usize {
    self.neighbours().filter(|b| b.skip).count()
  }

  pub fn skip_mode_context(&self) -> usize {
    self.neighbours().filter(|b| b.skip_mode).count()
  }

  // 0 - inter/inter, inter/--, --/inter, --/--
  // 1 - intra/inter, inter/intra
  // 2 - intra/--, --/intra
  // 3 - intra/intra
  pub fn intra_inter_context(&self) -> usize {
    match (self.above, self.left) {
      (Some(above), Some(left)) => {
        let above_intra = !above.is_inter();
        let left_intra = !left.is_inter();
        if above_intra && left_intra {
          3
        } else {
          (above_intra || left_intra) as usize
        }
      }
      (Some(b), None) | (None, Some(b)) => {
        if b.is_inter() {
          0
        } else {
          2
        }
      }
      (None, None) => 0,
    }
  }

  /// Above and left contexts of the key frame luma mode.
  pub fn intra_mode_kf_context(&self) -> (usize, usize) {
    let mode_ctx = |b: Option<&Block>| {
      let mode = b.map_or(PredictionMode::DC_PRED, |b| b.mode);
      if mode.is_intra() && !mode.is_cfl() {
        intra_mode_context[mode as usize]
      } else {
        0
      }
    };
    (mode_ctx(self.above), mode_ctx(self.left))
  }

  /// How often each inter reference is used by the neighbours.
  pub fn neighbours_ref_counts(&self) -> RefCounts {
    let mut ref_counts = RefCounts::default();

    for rf in self.neighbours().flat_map(|b| b.ref_frames) {
      if let Some(i) = rf.to_index() {
        ref_counts.0[i] += 1;
      }
    }
    ref_counts
  }

  #[inline]
  pub const fn ref_count_ctx(counts0: u8, counts1: u8) -> usize {
    if counts0 < counts1 {
      0
    } else if counts0 == counts1 {
      1
    } else {
      2
    }
  }

  pub fn get_ref_frame_ctx_b0(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let fwd_cnt = ref_counts[LAST_FRAME]
      + ref_counts[LAST2_FRAME]
      + ref_counts[LAST3_FRAME]
      + ref_counts[GOLDEN_FRAME];

    let bwd_cnt = ref_counts[BWDREF_FRAME]
      + ref_counts[ALTREF2_FRAME]
      + ref_counts[ALTREF_FRAME];

    Self::ref_count_ctx(fwd_cnt, bwd_cnt)
  }

  #[inline]
  pub fn get_pred_ctx_brfarf2_or_arf(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let brfarf2_count = ref_counts[BWDREF_FRAME]
      + ref_counts[ALTREF2_FRAME];
    let arf_count = ref_counts[ALTREF_FRAME];

    Self::ref_count_ctx(brfarf2_count, arf_count)
  }

  #[inline]
  pub fn get_pred_ctx_ll2_or_l3gld(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let l_l2_count =
      ref_counts[LAST_FRAME] + ref_counts[LAST2_FRAME];
    let l3_gold_count =
      ref_counts[LAST3_FRAME] + ref_counts[GOLDEN_FRAME];

    Self::ref_count_ctx(l_l2_count, l3_gold_count)
  }

  #[inline]
  pub fn get_pred_ctx_last_or_last2(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let l_count = ref_counts[LAST_FRAME];
    let l2_count = ref_counts[LAST2_FRAME];

    Self::ref_count_ctx(l_count, l2_count)
  }

  #[inline]
  pub fn get_pred_ctx_last3_or_gold(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let l3_count = ref_counts[LAST3_FRAME];
    let gold_count = ref_counts[GOLDEN_FRAME];

    Self::ref_count_ctx(l3_count, gold_count)
  }

  #[inline]
  pub fn get_pred_ctx_brf_or_arf2(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let brf_count = ref_counts[BWDREF_FRAME];
    let arf2_count = ref_counts[ALTREF2_FRAME];

    Self::ref_count_ctx(brf_count, arf2_count)
  }

  #[inline]
  pub fn get_pred_ctx_last2_or_l3gld(&self) -> usize {
    let ref_counts = self.neighbours_ref_counts();

    let l2_count = ref_counts[LAST2_FRAME];
    let l3_gold_count =
      ref_counts[LAST3_FRAME] + ref_counts[GOLDEN_FRAME];

    Self::ref_count_ctx(l2_count, l3_gold_count)
  }

  fn ref_pair(b: Option<&Block>) -> (RefType, RefType) {
    b.map_or((INTRA_FRAME, NONE_FRAME), |b| (b.ref_frames[0], b.ref_frames[1]))
  }

  pub fn get_comp_mode_ctx(&self) -> usize {
    let avail_left = self.left.is_some();
    let avail_up = self.above.is_some();
    let (left0, left1) = Self::ref_pair(self.left);
    let (above0, above1) = Self::ref_pair(self.above);
    let left_single = !left1.is_inter_ref();
    let above_single = !above1.is_inter_ref();
    let left_intra = left0 == INTRA_FRAME;
    let above_intra = above0 == INTRA_FRAME;
    let left_backward = left0.is_bwd_ref() && left0.is_inter_ref();
    let above_backward = above0.is_bwd_ref() && above0.is_inter_ref();

    if avail_left && avail_up {
      if above_single && left_single {
        (above_backward ^ left_backward) as usize
      } else if above_single {
        2 + (above_backward || above_intra) as usize
      } else if left_single {
        2 + (left_backward || left_intra) as usize
      } else {
        4
      }
    } else if avail_up {
      if above_single {
        above_backward as usize
      } else {
        3
      }
    } else if avail_left {
      if left_single {
        left_backward as usize
      } else {
        3
      }
    } else {
      1
    }
  }

  pub fn get_comp_ref_type_ctx(&self) -> usize {
    fn is_samedir_ref_pair(ref0: RefType, ref1: RefType) -> bool {
      (ref0.is_bwd_ref() && ref0 != NONE_FRAME)
        == (ref1.is_bwd_ref() && ref1 != NONE_FRAME)
    }

    let avail_left = self.left.is_some();
    let avail_up = self.above.is_some();
    let (left0, left1) = Self::ref_pair(self.left);
    let (above0, above1) = Self::ref_pair(self.above);
    let left_single = !left1.is_inter_ref();
    let above_single = !above1.is_inter_ref();
    let left_intra = left0 == INTRA_FRAME;
    let above_intra = above0 == INTRA_FRAME;
    let above_comp_inter = avail_up && !above_intra && !above_single;
    let left_comp_inter = avail_left && !left_intra && !left_single;
    let above_uni_comp =
      above_comp_inter && is_samedir_ref_pair(above0, above1);
    let left_uni_comp = left_comp_inter && is_samedir_ref_pair(left0, left1);

    if avail_up && !above_intra && avail_left && !left_intra {
      let samedir = is_samedir_ref_pair(above0, left0) as usize;

      if !above_comp_inter && !left_comp_inter {
        1 + 2 * samedir
      } else if !above_comp_inter {
        if !left_uni_comp {
          1
        } else {
          3 + samedir
        }
      } else if !left_comp_inter {
        if !above_uni_comp {
          1
        } else {
          3 + samedir
        }
      } else if !above_uni_comp && !left_uni_comp {
        0
      } else if !above_uni_comp || !left_uni_comp {
        2
      } else {
        3 + ((above0 == BWDREF_FRAME) == (left0 == BWDREF_FRAME)) as usize
      }
    } else if avail_up && avail_left {
      if above_comp_inter {
        1 + 2 * above_uni_comp as usize
      } else if left_comp_inter {
        1 + 2 * left_uni_comp as usize
      } else {
        2
      }
    } else if above_comp_inter {
      4 * above_uni_comp as usize
    } else if left_comp_inter {
      4 * left_uni_comp as usize
    } else {
      2
    }
  }

  /// Luma palette flag context: how many neighbours use a luma palette.
  pub fn palette_y_mode_context(&self) -> usize {
    self.neighbours().filter(|b| b.palette_size[0] > 0).count()
  }

  /// Context of the switchable interpolation filter for direction `dir`.
  pub fn interp_filter_context(
    &self, dir: usize, ref_frames: [RefType; 2],
  ) -> usize {
    let ctx = ((dir & 1) * 2 + ref_frames[1].is_inter_ref() as usize) * 4;
    let filter_type = |b: Option<&Block>| match b {
      Some(b)
        if b.ref_frames[0] == ref_frames[0]
          || b.ref_frames[1] == ref_frames[0] =>
      {
        b.interp_filter[dir] as usize
      }
      _ => SWITCHABLE_FILTERS,
    };
    let left_type = filter_type(self.left);
    let above_type = filter_type(self.above);

    ctx
      + if left_type == above_type {
        left_type
      } else if left_type == SWITCHABLE_FILTERS {
        above_type
      } else if above_type == SWITCHABLE_FILTERS {
        left_type
      } else {
        SWITCHABLE_FILTERS
      }
  }

  pub fn comp_group_idx_context(&self) -> usize {
    let ctx: usize = self
      .neighbours()
      .map(|b| {
        if b.has_second_ref() {
          b.comp_group_idx as usize
        } else if b.ref_frames[0] == ALTREF_FRAME {
          3
        } else {
          0
        }
      })
      .sum();
    ctx.min(COMP_GROUP_IDX_CONTEXTS - 1)
  }

  /// `equal_distance` tells whether both references of the block are as far
  /// from the current frame in display order.
  pub fn compound_idx_context(&self, equal_distance: bool) -> usize {
    let ctx = if equal_distance { 3 } else { 0 };
    ctx
      + self
        .neighbours()
        .map(|b| {
          if b.has_second_ref() {
            b.compound_idx as usize
          } else {
            (b.ref_frames[0] == ALTREF_FRAME) as usize
          }
        })
        .sum::<usize>()
  }
}

/// Context of the `idx`-th dynamic reference list flag, from the weights
/// of the motion vector candidates.
pub fn drl_ctx(ref_mv_weight: &[u16], idx: usize) -> usize {
  let weight = |i: usize| ref_mv_weight.get(i).copied().unwrap_or(0);
  match (weight(idx) >= REF_CAT_LEVEL, weight(idx + 1) >= REF_CAT_LEVEL) {
    (true, true) => 0,
    (true, false) => 1,
    (false, false) => 2,
    (false, true) => 0,
  }
}

/// Context of the compound mode symbol, from the packed inter mode context.
fn compound_mode_ctx(ctx: usize) -> usize {
  let newmv_ctx = ctx & NEWMV_CTX_MASK;
  let refmv_ctx = (ctx >> REFMV_OFFSET) & REFMV_CTX_MASK;

  if refmv_ctx < 2 {
    newmv_ctx.min(1)
  } else if refmv_ctx < 4 {
    (newmv_ctx + 1).min(4)
  } else {
    (newmv_ctx.max(1) + 3).min(7)
  }
}

/// Block size context of the palette syntax. Only palette-eligible sizes,
/// `8x8` up to `64x64`, have one.
pub fn palette_bsize_ctx(bsize: BlockSize) -> Option<usize> {
  let ctx = (bsize.width_mi_log2() + bsize.height_mi_log2()).checked_sub(2)?;
  (bsize.width() <= 64 && bsize.height() <= 64 && ctx < PALETTE_BSIZE_CTXS)
    .then_some(ctx)
}

static palette_color_hash_multipliers: [usize; PALETTE_NUM_NEIGHBORS] =
  [1, 2, 2];
// Only the hashes 2, 5, 6, 7 and 8 can occur.
static palette_color_context: [usize; 9] = [0, 0, 0, 0, 0, 4, 3, 2, 1];
const PALETTE_NUM_NEIGHBORS: usize = 3;

/// Context of the palette index at (`row`, `col`) of the row-major colour
/// map `map`, along with the colours ranked by how often they appear among
/// the left, top-left and top neighbours. The coded symbol is the rank of
/// the actual colour.
pub fn get_palette_color_context(
  map: &[u8], stride: usize, row: usize, col: usize, n: usize,
) -> (usize, [u8; PALETTE_MAX_SIZE]) {
  let mut scores = [0usize; PALETTE_MAX_SIZE];
  let mut color_order = [0u8, 1, 2, 3, 4, 5, 6, 7];

  if col > 0 {
    scores[map[row * stride + col - 1] as usize] += 2;
  }
  if row > 0 && col > 0 {
    scores[map[(row - 1) * stride + col - 1] as usize] += 1;
  }
  if row > 0 {
    scores[map[(row - 1) * stride + col] as usize] += 2;
  }

  for i in 0..PALETTE_NUM_NEIGHBORS {
    let mut max_score = scores[i];
    let mut max_idx = i;
    for j in i + 1..n {
      if scores[j] > max_score {
        max_score = scores[j];
        max_idx = j;
      }
    }
    if max_idx != i {
      let max_color_order = color_order[max_idx];
      for k in (i + 1..=max_idx).rev() {
        scores[k] = scores[k - 1];
        color_order[k] = color_order[k - 1];
      }
      scores[i] = max_score;
      color_order[i] = max_color_order;
    }
  }

  let hash: usize = scores[..PALETTE_NUM_NEIGHBORS]
    .iter()
    .zip(palette_color_hash_multipliers.iter())
    .map(|(s, m)| s * m)
    .sum();
  debug_assert!(matches!(hash, 2 | 5 | 6 | 7 | 8));
  (palette_color_context[hash.min(8)], color_order)
}

/// Positions of a `width` x `height` colour map after the first, in the
/// anti-diagonal order the indices are coded in.
fn palette_wavefront(
  width: usize, height: usize,
) -> impl Iterator<Item = (usize, usize)> {
  (1..width + height - 1).flat_map(move |i| {
    (i.saturating_sub(height - 1)..=i.min(width - 1)).rev().map(move |j| (i - j, j))
  })
}

fn check_palette_size(n: usize) -> Result<()> {
  if (2..=PALETTE_COLORS).contains(&n) {
    Ok(())
  } else {
    Err(EntropyError::InvalidSyntax)
  }
}

/// Sign and magnitude of a delta, split the way delta q and delta lf code
/// them: the magnitude symbol is capped at 3 and larger values follow as a
/// bit count and the remaining bits.
const DELTA_ABS_MAX: u32 = 512;

fn write_delta_tail<W: Writer>(w: &mut W, abs: u32, negative: bool) {
  if abs >= DELTA_LF_SMALL {
    let bits = msb(abs as i32 - 1) as u32;
    w.literal(3, bits - 1);
    w.literal(bits as u8, abs - (1 << bits) - 1);
  }
  if abs > 0 {
    w.bool(negative, 16384);
  }
}

fn read_delta_tail(r: &mut Reader, abs: u32) -> Result<i32> {
  let abs = if abs >= DELTA_LF_SMALL {
    let bits = r.literal(3)? + 1;
    r.literal(bits as u8)? + (1 << bits) + 1
  } else {
    abs
  };
  if abs > 0 && r.bool(16384)? {
    Ok(-(abs as i32))
  } else {
    Ok(abs as i32)
  }
}

impl ContextWriter {
  pub fn write_skip<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, skip: bool,
  ) {
    let ctx = bc.skip_context();
    let cdf = &self.fc.skip_cdfs[ctx];
    symbol_with_update!(self, w, skip as u32, cdf);
  }

  pub fn write_skip_mode<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, skip_mode: bool,
  ) {
    let ctx = bc.skip_mode_context();
    let cdf = &self.fc.skip_mode_cdfs[ctx];
    symbol_with_update!(self, w, skip_mode as u32, cdf);
  }

  pub fn write_is_inter<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, is_inter: bool,
  ) {
    let ctx = bc.intra_inter_context();
    let cdf = &self.fc.intra_inter_cdfs[ctx];
    symbol_with_update!(self, w, is_inter as u32, cdf);
  }

  pub fn write_intrabc<W: Writer>(&mut self, w: &mut W, use_intrabc: bool) {
    let cdf = &self.fc.intrabc_cdf;
    symbol_with_update!(self, w, use_intrabc as u32, cdf);
  }

  pub fn write_intra_mode_kf<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, mode: PredictionMode,
  ) -> Result<()> {
    check_symbol(mode as u32, INTRA_MODES)?;
    let (above_ctx, left_ctx) = bc.intra_mode_kf_context();
    let cdf = &self.fc.kf_y_cdf[above_ctx][left_ctx];
    symbol_with_update!(self, w, mode as u32, cdf);
    Ok(())
  }

  #[inline]
  pub fn write_intra_mode<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, mode: PredictionMode,
  ) -> Result<()> {
    check_symbol(mode as u32, INTRA_MODES)?;
    let cdf = &self.fc.y_mode_cdf[size_group(bsize)];
    symbol_with_update!(self, w, mode as u32, cdf);
    Ok(())
  }

  #[inline]
  pub fn write_intra_uv_mode<W: Writer>(
    &mut self, w: &mut W, uv_mode: PredictionMode, y_mode: PredictionMode,
    bs: BlockSize,
  ) -> Result<()> {
    check_symbol(y_mode as u32, INTRA_MODES)?;
    if bs.cfl_allowed() {
      check_symbol(uv_mode as u32, UV_INTRA_MODES)?;
      let cdf = &self.fc.uv_mode_cfl_cdf[y_mode as usize];
      symbol_with_update!(self, w, uv_mode as u32, cdf);
    } else {
      check_symbol(uv_mode as u32, UV_INTRA_MODES - 1)?;
      let cdf = &self.fc.uv_mode_cdf[y_mode as usize];
      symbol_with_update!(self, w, uv_mode as u32, cdf);
    }
    Ok(())
  }

  #[inline]
  pub fn write_angle_delta<W: Writer>(
    &mut self, w: &mut W, angle: i8, mode: PredictionMode,
  ) -> Result<()> {
    if !mode.is_directional() || angle.unsigned_abs() as usize > MAX_ANGLE_DELTA
    {
      return Err(EntropyError::InvalidSyntax);
    }
    symbol_with_update!(
      self,
      w,
      (angle + MAX_ANGLE_DELTA as i8) as u32,
      &self.fc.angle_delta_cdf
        [mode as usize - PredictionMode::V_PRED as usize]
    );
    Ok(())
  }

  pub fn write_use_filter_intra<W: Writer>(
    &mut self, w: &mut W, enable: bool, block_size: BlockSize,
  ) {
    let cdf = &self.fc.filter_intra_cdfs[block_size as usize];
    symbol_with_update!(self, w, enable as u32, cdf);
  }

  pub fn write_filter_intra_mode<W: Writer>(
    &mut self, w: &mut W, mode: FilterIntraMode,
  ) {
    let cdf = &self.fc.filter_intra_mode_cdf;
    symbol_with_update!(self, w, mode as u32, cdf);
  }

  /// Luma palette flag, coded for `DC_PRED` blocks of palette-eligible size.
  pub fn write_palette_y_mode<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, bsize: BlockSize, enable: bool,
  ) -> Result<()> {
    let bsize_ctx = palette_bsize_ctx(bsize).ok_or(EntropyError::InvalidSyntax)?;
    let ctx = bc.palette_y_mode_context();
    let cdf = &self.fc.palette_y_mode_cdfs[bsize_ctx][ctx];
    symbol_with_update!(self, w, enable as u32, cdf);
    Ok(())
  }

  /// Chroma palette flag; the context is whether luma uses a palette.
  pub fn write_palette_uv_mode<W: Writer>(
    &mut self, w: &mut W, palette_size_y: u8, enable: bool,
  ) {
    let ctx = (palette_size_y > 0) as usize;
    let cdf = &self.fc.palette_uv_mode_cdfs[ctx];
    symbol_with_update!(self, w, enable as u32, cdf);
  }

  /// Number of palette colours, 2 to 8, for plane type `plane` (0 is luma).
  pub fn write_palette_size<W: Writer>(
    &mut self, w: &mut W, plane: usize, bsize: BlockSize, n: usize,
  ) -> Result<()> {
    check_palette_size(n)?;
    let bsize_ctx = palette_bsize_ctx(bsize).ok_or(EntropyError::InvalidSyntax)?;
    let s = (n - 2) as u32;
    if plane == 0 {
      symbol_with_update!(self, w, s, &self.fc.palette_y_size_cdfs[bsize_ctx]);
    } else {
      symbol_with_update!(self, w, s, &self.fc.palette_uv_size_cdfs[bsize_ctx]);
    }
    Ok(())
  }

  /// One colour rank through the CDF of an `n`-colour palette.
  pub fn write_palette_color_idx<W: Writer>(
    &mut self, w: &mut W, plane: usize, n: usize, ctx: usize, idx: u32,
  ) -> Result<()> {
    check_palette_size(n)?;
    check_symbol(idx, n)?;
    match (plane == 0, n) {
      (true, 2) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_2_cdf[ctx]);
      }
      (true, 3) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_3_cdf[ctx]);
      }
      (true, 4) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_4_cdf[ctx]);
      }
      (true, 5) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_5_cdf[ctx]);
      }
      (true, 6) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_6_cdf[ctx]);
      }
      (true, 7) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_7_cdf[ctx]);
      }
      (true, _) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_y_color_8_cdf[ctx]);
      }
      (false, 2) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_2_cdf[ctx]);
      }
      (false, 3) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_3_cdf[ctx]);
      }
      (false, 4) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_4_cdf[ctx]);
      }
      (false, 5) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_5_cdf[ctx]);
      }
      (false, 6) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_6_cdf[ctx]);
      }
      (false, 7) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_7_cdf[ctx]);
      }
      (false, _) => {
        symbol_with_update!(self, w, idx, &self.fc.palette_uv_color_8_cdf[ctx]);
      }
    }
    Ok(())
  }

  /// The colour index map of a palette block, `width` x `height` entries
  /// in row-major order, each below `n`.
  pub fn write_palette_color_map<W: Writer>(
    &mut self, w: &mut W, plane: usize, n: usize, map: &[u8], width: usize,
    height: usize,
  ) -> Result<()> {
    check_palette_size(n)?;
    if width == 0 || height == 0 || map.len() < width * height {
      return Err(EntropyError::InvalidSyntax);
    }
    for &c in &map[..width * height] {
      check_symbol(c as u32, n)?;
    }

    w.write_quniform(n as u32, map[0] as u32);
    for (row, col) in palette_wavefront(width, height) {
      let (ctx, color_order) =
        get_palette_color_context(map, width, row, col, n);
      let color = map[row * width + col];
      let idx = color_order[..n]
        .iter()
        .position(|&c| c == color)
        .ok_or(EntropyError::InvalidSyntax)?;
      self.write_palette_color_idx(w, plane, n, ctx, idx as u32)?;
    }
    Ok(())
  }

  /// Reference frames of an inter block; `ref_frames[1]` is `NONE_FRAME`
  /// for single prediction. `reference_select` is the frame level switch
  /// allowing compound prediction.
  pub fn write_ref_frames<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, rf: [RefType; 2],
    reference_select: bool, bsize: BlockSize,
  ) -> Result<()> {
    if !rf[0].is_inter_ref() {
      return Err(EntropyError::InvalidSyntax);
    }
    let comp_mode = rf[1].is_inter_ref();
    let comp_allowed =
      reference_select && bsize.width_mi().min(bsize.height_mi()) >= 2;
    let bidir = rf[0].is_fwd_ref() && rf[1].is_bwd_ref();
    let unidir = matches!(
      rf,
      [LAST_FRAME, LAST2_FRAME | LAST3_FRAME | GOLDEN_FRAME]
        | [BWDREF_FRAME, ALTREF_FRAME]
    );
    if comp_mode && (!comp_allowed || !(bidir || unidir)) {
      return Err(EntropyError::InvalidSyntax);
    }

    if comp_allowed {
      let ctx = bc.get_comp_mode_ctx();
      let cdf = &self.fc.comp_mode_cdf[ctx];
      symbol_with_update!(self, w, comp_mode as u32, cdf);
    }

    if comp_mode {
      let ctx = bc.get_comp_ref_type_ctx();
      let cdf = &self.fc.comp_ref_type_cdf[ctx];
      symbol_with_update!(self, w, bidir as u32, cdf);

      if !bidir {
        let uni_comp_ref = rf[0] == BWDREF_FRAME;
        let ctx = bc.get_ref_frame_ctx_b0();
        let cdf = &self.fc.uni_comp_ref_cdf[ctx][0];
        symbol_with_update!(self, w, uni_comp_ref as u32, cdf);
        if !uni_comp_ref {
          let uni_comp_ref_p1 = rf[1] != LAST2_FRAME;
          let ctx = bc.get_pred_ctx_last2_or_l3gld();
          let cdf = &self.fc.uni_comp_ref_cdf[ctx][1];
          symbol_with_update!(self, w, uni_comp_ref_p1 as u32, cdf);
          if uni_comp_ref_p1 {
            let uni_comp_ref_p2 = rf[1] == GOLDEN_FRAME;
            let ctx = bc.get_pred_ctx_last3_or_gold();
            let cdf = &self.fc.uni_comp_ref_cdf[ctx][2];
            symbol_with_update!(self, w, uni_comp_ref_p2 as u32, cdf);
          }
        }
      } else {
        let compref = rf[0] == GOLDEN_FRAME || rf[0] == LAST3_FRAME;
        let ctx = bc.get_pred_ctx_ll2_or_l3gld();
        let cdf = &self.fc.comp_ref_cdf[ctx][0];
        symbol_with_update!(self, w, compref as u32, cdf);
        if !compref {
          let compref_p1 = rf[0] == LAST2_FRAME;
          let ctx = bc.get_pred_ctx_last_or_last2();
          let cdf = &self.fc.comp_ref_cdf[ctx][1];
          symbol_with_update!(self, w, compref_p1 as u32, cdf);
        } else {
          let compref_p2 = rf[0] == GOLDEN_FRAME;
          let ctx = bc.get_pred_ctx_last3_or_gold();
          let cdf = &self.fc.comp_ref_cdf[ctx][2];
          symbol_with_update!(self, w, compref_p2 as u32, cdf);
        }
        let comp_bwdref = rf[1] == ALTREF_FRAME;
        let ctx = bc.get_pred_ctx_brfarf2_or_arf();
        let cdf = &self.fc.comp_bwd_ref_cdf[ctx][0];
        symbol_with_update!(self, w, comp_bwdref as u32, cdf);
        if !comp_bwdref {
          let comp_bwdref_p1 = rf[1] == ALTREF2_FRAME;
          let ctx = bc.get_pred_ctx_brf_or_arf2();
          let cdf = &self.fc.comp_bwd_ref_cdf[ctx][1];
          symbol_with_update!(self, w, comp_bwdref_p1 as u32, cdf);
        }
      }
    } else {
      let b0_ctx = bc.get_ref_frame_ctx_b0();
      let b0 = rf[0].is_bwd_ref();

      let cdf = &self.fc.single_ref_cdfs[b0_ctx][0];
      symbol_with_update!(self, w, b0 as u32, cdf);
      if b0 {
        let b1_ctx = bc.get_pred_ctx_brfarf2_or_arf();
        let b1 = rf[0] == ALTREF_FRAME;

        let cdf = &self.fc.single_ref_cdfs[b1_ctx][1];
        symbol_with_update!(self, w, b1 as u32, cdf);
        if !b1 {
          let b5_ctx = bc.get_pred_ctx_brf_or_arf2();
          let b5 = rf[0] == ALTREF2_FRAME;

          let cdf = &self.fc.single_ref_cdfs[b5_ctx][5];
          symbol_with_update!(self, w, b5 as u32, cdf);
        }
      } else {
        let b2_ctx = bc.get_pred_ctx_ll2_or_l3gld();
        let b2 = rf[0] == LAST3_FRAME || rf[0] == GOLDEN_FRAME;

        let cdf = &self.fc.single_ref_cdfs[b2_ctx][2];
        symbol_with_update!(self, w, b2 as u32, cdf);
        if !b2 {
          let b3_ctx = bc.get_pred_ctx_last_or_last2();
          let b3 = rf[0] != LAST_FRAME;

          let cdf = &self.fc.single_ref_cdfs[b3_ctx][3];
          symbol_with_update!(self, w, b3 as u32, cdf);
        } else {
          let b4_ctx = bc.get_pred_ctx_last3_or_gold();
          let b4 = rf[0] != LAST3_FRAME;

          let cdf = &self.fc.single_ref_cdfs[b4_ctx][4];
          symbol_with_update!(self, w, b4 as u32, cdf);
        }
      }
    }
    Ok(())
  }

  /// `ctx` is the packed inter mode context of the motion vector stack.
  pub fn write_inter_mode<W: Writer>(
    &mut self, w: &mut W, mode: PredictionMode, ctx: usize,
  ) -> Result<()> {
    use PredictionMode::{GLOBALMV, NEARESTMV, NEARMV, NEWMV};
    if !matches!(mode, NEARESTMV | NEARMV | GLOBALMV | NEWMV) {
      return Err(EntropyError::InvalidSyntax);
    }
    let newmv_ctx = ctx & NEWMV_CTX_MASK;
    let cdf = &self.fc.newmv_cdf[newmv_ctx.min(NEWMV_MODE_CONTEXTS - 1)];
    symbol_with_update!(self, w, (mode != NEWMV) as u32, cdf);
    if mode != NEWMV {
      let zeromv_ctx = (ctx >> GLOBALMV_OFFSET) & GLOBALMV_CTX_MASK;
      let cdf = &self.fc.zeromv_cdf[zeromv_ctx];
      symbol_with_update!(self, w, (mode != GLOBALMV) as u32, cdf);
      if mode != GLOBALMV {
        let refmv_ctx = (ctx >> REFMV_OFFSET) & REFMV_CTX_MASK;
        let cdf = &self.fc.refmv_cdf[refmv_ctx.min(REFMV_MODE_CONTEXTS - 1)];
        symbol_with_update!(self, w, (mode != NEARESTMV) as u32, cdf);
      }
    }
    Ok(())
  }

  pub fn write_compound_mode<W: Writer>(
    &mut self, w: &mut W, mode: PredictionMode, ctx: usize,
  ) -> Result<()> {
    if !mode.is_compound() {
      return Err(EntropyError::InvalidSyntax);
    }
    let val = mode as u32 - PredictionMode::NEAREST_NEARESTMV as u32;
    let ctx = compound_mode_ctx(ctx);
    symbol_with_update!(self, w, val, &self.fc.compound_mode_cdf[ctx]);
    Ok(())
  }

  #[inline]
  pub fn write_drl_mode<W: Writer>(
    &mut self, w: &mut W, drl_mode: bool, ctx: usize,
  ) {
    let cdf = &self.fc.drl_cdfs[ctx];
    symbol_with_update!(self, w, drl_mode as u32, cdf);
  }

  /// Index into the motion vector candidate list, coded as a run of flags
  /// for `NEWMV`/`NEW_NEWMV` and the modes that use a near candidate.
  /// `ref_mv_weight` holds one weight per candidate found.
  pub fn write_ref_mv_idx<W: Writer>(
    &mut self, w: &mut W, mode: PredictionMode, ref_mv_idx: usize,
    ref_mv_weight: &[u16],
  ) -> Result<()> {
    let start = match mode {
      PredictionMode::NEWMV | PredictionMode::NEW_NEWMV => 0,
      _ if mode.has_nearmv() => 1,
      _ => return Ok(()),
    };
    let num_mv_found = ref_mv_weight.len();
    for idx in start..start + 2 {
      if num_mv_found > idx + 1 {
        let drl_mode = ref_mv_idx > idx;
        self.write_drl_mode(w, drl_mode, drl_ctx(ref_mv_weight, idx));
        if !drl_mode {
          return if ref_mv_idx == idx {
            Ok(())
          } else {
            Err(EntropyError::InvalidSyntax)
          };
        }
      }
    }
    let last = (start + 2).min(num_mv_found.saturating_sub(1).max(start));
    if ref_mv_idx == last {
      Ok(())
    } else {
      Err(EntropyError::InvalidSyntax)
    }
  }

  pub fn write_mv<W: Writer>(
    &mut self, w: &mut W, mv: MotionVector, ref_mv: MotionVector,
    mv_precision: MvSubpelPrecision,
  ) -> Result<()> {
    // <https://aomediacodec.github.io/av1-spec/#assign-mv-semantics>
    if !mv.is_valid() {
      return Err(EntropyError::InvalidSyntax);
    }

    let row = mv.row as i32 - ref_mv.row as i32;
    let col = mv.col as i32 - ref_mv.col as i32;
    let step = match mv_precision {
      MvSubpelPrecision::MV_SUBPEL_NONE => 8,
      MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION => 2,
      MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION => 1,
    };
    for comp in [row, col] {
      if !(MV_LOW..=MV_UPP).contains(&comp) || comp % step != 0 {
        return Err(EntropyError::InvalidSyntax);
      }
    }

    let diff = MotionVector { row: row as i16, col: col as i16 };
    let j: MvJointType = av1_get_mv_joint(diff);

    let cdf = &self.fc.nmv_context.joints_cdf;
    symbol_with_update!(self, w, j as u32, cdf);

    if mv_joint_vertical(j) {
      self.encode_mv_component(w, row, 0, mv_precision);
    }
    if mv_joint_horizontal(j) {
      self.encode_mv_component(w, col, 1, mv_precision);
    }
    Ok(())
  }

  /// Inter-intra flag, for blocks from `8x8` to `32x32`.
  pub fn write_interintra<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, interintra: bool,
  ) {
    let cdf = &self.fc.interintra_cdf[size_group(bsize)];
    symbol_with_update!(self, w, interintra as u32, cdf);
  }

  pub fn write_interintra_mode<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, mode: InterIntraMode,
  ) {
    let cdf = &self.fc.interintra_mode_cdf[size_group(bsize)];
    symbol_with_update!(self, w, mode as u32, cdf);
  }

  pub fn write_wedge_interintra<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, wedge: bool,
  ) {
    let cdf = &self.fc.wedge_interintra_cdf[bsize as usize];
    symbol_with_update!(self, w, wedge as u32, cdf);
  }

  pub fn write_wedge_idx<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, wedge_index: u32,
  ) -> Result<()> {
    check_symbol(wedge_index, 16)?;
    let cdf = &self.fc.wedge_idx_cdf[bsize as usize];
    symbol_with_update!(self, w, wedge_index, cdf);
    Ok(())
  }

  pub fn write_compound_type<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, compound_type: CompoundType,
  ) {
    let cdf = &self.fc.compound_type_cdf[bsize as usize];
    symbol_with_update!(self, w, compound_type as u32, cdf);
  }

  /// Motion mode of a block; when warped motion is not allowed only the
  /// OBMC flag is coded.
  pub fn write_motion_mode<W: Writer>(
    &mut self, w: &mut W, bsize: BlockSize, mode: MotionMode,
    allow_warped: bool,
  ) -> Result<()> {
    if allow_warped {
      let cdf = &self.fc.motion_mode_cdf[bsize as usize];
      symbol_with_update!(self, w, mode as u32, cdf);
    } else {
      if mode == MotionMode::WARPED_CAUSAL {
        return Err(EntropyError::InvalidSyntax);
      }
      let cdf = &self.fc.obmc_cdf[bsize as usize];
      symbol_with_update!(self, w, (mode == MotionMode::OBMC_CAUSAL) as u32, cdf);
    }
    Ok(())
  }

  pub fn write_interp_filter<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, dir: usize,
    ref_frames: [RefType; 2], filter: FilterMode,
  ) -> Result<()> {
    check_symbol(filter as u32, SWITCHABLE_FILTERS)?;
    let ctx = bc.interp_filter_context(dir, ref_frames);
    let cdf = &self.fc.switchable_interp_cdf[ctx];
    symbol_with_update!(self, w, filter as u32, cdf);
    Ok(())
  }

  pub fn write_comp_group_idx<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, comp_group_idx: bool,
  ) {
    let ctx = bc.comp_group_idx_context();
    let cdf = &self.fc.comp_group_idx_cdfs[ctx];
    symbol_with_update!(self, w, comp_group_idx as u32, cdf);
  }

  pub fn write_compound_idx<W: Writer>(
    &mut self, w: &mut W, bc: &BlockContext, equal_distance: bool,
    compound_idx: bool,
  ) {
    let ctx = bc.compound_idx_context(equal_distance);
    let cdf = &self.fc.compound_idx_cdfs[ctx];
    symbol_with_update!(self, w, compound_idx as u32, cdf);
  }

  /// Block level quantizer index delta, before scaling by the frame's
  /// delta q resolution.
  pub fn write_delta_qindex<W: Writer>(
    &mut self, w: &mut W, delta_q: i32,
  ) -> Result<()> {
    let abs = delta_q.unsigned_abs();
    if abs > DELTA_ABS_MAX {
      return Err(EntropyError::InvalidSyntax);
    }
    let cdf = &self.fc.delta_q_cdf;
    symbol_with_update!(self, w, cmp::min(abs, DELTA_Q_SMALL), cdf);
    write_delta_tail(w, abs, delta_q < 0);
    Ok(())
  }

  /// Loop filter level deltas: a single one, or one per filter edge and
  /// plane when `multi` is set.
  pub fn write_block_deblock_deltas<W: Writer>(
    &mut self, w: &mut W, deltas: &[i32], multi: bool,
  ) -> Result<()> {
    if deltas.len() > if multi { FRAME_LF_COUNT } else { 1 } {
      return Err(EntropyError::InvalidSyntax);
    }
    if deltas.iter().any(|d| d.unsigned_abs() > DELTA_ABS_MAX) {
      return Err(EntropyError::InvalidSyntax);
    }

    for (i, &delta) in deltas.iter().enumerate() {
      let abs = delta.unsigned_abs();
      let cdf = if multi {
        &self.fc.deblock_delta_multi_cdf[i]
      } else {
        &self.fc.deblock_delta_cdf
      };

      symbol_with_update!(self, w, cmp::min(abs, DELTA_LF_SMALL), cdf);
      write_delta_tail(w, abs, delta < 0);
    }
    Ok(())
  }
}

impl ContextReader {
  pub fn read_skip(&mut self, r: &mut Reader, bc: &BlockContext) -> Result<bool> {
    let ctx = bc.skip_context();
    Ok(read_symbol!(self, r, self.fc.skip_cdfs[ctx]) != 0)
  }

  pub fn read_skip_mode(
    &mut self, r: &mut Reader, bc: &BlockContext,
  ) -> Result<bool> {
    let ctx = bc.skip_mode_context();
    Ok(read_symbol!(self, r, self.fc.skip_mode_cdfs[ctx]) != 0)
  }

  pub fn read_is_inter(
    &mut self, r: &mut Reader, bc: &BlockContext,
  ) -> Result<bool> {
    let ctx = bc.intra_inter_context();
    Ok(read_symbol!(self, r, self.fc.intra_inter_cdfs[ctx]) != 0)
  }

  pub fn read_intrabc(&mut self, r: &mut Reader) -> Result<bool> {
    Ok(read_symbol!(self, r, self.fc.intrabc_cdf) != 0)
  }

  pub fn read_intra_mode_kf(
    &mut self, r: &mut Reader, bc: &BlockContext,
  ) -> Result<PredictionMode> {
    let (above_ctx, left_ctx) = bc.intra_mode_kf_context();
    let v = read_symbol!(self, r, self.fc.kf_y_cdf[above_ctx][left_ctx]);
    PredictionMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_intra_mode(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<PredictionMode> {
    let v = read_symbol!(self, r, self.fc.y_mode_cdf[size_group(bsize)]);
    PredictionMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_intra_uv_mode(
    &mut self, r: &mut Reader, y_mode: PredictionMode, bs: BlockSize,
  ) -> Result<PredictionMode> {
    check_symbol(y_mode as u32, INTRA_MODES)?;
    let v = if bs.cfl_allowed() {
      read_symbol!(self, r, self.fc.uv_mode_cfl_cdf[y_mode as usize])
    } else {
      read_symbol!(self, r, self.fc.uv_mode_cdf[y_mode as usize])
    };
    PredictionMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_angle_delta(
    &mut self, r: &mut Reader, mode: PredictionMode,
  ) -> Result<i8> {
    if !mode.is_directional() {
      return Err(EntropyError::InvalidSyntax);
    }
    let v = read_symbol!(
      self,
      r,
      self.fc.angle_delta_cdf[mode as usize - PredictionMode::V_PRED as usize]
    );
    Ok(v as i8 - MAX_ANGLE_DELTA as i8)
  }

  pub fn read_use_filter_intra(
    &mut self, r: &mut Reader, block_size: BlockSize,
  ) -> Result<bool> {
    Ok(read_symbol!(self, r, self.fc.filter_intra_cdfs[block_size as usize]) != 0)
  }

  pub fn read_filter_intra_mode(
    &mut self, r: &mut Reader,
  ) -> Result<FilterIntraMode> {
    let v = read_symbol!(self, r, self.fc.filter_intra_mode_cdf);
    FilterIntraMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_palette_y_mode(
    &mut self, r: &mut Reader, bc: &BlockContext, bsize: BlockSize,
  ) -> Result<bool> {
    let bsize_ctx = palette_bsize_ctx(bsize).ok_or(EntropyError::InvalidSyntax)?;
    let ctx = bc.palette_y_mode_context();
    Ok(read_symbol!(self, r, self.fc.palette_y_mode_cdfs[bsize_ctx][ctx]) != 0)
  }

  pub fn read_palette_uv_mode(
    &mut self, r: &mut Reader, palette_size_y: u8,
  ) -> Result<bool> {
    let ctx = (palette_size_y > 0) as usize;
    Ok(read_symbol!(self, r, self.fc.palette_uv_mode_cdfs[ctx]) != 0)
  }

  pub fn read_palette_size(
    &mut self, r: &mut Reader, plane: usize, bsize: BlockSize,
  ) -> Result<usize> {
    let bsize_ctx = palette_bsize_ctx(bsize).ok_or(EntropyError::InvalidSyntax)?;
    let s = if plane == 0 {
      read_symbol!(self, r, self.fc.palette_y_size_cdfs[bsize_ctx])
    } else {
      read_symbol!(self, r, self.fc.palette_uv_size_cdfs[bsize_ctx])
    };
    Ok(s as usize + 2)
  }

  pub fn read_palette_color_idx(
    &mut self, r: &mut Reader, plane: usize, n: usize, ctx: usize,
  ) -> Result<u32> {
    check_palette_size(n)?;
    let idx = match (plane == 0, n) {
      (true, 2) => read_symbol!(self, r, self.fc.palette_y_color_2_cdf[ctx]),
      (true, 3) => read_symbol!(self, r, self.fc.palette_y_color_3_cdf[ctx]),
      (true, 4) => read_symbol!(self, r, self.fc.palette_y_color_4_cdf[ctx]),
      (true, 5) => read_symbol!(self, r, self.fc.palette_y_color_5_cdf[ctx]),
      (true, 6) => read_symbol!(self, r, self.fc.palette_y_color_6_cdf[ctx]),
      (true, 7) => read_symbol!(self, r, self.fc.palette_y_color_7_cdf[ctx]),
      (true, _) => read_symbol!(self, r, self.fc.palette_y_color_8_cdf[ctx]),
      (false, 2) => read_symbol!(self, r, self.fc.palette_uv_color_2_cdf[ctx]),
      (false, 3) => read_symbol!(self, r, self.fc.palette_uv_color_3_cdf[ctx]),
      (false, 4) => read_symbol!(self, r, self.fc.palette_uv_color_4_cdf[ctx]),
      (false, 5) => read_symbol!(self, r, self.fc.palette_uv_color_5_cdf[ctx]),
      (false, 6) => read_symbol!(self, r, self.fc.palette_uv_color_6_cdf[ctx]),
      (false, 7) => read_symbol!(self, r, self.fc.palette_uv_color_7_cdf[ctx]),
      (false, _) => read_symbol!(self, r, self.fc.palette_uv_color_8_cdf[ctx]),
    };
    Ok(idx)
  }

  /// Fills the first `width * height` entries of `map`.
  pub fn read_palette_color_map(
    &mut self, r: &mut Reader, plane: usize, n: usize, map: &mut [u8],
    width: usize, height: usize,
  ) -> Result<()> {
    check_palette_size(n)?;
    if width == 0 || height == 0 || map.len() < width * height {
      return Err(EntropyError::InvalidSyntax);
    }

    map[0] = r.read_quniform(n as u32)? as u8;
    for (row, col) in palette_wavefront(width, height) {
      let (ctx, color_order) =
        get_palette_color_context(map, width, row, col, n);
      let idx = self.read_palette_color_idx(r, plane, n, ctx)?;
      map[row * width + col] = color_order[idx as usize];
    }
    Ok(())
  }

  pub fn read_ref_frames(
    &mut self, r: &mut Reader, bc: &BlockContext, reference_select: bool,
    bsize: BlockSize,
  ) -> Result<[RefType; 2]> {
    let comp_mode =
      if reference_select && bsize.width_mi().min(bsize.height_mi()) >= 2 {
        let ctx = bc.get_comp_mode_ctx();
        read_symbol!(self, r, self.fc.comp_mode_cdf[ctx]) != 0
      } else {
        false
      };

    if comp_mode {
      let ctx = bc.get_comp_ref_type_ctx();
      let bidir = read_symbol!(self, r, self.fc.comp_ref_type_cdf[ctx]) != 0;

      if !bidir {
        let ctx = bc.get_ref_frame_ctx_b0();
        if read_symbol!(self, r, self.fc.uni_comp_ref_cdf[ctx][0]) != 0 {
          return Ok([BWDREF_FRAME, ALTREF_FRAME]);
        }
        let ctx = bc.get_pred_ctx_last2_or_l3gld();
        if read_symbol!(self, r, self.fc.uni_comp_ref_cdf[ctx][1]) == 0 {
          return Ok([LAST_FRAME, LAST2_FRAME]);
        }
        let ctx = bc.get_pred_ctx_last3_or_gold();
        if read_symbol!(self, r, self.fc.uni_comp_ref_cdf[ctx][2]) != 0 {
          Ok([LAST_FRAME, GOLDEN_FRAME])
        } else {
          Ok([LAST_FRAME, LAST3_FRAME])
        }
      } else {
        let ctx = bc.get_pred_ctx_ll2_or_l3gld();
        let fwd = if read_symbol!(self, r, self.fc.comp_ref_cdf[ctx][0]) == 0 {
          let ctx = bc.get_pred_ctx_last_or_last2();
          if read_symbol!(self, r, self.fc.comp_ref_cdf[ctx][1]) != 0 {
            LAST2_FRAME
          } else {
            LAST_FRAME
          }
        } else {
          let ctx = bc.get_pred_ctx_last3_or_gold();
          if read_symbol!(self, r, self.fc.comp_ref_cdf[ctx][2]) != 0 {
            GOLDEN_FRAME
          } else {
            LAST3_FRAME
          }
        };
        let ctx = bc.get_pred_ctx_brfarf2_or_arf();
        let bwd = if read_symbol!(self, r, self.fc.comp_bwd_ref_cdf[ctx][0]) != 0
        {
          ALTREF_FRAME
        } else {
          let ctx = bc.get_pred_ctx_brf_or_arf2();
          if read_symbol!(self, r, self.fc.comp_bwd_ref_cdf[ctx][1]) != 0 {
            ALTREF2_FRAME
          } else {
            BWDREF_FRAME
          }
        };
        Ok([fwd, bwd])
      }
    } else {
      let ctx = bc.get_ref_frame_ctx_b0();
      let rf = if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][0]) != 0 {
        let ctx = bc.get_pred_ctx_brfarf2_or_arf();
        if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][1]) != 0 {
          ALTREF_FRAME
        } else {
          let ctx = bc.get_pred_ctx_brf_or_arf2();
          if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][5]) != 0 {
            ALTREF2_FRAME
          } else {
            BWDREF_FRAME
          }
        }
      } else {
        let ctx = bc.get_pred_ctx_ll2_or_l3gld();
        if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][2]) == 0 {
          let ctx = bc.get_pred_ctx_last_or_last2();
          if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][3]) != 0 {
            LAST2_FRAME
          } else {
            LAST_FRAME
          }
        } else {
          let ctx = bc.get_pred_ctx_last3_or_gold();
          if read_symbol!(self, r, self.fc.single_ref_cdfs[ctx][4]) != 0 {
            GOLDEN_FRAME
          } else {
            LAST3_FRAME
          }
        }
      };
      Ok([rf, NONE_FRAME])
    }
  }

  pub fn read_inter_mode(
    &mut self, r: &mut Reader, ctx: usize,
  ) -> Result<PredictionMode> {
    use PredictionMode::{GLOBALMV, NEARESTMV, NEARMV, NEWMV};
    let newmv_ctx = (ctx & NEWMV_CTX_MASK).min(NEWMV_MODE_CONTEXTS - 1);
    if read_symbol!(self, r, self.fc.newmv_cdf[newmv_ctx]) == 0 {
      return Ok(NEWMV);
    }
    let zeromv_ctx = (ctx >> GLOBALMV_OFFSET) & GLOBALMV_CTX_MASK;
    if read_symbol!(self, r, self.fc.zeromv_cdf[zeromv_ctx]) == 0 {
      return Ok(GLOBALMV);
    }
    let refmv_ctx =
      ((ctx >> REFMV_OFFSET) & REFMV_CTX_MASK).min(REFMV_MODE_CONTEXTS - 1);
    if read_symbol!(self, r, self.fc.refmv_cdf[refmv_ctx]) == 0 {
      Ok(NEARESTMV)
    } else {
      Ok(NEARMV)
    }
  }

  pub fn read_compound_mode(
    &mut self, r: &mut Reader, ctx: usize,
  ) -> Result<PredictionMode> {
    let ctx = compound_mode_ctx(ctx);
    let v = read_symbol!(self, r, self.fc.compound_mode_cdf[ctx]);
    PredictionMode::from_u32(v + PredictionMode::NEAREST_NEARESTMV as u32)
      .ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_drl_mode(&mut self, r: &mut Reader, ctx: usize) -> Result<bool> {
    Ok(read_symbol!(self, r, self.fc.drl_cdfs[ctx]) != 0)
  }

  pub fn read_ref_mv_idx(
    &mut self, r: &mut Reader, mode: PredictionMode, ref_mv_weight: &[u16],
  ) -> Result<usize> {
    let start = match mode {
      PredictionMode::NEWMV | PredictionMode::NEW_NEWMV => 0,
      _ if mode.has_nearmv() => 1,
      _ => return Ok(0),
    };
    let num_mv_found = ref_mv_weight.len();
    let mut ref_mv_idx = start;
    for idx in start..start + 2 {
      if num_mv_found > idx + 1 {
        if !self.read_drl_mode(r, drl_ctx(ref_mv_weight, idx))? {
          return Ok(idx);
        }
        ref_mv_idx = idx + 1;
      }
    }
    Ok(ref_mv_idx)
  }

  /// Motion vector coded as a difference to `ref_mv`.
  pub fn read_mv(
    &mut self, r: &mut Reader, ref_mv: MotionVector,
    mv_precision: MvSubpelPrecision,
  ) -> Result<MotionVector> {
    let j = read_symbol!(self, r, self.fc.nmv_context.joints_cdf);
    let j = MvJointType::from_u32(j).ok_or(EntropyError::CorruptSyntax)?;

    let row = if mv_joint_vertical(j) {
      self.decode_mv_component(r, 0, mv_precision)?
    } else {
      0
    };
    let col = if mv_joint_horizontal(j) {
      self.decode_mv_component(r, 1, mv_precision)?
    } else {
      0
    };

    let mv = MotionVector {
      row: i16::try_from(ref_mv.row as i32 + row)
        .map_err(|_| EntropyError::CorruptSyntax)?,
      col: i16::try_from(ref_mv.col as i32 + col)
        .map_err(|_| EntropyError::CorruptSyntax)?,
    };
    if mv.is_valid() {
      Ok(mv)
    } else {
      Err(EntropyError::CorruptSyntax)
    }
  }

  pub fn read_interintra(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<bool> {
    Ok(read_symbol!(self, r, self.fc.interintra_cdf[size_group(bsize)]) != 0)
  }

  pub fn read_interintra_mode(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<InterIntraMode> {
    let v = read_symbol!(self, r, self.fc.interintra_mode_cdf[size_group(bsize)]);
    InterIntraMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_wedge_interintra(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<bool> {
    Ok(read_symbol!(self, r, self.fc.wedge_interintra_cdf[bsize as usize]) != 0)
  }

  pub fn read_wedge_idx(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<u32> {
    Ok(read_symbol!(self, r, self.fc.wedge_idx_cdf[bsize as usize]))
  }

  pub fn read_compound_type(
    &mut self, r: &mut Reader, bsize: BlockSize,
  ) -> Result<CompoundType> {
    let v = read_symbol!(self, r, self.fc.compound_type_cdf[bsize as usize]);
    CompoundType::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_motion_mode(
    &mut self, r: &mut Reader, bsize: BlockSize, allow_warped: bool,
  ) -> Result<MotionMode> {
    if allow_warped {
      let v = read_symbol!(self, r, self.fc.motion_mode_cdf[bsize as usize]);
      MotionMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
    } else if read_symbol!(self, r, self.fc.obmc_cdf[bsize as usize]) != 0 {
      Ok(MotionMode::OBMC_CAUSAL)
    } else {
      Ok(MotionMode::SIMPLE_TRANSLATION)
    }
  }

  pub fn read_interp_filter(
    &mut self, r: &mut Reader, bc: &BlockContext, dir: usize,
    ref_frames: [RefType; 2],
  ) -> Result<FilterMode> {
    let ctx = bc.interp_filter_context(dir, ref_frames);
    let v = read_symbol!(self, r, self.fc.switchable_interp_cdf[ctx]);
    FilterMode::from_u32(v).ok_or(EntropyError::CorruptSyntax)
  }

  pub fn read_comp_group_idx(
    &mut self, r: &mut Reader, bc: &BlockContext,
  ) -> Result<bool> {
    let ctx = bc.comp_group_idx_context();
    Ok(read_symbol!(self, r, self.fc.comp_group_idx_cdfs[ctx]) != 0)
  }

  pub fn read_compound_idx(
    &mut self, r: &mut Reader, bc: &BlockContext, equal_distance: bool,
  ) -> Result<bool> {
    let ctx = bc.compound_idx_context(equal_distance);
    Ok(read_symbol!(self, r, self.fc.compound_idx_cdfs[ctx]) != 0)
  }

  pub fn read_delta_qindex(&mut self, r: &mut Reader) -> Result<i32> {
    let abs = read_symbol!(self, r, self.fc.delta_q_cdf);
    read_delta_tail(r, abs)
  }

  /// Reads `count` loop filter deltas, see
  /// [`ContextWriter::write_block_deblock_deltas`].
  pub fn read_block_deblock_deltas(
    &mut self, r: &mut Reader, count: usize, multi: bool,
  ) -> Result<[i32; FRAME_LF_COUNT]> {
    if count > if multi { FRAME_LF_COUNT } else { 1 } {
      return Err(EntropyError::InvalidSyntax);
    }
    let mut deltas = [0; FRAME_LF_COUNT];
    for (i, delta) in deltas[..count].iter_mut().enumerate() {
      let abs = if multi {
        read_symbol!(self, r, self.fc.deblock_delta_multi_cdf[i])
      } else {
        read_symbol!(self, r, self.fc.deblock_delta_cdf)
      };
      *delta = read_delta_tail(r, abs)?;
    }
    Ok(deltas)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ec::WriterEncoder;

  fn inter_block(rf: [RefType; 2]) -> Block {
    Block { mode: PredictionMode::NEWMV, ref_frames: rf, ..Default::default() }
  }

  #[test]
  fn intra_inter_contexts() {
    let intra = Block::default();
    let inter = inter_block([LAST_FRAME, NONE_FRAME]);
    assert_eq!(BlockContext::new(None, None).intra_inter_context(), 0);
    assert_eq!(BlockContext::new(Some(&intra), None).intra_inter_context(), 2);
    assert_eq!(BlockContext::new(None, Some(&inter)).intra_inter_context(), 0);
    assert_eq!(
      BlockContext::new(Some(&intra), Some(&inter)).intra_inter_context(),
      1
    );
    assert_eq!(
      BlockContext::new(Some(&intra), Some(&intra)).intra_inter_context(),
      3
    );
  }

  #[test]
  fn inter_mode_without_references_is_intra() {
    let mismatched = Block { mode: PredictionMode::NEWMV, ..Default::default() };
    assert!(!mismatched.is_inter());
    let bc = BlockContext::new(Some(&mismatched), None);
    assert_eq!(bc.neighbours_ref_counts(), RefCounts::default());
    assert_eq!(bc.get_ref_frame_ctx_b0(), 1);
    assert_eq!(bc.get_pred_ctx_brfarf2_or_arf(), 1);
    assert_eq!(bc.intra_inter_context(), 2);
  }

  #[test]
  fn skip_context_counts_neighbours() {
    let skipped = Block { skip: true, ..Default::default() };
    let coded = Block::default();
    assert_eq!(BlockContext::new(None, None).skip_context(), 0);
    assert_eq!(BlockContext::new(Some(&skipped), Some(&coded)).skip_context(), 1);
    assert_eq!(
      BlockContext::new(Some(&skipped), Some(&skipped)).skip_context(),
      2
    );
  }

  #[test]
  fn ref_counts_include_second_reference() {
    let a = inter_block([LAST_FRAME, ALTREF_FRAME]);
    let l = inter_block([LAST_FRAME, NONE_FRAME]);
    let bc = BlockContext::new(Some(&a), Some(&l));
    let counts = bc.neighbours_ref_counts();
    assert_eq!(counts[LAST_FRAME], 2);
    assert_eq!(counts[ALTREF_FRAME], 1);
    assert_eq!(counts[INTRA_FRAME], 0);
    assert_eq!(bc.get_ref_frame_ctx_b0(), 2);
    assert_eq!(bc.get_pred_ctx_brfarf2_or_arf(), 0);
  }

  #[test]
  fn comp_group_idx_context_saturates() {
    let arf = inter_block([ALTREF_FRAME, NONE_FRAME]);
    let bc = BlockContext::new(Some(&arf), Some(&arf));
    assert_eq!(bc.comp_group_idx_context(), 5);
    assert_eq!(bc.compound_idx_context(true), 5);
    assert_eq!(BlockContext::default().compound_idx_context(false), 0);
  }

  #[test]
  fn drl_contexts() {
    assert_eq!(drl_ctx(&[700, 700], 0), 0);
    assert_eq!(drl_ctx(&[700, 100], 0), 1);
    assert_eq!(drl_ctx(&[100, 100], 0), 2);
    assert_eq!(drl_ctx(&[100, 700], 0), 0);
  }

  #[test]
  fn palette_contexts() {
    // 0 1
    // 1 ?
    let map = [0u8, 1, 1, 0];
    let (ctx, order) = get_palette_color_context(&map, 2, 1, 1, 2);
    // left and top agree on colour 1, top-left is colour 0
    assert_eq!(ctx, 3);
    assert_eq!(&order[..2], &[1, 0]);

    let (ctx, order) = get_palette_color_context(&map, 2, 0, 1, 2);
    assert_eq!(ctx, 0);
    assert_eq!(order[0], 0);

    assert_eq!(palette_bsize_ctx(BlockSize::BLOCK_4X4), None);
    assert_eq!(palette_bsize_ctx(BlockSize::BLOCK_8X8), Some(0));
    assert_eq!(palette_bsize_ctx(BlockSize::BLOCK_64X64), Some(6));
    assert_eq!(palette_bsize_ctx(BlockSize::BLOCK_128X128), None);
  }

  #[test]
  fn palette_wavefront_visits_every_position_once() {
    let mut seen = [[false; 5]; 3];
    seen[0][0] = true;
    for (row, col) in palette_wavefront(5, 3) {
      assert!(!seen[row][col]);
      seen[row][col] = true;
    }
    assert!(seen.iter().flatten().all(|&s| s));
  }

  #[test]
  fn invalid_ref_pairs_are_rejected() {
    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    let bc = BlockContext::default();
    let bsize = BlockSize::BLOCK_16X16;
    assert_eq!(
      cw.write_ref_frames(&mut w, &bc, [LAST2_FRAME, LAST3_FRAME], true, bsize),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_ref_frames(&mut w, &bc, [INTRA_FRAME, NONE_FRAME], true, bsize),
      Err(EntropyError::InvalidSyntax)
    );
    assert_eq!(
      cw.write_ref_frames(&mut w, &bc, [LAST_FRAME, ALTREF_FRAME], false, bsize),
      Err(EntropyError::InvalidSyntax)
    );
  }

  #[test]
  fn block_syntax_roundtrip() {
    let above = inter_block([LAST_FRAME, BWDREF_FRAME]);
    let left = Block { palette_size: [4, 0], ..Default::default() };
    let bc = BlockContext::new(Some(&above), Some(&left));
    let bsize = BlockSize::BLOCK_16X16;
    let map = [0u8, 1, 1, 3, 2, 2, 1, 0, 3, 3, 0, 1];
    let weights = [700u16, 650, 100, 20];
    let mv = MotionVector { row: -36, col: 1000 };
    let ref_mv = MotionVector { row: 4, col: -8 };
    let pairs = [
      [LAST_FRAME, LAST2_FRAME],
      [LAST_FRAME, GOLDEN_FRAME],
      [BWDREF_FRAME, ALTREF_FRAME],
      [LAST3_FRAME, ALTREF2_FRAME],
      [GOLDEN_FRAME, NONE_FRAME],
      [ALTREF2_FRAME, NONE_FRAME],
    ];

    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let mut w = WriterEncoder::new();
    cw.write_skip(&mut w, &bc, true);
    cw.write_is_inter(&mut w, &bc, false);
    cw.write_intra_mode_kf(&mut w, &bc, PredictionMode::D67_PRED).unwrap();
    cw.write_angle_delta(&mut w, -2, PredictionMode::D67_PRED).unwrap();
    cw.write_intra_uv_mode(
      &mut w,
      PredictionMode::UV_CFL_PRED,
      PredictionMode::D67_PRED,
      bsize,
    )
    .unwrap();
    cw.write_palette_y_mode(&mut w, &bc, bsize, true).unwrap();
    cw.write_palette_size(&mut w, 0, bsize, 4).unwrap();
    cw.write_palette_color_map(&mut w, 0, 4, &map, 4, 3).unwrap();
    for rf in pairs {
      cw.write_ref_frames(&mut w, &bc, rf, true, bsize).unwrap();
    }
    cw.write_inter_mode(&mut w, PredictionMode::NEARMV, 0x23).unwrap();
    cw.write_compound_mode(&mut w, PredictionMode::NEAR_NEWMV, 0x41).unwrap();
    cw.write_ref_mv_idx(&mut w, PredictionMode::NEARMV, 2, &weights).unwrap();
    cw.write_mv(&mut w, mv, ref_mv, MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION)
      .unwrap();
    cw.write_motion_mode(&mut w, bsize, MotionMode::OBMC_CAUSAL, false).unwrap();
    cw.write_interp_filter(
      &mut w,
      &bc,
      1,
      [LAST_FRAME, NONE_FRAME],
      FilterMode::SHARP,
    )
    .unwrap();
    cw.write_delta_qindex(&mut w, -77).unwrap();
    cw.write_block_deblock_deltas(&mut w, &[3, 0, -1, 40], true).unwrap();
    let buf = w.done();

    let mut cr = ContextReader::new(Box::new(CDFContext::new()), true);
    let mut r = Reader::new(&buf);
    assert!(cr.read_skip(&mut r, &bc).unwrap());
    assert!(!cr.read_is_inter(&mut r, &bc).unwrap());
    assert_eq!(
      cr.read_intra_mode_kf(&mut r, &bc).unwrap(),
      PredictionMode::D67_PRED
    );
    assert_eq!(cr.read_angle_delta(&mut r, PredictionMode::D67_PRED).unwrap(), -2);
    assert_eq!(
      cr.read_intra_uv_mode(&mut r, PredictionMode::D67_PRED, bsize).unwrap(),
      PredictionMode::UV_CFL_PRED
    );
    assert!(cr.read_palette_y_mode(&mut r, &bc, bsize).unwrap());
    assert_eq!(cr.read_palette_size(&mut r, 0, bsize).unwrap(), 4);
    let mut decoded = [0u8; 12];
    cr.read_palette_color_map(&mut r, 0, 4, &mut decoded, 4, 3).unwrap();
    assert_eq!(decoded, map);
    for rf in pairs {
      assert_eq!(cr.read_ref_frames(&mut r, &bc, true, bsize).unwrap(), rf);
    }
    assert_eq!(cr.read_inter_mode(&mut r, 0x23).unwrap(), PredictionMode::NEARMV);
    assert_eq!(
      cr.read_compound_mode(&mut r, 0x41).unwrap(),
      PredictionMode::NEAR_NEWMV
    );
    assert_eq!(
      cr.read_ref_mv_idx(&mut r, PredictionMode::NEARMV, &weights).unwrap(),
      2
    );
    assert_eq!(
      cr.read_mv(&mut r, ref_mv, MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION)
        .unwrap(),
      mv
    );
    assert_eq!(
      cr.read_motion_mode(&mut r, bsize, false).unwrap(),
      MotionMode::OBMC_CAUSAL
    );
    assert_eq!(
      cr.read_interp_filter(&mut r, &bc, 1, [LAST_FRAME, NONE_FRAME]).unwrap(),
      FilterMode::SHARP
    );
    assert_eq!(cr.read_delta_qindex(&mut r).unwrap(), -77);
    assert_eq!(
      cr.read_block_deblock_deltas(&mut r, 4, true).unwrap(),
      [3, 0, -1, 40]
    );
    assert_eq!(cw.fc.as_slice(), cr.fc.as_slice());
  }
}
