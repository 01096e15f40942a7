// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use arrayvec::ArrayVec;
use bytemuck::{Pod, Zeroable};
use std::marker::PhantomData;
use std::{fmt, slice};

/// Storage length of the widest CDF in [`CDFContext`] (16 symbols).
pub const CDF_LEN_MAX: usize = cdf_size!(16);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CDFContextCheckpoint {
  small: usize,
  large: usize,
}

/// Every adaptive CDF of a tile, with the counter kept in the last slot of
/// each one.
///
/// The struct is a flat run of `u16`s with no padding, so that the undo
/// log can address any CDF by its offset.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C)]
pub struct CDFContext {
  pub partition_w8_cdf: [[u16; cdf_size!(4)]; PARTITION_TYPES],
  pub partition_w128_cdf: [[u16; cdf_size!(8)]; PARTITION_TYPES],
  pub partition_cdf: [[u16; cdf_size!(EXT_PARTITION_TYPES)]; 3 * PARTITION_TYPES],

  pub kf_y_cdf:
    [[[u16; cdf_size!(INTRA_MODES)]; KF_MODE_CONTEXTS]; KF_MODE_CONTEXTS],
  pub y_mode_cdf: [[u16; cdf_size!(INTRA_MODES)]; BLOCK_SIZE_GROUPS],
  pub uv_mode_cdf: [[u16; cdf_size!(INTRA_MODES)]; INTRA_MODES],
  pub uv_mode_cfl_cdf: [[u16; cdf_size!(UV_INTRA_MODES)]; INTRA_MODES],
  pub angle_delta_cdf:
    [[u16; cdf_size!(2 * MAX_ANGLE_DELTA + 1)]; DIRECTIONAL_MODES],
  pub cfl_sign_cdf: [u16; cdf_size!(CFL_JOINT_SIGNS)],
  pub cfl_alpha_cdf: [[u16; cdf_size!(CFL_ALPHABET_SIZE)]; CFL_ALPHA_CONTEXTS],
  pub filter_intra_cdfs: [[u16; cdf_size!(2)]; BlockSize::BLOCK_SIZES_ALL],
  pub filter_intra_mode_cdf: [u16; cdf_size!(FILTER_INTRA_MODES)],

  pub palette_y_size_cdfs: [[u16; cdf_size!(PALETTE_SIZES)]; PALETTE_BSIZE_CTXS],
  pub palette_uv_size_cdfs:
    [[u16; cdf_size!(PALETTE_SIZES)]; PALETTE_BSIZE_CTXS],
  pub palette_y_mode_cdfs:
    [[[u16; cdf_size!(2)]; PALETTE_Y_MODE_CONTEXTS]; PALETTE_BSIZE_CTXS],
  pub palette_uv_mode_cdfs: [[u16; cdf_size!(2)]; PALETTE_UV_MODE_CONTEXTS],
  pub palette_y_color_2_cdf: [[u16; cdf_size!(2)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_3_cdf: [[u16; cdf_size!(3)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_4_cdf: [[u16; cdf_size!(4)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_5_cdf: [[u16; cdf_size!(5)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_6_cdf: [[u16; cdf_size!(6)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_7_cdf: [[u16; cdf_size!(7)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_y_color_8_cdf: [[u16; cdf_size!(8)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_2_cdf:
    [[u16; cdf_size!(2)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_3_cdf:
    [[u16; cdf_size!(3)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_4_cdf:
    [[u16; cdf_size!(4)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_5_cdf:
    [[u16; cdf_size!(5)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_6_cdf:
    [[u16; cdf_size!(6)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_7_cdf:
    [[u16; cdf_size!(7)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub palette_uv_color_8_cdf:
    [[u16; cdf_size!(8)]; PALETTE_COLOR_INDEX_CONTEXTS],
  pub intrabc_cdf: [u16; cdf_size!(2)],

  pub skip_cdfs: [[u16; cdf_size!(2)]; SKIP_CONTEXTS],
  pub skip_mode_cdfs: [[u16; cdf_size!(2)]; SKIP_MODE_CONTEXTS],
  pub intra_inter_cdfs: [[u16; cdf_size!(2)]; INTRA_INTER_CONTEXTS],

  pub comp_mode_cdf: [[u16; cdf_size!(2)]; COMP_INTER_CONTEXTS],
  pub comp_ref_type_cdf: [[u16; cdf_size!(2)]; COMP_REF_TYPE_CONTEXTS],
  pub uni_comp_ref_cdf:
    [[[u16; cdf_size!(2)]; UNIDIR_COMP_REFS - 1]; UNI_COMP_REF_CONTEXTS],
  pub single_ref_cdfs: [[[u16; cdf_size!(2)]; SINGLE_REFS - 1]; REF_CONTEXTS],
  pub comp_ref_cdf: [[[u16; cdf_size!(2)]; FWD_REFS - 1]; REF_CONTEXTS],
  pub comp_bwd_ref_cdf: [[[u16; cdf_size!(2)]; BWD_REFS - 1]; REF_CONTEXTS],

  pub newmv_cdf: [[u16; cdf_size!(2)]; NEWMV_MODE_CONTEXTS],
  pub zeromv_cdf: [[u16; cdf_size!(2)]; GLOBALMV_MODE_CONTEXTS],
  pub refmv_cdf: [[u16; cdf_size!(2)]; REFMV_MODE_CONTEXTS],
  pub drl_cdfs: [[u16; cdf_size!(2)]; DRL_MODE_CONTEXTS],
  pub compound_mode_cdf:
    [[u16; cdf_size!(INTER_COMPOUND_MODES)]; INTER_MODE_CONTEXTS],

  pub interintra_cdf: [[u16; cdf_size!(2)]; BLOCK_SIZE_GROUPS],
  pub interintra_mode_cdf: [[u16; cdf_size!(INTERINTRA_MODES)]; BLOCK_SIZE_GROUPS],
  pub wedge_interintra_cdf: [[u16; cdf_size!(2)]; BlockSize::BLOCK_SIZES_ALL],
  pub compound_type_cdf:
    [[u16; cdf_size!(MASKED_COMPOUND_TYPES)]; BlockSize::BLOCK_SIZES_ALL],
  pub wedge_idx_cdf: [[u16; cdf_size!(16)]; BlockSize::BLOCK_SIZES_ALL],
  pub motion_mode_cdf: [[u16; cdf_size!(MOTION_MODES)]; BlockSize::BLOCK_SIZES_ALL],
  pub obmc_cdf: [[u16; cdf_size!(2)]; BlockSize::BLOCK_SIZES_ALL],
  pub switchable_interp_cdf:
    [[u16; cdf_size!(SWITCHABLE_FILTERS)]; SWITCHABLE_FILTER_CONTEXTS],
  pub compound_idx_cdfs: [[u16; cdf_size!(2)]; COMP_INDEX_CONTEXTS],
  pub comp_group_idx_cdfs: [[u16; cdf_size!(2)]; COMP_GROUP_IDX_CONTEXTS],

  pub intra_tx_1_cdf:
    [[[u16; cdf_size!(7)]; INTRA_MODES]; TX_SIZE_SQR_CONTEXTS],
  pub intra_tx_2_cdf:
    [[[u16; cdf_size!(5)]; INTRA_MODES]; TX_SIZE_SQR_CONTEXTS],
  pub inter_tx_1_cdf: [[u16; cdf_size!(TX_TYPES)]; TX_SIZE_SQR_CONTEXTS],
  pub inter_tx_2_cdf: [[u16; cdf_size!(12)]; TX_SIZE_SQR_CONTEXTS],
  pub inter_tx_3_cdf: [[u16; cdf_size!(2)]; TX_SIZE_SQR_CONTEXTS],
  pub tx_size_8x8_cdf: [[u16; cdf_size!(MAX_TX_DEPTH)]; TX_SIZE_CONTEXTS],
  pub tx_size_cdf:
    [[[u16; cdf_size!(MAX_TX_DEPTH + 1)]; TX_SIZE_CONTEXTS]; BIG_TX_CATS],
  pub txfm_partition_cdf: [[u16; cdf_size!(2)]; TXFM_PARTITION_CONTEXTS],

  pub seg_tree_cdf: [u16; cdf_size!(MAX_SEGMENTS)],
  pub segment_pred_cdf: [[u16; cdf_size!(2)]; SEG_TEMPORAL_PRED_CTXS],
  pub spatial_segmentation_cdfs:
    [[u16; cdf_size!(MAX_SEGMENTS)]; SPATIAL_PREDICTION_PROBS],
  pub delta_q_cdf: [u16; cdf_size!(DELTA_Q_PROBS + 1)],
  pub deblock_delta_cdf: [u16; cdf_size!(DELTA_LF_PROBS + 1)],
  pub deblock_delta_multi_cdf:
    [[u16; cdf_size!(DELTA_LF_PROBS + 1)]; FRAME_LF_COUNT],
  pub lrf_switchable_cdf: [u16; cdf_size!(RESTORE_SWITCHABLE_TYPES)],
  pub lrf_sgrproj_cdf: [u16; cdf_size!(2)],
  pub lrf_wiener_cdf: [u16; cdf_size!(2)],

  pub nmv_context: NMVContext,
}

/// Position of one CDF inside a [`CDFContext`], in `u16` units.
#[derive(Clone, Copy, Debug)]
pub struct CDFOffset<const CDF_LEN: usize> {
  offset: usize,
  phantom: PhantomData<[u16; CDF_LEN]>,
}

impl CDFContext {
  /// The default tables, as used by frames without a primary reference.
  pub fn new() -> CDFContext {
    CDFContext {
      partition_w8_cdf: default_partition_w8_cdf,
      partition_w128_cdf: default_partition_w128_cdf,
      partition_cdf: default_partition_cdf,
      kf_y_cdf: default_kf_y_mode_cdf,
      y_mode_cdf: default_if_y_mode_cdf,
      uv_mode_cdf: default_uv_mode_cdf,
      uv_mode_cfl_cdf: default_uv_mode_cfl_cdf,
      angle_delta_cdf: default_angle_delta_cdf,
      cfl_sign_cdf: default_cfl_sign_cdf,
      cfl_alpha_cdf: default_cfl_alpha_cdf,
      filter_intra_cdfs: default_filter_intra_cdfs,
      filter_intra_mode_cdf: default_filter_intra_mode_cdf,
      palette_y_size_cdfs: default_palette_y_size_cdf,
      palette_uv_size_cdfs: default_palette_uv_size_cdf,
      palette_y_mode_cdfs: default_palette_y_mode_cdfs,
      palette_uv_mode_cdfs: default_palette_uv_mode_cdfs,
      palette_y_color_2_cdf: default_palette_y_color_2_cdf,
      palette_y_color_3_cdf: default_palette_y_color_3_cdf,
      palette_y_color_4_cdf: default_palette_y_color_4_cdf,
      palette_y_color_5_cdf: default_palette_y_color_5_cdf,
      palette_y_color_6_cdf: default_palette_y_color_6_cdf,
      palette_y_color_7_cdf: default_palette_y_color_7_cdf,
      palette_y_color_8_cdf: default_palette_y_color_8_cdf,
      palette_uv_color_2_cdf: default_palette_uv_color_2_cdf,
      palette_uv_color_3_cdf: default_palette_uv_color_3_cdf,
      palette_uv_color_4_cdf: default_palette_uv_color_4_cdf,
      palette_uv_color_5_cdf: default_palette_uv_color_5_cdf,
      palette_uv_color_6_cdf: default_palette_uv_color_6_cdf,
      palette_uv_color_7_cdf: default_palette_uv_color_7_cdf,
      palette_uv_color_8_cdf: default_palette_uv_color_8_cdf,
      intrabc_cdf: default_intrabc_cdf,
      skip_cdfs: default_skip_cdfs,
      skip_mode_cdfs: default_skip_mode_cdfs,
      intra_inter_cdfs: default_intra_inter_cdf,
      comp_mode_cdf: default_comp_mode_cdf,
      comp_ref_type_cdf: default_comp_ref_type_cdf,
      uni_comp_ref_cdf: default_uni_comp_ref_cdf,
      single_ref_cdfs: default_single_ref_cdf,
      comp_ref_cdf: default_comp_ref_cdf,
      comp_bwd_ref_cdf: default_comp_bwdref_cdf,
      newmv_cdf: default_newmv_cdf,
      zeromv_cdf: default_zeromv_cdf,
      refmv_cdf: default_refmv_cdf,
      drl_cdfs: default_drl_cdf,
      compound_mode_cdf: default_compound_mode_cdf,
      interintra_cdf: default_interintra_cdf,
      interintra_mode_cdf: default_interintra_mode_cdf,
      wedge_interintra_cdf: default_wedge_interintra_cdf,
      compound_type_cdf: default_compound_type_cdf,
      wedge_idx_cdf: default_wedge_idx_cdf,
      motion_mode_cdf: default_motion_mode_cdf,
      obmc_cdf: default_obmc_cdf,
      switchable_interp_cdf: default_switchable_interp_cdf,
      compound_idx_cdfs: default_compound_idx_cdfs,
      comp_group_idx_cdfs: default_comp_group_idx_cdfs,
      intra_tx_1_cdf: default_intra_tx_1_cdf,
      intra_tx_2_cdf: default_intra_tx_2_cdf,
      inter_tx_1_cdf: default_inter_tx_1_cdf,
      inter_tx_2_cdf: default_inter_tx_2_cdf,
      inter_tx_3_cdf: default_inter_tx_3_cdf,
      tx_size_8x8_cdf: default_tx_size_8x8_cdf,
      tx_size_cdf: default_tx_size_cdf,
      txfm_partition_cdf: default_txfm_partition_cdf,
      seg_tree_cdf: default_seg_tree_cdf,
      segment_pred_cdf: default_segment_pred_cdf,
      spatial_segmentation_cdfs: default_spatial_pred_seg_tree_cdf,
      delta_q_cdf: default_delta_q_cdf,
      deblock_delta_cdf: default_delta_lf_cdf,
      deblock_delta_multi_cdf: default_delta_lf_multi_cdf,
      lrf_switchable_cdf: default_switchable_restore_cdf,
      lrf_sgrproj_cdf: default_sgrproj_restore_cdf,
      lrf_wiener_cdf: default_wiener_restore_cdf,
      nmv_context: default_nmv_context,
    }
  }

  /// Zero the adaptation counter of every CDF, leaving the
  /// probabilities alone.
  pub fn reset_counts(&mut self) {
    macro_rules! reset_1d {
      ($field:expr) => {
        let r = &mut $field[$field.len() - 1];
        *r = 0;
      };
    }
    macro_rules! reset_2d {
      ($field:expr) => {
        for x in $field.iter_mut() {
          reset_1d!(x);
        }
      };
    }
    macro_rules! reset_3d {
      ($field:expr) => {
        for x in $field.iter_mut() {
          reset_2d!(x);
        }
      };
    }

    reset_2d!(self.partition_w8_cdf);
    reset_2d!(self.partition_w128_cdf);
    reset_2d!(self.partition_cdf);

    reset_3d!(self.kf_y_cdf);
    reset_2d!(self.y_mode_cdf);
    reset_2d!(self.uv_mode_cdf);
    reset_2d!(self.uv_mode_cfl_cdf);
    reset_2d!(self.angle_delta_cdf);
    reset_1d!(self.cfl_sign_cdf);
    reset_2d!(self.cfl_alpha_cdf);
    reset_2d!(self.filter_intra_cdfs);
    reset_1d!(self.filter_intra_mode_cdf);

    reset_2d!(self.palette_y_size_cdfs);
    reset_2d!(self.palette_uv_size_cdfs);
    reset_3d!(self.palette_y_mode_cdfs);
    reset_2d!(self.palette_uv_mode_cdfs);
    reset_2d!(self.palette_y_color_2_cdf);
    reset_2d!(self.palette_y_color_3_cdf);
    reset_2d!(self.palette_y_color_4_cdf);
    reset_2d!(self.palette_y_color_5_cdf);
    reset_2d!(self.palette_y_color_6_cdf);
    reset_2d!(self.palette_y_color_7_cdf);
    reset_2d!(self.palette_y_color_8_cdf);
    reset_2d!(self.palette_uv_color_2_cdf);
    reset_2d!(self.palette_uv_color_3_cdf);
    reset_2d!(self.palette_uv_color_4_cdf);
    reset_2d!(self.palette_uv_color_5_cdf);
    reset_2d!(self.palette_uv_color_6_cdf);
    reset_2d!(self.palette_uv_color_7_cdf);
    reset_2d!(self.palette_uv_color_8_cdf);
    reset_1d!(self.intrabc_cdf);

    reset_2d!(self.skip_cdfs);
    reset_2d!(self.skip_mode_cdfs);
    reset_2d!(self.intra_inter_cdfs);

    reset_2d!(self.comp_mode_cdf);
    reset_2d!(self.comp_ref_type_cdf);
    reset_3d!(self.uni_comp_ref_cdf);
    reset_3d!(self.single_ref_cdfs);
    reset_3d!(self.comp_ref_cdf);
    reset_3d!(self.comp_bwd_ref_cdf);

    reset_2d!(self.newmv_cdf);
    reset_2d!(self.zeromv_cdf);
    reset_2d!(self.refmv_cdf);
    reset_2d!(self.drl_cdfs);
    reset_2d!(self.compound_mode_cdf);

    reset_2d!(self.interintra_cdf);
    reset_2d!(self.interintra_mode_cdf);
    reset_2d!(self.wedge_interintra_cdf);
    reset_2d!(self.compound_type_cdf);
    reset_2d!(self.wedge_idx_cdf);
    reset_2d!(self.motion_mode_cdf);
    reset_2d!(self.obmc_cdf);
    reset_2d!(self.switchable_interp_cdf);
    reset_2d!(self.compound_idx_cdfs);
    reset_2d!(self.comp_group_idx_cdfs);

    reset_3d!(self.intra_tx_1_cdf);
    reset_3d!(self.intra_tx_2_cdf);
    reset_2d!(self.inter_tx_1_cdf);
    reset_2d!(self.inter_tx_2_cdf);
    reset_2d!(self.inter_tx_3_cdf);
    reset_2d!(self.tx_size_8x8_cdf);
    reset_3d!(self.tx_size_cdf);
    reset_2d!(self.txfm_partition_cdf);

    reset_1d!(self.seg_tree_cdf);
    reset_2d!(self.segment_pred_cdf);
    reset_2d!(self.spatial_segmentation_cdfs);
    reset_1d!(self.delta_q_cdf);
    reset_1d!(self.deblock_delta_cdf);
    reset_2d!(self.deblock_delta_multi_cdf);
    reset_1d!(self.lrf_switchable_cdf);
    reset_1d!(self.lrf_sgrproj_cdf);
    reset_1d!(self.lrf_wiener_cdf);

    reset_1d!(self.nmv_context.joints_cdf);
    for i in 0..2 {
      reset_1d!(self.nmv_context.comps[i].classes_cdf);
      reset_2d!(self.nmv_context.comps[i].class0_fp_cdf);
      reset_1d!(self.nmv_context.comps[i].fp_cdf);
      reset_1d!(self.nmv_context.comps[i].sign_cdf);
      reset_1d!(self.nmv_context.comps[i].class0_hp_cdf);
      reset_1d!(self.nmv_context.comps[i].hp_cdf);
      reset_1d!(self.nmv_context.comps[i].class0_cdf);
      reset_2d!(self.nmv_context.comps[i].bits_cdf);
    }
  }

  /// Address range of every table, for naming the CDF behind a pointer.
  pub fn build_map(&self) -> Vec<(&'static str, usize, usize)> {
    use std::mem::size_of_val;

    macro_rules! field {
      ($($name:ident).+) => {{
        let start = &self.$($name).+ as *const _ as usize;
        (
          stringify!($($name).+),
          start,
          start + size_of_val(&self.$($name).+),
        )
      }};
    }

    vec![
      field!(partition_w8_cdf),
      field!(partition_w128_cdf),
      field!(partition_cdf),
      field!(kf_y_cdf),
      field!(y_mode_cdf),
      field!(uv_mode_cdf),
      field!(uv_mode_cfl_cdf),
      field!(angle_delta_cdf),
      field!(cfl_sign_cdf),
      field!(cfl_alpha_cdf),
      field!(filter_intra_cdfs),
      field!(filter_intra_mode_cdf),
      field!(palette_y_size_cdfs),
      field!(palette_uv_size_cdfs),
      field!(palette_y_mode_cdfs),
      field!(palette_uv_mode_cdfs),
      field!(palette_y_color_2_cdf),
      field!(palette_y_color_3_cdf),
      field!(palette_y_color_4_cdf),
      field!(palette_y_color_5_cdf),
      field!(palette_y_color_6_cdf),
      field!(palette_y_color_7_cdf),
      field!(palette_y_color_8_cdf),
      field!(palette_uv_color_2_cdf),
      field!(palette_uv_color_3_cdf),
      field!(palette_uv_color_4_cdf),
      field!(palette_uv_color_5_cdf),
      field!(palette_uv_color_6_cdf),
      field!(palette_uv_color_7_cdf),
      field!(palette_uv_color_8_cdf),
      field!(intrabc_cdf),
      field!(skip_cdfs),
      field!(skip_mode_cdfs),
      field!(intra_inter_cdfs),
      field!(comp_mode_cdf),
      field!(comp_ref_type_cdf),
      field!(uni_comp_ref_cdf),
      field!(single_ref_cdfs),
      field!(comp_ref_cdf),
      field!(comp_bwd_ref_cdf),
      field!(newmv_cdf),
      field!(zeromv_cdf),
      field!(refmv_cdf),
      field!(drl_cdfs),
      field!(compound_mode_cdf),
      field!(interintra_cdf),
      field!(interintra_mode_cdf),
      field!(wedge_interintra_cdf),
      field!(compound_type_cdf),
      field!(wedge_idx_cdf),
      field!(motion_mode_cdf),
      field!(obmc_cdf),
      field!(switchable_interp_cdf),
      field!(compound_idx_cdfs),
      field!(comp_group_idx_cdfs),
      field!(intra_tx_1_cdf),
      field!(intra_tx_2_cdf),
      field!(inter_tx_1_cdf),
      field!(inter_tx_2_cdf),
      field!(inter_tx_3_cdf),
      field!(tx_size_8x8_cdf),
      field!(tx_size_cdf),
      field!(txfm_partition_cdf),
      field!(seg_tree_cdf),
      field!(segment_pred_cdf),
      field!(spatial_segmentation_cdfs),
      field!(delta_q_cdf),
      field!(deblock_delta_cdf),
      field!(deblock_delta_multi_cdf),
      field!(lrf_switchable_cdf),
      field!(lrf_sgrproj_cdf),
      field!(lrf_wiener_cdf),
      field!(nmv_context.joints_cdf),
      field!(nmv_context.comps),
    ]
  }

  pub fn offset<const CDF_LEN: usize>(
    &self, cdf: *const [u16; CDF_LEN],
  ) -> CDFOffset<CDF_LEN> {
    let bytes = cdf as usize - self as *const _ as usize;
    debug_assert!(bytes + CDF_LEN * 2 <= std::mem::size_of::<Self>());
    CDFOffset { offset: bytes / 2, phantom: PhantomData }
  }

  /// The whole context as one run of `u16`s.
  #[inline(always)]
  pub fn as_slice(&self) -> &[u16] {
    bytemuck::cast_slice(slice::from_ref(self))
  }

  #[inline(always)]
  fn as_mut_slice(&mut self) -> &mut [u16] {
    bytemuck::cast_slice_mut(slice::from_mut(self))
  }

  #[inline(always)]
  fn cdf_mut<const CDF_LEN: usize>(
    &mut self, cdf: CDFOffset<CDF_LEN>,
  ) -> &mut [u16; CDF_LEN] {
    let flat = &mut self.as_mut_slice()[cdf.offset..cdf.offset + CDF_LEN];
    bytemuck::from_bytes_mut(bytemuck::cast_slice_mut(flat))
  }
}

impl Default for CDFContext {
  fn default() -> Self {
    Self::new()
  }
}

impl PartialEq for CDFContext {
  fn eq(&self, other: &Self) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl Eq for CDFContext {}

impl fmt::Debug for CDFContext {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "CDFContext contains too many numbers to print :-(")
  }
}

macro_rules! symbol_with_update {
  ($self:ident, $w:ident, $s:expr, $cdf:expr) => {
    symbol_with_update!($self, $cdf);
    if $self.adapt {
      let cdf = $self.fc.offset($cdf);
      $w.symbol_with_update($s, cdf, &mut $self.fc_log, &mut $self.fc);
    } else {
      $w.symbol($s, $cdf);
    }
  };
  ($self:ident, $cdf:expr) => {
    #[cfg(feature = "desync_finder")]
    {
      let cdf: &[_] = $cdf;
      if let Some(map) = $self.fc_map.as_ref() {
        map.lookup(cdf.as_ptr() as usize);
      }
    }
  };
}

/// Decode one symbol through a CDF of `self.fc`, adapting it unless
/// adaptation is off for the frame.
macro_rules! read_symbol {
  ($self:ident, $r:ident, $cdf:expr) => {{
    #[cfg(feature = "desync_finder")]
    {
      if let Some(map) = $self.fc_map.as_ref() {
        map.lookup($cdf.as_ptr() as usize);
      }
    }
    if $self.adapt {
      $r.symbol_with_update(&mut $cdf)?
    } else {
      $r.symbol(&$cdf)?
    }
  }};
}

struct CDFContextLogPartition<const WIDTH: usize> {
  pub data: Vec<(u16, ArrayVec<u16, WIDTH>)>,
}

impl<const WIDTH: usize> CDFContextLogPartition<WIDTH> {
  fn new(capacity: usize) -> Self {
    Self { data: Vec::with_capacity(capacity) }
  }
  #[inline(always)]
  fn push<const CDF_LEN: usize>(
    &mut self, fc: &CDFContext, cdf: CDFOffset<CDF_LEN>,
  ) {
    debug_assert!(CDF_LEN <= WIDTH);
    debug_assert!(cdf.offset <= u16::MAX.into());
    // Only the CDF itself is saved, so entries never overlap.
    let saved = &fc.as_slice()[cdf.offset..cdf.offset + CDF_LEN];
    if let Ok(saved) = ArrayVec::try_from(saved) {
      self.data.push((cdf.offset as u16, saved));
    }
  }
  #[inline(always)]
  fn rollback(&mut self, fc: &mut CDFContext, checkpoint: usize) {
    let flat = fc.as_mut_slice();
    while self.data.len() > checkpoint {
      if let Some((offset, saved)) = self.data.pop() {
        let offset = offset as usize;
        flat[offset..offset + saved.len()].copy_from_slice(&saved);
      }
    }
  }
}

const CDF_LEN_SMALL: usize = cdf_size!(4);

/// Undo log for speculative coding.
///
/// While armed by [`checkpoint`](Self::checkpoint) every adapted CDF is
/// saved before it changes, so that [`rollback`](Self::rollback) can put
/// the context back. [`commit`](Self::commit) forgets the saved values and
/// stops recording.
pub struct CDFContextLog {
  small: CDFContextLogPartition<CDF_LEN_SMALL>,
  large: CDFContextLogPartition<CDF_LEN_MAX>,
  armed: bool,
}

impl Default for CDFContextLog {
  fn default() -> Self {
    Self {
      small: CDFContextLogPartition::new(1 << 12),
      large: CDFContextLogPartition::new(1 << 7),
      armed: false,
    }
  }
}

impl CDFContextLog {
  pub fn checkpoint(&mut self) -> CDFContextCheckpoint {
    self.armed = true;
    CDFContextCheckpoint {
      small: self.small.data.len(),
      large: self.large.data.len(),
    }
  }
  /// Record `cdf` if armed and hand it out for coding.
  #[inline(always)]
  pub fn push<'a, const CDF_LEN: usize>(
    &mut self, fc: &'a mut CDFContext, cdf: CDFOffset<CDF_LEN>,
  ) -> &'a mut [u16; CDF_LEN] {
    if self.armed {
      if CDF_LEN <= CDF_LEN_SMALL {
        self.small.push(fc, cdf);
      } else {
        self.large.push(fc, cdf);
      }
    }
    fc.cdf_mut(cdf)
  }
  #[inline(always)]
  pub fn rollback(
    &mut self, fc: &mut CDFContext, checkpoint: &CDFContextCheckpoint,
  ) {
    self.small.rollback(fc, checkpoint.small);
    self.large.rollback(fc, checkpoint.large);
  }
  pub fn commit(&mut self) {
    self.small.data.clear();
    self.large.data.clear();
    self.armed = false;
  }
  pub fn is_armed(&self) -> bool {
    self.armed
  }
}

/// Writer-side view of a tile's CDFs.
pub struct ContextWriter {
  pub fc: Box<CDFContext>,
  pub fc_log: CDFContextLog,
  /// `false` when the frame disables CDF adaptation.
  pub adapt: bool,
  #[cfg(feature = "desync_finder")]
  pub fc_map: Option<FieldMap>, // For debugging purposes
}

impl ContextWriter {
  #[allow(clippy::let_and_return)]
  pub fn new(fc: Box<CDFContext>, adapt: bool) -> Self {
    #[allow(unused_mut)]
    let mut cw = ContextWriter {
      fc,
      fc_log: CDFContextLog::default(),
      adapt,
      #[cfg(feature = "desync_finder")]
      fc_map: Default::default(),
    };
    #[cfg(feature = "desync_finder")]
    {
      if std::env::var_os("AV1ENTROPY_DEBUG").is_some() {
        cw.fc_map = Some(FieldMap { map: cw.fc.build_map() });
      }
    }

    cw
  }

  pub fn checkpoint(&mut self) -> CDFContextCheckpoint {
    self.fc_log.checkpoint()
  }

  pub fn rollback(&mut self, checkpoint: &CDFContextCheckpoint) {
    self.fc_log.rollback(&mut self.fc, checkpoint);
  }

  pub fn commit(&mut self) {
    self.fc_log.commit();
  }

  pub fn into_inner(self) -> Box<CDFContext> {
    self.fc
  }
}

/// Reader-side view of a tile's CDFs.
pub struct ContextReader {
  pub fc: Box<CDFContext>,
  /// `false` when the frame disables CDF adaptation.
  pub adapt: bool,
  #[cfg(feature = "desync_finder")]
  pub fc_map: Option<FieldMap>, // For debugging purposes
}

impl ContextReader {
  #[allow(clippy::let_and_return)]
  pub fn new(fc: Box<CDFContext>, adapt: bool) -> Self {
    #[allow(unused_mut)]
    let mut cr = ContextReader {
      fc,
      adapt,
      #[cfg(feature = "desync_finder")]
      fc_map: Default::default(),
    };
    #[cfg(feature = "desync_finder")]
    {
      if std::env::var_os("AV1ENTROPY_DEBUG").is_some() {
        cr.fc_map = Some(FieldMap { map: cr.fc.build_map() });
      }
    }

    cr
  }

  pub fn into_inner(self) -> Box<CDFContext> {
    self.fc
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::ec::{WriterCounter, WriterEncoder};

  #[test]
  fn context_has_no_padding() {
    let fc = CDFContext::new();
    let map = fc.build_map();
    let covered: usize = map.iter().map(|&(_, start, end)| end - start).sum();
    assert_eq!(covered, std::mem::size_of::<CDFContext>());
    assert!(fc.as_slice().len() <= u16::MAX as usize);
  }

  #[test]
  fn defaults_are_consistent() {
    let fc = CDFContext::new();
    let flat = fc.as_slice();
    // Every table ends with a terminal zero and a zero counter.
    for &(name, start, end) in &fc.build_map() {
      let base = &fc as *const _ as usize;
      let field = &flat[(start - base) / 2..(end - base) / 2];
      assert_eq!(field[field.len() - 1], 0, "{name}");
      assert_eq!(field[field.len() - 2], 0, "{name}");
    }
  }

  #[test]
  fn reset_counts_keeps_probabilities() {
    let mut fc = CDFContext::new();
    let mut w = WriterCounter::new();
    let mut cw = ContextWriter::new(Box::new(fc), true);
    for s in [0, 1, 1, 0, 1] {
      symbol_with_update!(cw, w, s, &cw.fc.skip_cdfs[1]);
    }
    assert_eq!(cw.fc.skip_cdfs[1][2], 5);
    fc = *cw.into_inner();
    let probs = fc.skip_cdfs[1][0];
    fc.reset_counts();
    assert_eq!(fc.skip_cdfs[1], [probs, 0, 0]);
  }

  #[test]
  fn rollback_restores_context() {
    let mut w = WriterEncoder::new();
    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), true);
    let before = *cw.fc;

    let checkpoint = cw.checkpoint();
    let wcp = w.checkpoint();
    for s in 0..16 {
      symbol_with_update!(cw, w, s % 2, &cw.fc.txfm_partition_cdf[3]);
      symbol_with_update!(cw, w, s, &cw.fc.inter_tx_1_cdf[2]);
      symbol_with_update!(cw, w, s % 3, &cw.fc.lrf_switchable_cdf);
      symbol_with_update!(cw, w, s % 4, &cw.fc.nmv_context.joints_cdf);
    }
    assert!(*cw.fc != before);
    cw.rollback(&checkpoint);
    w.rollback(&wcp);
    assert!(*cw.fc == before);

    cw.commit();
    symbol_with_update!(cw, w, 1, &cw.fc.skip_cdfs[0]);
    assert!(*cw.fc != before);
  }

  #[test]
  fn disabled_adaptation_leaves_cdfs() {
    let mut w = WriterEncoder::new();
    let mut cw = ContextWriter::new(Box::new(CDFContext::new()), false);
    for s in 0..8 {
      symbol_with_update!(cw, w, s, &cw.fc.seg_tree_cdf);
    }
    assert!(*cw.fc == CDFContext::new());
  }
}
