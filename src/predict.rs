// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_camel_case_types)]
#![allow(non_upper_case_globals)]

use num_derive::FromPrimitive;

pub const INTRA_MODES: usize = 13;
pub const UV_INTRA_MODES: usize = 14;

// Intra modes come first so that `mode as usize` indexes the intra tables.
// UV_CFL_PRED only appears as a chroma mode.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum PredictionMode {
  DC_PRED,     // Average of above and left pixels
  V_PRED,      // Vertical
  H_PRED,      // Horizontal
  D45_PRED,    // Directional 45  degree
  D135_PRED,   // Directional 135 degree
  D113_PRED,   // Directional 113 degree
  D157_PRED,   // Directional 157 degree
  D203_PRED,   // Directional 203 degree
  D67_PRED,    // Directional 67  degree
  SMOOTH_PRED, // Combination of horizontal and vertical interpolation
  SMOOTH_V_PRED,
  SMOOTH_H_PRED,
  PAETH_PRED,
  UV_CFL_PRED,
  NEARESTMV,
  NEARMV,
  GLOBALMV,
  NEWMV,
  // Compound ref compound modes
  NEAREST_NEARESTMV,
  NEAR_NEARMV,
  NEAREST_NEWMV,
  NEW_NEARESTMV,
  NEAR_NEWMV,
  NEW_NEARMV,
  GLOBAL_GLOBALMV,
  NEW_NEWMV,
}

impl Default for PredictionMode {
  fn default() -> Self {
    PredictionMode::DC_PRED
  }
}

impl PredictionMode {
  #[inline]
  pub const fn is_intra(self) -> bool {
    (self as usize) <= PredictionMode::UV_CFL_PRED as usize
  }

  #[inline]
  pub const fn is_cfl(self) -> bool {
    matches!(self, PredictionMode::UV_CFL_PRED)
  }

  #[inline]
  pub const fn is_compound(self) -> bool {
    (self as usize) >= PredictionMode::NEAREST_NEARESTMV as usize
  }

  #[inline]
  pub const fn is_directional(self) -> bool {
    (self as usize) >= PredictionMode::V_PRED as usize
      && (self as usize) <= PredictionMode::D67_PRED as usize
  }

  /// Whether a motion vector difference follows the mode.
  #[inline]
  pub const fn has_newmv(self) -> bool {
    matches!(
      self,
      PredictionMode::NEWMV
        | PredictionMode::NEW_NEWMV
        | PredictionMode::NEAREST_NEWMV
        | PredictionMode::NEW_NEARESTMV
        | PredictionMode::NEAR_NEWMV
        | PredictionMode::NEW_NEARMV
    )
  }

  /// Whether the mode selects a candidate past the nearest one, so that a
  /// dynamic reference list index is coded.
  #[inline]
  pub const fn has_nearmv(self) -> bool {
    matches!(
      self,
      PredictionMode::NEARMV
        | PredictionMode::NEAR_NEARMV
        | PredictionMode::NEAR_NEWMV
        | PredictionMode::NEW_NEARMV
    )
  }

  /// Whether the mode allows an angle delta, given the block is large
  /// enough.
  #[inline]
  pub fn angle_delta_allowed(self, bsize: crate::partition::BlockSize) -> bool {
    bsize >= crate::partition::BlockSize::BLOCK_8X8 && self.is_directional()
  }
}

/// The luma mode a chroma mode predicts from, for tables keyed on luma
/// modes; CfL maps to DC.
pub static uv_to_y_mode: [PredictionMode; UV_INTRA_MODES] = {
  use PredictionMode::*;
  [
    DC_PRED,
    V_PRED,
    H_PRED,
    D45_PRED,
    D135_PRED,
    D113_PRED,
    D157_PRED,
    D203_PRED,
    D67_PRED,
    SMOOTH_PRED,
    SMOOTH_V_PRED,
    SMOOTH_H_PRED,
    PAETH_PRED,
    DC_PRED,
  ]
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum FilterIntraMode {
  FILTER_DC_PRED,
  FILTER_V_PRED,
  FILTER_H_PRED,
  FILTER_D157_PRED,
  FILTER_PAETH_PRED,
}

/// Luma mode whose transform set a filter intra mode borrows.
pub static fimode_to_intradir: [PredictionMode; 5] = [
  PredictionMode::DC_PRED,
  PredictionMode::V_PRED,
  PredictionMode::H_PRED,
  PredictionMode::D157_PRED,
  PredictionMode::DC_PRED,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum FilterMode {
  REGULAR = 0,
  SMOOTH = 1,
  SHARP = 2,
  BILINEAR = 3,
  SWITCHABLE = 4,
}

impl Default for FilterMode {
  fn default() -> Self {
    FilterMode::REGULAR
  }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum MotionMode {
  SIMPLE_TRANSLATION,
  OBMC_CAUSAL,
  WARPED_CAUSAL,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum InterIntraMode {
  II_DC_PRED,
  II_V_PRED,
  II_H_PRED,
  II_SMOOTH_PRED,
}

/// Masked compound types; the averaging types are signalled through the
/// compound group and index flags instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, FromPrimitive)]
pub enum CompoundType {
  COMPOUND_WEDGE,
  COMPOUND_DIFFWTD,
}

#[cfg(test)]
mod test {
  use super::PredictionMode::*;
  use super::*;
  use crate::partition::BlockSize;

  #[test]
  fn mode_classes() {
    assert!(PAETH_PRED.is_intra());
    assert!(UV_CFL_PRED.is_intra());
    assert!(!NEARESTMV.is_intra());
    assert!(D67_PRED.is_directional());
    assert!(!SMOOTH_PRED.is_directional());
    assert!(NEW_NEWMV.is_compound());
    assert!(!NEWMV.is_compound());
    assert!(NEAR_NEWMV.has_newmv() && NEAR_NEWMV.has_nearmv());
    assert!(!V_PRED.angle_delta_allowed(BlockSize::BLOCK_4X4));
    assert!(V_PRED.angle_delta_allowed(BlockSize::BLOCK_8X8));
    assert_eq!(PAETH_PRED as usize + 1, INTRA_MODES);
    assert_eq!(UV_CFL_PRED as usize + 1, UV_INTRA_MODES);
  }
}
