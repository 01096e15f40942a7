// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Per-tile CDF state and the syntax elements coded through it.
//!
//! Context selection is kept apart from coding: every `*_context` /
//! `*_ctx` function is a pure function of the neighbouring [`Block`]s and
//! the current block's geometry, returning an index into a table of
//! [`CDFContext`]. The `write_*` methods on [`ContextWriter`] and the
//! `read_*` methods on [`ContextReader`] pick the same CDF and code the
//! symbol through it.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]

use crate::ec::{Reader, Writer};
use crate::entropymode::*;
use crate::error::{EntropyError, Result};
use crate::partition::*;
use crate::predict::*;
use crate::transform::*;
use crate::util::*;
use std::cmp;

pub const MI_SIZE_LOG2: usize = 2;
pub const MI_SIZE: usize = 1 << MI_SIZE_LOG2;

pub const KF_MODE_CONTEXTS: usize = 5;
pub const BLOCK_SIZE_GROUPS: usize = 4;
pub const MAX_ANGLE_DELTA: usize = 3;
pub const DIRECTIONAL_MODES: usize = 8;
pub const FILTER_INTRA_MODES: usize = 5;

pub const PALETTE_SIZES: usize = 7;
pub const PALETTE_COLORS: usize = 8;
pub const PALETTE_BSIZE_CTXS: usize = 7;
pub const PALETTE_Y_MODE_CONTEXTS: usize = 3;
pub const PALETTE_UV_MODE_CONTEXTS: usize = 2;
pub const PALETTE_COLOR_INDEX_CONTEXTS: usize = 5;
pub const PALETTE_MAX_SIZE: usize = 8;

pub const SKIP_CONTEXTS: usize = 3;
pub const SKIP_MODE_CONTEXTS: usize = 3;
pub const INTRA_INTER_CONTEXTS: usize = 4;
pub const COMP_INTER_CONTEXTS: usize = 5;
pub const COMP_REF_TYPE_CONTEXTS: usize = 5;
pub const UNI_COMP_REF_CONTEXTS: usize = 3;

pub const NEWMV_MODE_CONTEXTS: usize = 6;
pub const GLOBALMV_MODE_CONTEXTS: usize = 2;
pub const REFMV_MODE_CONTEXTS: usize = 6;
pub const DRL_MODE_CONTEXTS: usize = 3;
pub const INTER_MODE_CONTEXTS: usize = 8;
pub const INTER_COMPOUND_MODES: usize = 8;

pub const GLOBALMV_OFFSET: usize = 3;
pub const REFMV_OFFSET: usize = 4;
pub const NEWMV_CTX_MASK: usize = (1 << GLOBALMV_OFFSET) - 1;
pub const GLOBALMV_CTX_MASK: usize = (1 << (REFMV_OFFSET - GLOBALMV_OFFSET)) - 1;
pub const REFMV_CTX_MASK: usize = (1 << (8 - REFMV_OFFSET)) - 1;

pub const INTERINTRA_MODES: usize = 4;
pub const MASKED_COMPOUND_TYPES: usize = 2;
pub const MOTION_MODES: usize = 3;
pub const SWITCHABLE_FILTERS: usize = 3;
pub const SWITCHABLE_FILTER_CONTEXTS: usize = (SWITCHABLE_FILTERS + 1) * 4;
pub const COMP_INDEX_CONTEXTS: usize = 6;
pub const COMP_GROUP_IDX_CONTEXTS: usize = 6;

pub const MAX_SEGMENTS: usize = 8;
pub const SEG_TEMPORAL_PRED_CTXS: usize = 3;
pub const SPATIAL_PREDICTION_PROBS: usize = 3;

pub const FRAME_LF_COUNT: usize = 4;
const DELTA_LF_SMALL: u32 = 3;
pub const DELTA_LF_PROBS: usize = DELTA_LF_SMALL as usize;
const DELTA_Q_SMALL: u32 = 3;
pub const DELTA_Q_PROBS: usize = DELTA_Q_SMALL as usize;

pub const RESTORE_SWITCHABLE_TYPES: usize = 3;

static size_group_lookup: [u8; BlockSize::BLOCK_SIZES_ALL] =
  [0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 0, 0, 1, 1, 2, 2];

/// Block size group used by the inter-frame y mode and inter-intra tables.
#[inline]
pub fn size_group(bsize: BlockSize) -> usize {
  size_group_lookup[bsize as usize] as usize
}

/// `Ok` when `value` is a symbol of an `arity`-ary alphabet.
#[inline]
pub(crate) fn check_symbol(value: u32, arity: usize) -> Result<()> {
  if value < arity as u32 {
    Ok(())
  } else {
    Err(EntropyError::InvalidSymbol { value, arity: arity as u32 })
  }
}

#[macro_use]
mod cdf_context;
pub use cdf_context::*;

mod partition_unit;
pub use partition_unit::*;

mod transform_unit;
pub use transform_unit::*;

mod block_unit;
pub use block_unit::*;

mod frame_header;
pub use frame_header::*;

#[derive(Debug, Default)]
pub struct FieldMap {
  map: Vec<(&'static str, usize, usize)>,
}

impl FieldMap {
  /// Print the field the address belong to
  fn lookup(&self, addr: usize) {
    for (name, start, end) in &self.map {
      if addr >= *start && addr < *end {
        println!(" CDF {name}");
        println!();
        return;
      }
    }

    println!("  CDF address not found: {addr}");
  }
}

/* Symbols for coding magnitude class of nonzero components */
pub const MV_CLASSES: usize = 11;

// MV Class Types
const MV_CLASS_0: usize = 0; /* (0, 2]     integer pel */
const MV_CLASS_10: usize = 10; /* (1024,2048] integer pel */

pub const CLASS0_BITS: usize = 1; /* bits at integer precision for class 0 */
pub const CLASS0_SIZE: usize = 1 << CLASS0_BITS;
pub const MV_OFFSET_BITS: usize = MV_CLASSES + CLASS0_BITS - 2;
pub const MV_FP_SIZE: usize = 4;

const MV_IN_USE_BITS: usize = 14;
pub const MV_UPP: i32 = 1 << MV_IN_USE_BITS;
pub const MV_LOW: i32 = -(1 << MV_IN_USE_BITS);

#[inline(always)]
pub const fn av1_get_mv_joint(mv: MotionVector) -> MvJointType {
  match (mv.row, mv.col) {
    (0, 0) => MvJointType::MV_JOINT_ZERO,
    (0, _) => MvJointType::MV_JOINT_HNZVZ,
    (_, 0) => MvJointType::MV_JOINT_HZVNZ,
    (_, _) => MvJointType::MV_JOINT_HNZVNZ,
  }
}

#[inline(always)]
pub fn mv_joint_vertical(joint_type: MvJointType) -> bool {
  joint_type == MvJointType::MV_JOINT_HZVNZ
    || joint_type == MvJointType::MV_JOINT_HNZVNZ
}

#[inline(always)]
pub fn mv_joint_horizontal(joint_type: MvJointType) -> bool {
  joint_type == MvJointType::MV_JOINT_HNZVZ
    || joint_type == MvJointType::MV_JOINT_HNZVNZ
}

#[inline(always)]
pub const fn mv_class_base(mv_class: usize) -> u32 {
  if mv_class != MV_CLASS_0 {
    (CLASS0_SIZE << (mv_class + 2)) as u32
  } else {
    0
  }
}

#[inline(always)]
// If n != 0, returns the floor of log base 2 of n. If n == 0, returns 0.
pub fn log_in_base_2(n: u32) -> u8 {
  31 - cmp::min(31, n.leading_zeros() as u8)
}

/// Returns `(mv_class, offset)`
#[inline(always)]
pub fn get_mv_class(z: u32) -> (usize, u32) {
  let c = if z >= CLASS0_SIZE as u32 * 4096 {
    MV_CLASS_10
  } else {
    log_in_base_2(z >> 3) as usize
  };

  let offset = z - mv_class_base(c);
  (c, offset)
}

impl ContextWriter {
  /// # Panics
  ///
  /// - If the `comp` is 0
  /// - If the `comp` is outside the bounds of `MV_LOW` and `MV_UPP`
  pub fn encode_mv_component<W: Writer>(
    &mut self, w: &mut W, comp: i32, axis: usize, precision: MvSubpelPrecision,
  ) {
    assert!(comp != 0);
    assert!((MV_LOW..=MV_UPP).contains(&comp));
    let sign: u32 = u32::from(comp < 0);
    let mag: u32 = if sign == 1 { -comp as u32 } else { comp as u32 };
    let (mv_class, offset) = get_mv_class(mag - 1);
    let d = offset >> 3; // int mv data
    let fr = (offset >> 1) & 3; // fractional mv data
    let hp = offset & 1; // high precision mv data

    // Sign
    {
      let mvcomp = &self.fc.nmv_context.comps[axis];
      let cdf = &mvcomp.sign_cdf;
      symbol_with_update!(self, w, sign, cdf);
    }

    // Class
    {
      let mvcomp = &self.fc.nmv_context.comps[axis];
      let cdf = &mvcomp.classes_cdf;
      symbol_with_update!(self, w, mv_class as u32, cdf);
    }

    // Integer bits
    if mv_class == MV_CLASS_0 {
      let mvcomp = &self.fc.nmv_context.comps[axis];
      let cdf = &mvcomp.class0_cdf;
      symbol_with_update!(self, w, d, cdf);
    } else {
      let n = mv_class + CLASS0_BITS - 1; // number of bits
      for i in 0..n {
        let mvcomp = &self.fc.nmv_context.comps[axis];
        let cdf = &mvcomp.bits_cdf[i];
        symbol_with_update!(self, w, (d >> i) & 1, cdf);
      }
    }

    // Fractional bits
    if precision > MvSubpelPrecision::MV_SUBPEL_NONE {
      let mvcomp = &self.fc.nmv_context.comps[axis];
      let cdf = if mv_class == MV_CLASS_0 {
        &mvcomp.class0_fp_cdf[d as usize]
      } else {
        &mvcomp.fp_cdf
      };
      symbol_with_update!(self, w, fr, cdf);
    }

    // High precision bit
    if precision > MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION {
      let mvcomp = &self.fc.nmv_context.comps[axis];
      let cdf = if mv_class == MV_CLASS_0 {
        &mvcomp.class0_hp_cdf
      } else {
        &mvcomp.hp_cdf
      };
      symbol_with_update!(self, w, hp, cdf);
    }
  }
}

impl ContextReader {
  /// Inverse of [`ContextWriter::encode_mv_component`]. Fractional and
  /// high precision bits that the precision leaves out decode as set.
  pub fn decode_mv_component(
    &mut self, r: &mut Reader, axis: usize, precision: MvSubpelPrecision,
  ) -> Result<i32> {
    let sign = read_symbol!(self, r, self.fc.nmv_context.comps[axis].sign_cdf);
    let mv_class = read_symbol!(
      self,
      r,
      self.fc.nmv_context.comps[axis].classes_cdf
    ) as usize;

    let d = if mv_class == MV_CLASS_0 {
      read_symbol!(self, r, self.fc.nmv_context.comps[axis].class0_cdf)
    } else {
      let mut d = 0;
      for i in 0..mv_class + CLASS0_BITS - 1 {
        d |= read_symbol!(
          self,
          r,
          self.fc.nmv_context.comps[axis].bits_cdf[i]
        ) << i;
      }
      d
    };

    let fr = if precision > MvSubpelPrecision::MV_SUBPEL_NONE {
      if mv_class == MV_CLASS_0 {
        read_symbol!(
          self,
          r,
          self.fc.nmv_context.comps[axis].class0_fp_cdf[d as usize]
        )
      } else {
        read_symbol!(self, r, self.fc.nmv_context.comps[axis].fp_cdf)
      }
    } else {
      3
    };

    let hp = if precision > MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION {
      if mv_class == MV_CLASS_0 {
        read_symbol!(self, r, self.fc.nmv_context.comps[axis].class0_hp_cdf)
      } else {
        read_symbol!(self, r, self.fc.nmv_context.comps[axis].hp_cdf)
      }
    } else {
      1
    };

    let mag = mv_class_base(mv_class) + ((d << 3) | (fr << 1) | hp) + 1;
    let comp = if sign == 1 { -(mag as i32) } else { mag as i32 };
    if !(MV_LOW..=MV_UPP).contains(&comp) {
      return Err(EntropyError::CorruptSyntax);
    }
    Ok(comp)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn mv_class_boundaries() {
    assert_eq!(get_mv_class(0), (0, 0));
    assert_eq!(get_mv_class(15), (0, 15));
    assert_eq!(get_mv_class(16), (1, 0));
    assert_eq!(get_mv_class(31), (1, 15));
    assert_eq!(get_mv_class(32), (2, 0));
    assert_eq!(get_mv_class(8191), (9, 8191 - mv_class_base(9)));
    assert_eq!(get_mv_class(8192), (10, 0));
  }

  #[test]
  fn mv_joints() {
    let mv = |row, col| MotionVector { row, col };
    assert_eq!(av1_get_mv_joint(mv(0, 0)), MvJointType::MV_JOINT_ZERO);
    assert_eq!(av1_get_mv_joint(mv(0, 3)), MvJointType::MV_JOINT_HNZVZ);
    assert_eq!(av1_get_mv_joint(mv(-2, 0)), MvJointType::MV_JOINT_HZVNZ);
    assert!(mv_joint_vertical(av1_get_mv_joint(mv(1, 1))));
    assert!(mv_joint_horizontal(av1_get_mv_joint(mv(1, 1))));
    assert!(!mv_joint_horizontal(av1_get_mv_joint(mv(1, 0))));
  }
}
