// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::ec::OD_BITRES;

// Frame-level restoration types, as signalled in the frame header.
pub const RESTORE_NONE: u8 = 0;
pub const RESTORE_SWITCHABLE: u8 = 1;
pub const RESTORE_WIENER: u8 = 2;
pub const RESTORE_SGRPROJ: u8 = 3;

pub const WIENER_TAPS_MIN: [i8; 3] = [-5, -23, -17];
pub const WIENER_TAPS_MID: [i8; 3] = [3, -7, 15];
pub const WIENER_TAPS_MAX: [i8; 3] = [10, 8, 46];
#[allow(unused)]
pub const WIENER_TAPS_K: [i8; 3] = [1, 2, 3];

pub const SGRPROJ_XQD_MIN: [i8; 2] = [-96, -32];
pub const SGRPROJ_XQD_MID: [i8; 2] = [-32, 31];
pub const SGRPROJ_XQD_MAX: [i8; 2] = [31, 95];
pub const SGRPROJ_PRJ_SUBEXP_K: u8 = 4;
pub const SGRPROJ_PRJ_BITS: u8 = 7;
pub const SGRPROJ_PARAMS_BITS: u8 = 4;
#[rustfmt::skip]
pub const SGRPROJ_PARAMS_S: [[u32; 2]; 1 << SGRPROJ_PARAMS_BITS] = [
  [140, 3236], [112, 2158], [ 93, 1618], [ 80, 1438],
  [ 70, 1295], [ 58, 1177], [ 47, 1079], [ 37,  996],
  [ 30,  925], [ 25,  863], [  0, 2589], [  0, 1618],
  [  0, 1177], [  0,  925], [ 56,    0], [ 22,    0]
];

/// The per-unit loop restoration choice.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum RestorationFilter {
  #[default]
  None,
  Wiener {
    coeffs: [[i8; 3]; 2],
  },
  Sgrproj {
    set: u8,
    xqd: [i8; 2],
  },
}

/// Coefficients of the previously coded restoration unit of a plane, which
/// the next unit's coefficients are coded against. Reset to the midpoints
/// at the start of every tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RestorationRefs {
  pub wiener_ref: [[i8; 3]; 2],
  pub sgrproj_ref: [i8; 2],
}

impl Default for RestorationRefs {
  fn default() -> Self {
    RestorationRefs {
      wiener_ref: [WIENER_TAPS_MID; 2],
      sgrproj_ref: SGRPROJ_XQD_MID,
    }
  }
}

/// The second projection coefficient implied when the set's second radius
/// is zero.
fn sgrproj_implied_xqd1(xqd0: i8) -> i8 {
  ((1 << SGRPROJ_PRJ_BITS) - i32::from(xqd0))
    .clamp(SGRPROJ_XQD_MIN[1] as i32, SGRPROJ_XQD_MAX[1] as i32) as i8
}

/// Check a unit's filter against the frame restoration type and the
/// coefficient ranges.
fn check_lrf(lrf_type: u8, filter: RestorationFilter, pli: usize) -> Result<()> {
  let allowed = match filter {
    RestorationFilter::None => lrf_type != RESTORE_NONE,
    RestorationFilter::Wiener { coeffs } => {
      (lrf_type == RESTORE_WIENER || lrf_type == RESTORE_SWITCHABLE)
        && coeffs.iter().all(|pass| {
          (pli == 0 || pass[0] == 0)
            && (0..3)
              .all(|i| (WIENER_TAPS_MIN[i]..=WIENER_TAPS_MAX[i]).contains(&pass[i]))
        })
    }
    RestorationFilter::Sgrproj { set, xqd } => {
      (lrf_type == RESTORE_SGRPROJ || lrf_type == RESTORE_SWITCHABLE)
        && (set as usize) < SGRPROJ_PARAMS_S.len()
        && (0..2)
          .all(|i| (SGRPROJ_XQD_MIN[i]..=SGRPROJ_XQD_MAX[i]).contains(&xqd[i]))
        && (SGRPROJ_PARAMS_S[set as usize][0] > 0 || xqd[0] == 0)
        && (SGRPROJ_PARAMS_S[set as usize][1] > 0
          || xqd[1] == sgrproj_implied_xqd1(xqd[0]))
    }
  };
  if allowed {
    Ok(())
  } else {
    Err(EntropyError::InvalidSyntax)
  }
}

impl CDFContext {
  // rather than test writing and rolling back the cdf, we just count Q8 bits using the current cdf
  /// Cost in 1/8 bits of signalling `filter` in a `RESTORE_SWITCHABLE`
  /// frame.
  pub fn count_lrf_switchable<W: Writer>(
    &self, w: &W, refs: &RestorationRefs, filter: RestorationFilter,
    pli: usize,
  ) -> u32 {
    match filter {
      RestorationFilter::None => w.symbol_bits(0, &self.lrf_switchable_cdf),
      RestorationFilter::Wiener { coeffs } => {
        let mut bits = w.symbol_bits(1, &self.lrf_switchable_cdf);
        let first_coeff = if pli == 0 { 0 } else { 1 };
        for pass in 0..2 {
          for i in first_coeff..3 {
            let min = WIENER_TAPS_MIN[i] as i32;
            let max = WIENER_TAPS_MAX[i] as i32;
            bits += w.count_refsubexpfin(
              (max + 1 - min) as u32,
              (i + 1) as u8,
              (refs.wiener_ref[pass][i] as i32 - min) as u32,
              (coeffs[pass][i] as i32 - min) as u32,
            );
          }
        }
        bits
      }
      RestorationFilter::Sgrproj { set, xqd } => {
        // Does *not* use 'RESTORE_SGRPROJ' but rather just '2'
        let mut bits = w.symbol_bits(2, &self.lrf_switchable_cdf)
          + ((SGRPROJ_PARAMS_BITS as u32) << OD_BITRES);
        for i in 0..2 {
          let s = SGRPROJ_PARAMS_S[set as usize][i];
          let min = SGRPROJ_XQD_MIN[i] as i32;
          let max = SGRPROJ_XQD_MAX[i] as i32;
          if s > 0 {
            bits += w.count_refsubexpfin(
              (max + 1 - min) as u32,
              SGRPROJ_PRJ_SUBEXP_K,
              (refs.sgrproj_ref[i] as i32 - min) as u32,
              (xqd[i] as i32 - min) as u32,
            );
          }
        }
        bits
      }
    }
  }
}

impl ContextWriter {
  /// Code one restoration unit of plane `pli`, whose frame restoration type
  /// is `lrf_type`, and advance `refs` past it.
  pub fn write_lrf<W: Writer>(
    &mut self, w: &mut W, refs: &mut RestorationRefs, lrf_type: u8,
    filter: RestorationFilter, pli: usize,
  ) -> Result<()> {
    if lrf_type == RESTORE_NONE && filter == RestorationFilter::None {
      return Ok(());
    }
    check_lrf(lrf_type, filter, pli)?;
    match filter {
      RestorationFilter::None => match lrf_type {
        RESTORE_WIENER => {
          let cdf = &self.fc.lrf_wiener_cdf;
          symbol_with_update!(self, w, 0, cdf);
        }
        RESTORE_SGRPROJ => {
          let cdf = &self.fc.lrf_sgrproj_cdf;
          symbol_with_update!(self, w, 0, cdf);
        }
        _ => {
          let cdf = &self.fc.lrf_switchable_cdf;
          symbol_with_update!(self, w, 0, cdf);
        }
      },
      RestorationFilter::Sgrproj { set, xqd } => {
        if lrf_type == RESTORE_SGRPROJ {
          let cdf = &self.fc.lrf_sgrproj_cdf;
          symbol_with_update!(self, w, 1, cdf);
        } else {
          // Does *not* write 'RESTORE_SGRPROJ'
          let cdf = &self.fc.lrf_switchable_cdf;
          symbol_with_update!(self, w, 2, cdf);
        }
        w.literal(SGRPROJ_PARAMS_BITS, set as u32);
        for i in 0..2 {
          let s = SGRPROJ_PARAMS_S[set as usize][i];
          let min = SGRPROJ_XQD_MIN[i] as i32;
          let max = SGRPROJ_XQD_MAX[i] as i32;
          if s > 0 {
            w.write_signed_subexp_with_ref(
              xqd[i] as i32,
              min,
              max + 1,
              SGRPROJ_PRJ_SUBEXP_K,
              refs.sgrproj_ref[i] as i32,
            );
          }
          refs.sgrproj_ref[i] = xqd[i];
        }
      }
      RestorationFilter::Wiener { coeffs } => {
        if lrf_type == RESTORE_WIENER {
          let cdf = &self.fc.lrf_wiener_cdf;
          symbol_with_update!(self, w, 1, cdf);
        } else {
          // Does *not* write 'RESTORE_WIENER'
          let cdf = &self.fc.lrf_switchable_cdf;
          symbol_with_update!(self, w, 1, cdf);
        }
        let first_coeff = if pli == 0 { 0 } else { 1 };
        for pass in 0..2 {
          for i in first_coeff..3 {
            let min = WIENER_TAPS_MIN[i] as i32;
            let max = WIENER_TAPS_MAX[i] as i32;
            w.write_signed_subexp_with_ref(
              coeffs[pass][i] as i32,
              min,
              max + 1,
              (i + 1) as u8,
              refs.wiener_ref[pass][i] as i32,
            );
            refs.wiener_ref[pass][i] = coeffs[pass][i];
          }
        }
      }
    }
    Ok(())
  }

  pub fn write_cdef<W: Writer>(
    &mut self, w: &mut W, strength_index: u8, bits: u8,
  ) {
    w.literal(bits, strength_index as u32);
  }
}

impl ContextReader {
  pub fn read_lrf(
    &mut self, r: &mut Reader, refs: &mut RestorationRefs, lrf_type: u8,
    pli: usize,
  ) -> Result<RestorationFilter> {
    let kind = match lrf_type {
      RESTORE_NONE => return Ok(RestorationFilter::None),
      RESTORE_WIENER => {
        if read_symbol!(self, r, self.fc.lrf_wiener_cdf) != 0 {
          RESTORE_WIENER
        } else {
          RESTORE_NONE
        }
      }
      RESTORE_SGRPROJ => {
        if read_symbol!(self, r, self.fc.lrf_sgrproj_cdf) != 0 {
          RESTORE_SGRPROJ
        } else {
          RESTORE_NONE
        }
      }
      RESTORE_SWITCHABLE => match read_symbol!(self, r, self.fc.lrf_switchable_cdf)
      {
        0 => RESTORE_NONE,
        1 => RESTORE_WIENER,
        _ => RESTORE_SGRPROJ,
      },
      _ => return Err(EntropyError::InvalidSyntax),
    };

    match kind {
      RESTORE_WIENER => {
        let mut coeffs = [[0i8; 3]; 2];
        let first_coeff = if pli == 0 { 0 } else { 1 };
        for pass in 0..2 {
          for i in first_coeff..3 {
            let min = WIENER_TAPS_MIN[i] as i32;
            let max = WIENER_TAPS_MAX[i] as i32;
            let v = r.read_signed_subexp_with_ref(
              min,
              max + 1,
              (i + 1) as u8,
              refs.wiener_ref[pass][i] as i32,
            )?;
            coeffs[pass][i] = v as i8;
            refs.wiener_ref[pass][i] = v as i8;
          }
        }
        Ok(RestorationFilter::Wiener { coeffs })
      }
      RESTORE_SGRPROJ => {
        let set = r.literal(SGRPROJ_PARAMS_BITS)? as u8;
        let mut xqd = [0i8; 2];
        for i in 0..2 {
          let s = SGRPROJ_PARAMS_S[set as usize][i];
          let min = SGRPROJ_XQD_MIN[i] as i32;
          let max = SGRPROJ_XQD_MAX[i] as i32;
          xqd[i] = if s > 0 {
            r.read_signed_subexp_with_ref(
              min,
              max + 1,
              SGRPROJ_PRJ_SUBEXP_K,
              refs.sgrproj_ref[i] as i32,
            )? as i8
          } else if i == 1 {
            sgrproj_implied_xqd1(refs.sgrproj_ref[0])
          } else {
            0
          };
          refs.sgrproj_ref[i] = xqd[i];
        }
        Ok(RestorationFilter::Sgrproj { set, xqd })
      }
      _ => Ok(RestorationFilter::None),
    }
  }

  pub fn read_cdef(&mut self, r: &mut Reader, bits: u8) -> Result<u8> {
    Ok(r.literal(bits)? as u8)
  }
}
