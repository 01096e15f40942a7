// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! CDFs are stored inverted, `32768 - F(i)`, with `N + 1` slots for an
//! `N`-symbol alphabet: `N - 1` breakpoints, the terminal `0` and the
//! adaptation counter.

use crate::error::{EntropyError, Result};
use arrayvec::ArrayVec;

/// Full probability scale, `2^15`.
pub const CDF_PROB_TOP: u32 = 32768;
/// The counter stops increasing once it reaches this value.
pub const CDF_COUNT_MAX: u16 = 32;
/// Largest alphabet any AV1 syntax element is coded with.
pub const MAX_CDF_SYMBOLS: usize = 16;

macro_rules! cdf {
  ($($x:expr),+) => {[$(32768 - $x),+, 0, 0]}
}

macro_rules! cdf_size {
  ($x:expr) => {
    $x + 1
  };
}

/// Number of symbols coded by a CDF of storage length `len`.
#[inline(always)]
pub const fn cdf_arity(len: usize) -> usize {
  len - 1
}

/// Adapt `cdf` towards `val` after it has been coded.
///
/// The adaptation rate starts fast and slows down as the counter in the
/// last slot grows; the counter saturates at [`CDF_COUNT_MAX`].
#[inline]
pub fn update_cdf<const N: usize>(cdf: &mut [u16; N], val: u32) {
  let nsymbs = cdf_arity(N);
  let count = cdf[N - 1];
  let rate = 3 + (nsymbs >> 1).min(2) as u16 + (count >> 4);
  cdf[N - 1] = count + 1 - (count >> 5);

  // The terminal slot at nsymbs - 1 stays pinned at zero.
  for (i, v) in cdf[..nsymbs - 1].iter_mut().enumerate() {
    if i as u32 >= val {
      *v -= *v >> rate;
    } else {
      *v += (32768 - *v) >> rate;
    }
  }
}

/// Check a caller-constructed CDF.
///
/// Breakpoints must strictly decrease in inverted form, starting below
/// `32768`, so that every symbol has non-zero probability, and the
/// terminal slot must be `0`.
pub fn validate_cdf(cdf: &[u16]) -> Result<()> {
  if !cdf_is_consistent(cdf) {
    return Err(EntropyError::InvalidProbability);
  }
  let mut prev = CDF_PROB_TOP;
  for &v in &cdf[..cdf.len() - 1] {
    if u32::from(v) >= prev {
      return Err(EntropyError::InvalidProbability);
    }
    prev = u32::from(v);
  }
  Ok(())
}

/// The invariant kept by [`update_cdf`]: breakpoints never increase, the
/// terminal slot is `0` and the counter is in range.
///
/// Adaptation can shrink a symbol's probability to zero; the coder still
/// assigns it a non-empty range, `EC_MIN_PROB` per remaining symbol.
pub fn cdf_is_consistent(cdf: &[u16]) -> bool {
  if cdf.len() < 3 {
    return false;
  }
  let terminal = cdf.len() - 2;
  cdf[terminal] == 0
    && cdf[terminal + 1] <= CDF_COUNT_MAX
    && cdf[..=terminal].windows(2).all(|w| w[0] >= w[1])
}

/// Check a CDF that may have been adapted by [`update_cdf`].
///
/// Equal breakpoints are accepted; the first breakpoint must still be
/// below `32768`.
pub fn validate_adapted_cdf(cdf: &[u16]) -> Result<()> {
  if cdf_is_consistent(cdf) && u32::from(cdf[0]) < CDF_PROB_TOP {
    Ok(())
  } else {
    Err(EntropyError::InvalidProbability)
  }
}

/// Probability mass of `element`, in Q15.
pub const fn cdf_element_prob(cdf: &[u16], element: usize) -> u16 {
  (if element > 0 { cdf[element - 1] } else { 32768 })
    - cdf[element]
}

/// Build a model from symbol counts, as the entropy optimizer does when it
/// trains the default tables.
///
/// Every symbol receives an extra count so that none ends up with zero
/// probability, and each step is kept at least 4 wide.
pub fn cdf_from_counts<const N: usize>(counts: &[u32]) -> Result<[u16; N]> {
  let modes = cdf_arity(N);
  if modes < 2 || modes > MAX_CDF_SYMBOLS || counts.len() != modes {
    return Err(EntropyError::InvalidProbability);
  }

  let csum: ArrayVec<i64, MAX_CDF_SYMBOLS> = counts
    .iter()
    .scan(0, |acc, &c| {
      *acc += i64::from(c) + 1;
      Some(*acc)
    })
    .collect();
  let sum = csum[modes - 1];
  let round_shift = sum >> 1;
  let top = i64::from(CDF_PROB_TOP);

  let mut out = [0u16; N];
  let mut prev = 0;
  for i in 0..modes - 1 {
    let mut v = (csum[i] * top + round_shift) / sum;
    v = v.min(top - (modes as i64 - 1 - i as i64) * 4);
    v = if i == 0 { v.max(4) } else { v.max(prev + 4) };
    prev = v;
    out[i] = (top - v) as u16;
  }
  validate_cdf(&out)?;
  Ok(out)
}

#[cfg(test)]
mod test {
  use super::*;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaChaRng;

  #[test]
  fn literal_layout() {
    let c: [u16; cdf_size!(3)] = cdf!(10922, 21845);
    assert_eq!(c, [21846, 10923, 0, 0]);
    assert!(validate_cdf(&c).is_ok());
  }

  #[test]
  fn update_matches_reference_values() {
    let mut c = [7296, 3819, 1716, 0, 0];
    update_cdf(&mut c, 2);
    assert_eq!(c, [8092, 4723, 1663, 0, 1]);

    let mut b: [u16; cdf_size!(2)] = cdf!(16384);
    update_cdf(&mut b, 0);
    assert_eq!(b, [16384 - (16384 >> 4), 0, 1]);
  }

  #[test]
  fn counter_saturates() {
    let mut c: [u16; cdf_size!(4)] = cdf!(8192, 16384, 24576);
    for _ in 0..200 {
      update_cdf(&mut c, 1);
    }
    assert_eq!(c[4], CDF_COUNT_MAX);
  }

  #[test]
  fn adaptation_keeps_invariants() {
    let mut rng = ChaChaRng::from_seed([7; 32]);
    let mut c: [u16; cdf_size!(16)] = cdf!(
      2048, 4096, 6144, 8192, 10240, 12288, 14336, 16384, 18432, 20480,
      22528, 24576, 26624, 28672, 30720
    );
    for _ in 0..10_000 {
      // Heavily skewed input to push breakpoints towards the extremes.
      let v = if rng.gen_bool(0.9) { 15 } else { rng.gen_range(0..16) };
      update_cdf(&mut c, v);
      assert!(cdf_is_consistent(&c));
    }

    let mut b: [u16; cdf_size!(2)] = cdf!(1);
    for _ in 0..10_000 {
      update_cdf(&mut b, 1);
      assert!(cdf_is_consistent(&b));
      assert!(b[0] < 32768);
    }
  }

  #[test]
  fn invalid_cdfs_are_rejected() {
    assert!(validate_cdf(&[0, 0]).is_err());
    assert!(validate_cdf(&[32768, 0, 0]).is_err());
    assert!(validate_cdf(&[100, 200, 0, 0]).is_err());
    assert!(validate_cdf(&[200, 100, 5, 0]).is_err());
    assert!(validate_cdf(&[200, 100, 0, 33]).is_err());
  }

  #[test]
  fn adapted_cdfs_with_equal_breakpoints_are_accepted() {
    let mut c: [u16; cdf_size!(3)] = cdf!(12000, 22000);
    for _ in 0..1000 {
      update_cdf(&mut c, 0);
    }
    assert_eq!(c, [63, 63, 0, 32]);
    assert!(validate_cdf(&c).is_err());
    assert!(validate_adapted_cdf(&c).is_ok());

    assert!(validate_adapted_cdf(&[32768, 0, 0]).is_err());
    assert!(validate_adapted_cdf(&[100, 200, 0, 0]).is_err());
    assert!(validate_adapted_cdf(&[200, 100, 0, 33]).is_err());
  }

  #[test]
  fn element_prob_sums_to_top() {
    let c: [u16; cdf_size!(4)] = cdf!(4096, 11264, 19328);
    let total: u32 =
      (0..4).map(|e| u32::from(cdf_element_prob(&c, e))).sum();
    assert_eq!(total, CDF_PROB_TOP);
    assert_eq!(cdf_element_prob(&c, 0), 4096);
    assert_eq!(cdf_element_prob(&c, 3), 32768 - 19328);
  }

  #[test]
  fn counts_become_a_valid_model() {
    let c: [u16; 4] = cdf_from_counts(&[1, 1, 1]).unwrap();
    assert_eq!(c, cdf!(10923, 21845));

    let skewed: [u16; 5] = cdf_from_counts(&[0, 0, 1_000_000, 0]).unwrap();
    validate_cdf(&skewed).unwrap();

    assert!(cdf_from_counts::<4>(&[1, 2]).is_err());
  }
}
