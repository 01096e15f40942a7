// Copyright (c) 2001-2016, Alliance for Open Media. All rights reserved
// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use super::*;
use crate::error::{EntropyError, Result};
use crate::util::update_cdf;

const WINDOW_SIZE: i16 = 32;
const LOTS_OF_BITS: i16 = 0x4000;

/// Range decoder for a single tile payload.
///
/// Every read checks the number of bits consumed so far against the
/// payload size and fails with [`EntropyError::TruncatedStream`] once a
/// symbol needed bits beyond its end.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
  buf: &'a [u8],
  bptr: usize,
  /// Complement of the distance to the top of the range, window aligned.
  dif: ec_window,
  rng: u16,
  cnt: i16,
  tell_offs: i32,
}

impl<'a> Reader<'a> {
  pub fn new(buf: &'a [u8]) -> Self {
    let mut r = Reader {
      buf,
      bptr: 0,
      dif: (1 << (WINDOW_SIZE - 1)) - 1,
      rng: 0x8000,
      cnt: -15,
      tell_offs: 10 - (i32::from(WINDOW_SIZE) - 8),
    };
    r.refill();
    r
  }

  fn refill(&mut self) {
    let mut s = WINDOW_SIZE - 9 - (self.cnt + 15);
    while s >= 0 && self.bptr < self.buf.len() {
      self.dif ^= ec_window::from(self.buf[self.bptr]) << s;
      self.cnt += 8;
      s -= 8;
      self.bptr += 1;
    }
    if self.bptr >= self.buf.len() {
      // Past the end the window is padded with ones; tell() stays put.
      self.tell_offs += i32::from(LOTS_OF_BITS - self.cnt);
      self.cnt = LOTS_OF_BITS;
    }
  }

  fn normalize(&mut self, dif: ec_window, rng: u32) -> Result<()> {
    debug_assert!(rng > 0 && rng <= 0xFFFF);
    let d = rng.leading_zeros() - 16;
    self.cnt -= d as i16;
    self.dif = ((dif + 1) << d) - 1;
    self.rng = (rng << d) as u16;
    if self.cnt < 0 {
      self.refill();
    }
    if self.tell() as usize > self.buf.len() * 8 {
      return Err(EntropyError::TruncatedStream);
    }
    Ok(())
  }

  /// Decode a single binary value.
  /// `f`: The probability that the bit is one, scaled by 32768.
  pub fn bool(&mut self, f: u16) -> Result<bool> {
    debug_assert!(f < 32768);
    let r = u32::from(self.rng);
    let v = (((r >> 8) * (u32::from(f) >> EC_PROB_SHIFT))
      >> (7 - EC_PROB_SHIFT))
      + EC_MIN_PROB;
    let vw = v << 16;
    let (dif, rng, ret) = if self.dif >= vw {
      (self.dif - vw, r - v, false)
    } else {
      (self.dif, v, true)
    };
    self.normalize(dif, rng)?;
    Ok(ret)
  }

  #[inline]
  pub fn bit(&mut self) -> Result<bool> {
    self.bool(16384)
  }

  /// Decode a symbol using an inverted CDF laid out as for
  /// [`Writer::symbol`].
  #[inline]
  pub fn symbol<const CDF_LEN: usize>(
    &mut self, icdf: &[u16; CDF_LEN],
  ) -> Result<u32> {
    self.symbol_slice(icdf)
  }

  /// Decode a symbol and adapt `cdf` towards it.
  #[inline]
  pub fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, cdf: &mut [u16; CDF_LEN],
  ) -> Result<u32> {
    let s = self.symbol_slice(cdf)?;
    update_cdf(cdf, s);
    Ok(s)
  }

  pub fn symbol_slice(&mut self, icdf: &[u16]) -> Result<u32> {
    if icdf.len() < 3 {
      return Err(EntropyError::CorruptCdf);
    }
    let last = icdf.len() - 2;
    if icdf[last] != 0 || icdf[last + 1] > CDF_COUNT_MAX {
      return Err(EntropyError::CorruptCdf);
    }
    let r = u32::from(self.rng);
    let c = self.dif >> 16;
    let mut u;
    let mut v = r;
    let mut ret = 0;
    loop {
      u = v;
      v = (((r >> 8) * (u32::from(icdf[ret]) >> EC_PROB_SHIFT))
        >> (7 - EC_PROB_SHIFT))
        + EC_MIN_PROB * (last - ret) as u32;
      if c >= v || ret == last {
        break;
      }
      ret += 1;
    }
    if v >= u || u > r || c < v {
      return Err(EntropyError::CorruptCdf);
    }
    self.normalize(self.dif - (v << 16), u - v)?;
    Ok(ret as u32)
  }

  /// Decode `bits` raw bits, most significant first.
  pub fn literal(&mut self, bits: u8) -> Result<u32> {
    debug_assert!(bits <= 32);
    let mut v = 0u32;
    for _ in 0..bits {
      v = (v << 1) | u32::from(self.bit()?);
    }
    Ok(v)
  }

  pub fn read_uvlc(&mut self) -> Result<u32> {
    let mut leading_zeros = 0;
    while leading_zeros < 32 && !self.bit()? {
      leading_zeros += 1;
    }
    if leading_zeros == 32 {
      return Ok(u32::MAX);
    }
    let base = (1u32 << leading_zeros) - 1;
    Ok(base + self.literal(leading_zeros)?)
  }

  pub fn read_quniform(&mut self, n: u32) -> Result<u32> {
    if n <= 1 {
      return Ok(0);
    }
    let (l, m) = quniform_split(n);
    let v = self.literal(l as u8 - 1)?;
    if v < m {
      Ok(v)
    } else {
      let extra = self.literal(1)?;
      Ok((v << 1) - m + extra)
    }
  }

  pub fn read_subexp(&mut self, k: u8) -> Result<u32> {
    let mut i = 0;
    let mut mk = 0u64;
    loop {
      let b = subexp_bits(i, u32::from(k));
      if b > 32 {
        return Err(EntropyError::CorruptSyntax);
      }
      if self.bit()? {
        i += 1;
        mk += 1u64 << b;
        if mk > u64::from(u32::MAX) {
          return Err(EntropyError::CorruptSyntax);
        }
      } else {
        let v = mk + u64::from(self.literal(b as u8)?);
        return u32::try_from(v).map_err(|_| EntropyError::CorruptSyntax);
      }
    }
  }

  pub fn read_subexpfin(&mut self, n: u32, k: u8) -> Result<u32> {
    let n64 = u64::from(n);
    let mut i = 0;
    let mut mk = 0u64;
    loop {
      let b = subexp_bits(i, u32::from(k));
      let a = 1u64 << b;
      if n64 <= mk + 3 * a {
        return Ok(self.read_quniform((n64 - mk) as u32)? + mk as u32);
      }
      if self.bit()? {
        i += 1;
        mk += a;
      } else {
        return Ok(self.literal(b as u8)? + mk as u32);
      }
    }
  }

  pub fn read_refsubexpfin(&mut self, n: u32, k: u8, r: u32) -> Result<u32> {
    let v = self.read_subexpfin(n, k)?;
    Ok(inv_recenter_finite_nonneg(n, r, v))
  }

  pub fn read_signed_subexp_with_ref(
    &mut self, low: i32, high: i32, k: u8, r: i32,
  ) -> Result<i32> {
    let v =
      self.read_refsubexpfin((high - low) as u32, k, (r - low) as u32)?;
    Ok(v as i32 + low)
  }

  pub fn read_refbilevel(&mut self, n: u32, p: u32, r: u32) -> Result<u32> {
    if n <= 1 {
      return Ok(0);
    }
    if p == 0 || p > n || r >= n {
      return Err(EntropyError::InvalidSymbol { value: r, arity: n });
    }
    let (lolimit, _) = refbilevel_window(n, p, r);
    if self.bit()? {
      Ok(self.read_quniform(p)? + lolimit)
    } else if p == n {
      Err(EntropyError::CorruptSyntax)
    } else {
      let v = self.read_quniform(n - p)?;
      Ok(if v >= lolimit { v + p } else { v })
    }
  }

  /// Integer bits consumed so far; equal to the encoder's `tell()` after
  /// coding the same symbols.
  pub fn tell(&self) -> u32 {
    ((self.bptr as i32) * 8 - i32::from(self.cnt) + self.tell_offs) as u32
  }

  pub fn tell_frac(&self) -> u32 {
    frac_compute(self.tell(), u32::from(self.rng))
  }

  /// Length of the payload in bytes.
  pub fn len(&self) -> usize {
    self.buf.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buf.is_empty()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaChaRng;

  #[test]
  fn tell_matches_encoder() {
    let mut rng = ChaChaRng::from_seed([3; 32]);
    let cdf = [28000, 12000, 3000, 800, 0, 0];
    let mut w = WriterEncoder::new();
    let mut symbols = Vec::new();
    let mut tells = Vec::new();
    for _ in 0..3000 {
      let s = rng.gen_range(0..5);
      w.symbol(s, &cdf);
      symbols.push(s);
      tells.push(w.tell());
    }
    let bytes = w.done();
    let mut r = Reader::new(&bytes);
    assert_eq!(r.tell(), 1);
    for (&s, &t) in symbols.iter().zip(&tells) {
      assert_eq!(r.symbol(&cdf).unwrap(), s);
      assert_eq!(r.tell(), t);
    }
  }

  #[test]
  fn raw_codes_roundtrip() {
    let mut rng = ChaChaRng::from_seed([4; 32]);
    let mut values = Vec::new();
    let mut w = WriterEncoder::new();
    for _ in 0..500 {
      let n = rng.gen_range(1..5000u32);
      let k = rng.gen_range(0..6u8);
      let r = rng.gen_range(0..n);
      let v = rng.gen_range(0..n);
      let u = rng.gen::<u32>() >> rng.gen_range(0..32);
      w.write_quniform(n, v);
      w.write_subexpfin(n, k, v);
      w.write_refsubexpfin(n, k, r, v);
      w.write_subexp(k, u);
      w.write_uvlc(u);
      values.push((n, k, r, v, u));
    }
    w.write_uvlc(u32::MAX);
    let bytes = w.done();
    let mut rd = Reader::new(&bytes);
    for &(n, k, r, v, u) in &values {
      assert_eq!(rd.read_quniform(n).unwrap(), v);
      assert_eq!(rd.read_subexpfin(n, k).unwrap(), v);
      assert_eq!(rd.read_refsubexpfin(n, k, r).unwrap(), v);
      assert_eq!(rd.read_subexp(k).unwrap(), u);
      assert_eq!(rd.read_uvlc().unwrap(), u);
    }
    assert_eq!(rd.read_uvlc().unwrap(), u32::MAX);
  }

  #[test]
  fn refbilevel_roundtrip() {
    let mut w = WriterEncoder::new();
    let mut cases = Vec::new();
    for n in 1..24u32 {
      for p in 1..=n {
        for r in 0..n {
          for v in (0..n).step_by(3) {
            w.write_refbilevel(n, p, r, v);
            cases.push((n, p, r, v));
          }
        }
      }
    }
    let bytes = w.done();
    let mut rd = Reader::new(&bytes);
    for &(n, p, r, v) in &cases {
      assert_eq!(rd.read_refbilevel(n, p, r).unwrap(), v, "n={n} p={p} r={r}");
    }
  }

  #[test]
  fn truncation_is_detected() {
    let cdf = [16384, 0, 0];
    let mut w = WriterEncoder::new();
    for i in 0..400 {
      w.symbol(i & 1, &cdf);
    }
    let bytes = w.done();
    let short = &bytes[..bytes.len() / 2];
    let mut r = Reader::new(short);
    let mut result = Ok(0);
    for _ in 0..400 {
      result = r.symbol(&cdf);
      if result.is_err() {
        break;
      }
    }
    assert_eq!(result, Err(EntropyError::TruncatedStream));
  }

  #[test]
  fn corrupt_cdf_is_rejected() {
    let bytes = [0x55u8; 8];
    let mut r = Reader::new(&bytes);
    assert_eq!(r.symbol(&[16384, 7, 0]), Err(EntropyError::CorruptCdf));
    assert_eq!(r.symbol(&[65535, 60000, 0, 0]), Err(EntropyError::CorruptCdf));
  }
}
