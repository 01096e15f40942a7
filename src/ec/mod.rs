// Copyright (c) 2001-2016, Alliance for Open Media. All rights reserved
// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

#![allow(non_camel_case_types)]

use crate::context::{CDFContext, CDFContextLog, CDFOffset};
use crate::util::{update_cdf, ILog, CDF_COUNT_MAX};

pub mod bcode;
pub mod reader;

pub use self::bcode::*;
pub use self::reader::Reader;

pub const OD_BITRES: u8 = 3;
pub(crate) const EC_PROB_SHIFT: u32 = 6;
pub(crate) const EC_MIN_PROB: u32 = 4;
pub(crate) type ec_window = u32;

/// Public trait interface to a bitstream `Writer`: a `Counter` can be
/// used to count bits for cost analysis without actually storing
/// anything (using a new `WriterCounter` as a `Writer`), to record
/// tokens for later writing (using a new `WriterRecorder` as a
/// `Writer`) to write actual final bits out using a range encoder
/// (using a new `WriterEncoder` as a `Writer`).  A `WriterRecorder`'s
/// contents can be replayed into a `WriterEncoder`.
pub trait Writer {
  /// Write a symbol `s`, using the passed in cdf reference; leaves `cdf` unchanged
  fn symbol<const CDF_LEN: usize>(&mut self, s: u32, cdf: &[u16; CDF_LEN]);
  /// Write a symbol `s`, using the passed in cdf reference; updates the referenced cdf.
  fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: CDFOffset<CDF_LEN>, log: &mut CDFContextLog,
    fc: &mut CDFContext,
  );
  /// return approximate number of fractional bits in `OD_BITRES`
  /// precision to write a symbol `s` using the passed in cdf reference;
  /// leaves `cdf` unchanged
  fn symbol_bits(&self, s: u32, cdf: &[u16]) -> u32;
  /// Write a bool using passed in probability
  fn bool(&mut self, val: bool, f: u16);
  /// Write a single bit with flat probability
  fn bit(&mut self, bit: u16);
  /// Write literal `bits` with flat probability
  fn literal(&mut self, bits: u8, s: u32);
  /// Write `v` as an unsigned variable length code
  fn write_uvlc(&mut self, v: u32);
  /// Write a value `v` in `[0, n-1]` quasi-uniformly
  fn write_quniform(&mut self, n: u32, v: u32);
  /// Return fractional bits needed to write a value `v` in `[0, n-1]`
  /// quasi-uniformly
  fn count_quniform(&self, n: u32, v: u32) -> u32;
  /// Write `v` with parameter `k` as an unbounded subexponential code
  fn write_subexp(&mut self, k: u8, v: u32);
  /// Write symbol `v` in `[0, n-1]` with parameter `k` as finite subexponential
  fn write_subexpfin(&mut self, n: u32, k: u8, v: u32);
  /// Return fractional bits needed to write symbol v in `[0, n-1]` with
  /// parameter k as finite subexponential
  fn count_subexpfin(&self, n: u32, k: u8, v: u32) -> u32;
  /// Write symbol `v` in `[0, n-1]` with parameter `k` as finite
  /// subexponential based on a reference `r` also in `[0, n-1]`.
  fn write_refsubexpfin(&mut self, n: u32, k: u8, r: u32, v: u32);
  /// Return fractional bits needed to write symbol `v` in `[0, n-1]` with
  /// parameter `k` as finite subexponential based on a reference `r`
  /// also in `[0, n-1]`.
  fn count_refsubexpfin(&self, n: u32, k: u8, r: u32, v: u32) -> u32;
  /// Write symbol `v` in `[low, high)` with parameter `k` as finite
  /// subexponential based on a reference `r` also in `[low, high)`.
  fn write_signed_subexp_with_ref(
    &mut self, v: i32, low: i32, high: i32, k: u8, r: i32,
  );
  /// Write symbol `v` in `[0, n-1]` around a reference `r`, spending one
  /// flag to pick the window of `p` values nearest to `r`.
  fn write_refbilevel(&mut self, n: u32, p: u32, r: u32, v: u32);
  /// Return current length of range-coded bitstream in integer bits
  fn tell(&mut self) -> u32;
  /// Return current length of range-coded bitstream in fractional
  /// bits with `OD_BITRES` decimal precision
  fn tell_frac(&mut self) -> u32;
  /// Save current point in coding/recording to a checkpoint
  fn checkpoint(&mut self) -> WriterCheckpoint;
  /// Restore saved position in coding/recording from a checkpoint
  fn rollback(&mut self, _: &WriterCheckpoint);
}

/// `StorageBackend` is an internal trait used to tie a specific `Writer`
/// implementation's storage to the generic `Writer`.  It would be
/// private, but Rust is deprecating 'private trait in a public
/// interface' support.
pub trait StorageBackend {
  /// Store partially-computed range code into given storage backend
  fn store(&mut self, fl: u16, fh: u16, nms: u16);
  /// Return bit-length of encoded stream to date
  fn stream_bits(&mut self) -> usize;
  /// Backend implementation of checkpoint to pass through Writer interface
  fn checkpoint(&mut self) -> WriterCheckpoint;
  /// Backend implementation of rollback to pass through Writer interface
  fn rollback(&mut self, _: &WriterCheckpoint);
}

#[derive(Debug, Clone)]
pub struct WriterBase<S> {
  /// The number of values in the current range.
  rng: u16,
  /// The number of bits of data in the current value.
  cnt: i16,
  /// Use-specific storage
  s: S,
}

#[derive(Debug, Clone)]
pub struct WriterCounter {
  /// Bits that would be shifted out to date
  bits: usize,
}

#[derive(Debug, Clone)]
pub struct WriterRecorder {
  /// Storage for tokens
  storage: Vec<(u16, u16, u16)>,
  /// Bytes that would be shifted out to date
  bytes: usize,
}

#[derive(Debug, Clone)]
pub struct WriterEncoder {
  /// A buffer for output bytes with their associated carry flags.
  precarry: Vec<u16>,
  /// The low end of the current range.
  low: ec_window,
}

#[derive(Clone, Debug)]
pub struct WriterCheckpoint {
  /// Byte length coded/recorded to date
  stream_bytes: usize,
  /// To be defined by backend
  backend_var: usize,
  /// Saved number of values in the current range.
  rng: u16,
  /// Saved number of bits of data in the current value.
  cnt: i16,
}

/// Constructor for a counting Writer
impl WriterCounter {
  #[inline]
  #[allow(clippy::new_ret_no_self)]
  pub const fn new() -> WriterBase<WriterCounter> {
    WriterBase::new(WriterCounter { bits: 0 })
  }
}

/// Constructor for a recording Writer
impl WriterRecorder {
  #[inline]
  #[allow(clippy::new_ret_no_self)]
  pub const fn new() -> WriterBase<WriterRecorder> {
    WriterBase::new(WriterRecorder { storage: Vec::new(), bytes: 0 })
  }
}

/// Constructor for a encoding Writer
impl WriterEncoder {
  #[inline]
  #[allow(clippy::new_ret_no_self)]
  pub const fn new() -> WriterBase<WriterEncoder> {
    WriterBase::new(WriterEncoder { precarry: Vec::new(), low: 0 })
  }
}

/// The Counter stores nothing we write to it, it merely counts the
/// bit usage like in an Encoder for cost analysis.
impl StorageBackend for WriterBase<WriterCounter> {
  #[inline]
  fn store(&mut self, fl: u16, fh: u16, nms: u16) {
    let (_l, r) = self.lr_compute(fl, fh, nms);
    let d = r.leading_zeros() as usize;

    self.s.bits += d;
    self.rng = r << d;
  }
  #[inline]
  fn stream_bits(&mut self) -> usize {
    self.s.bits
  }
  #[inline]
  fn checkpoint(&mut self) -> WriterCheckpoint {
    WriterCheckpoint {
      stream_bytes: self.s.bits,
      backend_var: 0,
      rng: self.rng,
      // We do not use `cnt` within Counter, but setting it here allows the
      // compiler to do a 32-bit merged load/store.
      cnt: self.cnt,
    }
  }
  #[inline]
  fn rollback(&mut self, checkpoint: &WriterCheckpoint) {
    self.rng = checkpoint.rng;
    self.s.bits = checkpoint.stream_bytes;
  }
}

/// The Recorder does not produce a range-coded bitstream, but it
/// still tracks the range coding progress like in an Encoder, as it
/// needs to be able to report bit costs for RDO decisions.  It stores a
/// pair of mostly-computed range coding values per token recorded.
impl StorageBackend for WriterBase<WriterRecorder> {
  #[inline]
  fn store(&mut self, fl: u16, fh: u16, nms: u16) {
    let (_l, r) = self.lr_compute(fl, fh, nms);
    let d = r.leading_zeros() as usize;
    let mut s = self.cnt + (d as i16);

    self.s.bytes += (s >= 0) as usize + (s >= 8) as usize;
    s -= 8 * ((s >= 0) as i16 + (s >= 8) as i16);

    self.rng = r << d;
    self.cnt = s;
    self.s.storage.push((fl, fh, nms));
  }
  #[inline]
  fn stream_bits(&mut self) -> usize {
    self.s.bytes * 8
  }
  #[inline]
  fn checkpoint(&mut self) -> WriterCheckpoint {
    WriterCheckpoint {
      stream_bytes: self.s.bytes,
      backend_var: self.s.storage.len(),
      rng: self.rng,
      cnt: self.cnt,
    }
  }
  #[inline]
  fn rollback(&mut self, checkpoint: &WriterCheckpoint) {
    self.rng = checkpoint.rng;
    self.cnt = checkpoint.cnt;
    self.s.bytes = checkpoint.stream_bytes;
    self.s.storage.truncate(checkpoint.backend_var);
  }
}

/// An Encoder produces an actual range-coded bitstream from passed in
/// tokens.  It does not retain any information about the coded
/// tokens, only the resulting bitstream, and so it cannot be replayed
/// (only checkpointed and rolled back).
impl StorageBackend for WriterBase<WriterEncoder> {
  fn store(&mut self, fl: u16, fh: u16, nms: u16) {
    let (l, r) = self.lr_compute(fl, fh, nms);
    let mut low = l + self.s.low;
    let mut c = self.cnt;
    let d = r.leading_zeros() as usize;
    let mut s = c + (d as i16);

    if s >= 0 {
      c += 16;
      let mut m: ec_window = (1 << c) - 1;
      if s >= 8 {
        self.s.precarry.push((low >> c) as u16);
        low &= m;
        c -= 8;
        m >>= 8;
      }
      self.s.precarry.push((low >> c) as u16);
      s = c + (d as i16) - 24;
      low &= m;
    }
    self.s.low = low << d;
    self.rng = r << d;
    self.cnt = s;
  }
  #[inline]
  fn stream_bits(&mut self) -> usize {
    self.s.precarry.len() * 8
  }
  #[inline]
  fn checkpoint(&mut self) -> WriterCheckpoint {
    WriterCheckpoint {
      stream_bytes: self.s.precarry.len(),
      backend_var: self.s.low as usize,
      rng: self.rng,
      cnt: self.cnt,
    }
  }
  fn rollback(&mut self, checkpoint: &WriterCheckpoint) {
    self.rng = checkpoint.rng;
    self.cnt = checkpoint.cnt;
    self.s.low = checkpoint.backend_var as ec_window;
    self.s.precarry.truncate(checkpoint.stream_bytes);
  }
}

/// Given the current total integer number of bits used and the current value of
/// rng, computes the fraction number of bits used to `OD_BITRES` precision.
/// `nbits_total`: The number of whole bits currently used, i.e., the value
///                returned by `tell()`.
/// `rng`: The current value of rng from either the encoder or decoder state.
/// Return: The number of bits scaled by `2**OD_BITRES`.
///         This will always be slightly larger than the exact value (e.g., all
///         rounding error is in the positive direction).
pub(crate) fn frac_compute(nbits_total: u32, mut rng: u32) -> u32 {
  // To handle the non-integral number of bits still left in the encoder/decoder
  //  state, we compute the worst-case number of bits of val that must be
  //  encoded to ensure that the value is inside the range for any possible
  //  subsequent bits.
  // The computation here is independent of val itself (the decoder does not
  //  even track that value), even though the real number of bits used after
  //  done() may be 1 smaller if rng is a power of two and the corresponding
  //  trailing bits of val are all zeros.
  // This may help explain the surprising result that a newly initialized
  //  encoder or decoder claims to have used 1 bit.
  let nbits = nbits_total << OD_BITRES;
  let mut l = 0;
  for _ in 0..OD_BITRES {
    rng = (rng * rng) >> 15;
    let b = rng >> 16;
    l = (l << 1) | b;
    rng >>= b;
  }
  // Callers may pass a zero bit count; they only use differences.
  nbits.wrapping_sub(l)
}

/// Recenters a non-negative literal `v` around a reference `r`
#[inline]
pub const fn recenter_nonneg(r: u32, v: u32) -> u32 {
  if v > (r << 1) {
    v
  } else if v >= r {
    (v - r) << 1
  } else {
    ((r - v) << 1) - 1
  }
}

/// Recenters a non-negative literal `v` in `[0, n-1]` around a
/// reference `r` also in `[0, n-1]`
#[inline]
pub const fn recenter_finite_nonneg(n: u32, r: u32, v: u32) -> u32 {
  if (r << 1) <= n {
    recenter_nonneg(r, v)
  } else {
    recenter_nonneg(n - 1 - r, n - 1 - v)
  }
}

/// Inverse of [`recenter_nonneg`]
#[inline]
pub const fn inv_recenter_nonneg(r: u32, v: u32) -> u32 {
  if v > (r << 1) {
    v
  } else if (v & 1) == 0 {
    (v >> 1) + r
  } else {
    r - ((v + 1) >> 1)
  }
}

/// Inverse of [`recenter_finite_nonneg`]
#[inline]
pub const fn inv_recenter_finite_nonneg(n: u32, r: u32, v: u32) -> u32 {
  if (r << 1) <= n {
    inv_recenter_nonneg(r, v)
  } else {
    n - 1 - inv_recenter_nonneg(n - 1 - r, v)
  }
}

/// Split `n` for a quasi-uniform code: the number of bits `l` and the
/// count `m` of values coded with only `l - 1` bits.
#[inline]
pub(crate) const fn quniform_split(n: u32) -> (u32, u32) {
  let l = 32 - n.leading_zeros();
  let m = ((1u64 << l) - n as u64) as u32;
  (l, m)
}

/// Size of the `i`-th subexponential interval for parameter `k`.
#[inline]
pub(crate) const fn subexp_bits(i: u32, k: u32) -> u32 {
  if i != 0 {
    k + i - 1
  } else {
    k
  }
}

/// The window of `p` values nearest to `r` within `[0, n-1]`.
#[inline]
pub(crate) const fn refbilevel_window(n: u32, p: u32, r: u32) -> (u32, u32) {
  let lo = r as i64 - (p / 2) as i64;
  if lo < 0 {
    (0, p - 1)
  } else if lo as u64 + p as u64 - 1 >= n as u64 {
    (n - p, n - 1)
  } else {
    (lo as u32, lo as u32 + p - 1)
  }
}

/// A few local helper functions needed by the Writer that are not
/// part of the public interface.
impl<S> WriterBase<S> {
  /// Internal constructor called by the subtypes that implement the
  /// actual encoder and Recorder.
  #[inline]
  const fn new(storage: S) -> Self {
    WriterBase { rng: 0x8000, cnt: -9, s: storage }
  }

  /// Compute low and range values from token cdf values and local state
  const fn lr_compute(&self, fl: u16, fh: u16, nms: u16) -> (ec_window, u16) {
    let r = self.rng as u32;
    debug_assert!(32768 <= r);
    let v = (((r >> 8) * (fh as u32 >> EC_PROB_SHIFT)) >> (7 - EC_PROB_SHIFT))
      + EC_MIN_PROB * (nms - 1) as u32;
    if fl < 32768 {
      let u = (((r >> 8) * (fl as u32 >> EC_PROB_SHIFT))
        >> (7 - EC_PROB_SHIFT))
        + EC_MIN_PROB * nms as u32;
      (r - u, (u - v) as u16)
    } else {
      (0, (r - v) as u16)
    }
  }
}

/// Replay implementation specific to the Recorder
impl WriterBase<WriterRecorder> {
  /// Replays the partially-computed range tokens out of the Recorder's
  /// storage and into the passed in Writer, which may be an Encoder
  /// or another Recorder.  Clears the Recorder after replay.
  pub fn replay(&mut self, dest: &mut dyn StorageBackend) {
    for &(fl, fh, nms) in &self.s.storage {
      dest.store(fl, fh, nms);
    }
    self.rng = 0x8000;
    self.cnt = -9;
    self.s.storage.truncate(0);
    self.s.bytes = 0;
  }
}

/// Done implementation specific to the Encoder
impl WriterBase<WriterEncoder> {
  /// Indicates that there are no more symbols to encode.  Flushes
  /// remaining state into coding and returns a vector containing the
  /// final bitstream.
  pub fn done(&mut self) -> Vec<u8> {
    // We output the minimum number of bits that ensures that the symbols encoded
    // thus far will be decoded correctly regardless of the bits that follow.
    let l = self.s.low;
    let mut c = self.cnt;
    let mut s = 10;
    let m: ec_window = 0x3FFF;
    let mut e = ((l + m) & !m) | (m + 1);

    s += c;

    if s > 0 {
      let mut n: ec_window = (1 << (c + 16)) - 1;

      loop {
        self.s.precarry.push((e >> (c + 16)) as u16);
        e &= n;
        s -= 8;
        c -= 8;
        n >>= 8;

        if s <= 0 {
          break;
        }
      }
    }

    let mut c = 0;
    let mut offs = self.s.precarry.len();
    let mut out = vec![0_u8; offs];
    while offs > 0 {
      offs -= 1;
      c += self.s.precarry[offs];
      out[offs] = c as u8;
      c >>= 8;
    }

    out
  }
}

/// Generic/shared implementation for `Writer`s with `StorageBackend`s
/// (ie, `Encoder`s and `Recorder`s)
impl<S> Writer for WriterBase<S>
where
  WriterBase<S>: StorageBackend,
{
  /// Encode a single binary value.
  /// `val`: The value to encode (0 or 1).
  /// `f`: The probability that the val is one, scaled by 32768.
  fn bool(&mut self, val: bool, f: u16) {
    debug_assert!(0 < f);
    debug_assert!(f < 32768);
    self.symbol(u32::from(val), &[f, 0, 0]);
  }
  /// Encode a single boolean value with flat probability.
  ///
  /// - `bit`: The value to encode (`0` or `1`).
  fn bit(&mut self, bit: u16) {
    self.bool(bit == 1, 16384);
  }
  /// Encode a literal bitstring, bit by bit in MSB order, with flat
  /// probability.
  ///
  /// - 'bits': Length of bitstring
  /// - 's': Bit string to encode
  fn literal(&mut self, bits: u8, s: u32) {
    for bit in (0..bits).rev() {
      self.bit((1 & (s >> bit)) as u16);
    }
  }
  /// Encodes a symbol given a cumulative distribution function (CDF) table in Q15.
  ///
  /// - `s`: The index of the symbol to encode.
  /// - `cdf`: The inverted CDF, such that symbol s falls in the range
  ///        `[s > 0 ? cdf[s - 1] : 32768, cdf[s])`.
  ///       The values must be monotonically non-increasing, the second to
  ///       last value must be 0 and the last value holds the count.
  #[inline(always)]
  fn symbol<const CDF_LEN: usize>(&mut self, s: u32, cdf: &[u16; CDF_LEN]) {
    debug_assert!(cdf[CDF_LEN - 1] <= CDF_COUNT_MAX);
    debug_assert!(cdf[CDF_LEN - 2] == 0);
    let s = s as usize;
    debug_assert!(s < CDF_LEN - 1);
    let nms = CDF_LEN - 1 - s;
    let fl = if s > 0 { cdf[s - 1] } else { 32768 };
    let fh = cdf[s];
    debug_assert!((fh >> EC_PROB_SHIFT) <= (fl >> EC_PROB_SHIFT));
    self.store(fl, fh, nms as u16);
  }
  /// Encodes a symbol given a cumulative distribution function (CDF)
  /// table in Q15, then updates the CDF probabilities to reflect we've
  /// written one more symbol 's'.
  ///
  /// - `s`: The index of the symbol to encode.
  /// - `cdf`: Offset of the CDF inside `fc`, recorded in `log` first so
  ///   that a rollback can restore it.
  fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: CDFOffset<CDF_LEN>, log: &mut CDFContextLog,
    fc: &mut CDFContext,
  ) {
    let cdf = log.push(fc, cdf);
    self.symbol(s, cdf);
    update_cdf(cdf, s);
  }
  /// Returns approximate cost for a symbol given a cumulative
  /// distribution function (CDF) table and current write state.
  ///
  /// - `s`: The index of the symbol to encode.
  /// - `cdf`: The inverted CDF, laid out as for `symbol`.
  fn symbol_bits(&self, s: u32, cdf: &[u16]) -> u32 {
    let mut bits = 0;
    debug_assert!(cdf[cdf.len() - 1] <= CDF_COUNT_MAX);
    debug_assert!(32768 <= self.rng);
    let rng = (self.rng >> 8) as u32;
    let fh = cdf[s as usize] as u32 >> EC_PROB_SHIFT;
    let r = if s > 0 {
      let fl = cdf[s as usize - 1] as u32 >> EC_PROB_SHIFT;
      ((rng * fl) >> (7 - EC_PROB_SHIFT)) - ((rng * fh) >> (7 - EC_PROB_SHIFT))
        + EC_MIN_PROB
    } else {
      let nms1 = cdf.len() as u32 - s - 2;
      self.rng as u32
        - ((rng * fh) >> (7 - EC_PROB_SHIFT))
        - nms1 * EC_MIN_PROB
    };

    // The 9 here counteracts the offset of -9 baked into cnt.  Don't include a termination bit.
    let pre = frac_compute((self.cnt + 9) as u32, self.rng as u32);
    let d = 16 - ILog::ilog(r);
    let mut c = self.cnt;
    let mut sh = c + (d as i16);
    if sh >= 0 {
      c += 16;
      if sh >= 8 {
        bits += 8;
        c -= 8;
      }
      bits += 8;
      sh = c + (d as i16) - 24;
    }
    // The 9 here counteracts the offset of -9 baked into cnt.  Don't include a termination bit.
    frac_compute((bits + sh + 9) as u32, r << d).wrapping_sub(pre)
  }
  /// Encode an unsigned variable length code: `lz` zero bits, then
  /// `v + 1` in `lz + 1` bits, most significant (and always set) bit first.
  ///
  /// `u32::MAX` has no terminating bit and is coded as 32 zeros.
  fn write_uvlc(&mut self, v: u32) {
    if v == u32::MAX {
      self.literal(32, 0);
      return;
    }
    let x = v + 1;
    let length = 32 - x.leading_zeros();

    for _ in 0..length - 1 {
      self.bit(0);
    }

    for i in (0..length).rev() {
      self.bit(((x >> i) & 0x01) as u16);
    }
  }
  /// Write a value `v` in `[0, n-1]` quasi-uniformly
  /// - `n`: size of interval
  /// - `v`: value to encode
  fn write_quniform(&mut self, n: u32, v: u32) {
    if n > 1 {
      let (l, m) = quniform_split(n);
      if v < m {
        self.literal(l as u8 - 1, v);
      } else {
        self.literal(l as u8 - 1, m + ((v - m) >> 1));
        self.literal(1, (v - m) & 1);
      }
    }
  }
  /// Returns `QOD_BITRES` bits for a value `v` in `[0, n-1]` quasi-uniformly
  /// - `n`: size of interval
  /// - `v`: value to encode
  fn count_quniform(&self, n: u32, v: u32) -> u32 {
    let mut bits = 0;
    if n > 1 {
      let (l, m) = quniform_split(n);
      bits += (l - 1) << OD_BITRES;
      if v >= m {
        bits += 1 << OD_BITRES;
      }
    }
    bits
  }
  /// Write `v` with parameter `k` as a subexponential code with no upper
  /// bound: each flag doubles the interval, until a `b` bit literal
  /// locates `v` within the current one.
  fn write_subexp(&mut self, k: u8, v: u32) {
    let v = u64::from(v);
    let mut i = 0;
    let mut mk = 0u64;
    loop {
      let b = subexp_bits(i, k as u32);
      let a = 1u64 << b;
      let t = v >= mk + a;
      self.bit(t as u16);
      if t {
        i += 1;
        mk += a;
      } else {
        self.literal(b as u8, (v - mk) as u32);
        break;
      }
    }
  }
  /// Write symbol `v` in `[0, n-1]` with parameter `k` as finite subexponential
  ///
  /// - `n`: size of interval
  /// - `k`: "parameter"
  /// - `v`: value to encode
  fn write_subexpfin(&mut self, n: u32, k: u8, v: u32) {
    let (n, v) = (u64::from(n), u64::from(v));
    let mut i = 0;
    let mut mk = 0;
    loop {
      let b = subexp_bits(i, k as u32);
      let a = 1u64 << b;
      if n <= mk + 3 * a {
        self.write_quniform((n - mk) as u32, (v - mk) as u32);
        break;
      } else {
        let t = v >= mk + a;
        self.bit(t as u16);
        if t {
          i += 1;
          mk += a;
        } else {
          self.literal(b as u8, (v - mk) as u32);
          break;
        }
      }
    }
  }
  /// Returns `QOD_BITRES` bits for symbol `v` in `[0, n-1]` with parameter `k`
  /// as finite subexponential
  ///
  /// - `n`: size of interval
  /// - `k`: "parameter"
  /// - `v`: value to encode
  fn count_subexpfin(&self, n: u32, k: u8, v: u32) -> u32 {
    let (n64, v64) = (u64::from(n), u64::from(v));
    let mut i = 0;
    let mut mk = 0;
    let mut bits = 0;
    loop {
      let b = subexp_bits(i, k as u32);
      let a = 1u64 << b;
      if n64 <= mk + 3 * a {
        bits += self.count_quniform((n64 - mk) as u32, (v64 - mk) as u32);
        break;
      } else {
        let t = v64 >= mk + a;
        bits += 1 << OD_BITRES;
        if t {
          i += 1;
          mk += a;
        } else {
          bits += b << OD_BITRES;
          break;
        }
      }
    }
    bits
  }
  /// Write symbol `v` in `[0, n-1]` with parameter `k` as finite
  /// subexponential based on a reference `r` also in `[0, n-1]`.
  ///
  /// - `n`: size of interval
  /// - `k`: "parameter"
  /// - `r`: reference
  /// - `v`: value to encode
  fn write_refsubexpfin(&mut self, n: u32, k: u8, r: u32, v: u32) {
    self.write_subexpfin(n, k, recenter_finite_nonneg(n, r, v));
  }
  /// Returns `QOD_BITRES` bits for symbol `v` in `[0, n-1]`
  /// with parameter `k` as finite subexponential based on a
  /// reference `r` also in `[0, n-1]`.
  fn count_refsubexpfin(&self, n: u32, k: u8, r: u32, v: u32) -> u32 {
    self.count_subexpfin(n, k, recenter_finite_nonneg(n, r, v))
  }
  /// Write symbol `v` in `[low, high)` with parameter `k` as finite
  /// subexponential based on a reference `r` also in `[low, high)`.
  ///
  /// - `v`: value to encode
  /// - `low`, `high`: bounds of the interval
  /// - `k`: "parameter"
  /// - `r`: reference
  fn write_signed_subexp_with_ref(
    &mut self, v: i32, low: i32, high: i32, k: u8, r: i32,
  ) {
    self.write_refsubexpfin(
      (high - low) as u32,
      k,
      (r - low) as u32,
      (v - low) as u32,
    );
  }
  /// Write symbol `v` in `[0, n-1]` around reference `r` with a bilevel
  /// code: one flag selects either the window of `p` values around `r`
  /// or the remaining `n - p` values, each coded quasi-uniformly.
  fn write_refbilevel(&mut self, n: u32, p: u32, r: u32, v: u32) {
    if n <= 1 {
      return;
    }
    debug_assert!(p > 0 && p <= n);
    debug_assert!(r < n);
    let (lolimit, hilimit) = refbilevel_window(n, p, r);
    if v >= lolimit && v <= hilimit {
      self.bit(1);
      self.write_quniform(p, v - lolimit);
    } else {
      self.bit(0);
      let v = if v > hilimit { v - p } else { v };
      self.write_quniform(n - p, v);
    }
  }
  /// Returns the number of bits "used" by the encoded symbols so far.
  /// This same number can be computed in either the encoder or the
  /// decoder, and is suitable for making coding decisions.  The value
  /// will be the same whether using an `Encoder` or `Recorder`.
  ///
  /// Return: The integer number of bits.
  ///         This will always be slightly larger than the exact value (e.g., all
  ///          rounding error is in the positive direction).
  fn tell(&mut self) -> u32 {
    // The 10 here counteracts the offset of -9 baked into cnt, and adds 1 extra
    // bit, which we reserve for terminating the stream.
    (((self.stream_bits()) as i32) + (self.cnt as i32) + 10) as u32
  }
  /// Returns the number of bits "used" by the encoded symbols so far.
  /// This same number can be computed in either the encoder or the
  /// decoder, and is suitable for making coding decisions. The value
  /// will be the same whether using an `Encoder` or `Recorder`.
  ///
  /// Return: The number of bits scaled by `2**OD_BITRES`.
  ///         This will always be slightly larger than the exact value (e.g., all
  ///          rounding error is in the positive direction).
  fn tell_frac(&mut self) -> u32 {
    frac_compute(self.tell(), self.rng as u32)
  }
  /// Save current point in coding/recording to a checkpoint that can
  /// be restored later.  A `WriterCheckpoint` can be generated for an
  /// `Encoder` or `Recorder`, but can only be used to rollback the `Writer`
  /// instance from which it was generated.
  fn checkpoint(&mut self) -> WriterCheckpoint {
    StorageBackend::checkpoint(self)
  }
  /// Roll back a given `Writer` to the state saved in the `WriterCheckpoint`
  ///
  /// - 'wc': Saved `Writer` state/position to restore
  fn rollback(&mut self, wc: &WriterCheckpoint) {
    StorageBackend::rollback(self, wc)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use rand::{Rng, SeedableRng};
  use rand_chacha::ChaChaRng;

  #[test]
  fn booleans() {
    let mut w = WriterEncoder::new();

    w.bool(false, 1);
    w.bool(true, 2);
    w.bool(false, 3);
    w.bool(true, 1);
    w.bool(true, 2);
    w.bool(false, 3);

    let b = w.done();

    let mut r = Reader::new(&b);

    assert!(!r.bool(1).unwrap());
    assert!(r.bool(2).unwrap());
    assert!(!r.bool(3).unwrap());
    assert!(r.bool(1).unwrap());
    assert!(r.bool(2).unwrap());
    assert!(!r.bool(3).unwrap());
  }

  #[test]
  fn cdf() {
    let cdf = [7296, 3819, 1716, 0, 0];

    let mut w = WriterEncoder::new();

    w.symbol(0, &cdf);
    w.symbol(0, &cdf);
    w.symbol(0, &cdf);
    w.symbol(1, &cdf);
    w.symbol(1, &cdf);
    w.symbol(1, &cdf);
    w.symbol(2, &cdf);
    w.symbol(2, &cdf);
    w.symbol(2, &cdf);
    w.symbol(3, &cdf);

    let b = w.done();

    let mut r = Reader::new(&b);

    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
    assert_eq!(r.symbol(&cdf).unwrap(), 3);
  }

  #[test]
  fn mixed() {
    let cdf = [7296, 3819, 1716, 0, 0];

    let mut w = WriterEncoder::new();

    w.symbol(0, &cdf);
    w.bool(true, 2);
    w.symbol(0, &cdf);
    w.bool(true, 2);
    w.symbol(0, &cdf);
    w.bool(true, 2);
    w.symbol(1, &cdf);
    w.bool(true, 1);
    w.symbol(1, &cdf);
    w.bool(false, 2);
    w.symbol(1, &cdf);
    w.symbol(2, &cdf);
    w.symbol(2, &cdf);
    w.symbol(2, &cdf);

    let b = w.done();

    let mut r = Reader::new(&b);

    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert!(r.bool(2).unwrap());
    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert!(r.bool(2).unwrap());
    assert_eq!(r.symbol(&cdf).unwrap(), 0);
    assert!(r.bool(2).unwrap());
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert!(r.bool(1).unwrap());
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert!(!r.bool(2).unwrap());
    assert_eq!(r.symbol(&cdf).unwrap(), 1);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
    assert_eq!(r.symbol(&cdf).unwrap(), 2);
  }

  #[test]
  fn empty_stream_is_one_byte() {
    let mut w = WriterEncoder::new();
    assert_eq!(w.tell(), 1);
    assert_eq!(w.done(), vec![0x80]);
  }

  #[test]
  fn backends_agree_on_tell() {
    let mut rng = ChaChaRng::from_seed([1; 32]);
    let cdf = [24576, 16384, 8192, 0, 0];
    let mut enc = WriterEncoder::new();
    let mut rec = WriterRecorder::new();
    let mut cnt = WriterCounter::new();
    for _ in 0..4096 {
      let s = rng.gen_range(0..4);
      enc.symbol(s, &cdf);
      rec.symbol(s, &cdf);
      cnt.symbol(s, &cdf);
      assert_eq!(enc.tell(), rec.tell());
      assert_eq!(enc.tell(), cnt.tell());
      assert_eq!(enc.tell_frac(), cnt.tell_frac());
    }
  }

  #[test]
  fn replay_matches_direct_encoding() {
    let mut rng = ChaChaRng::from_seed([2; 32]);
    let cdf = [30000, 20000, 100, 0, 0];
    let mut enc = WriterEncoder::new();
    let mut rec = WriterRecorder::new();
    for _ in 0..2000 {
      let s = rng.gen_range(0..4);
      let b = rng.gen_bool(0.3);
      enc.symbol(s, &cdf);
      enc.bool(b, 9000);
      rec.symbol(s, &cdf);
      rec.bool(b, 9000);
    }
    let mut replayed = WriterEncoder::new();
    rec.replay(&mut replayed);
    assert_eq!(enc.done(), replayed.done());
  }

  #[test]
  fn rollback_discards_symbols() {
    let cdf = [16384, 0, 0];
    let mut w = WriterEncoder::new();
    w.literal(8, 0xA5);
    let cp = Writer::checkpoint(&mut w);
    for _ in 0..100 {
      w.symbol(1, &cdf);
    }
    Writer::rollback(&mut w, &cp);
    w.literal(8, 0x5A);

    let mut direct = WriterEncoder::new();
    direct.literal(8, 0xA5);
    direct.literal(8, 0x5A);
    assert_eq!(w.done(), direct.done());
  }

  #[test]
  fn symbol_bits_tracks_tell_frac() {
    let cdf = [32000, 31000, 0, 0];
    let mut w = WriterCounter::new();
    let before = w.tell_frac();
    let estimate = w.symbol_bits(2, &cdf);
    w.symbol(2, &cdf);
    let after = w.tell_frac();
    assert!(estimate.abs_diff(after - before) <= 8);
  }

  #[test]
  fn recenter_inverts() {
    for n in 1..40 {
      for r in 0..n {
        for v in 0..n {
          let c = recenter_finite_nonneg(n, r, v);
          assert!(c < n);
          assert_eq!(inv_recenter_finite_nonneg(n, r, c), v);
        }
      }
    }
  }

  #[test]
  fn quniform_cost_matches_tell() {
    for n in [1u32, 2, 3, 5, 13, 64, 120] {
      for v in 0..n {
        let mut w = WriterCounter::new();
        let start = w.tell();
        let expected = w.count_quniform(n, v) >> OD_BITRES;
        w.write_quniform(n, v);
        assert!((w.tell() - start).abs_diff(expected) <= 1);
      }
    }
  }
}
