// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use crate::context::{check_symbol, ContextWriter};
use crate::ec::{Writer, WriterBase, WriterEncoder};
use crate::error::{EntropyError, Result};
use crate::frame::*;
use crate::util::{
  cdf_arity, update_cdf, validate_adapted_cdf, validate_cdf,
};
use log::{debug, trace};
use std::sync::Arc;

/// Start encoding a frame described by `params`, seeded from `slots`.
///
/// # Errors
///
/// - Returns `EntropyError::InvalidSyntax` if `params` is malformed.
/// - Returns `EntropyError::MissingReference` if the primary reference
///   slot is empty.
pub fn begin_frame(
  params: FrameEntropyParams, slots: &ReferenceSlots,
) -> Result<FrameEncoder> {
  let state = FrameEntropyState::begin(&params, slots)?;
  debug!(
    "begin frame: primary_ref_frame={} slot={:?} adapt={}",
    params.primary_ref_frame,
    params.primary_slot(),
    params.adapt()
  );
  Ok(FrameEncoder { params, state, tile_limit: None })
}

/// A frame between `begin_frame` and `finish`. Tiles are cloned from its
/// frame-start state.
#[derive(Debug)]
pub struct FrameEncoder {
  params: FrameEntropyParams,
  state: FrameEntropyState,
  tile_limit: Option<usize>,
}

impl FrameEncoder {
  pub const fn params(&self) -> &FrameEntropyParams {
    &self.params
  }

  pub const fn state(&self) -> &FrameEntropyState {
    &self.state
  }

  /// Cap every tile payload of this frame at `limit` bytes.
  pub fn with_tile_limit(mut self, limit: usize) -> Self {
    self.tile_limit = Some(limit);
    self
  }

  pub fn begin_tile(&self, tile_id: usize) -> TileEncoder {
    let ts = self.state.tile(tile_id);
    TileEncoder {
      tile_id,
      limit: self.tile_limit,
      cw: ContextWriter::new(ts.fc, self.params.adapt()),
      w: WriterEncoder::new(),
    }
  }

  /// Encode `tiles` tiles with `f`, in parallel when the `threading`
  /// feature is on. The payloads come back in tile order and do not depend
  /// on the schedule.
  ///
  /// # Errors
  ///
  /// - Returns the first error raised by `f` or by finishing a tile.
  pub fn encode_tiles<F>(
    &self, tiles: usize, f: F,
  ) -> Result<Vec<(Vec<u8>, TileEntropyState)>>
  where
    F: Fn(&mut TileEncoder) -> Result<()> + Sync + Send,
  {
    map_tiles(tiles, |tile_id| {
      let mut ts = self.begin_tile(tile_id);
      f(&mut ts)?;
      ts.finish()
    })
  }

  /// Save `chosen`, the final state of tile `context_update_tile_id`, into
  /// every slot this frame refreshes.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSyntax` if `chosen` comes from another
  ///   tile.
  pub fn finish(
    self, chosen: TileEntropyState, slots: &mut ReferenceSlots,
  ) -> Result<Arc<FrameEntropyState>> {
    let saved = end_frame(&self.params, self.state, chosen, slots)?;
    debug!(
      "finish frame: refresh_frame_flags={:#04x} from {}",
      self.params.refresh_frame_flags,
      if self.params.disable_frame_end_update_cdf {
        "frame start".to_string()
      } else {
        format!("tile {}", self.params.context_update_tile_id)
      }
    );
    Ok(saved)
  }
}

/// One tile being encoded: a range coder and the tile's private CDFs.
///
/// Syntax elements are written through `cw` into `w`; the methods below
/// code primitives directly.
pub struct TileEncoder {
  tile_id: usize,
  limit: Option<usize>,
  pub cw: ContextWriter,
  pub w: WriterBase<WriterEncoder>,
}

impl TileEncoder {
  pub const fn tile_id(&self) -> usize {
    self.tile_id
  }

  fn check_limit(&mut self) -> Result<()> {
    match self.limit {
      Some(limit) if (self.w.tell() as usize + 7) >> 3 > limit => {
        Err(EntropyError::WriterOverflow { limit })
      }
      _ => Ok(()),
    }
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidProbability` unless `0 < f < 32768`.
  pub fn bool(&mut self, val: bool, f: u16) -> Result<()> {
    if f == 0 || f >= 32768 {
      return Err(EntropyError::InvalidProbability);
    }
    self.w.bool(val, f);
    self.check_limit()
  }

  /// Code `s` through a caller-owned CDF, leaving it unchanged.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidProbability` if `cdf` is malformed.
  /// - Returns `EntropyError::InvalidSymbol` if `s` is not in its alphabet.
  pub fn symbol<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: &[u16; CDF_LEN],
  ) -> Result<()> {
    validate_cdf(cdf)?;
    check_symbol(s, cdf_arity(CDF_LEN))?;
    self.w.symbol(s, cdf);
    self.check_limit()
  }

  /// Code `s` through a caller-owned CDF and adapt it, unless the frame
  /// has adaptation disabled.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidProbability` if `cdf` is malformed.
  ///   Breakpoints left equal by earlier adaptation are accepted.
  /// - Returns `EntropyError::InvalidSymbol` if `s` is not in its alphabet.
  pub fn symbol_with_update<const CDF_LEN: usize>(
    &mut self, s: u32, cdf: &mut [u16; CDF_LEN],
  ) -> Result<()> {
    validate_adapted_cdf(&cdf[..])?;
    check_symbol(s, cdf_arity(CDF_LEN))?;
    self.w.symbol(s, cdf);
    if self.cw.adapt {
      update_cdf(cdf, s);
    }
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSymbol` if `s` needs more than `bits`
  ///   bits.
  pub fn literal(&mut self, bits: u8, s: u32) -> Result<()> {
    if bits > 32 || (bits < 32 && s >> bits != 0) {
      return Err(EntropyError::InvalidSymbol {
        value: s,
        arity: 1u32.checked_shl(bits.into()).unwrap_or(u32::MAX),
      });
    }
    self.w.literal(bits, s);
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::WriterOverflow` past the tile limit.
  pub fn uvlc(&mut self, v: u32) -> Result<()> {
    self.w.write_uvlc(v);
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::WriterOverflow` past the tile limit.
  pub fn subexp(&mut self, k: u8, v: u32) -> Result<()> {
    self.w.write_subexp(k, v);
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSymbol` unless `v < n`.
  pub fn subexp_fin(&mut self, n: u32, k: u8, v: u32) -> Result<()> {
    check_symbol(v, n as usize)?;
    self.w.write_subexpfin(n, k, v);
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSymbol` unless `r < n` and `v < n`.
  pub fn refsubexp_fin(&mut self, n: u32, k: u8, r: u32, v: u32) -> Result<()> {
    check_symbol(r, n as usize)?;
    check_symbol(v, n as usize)?;
    self.w.write_refsubexpfin(n, k, r, v);
    self.check_limit()
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSymbol` unless `r < n`, `v < n` and
  ///   the window `p` lies in `1..=n`.
  pub fn refbilevel(&mut self, n: u32, p: u32, r: u32, v: u32) -> Result<()> {
    check_symbol(r, n as usize)?;
    check_symbol(v, n as usize)?;
    if p == 0 || p > n {
      return Err(EntropyError::InvalidSymbol { value: p, arity: n + 1 });
    }
    self.w.write_refbilevel(n, p, r, v);
    self.check_limit()
  }

  /// Flush the range coder.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::WriterOverflow` if the payload is larger than
  ///   the tile limit.
  pub fn finish(mut self) -> Result<(Vec<u8>, TileEntropyState)> {
    let bits = self.w.tell();
    let buf = self.w.done();
    if let Some(limit) = self.limit {
      if buf.len() > limit {
        return Err(EntropyError::WriterOverflow { limit });
      }
    }
    trace!("tile {}: {} bytes, {} bits", self.tile_id, buf.len(), bits);
    Ok((buf, TileEntropyState { tile_id: self.tile_id, fc: self.cw.fc }))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::decoder;

  #[test]
  fn primitives_are_validated() {
    let enc = begin_frame(FrameEntropyParams::default(), &ReferenceSlots::new())
      .unwrap();
    let mut ts = enc.begin_tile(0);
    let start = ts.w.tell();
    assert_eq!(ts.bool(true, 0), Err(EntropyError::InvalidProbability));
    assert_eq!(ts.bool(true, 32768), Err(EntropyError::InvalidProbability));
    assert_eq!(
      ts.symbol(3, &[20000, 10000, 0, 0]),
      Err(EntropyError::InvalidSymbol { value: 3, arity: 3 })
    );
    assert_eq!(
      ts.symbol(0, &[10000, 20000, 0, 0]),
      Err(EntropyError::InvalidProbability)
    );
    assert_eq!(
      ts.literal(4, 16),
      Err(EntropyError::InvalidSymbol { value: 16, arity: 16 })
    );
    assert_eq!(
      ts.subexp_fin(10, 2, 10),
      Err(EntropyError::InvalidSymbol { value: 10, arity: 10 })
    );
    assert_eq!(
      ts.refbilevel(10, 0, 3, 4),
      Err(EntropyError::InvalidSymbol { value: 0, arity: 11 })
    );
    // Nothing rejected reached the coder.
    assert_eq!(ts.w.tell(), start);
    assert!(ts.literal(32, u32::MAX).is_ok());
  }

  #[test]
  fn tile_limit() {
    let enc = begin_frame(FrameEntropyParams::default(), &ReferenceSlots::new())
      .unwrap()
      .with_tile_limit(4);
    let mut ts = enc.begin_tile(0);
    assert_eq!(ts.literal(16, 0xabcd), Ok(()));
    assert_eq!(
      ts.literal(24, 0xabcdef),
      Err(EntropyError::WriterOverflow { limit: 4 })
    );

    let ts = enc.begin_tile(1);
    assert!(ts.finish().is_ok());
  }

  #[test]
  fn caller_cdf_adapts_on_both_sides() {
    let params = FrameEntropyParams::default();
    let slots = ReferenceSlots::new();
    let enc = begin_frame(params, &slots).unwrap();
    let mut ts = enc.begin_tile(0);
    let mut cdf = cdf!(8000, 16000, 24000);
    for s in [0, 3, 3, 1, 2, 3] {
      ts.symbol_with_update(s, &mut cdf).unwrap();
    }
    let (buf, _) = ts.finish().unwrap();

    let dec = decoder::begin_frame(params, &slots).unwrap();
    let mut td = dec.begin_tile(0, &buf);
    let mut dcdf = cdf!(8000, 16000, 24000);
    for s in [0, 3, 3, 1, 2, 3] {
      assert_eq!(td.decode_symbol_with_update(&mut dcdf).unwrap(), s);
    }
    assert_eq!(cdf, dcdf);
    assert_eq!(cdf[4], 6);
  }

  #[test]
  fn frozen_cdfs_without_adaptation() {
    let params = FrameEntropyParams {
      disable_cdf_update: true,
      disable_frame_end_update_cdf: true,
      ..Default::default()
    };
    let enc = begin_frame(params, &ReferenceSlots::new()).unwrap();
    let mut ts = enc.begin_tile(0);
    let mut cdf = cdf!(8000, 16000, 24000);
    let start = cdf;
    ts.symbol_with_update(2, &mut cdf).unwrap();
    assert_eq!(cdf, start);
  }
}
