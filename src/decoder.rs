// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use crate::context::ContextReader;
use crate::ec::Reader;
use crate::error::{EntropyError, Result};
use crate::frame::*;
use crate::util::{update_cdf, validate_adapted_cdf, validate_cdf};
use log::{debug, trace, warn};
use std::sync::Arc;

/// Start decoding a frame described by `params`, seeded from `slots`.
///
/// # Errors
///
/// - Returns `EntropyError::InvalidSyntax` if `params` is malformed.
/// - Returns `EntropyError::MissingReference` if the primary reference
///   slot is empty.
pub fn begin_frame(
  params: FrameEntropyParams, slots: &ReferenceSlots,
) -> Result<FrameDecoder> {
  let state = FrameEntropyState::begin(&params, slots).map_err(|e| {
    warn!("cannot start frame: {}", e);
    e
  })?;
  debug!(
    "begin frame: primary_ref_frame={} slot={:?} adapt={}",
    params.primary_ref_frame,
    params.primary_slot(),
    params.adapt()
  );
  Ok(FrameDecoder { params, state })
}

#[derive(Debug)]
pub struct FrameDecoder {
  params: FrameEntropyParams,
  state: FrameEntropyState,
}

impl FrameDecoder {
  pub const fn params(&self) -> &FrameEntropyParams {
    &self.params
  }

  pub const fn state(&self) -> &FrameEntropyState {
    &self.state
  }

  /// Bind a fresh copy of the frame-start CDFs to the payload of tile
  /// `tile_id`.
  pub fn begin_tile<'a>(&self, tile_id: usize, data: &'a [u8]) -> TileDecoder<'a> {
    let ts = self.state.tile(tile_id);
    TileDecoder {
      tile_id,
      cr: ContextReader::new(ts.fc, self.params.adapt()),
      r: Reader::new(data),
    }
  }

  /// Decode every payload with `f`, in parallel when the `threading`
  /// feature is on.
  ///
  /// # Errors
  ///
  /// - Returns the first error raised by `f`.
  pub fn decode_tiles<T, F>(
    &self, payloads: &[&[u8]], f: F,
  ) -> Result<Vec<(T, TileEntropyState)>>
  where
    T: Send,
    F: Fn(&mut TileDecoder) -> Result<T> + Sync + Send,
  {
    map_tiles(payloads.len(), |tile_id| {
      let mut ts = self.begin_tile(tile_id, payloads[tile_id]);
      let out = f(&mut ts).map_err(|e| {
        warn!("tile {}: {}", tile_id, e);
        e
      })?;
      Ok((out, ts.finish()))
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
      "finish frame: refresh_frame_flags={:#04x}",
      self.params.refresh_frame_flags
    );
    Ok(saved)
  }
}

/// One tile being decoded. Syntax elements are read through `cr` from `r`.
pub struct TileDecoder<'a> {
  tile_id: usize,
  pub cr: ContextReader,
  pub r: Reader<'a>,
}

impl<'a> TileDecoder<'a> {
  pub const fn tile_id(&self) -> usize {
    self.tile_id
  }

  fn trap<T>(&self, res: Result<T>) -> Result<T> {
    if let Err(e) = &res {
      match e {
        EntropyError::TruncatedStream | EntropyError::CorruptCdf => {
          warn!("tile {} at bit {}: {}", self.tile_id, self.r.tell(), e);
        }
        _ => trace!("tile {}: {}", self.tile_id, e),
      }
    }
    res
  }

  pub fn decode_bool(&mut self, f: u16) -> Result<bool> {
    if f == 0 || f >= 32768 {
      return Err(EntropyError::InvalidProbability);
    }
    let res = self.r.bool(f);
    self.trap(res)
  }

  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidProbability` if `cdf` is malformed.
  /// - Returns `EntropyError::TruncatedStream` past the end of the payload.
  pub fn decode_symbol<const CDF_LEN: usize>(
    &mut self, cdf: &[u16; CDF_LEN],
  ) -> Result<u32> {
    validate_cdf(cdf)?;
    let res = self.r.symbol(cdf);
    self.trap(res)
  }

  /// Decode a symbol through a caller-owned CDF, adapting it unless the
  /// frame has adaptation disabled.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidProbability` if `cdf` is malformed.
  ///   Breakpoints left equal by earlier adaptation are accepted.
  /// - Returns `EntropyError::TruncatedStream` past the end of the payload.
  pub fn decode_symbol_with_update<const CDF_LEN: usize>(
    &mut self, cdf: &mut [u16; CDF_LEN],
  ) -> Result<u32> {
    validate_adapted_cdf(&cdf[..])?;
    let res = self.r.symbol(cdf);
    let s = self.trap(res)?;
    if self.cr.adapt {
      update_cdf(cdf, s);
    }
    Ok(s)
  }

  pub fn decode_literal(&mut self, bits: u8) -> Result<u32> {
    if bits > 32 {
      return Err(EntropyError::InvalidSymbol { value: bits.into(), arity: 33 });
    }
    let res = self.r.literal(bits);
    self.trap(res)
  }

  pub fn decode_uvlc(&mut self) -> Result<u32> {
    let res = self.r.read_uvlc();
    self.trap(res)
  }

  pub fn decode_subexp(&mut self, k: u8) -> Result<u32> {
    let res = self.r.read_subexp(k);
    self.trap(res)
  }

  pub fn decode_subexp_fin(&mut self, n: u32, k: u8) -> Result<u32> {
    let res = self.r.read_subexpfin(n, k);
    self.trap(res)
  }

  pub fn decode_refsubexp_fin(&mut self, n: u32, k: u8, r: u32) -> Result<u32> {
    if r >= n {
      return Err(EntropyError::InvalidSymbol { value: r, arity: n });
    }
    let res = self.r.read_refsubexpfin(n, k, r);
    self.trap(res)
  }

  pub fn decode_refbilevel(&mut self, n: u32, p: u32, r: u32) -> Result<u32> {
    let res = self.r.read_refbilevel(n, p, r);
    self.trap(res)
  }

  /// The tile's final CDFs.
  pub fn finish(self) -> TileEntropyState {
    trace!("tile {}: {} of {} bits", self.tile_id, self.r.tell(), self.r.len() * 8);
    TileEntropyState { tile_id: self.tile_id, fc: self.cr.fc }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::encoder;

  #[test]
  fn truncated_tile() {
    let params = FrameEntropyParams::default();
    let slots = ReferenceSlots::new();
    let enc = encoder::begin_frame(params, &slots).unwrap();
    let mut ts = enc.begin_tile(0);
    for i in 0..64 {
      ts.literal(8, i * 3).unwrap();
    }
    let (buf, _) = ts.finish().unwrap();

    let dec = begin_frame(params, &slots).unwrap();
    let mut td = dec.begin_tile(0, &buf[..buf.len() / 2]);
    let res = (0..64).try_for_each(|_| td.decode_literal(8).map(drop));
    assert_eq!(res, Err(EntropyError::TruncatedStream));
  }

  #[test]
  fn empty_payload_reads_nothing() {
    let dec =
      begin_frame(FrameEntropyParams::default(), &ReferenceSlots::new()).unwrap();
    let mut td = dec.begin_tile(0, &[]);
    assert_eq!(td.decode_literal(16), Err(EntropyError::TruncatedStream));
  }
}
