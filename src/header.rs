// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! The uncompressed frame header fields that drive the entropy lifecycle,
//! and the tile group framing around range coded tile payloads.

use crate::error::{EntropyError, Result};
use crate::frame::*;
use crate::partition::{INTER_REFS_PER_FRAME, REF_FRAMES, REF_FRAMES_LOG2};
use bitstream_io::{
  BigEndian, BitRead, BitReader, BitWrite, BitWriter, LittleEndian,
};
use itertools::{Itertools, Position};
use std::io;

const PRIMARY_REF_BITS: u32 = 3;

/// How the tiles of a frame are framed in its tile group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayout {
  /// `log2` of the number of tiles; `context_update_tile_id` and
  /// `tile_size_bytes` are only signalled when it is non-zero.
  pub tiles_log2: u32,
  /// Width of every `tile_size_minus_1` field, in `1..=4` bytes.
  pub tile_size_bytes: u32,
}

impl TileLayout {
  pub const fn num_tiles(&self) -> usize {
    1 << self.tiles_log2
  }
}

pub trait LEWriter {
  fn write_le(&mut self, bytes: u32, payload: u64) -> io::Result<()>;
}

// to write little endian values in a globally big-endian BitWriter
impl<W: io::Write> LEWriter for BitWriter<W, BigEndian> {
  fn write_le(&mut self, bytes: u32, value: u64) -> io::Result<()> {
    let mut data = Vec::new();
    let mut bwle = BitWriter::endian(&mut data, LittleEndian);
    bwle.write(bytes * 8, value)?;
    self.write_bytes(&data)
  }
}

pub trait LEReader {
  fn read_le(&mut self, bytes: u32) -> io::Result<u64>;
}

impl<R: io::Read> LEReader for BitReader<R, BigEndian> {
  fn read_le(&mut self, bytes: u32) -> io::Result<u64> {
    let mut value = 0u64;
    for i in 0..bytes {
      let byte: u64 = self.read(8)?;
      value |= byte << (8 * i);
    }
    Ok(value)
  }
}

pub trait EntropyHeaderWriter {
  /// Write the entropy-related fields of an uncompressed frame header, in
  /// bitstream order. Intra frames carry no reference indices and always
  /// start from the default tables.
  ///
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to, or if
  ///   a field does not fit the header.
  fn write_entropy_header(
    &mut self, fp: &FrameEntropyParams, intra_only: bool, layout: TileLayout,
  ) -> io::Result<()>;
}

pub trait EntropyHeaderReader {
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_entropy_header(
    &mut self, intra_only: bool, tiles_log2: u32,
  ) -> io::Result<(FrameEntropyParams, TileLayout)>;
}

fn bad_header() -> io::Error {
  io::Error::new(io::ErrorKind::InvalidInput, "field does not fit the header")
}

impl<W: io::Write> EntropyHeaderWriter for BitWriter<W, BigEndian> {
  fn write_entropy_header(
    &mut self, fp: &FrameEntropyParams, intra_only: bool, layout: TileLayout,
  ) -> io::Result<()> {
    fp.validate().map_err(|_| bad_header())?;
    if intra_only && fp.primary_ref_frame != PRIMARY_REF_NONE {
      return Err(bad_header());
    }
    if layout.tiles_log2 > 0
      && (fp.context_update_tile_id >= layout.num_tiles()
        || !(1..=4).contains(&layout.tile_size_bytes))
    {
      return Err(bad_header());
    }

    self.write_bit(fp.disable_cdf_update)?;
    if !intra_only {
      self.write(PRIMARY_REF_BITS, fp.primary_ref_frame)?;
    }
    self.write(REF_FRAMES as u32, fp.refresh_frame_flags)?;
    if !intra_only {
      for &idx in &fp.ref_frame_idx {
        self.write(REF_FRAMES_LOG2 as u32, idx)?;
      }
    }
    if !fp.disable_cdf_update {
      self.write_bit(fp.disable_frame_end_update_cdf)?;
    }
    if layout.tiles_log2 > 0 {
      self.write(layout.tiles_log2, fp.context_update_tile_id as u32)?;
      self.write(2, layout.tile_size_bytes - 1)?;
    }
    Ok(())
  }
}

impl<R: io::Read> EntropyHeaderReader for BitReader<R, BigEndian> {
  fn read_entropy_header(
    &mut self, intra_only: bool, tiles_log2: u32,
  ) -> io::Result<(FrameEntropyParams, TileLayout)> {
    let disable_cdf_update = self.read_bit()?;
    let primary_ref_frame =
      if intra_only { PRIMARY_REF_NONE } else { self.read(PRIMARY_REF_BITS)? };
    let refresh_frame_flags = self.read(REF_FRAMES as u32)?;
    let mut ref_frame_idx = [0u8; INTER_REFS_PER_FRAME];
    if !intra_only {
      for idx in ref_frame_idx.iter_mut() {
        *idx = self.read(REF_FRAMES_LOG2 as u32)?;
      }
    } else {
      ref_frame_idx = FrameEntropyParams::default().ref_frame_idx;
    }
    // Implied when nothing adapts.
    let disable_frame_end_update_cdf =
      if disable_cdf_update { true } else { self.read_bit()? };
    let mut layout = TileLayout { tiles_log2, tile_size_bytes: 4 };
    let mut context_update_tile_id = 0;
    if tiles_log2 > 0 {
      context_update_tile_id = self.read::<u32>(tiles_log2)? as usize;
      layout.tile_size_bytes = self.read::<u32>(2)? + 1;
    }
    Ok((
      FrameEntropyParams {
        primary_ref_frame,
        ref_frame_idx,
        refresh_frame_flags,
        disable_cdf_update,
        disable_frame_end_update_cdf,
        context_update_tile_id,
      },
      layout,
    ))
  }
}

/// The smallest `tile_size_bytes` that frames every one of `tiles`.
pub fn min_tile_size_bytes(tiles: &[Vec<u8>]) -> u32 {
  let max = tiles.iter().map(|t| t.len().saturating_sub(1)).max().unwrap_or(0);
  match max {
    0..=0xff => 1,
    0x100..=0xffff => 2,
    0x1_0000..=0xff_ffff => 3,
    _ => 4,
  }
}

/// Concatenate tile payloads into a tile group body. Every tile but the
/// last is preceded by its `tile_size_minus_1` in `tile_size_bytes`
/// little-endian bytes.
///
/// # Errors
///
/// - Returns `EntropyError::InvalidSyntax` if a tile is empty or too large
///   for `tile_size_bytes`.
pub fn write_tile_group(
  tiles: &[Vec<u8>], tile_size_bytes: u32,
) -> Result<Vec<u8>> {
  if !(1..=4).contains(&tile_size_bytes) {
    return Err(EntropyError::InvalidSyntax);
  }
  let mut buf = Vec::with_capacity(
    tiles.iter().map(|t| t.len() + tile_size_bytes as usize).sum(),
  );
  {
    let mut bw = BitWriter::endian(&mut buf, BigEndian);
    for (pos, tile) in tiles.iter().with_position() {
      if tile.is_empty() {
        return Err(EntropyError::InvalidSyntax);
      }
      if matches!(pos, Position::First | Position::Middle) {
        let size_minus_1 = (tile.len() - 1) as u64;
        if size_minus_1 >> (8 * tile_size_bytes) != 0 {
          return Err(EntropyError::InvalidSyntax);
        }
        bw.write_le(tile_size_bytes, size_minus_1)
          .map_err(|_| EntropyError::InvalidSyntax)?;
      }
      bw.write_bytes(tile).map_err(|_| EntropyError::InvalidSyntax)?;
    }
  }
  Ok(buf)
}

/// Split a tile group body into `num_tiles` payloads.
///
/// # Errors
///
/// - Returns `EntropyError::TruncatedStream` if a size field or payload
///   runs past the end of `data`.
pub fn parse_tile_group(
  data: &[u8], num_tiles: usize, tile_size_bytes: u32,
) -> Result<Vec<&[u8]>> {
  if !(1..=4).contains(&tile_size_bytes) {
    return Err(EntropyError::InvalidSyntax);
  }
  let mut tiles = Vec::with_capacity(num_tiles);
  let mut rest = data;
  for i in 0..num_tiles {
    let len = if i + 1 < num_tiles {
      let field = tile_size_bytes as usize;
      if rest.len() < field {
        return Err(EntropyError::TruncatedStream);
      }
      let mut br = BitReader::endian(&rest[..field], BigEndian);
      let size_minus_1 =
        br.read_le(tile_size_bytes).map_err(|_| EntropyError::TruncatedStream)?;
      rest = &rest[field..];
      size_minus_1 as usize + 1
    } else {
      rest.len()
    };
    if len == 0 || rest.len() < len {
      return Err(EntropyError::TruncatedStream);
    }
    let (tile, tail) = rest.split_at(len);
    tiles.push(tile);
    rest = tail;
  }
  Ok(tiles)
}

#[cfg(test)]
mod test {
  use super::*;
  use pretty_assertions::assert_eq;

  fn header_roundtrip(
    fp: FrameEntropyParams, intra_only: bool, layout: TileLayout,
  ) -> (FrameEntropyParams, TileLayout) {
    let mut buf = Vec::new();
    {
      let mut bw = BitWriter::endian(&mut buf, BigEndian);
      bw.write_entropy_header(&fp, intra_only, layout).unwrap();
      bw.byte_align().unwrap();
    }
    let mut br = BitReader::endian(buf.as_slice(), BigEndian);
    br.read_entropy_header(intra_only, layout.tiles_log2).unwrap()
  }

  #[test]
  fn inter_header() {
    let fp = FrameEntropyParams {
      primary_ref_frame: 3,
      ref_frame_idx: [7, 6, 5, 4, 3, 2, 1],
      refresh_frame_flags: 0b0100_0010,
      disable_cdf_update: false,
      disable_frame_end_update_cdf: false,
      context_update_tile_id: 5,
    };
    let layout = TileLayout { tiles_log2: 3, tile_size_bytes: 2 };
    assert_eq!(header_roundtrip(fp, false, layout), (fp, layout));
  }

  #[test]
  fn intra_header_without_adaptation() {
    let fp = FrameEntropyParams {
      disable_cdf_update: true,
      disable_frame_end_update_cdf: true,
      ..Default::default()
    };
    let layout = TileLayout { tiles_log2: 0, tile_size_bytes: 4 };
    assert_eq!(header_roundtrip(fp, true, layout), (fp, layout));
  }

  #[test]
  fn header_rejects_unrepresentable_fields() {
    let mut buf = Vec::new();
    let mut bw = BitWriter::endian(&mut buf, BigEndian);
    let layout = TileLayout { tiles_log2: 1, tile_size_bytes: 4 };
    let fp = FrameEntropyParams { primary_ref_frame: 0, ..Default::default() };
    assert!(bw.write_entropy_header(&fp, true, layout).is_err());
    let fp = FrameEntropyParams { context_update_tile_id: 2, ..Default::default() };
    assert!(bw.write_entropy_header(&fp, true, layout).is_err());
  }

  #[test]
  fn frozen_frame_must_skip_frame_end_update() {
    let fp =
      FrameEntropyParams { disable_cdf_update: true, ..Default::default() };
    assert_eq!(fp.validate(), Err(EntropyError::InvalidSyntax));
    let mut buf = Vec::new();
    let mut bw = BitWriter::endian(&mut buf, BigEndian);
    let layout = TileLayout { tiles_log2: 0, tile_size_bytes: 4 };
    assert!(bw.write_entropy_header(&fp, false, layout).is_err());

    // Every field the writer accepts reads back unchanged.
    for (disable_cdf_update, disable_frame_end_update_cdf) in
      [(false, false), (false, true), (true, true)]
    {
      let fp = FrameEntropyParams {
        disable_cdf_update,
        disable_frame_end_update_cdf,
        ..Default::default()
      };
      assert_eq!(header_roundtrip(fp, false, layout), (fp, layout));
    }
  }

  #[test]
  fn tile_group_framing() {
    let tiles = vec![vec![1u8; 300], vec![2u8; 1], vec![3u8; 17]];
    assert_eq!(min_tile_size_bytes(&tiles), 2);
    let body = write_tile_group(&tiles, 2).unwrap();
    assert_eq!(body.len(), 300 + 1 + 17 + 2 * 2);
    // 299 little-endian
    assert_eq!(&body[..2], &[0x2b, 0x01]);

    let parsed = parse_tile_group(&body, 3, 2).unwrap();
    assert_eq!(parsed, tiles.iter().map(|t| t.as_slice()).collect::<Vec<_>>());

    assert_eq!(write_tile_group(&tiles, 1), Err(EntropyError::InvalidSyntax));
    assert_eq!(
      parse_tile_group(&body[..body.len() - 18], 3, 2),
      Err(EntropyError::TruncatedStream)
    );
    assert_eq!(parse_tile_group(&body[..1], 3, 2), Err(EntropyError::TruncatedStream));
  }
}
