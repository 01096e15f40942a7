// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use libfuzzer_sys::arbitrary::{Arbitrary, Error, Unstructured};

use crate::context::BlockContext;
use crate::decoder;
use crate::encoder;
use crate::frame::{FrameEntropyParams, ReferenceSlots};
use crate::partition::{BlockSize, MotionVector, MvSubpelPrecision};
use crate::util::cdf_from_counts;

// Adding new fuzz targets
//
// 1. Add a function to this file which looks like this:
//
//    pub fn fuzz_something(data: Data) {
//      // Invoke everything you need.
//      //
//      // Your function may accept a value of any type that implements
//      // Arbitrary. Derive Debug for the structures you create with
//      // arbitrary data.
//    }
//
// 2. cargo fuzz add something
// 3. Copy the contents of any other .rs file from fuzz/fuzz_targets/ into the
//    newly created fuzz/fuzz_targets/something.rs and change the function
//    being called to fuzz_something.

/// One primitive coding operation of a symbol program.
#[derive(Debug, Clone)]
pub enum SymbolOp {
  Bool { f: u16, val: bool },
  Symbol { cdf: [u16; 9], s: u32, adapt: bool },
  Literal { bits: u8, s: u32 },
  Uvlc(u32),
  Subexp { k: u8, v: u32 },
  SubexpFin { n: u32, k: u8, v: u32 },
  RefSubexpFin { n: u32, k: u8, r: u32, v: u32 },
  RefBilevel { n: u32, p: u32, r: u32, v: u32 },
  Skip(bool),
  DeltaQ(i32),
}

impl Arbitrary<'_> for SymbolOp {
  fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, Error> {
    Ok(match u.int_in_range(0..=9)? {
      0 => SymbolOp::Bool {
        f: u.int_in_range(1..=32767)?,
        val: Arbitrary::arbitrary(u)?,
      },
      1 => {
        let counts: [u32; 8] = [
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
          u.int_in_range(1..=1000)?,
        ];
        let cdf = cdf_from_counts(&counts).map_err(|_| Error::IncorrectFormat)?;
        SymbolOp::Symbol {
          cdf,
          s: u.int_in_range(0..=7)?,
          adapt: Arbitrary::arbitrary(u)?,
        }
      }
      2 => {
        let bits = u.int_in_range(0..=32)?;
        let s: u32 = Arbitrary::arbitrary(u)?;
        let s = if bits == 32 { s } else { s & ((1 << bits) - 1) };
        SymbolOp::Literal { bits, s }
      }
      3 => SymbolOp::Uvlc(u.int_in_range(0..=u32::MAX - 1)?),
      4 => SymbolOp::Subexp {
        k: u.int_in_range(0..=8)?,
        v: u.int_in_range(0..=1 << 20)?,
      },
      5 => {
        let n = u.int_in_range(1..=1 << 16)?;
        SymbolOp::SubexpFin {
          n,
          k: u.int_in_range(0..=10)?,
          v: u.int_in_range(0..=n - 1)?,
        }
      }
      6 => {
        let n = u.int_in_range(1..=1 << 16)?;
        SymbolOp::RefSubexpFin {
          n,
          k: u.int_in_range(0..=10)?,
          r: u.int_in_range(0..=n - 1)?,
          v: u.int_in_range(0..=n - 1)?,
        }
      }
      7 => {
        let n = u.int_in_range(1..=1 << 12)?;
        SymbolOp::RefBilevel {
          n,
          p: u.int_in_range(1..=n)?,
          r: u.int_in_range(0..=n - 1)?,
          v: u.int_in_range(0..=n - 1)?,
        }
      }
      8 => SymbolOp::Skip(Arbitrary::arbitrary(u)?),
      _ => SymbolOp::DeltaQ(u.int_in_range(-512..=512)?),
    })
  }
}

/// A frame of tiles, each coding its own sequence of operations.
#[derive(Debug)]
pub struct SymbolProgram {
  params: FrameEntropyParams,
  tiles: Vec<Vec<SymbolOp>>,
}

impl Arbitrary<'_> for SymbolProgram {
  fn arbitrary(u: &mut Unstructured<'_>) -> Result<Self, Error> {
    let n_tiles = u.int_in_range(1..=4)?;
    let frozen = Arbitrary::arbitrary(u)?;
    let params = FrameEntropyParams {
      disable_cdf_update: frozen,
      disable_frame_end_update_cdf: frozen,
      context_update_tile_id: u.int_in_range(0..=n_tiles - 1)?,
      ..Default::default()
    };
    let mut tiles = Vec::with_capacity(n_tiles);
    for _ in 0..n_tiles {
      let len = u.int_in_range(0..=256)?;
      let mut ops = Vec::with_capacity(len);
      for _ in 0..len {
        ops.push(SymbolOp::arbitrary(u)?);
      }
      tiles.push(ops);
    }
    Ok(SymbolProgram { params, tiles })
  }
}

/// Everything a program encodes must decode to itself, through the same
/// final CDFs.
pub fn fuzz_roundtrip(program: SymbolProgram) {
  let mut enc_slots = ReferenceSlots::new();
  let enc = encoder::begin_frame(program.params, &enc_slots).unwrap();
  let coded = enc
    .encode_tiles(program.tiles.len(), |ts| {
      let block = Default::default();
      for op in &program.tiles[ts.tile_id()] {
        match *op {
          SymbolOp::Bool { f, val } => ts.bool(val, f)?,
          SymbolOp::Symbol { cdf, s, adapt } => {
            if adapt {
              let mut cdf = cdf;
              ts.symbol_with_update(s, &mut cdf)?;
            } else {
              ts.symbol(s, &cdf)?
            }
          }
          SymbolOp::Literal { bits, s } => ts.literal(bits, s)?,
          SymbolOp::Uvlc(v) => ts.uvlc(v)?,
          SymbolOp::Subexp { k, v } => ts.subexp(k, v)?,
          SymbolOp::SubexpFin { n, k, v } => ts.subexp_fin(n, k, v)?,
          SymbolOp::RefSubexpFin { n, k, r, v } => {
            ts.refsubexp_fin(n, k, r, v)?
          }
          SymbolOp::RefBilevel { n, p, r, v } => ts.refbilevel(n, p, r, v)?,
          SymbolOp::Skip(skip) => {
            let bc = BlockContext::new(Some(&block), None);
            ts.cw.write_skip(&mut ts.w, &bc, skip)
          }
          SymbolOp::DeltaQ(delta) => ts.cw.write_delta_qindex(&mut ts.w, delta)?,
        }
      }
      Ok(())
    })
    .unwrap();

  let mut dec_slots = ReferenceSlots::new();
  let dec = decoder::begin_frame(program.params, &dec_slots).unwrap();
  let payloads: Vec<&[u8]> = coded.iter().map(|(buf, _)| buf.as_slice()).collect();
  let decoded = dec
    .decode_tiles(&payloads, |td| {
      let block = Default::default();
      for op in &program.tiles[td.tile_id()] {
        match *op {
          SymbolOp::Bool { f, val } => assert_eq!(td.decode_bool(f)?, val),
          SymbolOp::Symbol { cdf, s, adapt } => {
            if adapt {
              let mut cdf = cdf;
              assert_eq!(td.decode_symbol_with_update(&mut cdf)?, s);
            } else {
              assert_eq!(td.decode_symbol(&cdf)?, s);
            }
          }
          SymbolOp::Literal { bits, s } => {
            assert_eq!(td.decode_literal(bits)?, s)
          }
          SymbolOp::Uvlc(v) => assert_eq!(td.decode_uvlc()?, v),
          SymbolOp::Subexp { k, v } => assert_eq!(td.decode_subexp(k)?, v),
          SymbolOp::SubexpFin { n, k, v } => {
            assert_eq!(td.decode_subexp_fin(n, k)?, v)
          }
          SymbolOp::RefSubexpFin { n, k, r, v } => {
            assert_eq!(td.decode_refsubexp_fin(n, k, r)?, v)
          }
          SymbolOp::RefBilevel { n, p, r, v } => {
            assert_eq!(td.decode_refbilevel(n, p, r)?, v)
          }
          SymbolOp::Skip(skip) => {
            let bc = BlockContext::new(Some(&block), None);
            assert_eq!(td.cr.read_skip(&mut td.r, &bc)?, skip)
          }
          SymbolOp::DeltaQ(delta) => {
            assert_eq!(td.cr.read_delta_qindex(&mut td.r)?, delta)
          }
        }
      }
      Ok(())
    })
    .unwrap();

  for ((_, enc_ts), (_, dec_ts)) in coded.iter().zip(decoded.iter()) {
    assert_eq!(enc_ts.fc.as_slice(), dec_ts.fc.as_slice());
  }

  let tile = program.params.context_update_tile_id;
  let saved_enc = enc.finish(coded[tile].1.clone(), &mut enc_slots).unwrap();
  let saved_dec =
    dec.finish(decoded[tile].1.clone(), &mut dec_slots).unwrap();
  assert_eq!(saved_enc, saved_dec);
}

/// Arbitrary bytes must decode to values or errors, never to a panic.
pub fn fuzz_decode(data: &[u8]) {
  let dec =
    decoder::begin_frame(FrameEntropyParams::default(), &ReferenceSlots::new())
      .unwrap();
  let mut td = dec.begin_tile(0, data);
  let block = Default::default();
  let bc = BlockContext::new(Some(&block), Some(&block));
  let _ = (|| -> crate::error::Result<()> {
    loop {
      let bsize = BlockSize::BLOCK_64X64;
      td.cr.read_partition(&mut td.r, 0, 0, bsize, true, true)?;
      td.cr.read_skip(&mut td.r, &bc)?;
      td.cr.read_intra_mode_kf(&mut td.r, &bc)?;
      td.cr.read_delta_qindex(&mut td.r)?;
      td.cr.read_mv(
        &mut td.r,
        MotionVector::default(),
        MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION,
      )?;
      td.decode_uvlc()?;
      td.decode_refsubexp_fin(300, 3, 17)?;
    }
  })();
  let _ = td.finish();
}
