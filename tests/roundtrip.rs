// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use av1_entropy::context::{BlockContext, Block};
use av1_entropy::ec::{Reader, Writer, WriterEncoder};
use av1_entropy::header::*;
use av1_entropy::partition::{
  BlockSize, MotionVector, MvSubpelPrecision, PartitionType,
};
use av1_entropy::predict::PredictionMode;
use av1_entropy::util::{cdf_from_counts, cdf_is_consistent, update_cdf};
use av1_entropy::*;
use bitstream_io::{BigEndian, BitReader, BitWrite, BitWriter};
use interpolate_name::interpolate_test;
use num_traits::FromPrimitive;
use pretty_assertions::assert_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use std::sync::Arc;

fn key_frame() -> (FrameEncoder, FrameDecoder) {
  let slots = ReferenceSlots::new();
  let params = FrameEntropyParams::default();
  (
    encoder::begin_frame(params, &slots).unwrap(),
    decoder::begin_frame(params, &slots).unwrap(),
  )
}

#[test]
fn midpoint_bool() {
  let mut w = WriterEncoder::new();
  let start = w.tell();
  w.bool(false, 16384);
  let coded = w.tell();
  let buf = w.done();
  // EC_MIN_PROB shrinks the zero symbol's range just below half.
  assert_eq!(coded - start, 2);

  let mut r = Reader::new(&buf);
  let start_r = r.tell();
  assert!(!r.bool(16384).unwrap());
  assert_eq!(start_r, start);
  assert_eq!(r.tell(), coded);
}

#[test]
fn bool_roundtrip_every_probability() {
  let mut rng = ChaChaRng::from_seed([1; 32]);
  let bits: Vec<(u16, bool)> =
    (1..32768u16).flat_map(|f| [(f, rng.gen()), (f, rng.gen())]).collect();

  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  for &(f, b) in &bits {
    ts.bool(b, f).unwrap();
  }
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  for &(f, b) in &bits {
    assert_eq!(td.decode_bool(f).unwrap(), b);
  }
}

#[test]
fn uniform_three_symbols() {
  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  let mut cdf = [32768 - 10923, 32768 - 21845, 0, 0];
  for s in [0, 1, 2, 0] {
    ts.symbol_with_update(s, &mut cdf).unwrap();
  }
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  let mut dcdf = [32768 - 10923, 32768 - 21845, 0, 0];
  let decoded: Vec<u32> = (0..4)
    .map(|_| td.decode_symbol_with_update(&mut dcdf).unwrap())
    .collect();
  assert_eq!(decoded, vec![0, 1, 2, 0]);
  assert_eq!(cdf, dcdf);
}

#[test]
fn caller_cdf_survives_long_runs() {
  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  let mut cdf = [32768 - 12000, 32768 - 22000, 0, 0];
  for _ in 0..2000 {
    ts.symbol_with_update(0, &mut cdf).unwrap();
  }
  // Adaptation has merged both breakpoints.
  assert_eq!(cdf, [63, 63, 0, 32]);
  ts.symbol_with_update(2, &mut cdf).unwrap();
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  let mut dcdf = [32768 - 12000, 32768 - 22000, 0, 0];
  for _ in 0..2000 {
    assert_eq!(td.decode_symbol_with_update(&mut dcdf).unwrap(), 0);
  }
  assert_eq!(td.decode_symbol_with_update(&mut dcdf).unwrap(), 2);
  assert_eq!(cdf, dcdf);
}

fn random_cdf(rng: &mut ChaChaRng) -> [u16; 17] {
  // Zero counts still leave every symbol codable.
  let counts: Vec<u32> = (0..16).map(|_| rng.gen_range(0..500)).collect();
  cdf_from_counts(&counts).unwrap()
}

#[test]
fn interleaved_adaptive_symbols() {
  let mut rng = ChaChaRng::from_seed([2; 32]);
  let models: Vec<[u16; 17]> = (0..8).map(|_| random_cdf(&mut rng)).collect();
  let program: Vec<(usize, u32)> =
    (0..4000).map(|_| (rng.gen_range(0..8), rng.gen_range(0..16))).collect();

  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  let mut enc_models = models.clone();
  for &(m, s) in &program {
    ts.symbol_with_update(s, &mut enc_models[m]).unwrap();
    assert!(cdf_is_consistent(&enc_models[m]));
  }
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  let mut dec_models = models;
  for &(m, s) in &program {
    assert_eq!(td.decode_symbol_with_update(&mut dec_models[m]).unwrap(), s);
  }
  assert_eq!(enc_models, dec_models);
}

#[test]
fn adaptation_stays_consistent() {
  let mut rng = ChaChaRng::from_seed([3; 32]);
  for _ in 0..200 {
    let mut cdf = random_cdf(&mut rng);
    for _ in 0..100 {
      update_cdf(&mut cdf, rng.gen_range(0..16));
      assert!(cdf_is_consistent(&cdf));
    }
  }
}

#[test]
fn refsubexpfin_example() {
  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  ts.refsubexp_fin(8000, 3, 1234, 5678).unwrap();
  let (buf, _) = ts.finish().unwrap();
  let mut td = dec.begin_tile(0, &buf);
  assert_eq!(td.decode_refsubexp_fin(8000, 3, 1234).unwrap(), 5678);
}

#[interpolate_test(n_1, 1)]
#[interpolate_test(n_2, 2)]
#[interpolate_test(n_7, 7)]
#[interpolate_test(n_64, 64)]
#[interpolate_test(n_1000, 1000)]
#[interpolate_test(n_8000, 8000)]
#[interpolate_test(n_65536, 65536)]
fn subexp_codes(n: u32) {
  let mut rng = ChaChaRng::from_seed([n as u8; 32]);
  let mut cases = Vec::new();
  for k in 0..=6u8 {
    for _ in 0..64 {
      let r = rng.gen_range(0..n);
      let v = rng.gen_range(0..n);
      let p = rng.gen_range(1..=n);
      cases.push((k, r, v, p));
    }
    cases.push((k, 0, n - 1, 1));
    cases.push((k, n - 1, 0, n));
  }

  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  for &(k, r, v, p) in &cases {
    ts.subexp_fin(n, k, v).unwrap();
    ts.refsubexp_fin(n, k, r, v).unwrap();
    ts.refbilevel(n, p, r, v).unwrap();
    ts.subexp(k, v).unwrap();
  }
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  for &(k, r, v, p) in &cases {
    assert_eq!(td.decode_subexp_fin(n, k).unwrap(), v);
    assert_eq!(td.decode_refsubexp_fin(n, k, r).unwrap(), v);
    assert_eq!(td.decode_refbilevel(n, p, r).unwrap(), v);
    assert_eq!(td.decode_subexp(k).unwrap(), v);
  }
}

#[test]
fn literals_and_uvlc() {
  let mut rng = ChaChaRng::from_seed([4; 32]);
  let values: Vec<(u8, u32)> = (0..500)
    .map(|_| {
      let bits = rng.gen_range(1..=32u8);
      (bits, rng.gen::<u32>() >> (32 - bits))
    })
    .collect();
  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  for &(bits, v) in &values {
    ts.literal(bits, v).unwrap();
    ts.uvlc(v).unwrap();
  }
  let (buf, _) = ts.finish().unwrap();
  let mut td = dec.begin_tile(0, &buf);
  for &(bits, v) in &values {
    assert_eq!(td.decode_literal(bits).unwrap(), v);
    assert_eq!(td.decode_uvlc().unwrap(), v);
  }
}

/// A deterministic run of block syntax for one tile.
#[derive(Clone, Copy, Debug)]
enum Element {
  Partition(PartitionType),
  Skip(bool),
  KfMode(PredictionMode),
  DeltaQ(i32),
  Mv(MotionVector),
}

fn block_syntax(seed: u8, len: usize) -> Vec<Element> {
  let mut rng = ChaChaRng::from_seed([seed; 32]);
  (0..len)
    .map(|_| match rng.gen_range(0..5) {
      0 => Element::Partition(
        PartitionType::from_u32(rng.gen_range(0..10)).unwrap(),
      ),
      1 => Element::Skip(rng.gen()),
      2 => Element::KfMode(PredictionMode::from_u32(rng.gen_range(0..13)).unwrap()),
      3 => Element::DeltaQ(rng.gen_range(-40..=40)),
      _ => Element::Mv(MotionVector {
        row: rng.gen_range(-1024..=1024) * 2,
        col: rng.gen_range(-1024..=1024) * 2,
      }),
    })
    .collect()
}

fn encode_elements(ts: &mut TileEncoder, elements: &[Element]) -> Result<()> {
  let above = Block { skip: true, ..Default::default() };
  let bc = BlockContext::new(Some(&above), None);
  for &e in elements {
    match e {
      Element::Partition(p) => ts.cw.write_partition(
        &mut ts.w,
        0,
        1,
        p,
        BlockSize::BLOCK_64X64,
        true,
        true,
      )?,
      Element::Skip(skip) => ts.cw.write_skip(&mut ts.w, &bc, skip),
      Element::KfMode(mode) => ts.cw.write_intra_mode_kf(&mut ts.w, &bc, mode)?,
      Element::DeltaQ(d) => ts.cw.write_delta_qindex(&mut ts.w, d)?,
      Element::Mv(mv) => ts.cw.write_mv(
        &mut ts.w,
        mv,
        MotionVector::default(),
        MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION,
      )?,
    }
  }
  Ok(())
}

fn decode_elements(td: &mut TileDecoder, elements: &[Element]) -> Result<()> {
  let above = Block { skip: true, ..Default::default() };
  let bc = BlockContext::new(Some(&above), None);
  for &e in elements {
    match e {
      Element::Partition(p) => assert_eq!(
        td.cr.read_partition(&mut td.r, 0, 1, BlockSize::BLOCK_64X64, true, true)?,
        p
      ),
      Element::Skip(skip) => assert_eq!(td.cr.read_skip(&mut td.r, &bc)?, skip),
      Element::KfMode(mode) => {
        assert_eq!(td.cr.read_intra_mode_kf(&mut td.r, &bc)?, mode)
      }
      Element::DeltaQ(d) => assert_eq!(td.cr.read_delta_qindex(&mut td.r)?, d),
      Element::Mv(mv) => assert_eq!(
        td.cr.read_mv(
          &mut td.r,
          MotionVector::default(),
          MvSubpelPrecision::MV_SUBPEL_LOW_PRECISION,
        )?,
        mv
      ),
    }
  }
  Ok(())
}

#[test]
fn syntax_adaptation_matches() {
  let elements = block_syntax(5, 3000);
  let (enc, dec) = key_frame();
  let mut ts = enc.begin_tile(0);
  encode_elements(&mut ts, &elements).unwrap();
  let (buf, enc_state) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf);
  decode_elements(&mut td, &elements).unwrap();
  let dec_state = td.finish();
  assert_eq!(enc_state.fc.as_slice(), dec_state.fc.as_slice());
  assert!(enc_state.fc.as_slice() != enc.state().fc.as_slice());
}

#[test]
fn tiles_are_independent() {
  let programs: Vec<Vec<Element>> =
    (0..4).map(|t| block_syntax(10 + t as u8, 500 + 100 * t)).collect();
  let (enc, dec) = key_frame();

  let parallel = enc
    .encode_tiles(programs.len(), |ts| encode_elements(ts, &programs[ts.tile_id()]))
    .unwrap();
  let serial: Vec<(Vec<u8>, TileEntropyState)> = programs
    .iter()
    .enumerate()
    .map(|(t, p)| {
      let mut ts = enc.begin_tile(t);
      encode_elements(&mut ts, p).unwrap();
      ts.finish().unwrap()
    })
    .collect();
  assert_eq!(parallel, serial);

  // Changing tile 0 leaves tile 1's payload alone.
  let mut ts = enc.begin_tile(0);
  encode_elements(&mut ts, &block_syntax(99, 50)).unwrap();
  assert!(ts.finish().unwrap().0 != serial[0].0);
  let mut ts = enc.begin_tile(1);
  encode_elements(&mut ts, &programs[1]).unwrap();
  assert_eq!(ts.finish().unwrap().0, serial[1].0);

  let payloads: Vec<&[u8]> = parallel.iter().map(|(b, _)| b.as_slice()).collect();
  let decoded = dec
    .decode_tiles(&payloads, |td| decode_elements(td, &programs[td.tile_id()]))
    .unwrap();
  for ((_, e), (_, d)) in parallel.iter().zip(decoded.iter()) {
    assert_eq!(e, d);
  }
}

#[test]
fn reference_inheritance() {
  let mut saved = FrameEntropyState::default();
  saved.fc.skip_cdfs[0][0] = 5000;
  let mut slots = ReferenceSlots::new();
  slots.refresh(1 << 4, Arc::new(saved.clone()));

  let params = FrameEntropyParams {
    primary_ref_frame: 0,
    ref_frame_idx: [4, 0, 0, 0, 0, 0, 0],
    refresh_frame_flags: 1 << 2,
    ..Default::default()
  };
  let enc = encoder::begin_frame(params, &slots).unwrap();
  assert_eq!(enc.state(), &saved);

  let mut ts = enc.begin_tile(0);
  ts.cw.write_intrabc(&mut ts.w, true);
  let (_, tile) = ts.finish().unwrap();
  assert_eq!(tile.fc.skip_cdfs[0][0], 5000);
  assert!(tile.fc.intrabc_cdf != saved.fc.intrabc_cdf);

  enc.finish(tile.clone(), &mut slots).unwrap();
  assert_eq!(slots.get(2).unwrap().fc.intrabc_cdf[..2], tile.fc.intrabc_cdf[..2]);
  assert_eq!(slots.get(2).unwrap().fc.intrabc_cdf[2], 0);
  assert_eq!(slots.get(4), Some(&saved));

  let missing = FrameEntropyParams { ref_frame_idx: [6; 7], ..params };
  assert_eq!(
    encoder::begin_frame(missing, &slots).err(),
    Some(EntropyError::MissingReference { slot: 6 })
  );
}

#[test]
fn truncated_stream() {
  let (enc, dec) = key_frame();
  let elements = block_syntax(7, 400);
  let mut ts = enc.begin_tile(0);
  encode_elements(&mut ts, &elements).unwrap();
  let (buf, _) = ts.finish().unwrap();

  let mut td = dec.begin_tile(0, &buf[..buf.len() / 3]);
  assert_eq!(
    decode_elements(&mut td, &elements),
    Err(EntropyError::TruncatedStream)
  );
}

#[test]
fn tile_budget() {
  let (enc, _) = key_frame();
  let enc = enc.with_tile_limit(16);
  let res = enc.encode_tiles(1, |ts| encode_elements(ts, &block_syntax(8, 400)));
  assert_eq!(res, Err(EntropyError::WriterOverflow { limit: 16 }));
}

#[test]
fn two_frames_through_headers() {
  let mut enc_slots = ReferenceSlots::new();
  let mut dec_slots = ReferenceSlots::new();
  let layout = TileLayout { tiles_log2: 1, tile_size_bytes: 4 };
  let frames = [
    (
      true,
      FrameEntropyParams { context_update_tile_id: 1, ..Default::default() },
    ),
    (
      false,
      FrameEntropyParams {
        primary_ref_frame: 1,
        ref_frame_idx: [3, 5, 0, 0, 0, 0, 0],
        refresh_frame_flags: 1,
        ..Default::default()
      },
    ),
  ];

  for (i, &(intra_only, params)) in frames.iter().enumerate() {
    let programs: Vec<Vec<Element>> =
      (0..2).map(|t| block_syntax((i * 2 + t) as u8, 300)).collect();
    let enc = encoder::begin_frame(params, &enc_slots).unwrap();
    let mut tiles = enc
      .encode_tiles(2, |ts| encode_elements(ts, &programs[ts.tile_id()]))
      .unwrap();
    let payloads: Vec<Vec<u8>> = tiles.iter().map(|(b, _)| b.clone()).collect();
    let layout =
      TileLayout { tile_size_bytes: min_tile_size_bytes(&payloads), ..layout };

    let mut buf = Vec::new();
    {
      let mut bw = BitWriter::endian(&mut buf, BigEndian);
      bw.write_entropy_header(&params, intra_only, layout).unwrap();
      bw.byte_align().unwrap();
    }
    let header_len = buf.len();
    buf.extend(write_tile_group(&payloads, layout.tile_size_bytes).unwrap());
    let chosen = tiles.swap_remove(params.context_update_tile_id).1;
    enc.finish(chosen, &mut enc_slots).unwrap();

    let mut br = BitReader::endian(&buf[..header_len], BigEndian);
    let (dparams, dlayout) =
      br.read_entropy_header(intra_only, layout.tiles_log2).unwrap();
    assert_eq!((dparams, dlayout), (params, layout));
    let dtiles = parse_tile_group(
      &buf[header_len..],
      dlayout.num_tiles(),
      dlayout.tile_size_bytes,
    )
    .unwrap();
    let dec = decoder::begin_frame(dparams, &dec_slots).unwrap();
    let mut decoded = dec
      .decode_tiles(&dtiles, |td| decode_elements(td, &programs[td.tile_id()]))
      .unwrap();
    let chosen = decoded.swap_remove(dparams.context_update_tile_id).1;
    dec.finish(chosen, &mut dec_slots).unwrap();
  }

  for slot in 0..8 {
    assert_eq!(enc_slots.get(slot), dec_slots.get(slot));
  }
  assert!(enc_slots.get(0) != enc_slots.get(3));
}
