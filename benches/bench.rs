// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use av1_entropy::context::{Block, BlockContext};
use av1_entropy::ec::{Reader, Writer, WriterEncoder};
use av1_entropy::partition::{MotionVector, MvSubpelPrecision};
use av1_entropy::predict::PredictionMode;
use av1_entropy::util::{cdf_from_counts, update_cdf};
use av1_entropy::*;
use criterion::*;
use num_traits::FromPrimitive;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

const SYMBOLS: usize = 8192;

fn init_symbols() -> (Vec<[u16; 9]>, Vec<(usize, u32)>) {
  let mut ra = ChaChaRng::from_seed([0; 32]);
  let models = (0..16)
    .map(|_| {
      let counts: Vec<u32> = (0..8).map(|_| ra.gen_range(0..256)).collect();
      cdf_from_counts(&counts).unwrap()
    })
    .collect();
  let program =
    (0..SYMBOLS).map(|_| (ra.gen_range(0..16), ra.gen_range(0..8))).collect();
  (models, program)
}

fn encode_symbols(models: &[[u16; 9]], program: &[(usize, u32)]) -> Vec<u8> {
  let mut models = models.to_vec();
  let mut w = WriterEncoder::new();
  for &(m, s) in program {
    w.symbol(s, &models[m]);
    update_cdf(&mut models[m], s);
  }
  w.done()
}

pub fn symbol_encode(c: &mut Criterion) {
  let (models, program) = init_symbols();
  let mut group = c.benchmark_group("symbol");
  group.throughput(Throughput::Elements(SYMBOLS as u64));
  group.bench_function("encode", |b| {
    b.iter(|| encode_symbols(black_box(&models), black_box(&program)))
  });
  let buf = encode_symbols(&models, &program);
  group.bench_function("decode", |b| {
    b.iter(|| {
      let mut models = models.clone();
      let mut r = Reader::new(black_box(&buf));
      for &(m, _) in &program {
        let s = r.symbol(&models[m]).unwrap();
        update_cdf(&mut models[m], s);
      }
    })
  });
  group.finish();
}

pub fn bool_encode(c: &mut Criterion) {
  let mut ra = ChaChaRng::from_seed([1; 32]);
  let bits: Vec<(bool, u16)> =
    (0..SYMBOLS).map(|_| (ra.gen(), ra.gen_range(1..32768))).collect();
  c.bench_function("bool_encode", move |b| {
    b.iter(|| {
      let mut w = WriterEncoder::new();
      for &(val, f) in &bits {
        w.bool(val, f);
      }
      w.done()
    })
  });
}

fn init_blocks() -> Vec<(bool, PredictionMode, MotionVector)> {
  let mut ra = ChaChaRng::from_seed([2; 32]);
  (0..1024)
    .map(|_| {
      (
        ra.gen(),
        PredictionMode::from_u32(ra.gen_range(0..13)).unwrap(),
        MotionVector { row: ra.gen_range(-512..512), col: ra.gen_range(-512..512) },
      )
    })
    .collect()
}

pub fn block_syntax(c: &mut Criterion) {
  let blocks = init_blocks();
  let slots = ReferenceSlots::new();
  let params = FrameEntropyParams::default();
  let above = Block::default();
  let bc = BlockContext::new(Some(&above), Some(&above));
  let enc = encoder::begin_frame(params, &slots).unwrap();

  let code = |ts: &mut TileEncoder| -> Result<()> {
    for &(skip, mode, mv) in &blocks {
      ts.cw.write_skip(&mut ts.w, &bc, skip);
      ts.cw.write_intra_mode_kf(&mut ts.w, &bc, mode)?;
      ts.cw.write_mv(
        &mut ts.w,
        mv,
        MotionVector::default(),
        MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION,
      )?;
    }
    Ok(())
  };

  c.bench_function("block_syntax_encode", |b| {
    b.iter(|| {
      let mut ts = enc.begin_tile(0);
      code(&mut ts).unwrap();
      ts.finish().unwrap()
    })
  });

  let mut ts = enc.begin_tile(0);
  code(&mut ts).unwrap();
  let (buf, _) = ts.finish().unwrap();
  let dec = decoder::begin_frame(params, &slots).unwrap();
  c.bench_function("block_syntax_decode", |b| {
    b.iter(|| {
      let mut td = dec.begin_tile(0, &buf);
      for _ in 0..blocks.len() {
        td.cr.read_skip(&mut td.r, &bc).unwrap();
        td.cr.read_intra_mode_kf(&mut td.r, &bc).unwrap();
        td.cr
          .read_mv(
            &mut td.r,
            MotionVector::default(),
            MvSubpelPrecision::MV_SUBPEL_HIGH_PRECISION,
          )
          .unwrap();
      }
      td.finish()
    })
  });
}

pub fn frame_tiles(c: &mut Criterion) {
  let slots = ReferenceSlots::new();
  let enc =
    encoder::begin_frame(FrameEntropyParams::default(), &slots).unwrap();
  c.bench_function("encode_tiles_16", |b| {
    b.iter(|| {
      enc
        .encode_tiles(16, |ts| {
          for i in 0..512 {
            ts.literal(8, i & 0xff)?;
            ts.subexp_fin(1024, 3, i * 2)?;
          }
          Ok(())
        })
        .unwrap()
    })
  });
}

criterion_group!(ec, symbol_encode, bool_encode);
criterion_group!(syntax, block_syntax, frame_tiles);
criterion_main!(ec, syntax);
