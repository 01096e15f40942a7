// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! The same non-adaptive codes as the range coder's, written as plain bits
//! for uncompressed header fields.

use super::*;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io;

fn bad_value() -> io::Error {
  io::Error::new(io::ErrorKind::InvalidData, "value outside of its code")
}

pub trait BCodeWriter {
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_quniform(&mut self, n: u32, v: u32) -> io::Result<()>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_subexpfin(&mut self, n: u32, k: u8, v: u32) -> io::Result<()>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_refsubexpfin(
    &mut self, n: u32, k: u8, r: u32, v: u32,
  ) -> io::Result<()>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_s_refsubexpfin(
    &mut self, n: u32, k: u8, r: i32, v: i32,
  ) -> io::Result<()>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_uvlc(&mut self, v: u32) -> io::Result<()>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the writer cannot be written to.
  fn write_refbilevel(
    &mut self, n: u32, p: u32, r: u32, v: u32,
  ) -> io::Result<()>;
}

pub trait BCodeReader {
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_quniform(&mut self, n: u32) -> io::Result<u32>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_subexpfin(&mut self, n: u32, k: u8) -> io::Result<u32>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_refsubexpfin(&mut self, n: u32, k: u8, r: u32) -> io::Result<u32>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_s_refsubexpfin(&mut self, n: u32, k: u8, r: i32) -> io::Result<i32>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input or the
  ///   code is longer than 32 bits.
  fn read_uvlc(&mut self) -> io::Result<u32>;
  /// # Errors
  ///
  /// - Returns `std::io::Error` if the reader runs out of input.
  fn read_refbilevel(&mut self, n: u32, p: u32, r: u32) -> io::Result<u32>;
}

impl<W: io::Write> BCodeWriter for BitWriter<W, BigEndian> {
  fn write_quniform(&mut self, n: u32, v: u32) -> io::Result<()> {
    if n <= 1 {
      return Ok(());
    }
    if v >= n {
      return Err(bad_value());
    }
    let (l, m) = quniform_split(n);
    if v < m {
      self.write(l - 1, v)
    } else {
      self.write(l - 1, m + ((v - m) >> 1))?;
      self.write_bit((v - m) & 1 == 1)
    }
  }
  fn write_subexpfin(&mut self, n: u32, k: u8, v: u32) -> io::Result<()> {
    let (n64, v64) = (u64::from(n), u64::from(v));
    let mut i = 0;
    let mut mk = 0;
    loop {
      let b = subexp_bits(i, u32::from(k));
      let a = 1u64 << b;
      if n64 <= mk + 3 * a {
        return self.write_quniform((n64 - mk) as u32, (v64 - mk) as u32);
      }
      let t = v64 >= mk + a;
      self.write_bit(t)?;
      if t {
        i += 1;
        mk += a;
      } else if b > 0 {
        return self.write(b, (v64 - mk) as u32);
      } else {
        return Ok(());
      }
    }
  }
  fn write_refsubexpfin(
    &mut self, n: u32, k: u8, r: u32, v: u32,
  ) -> io::Result<()> {
    if r >= n || v >= n {
      return Err(bad_value());
    }
    self.write_subexpfin(n, k, recenter_finite_nonneg(n, r, v))
  }
  fn write_s_refsubexpfin(
    &mut self, n: u32, k: u8, r: i32, v: i32,
  ) -> io::Result<()> {
    let off = n as i32 - 1;
    self.write_refsubexpfin((n << 1) - 1, k, (r + off) as u32, (v + off) as u32)
  }
  fn write_uvlc(&mut self, v: u32) -> io::Result<()> {
    if v == u32::MAX {
      return self.write(32, 0u32);
    }
    let x = v + 1;
    let lz = 31 - x.leading_zeros();
    if lz > 0 {
      self.write(lz, 0u32)?;
    }
    self.write(lz + 1, x)
  }
  fn write_refbilevel(
    &mut self, n: u32, p: u32, r: u32, v: u32,
  ) -> io::Result<()> {
    if n <= 1 {
      return Ok(());
    }
    if p == 0 || p > n || r >= n || v >= n {
      return Err(bad_value());
    }
    let (lolimit, hilimit) = refbilevel_window(n, p, r);
    if v >= lolimit && v <= hilimit {
      self.write_bit(true)?;
      self.write_quniform(p, v - lolimit)
    } else {
      self.write_bit(false)?;
      self.write_quniform(n - p, if v > hilimit { v - p } else { v })
    }
  }
}

impl<R: io::Read> BCodeReader for BitReader<R, BigEndian> {
  fn read_quniform(&mut self, n: u32) -> io::Result<u32> {
    if n <= 1 {
      return Ok(0);
    }
    let (l, m) = quniform_split(n);
    let v: u32 = if l > 1 { self.read(l - 1)? } else { 0 };
    if v < m {
      Ok(v)
    } else {
      Ok((v << 1) - m + u32::from(self.read_bit()?))
    }
  }
  fn read_subexpfin(&mut self, n: u32, k: u8) -> io::Result<u32> {
    let n64 = u64::from(n);
    let mut i = 0;
    let mut mk = 0u64;
    loop {
      let b = subexp_bits(i, u32::from(k));
      let a = 1u64 << b;
      if n64 <= mk + 3 * a {
        return Ok(self.read_quniform((n64 - mk) as u32)? + mk as u32);
      }
      if self.read_bit()? {
        i += 1;
        mk += a;
      } else {
        let v: u32 = if b > 0 { self.read(b)? } else { 0 };
        return Ok(v + mk as u32);
      }
    }
  }
  fn read_refsubexpfin(&mut self, n: u32, k: u8, r: u32) -> io::Result<u32> {
    let v = self.read_subexpfin(n, k)?;
    Ok(inv_recenter_finite_nonneg(n, r, v))
  }
  fn read_s_refsubexpfin(&mut self, n: u32, k: u8, r: i32) -> io::Result<i32> {
    let off = n as i32 - 1;
    let v = self.read_refsubexpfin((n << 1) - 1, k, (r + off) as u32)?;
    Ok(v as i32 - off)
  }
  fn read_uvlc(&mut self) -> io::Result<u32> {
    let mut leading_zeros = 0;
    while leading_zeros < 32 && !self.read_bit()? {
      leading_zeros += 1;
    }
    if leading_zeros == 32 {
      return Ok(u32::MAX);
    }
    let value: u32 =
      if leading_zeros > 0 { self.read(leading_zeros)? } else { 0 };
    Ok((1u32 << leading_zeros) - 1 + value)
  }
  fn read_refbilevel(&mut self, n: u32, p: u32, r: u32) -> io::Result<u32> {
    if n <= 1 {
      return Ok(0);
    }
    if p == 0 || p > n || r >= n {
      return Err(bad_value());
    }
    let (lolimit, _) = refbilevel_window(n, p, r);
    if self.read_bit()? {
      Ok(self.read_quniform(p)? + lolimit)
    } else {
      let v = self.read_quniform(n - p)?;
      Ok(if v >= lolimit { v + p } else { v })
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use bitstream_io::BitWriter;

  fn with_writer(f: impl FnOnce(&mut BitWriter<&mut Vec<u8>, BigEndian>)) -> Vec<u8> {
    let mut buf = Vec::new();
    {
      let mut bw = BitWriter::endian(&mut buf, BigEndian);
      f(&mut bw);
      bw.byte_align().unwrap();
    }
    buf
  }

  #[test]
  fn uvlc_bit_patterns() {
    // 0 -> "1", 1 -> "010", 4 -> "00101"
    let buf = with_writer(|bw| {
      bw.write_uvlc(0).unwrap();
      bw.write_uvlc(1).unwrap();
      bw.write_uvlc(4).unwrap();
    });
    assert_eq!(buf, vec![0b1010_0010, 0b1000_0000]);

    let mut br = BitReader::endian(buf.as_slice(), BigEndian);
    assert_eq!(br.read_uvlc().unwrap(), 0);
    assert_eq!(br.read_uvlc().unwrap(), 1);
    assert_eq!(br.read_uvlc().unwrap(), 4);
  }

  #[test]
  fn signed_refsubexpfin_roundtrip() {
    let mut cases = Vec::new();
    let buf = with_writer(|bw| {
      for r in -16..=16 {
        for v in (-16..=16).step_by(5) {
          bw.write_s_refsubexpfin(17, 2, r, v).unwrap();
          cases.push((r, v));
        }
      }
      bw.write_uvlc(u32::MAX).unwrap();
      bw.write_subexpfin(1 << 20, 3, 777_777).unwrap();
      bw.write_refbilevel(50, 8, 3, 40).unwrap();
      bw.write_refbilevel(50, 8, 47, 46).unwrap();
    });
    let mut br = BitReader::endian(buf.as_slice(), BigEndian);
    for &(r, v) in &cases {
      assert_eq!(br.read_s_refsubexpfin(17, 2, r).unwrap(), v);
    }
    assert_eq!(br.read_uvlc().unwrap(), u32::MAX);
    assert_eq!(br.read_subexpfin(1 << 20, 3).unwrap(), 777_777);
    assert_eq!(br.read_refbilevel(50, 8, 3).unwrap(), 40);
    assert_eq!(br.read_refbilevel(50, 8, 47).unwrap(), 46);
  }

  #[test]
  fn quniform_rejects_out_of_range() {
    let mut buf = Vec::new();
    let mut bw = BitWriter::endian(&mut buf, BigEndian);
    assert!(bw.write_quniform(5, 5).is_err());
  }
}
