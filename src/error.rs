// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

use thiserror::Error;

/// Errors raised while coding symbols.
///
/// Stream errors (`TruncatedStream`, `CorruptCdf`, `CorruptSyntax`) are
/// fatal to the frame being decoded. `InvalidSymbol` and
/// `InvalidProbability` are caller bugs; they are reported instead of
/// panicking so that a bad caller cannot corrupt coder state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
#[non_exhaustive]
pub enum EntropyError {
  /// The decoder consumed more bits than the payload holds.
  #[error("truncated stream: symbol read past the end of the tile payload")]
  TruncatedStream,
  /// A CDF failed its invariants while decoding.
  #[error("corrupt CDF encountered while decoding")]
  CorruptCdf,
  /// The value to encode is outside the alphabet of its CDF.
  #[error("invalid symbol {value} (expected < {arity})")]
  InvalidSymbol { value: u32, arity: u32 },
  /// A probability or CDF passed in by the caller is malformed.
  #[error("invalid probability (expected a valid Q15 distribution)")]
  InvalidProbability,
  /// The tile payload grew beyond its byte budget.
  #[error("tile payload exceeds its {limit} byte budget")]
  WriterOverflow { limit: usize },
  /// The primary reference frame points at a slot with no saved state.
  #[error("reference slot {slot} holds no saved entropy state")]
  MissingReference { slot: usize },
  /// A value to encode cannot be expressed by its syntax element, such as
  /// an unsupported reference pair or an out of range delta.
  #[error("value cannot be expressed by its syntax element")]
  InvalidSyntax,
  /// A decoded value lies outside the domain of its syntax element.
  #[error("decoded value is outside the domain of its syntax element")]
  CorruptSyntax,
}

pub type Result<T> = std::result::Result<T, EntropyError>;

