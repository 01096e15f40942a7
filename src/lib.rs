// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! The AV1 symbol coder.
//!
//! This crate holds the entropy coding core of an AV1 codec: the range
//! coder and its non-adaptive integer codes, the adaptive CDF tables and
//! their update rule, the context functions and coding of the block level
//! syntax elements, and the frame and tile lifecycle that decides which
//! CDFs every tile starts from and which ones future frames inherit.
//!
//! A frame is coded by calling [`encoder::begin_frame`], coding each tile
//! through a [`TileEncoder`] and handing the chosen tile's final state to
//! [`FrameEncoder::finish`]. Decoding mirrors this through [`decoder`].

#![deny(bare_trait_objects)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_ptr_alignment)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::verbose_bit_mask)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::range_plus_one)]
#![warn(clippy::expl_impl_clone_on_copy)]
#![warn(clippy::linkedlist)]
#![warn(clippy::map_flatten)]
#![warn(clippy::mem_forget)]
#![warn(clippy::mut_mut)]
#![warn(clippy::mutex_integer)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_continue)]
#![warn(clippy::path_buf_push_overwrite)]
#![warn(clippy::range_minus_one)]

#[macro_use]
pub mod util;

pub mod context;
pub mod decoder;
pub mod ec;
pub mod encoder;
pub mod entropymode;
pub mod error;
pub mod frame;
pub mod header;
pub mod partition;
pub mod predict;
pub mod transform;

#[cfg(fuzzing)]
pub mod fuzzing;

pub use crate::decoder::{FrameDecoder, TileDecoder};
pub use crate::encoder::{FrameEncoder, TileEncoder};
pub use crate::error::{EntropyError, Result};
pub use crate::frame::{
  FrameEntropyParams, FrameEntropyState, ReferenceSlots, TileEntropyState,
  PRIMARY_REF_NONE,
};
