// Copyright (c) 2017-2024, The rav1e contributors. All rights reserved
//
// This source code is subject to the terms of the BSD 2 Clause License and
// the Alliance for Open Media Patent License 1.0. If the BSD 2 Clause License
// was not distributed with this source code in the LICENSE file, you can
// obtain it at www.aomedia.org/license/software. If the Alliance for Open
// Media Patent License 1.0 was not distributed with this source code in the
// PATENTS file, you can obtain it at www.aomedia.org/license/patent.

//! Frame and tile entropy lifecycle: which CDFs a frame starts from, the
//! private copy each tile codes against, and what a finished frame leaves
//! behind for the frames that reference it.

use crate::context::CDFContext;
use crate::error::{EntropyError, Result};
use crate::partition::{INTER_REFS_PER_FRAME, REF_FRAMES};
use std::sync::Arc;

pub const PRIMARY_REF_NONE: u32 = 7;
pub const ALL_REF_FRAMES_MASK: u32 = (1 << REF_FRAMES) - 1;

/// Frame header fields that decide where entropy state comes from and
/// where it goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameEntropyParams {
  /// Index into `ref_frame_idx` of the frame whose saved CDFs seed this
  /// one, or `PRIMARY_REF_NONE` for the default tables.
  pub primary_ref_frame: u32,
  /// Reference slot of each of the seven inter references.
  pub ref_frame_idx: [u8; INTER_REFS_PER_FRAME],
  /// One bit per reference slot overwritten by this frame.
  pub refresh_frame_flags: u32,
  /// Code every symbol of the frame without adapting its CDF.
  pub disable_cdf_update: bool,
  /// Save the frame-start CDFs instead of a tile's final ones. Must be set
  /// whenever `disable_cdf_update` is.
  pub disable_frame_end_update_cdf: bool,
  /// The tile whose final state is saved at frame end.
  pub context_update_tile_id: usize,
}

impl Default for FrameEntropyParams {
  /// A key frame: default tables, every slot refreshed.
  fn default() -> Self {
    FrameEntropyParams {
      primary_ref_frame: PRIMARY_REF_NONE,
      ref_frame_idx: [0, 1, 2, 3, 4, 5, 6],
      refresh_frame_flags: ALL_REF_FRAMES_MASK,
      disable_cdf_update: false,
      disable_frame_end_update_cdf: false,
      context_update_tile_id: 0,
    }
  }
}

impl FrameEntropyParams {
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSyntax` if a field is outside the
  ///   range its header field can carry, or if `disable_cdf_update` is set
  ///   without `disable_frame_end_update_cdf`.
  pub fn validate(&self) -> Result<()> {
    if self.primary_ref_frame > PRIMARY_REF_NONE
      || self.refresh_frame_flags > ALL_REF_FRAMES_MASK
      || self.ref_frame_idx.iter().any(|&idx| idx as usize >= REF_FRAMES)
      || (self.disable_cdf_update && !self.disable_frame_end_update_cdf)
    {
      return Err(EntropyError::InvalidSyntax);
    }
    Ok(())
  }

  /// The reference slot selected by `primary_ref_frame`.
  pub fn primary_slot(&self) -> Option<usize> {
    if self.primary_ref_frame == PRIMARY_REF_NONE {
      None
    } else {
      Some(self.ref_frame_idx[self.primary_ref_frame as usize] as usize)
    }
  }

  /// Whether this frame adapts CDFs while coding.
  pub const fn adapt(&self) -> bool {
    !self.disable_cdf_update
  }
}

/// The complete entropy state of a frame boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameEntropyState {
  pub fc: Box<CDFContext>,
}

impl Default for FrameEntropyState {
  fn default() -> Self {
    FrameEntropyState { fc: Box::new(CDFContext::new()) }
  }
}

impl FrameEntropyState {
  /// The state at the start of a frame: a copy of the primary reference's
  /// saved state, or the default tables, with every counter reset.
  ///
  /// # Errors
  ///
  /// - Returns `EntropyError::InvalidSyntax` if `params` is malformed.
  /// - Returns `EntropyError::MissingReference` if the primary reference
  ///   slot holds no saved state.
  pub fn begin(
    params: &FrameEntropyParams, slots: &ReferenceSlots,
  ) -> Result<Self> {
    params.validate()?;
    let mut state = match params.primary_slot() {
      None => FrameEntropyState::default(),
      Some(slot) => slots
        .get(slot)
        .cloned()
        .ok_or(EntropyError::MissingReference { slot })?,
    };
    state.fc.reset_counts();
    Ok(state)
  }

  /// A private copy for tile `tile_id`.
  pub fn tile(&self, tile_id: usize) -> TileEntropyState {
    TileEntropyState { tile_id, fc: self.fc.clone() }
  }
}

/// The entropy state of a single tile, adapted by every symbol coded in
/// that tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileEntropyState {
  pub tile_id: usize,
  pub fc: Box<CDFContext>,
}

/// Saved end-of-frame states, one per reference slot.
#[derive(Clone, Debug, Default)]
pub struct ReferenceSlots {
  pub slots: [Option<Arc<FrameEntropyState>>; REF_FRAMES],
}

impl ReferenceSlots {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, slot: usize) -> Option<&FrameEntropyState> {
    self.slots.get(slot)?.as_deref()
  }

  /// Store `state` in every slot whose bit is set in `refresh_frame_flags`.
  pub fn refresh(
    &mut self, refresh_frame_flags: u32, state: Arc<FrameEntropyState>,
  ) {
    for (i, slot) in self.slots.iter_mut().enumerate() {
      if refresh_frame_flags & (1 << i) != 0 {
        *slot = Some(state.clone());
      }
    }
  }

  /// Evict every saved state.
  pub fn clear(&mut self) {
    self.slots = Default::default();
  }
}

/// Roll a finished frame up into its saved state and publish it to the
/// slots it refreshes.
///
/// # Errors
///
/// - Returns `EntropyError::InvalidSyntax` if `chosen` is not the tile
///   named by `context_update_tile_id`.
pub(crate) fn end_frame(
  params: &FrameEntropyParams, start: FrameEntropyState,
  chosen: TileEntropyState, slots: &mut ReferenceSlots,
) -> Result<Arc<FrameEntropyState>> {
  if chosen.tile_id != params.context_update_tile_id {
    return Err(EntropyError::InvalidSyntax);
  }
  let mut saved = if params.disable_frame_end_update_cdf {
    start
  } else {
    FrameEntropyState { fc: chosen.fc }
  };
  saved.fc.reset_counts();
  let saved = Arc::new(saved);
  slots.refresh(params.refresh_frame_flags, saved.clone());
  Ok(saved)
}

cfg_if::cfg_if! {
  if #[cfg(feature = "threading")] {
    use rayon::prelude::*;

    /// Run `f` for tiles `0..tiles` on the rayon pool, in tile order.
    pub(crate) fn map_tiles<T, F>(tiles: usize, f: F) -> Result<Vec<T>>
    where
      T: Send,
      F: Fn(usize) -> Result<T> + Sync + Send,
    {
      (0..tiles).into_par_iter().map(f).collect()
    }
  } else {
    /// Run `f` for tiles `0..tiles`, in tile order.
    pub(crate) fn map_tiles<T, F>(tiles: usize, f: F) -> Result<Vec<T>>
    where
      T: Send,
      F: Fn(usize) -> Result<T> + Sync + Send,
    {
      (0..tiles).map(f).collect()
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn touched() -> FrameEntropyState {
    let mut state = FrameEntropyState::default();
    state.fc.skip_cdfs[0] = [5000, 0, 17];
    state
  }

  #[test]
  fn begin_from_defaults() {
    let state =
      FrameEntropyState::begin(&FrameEntropyParams::default(), &ReferenceSlots::new())
        .unwrap();
    assert_eq!(state, FrameEntropyState::default());
  }

  #[test]
  fn begin_from_reference_resets_counts() {
    let mut slots = ReferenceSlots::new();
    slots.refresh(1 << 5, Arc::new(touched()));
    let params = FrameEntropyParams {
      primary_ref_frame: 2,
      ref_frame_idx: [0, 0, 5, 0, 0, 0, 0],
      ..Default::default()
    };
    let state = FrameEntropyState::begin(&params, &slots).unwrap();
    assert_eq!(state.fc.skip_cdfs[0], [5000, 0, 0]);

    let params = FrameEntropyParams { primary_ref_frame: 0, ..params };
    assert_eq!(
      FrameEntropyState::begin(&params, &slots),
      Err(EntropyError::MissingReference { slot: 0 })
    );
  }

  #[test]
  fn malformed_params() {
    let slots = ReferenceSlots::new();
    for params in [
      FrameEntropyParams { primary_ref_frame: 8, ..Default::default() },
      FrameEntropyParams { refresh_frame_flags: 0x100, ..Default::default() },
      FrameEntropyParams {
        ref_frame_idx: [0, 1, 2, 3, 4, 5, 8],
        ..Default::default()
      },
      FrameEntropyParams { disable_cdf_update: true, ..Default::default() },
    ] {
      assert_eq!(
        FrameEntropyState::begin(&params, &slots),
        Err(EntropyError::InvalidSyntax)
      );
    }
  }

  #[test]
  fn end_frame_refreshes_slots() {
    let mut slots = ReferenceSlots::new();
    let params =
      FrameEntropyParams { refresh_frame_flags: 0b1001, ..Default::default() };
    let start = FrameEntropyState::default();
    let chosen = TileEntropyState { tile_id: 0, fc: touched().fc };
    let saved = end_frame(&params, start.clone(), chosen.clone(), &mut slots)
      .unwrap();
    assert_eq!(saved.fc.skip_cdfs[0], [5000, 0, 0]);
    assert_eq!(slots.get(0), Some(&*saved));
    assert_eq!(slots.get(3), Some(&*saved));
    assert!(slots.get(1).is_none());
    assert!(slots.get(8).is_none());

    let params =
      FrameEntropyParams { disable_frame_end_update_cdf: true, ..params };
    let saved =
      end_frame(&params, start.clone(), chosen.clone(), &mut slots).unwrap();
    assert_eq!(*saved, start);

    let params = FrameEntropyParams { context_update_tile_id: 1, ..params };
    assert_eq!(
      end_frame(&params, start, chosen, &mut slots),
      Err(EntropyError::InvalidSyntax)
    );
  }

  #[test]
  fn tiles_are_mapped_in_order() {
    let out = map_tiles(6, |t| Ok(t * 2)).unwrap();
    assert_eq!(out, vec![0, 2, 4, 6, 8, 10]);
    assert_eq!(
      map_tiles(4, |t| if t == 2 { Err(EntropyError::CorruptCdf) } else { Ok(t) }),
      Err(EntropyError::CorruptCdf)
    );
  }
}
