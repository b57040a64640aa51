//! Stitches directional views into an atlas and merges bake passes by channel.

use super::channels::{ChannelClaims, ChannelMask};
use super::layout::AtlasLayout;
use super::pixels::PixelBuffer;
use crate::error::{BakerError, Result};
use crate::types::Direction;

/// One rendered view per bake direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalViews {
    views: [PixelBuffer; 4],
}

impl DirectionalViews {
    pub fn new(forward: PixelBuffer, right: PixelBuffer, back: PixelBuffer, left: PixelBuffer) -> Self {
        Self {
            views: [forward, right, back, left],
        }
    }

    pub fn get(&self, direction: Direction) -> &PixelBuffer {
        &self.views[direction.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &PixelBuffer)> {
        Direction::ALL.into_iter().zip(self.views.iter())
    }
}

/// Lay the four views into one atlas: Forward and Right on the bottom row,
/// Back and Left above them.
///
/// Every view must have exactly the size `layout` gives for its direction.
pub fn stitch_views(layout: &AtlasLayout, views: &DirectionalViews) -> Result<PixelBuffer> {
    let (width, height) = layout.atlas_size();
    let mut atlas = PixelBuffer::new(width, height);

    for (direction, view) in views.iter() {
        let expected = layout.view_size(direction);
        if view.dimensions() != expected {
            return Err(BakerError::AtlasBuild(format!(
                "{} view is {}x{}, layout expects {}x{}",
                direction, view.width, view.height, expected.0, expected.1
            )));
        }
        let (x, y) = layout.origin(direction);
        atlas.blit(view, x, y)?;
    }

    Ok(atlas)
}

/// Result of merging passes into one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedChannels {
    pub buffer: PixelBuffer,
    /// Channels written by at least one pass.
    pub claimed: ChannelMask,
    /// Channels written by more than one pass; the last pass won.
    pub collisions: ChannelMask,
}

/// Routes each pass's channels into a shared buffer.
///
/// Channels no pass claims keep the default value (zero). When several passes
/// claim a channel the last one added wins.
#[derive(Debug, Clone)]
pub struct ChannelMerger {
    buffer: PixelBuffer,
    claims: ChannelClaims,
}

impl ChannelMerger {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: PixelBuffer::new(width, height),
            claims: ChannelClaims::default(),
        }
    }

    /// Copy the channels in `mask` from `pass` into the merged buffer.
    pub fn add_pass(&mut self, mask: ChannelMask, pass: &PixelBuffer) -> Result<()> {
        if pass.dimensions() != self.buffer.dimensions() {
            return Err(BakerError::AtlasBuild(format!(
                "pass is {}x{}, merge target is {}x{}",
                pass.width, pass.height, self.buffer.width, self.buffer.height
            )));
        }

        self.claims.add(mask);
        let channels: Vec<usize> = mask.channels().map(|c| c.index()).collect();
        if channels.is_empty() {
            return Ok(());
        }

        for (dst, src) in self
            .buffer
            .pixels
            .chunks_exact_mut(4)
            .zip(pass.pixels.chunks_exact(4))
        {
            for &c in &channels {
                dst[c] = src[c];
            }
        }
        Ok(())
    }

    /// Channels claimed more than once so far.
    pub fn collisions(&self) -> ChannelMask {
        self.claims.collisions()
    }

    pub fn finish(self) -> MergedChannels {
        MergedChannels {
            claimed: self.claims.claimed(),
            collisions: self.claims.collisions(),
            buffer: self.buffer,
        }
    }
}

/// Merge `passes` in order into a `width` x `height` buffer.
pub fn merge_channels<'a>(
    width: u32,
    height: u32,
    passes: impl IntoIterator<Item = (ChannelMask, &'a PixelBuffer)>,
) -> Result<MergedChannels> {
    let mut merger = ChannelMerger::new(width, height);
    for (mask, pass) in passes {
        merger.add_pass(mask, pass)?;
    }
    Ok(merger.finish())
}
