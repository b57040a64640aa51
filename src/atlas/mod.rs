//! Atlas layout, stitching and channel merging.

pub mod channels;
pub mod compositor;
pub mod layout;
pub mod pixels;
pub mod texture;

pub use channels::{Channel, ChannelClaims, ChannelMask, TextureFormat};
pub use compositor::{merge_channels, stitch_views, ChannelMerger, DirectionalViews, MergedChannels};
pub use layout::{AtlasLayout, AtlasRegion, MAX_ATLAS_DIMENSION};
pub use pixels::PixelBuffer;
pub use texture::TextureAtlas;
