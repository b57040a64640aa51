//! Finished atlas textures.

use super::channels::TextureFormat;
use super::layout::AtlasLayout;
use super::pixels::PixelBuffer;
use crate::error::{BakerError, Result};
use image::ImageEncoder;

/// A stitched and channel-merged atlas ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAtlas {
    /// RGBA8 pixels, bottom row first. Channels outside `format` are zero.
    pub pixels: PixelBuffer,
    pub format: TextureFormat,
    pub layout: AtlasLayout,
}

impl TextureAtlas {
    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// Pixel data packed to `format`'s channels, top row first.
    pub fn packed_bytes(&self) -> Vec<u8> {
        let rows = self.pixels.top_down_rows();
        match self.format {
            TextureFormat::R8 => rows.chunks_exact(4).map(|px| px[0]).collect(),
            // PNG has no two-channel color type; blue stays empty.
            TextureFormat::RG16 => rows
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], 0])
                .collect(),
            TextureFormat::RGB24 => rows
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect(),
            TextureFormat::RGBA32 => rows,
        }
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let color_type = match self.format {
            TextureFormat::R8 => image::ExtendedColorType::L8,
            TextureFormat::RG16 | TextureFormat::RGB24 => image::ExtendedColorType::Rgb8,
            TextureFormat::RGBA32 => image::ExtendedColorType::Rgba8,
        };

        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(&self.packed_bytes(), self.width(), self.height(), color_type)
            .map_err(|e| BakerError::AtlasBuild(format!("Failed to encode PNG: {}", e)))?;

        Ok(bytes)
    }
}
