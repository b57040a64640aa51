//! RGBA8 pixel buffers.

use crate::error::{BakerError, Result};

/// An RGBA8 image. Row 0 is the bottom row, so pixel `(x, y)` sits at
/// texture coordinate `((x + 0.5) / width, (y + 0.5) / height)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel), bottom row first.
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = (0..width as usize * height as usize)
            .flat_map(|_| color)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap existing RGBA8 data, checking its length.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(BakerError::AtlasBuild(format!(
                "{}x{} buffer needs {} bytes, got {}",
                width,
                height,
                expected,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Check if any pixel is not fully opaque.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks(4).any(|pixel| pixel[3] < 255)
    }

    /// Copy `src` into this buffer with its bottom-left corner at `(x, y)`.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) -> Result<()> {
        let fits = |offset: u32, len: u32, limit: u32| {
            offset.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(x, src.width, self.width) || !fits(y, src.height, self.height) {
            return Err(BakerError::AtlasBuild(format!(
                "{}x{} block at ({}, {}) does not fit in {}x{} buffer",
                src.width, src.height, x, y, self.width, self.height
            )));
        }

        let row_bytes = src.width as usize * 4;
        for row in 0..src.height {
            let src_idx = src.index(0, row);
            let dst_idx = self.index(x, y + row);
            self.pixels[dst_idx..dst_idx + row_bytes]
                .copy_from_slice(&src.pixels[src_idx..src_idx + row_bytes]);
        }
        Ok(())
    }

    /// Pixel rows reordered top row first, as image files expect.
    pub fn top_down_rows(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        if row_bytes == 0 {
            return Vec::new();
        }
        self.pixels
            .chunks_exact(row_bytes)
            .rev()
            .flatten()
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set_pixel() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set_pixel(1, 0, [255, 0, 0, 255]);
        buf.set_pixel(0, 1, [0, 0, 255, 255]);

        assert_eq!(buf.get_pixel(1, 0), [255, 0, 0, 255]);
        assert_eq!(buf.get_pixel(0, 1), [0, 0, 255, 255]);
        assert_eq!(buf.get_pixel(0, 0), [0, 0, 0, 0]);
        assert!(buf.has_transparency());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 15]).is_err());
    }

    #[test]
    fn test_blit() {
        let mut dst = PixelBuffer::new(4, 4);
        let src = PixelBuffer::filled(2, 3, [9, 8, 7, 6]);
        dst.blit(&src, 2, 1).unwrap();

        assert_eq!(dst.get_pixel(2, 1), [9, 8, 7, 6]);
        assert_eq!(dst.get_pixel(3, 3), [9, 8, 7, 6]);
        assert_eq!(dst.get_pixel(1, 1), [0, 0, 0, 0]);
        assert_eq!(dst.get_pixel(2, 0), [0, 0, 0, 0]);

        assert!(dst.blit(&src, 3, 0).is_err());
        // Offsets near u32::MAX must not wrap back inside the buffer.
        assert!(dst.blit(&src, u32::MAX, 0).is_err());
        assert!(dst.blit(&src, 0, u32::MAX - 1).is_err());
    }

    #[test]
    fn test_top_down_rows() {
        let mut buf = PixelBuffer::new(1, 2);
        buf.set_pixel(0, 0, [1, 1, 1, 1]);
        buf.set_pixel(0, 1, [2, 2, 2, 2]);
        assert_eq!(buf.top_down_rows(), vec![2, 2, 2, 2, 1, 1, 1, 1]);
    }
}
