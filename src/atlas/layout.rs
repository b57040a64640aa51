//! Placement of the four directional views inside an atlas.
//!
//! ```text
//! +---------+------+
//! |  Back   | Left |   row 1
//! +---------+------+
//! | Forward | Right|   row 0 (v = 0)
//! +---------+------+
//!   front     side
//! ```

use crate::error::{BakerError, Result};
use crate::types::{Axis, Bounds, Direction};
use serde::Serialize;

/// A region within the atlas in UV space (v = 0 at the bottom).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AtlasRegion {
    /// U coordinate of the left edge (0-1).
    pub u_min: f32,
    /// V coordinate of the bottom edge (0-1).
    pub v_min: f32,
    /// U coordinate of the right edge (0-1).
    pub u_max: f32,
    /// V coordinate of the top edge (0-1).
    pub v_max: f32,
}

impl AtlasRegion {
    /// Get the width of this region in UV space.
    pub fn width(&self) -> f32 {
        self.u_max - self.u_min
    }

    /// Get the height of this region in UV space.
    pub fn height(&self) -> f32 {
        self.v_max - self.v_min
    }

    /// Transform a local UV coordinate (0-1) to atlas coordinate.
    pub fn transform_uv(&self, u: f32, v: f32) -> [f32; 2] {
        [
            self.u_min + u * self.width(),
            self.v_min + v * self.height(),
        ]
    }
}

/// Largest atlas width or height a layout may produce.
pub const MAX_ATLAS_DIMENSION: u32 = 16384;

/// Pixel sizes of the directional views and of the atlas they form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AtlasLayout {
    /// Height of every view in pixels.
    pub view_height: u32,
    /// Width of the Forward and Back views.
    pub front_width: u32,
    /// Width of the Right and Left views.
    pub side_width: u32,
}

impl AtlasLayout {
    /// Size the views of `bounds` at `view_height` pixels tall.
    ///
    /// Each width is `round(view_height * size.axis / size.y)` with ties to
    /// even, clamped to at least one pixel. Renders and the stitcher both read
    /// widths from here so the two rows always line up.
    ///
    /// Fails when either atlas dimension would exceed [`MAX_ATLAS_DIMENSION`].
    pub fn for_bounds(bounds: &Bounds, view_height: u32) -> Result<Self> {
        if view_height == 0 {
            return Err(BakerError::AtlasBuild("view height must be at least 1 pixel".into()));
        }
        if view_height > MAX_ATLAS_DIMENSION / 2 {
            return Err(BakerError::AtlasBuild(format!(
                "view height {} gives an atlas taller than {} pixels",
                view_height, MAX_ATLAS_DIMENSION
            )));
        }
        bounds.ensure_bakeable()?;

        // f64 keeps huge aspect ratios finite until the size check below.
        let size = bounds.size();
        let width_for = |axis: Axis| -> f64 {
            let ratio = axis.component(size) as f64 / size.y as f64;
            (view_height as f64 * ratio).round_ties_even().max(1.0)
        };
        let front = width_for(Direction::Forward.span_axis());
        let side = width_for(Direction::Right.span_axis());
        if front + side > MAX_ATLAS_DIMENSION as f64 {
            return Err(BakerError::AtlasBuild(format!(
                "views {}x{} and {}x{} give an atlas wider than {} pixels",
                front, view_height, side, view_height, MAX_ATLAS_DIMENSION
            )));
        }

        Ok(Self {
            view_height,
            front_width: front as u32,
            side_width: side as u32,
        })
    }

    /// Width and height of the view rendered for `direction`.
    pub fn view_size(&self, direction: Direction) -> (u32, u32) {
        let width = match direction.span_axis() {
            Axis::X => self.front_width,
            _ => self.side_width,
        };
        (width, self.view_height)
    }

    /// Width / height of the view rendered for `direction`.
    pub fn view_aspect(&self, direction: Direction) -> f32 {
        let (width, height) = self.view_size(direction);
        width as f32 / height as f32
    }

    /// Bottom-left pixel of `direction`'s view within the atlas.
    pub fn origin(&self, direction: Direction) -> (u32, u32) {
        match direction {
            Direction::Forward => (0, 0),
            Direction::Right => (self.front_width, 0),
            Direction::Back => (0, self.view_height),
            Direction::Left => (self.front_width, self.view_height),
        }
    }

    /// Full atlas size: both widths side by side, two views tall.
    ///
    /// Layouts from [`AtlasLayout::for_bounds`] never exceed
    /// [`MAX_ATLAS_DIMENSION`]. Hand-built ones saturate instead of wrapping.
    pub fn atlas_size(&self) -> (u32, u32) {
        (
            self.front_width.saturating_add(self.side_width),
            self.view_height.saturating_mul(2),
        )
    }

    /// UV region covered by `direction`'s view.
    pub fn region(&self, direction: Direction) -> AtlasRegion {
        let (atlas_w, atlas_h) = self.atlas_size();
        let (x, y) = self.origin(direction);
        let (w, h) = self.view_size(direction);
        AtlasRegion {
            u_min: x as f32 / atlas_w as f32,
            v_min: y as f32 / atlas_h as f32,
            u_max: x.saturating_add(w) as f32 / atlas_w as f32,
            v_max: y.saturating_add(h) as f32 / atlas_h as f32,
        }
    }
}
