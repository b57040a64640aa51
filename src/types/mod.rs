//! Shared types used throughout the library.

mod direction;

pub use direction::{Axis, Direction};

use crate::error::{BakerError, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a generated asset.
///
/// Re-bakes reuse the identity of an existing mesh or material so that
/// anything referencing them stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub u64);

static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

impl AssetId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        Self(NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An axis-aligned bounding box stored as center and half-size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub extents: Vec3,
}

impl Bounds {
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            extents: (max - min) * 0.5,
        }
    }

    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut has_points = false;

        for p in points {
            has_points = true;
            let p = Vec3::from(p);
            min = min.min(p);
            max = max.max(p);
        }

        if has_points {
            Some(Self::from_min_max(min, max))
        } else {
            None
        }
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Full size along each axis.
    pub fn size(&self) -> Vec3 {
        self.extents * 2.0
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min(), self.max());
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ]
    }

    /// Share of the horizontal footprint taken by the X axis: `size.x / (size.x + size.z)`.
    ///
    /// This is the U coordinate separating the Forward/Back column of the
    /// atlas from the Right/Left column.
    pub fn width_comparison(&self) -> f32 {
        let size = self.size();
        size.x / (size.x + size.z)
    }

    /// Reject bounds that cannot produce a billboard.
    pub fn ensure_bakeable(&self) -> Result<()> {
        let size = self.size();
        if !size.is_finite() || !self.center.is_finite() {
            return Err(BakerError::DegenerateBounds(format!(
                "non-finite bounds {:?}",
                self
            )));
        }
        if size.y <= 0.0 {
            return Err(BakerError::DegenerateBounds(format!(
                "bounds have no height (size {:?})",
                size
            )));
        }
        if size.x + size.z <= 0.0 {
            return Err(BakerError::DegenerateBounds(format!(
                "bounds have no horizontal footprint (size {:?})",
                size
            )));
        }
        Ok(())
    }
}
