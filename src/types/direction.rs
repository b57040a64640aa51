//! Viewing directions and axes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The four horizontal directions a billboard is baked from.
///
/// The order matches the atlas arrangement: `Forward` and `Right` share the
/// bottom row, `Back` and `Left` the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Right,
    Back,
    Left,
}

impl Direction {
    /// All four directions in render order.
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Right,
        Direction::Back,
        Direction::Left,
    ];

    /// Index of this direction in [`Direction::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Direction::Forward => 0,
            Direction::Right => 1,
            Direction::Back => 2,
            Direction::Left => 3,
        }
    }

    /// The direction the camera looks along for this view.
    pub fn view_vector(&self) -> Vec3 {
        match self {
            Direction::Forward => Vec3::Z,
            Direction::Right => Vec3::NEG_X,
            Direction::Back => Vec3::NEG_Z,
            Direction::Left => Vec3::X,
        }
    }

    /// The world axis that spans the width of this view.
    pub fn span_axis(&self) -> Axis {
        match self {
            Direction::Forward | Direction::Back => Axis::X,
            Direction::Right | Direction::Left => Axis::Z,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Right => write!(f, "right"),
            Direction::Back => write!(f, "back"),
            Direction::Left => write!(f, "left"),
        }
    }
}

/// The three axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Component of `v` along this axis.
    pub fn component(&self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_vectors_are_horizontal_units() {
        for dir in Direction::ALL {
            let v = dir.view_vector();
            assert_eq!(v.y, 0.0);
            assert!((v.length() - 1.0).abs() < 1e-6);
            // Views two steps apart look at each other.
            let across = Direction::ALL[(dir.index() + 2) % 4];
            assert_eq!(across.view_vector(), -v);
        }
    }

    #[test]
    fn test_index_matches_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
        }
    }

    #[test]
    fn test_span_axis() {
        assert_eq!(Direction::Forward.span_axis(), Axis::X);
        assert_eq!(Direction::Back.span_axis(), Axis::X);
        assert_eq!(Direction::Right.span_axis(), Axis::Z);
        assert_eq!(Direction::Left.span_axis(), Axis::Z);
    }
}
