//! Axis-aligned tile rectangles
//!
//! Coordinates are inclusive on both ends and signed, so candidate
//! placements may fall outside the level before they are rejected.

use serde::{Deserialize, Serialize};

/// Rectangle covered by a placed room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRect {
    /// Left x coordinate
    pub lx: i32,
    /// Top y coordinate
    pub ly: i32,
    /// Right x coordinate
    pub hx: i32,
    /// Bottom y coordinate
    pub hy: i32,
}

impl TileRect {
    pub fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Rectangle of `width` x `height` tiles with its top-left at (x, y)
    pub fn with_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(x, y, x + width as i32 - 1, y + height as i32 - 1)
    }

    pub fn width(&self) -> u32 {
        if self.hx >= self.lx {
            (self.hx - self.lx + 1) as u32
        } else {
            0
        }
    }

    pub fn height(&self) -> u32 {
        if self.hy >= self.ly {
            (self.hy - self.ly + 1) as u32
        } else {
            0
        }
    }

    /// Check if this rectangle contains another
    pub fn contains(&self, other: &TileRect) -> bool {
        self.lx <= other.lx && self.hx >= other.hx && self.ly <= other.ly && self.hy >= other.hy
    }

    /// Check if this rectangle shares at least one tile with another
    pub fn intersects(&self, other: &TileRect) -> bool {
        !(self.hx < other.lx || self.lx > other.hx || self.hy < other.ly || self.ly > other.hy)
    }

    /// Grow by `margin` tiles on every side
    pub fn expanded(&self, margin: i32) -> TileRect {
        TileRect::new(
            self.lx - margin,
            self.ly - margin,
            self.hx + margin,
            self.hy + margin,
        )
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.lx + self.hx) / 2, (self.ly + self.hy) / 2)
    }
}
