pub mod bridge;
pub mod catalog;
pub mod config;
pub mod dock;
pub mod error;
pub mod geometry;
pub mod holds;
pub mod trail;

use serde::{Deserialize, Serialize};

pub type TouchId = i32;

/// Page coordinates as reported by the device.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

/// Coordinates local to the trail surface.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// Top-left position of the dock in viewport pixels.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct DockOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_offset(offset: DockOffset, size: Size) -> Self {
        Self {
            left: offset.x,
            top: offset.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One contact point at one instant.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    pub id: TouchId,
    pub point: ViewportPoint,
}

impl TouchSample {
    pub fn new(id: TouchId, x: f64, y: f64) -> Self {
        Self {
            id,
            point: ViewportPoint { x, y },
        }
    }
}
