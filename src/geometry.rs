//! Canvas-space geometry primitives.

use serde::{Deserialize, Serialize};

/// A point in canvas space: CSS pixels relative to the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
