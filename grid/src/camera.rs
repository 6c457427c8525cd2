#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either viewport (client) or canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
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

/// Mapping between viewport pixels and canvas pixels.
///
/// `origin_x` / `origin_y` locate the canvas element's top-left corner in
/// viewport pixels. `zoom` is the scale factor the editor renders at
/// (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub origin_x: f64,
    pub origin_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn new(origin: Point, zoom: f64) -> Self {
        Self { origin_x: origin.x, origin_y: origin.y, zoom }
    }

    /// Whether the zoom factor can be divided by safely.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.zoom.is_finite() && self.zoom > 0.0 && self.origin_x.is_finite() && self.origin_y.is_finite()
    }

    /// Convert a viewport point to canvas coordinates.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point) -> Point {
        Point {
            x: (client.x - self.origin_x) / self.zoom,
            y: (client.y - self.origin_y) / self.zoom,
        }
    }

    /// Convert a canvas point back to viewport coordinates.
    #[must_use]
    pub fn canvas_to_client(&self, canvas: Point) -> Point {
        Point {
            x: canvas.x * self.zoom + self.origin_x,
            y: canvas.y * self.zoom + self.origin_y,
        }
    }

    /// Convert a viewport distance (pixels) to a canvas distance.
    #[must_use]
    pub fn client_dist_to_canvas(&self, client_dist: f64) -> f64 {
        client_dist / self.zoom
    }
}
