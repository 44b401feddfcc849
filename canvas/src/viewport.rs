#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

/// A point in either client (CSS) or canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
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

/// Where the canvas is displayed on the page.
///
/// The canvas keeps its full print resolution as its intrinsic size and is
/// CSS-scaled to fit the container, so client coordinates must be rescaled by
/// intrinsic / displayed size. `left` / `top` / `width` / `height` are the
/// canvas element's bounding client rect in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// Convert a client-space point (CSS pixels) to canvas pixels.
    ///
    /// A viewport with no displayed area is treated as unscaled, so client
    /// coordinates pass through unchanged.
    #[must_use]
    pub fn client_to_canvas(&self, client: Point, canvas_w: f64, canvas_h: f64) -> Point {
        if self.width <= 0.0 || self.height <= 0.0 {
            return client;
        }
        Point {
            x: (client.x - self.left) * (canvas_w / self.width),
            y: (client.y - self.top) * (canvas_h / self.height),
        }
    }
}

/// CSS scale factor that fits a `canvas_w` × `canvas_h` canvas inside its container.
#[must_use]
pub fn fit_scale(container_w: f64, container_h: f64, canvas_w: f64, canvas_h: f64) -> f64 {
    if canvas_w <= 0.0 || canvas_h <= 0.0 {
        return 1.0;
    }
    (container_w / canvas_w).min(container_h / canvas_h)
}
