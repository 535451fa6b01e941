// Copyright 2025 the Perch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding-box math shared by the positioning code.

use kurbo::{Rect, Vec2};

/// Whether `inner` lies entirely inside `outer` (edges may touch).
pub fn fits_within(inner: Rect, outer: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.y0 >= outer.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

/// Whether `inner` lies inside `outer` on the horizontal axis only.
pub fn fits_within_x(inner: Rect, outer: Rect) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1
}

/// Area of the part of `rect` that is visible inside `bounds`.
pub fn visible_area(rect: Rect, bounds: Rect) -> f64 {
    let clipped = rect.intersect(bounds);
    if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
        0.0
    } else {
        clipped.area()
    }
}

/// Translate `rect` by the smallest amount that keeps it inside `bounds` on the x axis.
///
/// If `rect` is wider than `bounds`, its leading edge is aligned with `bounds.x0`.
pub fn clamp_x_into(rect: Rect, bounds: Rect) -> Rect {
    let dx = if rect.width() >= bounds.width() || rect.x0 < bounds.x0 {
        bounds.x0 - rect.x0
    } else if rect.x1 > bounds.x1 {
        bounds.x1 - rect.x1
    } else {
        0.0
    };
    rect + Vec2::new(dx, 0.0)
}

/// Translate `rect` by the smallest amount that keeps it inside `bounds` on the y axis.
///
/// If `rect` is taller than `bounds`, its top edge is aligned with `bounds.y0`.
pub fn clamp_y_into(rect: Rect, bounds: Rect) -> Rect {
    let dy = if rect.height() >= bounds.height() || rect.y0 < bounds.y0 {
        bounds.y0 - rect.y0
    } else if rect.y1 > bounds.y1 {
        bounds.y1 - rect.y1
    } else {
        0.0
    };
    rect + Vec2::new(0.0, dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    #[test]
    fn fits_and_visible_area() {
        assert!(fits_within(Rect::new(0.0, 0.0, 100.0, 100.0), BOUNDS));
        assert!(!fits_within(Rect::new(-1.0, 0.0, 50.0, 50.0), BOUNDS));
        assert!(fits_within_x(Rect::new(0.0, -50.0, 50.0, 500.0), BOUNDS));
        assert_eq!(
            visible_area(Rect::new(50.0, 50.0, 150.0, 150.0), BOUNDS),
            2500.0
        );
        assert_eq!(
            visible_area(Rect::new(200.0, 0.0, 300.0, 10.0), BOUNDS),
            0.0
        );
    }

    #[test]
    fn clamp_shifts_minimally() {
        assert_eq!(
            clamp_x_into(Rect::new(90.0, 0.0, 120.0, 10.0), BOUNDS),
            Rect::new(70.0, 0.0, 100.0, 10.0)
        );
        assert_eq!(
            clamp_x_into(Rect::new(-10.0, 0.0, 20.0, 10.0), BOUNDS),
            Rect::new(0.0, 0.0, 30.0, 10.0)
        );
        assert_eq!(
            clamp_y_into(Rect::new(0.0, -20.0, 10.0, 200.0), BOUNDS),
            Rect::new(0.0, 0.0, 10.0, 220.0)
        );
        let inside = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(clamp_x_into(inside, BOUNDS), inside);
        assert_eq!(clamp_y_into(inside, BOUNDS), inside);
    }
}
