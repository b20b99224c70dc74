// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed polygon shapes and their pure constructors.

use core::f64::consts::TAU;

use crate::Point;

/// A closed polygon: an ordered point list in collage space.
///
/// Constructors auto-close the outline; the last point does not need to
/// repeat the first. Degenerate point lists are legal and draw nothing.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Outline points, in order.
    pub points: Vec<Point>,
}

/// Wrap a caller-supplied point list as a closed shape, without validation.
pub fn polygon(points: Vec<Point>) -> Shape {
    Shape { points }
}

/// An axis-aligned rectangle of the given width and height, centered on the
/// origin.
pub fn rect(width: f64, height: f64) -> Shape {
    let hw = width / 2.0;
    let hh = height / 2.0;
    polygon(vec![
        Point::new(-hw, -hh),
        Point::new(-hw, hh),
        Point::new(hw, hh),
        Point::new(hw, -hh),
    ])
}

/// A square with the given side length, centered on the origin.
pub fn square(side: f64) -> Shape {
    rect(side, side)
}

/// An ellipse of the given width and height, centered on the origin.
///
/// The outline is a fixed 50-point parametric sampling.
pub fn oval(width: f64, height: f64) -> Shape {
    const N: usize = 50;
    let hw = width / 2.0;
    let hh = height / 2.0;
    let step = TAU / N as f64;
    let points = (0..N)
        .map(|i| {
            let angle = step * i as f64;
            Point::new(hw * angle.cos(), hh * angle.sin())
        })
        .collect();
    polygon(points)
}

/// A circle with the given radius, centered on the origin.
pub fn circle(radius: f64) -> Shape {
    oval(2.0 * radius, 2.0 * radius)
}

/// A regular polygon with `n` corners on a circle of the given radius,
/// starting at angle 0.
pub fn ngon(n: usize, radius: f64) -> Shape {
    let step = TAU / n as f64;
    let points = (0..n)
        .map(|i| {
            let angle = step * i as f64;
            Point::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    polygon(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_corners_are_centered() {
        let shape = rect(10.0, 20.0);
        assert_eq!(
            shape.points,
            vec![
                Point::new(-5.0, -10.0),
                Point::new(-5.0, 10.0),
                Point::new(5.0, 10.0),
                Point::new(5.0, -10.0),
            ]
        );
    }

    #[test]
    fn square_is_rect() {
        assert_eq!(square(8.0), rect(8.0, 8.0));
    }

    #[test]
    fn ngon_points_lie_on_circle() {
        let shape = ngon(5, 30.0);
        assert_eq!(shape.points.len(), 5);
        for (i, p) in shape.points.iter().enumerate() {
            let distance = p.to_vec2().length();
            assert!(
                (distance - 30.0).abs() < 1e-9,
                "point {i} at distance {distance}"
            );
            let angle = p.y.atan2(p.x).rem_euclid(TAU);
            let expected = (TAU / 5.0 * i as f64).rem_euclid(TAU);
            assert!(
                (angle - expected).abs() < 1e-9,
                "point {i} at angle {angle}, expected {expected}"
            );
        }
        assert_eq!(shape.points[0], Point::new(30.0, 0.0));
    }

    #[test]
    fn oval_samples_fifty_points() {
        let shape = oval(40.0, 20.0);
        assert_eq!(shape.points.len(), 50);
        for p in &shape.points {
            let unit = (p.x / 20.0).powi(2) + (p.y / 10.0).powi(2);
            assert!((unit - 1.0).abs() < 1e-9, "point off the ellipse: {p:?}");
        }
    }

    #[test]
    fn polygon_accepts_degenerate_input() {
        assert!(polygon(Vec::new()).points.is_empty());
        assert_eq!(polygon(vec![Point::ZERO]).points.len(), 1);
    }
}
