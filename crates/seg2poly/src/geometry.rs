// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Minimum-area enclosing rectangle of a 2D point set.
//!
//! The rectangle is found with the rotating calipers method: one side of the
//! optimal rectangle is collinear with an edge of the convex hull, so every
//! hull edge is tried as a rectangle side and the smallest area wins.

use crate::Error;

/// A point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Convert a flat `[x1, y1, x2, y2, ...]` coordinate list into points.
///
/// # Errors
/// [`Error::Geometry`] for an odd number of values or non-finite values.
pub fn points_from_flat(coords: &[f64]) -> Result<Vec<Point>, Error> {
    if coords.len() % 2 != 0 {
        return Err(Error::Geometry(format!(
            "odd number of polygon coordinates: {}",
            coords.len()
        )));
    }
    if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
        return Err(Error::Geometry(format!(
            "non-finite polygon coordinate: {}",
            bad
        )));
    }

    Ok(coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect())
}

/// Cross product of `o->a` and `o->b`. Positive for a counter-clockwise turn.
fn cross(o: &Point, a: &Point, b: &Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull using Andrew's monotone chain.
///
/// Returns the hull vertices in counter-clockwise order (y axis up) starting
/// from the lowest-x, then lowest-y point. Collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() < 3 {
        return sorted;
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in &sorted {
        while lower.len() >= 2 && cross(&lower[lower.len() - 2], &lower[lower.len() - 1], p) <= 0.0
        {
            lower.pop();
        }
        lower.push(*p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(&upper[upper.len() - 2], &upper[upper.len() - 1], p) <= 0.0
        {
            upper.pop();
        }
        upper.push(*p);
    }

    // Last point of each chain is the first point of the other
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// A rotated rectangle given by its four corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedRect {
    /// Corners in hull traversal order: the first two lie on the hull edge
    /// the rectangle was aligned with.
    pub corners: [Point; 4],
    /// Length of the side along the aligned hull edge.
    pub width: f64,
    /// Length of the perpendicular side.
    pub height: f64,
    /// Direction of the aligned side in degrees, in `(-180, 180]`.
    pub angle: f64,
}

impl RotatedRect {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Flatten the corners into `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    pub fn to_flat(&self) -> [f64; 8] {
        let mut flat = [0.0; 8];
        for (i, corner) in self.corners.iter().enumerate() {
            flat[i * 2] = corner.x;
            flat[i * 2 + 1] = corner.y;
        }
        flat
    }

    /// True when `point` lies inside the rectangle or within `tolerance`
    /// pixels of its border.
    pub fn contains(&self, point: &Point, tolerance: f64) -> bool {
        let [a, b, _, d] = self.corners;
        let (px, py) = (point.x - a.x, point.y - a.y);

        // Distance along a side from corner `a`, bounded by the side length
        let within = |to: Point| {
            let (sx, sy) = (to.x - a.x, to.y - a.y);
            let len = sx.hypot(sy);
            if len == 0.0 {
                return px.hypot(py) <= tolerance;
            }
            let along = (px * sx + py * sy) / len;
            along >= -tolerance && along <= len + tolerance
        };

        within(b) && within(d)
    }
}

/// Compute the minimum-area rectangle (at any rotation) enclosing `points`.
///
/// # Errors
/// [`Error::Geometry`] when the points have fewer than 3 distinct values or
/// are all collinear, since no rectangle with positive area exists.
pub fn min_area_rect(points: &[Point]) -> Result<RotatedRect, Error> {
    let hull = convex_hull(points);
    if hull.len() < 3 {
        return Err(Error::Geometry(format!(
            "point set is degenerate ({} distinct non-collinear points)",
            hull.len()
        )));
    }

    let mut best: Option<RotatedRect> = None;
    let n = hull.len();
    for i in 0..n {
        let origin = hull[i];
        let next = hull[(i + 1) % n];
        let (ex, ey) = (next.x - origin.x, next.y - origin.y);
        let edge_length = ex.hypot(ey);
        if edge_length <= f64::EPSILON {
            continue;
        }

        let (nx, ny) = (ex / edge_length, ey / edge_length);
        // Perpendicular pointing into the counter-clockwise hull
        let (px, py) = (-ny, nx);

        let mut min_n = f64::MAX;
        let mut max_n = f64::MIN;
        let mut min_p = f64::MAX;
        let mut max_p = f64::MIN;
        for point in &hull {
            let dx = point.x - origin.x;
            let dy = point.y - origin.y;
            let proj_n = nx * dx + ny * dy;
            let proj_p = px * dx + py * dy;
            min_n = min_n.min(proj_n);
            max_n = max_n.max(proj_n);
            min_p = min_p.min(proj_p);
            max_p = max_p.max(proj_p);
        }

        let width = max_n - min_n;
        let height = max_p - min_p;
        if best.as_ref().is_some_and(|b| b.area() <= width * height) {
            continue;
        }

        let at = |n: f64, p: f64| Point::new(origin.x + n * nx + p * px, origin.y + n * ny + p * py);
        best = Some(RotatedRect {
            corners: [
                at(min_n, min_p),
                at(max_n, min_p),
                at(max_n, max_p),
                at(min_n, max_p),
            ],
            width,
            height,
            angle: ny.atan2(nx).to_degrees(),
        });
    }

    best.ok_or_else(|| Error::Geometry("convex hull has no usable edge".to_string()))
}
