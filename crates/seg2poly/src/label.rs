// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Oriented box labels and their normalization.
//!
//! ## Coordinate Systems
//!
//! - **Pixel**: as found in the COCO annotation, top-left image origin
//! - **Normalized**: x divided by image width, y divided by image height
//!
//! Normalized coordinates are not clipped by default, so a rectangle that
//! extends past the image border keeps its full rotated shape and produces
//! values slightly outside `[0, 1]`.

use crate::{Error, geometry::Point};
use itertools::Itertools;

/// Class index plus four ordered corners `x1 y1 x2 y2 x3 y3 x4 y4`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientedLabel {
    pub class: u32,
    pub coords: [f64; 8],
}

impl OrientedLabel {
    pub fn new(class: u32, coords: [f64; 8]) -> Self {
        Self { class, coords }
    }

    /// Build a label from a COCO bbox `[x, y, w, h]` in pixels.
    ///
    /// Corners are `(x_min, y_min), (x_min, y_max), (x_max, y_max),
    /// (x_max, y_min)`.
    ///
    /// # Example
    /// ```
    /// use seg2poly::OrientedLabel;
    ///
    /// let label = OrientedLabel::from_bbox(0, &[10.0, 10.0, 40.0, 30.0]);
    /// assert_eq!(label.coords, [10.0, 10.0, 10.0, 40.0, 50.0, 40.0, 50.0, 10.0]);
    /// ```
    pub fn from_bbox(class: u32, bbox: &[f64; 4]) -> Self {
        let [x_min, y_min, w, h] = *bbox;
        let x_max = x_min + w;
        let y_max = y_min + h;

        Self::new(class, [x_min, y_min, x_min, y_max, x_max, y_max, x_max, y_min])
    }

    /// The four corners as points, in label order.
    pub fn corners(&self) -> [Point; 4] {
        [0, 1, 2, 3].map(|i| Point::new(self.coords[i * 2], self.coords[i * 2 + 1]))
    }

    /// Rescale into the unit square.
    ///
    /// Returns `(normalized, pixel)`. With `clip` both are first clamped to
    /// the image frame `[0, width] x [0, height]`; otherwise the pixel label
    /// is an unchanged copy of `self`.
    ///
    /// # Errors
    /// [`Error::InvalidImageSize`] if width or height is zero, negative or not
    /// finite.
    pub fn normalize(&self, width: f64, height: f64, clip: bool) -> Result<(Self, Self), Error> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidImageSize { width, height });
        }

        let mut pixel = self.clone();
        if clip {
            for (i, value) in pixel.coords.iter_mut().enumerate() {
                let limit = if i % 2 == 0 { width } else { height };
                *value = value.clamp(0.0, limit);
            }
        }

        let mut normalized = pixel.clone();
        for (i, value) in normalized.coords.iter_mut().enumerate() {
            *value /= if i % 2 == 0 { width } else { height };
        }

        Ok((normalized, pixel))
    }

    /// Format as a label file row: integer class followed by coordinates with
    /// six decimals, space separated.
    pub fn to_line(&self) -> String {
        std::iter::once(self.class.to_string())
            .chain(self.coords.iter().map(|c| format!("{:.6}", c)))
            .join(" ")
    }
}
