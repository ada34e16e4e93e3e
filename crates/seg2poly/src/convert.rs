// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Conversion of COCO annotations to oriented box labels in pixel space.
//!
//! - Crowd annotations use their `bbox`, expanded to four corners.
//! - Every polygon of a non-crowd annotation becomes the minimum-area
//!   rectangle enclosing it.
//!
//! Failures are returned per polygon (or per annotation when the whole
//! annotation is unusable) so the caller can log them and keep the rest of
//! the image.

use crate::{
    Error, OrientedLabel,
    coco::{CategoryMapping, CocoAnnotation, CocoSegmentation},
    geometry::{Point, min_area_rect, points_from_flat},
};

/// A converted label together with the source ring it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Label in pixel coordinates.
    pub label: OrientedLabel,
    /// Closed segmentation ring (first point repeated at the end), `None`
    /// for crowd annotations converted from `bbox`.
    pub segment: Option<Vec<Point>>,
}

/// Convert one COCO annotation.
///
/// Returns one entry per produced label row: a single entry for crowd
/// annotations, one per polygon otherwise. An annotation with an empty
/// polygon list yields no entries.
pub fn convert_annotation(
    annotation: &CocoAnnotation,
    mapping: CategoryMapping,
) -> Vec<Result<Conversion, Error>> {
    let class = match mapping.class_index(annotation.category_id) {
        Ok(class) => class,
        Err(err) => return vec![Err(err)],
    };

    if annotation.is_crowd() {
        return vec![Ok(Conversion {
            label: OrientedLabel::from_bbox(class, &annotation.bbox),
            segment: None,
        })];
    }

    match &annotation.segmentation {
        Some(CocoSegmentation::Polygon(polygons)) => polygons
            .iter()
            .map(|polygon| convert_polygon(class, polygon))
            .collect(),
        Some(CocoSegmentation::Rle(_)) | Some(CocoSegmentation::CompressedRle(_)) => {
            vec![Err(Error::UnsupportedSegmentation(
                "RLE segmentation on a non-crowd annotation".to_string(),
            ))]
        }
        None => vec![Err(Error::UnsupportedSegmentation(
            "non-crowd annotation without segmentation".to_string(),
        ))],
    }
}

/// Convert a single flat polygon `[x1, y1, x2, y2, ...]` to the minimum-area
/// rectangle enclosing it.
pub fn convert_polygon(class: u32, polygon: &[f64]) -> Result<Conversion, Error> {
    let mut ring = points_from_flat(polygon)?;
    if let Some(first) = ring.first().copied() {
        ring.push(first);
    }

    let rect = min_area_rect(&ring)?;

    Ok(Conversion {
        label: OrientedLabel::new(class, rect.to_flat()),
        segment: Some(ring),
    })
}
