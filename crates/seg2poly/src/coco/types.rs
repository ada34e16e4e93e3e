// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! COCO JSON data structures for serde deserialization.
//!
//! Only the fields needed to derive oriented box labels are modelled. Any
//! other keys in the annotation file (`info`, `licenses`, keypoints, ...) are
//! ignored by serde.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Top-level COCO dataset structure.
///
/// This is the root structure for COCO annotation files like
/// `instances_train2017.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CocoDataset {
    /// List of images in the dataset.
    pub images: Vec<CocoImage>,
    /// List of annotations (one per object instance).
    #[serde(default)]
    pub annotations: Vec<CocoAnnotation>,
    /// List of object categories/classes.
    #[serde(default)]
    pub categories: Vec<CocoCategory>,
}

/// Image metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CocoImage {
    /// Unique image ID.
    pub id: u64,
    /// Image width in pixels, 0 when absent from the file.
    #[serde(default)]
    pub width: u32,
    /// Image height in pixels, 0 when absent from the file.
    #[serde(default)]
    pub height: u32,
    /// Filename (relative path within the images prefix folder).
    pub file_name: String,
}

/// Category definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CocoCategory {
    /// Unique category ID.
    pub id: u32,
    /// Category name (e.g., "person", "car").
    pub name: String,
    #[serde(default)]
    pub supercategory: Option<String>,
}

/// Annotation for object detection and instance segmentation.
///
/// Each annotation represents a single object instance in an image.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CocoAnnotation {
    /// Unique annotation ID.
    #[serde(default)]
    pub id: u64,
    /// ID of the image containing this object.
    pub image_id: u64,
    /// Raw COCO category ID of this object.
    pub category_id: u32,
    /// Bounding box: `[x, y, width, height]` in pixels (top-left corner).
    #[serde(default)]
    pub bbox: [f64; 4],
    /// Whether this is a crowd annotation (0 = single instance, 1 = crowd).
    ///
    /// Some exporters write a JSON boolean instead of an integer; both are
    /// accepted.
    #[serde(default, deserialize_with = "deserialize_iscrowd")]
    pub iscrowd: u8,
    /// Segmentation mask (polygon or RLE format).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segmentation: Option<CocoSegmentation>,
}

impl CocoAnnotation {
    /// Returns true for crowd regions, which are converted from `bbox`.
    pub fn is_crowd(&self) -> bool {
        self.iscrowd != 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CrowdFlag {
    Bool(bool),
    Int(u8),
}

fn deserialize_iscrowd<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CrowdFlag::deserialize(deserializer)? {
        CrowdFlag::Bool(flag) => flag as u8,
        CrowdFlag::Int(value) => value,
    })
}

/// Segmentation format: polygon array or RLE.
///
/// COCO supports two segmentation formats:
/// - **Polygon**: For single instances (`iscrowd=0`), uses nested coordinate
///   arrays
/// - **RLE**: For crowds (`iscrowd=1`), uses run-length encoding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CocoSegmentation {
    /// Polygon format: `[[x1,y1,x2,y2,...], [x3,y3,...]]`
    ///
    /// Multiple polygons represent disjoint regions of the same object.
    Polygon(Vec<Vec<f64>>),
    /// Uncompressed RLE format with counts array.
    Rle(CocoRle),
    /// Compressed RLE format with LEB128-encoded counts string.
    CompressedRle(CocoCompressedRle),
}

/// Uncompressed RLE (Run-Length Encoding) segmentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoRle {
    /// Run-length counts: `[bg_run, fg_run, bg_run, fg_run, ...]`
    pub counts: Vec<u32>,
    /// Image size as `[height, width]` (NOT `[width, height]`!)
    pub size: [u32; 2],
}

/// Compressed RLE segmentation (LEB128 encoded).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoCompressedRle {
    /// LEB128-encoded counts string.
    pub counts: String,
    /// Image size as `[height, width]`.
    pub size: [u32; 2],
}

/// Lookup tables for efficient COCO data access.
///
/// Annotations keep the order in which they appear in the file, which is the
/// order label rows are written in.
#[derive(Debug, Clone)]
pub struct CocoIndex {
    /// `image_id` → `CocoImage`
    pub images: HashMap<u64, CocoImage>,
    /// `category_id` → `CocoCategory`
    pub categories: HashMap<u32, CocoCategory>,
    /// `image_id` → `Vec<CocoAnnotation>`
    pub annotations_by_image: HashMap<u64, Vec<CocoAnnotation>>,
}

impl CocoIndex {
    /// Build lookup index from a `CocoDataset`.
    pub fn from_dataset(dataset: &CocoDataset) -> Self {
        let images: HashMap<_, _> = dataset
            .images
            .iter()
            .map(|img| (img.id, img.clone()))
            .collect();

        let categories: HashMap<_, _> = dataset
            .categories
            .iter()
            .map(|cat| (cat.id, cat.clone()))
            .collect();

        let mut annotations_by_image: HashMap<u64, Vec<CocoAnnotation>> = HashMap::new();
        for ann in &dataset.annotations {
            annotations_by_image
                .entry(ann.image_id)
                .or_default()
                .push(ann.clone());
        }

        Self {
            images,
            categories,
            annotations_by_image,
        }
    }

    /// Get the category name for a raw category ID.
    pub fn label_name(&self, category_id: u32) -> Option<&str> {
        self.categories.get(&category_id).map(|c| c.name.as_str())
    }

    /// Get annotations for an image.
    pub fn annotations_for_image(&self, image_id: u64) -> &[CocoAnnotation] {
        self.annotations_by_image
            .get(&image_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
