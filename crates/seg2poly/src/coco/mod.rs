// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # COCO Dataset Format Support
//!
//! Reading of COCO (Common Objects in Context) instance annotation files and
//! the category table used to turn raw COCO ids into dense class indices.
//!
//! ## Scope
//!
//! - Images, annotations and categories of instance annotation files
//! - Polygon segmentation (converted), RLE segmentation (crowd objects only,
//!   converted from `bbox`)
//!
//! Keypoints, captions and panoptic segmentation are ignored.
//!
//! ## Example
//!
//! ```rust,no_run
//! use seg2poly::coco::{CocoIndex, CocoReader, coco91_to_80};
//!
//! let reader = CocoReader::new();
//! let dataset = reader.read_json("annotations/instances_val2017.json")?;
//! let index = CocoIndex::from_dataset(&dataset);
//!
//! for image in &dataset.images {
//!     for ann in index.annotations_for_image(image.id) {
//!         let class = coco91_to_80(ann.category_id)?;
//!         println!("{} -> class {}", image.file_name, class);
//!     }
//! }
//! # Ok::<(), seg2poly::Error>(())
//! ```

mod category;
mod reader;
mod types;

pub use category::{COCO80_CATEGORY_IDS, CategoryMapping, coco80_to_91, coco91_to_80};
pub use reader::{
    CocoReadOptions, CocoReader, PrefixStrategy, find_annotation_files, resolve_prefix,
};
pub use types::{
    CocoAnnotation, CocoCategory, CocoCompressedRle, CocoDataset, CocoImage, CocoIndex, CocoRle,
    CocoSegmentation,
};
