// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! # seg2poly
//!
//! Converts COCO instance segmentation annotations into oriented bounding box
//! ("polygon") labels for detector training.
//!
//! Each label row is `class x1 y1 x2 y2 x3 y3 x4 y4` with coordinates
//! normalized by the image size:
//!
//! - **Non-crowd objects**: every segmentation polygon becomes the
//!   minimum-area rotated rectangle enclosing it.
//! - **Crowd objects**: the `bbox` is expanded to its four corners.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seg2poly::{ConvertOptions, seg2poly};
//!
//! let options = ConvertOptions {
//!     plot: true,
//!     ..Default::default()
//! };
//! let summary = seg2poly("/data/coco", &options, None)?;
//! println!("{}", summary);
//! # Ok::<(), seg2poly::Error>(())
//! ```
//!
//! ## Optional Features
//!
//! - `plot` (default): renders segmentation and box overlays for the first
//!   few images of each prefix.

pub mod coco;
pub mod convert;
mod error;
pub mod geometry;
mod label;
mod pipeline;
#[cfg(feature = "plot")]
pub mod plot;
mod writer;

pub use crate::{
    convert::{Conversion, convert_annotation},
    error::Error,
    label::OrientedLabel,
    pipeline::{ConvertOptions, ConvertSummary, Progress, seg2poly},
    writer::LabelWriter,
};

#[cfg(test)]
#[ctor::ctor]
unsafe fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .init();
}
