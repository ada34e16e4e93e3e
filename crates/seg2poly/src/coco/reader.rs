// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! COCO annotation discovery and JSON reading.
//!
//! Annotation files are expected in the usual layout:
//!
//! ```text
//! <parent>/
//! ├── annotations/instances_train2017.json
//! └── images/
//!     └── train2017/
//!         └── *.jpg
//! ```
//!
//! The `train2017` directory is the *prefix* shared by the annotation file
//! and its images.

use super::types::CocoDataset;
use crate::Error;
use std::{
    collections::HashSet,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

/// Options for COCO reading.
#[derive(Debug, Clone, Default)]
pub struct CocoReadOptions {
    /// Maximum number of images to read per file (0 = unlimited).
    pub max_images: usize,
}

/// COCO JSON reader.
///
/// # Example
///
/// ```rust,no_run
/// use seg2poly::coco::CocoReader;
///
/// let reader = CocoReader::new();
/// let dataset = reader.read_json("annotations/instances_val2017.json")?;
/// println!("Loaded {} images", dataset.images.len());
/// # Ok::<(), seg2poly::Error>(())
/// ```
pub struct CocoReader {
    options: CocoReadOptions,
}

impl CocoReader {
    /// Create a new COCO reader with default options.
    pub fn new() -> Self {
        Self {
            options: CocoReadOptions::default(),
        }
    }

    /// Create a new COCO reader with custom options.
    pub fn with_options(options: CocoReadOptions) -> Self {
        Self { options }
    }

    /// Read COCO dataset from a JSON file.
    pub fn read_json<P: AsRef<Path>>(&self, path: P) -> Result<CocoDataset, Error> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::with_capacity(64 * 1024, file);
        let dataset: CocoDataset = serde_json::from_reader(reader)?;

        Ok(self.apply_filters(dataset))
    }

    fn apply_filters(&self, mut dataset: CocoDataset) -> CocoDataset {
        if self.options.max_images > 0 && dataset.images.len() > self.options.max_images {
            dataset.images.truncate(self.options.max_images);

            let image_ids: HashSet<_> = dataset.images.iter().map(|i| i.id).collect();
            dataset
                .annotations
                .retain(|a| image_ids.contains(&a.image_id));
        }

        dataset
    }
}

impl Default for CocoReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Recursively find every `*.json` file below `dataset_path`.
///
/// The result is sorted so runs are reproducible.
///
/// # Errors
/// * [`Error::Configuration`] if `dataset_path` is not a directory.
/// * [`Error::NoData`] if no JSON file exists below it.
pub fn find_annotation_files<P: AsRef<Path>>(dataset_path: P) -> Result<Vec<PathBuf>, Error> {
    let dataset_path = dataset_path.as_ref();
    if !dataset_path.is_dir() {
        return Err(Error::Configuration(format!(
            "dataset path {} is not a directory",
            dataset_path.display()
        )));
    }

    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dataset_path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log::warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };

        if entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .is_some_and(|e| e.eq_ignore_ascii_case("json"))
        {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(Error::NoData(format!(
            "no annotation files (.json) found in {}",
            dataset_path.display()
        )));
    }

    files.sort();
    Ok(files)
}

/// How the images prefix of an annotation file is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrefixStrategy {
    /// The prefix directory name must equal the annotation file stem or one
    /// of its `_`, `-` or `.` separated tokens, and exactly one directory may
    /// match.
    #[default]
    Exact,
    /// First directory (in name order) whose name occurs anywhere in the
    /// annotation file path.
    Substring,
}

/// Resolve the images prefix for `annotation_file` among the directories of
/// `images_dir`.
///
/// Examples with [`PrefixStrategy::Exact`]:
/// - `instances_train2017.json` with `images/train2017` -> `train2017`
/// - `val.json` with `images/val` -> `val`
pub fn resolve_prefix(
    annotation_file: &Path,
    images_dir: &Path,
    strategy: PrefixStrategy,
) -> Result<String, Error> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(images_dir).map_err(|e| {
        Error::Prefix(format!(
            "cannot list images directory {}: {}",
            images_dir.display(),
            e
        ))
    })? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            candidates.push(entry.file_name().to_string_lossy().to_string());
        }
    }
    candidates.sort();

    match strategy {
        PrefixStrategy::Exact => {
            let stem = annotation_file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            let mut tokens: Vec<&str> = stem
                .split(['_', '-', '.'])
                .filter(|t| !t.is_empty())
                .collect();
            tokens.push(stem.as_str());

            let matches: Vec<&String> = candidates
                .iter()
                .filter(|c| tokens.contains(&c.as_str()))
                .collect();

            match matches.as_slice() {
                [prefix] => Ok((*prefix).clone()),
                [] => Err(Error::Prefix(format!(
                    "no directory in {} matches annotation file {}",
                    images_dir.display(),
                    annotation_file.display()
                ))),
                _ => Err(Error::Prefix(format!(
                    "annotation file {} matches several directories: {:?}",
                    annotation_file.display(),
                    matches
                ))),
            }
        }
        PrefixStrategy::Substring => {
            let path = annotation_file.to_string_lossy();
            candidates
                .into_iter()
                .find(|c| path.contains(c.as_str()))
                .ok_or_else(|| {
                    Error::Prefix(format!(
                        "no directory name in {} occurs in {}",
                        images_dir.display(),
                        annotation_file.display()
                    ))
                })
        }
    }
}
