// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Label and manifest file writers.

use crate::{Error, OrientedLabel};
use itertools::Itertools;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes per-image label files and per-prefix manifests.
///
/// # Example
///
/// ```rust,no_run
/// use seg2poly::{LabelWriter, OrientedLabel};
///
/// let writer = LabelWriter::new();
/// let label = OrientedLabel::from_bbox(0, &[0.1, 0.2, 0.3, 0.4]);
/// writer.write_labels("labels/val2017/000000000139.txt", &[label])?;
/// # Ok::<(), seg2poly::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct LabelWriter;

impl LabelWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write one label row per line, overwriting any existing file.
    pub fn write_labels<P: AsRef<Path>>(
        &self,
        path: P,
        labels: &[OrientedLabel],
    ) -> Result<(), Error> {
        create_parent(path.as_ref())?;

        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        for label in labels {
            writeln!(writer, "{}", label.to_line())?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Write the image paths joined by newlines, without a trailing newline.
    pub fn write_manifest<P: AsRef<Path>>(&self, path: P, images: &[PathBuf]) -> Result<(), Error> {
        create_parent(path.as_ref())?;

        let contents = images.iter().map(|p| p.display()).join("\n");
        std::fs::write(path.as_ref(), contents)?;

        Ok(())
    }
}

fn create_parent(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
