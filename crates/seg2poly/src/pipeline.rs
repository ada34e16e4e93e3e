// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Dataset level conversion driver.
//!
//! For every COCO annotation file found below the dataset root:
//!
//! ```text
//! <parent>/
//! ├── annotations/instances_<prefix>.json   input
//! ├── images/<prefix>/*.jpg                 input
//! ├── labels/<prefix>/*.txt                 one label file per image
//! ├── plots/<prefix>/*.png                  optional overlays
//! └── <prefix>.txt                          manifest of converted images
//! ```
//!
//! Processing is sequential: files in path order, images in annotation file
//! order, objects in encounter order. Only a missing dataset directory or an
//! empty dataset abort the run; problems with a file, an image or a single
//! polygon are logged and skipped.
//!
//! A `<parent>/<prefix>` output group belongs to the first annotation file
//! resolving to it. Later files with the same prefix (for example
//! `person_keypoints_val2017.json` next to `instances_val2017.json`) are
//! skipped so they cannot overwrite its labels or manifest.

use crate::{
    Error, LabelWriter, OrientedLabel,
    coco::{
        CategoryMapping, CocoImage, CocoIndex, CocoReadOptions, CocoReader, PrefixStrategy,
        find_annotation_files, resolve_prefix,
    },
    convert::convert_annotation,
    geometry::Point,
};
use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    sync::mpsc::Sender,
};

/// Progress information for the images of the annotation file being
/// converted.
#[derive(Debug, Clone)]
pub struct Progress {
    /// Current number of completed items.
    pub current: usize,
    /// Total number of items to process.
    pub total: usize,
}

/// Options for [`seg2poly`].
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Render overlays for the first `max_plots` converted images of each
    /// prefix. Requires the `plot` feature.
    pub plot: bool,
    /// Maximum number of overlays per prefix.
    pub max_plots: usize,
    /// Clamp corners to the image frame before normalizing.
    pub clip: bool,
    /// Raw category id to class index mapping.
    pub category_mapping: CategoryMapping,
    /// How annotation files are matched to image directories.
    pub prefix_strategy: PrefixStrategy,
    /// Options forwarded to the COCO reader.
    pub read_options: CocoReadOptions,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            plot: false,
            max_plots: 3,
            clip: false,
            category_mapping: CategoryMapping::default(),
            prefix_strategy: PrefixStrategy::default(),
            read_options: CocoReadOptions::default(),
        }
    }
}

/// Counters describing a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Annotation files converted.
    pub files: usize,
    /// Annotation files skipped (unreadable, unresolved or already used
    /// prefix, ...).
    pub files_skipped: usize,
    /// Images with a label file written.
    pub images: usize,
    /// Images skipped because of invalid size, no usable label or a write
    /// failure. Images without annotations or missing on disk are not
    /// counted.
    pub images_skipped: usize,
    /// Label rows written.
    pub labels: usize,
    /// Polygons or objects that could not be converted.
    pub labels_skipped: usize,
    /// Overlay images rendered.
    pub plots: usize,
}

impl ConvertSummary {
    fn merge(&mut self, other: &ConvertSummary) {
        self.files += other.files;
        self.files_skipped += other.files_skipped;
        self.images += other.images;
        self.images_skipped += other.images_skipped;
        self.labels += other.labels;
        self.labels_skipped += other.labels_skipped;
        self.plots += other.plots;
    }
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Annotation files: {} converted, {} skipped",
            self.files, self.files_skipped
        )?;
        writeln!(
            f,
            "Images:           {} labelled, {} skipped",
            self.images, self.images_skipped
        )?;
        writeln!(
            f,
            "Labels:           {} written, {} skipped",
            self.labels, self.labels_skipped
        )?;
        write!(f, "Plots:            {}", self.plots)
    }
}

/// Convert every COCO annotation file below `dataset_path` to oriented box
/// labels.
///
/// # Errors
/// * [`Error::Configuration`] if `dataset_path` is not a directory.
/// * [`Error::NoData`] if no annotation file is found.
///
/// # Example
/// ```rust,no_run
/// use seg2poly::{ConvertOptions, seg2poly};
///
/// let summary = seg2poly("/data/coco", &ConvertOptions::default(), None)?;
/// println!("{}", summary);
/// # Ok::<(), seg2poly::Error>(())
/// ```
pub fn seg2poly<P: AsRef<Path>>(
    dataset_path: P,
    options: &ConvertOptions,
    progress: Option<Sender<Progress>>,
) -> Result<ConvertSummary, Error> {
    let files = find_annotation_files(dataset_path.as_ref())?;
    log::info!("Found {} annotation files", files.len());

    if options.plot && cfg!(not(feature = "plot")) {
        log::warn!("Plotting requested but the \"plot\" feature is not enabled");
    }

    let mut summary = ConvertSummary::default();
    let mut claimed: HashSet<(PathBuf, String)> = HashSet::new();
    for json_file in &files {
        match convert_file(json_file, options, progress.as_ref(), &mut claimed) {
            Ok(file_summary) => summary.merge(&file_summary),
            Err(err) => {
                log::error!("Skipping {}: {}", json_file.display(), err);
                summary.files_skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// Convert a single annotation file.
///
/// `claimed` holds the `(parent, prefix)` groups already written by earlier
/// files of this run.
fn convert_file(
    json_file: &Path,
    options: &ConvertOptions,
    progress: Option<&Sender<Progress>>,
    claimed: &mut HashSet<(PathBuf, String)>,
) -> Result<ConvertSummary, Error> {
    let dataset = CocoReader::with_options(options.read_options.clone()).read_json(json_file)?;

    let parent = json_file
        .parent()
        .and_then(Path::parent)
        .ok_or_else(|| {
            Error::Prefix(format!(
                "{} is not inside an annotations directory",
                json_file.display()
            ))
        })?;
    let images_root = parent.join("images");
    let prefix = resolve_prefix(json_file, &images_root, options.prefix_strategy)?;
    if !claimed.insert((parent.to_path_buf(), prefix.clone())) {
        return Err(Error::Prefix(format!(
            "prefix {} already converted from another annotation file in {}",
            prefix,
            parent.display()
        )));
    }

    let image_dir = images_root.join(&prefix);
    let label_dir = parent.join("labels").join(&prefix);
    let plot_dir = parent.join("plots").join(&prefix);

    log::info!(
        "Begin transformation for {} ({} images, {} annotations)",
        prefix,
        dataset.images.len(),
        dataset.annotations.len()
    );

    let index = CocoIndex::from_dataset(&dataset);
    let writer = LabelWriter::new();
    let mut summary = ConvertSummary::default();
    let mut manifest: Vec<PathBuf> = Vec::new();
    let total = dataset.images.len();
    let mut plot_attempts = 0;

    for (i, image) in dataset.images.iter().enumerate() {
        if let Some(tx) = progress {
            tx.send(Progress { current: i, total }).ok();
        }

        let image_path = image_dir.join(&image.file_name);
        if !image_path.exists() {
            log::debug!("Image not found: {}", image_path.display());
            continue;
        }

        let annotations = index.annotations_for_image(image.id);
        if annotations.is_empty() {
            continue;
        }

        let (width, height) = match image_dimensions(image, &image_path) {
            Ok(size) => size,
            Err(err) => {
                log::warn!("Skipping image {}: {}", image.file_name, err);
                summary.images_skipped += 1;
                continue;
            }
        };

        let plotting =
            cfg!(feature = "plot") && options.plot && plot_attempts < options.max_plots;
        let mut rows: Vec<OrientedLabel> = Vec::new();
        let mut segments: Vec<Vec<Point>> = Vec::new();
        let mut boxes: Vec<[Point; 4]> = Vec::new();

        for annotation in annotations {
            for result in convert_annotation(annotation, options.category_mapping) {
                let normalized = result.and_then(|conversion| {
                    let (normalized, pixel) =
                        conversion.label.normalize(width, height, options.clip)?;
                    if plotting {
                        boxes.push(pixel.corners());
                        segments.extend(conversion.segment);
                    }
                    Ok(normalized)
                });

                match normalized {
                    Ok(label) => rows.push(label),
                    Err(err) => {
                        log::warn!(
                            "Ignoring label of annotation {} ({}) in {}: {}",
                            annotation.id,
                            index
                                .label_name(annotation.category_id)
                                .unwrap_or("unnamed category"),
                            image.file_name,
                            err
                        );
                        summary.labels_skipped += 1;
                    }
                }
            }
        }

        if rows.is_empty() {
            log::warn!("No usable labels for image {}", image.file_name);
            summary.images_skipped += 1;
            continue;
        }

        let label_path = label_dir.join(Path::new(&image.file_name).with_extension("txt"));
        if let Err(err) = writer.write_labels(&label_path, &rows) {
            log::error!("Failed to write {}: {}", label_path.display(), err);
            summary.images_skipped += 1;
            continue;
        }

        summary.images += 1;
        summary.labels += rows.len();
        manifest.push(image_path.clone());

        if plotting {
            let plot_path = plot_dir.join(Path::new(&image.file_name).with_extension("png"));
            plot_attempts += 1;
            if plot_image(&image_path, &segments, &boxes, &plot_path) {
                log::info!("Saved overlay {}", plot_path.display());
                summary.plots += 1;
            }
        }
    }

    if let Some(tx) = progress {
        tx.send(Progress {
            current: total,
            total,
        })
        .ok();
    }

    let manifest_path = parent.join(format!("{}.txt", prefix));
    writer.write_manifest(&manifest_path, &manifest)?;
    log::info!(
        "Wrote {} labels for {} images of {} to {}",
        summary.labels,
        summary.images,
        prefix,
        manifest_path.display()
    );

    summary.files = 1;
    Ok(summary)
}

/// Image size from the annotation, falling back to the image header when
/// the annotation leaves it out.
fn image_dimensions(image: &CocoImage, image_path: &Path) -> Result<(f64, f64), Error> {
    let (width, height) = if image.width > 0 && image.height > 0 {
        (image.width as f64, image.height as f64)
    } else {
        let size = imagesize::size(image_path)?;
        (size.width as f64, size.height as f64)
    };

    if width > 0.0 && height > 0.0 {
        Ok((width, height))
    } else {
        Err(Error::InvalidImageSize { width, height })
    }
}

#[cfg(feature = "plot")]
fn plot_image(
    image_path: &Path,
    segments: &[Vec<Point>],
    boxes: &[[Point; 4]],
    plot_path: &Path,
) -> bool {
    match crate::plot::render_overlay(image_path, segments, boxes, plot_path) {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Failed to plot {}: {}", image_path.display(), err);
            false
        }
    }
}

#[cfg(not(feature = "plot"))]
fn plot_image(
    _image_path: &Path,
    _segments: &[Vec<Point>],
    _boxes: &[[Point; 4]],
    _plot_path: &Path,
) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert!(!options.plot);
        assert_eq!(options.max_plots, 3);
        assert!(!options.clip);
        assert_eq!(options.category_mapping, CategoryMapping::Coco80);
        assert_eq!(options.prefix_strategy, PrefixStrategy::Exact);
    }

    #[test]
    fn test_image_dimensions_from_annotation() {
        let image = CocoImage {
            id: 1,
            width: 100,
            height: 50,
            file_name: "a.jpg".to_string(),
        };
        // The file is not read when the annotation carries the size
        let size = image_dimensions(&image, Path::new("/nonexistent/a.jpg")).unwrap();
        assert_eq!(size, (100.0, 50.0));
    }

    #[test]
    fn test_image_dimensions_missing_file() {
        let image = CocoImage {
            id: 1,
            file_name: "a.jpg".to_string(),
            ..Default::default()
        };
        assert!(image_dimensions(&image, Path::new("/nonexistent/a.jpg")).is_err());
    }

    #[test]
    fn test_summary_merge_and_display() {
        let mut total = ConvertSummary::default();
        total.merge(&ConvertSummary {
            files: 1,
            images: 2,
            labels: 5,
            labels_skipped: 1,
            ..Default::default()
        });
        total.merge(&ConvertSummary {
            files: 1,
            images: 1,
            labels: 1,
            plots: 1,
            ..Default::default()
        });

        assert_eq!(total.files, 2);
        assert_eq!(total.images, 3);
        assert_eq!(total.labels, 6);
        assert!(total.to_string().contains("6 written, 1 skipped"));
    }
}
