// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Integration tests for oriented box conversion through the public API.
//!
//! The COCO2017 tests need the val annotations at:
//! `~/Datasets/COCO/annotations/instances_val2017.json`
//! and are skipped when the file is not present.
//!
//! Run with: `cargo test --test coco_integration -- --nocapture`

use seg2poly::{
    Conversion, Error, OrientedLabel,
    coco::{CategoryMapping, CocoAnnotation, CocoReader, CocoSegmentation},
    convert_annotation,
    geometry::{RotatedRect, points_from_flat},
};
use std::{path::PathBuf, time::Instant};

/// Path to COCO2017 val annotations
fn coco_val_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    let path = PathBuf::from(home).join("Datasets/COCO/annotations/instances_val2017.json");
    if path.exists() { Some(path) } else { None }
}

fn as_rect(label: &OrientedLabel) -> RotatedRect {
    RotatedRect {
        corners: label.corners(),
        width: 0.0,
        height: 0.0,
        angle: 0.0,
    }
}

/// Every produced box must enclose the polygon it came from.
fn check_encloses(annotation: &CocoAnnotation, conversions: &[Result<Conversion, Error>]) {
    let Some(CocoSegmentation::Polygon(polygons)) = &annotation.segmentation else {
        return;
    };
    if annotation.is_crowd() {
        return;
    }

    for (polygon, result) in polygons.iter().zip(conversions) {
        let Ok(conversion) = result else { continue };
        let rect = as_rect(&conversion.label);
        for point in points_from_flat(polygon).unwrap() {
            assert!(
                rect.contains(&point, 1e-6),
                "annotation {}: {:?} outside {:?}",
                annotation.id,
                point,
                rect.corners
            );
        }
    }
}

#[test]
fn test_synthetic_annotations() {
    let json = r#"{
        "images": [{ "id": 7, "file_name": "x.jpg", "width": 640, "height": 480 }],
        "annotations": [
            {
                "id": 1, "image_id": 7, "category_id": 90, "iscrowd": 0,
                "bbox": [100, 100, 50, 50],
                "segmentation": [
                    [100, 100, 150, 110, 140, 160, 95, 150],
                    [300, 300, 310, 300]
                ]
            },
            {
                "id": 2, "image_id": 7, "category_id": 1, "iscrowd": true,
                "bbox": [0, 0, 640, 480],
                "segmentation": { "counts": "abc", "size": [480, 640] }
            }
        ],
        "categories": []
    }"#;
    let dataset: seg2poly::coco::CocoDataset = serde_json::from_str(json).unwrap();

    let first = convert_annotation(&dataset.annotations[0], CategoryMapping::Coco80);
    assert_eq!(first.len(), 2);
    let label = &first[0].as_ref().unwrap().label;
    assert_eq!(label.class, 79);
    check_encloses(&dataset.annotations[0], &first);
    // Two points cannot form a rectangle
    assert!(matches!(first[1], Err(Error::Geometry(_))));

    let crowd = convert_annotation(&dataset.annotations[1], CategoryMapping::Coco80);
    assert_eq!(crowd.len(), 1);
    let label = &crowd[0].as_ref().unwrap().label;
    assert_eq!(
        label.coords,
        [0.0, 0.0, 0.0, 480.0, 640.0, 480.0, 640.0, 0.0]
    );
    let (normalized, _) = label.normalize(640.0, 480.0, false).unwrap();
    assert_eq!(
        normalized.to_line(),
        "0 0.000000 0.000000 0.000000 1.000000 1.000000 1.000000 1.000000 0.000000"
    );
}

#[test]
fn test_coco2017_val_conversion() {
    let Some(path) = coco_val_path() else {
        eprintln!("Skipping: COCO2017 val annotations not found");
        return;
    };

    let start = Instant::now();
    let dataset = CocoReader::new().read_json(&path).unwrap();
    eprintln!(
        "Read {} images, {} annotations in {:?}",
        dataset.images.len(),
        dataset.annotations.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let mut converted = 0usize;
    let mut failed = 0usize;
    for annotation in &dataset.annotations {
        let results = convert_annotation(annotation, CategoryMapping::Coco80);
        check_encloses(annotation, &results);

        for result in &results {
            match result {
                Ok(conversion) => {
                    assert!(conversion.label.class < 80);
                    converted += 1;
                }
                Err(Error::UnknownCategory(id)) => panic!("unknown COCO category {}", id),
                Err(_) => failed += 1,
            }
        }
    }
    eprintln!(
        "Converted {} labels ({} skipped) in {:?}",
        converted,
        failed,
        start.elapsed()
    );

    // Degenerate polygons are rare in val2017
    assert!(converted > 36_000);
    assert!(failed * 1000 < converted);
}
