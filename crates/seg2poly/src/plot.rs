// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

//! Overlay rendering for visual checks of converted labels.
//!
//! Draws the source segmentation rings and the derived oriented boxes on
//! top of the source image and saves the result as a PNG.

use crate::{Error, geometry::Point};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use std::path::Path;

/// Matplotlib "tab10" colors, cycled per drawn shape.
const PALETTE: [(u8, u8, u8); 10] = [
    (31, 119, 180),
    (255, 127, 14),
    (44, 160, 44),
    (214, 39, 40),
    (148, 103, 189),
    (140, 86, 75),
    (227, 119, 194),
    (127, 127, 127),
    (188, 189, 34),
    (23, 190, 207),
];

fn palette_color(index: usize) -> Rgb<u8> {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Rgb([r, g, b])
}

/// Draw a polyline through `points`, two pixels wide.
fn draw_polyline(image: &mut RgbImage, points: &[Point], color: Rgb<u8>) {
    for (a, b) in points.iter().zip(points.iter().skip(1)) {
        // Second stroke is shifted across the segment: down for mostly
        // horizontal segments, right otherwise.
        let (dx, dy) = if (b.x - a.x).abs() >= (b.y - a.y).abs() {
            (0.0f32, 1.0f32)
        } else {
            (1.0, 0.0)
        };

        for step in [0.0f32, 1.0] {
            draw_line_segment_mut(
                image,
                (a.x as f32 + dx * step, a.y as f32 + dy * step),
                (b.x as f32 + dx * step, b.y as f32 + dy * step),
                color,
            );
        }
    }
}

/// Draw `segments` (closed rings) and `boxes` (four corners each, closed
/// here) onto `image`.
pub fn draw_overlay(image: &mut RgbImage, segments: &[Vec<Point>], boxes: &[[Point; 4]]) {
    let mut color = 0;
    for segment in segments {
        draw_polyline(image, segment, palette_color(color));
        color += 1;
    }

    for corners in boxes {
        let ring = [corners[0], corners[1], corners[2], corners[3], corners[0]];
        draw_polyline(image, &ring, palette_color(color));
        color += 1;
    }
}

/// Load `image_path`, draw the overlay and save it as `output_path`.
pub fn render_overlay(
    image_path: &Path,
    segments: &[Vec<Point>],
    boxes: &[[Point; 4]],
    output_path: &Path,
) -> Result<(), Error> {
    let mut image = image::open(image_path)?.to_rgb8();
    draw_overlay(&mut image, segments, boxes);

    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    image.save(output_path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_draw_overlay_marks_box_border() {
        let mut image = RgbImage::new(20, 20);
        let corners = [
            Point::new(2.0, 2.0),
            Point::new(2.0, 12.0),
            Point::new(12.0, 12.0),
            Point::new(12.0, 2.0),
        ];

        draw_overlay(&mut image, &[], &[corners]);

        assert_eq!(*image.get_pixel(2, 7), palette_color(0));
        assert_eq!(*image.get_pixel(7, 12), palette_color(0));
        // Interior untouched
        assert_eq!(*image.get_pixel(7, 7), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_overlay_edges_two_pixels_wide() {
        let mut image = RgbImage::new(20, 20);
        let corners = [
            Point::new(2.0, 2.0),
            Point::new(2.0, 12.0),
            Point::new(12.0, 12.0),
            Point::new(12.0, 2.0),
        ];

        draw_overlay(&mut image, &[], &[corners]);

        // Vertical edge at x = 2
        assert_eq!(*image.get_pixel(2, 7), palette_color(0));
        assert_eq!(*image.get_pixel(3, 7), palette_color(0));
        // Horizontal edges at y = 2 and y = 12
        assert_eq!(*image.get_pixel(7, 2), palette_color(0));
        assert_eq!(*image.get_pixel(7, 3), palette_color(0));
        assert_eq!(*image.get_pixel(7, 12), palette_color(0));
        assert_eq!(*image.get_pixel(7, 13), palette_color(0));
        assert_eq!(*image.get_pixel(7, 1), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_overlay_clips_out_of_frame() {
        let mut image = RgbImage::new(10, 10);
        let corners = [
            Point::new(-5.0, -5.0),
            Point::new(-5.0, 15.0),
            Point::new(15.0, 15.0),
            Point::new(15.0, -5.0),
        ];

        // Must not panic on coordinates outside the image
        draw_overlay(&mut image, &[], &[corners]);
    }

    #[test]
    fn test_render_overlay_writes_png() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("source.png");
        RgbImage::new(16, 16).save(&source).unwrap();

        let ring = vec![
            Point::new(1.0, 1.0),
            Point::new(10.0, 1.0),
            Point::new(10.0, 10.0),
            Point::new(1.0, 1.0),
        ];
        let output = temp.path().join("plots/val/source.png");
        render_overlay(&source, &[ring], &[], &output).unwrap();

        let rendered = image::open(&output).unwrap().to_rgb8();
        assert_eq!(rendered.dimensions(), (16, 16));
        assert_eq!(*rendered.get_pixel(5, 1), palette_color(0));
    }

    #[test]
    fn test_render_overlay_missing_image() {
        let temp = TempDir::new().unwrap();
        let result = render_overlay(
            &temp.path().join("missing.jpg"),
            &[],
            &[],
            &temp.path().join("out.png"),
        );
        assert!(result.is_err());
    }
}
