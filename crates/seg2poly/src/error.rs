// SPDX-License-Identifier: Apache-2.0
// Copyright © 2025 Au-Zone Technologies. All Rights Reserved.

/// Error type for segmentation to polygon conversion.
///
/// Only [`Error::Configuration`] and [`Error::NoData`] abort a run. Every
/// other variant is recovered at the narrowest scope (polygon, object, image
/// or annotation file), logged, and the conversion continues.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred during file operations.
    IoError(std::io::Error),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// Image header could not be read to determine its dimensions.
    ImageSizeError(imagesize::ImageError),
    /// Image decoding or encoding error (only with "plot" feature).
    #[cfg(feature = "plot")]
    ImageError(image::ImageError),
    /// The dataset path is not a usable directory.
    Configuration(String),
    /// No annotation files were found under the dataset path.
    NoData(String),
    /// Raw COCO category id is not part of the 80 class table.
    UnknownCategory(u32),
    /// Point set cannot produce an enclosing rectangle.
    Geometry(String),
    /// Segmentation encoding that cannot be turned into an oriented box.
    UnsupportedSegmentation(String),
    /// Image width or height is zero or not finite.
    InvalidImageSize { width: f64, height: f64 },
    /// The images prefix for an annotation file could not be resolved.
    Prefix(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<imagesize::ImageError> for Error {
    fn from(err: imagesize::ImageError) -> Self {
        Error::ImageSizeError(err)
    }
}

#[cfg(feature = "plot")]
impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::ImageError(err)
    }
}

impl Error {
    /// Returns true when the error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Configuration(_) | Error::NoData(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::ImageSizeError(e) => write!(f, "Image size error: {}", e),
            #[cfg(feature = "plot")]
            Error::ImageError(e) => write!(f, "Image error: {}", e),
            Error::Configuration(s) => write!(f, "Configuration error: {}", s),
            Error::NoData(s) => write!(f, "No data: {}", s),
            Error::UnknownCategory(id) => write!(f, "Unknown COCO category id: {}", id),
            Error::Geometry(s) => write!(f, "Geometry error: {}", s),
            Error::UnsupportedSegmentation(s) => write!(f, "Unsupported segmentation: {}", s),
            Error::InvalidImageSize { width, height } => {
                write!(f, "Invalid image size: {}x{}", width, height)
            }
            Error::Prefix(s) => write!(f, "Prefix error: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::ImageSizeError(e) => Some(e),
            #[cfg(feature = "plot")]
            Error::ImageError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Configuration("x".to_string()).is_fatal());
        assert!(Error::NoData("x".to_string()).is_fatal());
        assert!(!Error::UnknownCategory(12).is_fatal());
        assert!(!Error::Geometry("collinear".to_string()).is_fatal());
        assert!(
            !Error::InvalidImageSize {
                width: 0.0,
                height: 10.0
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Error::UnknownCategory(83).to_string(),
            "Unknown COCO category id: 83"
        );
        assert_eq!(
            Error::InvalidImageSize {
                width: 0.0,
                height: 50.0
            }
            .to_string(),
            "Invalid image size: 0x50"
        );
    }

    #[test]
    fn test_io_source() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
