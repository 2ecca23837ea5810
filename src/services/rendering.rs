//! Decides which representation of an upload is sent to AI detection.
//!
//! The detector only accepts raster images. PDF rasterization happens in the
//! browser before upload; when it fails the client sends only the original
//! PDF and detection is skipped rather than failed.

use std::fmt;

use crate::models::document::UploadedDocument;

/// Why AI detection did not run for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The client did not send a rendered image.
    NoImage,
    /// The file declared or sniffed as something other than an image.
    NotAnImage { content_type: String },
    /// Declared as an image but the bytes are not a decodable image format.
    UnreadableImage { content_type: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoImage => write!(f, "no rendered image was provided"),
            SkipReason::NotAnImage { content_type } => {
                write!(f, "the file type {content_type} cannot be analysed")
            }
            SkipReason::UnreadableImage { content_type } => {
                write!(f, "the {content_type} image could not be read")
            }
        }
    }
}

/// Input for the AI-detection step.
#[derive(Debug)]
pub enum DetectionInput<'a> {
    Image(&'a UploadedDocument),
    Skipped(SkipReason),
}

/// Pick the image to analyse, or explain why there is none.
pub fn detection_input(image: Option<&UploadedDocument>) -> DetectionInput<'_> {
    let Some(image) = image else {
        return DetectionInput::Skipped(SkipReason::NoImage);
    };

    if !image.is_image() {
        return DetectionInput::Skipped(SkipReason::NotAnImage {
            content_type: image.content_type.clone(),
        });
    }

    if image::guess_format(&image.bytes).is_err() {
        return DetectionInput::Skipped(SkipReason::UnreadableImage {
            content_type: image.content_type.clone(),
        });
    }

    DetectionInput::Image(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_image_is_selected() {
        let doc = UploadedDocument::new(None, Some("image/jpeg".to_string()), JPEG_MAGIC.to_vec());
        assert!(matches!(detection_input(Some(&doc)), DetectionInput::Image(_)));
    }

    #[test]
    fn test_pdf_is_skipped() {
        let doc = UploadedDocument::new(None, None, b"%PDF-1.4".to_vec());
        match detection_input(Some(&doc)) {
            DetectionInput::Skipped(SkipReason::NotAnImage { content_type }) => {
                assert_eq!(content_type, "application/pdf")
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            detection_input(None),
            DetectionInput::Skipped(SkipReason::NoImage)
        ));
    }

    #[test]
    fn test_mislabelled_bytes_are_skipped() {
        let doc = UploadedDocument::new(None, Some("image/png".to_string()), b"not an image".to_vec());
        assert!(matches!(
            detection_input(Some(&doc)),
            DetectionInput::Skipped(SkipReason::UnreadableImage { .. })
        ));
    }
}
