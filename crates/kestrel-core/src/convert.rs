//! RAW to preview conversion.
//!
//! Most RAW containers carry one or more full JPEG renditions. The default
//! converter pulls out the largest one that decodes and writes it beside the
//! RAW as `<prefix>.jpg`, so the detector has something it can read.

use image::ImageFormat;
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, PipelineResult};

/// Extension of generated previews.
pub const PREVIEW_EXTENSION: &str = "jpg";

const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// Turns a RAW file into a viewable preview next to it.
pub trait RawConverter: Send + Sync {
    /// Write a preview beside `raw_path` and return the preview's path.
    fn convert(&self, raw_path: &Path) -> PipelineResult<PathBuf>;
}

/// Extracts the embedded JPEG preview from a RAW container.
#[derive(Debug, Clone)]
pub struct EmbeddedPreviewConverter {
    /// Embedded JPEGs smaller than this are thumbnails, not previews
    min_size: usize,
}

impl Default for EmbeddedPreviewConverter {
    fn default() -> Self {
        Self { min_size: 50_000 }
    }
}

impl EmbeddedPreviewConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the minimum accepted JPEG size in bytes.
    pub fn with_min_size(min_size: usize) -> Self {
        Self { min_size }
    }

    /// Locate the largest embedded JPEG that decodes cleanly.
    fn extract(&self, data: &[u8]) -> Option<Vec<u8>> {
        let mut spans: Vec<(usize, usize)> = data
            .windows(JPEG_SOI.len())
            .enumerate()
            .filter(|(_, w)| *w == JPEG_SOI)
            .filter_map(|(start, _)| {
                data[start..]
                    .windows(JPEG_EOI.len())
                    .position(|w| w == JPEG_EOI)
                    .map(|offset| (start, start + offset + JPEG_EOI.len()))
            })
            .filter(|(start, end)| end - start >= self.min_size)
            .collect();

        // Largest first
        spans.sort_by(|a, b| (b.1 - b.0).cmp(&(a.1 - a.0)));

        spans.into_iter().find_map(|(start, end)| {
            let jpeg = &data[start..end];
            image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)
                .ok()
                .map(|_| jpeg.to_vec())
        })
    }
}

impl RawConverter for EmbeddedPreviewConverter {
    fn convert(&self, raw_path: &Path) -> PipelineResult<PathBuf> {
        let conversion_err = |message: String| PipelineError::Conversion {
            path: raw_path.to_path_buf(),
            message,
        };

        let data = std::fs::read(raw_path).map_err(|e| conversion_err(e.to_string()))?;
        let jpeg = self
            .extract(&data)
            .ok_or_else(|| conversion_err("no decodable embedded preview".to_string()))?;

        let preview_path = raw_path.with_extension(PREVIEW_EXTENSION);
        std::fs::write(&preview_path, &jpeg).map_err(|e| conversion_err(e.to_string()))?;

        tracing::debug!(
            "Extracted {}KB preview from {:?}",
            jpeg.len() / 1024,
            raw_path.file_name()
        );
        Ok(preview_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use std::io::Cursor;

    fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 255) as u8, (y % 255) as u8, ((x + y) % 255) as u8])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    fn fake_raw(jpegs: &[&[u8]]) -> Vec<u8> {
        let mut data = b"II*\0fake raw header".to_vec();
        for jpeg in jpegs {
            data.extend_from_slice(&[0u8; 64]);
            data.extend_from_slice(jpeg);
        }
        data.extend_from_slice(&[0x12; 128]);
        data
    }

    #[test]
    fn test_convert_writes_largest_preview() {
        let dir = tempfile::tempdir().unwrap();
        let small = encode_jpeg(16, 16);
        let large = encode_jpeg(160, 120);
        let raw_path = dir.path().join("DSC_0042.NEF");
        std::fs::write(&raw_path, fake_raw(&[&small, &large])).unwrap();

        let converter = EmbeddedPreviewConverter::with_min_size(0);
        let preview = converter.convert(&raw_path).unwrap();

        assert_eq!(preview, dir.path().join("DSC_0042.jpg"));
        let written = std::fs::read(&preview).unwrap();
        assert_eq!(written, large);
        let decoded = image::load_from_memory(&written).unwrap();
        assert_eq!(decoded.width(), 160);
    }

    #[test]
    fn test_convert_ignores_small_thumbnails() {
        let dir = tempfile::tempdir().unwrap();
        let small = encode_jpeg(16, 16);
        let raw_path = dir.path().join("IMG_1.CR2");
        std::fs::write(&raw_path, fake_raw(&[&small])).unwrap();

        let converter = EmbeddedPreviewConverter::with_min_size(small.len() + 1);
        let err = converter.convert(&raw_path).unwrap_err();
        assert!(matches!(err, PipelineError::Conversion { .. }));
        assert!(!dir.path().join("IMG_1.jpg").exists());
    }

    #[test]
    fn test_convert_without_preview_fails() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("broken.ARW");
        std::fs::write(&raw_path, [0u8; 1024]).unwrap();

        let err = EmbeddedPreviewConverter::new().convert(&raw_path).unwrap_err();
        assert!(err.to_string().contains("broken.ARW"));
    }

    #[test]
    fn test_convert_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = EmbeddedPreviewConverter::new()
            .convert(&dir.path().join("missing.NEF"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Conversion { .. }));
    }
}
