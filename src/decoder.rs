use image::{GenericImageView, ImageReader};
use std::fs;
use std::path::Path;

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, before it is blitted into a window)
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
    pub format_name: String,
}

impl DecodedImage {
    pub fn mem_size(&self) -> u64 {
        self.rgba_bytes.len() as u64
    }
}

/// Turns a path into pixels. Called from decode worker threads, so it must
/// be shareable.
pub trait Decoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDecoder;

impl Decoder for ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let file_size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format_name = reader
            .format()
            .map(|f| format!("{:?}", f).to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string());

        let img = reader.decode()?;
        let (width, height) = img.dimensions();

        Ok(DecodedImage {
            rgba_bytes: img.to_rgba8().into_raw(),
            width,
            height,
            file_size,
            format_name,
        })
    }
}
