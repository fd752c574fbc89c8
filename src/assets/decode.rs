//! Decoding uploaded files into [`SourceImage`]s.
//!
//! The compositing core never parses raw file bytes itself; this is the
//! single-result decode operation it consumes.

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::SourceImage;
use crate::foundation::error::CoverpressResult;

/// Decode an encoded image (any format the `image` crate supports) into a
/// straight-alpha RGBA8 [`SourceImage`].
pub fn decode_source(bytes: &[u8]) -> CoverpressResult<SourceImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    SourceImage::from_rgba8(width, height, rgba.into_raw())
}

/// Read and decode an image file from disk.
pub fn decode_source_file(path: &Path) -> CoverpressResult<SourceImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode_source(&bytes)
}
