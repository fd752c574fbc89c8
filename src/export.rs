//! Driving the compositor at a resolution preset and serializing the result.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::core::{EditParams, Resolution, SourceImage};
use crate::foundation::error::{CoverpressError, CoverpressResult};
use crate::render::layout::{Assignment, LayoutSlots, composite};
use crate::render::surface::Canvas;

/// Filename prefix for standard single-image exports.
pub const STANDARD_PREFIX: &str = "facebook";
/// Filename prefix for the cover composite.
pub const COVER_PREFIX: &str = "capa";

/// Export one image with its edit state as an encoded JPEG buffer.
///
/// Allocates a canvas at the preset size, composites the single full-bleed
/// layout and encodes at the preset quality. An [`CoverpressError::Encoding`]
/// failure at [`Resolution::High`] is recoverable; callers may retry at
/// [`Resolution::Standard`].
#[tracing::instrument(skip(source, params))]
pub fn export_image(
    source: &SourceImage,
    params: &EditParams,
    resolution: Resolution,
) -> CoverpressResult<Vec<u8>> {
    let mut canvas = new_canvas(resolution)?;
    composite(&mut canvas, &LayoutSlots::Single((source, params)))?;
    encode_jpeg(canvas, resolution)
}

/// Export the three-region cover composite as an encoded JPEG buffer.
///
/// Each slot is optional; unassigned regions render as white fill.
#[tracing::instrument(skip(top, bottom_left, bottom_right))]
pub fn export_cover(
    top: Option<Assignment<'_>>,
    bottom_left: Option<Assignment<'_>>,
    bottom_right: Option<Assignment<'_>>,
    resolution: Resolution,
) -> CoverpressResult<Vec<u8>> {
    let mut canvas = new_canvas(resolution)?;
    composite(
        &mut canvas,
        &LayoutSlots::Cover {
            top,
            bottom_left,
            bottom_right,
        },
    )?;
    encode_jpeg(canvas, resolution)
}

fn new_canvas(resolution: Resolution) -> CoverpressResult<Canvas> {
    let preset = resolution.preset();
    Canvas::new(preset.width, preset.height)
}

fn encode_jpeg(canvas: Canvas, resolution: Resolution) -> CoverpressResult<Vec<u8>> {
    let preset = resolution.preset();
    // JPEG has no alpha; the canvas is opaque by construction.
    let rgb = image::DynamicImage::ImageRgba8(canvas.into_rgba_image()).into_rgb8();
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut out), preset.quality);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CoverpressError::encoding(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

/// Derive the exported filename from the original upload name.
///
/// Convention: `{prefix}_{stem}_{label}.jpg`, where the stem is the original
/// name minus its final extension ("image" when that leaves nothing).
pub fn export_filename(original_name: &str, resolution: Resolution, prefix: &str) -> String {
    let parts: Vec<&str> = original_name.split('.').collect();
    let stem = parts[..parts.len() - 1].join(".");
    let stem = if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    };
    format!("{prefix}_{stem}_{label}.jpg", label = resolution.preset().label)
}

/// Host "save to disk" side effect: write an encoded buffer under `dir` with
/// the already-derived filename. Returns the full path written.
pub fn write_export(dir: &Path, filename: &str, bytes: &[u8]) -> CoverpressResult<PathBuf> {
    let path = dir.join(filename);
    std::fs::write(&path, bytes)
        .with_context(|| format!("write export '{}'", path.display()))?;
    Ok(path)
}
