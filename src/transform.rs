//! Pan/zoom placement math.
//!
//! Maps user-driven pan/zoom state captured on a small preview canvas to
//! pixel-accurate placement inside an arbitrarily-sized destination region,
//! so the export looks exactly like the preview at any resolution.

use kurbo::Affine;

use crate::foundation::core::Region;
use crate::foundation::error::{CoverpressError, CoverpressResult};

/// Assumed on-screen pixel width of the interactive editing canvas. Pan
/// offsets are captured in preview pixels and rescaled by
/// `dst_width / PREVIEW_REFERENCE_WIDTH` at render time.
pub const PREVIEW_REFERENCE_WIDTH: f64 = 300.0;

/// Affine placement of a source image inside a destination region:
/// a uniform scale and the canvas-space position of the source center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Uniform scale applied to the source image.
    pub scale: f64,
    /// Canvas-space x of the source image center.
    pub translate_x: f64,
    /// Canvas-space y of the source image center.
    pub translate_y: f64,
}

impl Placement {
    /// The full placement transform: translate to the anchor point, scale
    /// uniformly, then center the source on the origin.
    pub fn affine(&self, src_width: u32, src_height: u32) -> Affine {
        Affine::translate((self.translate_x, self.translate_y))
            * Affine::scale(self.scale)
            * Affine::translate((-f64::from(src_width) / 2.0, -f64::from(src_height) / 2.0))
    }
}

/// Compute the cover-fit placement of a `src_width x src_height` image inside
/// `region`, honoring user zoom and pan.
///
/// The scale is `zoom * max(dst_w/src_w, dst_h/src_h)`: the image always
/// fully covers the region, cropping overflow, never letterboxing. Pan values
/// were captured against a preview canvas of width `preview_reference_width`
/// and are rescaled by `region.width / preview_reference_width` so the
/// apparent position matches what the user saw on screen.
///
/// Fails with [`CoverpressError::InvalidSource`] when either source dimension
/// is zero; callers must pass fully decoded, non-empty images.
pub fn compute_placement(
    src_width: u32,
    src_height: u32,
    region: &Region,
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    preview_reference_width: f64,
) -> CoverpressResult<Placement> {
    if src_width == 0 || src_height == 0 {
        return Err(CoverpressError::invalid_source(format!(
            "source dimensions {src_width}x{src_height} must be non-zero"
        )));
    }

    let dst_w = f64::from(region.width);
    let dst_h = f64::from(region.height);

    let h_ratio = dst_w / f64::from(src_width);
    let v_ratio = dst_h / f64::from(src_height);
    let cover_ratio = h_ratio.max(v_ratio);
    let scale = zoom * cover_ratio;

    let scale_factor = dst_w / preview_reference_width;

    Ok(Placement {
        scale,
        translate_x: f64::from(region.x) + dst_w / 2.0 + pan_x * scale_factor,
        translate_y: f64::from(region.y) + dst_h / 2.0 + pan_y * scale_factor,
    })
}
