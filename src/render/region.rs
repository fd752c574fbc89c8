//! Rendering one source image into one region of a target canvas.

use crate::adjust::apply_adjustments;
use crate::foundation::core::{EditParams, Region, SourceImage};
use crate::foundation::error::{CoverpressError, CoverpressResult};
use crate::render::surface::{Canvas, WHITE};
use crate::transform::{PREVIEW_REFERENCE_WIDTH, Placement, compute_placement};

/// Render `source` into `region` of `canvas`.
///
/// The region is filled white first so partially-transparent source pixels
/// composite over a neutral background instead of stale canvas content. The
/// source is then drawn with the cover-fit placement (inverse-mapped,
/// bilinear-sampled), and finally, when any color parameter is non-neutral,
/// the region's pixels are re-extracted, run through the adjustment pass and
/// written back.
///
/// Writes are bounded to the region rectangle; sibling regions are never
/// touched, including on failure.
pub fn render_region(
    canvas: &mut Canvas,
    source: &SourceImage,
    params: &EditParams,
    region: &Region,
) -> CoverpressResult<()> {
    if region.width == 0 || region.height == 0 {
        return Ok(());
    }

    canvas.fill_rect(region.x, region.y, region.width, region.height, WHITE);

    let placement = compute_placement(
        source.width(),
        source.height(),
        region,
        f64::from(params.zoom),
        f64::from(params.x),
        f64::from(params.y),
        PREVIEW_REFERENCE_WIDTH,
    )?;
    if !placement.scale.is_finite() || placement.scale <= 0.0 {
        return Err(CoverpressError::render(
            region.name.as_str(),
            format!("degenerate placement scale {}", placement.scale),
        ));
    }

    tracing::debug!(
        region = region.name.as_str(),
        scale = placement.scale,
        "drawing source into region"
    );
    draw_source(canvas, source, &placement, region);

    if !params.is_neutral_color() {
        let mut pixels = canvas.copy_region(region);
        apply_adjustments(&mut pixels, params);
        canvas.blit_region(region, &pixels)?;
    }

    Ok(())
}

/// Inverse-map every region pixel through the placement and bilinear-sample
/// the source. Pixels mapping outside the source keep the white fill.
fn draw_source(canvas: &mut Canvas, source: &SourceImage, placement: &Placement, region: &Region) {
    let inv_scale = 1.0 / placement.scale;
    let src_w = f64::from(source.width());
    let src_h = f64::from(source.height());

    for py in region.y..region.y + region.height {
        for px in region.x..region.x + region.width {
            // Destination pixel center back to continuous source coordinates.
            let u = (f64::from(px) + 0.5 - placement.translate_x) * inv_scale + src_w / 2.0;
            let v = (f64::from(py) + 0.5 - placement.translate_y) * inv_scale + src_h / 2.0;
            if u < 0.0 || u > src_w || v < 0.0 || v > src_h {
                continue;
            }
            let rgba = sample_bilinear(source, u as f32 - 0.5, v as f32 - 0.5);
            canvas.put_pixel(px, py, over_white(rgba));
        }
    }
}

/// Bilinear sample at pixel-index coordinates, edge-clamped.
fn sample_bilinear(source: &SourceImage, u: f32, v: f32) -> [u8; 4] {
    let max_x = source.width() - 1;
    let max_y = source.height() - 1;

    let uf = u.max(0.0);
    let vf = v.max(0.0);
    let x0 = (uf.floor() as u32).min(max_x);
    let y0 = (vf.floor() as u32).min(max_y);
    let x1 = (x0 + 1).min(max_x);
    let y1 = (y0 + 1).min(max_y);
    let fx = uf - uf.floor();
    let fy = vf - vf.floor();

    let p00 = pixel(source, x0, y0);
    let p10 = pixel(source, x1, y0);
    let p01 = pixel(source, x0, y1);
    let p11 = pixel(source, x1, y1);

    let mut out = [0u8; 4];
    for (i, o) in out.iter_mut().enumerate() {
        let top = lerp(f32::from(p00[i]), f32::from(p10[i]), fx);
        let bottom = lerp(f32::from(p01[i]), f32::from(p11[i]), fx);
        *o = lerp(top, bottom, fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn pixel(source: &SourceImage, x: u32, y: u32) -> [u8; 4] {
    let i = (y as usize * source.width() as usize + x as usize) * 4;
    let d = source.rgba8();
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Composite a straight-alpha pixel over opaque white.
fn over_white(rgba: [u8; 4]) -> [u8; 4] {
    if rgba[3] == 255 {
        return [rgba[0], rgba[1], rgba[2], 255];
    }
    let a = f32::from(rgba[3]) / 255.0;
    let blend = |c: u8| (f32::from(c) * a + 255.0 * (1.0 - a)).round() as u8;
    [blend(rgba[0]), blend(rgba[1]), blend(rgba[2]), 255]
}
