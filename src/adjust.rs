//! Manual per-pixel color adjustment.
//!
//! This is the single canonical filter path: the same math runs for the live
//! preview and for every export resolution, so results are pixel-reproducible
//! across targets (context-level filter primitives are not).

use rayon::prelude::*;

use crate::foundation::core::EditParams;

/// Pixels per rayon work unit. Each pixel is independent, so the split point
/// only affects scheduling granularity.
const PAR_CHUNK_PIXELS: usize = 16 * 1024;

/// Apply the color-adjustment pass to a straight-alpha RGBA8 buffer in place.
///
/// Steps run in a fixed order per pixel, each conditioned on its parameter
/// being non-zero; later steps read the output of earlier ones, so effects
/// compound:
///
/// 1. brightness (uniform channel offset)
/// 2. contrast (pivot around mid-gray)
/// 3. saturation (lerp from Rec.601 luma)
/// 4. highlights (uniform add proportional to mean luminance)
/// 5. sharpness (contrast boost restricted to midtones, `64 < L < 192`)
/// 6. clamp to `[0, 255]`
///
/// Alpha is never touched. Neutral parameters produce a byte-identical
/// buffer, whether the step is skipped or computed. Total over finite
/// parameter values; callers guarantee finiteness.
pub fn apply_adjustments(pixels: &mut [u8], params: &EditParams) {
    debug_assert!(pixels.len().is_multiple_of(4));
    if params.is_neutral_color() {
        return;
    }

    pixels
        .par_chunks_mut(4 * PAR_CHUNK_PIXELS)
        .for_each(|chunk| {
            for px in chunk.chunks_exact_mut(4) {
                adjust_pixel(px, params);
            }
        });
}

fn adjust_pixel(px: &mut [u8], params: &EditParams) {
    let mut r = f32::from(px[0]);
    let mut g = f32::from(px[1]);
    let mut b = f32::from(px[2]);

    if params.brightness != 0.0 {
        let delta = params.brightness / 100.0 * 255.0;
        r += delta;
        g += delta;
        b += delta;
    }

    if params.contrast != 0.0 {
        let factor = (params.contrast + 100.0) / 100.0;
        r = ((r / 255.0 - 0.5) * factor + 0.5) * 255.0;
        g = ((g / 255.0 - 0.5) * factor + 0.5) * 255.0;
        b = ((b / 255.0 - 0.5) * factor + 0.5) * 255.0;
    }

    if params.saturation != 0.0 {
        // Luma of the current (possibly brightness/contrast-adjusted) values.
        let gray = 0.299 * r + 0.587 * g + 0.114 * b;
        let factor = (params.saturation + 100.0) / 100.0;
        r = gray + (r - gray) * factor;
        g = gray + (g - gray) * factor;
        b = gray + (b - gray) * factor;
    }

    if params.highlights != 0.0 {
        let lum = (r + g + b) / 3.0;
        let delta = (lum / 255.0) * (params.highlights / 100.0) * 255.0;
        r += delta;
        g += delta;
        b += delta;
    }

    if params.sharpness != 0.0 {
        let lum = (r + g + b) / 3.0;
        if lum > 64.0 && lum < 192.0 {
            let factor = 1.0 + params.sharpness / 100.0;
            r = ((r / 255.0 - 0.5) * factor + 0.5) * 255.0;
            g = ((g / 255.0 - 0.5) * factor + 0.5) * 255.0;
            b = ((b / 255.0 - 0.5) * factor + 0.5) * 255.0;
        }
    }

    px[0] = clamp_channel(r);
    px[1] = clamp_channel(g);
    px[2] = clamp_channel(b);
}

fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn px(r: u8, g: u8, b: u8) -> Vec<u8> {
        vec![r, g, b, 255]
    }

    #[test]
    fn neutral_params_are_byte_identical() {
        let mut buf: Vec<u8> = (0..=255u8).flat_map(|v| [v, 255 - v, v / 2, v]).collect();
        let before = buf.clone();
        apply_adjustments(&mut buf, &EditParams::default());
        assert_eq!(buf, before);
    }

    #[test]
    fn brightness_shifts_midtones_linearly() {
        let mut buf = px(128, 128, 128);
        apply_adjustments(
            &mut buf,
            &EditParams {
                brightness: 20.0,
                ..EditParams::default()
            },
        );
        // 128 + 0.20 * 255 = 179
        assert_eq!(&buf[..3], &[179, 179, 179]);
        assert_eq!(buf[3], 255);
    }

    #[test]
    fn extreme_brightness_clamps_instead_of_wrapping() {
        let mut buf = px(250, 250, 250);
        apply_adjustments(
            &mut buf,
            &EditParams {
                brightness: 50.0,
                ..EditParams::default()
            },
        );
        assert_eq!(&buf[..3], &[255, 255, 255]);
    }

    #[test]
    fn negative_brightness_clamps_at_zero() {
        let mut buf = px(5, 5, 5);
        apply_adjustments(
            &mut buf,
            &EditParams {
                brightness: -50.0,
                ..EditParams::default()
            },
        );
        assert_eq!(&buf[..3], &[0, 0, 0]);
    }

    #[test]
    fn contrast_pivots_around_mid_gray() {
        let mut buf = px(128, 64, 192);
        apply_adjustments(
            &mut buf,
            &EditParams {
                contrast: 50.0,
                ..EditParams::default()
            },
        );
        // ((c/255 - 0.5) * 1.5 + 0.5) * 255
        assert_eq!(buf[0], 128); // mid-gray is a fixed point (127.5 -> 128)
        assert_eq!(buf[1], 32);
        assert_eq!(buf[2], 224);
    }

    #[test]
    fn full_desaturation_converges_to_luma() {
        let mut buf = px(200, 100, 50);
        apply_adjustments(
            &mut buf,
            &EditParams {
                saturation: -100.0,
                ..EditParams::default()
            },
        );
        let gray = (0.299 * 200.0 + 0.587 * 100.0 + 0.114 * 50.0f32).round() as u8;
        assert_eq!(&buf[..3], &[gray, gray, gray]);
    }

    #[test]
    fn highlights_scale_with_luminance() {
        let mut dark = px(30, 30, 30);
        let mut bright = px(210, 210, 210);
        let p = EditParams {
            highlights: 20.0,
            ..EditParams::default()
        };
        apply_adjustments(&mut dark, &p);
        apply_adjustments(&mut bright, &p);
        let dark_gain = i32::from(dark[0]) - 30;
        let bright_gain = i32::from(bright[0]) - 210;
        assert!(dark_gain < bright_gain);
        // factor = (L/255) * (20/100); delta = factor * 255 = L * 0.2
        assert_eq!(bright[0], 210 + 42);
    }

    #[test]
    fn sharpness_only_touches_midtones() {
        let p = EditParams {
            sharpness: 20.0,
            ..EditParams::default()
        };

        let mut shadow = px(40, 40, 40);
        apply_adjustments(&mut shadow, &p);
        assert_eq!(&shadow[..3], &[40, 40, 40]);

        let mut highlight = px(220, 220, 220);
        apply_adjustments(&mut highlight, &p);
        assert_eq!(&highlight[..3], &[220, 220, 220]);

        let mut midtone = px(100, 100, 100);
        apply_adjustments(&mut midtone, &p);
        let factor = 1.0 + 20.0f32 / 100.0;
        let expected = (((100.0f32 / 255.0 - 0.5) * factor + 0.5) * 255.0).round() as u8;
        assert_eq!(&midtone[..3], &[expected, expected, expected]);
        assert!(midtone[0] < 100);
    }

    #[test]
    fn steps_compound_in_declared_order() {
        // brightness then contrast, not each applied to the input
        // independently.
        let mut buf = px(100, 100, 100);
        apply_adjustments(
            &mut buf,
            &EditParams {
                brightness: 20.0,
                contrast: 50.0,
                ..EditParams::default()
            },
        );
        // brightness: 100 + 51 = 151; contrast: ((151/255-0.5)*1.5+0.5)*255
        let after_brightness = 151.0f32;
        let expected = ((after_brightness / 255.0 - 0.5) * 1.5 + 0.5) * 255.0;
        assert_eq!(buf[0], expected.round() as u8);
    }

    #[test]
    fn alpha_is_never_modified() {
        let mut buf = vec![10, 20, 30, 77, 200, 210, 220, 5];
        apply_adjustments(
            &mut buf,
            &EditParams {
                brightness: 40.0,
                saturation: 30.0,
                ..EditParams::default()
            },
        );
        assert_eq!(buf[3], 77);
        assert_eq!(buf[7], 5);
    }
}
