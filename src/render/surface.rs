//! Owned RGBA8 target surface.

use crate::foundation::core::Region;
use crate::foundation::error::{CoverpressError, CoverpressResult};

/// Opaque white, the neutral background for every export.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// An owned straight-alpha RGBA8 canvas, row-major, tightly packed.
///
/// Every export allocates its own canvas; nothing is shared between calls.
#[derive(Clone, Debug)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Allocate a white-filled canvas.
    ///
    /// Allocation failure (plausible at 3000x3000 under memory pressure) is
    /// reported as [`CoverpressError::Encoding`] so callers can retry at the
    /// standard preset.
    pub fn new(width: u32, height: u32) -> CoverpressResult<Self> {
        if width == 0 || height == 0 {
            return Err(CoverpressError::validation(format!(
                "canvas dimensions {width}x{height} must be non-zero"
            )));
        }
        let len = width as usize * height as usize * 4;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            CoverpressError::encoding(format!("failed to allocate {width}x{height} canvas: {e}"))
        })?;
        data.resize(len, 255);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Read one pixel. Panics when out of bounds (test/diagnostic helper).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Fill a rectangle, clipped to the canvas bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, rgba: [u8; 4]) {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        for py in y1..y2 {
            let row = (py as usize * self.width as usize + x1 as usize) * 4;
            for px in self.data[row..row + (x2 - x1) as usize * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
    }

    /// Copy a region's pixels out into a packed RGBA8 buffer.
    ///
    /// The region must lie fully inside the canvas.
    pub fn copy_region(&self, region: &Region) -> Vec<u8> {
        debug_assert!(region.x + region.width <= self.width);
        debug_assert!(region.y + region.height <= self.height);
        let mut out = Vec::with_capacity(region.width as usize * region.height as usize * 4);
        for py in region.y..region.y + region.height {
            let row = (py as usize * self.width as usize + region.x as usize) * 4;
            out.extend_from_slice(&self.data[row..row + region.width as usize * 4]);
        }
        out
    }

    /// Write a packed RGBA8 buffer back into a region.
    pub fn blit_region(&mut self, region: &Region, pixels: &[u8]) -> CoverpressResult<()> {
        let expected = region.width as usize * region.height as usize * 4;
        if pixels.len() != expected {
            return Err(CoverpressError::validation(format!(
                "blit buffer length {} does not match region {}x{}",
                pixels.len(),
                region.width,
                region.height
            )));
        }
        let stride = region.width as usize * 4;
        for (i, py) in (region.y..region.y + region.height).enumerate() {
            let row = (py as usize * self.width as usize + region.x as usize) * 4;
            self.data[row..row + stride].copy_from_slice(&pixels[i * stride..(i + 1) * stride]);
        }
        Ok(())
    }

    /// Convert into an [`image::RgbaImage`] for encoding.
    pub fn into_rgba_image(self) -> image::RgbaImage {
        // Length invariant is maintained by construction.
        image::RgbaImage::from_raw(self.width, self.height, self.data)
            .expect("canvas buffer length matches dimensions")
    }
}
