use crate::foundation::error::{CoverpressError, CoverpressResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Maximum number of standard images accepted by a single batch.
pub const MAX_IMAGES: usize = 20;

/// Per-image edit state driving both preview and export rendering.
///
/// All fields are independently optional in effect: the neutral value (0, or
/// 1.0 for `zoom`) is an exact no-op, and the per-pixel pass produces
/// identical output whether a neutral step is skipped or computed.
///
/// Documented domains (enforced by the surrounding UI, not by the core):
/// `zoom` in `[0.1, 3.0]`; `x`/`y` in preview-canvas pixels, UI range
/// `[-200, 200]`; `brightness`/`contrast`/`saturation` in `[-50, 50]`;
/// `highlights` and `sharpness` in `[-20, 20]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EditParams {
    /// Uniform scale multiplier applied on top of the automatic cover-fit
    /// scale.
    #[serde(default = "default_zoom")]
    pub zoom: f32,
    /// Horizontal pan offset in preview-canvas pixels.
    #[serde(default)]
    pub x: f32,
    /// Vertical pan offset in preview-canvas pixels.
    #[serde(default)]
    pub y: f32,
    /// Brightness offset, percentage-like.
    #[serde(default)]
    pub brightness: f32,
    /// Contrast offset, percentage-like.
    #[serde(default)]
    pub contrast: f32,
    /// Saturation offset, percentage-like.
    #[serde(default)]
    pub saturation: f32,
    /// Luminance-proportional highlight boost.
    #[serde(default)]
    pub highlights: f32,
    /// Midtone contrast boost standing in for sharpening.
    #[serde(default)]
    pub sharpness: f32,
}

fn default_zoom() -> f32 {
    1.0
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            x: 0.0,
            y: 0.0,
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            highlights: 0.0,
            sharpness: 0.0,
        }
    }
}

impl EditParams {
    /// Return `true` when every color-adjustment field is neutral, i.e. the
    /// per-pixel pass can be skipped entirely.
    pub fn is_neutral_color(&self) -> bool {
        self.brightness == 0.0
            && self.contrast == 0.0
            && self.saturation == 0.0
            && self.highlights == 0.0
            && self.sharpness == 0.0
    }
}

/// An immutable decoded raster, straight-alpha RGBA8, row-major.
///
/// Owned by the surrounding application; render and export calls only borrow
/// it for their duration and never mutate it.
#[derive(Clone, Debug)]
pub struct SourceImage {
    width: u32,
    height: u32,
    rgba8: Vec<u8>,
}

impl SourceImage {
    /// Wrap an already-decoded RGBA8 buffer.
    ///
    /// The buffer length must be exactly `width * height * 4`. Zero
    /// dimensions are accepted here and rejected later by the transform
    /// calculator, so batch callers can carry undecodable entries up to the
    /// per-item failure point.
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> CoverpressResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(CoverpressError::validation(format!(
                "rgba8 buffer length {} does not match {width}x{height} (expected {expected})",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }
}

/// Logical name of a destination region inside a target canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionName {
    /// Single full-bleed region used for standard exports.
    Full,
    /// Cover layout: top band spanning the full width.
    Top,
    /// Cover layout: bottom-left half.
    BottomLeft,
    /// Cover layout: bottom-right half.
    BottomRight,
}

impl RegionName {
    /// Stable string form used in error messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionName::Full => "full",
            RegionName::Top => "top",
            RegionName::BottomLeft => "bottomLeft",
            RegionName::BottomRight => "bottomRight",
        }
    }
}

impl std::fmt::Display for RegionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named destination rectangle inside a target canvas, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    /// Logical name.
    pub name: RegionName,
    /// Left offset in the target canvas.
    pub x: u32,
    /// Top offset in the target canvas.
    pub y: u32,
    /// Region width.
    pub width: u32,
    /// Region height.
    pub height: u32,
}

impl Region {
    /// Build a region from name and pixel bounds.
    pub fn new(name: RegionName, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            name,
            x,
            y,
            width,
            height,
        }
    }

    /// The region bounds as a kurbo [`Rect`].
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x + self.width),
            f64::from(self.y + self.height),
        )
    }
}

/// Named output resolution selectable by the user.
///
/// The preset set is fixed: the original product exposes exactly these two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// 1080x1080, JPEG quality 90.
    Standard,
    /// 3000x3000, JPEG quality 95.
    High,
}

impl Resolution {
    /// The concrete preset for this resolution.
    pub fn preset(self) -> &'static ResolutionPreset {
        match self {
            Resolution::Standard => &STANDARD_PRESET,
            Resolution::High => &HIGH_PRESET,
        }
    }
}

/// Concrete output configuration backing a [`Resolution`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolutionPreset {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// JPEG encode quality, 1..=100.
    pub quality: u8,
    /// Label used in exported filenames.
    pub label: &'static str,
}

static STANDARD_PRESET: ResolutionPreset = ResolutionPreset {
    width: 1080,
    height: 1080,
    quality: 90,
    label: "1080x1080",
};

static HIGH_PRESET: ResolutionPreset = ResolutionPreset {
    width: 3000,
    height: 3000,
    quality: 95,
    label: "3000x3000",
};
