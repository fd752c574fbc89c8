//! Fixed multi-region layouts and the compositor that fills them.

use crate::foundation::core::{EditParams, Region, RegionName, SourceImage};
use crate::foundation::error::CoverpressResult;
use crate::render::region::render_region;
use crate::render::surface::Canvas;

/// Height fraction of the cover layout's top band. Invariant across output
/// resolutions; only absolute pixel sizes scale.
pub const COVER_TOP_HEIGHT_RATIO: f64 = 696.0 / 1080.0;

/// Available region layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One full-bleed region, used for standard single-image exports.
    Single,
    /// Cover layout: full-width top band plus two bottom halves.
    Cover,
}

/// One image plus its edit state, assigned to a region.
pub type Assignment<'a> = (&'a SourceImage, &'a EditParams);

/// Region assignments for a composite. Unassigned cover slots are rendered
/// as plain background fill, which is not an error.
#[derive(Clone, Copy, Debug, Default)]
pub enum LayoutSlots<'a> {
    /// No assignment at all; the canvas stays white.
    #[default]
    Empty,
    /// Single full-bleed image.
    Single(Assignment<'a>),
    /// Cover layout slots, each optional.
    Cover {
        /// Top band.
        top: Option<Assignment<'a>>,
        /// Bottom-left half.
        bottom_left: Option<Assignment<'a>>,
        /// Bottom-right half.
        bottom_right: Option<Assignment<'a>>,
    },
}

impl LayoutSlots<'_> {
    /// The layout these slots belong to.
    pub fn layout(&self) -> Layout {
        match self {
            LayoutSlots::Empty | LayoutSlots::Single(_) => Layout::Single,
            LayoutSlots::Cover { .. } => Layout::Cover,
        }
    }

    /// Return `true` when at least one slot carries an image.
    pub fn any_assigned(&self) -> bool {
        match self {
            LayoutSlots::Empty => false,
            LayoutSlots::Single(_) => true,
            LayoutSlots::Cover {
                top,
                bottom_left,
                bottom_right,
            } => top.is_some() || bottom_left.is_some() || bottom_right.is_some(),
        }
    }
}

/// Compute the region set for `layout` on a `width x height` canvas.
///
/// Cover geometry matches the product layout: top band height is
/// `round(height * 696/1080)` at full width, the remainder splits at
/// `round(width / 2)`.
pub fn regions(layout: Layout, width: u32, height: u32) -> Vec<Region> {
    match layout {
        Layout::Single => vec![Region::new(RegionName::Full, 0, 0, width, height)],
        Layout::Cover => {
            let top_h = (f64::from(height) * COVER_TOP_HEIGHT_RATIO).round() as u32;
            let bottom_h = height - top_h;
            let half_w = (f64::from(width) / 2.0).round() as u32;
            vec![
                Region::new(RegionName::Top, 0, 0, width, top_h),
                Region::new(RegionName::BottomLeft, 0, top_h, half_w, bottom_h),
                Region::new(
                    RegionName::BottomRight,
                    half_w,
                    top_h,
                    width - half_w,
                    bottom_h,
                ),
            ]
        }
    }
}

/// Render the assigned slots into `canvas`.
///
/// The canvas is expected to be freshly allocated (white). Rendering order is
/// fixed — top, bottomLeft, bottomRight — for reproducibility; the regions do
/// not overlap, so the order has no visual effect.
pub fn composite(canvas: &mut Canvas, slots: &LayoutSlots<'_>) -> CoverpressResult<()> {
    let layout = slots.layout();
    let region_set = regions(layout, canvas.width(), canvas.height());

    match *slots {
        LayoutSlots::Empty => {}
        LayoutSlots::Single((source, params)) => {
            render_region(canvas, source, params, &region_set[0])?;
        }
        LayoutSlots::Cover {
            top,
            bottom_left,
            bottom_right,
        } => {
            for (assignment, region) in [top, bottom_left, bottom_right].into_iter().zip(&region_set) {
                if let Some((source, params)) = assignment {
                    render_region(canvas, source, params, region)?;
                }
            }
        }
    }
    Ok(())
}
