//! Coverpress composites user-edited photos into fixed layouts and exports
//! them as JPEG buffers at multiple resolutions.
//!
//! The pipeline, leaf to root:
//!
//! - [`adjust`]: manual per-pixel color adjustment (brightness, contrast,
//!   saturation, highlights, sharpness), identical across preview and export
//!   targets
//! - [`transform`]: cover-fit pan/zoom placement with preview-to-export pan
//!   rescaling
//! - [`render`]: region renderer and layout compositor (single full-bleed, or
//!   the three-region cover layout)
//! - [`export`]: resolution presets, JPEG encoding, filename derivation
//! - [`archive`]: sequential batch export with per-item failure isolation,
//!   delivered through an [`ArchiveSink`] collaborator
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Manual per-pixel color adjustment.
pub mod adjust;
/// Batch export and the archive collaborator seam.
pub mod archive;
/// Source asset decoding.
pub mod assets;
/// Export at resolution presets.
pub mod export;
mod foundation;
/// CPU rendering of regions and layouts.
pub mod render;
/// Pan/zoom placement math.
pub mod transform;

pub use crate::foundation::core::{
    EditParams, MAX_IMAGES, Region, RegionName, Resolution, ResolutionPreset, SourceImage,
};
pub use crate::foundation::error::{CoverpressError, CoverpressResult};

pub use crate::adjust::apply_adjustments;
pub use crate::archive::{
    ArchiveEntry, ArchiveSink, BatchItem, BatchReport, CancelToken, CoverSlots, DirArchive,
    InMemoryArchive, archive_all,
};
pub use crate::assets::decode::{decode_source, decode_source_file};
pub use crate::export::{export_cover, export_filename, export_image, write_export};
pub use crate::render::layout::{Layout, LayoutSlots, composite, regions};
pub use crate::render::surface::Canvas;
pub use crate::transform::{PREVIEW_REFERENCE_WIDTH, Placement, compute_placement};
