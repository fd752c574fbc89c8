//! Batch export with per-item failure isolation, delivered through an
//! external archive-packaging collaborator.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context as _;

use crate::export::{COVER_PREFIX, STANDARD_PREFIX, export_cover, export_filename, export_image};
use crate::foundation::core::{EditParams, MAX_IMAGES, Resolution, SourceImage};
use crate::foundation::error::{CoverpressError, CoverpressResult};
use crate::render::layout::Assignment;

/// Default delivery name for a finalized archive.
pub const DEFAULT_ARCHIVE_NAME: &str = "carrossel-autoedit-images.zip";

/// The three-method surface the batch archiver needs from an archive
/// packager: accept named buffers, then finalize once.
///
/// The real compressed-container packager lives outside this crate;
/// [`InMemoryArchive`] backs tests and [`DirArchive`] backs plain
/// directory delivery.
pub trait ArchiveSink {
    /// What finalization produces (an output path, collected entries, ...).
    type Output;

    /// Add one named buffer. Names are expected to be distinct; the
    /// deterministic filename convention guarantees this for distinct stems.
    fn add_file(&mut self, name: &str, bytes: &[u8]) -> CoverpressResult<()>;

    /// Finalize the archive. Called exactly once, after the last entry.
    fn finish(self) -> CoverpressResult<Self::Output>;
}

/// One named buffer collected by [`InMemoryArchive`].
#[derive(Clone, Debug)]
pub struct ArchiveEntry {
    /// Entry filename.
    pub name: String,
    /// Encoded file content.
    pub bytes: Vec<u8>,
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryArchive {
    entries: Vec<ArchiveEntry>,
}

impl InMemoryArchive {
    /// Create an empty in-memory archive.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the entries collected so far.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }
}

impl ArchiveSink for InMemoryArchive {
    type Output = Vec<ArchiveEntry>;

    fn add_file(&mut self, name: &str, bytes: &[u8]) -> CoverpressResult<()> {
        self.entries.push(ArchiveEntry {
            name: name.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }

    fn finish(self) -> CoverpressResult<Self::Output> {
        Ok(self.entries)
    }
}

/// Sink that writes each entry as a file under a directory.
#[derive(Debug)]
pub struct DirArchive {
    dir: PathBuf,
}

impl DirArchive {
    /// Create the directory (and parents) and return a sink writing into it.
    pub fn new(dir: impl Into<PathBuf>) -> CoverpressResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| CoverpressError::archive(format!("create '{}': {e}", dir.display())))?;
        Ok(Self { dir })
    }

    /// The destination directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ArchiveSink for DirArchive {
    type Output = PathBuf;

    fn add_file(&mut self, name: &str, bytes: &[u8]) -> CoverpressResult<()> {
        let path = self.dir.join(name);
        std::fs::write(&path, bytes)
            .map_err(|e| CoverpressError::archive(format!("write '{}': {e}", path.display())))?;
        Ok(())
    }

    fn finish(self) -> CoverpressResult<Self::Output> {
        Ok(self.dir)
    }
}

/// Cooperative cancellation flag checked between batch items.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the next between-item check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Return `true` once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Cover slot assignments for a batch. All-empty means no cover is produced.
#[derive(Clone, Copy, Debug, Default)]
pub struct CoverSlots<'a> {
    /// Top band.
    pub top: Option<Assignment<'a>>,
    /// Bottom-left half.
    pub bottom_left: Option<Assignment<'a>>,
    /// Bottom-right half.
    pub bottom_right: Option<Assignment<'a>>,
}

impl CoverSlots<'_> {
    /// Return `true` when at least one slot carries an image.
    pub fn any_assigned(&self) -> bool {
        self.top.is_some() || self.bottom_left.is_some() || self.bottom_right.is_some()
    }
}

/// One standard image queued for batch export.
#[derive(Clone, Copy, Debug)]
pub struct BatchItem<'a> {
    /// Decoded source raster.
    pub source: &'a SourceImage,
    /// Edit state to apply.
    pub params: &'a EditParams,
    /// Original upload name, used to derive the entry filename.
    pub name: &'a str,
}

/// Outcome summary of a batch run.
///
/// Skipped items are surfaced here rather than silently omitted, so callers
/// can tell the user the archive is partial.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Entries successfully exported and handed to the sink (cover included).
    pub exported: usize,
    /// Names of items whose export failed and was skipped.
    pub skipped: Vec<String>,
}

/// Export the optional cover plus every standard image into `sink`.
///
/// The cover is processed first (only when some slot is assigned), then the
/// items in list order, strictly sequentially: each export allocates a
/// full-resolution canvas, and concurrent high-resolution allocations risk
/// exhausting memory.
///
/// Per-item failure isolation: a failing export is logged, recorded in the
/// report and skipped; the batch always attempts every remaining item. Sink
/// failures (add or finalize) abort the whole batch with
/// [`CoverpressError::Archive`]-level errors, and `cancel` is honored between
/// items with [`CoverpressError::Cancelled`].
#[tracing::instrument(skip_all, fields(items = items.len(), ?resolution))]
pub fn archive_all<S: ArchiveSink>(
    mut sink: S,
    cover: &CoverSlots<'_>,
    items: &[BatchItem<'_>],
    resolution: Resolution,
    cancel: &CancelToken,
) -> CoverpressResult<(S::Output, BatchReport)> {
    if items.len() > MAX_IMAGES {
        return Err(CoverpressError::validation(format!(
            "batch of {} items exceeds the maximum of {MAX_IMAGES}",
            items.len()
        )));
    }

    let mut report = BatchReport::default();

    if cover.any_assigned() {
        match export_cover(cover.top, cover.bottom_left, cover.bottom_right, resolution) {
            Ok(bytes) => {
                let name = export_filename("cover.png", resolution, COVER_PREFIX);
                sink.add_file(&name, &bytes)?;
                report.exported += 1;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping cover composite");
                report.skipped.push("cover".to_string());
            }
        }
    }

    for item in items {
        if cancel.is_cancelled() {
            return Err(CoverpressError::Cancelled {
                completed: report.exported,
            });
        }
        match export_image(item.source, item.params, resolution) {
            Ok(bytes) => {
                let name = export_filename(item.name, resolution, STANDARD_PREFIX);
                sink.add_file(&name, &bytes)?;
                report.exported += 1;
            }
            Err(e) => {
                tracing::warn!(item = item.name, error = %e, "skipping batch item");
                report.skipped.push(item.name.to_string());
            }
        }
    }

    let output = sink.finish()?;
    Ok((output, report))
}

/// Host "save to disk" side effect for a finalized archive buffer.
pub fn write_archive(dir: &Path, bytes: &[u8]) -> CoverpressResult<PathBuf> {
    let path = dir.join(DEFAULT_ARCHIVE_NAME);
    std::fs::write(&path, bytes)
        .with_context(|| format!("write archive '{}'", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_source(width: u32, height: u32, rgba: [u8; 4]) -> SourceImage {
        let data = rgba.repeat(width as usize * height as usize);
        SourceImage::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn cancel_token_flips_once() {
        let t = CancelToken::new();
        assert!(!t.is_cancelled());
        let clone = t.clone();
        clone.cancel();
        assert!(t.is_cancelled());
    }

    #[test]
    fn batch_over_the_image_cap_is_rejected() {
        let source = solid_source(2, 2, [1, 2, 3, 255]);
        let params = EditParams::default();
        let items: Vec<BatchItem<'_>> = (0..MAX_IMAGES + 1)
            .map(|_| BatchItem {
                source: &source,
                params: &params,
                name: "a.png",
            })
            .collect();
        let err = archive_all(
            InMemoryArchive::new(),
            &CoverSlots::default(),
            &items,
            Resolution::Standard,
            &CancelToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CoverpressError::Validation(_)));
    }

    #[test]
    fn cancellation_reports_completed_count() {
        let source = solid_source(2, 2, [1, 2, 3, 255]);
        let params = EditParams::default();
        let items = [BatchItem {
            source: &source,
            params: &params,
            name: "a.png",
        }];
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = archive_all(
            InMemoryArchive::new(),
            &CoverSlots::default(),
            &items,
            Resolution::Standard,
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, CoverpressError::Cancelled { completed: 0 }));
    }

    #[test]
    fn empty_batch_finalizes_empty() {
        let (entries, report) = archive_all(
            InMemoryArchive::new(),
            &CoverSlots::default(),
            &[],
            Resolution::Standard,
            &CancelToken::new(),
        )
        .unwrap();
        assert!(entries.is_empty());
        assert_eq!(report, BatchReport::default());
    }

    #[test]
    fn dir_archive_writes_entries_to_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirArchive::new(tmp.path().join("out")).unwrap();
        sink.add_file("a.jpg", b"hello").unwrap();
        let dir = sink.finish().unwrap();
        assert_eq!(std::fs::read(dir.join("a.jpg")).unwrap(), b"hello");
    }
}
