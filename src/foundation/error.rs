/// Crate-wide result alias.
pub type CoverpressResult<T> = Result<T, CoverpressError>;

/// Error taxonomy for the compositing and export pipeline.
///
/// Per-item failures inside a batch are caught by the archiver and reported
/// through `BatchReport`; everything else propagates to the caller, which
/// owns the retry policy (e.g. re-export at `Resolution::Standard` after an
/// `Encoding` failure at high resolution).
#[derive(thiserror::Error, Debug)]
pub enum CoverpressError {
    /// Zero-dimension or otherwise unusable source raster.
    #[error("invalid source image: {0}")]
    InvalidSource(String),

    /// Drawing into a region failed. Names the region so callers can skip or
    /// substitute it.
    #[error("render error in region '{region}': {msg}")]
    Render {
        /// Logical name of the region being rendered.
        region: String,
        /// Failure description.
        msg: String,
    },

    /// Canvas-to-buffer serialization failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The archive collaborator failed to accept or finalize entries.
    #[error("archive error: {0}")]
    Archive(String),

    /// Bad caller input outside the per-render taxonomy.
    #[error("validation error: {0}")]
    Validation(String),

    /// Batch processing stopped early via a cancellation token.
    #[error("batch cancelled after {completed} item(s)")]
    Cancelled {
        /// Items fully exported before cancellation was observed.
        completed: usize,
    },

    /// Wrapped external error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoverpressError {
    /// Build an [`CoverpressError::InvalidSource`].
    pub fn invalid_source(msg: impl Into<String>) -> Self {
        Self::InvalidSource(msg.into())
    }

    /// Build a [`CoverpressError::Render`] naming the failing region.
    pub fn render(region: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Render {
            region: region.into(),
            msg: msg.into(),
        }
    }

    /// Build an [`CoverpressError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build an [`CoverpressError::Archive`].
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`CoverpressError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            CoverpressError::invalid_source("x")
                .to_string()
                .contains("invalid source image:")
        );
        assert!(
            CoverpressError::render("top", "x")
                .to_string()
                .contains("render error in region 'top'")
        );
        assert!(
            CoverpressError::encoding("x")
                .to_string()
                .contains("encoding error:")
        );
        assert!(
            CoverpressError::archive("x")
                .to_string()
                .contains("archive error:")
        );
        assert!(
            CoverpressError::validation("x")
                .to_string()
                .contains("validation error:")
        );
    }

    #[test]
    fn cancelled_reports_completed_count() {
        let err = CoverpressError::Cancelled { completed: 3 };
        assert_eq!(err.to_string(), "batch cancelled after 3 item(s)");
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = CoverpressError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
