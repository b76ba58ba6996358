//! Error type shared by the navigation core.
//!
//! Only hard precondition failures are errors. An unreachable target is a
//! soft failure reported as `None`, and geometry edge cases inside the
//! generator are repaired or skipped without surfacing here.

use thiserror::Error;

/// Errors produced by the navigation core.
#[derive(Debug, Error)]
pub enum NavError {
    /// Grid input is empty, ragged, or holds values other than 0/1.
    /// This points at a generation bug upstream, so callers should not retry.
    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: String },

    /// Cell size must be finite and positive.
    #[error("invalid cell size {0}")]
    InvalidCellSize(f32),

    /// World extent must be finite and positive.
    #[error("invalid world dimensions {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    /// Configuration failed to parse or validate.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl NavError {
    pub(crate) fn invalid_grid(reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            reason: reason.into(),
        }
    }

    /// True for errors caused by malformed grid input.
    pub fn is_invalid_grid(&self) -> bool {
        matches!(self, Self::InvalidGrid { .. })
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
