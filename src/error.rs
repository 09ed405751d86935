//! Error handling for viewport-gizmo
//!
//! Recoverable failures (bad viewport dimensions, degenerate axis triads) are
//! reported through [`GizmoError`]. Contract violations — asking for the
//! direction of an axis that has none in the current view mode — panic
//! instead; see the crate-level docs.

use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Result type for viewport-gizmo operations
pub type GizmoResult<T> = Result<T, GizmoError>;

/// Errors that can occur in viewport-gizmo operations
#[derive(Error, Debug)]
pub enum GizmoError {
    /// Invalid viewport configuration
    #[error("Invalid viewport: {reason}")]
    InvalidViewport {
        /// The reason why the viewport is invalid
        reason: String,
    },

    /// An axis triad that is not usable (zero-length or non-orthogonal axes)
    #[error("Invalid axis triad: {reason}")]
    InvalidAxes {
        /// The reason why the axes are invalid
        reason: String,
    },

    /// A camera frame whose basis cannot be orthonormalized
    #[error("Invalid camera frame: {reason}")]
    InvalidFrame {
        /// The reason why the frame is invalid
        reason: String,
    },
}

impl GizmoError {
    /// Create an invalid viewport error
    pub fn invalid_viewport(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid viewport: {}", reason);
        Self::InvalidViewport { reason }
    }

    /// Create an invalid axes error
    pub fn invalid_axes(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid axis triad: {}", reason);
        Self::InvalidAxes { reason }
    }

    /// Create an invalid frame error
    pub fn invalid_frame(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        #[cfg(feature = "tracing")]
        warn!("Invalid camera frame: {}", reason);
        Self::InvalidFrame { reason }
    }
}

/// Macro for conditional trace logging
#[macro_export]
macro_rules! gizmo_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::trace!($($arg)*);
    };
}

/// Macro for conditional debug logging
#[macro_export]
macro_rules! gizmo_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}
