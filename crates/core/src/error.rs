//! Error taxonomy and command outcomes.

use std::{fmt, path::PathBuf};

use thiserror::Error;

use crate::{image::ImageError, remote::RemoteError};

/// A draft that cannot be submitted as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    /// Title is blank.
    #[error("title is required")]
    MissingTitle,
    /// Genre is blank.
    #[error("genre is required")]
    MissingGenre,
    /// Description is blank.
    #[error("description is required")]
    MissingDescription,
    /// Neither an image file nor an image URL was given.
    #[error("an image file or image URL is required")]
    MissingImage,
    /// Rating outside the 0–10 input bound.
    #[error("rating {0} is outside 0-10")]
    RatingOutOfRange(f64),
    /// Image file extension is not a known image type.
    #[error("unsupported image type for {}", .0.display())]
    UnsupportedImage(PathBuf),
}

/// Any failure raised by a catalog command.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Client-side validation rejected the draft.
    #[error("invalid draft: {0}")]
    Validation(#[from] DraftError),
    /// The attached image could not be prepared.
    #[error(transparent)]
    Image(#[from] ImageError),
    /// The remote catalog failed or refused the request.
    #[error(transparent)]
    Remote(#[from] RemoteError),
    /// The command is not valid in the current state.
    #[error("{0}")]
    InvalidState(&'static str),
}

impl CatalogError {
    /// Whether the user can reasonably retry or correct the input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Image(_) | Self::InvalidState(_) => true,
            Self::Remote(err) => err.is_recoverable(),
        }
    }
}

/// Typed result of a controller command, suitable for a status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed.
    Success {
        /// Short confirmation.
        message: String,
    },
    /// The command failed but may be retried or fixed.
    Recoverable {
        /// What went wrong.
        message: String,
    },
    /// The command failed in a way retrying will not fix.
    Fatal {
        /// What went wrong.
        message: String,
    },
}

impl Outcome {
    /// Successful outcome with `message`.
    pub fn success(message: impl Into<String>) -> Self {
        Self::Success {
            message: message.into(),
        }
    }

    /// True for [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// True for failures that warrant a retry affordance.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable { .. })
    }

    /// Message carried by any variant.
    pub fn message(&self) -> &str {
        match self {
            Self::Success { message } | Self::Recoverable { message } | Self::Fatal { message } => {
                message
            }
        }
    }
}

impl From<&CatalogError> for Outcome {
    fn from(err: &CatalogError) -> Self {
        let message = err.to_string();
        if err.is_recoverable() {
            Self::Recoverable { message }
        } else {
            Self::Fatal { message }
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_errors_by_recoverability() {
        let validation = CatalogError::from(DraftError::MissingTitle);
        assert_eq!(
            Outcome::from(&validation),
            Outcome::Recoverable {
                message: "invalid draft: title is required".to_string()
            }
        );

        let rejected = CatalogError::from(RemoteError::Status {
            status: 400,
            message: "Game ID required".to_string(),
        });
        let outcome = Outcome::from(&rejected);
        assert!(matches!(outcome, Outcome::Fatal { .. }));
        assert_eq!(outcome.message(), "catalog returned 400: Game ID required");

        let unavailable = CatalogError::from(RemoteError::Status {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert!(Outcome::from(&unavailable).is_recoverable());
    }
}
