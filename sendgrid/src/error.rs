//! # Error
//!
//! Module dedicated to SendGrid mail errors. It contains an [`Error`]
//! enum based on [`thiserror::Error`] and a type alias [`Result`].

use std::{io, path::PathBuf};

use thiserror::Error;

/// The global `Result` alias of the library.
pub type Result<T> = std::result::Result<T, Error>;

/// The global `Error` enum of the library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot build mail: no API secret key has been set")]
    MissingApiKeyError,
    #[error("cannot read attachment at {1}")]
    ReadAttachmentError(#[source] io::Error, PathBuf),
    #[error("cannot attach {0}: not a valid file")]
    AttachmentNotAFileError(PathBuf),
    #[error("cannot attach {1}: {0} is not a valid content type")]
    InvalidAttachmentTypeError(String, PathBuf),
    #[error("cannot serialize mail to JSON")]
    SerializeMailError(#[source] serde_json::Error),
}
