//! Module dedicated to the building of mail attachments.

use std::{fs, path::Path};

use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::debug;

use crate::{mail::Attachment, Error, Result, SendGridConfig};

const DISPOSITION_ATTACHMENT: &str = "attachment";
const NONAME: &str = "noname";

impl Attachment {
    /// Build an attachment out of the file located at the given path.
    ///
    /// The MIME type is guessed from the file content and must be
    /// accepted by the given configuration. The filename defaults to
    /// the file name of the path.
    pub fn from_path(
        path: impl AsRef<Path>,
        filename: Option<&str>,
        config: &SendGridConfig,
    ) -> Result<Self> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(Error::AttachmentNotAFileError(path.to_owned()));
        }

        let data = fs::read(path).map_err(|err| Error::ReadAttachmentError(err, path.to_owned()))?;
        let mime_type = tree_magic_mini::from_u8(&data);
        debug!(?path, mime_type, "guessed attachment type");

        if !config.is_valid_attachment_type(mime_type) {
            let mime_type = mime_type.to_owned();
            return Err(Error::InvalidAttachmentTypeError(mime_type, path.to_owned()));
        }

        let filename = match filename {
            Some(filename) => filename.to_owned(),
            None => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| NONAME.to_owned()),
        };

        Ok(Self::from_content(filename, mime_type, data))
    }

    /// Build an attachment out of raw content.
    pub fn from_content(
        filename: impl ToString,
        mime_type: impl ToString,
        data: impl AsRef<[u8]>,
    ) -> Self {
        Self {
            content: STANDARD.encode(data),
            mime_type: mime_type.to_string(),
            filename: filename.to_string(),
            disposition: DISPOSITION_ATTACHMENT.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use crate::{mail::Attachment, Error, SendGridConfig};

    #[test]
    fn from_content() {
        let attachment = Attachment::from_content("hello.txt", "text/plain", b"Hello");
        assert_eq!(attachment.content, "SGVsbG8=");
        assert_eq!(attachment.mime_type, "text/plain");
        assert_eq!(attachment.filename, "hello.txt");
        assert_eq!(attachment.disposition, "attachment");
    }

    #[test]
    fn from_text_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Some notes.\nMore notes.\n").unwrap();

        let config = SendGridConfig::default();
        let attachment = Attachment::from_path(&path, None, &config).unwrap();
        assert_eq!(attachment.filename, "notes.txt");
        assert!(attachment.mime_type.starts_with("text/"));

        let attachment = Attachment::from_path(&path, Some("renamed.txt"), &config).unwrap();
        assert_eq!(attachment.filename, "renamed.txt");
    }

    #[test]
    fn invalid_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "Some notes.\n").unwrap();

        let config = SendGridConfig {
            valid_attachment_types: Some(vec!["image/".into()]),
            ..Default::default()
        };

        match Attachment::from_path(&path, None, &config).unwrap_err() {
            Error::InvalidAttachmentTypeError(_, p) => assert_eq!(p, path),
            err => panic!("unexpected error: {err:?}"),
        }
    }

    #[test]
    fn not_a_file() {
        let dir = tempdir().unwrap();
        let config = SendGridConfig::default();

        match Attachment::from_path(dir.path(), None, &config).unwrap_err() {
            Error::AttachmentNotAFileError(p) => assert_eq!(p, dir.path()),
            err => panic!("unexpected error: {err:?}"),
        }
    }
}
