//! Uploaded file utilities, for proof documents and profile pictures

use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_graphql::{InputObject, Result};

use crate::util::current_time;

/// The URL prefix stored files are served under
pub const UPLOADS_ROUTE: &str = "/uploads";

/// A file sent along with a form, base64 encoded
#[derive(InputObject)]
pub struct UploadedFile {
    /// The original name of the file (only the last path component is kept)
    pub file_name: String,
    /// The base64-encoded contents of the file
    pub content: String,
}

impl UploadedFile {
    fn file_name(path: impl AsRef<Path>) -> Result<OsString> {
        let path = path.as_ref();
        path.extension().ok_or("File must have an extension")?;

        path.file_name()
            .map(|file_name| file_name.to_os_string())
            .ok_or_else(|| "Failed to get file name".into())
    }

    /// The name the file is stored under, prefixed by the upload time to keep names unique.
    pub fn stored_name(&self, timestamp_millis: i128) -> Result<String> {
        let file_name = Self::file_name(&self.file_name)?;

        Ok(format!("{}-{}", timestamp_millis, file_name.to_string_lossy()))
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::decode(&self.content)
            .map_err(|err| format!("Couldn't decode file as base64: {}", err).into())
    }

    /// Writes the file into `upload_dir` and returns the public URL it is served at.
    pub fn save(&self, upload_dir: &Path) -> Result<String> {
        let content = self.decode()?;
        let stored_name = self.stored_name(current_time().unix_timestamp_nanos() / 1_000_000)?;
        let path: PathBuf = upload_dir.join(&stored_name);

        std::fs::create_dir_all(upload_dir)
            .map_err(|err| format!("Error creating upload directory: {}", err))?;
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&path)
            .map_err(|err| format!("Error opening file: {}", err))?;
        file.write_all(&content)
            .map_err(|err| format!("Error writing to file: {}", err))?;

        tracing::debug!(path = %path.display(), bytes = content.len(), "stored upload");

        Ok(format!("{}/{}", UPLOADS_ROUTE, stored_name))
    }
}

/// Deletes a file stored by [`UploadedFile::save`], given the URL it returned.
///
/// Used when the record the file belonged to couldn't be written.
pub fn discard_upload(upload_dir: &Path, url: &str) {
    let stored_name = match url.strip_prefix(UPLOADS_ROUTE).and_then(|n| n.strip_prefix('/')) {
        Some(stored_name) => stored_name,
        None => return,
    };

    let path = upload_dir.join(stored_name);
    if let Err(error) = std::fs::remove_file(&path) {
        tracing::warn!(path = %path.display(), %error, "failed to discard upload");
    }
}

#[cfg(test)]
mod tests {
    use super::{discard_upload, UploadedFile};

    fn upload(file_name: &str, content: &str) -> UploadedFile {
        UploadedFile {
            file_name: file_name.to_owned(),
            content: content.to_owned(),
        }
    }

    #[test]
    fn stored_name_keeps_only_the_last_component() {
        let file = upload("../../etc/certificate.pdf", "");
        assert_eq!(file.stored_name(1700).unwrap(), "1700-certificate.pdf");
    }

    #[test]
    fn files_without_an_extension_are_rejected() {
        assert!(upload("certificate", "").stored_name(1).is_err());
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert!(upload("proof.pdf", "not base64!").decode().is_err());
        assert_eq!(upload("proof.pdf", "aGk=").decode().unwrap(), b"hi");
    }

    #[test]
    fn save_writes_under_the_upload_dir() {
        let dir = std::env::temp_dir().join(format!("aicte-portal-{}", uuid::Uuid::new_v4()));
        let url = upload("proof.pdf", "aGk=").save(&dir).unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-proof.pdf"));

        let stored = dir.join(url.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), b"hi");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn discarded_uploads_are_deleted() {
        let dir = std::env::temp_dir().join(format!("aicte-portal-{}", uuid::Uuid::new_v4()));
        let url = upload("proof.pdf", "aGk=").save(&dir).unwrap();
        let stored = dir.join(url.trim_start_matches("/uploads/"));
        assert!(stored.exists());

        discard_upload(&dir, &url);
        assert!(!stored.exists());

        // URLs from elsewhere are left alone
        discard_upload(&dir, "https://example.com/proof.pdf");
        std::fs::remove_dir_all(dir).ok();
    }
}
