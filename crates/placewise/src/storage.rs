//! File/object-store collaborator. Uploads land behind this trait and come
//! back as a stable reference URL; the API binary ships a local-disk
//! implementation, production deployments would point this at a CDN bucket.

use axum::http::StatusCode;
use thiserror::Error;

/// What is being uploaded. Drives the target folder and the accepted
/// content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    CompanyLogo,
    ProfileImage,
}

impl UploadKind {
    pub const fn folder(self) -> &'static str {
        match self {
            UploadKind::Resume => "resumes",
            UploadKind::CompanyLogo => "company-logos",
            UploadKind::ProfileImage => "profiles",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            UploadKind::Resume => "resume",
            UploadKind::CompanyLogo => "company logo",
            UploadKind::ProfileImage => "profile image",
        }
    }

    /// Logos and profile images must be images; resumes may be documents.
    pub const fn requires_image(self) -> bool {
        matches!(self, UploadKind::CompanyLogo | UploadKind::ProfileImage)
    }
}

pub fn is_image(mime: &mime::Mime) -> bool {
    mime.type_() == mime::IMAGE
}

/// Upload transport: a JSON body carrying the file name and raw content.
/// Multipart handling and CDN delivery are the collaborator's concern.
#[derive(Clone, serde::Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub content: String,
}

/// A stored file: the stable URL to hand out plus the name the uploader gave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    pub original_name: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Please upload a file")]
    EmptyUpload,
    #[error("Unsupported file type for a {0}")]
    UnsupportedType(&'static str),
    #[error("file store unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn status(&self) -> StatusCode {
        match self {
            StorageError::EmptyUpload | StorageError::UnsupportedType(_) => {
                StatusCode::BAD_REQUEST
            }
            StorageError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Storage abstraction so routers can be exercised without a disk or bucket.
pub trait FileStore: Send + Sync {
    fn put(
        &self,
        kind: UploadKind,
        filename: &str,
        contents: &[u8],
    ) -> Result<StoredFile, StorageError>;
}
