//! Slot contents
//!
//! An [`AssetHandle`] is what one slot of a media set holds: either a
//! [`Reference`] the asset store already knows, or a [`LocalFile`] the editor
//! staged but has not uploaded yet.

use crate::hash::FileDigest;
use bytes::Bytes;
use std::borrow::Borrow;
use std::fmt::{self, Debug, Display, Formatter};
use uuid::Uuid;

/// Opaque path or URL identifying a stored remote asset
///
/// Returned by uploads and accepted by deletes and entity patches. Compared by
/// value; two slots holding equal references point at the same stored asset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    /// Wrap a reference string
    #[inline]
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the reference string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unfilled slots are stored remotely as empty strings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Reference {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for Reference {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A file the editor selected but has not uploaded
///
/// The digest is computed once at construction and identifies the content for
/// upload caching. `bytes` is reference-counted, so clones are cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalFile {
    name: String,
    content_type: String,
    bytes: Bytes,
    digest: FileDigest,
}

impl LocalFile {
    /// Stage a file from its name, MIME type and content
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        let digest = FileDigest::compute(&bytes);
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
            digest,
        }
    }

    /// Original file name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// MIME type
    #[inline]
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// File content
    #[inline]
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Content digest
    #[inline]
    #[must_use]
    pub fn digest(&self) -> FileDigest {
        self.digest
    }

    /// Content length in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for zero-length files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Debug for LocalFile {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalFile")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .field("digest", &self.digest.short())
            .finish()
    }
}

/// Ephemeral display handle for a staged file's preview
///
/// The hosting view maps it to whatever it renders. A fresh handle is minted for
/// every staged file and handed back when the slot is removed so the view can
/// release the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PreviewHandle(Uuid);

impl PreviewHandle {
    /// Mint a new handle
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying id
    #[inline]
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.0
    }
}

impl Default for PreviewHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PreviewHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "preview:{}", self.0)
    }
}

/// Content of one slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetHandle {
    /// Already persisted by the asset store
    Remote {
        /// Stored reference
        reference: Reference,
    },

    /// Staged locally, uploaded on commit
    PendingLocal {
        /// Staged file
        file: LocalFile,
        /// Preview shown while staged
        preview: PreviewHandle,
    },
}

impl AssetHandle {
    /// Handle for a persisted reference
    #[inline]
    #[must_use]
    pub fn remote(reference: impl Into<Reference>) -> Self {
        Self::Remote {
            reference: reference.into(),
        }
    }

    /// Handle for a staged file with a fresh preview
    #[inline]
    #[must_use]
    pub fn pending(file: LocalFile) -> Self {
        Self::PendingLocal {
            file,
            preview: PreviewHandle::new(),
        }
    }

    /// True while the slot still needs an upload
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingLocal { .. })
    }

    /// Stored reference, if persisted
    #[inline]
    #[must_use]
    pub fn reference(&self) -> Option<&Reference> {
        match self {
            Self::Remote { reference } => Some(reference),
            Self::PendingLocal { .. } => None,
        }
    }

    /// Staged file, if pending
    #[inline]
    #[must_use]
    pub fn local_file(&self) -> Option<&LocalFile> {
        match self {
            Self::Remote { .. } => None,
            Self::PendingLocal { file, .. } => Some(file),
        }
    }

    /// Preview handle, if pending
    #[inline]
    #[must_use]
    pub fn preview(&self) -> Option<PreviewHandle> {
        match self {
            Self::Remote { .. } => None,
            Self::PendingLocal { preview, .. } => Some(*preview),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_file_digest_tracks_content() {
        let a = LocalFile::new("a.jpg", "image/jpeg", b"same".to_vec());
        let b = LocalFile::new("b.jpg", "image/jpeg", b"same".to_vec());
        let c = LocalFile::new("a.jpg", "image/jpeg", b"other".to_vec());

        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn local_file_debug_omits_bytes() {
        let file = LocalFile::new("cover.png", "image/png", vec![0u8; 1024]);
        let rendered = format!("{file:?}");
        assert!(rendered.contains("cover.png"));
        assert!(rendered.contains("len: 1024"));
        assert!(!rendered.contains("[0, 0"));
    }

    #[test]
    fn pending_handles_get_distinct_previews() {
        let file = LocalFile::new("x.jpg", "image/jpeg", b"x".to_vec());
        let first = AssetHandle::pending(file.clone());
        let second = AssetHandle::pending(file);

        assert!(first.is_pending());
        assert_ne!(first.preview(), second.preview());
        assert!(first.reference().is_none());
    }

    #[test]
    fn reference_serializes_as_plain_string() {
        let reference = Reference::new("/uploads/projects/a.jpg");
        assert_eq!(
            serde_json::to_string(&reference).unwrap(),
            "\"/uploads/projects/a.jpg\""
        );
        assert!(Reference::new("").is_empty());
    }
}
