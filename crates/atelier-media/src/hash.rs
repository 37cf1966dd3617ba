//! File identity digests
//!
//! Two staged files with identical bytes share a [`FileDigest`], which is what
//! the upload cache keys on.

/// Blake3 digest of file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileDigest([u8; 32]);

impl FileDigest {
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// First 16 hex chars, for log fields
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_bytes_share_a_digest() {
        assert_eq!(
            FileDigest::compute(b"cover.jpg bytes"),
            FileDigest::compute(b"cover.jpg bytes")
        );
        assert_ne!(FileDigest::compute(b"a"), FileDigest::compute(b"b"));
    }

    #[test]
    fn short_form_is_sixteen_hex_chars() {
        let short = FileDigest::compute(b"test").short();
        assert_eq!(short.len(), 16);
        assert!(short.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
