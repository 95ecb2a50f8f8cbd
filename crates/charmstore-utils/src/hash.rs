use std::path::Path;

use crate::error::{HashError, HashResult};

/// Content digest of an uploaded archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveDigest {
    /// Hex-encoded blake3 sum.
    pub sum: String,
    /// Size in bytes.
    pub size: u64,
}

/// Calculates the blake3 checksum of a file as a hex string.
///
/// # Errors
///
/// * [`HashError::ReadFailed`] if the file cannot be read.
pub fn calculate_checksum<P: AsRef<Path>>(file_path: P) -> HashResult<String> {
    let file_path = file_path.as_ref();
    let mut hasher = blake3::Hasher::new();
    hasher.update_mmap(file_path).map_err(|err| {
        HashError::ReadFailed {
            path: file_path.to_path_buf(),
            source: err,
        }
    })?;
    Ok(hasher.finalize().to_hex().to_string())
}

/// Computes the checksum and size of an archive in one pass over the metadata.
///
/// # Errors
///
/// * [`HashError::ReadFailed`] if the file cannot be read or is not a regular file.
pub fn digest_archive<P: AsRef<Path>>(file_path: P) -> HashResult<ArchiveDigest> {
    let file_path = file_path.as_ref();
    let metadata = std::fs::metadata(file_path).map_err(|err| {
        HashError::ReadFailed {
            path: file_path.to_path_buf(),
            source: err,
        }
    })?;

    if !metadata.is_file() {
        return Err(HashError::ReadFailed {
            path: file_path.to_path_buf(),
            source: std::io::Error::other("not a regular file"),
        });
    }

    Ok(ArchiveDigest {
        sum: calculate_checksum(file_path)?,
        size: metadata.len(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_calculate_checksum() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world\n").unwrap();

        let checksum = calculate_checksum(file.path()).unwrap();
        assert_eq!(
            checksum,
            "dc5a4edb8240b018124052c330270696f96771a63b45250a5c17d3000e823355"
        );
    }

    #[test]
    fn test_digest_archive() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello world\n").unwrap();

        let digest = digest_archive(file.path()).unwrap();
        assert_eq!(digest.size, 12);
        assert_eq!(
            digest.sum,
            "dc5a4edb8240b018124052c330270696f96771a63b45250a5c17d3000e823355"
        );
    }

    #[test]
    fn test_digest_archive_not_found() {
        let result = digest_archive("/path/to/nonexistent/archive.zip");
        assert!(matches!(result, Err(HashError::ReadFailed { .. })));
    }

    #[test]
    fn test_digest_archive_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(digest_archive(dir.path()).is_err());
    }
}
