//! Writing reports to disk.

use std::io::Write;
use std::path::Path;

/// Write `content` to `path` atomically.
///
/// Uses tempfile + fsync + rename so a crash mid-write never leaves a
/// truncated report behind.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    // Create the tempfile in the same directory to ensure same filesystem
    let parent = path.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "path has no parent directory",
        )
    })?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
