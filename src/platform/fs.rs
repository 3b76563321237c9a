// MyRent - platform/fs.rs
//
// Filesystem reads for import sources, bounded by a size limit.

use crate::util::error::ImportError;
use std::path::Path;

/// Read an import file whole, refusing anything over `max_size` bytes.
///
/// The size is checked from metadata before any content is read, so an
/// oversized file never lands in memory.
pub fn read_import_file(path: &Path, max_size: u64) -> Result<Vec<u8>, ImportError> {
    let io_err = |source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > max_size {
        tracing::warn!(
            path = %path.display(),
            size,
            max_size,
            "Import file exceeds size limit"
        );
        return Err(ImportError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size,
        });
    }

    let bytes = std::fs::read(path).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Import file read");
    Ok(bytes)
}
