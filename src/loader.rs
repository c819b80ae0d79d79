// src/loader.rs
//! Reads input binaries into memory.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::BuildError;

/// Read a whole binary into memory.
///
/// The number of bytes read must equal the size the filesystem reports for
/// the file; a shorter read is rejected instead of being accepted as a
/// partial success.
pub fn read_binary(path: &Path) -> Result<Vec<u8>, BuildError> {
    let expected = fs::metadata(path)
        .map_err(|e| BuildError::io(path, e))?
        .len();

    let bytes = fs::read(path).map_err(|e| BuildError::io(path, e))?;

    if bytes.len() as u64 != expected {
        return Err(BuildError::io(
            path,
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read {} of {} bytes", bytes.len(), expected),
            ),
        ));
    }

    Ok(bytes)
}
