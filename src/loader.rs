// Binary file loading
//
// Pre-compiled SPIR-V lives on disk; this reads it into memory untouched.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read the whole file at `path` into a buffer sized to the file's length
/// when it was opened.
///
/// The contents are not inspected. A path that is missing, unreadable or not
/// a regular file fails with [`Error::FileOpen`]; the handle is closed before
/// returning on every path.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    let path = path.as_ref();

    let mut file = File::open(path).map_err(|e| Error::file_open(path, e))?;
    let metadata = file.metadata().map_err(|e| Error::file_open(path, e))?;

    // Directories open fine on some platforms; only the read would fail
    if !metadata.is_file() {
        return Err(Error::file_open(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }

    let size = usize::try_from(metadata.len()).map_err(|_| {
        Error::file_open(
            path,
            io::Error::new(io::ErrorKind::InvalidData, "file too large to load"),
        )
    })?;

    let mut buffer = vec![0u8; size];
    file.read_exact(&mut buffer)
        .map_err(|e| Error::file_read(path, e))?;

    log::debug!("Read {} bytes from {:?}", size, path);
    Ok(buffer)
}
