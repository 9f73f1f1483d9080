// Error types for the library side.
//
// The binary wraps these in anyhow; library callers can match on them.

use ash::vk;
use std::io;
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The path could not be opened as a regular file
    #[error("Couldn't open file {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file opened but could not be read to the length it had at open time
    #[error("Couldn't read file {path:?}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create shader module: {0}")]
    ModuleCreation(#[from] ModuleCreationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModuleCreationError {
    /// SPIR-V is a stream of 32-bit words; anything else never reaches the device
    #[error("bytecode length {0} is not a positive multiple of 4")]
    BytecodeSize(usize),

    #[error("device returned {0}")]
    Device(vk::Result),
}

impl Error {
    pub(crate) fn file_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}
