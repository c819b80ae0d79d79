// src/error.rs
//! Error taxonomy for the image build pipeline.
//!
//! Nothing below `main` terminates the process. Every failure travels up as
//! a `BuildError`, and the driver maps it to a process exit code with
//! [`BuildError::exit_code`]. Validation completes before any byte reaches
//! the output file, so a failed build never leaves a partial image behind.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a boot sector that is not exactly one sector long.
pub const EXIT_BOOT_SECTOR_SIZE: i32 = 666;

/// Reserved exit code for an overall disk-size ceiling. No validation is
/// currently wired to it; the code is kept so the exit-code surface of the
/// tool stays stable.
pub const EXIT_DISK_SIZE: i32 = 999;

/// Service binary format violations. All of these are build-fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("not an ELF executable (bad magic)")]
    NotExecutable,

    #[error("unsupported ELF class {0:#04x} (expected 32- or 64-bit)")]
    UnsupportedClass(u8),

    #[error("missing required section '{0}'")]
    MissingSection(&'static str),

    #[error(
        "bad multiboot header: magic={magic:#010x} flags={flags:#010x} checksum={checksum:#010x}"
    )]
    BadMultibootHeader { magic: u32, flags: u32, checksum: u32 },

    #[error("truncated ELF: {0}")]
    Truncated(&'static str),
}

/// Input size violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("boot sector is {found} bytes, expected exactly 512")]
    BootSector { found: u64 },
}

/// Top-level error for one build.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Format(#[from] FormatError),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BuildError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error. Only the binary's `main` calls this;
    /// everything below it stays testable as plain `Result` values.
    pub fn exit_code(&self) -> i32 {
        match self {
            BuildError::Io { source, .. } => source.raw_os_error().unwrap_or(1),
            BuildError::Size(SizeError::BootSector { .. }) => EXIT_BOOT_SECTOR_SIZE,
            BuildError::Format(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_surfaces_os_code() {
        let err = BuildError::io("missing.bin", io::Error::from_raw_os_error(2));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("missing.bin"));
    }

    #[test]
    fn test_boot_sector_size_code() {
        let err = BuildError::from(SizeError::BootSector { found: 511 });
        assert_eq!(err.exit_code(), EXIT_BOOT_SECTOR_SIZE);
    }

    #[test]
    fn test_format_errors_exit_one() {
        let err = BuildError::from(FormatError::NotExecutable);
        assert_eq!(err.exit_code(), 1);
    }
}
