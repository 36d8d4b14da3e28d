//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that executable lookup can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

/// Abstraction over the filesystem queries used by tool lookup.
///
/// Implement this trait to swap in a fake during tests, keeping lookup logic
/// independent of real I/O.  The production implementation is
/// [`SystemFileSystemOps`].
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` is a regular file (not a directory or broken symlink).
    fn is_file(&self, path: &Path) -> bool;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure regular files with [`with_file`](Self::with_file), then pass
/// `Arc::new(mock)` to a [`SystemToolLocator`](crate::locator::SystemToolLocator).
///
/// # Example
///
/// ```ignore
/// use eazfuscator_runner::operations::MockFileSystemOps;
///
/// let fs = MockFileSystemOps::new()
///     .with_file("/Working/tools/Eazfuscator.Net.exe");
/// ```
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    files: Vec<PathBuf>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as a regular file.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        let p = path.into();
        if !self.files.contains(&p) {
            self.files.push(p);
        }
        self
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn is_file(&self, path: &Path) -> bool {
        self.files.iter().any(|p| p == path)
    }
}
