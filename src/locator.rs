//! Executable lookup.
//!
//! An explicit tool path always wins and is never second-guessed: if it does
//! not point at a file, lookup fails rather than falling back to a search.
//! Without one, [`SystemToolLocator`] probes its search directories in order
//! and finally the `PATH` captured at construction.
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::environment::{Environment, make_absolute};
use crate::operations::FileSystemOps;
use crate::platform::Platform;

/// Resolves a logical executable name to a file on disk.
pub trait ToolLocator: Send + Sync {
    /// Locate `executable`.
    ///
    /// `explicit_path` is an absolute override; when given, it is returned if
    /// it names an existing file and `None` otherwise.
    fn locate(&self, executable: &str, explicit_path: Option<&Path>) -> Option<PathBuf>;
}

/// [`ToolLocator`] that searches directories on the filesystem, then `PATH`.
#[derive(Debug, Clone)]
pub struct SystemToolLocator {
    fs_ops: Arc<dyn FileSystemOps>,
    search_dirs: Vec<PathBuf>,
    path_var: Option<OsString>,
    cwd: PathBuf,
}

impl SystemToolLocator {
    /// Create a locator with an explicit directory list and no `PATH` search.
    #[must_use]
    pub fn new(fs_ops: Arc<dyn FileSystemOps>, search_dirs: Vec<PathBuf>) -> Self {
        Self {
            fs_ops,
            search_dirs,
            path_var: None,
            cwd: PathBuf::from("."),
        }
    }

    /// Create the standard locator for `env`.
    ///
    /// Search order:
    /// 1. `<working directory>/tools`
    /// 2. `extra_dirs`, made absolute against the working directory
    /// 3. the platform's default install directories
    /// 4. the `PATH` environment variable
    #[must_use]
    pub fn for_environment(
        env: &dyn Environment,
        platform: &Platform,
        fs_ops: Arc<dyn FileSystemOps>,
        extra_dirs: &[PathBuf],
    ) -> Self {
        let cwd = env.working_directory();
        let mut search_dirs = vec![make_absolute(Path::new("tools"), &cwd)];
        search_dirs.extend(extra_dirs.iter().map(|d| make_absolute(d, &cwd)));
        search_dirs.extend(platform.default_install_dirs(env));
        Self {
            fs_ops,
            search_dirs,
            path_var: env.variable("PATH").map(OsString::from),
            cwd,
        }
    }

    /// Directories probed before `PATH`, in order.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    fn search_path(&self, executable: &str) -> Option<PathBuf> {
        let path_var = self.path_var.as_ref()?;
        which::which_in(executable, Some(path_var), &self.cwd).ok()
    }
}

impl ToolLocator for SystemToolLocator {
    fn locate(&self, executable: &str, explicit_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit_path {
            return self.fs_ops.is_file(path).then(|| path.to_path_buf());
        }

        self.search_dirs
            .iter()
            .map(|dir| dir.join(executable))
            .find(|candidate| self.fs_ops.is_file(candidate))
            .or_else(|| self.search_path(executable))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::operations::MockFileSystemOps;
    use crate::platform::Os;

    const EXE: &str = "Eazfuscator.Net.exe";

    struct FixedEnvironment;

    impl Environment for FixedEnvironment {
        fn working_directory(&self) -> PathBuf {
            PathBuf::from("/Working")
        }

        fn variable(&self, _: &str) -> Option<String> {
            None
        }
    }

    fn locator(fs: MockFileSystemOps, extra: &[PathBuf]) -> SystemToolLocator {
        SystemToolLocator::for_environment(
            &FixedEnvironment,
            &Platform::new(Os::Linux),
            Arc::new(fs),
            extra,
        )
    }

    #[test]
    fn finds_tool_in_working_directory_tools_folder() {
        let fs = MockFileSystemOps::new().with_file("/Working/tools/Eazfuscator.Net.exe");
        assert_eq!(
            locator(fs, &[]).locate(EXE, None),
            Some(PathBuf::from("/Working/tools/Eazfuscator.Net.exe"))
        );
    }

    #[test]
    fn searches_extra_dirs_after_tools_folder() {
        let fs = MockFileSystemOps::new().with_file("/Working/vendor/eaz/Eazfuscator.Net.exe");
        let loc = locator(fs, &[PathBuf::from("vendor/eaz")]);
        assert_eq!(
            loc.search_dirs(),
            &[PathBuf::from("/Working/tools"), PathBuf::from("/Working/vendor/eaz")]
        );
        assert_eq!(
            loc.locate(EXE, None),
            Some(PathBuf::from("/Working/vendor/eaz/Eazfuscator.Net.exe"))
        );
    }

    #[test]
    fn tools_folder_wins_over_extra_dirs() {
        let fs = MockFileSystemOps::new()
            .with_file("/Working/tools/Eazfuscator.Net.exe")
            .with_file("/opt/eaz/Eazfuscator.Net.exe");
        let loc = locator(fs, &[PathBuf::from("/opt/eaz")]);
        assert_eq!(
            loc.locate(EXE, None),
            Some(PathBuf::from("/Working/tools/Eazfuscator.Net.exe"))
        );
    }

    #[test]
    fn explicit_path_is_used_when_it_exists() {
        let fs = MockFileSystemOps::new().with_file("/bin/tools/Eazfuscator.Net.exe");
        let explicit = PathBuf::from("/bin/tools/Eazfuscator.Net.exe");
        assert_eq!(
            locator(fs, &[]).locate(EXE, Some(&explicit)),
            Some(explicit)
        );
    }

    #[test]
    fn missing_explicit_path_does_not_fall_back() {
        let fs = MockFileSystemOps::new().with_file("/Working/tools/Eazfuscator.Net.exe");
        let explicit = PathBuf::from("/missing/Eazfuscator.Net.exe");
        assert_eq!(locator(fs, &[]).locate(EXE, Some(&explicit)), None);
    }

    #[test]
    fn similarly_named_file_is_not_a_match() {
        let fs = MockFileSystemOps::new().with_file("/Working/tools/Eazfuscator.Net.dll");
        assert_eq!(locator(fs, &[]).locate(EXE, None), None);
    }

    #[test]
    fn not_found_without_path_variable() {
        let loc = SystemToolLocator::new(Arc::new(MockFileSystemOps::new()), Vec::new());
        assert_eq!(loc.locate(EXE, None), None);
    }

    #[cfg(unix)]
    #[test]
    fn path_search_uses_captured_path_variable() {
        use std::os::unix::fs::PermissionsExt as _;

        let dir = tempfile::tempdir().expect("create temp dir");
        let tool = dir.path().join("fake-obfuscator");
        std::fs::write(&tool, "#!/bin/sh\n").expect("write fake tool");
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755))
            .expect("make fake tool executable");

        let loc = SystemToolLocator {
            fs_ops: Arc::new(MockFileSystemOps::new()),
            search_dirs: Vec::new(),
            path_var: Some(dir.path().as_os_str().to_os_string()),
            cwd: dir.path().to_path_buf(),
        };
        assert_eq!(loc.locate("fake-obfuscator", None), Some(tool));
    }
}
