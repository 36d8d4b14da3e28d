//! Working-directory context and portable path absolutization.
//!
//! Paths handed to the obfuscator are always rendered absolute, with `/`
//! separators, whatever the host OS. A path counts as absolute when it starts
//! with `/`, `//` (UNC) or a drive letter (`C:`), so Windows-style paths
//! configured on a Linux build agent are passed through untouched.
use std::path::{Path, PathBuf};

/// Process environment seen by the runner.
///
/// Production code uses [`SystemEnvironment`]; tests substitute a fixed
/// working directory such as `/Working`.
pub trait Environment: Send + Sync {
    /// Directory that relative paths are resolved against.
    fn working_directory(&self) -> PathBuf;

    /// Value of the environment variable `name`, if set and valid UTF-8.
    fn variable(&self, name: &str) -> Option<String>;
}

/// [`Environment`] backed by the current process.
#[derive(Debug, Clone)]
pub struct SystemEnvironment {
    working_directory: PathBuf,
}

impl SystemEnvironment {
    /// Capture the current directory of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined (for
    /// example because it was deleted).
    pub fn new() -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::with_working_directory(&cwd))
    }

    /// Use `dir` as the working directory instead of the process's.
    ///
    /// Relative directories are resolved against the process's current
    /// directory when it is available.
    #[must_use]
    pub fn with_working_directory(dir: &Path) -> Self {
        let dir = if is_rooted(&normalize_separators(dir)) {
            dir.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| dir.to_path_buf(), |cwd| cwd.join(dir))
        };
        Self {
            working_directory: dunce::simplified(&dir).to_path_buf(),
        }
    }
}

impl Environment for SystemEnvironment {
    fn working_directory(&self) -> PathBuf {
        self.working_directory.clone()
    }

    fn variable(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Make `path` absolute against `base` and normalize it.
///
/// Absolute inputs keep their root and only have `.`/`..` segments collapsed.
///
/// # Examples
///
/// ```
/// use eazfuscator_runner::environment::make_absolute;
/// use std::path::{Path, PathBuf};
///
/// let base = Path::new("/Working");
/// assert_eq!(make_absolute(Path::new("./input/a.dll"), base), PathBuf::from("/Working/input/a.dll"));
/// assert_eq!(make_absolute(Path::new(r".\lib"), base), PathBuf::from("/Working/lib"));
/// assert_eq!(make_absolute(Path::new("C:/Tools/x.exe"), base), PathBuf::from("C:/Tools/x.exe"));
/// ```
#[must_use]
pub fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    let normalized = normalize_separators(path);
    let joined = if is_rooted(&normalized) {
        normalized
    } else {
        let base = normalize_separators(base);
        format!("{}/{normalized}", base.trim_end_matches('/'))
    };
    PathBuf::from(collapse(&joined))
}

/// Render `path` the way it appears on the command line: `/` separators,
/// `.`/`..` collapsed.
#[must_use]
pub fn full_path(path: &Path) -> String {
    collapse(&normalize_separators(path))
}

fn normalize_separators(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn is_rooted(path: &str) -> bool {
    path.starts_with('/') || drive_prefix(path).is_some()
}

/// Returns the `X:` prefix of a drive-letter path.
fn drive_prefix(path: &str) -> Option<&str> {
    let mut chars = path.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => path.get(..2),
        _ => None,
    }
}

/// Split off the root (`//`, `/`, `X:/` or nothing) and resolve `.` and
/// `..` lexically. `..` never climbs above a root.
fn collapse(path: &str) -> String {
    let (root, rest) = if let Some(rest) = path.strip_prefix("//") {
        ("//".to_string(), rest)
    } else if let Some(rest) = path.strip_prefix('/') {
        ("/".to_string(), rest)
    } else if let Some(drive) = drive_prefix(path) {
        let rest = path.get(2..).unwrap_or_default();
        (format!("{drive}/"), rest.trim_start_matches('/'))
    } else {
        (String::new(), path)
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if root.is_empty() {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if joined.is_empty() && root.is_empty() {
        ".".to_string()
    } else {
        format!("{root}{joined}")
    }
}
