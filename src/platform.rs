//! Operating system detection and the obfuscator's install locations.
use std::fmt;
use std::path::PathBuf;

use crate::environment::Environment;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux, and other Unix-like systems.
    Linux,
    /// Microsoft Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether this is a Windows platform.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    /// Directories the Eazfuscator.NET installer writes to, in lookup order.
    ///
    /// Only Windows has a standard install location; other platforms rely on
    /// `PATH` and explicit search directories.
    #[must_use]
    pub fn default_install_dirs(&self, env: &dyn Environment) -> Vec<PathBuf> {
        if !self.is_windows() {
            return Vec::new();
        }
        ["ProgramFiles(x86)", "ProgramFiles"]
            .iter()
            .filter_map(|var| env.variable(var))
            .map(|root| PathBuf::from(root).join("Gapotchenko").join("Eazfuscator.NET"))
            .collect()
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }
}
