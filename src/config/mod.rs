//! Runner configuration file (`eazfuscator.toml`).
pub mod toml_loader;

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::settings::ObfuscatorSettings;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "eazfuscator.toml";

/// Contents of a runner configuration file.
///
/// ```toml
/// input-files = ["bin/Release/App.dll"]
/// search-paths = ["vendor/eazfuscator"]
///
/// [settings]
/// no-logo = true
/// probing-paths = ["lib", "packages"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunnerConfig {
    /// Assemblies to obfuscate, relative to the working directory.
    pub input_files: Vec<PathBuf>,
    /// Extra directories probed for the executable.
    pub search_paths: Vec<PathBuf>,
    /// Obfuscator settings.
    pub settings: ObfuscatorSettings,
}

impl RunnerConfig {
    /// Load the configuration for a run.
    ///
    /// With an `explicit` path the file must exist. Otherwise
    /// [`DEFAULT_CONFIG_FILE`] in `working_directory` is used if present and
    /// an empty configuration is returned if not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the selected file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>, working_directory: &Path) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => toml_loader::load_config(&working_directory.join(path)),
            None => toml_loader::load_config_or_default(
                &working_directory.join(DEFAULT_CONFIG_FILE),
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).expect("write config");
    }

    #[test]
    fn missing_default_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::load(None, dir.path()).unwrap();
        assert_eq!(config, RunnerConfig::default());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RunnerConfig::load(Some(Path::new("other.toml")), dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("other.toml"));
    }

    #[test]
    fn default_file_is_loaded_from_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            DEFAULT_CONFIG_FILE,
            r#"
input-files = ["bin/Release/App.dll"]
search-paths = ["vendor/eazfuscator"]

[settings]
no-logo = true
output-file = "obfuscated/App.dll"
probing-paths = ["lib", "packages"]
warnings-as-errors = "all"

[settings.environment-variables]
EAZFUSCATOR_NET_LICENSE = "abc"
"#,
        );
        let config = RunnerConfig::load(None, dir.path()).unwrap();
        assert_eq!(config.input_files, vec![PathBuf::from("bin/Release/App.dll")]);
        assert_eq!(config.search_paths, vec![PathBuf::from("vendor/eazfuscator")]);
        assert!(config.settings.no_logo);
        assert_eq!(
            config.settings.output_file,
            Some(PathBuf::from("obfuscated/App.dll"))
        );
        assert_eq!(
            config.settings.probing_paths,
            Some(vec![PathBuf::from("lib"), PathBuf::from("packages")])
        );
        assert_eq!(config.settings.warnings_as_errors.as_deref(), Some("all"));
        assert_eq!(
            config
                .settings
                .environment_variables
                .get("EAZFUSCATOR_NET_LICENSE")
                .map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn explicit_absolute_path_is_used_as_is() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "release.toml", "[settings]\nquiet = true\n");
        let path = dir.path().join("release.toml");
        let config = RunnerConfig::load(Some(&path), Path::new("/unrelated")).unwrap();
        assert!(config.settings.quiet);
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), DEFAULT_CONFIG_FILE, "inputs = []\n");
        let err = RunnerConfig::load(None, dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().starts_with("Invalid TOML in "));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), DEFAULT_CONFIG_FILE, "[settings\n");
        assert!(matches!(
            RunnerConfig::load(None, dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
