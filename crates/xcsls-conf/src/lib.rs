mod suppressions;

use camino::Utf8Path;
use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use serde::Deserialize;
use thiserror::Error;

pub use suppressions::load_suppressions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Failed to read project configuration")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse project configuration TOML")]
    Parse(#[from] toml::de::Error),
}

/// Tool settings, loaded from `xcsls.toml` / `.xcsls.toml` in the
/// workspace root. Everything has a default; a missing file is not an
/// error.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Factory identifier in the generated call, the `F` in `F.M(…)`.
    pub factory: String,
    /// Method identifier in the generated call, the `M` in `F.M(…)`.
    pub method: String,
    /// Spaces per indent level in generated code.
    pub indent_width: usize,
    /// Debounce interval for change events, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            factory: "Document".to_string(),
            method: "CreateElement".to_string(),
            indent_width: 4,
            debounce_ms: 200,
        }
    }
}

impl Settings {
    pub fn new(project_root: &Utf8Path) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        builder = builder.add_source(
            File::from(project_root.join(".xcsls.toml").as_std_path())
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("xcsls.toml").as_std_path())
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        let settings = config.try_deserialize()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::tempdir;

    fn root(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    mod defaults {
        use super::*;

        #[test]
        fn test_load_no_files() {
            let dir = tempdir().unwrap();
            let settings = Settings::new(&root(&dir)).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.factory, "Document");
            assert_eq!(settings.method, "CreateElement");
            assert_eq!(settings.debounce_ms, 200);
        }
    }

    mod project_files {
        use super::*;

        #[test]
        fn test_load_xcsls_toml() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("xcsls.toml"),
                "factory = \"Ui\"\nmethod = \"Make\"\n",
            )
            .unwrap();
            let settings = Settings::new(&root(&dir)).unwrap();
            assert_eq!(settings.factory, "Ui");
            assert_eq!(settings.method, "Make");
            // Unset fields keep their defaults.
            assert_eq!(settings.indent_width, 4);
        }

        #[test]
        fn test_xcsls_toml_overrides_dot_file() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".xcsls.toml"), "debounce_ms = 100").unwrap();
            fs::write(dir.path().join("xcsls.toml"), "debounce_ms = 500").unwrap();
            let settings = Settings::new(&root(&dir)).unwrap();
            assert_eq!(settings.debounce_ms, 500);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_invalid_toml_content() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("xcsls.toml"), "factory = not_a_string").unwrap();
            let result = Settings::new(&root(&dir));
            assert!(result.is_err());
        }
    }
}
