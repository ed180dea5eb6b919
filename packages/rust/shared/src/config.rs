//! Application configuration for footernotes.
//!
//! User config lives at `~/.footernotes/footernotes.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FooternotesError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "footernotes.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".footernotes";

// ---------------------------------------------------------------------------
// Config structs (matching footernotes.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Accepted file extensions, compared case-insensitively.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Where converted documents go.
    #[serde(default)]
    pub output: OutputMode,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            output: OutputMode::default(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".into()]
}

/// What to do with a converted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// Write the result back to the input file.
    #[default]
    InPlace,
    /// Leave the file alone and hand the result to the caller for printing.
    Stdout,
    /// Write nothing; only report whether a rewrite would happen.
    Check,
}

// ---------------------------------------------------------------------------
// Convert options (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime conversion options, merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Accepted file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Output mode.
    pub output: OutputMode,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ConvertOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            extensions: config.defaults.extensions.clone(),
            output: config.defaults.output,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// `~/.footernotes/footernotes.toml`.
fn config_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
        .ok_or_else(|| FooternotesError::config("could not determine home directory"))
}

/// Load the user config. A missing file yields the defaults.
pub fn load_config() -> Result<AppConfig> {
    read_config(&config_path()?)
}

/// Write the default config file, replacing any existing one. Returns its path.
pub fn init_config() -> Result<PathBuf> {
    let path = config_path()?;
    write_default_config(&path)?;
    tracing::info!(?path, "created default config file");
    Ok(path)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(?path, "config file not found, using defaults");
            return Ok(AppConfig::default());
        }
        Err(e) => return Err(FooternotesError::io(path, e)),
    };

    toml::from_str(&content).map_err(|e| {
        FooternotesError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| FooternotesError::io(dir, e))?;
    }
    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| FooternotesError::config(e.to_string()))?;
    std::fs::write(path, content).map_err(|e| FooternotesError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("extensions"));
        assert!(toml_str.contains("in-place"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.defaults.extensions, vec!["md".to_string()]);
        assert_eq!(parsed.defaults.output, OutputMode::InPlace);
    }

    #[test]
    fn config_with_overrides() {
        let toml_str = r#"
[defaults]
extensions = ["md", "markdown"]
output = "check"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.defaults.extensions.len(), 2);
        assert_eq!(config.defaults.output, OutputMode::Check);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("parse");
        assert_eq!(config.defaults.extensions, vec!["md".to_string()]);
        assert_eq!(config.defaults.output, OutputMode::InPlace);
    }

    #[test]
    fn unknown_output_mode_is_rejected() {
        let toml_str = "[defaults]\noutput = \"tee\"\n";
        assert!(toml::from_str::<AppConfig>(toml_str).is_err());
    }

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("footernotes-config-{name}-{}", std::process::id()))
    }

    #[test]
    fn missing_file_reads_as_defaults() {
        let path = scratch_dir("missing").join(CONFIG_FILE_NAME);
        let config = read_config(&path).expect("defaults");
        assert_eq!(config.defaults.output, OutputMode::InPlace);
    }

    #[test]
    fn written_defaults_read_back() {
        let dir = scratch_dir("written");
        let path = dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
        write_default_config(&path).expect("write");
        let config = read_config(&path).expect("read");
        assert_eq!(config.defaults.extensions, vec!["md".to_string()]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = scratch_dir("malformed");
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[defaults\n").expect("write");
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, FooternotesError::Config { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn convert_options_from_app_config() {
        let mut app = AppConfig::default();
        app.defaults.output = OutputMode::Stdout;
        let opts = ConvertOptions::from(&app);
        assert_eq!(opts.extensions, vec!["md".to_string()]);
        assert_eq!(opts.output, OutputMode::Stdout);
    }
}
