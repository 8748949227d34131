//! Interview configuration loaded from `xlquiz.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::table::PREVIEW_ROWS;

/// Top-level xlquiz configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XlquizConfig {
    /// Candidate name used when none is given on the command line.
    #[serde(default = "default_candidate")]
    pub candidate_name: String,
    /// Directory for transcripts and rendered reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output formats written at the end of an interview.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
    /// Uploaded rows kept in the transcript preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_candidate() -> String {
    "Candidate".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./xlquiz-results")
}
fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}
fn default_preview_rows() -> usize {
    PREVIEW_ROWS
}

impl Default for XlquizConfig {
    fn default() -> Self {
        Self {
            candidate_name: default_candidate(),
            output_dir: default_output_dir(),
            formats: default_formats(),
            preview_rows: default_preview_rows(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `xlquiz.toml` in the current directory
/// 2. `~/.config/xlquiz/config.toml`
///
/// Environment variable overrides: `XLQUIZ_CANDIDATE`, `XLQUIZ_OUTPUT_DIR`.
pub fn load_config() -> Result<XlquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<XlquizConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("xlquiz.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => XlquizConfig::default(),
    };

    if let Ok(name) = std::env::var("XLQUIZ_CANDIDATE") {
        config.candidate_name = name;
    }
    if let Ok(dir) = std::env::var("XLQUIZ_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

/// Parse a TOML config string and expand `${VAR}` references.
pub fn parse_config(content: &str) -> Result<XlquizConfig> {
    let mut config: XlquizConfig = toml::from_str(content)?;
    config.candidate_name = resolve_env_vars(&config.candidate_name);
    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));
    anyhow::ensure!(config.preview_rows > 0, "preview_rows must be at least 1");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("xlquiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_XLQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_XLQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_XLQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${oops"), "unterminated ${oops");
        std::env::remove_var("_XLQUIZ_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_recurse() {
        std::env::set_var("_XLQUIZ_SELF_REF", "a${_XLQUIZ_SELF_REF}b");
        assert_eq!(
            resolve_env_vars("x-${_XLQUIZ_SELF_REF}-y"),
            "x-a${_XLQUIZ_SELF_REF}b-y"
        );
        std::env::remove_var("_XLQUIZ_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = XlquizConfig::default();
        assert_eq!(config.candidate_name, "Candidate");
        assert_eq!(config.formats, vec!["json".to_string()]);
        assert_eq!(config.preview_rows, 50);
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
candidate_name = "Ada Lovelace"
formats = ["json", "html"]
"#,
        )
        .unwrap();
        assert_eq!(config.candidate_name, "Ada Lovelace");
        assert_eq!(config.formats.len(), 2);
        assert_eq!(config.output_dir, PathBuf::from("./xlquiz-results"));
    }

    #[test]
    fn zero_preview_rows_rejected() {
        assert!(parse_config("preview_rows = 0").is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xlquiz.toml");
        std::fs::write(&path, "preview_rows = 5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.preview_rows, 5);
    }
}
