use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Optional defaults read from a JSON file. Command-line flags win over every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    #[serde(default)]
    pub namespace: Option<String>,
    /// Name of the security scheme to use instead of the first declared one.
    #[serde(default)]
    pub security_scheme: Option<String>,
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub spec_hash_policy: Option<HashPolicy>,
}

impl CliConfig {
    #[must_use]
    pub fn fetch_timeout_secs(&self) -> u64 {
        self.fetch_timeout_secs.unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS)
    }
}

/// What to do when the fetched spec does not match the expected `sha256:<hex>` digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashPolicy {
    /// Log a warning and continue.
    #[default]
    Warn,
    /// Abort the import.
    Fail,
    /// Skip verification.
    Ignore,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let base = if let Ok(v) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(v)
    } else {
        let home = std::env::var("HOME").context("HOME is not set")?;
        PathBuf::from(home).join(".config")
    };
    Ok(base.join("unrelated").join("openapi-import.json"))
}

pub fn load_config(path: &Path) -> anyhow::Result<CliConfig> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(CliConfig::default()),
        Err(e) => return Err(e).with_context(|| format!("read config {}", path.display())),
    };
    let cfg: CliConfig =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.json")).unwrap();
        assert_eq!(cfg, CliConfig::default());
        assert_eq!(cfg.fetch_timeout_secs(), DEFAULT_FETCH_TIMEOUT_SECS);
    }

    #[test]
    fn reads_camel_case_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(
            &path,
            r#"{"namespace":"petstore","securityScheme":"api_key","fetchTimeoutSecs":5,"specHashPolicy":"fail"}"#,
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.namespace.as_deref(), Some("petstore"));
        assert_eq!(cfg.security_scheme.as_deref(), Some("api_key"));
        assert_eq!(cfg.fetch_timeout_secs(), 5);
        assert_eq!(cfg.spec_hash_policy, Some(HashPolicy::Fail));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(err.to_string().starts_with("parse "), "{err}");
    }
}
