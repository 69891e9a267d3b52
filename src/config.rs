//! Updater configuration.
//!
//! Reads a TOML file with an `[updater]` table. The locale env override is
//! taken as a parameter by [`UpdaterConfig::load_from`] so tests never mutate
//! the process environment.

use std::{env, fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::error::UpdaterError;

/// Fully-resolved updater configuration.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// Locale used by informational-API lookups when the request carries none.
    pub default_locale: String,
    /// Remote-check transport timeout in seconds.
    pub timeout_seconds: u64,
    /// Optional User-Agent header for outbound update requests.
    pub user_agent: Option<String>,
}

impl UpdaterConfig {
    /// Remote-check timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Load config from `path`, then apply the `UPDATER_DEFAULT_LOCALE`
    /// env override.
    pub fn load(path: &Path) -> Result<Self, UpdaterError> {
        let locale_override = env::var("UPDATER_DEFAULT_LOCALE").ok();
        Self::load_from(path, locale_override.as_deref())
    }

    /// Internal loader — accepts an explicit path and an optional override.
    pub fn load_from(path: &Path, locale_override: Option<&str>) -> Result<Self, UpdaterError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| UpdaterError::Config(format!("cannot read {}: {e}", path.display())))?;

        let parsed: RawConfig = toml::from_str(&raw)
            .map_err(|e| UpdaterError::Config(format!("parse error in {}: {e}", path.display())))?;

        let u = parsed.updater;

        Ok(Self {
            default_locale: locale_override
                .map(str::to_string)
                .unwrap_or(u.default_locale),
            timeout_seconds: u.timeout_seconds,
            user_agent: u.user_agent,
        })
    }
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        let raw = RawUpdater::default();
        Self {
            default_locale: raw.default_locale,
            timeout_seconds: raw.timeout_seconds,
            user_agent: raw.user_agent,
        }
    }
}

/// Raw TOML shape — `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    updater: RawUpdater,
}

#[derive(Deserialize)]
struct RawUpdater {
    #[serde(default = "default_locale")]
    default_locale: String,
    #[serde(default = "default_timeout_seconds")]
    timeout_seconds: u64,
    #[serde(default)]
    user_agent: Option<String>,
}

impl Default for RawUpdater {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
        }
    }
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_file_resolves_to_defaults() {
        let file = write_config("");
        let cfg = UpdaterConfig::load_from(file.path(), None).unwrap();
        assert_eq!(cfg.default_locale, "en_US");
        assert_eq!(cfg.timeout_seconds, 10);
        assert!(cfg.user_agent.is_none());
    }

    #[test]
    fn default_matches_empty_file() {
        let file = write_config("");
        let loaded = UpdaterConfig::load_from(file.path(), None).unwrap();
        let default = UpdaterConfig::default();
        assert_eq!(loaded.default_locale, default.default_locale);
        assert_eq!(loaded.timeout_seconds, default.timeout_seconds);
        assert_eq!(loaded.user_agent, default.user_agent);
    }

    #[test]
    fn file_values_are_read() {
        let file = write_config(
            "[updater]\ndefault_locale = \"de_DE\"\ntimeout_seconds = 5\nuser_agent = \"acme-updater/1.0\"\n",
        );
        let cfg = UpdaterConfig::load_from(file.path(), None).unwrap();
        assert_eq!(cfg.default_locale, "de_DE");
        assert_eq!(cfg.timeout_seconds, 5);
        assert_eq!(cfg.user_agent.as_deref(), Some("acme-updater/1.0"));
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn locale_override_wins_over_file() {
        let file = write_config("[updater]\ndefault_locale = \"de_DE\"\n");
        let cfg = UpdaterConfig::load_from(file.path(), Some("fr_FR")).unwrap();
        assert_eq!(cfg.default_locale, "fr_FR");
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = UpdaterConfig::load_from(Path::new("/nonexistent/updater.toml"), None)
            .unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let file = write_config("[updater\n");
        let err = UpdaterConfig::load_from(file.path(), None).unwrap_err();
        assert!(matches!(err, UpdaterError::Config(_)));
    }
}
