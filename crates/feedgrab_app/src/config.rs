use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use feedgrab_core::RetryPolicy;
use feedgrab_engine::{EngineConfig, TransportSettings};
use feedgrab_logging::grab_info;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "feedgrab.ron";

/// On-disk configuration. Every field may be omitted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub base_dir: PathBuf,
    pub start_phrase: String,
    pub stop_phrase: String,
    pub retry: RetrySection,
    pub politeness_delay_ms: u64,
    pub attempt_timeout_secs: Option<u64>,
    pub progress_granularity: u8,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySection {
    pub base_delay_ms: u64,
    pub multiplier: f64,
    pub max_delay_ms: u64,
    pub escalation_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        let transport = TransportSettings::default();
        Self {
            api_base_url: transport.base_url,
            session_file: PathBuf::from("session.txt"),
            base_dir: engine.base_dir,
            start_phrase: engine.start_phrase,
            stop_phrase: engine.stop_phrase,
            retry: RetrySection::default(),
            politeness_delay_ms: engine.politeness_delay.as_millis() as u64,
            attempt_timeout_secs: engine.attempt_timeout.map(|limit| limit.as_secs()),
            progress_granularity: engine.progress_granularity,
            connect_timeout_secs: transport.connect_timeout.as_secs(),
            request_timeout_secs: transport.request_timeout.as_secs(),
        }
    }
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            base_delay_ms: policy.base_delay.as_millis() as u64,
            multiplier: policy.multiplier,
            max_delay_ms: policy.max_delay.as_millis() as u64,
            escalation_threshold: policy.escalation_threshold,
        }
    }
}

impl AppConfig {
    /// Load `path`, or the default file when `path` is `None`.
    ///
    /// A missing default file yields the built-in defaults; a missing
    /// explicitly requested file is an error.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        if !explicit && !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        grab_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.start_phrase.trim().is_empty(), "start_phrase is empty");
        anyhow::ensure!(!self.stop_phrase.trim().is_empty(), "stop_phrase is empty");
        anyhow::ensure!(
            self.retry.multiplier.is_finite() && self.retry.multiplier >= 1.0,
            "retry.multiplier must be at least 1.0"
        );
        anyhow::ensure!(
            (1..=100).contains(&self.progress_granularity),
            "progress_granularity must be between 1 and 100"
        );
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            base_dir: self.base_dir.clone(),
            start_phrase: self.start_phrase.clone(),
            stop_phrase: self.stop_phrase.clone(),
            retry: RetryPolicy {
                base_delay: Duration::from_millis(self.retry.base_delay_ms),
                multiplier: self.retry.multiplier,
                max_delay: Duration::from_millis(self.retry.max_delay_ms),
                escalation_threshold: self.retry.escalation_threshold,
            },
            politeness_delay: Duration::from_millis(self.politeness_delay_ms),
            attempt_timeout: self.attempt_timeout_secs.map(Duration::from_secs),
            progress_granularity: self.progress_granularity,
        }
    }

    pub fn transport_settings(&self) -> TransportSettings {
        TransportSettings {
            base_url: self.api_base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::parse("()").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.engine_config().retry, RetryPolicy::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config = AppConfig::parse(
            r#"(
                base_dir: "/tmp/grab",
                retry: (escalation_threshold: 3),
                attempt_timeout_secs: Some(90),
            )"#,
        )
        .unwrap();
        let engine = config.engine_config();
        assert_eq!(engine.base_dir, PathBuf::from("/tmp/grab"));
        assert_eq!(engine.retry.escalation_threshold, 3);
        assert_eq!(engine.retry.base_delay, Duration::from_millis(5000));
        assert_eq!(engine.attempt_timeout, Some(Duration::from_secs(90)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::parse("(retry: (multiplier: 0.5))").is_err());
        assert!(AppConfig::parse("(progress_granularity: 0)").is_err());
        assert!(AppConfig::parse("(unknown_field: 1)").is_err());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let explicit = temp.path().join("absent.ron");
        assert!(AppConfig::load(Some(&explicit)).is_err());

        let written = temp.path().join("feedgrab.ron");
        fs::write(&written, r#"(stop_phrase: "done")"#).unwrap();
        let config = AppConfig::load(Some(&written)).unwrap();
        assert_eq!(config.stop_phrase, "done");
    }
}
