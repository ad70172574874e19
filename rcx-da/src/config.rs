//! Configuration for rcx-da
//!
//! All values have compiled defaults; a TOML file (resolved through the
//! rcx-common priority chain) and the `RCX_DA_PORT` environment variable
//! override them. Test suites construct the structs directly with
//! shrunken timings.

use rcx_common::Result;
use serde::Deserialize;

/// Top-level service configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DaConfig {
    pub server: ServerConfig,
    pub intake: IntakeConfig,
    pub pipeline: PipelineConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5861,
        }
    }
}

/// Upload validation and simulated extraction timing
///
/// The delay values reproduce the latency profile of the real extraction
/// engine: a scheduling delay before work starts, then a base duration
/// plus per-document jitter landing runs in the high-hundreds-of-ms to
/// ~2.5 s range.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Reject uploads larger than this
    pub max_upload_bytes: usize,
    /// Accepted upload MIME types; an upload with no declared type is
    /// treated as `application/octet-stream`
    pub accepted_types: Vec<String>,
    /// Delay before a queued job begins processing
    pub queue_delay_ms: u64,
    /// Base simulated extraction duration
    pub extract_base_ms: u64,
    /// Upper bound of the per-document jitter added to the base
    pub extract_jitter_ms: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 25 * 1024 * 1024,
            accepted_types: vec![
                "application/pdf".to_string(),
                "text/csv".to_string(),
                "text/plain".to_string(),
                "application/vnd.ms-excel".to_string(),
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
                "application/octet-stream".to_string(),
            ],
            queue_delay_ms: 400,
            extract_base_ms: 900,
            extract_jitter_ms: 1600,
        }
    }
}

/// Orchestrator poll window: attempts × interval is the hard ceiling on
/// how long a pipeline run waits for its extraction
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            poll_attempts: 20,
            poll_interval_ms: 250,
        }
    }
}

impl DaConfig {
    /// Load configuration with CLI/env overrides applied
    pub fn load(cli_config: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let mut config: DaConfig = rcx_common::config::load_service_config("rcx-da", cli_config)?;

        if let Ok(port) = std::env::var("RCX_DA_PORT") {
            match port.parse::<u16>() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring unparseable RCX_DA_PORT"),
            }
        }
        if let Some(port) = cli_port {
            config.server.port = port;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_window() {
        let config = DaConfig::default();
        assert_eq!(config.server.port, 5861);
        assert_eq!(config.intake.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.pipeline.poll_attempts, 20);
        assert_eq!(config.pipeline.poll_interval_ms, 250);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let config: DaConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [pipeline]
            poll_attempts = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.pipeline.poll_attempts, 5);
        assert_eq!(config.pipeline.poll_interval_ms, 250);
        assert!(!config.intake.accepted_types.is_empty());
    }
}
