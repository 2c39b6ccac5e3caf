//! Dispatch configuration and the per-call request template.

use crate::transport::TargetRequest;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default window width when none is configured.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Template applied to every target to form the per-item request.
///
/// The template is opaque to the coordinator: it is merged with a target URL
/// at dispatch time and handed to the transport untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestTemplate {
    /// HTTP method name (`GET`, `POST`, ...). Matched case-insensitively by
    /// the bundled transport.
    pub method: String,
    /// Headers attached to every request.
    pub headers: HashMap<String, String>,
    /// Optional JSON body attached to every request.
    pub body: Option<serde_json::Value>,
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            headers: HashMap::new(),
            body: None,
        }
    }
}

impl RequestTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Merge the template with one target, producing the per-item request.
    pub fn resolve(&self, index: usize, url: &str) -> TargetRequest {
        TargetRequest {
            index,
            url: url.to_string(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// Configuration for one dispatcher: the work list plus batch shape.
///
/// Validated once when a run starts; immutable for the duration of a run.
/// `wait_time_ms` is signed so that a negative value arriving from
/// deserialized configuration is representable and rejected by
/// [`validate`](DispatchConfig::validate) instead of disappearing into a
/// deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Ordered work list of target URLs. Must be non-empty.
    pub targets: Vec<String>,
    /// Window width: how many requests are in flight at once. Must be >= 1.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Pause between windows, in milliseconds. Must be >= 0; zero means
    /// windows dispatch back-to-back.
    #[serde(default)]
    pub wait_time_ms: i64,
    /// Request template merged with each target.
    #[serde(default)]
    pub template: RequestTemplate,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl DispatchConfig {
    pub fn new(targets: Vec<String>) -> Self {
        Self {
            targets,
            concurrency: DEFAULT_CONCURRENCY,
            wait_time_ms: 0,
            template: RequestTemplate::default(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_wait_time_ms(mut self, wait_time_ms: i64) -> Self {
        self.wait_time_ms = wait_time_ms;
        self
    }

    pub fn with_template(mut self, template: RequestTemplate) -> Self {
        self.template = template;
        self
    }

    /// Check that the configuration describes a runnable batch.
    ///
    /// Does not mutate state; called by the dispatcher before every run.
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Configuration(
                "targets must contain at least one entry".to_string(),
            ));
        }
        if self.wait_time_ms < 0 {
            return Err(Error::Configuration(format!(
                "wait_time_ms must be >= 0, got {}",
                self.wait_time_ms
            )));
        }
        if self.concurrency < 1 {
            return Err(Error::Configuration(
                "concurrency must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of windows a full, uncancelled run will dispatch.
    pub fn window_count(&self) -> usize {
        if self.concurrency == 0 {
            return 0;
        }
        self.targets.len().div_ceil(self.concurrency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("https://host.test/{i}")).collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = DispatchConfig::new(targets(3));
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.wait_time_ms, 0);
        assert_eq!(config.template.method, "GET");
        assert!(config.template.headers.is_empty());
        assert!(config.template.body.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = DispatchConfig::new(targets(2))
            .with_concurrency(3)
            .with_wait_time_ms(250);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.wait_time_ms, 250);
    }

    #[test]
    fn test_validate_ok() {
        assert!(DispatchConfig::new(targets(1)).validate().is_ok());
    }

    #[test]
    fn test_validate_empty_targets() {
        let err = DispatchConfig::new(vec![]).validate().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("targets")));
    }

    #[test]
    fn test_validate_negative_wait() {
        let err = DispatchConfig::new(targets(1))
            .with_wait_time_ms(-1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("wait_time_ms")));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let err = DispatchConfig::new(targets(1))
            .with_concurrency(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("concurrency")));
    }

    #[test]
    fn test_window_count() {
        assert_eq!(DispatchConfig::new(targets(7)).with_concurrency(3).window_count(), 3);
        assert_eq!(DispatchConfig::new(targets(2)).with_concurrency(5).window_count(), 1);
        assert_eq!(DispatchConfig::new(targets(6)).with_concurrency(3).window_count(), 2);
    }

    #[test]
    fn test_template_resolve_merges_target() {
        let template = RequestTemplate::new()
            .with_method("POST")
            .with_header("x-api-key", "secret")
            .with_body(serde_json::json!({"probe": true}));
        let req = template.resolve(4, "https://host.test/ping");
        assert_eq!(req.index, 4);
        assert_eq!(req.url, "https://host.test/ping");
        assert_eq!(req.method, "POST");
        assert_eq!(req.headers.get("x-api-key").map(String::as_str), Some("secret"));
        assert_eq!(req.body, Some(serde_json::json!({"probe": true})));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"targets": ["https://host.test/a"]}"#).unwrap();
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.wait_time_ms, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_deserialize_negative_wait_is_representable() {
        let config: DispatchConfig = serde_json::from_str(
            r#"{"targets": ["https://host.test/a"], "wait_time_ms": -5}"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
