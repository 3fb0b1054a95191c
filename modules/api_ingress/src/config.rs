use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HTTP host configuration (`modules.api_ingress`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiIngressConfig {
    /// Listen address; empty means `server.host:server.port`.
    #[serde(default)]
    pub bind_addr: String,
    #[serde(default)]
    pub enable_docs: bool,
    #[serde(default = "default_cors_enabled")]
    pub cors_enabled: bool,
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ApiIngressConfig {
    fn default() -> Self {
        Self {
            bind_addr: String::new(),
            enable_docs: false,
            cors_enabled: default_cors_enabled(),
            request_timeout: default_request_timeout(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ApiIngressConfig {
    /// Fill an empty `bind_addr` from the global server section.
    pub fn with_fallback_addr(mut self, host: &str, port: u16) -> Self {
        if self.bind_addr.trim().is_empty() {
            self.bind_addr = format!("{host}:{port}");
        }
        self
    }
}

// The browser front-end is served from a different origin.
fn default_cors_enabled() -> bool {
    true
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_body_limit_bytes() -> usize {
    1024 * 1024
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_empty_section() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(cfg.cors_enabled);
        assert!(!cfg.enable_docs);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.body_limit_bytes, 1024 * 1024);
    }

    #[test]
    fn humantime_timeout_and_fallback_addr() {
        let cfg: ApiIngressConfig = serde_json::from_value(serde_json::json!({
            "request_timeout": "2m 5s",
            "cors_enabled": false
        }))
        .unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_secs(125));
        assert!(!cfg.cors_enabled);

        let cfg = cfg.with_fallback_addr("0.0.0.0", 3001);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");

        let explicit = ApiIngressConfig {
            bind_addr: "127.0.0.1:9000".into(),
            ..Default::default()
        }
        .with_fallback_addr("0.0.0.0", 3001);
        assert_eq!(explicit.bind_addr, "127.0.0.1:9000");
    }
}
