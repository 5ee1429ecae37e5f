//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Domain suffixes accepted as proxy targets when no list is configured.
pub const DEFAULT_ALLOWED_DOMAINS: &[&str] = &[
    // QQ Music
    "qq.com",
    "qqmusic.qq.com",
    "dl.stream.qqmusic.qq.com",
    "ws.stream.qqmusic.qq.com",
    "isure.stream.qqmusic.qq.com",
    "aqqmusic.tc.qq.com",
    "streamoc.music.tc.qq.com",
    "c.y.qq.com",
    "wx.music.tc.qq.com",
    // NetEase Cloud Music
    "music.126.net",
    "m7.music.126.net",
    "m8.music.126.net",
    "m10.music.126.net",
    "163.com",
    // Kugou
    "kugou.com",
    "trackercdn.kugou.com",
    // Kuwo
    "kuwo.cn",
    "sycdn.kuwo.cn",
    "other.web.nf01.sycdn.kuwo.cn",
    // Migu
    "migu.cn",
    "freetyst.nf.migu.cn",
    // Generic CDNs
    "clouddn.com",
    "qiniucdn.com",
    "aliyuncs.com",
];

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound request settings.
    pub upstream: UpstreamConfig,

    /// Target domain allow-list.
    pub access: AccessConfig,

    /// Identity reported by the health endpoint.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream fetch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Deadline for the upstream status line and headers, in milliseconds.
    pub timeout_ms: u64,

    /// TCP/TLS connection establishment timeout, in milliseconds.
    pub connect_timeout_ms: u64,

    /// Maximum redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            max_redirects: 10,
        }
    }
}

/// Access control configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Domain suffixes that may be proxied.
    pub allowed_domains: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            allowed_domains: DEFAULT_ALLOWED_DOMAINS.iter().map(|d| d.to_string()).collect(),
        }
    }
}

/// Service identity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name reported by `/health`.
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "HMusic Audio Proxy".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
