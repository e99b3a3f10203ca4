//! Tracing / logging initialisation helpers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log level per component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Global default level: "trace" | "debug" | "info" | "warn" | "error"
    #[serde(default = "default_level")]
    pub level: String,
    /// Override per component: component_name → level
    #[serde(default)]
    pub components: HashMap<String, String>,
    /// Emit JSON structured logs (true) or human-readable text (false)
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            components: HashMap::new(),
            json: false,
        }
    }
}

impl LogConfig {
    /// Debug output for the codec crates, `info` elsewhere.
    pub fn verbose() -> Self {
        let mut config = Self::default();
        for component in ["causeway-core", "causeway-json", "causeway-adapter"] {
            config.components.insert(component.into(), "debug".into());
        }
        config
    }

    /// Filter directives: `"info,causeway_json=debug"` etc.
    pub fn directives(&self) -> String {
        let mut directives = self.level.clone();
        for (component, level) in &self.components {
            directives.push_str(&format!(",{}={}", component.replace('-', "_"), level));
        }
        directives
    }
}

/// Install a global subscriber writing to stderr. Invalid directives fall
/// back to `info`. Fails if a global subscriber is already set.
pub fn init_tracing(config: &LogConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_new(config.directives()).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_include_components() {
        let mut config = LogConfig::default();
        config.components.insert("causeway-json".into(), "trace".into());
        assert_eq!(config.directives(), "info,causeway_json=trace");
    }

    #[test]
    fn verbose_enables_debug_for_codec_crates() {
        let d = LogConfig::verbose().directives();
        assert!(d.starts_with("info"));
        assert!(d.contains("causeway_json=debug"));
        assert!(d.contains("causeway_core=debug"));
    }

    #[test]
    fn config_defaults_from_json() {
        let c: LogConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert_eq!(c.level, "info");
        assert!(c.json);
        assert!(c.components.is_empty());
    }
}
