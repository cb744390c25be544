use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use hng_core::DEFAULT_GROUP_SIZE;
use hng_groq::ChatConfig;
use hng_model::ThrottleStrategy;
use hng_observe::{LoggerConfig, LoggerLevel};

pub const ENV_CONFIG: &str = "HNG_CONFIG";
pub const ENV_LISTEN: &str = "HNG_LISTEN";
pub const ENV_DATA: &str = "HNG_DATA";
pub const ENV_LOG: &str = "HNG_LOG";

const STORE_FILE: &str = "storage.json";

/// Agent configuration: optional JSON file plus environment overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentConfig {
    pub listen: SocketAddr,
    /// Directory holding the persistent key-value file.
    pub data_dir: PathBuf,
    pub logger: LoggerConfig,
    pub throttle: ThrottleStrategy,
    pub chat: ChatConfig,
    pub group_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from((Ipv4Addr::LOCALHOST, 8787)),
            data_dir: PathBuf::from("data"),
            logger: LoggerConfig::default(),
            throttle: ThrottleStrategy::default(),
            chat: ChatConfig::default(),
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl AgentConfig {
    /// Load from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// `env` looks up a variable by name.
    pub fn resolve(env: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match env(ENV_CONFIG) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };

        if let Some(listen) = env(ENV_LISTEN) {
            cfg.listen = listen
                .parse()
                .with_context(|| format!("{ENV_LISTEN}={listen} is not a socket address"))?;
        }
        if let Some(dir) = env(ENV_DATA) {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(level) = env(ENV_LOG) {
            cfg.logger.level = LoggerLevel::new(level).context(ENV_LOG)?;
        }
        Ok(cfg)
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(STORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use hng_model::RetryPlacement;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let cfg = AgentConfig::resolve(env(&[])).unwrap();
        assert_eq!(cfg.listen.port(), 8787);
        assert_eq!(cfg.group_size, 5);
        assert_eq!(cfg.throttle, ThrottleStrategy::default());
        assert_eq!(cfg.store_path(), PathBuf::from("data").join("storage.json"));
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = AgentConfig::resolve(env(&[
            (ENV_LISTEN, "0.0.0.0:9000"),
            (ENV_DATA, "/var/lib/hng"),
            (ENV_LOG, "hng_core=debug,info"),
        ]))
        .unwrap();
        assert_eq!(cfg.listen, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.data_dir, PathBuf::from("/var/lib/hng"));
        assert_eq!(cfg.logger.level.as_str(), "hng_core=debug,info");
    }

    #[test]
    fn bad_overrides_are_errors() {
        assert!(AgentConfig::resolve(env(&[(ENV_LISTEN, "nowhere")])).is_err());
        assert!(AgentConfig::resolve(env(&[(ENV_LOG, "x=loud")])).is_err());
        assert!(AgentConfig::resolve(env(&[(ENV_CONFIG, "/definitely/missing.json")])).is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: AgentConfig = serde_json::from_str(
            r#"{"groupSize": 3, "throttle": {"placement": "blocking"}, "chat": {"model": "m"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.group_size, 3);
        assert_eq!(cfg.throttle.placement, RetryPlacement::Blocking);
        assert_eq!(cfg.throttle.max_retries, 5);
        assert_eq!(cfg.chat.model, "m");
        assert_eq!(cfg.listen.port(), 8787);
    }
}
