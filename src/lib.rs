use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, builder::DefaultState};
use serde::Deserialize;

use crate::domain::{customer::Customer, Entity};

pub mod domain;
pub mod infrastructure;

static DEFAULT_CONFIG_FILE: &str = "meibo.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct MeiboConfig {
    pub server: Server,
    pub store: Store,
    pub meilisearch: MeiliSearch,
    pub logger: Logger,
}

impl MeiboConfig {
    /// カレントディレクトリの`meibo.toml`と環境変数から設定を読み込む
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<MeiboConfig>()
    }

    /// 指定されたファイルと環境変数から設定を読み込む
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(config::File::from(path.as_ref()))
            .add_source(Self::environment())
            .build()?
            .try_deserialize::<MeiboConfig>()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.address", "0.0.0.0:8080")?
            .set_default("server.api_base_url", "http://127.0.0.1:8080/api")?
            .set_default("store.backend", "memory")?
            .set_default("store.machine_id", 1)?
            .set_default("store.node_id", 1)?
            .set_default("meilisearch.url", "http://localhost:7700")?
            .set_default("meilisearch.api_key", "")?
            .set_default("meilisearch.index", Customer::ENTITY_NAME)?
            .set_default("logger.level", "INFO")
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("MEIBO").separator("__")
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Server {
    pub address: String,
    pub api_base_url: String,
    pub tls_cert: Option<String>,
    pub tls_key: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Store {
    pub backend: Backend,
    pub machine_id: i32,
    pub node_id: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Meilisearch,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MeiliSearch {
    pub url: String,
    pub api_key: String,
    pub index: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Logger {
    pub level: Level,
}

#[derive(Clone, Debug, Deserialize)]
pub enum Level {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl From<&Level> for tracing::Level {
    fn from(value: &Level) -> Self {
        match value {
            Level::TRACE => tracing::Level::TRACE,
            Level::DEBUG => tracing::Level::DEBUG,
            Level::INFO => tracing::Level::INFO,
            Level::WARN => tracing::Level::WARN,
            Level::ERROR => tracing::Level::ERROR,
        }
    }
}
