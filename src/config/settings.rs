use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    pub sender: SenderConfig,
    #[serde(default)]
    pub channel: ChannelConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub topics: TopicConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Sender identity stamped onto every outbound message.
///
/// Both fields are required; a missing value fails `Settings::new()` at
/// startup rather than surfacing per request.
#[derive(Debug, Clone, Deserialize)]
pub struct SenderConfig {
    pub address: String,
    pub display_name: String,
}

/// Delivery backend selection and credentials.
///
/// Credentials are handed to the adapter at construction time; nothing in
/// the dispatch core reads process-wide state.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    #[serde(default = "default_channel_backend")]
    pub backend: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_template_backend")]
    pub backend: String,
    /// Directory holding one template file per key (fs backend)
    #[serde(default = "default_template_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TopicConfig {
    /// How long a resolved topic identifier stays cached, in seconds
    #[serde(default = "default_topic_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_channel_backend() -> String {
    "memory".to_string()
}

fn default_template_backend() -> String {
    "fs".to_string()
}

fn default_template_dir() -> String {
    "templates".to_string()
}

fn default_topic_cache_ttl() -> u64 {
    300 // 5 minutes
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8082)?
            .set_default("channel.backend", "memory")?
            .set_default("templates.backend", "fs")?
            .set_default("templates.dir", "templates")?
            .set_default("topics.cache_ttl_seconds", 300)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables
            // SERVER_HOST, SENDER_ADDRESS, CHANNEL_BACKEND, etc.
            .add_source(
                Environment::default()
                    .separator("_")
                    .try_parsing(true)
                    .list_separator(","),
            );

        builder.build()?.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            backend: default_channel_backend(),
            access_key: None,
            secret_key: None,
            region: None,
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            backend: default_template_backend(),
            dir: default_template_dir(),
        }
    }
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_topic_cache_ttl(),
        }
    }
}
