mod settings;

pub use settings::{
    ChannelConfig, SenderConfig, ServerConfig, Settings, TemplateConfig, TopicConfig,
};
