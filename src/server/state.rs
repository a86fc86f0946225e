use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::channel::{create_channel_adapter, ChannelAdapter, SenderIdentity};
use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::template::{create_template_store, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<Dispatcher>,
    pub start_time: Instant,
}

impl AppState {
    /// Build state with the backends selected by configuration.
    pub fn new(settings: Settings) -> Self {
        let adapter = create_channel_adapter(&settings.channel);
        let template_store = create_template_store(&settings.templates);
        Self::with_backends(settings, adapter, template_store)
    }

    /// Build state around externally constructed backends.
    ///
    /// This is the seam for cloud-provider adapters and for tests.
    pub fn with_backends(
        settings: Settings,
        adapter: Arc<dyn ChannelAdapter>,
        template_store: Arc<dyn TemplateStore>,
    ) -> Self {
        let sender = SenderIdentity::from(&settings.sender);
        let dispatcher = Arc::new(Dispatcher::new(
            adapter,
            template_store,
            sender,
            Duration::from_secs(settings.topics.cache_ttl_seconds),
        ));

        Self {
            settings: Arc::new(settings),
            dispatcher,
            start_time: Instant::now(),
        }
    }
}
