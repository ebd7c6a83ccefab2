use std::{future::Future, pin::Pin, sync::Arc};

use crate::events::{EventHandler, EventProducer, Handler, MetafieldEvent, SyncStageEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub sync_stage_producer: Vec<EventProducer<SyncStageEvent>>,
    pub metafield_producer: Vec<EventProducer<MetafieldEvent>>,
}

impl EventProducers {
    pub async fn publish_sync_stage(&self, event: SyncStageEvent) {
        for producer in &self.sync_stage_producer {
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_metafield(&self, event: MetafieldEvent) {
        for producer in &self.metafield_producer {
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_sync_stage: Option<EventHandler<SyncStageEvent>>,
    pub on_metafield: Option<EventHandler<MetafieldEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_sync_stage = hooks.on_sync_stage.map(|f| EventHandler::new(buffer_size, f));
        let on_metafield = hooks.on_metafield.map(|f| EventHandler::new(buffer_size, f));
        Self { on_sync_stage, on_metafield }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_sync_stage {
            result.sync_stage_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_metafield {
            result.metafield_producer.push(handler.subscribe());
        }
        result
    }

    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_sync_stage {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
        if let Some(handler) = self.on_metafield {
            tokio::spawn(async move {
                handler.start_handler().await;
            });
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_sync_stage: Option<Handler<SyncStageEvent>>,
    pub on_metafield: Option<Handler<MetafieldEvent>>,
}

impl EventHooks {
    pub fn on_sync_stage<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(SyncStageEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_sync_stage = Some(Arc::new(f));
        self
    }

    pub fn on_metafield<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(MetafieldEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_metafield = Some(Arc::new(f));
        self
    }
}
