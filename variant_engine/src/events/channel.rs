//! Subscriber channels for engine events.
//!
//! Every hook sits behind its own bounded channel. Producers are clones of the sending half and can be handed to as
//! many API instances as needed. Handlers only ever see the event itself, never the state of the engine.
//!
//! Once the last producer is dropped, the handler finishes whatever is still running and stops.
use std::{future::Future, pin::Pin, sync::Arc};

use log::*;
use tokio::{sync::mpsc, task::JoinError, task::JoinSet};

pub type Handler<E> = Arc<dyn Fn(E) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

pub struct EventHandler<E: Send + Sync + 'static> {
    receiver: mpsc::Receiver<E>,
    sender: mpsc::Sender<E>,
    handler: Handler<E>,
}

impl<E: Send + Sync + 'static> EventHandler<E> {
    pub fn new(buffer_size: usize, handler: Handler<E>) -> Self {
        let (sender, receiver) = mpsc::channel(buffer_size);
        Self { receiver, sender, handler }
    }

    pub fn subscribe(&self) -> EventProducer<E> {
        EventProducer::new(self.sender.clone())
    }

    /// Dispatches events until every producer has gone away. Each event is handled on its own task.
    ///
    /// Returns the number of events that were handled to completion.
    pub async fn start_handler(self) -> usize {
        let Self { mut receiver, sender, handler } = self;
        // Only subscribers may keep the channel open
        drop(sender);
        debug!("📬️ Starting event handler");
        let mut running = JoinSet::new();
        let mut handled = 0;
        loop {
            tokio::select! {
                event = receiver.recv() => match event {
                    Some(event) => {
                        trace!("📬️ Handling event");
                        running.spawn((handler)(event));
                    },
                    None => break,
                },
                Some(result) = running.join_next(), if !running.is_empty() => handled += completed(result),
            }
        }
        if !running.is_empty() {
            debug!("📬️ Waiting for {} event jobs to complete", running.len());
        }
        while let Some(result) = running.join_next().await {
            handled += completed(result);
        }
        debug!("📬️ Event handler has shut down after handling {handled} events");
        handled
    }
}

fn completed(result: Result<(), JoinError>) -> usize {
    match result {
        Ok(()) => 1,
        Err(e) => {
            warn!("📬️ An event job did not complete: {e}");
            0
        },
    }
}

#[derive(Clone)]
pub struct EventProducer<E: Send + Sync> {
    sender: mpsc::Sender<E>,
}

impl<E: Send + Sync> EventProducer<E> {
    pub fn new(sender: mpsc::Sender<E>) -> Self {
        Self { sender }
    }

    pub async fn publish_event(&self, event: E) {
        if let Err(e) = self.sender.send(event).await {
            error!("📬️ Failed to send event: {e}");
        }
    }
}
