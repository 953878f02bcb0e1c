// Build event types and the bus that fans them out to pipeline listeners

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::PathBuf;
use tokio::sync::broadcast;

/// Events emitted by the bundle task for the surrounding pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Event {
    /// An output file changed on disk (e.g. the bundle was rewritten)
    FileChange { path: PathBuf },

    /// A bundler invocation is starting for the given entry
    BundleStart { entry: PathBuf },

    /// A bundle was produced and persisted
    BundleComplete { dest: PathBuf, modules: usize },
}

impl Event {
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Event::FileChange { .. } => Cow::Borrowed("file.change"),
            Event::BundleStart { .. } => Cow::Borrowed("bundle.start"),
            Event::BundleComplete { .. } => Cow::Borrowed("bundle.complete"),
        }
    }
}

/// Broadcast bus connecting the task to pipeline listeners.
///
/// Emission is fire-and-forget: events published with no live subscribers
/// are dropped silently.
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: Event) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names() {
        let event = Event::FileChange {
            path: PathBuf::from("dist/main.js"),
        };
        assert_eq!(event.name().as_ref(), "file.change");

        let event = Event::BundleComplete {
            dest: PathBuf::from("dist/main.js"),
            modules: 3,
        };
        assert_eq!(event.name().as_ref(), "bundle.complete");
    }

    #[test]
    fn event_serialization() {
        let event = Event::FileChange {
            path: PathBuf::from("dist/main.js"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "file-change");
        assert_eq!(json["payload"]["path"], "dist/main.js");
    }

    #[tokio::test]
    async fn bus_fans_out_to_all_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.emit(Event::BundleStart {
            entry: PathBuf::from("src/app/main.dev.ts"),
        });

        assert_eq!(rx1.recv().await.unwrap().name().as_ref(), "bundle.start");
        assert_eq!(rx2.recv().await.unwrap().name().as_ref(), "bundle.start");
    }

    #[test]
    fn emit_without_subscribers_is_fire_and_forget() {
        let bus = EventBus::new();
        bus.emit(Event::FileChange {
            path: PathBuf::from("dist/main.js"),
        });
    }
}
