//! Bridge that maps emitted events onto a broadcast channel.
//!
//! [`BroadcastEventBridge`] turns the synchronous emitter contract into a
//! channel the caller can subscribe to and drain at its own pace.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use super::emitter::EventEmitter;
use super::{CommandEvent, DiscoveryEvent, RemoteEvent};

/// Forwards emitted events to a `tokio::sync::broadcast` channel.
///
/// An optional external emitter (for example a UI callback) receives each
/// event first. It can be attached after construction.
#[derive(Clone)]
pub struct BroadcastEventBridge {
    tx: broadcast::Sender<RemoteEvent>,
    external_emitter: Arc<RwLock<Option<Arc<dyn EventEmitter>>>>,
}

impl BroadcastEventBridge {
    /// Creates a new bridge with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            external_emitter: Arc::new(RwLock::new(None)),
        }
    }

    /// Sets an external emitter that sees every event before the channel does.
    pub fn set_external_emitter(&self, emitter: Arc<dyn EventEmitter>) {
        *self.external_emitter.write() = Some(emitter);
    }

    /// Returns a new receiver for the broadcast channel.
    pub fn subscribe(&self) -> broadcast::Receiver<RemoteEvent> {
        self.tx.subscribe()
    }
}

/// Generates an [`EventEmitter`] method that forwards to the external emitter
/// (if set) and then sends to the broadcast channel.
macro_rules! impl_emit {
    ($method:ident, $event_ty:ty, $variant:ident) => {
        fn $method(&self, event: $event_ty) {
            if let Some(ref emitter) = *self.external_emitter.read() {
                emitter.$method(event.clone());
            }
            if let Err(e) = self.tx.send(RemoteEvent::$variant(event)) {
                log::trace!("[EventBridge] No broadcast receivers: {}", e);
            }
        }
    };
}

impl EventEmitter for BroadcastEventBridge {
    impl_emit!(emit_discovery, DiscoveryEvent, Discovery);
    impl_emit!(emit_command, CommandEvent, Command);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(AtomicUsize);

    impl EventEmitter for Counter {
        fn emit_discovery(&self, _event: DiscoveryEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn emit_command(&self, _event: CommandEvent) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn failed(reason: &str) -> CommandEvent {
        CommandEvent::Failed {
            reason: reason.into(),
            code: "test",
            timestamp: 0,
        }
    }

    #[test]
    fn subscriber_drains_events_in_order() {
        let bridge = BroadcastEventBridge::new(8);
        let mut rx = bridge.subscribe();

        bridge.emit_command(failed("first"));
        bridge.emit_command(failed("second"));

        match rx.try_recv().unwrap() {
            RemoteEvent::Command(event) => assert_eq!(event.reason(), "first"),
            other => panic!("unexpected event: {:?}", other),
        }
        match rx.try_recv().unwrap() {
            RemoteEvent::Command(event) => assert_eq!(event.reason(), "second"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn emitting_without_subscribers_is_harmless() {
        let bridge = BroadcastEventBridge::new(1);
        bridge.emit_command(failed("nobody listening"));
    }

    #[test]
    fn external_emitter_receives_events() {
        let bridge = BroadcastEventBridge::new(4);
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        bridge.set_external_emitter(counter.clone());

        bridge.emit_command(failed("x"));
        bridge.emit_command(failed("y"));

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
