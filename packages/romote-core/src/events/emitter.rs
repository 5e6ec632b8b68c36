//! Event emitter abstraction for decoupling operations from delivery.
//!
//! Discovery and control depend on the [`EventEmitter`] trait rather than a
//! concrete channel, so callers can choose callbacks, a broadcast channel, or
//! nothing at all.

use super::{CommandEvent, DiscoveryEvent};

/// Trait for emitting domain events without knowledge of transport.
///
/// Emission is synchronous: the event is handed over inside the operation
/// that produced it, so ordering matches the order of occurrence.
pub trait EventEmitter: Send + Sync {
    /// Emits a discovery event.
    fn emit_discovery(&self, event: DiscoveryEvent);

    /// Emits a command outcome event.
    fn emit_command(&self, event: CommandEvent);
}

/// No-op emitter for callers that only use return values.
pub struct NoopEventEmitter;

impl EventEmitter for NoopEventEmitter {
    fn emit_discovery(&self, _event: DiscoveryEvent) {}

    fn emit_command(&self, _event: CommandEvent) {}
}

/// Logs all events at debug level.
pub struct LoggingEventEmitter;

impl EventEmitter for LoggingEventEmitter {
    fn emit_discovery(&self, event: DiscoveryEvent) {
        tracing::debug!(?event, "discovery_event");
    }

    fn emit_command(&self, event: CommandEvent) {
        tracing::debug!(?event, "command_event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roku::Device;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Test emitter that counts events.
    struct CountingEventEmitter {
        discovery_count: AtomicUsize,
        command_count: AtomicUsize,
    }

    impl CountingEventEmitter {
        fn new() -> Self {
            Self {
                discovery_count: AtomicUsize::new(0),
                command_count: AtomicUsize::new(0),
            }
        }
    }

    impl EventEmitter for CountingEventEmitter {
        fn emit_discovery(&self, _event: DiscoveryEvent) {
            self.discovery_count.fetch_add(1, Ordering::SeqCst);
        }

        fn emit_command(&self, _event: CommandEvent) {
            self.command_count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn counting_emitter_tracks_events() {
        let emitter = Arc::new(CountingEventEmitter::new());

        emitter.emit_discovery(DiscoveryEvent::DeviceDiscovered {
            device: Device::at_address("192.168.1.5"),
            timestamp: 0,
        });
        emitter.emit_command(CommandEvent::Failed {
            reason: "No device connected".into(),
            code: "no_device",
            timestamp: 0,
        });
        emitter.emit_command(CommandEvent::Failed {
            reason: "Command timed out".into(),
            code: "timeout",
            timestamp: 0,
        });

        assert_eq!(emitter.discovery_count.load(Ordering::SeqCst), 1);
        assert_eq!(emitter.command_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn noop_and_logging_emitters_accept_events() {
        let emitters: Vec<Arc<dyn EventEmitter>> =
            vec![Arc::new(NoopEventEmitter), Arc::new(LoggingEventEmitter)];
        for emitter in emitters {
            emitter.emit_command(CommandEvent::Failed {
                reason: "Network error: refused".into(),
                code: "network_error",
                timestamp: 0,
            });
        }
    }
}
