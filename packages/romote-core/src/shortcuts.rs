//! User shortcuts: one-tap channel launches and recorded key sequences.
//!
//! Storage of shortcuts is the caller's concern; [`Shortcut`] is serializable
//! so it can be persisted opaquely.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::roku::EcpRemote;

/// What a shortcut does when executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShortcutKind {
    /// Launches a channel. `deep_link` is kept for the caller; it is not sent.
    #[serde(rename_all = "camelCase")]
    Channel {
        channel_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deep_link: Option<String>,
    },

    /// Replays key presses in order.
    #[serde(rename_all = "camelCase")]
    KeySequence { keys: Vec<String> },
}

/// A user-created shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(flatten)]
    pub kind: ShortcutKind,
    #[serde(default)]
    pub sort_order: i32,
}

impl Shortcut {
    pub fn channel(name: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon_url: None,
            kind: ShortcutKind::Channel {
                channel_id: channel_id.into(),
                deep_link: None,
            },
            sort_order: 0,
        }
    }

    pub fn key_sequence(name: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            icon_url: None,
            kind: ShortcutKind::KeySequence { keys },
            sort_order: 0,
        }
    }
}

/// Runs shortcuts against a remote.
pub struct ShortcutExecutor {
    remote: Arc<dyn EcpRemote>,
    key_delay: Duration,
}

impl ShortcutExecutor {
    pub fn new(remote: Arc<dyn EcpRemote>, key_delay: Duration) -> Self {
        Self { remote, key_delay }
    }

    /// Executes `shortcut`. Returns `false` for an empty channel id or key
    /// sequence, and stops a key sequence at its first failed key.
    pub async fn execute(&self, shortcut: &Shortcut) -> bool {
        log::debug!("[Shortcut] Executing {:?}", shortcut.name);
        match &shortcut.kind {
            ShortcutKind::Channel { channel_id, .. } => {
                if channel_id.is_empty() {
                    return false;
                }
                self.remote.launch_channel(channel_id).await
            }
            ShortcutKind::KeySequence { keys } => {
                if keys.is_empty() {
                    return false;
                }
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 && !self.key_delay.is_zero() {
                        tokio::time::sleep(self.key_delay).await;
                    }
                    if !self.remote.send_key_press(key).await {
                        log::debug!("[Shortcut] Aborted at key {} ({})", i, key);
                        return false;
                    }
                }
                true
            }
        }
    }
}

/// Captures key presses while forwarding them to the remote.
pub struct KeyRecorder {
    remote: Arc<dyn EcpRemote>,
    state: Mutex<RecorderState>,
}

#[derive(Default)]
struct RecorderState {
    recording: bool,
    keys: Vec<String>,
}

impl KeyRecorder {
    pub fn new(remote: Arc<dyn EcpRemote>) -> Self {
        Self {
            remote,
            state: Mutex::new(RecorderState::default()),
        }
    }

    /// Starts a fresh recording, discarding any previous keys.
    pub fn start(&self) {
        let mut state = self.state.lock();
        state.keys.clear();
        state.recording = true;
        log::debug!("[Shortcut] Recording started");
    }

    /// Stops recording and returns the captured keys.
    pub fn stop(&self) -> Vec<String> {
        let mut state = self.state.lock();
        state.recording = false;
        let keys = std::mem::take(&mut state.keys);
        log::debug!("[Shortcut] Recording stopped, {} key(s)", keys.len());
        keys
    }

    pub fn is_recording(&self) -> bool {
        self.state.lock().recording
    }

    /// Records `key` if a recording is running, then sends it.
    pub async fn send_key_press(&self, key: &str) -> bool {
        {
            let mut state = self.state.lock();
            if state.recording {
                state.keys.push(key.to_string());
            }
        }
        self.remote.send_key_press(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Remote that records calls and fails on a chosen key.
    #[derive(Default)]
    struct MockRemote {
        calls: Mutex<Vec<String>>,
        failing_key: Option<String>,
    }

    #[async_trait]
    impl EcpRemote for MockRemote {
        async fn send_key_press(&self, key: &str) -> bool {
            self.calls.lock().push(format!("key:{}", key));
            self.failing_key.as_deref() != Some(key)
        }

        async fn launch_channel(&self, channel_id: &str) -> bool {
            self.calls.lock().push(format!("launch:{}", channel_id));
            true
        }
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|k| k.to_string()).collect()
    }

    #[tokio::test]
    async fn channel_shortcut_launches() {
        let remote = Arc::new(MockRemote::default());
        let executor = ShortcutExecutor::new(remote.clone(), Duration::ZERO);

        assert!(executor.execute(&Shortcut::channel("Netflix", "12")).await);
        assert!(!executor.execute(&Shortcut::channel("Broken", "")).await);
        assert_eq!(remote.calls.lock().as_slice(), ["launch:12"]);
    }

    #[tokio::test(start_paused = true)]
    async fn key_sequence_runs_in_order_with_delay() {
        let remote = Arc::new(MockRemote::default());
        let executor = ShortcutExecutor::new(remote.clone(), Duration::from_millis(100));
        let shortcut = Shortcut::key_sequence("Settings", keys(&["Home", "Up", "Select"]));

        let start = tokio::time::Instant::now();
        assert!(executor.execute(&shortcut).await);

        assert_eq!(start.elapsed(), Duration::from_millis(200));
        assert_eq!(
            remote.calls.lock().as_slice(),
            ["key:Home", "key:Up", "key:Select"]
        );
    }

    #[tokio::test]
    async fn key_sequence_aborts_on_failure() {
        let remote = Arc::new(MockRemote {
            failing_key: Some("Up".into()),
            ..Default::default()
        });
        let executor = ShortcutExecutor::new(remote.clone(), Duration::ZERO);
        let shortcut = Shortcut::key_sequence("Settings", keys(&["Home", "Up", "Select"]));

        assert!(!executor.execute(&shortcut).await);
        assert_eq!(remote.calls.lock().as_slice(), ["key:Home", "key:Up"]);
    }

    #[tokio::test]
    async fn empty_key_sequence_fails() {
        let remote = Arc::new(MockRemote::default());
        let executor = ShortcutExecutor::new(remote.clone(), Duration::ZERO);
        assert!(!executor.execute(&Shortcut::key_sequence("Empty", Vec::new())).await);
        assert!(remote.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn recorder_captures_only_while_recording() {
        let remote = Arc::new(MockRemote::default());
        let recorder = KeyRecorder::new(remote.clone());

        recorder.send_key_press("Home").await;
        recorder.start();
        assert!(recorder.is_recording());
        recorder.send_key_press("Down").await;
        recorder.send_key_press("Select").await;
        let captured = recorder.stop();
        recorder.send_key_press("Back").await;

        assert!(!recorder.is_recording());
        assert_eq!(captured, ["Down", "Select"]);
        assert_eq!(remote.calls.lock().len(), 4);

        recorder.start();
        assert!(recorder.stop().is_empty());
    }

    #[test]
    fn shortcut_serializes_with_kind_tag() {
        let shortcut = Shortcut::key_sequence("Settings", keys(&["Home", "Up"]));
        let json = serde_json::to_value(&shortcut).unwrap();
        assert_eq!(json["type"], "keySequence");
        assert_eq!(json["keys"][1], "Up");

        let back: Shortcut = serde_json::from_value(json).unwrap();
        assert_eq!(back, shortcut);

        let json = serde_json::to_value(Shortcut::channel("Netflix", "12")).unwrap();
        assert_eq!(json["type"], "channel");
        assert_eq!(json["channelId"], "12");
    }
}
