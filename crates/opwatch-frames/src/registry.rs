//! Frame Registry
//!
//! Creates the three hidden frames once and hands out their handles.
//! Attaching is idempotent: frames already known, or already present in the
//! document, are reused instead of duplicated.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use opwatch_protocol::constants::BLANK_DOCUMENT;

use crate::error::FrameError;
use crate::frame::{FrameHandle, FrameName};
use crate::host::{BrowserHost, WindowTarget};
use crate::Result;

pub struct FrameRegistry {
    host: Arc<dyn BrowserHost>,
    /// Static same-origin document loaded into the relay frame
    relay_document: String,
    frames: Arc<RwLock<HashMap<FrameName, FrameHandle>>>,
}

impl FrameRegistry {
    pub fn new(host: Arc<dyn BrowserHost>) -> Self {
        Self {
            host,
            relay_document: BLANK_DOCUMENT.to_string(),
            frames: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_relay_document(mut self, url: impl Into<String>) -> Self {
        self.relay_document = url.into();
        self
    }

    pub fn relay_document(&self) -> &str {
        &self.relay_document
    }

    /// Attach every missing frame, relay frame first.
    pub async fn attach(&self) -> Result<Vec<FrameHandle>> {
        for name in FrameName::ALL {
            if self.frames.read().contains_key(&name) {
                continue;
            }

            let handle = if self.host.frame_exists(name) {
                tracing::debug!(frame = %name, "Adopting existing frame");
                FrameHandle::new(name, true)
            } else {
                self.host.create_hidden_frame(name)?;

                if name == FrameName::Relay && self.relay_document != BLANK_DOCUMENT {
                    // Children attach to the relay document, so it must be loaded first
                    let target = WindowTarget::Frame(FrameName::Relay);
                    self.host.navigate(target, &self.relay_document)?;
                    self.host.settle(target).await;
                }

                tracing::debug!(frame = %name, "Created hidden frame");
                FrameHandle::new(name, false)
            };

            self.frames.write().insert(name, handle);
        }

        tracing::info!(
            relay_document = %self.relay_document,
            "Session frames attached"
        );

        Ok(self.handles())
    }

    /// Look up a frame by logical name
    pub fn get(&self, name: FrameName) -> Result<FrameHandle> {
        self.frames
            .read()
            .get(&name)
            .cloned()
            .ok_or_else(|| FrameError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: FrameName) -> bool {
        self.frames.read().contains_key(&name)
    }

    pub fn is_attached(&self) -> bool {
        FrameName::ALL.iter().all(|name| self.contains(*name))
    }

    /// Handles in creation order
    pub fn handles(&self) -> Vec<FrameHandle> {
        let frames = self.frames.read();
        FrameName::ALL
            .iter()
            .filter_map(|name| frames.get(name).cloned())
            .collect()
    }

    /// Window of a known frame, for navigation or messaging
    pub fn window(&self, name: FrameName) -> Result<WindowTarget> {
        self.get(name).map(|handle| WindowTarget::Frame(handle.name))
    }
}

impl Clone for FrameRegistry {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            relay_document: self.relay_document.clone(),
            frames: Arc::clone(&self.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{HostEvent, RecordingHost};

    #[tokio::test]
    async fn test_attach_creates_three_frames() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let registry = FrameRegistry::new(host.clone());

        assert!(!registry.is_attached());
        assert!(registry.get(FrameName::Relay).is_err());

        let handles = registry.attach().await.unwrap();
        assert_eq!(handles.len(), 3);
        assert!(handles.iter().all(|h| !h.adopted));
        assert!(registry.is_attached());

        assert_eq!(
            host.created_frames(),
            vec![
                FrameName::Relay,
                FrameName::OpCheckSession,
                FrameName::PromptNone
            ]
        );
        // Blank relay document needs no navigation
        assert!(host.navigations().is_empty());
    }

    #[tokio::test]
    async fn test_attach_is_idempotent() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let registry = FrameRegistry::new(host.clone());

        registry.attach().await.unwrap();
        registry.attach().await.unwrap();

        assert_eq!(host.created_frames().len(), 3);
    }

    #[tokio::test]
    async fn test_second_registry_adopts_existing_frames() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));

        FrameRegistry::new(host.clone()).attach().await.unwrap();
        let handles = FrameRegistry::new(host.clone()).attach().await.unwrap();

        assert!(handles.iter().all(|h| h.adopted));
        assert_eq!(host.created_frames().len(), 3);
    }

    #[tokio::test]
    async fn test_relay_document_loaded_before_children() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let registry =
            FrameRegistry::new(host.clone()).with_relay_document("https://app.example.com/relay.html");

        registry.attach().await.unwrap();

        let relay = WindowTarget::Frame(FrameName::Relay);
        let events = host.events();
        assert_eq!(events[0], HostEvent::FrameCreated(FrameName::Relay));
        assert_eq!(
            events[1],
            HostEvent::Navigated {
                target: relay,
                url: "https://app.example.com/relay.html".to_string()
            }
        );
        assert_eq!(events[2], HostEvent::Settled(relay));
        assert_eq!(events[3], HostEvent::FrameCreated(FrameName::OpCheckSession));
    }

    #[tokio::test]
    async fn test_window_lookup() {
        let host = Arc::new(RecordingHost::new("https://app.example.com/"));
        let registry = FrameRegistry::new(host);

        assert!(matches!(
            registry.window(FrameName::PromptNone),
            Err(FrameError::NotFound(_))
        ));

        registry.attach().await.unwrap();
        assert_eq!(
            registry.window(FrameName::PromptNone).unwrap(),
            WindowTarget::Frame(FrameName::PromptNone)
        );
    }
}
