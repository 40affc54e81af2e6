//! Recording browser host for tests
//!
//! Keeps an in-memory picture of the page: attached frames, window
//! locations and origins, message subscribers. Every side effect is
//! appended to an event log that tests assert on.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::error::FrameError;
use crate::frame::FrameName;
use crate::host::{BrowserHost, InboundMessage, WindowTarget};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    FrameCreated(FrameName),
    Navigated {
        target: WindowTarget,
        url: String,
    },
    MessagePosted {
        target: WindowTarget,
        data: String,
        target_origin: String,
    },
    Settled(WindowTarget),
}

#[derive(Default)]
struct PageState {
    frames: HashSet<FrameName>,
    location: String,
    origins: HashMap<WindowTarget, String>,
    subscribers: HashMap<WindowTarget, Vec<UnboundedSender<InboundMessage>>>,
    unreachable: HashSet<WindowTarget>,
    events: Vec<HostEvent>,
}

pub struct RecordingHost {
    state: Mutex<PageState>,
}

impl RecordingHost {
    /// A host whose current context is at `location`.
    pub fn new(location: &str) -> Self {
        Self {
            state: Mutex::new(PageState {
                location: location.to_string(),
                ..PageState::default()
            }),
        }
    }

    pub fn set_location(&self, location: &str) {
        self.state.lock().location = location.to_string();
    }

    pub fn set_origin(&self, target: WindowTarget, origin: &str) {
        self.state.lock().origins.insert(target, origin.to_string());
    }

    /// Make every operation on `target` fail.
    pub fn set_unreachable(&self, target: WindowTarget) {
        self.state.lock().unreachable.insert(target);
    }

    /// Deliver a `message` event to a window; returns the number of live listeners reached.
    pub fn deliver(&self, target: WindowTarget, origin: &str, data: &str) -> usize {
        let mut state = self.state.lock();
        let Some(senders) = state.subscribers.get_mut(&target) else {
            return 0;
        };

        let message = InboundMessage::new(origin, data);
        senders.retain(|sender| sender.send(message.clone()).is_ok());
        senders.len()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.state.lock().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    pub fn created_frames(&self) -> Vec<FrameName> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::FrameCreated(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<(WindowTarget, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Navigated { target, url } => Some((target, url)),
                _ => None,
            })
            .collect()
    }

    pub fn navigations_of(&self, target: WindowTarget) -> Vec<String> {
        self.navigations()
            .into_iter()
            .filter(|(t, _)| *t == target)
            .map(|(_, url)| url)
            .collect()
    }

    /// `(data, target_origin)` of every message posted to `target`
    pub fn messages_to(&self, target: WindowTarget) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::MessagePosted {
                    target: t,
                    data,
                    target_origin,
                } if t == target => Some((data, target_origin)),
                _ => None,
            })
            .collect()
    }

    fn check_reachable(state: &PageState, target: WindowTarget) -> Result<()> {
        if state.unreachable.contains(&target) {
            return Err(FrameError::Unreachable(target.to_string()));
        }
        if let WindowTarget::Frame(name) = target {
            if !state.frames.contains(&name) {
                return Err(FrameError::NotFound(name.to_string()));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserHost for RecordingHost {
    fn frame_exists(&self, frame: FrameName) -> bool {
        self.state.lock().frames.contains(&frame)
    }

    fn create_hidden_frame(&self, frame: FrameName) -> Result<()> {
        let mut state = self.state.lock();
        if let crate::frame::FrameParent::Frame(parent) = frame.parent() {
            if !state.frames.contains(&parent) {
                return Err(FrameError::NotFound(parent.to_string()));
            }
        }
        state.frames.insert(frame);
        state.events.push(HostEvent::FrameCreated(frame));
        Ok(())
    }

    fn navigate(&self, target: WindowTarget, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        Self::check_reachable(&state, target)
            .map_err(|e| FrameError::Navigation(e.to_string()))?;

        if target == WindowTarget::Current {
            state.location = url.to_string();
        }
        state.events.push(HostEvent::Navigated {
            target,
            url: url.to_string(),
        });
        Ok(())
    }

    fn post_message(&self, target: WindowTarget, data: &str, target_origin: &str) -> Result<()> {
        let mut state = self.state.lock();
        Self::check_reachable(&state, target)
            .map_err(|e| FrameError::PostMessage(e.to_string()))?;

        state.events.push(HostEvent::MessagePosted {
            target,
            data: data.to_string(),
            target_origin: target_origin.to_string(),
        });
        Ok(())
    }

    fn origin(&self, target: WindowTarget) -> Result<String> {
        let state = self.state.lock();
        Self::check_reachable(&state, target)?;
        state
            .origins
            .get(&target)
            .cloned()
            .ok_or_else(|| FrameError::Unreachable(target.to_string()))
    }

    fn location(&self) -> Result<String> {
        Ok(self.state.lock().location.clone())
    }

    fn subscribe(&self, target: WindowTarget) -> Result<UnboundedReceiver<InboundMessage>> {
        let mut state = self.state.lock();
        Self::check_reachable(&state, target)?;

        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.entry(target).or_default().push(tx);
        Ok(rx)
    }

    async fn settle(&self, target: WindowTarget) {
        self.state.lock().events.push(HostEvent::Settled(target));
        tokio::task::yield_now().await;
    }
}
