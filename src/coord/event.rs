//! Coordinator event queue
//!
//! Host output, device input and viewport observations are all funneled
//! into one `mpsc` queue consumed by the coordinator thread.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::core::grid::Viewport;
use crate::ui::input::DeviceEvent;

/// Tagged events from the three producers
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// PTY output since the previous message
    Output(Vec<u8>),
    /// Keyboard, mouse, clipboard or focus event from the surface
    Device(DeviceEvent),
    /// Container size changed
    Viewport(Viewport),
    /// The UI is going away
    Unmount,
}

/// Producer handle for the coordinator queue
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<Event>,
}

impl EventSender {
    /// Returns false once the coordinator has stopped listening
    pub fn send(&self, event: Event) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn device(&self, event: DeviceEvent) -> bool {
        self.send(Event::Device(event))
    }

    /// Streaming channel handed to the host on spawn/attach
    pub fn output_sink(&self) -> OutputSink {
        OutputSink { tx: self.tx.clone() }
    }
}

/// Host-to-coordinator push channel for PTY output.
///
/// Messages keep their send order. Sends after the coordinator is gone are
/// dropped.
#[derive(Debug, Clone)]
pub struct OutputSink {
    tx: Sender<Event>,
}

impl OutputSink {
    pub fn send(&self, bytes: Vec<u8>) -> bool {
        self.tx.send(Event::Output(bytes)).is_ok()
    }
}

pub fn channel() -> (EventSender, Receiver<Event>) {
    let (tx, rx) = mpsc::channel();
    (EventSender { tx }, rx)
}
