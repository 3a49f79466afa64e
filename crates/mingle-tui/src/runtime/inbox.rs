//! Inbox channel types for async event collection.

use tokio::sync::mpsc;

use crate::events::UiEvent;

/// Sender half of the runtime inbox. Handlers send events here.
pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;

/// Receiver half of the runtime inbox. The runtime drains this each frame.
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;
