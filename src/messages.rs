//! User-facing message reporting
//!
//! Components that need to tell the user something (a fallback was used,
//! a folder was rejected) go through [`MessageReporter`] and never decide
//! how the message is presented.

use log::{error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
}

impl MessageType {
    /// Get a short label for the severity.
    pub fn label(&self) -> &'static str {
        match self {
            MessageType::Info => "Info",
            MessageType::Success => "Success",
            MessageType::Warning => "Warning",
            MessageType::Error => "Error",
        }
    }
}

/// A reported message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub kind: MessageType,
}

/// Capability to surface a message to the user.
pub trait MessageReporter {
    fn show(&self, message: &str, kind: MessageType);
}

impl<R: MessageReporter + ?Sized> MessageReporter for &R {
    fn show(&self, message: &str, kind: MessageType) {
        (**self).show(message, kind)
    }
}

/// Reporter that writes messages to the log. Used by the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl MessageReporter for LogReporter {
    fn show(&self, message: &str, kind: MessageType) {
        match kind {
            MessageType::Info | MessageType::Success => info!("{}", message),
            MessageType::Warning => warn!("{}", message),
            MessageType::Error => error!("{}", message),
        }
    }
}

/// Shared in-memory queue of messages.
///
/// Clones share the same queue, so the settings window can hand one clone
/// to the dialog gateway and drain another each frame.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Rc<RefCell<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return all pending messages, oldest first.
    pub fn drain(&self) -> Vec<Message> {
        std::mem::take(&mut *self.messages.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl MessageReporter for MessageLog {
    fn show(&self, message: &str, kind: MessageType) {
        self.messages.borrow_mut().push(Message {
            text: message.to_string(),
            kind,
        });
    }
}
