//! Timed toast messages shown at the bottom of the window.

use crate::messages::{Message, MessageType};
use eframe::egui::{self, Color32, RichText, Ui};

/// How long a toast stays visible, in seconds.
fn duration_for(kind: MessageType) -> f64 {
    match kind {
        MessageType::Error => 8.0,
        MessageType::Warning => 6.0,
        MessageType::Info | MessageType::Success => 3.0,
    }
}

/// A visible message and when it expires (seconds since app start).
#[derive(Debug, Clone, PartialEq)]
struct Toast {
    message: Message,
    expires_at: f64,
}

/// Stack of active toasts, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    active: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message, current_time: f64) {
        let expires_at = current_time + duration_for(message.kind);
        self.active.push(Toast {
            message,
            expires_at,
        });
    }

    /// Drop expired toasts.
    pub fn update(&mut self, current_time: f64) {
        self.active.retain(|toast| toast.expires_at > current_time);
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn show(&self, ui: &mut Ui) {
        for toast in &self.active {
            let color = match toast.message.kind {
                MessageType::Info => ui.visuals().text_color(),
                MessageType::Success => Color32::from_rgb(80, 170, 90),
                MessageType::Warning => Color32::from_rgb(220, 160, 40),
                MessageType::Error => Color32::from_rgb(210, 70, 60),
            };
            egui::Frame::group(ui.style()).show(ui, |ui| {
                ui.label(RichText::new(toast.message.kind.label()).strong().color(color));
                ui.label(&toast.message.text);
            });
        }
    }
}
