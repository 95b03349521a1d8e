//! UI components
//!
//! egui widgets for the settings window and its message toasts.

mod settings;
mod toasts;

pub use settings::{SettingsAction, SettingsWindow};
pub use toasts::Toasts;
