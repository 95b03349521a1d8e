//! Settings window application
//!
//! Hosts the settings page in an eframe window, forwards its actions to the
//! settings controller and shows reported messages as toasts.

use crate::config::{get_config_file_path, load_config};
use crate::controller::SettingsController;
use crate::dialogs::{native_gateway, NativeGateway};
use crate::messages::MessageLog;
use crate::ui::{SettingsAction, SettingsWindow, Toasts};
use eframe::egui;
use log::info;
use std::time::{Duration, Instant};

/// The settings window.
pub struct SettingsApp {
    controller: SettingsController<MessageLog>,
    gateway: NativeGateway<MessageLog>,
    messages: MessageLog,
    window: SettingsWindow,
    toasts: Toasts,
    start_time: Instant,
}

impl SettingsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing settings window");

        let messages = MessageLog::new();
        let config = load_config();
        let config_path = get_config_file_path().ok();

        Self {
            controller: SettingsController::new(config, config_path, messages.clone()),
            gateway: native_gateway(messages.clone()),
            messages,
            window: SettingsWindow::new(),
            toasts: Toasts::new(),
            start_time: Instant::now(),
        }
    }

    fn app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn handle_action(&mut self, action: SettingsAction) {
        match action {
            SettingsAction::ChangeWorkMode(index) => {
                self.controller.change_work_mode(index);
            }
            SettingsAction::ChangeRegion(index) => {
                if self.controller.change_region(index) {
                    info!(
                        "Region changed to {}; graphics settings will be re-applied",
                        self.controller.config().region.label()
                    );
                }
            }
            SettingsAction::ChangeLanguage(index) => {
                self.controller.change_language(index);
            }
            SettingsAction::ChangeDataPath => {
                self.controller.change_data_path(&self.gateway);
            }
            SettingsAction::UpdateGameDb => self.controller.update_game_db(),
            SettingsAction::OpenConfig => self.controller.open_config(),
        }
    }
}

impl eframe::App for SettingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = self.app_time();
        for message in self.messages.drain() {
            self.toasts.push(message, now);
        }
        self.toasts.update(now);

        if !self.toasts.is_empty() {
            egui::TopBottomPanel::bottom("toasts").show(ctx, |ui| self.toasts.show(ui));
            ctx.request_repaint_after(Duration::from_millis(250));
        }

        let view = self.controller.apply_settings();
        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.window.show(ui, &view, self.controller.config()))
            .inner;

        if let Some(action) = action {
            self.handle_action(action);
        }
    }
}
