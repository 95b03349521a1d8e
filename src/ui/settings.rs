//! Settings page for the viewer's data and general options.
//!
//! Renders the dropdowns and buttons and reports what the user did; the
//! caller applies it through the settings controller.

use crate::config::{Config, Language, Region, WorkMode};
use crate::controller::SettingsView;
use eframe::egui::{self, RichText, Ui};

/// Something the user asked for on the settings page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    ChangeWorkMode(usize),
    ChangeRegion(usize),
    ChangeLanguage(usize),
    ChangeDataPath,
    UpdateGameDb,
    OpenConfig,
}

/// The settings page.
#[derive(Debug, Clone, Default)]
pub struct SettingsWindow;

impl SettingsWindow {
    pub fn new() -> Self {
        Self
    }

    /// Show the page. Returns at most one action per frame.
    pub fn show(&mut self, ui: &mut Ui, view: &SettingsView, config: &Config) -> Option<SettingsAction> {
        let mut action = None;

        ui.heading("Settings");
        ui.add_space(8.0);

        egui::Grid::new("settings_grid")
            .num_columns(2)
            .spacing([24.0, 10.0])
            .show(ui, |ui| {
                ui.label("Work mode");
                let labels: Vec<&str> = WorkMode::all().iter().map(|m| m.label()).collect();
                if let Some(index) = dropdown(ui, "work_mode", &labels, view.work_mode) {
                    action = Some(SettingsAction::ChangeWorkMode(index));
                }
                ui.end_row();

                ui.label("Region");
                let labels: Vec<&str> = Region::all().iter().map(|r| r.label()).collect();
                if let Some(index) = dropdown(ui, "region", &labels, view.region) {
                    action = Some(SettingsAction::ChangeRegion(index));
                }
                ui.end_row();

                ui.label("Language");
                let labels: Vec<&str> = Language::all().iter().map(|l| l.label()).collect();
                if let Some(index) = dropdown(ui, "language", &labels, view.language) {
                    action = Some(SettingsAction::ChangeLanguage(index));
                }
                ui.end_row();

                ui.label("Data path");
                ui.horizontal(|ui| {
                    let shown = if config.main_path.is_empty() {
                        RichText::new("(not set)").italics().weak()
                    } else {
                        RichText::new(&config.main_path).monospace()
                    };
                    ui.label(shown);
                    if ui.button("📁 Change…").clicked() {
                        action = Some(SettingsAction::ChangeDataPath);
                    }
                });
                ui.end_row();
            });

        ui.add_space(12.0);
        ui.separator();

        ui.horizontal(|ui| {
            let update_db = ui
                .add_enabled(view.update_db_enabled, egui::Button::new("Update database"))
                .on_disabled_hover_text("Only available in Standalone mode");
            if update_db.clicked() {
                action = Some(SettingsAction::UpdateGameDb);
            }

            if ui.button("Open config file").clicked() {
                action = Some(SettingsAction::OpenConfig);
            }
        });

        action
    }
}

/// Combo box over `labels`. Returns the newly picked index.
fn dropdown(ui: &mut Ui, id: &str, labels: &[&str], selected: usize) -> Option<usize> {
    let mut picked = None;
    let current = labels.get(selected).copied().unwrap_or_default();

    egui::ComboBox::from_id_source(id)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for (index, label) in labels.iter().enumerate() {
                if ui.selectable_label(index == selected, *label).clicked() && index != selected {
                    picked = Some(index);
                }
            }
        });

    picked
}
