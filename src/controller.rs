//! Settings controller
//!
//! Handles the actions of the "Other" settings page: dropdown changes,
//! the game-data folder picker and opening the config file. The egui
//! window in [`crate::ui`] only renders and forwards to this type.

use crate::config::{save_config_to, Config, DropdownOption, Language, Region, WorkMode};
use crate::data_path::{browse_start_path, normalize_path, resolve_data_path};
use crate::dialogs::{DialogBackend, DialogGateway, DialogRequest};
use crate::environment::{AppEnvironment, Platform};
use crate::messages::{MessageReporter, MessageType};
use log::{debug, info, warn};
use std::path::PathBuf;

const DATA_FOLDER_DIALOG_TITLE: &str = "Select Uma data folder";

const UPDATE_DB_UNSUPPORTED: &str = "Automatic database update is no longer supported until all \
     issues with new files are resolved. Please run the game to obtain required files.";

/// Dropdown state to show for the current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsView {
    pub work_mode: usize,
    pub region: usize,
    pub language: usize,
    /// The database update action only exists in standalone mode.
    pub update_db_enabled: bool,
}

/// Applies settings changes and persists them.
pub struct SettingsController<R> {
    config: Config,
    config_path: Option<PathBuf>,
    platform: Platform,
    reporter: R,
}

impl<R: MessageReporter> SettingsController<R> {
    /// `config_path` is where changes are saved; `None` keeps them in memory.
    pub fn new(config: Config, config_path: Option<PathBuf>, reporter: R) -> Self {
        Self {
            config,
            config_path,
            platform: Platform::current(),
            reporter,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn apply_settings(&self) -> SettingsView {
        SettingsView {
            work_mode: self.config.work_mode.index(),
            region: self.config.region.index(),
            language: self.config.language.index(),
            update_db_enabled: self.config.work_mode == WorkMode::Standalone,
        }
    }

    /// Returns `true` if the language changed.
    pub fn change_language(&mut self, index: usize) -> bool {
        match Language::from_index(index) {
            Some(language) if language != self.config.language => {
                self.config.language = language;
                self.update_config(true);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the region changed and graphics settings must be
    /// re-applied.
    pub fn change_region(&mut self, index: usize) -> bool {
        match Region::from_index(index) {
            Some(region) if region != self.config.region => {
                self.config.region = region;
                self.update_config(false);
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if the work mode changed.
    pub fn change_work_mode(&mut self, index: usize) -> bool {
        match WorkMode::from_index(index) {
            Some(mode) if mode != self.config.work_mode => {
                self.config.work_mode = mode;
                self.update_config(true);
                true
            }
            _ => false,
        }
    }

    pub fn update_game_db(&self) {
        self.reporter.show(UPDATE_DB_UNSUPPORTED, MessageType::Info);
    }

    /// Let the user pick the game-data folder.
    ///
    /// Returns `true` if the configured path changed.
    pub fn change_data_path<B, G, E>(&mut self, gateway: &DialogGateway<B, G, E>) -> bool
    where
        B: DialogBackend,
        G: MessageReporter,
        E: AppEnvironment,
    {
        if !self.platform.is_desktop() {
            self.reporter
                .show("Not supported on this platform", MessageType::Warning);
            return false;
        }

        let start = browse_start_path(&self.config.main_path, gateway.environment());
        let request = DialogRequest::open_folder(DATA_FOLDER_DIALOG_TITLE).with_start_directory(start);

        let Some(selected) = gateway
            .open_folder(&request)
            .into_iter()
            .find(|p| !p.as_os_str().is_empty())
        else {
            debug!("Data folder selection cancelled");
            return false;
        };

        let Some(resolved) = resolve_data_path(&selected) else {
            self.reporter.show(
                "Selected folder is invalid. It must contain meta/master/dat.",
                MessageType::Error,
            );
            return false;
        };

        if resolved == normalize_path(&self.config.main_path) {
            return false;
        }

        info!("Data path changed to {}", resolved);
        self.config.main_path = resolved.clone();
        self.update_config(true);
        self.reporter
            .show(&format!("DataPath changed: {}", resolved), MessageType::Success);
        true
    }

    /// Open the config file with the system's default handler.
    pub fn open_config(&self) {
        if !self.platform.is_desktop() {
            self.reporter
                .show("Not supported on this platform", MessageType::Warning);
            return;
        }

        let Some(path) = self.config_path.as_ref().filter(|p| p.is_file()) else {
            debug!("No config file to open");
            return;
        };

        if let Err(e) = open::that(path) {
            warn!("Failed to open {}: {}", path.display(), e);
        }
    }

    fn update_config(&self, notify_restart: bool) {
        if let Some(path) = &self.config_path {
            if let Err(e) = save_config_to(path, &self.config) {
                warn!("Failed to save configuration: {}", e);
                self.reporter
                    .show(&format!("Failed to save settings: {}", e), MessageType::Error);
                return;
            }
        }

        if notify_restart {
            self.reporter.show(
                "Settings saved. Restart the viewer to apply this change.",
                MessageType::Info,
            );
        }
    }
}
