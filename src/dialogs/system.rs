//! System file dialogs through the rfd crate.
//!
//! Speaks the same raw string contract as the native plug-in so the gateway
//! treats both alike.

use super::backend::{join_paths, BackendError, DialogBackend};
use super::filter::decode_filters;
use rfd::FileDialog;
use std::path::Path;

/// Dialog backend for Windows and Linux desktops.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBackend;

impl SystemBackend {
    fn dialog(title: &str, directory: &Path, filters: &str) -> FileDialog {
        let mut dialog = FileDialog::new().set_title(title).set_directory(directory);

        for filter in decode_filters(filters) {
            dialog = dialog.add_filter(filter.name.as_str(), filter.extensions.as_slice());
        }

        dialog
    }
}

impl DialogBackend for SystemBackend {
    fn open_file_panel(
        &self,
        title: &str,
        directory: &Path,
        filters: &str,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        let dialog = Self::dialog(title, directory, filters);
        let selected = if multiselect {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };
        Ok(join_paths(&selected))
    }

    fn open_folder_panel(
        &self,
        title: &str,
        directory: &Path,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        let dialog = Self::dialog(title, directory, "");
        let selected = if multiselect {
            dialog.pick_folders().unwrap_or_default()
        } else {
            dialog.pick_folder().into_iter().collect()
        };
        Ok(join_paths(&selected))
    }

    fn save_file_panel(
        &self,
        title: &str,
        directory: &Path,
        default_name: &str,
        filters: &str,
    ) -> Result<String, BackendError> {
        let mut dialog = Self::dialog(title, directory, filters);
        if !default_name.is_empty() {
            dialog = dialog.set_file_name(default_name);
        }

        Ok(dialog
            .save_file()
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
}
