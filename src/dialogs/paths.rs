//! Start directory resolution for file dialogs.

use crate::environment::{AppEnvironment, Platform, APP_DIR_NAME};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory that receives exported files.
const EXPORTS_DIR_NAME: &str = "Exports";

/// Platform-specific default root for exported files, without creating it.
///
/// - **macOS**: `~/Documents/UmaViewer/Exports`
/// - **Windows**: `<Documents>\UmaViewer\Exports`
/// - elsewhere: `<persistent data>/Exports`
pub fn export_root_path(env: &impl AppEnvironment) -> PathBuf {
    let documents = match env.platform() {
        Platform::MacOs => env.home_dir().map(|home| home.join("Documents")),
        Platform::Windows => env.documents_dir(),
        _ => None,
    };

    match documents {
        Some(documents) => documents.join(APP_DIR_NAME).join(EXPORTS_DIR_NAME),
        None => env.persistent_data_path().join(EXPORTS_DIR_NAME),
    }
}

/// Platform-specific export root, created if absent.
///
/// Creation failures are logged; the path is returned regardless.
pub fn export_root(env: &impl AppEnvironment) -> PathBuf {
    let root = export_root_path(env);
    if let Err(e) = fs::create_dir_all(&root) {
        warn!("Failed to create export root {}: {}", root.display(), e);
    }
    root
}

/// Return an existing directory to start a dialog from.
///
/// Tries the preferred directory, then the export root, then the parent of
/// the persistent data directory, and finally the persistent data directory
/// itself.
pub fn safe_start_directory(preferred: Option<&Path>, env: &impl AppEnvironment) -> PathBuf {
    if let Some(preferred) = preferred.filter(|p| !p.as_os_str().is_empty() && p.is_dir()) {
        return preferred.to_path_buf();
    }

    let export_root = export_root(env);
    if export_root.is_dir() {
        debug!("Starting dialog in export root {}", export_root.display());
        return export_root;
    }

    let persistent = env.persistent_data_path();
    if let Some(parent) = persistent.parent().filter(|p| p.is_dir()) {
        return parent.to_path_buf();
    }

    if let Err(e) = fs::create_dir_all(&persistent) {
        warn!(
            "Persistent data directory {} is unavailable: {}",
            persistent.display(),
            e
        );
    }
    persistent
}
