//! Application environment: platform identity and well-known directories.

use std::path::PathBuf;

/// Application name used for per-user directories.
pub const APP_DIR_NAME: &str = "UmaViewer";

/// Platform the shell is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Platform of the running binary.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_os = "linux") {
            Platform::Linux
        } else {
            Platform::Other
        }
    }

    /// Whether a native file dialog can be shown on this platform at all.
    pub fn is_desktop(&self) -> bool {
        matches!(self, Platform::MacOs | Platform::Windows | Platform::Linux)
    }
}

/// Where the shell finds its directories.
///
/// `persistent_data_path` is the application's private storage and is
/// assumed to always be usable.
pub trait AppEnvironment {
    fn platform(&self) -> Platform;

    fn persistent_data_path(&self) -> PathBuf;

    fn home_dir(&self) -> Option<PathBuf>;

    fn documents_dir(&self) -> Option<PathBuf>;
}

/// The real environment, backed by the `dirs` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl AppEnvironment for SystemEnvironment {
    fn platform(&self) -> Platform {
        Platform::current()
    }

    fn persistent_data_path(&self) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR_NAME)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }

    fn documents_dir(&self) -> Option<PathBuf> {
        dirs::document_dir()
    }
}
