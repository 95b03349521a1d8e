//! Native dialog backends and their raw string contract.
//!
//! A backend returns one string per call. Open calls may select several
//! paths, joined by [`PATHS_SEPARATOR`]; an empty string means the user
//! cancelled.

use crate::environment::Platform;
use std::fmt;
use std::path::{Path, PathBuf};

/// Separator between paths in a multi-result response (ASCII file separator).
pub const PATHS_SEPARATOR: char = '\u{1c}';

/// Why a backend could not show a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The native library could not be loaded from any known location.
    LibraryMissing { searched: Vec<PathBuf> },
    /// The library loaded but does not export the requested function.
    EntryPointMissing { symbol: &'static str },
    /// No native dialog exists for this platform.
    PlatformUnsupported,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::LibraryMissing { searched } => {
                write!(f, "native dialog library not found")?;
                if !searched.is_empty() {
                    let list: Vec<String> =
                        searched.iter().map(|p| p.display().to_string()).collect();
                    write!(f, " (searched: {})", list.join(", "))?;
                }
                Ok(())
            }
            BackendError::EntryPointMissing { symbol } => {
                write!(f, "entry point '{}' not found in native dialog library", symbol)
            }
            BackendError::PlatformUnsupported => {
                write!(f, "native file dialogs are not supported on this platform")
            }
        }
    }
}

impl std::error::Error for BackendError {}

/// The three native dialog entry points.
pub trait DialogBackend {
    fn open_file_panel(
        &self,
        title: &str,
        directory: &Path,
        filters: &str,
        multiselect: bool,
    ) -> Result<String, BackendError>;

    fn open_folder_panel(
        &self,
        title: &str,
        directory: &Path,
        multiselect: bool,
    ) -> Result<String, BackendError>;

    fn save_file_panel(
        &self,
        title: &str,
        directory: &Path,
        default_name: &str,
        filters: &str,
    ) -> Result<String, BackendError>;
}

impl<B: DialogBackend + ?Sized> DialogBackend for Box<B> {
    fn open_file_panel(
        &self,
        title: &str,
        directory: &Path,
        filters: &str,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        (**self).open_file_panel(title, directory, filters, multiselect)
    }

    fn open_folder_panel(
        &self,
        title: &str,
        directory: &Path,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        (**self).open_folder_panel(title, directory, multiselect)
    }

    fn save_file_panel(
        &self,
        title: &str,
        directory: &Path,
        default_name: &str,
        filters: &str,
    ) -> Result<String, BackendError> {
        (**self).save_file_panel(title, directory, default_name, filters)
    }
}

/// Backend for platforms without a native dialog.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

impl DialogBackend for UnsupportedBackend {
    fn open_file_panel(&self, _: &str, _: &Path, _: &str, _: bool) -> Result<String, BackendError> {
        Err(BackendError::PlatformUnsupported)
    }

    fn open_folder_panel(&self, _: &str, _: &Path, _: bool) -> Result<String, BackendError> {
        Err(BackendError::PlatformUnsupported)
    }

    fn save_file_panel(&self, _: &str, _: &Path, _: &str, _: &str) -> Result<String, BackendError> {
        Err(BackendError::PlatformUnsupported)
    }
}

/// Split a raw multi-result response into paths, dropping empty entries.
pub fn split_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(PATHS_SEPARATOR)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Join paths into a raw multi-result response.
pub fn join_paths<P: AsRef<Path>>(paths: &[P]) -> String {
    paths
        .iter()
        .map(|p| p.as_ref().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(&PATHS_SEPARATOR.to_string())
}

/// Pick the backend for a platform.
///
/// macOS uses the StandaloneFileBrowser plug-in, Windows and Linux use the
/// system dialogs through rfd, everything else has no dialog.
pub fn backend_for(platform: Platform) -> Box<dyn DialogBackend> {
    match platform {
        Platform::MacOs => Box::new(super::plugin::PluginBackend::load()),
        #[cfg(any(target_os = "windows", target_os = "linux"))]
        Platform::Windows | Platform::Linux => Box::new(super::system::SystemBackend),
        _ => Box::new(UnsupportedBackend),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_two_paths() {
        let raw = format!("/a/b{}/c/d", PATHS_SEPARATOR);
        assert_eq!(
            split_paths(&raw),
            vec![PathBuf::from("/a/b"), PathBuf::from("/c/d")]
        );
    }

    #[test]
    fn test_split_empty_response() {
        assert!(split_paths("").is_empty());
    }

    #[test]
    fn test_split_discards_empty_entries() {
        let raw = format!("{sep}/a{sep}{sep}/b{sep}", sep = PATHS_SEPARATOR);
        assert_eq!(split_paths(&raw), vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_join_then_split() {
        let joined = join_paths(&["/x/one.fbx", "/y/two.fbx"]);
        assert_eq!(joined, "/x/one.fbx\u{1c}/y/two.fbx");
        assert_eq!(split_paths(&joined).len(), 2);
    }

    #[test]
    fn test_unsupported_backend() {
        let backend = UnsupportedBackend;
        assert_eq!(
            backend.open_folder_panel("t", Path::new("/"), false),
            Err(BackendError::PlatformUnsupported)
        );
    }

    #[test]
    fn test_backend_for_mobile_is_unsupported() {
        let backend = backend_for(Platform::Android);
        assert_eq!(
            backend.save_file_panel("t", Path::new("/"), "n", ""),
            Err(BackendError::PlatformUnsupported)
        );
    }

    #[test]
    fn test_error_display() {
        let err = BackendError::EntryPointMissing {
            symbol: "DialogSaveFilePanel",
        };
        assert!(err.to_string().contains("DialogSaveFilePanel"));

        let err = BackendError::LibraryMissing {
            searched: vec![PathBuf::from("/opt/lib.dylib")],
        };
        assert!(err.to_string().contains("/opt/lib.dylib"));
    }
}
