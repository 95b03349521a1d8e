//! Errors of the fallible shell operations
//!
//! Covers configuration persistence, the plug-in bundle post-build hook and
//! material dump patching. The file dialog gateway never surfaces these; it
//! degrades instead.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// No platform config directory could be determined.
    ConfigDirNotFound,

    /// Reading the config file failed.
    ConfigRead { path: PathBuf, source: io::Error },

    /// Writing the config file (or its directory) failed.
    ConfigWrite { path: PathBuf, source: io::Error },

    /// The config file is not valid JSON for [`crate::config::Config`].
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Plug-in bundle
    // ─────────────────────────────────────────────────────────────────────────
    /// Copying part of the plug-in bundle into the built app failed.
    BundleCopy { path: PathBuf, source: io::Error },

    /// A walked entry did not live under the source bundle.
    BundleEntryOutside { entry: PathBuf, bundle: PathBuf },

    // ─────────────────────────────────────────────────────────────────────────
    // Material dumps
    // ─────────────────────────────────────────────────────────────────────────
    /// Reading or writing a material dump failed.
    MaterialDumpIo { path: PathBuf, source: io::Error },

    /// A material dump could not be parsed or serialized.
    MaterialDump {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),
            Error::ConfigRead { path, source } => {
                write!(f, "Failed to read configuration '{}': {}", path.display(), source)
            }
            Error::ConfigWrite { path, source } => {
                write!(f, "Failed to save configuration to '{}': {}", path.display(), source)
            }
            Error::ConfigParse { path, source } => {
                write!(f, "Invalid configuration in '{}': {}", path.display(), source)
            }
            Error::BundleCopy { path, source } => {
                write!(f, "Failed to copy '{}': {}", path.display(), source)
            }
            Error::BundleEntryOutside { entry, bundle } => write!(
                f,
                "'{}' is not inside the bundle '{}'",
                entry.display(),
                bundle.display()
            ),
            Error::MaterialDumpIo { path, source } => {
                write!(f, "Material dump '{}': {}", path.display(), source)
            }
            Error::MaterialDump { path, source } => {
                write!(f, "Invalid material dump '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ConfigRead { source, .. }
            | Error::ConfigWrite { source, .. }
            | Error::BundleCopy { source, .. }
            | Error::MaterialDumpIo { source, .. } => Some(source),
            Error::ConfigParse { source, .. } | Error::MaterialDump { source, .. } => Some(source),
            Error::ConfigDirNotFound | Error::BundleEntryOutside { .. } => None,
        }
    }
}

/// Log-and-default for results whose failure should not stop the viewer.
pub trait ResultExt<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {}. Using default.", context, err);
                default
            }
        }
    }
}
