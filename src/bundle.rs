//! Post-build installation of the dialog plug-in bundle.
//!
//! A macOS app only finds the StandaloneFileBrowser plug-in when the bundle
//! sits in `<App>.app/Contents/PlugIns` and its executable has the execute
//! bit set. This hook copies it there after a build.

use crate::dialogs::{PLUGIN_BUNDLE_NAME, PLUGIN_NAME};
use crate::error::{Error, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Default location of the plug-in bundle in the project tree.
pub const SOURCE_BUNDLE_RELATIVE_PATH: &str =
    "Assets/Plugins/StandaloneFileBrowser/Plugins/StandaloneFileBrowser.bundle";

/// Mode applied to the plug-in executable.
const EXECUTABLE_MODE: u32 = 0o755;

/// Platform a build was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BuildTarget {
    #[value(name = "macos")]
    StandaloneMacOs,
    #[value(name = "windows")]
    StandaloneWindows,
    #[value(name = "linux")]
    StandaloneLinux,
}

/// What the hook did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleOutcome {
    /// The target does not use the plug-in bundle.
    Skipped,
    /// The source bundle does not exist.
    SourceMissing(PathBuf),
    /// The bundle was installed at this path.
    Installed(PathBuf),
}

/// Copy the plug-in bundle into a built app.
///
/// A missing source bundle or a failed chmod is logged, not an error;
/// copy failures are.
pub fn post_process_build(
    target: BuildTarget,
    built_app: &Path,
    source_bundle: &Path,
) -> Result<BundleOutcome> {
    if target != BuildTarget::StandaloneMacOs {
        return Ok(BundleOutcome::Skipped);
    }

    let source_bundle = std::path::absolute(source_bundle).map_err(|e| Error::BundleCopy {
        path: source_bundle.to_path_buf(),
        source: e,
    })?;
    if !source_bundle.is_dir() {
        warn!(
            "StandaloneFileBrowser bundle was not found at {}.",
            source_bundle.display()
        );
        return Ok(BundleOutcome::SourceMissing(source_bundle));
    }

    let plugins_dir = built_app.join("Contents").join("PlugIns");
    fs::create_dir_all(&plugins_dir).map_err(|e| Error::BundleCopy {
        path: plugins_dir.clone(),
        source: e,
    })?;

    let destination = plugins_dir.join(PLUGIN_BUNDLE_NAME);
    if destination.exists() {
        fs::remove_dir_all(&destination).map_err(|e| Error::BundleCopy {
            path: destination.clone(),
            source: e,
        })?;
    }

    copy_directory(&source_bundle, &destination)?;

    let executable = destination.join("Contents").join("MacOS").join(PLUGIN_NAME);
    ensure_executable_permission(&executable);

    info!(
        "Copied StandaloneFileBrowser bundle to build output: {}",
        destination.display()
    );
    Ok(BundleOutcome::Installed(destination))
}

/// Recursively copy `source` into `destination`, overwriting files.
pub fn copy_directory(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            Error::BundleCopy {
                path,
                source: e.into(),
            }
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| Error::BundleEntryOutside {
                entry: entry.path().to_path_buf(),
                bundle: source.to_path_buf(),
            })?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::BundleCopy {
                path: target.clone(),
                source: e,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::BundleCopy {
                path: target.clone(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Set the plug-in executable to mode 755. Failures are logged.
fn ensure_executable_permission(executable: &Path) {
    if !executable.is_file() {
        warn!(
            "StandaloneFileBrowser executable was not found: {}",
            executable.display()
        );
        return;
    }

    if let Err(e) = set_mode(executable, EXECUTABLE_MODE) {
        warn!(
            "Failed to set executable permission for {}: {}",
            executable.display(),
            e
        );
    }
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, _mode: u32) -> std::io::Result<()> {
    log::debug!("Skipping chmod of {} on this host", path.display());
    Ok(())
}
