//! StandaloneFileBrowser plug-in backend.
//!
//! The plug-in is a native bundle exporting three C functions. It owns the
//! returned strings, so results are copied and never freed here.

use super::backend::{BackendError, DialogBackend};
use libloading::{Library, Symbol};
use log::{debug, info, warn};
use std::ffi::{c_char, CStr, CString};
use std::path::{Path, PathBuf};

/// Base name of the plug-in library.
pub const PLUGIN_NAME: &str = "StandaloneFileBrowser";

/// Environment variable that overrides the plug-in location.
pub const PLUGIN_PATH_ENV: &str = "UMAVIEWER_DIALOG_PLUGIN";

/// Directory name of the plug-in inside an app's `Contents/PlugIns`.
pub const PLUGIN_BUNDLE_NAME: &str = "StandaloneFileBrowser.bundle";

const OPEN_FILE_SYMBOL: &str = "DialogOpenFilePanel";
const OPEN_FOLDER_SYMBOL: &str = "DialogOpenFolderPanel";
const SAVE_FILE_SYMBOL: &str = "DialogSaveFilePanel";

type OpenFilePanelFn =
    unsafe extern "C" fn(*const c_char, *const c_char, *const c_char, bool) -> *const c_char;
type OpenFolderPanelFn = unsafe extern "C" fn(*const c_char, *const c_char, bool) -> *const c_char;
type SaveFilePanelFn = unsafe extern "C" fn(
    *const c_char,
    *const c_char,
    *const c_char,
    *const c_char,
) -> *const c_char;

/// Location of the plug-in bundle next to the running executable
/// (`<App>.app/Contents/PlugIns/StandaloneFileBrowser.bundle`).
pub fn expected_bundle_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    // <App>.app/Contents/MacOS/<exe>
    let contents = exe.parent()?.parent()?;
    Some(contents.join("PlugIns").join(PLUGIN_BUNDLE_NAME))
}

/// Places the plug-in is looked for, in order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = std::env::var_os(PLUGIN_PATH_ENV) {
        candidates.push(PathBuf::from(path));
    }

    if let Some(bundle) = expected_bundle_path() {
        candidates.push(bundle.join("Contents").join("MacOS").join(PLUGIN_NAME));
    }

    candidates.push(PathBuf::from(libloading::library_filename(PLUGIN_NAME)));
    candidates
}

/// Dialog backend calling into the StandaloneFileBrowser plug-in.
#[derive(Debug)]
pub struct PluginBackend {
    library: Option<Library>,
    searched: Vec<PathBuf>,
}

impl PluginBackend {
    /// Load the plug-in from the default candidate locations.
    pub fn load() -> Self {
        Self::load_from(&candidate_paths())
    }

    /// Load the plug-in from the first candidate that opens.
    ///
    /// A missing library is not an error here; every call then reports
    /// [`BackendError::LibraryMissing`].
    pub fn load_from(candidates: &[PathBuf]) -> Self {
        for candidate in candidates {
            // SAFETY: the plug-in has no initialisation routines with
            // preconditions beyond being loaded once.
            match unsafe { Library::new(candidate) } {
                Ok(library) => {
                    info!("Loaded dialog plug-in from {}", candidate.display());
                    return Self {
                        library: Some(library),
                        searched: candidates.to_vec(),
                    };
                }
                Err(e) => debug!("Dialog plug-in not loaded from {}: {}", candidate.display(), e),
            }
        }

        warn!("Dialog plug-in {} could not be loaded", PLUGIN_NAME);
        Self {
            library: None,
            searched: candidates.to_vec(),
        }
    }

    fn symbol<T>(&self, name: &'static str) -> Result<Symbol<'_, T>, BackendError> {
        let library = self
            .library
            .as_ref()
            .ok_or_else(|| BackendError::LibraryMissing {
                searched: self.searched.clone(),
            })?;

        // SAFETY: T is one of the function pointer types declared above,
        // matching the plug-in's exported signatures.
        unsafe { library.get::<T>(name.as_bytes()) }.map_err(|e| {
            debug!("Symbol {} unavailable: {}", name, e);
            BackendError::EntryPointMissing { symbol: name }
        })
    }
}

impl DialogBackend for PluginBackend {
    fn open_file_panel(
        &self,
        title: &str,
        directory: &Path,
        filters: &str,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        let open = self.symbol::<OpenFilePanelFn>(OPEN_FILE_SYMBOL)?;
        let title = to_c_string(title);
        let directory = path_to_c_string(directory);
        let filters = to_c_string(filters);

        // SAFETY: all pointers are valid NUL-terminated strings for the call.
        Ok(unsafe {
            read_result(open(
                title.as_ptr(),
                directory.as_ptr(),
                filters.as_ptr(),
                multiselect,
            ))
        })
    }

    fn open_folder_panel(
        &self,
        title: &str,
        directory: &Path,
        multiselect: bool,
    ) -> Result<String, BackendError> {
        let open = self.symbol::<OpenFolderPanelFn>(OPEN_FOLDER_SYMBOL)?;
        let title = to_c_string(title);
        let directory = path_to_c_string(directory);

        // SAFETY: see open_file_panel.
        Ok(unsafe { read_result(open(title.as_ptr(), directory.as_ptr(), multiselect)) })
    }

    fn save_file_panel(
        &self,
        title: &str,
        directory: &Path,
        default_name: &str,
        filters: &str,
    ) -> Result<String, BackendError> {
        let save = self.symbol::<SaveFilePanelFn>(SAVE_FILE_SYMBOL)?;
        let title = to_c_string(title);
        let directory = path_to_c_string(directory);
        let default_name = to_c_string(default_name);
        let filters = to_c_string(filters);

        // SAFETY: see open_file_panel.
        Ok(unsafe {
            read_result(save(
                title.as_ptr(),
                directory.as_ptr(),
                default_name.as_ptr(),
                filters.as_ptr(),
            ))
        })
    }
}

/// Interior NULs cannot cross the C boundary; they are dropped.
fn to_c_string(s: &str) -> CString {
    CString::new(s.replace('\0', "")).unwrap_or_default()
}

fn path_to_c_string(path: &Path) -> CString {
    to_c_string(&path.to_string_lossy())
}

/// Copy a plug-in owned string. NULL reads as empty.
///
/// # Safety
/// `ptr` must be NULL or point to a NUL-terminated string.
unsafe fn read_result(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}
