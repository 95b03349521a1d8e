//! The dialog gateway: the only entry point application code uses for
//! file dialogs.
//!
//! Every call produces a usable result. When the backend cannot show a
//! dialog the gateway reports the condition once through the
//! [`MessageReporter`] and returns either an empty selection (open) or a
//! synthesized path under the export root (save).

use super::backend::{split_paths, BackendError, DialogBackend};
use super::filter::{encode_filters, ExtensionFilter};
use super::paths::{export_root, safe_start_directory};
use crate::environment::{AppEnvironment, Platform};
use crate::messages::{MessageReporter, MessageType};
use log::{debug, info};
use std::path::PathBuf;

/// Parameters of one dialog invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogRequest {
    pub title: String,
    /// Preferred start directory; resolved to an existing one before use.
    pub start_directory: Option<PathBuf>,
    pub filters: Vec<ExtensionFilter>,
    pub multiselect: bool,
    /// Suggested file name, used by save dialogs only.
    pub default_name: String,
}

impl DialogRequest {
    pub fn open_file(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn open_folder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// A save request for a single extension, e.g. `("Export", "model", "fbx")`.
    pub fn save_file(
        title: impl Into<String>,
        default_name: impl Into<String>,
        extension: &str,
    ) -> Self {
        Self {
            title: title.into(),
            default_name: default_name.into(),
            filters: vec![ExtensionFilter::new("", &[extension])],
            ..Self::default()
        }
    }

    pub fn with_start_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_directory = Some(dir.into());
        self
    }

    pub fn with_filter(mut self, filter: ExtensionFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_multiselect(mut self, multiselect: bool) -> Self {
        self.multiselect = multiselect;
        self
    }

    /// First non-empty extension of the filters, without a leading dot.
    pub fn primary_extension(&self) -> Option<&str> {
        self.filters
            .iter()
            .flat_map(|f| f.normalized_extensions())
            .next()
    }
}

/// Append `.extension` unless `name` already ends with it (ignoring case).
pub fn fallback_file_name(name: &str, extension: Option<&str>) -> String {
    let extension = extension
        .map(|e| e.trim_start_matches('.'))
        .filter(|e| !e.trim().is_empty());

    match extension {
        Some(ext) => {
            let suffix = format!(".{}", ext);
            if name.to_lowercase().ends_with(&suffix.to_lowercase()) {
                name.to_string()
            } else {
                format!("{}{}", name, suffix)
            }
        }
        None => name.to_string(),
    }
}

/// Mediates between application code and the native dialog backend.
pub struct DialogGateway<B, R, E> {
    backend: B,
    reporter: R,
    env: E,
}

impl<B: DialogBackend, R: MessageReporter, E: AppEnvironment> DialogGateway<B, R, E> {
    pub fn new(backend: B, reporter: R, env: E) -> Self {
        Self {
            backend,
            reporter,
            env,
        }
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    fn start_directory(&self, request: &DialogRequest) -> PathBuf {
        safe_start_directory(request.start_directory.as_deref(), &self.env)
    }

    /// Show an open-file dialog. Empty means cancelled or unavailable.
    pub fn open_file(&self, request: &DialogRequest) -> Vec<PathBuf> {
        let directory = self.start_directory(request);
        let filters = encode_filters(&request.filters);
        debug!(
            "Open file dialog '{}' in {} (filters: '{}')",
            request.title,
            directory.display(),
            filters
        );

        match self.backend.open_file_panel(
            &request.title,
            &directory,
            &filters,
            request.multiselect,
        ) {
            Ok(raw) => split_paths(&raw),
            Err(err) => {
                self.report_open_failure(&err);
                Vec::new()
            }
        }
    }

    /// Show an open-folder dialog. Empty means cancelled or unavailable.
    pub fn open_folder(&self, request: &DialogRequest) -> Vec<PathBuf> {
        let directory = self.start_directory(request);
        debug!(
            "Open folder dialog '{}' in {}",
            request.title,
            directory.display()
        );

        match self
            .backend
            .open_folder_panel(&request.title, &directory, request.multiselect)
        {
            Ok(raw) => split_paths(&raw),
            Err(err) => {
                self.report_open_failure(&err);
                Vec::new()
            }
        }
    }

    /// Show a save dialog.
    ///
    /// `None` means the user cancelled. When no dialog can be shown the
    /// result is a path under the export root.
    pub fn save_file(&self, request: &DialogRequest) -> Option<PathBuf> {
        let directory = self.start_directory(request);
        let filters = encode_filters(&request.filters);
        debug!(
            "Save file dialog '{}' in {} (default name: '{}')",
            request.title,
            directory.display(),
            request.default_name
        );

        match self.backend.save_file_panel(
            &request.title,
            &directory,
            &request.default_name,
            &filters,
        ) {
            Ok(raw) if raw.is_empty() => None,
            Ok(raw) => Some(PathBuf::from(raw)),
            Err(err) => Some(self.fallback_save_path(request, &err)),
        }
    }

    /// [`Self::open_file`] delivering its result through `callback`.
    ///
    /// The dialog still runs on the calling thread; `callback` is invoked
    /// exactly once before this returns.
    pub fn open_file_async(&self, request: &DialogRequest, callback: impl FnOnce(Vec<PathBuf>)) {
        callback(self.open_file(request));
    }

    /// [`Self::open_folder`] delivering its result through `callback`.
    pub fn open_folder_async(
        &self,
        request: &DialogRequest,
        callback: impl FnOnce(Vec<PathBuf>),
    ) {
        callback(self.open_folder(request));
    }

    /// [`Self::save_file`] delivering its result through `callback`.
    pub fn save_file_async(
        &self,
        request: &DialogRequest,
        callback: impl FnOnce(Option<PathBuf>),
    ) {
        callback(self.save_file(request));
    }

    fn fallback_save_path(&self, request: &DialogRequest, err: &BackendError) -> PathBuf {
        let name = fallback_file_name(&request.default_name, request.primary_extension());
        let path = export_root(&self.env).join(name);

        let reason = match err {
            BackendError::LibraryMissing { .. } => {
                "Native file dialog plug-in is missing for this build."
            }
            BackendError::EntryPointMissing { .. } => {
                "Native file dialog entry point was not found."
            }
            BackendError::PlatformUnsupported => {
                "Native file dialog is not supported on this platform."
            }
        };
        info!("Save dialog unavailable ({}), using {}", err, path.display());

        self.reporter.show(
            &format!(
                "{} Using a platform-specific export folder instead.\nFallback path: {}",
                reason,
                path.display()
            ),
            MessageType::Warning,
        );
        path
    }

    fn report_open_failure(&self, err: &BackendError) {
        info!("Open dialog unavailable: {}", err);

        let mut message = match err {
            BackendError::PlatformUnsupported => {
                "Native file dialog is not supported on this platform.".to_string()
            }
            BackendError::EntryPointMissing { symbol } => format!(
                "Native file dialog plug-in is incomplete: {} was not found.",
                symbol
            ),
            BackendError::LibraryMissing { .. } => {
                "Native file dialog plug-in could not be loaded.".to_string()
            }
        };

        if self.env.platform() == Platform::MacOs {
            if let Some(bundle) = super::plugin::expected_bundle_path() {
                message.push_str(&format!("\nExpected bundle: {}", bundle.display()));
            }
            message.push_str("\nRebuild the macOS app after importing this project update.");
        }

        self.reporter.show(&message, MessageType::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::backend::PATHS_SEPARATOR;
    use crate::environment::testing::FakeEnvironment;
    use crate::messages::MessageLog;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    /// Backend returning a canned response and recording its arguments.
    struct ScriptedBackend {
        response: Result<String, BackendError>,
        calls: RefCell<Vec<(String, PathBuf, String)>>,
    }

    impl ScriptedBackend {
        fn answering(raw: &str) -> Self {
            Self {
                response: Ok(raw.to_string()),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn failing(err: BackendError) -> Self {
            Self {
                response: Err(err),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, title: &str, dir: &Path, extra: &str) -> Result<String, BackendError> {
            self.calls
                .borrow_mut()
                .push((title.to_string(), dir.to_path_buf(), extra.to_string()));
            self.response.clone()
        }
    }

    impl DialogBackend for ScriptedBackend {
        fn open_file_panel(
            &self,
            title: &str,
            directory: &Path,
            filters: &str,
            _multiselect: bool,
        ) -> Result<String, BackendError> {
            self.record(title, directory, filters)
        }

        fn open_folder_panel(
            &self,
            title: &str,
            directory: &Path,
            _multiselect: bool,
        ) -> Result<String, BackendError> {
            self.record(title, directory, "")
        }

        fn save_file_panel(
            &self,
            title: &str,
            directory: &Path,
            _default_name: &str,
            filters: &str,
        ) -> Result<String, BackendError> {
            self.record(title, directory, filters)
        }
    }

    fn gateway(
        temp: &TempDir,
        backend: ScriptedBackend,
        platform: Platform,
    ) -> (
        DialogGateway<ScriptedBackend, MessageLog, FakeEnvironment>,
        MessageLog,
    ) {
        let log = MessageLog::new();
        let env = FakeEnvironment::new(temp.path(), platform);
        (DialogGateway::new(backend, log.clone(), env), log)
    }

    fn missing_library() -> BackendError {
        BackendError::LibraryMissing {
            searched: vec![PathBuf::from("/nowhere")],
        }
    }

    #[test]
    fn test_open_file_splits_response() {
        let temp = TempDir::new().unwrap();
        let raw = format!("/a/b{}/c/d", PATHS_SEPARATOR);
        let (gateway, log) = gateway(&temp, ScriptedBackend::answering(&raw), Platform::Linux);

        let request = DialogRequest::open_file("Open").with_multiselect(true);
        assert_eq!(
            gateway.open_file(&request),
            vec![PathBuf::from("/a/b"), PathBuf::from("/c/d")]
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_open_file_passes_encoded_filters_and_resolved_directory() {
        let temp = TempDir::new().unwrap();
        let (gateway, _log) = gateway(&temp, ScriptedBackend::answering(""), Platform::Linux);

        let request = DialogRequest::open_file("Open model")
            .with_start_directory(temp.path().join("missing"))
            .with_filter(ExtensionFilter::new("Models", &[".fbx", "obj"]));
        gateway.open_file(&request);

        let calls = gateway.backend.calls.borrow();
        let (title, dir, filters) = &calls[0];
        assert_eq!(title, "Open model");
        assert!(dir.is_dir());
        assert_eq!(filters, "Models|fbx,obj");
    }

    #[test]
    fn test_cancelled_open_is_empty() {
        let temp = TempDir::new().unwrap();
        let (gateway, log) = gateway(&temp, ScriptedBackend::answering(""), Platform::Linux);

        assert!(gateway.open_folder(&DialogRequest::open_folder("Pick")).is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_open_folder_failure_reports_once() {
        let temp = TempDir::new().unwrap();
        for err in [
            missing_library(),
            BackendError::EntryPointMissing {
                symbol: "DialogOpenFolderPanel",
            },
            BackendError::PlatformUnsupported,
        ] {
            let (gateway, log) = gateway(&temp, ScriptedBackend::failing(err), Platform::MacOs);
            let result = gateway.open_folder(&DialogRequest::open_folder("Pick"));

            assert!(result.is_empty());
            let messages = log.drain();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].kind, MessageType::Error);
            assert!(messages[0].text.contains("Rebuild the macOS app"));
        }
    }

    #[test]
    fn test_open_file_failure_mentions_missing_symbol() {
        let temp = TempDir::new().unwrap();
        let err = BackendError::EntryPointMissing {
            symbol: "DialogOpenFilePanel",
        };
        let (gateway, log) = gateway(&temp, ScriptedBackend::failing(err), Platform::Windows);

        assert!(gateway.open_file(&DialogRequest::open_file("Open")).is_empty());
        let messages = log.drain();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("DialogOpenFilePanel"));
        assert!(!messages[0].text.contains("macOS"));
    }

    #[test]
    fn test_save_returns_backend_path() {
        let temp = TempDir::new().unwrap();
        let (gateway, log) = gateway(
            &temp,
            ScriptedBackend::answering("/exports/model.fbx"),
            Platform::Linux,
        );

        let request = DialogRequest::save_file("Export", "model", "fbx");
        assert_eq!(
            gateway.save_file(&request),
            Some(PathBuf::from("/exports/model.fbx"))
        );
        assert!(log.is_empty());
        assert_eq!(gateway.backend.calls.borrow()[0].2, "Files|fbx");
    }

    #[test]
    fn test_save_cancelled_is_none() {
        let temp = TempDir::new().unwrap();
        let (gateway, _log) = gateway(&temp, ScriptedBackend::answering(""), Platform::Linux);
        assert_eq!(
            gateway.save_file(&DialogRequest::save_file("Export", "model", "fbx")),
            None
        );
    }

    #[test]
    fn test_save_missing_library_falls_back_to_export_root() {
        let temp = TempDir::new().unwrap();
        let (gateway, log) = gateway(
            &temp,
            ScriptedBackend::failing(missing_library()),
            Platform::MacOs,
        );

        let path = gateway
            .save_file(&DialogRequest::save_file("Export", "model", "fbx"))
            .unwrap();
        let root = crate::dialogs::paths::export_root_path(gateway.environment());
        assert_eq!(path, root.join("model.fbx"));

        let messages = log.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].kind, MessageType::Warning);
        assert!(messages[0].text.contains("plug-in is missing"));
        assert!(messages[0].text.contains("model.fbx"));
    }

    #[test]
    fn test_save_missing_entry_point_has_distinct_message() {
        let temp = TempDir::new().unwrap();
        let err = BackendError::EntryPointMissing {
            symbol: "DialogSaveFilePanel",
        };
        let (gateway, log) = gateway(&temp, ScriptedBackend::failing(err), Platform::MacOs);

        let path = gateway
            .save_file(&DialogRequest::save_file("Export", "model.FBX", ".fbx"))
            .unwrap();
        assert!(path.ends_with("model.FBX"));

        let messages = log.drain();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].text.contains("entry point was not found"));
    }

    #[test]
    fn test_save_unsupported_platform_falls_back() {
        let temp = TempDir::new().unwrap();
        let (gateway, log) = gateway(
            &temp,
            ScriptedBackend::failing(BackendError::PlatformUnsupported),
            Platform::Android,
        );

        let path = gateway
            .save_file(&DialogRequest::save_file("Export", "pose", "json"))
            .unwrap();
        assert!(path.starts_with(gateway.environment().persistent_data_path()));
        assert!(path.ends_with("pose.json"));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_async_variants_invoke_callback_once_inline() {
        let temp = TempDir::new().unwrap();
        let raw = format!("/one{}/two", PATHS_SEPARATOR);
        let (gateway, _log) = gateway(&temp, ScriptedBackend::answering(&raw), Platform::Linux);

        let mut calls = 0;
        let mut received = Vec::new();
        gateway.open_file_async(&DialogRequest::open_file("Open"), |paths| {
            calls += 1;
            received = paths;
        });
        assert_eq!(calls, 1);
        assert_eq!(received.len(), 2);

        let mut folders = Vec::new();
        gateway.open_folder_async(&DialogRequest::open_folder("Pick"), |paths| folders = paths);
        assert_eq!(folders.len(), 2);

        let mut saved = None;
        gateway.save_file_async(&DialogRequest::save_file("Save", "x", "fbx"), |path| {
            saved = path
        });
        assert!(saved.is_some());
    }

    #[test]
    fn test_fallback_file_name() {
        assert_eq!(fallback_file_name("model", Some("fbx")), "model.fbx");
        assert_eq!(fallback_file_name("model.FBX", Some("fbx")), "model.FBX");
        assert_eq!(fallback_file_name("model", Some(".fbx")), "model.fbx");
        assert_eq!(fallback_file_name("model", None), "model");
        assert_eq!(fallback_file_name("model", Some("")), "model");
        assert_eq!(fallback_file_name("fbx", Some("fbx")), "fbx.fbx");
    }

    #[test]
    fn test_fallback_file_name_ignores_non_ascii_case() {
        assert_eq!(fallback_file_name("pose.ÄNIM", Some("änim")), "pose.ÄNIM");
        assert_eq!(fallback_file_name("モデル.Ébx", Some(".ébx")), "モデル.Ébx");
        assert_eq!(fallback_file_name("pose", Some("Änim")), "pose.Änim");
    }

    #[test]
    fn test_primary_extension() {
        let request = DialogRequest::save_file("Save", "a", ".png");
        assert_eq!(request.primary_extension(), Some("png"));
        assert_eq!(DialogRequest::open_file("Open").primary_extension(), None);
    }
}
