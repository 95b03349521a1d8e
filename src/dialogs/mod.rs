//! File dialog gateway
//!
//! This module mediates between application code and the native
//! file picker: filter encoding, start directory resolution, backend
//! selection and the fallback policy when no dialog can be shown.

mod backend;
mod filter;
mod gateway;
mod paths;
mod plugin;
#[cfg(any(target_os = "windows", target_os = "linux"))]
mod system;

pub use backend::{
    backend_for, join_paths, split_paths, BackendError, DialogBackend, UnsupportedBackend,
    PATHS_SEPARATOR,
};
pub use filter::{decode_filters, encode_filters, ExtensionFilter};
pub use gateway::{fallback_file_name, DialogGateway, DialogRequest};
pub use paths::{export_root, export_root_path, safe_start_directory};
pub use plugin::{expected_bundle_path, PluginBackend, PLUGIN_BUNDLE_NAME, PLUGIN_NAME};

use crate::environment::{AppEnvironment, SystemEnvironment};
use crate::messages::MessageReporter;

/// Gateway backed by the platform's native dialogs.
pub type NativeGateway<R> = DialogGateway<Box<dyn DialogBackend>, R, SystemEnvironment>;

/// Build a gateway for the running platform.
pub fn native_gateway<R: MessageReporter>(reporter: R) -> NativeGateway<R> {
    let env = SystemEnvironment;
    DialogGateway::new(backend_for(env.platform()), reporter, env)
}
