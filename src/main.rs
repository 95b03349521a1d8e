//! UmaViewer Shell - Main Entry Point
//!
//! Native integration pieces for the UmaViewer model viewer: the file dialog
//! gateway, the game-data settings window, the plug-in bundle build hook and
//! the shader fallback passes.

mod app;
mod bundle;
mod cli;
mod config;
mod controller;
mod data_path;
mod dialogs;
mod environment;
mod error;
mod messages;
mod shader_fallback;
mod ui;

use app::SettingsApp;
use bundle::{post_process_build, BundleOutcome};
use clap::Parser;
use cli::{Args, Command};
use dialogs::{native_gateway, DialogRequest};
use error::Error;
use log::{error, info, warn};
use messages::LogReporter;
use shader_fallback::MaterialDump;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "UmaViewer Shell";

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .init();

    info!("Starting {}", APP_NAME);

    match args.command.unwrap_or(Command::Settings) {
        Command::Settings => match run_settings_window() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Settings window failed: {}", e);
                ExitCode::FAILURE
            }
        },

        Command::OpenFile {
            title,
            directory,
            filters,
            multiselect,
        } => {
            let mut request = DialogRequest::open_file(title).with_multiselect(multiselect);
            request.start_directory = directory;
            request.filters = filters;
            native_gateway(LogReporter)
                .open_file(&request)
                .iter()
                .for_each(|path| println!("{}", path.display()));
            ExitCode::SUCCESS
        }

        Command::OpenFolder {
            title,
            directory,
            multiselect,
        } => {
            let mut request = DialogRequest::open_folder(title).with_multiselect(multiselect);
            request.start_directory = directory;
            native_gateway(LogReporter)
                .open_folder(&request)
                .iter()
                .for_each(|path| println!("{}", path.display()));
            ExitCode::SUCCESS
        }

        Command::SaveFile {
            title,
            directory,
            name,
            extension,
        } => {
            let mut request = DialogRequest::save_file(title, name, &extension);
            request.start_directory = directory;
            if let Some(path) = native_gateway(LogReporter).save_file(&request) {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }

        Command::BundlePlugin {
            app,
            target,
            source,
        } => match post_process_build(target, &app, &source) {
            Ok(BundleOutcome::Installed(path)) => {
                println!("{}", path.display());
                ExitCode::SUCCESS
            }
            Ok(BundleOutcome::Skipped) => {
                info!("Target {:?} does not use the plug-in bundle", target);
                ExitCode::SUCCESS
            }
            Ok(BundleOutcome::SourceMissing(_)) => ExitCode::FAILURE,
            Err(e) => {
                error!("Failed to install plug-in bundle: {}", e);
                ExitCode::FAILURE
            }
        },

        Command::PatchShaders { input, output } => match patch_shaders(&input, output.as_deref())
        {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Failed to patch {}: {}", input.display(), e);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_settings_window() -> eframe::Result<()> {
    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([560.0, 320.0])
        .with_min_inner_size([420.0, 240.0]);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(SettingsApp::new(cc)))),
    )
}

fn patch_shaders(input: &Path, output: Option<&Path>) -> error::Result<()> {
    let contents = fs::read_to_string(input).map_err(|e| Error::MaterialDumpIo {
        path: input.to_path_buf(),
        source: e,
    })?;
    let mut dump: MaterialDump =
        serde_json::from_str(&contents).map_err(|e| Error::MaterialDump {
            path: input.to_path_buf(),
            source: e,
        })?;

    let patched = dump.patch();
    if patched == 0 {
        warn!("No unsupported shaders found in {}", input.display());
    }

    let destination = output.unwrap_or(input);
    let json = serde_json::to_string_pretty(&dump).map_err(|e| Error::MaterialDump {
        path: destination.to_path_buf(),
        source: e,
    })?;
    match output {
        Some(path) => fs::write(path, json).map_err(|e| Error::MaterialDumpIo {
            path: path.to_path_buf(),
            source: e,
        })?,
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_patch_shaders_rejects_invalid_dump() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dump.json");
        fs::write(&input, "{ not json").unwrap();

        let err = patch_shaders(&input, None).unwrap_err();
        assert!(matches!(err, Error::MaterialDump { ref path, .. } if path == &input));
    }

    #[test]
    fn test_patch_shaders_missing_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("absent.json");

        let err = patch_shaders(&input, None).unwrap_err();
        assert!(matches!(err, Error::MaterialDumpIo { .. }));
    }

    #[test]
    fn test_patch_shaders_writes_output() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("dump.json");
        let output = temp.path().join("patched.json");
        fs::write(&input, r#"{"shaders": [], "materials": []}"#).unwrap();

        patch_shaders(&input, Some(&output)).unwrap();
        let written: MaterialDump =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert!(written.materials.is_empty());
    }
}
