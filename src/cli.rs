//! Command line interface.

use crate::bundle::{BuildTarget, SOURCE_BUNDLE_RELATIVE_PATH};
use crate::dialogs::ExtensionFilter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// UmaViewer native shell: settings window, file dialogs and build helpers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the settings window (default)
    Settings,

    /// Show an open-file dialog and print the selected paths
    OpenFile {
        #[arg(short = 't', long, default_value = "Open File")]
        title: String,

        /// Preferred start directory
        #[arg(short = 'd', long = "dir", value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Extension filter, e.g. "Models:fbx,obj" (repeatable)
        #[arg(short = 'f', long = "filter", value_name = "NAME:EXT,...", value_parser = parse_filter)]
        filters: Vec<ExtensionFilter>,

        #[arg(short = 'm', long)]
        multiselect: bool,
    },

    /// Show an open-folder dialog and print the selected paths
    OpenFolder {
        #[arg(short = 't', long, default_value = "Open Folder")]
        title: String,

        #[arg(short = 'd', long = "dir", value_name = "DIR")]
        directory: Option<PathBuf>,

        #[arg(short = 'm', long)]
        multiselect: bool,
    },

    /// Show a save dialog and print the chosen path
    SaveFile {
        #[arg(short = 't', long, default_value = "Save File")]
        title: String,

        #[arg(short = 'd', long = "dir", value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Suggested file name
        #[arg(short = 'n', long, default_value = "untitled")]
        name: String,

        /// Extension of the saved file, without the dot
        #[arg(short = 'e', long, default_value = "")]
        extension: String,
    },

    /// Copy the dialog plug-in bundle into a built app
    BundlePlugin {
        /// Path of the built app (e.g. build/UmaViewer.app)
        #[arg(value_name = "APP")]
        app: PathBuf,

        #[arg(long, value_enum, default_value = "macos")]
        target: BuildTarget,

        /// Plug-in bundle to copy
        #[arg(long, value_name = "BUNDLE", default_value = SOURCE_BUNDLE_RELATIVE_PATH)]
        source: PathBuf,
    },

    /// Run one shader fallback pass over a JSON material dump
    PatchShaders {
        /// Dump with "shaders" and "materials" arrays
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Where to write the patched dump (stdout if omitted)
        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Parse `NAME:EXT,EXT`. Without a colon the whole argument is the
/// extension list.
pub fn parse_filter(arg: &str) -> Result<ExtensionFilter, String> {
    let (name, extensions) = arg.split_once(':').unwrap_or(("", arg));
    let extensions: Vec<&str> = extensions
        .split(',')
        .map(str::trim)
        .filter(|ext| !ext.is_empty())
        .collect();

    if extensions.is_empty() {
        return Err(format!("filter '{}' has no extensions", arg));
    }
    Ok(ExtensionFilter::new(name.trim(), &extensions))
}

impl Args {
    /// Default log filter for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
