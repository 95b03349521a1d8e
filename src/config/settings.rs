//! Viewer configuration
//!
//! This module defines the `Config` struct holding the game-data location
//! and the dropdown-backed options of the settings window, with serde
//! support for JSON persistence.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Region
// ─────────────────────────────────────────────────────────────────────────────

/// Game region whose data layout is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Jp,
    Global,
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Region::Jp => "Japan",
            Region::Global => "Global",
        }
    }

    pub fn all() -> &'static [Region] {
        &[Region::Jp, Region::Global]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Work Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Where the viewer gets its data from.
///
/// - `Default`: reads the installed game's files in place
/// - `Standalone`: keeps its own copy of the database and assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    #[default]
    Default,
    Standalone,
}

impl WorkMode {
    pub fn label(&self) -> &'static str {
        match self {
            WorkMode::Default => "Default",
            WorkMode::Standalone => "Standalone",
        }
    }

    pub fn all() -> &'static [WorkMode] {
        &[WorkMode::Default, WorkMode::Standalone]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Language
// ─────────────────────────────────────────────────────────────────────────────

/// UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Jp,
    Cn,
}

impl Language {
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Jp => "日本語",
            Language::Cn => "中文",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Language::En, Language::Jp, Language::Cn]
    }
}

/// Conversions between options and dropdown indices.
pub trait DropdownOption: Copy + PartialEq + 'static {
    fn options() -> &'static [Self];

    fn from_index(index: usize) -> Option<Self> {
        Self::options().get(index).copied()
    }

    fn index(&self) -> usize {
        Self::options()
            .iter()
            .position(|option| option == self)
            .unwrap_or(0)
    }
}

impl DropdownOption for Region {
    fn options() -> &'static [Self] {
        Region::all()
    }
}

impl DropdownOption for WorkMode {
    fn options() -> &'static [Self] {
        WorkMode::all()
    }
}

impl DropdownOption for Language {
    fn options() -> &'static [Self] {
        Language::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted viewer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Game data directory (the one holding `meta`, `master/` and `dat/`)
    pub main_path: String,
    pub region: Region,
    pub work_mode: WorkMode,
    pub language: Language,
}

impl Config {
    /// Parse configuration JSON. Unknown fields are ignored and missing ones
    /// take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
