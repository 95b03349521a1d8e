//! Game-data directory detection.
//!
//! A data directory holds a `dat/` folder plus a metadata file and a
//! master database, either the game's own (`meta`, `master/master.mdb`) or
//! the standalone copies (`meta_umaviewer`, `master/master_umaviewer.mdb`).

use crate::environment::AppEnvironment;
use std::path::{Path, PathBuf};

/// Layouts under a selected folder that may hold the data, checked in order.
const CANDIDATE_SUBDIRS: &[&[&str]] = &[
    &["Persistent"],
    &["Umamusume_Data", "Persistent"],
    &["umamusume"],
];

/// Absolute form of `path` without trailing separators.
///
/// Blank input normalizes to an empty string.
pub fn normalize_path(path: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }

    let full = std::path::absolute(path)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string());
    let trimmed = full.trim_end_matches(['/', '\\']);

    if trimmed.is_empty() {
        // The filesystem root keeps its separator.
        full
    } else {
        trimmed.to_string()
    }
}

/// Whether `path` contains a usable game-data layout.
pub fn is_valid_data_path(path: &Path) -> bool {
    let master = path.join("master");
    let has_game_files = path.join("meta").is_file() && master.join("master.mdb").is_file();
    let has_standalone_files = path.join("meta_umaviewer").is_file()
        && master.join("master_umaviewer.mdb").is_file();

    path.join("dat").is_dir() && (has_game_files || has_standalone_files)
}

/// Find the data directory for a folder the user picked.
///
/// Accepts the folder itself or one of the usual install layouts below it.
pub fn resolve_data_path(selected: &Path) -> Option<String> {
    let normalized = normalize_path(&selected.to_string_lossy());
    if normalized.is_empty() {
        return None;
    }
    if is_valid_data_path(Path::new(&normalized)) {
        return Some(normalized);
    }

    CANDIDATE_SUBDIRS
        .iter()
        .map(|parts| {
            let candidate: PathBuf = parts
                .iter()
                .fold(PathBuf::from(&normalized), |acc, part| acc.join(part));
            normalize_path(&candidate.to_string_lossy())
        })
        .find(|candidate| is_valid_data_path(Path::new(candidate)))
}

/// Where to open the data folder picker.
///
/// The configured path may be stale (e.g. a Windows path carried over to a
/// Mac), so fall back to the persistent data directory's parent.
pub fn browse_start_path(current_main_path: &str, env: &impl AppEnvironment) -> PathBuf {
    let current = normalize_path(current_main_path);
    if !current.is_empty() && Path::new(&current).is_dir() {
        return PathBuf::from(current);
    }

    let persistent = env.persistent_data_path();
    match persistent.parent().filter(|p| p.is_dir()) {
        Some(parent) => parent.to_path_buf(),
        None => persistent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::testing::FakeEnvironment;
    use crate::environment::Platform;
    use std::fs;
    use tempfile::TempDir;

    fn make_game_layout(dir: &Path) {
        fs::create_dir_all(dir.join("dat")).unwrap();
        fs::create_dir_all(dir.join("master")).unwrap();
        fs::write(dir.join("meta"), b"").unwrap();
        fs::write(dir.join("master").join("master.mdb"), b"").unwrap();
    }

    fn make_standalone_layout(dir: &Path) {
        fs::create_dir_all(dir.join("dat")).unwrap();
        fs::create_dir_all(dir.join("master")).unwrap();
        fs::write(dir.join("meta_umaviewer"), b"").unwrap();
        fs::write(dir.join("master").join("master_umaviewer.mdb"), b"").unwrap();
    }

    #[test]
    fn test_normalize_blank() {
        assert_eq!(normalize_path(""), "");
        assert_eq!(normalize_path("   "), "");
    }

    #[test]
    fn test_normalize_trims_trailing_separator() {
        let temp = TempDir::new().unwrap();
        let with_slash = format!("{}/", temp.path().display());
        assert_eq!(normalize_path(&with_slash), temp.path().to_string_lossy());
    }

    #[test]
    fn test_normalize_makes_absolute() {
        assert!(Path::new(&normalize_path("relative/dir")).is_absolute());
    }

    #[test]
    fn test_valid_layouts() {
        let temp = TempDir::new().unwrap();
        let game = temp.path().join("game");
        let standalone = temp.path().join("standalone");
        make_game_layout(&game);
        make_standalone_layout(&standalone);

        assert!(is_valid_data_path(&game));
        assert!(is_valid_data_path(&standalone));
    }

    #[test]
    fn test_missing_dat_is_invalid() {
        let temp = TempDir::new().unwrap();
        make_game_layout(temp.path());
        fs::remove_dir(temp.path().join("dat")).unwrap();
        assert!(!is_valid_data_path(temp.path()));
    }

    #[test]
    fn test_mixed_meta_and_master_is_invalid() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path();
        fs::create_dir_all(dir.join("dat")).unwrap();
        fs::create_dir_all(dir.join("master")).unwrap();
        fs::write(dir.join("meta"), b"").unwrap();
        fs::write(dir.join("master").join("master_umaviewer.mdb"), b"").unwrap();
        assert!(!is_valid_data_path(dir));
    }

    #[test]
    fn test_resolve_selected_folder_itself() {
        let temp = TempDir::new().unwrap();
        make_game_layout(temp.path());
        assert_eq!(
            resolve_data_path(temp.path()),
            Some(temp.path().to_string_lossy().into_owned())
        );
    }

    #[test]
    fn test_resolve_nested_layouts() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("Umamusume_Data").join("Persistent");
        make_standalone_layout(&nested);

        assert_eq!(
            resolve_data_path(temp.path()),
            Some(nested.to_string_lossy().into_owned())
        );
    }

    #[test]
    fn test_resolve_prefers_persistent_over_umamusume() {
        let temp = TempDir::new().unwrap();
        make_game_layout(&temp.path().join("Persistent"));
        make_game_layout(&temp.path().join("umamusume"));

        let resolved = resolve_data_path(temp.path()).unwrap();
        assert!(resolved.ends_with("Persistent"));
    }

    #[test]
    fn test_resolve_invalid_folder() {
        let temp = TempDir::new().unwrap();
        assert_eq!(resolve_data_path(temp.path()), None);
    }

    #[test]
    fn test_browse_start_uses_current_path() {
        let temp = TempDir::new().unwrap();
        let env = FakeEnvironment::new(temp.path(), Platform::MacOs);
        let current = temp.path().to_string_lossy().into_owned();
        assert_eq!(browse_start_path(&current, &env), temp.path());
    }

    #[test]
    fn test_browse_start_falls_back_for_stale_path() {
        let temp = TempDir::new().unwrap();
        let env = FakeEnvironment::new(temp.path(), Platform::MacOs);
        let persistent = env.persistent_data_path();
        fs::create_dir_all(&persistent).unwrap();

        let start = browse_start_path(r"C:\Users\someone\Umamusume", &env);
        assert_eq!(start, persistent.parent().unwrap());
    }

    #[test]
    fn test_browse_start_without_parent_uses_persistent() {
        let temp = TempDir::new().unwrap();
        let env = FakeEnvironment::new(temp.path(), Platform::Linux);
        assert_eq!(browse_start_path("", &env), env.persistent_data_path());
    }
}
