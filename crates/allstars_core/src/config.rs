//! Store location configuration.
//!
//! # Responsibility
//! - Resolve the application support directory and store file path.
//!
//! # Invariants
//! - The store file is always named `allstars.sqlite` unless overridden.
//! - Environment resolution never fails; it falls back to the temp dir.

use std::path::PathBuf;

pub const STORE_FILE_NAME: &str = "allstars.sqlite";
pub const SUPPORT_DIR_ENV: &str = "ALLSTARS_SUPPORT_DIR";
const APP_DIR_NAME: &str = "allstars";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub support_dir: PathBuf,
    pub file_name: String,
}

impl StoreConfig {
    pub fn new(support_dir: impl Into<PathBuf>) -> Self {
        Self {
            support_dir: support_dir.into(),
            file_name: STORE_FILE_NAME.to_string(),
        }
    }

    /// Resolves the support directory from the environment.
    ///
    /// Order: `ALLSTARS_SUPPORT_DIR`, the platform data directory joined
    /// with `allstars`, then the temp directory.
    pub fn from_env() -> Self {
        Self::new(resolve_support_dir(
            |key| std::env::var(key).ok(),
            dirs::data_dir(),
        ))
    }

    pub fn db_path(&self) -> PathBuf {
        self.support_dir.join(&self.file_name)
    }
}

fn resolve_support_dir(
    lookup: impl Fn(&str) -> Option<String>,
    platform_data_dir: Option<PathBuf>,
) -> PathBuf {
    let override_dir = lookup(SUPPORT_DIR_ENV)
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty());
    if let Some(dir) = override_dir {
        return PathBuf::from(dir);
    }

    platform_data_dir
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::{resolve_support_dir, StoreConfig, SUPPORT_DIR_ENV};
    use std::path::PathBuf;

    #[test]
    fn db_path_uses_store_file_name() {
        let config = StoreConfig::new("/data/app");
        assert_eq!(config.db_path(), PathBuf::from("/data/app/allstars.sqlite"));
    }

    #[test]
    fn explicit_support_dir_wins() {
        let dir = resolve_support_dir(
            |key| match key {
                SUPPORT_DIR_ENV => Some(" /srv/allstars ".to_string()),
                _ => None,
            },
            Some(PathBuf::from("/home/someone/.local/share")),
        );
        assert_eq!(dir, PathBuf::from("/srv/allstars"));
    }

    #[test]
    fn blank_override_falls_through_to_platform_dir() {
        let dir = resolve_support_dir(
            |key| match key {
                SUPPORT_DIR_ENV => Some("   ".to_string()),
                _ => None,
            },
            Some(PathBuf::from("/Users/someone/Library/Application Support")),
        );
        assert_eq!(
            dir,
            PathBuf::from("/Users/someone/Library/Application Support/allstars")
        );
    }

    #[test]
    fn temp_dir_is_last_resort() {
        let dir = resolve_support_dir(|_| None, None);
        assert_eq!(dir, std::env::temp_dir().join("allstars"));
    }

    #[test]
    fn from_env_matches_platform_data_dir() {
        if std::env::var_os(SUPPORT_DIR_ENV).is_some() {
            return;
        }
        let expected = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("allstars");
        assert_eq!(StoreConfig::from_env().support_dir, expected);
    }
}
