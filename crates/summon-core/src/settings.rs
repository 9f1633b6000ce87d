use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default storage quota: the common 5 MiB browser storage allowance.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Name of the per-user application directory under `$HOME`.
pub const APP_DIR_NAME: &str = ".summon-tracker";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Pull history and pity statistics for gacha banners
#[derive(Parser, Debug, Clone)]
#[command(
    name = "summon-tracker",
    about = "Pull history and pity statistics for gacha banners",
    version
)]
pub struct Settings {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding profiles and cached pull databases
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Character catalog JSON file
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Storage quota in bytes for all cached databases
    #[arg(long, global = true)]
    pub quota_bytes: Option<u64>,

    /// Logging level
    #[arg(long, global = true, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Forget saved data-dir / catalog / quota choices
    #[arg(long, global = true)]
    pub clear_saved: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show totals, six-star rate, average pity and the monthly histogram
    Stats,
    /// List pulls newest first
    History {
        /// Only show pulls of this rarity
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=6))]
        rarity: Option<u8>,
    },
    /// Merge a game history export into the active profile
    Import { file: PathBuf },
    /// Replace the active profile's database with a saved database file
    LoadDb { file: PathBuf },
    /// Write the active profile's database to `{Profile}_{YYYY-MM-DD}.json`
    Export {
        /// Output directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete the active profile's cached database
    Clear,
    /// Manage profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProfileAction {
    /// List profiles, marking the active one
    List,
    /// Create a profile and make it active
    Add { name: String },
    /// Make another profile active
    Switch { id: u64 },
    /// Remove the active profile and its data
    Remove,
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.summon-tracker/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<u64>,
}

impl LastUsedParams {
    pub fn config_path() -> PathBuf {
        app_home().join("last_used.json")
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(APP_DIR_NAME).join("last_used.json")
    }

    /// Load persisted params; `Default` when the file is absent or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    pub fn clear_at(path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and fill unset paths from the last run.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Same as [`Settings::load_with_last_used`] with explicit args and
    /// config path so tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let mut settings = Settings::parse_from(args);

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        if settings.clear_saved {
            let _ = LastUsedParams::clear_at(config_path);
            return settings;
        }

        // CLI always wins over the persisted value.
        let last = LastUsedParams::load_from(config_path);
        if settings.data_dir.is_none() {
            settings.data_dir = last.data_dir;
        }
        if settings.catalog.is_none() {
            settings.catalog = last.catalog;
        }
        if settings.quota_bytes.is_none() {
            settings.quota_bytes = last.quota_bytes;
        }

        let params = LastUsedParams::from(&settings);
        if params != LastUsedParams::default() {
            let _ = params.save_to(config_path);
        }

        settings
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| app_home().join("data"))
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| app_home().join("catalog.json"))
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota_bytes.unwrap_or(DEFAULT_QUOTA_BYTES)
    }

    /// The subcommand to run; `stats` when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Stats)
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            data_dir: s.data_dir.clone(),
            catalog: s.catalog.clone(),
            quota_bytes: s.quota_bytes,
        }
    }
}

/// `~/.summon-tracker`, or `./.summon-tracker` when no home directory exists.
pub fn app_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            data_dir: Some(PathBuf::from("/srv/pulls")),
            catalog: Some(PathBuf::from("/srv/catalog.json")),
            quota_bytes: Some(1024),
        };
        params.save_to(&path).expect("save");

        assert_eq!(LastUsedParams::load_from(&path), params);
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert_eq!(loaded, LastUsedParams::default());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams {
            quota_bytes: Some(10),
            ..Default::default()
        }
        .save_to(&path)
        .expect("save");
        assert!(path.exists());

        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["summon-tracker"]);
        assert!(settings.command.is_none());
        assert_eq!(settings.command(), Command::Stats);
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.quota_bytes(), DEFAULT_QUOTA_BYTES);
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_subcommands() {
        let s = Settings::parse_from(["summon-tracker", "import", "history.json"]);
        assert_eq!(
            s.command(),
            Command::Import {
                file: PathBuf::from("history.json")
            }
        );

        let s = Settings::parse_from(["summon-tracker", "history", "--rarity", "6"]);
        assert_eq!(s.command(), Command::History { rarity: Some(6) });

        let s = Settings::parse_from(["summon-tracker", "profile", "switch", "42"]);
        assert_eq!(
            s.command(),
            Command::Profile {
                action: ProfileAction::Switch { id: 42 }
            }
        );
    }

    #[test]
    fn test_settings_rejects_out_of_range_rarity() {
        let result = Settings::try_parse_from(["summon-tracker", "history", "--rarity", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let s = Settings::parse_from(["summon-tracker", "stats", "--data-dir", "/tmp/pulls"]);
        assert_eq!(s.data_dir(), PathBuf::from("/tmp/pulls"));
    }

    #[test]
    fn test_load_with_last_used_merges_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            catalog: Some(PathBuf::from("/saved/catalog.json")),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings =
            Settings::load_with_last_used_impl(vec!["summon-tracker".into()], &config_path);
        assert_eq!(settings.catalog_path(), PathBuf::from("/saved/catalog.json"));
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            catalog: Some(PathBuf::from("/saved/catalog.json")),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec![
                "summon-tracker".into(),
                "--catalog".into(),
                "/cli/catalog.json".into(),
            ],
            &config_path,
        );
        assert_eq!(settings.catalog_path(), PathBuf::from("/cli/catalog.json"));

        let saved = LastUsedParams::load_from(&config_path);
        assert_eq!(saved.catalog, Some(PathBuf::from("/cli/catalog.json")));
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            quota_bytes: Some(99),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            vec!["summon-tracker".into(), "--clear-saved".into()],
            &config_path,
        );
        assert!(!config_path.exists());
        assert_eq!(settings.quota_bytes(), DEFAULT_QUOTA_BYTES);
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            vec!["summon-tracker".into(), "--debug".into()],
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_nothing_to_persist() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        Settings::load_with_last_used_impl(vec!["summon-tracker".into()], &config_path);
        assert!(!config_path.exists());
    }
}
