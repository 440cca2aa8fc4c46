use crate::models::AppSettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Persisted key/value settings.
///
/// This is the seam through which the word bank and the session read and
/// write `settings.json`; tests substitute an in-memory or mocked store.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    /// Read the settings. A missing store yields defaults; an unreadable or
    /// corrupt one yields an error.
    fn load(&self) -> Result<AppSettings>;

    /// Replace the stored settings.
    fn save(&self, settings: &AppSettings) -> Result<()>;
}

/// Read-modify-write helper: only the keys touched by `apply` change.
///
/// A corrupt store is treated as empty so the write still goes through.
pub fn update_settings<F>(store: &dyn SettingsStore, apply: F) -> Result<()>
where
    F: FnOnce(&mut AppSettings),
{
    let mut settings = store.load().unwrap_or_else(|e| {
        tracing::warn!("Discarding unreadable settings before update: {:#}", e);
        AppSettings::default()
    });
    apply(&mut settings);
    store.save(&settings)
}

/// Load settings, falling back to defaults on any error.
pub fn load_or_default(store: &dyn SettingsStore) -> AppSettings {
    store.load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load settings, using defaults: {:#}", e);
        AppSettings::default()
    })
}

/// `settings.json` on disk.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: Utf8PathBuf,
}

impl JsonSettingsStore {
    pub fn new<P: AsRef<Utf8Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            tracing::info!("Settings file not found at {}, using defaults", self.path);
            return Ok(AppSettings::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings: {}", self.path))?;

        let settings: AppSettings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings: {}", self.path))?;

        tracing::debug!("Loaded settings from {}", self.path);
        Ok(settings)
    }

    fn save(&self, settings: &AppSettings) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
            _ => Utf8PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create settings directory: {}", parent))?;

        let json =
            serde_json::to_string_pretty(settings).context("Failed to serialize settings to JSON")?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("Failed to create temporary file in {}", parent))?;
        temp.write_all(json.as_bytes())
            .with_context(|| format!("Failed to write settings: {}", self.path))?;
        temp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace settings: {}", self.path))?;

        tracing::debug!("Saved settings to {}", self.path);
        Ok(())
    }
}

/// Resolves the on-disk layout of a Pictor data directory.
///
/// ```text
/// <data_dir>/
///   settings.json
///   wordlists/*.txt
///   logs/
/// ```
#[derive(Debug, Clone)]
pub struct ConfigManager {
    data_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
    wordlists_dir: Utf8PathBuf,
    logs_dir: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager rooted at `data_dir`, creating the directory if needed.
    ///
    /// The word-list directory itself is created by the word bank, which also
    /// seeds the editable list.
    pub fn new<P: AsRef<Utf8Path>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create data directory: {}", data_dir))?;
        }

        Ok(Self {
            settings_path: data_dir.join("settings.json"),
            wordlists_dir: data_dir.join("wordlists"),
            logs_dir: data_dir.join("logs"),
            data_dir,
        })
    }

    pub fn settings_store(&self) -> JsonSettingsStore {
        JsonSettingsStore::new(&self.settings_path)
    }

    pub fn data_dir(&self) -> &Utf8Path {
        &self.data_dir
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    pub fn wordlists_dir(&self) -> &Utf8Path {
        &self.wordlists_dir
    }

    pub fn logs_dir(&self) -> &Utf8Path {
        &self.logs_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = Utf8PathBuf::try_from(temp_dir.path().join("data")).unwrap();
        let manager = ConfigManager::new(&config_path).unwrap();
        (manager, temp_dir)
    }

    #[test]
    fn test_create_config_manager() {
        let (manager, _temp_dir) = create_test_config_manager();
        assert!(manager.data_dir().exists());
        assert_eq!(manager.settings_path().file_name(), Some("settings.json"));
        assert!(manager.wordlists_dir().ends_with("wordlists"));
    }

    #[test]
    fn test_missing_settings_load_defaults() {
        let (manager, _temp_dir) = create_test_config_manager();
        let settings = manager.settings_store().load().unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_save_and_load_settings() {
        let (manager, _temp_dir) = create_test_config_manager();
        let store = manager.settings_store();

        let mut settings = AppSettings::default();
        settings.selected_wordlists = Some(vec!["animals.txt".to_string()]);
        settings.theme = "dark".to_string();
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_corrupt_settings_is_an_error() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "{ not json").unwrap();

        let store = manager.settings_store();
        assert!(store.load().is_err());
        assert_eq!(load_or_default(&store), AppSettings::default());
    }

    #[test]
    fn test_update_settings_preserves_other_keys() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(
            manager.settings_path(),
            r#"{"theme": "dark", "window_geometry": "700x500+10+10"}"#,
        )
        .unwrap();

        let store = manager.settings_store();
        update_settings(&store, |s| s.editable_wordlist = "mine.txt".to_string()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.theme, "dark");
        assert_eq!(loaded.window_geometry.as_deref(), Some("700x500+10+10"));
        assert_eq!(loaded.editable_wordlist, "mine.txt");
    }

    #[test]
    fn test_update_settings_overwrites_corrupt_file() {
        let (manager, _temp_dir) = create_test_config_manager();
        fs::write(manager.settings_path(), "garbage").unwrap();

        let store = manager.settings_store();
        update_settings(&store, |s| s.debug_mode = true).unwrap();

        assert!(store.load().unwrap().debug_mode);
    }
}
