use anyhow::Context;
use fitsmart_core::config::AnalyzerSettings;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AnalyzerSettings> {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("read settings: {}", self.path.display()))?;
        let settings: AnalyzerSettings =
            serde_json::from_slice(&bytes).context("decode settings JSON")?;
        Ok(settings)
    }

    /// Missing file means "all defaults"; a present but broken file is an error.
    pub fn load_or_default(&self) -> anyhow::Result<AnalyzerSettings> {
        if !self.path.exists() {
            log::debug!("no settings file at {}", self.path.display());
            return Ok(AnalyzerSettings::default());
        }
        self.load()
    }

    /// Writes the settings next to the target and renames over it, so a
    /// crash never leaves a half-written file behind.
    pub fn save(&self, settings: &AnalyzerSettings) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create settings directory: {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("create temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut tmp, settings).context("encode settings JSON")?;
        tmp.as_file().sync_all().context("flush settings")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("replace settings: {}", self.path.display()))?;

        log::info!("saved settings to {}", self.path.display());
        Ok(())
    }

    /// Loads, applies `edit`, and saves only if something changed.
    pub fn update<F>(&self, edit: F) -> anyhow::Result<AnalyzerSettings>
    where
        F: FnOnce(&mut AnalyzerSettings) -> anyhow::Result<()>,
    {
        let before = self.load_or_default()?;
        let mut after = before.clone();
        edit(&mut after)?;
        if after != before {
            self.save(&after)?;
        }
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("nested").join("settings.json"));

        let settings = AnalyzerSettings {
            base_url: Some("http://localhost:8080".into()),
            deep_model: Some("gemini-2.5-pro".into()),
            request_timeout_secs: Some(300),
            ..Default::default()
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);

        store.save(&AnalyzerSettings::default()).unwrap();
        assert_eq!(store.load().unwrap(), AnalyzerSettings::default());

        // Only the settings file remains; the temp file was renamed over it.
        let entries = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn update_applies_edit_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("settings.json"));

        let saved = store
            .update(|s| Ok(s.set("fast_model", Some("gemini-2.5-flash"))?))
            .unwrap();
        assert_eq!(saved.fast_model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(store.load().unwrap(), saved);
    }

    #[test]
    fn failed_edit_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("settings.json"));

        let err = store.update(|s| Ok(s.set("nope", Some("x"))?));
        assert!(err.is_err());
        assert!(!store.path().exists());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::at_path(dir.path().join("settings.json"));
        assert_eq!(store.load_or_default().unwrap(), AnalyzerSettings::default());
        assert!(store.load().is_err());
    }

    #[test]
    fn broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(SettingsStore::at_path(path).load_or_default().is_err());
    }
}
