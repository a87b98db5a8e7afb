// src/config.rs
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "bikeshare.yaml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding `chicago.csv`, `new_york_city.csv` and `washington.csv`.
    pub data_dir: PathBuf,
    pub pager: PagerSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagerSettings {
    pub page_size: usize,
    /// When false a page is only shown if rows remain past its end, so a
    /// trailing short page is never printed.
    pub show_partial_last_page: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            pager: PagerSettings::default(),
        }
    }
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self {
            page_size: 5,
            show_partial_last_page: false,
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults if the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings = Self::from_yaml(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        info!(path = %path.display(), data_dir = %settings.data_dir.display(), "loaded settings");
        Ok(settings)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        // an empty document deserializes to unit, not to an empty mapping
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(text)?;
        if settings.pager.page_size == 0 {
            bail!("pager.page_size must be at least 1");
        }
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let tmp = tempdir()?;
        let settings = Settings::load(tmp.path().join(SETTINGS_FILE))?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.pager.page_size, 5);
        assert!(!settings.pager.show_partial_last_page);
        Ok(())
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join(SETTINGS_FILE);
        let mut f = fs::File::create(&path)?;
        writeln!(f, "data_dir: /srv/bikeshare")?;
        writeln!(f, "pager:")?;
        writeln!(f, "  show_partial_last_page: true")?;
        drop(f);

        let settings = Settings::load(&path)?;
        assert_eq!(settings.data_dir, PathBuf::from("/srv/bikeshare"));
        assert_eq!(settings.pager.page_size, 5);
        assert!(settings.pager.show_partial_last_page);
        Ok(())
    }

    #[test]
    fn test_empty_document_is_default() -> Result<()> {
        assert_eq!(Settings::from_yaml("\n")?, Settings::default());
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_keys_and_zero_page_size() {
        assert!(Settings::from_yaml("data_directory: x\n").is_err());
        assert!(Settings::from_yaml("pager:\n  page_size: 0\n").is_err());
    }
}
