use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use thiserror::Error;

use super::files;
use super::state::UiTheme;

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// UI preferences that survive a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub active_file_id: Option<String>,
    pub open_files: Vec<String>,
    #[serde(deserialize_with = "theme_or_default")]
    pub theme: UiTheme,
}

/// An unrecognized theme falls back to the default without discarding the other keys.
fn theme_or_default<'de, D>(deserializer: D) -> Result<UiTheme, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(UiTheme::deserialize(value).unwrap_or_default())
}

impl Default for Preferences {
    fn default() -> Self {
        let first = files::default_file().id.to_string();
        Self {
            active_file_id: Some(first.clone()),
            open_files: vec![first],
            theme: UiTheme::Dark,
        }
    }
}

impl Preferences {
    /// Drops ids that no longer name a portfolio file.
    pub fn sanitized(mut self) -> Self {
        let mut seen: Vec<String> = Vec::new();
        self.open_files.retain(|id| {
            if files::find(id).is_none() || seen.contains(id) {
                return false;
            }
            seen.push(id.clone());
            true
        });
        if let Some(active) = self.active_file_id.as_deref() {
            if files::find(active).is_none() {
                self.active_file_id = self.open_files.last().cloned();
            } else if !self.open_files.iter().any(|id| id == active) {
                self.open_files.push(active.to_string());
            }
        }
        self
    }
}

#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("folio").join("preferences.json"))
    }

    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads stored preferences. Missing or unreadable data yields defaults.
    pub fn load(&self) -> Preferences {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Preferences::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read preferences");
                return Preferences::default();
            }
        };
        match serde_json::from_slice::<Preferences>(&bytes) {
            Ok(prefs) => prefs.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring corrupt preferences");
                Preferences::default()
            }
        }
    }

    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferenceError> {
        let encoded = serde_json::to_vec_pretty(prefs)?;
        let tmp = self.path.with_extension("json.tmp");
        write_private(&tmp, &encoded)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }
}

fn write_private(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut opts = OpenOptions::new();
    opts.create(true).write(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    let mut file = opts.open(path)?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}
