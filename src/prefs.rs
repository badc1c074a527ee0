//! Persisted dark-mode preference.
//!
//! The flag is read once when [`DarkMode::init`] runs and written on every toggle. Renderers
//! receive the current value plus an observer callback instead of reading ambient state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Where the flag lives between runs.
pub trait PreferenceStore: Send {
    /// `None` when nothing has been stored yet (or it cannot be read).
    fn load(&self) -> Option<bool>;
    fn save(&self, dark_mode: bool) -> Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(rename = "darkMode", default)]
    dark_mode: bool,
}

/// JSON file store, by default `<config dir>/restcountries-explorer/preferences.json`.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform config directory, falling back to the working directory.
    pub fn default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(
            base.join("restcountries-explorer")
                .join("preferences.json"),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferences {
    fn load(&self) -> Option<bool> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<Preferences>(&raw) {
            Ok(p) => Some(p.dark_mode),
            Err(e) => {
                log::warn!("ignoring unreadable {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, dark_mode: bool) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create {}", dir.display()))?;
        }
        let s = serde_json::to_string_pretty(&Preferences { dark_mode })?;
        fs::write(&self.path, s).with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

/// In-process store. Clones share the same cell.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    cell: Arc<Mutex<Option<bool>>>,
}

impl MemoryPreferences {
    pub fn with_value(dark_mode: bool) -> Self {
        Self {
            cell: Arc::new(Mutex::new(Some(dark_mode))),
        }
    }

    pub fn stored(&self) -> Option<bool> {
        self.cell.lock().map(|v| *v).unwrap_or(None)
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self) -> Option<bool> {
        self.stored()
    }

    fn save(&self, dark_mode: bool) -> Result<()> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|_| anyhow::anyhow!("preference cell poisoned"))?;
        *cell = Some(dark_mode);
        Ok(())
    }
}

type Observer = Box<dyn FnMut(bool) + Send>;

/// Process-wide dark-mode flag: single writer ([`DarkMode::toggle`]), explicit readers.
pub struct DarkMode {
    enabled: bool,
    store: Box<dyn PreferenceStore>,
    observer: Option<Observer>,
}

impl DarkMode {
    /// Read the persisted value once. Missing or unreadable means light mode.
    pub fn init(store: impl PreferenceStore + 'static) -> Self {
        let enabled = store.load().unwrap_or(false);
        log::debug!("dark mode initialised to {enabled}");
        Self {
            enabled,
            store: Box::new(store),
            observer: None,
        }
    }

    /// Register the renderer's mirror (e.g. apply dark visuals). Called immediately with the
    /// current value, then after every toggle.
    pub fn with_observer(mut self, mut observer: impl FnMut(bool) + Send + 'static) -> Self {
        observer(self.enabled);
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the flag, persist it and notify the observer. Returns the new value.
    /// A failed write is logged; the in-memory value still flips.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        if let Err(e) = self.store.save(self.enabled) {
            log::warn!("could not persist dark mode: {e:#}");
        }
        if let Some(observer) = self.observer.as_mut() {
            observer(self.enabled);
        }
        self.enabled
    }
}
