use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::profiles::{self, AircraftProfile};

pub const SELECTED_SIMULATOR_KEY: &str = "selectedSimulator";
pub const SELECTED_PLANE_KEY: &str = "selectedPlane";
pub const MENU_MODE_KEY: &str = "menuMode";
pub const MSFS_ROOT_URL_KEY: &str = "msfsRootUrl";

pub const DEFAULT_MSFS_ROOT_URL: &str = "http://fs.lan:5018";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuMode {
    #[default]
    Popup,
    Overlay,
}

impl MenuMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MenuMode::Popup => "popup",
            MenuMode::Overlay => "overlay",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "overlay" => MenuMode::Overlay,
            _ => MenuMode::Popup,
        }
    }
}

/// String preferences kept in a JSON object file, read once on open.
pub struct SettingsStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl SettingsStore {
    /// An unreadable or malformed store opens empty, i.e. unconfigured.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_values(&path) {
            Ok(values) => values,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no settings file yet");
                Map::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring settings: {e}");
                Map::new()
            }
        };

        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn selected_simulator(&self) -> Option<&str> {
        self.get(SELECTED_SIMULATOR_KEY)
    }

    pub fn selected_plane(&self) -> Option<&str> {
        self.get(SELECTED_PLANE_KEY)
    }

    pub fn menu_mode(&self) -> MenuMode {
        self.get(MENU_MODE_KEY)
            .map(MenuMode::parse)
            .unwrap_or_default()
    }

    pub fn msfs_root_url(&self) -> &str {
        self.get(MSFS_ROOT_URL_KEY).unwrap_or(DEFAULT_MSFS_ROOT_URL)
    }

    pub fn has_configured_settings(&self) -> bool {
        self.selected_simulator().is_some() && self.selected_plane().is_some()
    }

    pub fn set_selected_simulator(&mut self, simulator: &str) {
        self.set(SELECTED_SIMULATOR_KEY, simulator);
    }

    pub fn set_selected_plane(&mut self, plane: &str) {
        self.set(SELECTED_PLANE_KEY, plane);
    }

    pub fn set_menu_mode(&mut self, mode: MenuMode) {
        self.set(MENU_MODE_KEY, mode.as_str());
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Builds the configuration handed to the gateway and the panels.
    pub fn resolve(&self) -> Config {
        let menu_mode = self.menu_mode();
        let (Some(simulator), Some(plane)) = (self.selected_simulator(), self.selected_plane())
        else {
            tracing::info!("simulator or plane not selected");
            return Config {
                menu_mode,
                connection: None,
                profile: None,
            };
        };

        let Some(profile) = profiles::lookup(simulator, plane) else {
            if profiles::is_listed(simulator, plane) {
                tracing::warn!(simulator, plane, "no gateway for this simulator yet");
            } else {
                tracing::warn!(simulator, plane, "unknown simulator or plane");
            }
            return Config {
                menu_mode,
                connection: None,
                profile: None,
            };
        };

        Config {
            menu_mode,
            connection: Some(ConnectionConfig {
                root_url: self.msfs_root_url().to_string(),
            }),
            profile: Some(profile),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn read_values(path: &Path) -> Result<Map<String, Value>, SettingsError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub root_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub menu_mode: MenuMode,
    pub connection: Option<ConnectionConfig>,
    pub profile: Option<AircraftProfile>,
}
