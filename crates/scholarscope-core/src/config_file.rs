use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub service: Option<ServiceConfig>,
    pub storage: Option<StorageConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub is_cs_ai: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/scholarscope/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scholarscope").join("config.toml"))
}

/// Load config by cascading CWD `.scholarscope.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".scholarscope.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let service = |f: fn(&ServiceConfig) -> Option<String>| {
        overlay
            .service
            .as_ref()
            .and_then(f)
            .or_else(|| base.service.as_ref().and_then(f))
    };
    let storage = |f: fn(&StorageConfig) -> Option<String>| {
        overlay
            .storage
            .as_ref()
            .and_then(f)
            .or_else(|| base.storage.as_ref().and_then(f))
    };

    ConfigFile {
        service: Some(ServiceConfig {
            base_url: service(|s| s.base_url.clone()),
            timeout_secs: overlay
                .service
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.service.as_ref().and_then(|s| s.timeout_secs)),
            is_cs_ai: overlay
                .service
                .as_ref()
                .and_then(|s| s.is_cs_ai)
                .or_else(|| base.service.as_ref().and_then(|s| s.is_cs_ai)),
        }),
        storage: Some(StorageConfig {
            data_dir: storage(|s| s.data_dir.clone()),
            session_id: storage(|s| s.session_id.clone()),
        }),
        display: Some(DisplayConfig {
            theme: overlay
                .display
                .as_ref()
                .and_then(|d| d.theme.clone())
                .or_else(|| base.display.as_ref().and_then(|d| d.theme.clone())),
            fps: overlay
                .display
                .as_ref()
                .and_then(|d| d.fps)
                .or_else(|| base.display.as_ref().and_then(|d| d.fps)),
        }),
    }
}

/// Save the config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub timeout: Duration,
    pub is_cs_ai: bool,
    /// Override for the durable data directory.
    pub data_dir: Option<PathBuf>,
    /// Override for the session identity.
    pub session_id: Option<String>,
    pub theme_name: String,
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            is_cs_ai: true,
            data_dir: None,
            session_id: None,
            theme_name: "default".to_string(),
            fps: 30,
        }
    }
}

impl Settings {
    /// Fill in values present in `file`; absent or empty values keep the
    /// current setting.
    pub fn apply_file(&mut self, file: &ConfigFile) {
        if let Some(svc) = &file.service {
            if let Some(ref url) = svc.base_url
                && !url.is_empty()
            {
                self.base_url = url.clone();
            }
            if let Some(secs) = svc.timeout_secs {
                self.timeout = Duration::from_secs(secs.max(1));
            }
            if let Some(flag) = svc.is_cs_ai {
                self.is_cs_ai = flag;
            }
        }
        if let Some(storage) = &file.storage {
            if let Some(ref dir) = storage.data_dir
                && !dir.is_empty()
            {
                self.data_dir = Some(PathBuf::from(dir));
            }
            if let Some(ref id) = storage.session_id
                && !id.is_empty()
            {
                self.session_id = Some(id.clone());
            }
        }
        if let Some(disp) = &file.display {
            if let Some(ref theme) = disp.theme
                && !theme.is_empty()
            {
                self.theme_name = theme.clone();
            }
            if let Some(fps) = disp.fps {
                self.fps = fps.clamp(1, 120);
            }
        }
    }

    /// Snapshot of these settings in file form, for `save_config`.
    pub fn to_config_file(&self) -> ConfigFile {
        ConfigFile {
            service: Some(ServiceConfig {
                base_url: Some(self.base_url.clone()),
                timeout_secs: Some(self.timeout.as_secs()),
                is_cs_ai: Some(self.is_cs_ai),
            }),
            storage: Some(StorageConfig {
                data_dir: self.data_dir.as_ref().map(|p| p.display().to_string()),
                session_id: self.session_id.clone(),
            }),
            display: Some(DisplayConfig {
                theme: Some(self.theme_name.clone()),
                fps: Some(self.fps),
            }),
        }
    }
}
