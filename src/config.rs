//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Width in logical units
    pub width: u32,
    /// Height in logical units
    pub height: u32,
    pub fullscreen: bool,
    pub resizable: bool,
    /// Whether the window has a title bar and borders
    pub decorated: bool,
    /// Request a high pixel density back buffer where supported
    pub high_dpi: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Oil Platform".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            resizable: true,
            decorated: true,
            high_dpi: true,
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Start text input on the main window at creation
    pub text_input: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { text_input: false }
    }
}

/// Event pump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PumpConfig {
    /// Drains larger than this log a warning; the drain still completes
    pub burst_warning: usize,
    /// Deliver joystick and gamepad input while the window is unfocused
    pub joystick_background_events: bool,
}

impl Default for PumpConfig {
    fn default() -> Self {
        Self {
            burst_warning: 1024,
            joystick_background_events: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is not set
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    pub window: WindowConfig,
    pub input: InputConfig,
    pub pump: PumpConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Profiles are loaded from config files in the following order:
    /// 1. config/{profile}.toml (profile-specific configuration)
    /// 2. Environment variables with prefix APP_ (e.g., APP_WINDOW__WIDTH=1920)
    ///
    /// Config files are searched for in:
    /// 1. Next to the executable (target/debug/config or target/release/config)
    /// 2. In the current directory (./config)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dir) = Self::find_config_dir() {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            let fallback = format!("config/{profile}");
            builder = builder.add_source(File::with_name(&fallback).required(false));
        }

        builder = builder.add_source(Self::environment());

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// `APP_` prefix, `__` between nested fields (e.g., APP_WINDOW__WIDTH)
    fn environment() -> Environment {
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Finds the config directory by searching in multiple locations
    fn find_config_dir() -> Option<std::path::PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = std::path::PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the APP_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("APP_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: "release".to_string(),
            window: WindowConfig::default(),
            input: InputConfig::default(),
            pump: PumpConfig::default(),
            log: LogConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profile_uses_defaults() {
        let config = AppConfig::load("no-such-profile").unwrap();
        assert_eq!(config.profile, "no-such-profile");
        assert_eq!(config.pump, PumpConfig::default());
    }

    #[test]
    fn test_env_overrides_nested_fields() {
        let vars = config::Map::from([
            ("APP_WINDOW__WIDTH".to_string(), "1920".to_string()),
            ("APP_PUMP__BURST_WARNING".to_string(), "64".to_string()),
        ]);
        let config: AppConfig = Config::builder()
            .add_source(AppConfig::environment().source(Some(vars)))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.window.width, 1920);
        assert_eq!(config.pump.burst_warning, 64);
        assert_eq!(config.window.height, WindowConfig::default().height);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: AppConfig = Config::builder()
            .add_source(config::File::from_str(
                "[window]\ntitle = \"Test\"\nwidth = 640\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.window.title, "Test");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, WindowConfig::default().height);
        assert!(config.window.resizable);
    }
}
