//! # Editor Configuration
//!
//! All configuration structures for the editor shell: engine behavior
//! (logging), the window, the Vulkan renderer and the imgui layer.
//!
//! Every struct is `#[serde(default)]`, so a config file only needs the
//! keys it wants to override.

use ash::vk;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use crate::config::{Config, ConfigError};

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "DANCORE_CONFIG";

/// Config file looked up in the working directory when the env var is unset
pub const DEFAULT_CONFIG_PATH: &str = "dancore.toml";

/// # Engine Configuration
///
/// Core behavior that affects the whole process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log level (`error`, `warn`, `info`, `debug`, `trace` or `off`).
    /// Per-module directives belong in `RUST_LOG`, which takes precedence.
    pub log_level: String,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Window Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title bar text
    pub title: String,
    /// Initial client width in screen coordinates
    pub width: u32,
    /// Initial client height in screen coordinates
    pub height: u32,
    /// Whether the user may resize the window
    pub resizable: bool,
}

impl WindowConfig {
    /// Create a window configuration
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            resizable: true,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Dancore Editor (Vulkan)", 1280, 720)
    }
}

/// Preferred swapchain present mode
///
/// FIFO is always available, so it is both the default and the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentModePreference {
    /// Vsync, queue of pending images
    Fifo,
    /// Vsync, latest image replaces the pending one
    Mailbox,
    /// No vsync
    Immediate,
}

impl PresentModePreference {
    /// The matching Vulkan present mode
    pub const fn as_vk(self) -> vk::PresentModeKHR {
        match self {
            Self::Fifo => vk::PresentModeKHR::FIFO,
            Self::Mailbox => vk::PresentModeKHR::MAILBOX,
            Self::Immediate => vk::PresentModeKHR::IMMEDIATE,
        }
    }
}

impl Default for PresentModePreference {
    fn default() -> Self {
        Self::Fifo
    }
}

/// # Vulkan Renderer Configuration
///
/// Application metadata for instance creation and swapchain preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulkanRendererConfig {
    /// Application name for Vulkan instance creation
    pub application_name: String,
    /// Application version (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Whether to enable Vulkan validation layers; `None` follows the build type
    pub enable_validation: Option<bool>,
    /// Preferred present mode
    pub present_mode: PresentModePreference,
    /// Minimum number of swapchain images to request
    pub min_image_count: u32,
    /// Color the frame is cleared to before the UI is drawn
    pub clear_color: [f32; 4],
}

impl VulkanRendererConfig {
    /// Create a new renderer configuration
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            application_name: app_name.into(),
            application_version: (0, 1, 0),
            enable_validation: None,
            present_mode: PresentModePreference::Fifo,
            min_image_count: 2,
            clear_color: [0.10, 0.11, 0.12, 1.0],
        }
    }

    /// Enable or disable validation layers
    #[must_use]
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.enable_validation = Some(enabled);
        self
    }

    /// Set the preferred present mode
    #[must_use]
    pub fn with_present_mode(mut self, mode: PresentModePreference) -> Self {
        self.present_mode = mode;
        self
    }

    /// Whether validation ends up enabled for this build
    pub fn validation_enabled(&self) -> bool {
        self.enable_validation.unwrap_or(cfg!(debug_assertions))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() {
            return Err(ConfigError::Invalid("Application name cannot be empty".to_string()));
        }

        if self.min_image_count == 0 {
            return Err(ConfigError::Invalid(
                "Swapchain minimum image count must be at least 1".to_string(),
            ));
        }

        if self.clear_color.iter().any(|c| !(0.0..=1.0).contains(c)) {
            return Err(ConfigError::Invalid(format!(
                "Clear color components must lie in [0, 1], got {:?}",
                self.clear_color
            )));
        }

        Ok(())
    }
}

impl Default for VulkanRendererConfig {
    fn default() -> Self {
        Self::new("Dancore Editor")
    }
}

/// # UI Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Allow panels to dock into the main viewport
    pub docking: bool,
    /// Pixel size of the default font
    pub font_size: f32,
    /// File imgui stores its window layout in; empty disables it
    pub ini_file: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            docking: true,
            font_size: 13.0,
            ini_file: "imgui.ini".to_string(),
        }
    }
}

impl UiConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Font size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// # Complete Editor Configuration
///
/// Top-level configuration the editor binary loads at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Window configuration
    pub window: WindowConfig,
    /// Rendering system configuration
    pub renderer: VulkanRendererConfig,
    /// imgui configuration
    pub ui: UiConfig,
}

impl EditorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if log::LevelFilter::from_str(&self.engine.log_level).is_err() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log level '{}'; use RUST_LOG for filter directives",
                self.engine.log_level
            )));
        }

        if self.window.title.is_empty() {
            return Err(ConfigError::Invalid("Window title cannot be empty".to_string()));
        }

        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }

        self.renderer.validate()?;
        self.ui.validate()?;
        Ok(())
    }

    /// Resolve the config path from the environment
    pub fn resolve_path() -> std::path::PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map_or_else(|| DEFAULT_CONFIG_PATH.into(), std::path::PathBuf::from)
    }

    /// Load from the resolved path (defaults when absent) and validate
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::load_or_default(Self::resolve_path())?;
        config.validate()?;
        Ok(config)
    }
}

impl Config for EditorConfig {}
