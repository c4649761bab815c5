//! # Core Module
//!
//! Shared abstractions the rest of the editor depends on.
//!
//! ## Organization
//!
//! - **Config**: Configuration types for every subsystem

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    Config, ConfigError, EditorConfig, EngineConfig, PresentModePreference, UiConfig,
    VulkanRendererConfig, WindowConfig,
};
