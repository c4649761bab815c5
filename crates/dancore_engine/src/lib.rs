//! # Dancore Engine
//!
//! Editor shell for the Dancore engine: a GLFW window, a Vulkan swapchain
//! and an imgui editor layout drawn on top of it.
//!
//! ## Features
//!
//! - **Vulkan Bootstrap**: instance, device, swapchain and resize handling
//! - **Editor Layout**: menu bar, toolbar and dockable panels
//! - **Configuration**: TOML or RON files with validated defaults
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dancore_engine::prelude::*;
//!
//! fn main() -> Result<(), AppError> {
//!     let config = EditorConfig::load()?;
//!     let mut app = EditorApp::new(&config)?;
//!     app.run()
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod render;
pub mod ui;

mod application;

pub use application::{AppError, EditorApp};

/// Common imports for editor users
pub mod prelude {
    pub use crate::{
        core::config::{Config, EditorConfig},
        foundation::{logging, time::Timer},
        ui::{EditMode, EditorState, EditorUi, Panel},
        AppError, EditorApp,
    };
}
