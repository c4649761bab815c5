//! Editor user interface
//!
//! - `state`: toggles and widget values, no imgui dependency
//! - `editor`, `menu`, `panels`: the immediate-mode layout
//! - `item_rects`: widget rectangles that headless tests click on
//! - `platform`: GLFW event translation
//! - `renderer`: imgui context setup and Vulkan rendering

pub mod editor;
mod item_rects;
pub mod menu;
pub mod panels;
pub mod platform;
pub mod renderer;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

pub use editor::EditorUi;
pub use renderer::{create_context, UiError, UiRenderer};
pub use state::{EditMode, EditorState, Panel, PhysicsMode};
