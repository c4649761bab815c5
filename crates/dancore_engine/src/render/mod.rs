//! Windowing and the Vulkan presentation path

pub mod frame;
pub mod vulkan;
pub mod window;

pub use frame::{FrameLoop, SwapchainStatus};
pub use window::{Window, WindowError, WindowResult};
