//! Vulkan rendering backend
//!
//! Low-level Vulkan bootstrap for the editor window. Every wrapper owns its
//! handle and destroys it on drop.

pub mod commands;
pub mod context;
pub mod framebuffer;
pub mod render_pass;
pub mod swapchain;
pub mod sync;

pub use commands::{ActiveRenderPass, CommandPool, CommandRecorder};
pub use context::{
    find_graphics_present_family, LogicalDevice, PhysicalDeviceInfo, VulkanContext, VulkanError,
    VulkanInstance, VulkanResult,
};
pub use framebuffer::Framebuffer;
pub use render_pass::RenderPass;
pub use swapchain::{Swapchain, SwapchainRequest};
pub use sync::{Fence, FrameSync, Semaphore};
