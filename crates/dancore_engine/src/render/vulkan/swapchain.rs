//! Vulkan swapchain management
//!
//! Handles swapchain creation and recreation following RAII principles.
//! The selection policy (format, present mode, extent, image count) lives in
//! free functions so it can be checked without a device.

use crate::render::vulkan::{VulkanContext, VulkanError, VulkanResult};
use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::{vk, Device};

/// Format the UI is authored against; colors are written as-is
pub const PREFERRED_SURFACE_FORMAT: vk::SurfaceFormatKHR = vk::SurfaceFormatKHR {
    format: vk::Format::B8G8R8A8_UNORM,
    color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
};

/// Pick the preferred format when offered, otherwise the first one reported
pub fn choose_surface_format(available: &[vk::SurfaceFormatKHR]) -> Option<vk::SurfaceFormatKHR> {
    available
        .iter()
        .find(|sf| {
            sf.format == PREFERRED_SURFACE_FORMAT.format
                && sf.color_space == PREFERRED_SURFACE_FORMAT.color_space
        })
        .or_else(|| available.first())
        .copied()
}

/// Use `preferred` when supported; every driver must offer FIFO
pub fn choose_present_mode(
    available: &[vk::PresentModeKHR],
    preferred: vk::PresentModeKHR,
) -> vk::PresentModeKHR {
    if available.contains(&preferred) {
        preferred
    } else {
        vk::PresentModeKHR::FIFO
    }
}

/// The surface's fixed extent, or the framebuffer size clamped to its limits
pub fn choose_extent(caps: &vk::SurfaceCapabilitiesKHR, framebuffer: vk::Extent2D) -> vk::Extent2D {
    if caps.current_extent.width == u32::MAX {
        vk::Extent2D {
            width: framebuffer
                .width
                .clamp(caps.min_image_extent.width, caps.max_image_extent.width),
            height: framebuffer
                .height
                .clamp(caps.min_image_extent.height, caps.max_image_extent.height),
        }
    } else {
        caps.current_extent
    }
}

/// At least `requested` and the surface minimum; a maximum of 0 means unbounded
pub fn choose_image_count(caps: &vk::SurfaceCapabilitiesKHR, requested: u32) -> u32 {
    let count = requested.max(caps.min_image_count);
    if caps.max_image_count > 0 {
        count.min(caps.max_image_count)
    } else {
        count
    }
}

/// What the caller wants from the swapchain
#[derive(Debug, Clone, Copy)]
pub struct SwapchainRequest {
    /// Current framebuffer size in pixels
    pub framebuffer: vk::Extent2D,
    /// Preferred present mode
    pub present_mode: vk::PresentModeKHR,
    /// Minimum image count to ask for
    pub min_image_count: u32,
}

/// Swapchain management wrapper with RAII cleanup
pub struct Swapchain {
    device: Device,
    swapchain_loader: SwapchainLoader,
    swapchain: vk::SwapchainKHR,
    images: Vec<vk::Image>,
    image_views: Vec<vk::ImageView>,
    format: vk::SurfaceFormatKHR,
    extent: vk::Extent2D,
    present_mode: vk::PresentModeKHR,
}

impl Swapchain {
    /// Create a new swapchain
    pub fn new(context: &VulkanContext, request: &SwapchainRequest) -> VulkanResult<Self> {
        Self::create(context, request, vk::SwapchainKHR::null())
    }

    /// Build a replacement, handing the current swapchain to the driver as `old_swapchain`
    ///
    /// `self` stays valid until the caller drops it.
    pub fn recreate(&self, context: &VulkanContext, request: &SwapchainRequest) -> VulkanResult<Self> {
        Self::create(context, request, self.swapchain)
    }

    fn create(
        context: &VulkanContext,
        request: &SwapchainRequest,
        old_swapchain: vk::SwapchainKHR,
    ) -> VulkanResult<Self> {
        let physical_device = context.physical_device.device;
        let surface = context.surface;
        let surface_loader = &context.surface_loader;

        let caps = unsafe {
            surface_loader.get_physical_device_surface_capabilities(physical_device, surface)
        }
        .map_err(VulkanError::api("vkGetPhysicalDeviceSurfaceCapabilitiesKHR"))?;

        let formats = unsafe {
            surface_loader.get_physical_device_surface_formats(physical_device, surface)
        }
        .map_err(VulkanError::api("vkGetPhysicalDeviceSurfaceFormatsKHR"))?;

        let format = choose_surface_format(&formats).ok_or_else(|| {
            VulkanError::InitializationFailed("Surface reports no formats".to_string())
        })?;

        let present_modes = unsafe {
            surface_loader.get_physical_device_surface_present_modes(physical_device, surface)
        }
        .map_err(VulkanError::api("vkGetPhysicalDeviceSurfacePresentModesKHR"))?;

        let present_mode = choose_present_mode(&present_modes, request.present_mode);
        let extent = choose_extent(&caps, request.framebuffer);
        let image_count = choose_image_count(&caps, request.min_image_count);

        let create_info = vk::SwapchainCreateInfoKHR::builder()
            .surface(surface)
            .min_image_count(image_count)
            .image_format(format.format)
            .image_color_space(format.color_space)
            .image_extent(extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(caps.current_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(present_mode)
            .clipped(true)
            .old_swapchain(old_swapchain);

        let swapchain_loader = context.swapchain_loader().clone();
        let swapchain = unsafe { swapchain_loader.create_swapchain(&create_info, None) }
            .map_err(VulkanError::api("vkCreateSwapchainKHR"))?;

        let device = context.raw_device();
        let images = match unsafe { swapchain_loader.get_swapchain_images(swapchain) } {
            Ok(images) => images,
            Err(result) => {
                unsafe { swapchain_loader.destroy_swapchain(swapchain, None) };
                return Err(VulkanError::api("vkGetSwapchainImagesKHR")(result));
            }
        };

        // Build the struct first so a failed view creation still cleans up
        let mut created = Self {
            device,
            swapchain_loader,
            swapchain,
            images,
            image_views: Vec::new(),
            format,
            extent,
            present_mode,
        };

        for &image in &created.images {
            let view_info = vk::ImageViewCreateInfo::builder()
                .image(image)
                .view_type(vk::ImageViewType::TYPE_2D)
                .format(format.format)
                .components(vk::ComponentMapping {
                    r: vk::ComponentSwizzle::IDENTITY,
                    g: vk::ComponentSwizzle::IDENTITY,
                    b: vk::ComponentSwizzle::IDENTITY,
                    a: vk::ComponentSwizzle::IDENTITY,
                })
                .subresource_range(vk::ImageSubresourceRange {
                    aspect_mask: vk::ImageAspectFlags::COLOR,
                    base_mip_level: 0,
                    level_count: 1,
                    base_array_layer: 0,
                    layer_count: 1,
                });

            let view = unsafe { created.device.create_image_view(&view_info, None) }
                .map_err(VulkanError::api("vkCreateImageView"))?;
            created.image_views.push(view);
        }

        log::info!(
            "Swapchain ready: {} images, {}x{}, {:?}, {:?}",
            created.images.len(),
            extent.width,
            extent.height,
            format.format,
            present_mode
        );

        Ok(created)
    }

    /// Get swapchain extent
    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    /// Get surface format
    pub fn format(&self) -> vk::SurfaceFormatKHR {
        self.format
    }

    /// Present mode in use
    pub fn present_mode(&self) -> vk::PresentModeKHR {
        self.present_mode
    }

    /// Get image views
    pub fn image_views(&self) -> &[vk::ImageView] {
        &self.image_views
    }

    /// Number of images the driver actually created
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Get swapchain handle
    pub fn handle(&self) -> vk::SwapchainKHR {
        self.swapchain
    }

    /// Get swapchain loader
    pub fn loader(&self) -> &SwapchainLoader {
        &self.swapchain_loader
    }
}

impl Drop for Swapchain {
    fn drop(&mut self) {
        unsafe {
            for &image_view in &self.image_views {
                self.device.destroy_image_view(image_view, None);
            }
            self.swapchain_loader.destroy_swapchain(self.swapchain, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(min: u32, max: u32) -> vk::SurfaceCapabilitiesKHR {
        vk::SurfaceCapabilitiesKHR {
            min_image_count: min,
            max_image_count: max,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D { width: 64, height: 64 },
            max_image_extent: vk::Extent2D { width: 4096, height: 2048 },
            ..Default::default()
        }
    }

    #[test]
    fn prefers_unorm_bgra() {
        let formats = [
            vk::SurfaceFormatKHR {
                format: vk::Format::R8G8B8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            },
            PREFERRED_SURFACE_FORMAT,
        ];
        assert_eq!(choose_surface_format(&formats), Some(PREFERRED_SURFACE_FORMAT));
    }

    #[test]
    fn falls_back_to_first_format() {
        let first = vk::SurfaceFormatKHR {
            format: vk::Format::R8G8B8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        };
        let formats = [
            first,
            vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_UNORM,
                color_space: vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT,
            },
        ];
        assert_eq!(choose_surface_format(&formats), Some(first));
        assert_eq!(choose_surface_format(&[]), None);
    }

    #[test]
    fn present_mode_honours_supported_preference() {
        let available = [vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX];
        assert_eq!(
            choose_present_mode(&available, vk::PresentModeKHR::MAILBOX),
            vk::PresentModeKHR::MAILBOX
        );
        assert_eq!(
            choose_present_mode(&available, vk::PresentModeKHR::IMMEDIATE),
            vk::PresentModeKHR::FIFO
        );
    }

    #[test]
    fn fixed_extent_wins() {
        let mut caps = caps(2, 3);
        caps.current_extent = vk::Extent2D { width: 800, height: 600 };
        let extent = choose_extent(&caps, vk::Extent2D { width: 1280, height: 720 });
        assert_eq!((extent.width, extent.height), (800, 600));
    }

    #[test]
    fn free_extent_is_clamped() {
        let caps = caps(2, 3);
        let extent = choose_extent(&caps, vk::Extent2D { width: 10_000, height: 10 });
        assert_eq!((extent.width, extent.height), (4096, 64));

        let extent = choose_extent(&caps, vk::Extent2D { width: 1280, height: 720 });
        assert_eq!((extent.width, extent.height), (1280, 720));
    }

    #[test]
    fn image_count_respects_surface_limits() {
        assert_eq!(choose_image_count(&caps(2, 8), 2), 2);
        assert_eq!(choose_image_count(&caps(3, 8), 2), 3);
        assert_eq!(choose_image_count(&caps(2, 3), 5), 3);
        // max_image_count == 0 means no upper bound
        assert_eq!(choose_image_count(&caps(2, 0), 6), 6);
    }
}
