//! Vulkan context management
//!
//! Instance, surface, physical device and logical device creation for the
//! editor window. Each wrapper owns its handle and releases it on drop.

use crate::core::config::VulkanRendererConfig;
use crate::render::window::Window;
use ash::extensions::ext::DebugUtils;
use ash::extensions::khr::{Surface, Swapchain as SwapchainLoader};
use ash::{vk, Device, Entry, Instance};
use std::ffi::{c_char, CStr, CString};
use thiserror::Error;

const VALIDATION_LAYER: &[u8] = b"VK_LAYER_KHRONOS_validation\0";
const ENGINE_NAME: &[u8] = b"Dancore\0";

#[cfg(target_os = "macos")]
const PORTABILITY_ENUMERATION_EXTENSION: &[u8] = b"VK_KHR_portability_enumeration\0";
#[cfg(target_os = "macos")]
const PORTABILITY_SUBSET_EXTENSION: &[u8] = b"VK_KHR_portability_subset\0";

/// Vulkan-specific error types
#[derive(Error, Debug)]
pub enum VulkanError {
    /// A Vulkan call returned a failure code
    #[error("Vulkan error {result:?} at {step}")]
    Api {
        /// The call or bootstrap step that failed
        step: &'static str,
        /// The returned status code
        result: vk::Result,
    },

    /// Vulkan context initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Invalid operation attempted
    #[error("Invalid operation: {reason}")]
    InvalidOperation {
        /// Description of why the operation is invalid
        reason: String,
    },
}

impl VulkanError {
    /// Adapter for `map_err` that tags a `vk::Result` with the failing step
    pub fn api(step: &'static str) -> impl FnOnce(vk::Result) -> Self {
        move |result| Self::Api { step, result }
    }

    /// The status code, when the failure came from the API
    pub const fn result(&self) -> Option<vk::Result> {
        match self {
            Self::Api { result, .. } => Some(*result),
            Self::InitializationFailed(_) | Self::InvalidOperation { .. } => None,
        }
    }
}

/// Result type for Vulkan operations
pub type VulkanResult<T> = Result<T, VulkanError>;

fn cstr(bytes: &'static [u8]) -> *const c_char {
    bytes.as_ptr().cast()
}

struct DebugMessenger {
    loader: DebugUtils,
    messenger: vk::DebugUtilsMessengerEXT,
}

/// Vulkan instance wrapper with RAII cleanup
pub struct VulkanInstance {
    debug: Option<DebugMessenger>,
    /// Vulkan instance handle
    pub instance: Instance,
    /// Vulkan entry point
    pub entry: Entry,
}

impl VulkanInstance {
    /// Create the instance with the extensions GLFW requires
    pub fn new(window: &Window, config: &VulkanRendererConfig) -> VulkanResult<Self> {
        let entry = unsafe { Entry::load() }.map_err(|e| {
            VulkanError::InitializationFailed(format!("Failed to load Vulkan: {}", e))
        })?;

        let app_name = CString::new(config.application_name.as_str()).map_err(|_| {
            VulkanError::InitializationFailed("Application name contains a NUL byte".to_string())
        })?;
        let (major, minor, patch) = config.application_version;
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, major, minor, patch))
            .engine_name(unsafe { CStr::from_bytes_with_nul_unchecked(ENGINE_NAME) })
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_2);

        // Get required extensions from GLFW
        let required_extensions = window.get_required_instance_extensions().map_err(|e| {
            VulkanError::InitializationFailed(format!("Failed to get required extensions: {}", e))
        })?;
        let owned_extensions = required_extensions
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                VulkanError::InitializationFailed("Extension name contains a NUL byte".to_string())
            })?;
        let mut extensions: Vec<*const c_char> =
            owned_extensions.iter().map(|ext| ext.as_ptr()).collect();

        #[allow(unused_mut)] // Only macOS adds flags
        let mut flags = vk::InstanceCreateFlags::empty();

        // MoltenVK only exposes portability devices when asked to
        #[cfg(target_os = "macos")]
        {
            extensions.push(cstr(PORTABILITY_ENUMERATION_EXTENSION));
            flags |= vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR;
        }

        let validation = config.validation_enabled() && Self::validation_layer_available(&entry);
        let mut layers: Vec<*const c_char> = Vec::new();
        if validation {
            layers.push(cstr(VALIDATION_LAYER));
            extensions.push(DebugUtils::name().as_ptr());
        }

        let create_info = vk::InstanceCreateInfo::builder()
            .flags(flags)
            .application_info(&app_info)
            .enabled_extension_names(&extensions)
            .enabled_layer_names(&layers);

        let instance = unsafe { entry.create_instance(&create_info, None) }
            .map_err(VulkanError::api("vkCreateInstance"))?;

        let debug = if validation {
            let loader = DebugUtils::new(&entry, &instance);
            match Self::setup_debug_messenger(&loader) {
                Ok(messenger) => Some(DebugMessenger { loader, messenger }),
                Err(e) => {
                    unsafe { instance.destroy_instance(None) };
                    return Err(e);
                }
            }
        } else {
            None
        };

        log::info!(
            "Created Vulkan instance for '{}' (validation {})",
            config.application_name,
            if validation { "on" } else { "off" }
        );

        Ok(Self {
            debug,
            instance,
            entry,
        })
    }

    fn validation_layer_available(entry: &Entry) -> bool {
        let wanted = unsafe { CStr::from_bytes_with_nul_unchecked(VALIDATION_LAYER) };
        let available = entry
            .enumerate_instance_layer_properties()
            .map(|layers| {
                layers
                    .iter()
                    .any(|layer| unsafe { CStr::from_ptr(layer.layer_name.as_ptr()) } == wanted)
            })
            .unwrap_or(false);

        if !available {
            log::warn!("Validation requested but VK_LAYER_KHRONOS_validation is not installed");
        }
        available
    }

    fn setup_debug_messenger(loader: &DebugUtils) -> VulkanResult<vk::DebugUtilsMessengerEXT> {
        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        unsafe { loader.create_debug_utils_messenger(&create_info, None) }
            .map_err(VulkanError::api("vkCreateDebugUtilsMessengerEXT"))
    }
}

impl Drop for VulkanInstance {
    fn drop(&mut self) {
        unsafe {
            if let Some(debug) = self.debug.take() {
                debug
                    .loader
                    .destroy_debug_utils_messenger(debug.messenger, None);
            }
            self.instance.destroy_instance(None);
        }
    }
}

/// Debug callback for validation layers
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("[Vulkan] {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("[Vulkan] {:?} - {}", message_type, message);
    } else {
        log::debug!("[Vulkan] {:?} - {}", message_type, message);
    }

    vk::FALSE
}

/// First queue family that can both draw and present
///
/// `supports_present` is asked once per graphics-capable family, in order.
pub fn find_graphics_present_family<F>(
    families: &[vk::QueueFamilyProperties],
    mut supports_present: F,
) -> VulkanResult<Option<u32>>
where
    F: FnMut(u32) -> VulkanResult<bool>,
{
    for (index, family) in (0u32..).zip(families) {
        if family.queue_flags.contains(vk::QueueFlags::GRAPHICS) && supports_present(index)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Physical device selection
pub struct PhysicalDeviceInfo {
    /// Vulkan physical device handle
    pub device: vk::PhysicalDevice,
    /// Device properties and limits
    pub properties: vk::PhysicalDeviceProperties,
    /// Queue family used for both graphics and presentation
    pub queue_family: u32,
}

impl PhysicalDeviceInfo {
    /// Pick the first device with a family that draws and presents to `surface`
    pub fn select_suitable_device(
        instance: &Instance,
        surface: vk::SurfaceKHR,
        surface_loader: &Surface,
    ) -> VulkanResult<Self> {
        let devices = unsafe { instance.enumerate_physical_devices() }
            .map_err(VulkanError::api("vkEnumeratePhysicalDevices"))?;

        if devices.is_empty() {
            return Err(VulkanError::InitializationFailed("No GPU".to_string()));
        }

        for device in devices {
            if let Some(info) = Self::evaluate_device(instance, device, surface, surface_loader)? {
                log::info!("Selected GPU: {}", info.name());
                return Ok(info);
            }
        }

        Err(VulkanError::InitializationFailed("No suitable GPU".to_string()))
    }

    fn evaluate_device(
        instance: &Instance,
        device: vk::PhysicalDevice,
        surface: vk::SurfaceKHR,
        surface_loader: &Surface,
    ) -> VulkanResult<Option<Self>> {
        let properties = unsafe { instance.get_physical_device_properties(device) };
        let families = unsafe { instance.get_physical_device_queue_family_properties(device) };

        let queue_family = find_graphics_present_family(&families, |index| unsafe {
            surface_loader
                .get_physical_device_surface_support(device, index, surface)
                .map_err(VulkanError::api("vkGetPhysicalDeviceSurfaceSupportKHR"))
        })?;

        let Some(queue_family) = queue_family else {
            return Ok(None);
        };

        let extensions = unsafe { instance.enumerate_device_extension_properties(device) }
            .map_err(VulkanError::api("vkEnumerateDeviceExtensionProperties"))?;
        let has_swapchain = extensions.iter().any(|available| {
            (unsafe { CStr::from_ptr(available.extension_name.as_ptr()) }) == SwapchainLoader::name()
        });

        if !has_swapchain {
            log::debug!("Skipping GPU without VK_KHR_swapchain");
            return Ok(None);
        }

        Ok(Some(Self {
            device,
            properties,
            queue_family,
        }))
    }

    /// Human-readable device name
    pub fn name(&self) -> String {
        unsafe { CStr::from_ptr(self.properties.device_name.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }
}

/// Logical device wrapper with RAII cleanup
pub struct LogicalDevice {
    /// Vulkan logical device handle
    pub device: Device,
    /// Queue for graphics work and presentation
    pub queue: vk::Queue,
    /// Index of the queue family `queue` belongs to
    pub queue_family: u32,
    /// Swapchain extension loader
    pub swapchain_loader: SwapchainLoader,
}

impl LogicalDevice {
    /// Create a device with one queue from the selected family
    pub fn new(instance: &Instance, physical_device: &PhysicalDeviceInfo) -> VulkanResult<Self> {
        let priorities = [1.0];
        let queue_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(physical_device.queue_family)
            .queue_priorities(&priorities)
            .build()];

        #[allow(unused_mut)] // Only macOS adds extensions
        let mut extensions = vec![SwapchainLoader::name().as_ptr()];
        #[cfg(target_os = "macos")]
        extensions.push(cstr(PORTABILITY_SUBSET_EXTENSION));

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_extension_names(&extensions);

        let device = unsafe { instance.create_device(physical_device.device, &create_info, None) }
            .map_err(VulkanError::api("vkCreateDevice"))?;

        let queue = unsafe { device.get_device_queue(physical_device.queue_family, 0) };
        let swapchain_loader = SwapchainLoader::new(instance, &device);

        Ok(Self {
            device,
            queue,
            queue_family: physical_device.queue_family,
            swapchain_loader,
        })
    }

    /// Block until the device has finished all submitted work
    pub fn wait_idle(&self) -> VulkanResult<()> {
        unsafe { self.device.device_wait_idle() }.map_err(VulkanError::api("vkDeviceWaitIdle"))
    }
}

impl Drop for LogicalDevice {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device_wait_idle();
            self.device.destroy_device(None);
        }
    }
}

/// Owns the instance, surface and device for one window
pub struct VulkanContext {
    /// Vulkan surface for rendering
    pub surface: vk::SurfaceKHR,
    /// Surface extension loader
    pub surface_loader: Surface,
    /// Selected physical device information
    pub physical_device: PhysicalDeviceInfo,
    /// Logical device for operations
    pub device: LogicalDevice,
    /// Vulkan instance and debug utilities
    pub instance: VulkanInstance,
}

impl VulkanContext {
    /// Run instance, surface, GPU and device creation in order
    pub fn new(window: &mut Window, config: &VulkanRendererConfig) -> VulkanResult<Self> {
        let instance = VulkanInstance::new(window, config)?;

        let surface_loader = Surface::new(&instance.entry, &instance.instance);
        let surface = window
            .create_vulkan_surface(instance.instance.handle())
            .map_err(|e| VulkanError::InitializationFailed(format!("Surface creation: {}", e)))?;

        let physical_device =
            match PhysicalDeviceInfo::select_suitable_device(&instance.instance, surface, &surface_loader) {
                Ok(info) => info,
                Err(e) => {
                    unsafe { surface_loader.destroy_surface(surface, None) };
                    return Err(e);
                }
            };

        let device = match LogicalDevice::new(&instance.instance, &physical_device) {
            Ok(device) => device,
            Err(e) => {
                unsafe { surface_loader.destroy_surface(surface, None) };
                return Err(e);
            }
        };

        Ok(Self {
            surface,
            surface_loader,
            physical_device,
            device,
            instance,
        })
    }

    /// Get a reference to the Vulkan instance
    pub fn instance(&self) -> &Instance {
        &self.instance.instance
    }

    /// Get the raw Device handle
    pub fn raw_device(&self) -> Device {
        self.device.device.clone()
    }

    /// Get the swapchain loader
    pub fn swapchain_loader(&self) -> &SwapchainLoader {
        &self.device.swapchain_loader
    }

    /// Get the graphics and present queue
    pub fn queue(&self) -> vk::Queue {
        self.device.queue
    }

    /// Get the queue family index
    pub fn queue_family(&self) -> u32 {
        self.device.queue_family
    }
}

impl Drop for VulkanContext {
    fn drop(&mut self) {
        unsafe {
            let _ = self.device.device.device_wait_idle();
            self.surface_loader.destroy_surface(self.surface, None);
        }
        // Remaining fields drop in declaration order: device before instance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn picks_first_family_with_graphics_and_present() {
        let families = [
            family(vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::GRAPHICS),
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE),
            family(vk::QueueFlags::GRAPHICS),
        ];

        // Family 1 draws but cannot present
        let picked = find_graphics_present_family(&families, |index| Ok(index >= 2)).unwrap();
        assert_eq!(picked, Some(2));
    }

    #[test]
    fn only_asks_present_support_for_graphics_families() {
        let families = [family(vk::QueueFlags::COMPUTE), family(vk::QueueFlags::GRAPHICS)];
        let mut asked = Vec::new();
        let picked = find_graphics_present_family(&families, |index| {
            asked.push(index);
            Ok(true)
        })
        .unwrap();

        assert_eq!(picked, Some(1));
        assert_eq!(asked, vec![1]);
    }

    #[test]
    fn no_family_when_nothing_presents() {
        let families = [family(vk::QueueFlags::GRAPHICS), family(vk::QueueFlags::COMPUTE)];
        let picked = find_graphics_present_family(&families, |_| Ok(false)).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn present_query_failure_propagates() {
        let families = [family(vk::QueueFlags::GRAPHICS)];
        let err = find_graphics_present_family(&families, |_| {
            Err(VulkanError::Api {
                step: "vkGetPhysicalDeviceSurfaceSupportKHR",
                result: vk::Result::ERROR_SURFACE_LOST_KHR,
            })
        })
        .unwrap_err();

        assert_eq!(err.result(), Some(vk::Result::ERROR_SURFACE_LOST_KHR));
    }

    #[test]
    fn api_error_names_the_step() {
        let err = VulkanError::api("vkCreateDevice")(vk::Result::ERROR_INITIALIZATION_FAILED);
        let message = err.to_string();
        assert!(message.contains("vkCreateDevice"));
        assert!(message.contains("ERROR_INITIALIZATION_FAILED"));
    }
}
