//! Per-frame acquire, record, submit and present
//!
//! Owns everything that depends on the swapchain so a resize can rebuild it
//! in one place. A single frame is in flight at a time, guarded by one fence.

use crate::core::config::VulkanRendererConfig;
use crate::render::vulkan::{
    CommandPool, CommandRecorder, Framebuffer, FrameSync, RenderPass, Swapchain,
    SwapchainRequest, VulkanContext, VulkanError, VulkanResult,
};
use ash::{vk, Device};

/// Whether the swapchain still matches the surface after acquire or present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapchainStatus {
    /// Keep using the swapchain
    Optimal,
    /// Out of date or suboptimal; rebuild before the next frame
    Stale,
}

/// Fold an acquire/present result into a status, keeping real failures as errors
pub fn swapchain_status(
    step: &'static str,
    result: Result<bool, vk::Result>,
) -> VulkanResult<SwapchainStatus> {
    match result {
        Ok(false) => Ok(SwapchainStatus::Optimal),
        Ok(true) | Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(SwapchainStatus::Stale),
        Err(result) => Err(VulkanError::api(step)(result)),
    }
}

/// Swapchain-dependent resources and the frame synchronization
///
/// Fields drop top to bottom: sync objects and command buffers first, the
/// swapchain last.
pub struct FrameLoop {
    sync: FrameSync,
    command_buffers: Vec<vk::CommandBuffer>,
    command_pool: CommandPool,
    framebuffers: Vec<Framebuffer>,
    render_pass: RenderPass,
    swapchain: Swapchain,
    device: Device,
    present_mode: vk::PresentModeKHR,
    min_image_count: u32,
    clear_color: [f32; 4],
    needs_recreate: bool,
}

impl FrameLoop {
    /// Build swapchain, render pass, framebuffers, command buffers and sync objects
    pub fn new(
        context: &VulkanContext,
        config: &VulkanRendererConfig,
        framebuffer_size: (u32, u32),
    ) -> VulkanResult<Self> {
        let device = context.raw_device();
        let present_mode = config.present_mode.as_vk();
        let request = SwapchainRequest {
            framebuffer: extent_of(framebuffer_size),
            present_mode,
            min_image_count: config.min_image_count,
        };

        let swapchain = Swapchain::new(context, &request)?;
        log::info!("Swapchain created: {}", swapchain_summary(&swapchain));

        let render_pass = RenderPass::new_present_pass(device.clone(), swapchain.format().format)?;
        log::info!("Render pass created");

        let framebuffers = Framebuffer::for_each_view(
            &device,
            render_pass.handle(),
            swapchain.image_views(),
            swapchain.extent(),
        )?;
        log::info!("Created {} framebuffers", framebuffers.len());

        let command_pool = CommandPool::new(device.clone(), context.queue_family())?;
        let command_buffers = command_pool.allocate_command_buffers(buffer_count(&framebuffers))?;
        log::info!("Allocated {} command buffers", command_buffers.len());

        let sync = FrameSync::new(&device)?;
        log::info!("Frame synchronization objects created");

        Ok(Self {
            sync,
            command_buffers,
            command_pool,
            framebuffers,
            render_pass,
            swapchain,
            device,
            present_mode,
            min_image_count: config.min_image_count,
            clear_color: config.clear_color,
            needs_recreate: false,
        })
    }

    /// Render pass the UI renderer draws into
    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass.handle()
    }

    /// Pool the UI renderer may use for its one-off uploads
    pub fn command_pool(&self) -> vk::CommandPool {
        self.command_pool.handle()
    }

    /// Current swapchain extent
    pub fn extent(&self) -> vk::Extent2D {
        self.swapchain.extent()
    }

    /// Request a rebuild before the next frame
    pub fn mark_resized(&mut self) {
        self.needs_recreate = true;
    }

    /// Whether a rebuild is pending
    pub fn needs_recreate(&self) -> bool {
        self.needs_recreate
    }

    /// Rebuild the swapchain and everything sized by it
    ///
    /// The render pass is kept: the surface format does not change with size.
    pub fn recreate(&mut self, context: &VulkanContext, framebuffer_size: (u32, u32)) -> VulkanResult<()> {
        unsafe { self.device.device_wait_idle() }.map_err(VulkanError::api("vkDeviceWaitIdle"))?;

        let request = SwapchainRequest {
            framebuffer: extent_of(framebuffer_size),
            present_mode: self.present_mode,
            min_image_count: self.min_image_count,
        };

        self.command_pool.free_command_buffers(&self.command_buffers);
        self.command_buffers.clear();
        self.framebuffers.clear();

        let swapchain = self.swapchain.recreate(context, &request)?;
        if swapchain.format().format != self.swapchain.format().format {
            log::warn!(
                "Surface format changed from {:?} to {:?} on resize",
                self.swapchain.format().format,
                swapchain.format().format
            );
        }
        self.swapchain = swapchain;

        self.framebuffers = Framebuffer::for_each_view(
            &self.device,
            self.render_pass.handle(),
            self.swapchain.image_views(),
            self.swapchain.extent(),
        )?;
        self.command_buffers = self
            .command_pool
            .allocate_command_buffers(buffer_count(&self.framebuffers))?;

        self.needs_recreate = false;
        log::debug!("Swapchain recreated: {}", swapchain_summary(&self.swapchain));
        Ok(())
    }

    /// Wait for the previous frame and acquire the next image
    ///
    /// Returns `None` when the swapchain went stale; the frame is skipped and
    /// the fence stays signalled so the next wait returns at once.
    pub fn begin_frame(&mut self) -> VulkanResult<Option<u32>> {
        self.sync.in_flight.wait(u64::MAX)?;

        let acquired = unsafe {
            self.swapchain.loader().acquire_next_image(
                self.swapchain.handle(),
                u64::MAX,
                self.sync.image_available.handle(),
                vk::Fence::null(),
            )
        };

        let image_index = match acquired {
            Ok((index, suboptimal)) => {
                if suboptimal {
                    self.needs_recreate = true;
                }
                index
            }
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::debug!("Swapchain out of date on acquire");
                self.needs_recreate = true;
                return Ok(None);
            }
            Err(result) => return Err(VulkanError::api("vkAcquireNextImageKHR")(result)),
        };

        self.sync.in_flight.reset()?;
        Ok(Some(image_index))
    }

    /// Record the image's command buffer: clear, then whatever `draw` adds
    pub fn record<E>(
        &self,
        image_index: u32,
        draw: impl FnOnce(vk::CommandBuffer) -> Result<(), E>,
    ) -> Result<(), E>
    where
        E: From<VulkanError>,
    {
        let command_buffer = image_slot(&self.command_buffers, image_index)?;
        let framebuffer = image_slot(&self.framebuffers, image_index)?.handle();

        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: self.clear_color,
            },
        }];
        let render_area = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent: self.extent(),
        };

        let mut recorder = CommandRecorder::new(*command_buffer, self.device.clone());
        recorder.reset()?;
        recorder.begin()?;
        {
            let pass = recorder.begin_render_pass(
                self.render_pass.handle(),
                framebuffer,
                render_area,
                &clear_values,
            )?;
            draw(pass.command_buffer())?;
        }
        recorder.end()?;
        Ok(())
    }

    /// Submit the recorded buffer and present the image
    pub fn submit_and_present(&mut self, context: &VulkanContext, image_index: u32) -> VulkanResult<()> {
        let command_buffer = *image_slot(&self.command_buffers, image_index)?;

        let wait_semaphores = [self.sync.image_available.handle()];
        let wait_stages = [vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT];
        let command_buffers = [command_buffer];
        let signal_semaphores = [self.sync.render_finished.handle()];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(&wait_semaphores)
            .wait_dst_stage_mask(&wait_stages)
            .command_buffers(&command_buffers)
            .signal_semaphores(&signal_semaphores);

        unsafe {
            self.device.queue_submit(
                context.queue(),
                &[submit_info.build()],
                self.sync.in_flight.handle(),
            )
        }
        .map_err(VulkanError::api("vkQueueSubmit"))?;

        let swapchains = [self.swapchain.handle()];
        let image_indices = [image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(&signal_semaphores)
            .swapchains(&swapchains)
            .image_indices(&image_indices);

        let presented = unsafe {
            self.swapchain
                .loader()
                .queue_present(context.queue(), &present_info)
        };

        if swapchain_status("vkQueuePresentKHR", presented)? == SwapchainStatus::Stale {
            log::debug!("Swapchain stale after present");
            self.needs_recreate = true;
        }
        Ok(())
    }
}

/// Entry for `image_index`, or an error when the index is out of range
fn image_slot<T>(items: &[T], image_index: u32) -> VulkanResult<&T> {
    items
        .get(image_index as usize)
        .ok_or_else(|| VulkanError::InvalidOperation {
            reason: format!(
                "Image index {} out of range for {} swapchain images",
                image_index,
                items.len()
            ),
        })
}

fn swapchain_summary(swapchain: &Swapchain) -> String {
    describe_swapchain(
        swapchain.extent(),
        swapchain.image_count(),
        swapchain.present_mode(),
    )
}

fn describe_swapchain(
    extent: vk::Extent2D,
    image_count: usize,
    present_mode: vk::PresentModeKHR,
) -> String {
    format!(
        "{}x{}, {} images, {:?}",
        extent.width, extent.height, image_count, present_mode
    )
}

fn extent_of((width, height): (u32, u32)) -> vk::Extent2D {
    vk::Extent2D { width, height }
}

fn buffer_count(framebuffers: &[Framebuffer]) -> u32 {
    u32::try_from(framebuffers.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_results_map_to_status() {
        assert_eq!(
            swapchain_status("present", Ok(false)).ok(),
            Some(SwapchainStatus::Optimal)
        );
        assert_eq!(
            swapchain_status("present", Ok(true)).ok(),
            Some(SwapchainStatus::Stale)
        );
        assert_eq!(
            swapchain_status("present", Err(vk::Result::ERROR_OUT_OF_DATE_KHR)).ok(),
            Some(SwapchainStatus::Stale)
        );
    }

    #[test]
    fn out_of_range_image_is_an_invalid_operation() {
        let buffers = [vk::CommandBuffer::null(); 2];
        assert!(image_slot(&buffers, 1).is_ok());

        let err = image_slot(&buffers, 2).expect_err("index 2 of 2 must fail");
        assert!(matches!(err, VulkanError::InvalidOperation { .. }));
        assert!(err.to_string().contains("Image index 2 out of range for 2"));
    }

    #[test]
    fn swapchain_description_names_size_count_and_mode() {
        let text = describe_swapchain(
            vk::Extent2D {
                width: 1280,
                height: 720,
            },
            3,
            vk::PresentModeKHR::MAILBOX,
        );
        assert_eq!(text, "1280x720, 3 images, MAILBOX");
    }

    #[test]
    fn device_loss_is_fatal() {
        let err = swapchain_status("vkQueuePresentKHR", Err(vk::Result::ERROR_DEVICE_LOST))
            .expect_err("device loss must not be swallowed");
        assert_eq!(err.result(), Some(vk::Result::ERROR_DEVICE_LOST));
        assert!(err.to_string().contains("vkQueuePresentKHR"));
    }
}
