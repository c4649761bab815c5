//! Command buffer management
//!
//! Command pool ownership plus a recorder that enforces begin/end ordering

use crate::render::vulkan::{VulkanError, VulkanResult};
use ash::{vk, Device};

/// Command pool wrapper with RAII cleanup
pub struct CommandPool {
    device: Device,
    command_pool: vk::CommandPool,
}

impl CommandPool {
    /// Create a pool whose buffers can be reset individually
    pub fn new(device: Device, queue_family_index: u32) -> VulkanResult<Self> {
        let pool_create_info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(queue_family_index);

        let command_pool = unsafe { device.create_command_pool(&pool_create_info, None) }
            .map_err(VulkanError::api("vkCreateCommandPool"))?;

        Ok(Self {
            device,
            command_pool,
        })
    }

    /// Allocate primary command buffers
    pub fn allocate_command_buffers(&self, count: u32) -> VulkanResult<Vec<vk::CommandBuffer>> {
        let alloc_info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(self.command_pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(count);

        unsafe { self.device.allocate_command_buffers(&alloc_info) }
            .map_err(VulkanError::api("vkAllocateCommandBuffers"))
    }

    /// Return buffers to the pool; none of them may be pending
    pub fn free_command_buffers(&self, buffers: &[vk::CommandBuffer]) {
        if buffers.is_empty() {
            return;
        }
        unsafe {
            self.device.free_command_buffers(self.command_pool, buffers);
        }
    }

    /// Get the command pool handle
    pub fn handle(&self) -> vk::CommandPool {
        self.command_pool
    }
}

impl Drop for CommandPool {
    fn drop(&mut self) {
        unsafe {
            // Wait for device to be idle to ensure all command buffers are finished
            let _ = self.device.device_wait_idle();

            // Destroy command pool (automatically frees all command buffers)
            self.device.destroy_command_pool(self.command_pool, None);
        }
    }
}

/// Reject a call made in the wrong recording state
fn check_recording(recording: bool, required: bool, reason: &str) -> VulkanResult<()> {
    if recording == required {
        Ok(())
    } else {
        Err(VulkanError::InvalidOperation {
            reason: reason.to_string(),
        })
    }
}

/// Type-safe command buffer recorder
pub struct CommandRecorder {
    command_buffer: vk::CommandBuffer,
    device: Device,
    recording: bool,
}

impl CommandRecorder {
    /// Create a new command recorder
    pub fn new(command_buffer: vk::CommandBuffer, device: Device) -> Self {
        Self {
            command_buffer,
            device,
            recording: false,
        }
    }

    /// Drop whatever was recorded previously
    pub fn reset(&mut self) -> VulkanResult<&mut Self> {
        check_recording(self.recording, false, "Cannot reset a command buffer while recording")?;

        unsafe {
            self.device
                .reset_command_buffer(self.command_buffer, vk::CommandBufferResetFlags::empty())
        }
        .map_err(VulkanError::api("vkResetCommandBuffer"))?;

        Ok(self)
    }

    /// Begin command recording
    pub fn begin(&mut self) -> VulkanResult<&mut Self> {
        check_recording(self.recording, false, "Command buffer already recording")?;

        let begin_info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        unsafe { self.device.begin_command_buffer(self.command_buffer, &begin_info) }
            .map_err(VulkanError::api("vkBeginCommandBuffer"))?;

        self.recording = true;
        Ok(self)
    }

    /// Begin render pass; it ends when the returned guard drops
    pub fn begin_render_pass(
        &mut self,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_values: &[vk::ClearValue],
    ) -> VulkanResult<ActiveRenderPass<'_>> {
        check_recording(self.recording, true, "Command buffer not recording")?;

        let render_pass_begin = vk::RenderPassBeginInfo::builder()
            .render_pass(render_pass)
            .framebuffer(framebuffer)
            .render_area(render_area)
            .clear_values(clear_values);

        unsafe {
            self.device.cmd_begin_render_pass(
                self.command_buffer,
                &render_pass_begin,
                vk::SubpassContents::INLINE,
            );
        }

        Ok(ActiveRenderPass { recorder: self })
    }

    /// End command recording
    pub fn end(mut self) -> VulkanResult<vk::CommandBuffer> {
        check_recording(self.recording, true, "Command buffer not recording")?;

        unsafe { self.device.end_command_buffer(self.command_buffer) }
            .map_err(VulkanError::api("vkEndCommandBuffer"))?;

        self.recording = false;
        Ok(self.command_buffer)
    }
}

/// Render pass scope; ends the pass on drop
pub struct ActiveRenderPass<'a> {
    recorder: &'a mut CommandRecorder,
}

impl ActiveRenderPass<'_> {
    /// Command buffer to record draws into
    pub fn command_buffer(&self) -> vk::CommandBuffer {
        self.recorder.command_buffer
    }
}

impl Drop for ActiveRenderPass<'_> {
    fn drop(&mut self) {
        unsafe {
            self.recorder
                .device
                .cmd_end_render_pass(self.recorder.command_buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_recording_state_is_an_invalid_operation() {
        assert!(check_recording(true, true, "unused").is_ok());
        assert!(check_recording(false, false, "unused").is_ok());

        let err = check_recording(true, false, "Command buffer already recording")
            .expect_err("begin while recording must fail");
        assert!(matches!(err, VulkanError::InvalidOperation { .. }));
        assert_eq!(err.to_string(), "Invalid operation: Command buffer already recording");
        assert_eq!(err.result(), None);
    }
}
