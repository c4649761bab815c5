//! imgui context setup and the Vulkan draw-data renderer

use crate::core::config::UiConfig;
use crate::render::frame::FrameLoop;
use crate::render::vulkan::VulkanContext;
use ash::vk;
use imgui::{ConfigFlags, Context, DrawData, FontConfig, FontSource};
use imgui_rs_vulkan_renderer::{Options, Renderer, RendererError};
use std::path::PathBuf;
use thiserror::Error;

/// UI errors
#[derive(Error, Debug)]
pub enum UiError {
    /// The imgui Vulkan renderer failed
    #[error("UI renderer error: {0}")]
    Renderer(#[from] RendererError),
}

/// Create the imgui context: docking, dark style, configured font size and ini file
pub fn create_context(config: &UiConfig) -> Context {
    let mut imgui = Context::create();

    let ini = (!config.ini_file.is_empty()).then(|| PathBuf::from(&config.ini_file));
    imgui.set_ini_filename(ini);

    if config.docking {
        imgui.io_mut().config_flags |= ConfigFlags::DOCKING_ENABLE;
    }
    imgui.style_mut().use_dark_colors();

    imgui.fonts().add_font(&[FontSource::DefaultFontData {
        config: Some(FontConfig {
            size_pixels: config.font_size,
            ..FontConfig::default()
        }),
    }]);

    log::debug!(
        "imgui context ready (docking: {}, font size: {})",
        config.docking,
        config.font_size
    );
    imgui
}

/// imgui renderer recording into the frame loop's render pass
///
/// Owns its pipeline, descriptor pool and font texture; they are released on drop.
pub struct UiRenderer {
    renderer: Renderer,
}

impl UiRenderer {
    /// Build pipelines and upload the font atlas
    pub fn new(
        context: &VulkanContext,
        frame: &FrameLoop,
        imgui: &mut Context,
    ) -> Result<Self, UiError> {
        let renderer = Renderer::with_default_allocator(
            context.instance(),
            context.physical_device.device,
            context.raw_device(),
            context.queue(),
            frame.command_pool(),
            frame.render_pass(),
            imgui,
            Some(Options {
                in_flight_frames: 1,
                ..Default::default()
            }),
        )?;

        log::info!("UI renderer initialized");
        Ok(Self { renderer })
    }

    /// Record the draw data into an active render pass
    pub fn draw(&mut self, command_buffer: vk::CommandBuffer, draw_data: &DrawData) -> Result<(), UiError> {
        self.renderer.cmd_draw(command_buffer, draw_data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::imgui_lock;

    #[test]
    fn context_follows_config() {
        let _guard = imgui_lock();
        let config = UiConfig {
            ini_file: String::new(),
            ..UiConfig::default()
        };
        let ctx = create_context(&config);

        assert!(ctx.io().config_flags.contains(ConfigFlags::DOCKING_ENABLE));
        assert!(ctx.ini_filename().is_none());
    }

    #[test]
    fn docking_can_be_disabled() {
        let _guard = imgui_lock();
        let config = UiConfig {
            docking: false,
            ini_file: String::new(),
            ..UiConfig::default()
        };
        let ctx = create_context(&config);

        assert!(!ctx.io().config_flags.contains(ConfigFlags::DOCKING_ENABLE));
    }
}
