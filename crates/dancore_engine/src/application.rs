//! Editor application lifecycle
//!
//! [`EditorApp`] runs the bootstrap in order, drives the frame loop until the
//! window closes, and tears everything down in reverse.

use crate::config::ConfigError;
use crate::core::config::EditorConfig;
use crate::foundation::time::Timer;
use crate::render::frame::FrameLoop;
use crate::render::vulkan::{VulkanContext, VulkanError};
use crate::render::window::{Window, WindowError};
use crate::ui::{self, platform, EditorUi, UiError, UiRenderer};
use glfw::WindowEvent;
use thiserror::Error;

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Window or GLFW failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Vulkan bootstrap or frame failure
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] VulkanError),

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// UI renderer failure
    #[error("UI error: {0}")]
    Ui(#[from] UiError),
}

/// The running editor
///
/// Fields drop top to bottom, which is the reverse of creation: UI renderer,
/// swapchain resources, imgui context, device and instance, then the window.
pub struct EditorApp {
    ui_renderer: UiRenderer,
    frame: FrameLoop,
    imgui: imgui::Context,
    editor: EditorUi,
    timer: Timer,
    context: VulkanContext,
    window: Window,
}

impl EditorApp {
    /// Open the window and bring up Vulkan and the UI
    pub fn new(config: &EditorConfig) -> Result<Self, AppError> {
        config.validate()?;
        log::info!("Starting Dancore Editor");

        let mut window = Window::new(&config.window)?;

        let context = VulkanContext::new(&mut window, &config.renderer)?;
        log::info!("Vulkan device ready");

        let frame = FrameLoop::new(&context, &config.renderer, window.get_framebuffer_size())?;

        let mut imgui = ui::create_context(&config.ui);
        let ui_renderer = UiRenderer::new(&context, &frame, &mut imgui)?;
        let editor = EditorUi::new(config.ui.docking);

        log::info!("Editor initialized");
        Ok(Self {
            ui_renderer,
            frame,
            imgui,
            editor,
            timer: Timer::new(),
            context,
            window,
        })
    }

    /// Run until the window is closed
    pub fn run(&mut self) -> Result<(), AppError> {
        while !self.window.should_close() {
            self.window.poll_events();
            self.process_events();

            while self.window.is_minimized() && !self.window.should_close() {
                self.window.wait_events();
                self.process_events();
            }
            if self.window.should_close() {
                break;
            }

            if self.frame.needs_recreate() {
                self.frame
                    .recreate(&self.context, self.window.get_framebuffer_size())?;
            }

            self.draw_frame()?;
        }

        log::info!(
            "Closing editor after {} frames ({:.1} fps average)",
            self.timer.frame_count(),
            self.timer.average_fps()
        );
        self.context.device.wait_idle()?;
        Ok(())
    }

    fn process_events(&mut self) {
        for event in self.window.flush_events() {
            match event {
                WindowEvent::FramebufferSize(width, height) => {
                    log::debug!("Framebuffer resized to {}x{}", width, height);
                    self.frame.mark_resized();
                }
                WindowEvent::Close => self.window.set_should_close(true),
                _ => {}
            }
            platform::handle_event(self.imgui.io_mut(), &event);
        }
    }

    fn draw_frame(&mut self) -> Result<(), AppError> {
        let Some(image_index) = self.frame.begin_frame()? else {
            return Ok(());
        };

        self.timer.update();
        platform::prepare_frame(
            self.imgui.io_mut(),
            self.window.get_size(),
            self.window.get_framebuffer_size(),
            self.timer.delta(),
        );

        let ui = self.imgui.new_frame();
        self.editor.draw(ui);
        let draw_data = self.imgui.render();

        let ui_renderer = &mut self.ui_renderer;
        self.frame.record(image_index, |command_buffer| {
            ui_renderer
                .draw(command_buffer, draw_data)
                .map_err(AppError::from)
        })?;

        self.frame.submit_and_present(&self.context, image_index)?;
        Ok(())
    }
}

impl Drop for EditorApp {
    fn drop(&mut self) {
        if let Err(e) = self.context.device.wait_idle() {
            log::warn!("Device did not go idle before teardown: {}", e);
        }
        log::info!("Editor shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_their_subsystem() {
        let err = AppError::from(VulkanError::api("vkCreateDevice")(
            ash::vk::Result::ERROR_INITIALIZATION_FAILED,
        ));
        let text = err.to_string();
        assert!(text.starts_with("Vulkan error"));
        assert!(text.contains("vkCreateDevice"));

        let err = AppError::from(WindowError::CreationFailed);
        assert_eq!(err.to_string(), "Window error: Window creation failed");
    }

    #[test]
    fn invalid_config_fails_before_any_window() {
        let mut config = EditorConfig::default();
        config.window.width = 0;
        assert!(matches!(EditorApp::new(&config), Err(AppError::Config(_))));
    }
}
