//! Headless imgui helpers for tests

use imgui::{ConfigFlags, Context};
use std::sync::{Mutex, MutexGuard, PoisonError};

static IMGUI: Mutex<()> = Mutex::new(());

/// imgui allows one live context per process; hold this while one exists
pub fn imgui_lock() -> MutexGuard<'static, ()> {
    IMGUI.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Context with a built font atlas and a fixed display, no ini file
pub fn headless_context(docking: bool) -> Context {
    let mut ctx = Context::create();
    ctx.set_ini_filename(None);
    if docking {
        ctx.io_mut().config_flags |= ConfigFlags::DOCKING_ENABLE;
    }
    ctx.io_mut().display_size = [1280.0, 720.0];
    ctx.io_mut().delta_time = 1.0 / 60.0;
    ctx.fonts().build_rgba32_texture();
    ctx
}
