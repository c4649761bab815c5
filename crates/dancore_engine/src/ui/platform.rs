//! GLFW to imgui input glue
//!
//! Translates window events into imgui io events and fills in the per-frame
//! display metrics.

use glfw::{Action, Modifiers, WindowEvent};
use imgui::{Io, Key, MouseButton};
use std::time::Duration;

/// imgui rejects a zero frame delta
const MIN_DELTA: Duration = Duration::from_micros(1);

/// imgui key for a GLFW key, `None` when imgui has no equivalent
#[allow(clippy::too_many_lines)]
pub const fn map_key(key: glfw::Key) -> Option<Key> {
    use glfw::Key as G;
    let mapped = match key {
        G::Tab => Key::Tab,
        G::Left => Key::LeftArrow,
        G::Right => Key::RightArrow,
        G::Up => Key::UpArrow,
        G::Down => Key::DownArrow,
        G::PageUp => Key::PageUp,
        G::PageDown => Key::PageDown,
        G::Home => Key::Home,
        G::End => Key::End,
        G::Insert => Key::Insert,
        G::Delete => Key::Delete,
        G::Backspace => Key::Backspace,
        G::Space => Key::Space,
        G::Enter => Key::Enter,
        G::Escape => Key::Escape,
        G::KpEnter => Key::KeypadEnter,
        G::LeftControl => Key::LeftCtrl,
        G::LeftShift => Key::LeftShift,
        G::LeftAlt => Key::LeftAlt,
        G::LeftSuper => Key::LeftSuper,
        G::RightControl => Key::RightCtrl,
        G::RightShift => Key::RightShift,
        G::RightAlt => Key::RightAlt,
        G::RightSuper => Key::RightSuper,
        G::Apostrophe => Key::Apostrophe,
        G::Comma => Key::Comma,
        G::Minus => Key::Minus,
        G::Period => Key::Period,
        G::Slash => Key::Slash,
        G::Semicolon => Key::Semicolon,
        G::Equal => Key::Equal,
        G::LeftBracket => Key::LeftBracket,
        G::Backslash => Key::Backslash,
        G::RightBracket => Key::RightBracket,
        G::GraveAccent => Key::GraveAccent,
        G::Num0 => Key::Alpha0,
        G::Num1 => Key::Alpha1,
        G::Num2 => Key::Alpha2,
        G::Num3 => Key::Alpha3,
        G::Num4 => Key::Alpha4,
        G::Num5 => Key::Alpha5,
        G::Num6 => Key::Alpha6,
        G::Num7 => Key::Alpha7,
        G::Num8 => Key::Alpha8,
        G::Num9 => Key::Alpha9,
        G::A => Key::A,
        G::B => Key::B,
        G::C => Key::C,
        G::D => Key::D,
        G::E => Key::E,
        G::F => Key::F,
        G::G => Key::G,
        G::H => Key::H,
        G::I => Key::I,
        G::J => Key::J,
        G::K => Key::K,
        G::L => Key::L,
        G::M => Key::M,
        G::N => Key::N,
        G::O => Key::O,
        G::P => Key::P,
        G::Q => Key::Q,
        G::R => Key::R,
        G::S => Key::S,
        G::T => Key::T,
        G::U => Key::U,
        G::V => Key::V,
        G::W => Key::W,
        G::X => Key::X,
        G::Y => Key::Y,
        G::Z => Key::Z,
        G::F1 => Key::F1,
        G::F2 => Key::F2,
        G::F3 => Key::F3,
        G::F4 => Key::F4,
        G::F5 => Key::F5,
        G::F6 => Key::F6,
        G::F7 => Key::F7,
        G::F8 => Key::F8,
        G::F9 => Key::F9,
        G::F10 => Key::F10,
        G::F11 => Key::F11,
        G::F12 => Key::F12,
        _ => return None,
    };
    Some(mapped)
}

/// imgui button for a GLFW mouse button
pub const fn map_mouse_button(button: glfw::MouseButton) -> Option<MouseButton> {
    match button {
        glfw::MouseButton::Button1 => Some(MouseButton::Left),
        glfw::MouseButton::Button2 => Some(MouseButton::Right),
        glfw::MouseButton::Button3 => Some(MouseButton::Middle),
        glfw::MouseButton::Button4 => Some(MouseButton::Extra1),
        glfw::MouseButton::Button5 => Some(MouseButton::Extra2),
        _ => None,
    }
}

fn update_modifiers(io: &mut Io, mods: Modifiers) {
    io.add_key_event(Key::ModCtrl, mods.contains(Modifiers::Control));
    io.add_key_event(Key::ModShift, mods.contains(Modifiers::Shift));
    io.add_key_event(Key::ModAlt, mods.contains(Modifiers::Alt));
    io.add_key_event(Key::ModSuper, mods.contains(Modifiers::Super));
}

/// Release every modifier and mouse button; GLFW sends no release for
/// input that ends while another window has focus
fn release_all(io: &mut Io) {
    update_modifiers(io, Modifiers::empty());
    for button in [
        MouseButton::Left,
        MouseButton::Right,
        MouseButton::Middle,
        MouseButton::Extra1,
        MouseButton::Extra2,
    ] {
        io.add_mouse_button_event(button, false);
    }
}

/// Queue `event` on imgui's input; events imgui does not use are ignored
#[allow(clippy::cast_possible_truncation)]
pub fn handle_event(io: &mut Io, event: &WindowEvent) {
    match *event {
        WindowEvent::Key(key, _scancode, action, mods) => {
            update_modifiers(io, mods);
            if let Some(key) = map_key(key) {
                io.add_key_event(key, action != Action::Release);
            }
        }
        WindowEvent::Char(c) => io.add_input_character(c),
        WindowEvent::CursorPos(x, y) => io.add_mouse_pos_event([x as f32, y as f32]),
        WindowEvent::MouseButton(button, action, mods) => {
            update_modifiers(io, mods);
            if let Some(button) = map_mouse_button(button) {
                io.add_mouse_button_event(button, action != Action::Release);
            }
        }
        WindowEvent::Scroll(x, y) => io.add_mouse_wheel_event([x as f32, y as f32]),
        WindowEvent::Focus(false) => release_all(io),
        _ => {}
    }
}

/// Framebuffer pixels per window unit, 1.0 while the window has no area
#[allow(clippy::cast_precision_loss)]
pub fn framebuffer_scale(window_size: (u32, u32), framebuffer_size: (u32, u32)) -> [f32; 2] {
    let axis = |window: u32, framebuffer: u32| {
        if window == 0 {
            1.0
        } else {
            framebuffer as f32 / window as f32
        }
    };
    [
        axis(window_size.0, framebuffer_size.0),
        axis(window_size.1, framebuffer_size.1),
    ]
}

/// Set display size, framebuffer scale and delta time before `new_frame`
#[allow(clippy::cast_precision_loss)]
pub fn prepare_frame(
    io: &mut Io,
    window_size: (u32, u32),
    framebuffer_size: (u32, u32),
    delta: Duration,
) {
    io.display_size = [window_size.0 as f32, window_size.1 as f32];
    io.display_framebuffer_scale = framebuffer_scale(window_size, framebuffer_size);
    io.update_delta_time(delta.max(MIN_DELTA));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::test_support::{headless_context, imgui_lock};
    use approx::assert_relative_eq;

    #[test]
    fn navigation_and_letters_map() {
        assert_eq!(map_key(glfw::Key::Left), Some(Key::LeftArrow));
        assert_eq!(map_key(glfw::Key::Enter), Some(Key::Enter));
        assert_eq!(map_key(glfw::Key::Num0), Some(Key::Alpha0));
        assert_eq!(map_key(glfw::Key::S), Some(Key::S));
        assert_eq!(map_key(glfw::Key::LeftControl), Some(Key::LeftCtrl));
        assert_eq!(map_key(glfw::Key::F12), Some(Key::F12));
    }

    #[test]
    fn unmapped_keys_are_none() {
        assert_eq!(map_key(glfw::Key::Unknown), None);
        assert_eq!(map_key(glfw::Key::F25), None);
    }

    #[test]
    fn mouse_buttons_map() {
        assert_eq!(map_mouse_button(glfw::MouseButton::Button1), Some(MouseButton::Left));
        assert_eq!(map_mouse_button(glfw::MouseButton::Button2), Some(MouseButton::Right));
        assert_eq!(map_mouse_button(glfw::MouseButton::Button3), Some(MouseButton::Middle));
        assert_eq!(map_mouse_button(glfw::MouseButton::Button8), None);
    }

    #[test]
    fn framebuffer_scale_handles_hidpi_and_zero() {
        assert_eq!(framebuffer_scale((1280, 720), (2560, 1440)), [2.0, 2.0]);
        assert_eq!(framebuffer_scale((0, 0), (0, 0)), [1.0, 1.0]);
    }

    #[test]
    fn prepare_frame_sets_display_metrics() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);

        prepare_frame(ctx.io_mut(), (800, 600), (1600, 1200), Duration::ZERO);

        let io = ctx.io();
        assert_eq!(io.display_size, [800.0, 600.0]);
        assert_eq!(io.display_framebuffer_scale, [2.0, 2.0]);
        assert!(io.delta_time > 0.0);

        prepare_frame(ctx.io_mut(), (800, 600), (800, 600), Duration::from_millis(16));
        assert_relative_eq!(ctx.io().delta_time, 0.016, epsilon = 1e-6);
    }

    #[test]
    fn events_reach_imgui_after_new_frame() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);

        let io = ctx.io_mut();
        handle_event(io, &WindowEvent::CursorPos(10.0, 20.0));
        handle_event(
            io,
            &WindowEvent::MouseButton(
                glfw::MouseButton::Button1,
                Action::Press,
                Modifiers::empty(),
            ),
        );
        handle_event(io, &WindowEvent::Focus(true));

        let ui = ctx.new_frame();
        assert_eq!(ui.io().mouse_pos, [10.0, 20.0]);
        assert!(ui.io().mouse_down[0]);
        ctx.render();
    }

    #[test]
    fn losing_focus_releases_held_buttons() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);

        handle_event(
            ctx.io_mut(),
            &WindowEvent::MouseButton(
                glfw::MouseButton::Button2,
                Action::Press,
                Modifiers::Control,
            ),
        );
        let ui = ctx.new_frame();
        assert!(ui.io().mouse_down[1]);
        ctx.render();

        handle_event(ctx.io_mut(), &WindowEvent::Focus(false));
        // Queued releases may trickle over more than one frame
        for _ in 0..3 {
            ctx.new_frame();
            ctx.render();
        }
        assert!(!ctx.io().mouse_down[1]);
    }
}
