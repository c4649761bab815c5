//! Docked editor windows
//!
//! Closable panels take their visibility flag by reference; imgui clears it
//! when the window's close button is pressed.

use crate::ui::item_rects::record_window;
use crate::ui::state::{PhysicsMode, TransformDraft, SCALE_MAX, SCALE_MIN};
use imgui::{Drag, Ui, WindowFlags};

const VIEWPORT_PLACEHOLDER_HEIGHT: f32 = 400.0;
const ERROR_COLOR: [f32; 4] = [1.0, 0.3, 0.3, 1.0];

/// Severity of a console line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    /// Informational
    Info,
    /// Warning
    Warn,
    /// Error, drawn in red
    Error,
}

/// Placeholder lines shown until the console has a real log source
pub const CONSOLE_SAMPLE: [(ConsoleLevel, &str); 3] = [
    (ConsoleLevel::Info, "[Info] Editor started."),
    (ConsoleLevel::Warn, "[Warn] Example warning."),
    (ConsoleLevel::Error, "[Error] Example error."),
];

/// Left column of tool buttons
pub fn draw_toolbox(ui: &Ui) {
    ui.window("Toolbox")
        .flags(WindowFlags::NO_COLLAPSE)
        .build(|| {
            ui.text("Tools");
            ui.button("Select");
            ui.button("Move");
            ui.button("Rotate");
            ui.button("Scale");
            ui.separator();
            ui.button("Camera");
            ui.button("Voxel");
            ui.button("Paint");
        });
}

/// Central placeholder where the scene will render
pub fn draw_viewport(ui: &Ui) {
    ui.window("Viewport")
        .flags(WindowFlags::NO_COLLAPSE)
        .build(|| {
            ui.text_disabled("Viewport: Vulkan scene rendering goes here.");
            ui.dummy([0.0, VIEWPORT_PLACEHOLDER_HEIGHT]);
        });
}

/// Project content tree
pub fn draw_file_explorer(ui: &Ui, open: &mut bool) {
    if !*open {
        return;
    }

    ui.window("File Explorer")
        .flags(WindowFlags::NO_COLLAPSE)
        .opened(open)
        .build(|| {
            record_window(ui, "File Explorer");
            ui.text("Content/");
            ui.bullet_text("Scenes/");
            ui.bullet_text("Scripts/  (Lua, Python)");
            ui.bullet_text("UI/      (HTML/CSS/JS)");
            ui.bullet_text("Assets/  (Models, Textures, Audio)");
            ui.bullet_text("Shaders/");
            ui.button("New Scene");
            ui.same_line();
            ui.button("New Script (Lua)");
            ui.same_line();
            ui.button("Import...");
        });
}

/// Properties of the (future) selection
pub fn draw_inspector(
    ui: &Ui,
    open: &mut bool,
    transform: &mut TransformDraft,
    physics: &mut PhysicsMode,
) {
    if !*open {
        return;
    }

    ui.window("Inspector")
        .flags(WindowFlags::NO_COLLAPSE)
        .opened(open)
        .build(|| {
            record_window(ui, "Inspector");
            ui.text("Transform");
            ui.separator();
            Drag::new("Position")
                .speed(0.1)
                .build_array(ui, transform.position.as_mut_slice());
            Drag::new("Rotation")
                .speed(0.5)
                .build_array(ui, transform.rotation.as_mut_slice());
            // Typed input bypasses the drag range
            if Drag::new("Scale")
                .speed(0.01)
                .range(SCALE_MIN, SCALE_MAX)
                .build_array(ui, transform.scale.as_mut_slice())
            {
                transform.clamp_scale();
            }

            ui.separator();
            ui.text("Physics");
            ui.radio_button("Rigid", physics, PhysicsMode::Rigid);
            ui.same_line();
            ui.radio_button("Voxel", physics, PhysicsMode::Voxel);

            ui.separator();
            ui.text("Scripts");
            ui.button("Add Component...");
        });
}

/// Log output
pub fn draw_console(ui: &Ui, open: &mut bool) {
    if !*open {
        return;
    }

    ui.window("Console")
        .flags(WindowFlags::NO_COLLAPSE)
        .opened(open)
        .build(|| {
            record_window(ui, "Console");
            for (level, line) in CONSOLE_SAMPLE {
                match level {
                    ConsoleLevel::Info | ConsoleLevel::Warn => ui.text_disabled(line),
                    ConsoleLevel::Error => ui.text_colored(ERROR_COLOR, line),
                }
            }
            ui.button("Clear");
        });
}
