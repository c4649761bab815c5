//! Editor layout
//!
//! [`EditorUi`] issues one frame of immediate-mode calls: dockspace, menu
//! bar with toolbar, then the docked windows. It never touches the GPU.

use crate::ui::menu;
use crate::ui::panels;
use crate::ui::state::{EditorState, WidgetScratch};
use imgui::Ui;

/// Editor state plus the values its widgets edit
#[derive(Debug, Clone, Default)]
pub struct EditorUi {
    state: EditorState,
    scratch: WidgetScratch,
    docking: bool,
}

impl EditorUi {
    /// Create the editor layout; `docking` must match the context's config flags
    pub fn new(docking: bool) -> Self {
        Self {
            state: EditorState::default(),
            scratch: WidgetScratch::default(),
            docking,
        }
    }

    /// Current toggles
    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Mutable toggles
    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    /// Widget values
    pub fn scratch(&self) -> &WidgetScratch {
        &self.scratch
    }

    /// Draw one frame of the editor
    pub fn draw(&mut self, ui: &Ui) {
        if self.docking {
            ui.dockspace_over_main_viewport();
        }

        menu::draw_main_menu_bar(ui, &mut self.state, &mut self.scratch.search);

        panels::draw_toolbox(ui);
        panels::draw_viewport(ui);
        panels::draw_file_explorer(ui, &mut self.state.show_file_explorer);
        panels::draw_inspector(
            ui,
            &mut self.state.show_inspector,
            &mut self.scratch.transform,
            &mut self.scratch.physics,
        );
        panels::draw_console(ui, &mut self.state.show_console);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::item_rects::{item_rect, window_rect};
    use crate::ui::state::{EditMode, Panel};
    use crate::ui::test_support::{headless_context, imgui_lock};
    use imgui::{Context, MouseButton};

    /// Frames for new windows and popups to finish auto-fitting
    const SETTLE_FRAMES: usize = 3;

    fn run_frames(ctx: &mut Context, editor: &mut EditorUi, frames: usize) {
        for _ in 0..frames {
            let ui = ctx.new_frame();
            editor.draw(ui);
            ctx.render();
        }
    }

    /// Move, press and release on separate frames, as a real click arrives
    fn click(ctx: &mut Context, editor: &mut EditorUi, pos: [f32; 2]) {
        ctx.io_mut().add_mouse_pos_event(pos);
        run_frames(ctx, editor, 1);
        ctx.io_mut().add_mouse_button_event(MouseButton::Left, true);
        run_frames(ctx, editor, 1);
        ctx.io_mut().add_mouse_button_event(MouseButton::Left, false);
        run_frames(ctx, editor, 1);
    }

    fn click_item(
        ctx: &mut Context,
        editor: &mut EditorUi,
        scope: &'static str,
        name: &'static str,
    ) {
        let rect =
            item_rect(scope, name).unwrap_or_else(|| panic!("{scope}/{name} was not drawn"));
        click(ctx, editor, rect.center());
    }

    fn toggle_from_window_menu(ctx: &mut Context, editor: &mut EditorUi, panel: Panel) {
        click_item(ctx, editor, "MenuBar", "Window");
        run_frames(ctx, editor, SETTLE_FRAMES);
        click_item(ctx, editor, "Window", panel.title());
        run_frames(ctx, editor, SETTLE_FRAMES);
    }

    #[test]
    fn idle_frames_leave_state_untouched() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(true);
        let mut editor = EditorUi::new(true);

        run_frames(&mut ctx, &mut editor, 5);

        assert_eq!(editor.state(), &EditorState::default());
        assert_eq!(editor.scratch(), &WidgetScratch::default());
    }

    #[test]
    fn draws_without_docking() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);
        let mut editor = EditorUi::new(false);

        run_frames(&mut ctx, &mut editor, 3);

        assert_eq!(editor.state(), &EditorState::default());
    }

    #[test]
    fn hidden_panels_stay_hidden() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(true);
        let mut editor = EditorUi::new(true);
        for panel in Panel::ALL {
            editor.state_mut().set_visible(panel, false);
        }

        run_frames(&mut ctx, &mut editor, 3);

        for panel in Panel::ALL {
            assert!(!editor.state().is_visible(panel));
        }
    }

    #[test]
    fn play_mode_layout_draws() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(true);
        let mut editor = EditorUi::new(true);
        editor.state_mut().start_playing();
        editor.state_mut().edit_mode = EditMode::Animation;

        run_frames(&mut ctx, &mut editor, 3);

        assert!(editor.state().play_mode);
        assert_eq!(editor.state().edit_mode, EditMode::Animation);
    }

    #[test]
    fn play_and_stop_buttons_toggle_play_mode() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);
        let mut editor = EditorUi::new(false);
        run_frames(&mut ctx, &mut editor, SETTLE_FRAMES);

        click_item(&mut ctx, &mut editor, "Toolbar", "Play");
        assert!(editor.state().play_mode);

        run_frames(&mut ctx, &mut editor, 1);
        click_item(&mut ctx, &mut editor, "Toolbar", "Stop");
        assert!(!editor.state().play_mode);
    }

    #[test]
    fn window_menu_toggles_panel_visibility() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);
        let mut editor = EditorUi::new(false);
        run_frames(&mut ctx, &mut editor, SETTLE_FRAMES);

        toggle_from_window_menu(&mut ctx, &mut editor, Panel::Console);
        assert!(!editor.state().show_console);
        assert!(editor.state().show_file_explorer);
        assert!(editor.state().show_inspector);

        toggle_from_window_menu(&mut ctx, &mut editor, Panel::Console);
        assert!(editor.state().show_console);
    }

    #[test]
    fn close_button_hides_panel() {
        let _guard = imgui_lock();
        let mut ctx = headless_context(false);
        let mut editor = EditorUi::new(false);
        let font_size = {
            let ui = ctx.new_frame();
            let size = ui.current_font_size();
            editor.draw(ui);
            ctx.render();
            size
        };
        run_frames(&mut ctx, &mut editor, SETTLE_FRAMES);

        // Console appears last so it sits on top of the other new windows
        let rect = window_rect("Console").expect("Console was not drawn");
        let padding = ctx.style().frame_padding;
        let close = [
            rect.max[0] - padding[0] - font_size * 0.5,
            rect.min[1] + padding[1] + font_size * 0.5,
        ];
        click(&mut ctx, &mut editor, close);

        assert!(!editor.state().show_console);
        assert!(editor.state().show_file_explorer);
        assert!(editor.state().show_inspector);
    }
}
