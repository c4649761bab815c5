//! Main menu bar and the toolbar drawn inline after it

use crate::ui::item_rects::record_item;
use crate::ui::state::{EditMode, EditorState, Panel, SearchQuery};
use imgui::Ui;

/// Toolbar combo width in pixels
const EDIT_MODE_WIDTH: f32 = 120.0;
/// Toolbar search field width in pixels
const SEARCH_WIDTH: f32 = 200.0;
const SEARCH_HINT: &str = "Search assets/objects...";

/// Draw the menu bar with its toolbar; menu items other than Window are stubs
pub fn draw_main_menu_bar(ui: &Ui, state: &mut EditorState, search: &mut SearchQuery) {
    let Some(_menu_bar) = ui.begin_main_menu_bar() else {
        return;
    };

    file_menu(ui);
    edit_menu(ui);
    view_menu(ui);
    project_menu(ui);
    build_menu(ui);
    window_menu(ui, state);
    help_menu(ui);

    draw_toolbar(ui, state, search);
}

fn file_menu(ui: &Ui) {
    let Some(_menu) = ui.begin_menu("File") else {
        return;
    };

    ui.menu_item("New Project...");
    ui.menu_item("Open Project...");
    ui.separator();
    ui.menu_item("New Scene");
    ui.menu_item_config("Save Scene").shortcut("Ctrl+S").build();
    ui.menu_item_config("Save All").shortcut("Ctrl+Alt+S").build();
    ui.separator();
    if let Some(_import) = ui.begin_menu("Import") {
        ui.menu_item("Model (.gltf/.glb)");
        ui.menu_item("Texture (.png/.ktx2)");
        ui.menu_item("Audio (.ogg/.opus)");
        ui.menu_item("Shader (HLSL)");
    }
    if let Some(_export) = ui.begin_menu("Export") {
        ui.menu_item("Package (.pak)...");
        ui.menu_item("Scene as Template...");
    }
    ui.separator();
    ui.menu_item("Show in Finder/Explorer");
    ui.separator();
    ui.menu_item_config("Quit").shortcut("Ctrl+Q").build();
}

fn edit_menu(ui: &Ui) {
    let Some(_menu) = ui.begin_menu("Edit") else {
        return;
    };

    ui.menu_item_config("Undo").shortcut("Ctrl+Z").build();
    ui.menu_item_config("Redo").shortcut("Ctrl+Y").build();
    ui.separator();
    ui.menu_item_config("Duplicate").shortcut("Ctrl+D").build();
    ui.menu_item_config("Delete").shortcut("Del").build();
    ui.separator();
    ui.menu_item("Preferences...");
}

fn view_menu(ui: &Ui) {
    if let Some(_menu) = ui.begin_menu("View") {
        ui.menu_item("Reset Layout to Default");
    }
}

fn project_menu(ui: &Ui) {
    if let Some(_menu) = ui.begin_menu("Project") {
        ui.menu_item("Project Settings...");
    }
}

fn build_menu(ui: &Ui) {
    let Some(_menu) = ui.begin_menu("Build") else {
        return;
    };

    ui.menu_item("Build Project");
    ui.menu_item("Rebuild Project");
    ui.menu_item("Clean Project");
    ui.separator();
    ui.menu_item("Build Settings...");
    ui.menu_item("Build & Run");
}

fn window_menu(ui: &Ui, state: &mut EditorState) {
    let Some(_menu) = ui.begin_menu("Window") else {
        record_item(ui, "MenuBar", "Window");
        return;
    };

    for panel in Panel::ALL {
        let toggled = ui
            .menu_item_config(panel.title())
            .build_with_ref(state.visibility_mut(panel));
        record_item(ui, "Window", panel.title());
        if toggled {
            log::debug!(
                "{} panel {}",
                panel.title(),
                if state.is_visible(panel) { "shown" } else { "hidden" }
            );
        }
    }
}

fn help_menu(ui: &Ui) {
    if let Some(_menu) = ui.begin_menu("Help") {
        ui.menu_item("Docs");
        ui.menu_item("About Dancore");
    }
}

fn draw_toolbar(ui: &Ui, state: &mut EditorState, search: &mut SearchQuery) {
    ui.separator();
    ui.small_button("Undo");
    ui.same_line();
    ui.small_button("Redo");
    ui.same_line();
    ui.separator();

    ui.same_line();
    if state.play_mode {
        let stop = ui.small_button("Stop");
        record_item(ui, "Toolbar", "Stop");
        if stop {
            state.stop_playing();
        }
        ui.same_line();
        ui.small_button("Pause");
    } else {
        let play = ui.small_button("Play");
        record_item(ui, "Toolbar", "Play");
        if play {
            state.start_playing();
        }
    }

    ui.same_line();
    let mut mode_index = state.edit_mode.index();
    ui.set_next_item_width(EDIT_MODE_WIDTH);
    if ui.combo_simple_string("##EditMode", &mut mode_index, &EditMode::labels()) {
        if let Some(mode) = EditMode::from_index(mode_index) {
            state.edit_mode = mode;
        }
    }

    ui.same_line();
    ui.set_next_item_width(SEARCH_WIDTH);
    if ui
        .input_text("##Search", search.buffer_mut())
        .hint(SEARCH_HINT)
        .build()
    {
        search.enforce_capacity();
    }

    ui.same_line();
    if let Some(_menu) = ui.begin_menu("Dancore") {
        ui.menu_item("Settings...");
        ui.menu_item("Reset Layout to Default");
        ui.separator();
        ui.menu_item("About Dancore");
    }
}
