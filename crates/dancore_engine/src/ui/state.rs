//! Editor UI state
//!
//! Toggles driven by the menu bar, toolbar and panel close buttons, plus the
//! values the stub widgets edit between frames. Nothing here is persisted.

use nalgebra::Vector3;

/// Editing context selected in the toolbar combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditMode {
    /// World editing
    #[default]
    Scene,
    /// Interface layout editing
    Ui,
    /// Timeline editing
    Animation,
}

impl EditMode {
    /// Every mode, in combo order
    pub const ALL: [Self; 3] = [Self::Scene, Self::Ui, Self::Animation];

    /// Mode at `index` in combo order
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Position in combo order
    pub const fn index(self) -> usize {
        match self {
            Self::Scene => 0,
            Self::Ui => 1,
            Self::Animation => 2,
        }
    }

    /// Combo label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scene => "Scene",
            Self::Ui => "UI",
            Self::Animation => "Animation",
        }
    }

    /// Labels in combo order
    pub fn labels() -> [&'static str; 3] {
        Self::ALL.map(Self::label)
    }
}

/// Panels that can be closed and reopened from the Window menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    /// Log output
    Console,
    /// Content tree
    FileExplorer,
    /// Selected object properties
    Inspector,
}

impl Panel {
    /// Every closable panel, in Window menu order
    pub const ALL: [Self; 3] = [Self::Console, Self::FileExplorer, Self::Inspector];

    /// Window title and menu label
    pub const fn title(self) -> &'static str {
        match self {
            Self::Console => "Console",
            Self::FileExplorer => "File Explorer",
            Self::Inspector => "Inspector",
        }
    }
}

/// Flat record of UI toggles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    /// Console panel visibility
    pub show_console: bool,
    /// File explorer panel visibility
    pub show_file_explorer: bool,
    /// Inspector panel visibility
    pub show_inspector: bool,
    /// Play/Stop toolbar state
    pub play_mode: bool,
    /// Toolbar edit-mode combo selection
    pub edit_mode: EditMode,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            show_console: true,
            show_file_explorer: true,
            show_inspector: true,
            play_mode: false,
            edit_mode: EditMode::Scene,
        }
    }
}

impl EditorState {
    /// Whether `panel` is drawn
    pub const fn is_visible(&self, panel: Panel) -> bool {
        match panel {
            Panel::Console => self.show_console,
            Panel::FileExplorer => self.show_file_explorer,
            Panel::Inspector => self.show_inspector,
        }
    }

    /// Show or hide `panel`
    pub fn set_visible(&mut self, panel: Panel, visible: bool) {
        *self.visibility_mut(panel) = visible;
    }

    /// Flip the visibility of `panel`
    pub fn toggle(&mut self, panel: Panel) {
        let flag = self.visibility_mut(panel);
        *flag = !*flag;
    }

    /// Mutable visibility flag, for widgets that bind to a `&mut bool`
    pub fn visibility_mut(&mut self, panel: Panel) -> &mut bool {
        match panel {
            Panel::Console => &mut self.show_console,
            Panel::FileExplorer => &mut self.show_file_explorer,
            Panel::Inspector => &mut self.show_inspector,
        }
    }

    /// Enter play mode
    pub fn start_playing(&mut self) {
        if !self.play_mode {
            log::debug!("Play mode started");
        }
        self.play_mode = true;
    }

    /// Leave play mode
    pub fn stop_playing(&mut self) {
        if self.play_mode {
            log::debug!("Play mode stopped");
        }
        self.play_mode = false;
    }
}

/// Longest search text, in bytes
pub const SEARCH_CAPACITY: usize = 127;

/// Toolbar search field contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
}

impl SearchQuery {
    /// Current text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Buffer the text widget edits in place
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Replace the text, truncating to capacity
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.enforce_capacity();
    }

    /// Cut the text back to [`SEARCH_CAPACITY`] bytes on a char boundary
    pub fn enforce_capacity(&mut self) {
        if self.text.len() <= SEARCH_CAPACITY {
            return;
        }
        let mut end = SEARCH_CAPACITY;
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        self.text.truncate(end);
    }
}

/// Inspector scale bounds
pub const SCALE_MIN: f32 = 0.01;
/// Inspector scale bounds
pub const SCALE_MAX: f32 = 100.0;

/// Transform values shown in the inspector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformDraft {
    /// Position
    pub position: Vector3<f32>,
    /// Euler rotation in degrees
    pub rotation: Vector3<f32>,
    /// Per-axis scale
    pub scale: Vector3<f32>,
}

impl Default for TransformDraft {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformDraft {
    /// Keep every scale component within [`SCALE_MIN`, `SCALE_MAX`]
    pub fn clamp_scale(&mut self) {
        self.scale = self.scale.map(|s| {
            if s.is_nan() {
                1.0
            } else {
                s.clamp(SCALE_MIN, SCALE_MAX)
            }
        });
    }
}

/// Inspector physics radio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhysicsMode {
    /// Rigid body
    #[default]
    Rigid,
    /// Voxel body
    Voxel,
}

/// Values the stub widgets edit between frames
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetScratch {
    /// Toolbar search field
    pub search: SearchQuery,
    /// Inspector transform rows
    pub transform: TransformDraft,
    /// Inspector physics radio
    pub physics: PhysicsMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_state_shows_every_panel() {
        let state = EditorState::default();
        assert!(state.show_console);
        assert!(state.show_file_explorer);
        assert!(state.show_inspector);
        assert!(!state.play_mode);
        assert_eq!(state.edit_mode, EditMode::Scene);
    }

    #[test]
    fn panel_helpers_round_trip() {
        let mut state = EditorState::default();
        for panel in Panel::ALL {
            state.set_visible(panel, false);
            assert!(!state.is_visible(panel));
            state.toggle(panel);
            assert!(state.is_visible(panel));
            state.toggle(panel);
            state.toggle(panel);
            assert!(state.is_visible(panel));
        }

        state.set_visible(Panel::Inspector, false);
        assert!(!state.show_inspector);
        assert!(state.show_console);
        assert!(state.show_file_explorer);
    }

    #[test]
    fn play_and_stop() {
        let mut state = EditorState::default();
        state.start_playing();
        assert!(state.play_mode);
        state.start_playing();
        assert!(state.play_mode);
        state.stop_playing();
        assert!(!state.play_mode);
    }

    #[test]
    fn edit_mode_indices() {
        for (i, mode) in EditMode::ALL.iter().enumerate() {
            assert_eq!(EditMode::from_index(i), Some(*mode));
            assert_eq!(mode.index(), i);
        }
        assert_eq!(EditMode::from_index(3), None);
        assert_eq!(EditMode::from_index(usize::MAX), None);
        assert_eq!(EditMode::labels(), ["Scene", "UI", "Animation"]);
    }

    #[test]
    fn search_is_capped_on_char_boundary() {
        let mut query = SearchQuery::default();
        query.set(&"a".repeat(200));
        assert_eq!(query.as_str().len(), SEARCH_CAPACITY);

        // 2-byte chars: 127 would split one, so 126 remain
        query.set(&"é".repeat(100));
        assert_eq!(query.as_str().len(), 126);
        assert!(query.as_str().chars().all(|c| c == 'é'));

        query.set("short");
        assert_eq!(query.as_str(), "short");
    }

    #[test]
    fn scale_clamp_bounds() {
        let mut draft = TransformDraft::default();
        draft.scale = Vector3::new(0.0, 500.0, f32::NAN);
        draft.clamp_scale();
        assert_relative_eq!(draft.scale.x, SCALE_MIN);
        assert_relative_eq!(draft.scale.y, SCALE_MAX);
        assert_relative_eq!(draft.scale.z, 1.0);

        let mut draft = TransformDraft::default();
        draft.clamp_scale();
        assert_relative_eq!(draft.scale, Vector3::new(1.0, 1.0, 1.0));
    }
}
