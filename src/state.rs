use crate::view::filter::FilterMode;
use crate::view::{ViewId, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
}

impl ThemeKind {
    pub fn toggle(self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::Dark,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThemeKind::Dark => "dark",
            ThemeKind::Light => "light",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "light" => ThemeKind::Light,
            _ => ThemeKind::Dark,
        }
    }
}

/// Everything the user can change, for the life of the application.
#[derive(Debug, Clone)]
pub struct AppState {
    auto_update: bool,
    theme: ThemeKind,
    active_view: ViewId,
    views: [ViewState; 4],
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(true, ThemeKind::Dark, ViewId::Processes)
    }
}

impl AppState {
    pub fn new(auto_update: bool, theme: ThemeKind, active_view: ViewId) -> Self {
        AppState {
            auto_update,
            theme,
            active_view,
            views: Default::default(),
        }
    }

    pub fn auto_update(&self) -> bool {
        self.auto_update
    }

    /// Flips pause and returns the new `auto_update` value.
    pub fn toggle_pause(&mut self) -> bool {
        self.auto_update = !self.auto_update;
        self.auto_update
    }

    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> ThemeKind {
        self.theme = self.theme.toggle();
        self.theme
    }

    pub fn active_view(&self) -> ViewId {
        self.active_view
    }

    pub fn set_active_view(&mut self, view: ViewId) {
        self.active_view = view;
    }

    pub fn view(&self, view: ViewId) -> &ViewState {
        &self.views[view.index()]
    }

    pub fn view_mut(&mut self, view: ViewId) -> &mut ViewState {
        &mut self.views[view.index()]
    }

    pub fn set_filter(&mut self, view: ViewId, mode: FilterMode, query: impl Into<String>) {
        let state = self.view_mut(view);
        state.filter_mode = view.supported_filter_mode(mode);
        state.filter_query = query.into();
    }
}
