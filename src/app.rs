use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use crate::action::{Action, Movement};
use crate::config::{Config, parse_key};
use crate::executor::{self, PendingAction};
use crate::scheduler::Scheduler;
use crate::state::{AppState, ThemeKind};
use crate::surface::Screen;
use crate::system::collector::{Collector, ProcessSource};
use crate::system::kill::ProcessControl;
use crate::system::platform::{Capabilities, NativeServices};
use crate::system::services::ServiceBackend;
use crate::view::{SelectionKey, ViewId, ViewState};

const STATUS_TTL: Duration = Duration::from_secs(3);
const DEFAULT_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Help,
    Confirm(PendingAction),
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub terminate: KeyCode,
    pub filter: KeyCode,
    pub filter_mode: KeyCode,
    pub pause: KeyCode,
    pub theme: KeyCode,
    pub refresh: KeyCode,
    pub help: KeyCode,
    pub start_service: KeyCode,
    pub stop_service: KeyCode,
    pub restart_service: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            terminate: parse_key(&kb.terminate).unwrap_or(KeyCode::Char('k')),
            filter: parse_key(&kb.filter).unwrap_or(KeyCode::Char('/')),
            filter_mode: parse_key(&kb.filter_mode).unwrap_or(KeyCode::Char('m')),
            pause: parse_key(&kb.pause).unwrap_or(KeyCode::Char('p')),
            theme: parse_key(&kb.theme).unwrap_or(KeyCode::Char('t')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            start_service: parse_key(&kb.start_service).unwrap_or(KeyCode::Char('s')),
            stop_service: parse_key(&kb.stop_service).unwrap_or(KeyCode::Char('x')),
            restart_service: parse_key(&kb.restart_service).unwrap_or(KeyCode::Char('R')),
        }
    }

    /// Returns (key_label, description) pairs for the help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        vec![
            ("Tab/1-4".to_string(), "Switch view"),
            ("↑↓ PgUp PgDn".to_string(), "Move selection"),
            ("F1-F6".to_string(), "Sort by column (again to reverse)"),
            (key_label(self.filter), "Edit filter"),
            (key_label(self.filter_mode), "Cycle filter mode"),
            (key_label(self.terminate), "Terminate process"),
            (key_label(self.start_service), "Start service"),
            (key_label(self.stop_service), "Stop service"),
            (key_label(self.restart_service), "Restart service"),
            (key_label(self.pause), "Pause/resume updates"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.theme), "Toggle theme"),
            (key_label(self.help), "Toggle help"),
            (key_label(self.quit), "Quit"),
            ("Ctrl+C".to_string(), "Quit (always)"),
        ]
    }
}

pub(crate) fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    created: Instant,
}

/// Where the last frame put the table, for mouse hit testing.
#[derive(Debug, Clone, Default)]
pub struct TableGeometry {
    pub header: Option<Rect>,
    pub body: Option<Rect>,
    pub columns: Vec<Rect>,
    pub offset: usize,
}

/// The controller: owns the state, the scheduler and the rendered tables,
/// and turns user intents into changes.
pub struct App<P = Collector, S = NativeServices> {
    pub running: bool,
    pub state: AppState,
    pub scheduler: Scheduler<P, S>,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub status_message: Option<StatusMessage>,
    pub table: TableGeometry,
    pub keybinds: ResolvedKeybinds,
    terminate_timeout: Duration,
}

impl App<Collector, NativeServices> {
    pub fn from_config(config: &Config) -> Self {
        let capabilities = Capabilities::detect();
        tracing::info!(?capabilities, "platform capabilities");
        let scheduler = Scheduler::new(
            Collector::new(),
            NativeServices::default(),
            capabilities,
            config.general.service_refresh_every,
        );
        App::new(config, scheduler)
    }
}

impl<P, S> App<P, S> {
    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.input_mode {
            InputMode::Confirm(action) => Some(action),
            _ => None,
        }
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    pub fn active_view(&self) -> ViewId {
        self.state.active_view()
    }

    pub fn theme(&self) -> ThemeKind {
        self.state.theme()
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error,
            created: Instant::now(),
        });
    }

    /// Drops the status message once it has been shown long enough.
    pub fn expire_status(&mut self) {
        if let Some(msg) = &self.status_message
            && msg.created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    /// The selected process in a process-backed view, as (pid, name).
    pub fn selected_process(&self) -> Option<(u32, String)> {
        let view = self.active_view();
        let name_column = match view {
            ViewId::Processes => 1,
            ViewId::Details => 0,
            _ => return None,
        };
        let row = self.screen.table(view).selected_row()?;
        match self.screen.selected_key(view)? {
            SelectionKey::Pid(pid) => Some((pid, row.cell(name_column).to_string())),
            SelectionKey::Name(_) => None,
        }
    }

    pub fn selected_service(&self) -> Option<String> {
        if self.active_view() != ViewId::Services {
            return None;
        }
        match self.screen.selected_key(ViewId::Services)? {
            SelectionKey::Name(name) => Some(name),
            SelectionKey::Pid(_) => None,
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Filter => self.map_key_filter(key),
            InputMode::Help => self.map_key_help(key),
            InputMode::Confirm(_) => map_key_confirm(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;
        let view = self.active_view();

        // Navigation is hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Move(Movement::Up),
            KeyCode::Down => return Action::Move(Movement::Down),
            KeyCode::PageUp => return Action::Move(Movement::PageUp),
            KeyCode::PageDown => return Action::Move(Movement::PageDown),
            KeyCode::Home => return Action::Move(Movement::Home),
            KeyCode::End => return Action::Move(Movement::End),
            KeyCode::Tab => return Action::NextView,
            KeyCode::BackTab => return Action::PrevView,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                return Action::SwitchView(ViewId::ALL[index]);
            }
            KeyCode::F(n) if (n as usize) <= view.layout().columns.len() && n > 0 => {
                return Action::SortBy {
                    view,
                    column: n as usize - 1,
                };
            }
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.filter {
            return if view.is_filterable() {
                Action::EnterFilterMode
            } else {
                Action::None
            };
        }
        if code == kb.filter_mode {
            return if view.is_filterable() {
                Action::CycleFilterMode
            } else {
                Action::None
            };
        }
        if code == kb.terminate {
            return match self.selected_process() {
                Some((pid, name)) => Action::Request(PendingAction::Terminate { pid, name }),
                None => Action::None,
            };
        }
        if code == kb.start_service {
            return self.service_request(PendingAction::StartService);
        }
        if code == kb.stop_service {
            return self.service_request(PendingAction::StopService);
        }
        if code == kb.restart_service {
            return self.service_request(PendingAction::RestartService);
        }
        if code == kb.pause {
            return Action::TogglePause;
        }
        if code == kb.theme {
            return Action::ToggleTheme;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }

        Action::None
    }

    fn service_request(&self, make: fn(String) -> PendingAction) -> Action {
        match self.selected_service() {
            Some(name) => Action::Request(make(name)),
            None => Action::None,
        }
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    fn map_key_filter(&self, key: KeyEvent) -> Action {
        let current = &self.state.view(self.active_view()).filter_query;
        match key.code {
            KeyCode::Esc => Action::ClearFilter,
            KeyCode::Enter => Action::ExitFilterMode,
            KeyCode::Backspace => {
                let mut text = current.clone();
                text.pop();
                Action::UpdateFilter(text)
            }
            KeyCode::Char(c) => {
                let mut text = current.clone();
                text.push(c);
                Action::UpdateFilter(text)
            }
            _ => Action::None,
        }
    }

    /// Maps a left click to header sort or row selection.
    pub fn map_click(&self, col: u16, row: u16) -> Action {
        let view = self.active_view();
        if let Some(header) = self.table.header
            && contains(header, col, row)
        {
            return match self.table.columns.iter().position(|c| col >= c.x && col < c.right()) {
                Some(column) => Action::SortBy { view, column },
                None => Action::None,
            };
        }
        Action::SelectAt(col, row)
    }
}

fn map_key_confirm(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Confirm,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.right() && row >= area.y && row < area.bottom()
}

impl<P, S> App<P, S>
where
    P: ProcessSource + ProcessControl,
    S: ServiceBackend,
{
    /// Builds the controller and runs the first tick so the tables are
    /// populated before the first draw.
    pub fn new(config: &Config, scheduler: Scheduler<P, S>) -> Self {
        let mut state = AppState::new(
            !config.general.start_paused,
            ThemeKind::from_str_config(&config.colors.theme),
            ViewId::from_str_config(&config.general.default_view),
        );
        for view in ViewId::ALL {
            *state.view_mut(view) = ViewState::with_filter_mode(config.filters.mode_for(view));
        }

        let mut app = App {
            running: true,
            state,
            scheduler,
            screen: Screen::new(),
            input_mode: InputMode::Normal,
            status_message: None,
            table: TableGeometry::default(),
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            terminate_timeout: Duration::from_millis(config.general.terminate_timeout_ms),
        };
        if config.general.start_paused {
            // Paused ticks never collect, so take one snapshot to show.
            app.scheduler.refresh_now(&mut app.state, &mut app.screen);
        } else {
            app.on_tick();
        }
        app
    }

    pub fn on_tick(&mut self) {
        self.scheduler.tick(&mut self.state, &mut self.screen);
        self.expire_status();
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::SwitchView(view) => self.switch_view(view),
            Action::NextView => self.switch_view(self.active_view().next()),
            Action::PrevView => self.switch_view(self.active_view().prev()),
            Action::Move(movement) => self.move_selection(movement),
            Action::EnterFilterMode => {
                self.input_mode = InputMode::Filter;
            }
            Action::ExitFilterMode => {
                self.input_mode = InputMode::Normal;
            }
            Action::ClearFilter => {
                let view = self.active_view();
                let mode = self.state.view(view).filter_mode;
                self.set_filter(view, mode, String::new());
                self.input_mode = InputMode::Normal;
            }
            Action::UpdateFilter(text) => {
                let view = self.active_view();
                let mode = self.state.view(view).filter_mode;
                self.set_filter(view, mode, text);
            }
            Action::SetFilter { view, mode, query } => self.set_filter(view, mode, query),
            Action::CycleFilterMode => {
                let view = self.active_view();
                let current = self.state.view(view);
                let mode = current.filter_mode.next_in(view.filter_modes());
                let query = current.filter_query.clone();
                self.set_filter(view, mode, query);
                self.set_status(format!("Filter by {}", mode.label()), false);
            }
            Action::SortBy { view, column } => {
                let sort = &mut self.state.view_mut(view).sort;
                sort.request(column);
                let sort = *sort;
                self.screen.resort(view, &sort);
            }
            Action::Select { view, key } => {
                if self.screen.select_key(view, &key) {
                    self.state.view_mut(view).selected = Some(key);
                }
            }
            Action::Request(pending) => {
                if pending.requires_confirmation() {
                    self.input_mode = InputMode::Confirm(pending);
                } else {
                    self.execute(&pending);
                }
            }
            Action::Confirm => {
                if let InputMode::Confirm(pending) =
                    std::mem::replace(&mut self.input_mode, InputMode::Normal)
                {
                    self.execute(&pending);
                }
            }
            Action::Cancel => {
                self.input_mode = InputMode::Normal;
                self.set_status("Cancelled", false);
            }
            Action::TogglePause => {
                let running = self.state.toggle_pause();
                tracing::info!(auto_update = running, "toggled pause");
                self.set_status(if running { "Resumed" } else { "Paused" }, false);
            }
            Action::ToggleTheme => {
                self.state.toggle_theme();
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => {
                self.scheduler.refresh_now(&mut self.state, &mut self.screen);
                self.set_status("Refreshed", false);
            }
            Action::SelectAt(col, row) => self.select_at(col, row),
            Action::None => {}
        }
    }

    fn switch_view(&mut self, view: ViewId) {
        self.state.set_active_view(view);
        self.table = TableGeometry::default();
        if self.input_mode == InputMode::Filter && !view.is_filterable() {
            self.input_mode = InputMode::Normal;
        }
    }

    fn set_filter(&mut self, view: ViewId, mode: crate::view::filter::FilterMode, query: String) {
        self.state.set_filter(view, mode, query);
        self.scheduler.render_views(&mut self.state, &mut self.screen);
    }

    fn move_selection(&mut self, movement: Movement) {
        let view = self.active_view();
        let table = self.screen.table(view);
        let len = table.rows.len();
        if len == 0 {
            return;
        }
        let page = self
            .table
            .body
            .map(|b| b.height as usize)
            .filter(|h| *h > 0)
            .unwrap_or(DEFAULT_PAGE);
        let last = len - 1;
        let target = match (table.selected, movement) {
            (None, Movement::End) => last,
            (None, _) => 0,
            (Some(i), Movement::Up) => i.saturating_sub(1),
            (Some(i), Movement::Down) => (i + 1).min(last),
            (Some(i), Movement::PageUp) => i.saturating_sub(page),
            (Some(i), Movement::PageDown) => (i + page).min(last),
            (Some(_), Movement::Home) => 0,
            (Some(_), Movement::End) => last,
        };
        if let Some(key) = self.screen.select_index(view, target) {
            self.state.view_mut(view).selected = Some(key);
        }
    }

    fn select_at(&mut self, col: u16, row: u16) {
        let Some(body) = self.table.body else {
            return;
        };
        if !contains(body, col, row) {
            return;
        }
        let view = self.active_view();
        let index = self.table.offset + (row - body.y) as usize;
        if let Some(key) = self.screen.select_index(view, index) {
            self.state.view_mut(view).selected = Some(key);
        }
    }

    fn execute(&mut self, pending: &PendingAction) {
        let capabilities = self.scheduler.capabilities();
        let (control, services) = self.scheduler.parts_mut();
        match executor::run(
            pending,
            control,
            services,
            capabilities,
            self.terminate_timeout,
        ) {
            Ok(outcome) => {
                self.set_status(outcome.message(), false);
                self.scheduler.refresh_now(&mut self.state, &mut self.screen);
            }
            Err(err) => self.set_status(err.to_string(), true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ControlError, ServiceError, SourceError};
    use crate::system::process::ProcessRecord;
    use crate::system::services::{ServiceRecord, UnsupportedServices};
    use crate::system::snapshot::{Snapshot, SystemSummary};
    use crate::view::filter::FilterMode;

    struct FakeSource {
        records: Vec<ProcessRecord>,
        terminated: Vec<u32>,
    }

    impl ProcessSource for FakeSource {
        fn collect(&mut self) -> Result<Snapshot, SourceError> {
            Ok(Snapshot::new(self.records.clone()))
        }

        fn summary(&mut self) -> Result<SystemSummary, SourceError> {
            Ok(SystemSummary::default())
        }

        fn cpu_count(&self) -> usize {
            2
        }
    }

    impl ProcessControl for FakeSource {
        fn process_name(&mut self, pid: u32) -> Option<String> {
            self.records
                .iter()
                .find(|r| r.pid == pid)
                .map(|r| r.name.clone())
        }

        fn request_terminate(&mut self, pid: u32) -> Result<(), ControlError> {
            self.terminated.push(pid);
            self.records.retain(|r| r.pid != pid);
            Ok(())
        }

        fn force_kill(&mut self, pid: u32) -> Result<(), ControlError> {
            self.records.retain(|r| r.pid != pid);
            Ok(())
        }
    }

    struct ListedServices(Vec<ServiceRecord>);

    impl ServiceBackend for ListedServices {
        fn list(&mut self) -> Result<Vec<ServiceRecord>, ServiceError> {
            Ok(self.0.clone())
        }

        fn start(&mut self, _name: &str) -> Result<(), ServiceError> {
            Ok(())
        }

        fn stop(&mut self, _name: &str) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn record(pid: u32, name: &str, cpu: f32) -> ProcessRecord {
        ProcessRecord {
            pid,
            name: name.to_string(),
            cpu_percent: cpu,
            memory_percent: 1.0,
            memory_bytes: 1_048_576,
            status: "Run".to_string(),
            username: Some("alice".to_string()),
        }
    }

    fn make_test_app() -> App<FakeSource, UnsupportedServices> {
        let source = FakeSource {
            records: vec![
                record(10, "bash", 1.0),
                record(20, "cargo", 50.0),
                record(30, "rustc", 20.0),
            ],
            terminated: Vec::new(),
        };
        let caps = Capabilities {
            services: false,
            graceful_terminate: true,
        };
        let scheduler = Scheduler::new(source, UnsupportedServices, caps, 5);
        App::new(&Config::default(), scheduler)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn first_tick_populates_tables() {
        let app = make_test_app();
        assert_eq!(app.screen.table(ViewId::Processes).rows.len(), 3);
        assert_eq!(app.screen.table(ViewId::Users).rows.len(), 1);
        assert_eq!(app.screen.table(ViewId::Services).rows.len(), 1);
    }

    #[test]
    fn default_keybinds() {
        let app = make_test_app();
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('/'))), Action::EnterFilterMode);
        assert_eq!(app.map_key(key(KeyCode::Char('p'))), Action::TogglePause);
        assert_eq!(app.map_key(key(KeyCode::Char('?'))), Action::ToggleHelp);
        assert_eq!(app.map_key(key(KeyCode::Tab)), Action::NextView);
        assert_eq!(
            app.map_key(key(KeyCode::Char('3'))),
            Action::SwitchView(ViewId::Details)
        );
        assert_eq!(
            app.map_key(key(KeyCode::F(3))),
            Action::SortBy {
                view: ViewId::Processes,
                column: 2
            }
        );
        // Processes has four columns
        assert_eq!(app.map_key(key(KeyCode::F(5))), Action::None);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(ctrl_c), Action::Quit);
    }

    #[test]
    fn custom_keybind_remap_works() {
        let mut app = make_test_app();
        app.keybinds.quit = KeyCode::Char('x');
        assert_eq!(app.map_key(key(KeyCode::Char('x'))), Action::Quit);
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::None);
    }

    #[test]
    fn terminate_needs_a_selection() {
        let mut app = make_test_app();
        assert_eq!(app.map_key(key(KeyCode::Char('k'))), Action::None);

        app.dispatch(Action::Move(Movement::Down));
        assert_eq!(
            app.map_key(key(KeyCode::Char('k'))),
            Action::Request(PendingAction::Terminate {
                pid: 10,
                name: "bash".into()
            })
        );
    }

    #[test]
    fn terminate_goes_through_confirmation() {
        let mut app = make_test_app();
        app.dispatch(Action::Select {
            view: ViewId::Processes,
            key: SelectionKey::Pid(20),
        });
        let request = app.map_key(key(KeyCode::Char('k')));
        app.dispatch(request);
        assert!(matches!(app.input_mode, InputMode::Confirm(_)));
        assert_eq!(app.map_key(key(KeyCode::Char('y'))), Action::Confirm);

        app.dispatch(Action::Confirm);
        assert_eq!(app.input_mode, InputMode::Normal);
        let (source, _) = app.scheduler.parts_mut();
        assert_eq!(source.terminated, vec![20]);
        assert_eq!(app.screen.table(ViewId::Processes).rows.len(), 2);
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "Terminated PID 20");
        assert!(!status.is_error);
    }

    #[test]
    fn stale_row_does_not_terminate_a_recycled_pid() {
        let mut app = make_test_app();
        app.dispatch(Action::TogglePause);
        app.dispatch(Action::Select {
            view: ViewId::Processes,
            key: SelectionKey::Pid(20),
        });
        let (source, _) = app.scheduler.parts_mut();
        source.records.retain(|r| r.pid != 20);
        source.records.push(record(20, "postgres", 3.0));

        let request = app.map_key(key(KeyCode::Char('k')));
        app.dispatch(request);
        app.dispatch(Action::Confirm);

        let (source, _) = app.scheduler.parts_mut();
        assert!(source.terminated.is_empty());
        let status = app.status_message.as_ref().unwrap();
        assert_eq!(status.text, "PID 20 had already exited");
    }

    #[test]
    fn cancel_leaves_the_process_alone() {
        let mut app = make_test_app();
        app.dispatch(Action::Request(PendingAction::Terminate {
            pid: 10,
            name: "bash".into(),
        }));
        app.dispatch(Action::Cancel);
        let (source, _) = app.scheduler.parts_mut();
        assert!(source.terminated.is_empty());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn service_start_on_unsupported_platform_reports_it() {
        let mut app = make_test_app();
        app.dispatch(Action::Request(PendingAction::StartService("cron".into())));
        let status = app.status_message.as_ref().unwrap();
        assert!(status.text.contains("only available on Windows"));
    }

    #[test]
    fn filter_typing_narrows_rows_immediately() {
        let mut app = make_test_app();
        app.dispatch(Action::EnterFilterMode);
        for c in "car".chars() {
            let action = app.map_key(key(KeyCode::Char(c)));
            app.dispatch(action);
        }
        let rows = &app.screen.table(ViewId::Processes).rows;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].cell(1), "cargo");

        app.dispatch(Action::ClearFilter);
        assert_eq!(app.screen.table(ViewId::Processes).rows.len(), 3);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn set_filter_targets_one_view() {
        let mut app = make_test_app();
        app.dispatch(Action::SetFilter {
            view: ViewId::Details,
            mode: FilterMode::Pid,
            query: "3".into(),
        });
        assert_eq!(app.screen.table(ViewId::Details).rows.len(), 1);
        assert_eq!(app.screen.table(ViewId::Processes).rows.len(), 3);
    }

    #[test]
    fn sort_keeps_selection_and_survives_ticks() {
        let mut app = make_test_app();
        app.dispatch(Action::Select {
            view: ViewId::Processes,
            key: SelectionKey::Pid(10),
        });
        app.dispatch(Action::SortBy {
            view: ViewId::Processes,
            column: 2,
        });
        app.dispatch(Action::SortBy {
            view: ViewId::Processes,
            column: 2,
        });
        app.on_tick();

        let table = app.screen.table(ViewId::Processes);
        let pids: Vec<&str> = table.rows.iter().map(|r| r.cell(0)).collect();
        assert_eq!(pids, vec!["20", "30", "10"]);
        assert_eq!(table.selected, Some(2));
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = make_test_app();
        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());
        assert_eq!(app.map_key(key(KeyCode::Char('q'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Esc)), Action::ToggleHelp);
        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn users_view_is_not_filterable() {
        let mut app = make_test_app();
        app.dispatch(Action::SwitchView(ViewId::Users));
        assert_eq!(app.map_key(key(KeyCode::Char('/'))), Action::None);
        assert_eq!(app.map_key(key(KeyCode::Char('m'))), Action::None);
    }

    #[test]
    fn pause_is_reported() {
        let mut app = make_test_app();
        app.dispatch(Action::TogglePause);
        assert!(!app.state.auto_update());
        assert_eq!(app.status_message.as_ref().unwrap().text, "Paused");
    }

    #[test]
    fn services_filter_mode_cycles_name_and_status_only() {
        let mut app = make_test_app();
        app.dispatch(Action::SwitchView(ViewId::Services));
        app.dispatch(Action::CycleFilterMode);
        assert_eq!(
            app.state.view(ViewId::Services).filter_mode,
            FilterMode::Status
        );
        assert_eq!(app.status_message.as_ref().unwrap().text, "Filter by Status");
        app.dispatch(Action::CycleFilterMode);
        assert_eq!(app.state.view(ViewId::Services).filter_mode, FilterMode::Name);

        app.dispatch(Action::SwitchView(ViewId::Processes));
        app.dispatch(Action::CycleFilterMode);
        assert_eq!(app.state.view(ViewId::Processes).filter_mode, FilterMode::Pid);
    }

    #[test]
    fn selected_service_is_none_on_placeholder() {
        let mut app = make_test_app();
        app.dispatch(Action::SwitchView(ViewId::Services));
        app.dispatch(Action::Move(Movement::Down));
        assert_eq!(app.selected_service(), None);
        assert_eq!(app.map_key(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn service_keys_request_actions_on_the_selected_service() {
        let services = ListedServices(vec![ServiceRecord {
            name: "Spooler".into(),
            status: "running".into(),
            display_name: "Print Spooler".into(),
        }]);
        let source = FakeSource {
            records: vec![record(1, "init", 0.0)],
            terminated: Vec::new(),
        };
        let caps = Capabilities {
            services: true,
            graceful_terminate: false,
        };
        let mut app = App::new(&Config::default(), Scheduler::new(source, services, caps, 5));
        app.dispatch(Action::SwitchView(ViewId::Services));
        app.dispatch(Action::Move(Movement::Down));

        assert_eq!(
            app.map_key(key(KeyCode::Char('R'))),
            Action::Request(PendingAction::RestartService("Spooler".into()))
        );
        app.dispatch(Action::Request(PendingAction::StartService("Spooler".into())));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(
            app.status_message.as_ref().unwrap().text,
            "Started service 'Spooler'"
        );
    }
}
