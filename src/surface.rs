use crate::system::snapshot::SystemSummary;
use crate::view::selection;
use crate::view::sort::SortState;
use crate::view::{Row, SelectionKey, ViewId};

/// Where the scheduler pushes finished rows.
pub trait DisplaySurface {
    /// Replaces every row of `view`. `selected` is the key to highlight, if
    /// it is still present.
    fn render_rows(&mut self, view: ViewId, rows: Vec<Row>, selected: Option<&SelectionKey>);

    fn render_summary(&mut self, summary: &SystemSummary);
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderedTable {
    pub rows: Vec<Row>,
    pub selected: Option<usize>,
}

impl RenderedTable {
    pub fn selected_row(&self) -> Option<&Row> {
        self.selected.and_then(|i| self.rows.get(i))
    }
}

/// In-memory tables the terminal UI draws from.
#[derive(Debug, Default)]
pub struct Screen {
    tables: [RenderedTable; 4],
    summary: SystemSummary,
}

impl Screen {
    pub fn new() -> Self {
        Screen::default()
    }

    pub fn table(&self, view: ViewId) -> &RenderedTable {
        &self.tables[view.index()]
    }

    pub fn summary(&self) -> &SystemSummary {
        &self.summary
    }

    pub fn selected_key(&self, view: ViewId) -> Option<SelectionKey> {
        self.table(view)
            .selected_row()
            .and_then(|row| selection::key_of(row, view.layout()))
    }

    /// Highlights row `index` and returns its key. Rows without a key are
    /// not selectable.
    pub fn select_index(&mut self, view: ViewId, index: usize) -> Option<SelectionKey> {
        let table = &mut self.tables[view.index()];
        let key = table
            .rows
            .get(index)
            .and_then(|row| selection::key_of(row, view.layout()))?;
        table.selected = Some(index);
        Some(key)
    }

    pub fn select_key(&mut self, view: ViewId, key: &SelectionKey) -> bool {
        let table = &mut self.tables[view.index()];
        table.selected = selection::locate(&table.rows, view.layout(), key);
        table.selected.is_some()
    }

    /// Reorders the rows already on screen without re-aggregating.
    pub fn resort(&mut self, view: ViewId, sort: &SortState) {
        let key = self.selected_key(view);
        let table = &mut self.tables[view.index()];
        sort.apply(&mut table.rows, view.layout());
        table.selected = key.and_then(|k| selection::locate(&table.rows, view.layout(), &k));
    }
}

impl DisplaySurface for Screen {
    fn render_rows(&mut self, view: ViewId, rows: Vec<Row>, selected: Option<&SelectionKey>) {
        let index = selected.and_then(|key| selection::locate(&rows, view.layout(), key));
        self.tables[view.index()] = RenderedTable {
            rows,
            selected: index,
        };
    }

    fn render_summary(&mut self, summary: &SystemSummary) {
        self.summary = summary.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pid: u32, cpu: &str) -> Row {
        Row::new(vec![pid.to_string(), format!("p{pid}"), cpu.to_string(), "0.00".into()])
    }

    #[test]
    fn render_highlights_the_selected_key() {
        let mut screen = Screen::new();
        screen.render_rows(
            ViewId::Processes,
            vec![row(1, "1.0"), row(2, "2.0")],
            Some(&SelectionKey::Pid(2)),
        );
        assert_eq!(screen.table(ViewId::Processes).selected, Some(1));
        assert_eq!(
            screen.selected_key(ViewId::Processes),
            Some(SelectionKey::Pid(2))
        );
    }

    #[test]
    fn resort_keeps_the_same_row_selected() {
        let mut screen = Screen::new();
        screen.render_rows(
            ViewId::Processes,
            vec![row(1, "9.0"), row(2, "1.0"), row(3, "5.0")],
            Some(&SelectionKey::Pid(1)),
        );
        let mut sort = SortState::default();
        sort.request(2);
        screen.resort(ViewId::Processes, &sort);

        let table = screen.table(ViewId::Processes);
        let pids: Vec<&str> = table.rows.iter().map(|r| r.cell(0)).collect();
        assert_eq!(pids, vec!["2", "3", "1"]);
        assert_eq!(table.selected, Some(2));
    }

    #[test]
    fn select_index_refuses_keyless_rows() {
        let mut screen = Screen::new();
        screen.render_rows(
            ViewId::Services,
            vec![Row::new(vec![String::new(), "unsupported".into(), "-".into()])],
            None,
        );
        assert_eq!(screen.select_index(ViewId::Services, 0), None);
        assert_eq!(screen.table(ViewId::Services).selected, None);
    }
}
