use super::{KeyKind, Row, SelectionKey, ViewLayout};

/// Reads the selection key out of the layout's key column.
///
/// Placeholder rows whose key cell does not parse have no key and cannot be
/// selected.
pub fn key_of(row: &Row, layout: &ViewLayout) -> Option<SelectionKey> {
    let cell = row.cell(layout.key_column).trim();
    match layout.key_kind {
        KeyKind::Pid => cell.parse().ok().map(SelectionKey::Pid),
        KeyKind::Name if cell.is_empty() => None,
        KeyKind::Name => Some(SelectionKey::Name(cell.to_string())),
    }
}

pub fn locate(rows: &[Row], layout: &ViewLayout, key: &SelectionKey) -> Option<usize> {
    rows.iter()
        .position(|row| key_of(row, layout).as_ref() == Some(key))
}

/// Re-finds `selected` in freshly built rows. Clears it when the row is gone.
pub fn preserve(
    selected: &mut Option<SelectionKey>,
    rows: &[Row],
    layout: &ViewLayout,
) -> Option<usize> {
    let index = selected
        .as_ref()
        .and_then(|key| locate(rows, layout, key));
    if index.is_none() {
        *selected = None;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewId;

    fn process_row(pid: u32, name: &str) -> Row {
        Row::new(vec![pid.to_string(), name.to_string(), "0.0".into(), "0.00".into()])
    }

    #[test]
    fn selection_survives_reordering() {
        let layout = ViewId::Processes.layout();
        let mut selected = Some(SelectionKey::Pid(500));
        let rows = vec![process_row(7, "a"), process_row(500, "b"), process_row(9, "c")];
        assert_eq!(preserve(&mut selected, &rows, layout), Some(1));

        let reordered = vec![process_row(500, "b"), process_row(9, "c"), process_row(7, "a")];
        assert_eq!(preserve(&mut selected, &reordered, layout), Some(0));
        assert_eq!(selected, Some(SelectionKey::Pid(500)));
    }

    #[test]
    fn selection_clears_when_row_disappears() {
        let layout = ViewId::Processes.layout();
        let mut selected = Some(SelectionKey::Pid(500));
        let rows = vec![process_row(7, "a")];
        assert_eq!(preserve(&mut selected, &rows, layout), None);
        assert_eq!(selected, None);
    }

    #[test]
    fn detail_rows_are_keyed_by_second_column() {
        let layout = ViewId::Details.layout();
        let row = Row::new(vec![
            "chrome".into(),
            "42".into(),
            "Run".into(),
            "bob".into(),
            "1.0".into(),
            "10.0".into(),
        ]);
        assert_eq!(key_of(&row, layout), Some(SelectionKey::Pid(42)));
    }

    #[test]
    fn placeholder_rows_have_no_key() {
        let layout = ViewId::Services.layout();
        let row = Row::new(vec![String::new(), "unsupported".into(), "n/a".into()]);
        assert_eq!(key_of(&row, layout), None);
    }
}
