use std::cmp::Ordering;

use super::{Row, ViewLayout};

/// Last sort a view was asked for. `None` keeps aggregation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<usize>,
    pub ascending: bool,
}

impl SortState {
    /// Same column flips direction; a new column starts ascending.
    pub fn request(&mut self, column: usize) {
        if self.column == Some(column) {
            self.ascending = !self.ascending;
        } else {
            self.column = Some(column);
            self.ascending = true;
        }
    }

    pub fn apply(&self, rows: &mut Vec<Row>, layout: &ViewLayout) {
        if let Some(column) = self.column {
            let numeric = layout.columns.get(column).is_some_and(|c| c.numeric);
            sort_rows(rows, column, self.ascending, numeric);
        }
    }
}

enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
            (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
        }
    }
}

/// Stable sort on one column. Equal keys keep their relative order in both
/// directions.
pub fn sort_rows(rows: &mut Vec<Row>, column: usize, ascending: bool, numeric: bool) {
    let mut keyed: Vec<(SortKey, Row)> = rows
        .drain(..)
        .map(|row| {
            let cell = row.cell(column);
            let key = if numeric {
                SortKey::Number(coerce_numeric(cell))
            } else {
                SortKey::Text(cell.to_lowercase())
            };
            (key, row)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        if ascending { ord } else { ord.reverse() }
    });

    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

/// Cell text as a number: `%` and thousands separators are ignored and
/// anything unparsable counts as 0.
pub fn coerce_numeric(text: &str) -> f64 {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, '%' | ','))
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}
