// src/app/present.rs
use crate::app::store::ResultRow;
use crate::app::types::{SortKey, SortSpec};

fn sort_field(row: &ResultRow, key: SortKey) -> &str {
    match key {
        SortKey::Raw => "",
        SortKey::Id => &row.id,
        SortKey::Title => &row.title,
        SortKey::Description => &row.description,
    }
}

/// Rows in display order.
///
/// `Raw` keeps insertion order; the other keys use a stable ordinal sort on
/// the field. `descending` reverses whatever order that produced, so `Raw`
/// descending means "last fetched first".
pub fn ordered<'a>(rows: &'a [ResultRow], spec: SortSpec) -> Vec<&'a ResultRow> {
    let mut out: Vec<&ResultRow> = rows.iter().collect();
    if spec.key != SortKey::Raw {
        out.sort_by(|a, b| sort_field(a, spec.key).cmp(sort_field(b, spec.key)));
    }
    if spec.descending {
        out.reverse();
    }
    out
}

pub fn line(row: &ResultRow, hide_ids: bool) -> String {
    if hide_ids {
        format!("{} {}", row.title, row.description)
    } else {
        format!("{} {} {}", row.id, row.title, row.description)
    }
}

pub fn render(rows: &[ResultRow], spec: SortSpec, hide_ids: bool) -> Vec<String> {
    ordered(rows, spec)
        .into_iter()
        .map(|row| line(row, hide_ids))
        .collect()
}
